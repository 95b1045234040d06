//! HTML renderer
//!
//!     Every notation becomes a tree of `<span>` elements, styled by the notation
//!     stylesheet:
//!
//!     | Node       | HTML                                                          |
//!     |------------|---------------------------------------------------------------|
//!     | top        | `<span class="notation">`                                     |
//!     | atom       | `<span>text</span>`                                           |
//!     | hole       | `<span class="hole">name</span>`                              |
//!     | whitespace | a `" "` text node                                             |
//!     | curlies    | `<span class="curlies">{…}</span>`                            |
//!     | repeat     | `<span class="repeat-wrapper"><span class="repeat">…</span>`  |
//!     |            | `<sup>kind</sup>[<sub>sep</sub>]</span>`                      |
//!
//!     The tree is built as an rcdom and serialized by html5ever, which takes care of
//!     escaping. With [HtmlOptions::hints] the `<sup>`/`<sub>` markers carry tooltip
//!     text describing the repetition.

mod serializer;

pub use serializer::{htmlize, htmlize_str, serialize_node};

use crate::error::RenderError;
use crate::renderer::Renderer;
use coqrst_notation::Notation;
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HtmlOptions {
    /// Attach `data-hint` tooltips to repetition markers
    pub hints: bool,
}

#[derive(Debug, Clone, Default)]
pub struct HtmlRenderer {
    options: HtmlOptions,
}

impl HtmlRenderer {
    pub fn new(options: HtmlOptions) -> Self {
        HtmlRenderer { options }
    }
}

impl Renderer for HtmlRenderer {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Nested HTML spans"
    }

    fn render(&self, notation: &Notation) -> Result<String, RenderError> {
        serialize_node(&htmlize(notation, &self.options))
    }
}
