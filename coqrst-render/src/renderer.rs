//! Renderer trait definition

use crate::error::RenderError;
use coqrst_notation::{parse_notation, Notation};

/// A named output target for notations.
///
/// Implementors turn a parsed notation into text. The notation is only borrowed, so the
/// same tree can go through several renderers.
pub trait Renderer: Send + Sync {
    /// The name this renderer is registered under (e.g. "html", "regexp")
    fn name(&self) -> &str;

    /// Optional description of this renderer
    fn description(&self) -> &str {
        ""
    }

    /// Render a parsed notation
    fn render(&self, notation: &Notation) -> Result<String, RenderError>;

    /// Parse (with abbreviation expansion) and render raw notation text
    fn render_str(&self, source: &str) -> Result<String, RenderError> {
        let notation = parse_notation(source)?;
        self.render(&notation)
    }
}
