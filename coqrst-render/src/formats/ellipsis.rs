//! Ellipsis renderer
//!
//! A plain-text approximation of a notation, used in prose and as the display name of
//! documented objects. Holes are quoted as `‘name’`, and a one-or-more repetition is
//! written out twice around an ellipsis: `{+, @term}` reads `‘term’, …, ‘term’`.
//! Other repetition kinds render their body once, unless
//! [EllipsisOptions::expand_all_repeats] is set.

use crate::error::RenderError;
use crate::renderer::Renderer;
use coqrst_notation::{parse_notation, Node, Notation, RepeatKind, Visitor};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EllipsisOptions {
    /// Expand `?` and `*` groups around an ellipsis too
    pub expand_all_repeats: bool,
}

struct EllipsisWriter<'o> {
    buffer: String,
    options: &'o EllipsisOptions,
}

impl Visitor for EllipsisWriter<'_> {
    fn visit_atomic(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn visit_hole(&mut self, name: &str) {
        self.buffer.push('‘');
        self.buffer.push_str(name);
        self.buffer.push('’');
    }

    fn visit_whitespace(&mut self) {
        self.buffer.push(' ');
    }

    fn visit_curlies(&mut self, children: &[Node]) {
        self.buffer.push('{');
        self.visit_children(children);
        self.buffer.push('}');
    }

    fn visit_repeat(&mut self, repeat: RepeatKind, separator: Option<&str>, children: &[Node]) {
        self.visit_children(children);
        if repeat == RepeatKind::OneOrMore || self.options.expand_all_repeats {
            let spacer = separator.map(|sep| format!("{} ", sep)).unwrap_or_default();
            self.buffer.push_str(&spacer);
            self.buffer.push('…');
            self.buffer.push_str(&spacer);
            self.visit_children(children);
        }
    }
}

pub fn stringify_with_ellipses(notation: &Notation, options: &EllipsisOptions) -> String {
    let mut writer = EllipsisWriter {
        buffer: String::new(),
        options,
    };
    writer.visit_top(notation);
    writer.buffer
}

/// Parse `source` and render it with ellipses.
pub fn stringify_str(source: &str, options: &EllipsisOptions) -> Result<String, RenderError> {
    Ok(stringify_with_ellipses(&parse_notation(source)?, options))
}

#[derive(Debug, Clone, Default)]
pub struct EllipsisRenderer {
    options: EllipsisOptions,
}

impl EllipsisRenderer {
    pub fn new(options: EllipsisOptions) -> Self {
        EllipsisRenderer { options }
    }
}

impl Renderer for EllipsisRenderer {
    fn name(&self) -> &str {
        "ellipsis"
    }

    fn description(&self) -> &str {
        "Plain text with repetitions elided"
    }

    fn render(&self, notation: &Notation) -> Result<String, RenderError> {
        Ok(stringify_with_ellipses(notation, &self.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("a b", "a b")]
    #[case("{+ @term}", "‘term’…‘term’")]
    #[case("{+, @term}", "‘term’, …, ‘term’")]
    #[case("{? simple}", "simple")]
    #[case("intros {* @ident}", "intros ‘ident’")]
    #[case("{in @hyp}", "{in ‘hyp’}")]
    #[case("unfold {+, @qualid at {+, num}}", "unfold ‘qualid’ at num, …, num, …, ‘qualid’ at num, …, num")]
    fn test_default_rendering(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(
            stringify_str(source, &EllipsisOptions::default()).unwrap(),
            expected
        );
    }

    #[test]
    fn test_expand_all_repeats() {
        let options = EllipsisOptions {
            expand_all_repeats: true,
        };
        assert_eq!(
            stringify_str("intros {*, @ident}", &options).unwrap(),
            "intros ‘ident’, …, ‘ident’"
        );
        assert_eq!(stringify_str("{? @x}", &options).unwrap(), "‘x’…‘x’");
    }

    #[test]
    fn test_bindings_list_expansion() {
        assert_eq!(
            stringify_str("with @bindings_list", &EllipsisOptions::default()).unwrap(),
            "with (‘id’ := ‘val’)…(‘id’ := ‘val’)"
        );
    }
}
