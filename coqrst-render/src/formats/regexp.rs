//! Regexp renderer
//!
//!     Turns a notation into a regular expression matching concrete uses of it, which is
//!     how documentation tooling finds where a tactic is used in source files.
//!
//!     - atoms are escaped literally
//!     - holes match a run of characters other than `( ) ; .`, blank or newline
//!     - whitespace matches one or more blanks
//!     - curlies match literal braces around their body
//!
//!     Repetitions have two flavours, picked by [StarRepeat]. `compat` keeps the historic
//!     capturing layout, where a `*` group gets both the optional and the repeated tail.
//!     `strict` uses non-capturing groups with the exact cardinality of each kind.
//!     A group without separator uses a single space between repetitions.

use crate::error::RenderError;
use crate::renderer::Renderer;
use coqrst_notation::{parse_notation, Node, Notation, RepeatKind, Visitor};
use regex::Regex;
use serde::Deserialize;

/// Pattern for a single hole.
pub const HOLE_PATTERN: &str = r"([^();. \n]+)";

const WHITESPACE_PATTERN: &str = r"\s+";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StarRepeat {
    #[default]
    Compat,
    Strict,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RegexpOptions {
    pub star: StarRepeat,
}

struct RegexpWriter<'o> {
    buffer: String,
    options: &'o RegexpOptions,
}

impl RegexpWriter<'_> {
    fn nested(&mut self, children: &[Node]) -> String {
        let outer = std::mem::take(&mut self.buffer);
        self.visit_children(children);
        std::mem::replace(&mut self.buffer, outer)
    }
}

impl Visitor for RegexpWriter<'_> {
    fn visit_atomic(&mut self, text: &str) {
        self.buffer.push_str(&regex::escape(text));
    }

    fn visit_hole(&mut self, _name: &str) {
        self.buffer.push_str(HOLE_PATTERN);
    }

    fn visit_whitespace(&mut self) {
        self.buffer.push_str(WHITESPACE_PATTERN);
    }

    fn visit_curlies(&mut self, children: &[Node]) {
        self.buffer.push_str(r"\{");
        self.visit_children(children);
        self.buffer.push_str(r"\}");
    }

    fn visit_repeat(&mut self, repeat: RepeatKind, separator: Option<&str>, children: &[Node]) {
        let body = self.nested(children);
        let separator = regex::escape(separator.unwrap_or(" "));
        let rendered = match self.options.star {
            StarRepeat::Compat => {
                let mut out = format!("({})", body);
                if repeat.is_optional() {
                    out.push('?');
                }
                if repeat.is_repeatable() {
                    out.push_str(&format!(r"(\s*{}\s*{})*", separator, body));
                }
                out
            }
            StarRepeat::Strict => {
                let tail = format!(r"(?:\s*{}\s*{})*", separator, body);
                match repeat {
                    RepeatKind::Optional => format!("(?:{})?", body),
                    RepeatKind::OneOrMore => format!("(?:{}){}", body, tail),
                    RepeatKind::ZeroOrMore => format!("(?:{}{})?", body, tail),
                }
            }
        };
        self.buffer.push_str(&rendered);
    }
}

/// The regular expression source for a parsed notation.
pub fn regexpify(notation: &Notation, options: &RegexpOptions) -> String {
    let mut writer = RegexpWriter {
        buffer: String::new(),
        options,
    };
    writer.visit_top(notation);
    writer.buffer
}

/// Compiled regular expression, unanchored.
pub fn to_regex(notation: &Notation, options: &RegexpOptions) -> Result<Regex, RenderError> {
    Ok(Regex::new(&regexpify(notation, options))?)
}

/// Compiled regular expression matching whole strings only.
pub fn to_anchored_regex(
    notation: &Notation,
    options: &RegexpOptions,
) -> Result<Regex, RenderError> {
    Ok(Regex::new(&format!(
        "^(?:{})$",
        regexpify(notation, options)
    ))?)
}

/// Parse `source` and return its regular expression source.
pub fn regexpify_str(source: &str, options: &RegexpOptions) -> Result<String, RenderError> {
    Ok(regexpify(&parse_notation(source)?, options))
}

#[derive(Debug, Clone, Default)]
pub struct RegexpRenderer {
    options: RegexpOptions,
}

impl RegexpRenderer {
    pub fn new(options: RegexpOptions) -> Self {
        RegexpRenderer { options }
    }
}

impl Renderer for RegexpRenderer {
    fn name(&self) -> &str {
        "regexp"
    }

    fn description(&self) -> &str {
        "Regular expression matching uses of the notation"
    }

    fn render(&self, notation: &Notation) -> Result<String, RenderError> {
        Ok(regexpify(notation, &self.options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn anchored(source: &str, star: StarRepeat) -> Regex {
        let notation = parse_notation(source).unwrap();
        to_anchored_regex(&notation, &RegexpOptions { star }).unwrap()
    }

    #[test]
    fn test_hole_pattern() {
        let re = anchored("@x", StarRepeat::Compat);
        assert!(re.is_match("foo"));
        assert!(!re.is_match("a b"));
        assert!(!re.is_match(""));
        assert!(!re.is_match("f(x)"));
    }

    #[test]
    fn test_atoms_are_escaped() {
        assert_eq!(
            regexpify_str("a.b", &RegexpOptions::default()).unwrap(),
            r"a\.b"
        );
        assert!(anchored("f(x)", StarRepeat::Compat).is_match("f(x)"));
    }

    #[test]
    fn test_compat_star_layout() {
        assert_eq!(
            regexpify_str("{*, @x}", &RegexpOptions::default()).unwrap(),
            r"(([^();. \n]+))?(\s*,\s*([^();. \n]+))*"
        );
    }

    #[test]
    fn test_compat_plus_without_separator() {
        assert_eq!(
            regexpify_str("{+ @x}", &RegexpOptions::default()).unwrap(),
            r"(([^();. \n]+))(\s* \s*([^();. \n]+))*"
        );
    }

    #[rstest]
    #[case("intros {*, @x}", "intros ", true)]
    #[case("intros {*, @x}", "intros", false)]
    #[case("intros {*, @x}", "intros a, b ,c", true)]
    #[case("rewrite {+, @t}", "rewrite", false)]
    #[case("rewrite {+, @t}", "rewrite a,b", true)]
    #[case("auto {? with}", "auto with", true)]
    #[case("auto {? with}", "auto with with", false)]
    fn test_strict_cardinality(#[case] source: &str, #[case] input: &str, #[case] matches: bool) {
        assert_eq!(anchored(source, StarRepeat::Strict).is_match(input), matches);
    }

    #[test]
    fn test_curlies_match_braces() {
        let re = anchored("{@x}", StarRepeat::Compat);
        assert!(re.is_match("{y}"));
        assert!(!re.is_match("y"));
    }
}
