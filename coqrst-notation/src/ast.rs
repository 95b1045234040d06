//! Notation AST
//!
//!     A parsed notation is a [Notation] (the top node) holding an ordered sequence of
//!     [Node]s. Leaves are atoms, holes and whitespace; curly groups and repetition
//!     groups nest further sequences. Child order is significant and every renderer
//!     preserves it.
//!
//!     The tree is built once by the parser and never mutated afterwards. Renderers walk
//!     it through the [Visitor] trait, one method per node kind.

use serde::Serialize;
use std::fmt;

/// How many times a repetition group may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatKind {
    /// `{?`: zero or one
    Optional,
    /// `{+`: one or more
    OneOrMore,
    /// `{*`: zero or more
    ZeroOrMore,
}

impl RepeatKind {
    pub fn from_marker(marker: char) -> Option<Self> {
        match marker {
            '?' => Some(RepeatKind::Optional),
            '+' => Some(RepeatKind::OneOrMore),
            '*' => Some(RepeatKind::ZeroOrMore),
            _ => None,
        }
    }

    /// The marker character, as written after the opening brace.
    pub fn marker(&self) -> char {
        match self {
            RepeatKind::Optional => '?',
            RepeatKind::OneOrMore => '+',
            RepeatKind::ZeroOrMore => '*',
        }
    }

    /// Whether the group may be left out entirely (`?` and `*`).
    pub fn is_optional(&self) -> bool {
        matches!(self, RepeatKind::Optional | RepeatKind::ZeroOrMore)
    }

    /// Whether the group may occur more than once (`+` and `*`).
    pub fn is_repeatable(&self) -> bool {
        matches!(self, RepeatKind::OneOrMore | RepeatKind::ZeroOrMore)
    }
}

impl fmt::Display for RepeatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.marker())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Node {
    /// Literal syntax, rendered verbatim
    Atomic { text: String },
    /// A fillable slot; `name` has its `@` sigil stripped
    Hole { name: String },
    /// A separator between items
    Whitespace,
    /// `{ ... }`: literal braces around a sequence
    Curlies { children: Vec<Node> },
    /// `{+, ... }` and friends
    Repeat {
        repeat: RepeatKind,
        separator: Option<String>,
        children: Vec<Node>,
    },
}

impl Node {
    pub fn atomic(text: impl Into<String>) -> Self {
        Node::Atomic { text: text.into() }
    }

    pub fn hole(name: impl Into<String>) -> Self {
        Node::Hole { name: name.into() }
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Curlies { children } | Node::Repeat { children, .. } => children,
            Node::Atomic { .. } | Node::Hole { .. } | Node::Whitespace => &[],
        }
    }

    fn unparse_into(&self, out: &mut String) {
        match self {
            Node::Atomic { text } => out.push_str(text),
            Node::Hole { name } => {
                out.push('@');
                out.push_str(name);
            }
            Node::Whitespace => out.push(' '),
            Node::Curlies { children } => {
                out.push('{');
                children.iter().for_each(|child| child.unparse_into(out));
                out.push('}');
            }
            Node::Repeat {
                repeat,
                separator,
                children,
            } => {
                out.push('{');
                out.push(repeat.marker());
                if let Some(separator) = separator {
                    out.push_str(separator);
                }
                // Without this space a leading atom would be read back as the separator.
                out.push(' ');
                children.iter().for_each(|child| child.unparse_into(out));
                out.push('}');
            }
        }
    }
}

/// The top node: a whole parsed notation.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Notation {
    pub children: Vec<Node>,
}

impl Notation {
    pub fn new(children: Vec<Node>) -> Self {
        Notation { children }
    }

    /// Canonical source text for this tree.
    ///
    /// Whitespace comes out as single spaces and every repetition opener is followed by
    /// a space, so parsing the result yields an equal tree.
    pub fn unparse(&self) -> String {
        let mut out = String::new();
        self.children
            .iter()
            .for_each(|child| child.unparse_into(&mut out));
        out
    }

    /// Identifiers of every hole, in source order.
    pub fn holes(&self) -> Vec<&str> {
        fn collect<'a>(nodes: &'a [Node], acc: &mut Vec<&'a str>) {
            for node in nodes {
                match node {
                    Node::Hole { name } => acc.push(name),
                    other => collect(other.children(), acc),
                }
            }
        }
        let mut acc = Vec::new();
        collect(&self.children, &mut acc);
        acc
    }
}

/// Traversal over a notation AST, one method per node kind.
///
/// Container defaults recurse into children in order; leaf defaults do nothing. A
/// renderer overrides the kinds it cares about and keeps its output in its own fields,
/// so the tree itself is only ever borrowed.
pub trait Visitor {
    fn visit_top(&mut self, notation: &Notation) {
        self.visit_children(&notation.children);
    }

    fn visit_atomic(&mut self, _text: &str) {}

    fn visit_hole(&mut self, _name: &str) {}

    fn visit_whitespace(&mut self) {}

    fn visit_curlies(&mut self, children: &[Node]) {
        self.visit_children(children);
    }

    fn visit_repeat(&mut self, _repeat: RepeatKind, _separator: Option<&str>, children: &[Node]) {
        self.visit_children(children);
    }

    fn visit_children(&mut self, children: &[Node]) {
        for child in children {
            self.visit_node(child);
        }
    }

    /// Dispatch on the node kind.
    fn visit_node(&mut self, node: &Node) {
        match node {
            Node::Atomic { text } => self.visit_atomic(text),
            Node::Hole { name } => self.visit_hole(name),
            Node::Whitespace => self.visit_whitespace(),
            Node::Curlies { children } => self.visit_curlies(children),
            Node::Repeat {
                repeat,
                separator,
                children,
            } => self.visit_repeat(*repeat, separator.as_deref(), children),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct LeafCounter {
        atoms: usize,
        holes: usize,
        spaces: usize,
    }

    impl Visitor for LeafCounter {
        fn visit_atomic(&mut self, _text: &str) {
            self.atoms += 1;
        }
        fn visit_hole(&mut self, _name: &str) {
            self.holes += 1;
        }
        fn visit_whitespace(&mut self) {
            self.spaces += 1;
        }
    }

    fn sample() -> Notation {
        Notation::new(vec![
            Node::atomic("rewrite"),
            Node::Whitespace,
            Node::Repeat {
                repeat: RepeatKind::OneOrMore,
                separator: Some(",".to_string()),
                children: vec![Node::hole("term")],
            },
            Node::Whitespace,
            Node::Curlies {
                children: vec![Node::atomic("in"), Node::Whitespace, Node::hole("hyp")],
            },
        ])
    }

    #[test]
    fn test_default_visitor_reaches_every_leaf() {
        let mut counter = LeafCounter::default();
        counter.visit_top(&sample());
        assert_eq!(counter.atoms, 2);
        assert_eq!(counter.holes, 2);
        assert_eq!(counter.spaces, 3);
    }

    #[test]
    fn test_unparse() {
        assert_eq!(sample().unparse(), "rewrite {+, @term} {in @hyp}");
    }

    #[test]
    fn test_holes_in_order() {
        assert_eq!(sample().holes(), vec!["term", "hyp"]);
    }

    #[test]
    fn test_repeat_kind_markers() {
        for marker in ['?', '+', '*'] {
            let kind = RepeatKind::from_marker(marker).unwrap();
            assert_eq!(kind.marker(), marker);
        }
        assert_eq!(RepeatKind::from_marker('!'), None);
        assert!(RepeatKind::ZeroOrMore.is_optional());
        assert!(RepeatKind::ZeroOrMore.is_repeatable());
        assert!(!RepeatKind::OneOrMore.is_optional());
        assert!(!RepeatKind::Optional.is_repeatable());
    }
}
