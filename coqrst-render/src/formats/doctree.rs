//! Document-tree renderer
//!
//!     Produces a backend-neutral tree in the shape documentation builders use for inline
//!     markup: text nodes, `inline` nodes carrying CSS classes, and pending
//!     cross-references. Every `inline.hole` is wrapped in a pending reference to the
//!     grammar token of the same name, so the documentation builder can link it to its
//!     definition and the hole styling ends up on the link's content.
//!
//!     Whitespace becomes a single-space text node. Curly groups keep their braces as
//!     text nodes around the children. A repetition becomes
//!     `inline.repeat-wrapper[inline.repeat[…], inline.notation-sup[kind],
//!     inline.notation-sub[sep]?]`.
//!
//!     The tree serializes as JSON (tagged by `node`) and prints as indented pseudo-XML.

use crate::error::RenderError;
use crate::renderer::Renderer;
use coqrst_notation::{parse_notation, Node, Notation, RepeatKind, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum DocNode {
    Text {
        text: String,
    },
    Inline {
        classes: Vec<String>,
        children: Vec<DocNode>,
    },
    PendingXref {
        refdomain: String,
        reftype: String,
        reftarget: String,
        children: Vec<DocNode>,
    },
}

impl DocNode {
    pub fn text(text: impl Into<String>) -> Self {
        DocNode::Text { text: text.into() }
    }

    pub fn inline(class: Option<&str>, children: Vec<DocNode>) -> Self {
        DocNode::Inline {
            classes: class.map(|c| vec![c.to_string()]).unwrap_or_default(),
            children,
        }
    }

    pub fn children(&self) -> &[DocNode] {
        match self {
            DocNode::Text { .. } => &[],
            DocNode::Inline { children, .. } | DocNode::PendingXref { children, .. } => children,
        }
    }

    /// Concatenated text of this node and its descendants.
    pub fn astext(&self) -> String {
        match self {
            DocNode::Text { text } => text.clone(),
            other => other.children().iter().map(DocNode::astext).collect(),
        }
    }

    fn pformat(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        let indent = "    ".repeat(depth);
        match self {
            DocNode::Text { text } => return writeln!(f, "{}{}", indent, text),
            DocNode::Inline { classes, .. } if classes.is_empty() => {
                writeln!(f, "{}<inline>", indent)?
            }
            DocNode::Inline { classes, .. } => {
                writeln!(f, "{}<inline classes=\"{}\">", indent, classes.join(" "))?
            }
            DocNode::PendingXref {
                refdomain,
                reftype,
                reftarget,
                ..
            } => writeln!(
                f,
                "{}<pending_xref refdomain=\"{}\" reftarget=\"{}\" reftype=\"{}\">",
                indent, refdomain, reftarget, reftype
            )?,
        }
        for child in self.children() {
            child.pformat(f, depth + 1)?;
        }
        Ok(())
    }
}

impl fmt::Display for DocNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.pformat(f, 0)
    }
}

/// Where hole cross-references point.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DoctreeOptions {
    pub xref_domain: String,
    pub xref_reftype: String,
}

impl Default for DoctreeOptions {
    fn default() -> Self {
        DoctreeOptions {
            xref_domain: "std".to_string(),
            xref_reftype: "token".to_string(),
        }
    }
}

struct TreeBuilder<'o> {
    current: Vec<DocNode>,
    options: &'o DoctreeOptions,
}

impl TreeBuilder<'_> {
    /// Collect the nodes `f` produces, leaving the current sibling list untouched.
    fn nested(&mut self, f: impl FnOnce(&mut Self)) -> Vec<DocNode> {
        let outer = std::mem::take(&mut self.current);
        f(self);
        std::mem::replace(&mut self.current, outer)
    }
}

impl Visitor for TreeBuilder<'_> {
    fn visit_atomic(&mut self, text: &str) {
        self.current
            .push(DocNode::inline(None, vec![DocNode::text(text)]));
    }

    fn visit_hole(&mut self, name: &str) {
        let hole = DocNode::inline(Some("hole"), vec![DocNode::text(name)]);
        self.current.push(DocNode::PendingXref {
            refdomain: self.options.xref_domain.clone(),
            reftype: self.options.xref_reftype.clone(),
            reftarget: name.to_string(),
            children: vec![hole],
        });
    }

    fn visit_whitespace(&mut self) {
        self.current.push(DocNode::text(" "));
    }

    fn visit_curlies(&mut self, children: &[Node]) {
        let mut inner = vec![DocNode::text("{")];
        inner.extend(self.nested(|builder| builder.visit_children(children)));
        inner.push(DocNode::text("}"));
        self.current.push(DocNode::inline(Some("curlies"), inner));
    }

    fn visit_repeat(&mut self, repeat: RepeatKind, separator: Option<&str>, children: &[Node]) {
        let body = self.nested(|builder| builder.visit_children(children));
        let mut wrapper = vec![
            DocNode::inline(Some("repeat"), body),
            DocNode::inline(
                Some("notation-sup"),
                vec![DocNode::text(repeat.marker().to_string())],
            ),
        ];
        if let Some(separator) = separator {
            wrapper.push(DocNode::inline(
                Some("notation-sub"),
                vec![DocNode::text(separator)],
            ));
        }
        self.current
            .push(DocNode::inline(Some("repeat-wrapper"), wrapper));
    }
}

/// Document-tree nodes for the children of a parsed notation.
pub fn sphinxify(notation: &Notation, options: &DoctreeOptions) -> Vec<DocNode> {
    let mut builder = TreeBuilder {
        current: Vec::new(),
        options,
    };
    builder.visit_top(notation);
    builder.current
}

/// Parse `source` and wrap its document tree in an `inline.notation` node.
pub fn parse_notation_node(source: &str, options: &DoctreeOptions) -> Result<DocNode, RenderError> {
    let notation = parse_notation(source)?;
    Ok(notation_node(&notation, options))
}

fn notation_node(notation: &Notation, options: &DoctreeOptions) -> DocNode {
    DocNode::inline(Some("notation"), sphinxify(notation, options))
}

/// Pseudo-XML dump of the document tree
#[derive(Debug, Clone, Default)]
pub struct DoctreeRenderer {
    options: DoctreeOptions,
}

impl DoctreeRenderer {
    pub fn new(options: DoctreeOptions) -> Self {
        DoctreeRenderer { options }
    }
}

impl Renderer for DoctreeRenderer {
    fn name(&self) -> &str {
        "doctree"
    }

    fn description(&self) -> &str {
        "Document tree as indented pseudo-XML"
    }

    fn render(&self, notation: &Notation) -> Result<String, RenderError> {
        Ok(notation_node(notation, &self.options).to_string())
    }
}

/// JSON dump of the document tree
#[derive(Debug, Clone, Default)]
pub struct DoctreeJsonRenderer {
    options: DoctreeOptions,
}

impl DoctreeJsonRenderer {
    pub fn new(options: DoctreeOptions) -> Self {
        DoctreeJsonRenderer { options }
    }
}

impl Renderer for DoctreeJsonRenderer {
    fn name(&self) -> &str {
        "doctree-json"
    }

    fn description(&self) -> &str {
        "Document tree as JSON"
    }

    fn render(&self, notation: &Notation) -> Result<String, RenderError> {
        serde_json::to_string_pretty(&notation_node(notation, &self.options))
            .map_err(|e| RenderError::Serialization(e.to_string()))
    }
}
