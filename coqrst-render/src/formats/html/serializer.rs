//! Notation AST → RcDom → HTML string

use super::HtmlOptions;
use crate::error::RenderError;
use coqrst_notation::{parse_notation, Node as NotationNode, Notation, RepeatKind, Visitor};
use html5ever::{
    ns, serialize, serialize::SerializeOpts, serialize::TraversalScope, Attribute, LocalName,
    QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Build the `<span class="notation">` tree for a parsed notation.
pub fn htmlize(notation: &Notation, options: &HtmlOptions) -> Handle {
    let root = create_element("span", vec![("class", "notation")]);
    let mut builder = DomBuilder {
        parent: root.clone(),
        options,
    };
    builder.visit_top(notation);
    root
}

/// Parse `source` (with abbreviation expansion) and serialize its HTML rendering.
pub fn htmlize_str(source: &str, options: &HtmlOptions) -> Result<String, RenderError> {
    let notation = parse_notation(source)?;
    serialize_node(&htmlize(&notation, options))
}

/// Serialize an element and its subtree to an HTML string.
pub fn serialize_node(handle: &Handle) -> Result<String, RenderError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    let serializable = SerializableHandle::from(handle.clone());
    serialize(&mut output, &serializable, opts).map_err(|e| {
        RenderError::Serialization(format!("HTML serialization failed: {}", e))
    })?;

    String::from_utf8(output)
        .map_err(|e| RenderError::Serialization(format!("Invalid UTF-8 in output: {}", e)))
}

struct DomBuilder<'o> {
    parent: Handle,
    options: &'o HtmlOptions,
}

impl DomBuilder<'_> {
    fn append(&self, child: Handle) {
        self.parent.children.borrow_mut().push(child);
    }

    /// Run `f` with `parent` as the insertion point, then restore the previous one.
    fn within(&mut self, parent: Handle, f: impl FnOnce(&mut Self)) {
        let previous = std::mem::replace(&mut self.parent, parent);
        f(self);
        self.parent = previous;
    }

    fn marker(&self, tag: &str, text: &str, hint: Option<String>, placement: &str) -> Handle {
        let element = match hint {
            Some(hint) if self.options.hints => {
                let class = format!("hint--{} hint--rounded", placement);
                create_element(tag, vec![("class", &class), ("data-hint", &hint)])
            }
            _ => create_element(tag, vec![]),
        };
        element.children.borrow_mut().push(create_text(text));
        element
    }
}

fn repeat_hint(repeat: RepeatKind) -> String {
    match repeat {
        RepeatKind::Optional => "This block is optional.",
        RepeatKind::ZeroOrMore => "This block is optional, and may be repeated.",
        RepeatKind::OneOrMore => "This block may be repeated.",
    }
    .to_string()
}

impl Visitor for DomBuilder<'_> {
    fn visit_atomic(&mut self, text: &str) {
        let span = create_element("span", vec![]);
        span.children.borrow_mut().push(create_text(text));
        self.append(span);
    }

    fn visit_hole(&mut self, name: &str) {
        let span = create_element("span", vec![("class", "hole")]);
        span.children.borrow_mut().push(create_text(name));
        self.append(span);
    }

    fn visit_whitespace(&mut self) {
        self.append(create_text(" "));
    }

    fn visit_curlies(&mut self, children: &[NotationNode]) {
        let span = create_element("span", vec![("class", "curlies")]);
        span.children.borrow_mut().push(create_text("{"));
        self.within(span.clone(), |builder| builder.visit_children(children));
        span.children.borrow_mut().push(create_text("}"));
        self.append(span);
    }

    fn visit_repeat(
        &mut self,
        repeat: RepeatKind,
        separator: Option<&str>,
        children: &[NotationNode],
    ) {
        let wrapper = create_element("span", vec![("class", "repeat-wrapper")]);
        let body = create_element("span", vec![("class", "repeat")]);
        self.within(body.clone(), |builder| builder.visit_children(children));
        wrapper.children.borrow_mut().push(body);

        let kind = repeat.marker().to_string();
        let sup = self.marker("sup", &kind, Some(repeat_hint(repeat)), "top");
        wrapper.children.borrow_mut().push(sup);

        if let Some(separator) = separator {
            let hint = format!("Use “{}” to separate repetitions of this block.", separator);
            let sub = self.marker("sub", separator, Some(hint), "bottom");
            wrapper.children.borrow_mut().push(sub);
        }

        self.append(wrapper);
    }
}

/// Create an HTML element with attributes
pub(crate) fn create_element(tag: &str, attrs: Vec<(&str, &str)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.to_string().into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub(crate) fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}
