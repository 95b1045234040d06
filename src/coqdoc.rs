//! Highlighting Coq sentences with coqdoc
//!
//!     coqdoc knows Coq's lexical structure far better than a generic highlighter, so
//!     sentences are handed to it and its HTML is read back into a token stream:
//!
//!         source → temp .v file → coqdoc --html → html5ever DOM → [HighlightToken]
//!
//!     Only full, syntactically valid sentences come out intact; on shorter snippets
//!     coqdoc may drop parts of the input.
//!
//!     The file starts with `(** remove printing … *)` directives so that coqdoc keeps
//!     ASCII operators as typed instead of substituting symbols.

use crate::process::wait_with_timeout;
use coqrst_config::CoqdocConfig;
use html5ever::tendril::TendrilSink;
use html5ever::{parse_document, ParseOpts};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::Duration;
use thiserror::Error;

pub const COQDOC_OPTIONS: &[&str] = &[
    "--body-only",
    "--no-glob",
    "--no-index",
    "--no-externals",
    "-s",
    "--html",
    "--stdout",
    "--utf8",
];

pub const COQDOC_SYMBOLS: &[&str] = &[
    "->", "<-", "<->", "=>", "<=", ">=", "<>", "~", "/\\", "\\/", "|-", "*",
];

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("coqdoc binary {binary:?} not found: {reason}")]
    NotFound { binary: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("coqdoc did not finish within {0:?}")]
    Timeout(Duration),

    #[error("coqdoc failed ({status}): {stderr}")]
    Failed { status: String, stderr: String },

    #[error("coqdoc output is not valid UTF-8")]
    InvalidOutput,

    #[error("no code region in coqdoc output")]
    MissingCode,

    #[error("unexpected <{0}> element in coqdoc output")]
    UnexpectedElement(String),
}

/// One highlighted chunk of source: CSS classes plus the text they apply to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightToken {
    pub classes: Vec<String>,
    pub text: String,
}

impl HighlightToken {
    pub fn plain(text: impl Into<String>) -> Self {
        HighlightToken {
            classes: Vec::new(),
            text: text.into(),
        }
    }

    pub fn classed(class: impl Into<String>, text: impl Into<String>) -> Self {
        HighlightToken {
            classes: vec![class.into()],
            text: text.into(),
        }
    }
}

/// Something that splits Coq source into highlighted tokens.
pub trait Highlighter {
    fn highlight(&self, source: &str) -> Result<Vec<HighlightToken>, HighlightError>;
}

/// The header prepended to every snippet.
pub fn coqdoc_header() -> String {
    COQDOC_SYMBOLS
        .iter()
        .map(|symbol| format!("(** remove printing {} *)", symbol))
        .collect()
}

/// Highlighter backed by the `coqdoc` executable.
#[derive(Debug, Clone)]
pub struct Coqdoc {
    binary: String,
    timeout: Duration,
}

impl Default for Coqdoc {
    fn default() -> Self {
        Coqdoc::new("coqdoc")
    }
}

impl Coqdoc {
    pub fn new(binary: impl Into<String>) -> Self {
        Coqdoc {
            binary: binary.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn from_config(config: &CoqdocConfig) -> Self {
        Coqdoc::new(config.binary.clone()).with_timeout(config.timeout())
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn locate(&self) -> Result<PathBuf, HighlightError> {
        which::which(&self.binary).map_err(|e| HighlightError::NotFound {
            binary: self.binary.clone(),
            reason: e.to_string(),
        })
    }

    /// Raw coqdoc HTML for `source`.
    pub fn run(&self, source: &str) -> Result<String, HighlightError> {
        let binary = self.locate()?;

        let mut file = tempfile::Builder::new()
            .prefix("coqdoc-")
            .suffix(".v")
            .tempfile()?;
        file.write_all(coqdoc_header().as_bytes())?;
        file.write_all(source.as_bytes())?;
        file.flush()?;

        tracing::debug!(
            binary = %binary.display(),
            file = %file.path().display(),
            "running coqdoc"
        );

        let child = Command::new(&binary)
            .args(COQDOC_OPTIONS)
            .arg(file.path())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let output =
            wait_with_timeout(child, self.timeout)?.ok_or(HighlightError::Timeout(self.timeout))?;

        if !output.status.success() {
            return Err(HighlightError::Failed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| HighlightError::InvalidOutput)
    }
}

impl Highlighter for Coqdoc {
    fn highlight(&self, source: &str) -> Result<Vec<HighlightToken>, HighlightError> {
        lex_coqdoc_html(&self.run(source)?)
    }
}

fn element_name(handle: &Handle) -> Option<&str> {
    match &handle.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

fn attribute(handle: &Handle, attr: &str) -> Option<String> {
    match &handle.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == attr)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

fn has_class(handle: &Handle, class: &str) -> bool {
    attribute(handle, "class")
        .map(|classes| classes.split_whitespace().any(|c| c == class))
        .unwrap_or(false)
}

fn find_by_class(handle: &Handle, class: &str) -> Option<Handle> {
    if has_class(handle, class) {
        return Some(handle.clone());
    }
    handle
        .children
        .borrow()
        .iter()
        .find_map(|child| find_by_class(child, class))
}

fn text_content(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        _ => {
            for child in handle.children.borrow().iter() {
                text_content(child, out);
            }
        }
    }
}

fn is_blank_text(handle: &Handle) -> bool {
    match &handle.data {
        NodeData::Text { contents } => contents.borrow().trim().is_empty(),
        _ => false,
    }
}

/// Read coqdoc's HTML output back into tokens.
///
/// Tokens come from the children of the `.code` element, with blank text stripped at
/// both ends: text is unclassed, a `<span>` gets `coqdoc-TYPE` from its `type` (or
/// `title`) attribute, and `<br>` is dropped.
pub fn lex_coqdoc_html(html: &str) -> Result<Vec<HighlightToken>, HighlightError> {
    let dom = parse_document(RcDom::default(), ParseOpts::default()).one(html);
    let code = find_by_class(&dom.document, "code").ok_or(HighlightError::MissingCode)?;

    let children = code.children.borrow();
    let start = children
        .iter()
        .position(|c| !is_blank_text(c))
        .unwrap_or(children.len());
    let end = children
        .iter()
        .rposition(|c| !is_blank_text(c))
        .map_or(start, |i| i + 1);

    let mut tokens = Vec::new();
    for child in &children[start..end] {
        match &child.data {
            NodeData::Text { contents } => {
                tokens.push(HighlightToken::plain(contents.borrow().to_string()))
            }
            NodeData::Element { .. } => match element_name(child) {
                Some("span") => {
                    let kind = attribute(child, "type")
                        .or_else(|| attribute(child, "title"))
                        .unwrap_or_default();
                    let mut text = String::new();
                    text_content(child, &mut text);
                    tokens.push(HighlightToken::classed(format!("coqdoc-{}", kind), text));
                }
                Some("br") => {}
                other => {
                    return Err(HighlightError::UnexpectedElement(
                        other.unwrap_or_default().to_string(),
                    ))
                }
            },
            _ => {}
        }
    }

    tracing::trace!(count = tokens.len(), "lexed coqdoc output");
    Ok(tokens)
}
