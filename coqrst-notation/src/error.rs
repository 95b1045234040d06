//! Error types for notation lexing and parsing

use std::ops::Range;
use thiserror::Error;

/// A character sequence that no token rule accepts (e.g. a lone `@`).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized input {text:?} at byte {}", span.start)]
pub struct LexError {
    pub span: Range<usize>,
    pub text: String,
}

/// A token sequence the grammar rejects, such as unbalanced braces.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at byte {}", span.start)]
pub struct ParseError {
    pub span: Range<usize>,
    pub message: String,
}

/// Any failure turning a notation string into an AST.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    #[error("lexing error: {0}")]
    Lex(#[from] LexError),
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
}

impl NotationError {
    /// Byte range of the offending input, relative to the substituted notation.
    pub fn span(&self) -> Range<usize> {
        match self {
            NotationError::Lex(err) => err.span.clone(),
            NotationError::Parse(err) => err.span.clone(),
        }
    }
}
