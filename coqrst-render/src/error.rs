//! Error types for notation rendering

use coqrst_notation::NotationError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Notation(#[from] NotationError),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("invalid regular expression: {0}")]
    Regex(#[from] regex::Error),

    #[error("renderer not found: {0}")]
    RendererNotFound(String),
}
