//! Renderer implementations
//!
//! Each submodule walks the notation AST with its own visitor and exposes the result
//! through a [Renderer](crate::Renderer).

pub mod doctree;
pub mod ellipsis;
pub mod html;
pub mod regexp;

pub use doctree::{DoctreeJsonRenderer, DoctreeRenderer};
pub use ellipsis::EllipsisRenderer;
pub use html::HtmlRenderer;
pub use regexp::RegexpRenderer;
