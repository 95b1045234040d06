//! Renderers for Coq tactic notations
//!
//!     One parsed [Notation](coqrst_notation::Notation), several targets:
//!
//!     - [html](formats::html): nested `<span>` boxes for direct HTML output
//!     - [doctree](formats::doctree): a backend-neutral document tree with pending
//!       cross-references on holes, for documentation builders
//!     - [ellipsis](formats::ellipsis): a plain approximation for prose and object names
//!     - [regexp](formats::regexp): a regular expression matching uses of the notation
//!
//!     Each target is a [Visitor](coqrst_notation::Visitor) over the shared AST and is
//!     exposed through the [Renderer] trait, so callers can pick one by name from the
//!     [RendererRegistry]. Renderers hold only options; output is accumulated per call,
//!     so a renderer can be shared across threads.
//!
//!     [page] builds the standalone notation reference page on top of the HTML renderer.

pub mod error;
pub mod formats;
pub mod page;
pub mod registry;
pub mod renderer;

pub use error::RenderError;
pub use registry::RendererRegistry;
pub use renderer::Renderer;
