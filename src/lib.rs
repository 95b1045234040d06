//! # coqrst
//!
//! Documentation tooling for Coq: everything a documentation build needs around
//! Coq-specific markup.
//!
//! - notations: [coqrst_notation] parses the tactic-notation mini-language and
//!   [coqrst_render] turns it into HTML, a document tree, plain text or a regexp
//! - [coqdoc]: syntax highlighting of Coq sentences through the external `coqdoc` tool
//! - [coqtop]: a driver for interactive `coqtop` sessions, plus the logic that turns
//!   a block of sentences into a transcript
//! - [domain]: the registry of documented Coq objects (commands, tactics, options, ...)
//!   with cross-reference resolution
//!
//! Defaults for the external tools come from [coqrst_config].

pub mod coqdoc;
pub mod coqtop;
pub mod domain;
mod process;

pub use coqrst_config as config;
pub use coqrst_notation as notation;
pub use coqrst_render as render;

pub use coqdoc::{Coqdoc, HighlightError, HighlightToken, Highlighter};
pub use coqtop::{CoqtopSession, Repl, SessionError, SessionSettings};
pub use domain::{ObjectStore, ObjectType, Subdomain};
