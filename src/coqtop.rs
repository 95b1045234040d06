//! Interactive coqtop sessions
//!
//!     [session] owns the child process and speaks its prompt protocol: one sentence
//!     in, everything printed before the next prompt out. [blocks] builds on any [Repl]
//!     to run a whole block of sentences and turn the exchange into a transcript.

pub mod blocks;
pub mod session;

pub use blocks::{BlockOptions, BlockOptionsError, Exchange};
pub use session::{CoqtopSession, Repl, SessionError, SessionSettings};
