//! # coqrst-notation
//!
//! Parser for Coq tactic notations, the small EBNF-like language used to document
//! tactics and commands:
//!
//!     apply {+, @term with {+ (@id := @val) } } in {+, @hyp }
//!
//! Pipeline
//!
//!     The raw notation goes through four stages, each in its own module:
//!
//!         1. [substitution]: expands the fixed abbreviations (`@bindings_list`, ...).
//!         2. [lexing]: logos tokenizer producing tokens with their byte ranges.
//!         3. [parsing]: chumsky grammar building the AST from the token stream.
//!         4. [ast]: the tree itself, plus the [Visitor](ast::Visitor) trait that
//!            renderers implement.
//!
//!     [parse_notation] runs the whole pipeline. The resulting [Notation] is
//!     immutable and can be handed to any number of renderers.
//!
//! Errors
//!
//!     Lexing and parsing failures are fatal for the notation being processed and
//!     are reported through [NotationError], which carries the byte offset of the
//!     offending input.

pub mod ast;
pub mod error;
pub mod lexing;
pub mod parsing;
pub mod substitution;

pub use ast::{Node, Notation, RepeatKind, Visitor};
pub use error::{LexError, NotationError, ParseError};
pub use parsing::parse_notation;
