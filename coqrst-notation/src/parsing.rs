//! Notation parser
//!
//!     The grammar is small enough to read in one go:
//!
//!         top        := sequence EOF
//!         sequence   := item*
//!         item       := atomic | hole | whitespace | curlies | repeat
//!         curlies    := '{' sequence '}'
//!         repeat     := OPEN_REPEAT [ATOM] [WHITESPACE] sequence '}'
//!
//!     Every token selects its production, so the chumsky parser never backtracks past a
//!     single token. The atom right after a repetition opener is the separator
//!     (`{+, @term}`); whitespace just inside a repetition group is layout and does not
//!     become part of the repeated unit, while whitespace inside curly groups is kept.
//!
//!     The parser consumes the logos token stream with its byte ranges, so errors carry
//!     the offset of the offending token in the (substituted) notation.

use crate::ast::{Node, Notation};
use crate::error::{NotationError, ParseError};
use crate::lexing::{tokenize, Token};
use crate::substitution::substitute;
use chumsky::error::SimpleReason;
use chumsky::prelude::*;
use chumsky::Stream;
use std::ops::Range;

/// Type alias for parser error
type ParserError = Simple<Token>;

fn unexpected(span: Range<usize>, found: Token) -> ParserError {
    Simple::expected_input_found(span, None, Some(found))
}

/// Atoms, holes and whitespace
fn leaf() -> impl Parser<Token, Node, Error = ParserError> + Clone {
    filter_map(|span, token| match token {
        Token::Atom(text) => Ok(Node::Atomic { text }),
        Token::Hole(name) => Ok(Node::Hole { name }),
        Token::Whitespace => Ok(Node::Whitespace),
        other => Err(unexpected(span, other)),
    })
}

fn separator() -> impl Parser<Token, String, Error = ParserError> + Clone {
    filter_map(|span, token| match token {
        Token::Atom(text) => Ok(text),
        other => Err(unexpected(span, other)),
    })
}

fn repeat_opener() -> impl Parser<Token, crate::ast::RepeatKind, Error = ParserError> + Clone {
    filter_map(|span, token| match token {
        Token::OpenRepeat(kind) => Ok(kind),
        other => Err(unexpected(span, other)),
    })
}

fn without_trailing_whitespace(mut children: Vec<Node>) -> Vec<Node> {
    if matches!(children.last(), Some(Node::Whitespace)) {
        children.pop();
    }
    children
}

fn notation() -> impl Parser<Token, Vec<Node>, Error = ParserError> {
    let sequence = recursive(|sequence| {
        let curlies = sequence
            .clone()
            .delimited_by(just(Token::OpenCurly), just(Token::Close))
            .map(|children| Node::Curlies { children });

        let repeat = repeat_opener()
            .then(separator().or_not())
            .then_ignore(just(Token::Whitespace).or_not())
            .then(sequence)
            .then_ignore(just(Token::Close))
            .map(|((repeat, separator), children)| Node::Repeat {
                repeat,
                separator,
                children: without_trailing_whitespace(children),
            });

        choice((leaf(), curlies, repeat)).repeated()
    });

    sequence.then_ignore(end())
}

fn describe(err: &ParserError) -> String {
    match err.reason() {
        SimpleReason::Unclosed { delimiter, .. } => format!("unclosed {}", delimiter),
        SimpleReason::Custom(message) => message.clone(),
        SimpleReason::Unexpected => match err.found() {
            Some(token) => format!("unexpected {}", token),
            None => "unexpected end of notation".to_string(),
        },
    }
}

/// Parse an already-tokenized notation.
///
/// `source_len` is the length of the tokenized text, used to locate errors at the end
/// of input.
pub fn parse_tokens(
    tokens: Vec<(Token, Range<usize>)>,
    source_len: usize,
) -> Result<Notation, ParseError> {
    let stream = Stream::from_iter(source_len..source_len, tokens.into_iter());
    notation()
        .parse(stream)
        .map(Notation::new)
        .map_err(|errors| {
            errors
                .iter()
                .min_by_key(|err| err.span().start)
                .map(|err| ParseError {
                    span: err.span(),
                    message: describe(err),
                })
                .unwrap_or(ParseError {
                    span: source_len..source_len,
                    message: "invalid notation".to_string(),
                })
        })
}

/// Tokenize and parse `source` as is, without abbreviation expansion.
pub fn parse(source: &str) -> Result<Notation, NotationError> {
    let tokens = tokenize(source)?;
    Ok(parse_tokens(tokens, source.len())?)
}

/// Full pipeline: substitution, lexing, parsing.
pub fn parse_notation(notation: &str) -> Result<Notation, NotationError> {
    tracing::trace!(notation, "parsing notation");
    let substituted = substitute(notation);
    parse(&substituted).inspect_err(|err| {
        tracing::debug!(notation, error = %err, "notation rejected");
    })
}
