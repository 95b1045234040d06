//! Notation lexer
//!
//!     Tokenization is handled entirely by logos. Each token is paired with the byte range
//!     of its source text; the ranges are contiguous and cover the whole input, which is
//!     what lets parse errors point back at the notation.
//!
//!     Atoms are maximal runs of anything that is not a hole sigil, a brace or blank, so
//!     `(@id := @val)` lexes as `(`, `@id`, ` `, `:=`, ` `, `@val`, `)`. A repetition
//!     opener carries its kind (`{?`, `{+`, `{*`); a plain `{` opens a curly group; both
//!     are closed by `}`.

use crate::ast::RepeatKind;
use crate::error::LexError;
use logos::Logos;
use std::fmt;
use std::ops::Range;

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Token {
    #[regex(r"\{[?+*]", |lex| lex.slice().chars().nth(1).and_then(RepeatKind::from_marker))]
    OpenRepeat(RepeatKind),

    #[token("{")]
    OpenCurly,

    #[token("}")]
    Close,

    #[regex(r"@[A-Za-z0-9_]+", |lex| lex.slice()[1..].to_string())]
    Hole(String),

    #[regex(r"[ \t]+")]
    Whitespace,

    #[regex(r"[^@{} \t]+", |lex| lex.slice().to_string())]
    Atom(String),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::OpenRepeat(kind) => write!(f, "'{{{}'", kind.marker()),
            Token::OpenCurly => write!(f, "'{{'"),
            Token::Close => write!(f, "'}}'"),
            Token::Hole(name) => write!(f, "hole '@{}'", name),
            Token::Whitespace => write!(f, "whitespace"),
            Token::Atom(text) => write!(f, "atom '{}'", text),
        }
    }
}

/// Tokenize a (substituted) notation, keeping the byte range of every token.
///
/// Fails on the first character sequence no rule accepts.
pub fn tokenize(source: &str) -> Result<Vec<(Token, Range<usize>)>, LexError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(LexError {
                    span: lexer.span(),
                    text: lexer.slice().to_string(),
                })
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<Token> {
        tokenize(source)
            .expect("tokenize failed")
            .into_iter()
            .map(|(t, _)| t)
            .collect()
    }

    #[test]
    fn test_atoms_and_whitespace() {
        assert_eq!(
            kinds("a b"),
            vec![
                Token::Atom("a".to_string()),
                Token::Whitespace,
                Token::Atom("b".to_string())
            ]
        );
    }

    #[test]
    fn test_whitespace_run_is_one_token() {
        assert_eq!(
            tokenize("a \t  b").unwrap(),
            vec![
                (Token::Atom("a".to_string()), 0..1),
                (Token::Whitespace, 1..5),
                (Token::Atom("b".to_string()), 5..6),
            ]
        );
    }

    #[test]
    fn test_repeat_openers() {
        assert_eq!(
            kinds("{?{+{*{}"),
            vec![
                Token::OpenRepeat(RepeatKind::Optional),
                Token::OpenRepeat(RepeatKind::OneOrMore),
                Token::OpenRepeat(RepeatKind::ZeroOrMore),
                Token::OpenCurly,
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_separator_atom_after_opener() {
        assert_eq!(
            kinds("{+, @term}"),
            vec![
                Token::OpenRepeat(RepeatKind::OneOrMore),
                Token::Atom(",".to_string()),
                Token::Whitespace,
                Token::Hole("term".to_string()),
                Token::Close,
            ]
        );
    }

    #[test]
    fn test_hole_stops_at_punctuation() {
        assert_eq!(
            kinds("(@id:=@val)"),
            vec![
                Token::Atom("(".to_string()),
                Token::Hole("id".to_string()),
                Token::Atom(":=".to_string()),
                Token::Hole("val".to_string()),
                Token::Atom(")".to_string()),
            ]
        );
    }

    #[test]
    fn test_lone_sigil_is_an_error() {
        let err = tokenize("rewrite @ H").unwrap_err();
        assert_eq!(err.span, 8..9);
        assert_eq!(err.text, "@");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize("").unwrap(), vec![]);
    }
}
