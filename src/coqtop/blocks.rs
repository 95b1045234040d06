//! Running blocks of Coq sentences through a [Repl]
//!
//! A block is a piece of Coq source plus a set of display options (`in`, `out`, `all`,
//! `none`, `reset`, `undo`). Running it sends each sentence in turn, optionally
//! resetting the prover first or undoing the block afterwards, and keeps every
//! sentence with its response. The transcript then shows inputs, outputs, both, or
//! neither, depending on the options.

use super::session::{Repl, SessionError};
use once_cell::sync::Lazy;
use regex::Regex;
use std::borrow::Cow;
use std::collections::BTreeSet;
use thiserror::Error;

static ANSI_COLOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"\x1b\[[^m]+m").unwrap());

const KNOWN_OPTIONS: &[&str] = &["reset", "undo", "all", "none", "in", "out"];

/// Options of a block that names none.
pub const DEFAULT_OPTIONS: &[&str] = &["in"];

/// CSS class for transcript parts that should not be displayed.
pub const HIDDEN_CLASS: &str = "coqtop-hidden";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockOptionsError {
    #[error("unexpected options for coqtop block: {}", .0.join(", "))]
    Unexpected(Vec<String>),

    #[error("inconsistent options for coqtop block: ‘none’ with ‘in’, ‘out’, or ‘all’")]
    NoneWithShown,

    #[error("inconsistent options for coqtop block: ‘undo’ with ‘reset’")]
    UndoWithReset,
}

/// What to do around a block, and what to show of it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BlockOptions {
    /// Undo the block's sentences afterwards
    pub undo: bool,
    /// Reset the prover before the block
    pub reset: bool,
    pub show_input: bool,
    pub show_output: bool,
}

impl BlockOptions {
    pub fn parse<I, S>(options: I) -> Result<Self, BlockOptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let options: BTreeSet<String> = options
            .into_iter()
            .map(|o| o.as_ref().to_string())
            .collect();
        let has = |name: &str| options.contains(name);

        let unexpected: Vec<String> = options
            .iter()
            .filter(|o| !KNOWN_OPTIONS.contains(&o.as_str()))
            .cloned()
            .collect();
        if !unexpected.is_empty() {
            return Err(BlockOptionsError::Unexpected(unexpected));
        }

        let all = has("all");
        let show_input = all || has("in");
        let show_output = all || has("out");
        if has("none") && (show_input || show_output) {
            return Err(BlockOptionsError::NoneWithShown);
        }
        if has("reset") && has("undo") {
            return Err(BlockOptionsError::UndoWithReset);
        }

        Ok(BlockOptions {
            undo: has("undo"),
            reset: has("reset"),
            show_input,
            show_output,
        })
    }

    /// Like [BlockOptions::parse], with [DEFAULT_OPTIONS] standing in for an empty list.
    pub fn parse_or_default<I, S>(options: I) -> Result<Self, BlockOptionsError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let options: Vec<S> = options.into_iter().collect();
        if options.is_empty() {
            Self::parse(DEFAULT_OPTIONS)
        } else {
            Self::parse(options)
        }
    }
}

/// A sentence and coqtop's response to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exchange {
    pub sentence: String,
    pub response: String,
}

/// Split Coq source into sentences.
///
/// Splits at runs of whitespace that follow a `.`, unless that `.` ends an ellipsis
/// (`..`). Empty pieces are dropped.
pub fn split_sentences(source: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut before: [Option<char>; 2] = [None, None];
    let mut chars = source.char_indices().peekable();

    while let Some((index, c)) = chars.next() {
        let boundary = c.is_whitespace() && before[1] == Some('.') && before[0] != Some('.');
        if boundary {
            sentences.push(&source[start..index]);
            start = index + c.len_utf8();
            while let Some(&(next, d)) = chars.peek() {
                if !d.is_whitespace() {
                    break;
                }
                start = next + d.len_utf8();
                chars.next();
            }
        }
        before = [before[1], Some(c)];
    }
    sentences.push(&source[start..]);

    sentences.retain(|s| !s.is_empty());
    sentences
}

/// Remove ANSI colour sequences.
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    ANSI_COLOR.replace_all(text, "")
}

/// CSS classes for a transcript part; hidden when not shown or when blank.
pub fn block_classes(should_show: bool, contents: Option<&str>) -> Vec<&'static str> {
    let is_empty = contents.is_some_and(|c| c.trim().is_empty());
    if is_empty || !should_show {
        vec![HIDDEN_CLASS]
    } else {
        vec![]
    }
}

/// Plain-text transcript of a block.
///
/// Inputs are listed when shown; outputs are listed (colour stripped, followed by a
/// blank line) when shown and not empty.
pub fn make_rawsource(exchanges: &[Exchange], options: &BlockOptions) -> String {
    let mut blocks = Vec::new();
    for exchange in exchanges {
        let output = strip_ansi(&exchange.response);
        let output = output.trim();
        if options.show_input {
            blocks.push(exchange.sentence.clone());
        }
        if options.show_output && !output.is_empty() {
            blocks.push(format!("{}\n", output));
        }
    }
    blocks.join("\n")
}

/// Run a block against `repl`.
///
/// With `reset`, `Reset Initial.` is sent first; with `undo`, the block's sentences are
/// undone afterwards. Neither of those responses is part of the result.
pub fn run_block<R: Repl + ?Sized>(
    repl: &mut R,
    source: &str,
    options: &BlockOptions,
) -> Result<Vec<Exchange>, SessionError> {
    if options.reset {
        repl.sendone("Reset Initial.")?;
    }

    let mut exchanges = Vec::new();
    for sentence in split_sentences(source) {
        let response = repl.sendone(sentence)?;
        exchanges.push(Exchange {
            sentence: sentence.to_string(),
            response,
        });
    }

    if options.undo {
        repl.sendone(&format!("Undo {}.", exchanges.len()))?;
    }

    tracing::debug!(sentences = exchanges.len(), "ran coqtop block");
    Ok(exchanges)
}
