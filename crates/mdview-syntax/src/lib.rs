//! # mdview-syntax
//!
//! A streaming tokenizer for a small Markdown subset, producing display
//! lines already wrapped to a fixed width.
//!
//! ## Supported Syntax
//!
//! - headings: 1 to 6 `#` followed by a space, optional closing `#`s
//! - paragraphs, ended by a blank line or by another block
//! - unordered lists using `- `
//! - ordered lists using `1. ` are recognized, but only the text is kept
//! - code blocks: fenced with 3+ backticks or tildes, or indented 4 spaces
//! - `*emphasis*`, `**strong**`, `***both***` and `` `code` `` spans
//!
//! ## Architecture Overview
//!
//! ```text
//! Read + Seek → SourceCursor → block_delim → block parsers → LineAccumulator → TokenSink
//!               (pushback)     (classify)    (+ inline)      (wrap, spans)
//! ```
//!
//! The output is a flat stream of [`Token`]s delivered to a sink as soon as
//! each display line is complete. Nothing is retained by the parser, so
//! documents of any length are parsed in constant memory.
//!
//! ## Quick Start
//!
//! ```
//! use mdview_syntax::{BlockKind, ParseOptions, Style, Token, tokenize};
//!
//! let out = tokenize("Some *text*\n", &ParseOptions::new(40)).unwrap();
//!
//! assert_eq!(out.tokens[0], Token::BlockStart(BlockKind::Paragraph));
//! assert_eq!(out.tokens[2], Token::span(BlockKind::Paragraph, Style::EMPHASIS, "text"));
//! assert_eq!(out.lines, 1);
//! ```
//!
//! ## Wrapping
//!
//! Each block kind has an indent (see [`Indents`]); a text line of that
//! block may hold `width - indent` characters. Lines are broken at the
//! last space, never inside a word unless the word alone is too long.
//! Code lines are cut instead of wrapped.

pub mod chars;
pub mod cursor;
pub mod error;
pub mod options;
pub mod parser;
pub mod token;

use std::io::{Cursor, Read, Seek};

pub use cursor::SourceCursor;
pub use error::{ParseError, Result};
pub use options::{Indents, ParseOptions};
pub use parser::Parser;
pub use token::{BlockKind, Style, Token, TokenSink};

/// Parses `source` into `sink`, returning the number of display lines.
pub fn parse<R, S>(source: R, options: &ParseOptions, sink: S) -> Result<usize>
where
    R: Read + Seek,
    S: TokenSink,
{
    let mut parser = Parser::new(source, options.clone(), sink);
    parser.parse()?;
    Ok(parser.lines())
}

/// Tokens and line count of an in-memory document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub tokens: Vec<Token>,
    pub lines: usize,
}

/// Parses an in-memory document, collecting all tokens.
pub fn tokenize(text: &str, options: &ParseOptions) -> Result<Tokenized> {
    let mut parser = Parser::new(Cursor::new(text.as_bytes()), options.clone(), Vec::new());
    parser.parse()?;
    let lines = parser.lines();
    Ok(Tokenized {
        tokens: parser.into_sink(),
        lines,
    })
}
