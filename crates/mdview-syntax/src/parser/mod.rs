//! # Parser - Streaming Block Dispatch
//!
//! The parser reads the source once, front to back, and emits tokens as
//! soon as a line is complete. There is no intermediate tree: block
//! structure is reported with start/end tokens and inline structure with
//! styled spans.
//!
//! ## Lookahead
//!
//! Markdown needs to peek at the start of the next line before it knows
//! whether the current block continues. Instead of buffering lines, the
//! parser reads ahead directly from the seekable source and seeks back when
//! the guess was wrong (see [`SourceCursor`]).
//!
//! ## Module Structure
//!
//! - [`delim`] - Block delimiter classifier (what does the next line open?)
//! - `accumulator` - Line buffer, soft wrapping and token emission
//! - `grammar` - Block parsers and the shared inline text routine

pub mod delim;

mod accumulator;
mod grammar;

use std::io::{Read, Seek};

use crate::cursor::SourceCursor;
use crate::error::{ParseError, Result};
use crate::options::ParseOptions;
use crate::token::TokenSink;
use accumulator::LineAccumulator;

/// Streaming parser over a seekable source, emitting to a [`TokenSink`].
///
/// Owns the source for its lifetime. [`parse`](Self::parse) always starts
/// from the beginning of the source, so a parser can be run again and
/// produces the same tokens.
pub struct Parser<R, S> {
    cursor: SourceCursor<R>,
    out: LineAccumulator<S>,
}

impl<R: Read + Seek, S: TokenSink> Parser<R, S> {
    pub fn new(source: R, options: ParseOptions, sink: S) -> Self {
        Self {
            cursor: SourceCursor::new(source),
            out: LineAccumulator::new(sink, options),
        }
    }

    /// Parses the whole source.
    ///
    /// On error, tokens already delivered to the sink stay delivered.
    pub fn parse(&mut self) -> Result<()> {
        if self.out.options().width == 0 {
            return Err(ParseError::InvalidWidth);
        }
        self.cursor.rewind()?;
        self.out.reset();
        grammar::document(self)
    }

    /// Number of display lines produced by the last parse.
    pub fn lines(&self) -> usize {
        self.out.lines()
    }

    /// Releases the sink, e.g. to take back collected tokens.
    pub fn into_sink(self) -> S {
        self.out.into_sink()
    }

    /// Releases the source.
    pub fn into_source(self) -> R {
        self.cursor.into_inner()
    }
}
