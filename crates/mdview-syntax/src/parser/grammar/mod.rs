//! Grammar rules.
//!
//! - [`block`]: one parser per block kind
//! - [`inline`]: the text routine shared by headings, list items and
//!   paragraphs, and the inline style classifier

mod block;
mod inline;

use std::io::{Read, Seek};

use crate::error::Result;
use crate::parser::Parser;
use crate::parser::delim::{DelimKind, block_delim};
use crate::token::TokenSink;

/// Parses blocks until the input is exhausted.
pub(super) fn document<R: Read + Seek, S: TokenSink>(p: &mut Parser<R, S>) -> Result<()> {
    while let Some(delim) = block_delim(&mut p.cursor)? {
        log::debug!(
            "{:?} block (level {}, {} blank lines before)",
            delim.kind,
            delim.level,
            delim.skipped_lines
        );
        match delim.kind {
            DelimKind::Heading => block::heading(p)?,
            DelimKind::OrderedList => block::ordered_list(p)?,
            DelimKind::UnorderedList => block::unordered_list(p)?,
            DelimKind::Code => block::code(p, &delim)?,
            DelimKind::Paragraph => block::paragraph(p)?,
        }
    }
    Ok(())
}
