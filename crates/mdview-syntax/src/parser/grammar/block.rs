//! Block-level grammar rules.
//!
//! Every parser emits `BlockStart`, its content, then `BlockEnd`, also when
//! the input ends inside the block.

use std::io::{Read, Seek};

use crate::error::Result;
use crate::parser::Parser;
use crate::parser::delim::{DelimInfo, DelimKind, block_delim};
use crate::token::{BlockKind, TokenSink};

use super::inline::{self, TextEnd};

/// Parse a heading. The marker has been consumed; the text runs to the end
/// of the line.
pub(super) fn heading<R: Read + Seek, S: TokenSink>(p: &mut Parser<R, S>) -> Result<()> {
    p.out.block_start(BlockKind::Heading)?;
    inline::text(p, BlockKind::Heading, TextEnd::Line)?;
    p.out.block_end(BlockKind::Heading)
}

/// Parse a paragraph, up to a blank line or the start of another block.
pub(super) fn paragraph<R: Read + Seek, S: TokenSink>(p: &mut Parser<R, S>) -> Result<()> {
    p.out.block_start(BlockKind::Paragraph)?;
    inline::skip_blank_lines(&mut p.cursor)?;
    inline::text(p, BlockKind::Paragraph, TextEnd::Block)?;
    p.out.block_end(BlockKind::Paragraph)
}

/// Ordered lists are recognized but not rendered: the `1. ` marker is
/// dropped and the item text is left for the next block.
pub(super) fn ordered_list<R: Read + Seek, S: TokenSink>(_p: &mut Parser<R, S>) -> Result<()> {
    log::debug!("ordered lists are not supported, marker skipped");
    Ok(())
}

/// Parse consecutive `- ` items into one list.
pub(super) fn unordered_list<R: Read + Seek, S: TokenSink>(p: &mut Parser<R, S>) -> Result<()> {
    p.out.block_start(BlockKind::UnorderedList)?;

    loop {
        p.out.block_start(BlockKind::ListItem)?;
        inline::text(p, BlockKind::ListItem, TextEnd::Block)?;
        p.out.block_end(BlockKind::ListItem)?;

        match block_delim(&mut p.cursor)? {
            Some(delim) if delim.kind == DelimKind::UnorderedList => continue,
            Some(mut delim) => {
                let consumed = delim.consumed;
                p.cursor.unread(consumed, &mut delim.consumed)?;
                break;
            }
            None => break,
        }
    }

    p.out.block_end(BlockKind::UnorderedList)
}

/// Parse a fenced or indented code block opened by `open`.
///
/// Content is raw: no inline styles, tabs expand to 4 spaces, and lines
/// longer than the width are cut.
pub(super) fn code<R: Read + Seek, S: TokenSink>(
    p: &mut Parser<R, S>,
    open: &DelimInfo,
) -> Result<()> {
    p.out.block_start(BlockKind::Code)?;
    p.out.begin(BlockKind::Code, true);

    // A fence may be closed right on the next line.
    let fenced = open.ch != b' ';
    let closed = fenced && next_line(p, open, false)? == CodeLine::Close;

    if !closed {
        loop {
            let mut count = 0;
            let Some(ch) = p.cursor.read_char(&mut count)? else {
                break;
            };

            if ch == b'\n' {
                if next_line(p, open, true)? == CodeLine::Close {
                    break;
                }
                continue;
            }

            if ch == b'\t' {
                for _ in 0..4 {
                    p.out.write(b' ')?;
                }
            } else {
                p.out.write(ch)?;
            }
        }
    }

    p.out.finish_code()?;
    p.out.block_end(BlockKind::Code)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeLine {
    Continue,
    Close,
}

/// Decides at a line start whether the code block goes on.
///
/// `after_newline` is set when a content line has just ended; that line is
/// then flushed here unless the block closes right after it. Blank lines
/// the classifier skipped are re-emitted as empty code lines.
fn next_line<R: Read + Seek, S: TokenSink>(
    p: &mut Parser<R, S>,
    open: &DelimInfo,
    after_newline: bool,
) -> Result<CodeLine> {
    let Some(mut delim) = block_delim(&mut p.cursor)? else {
        return Ok(CodeLine::Close);
    };
    let fenced = open.ch != b' ';

    if fenced && delim.closes_fence(open) {
        let blank = if after_newline {
            delim.skipped_lines
        } else {
            delim.skipped_lines.saturating_sub(1)
        };
        for _ in 0..blank {
            p.out.end_line()?;
        }
        return Ok(CodeLine::Close);
    }

    if fenced {
        // Anything inside a fence is content, indentation included.
        let consumed = delim.consumed;
        p.cursor.unread(consumed, &mut delim.consumed)?;
        if after_newline {
            p.out.end_line()?;
        }
        return Ok(CodeLine::Continue);
    }

    if delim.kind == DelimKind::Code && delim.ch == b' ' {
        // The indent stays consumed.
        p.out.end_line()?;
        for _ in 0..delim.skipped_lines {
            p.out.end_line()?;
        }
        return Ok(CodeLine::Continue);
    }

    let consumed = delim.consumed;
    p.cursor.unread(consumed, &mut delim.consumed)?;
    Ok(CodeLine::Close)
}
