//! # Block Delimiter Classifier
//!
//! Looks at the start of the next non-blank line and decides which block it
//! opens:
//!
//! | Line start          | Kind            | Consumed                     |
//! |---------------------|-----------------|------------------------------|
//! | 4 whitespace chars  | `Code` (indent) | the 4 whitespace chars       |
//! | `#`..`######` + ` ` | `Heading`       | hashes and the space         |
//! | `1. `               | `OrderedList`   | the marker                   |
//! | `- `                | `UnorderedList` | the marker                   |
//! | 3+ `` ` `` or `~`   | `Code` (fence)  | the whole fence line         |
//! | anything else       | `Paragraph`     | nothing (fully pushed back)  |
//!
//! Blank lines and leading whitespace before the marker are skipped and
//! count towards `consumed`, so a caller that decides against the block
//! can push everything back with a single [`SourceCursor::unread`].

use std::io::{Read, Seek};

use crate::chars::{is_eol, is_white_space};
use crate::cursor::SourceCursor;
use crate::error::Result;

/// Block kinds a line can open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimKind {
    Paragraph,
    Heading,
    OrderedList,
    UnorderedList,
    Code,
}

/// A just-recognized block delimiter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DelimInfo {
    pub kind: DelimKind,
    /// Raw bytes consumed, including skipped blank lines and indentation.
    pub consumed: usize,
    /// The delimiter character: `#`, `1`, `-`, the fence character, or `' '`
    /// for indented code. For paragraphs, the first character of the line.
    pub ch: u8,
    /// Heading depth, fence run length, or indent width.
    pub level: usize,
    /// Blank lines skipped before the delimiter.
    pub skipped_lines: usize,
}

impl DelimInfo {
    /// Whether this is a fence that closes a block opened by `open`.
    pub fn closes_fence(&self, open: &DelimInfo) -> bool {
        self.kind == DelimKind::Code
            && self.ch != b' '
            && self.ch == open.ch
            && self.level >= open.level
    }
}

/// Classifies the next block.
///
/// Returns `Ok(None)` when only whitespace remains; everything read is
/// pushed back in that case.
pub fn block_delim<R: Read + Seek>(cur: &mut SourceCursor<R>) -> Result<Option<DelimInfo>> {
    let mut count = 0;
    let mut white_space = 0;
    let mut skipped_lines = 0;

    let first = loop {
        match cur.read_char(&mut count)? {
            None => {
                cur.unread(count, &mut count)?;
                return Ok(None);
            }
            Some(c) if is_eol(c) => {
                white_space = 0;
                skipped_lines += 1;
            }
            Some(c) if is_white_space(c) => {
                white_space += 1;
                // Four leading white-spaces open an indented code block.
                if white_space == 4 {
                    return Ok(Some(DelimInfo {
                        kind: DelimKind::Code,
                        consumed: count,
                        ch: b' ',
                        level: white_space,
                        skipped_lines,
                    }));
                }
            }
            Some(c) => break c,
        }
    };

    let marker = match first {
        b'#' => heading_level(cur, &mut count)?.map(|level| (DelimKind::Heading, level)),
        b'1' => expect(cur, &mut count, b". ")?.then_some((DelimKind::OrderedList, 0)),
        b'-' => expect(cur, &mut count, b" ")?.then_some((DelimKind::UnorderedList, 0)),
        b'`' | b'~' => fence_run(cur, &mut count, first)?.map(|run| (DelimKind::Code, run)),
        _ => None,
    };

    let info = match marker {
        Some((kind, level)) => DelimInfo {
            kind,
            consumed: count,
            ch: first,
            level,
            skipped_lines,
        },
        None => {
            // The paragraph parser must see the line untouched.
            cur.unread(count, &mut count)?;
            DelimInfo {
                kind: DelimKind::Paragraph,
                consumed: 0,
                ch: first,
                level: 0,
                skipped_lines,
            }
        }
    };
    Ok(Some(info))
}

/// Counts the hashes of a heading marker whose first `#` was already read.
///
/// A line ending (or the end of the input) after the hashes is left unread
/// so the heading text stops there.
fn heading_level<R: Read + Seek>(
    cur: &mut SourceCursor<R>,
    count: &mut usize,
) -> Result<Option<usize>> {
    let mut level = 1;
    loop {
        match cur.read_char(count)? {
            Some(b'#') if level < 6 => level += 1,
            Some(b'#') => return Ok(None),
            Some(b' ') | None => return Ok(Some(level)),
            Some(c) if is_eol(c) => {
                cur.unread(1, count)?;
                return Ok(Some(level));
            }
            Some(_) => return Ok(None),
        }
    }
}

/// Reads `seq` byte by byte, stopping at the first mismatch.
fn expect<R: Read + Seek>(cur: &mut SourceCursor<R>, count: &mut usize, seq: &[u8]) -> Result<bool> {
    for &want in seq {
        if cur.read_char(count)? != Some(want) {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Measures a fence run whose first character was already read, then drops
/// the rest of the line (the info string) including its line ending.
fn fence_run<R: Read + Seek>(
    cur: &mut SourceCursor<R>,
    count: &mut usize,
    fence: u8,
) -> Result<Option<usize>> {
    let mut run = 1;
    let mut next = cur.read_char(count)?;
    while next == Some(fence) {
        run += 1;
        next = cur.read_char(count)?;
    }
    while let Some(c) = next {
        if c == b'\n' {
            break;
        }
        next = cur.read_char(count)?;
    }
    Ok((run >= 3).then_some(run))
}
