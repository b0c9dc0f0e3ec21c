//! # Inline Text
//!
//! Text blocks (headings, list items, paragraphs) share one routine that
//! reads characters until the block ends, collapsing whitespace and
//! tracking inline styles:
//!
//! | Delimiter        | Style             |
//! |------------------|-------------------|
//! | `*`              | emphasis          |
//! | `**`             | strong            |
//! | `***`            | emphasis + strong |
//! | `` ` ``          | code              |
//!
//! Inside a code span `*` is plain text.
//!
//! ## Flanking
//!
//! Whether a delimiter run opens or closes depends on its neighbours:
//!
//! - **left-flanking** (can open): the next character is not whitespace,
//!   and is either not punctuation or the previous character is
//!   whitespace or punctuation
//! - **right-flanking** (can close): the mirror image
//!
//! Line endings and the end of the input count as whitespace. A run that
//! is both (`a*b*c`) toggles its styles. A run that is neither (`a * b`),
//! or a backtick run longer than one, is literal text.

use std::io::{Read, Seek};

use crate::chars::{is_eol, is_flanking_space, is_punctuation, is_white_space};
use crate::cursor::SourceCursor;
use crate::error::Result;
use crate::parser::Parser;
use crate::parser::delim::{DelimKind, block_delim};
use crate::token::{BlockKind, Style, TokenSink};

/// Outcome of looking at a possible style delimiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StyleDelim {
    /// Not `*` or `` ` ``; nothing was read.
    None,
    /// A delimiter run producing this style set; the run is consumed.
    Style(Style),
    /// A run of `n` delimiter characters that must be written as text; the
    /// run after the first character is consumed.
    Literal(usize),
}

/// Classifies the delimiter run starting with `curr` (already read).
pub(super) fn style_delim<R: Read + Seek>(
    cur: &mut SourceCursor<R>,
    current: Style,
    prev: u8,
    curr: u8,
) -> Result<StyleDelim> {
    if curr != b'*' && curr != b'`' {
        return Ok(StyleDelim::None);
    }
    if curr == b'*' && current.contains(Style::CODE) {
        return Ok(StyleDelim::None);
    }

    let mut count = 0;
    let mut run = 1;
    let next = loop {
        match cur.read_char(&mut count)? {
            Some(c) if c == curr => run += 1,
            other => break other,
        }
    };
    if next.is_some() {
        cur.unread(1, &mut count)?;
    }

    let prev_space = is_white_space(prev) || is_eol(prev);
    let next_space = is_flanking_space(next);
    let next_punct = next.is_some_and(is_punctuation);

    let left = !next_space && (!next_punct || prev_space || is_punctuation(prev));
    let right = !prev_space && (!is_punctuation(prev) || next_space || next_punct);

    if (!left && !right) || (curr == b'`' && run > 1) {
        return Ok(StyleDelim::Literal(run));
    }

    let bits = if curr == b'`' {
        Style::CODE
    } else {
        let mut bits = Style::empty();
        if run & 0x01 != 0 {
            bits |= Style::EMPHASIS;
        }
        if run & 0x02 != 0 {
            bits |= Style::STRONG;
        }
        bits
    };

    let style = match (left, right) {
        (true, true) => current ^ bits,
        (true, false) => current | bits,
        _ => current - bits,
    };
    Ok(StyleDelim::Style(style))
}

/// Where a text block stops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum TextEnd {
    /// At the first line ending (headings).
    Line,
    /// At a blank line or a line opening another block.
    Block,
}

/// Parses inline text of `block` until it ends, then flushes it.
pub(super) fn text<R: Read + Seek, S: TokenSink>(
    p: &mut Parser<R, S>,
    block: BlockKind,
    end: TextEnd,
) -> Result<()> {
    p.out.begin(block, false);

    let mut previous = b' ';
    let mut space = false;
    let mut line_blank = false;
    let mut seen_content = false;

    loop {
        let mut count = 0;
        let Some(ch) = p.cursor.read_char(&mut count)? else {
            break;
        };

        if ch == b'\n' {
            if end == TextEnd::Line {
                break;
            }
            if line_blank {
                break;
            }
            if let Some(mut delim) = block_delim(&mut p.cursor)?
                && delim.kind != DelimKind::Paragraph
            {
                let consumed = delim.consumed;
                p.cursor.unread(consumed, &mut delim.consumed)?;
                break;
            }
            line_blank = true;
        } else if !is_white_space(ch) {
            line_blank = false;
        }

        if is_white_space(ch) || is_eol(ch) {
            // Runs of white-space and line endings collapse to one space,
            // written only once more content follows.
            space = seen_content;
        } else if end == TextEnd::Line
            && ch == b'#'
            && is_white_space(previous)
            && closing_sequence(&mut p.cursor)?
        {
            break;
        } else {
            if space {
                p.out.write(b' ')?;
                space = false;
            }
            seen_content = true;
            match style_delim(&mut p.cursor, p.out.current_style(), previous, ch)? {
                StyleDelim::Style(style) => p.out.new_style(style),
                StyleDelim::Literal(run) => {
                    for _ in 0..run {
                        p.out.write(ch)?;
                    }
                }
                StyleDelim::None => p.out.write(ch)?,
            }
        }

        previous = ch;
    }

    p.out.finish_text()
}

/// Consumes the blank lines and indentation left in front of a paragraph,
/// which the block classifier pushes back together with its lookahead.
pub(super) fn skip_blank_lines<R: Read + Seek>(cur: &mut SourceCursor<R>) -> Result<()> {
    let mut count = 0;
    while let Some(c) = cur.read_char(&mut count)? {
        if !is_white_space(c) && !is_eol(c) {
            cur.unread(1, &mut count)?;
            break;
        }
    }
    Ok(())
}

/// Checks whether the `#` just read starts an optional heading closing
/// sequence: more hashes, then only white-space up to the end of the line.
///
/// A closing sequence is consumed together with its line ending. Otherwise
/// everything after the first `#` is pushed back.
fn closing_sequence<R: Read + Seek>(cur: &mut SourceCursor<R>) -> Result<bool> {
    let mut count = 0;
    let mut next = cur.read_char(&mut count)?;
    while next == Some(b'#') {
        next = cur.read_char(&mut count)?;
    }
    while next.is_some_and(is_white_space) {
        next = cur.read_char(&mut count)?;
    }
    if next.is_none_or(is_eol) {
        return Ok(true);
    }
    let consumed = count;
    cur.unread(consumed, &mut count)?;
    Ok(false)
}
