//! # Line Accumulator
//!
//! Buffers the text of the current display line together with the points
//! where its style changes, and turns it into [`Token`]s:
//!
//! ```text
//! buf:    "plain bold more"
//! styles: [(0, NONE), (6, STRONG), (10, NONE)]
//!         → Span("plain "), Span[STRONG]("bold"), Span(" more")
//! ```
//!
//! When the line grows past the available width it is split at the last
//! space (the space itself is dropped), the prefix is emitted followed by
//! a [`Token::Newline`], and the remainder becomes the start of the next
//! line with its style offsets shifted down. A word longer than the whole
//! line is hard-split at the line capacity.
//!
//! Code lines are never wrapped: characters past the capacity are dropped.
//!
//! Capacity is counted in characters. Bytes arrive one at a time, so a
//! multi-byte UTF-8 character is only counted by its first byte, and split
//! points always fall on character boundaries.

use std::ops::ControlFlow;

use crate::chars::is_char_start;
use crate::error::{ParseError, Result};
use crate::options::ParseOptions;
use crate::token::{BlockKind, Style, Token, TokenSink};

/// A style change at a byte offset of the line buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct StyleMark {
    offset: usize,
    style: Style,
}

/// Token emitter and line buffer shared by all block parsers.
pub(crate) struct LineAccumulator<S> {
    sink: S,
    options: ParseOptions,
    block: BlockKind,
    capacity: usize,
    truncate: bool,
    buf: Vec<u8>,
    /// Characters (not bytes) in `buf`.
    chars: usize,
    /// Set while the bytes of a truncated code character are dropped.
    dropping: bool,
    /// Ascending offsets, at most one mark per offset, first mark at 0.
    styles: Vec<StyleMark>,
    last_space: Option<usize>,
    lines: usize,
}

impl<S: TokenSink> LineAccumulator<S> {
    pub(crate) fn new(sink: S, options: ParseOptions) -> Self {
        let capacity = options.line_capacity(BlockKind::Paragraph);
        Self {
            sink,
            options,
            block: BlockKind::Paragraph,
            capacity,
            truncate: false,
            buf: Vec::with_capacity(capacity + 1),
            chars: 0,
            dropping: false,
            styles: vec![StyleMark {
                offset: 0,
                style: Style::empty(),
            }],
            last_space: None,
            lines: 0,
        }
    }

    pub(crate) fn options(&self) -> &ParseOptions {
        &self.options
    }

    /// Display lines completed so far.
    pub(crate) fn lines(&self) -> usize {
        self.lines
    }

    pub(crate) fn reset(&mut self) {
        self.lines = 0;
        self.clear(Style::empty());
    }

    pub(crate) fn into_sink(self) -> S {
        self.sink
    }

    pub(crate) fn block_start(&mut self, kind: BlockKind) -> Result<()> {
        self.emit(Token::BlockStart(kind))
    }

    pub(crate) fn block_end(&mut self, kind: BlockKind) -> Result<()> {
        self.emit(Token::BlockEnd(kind))
    }

    /// Prepares an empty line buffer for the text of `block`, with no style.
    ///
    /// `truncate` selects code-line behaviour: no wrapping, excess dropped.
    pub(crate) fn begin(&mut self, block: BlockKind, truncate: bool) {
        self.block = block;
        self.capacity = self.options.line_capacity(block);
        self.truncate = truncate;
        self.clear(Style::empty());
    }

    /// Style of the text written from now on.
    pub(crate) fn current_style(&self) -> Style {
        self.styles.last().map(|m| m.style).unwrap_or_default()
    }

    /// Records a style change at the current end of the buffer.
    pub(crate) fn new_style(&mut self, style: Style) {
        let offset = self.buf.len();
        if let Some(last) = self.styles.last_mut()
            && last.offset == offset
        {
            // Nothing written since the previous change: overwrite it.
            last.style = style;
            let n = self.styles.len();
            if n > 1 && self.styles[n - 2].style == style {
                self.styles.pop();
            }
        } else if self.current_style() != style {
            self.styles.push(StyleMark { offset, style });
        }
        log::trace!("style {style:?} at offset {offset}");
    }

    /// Appends one byte, wrapping (or truncating, for code) as needed.
    pub(crate) fn write(&mut self, c: u8) -> Result<()> {
        let starts_char = is_char_start(c);

        if self.truncate {
            if starts_char {
                self.dropping = self.chars >= self.capacity;
            }
            if !self.dropping {
                self.buf.push(c);
                self.chars += usize::from(starts_char);
            }
            return Ok(());
        }

        self.buf.push(c);
        if !starts_char {
            return Ok(());
        }
        self.chars += 1;
        if c == b' ' {
            self.last_space = Some(self.buf.len() - 1);
        }
        while self.chars > self.capacity {
            self.wrap()?;
        }
        Ok(())
    }

    /// Ends the current line: emits its spans and a newline.
    pub(crate) fn end_line(&mut self) -> Result<()> {
        self.emit_spans(self.buf.len())?;
        self.emit(Token::Newline)?;
        let style = self.current_style();
        self.clear(style);
        Ok(())
    }

    /// Emits whatever is buffered as the final line of a text block,
    /// dropping a trailing space.
    pub(crate) fn finish_text(&mut self) -> Result<()> {
        let mut end = self.buf.len();
        if end > 0 && self.buf[end - 1] == b' ' {
            end -= 1;
        }
        self.emit_spans(end)?;
        self.clear(Style::empty());
        Ok(())
    }

    /// Emits whatever is buffered as the final line of a code block, verbatim.
    pub(crate) fn finish_code(&mut self) -> Result<()> {
        self.emit_spans(self.buf.len())?;
        self.clear(Style::empty());
        Ok(())
    }

    /// Soft line break at the last space, or at the capacity if the line
    /// holds a single overlong word.
    fn wrap(&mut self) -> Result<()> {
        let (end, rest) = match self.last_space {
            Some(pos) => (pos, pos + 1),
            None => {
                let at = self.char_offset(self.capacity);
                (at, at)
            }
        };
        log::trace!("soft wrap after {end} bytes of {:?}", self.block);

        self.emit_spans(end)?;
        self.emit(Token::Newline)?;

        self.buf.drain(..rest);
        self.shift_styles(rest);
        self.chars = self.buf.iter().filter(|&&b| is_char_start(b)).count();
        self.last_space = self.buf.iter().rposition(|&b| b == b' ');
        Ok(())
    }

    /// Byte offset of the `n`th character of the buffer.
    fn char_offset(&self, n: usize) -> usize {
        self.buf
            .iter()
            .enumerate()
            .filter(|&(_, &b)| is_char_start(b))
            .nth(n)
            .map_or(self.buf.len(), |(i, _)| i)
    }

    /// Drops marks inside the first `cut` bytes, keeping the style in effect
    /// at the cut as the new mark at offset 0.
    fn shift_styles(&mut self, cut: usize) {
        let at_cut = self
            .styles
            .iter()
            .take_while(|m| m.offset <= cut)
            .last()
            .map(|m| m.style)
            .unwrap_or_default();

        let mut shifted = vec![StyleMark {
            offset: 0,
            style: at_cut,
        }];
        shifted.extend(
            self.styles
                .iter()
                .filter(|m| m.offset > cut)
                .map(|m| StyleMark {
                    offset: m.offset - cut,
                    style: m.style,
                }),
        );
        self.styles = shifted;
    }

    /// Emits one span per style run within `buf[..end]`, skipping empty runs.
    fn emit_spans(&mut self, end: usize) -> Result<()> {
        for i in 0..self.styles.len() {
            let mark = self.styles[i];
            let stop = self
                .styles
                .get(i + 1)
                .map_or(end, |next| next.offset)
                .min(end);
            if mark.offset >= stop {
                continue;
            }
            let text = String::from_utf8_lossy(&self.buf[mark.offset..stop]).into_owned();
            self.emit(Token::Span {
                block: self.block,
                style: mark.style,
                text,
            })?;
        }
        Ok(())
    }

    fn clear(&mut self, style: Style) {
        self.buf.clear();
        self.chars = 0;
        self.dropping = false;
        self.styles.clear();
        self.styles.push(StyleMark { offset: 0, style });
        self.last_space = None;
    }

    fn emit(&mut self, token: Token) -> Result<()> {
        match &token {
            Token::Newline => self.lines += 1,
            Token::BlockEnd(kind) if kind.holds_text() => self.lines += 1,
            _ => {}
        }
        match self.sink.accept(token) {
            ControlFlow::Continue(()) => Ok(()),
            ControlFlow::Break(()) => Err(ParseError::Aborted),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn accumulator(width: usize) -> LineAccumulator<Vec<Token>> {
        LineAccumulator::new(Vec::new(), ParseOptions::new(width))
    }

    fn write_str(acc: &mut LineAccumulator<Vec<Token>>, s: &str) {
        for b in s.bytes() {
            acc.write(b).unwrap();
        }
    }

    fn plain(text: &str) -> Token {
        Token::span(BlockKind::Paragraph, Style::empty(), text)
    }

    #[test]
    fn spans_follow_style_marks() {
        let mut acc = accumulator(80);
        acc.begin(BlockKind::Paragraph, false);
        write_str(&mut acc, "plain ");
        acc.new_style(Style::STRONG);
        write_str(&mut acc, "bold");
        acc.new_style(Style::empty());
        write_str(&mut acc, " more");
        acc.finish_text().unwrap();

        assert_eq!(
            acc.into_sink(),
            vec![
                plain("plain "),
                Token::span(BlockKind::Paragraph, Style::STRONG, "bold"),
                plain(" more"),
            ]
        );
    }

    #[test]
    fn style_change_without_text_overwrites() {
        let mut acc = accumulator(80);
        acc.begin(BlockKind::Paragraph, false);
        write_str(&mut acc, "a");
        acc.new_style(Style::EMPHASIS);
        acc.new_style(Style::STRONG);
        assert_eq!(acc.styles.len(), 2);
        assert_eq!(acc.current_style(), Style::STRONG);

        // Reverting to the previous style removes the zero-width mark.
        acc.new_style(Style::empty());
        assert_eq!(acc.styles.len(), 1);
    }

    #[test]
    fn wrap_splits_at_last_space() {
        let mut acc = accumulator(10);
        acc.begin(BlockKind::Paragraph, false);
        write_str(&mut acc, "a longer sentence");
        acc.finish_text().unwrap();

        assert_eq!(
            acc.into_sink(),
            vec![plain("a longer"), Token::Newline, plain("sentence")]
        );
    }

    #[test]
    fn wrap_carries_style_into_next_line() {
        let mut acc = accumulator(6);
        acc.begin(BlockKind::Paragraph, false);
        write_str(&mut acc, "ab ");
        acc.new_style(Style::EMPHASIS);
        write_str(&mut acc, "cd ef");
        acc.finish_text().unwrap();

        assert_eq!(
            acc.into_sink(),
            vec![
                plain("ab "),
                Token::span(BlockKind::Paragraph, Style::EMPHASIS, "cd"),
                Token::Newline,
                Token::span(BlockKind::Paragraph, Style::EMPHASIS, "ef"),
            ]
        );
    }

    #[test]
    fn overlong_word_is_hard_split() {
        let mut acc = accumulator(4);
        acc.begin(BlockKind::Paragraph, false);
        write_str(&mut acc, "abcdefghij");
        acc.finish_text().unwrap();

        assert_eq!(
            acc.into_sink(),
            vec![
                plain("abcd"),
                Token::Newline,
                plain("efgh"),
                Token::Newline,
                plain("ij"),
            ]
        );
    }

    #[test]
    fn indent_reduces_capacity() {
        let options = ParseOptions::new(8).with_indent(BlockKind::ListItem, 3);
        let mut acc = LineAccumulator::new(Vec::new(), options);
        acc.begin(BlockKind::ListItem, false);
        write_str(&mut acc, "one two");
        acc.finish_text().unwrap();

        assert_eq!(
            acc.into_sink(),
            vec![
                Token::span(BlockKind::ListItem, Style::empty(), "one"),
                Token::Newline,
                Token::span(BlockKind::ListItem, Style::empty(), "two"),
            ]
        );
    }

    #[test]
    fn code_lines_truncate() {
        let mut acc = accumulator(5);
        acc.begin(BlockKind::Code, true);
        write_str(&mut acc, "let x = 1;");
        acc.end_line().unwrap();
        write_str(&mut acc, "y ");
        acc.finish_code().unwrap();

        assert_eq!(
            acc.into_sink(),
            vec![
                Token::span(BlockKind::Code, Style::empty(), "let x"),
                Token::Newline,
                Token::span(BlockKind::Code, Style::empty(), "y "),
            ]
        );
    }

    #[test]
    fn multibyte_word_splits_between_characters() {
        let mut acc = accumulator(3);
        acc.begin(BlockKind::Paragraph, false);
        write_str(&mut acc, "ééééé");
        acc.finish_text().unwrap();

        assert_eq!(
            acc.into_sink(),
            vec![plain("ééé"), Token::Newline, plain("éé")]
        );
    }

    #[test]
    fn multibyte_wrap_counts_characters() {
        let mut acc = accumulator(7);
        acc.begin(BlockKind::Paragraph, false);
        write_str(&mut acc, "größe maß");
        acc.finish_text().unwrap();

        assert_eq!(
            acc.into_sink(),
            vec![plain("größe"), Token::Newline, plain("maß")]
        );
    }

    #[test]
    fn code_truncation_keeps_whole_characters() {
        let mut acc = accumulator(3);
        acc.begin(BlockKind::Code, true);
        write_str(&mut acc, "a€bc");
        acc.end_line().unwrap();
        write_str(&mut acc, "éé€€");
        acc.finish_code().unwrap();

        assert_eq!(
            acc.into_sink(),
            vec![
                Token::span(BlockKind::Code, Style::empty(), "a€b"),
                Token::Newline,
                Token::span(BlockKind::Code, Style::empty(), "éé€"),
            ]
        );
    }

    #[test]
    fn trailing_space_is_trimmed_and_empty_spans_skipped() {
        let mut acc = accumulator(80);
        acc.begin(BlockKind::Paragraph, false);
        write_str(&mut acc, "a ");
        acc.new_style(Style::CODE);
        acc.finish_text().unwrap();

        assert_eq!(acc.into_sink(), vec![plain("a")]);
    }

    #[test]
    fn lines_count_newlines_and_text_block_ends() {
        let mut acc = accumulator(80);
        acc.block_start(BlockKind::UnorderedList).unwrap();
        acc.block_start(BlockKind::ListItem).unwrap();
        acc.end_line().unwrap();
        acc.block_end(BlockKind::ListItem).unwrap();
        acc.block_end(BlockKind::UnorderedList).unwrap();
        assert_eq!(acc.lines(), 2);

        acc.reset();
        assert_eq!(acc.lines(), 0);
    }

    #[test]
    fn sink_break_aborts() {
        let mut calls = 0;
        let sink = |_: Token| {
            calls += 1;
            ControlFlow::Break(())
        };
        let mut acc = LineAccumulator::new(sink, ParseOptions::new(10));
        assert!(matches!(
            acc.block_start(BlockKind::Paragraph),
            Err(ParseError::Aborted)
        ));
        drop(acc);
        assert_eq!(calls, 1);
    }
}
