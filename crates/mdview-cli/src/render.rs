//! Turns the token stream into styled terminal lines.
//!
//! Each display line produced by the parser becomes one [`Line`], prefixed
//! with the indent of its block. A blank line separates top-level blocks.

use std::io::{Read, Seek};
use std::ops::ControlFlow;

use mdview_syntax::{
    BlockKind, Indents, ParseError, ParseOptions, Parser, Style as InlineStyle, Token, TokenSink,
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const BULLET: &str = "- ";

/// A parsed document ready to be drawn.
#[derive(Debug, Clone, Default)]
pub struct RenderedDocument {
    lines: Vec<Line<'static>>,
    /// Display lines reported by the parser, separators excluded.
    parsed_lines: usize,
}

impl RenderedDocument {
    /// Parses `source` into styled lines. List items are indented at least
    /// as far as their bullet.
    pub fn parse<R: Read + Seek>(source: R, options: &ParseOptions) -> Result<Self, ParseError> {
        let list_indent = options.indents.get(BlockKind::ListItem).max(BULLET.len());
        let options = options.clone().with_indent(BlockKind::ListItem, list_indent);
        let renderer = Renderer::new(options.indents);
        let mut parser = Parser::new(source, options, renderer);
        parser.parse()?;
        let parsed_lines = parser.lines();
        let lines = parser.into_sink().lines;
        Ok(Self {
            lines,
            parsed_lines,
        })
    }

    /// Wraps already formatted text lines without styling.
    pub fn from_plain(lines: Vec<String>) -> Self {
        let parsed_lines = lines.len();
        Self {
            lines: lines.into_iter().map(Line::from).collect(),
            parsed_lines,
        }
    }

    pub fn lines(&self) -> &[Line<'static>] {
        &self.lines
    }

    pub fn parsed_lines(&self) -> usize {
        self.parsed_lines
    }
}

fn inline_style(block: BlockKind, style: InlineStyle) -> Style {
    let mut out = block_style(block);
    if style.contains(InlineStyle::EMPHASIS) {
        out = out.fg(Color::Magenta).add_modifier(Modifier::ITALIC);
    }
    if style.contains(InlineStyle::STRONG) {
        out = out.fg(Color::White).add_modifier(Modifier::BOLD);
    }
    if style.contains(InlineStyle::CODE) {
        out = out.fg(Color::Black).bg(Color::Gray);
    }
    out
}

fn block_style(block: BlockKind) -> Style {
    match block {
        BlockKind::Heading => Style::default().add_modifier(Modifier::BOLD),
        BlockKind::Code => Style::default().fg(Color::Black).bg(Color::Gray),
        _ => Style::default(),
    }
}

/// Token sink building the rendered lines.
struct Renderer {
    indents: Indents,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    /// Innermost open block holding text.
    block: BlockKind,
    depth: usize,
    bullet: bool,
}

impl Renderer {
    fn new(indents: Indents) -> Self {
        Self {
            indents,
            lines: Vec::new(),
            current: Vec::new(),
            block: BlockKind::Paragraph,
            depth: 0,
            bullet: false,
        }
    }

    fn prefix(&mut self) {
        if !self.current.is_empty() {
            return;
        }
        let indent = self.indents.get(self.block);
        let text = if self.bullet {
            self.bullet = false;
            format!("{BULLET:<indent$}")
        } else {
            " ".repeat(indent)
        };
        if !text.is_empty() {
            self.current.push(Span::raw(text));
        }
    }

    fn end_line(&mut self) {
        self.prefix();
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans).style(block_style(self.block)));
    }
}

impl TokenSink for Renderer {
    fn accept(&mut self, token: Token) -> ControlFlow<()> {
        match token {
            Token::BlockStart(kind) => {
                self.depth += 1;
                if kind.holds_text() {
                    self.block = kind;
                    self.bullet = kind == BlockKind::ListItem;
                }
            }
            Token::Span { block, style, text } => {
                self.prefix();
                self.current.push(Span::styled(text, inline_style(block, style)));
            }
            Token::Newline => self.end_line(),
            Token::BlockEnd(kind) => {
                if kind.holds_text() {
                    self.end_line();
                }
                self.depth = self.depth.saturating_sub(1);
                if self.depth == 0 {
                    self.lines.push(Line::default());
                }
            }
        }
        ControlFlow::Continue(())
    }
}
