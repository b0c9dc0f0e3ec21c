//! # Tokens
//!
//! The parser never builds a tree. It emits a flat, lazily produced stream
//! of tokens to a caller-supplied [`TokenSink`]:
//!
//! ```text
//! BlockStart(Paragraph)
//!   Span { style: EMPHASIS, text: "Hello" }
//!   Span { style: (empty),  text: " world, this is" }
//!   Newline                      ← soft wrap
//!   Span { style: (empty),  text: "wrapped" }
//! BlockEnd(Paragraph)
//! ```
//!
//! Tokens are transient: each one is handed to the sink by value and the
//! parser keeps no reference to it.

use std::fmt;
use std::ops::ControlFlow;

use bitflags::bitflags;

/// The structural unit a token belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    Paragraph,
    Heading,
    OrderedList,
    UnorderedList,
    ListItem,
    Code,
}

impl BlockKind {
    /// All block kinds, in table order.
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Paragraph,
        BlockKind::Heading,
        BlockKind::OrderedList,
        BlockKind::UnorderedList,
        BlockKind::ListItem,
        BlockKind::Code,
    ];

    /// Position of this kind in per-block tables such as [`Indents`](crate::Indents).
    pub const fn index(self) -> usize {
        match self {
            BlockKind::Paragraph => 0,
            BlockKind::Heading => 1,
            BlockKind::OrderedList => 2,
            BlockKind::UnorderedList => 3,
            BlockKind::ListItem => 4,
            BlockKind::Code => 5,
        }
    }

    /// Whether this block directly holds text lines (as opposed to a list
    /// container, which only holds items).
    pub const fn holds_text(self) -> bool {
        !matches!(self, BlockKind::OrderedList | BlockKind::UnorderedList)
    }
}

bitflags! {
    /// Active inline styles of a span.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Style: u8 {
        const EMPHASIS = 1 << 0;
        const STRONG = 1 << 1;
        const CODE = 1 << 2;
    }
}

/// A single unit of parser output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A block opens. Every start is matched by a [`Token::BlockEnd`] of the
    /// same kind, properly nested.
    BlockStart(BlockKind),
    /// A block closes.
    BlockEnd(BlockKind),
    /// A run of text sharing one style set, inside `block`.
    Span {
        block: BlockKind,
        style: Style,
        text: String,
    },
    /// A display line ends: either a soft wrap or a literal line of code.
    Newline,
}

impl Token {
    /// Convenience constructor for span tokens.
    pub fn span(block: BlockKind, style: Style, text: impl Into<String>) -> Self {
        Token::Span {
            block,
            style,
            text: text.into(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::BlockStart(kind) => write!(f, "start {kind:?}"),
            Token::BlockEnd(kind) => write!(f, "end {kind:?}"),
            Token::Span { block, style, text } => {
                write!(f, "span {block:?}")?;
                for (name, _) in style.iter_names() {
                    write!(f, " {}", name.to_lowercase())?;
                }
                write!(f, " {text:?}")
            }
            Token::Newline => f.write_str("newline"),
        }
    }
}

/// Receiver of the token stream.
///
/// Called synchronously, once per token, in emission order. Returning
/// [`ControlFlow::Break`] stops the parse with
/// [`ParseError::Aborted`](crate::ParseError::Aborted); tokens delivered
/// before that point are not retracted.
pub trait TokenSink {
    fn accept(&mut self, token: Token) -> ControlFlow<()>;
}

impl<F> TokenSink for F
where
    F: FnMut(Token) -> ControlFlow<()>,
{
    fn accept(&mut self, token: Token) -> ControlFlow<()> {
        self(token)
    }
}

/// Collects every token; never aborts.
impl TokenSink for Vec<Token> {
    fn accept(&mut self, token: Token) -> ControlFlow<()> {
        self.push(token);
        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn block_indices_are_distinct_and_ordered() {
        for (i, kind) in BlockKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }

    #[test]
    fn list_containers_do_not_hold_text() {
        assert!(!BlockKind::UnorderedList.holds_text());
        assert!(!BlockKind::OrderedList.holds_text());
        assert!(BlockKind::ListItem.holds_text());
        assert!(BlockKind::Code.holds_text());
    }

    #[test]
    fn display_lists_style_names() {
        let token = Token::span(BlockKind::Paragraph, Style::EMPHASIS | Style::STRONG, "hi");
        assert_eq!(token.to_string(), "span Paragraph emphasis strong \"hi\"");
        assert_eq!(Token::Newline.to_string(), "newline");
        assert_eq!(Token::BlockEnd(BlockKind::Code).to_string(), "end Code");
    }

    #[test]
    fn closures_are_sinks() {
        let mut seen = Vec::new();
        let mut sink = |token: Token| {
            seen.push(token);
            ControlFlow::Continue(())
        };
        assert_eq!(sink.accept(Token::Newline), ControlFlow::Continue(()));
        assert_eq!(seen, vec![Token::Newline]);
    }
}
