use crate::token::BlockKind;

/// Left indent, in columns, for each block kind.
///
/// The parser uses it to account for wrap width; the renderer uses the same
/// table to indent the lines it draws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Indents([usize; BlockKind::ALL.len()]);

impl Indents {
    pub fn get(&self, kind: BlockKind) -> usize {
        self.0[kind.index()]
    }

    pub fn set(&mut self, kind: BlockKind, columns: usize) {
        self.0[kind.index()] = columns;
    }

    pub fn with(mut self, kind: BlockKind, columns: usize) -> Self {
        self.set(kind, columns);
        self
    }
}

/// Immutable configuration for one parse run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Wrap column width in characters. Must be at least 1.
    pub width: usize,
    pub indents: Indents,
}

impl ParseOptions {
    /// Options with the given width and no indentation.
    pub fn new(width: usize) -> Self {
        Self {
            width,
            indents: Indents::default(),
        }
    }

    pub fn with_indent(mut self, kind: BlockKind, columns: usize) -> Self {
        self.indents.set(kind, columns);
        self
    }

    /// Number of characters that fit on one line of `kind`, never less than 1.
    pub fn line_capacity(&self, kind: BlockKind) -> usize {
        self.width.saturating_sub(self.indents.get(kind)).max(1)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::new(80)
    }
}
