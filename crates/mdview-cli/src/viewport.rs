/// Scroll position of a fixed-height window over a list of lines.
///
/// The offset is the index of the top visible line and always stays within
/// `0..=lines - height` (or 0 when everything fits).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    offset: usize,
    height: usize,
    lines: usize,
}

impl Viewport {
    pub fn new(lines: usize, height: usize) -> Self {
        Self {
            offset: 0,
            height,
            lines,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn lines(&self) -> usize {
        self.lines
    }

    pub fn max_offset(&self) -> usize {
        self.lines.saturating_sub(self.height)
    }

    /// Updates the document and window sizes, keeping the offset in range.
    pub fn resize(&mut self, lines: usize, height: usize) {
        self.lines = lines;
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Moves by `delta` lines. Returns whether the offset changed.
    pub fn scroll(&mut self, delta: isize) -> bool {
        let target = self.offset.saturating_add_signed(delta).min(self.max_offset());
        self.set_offset(target)
    }

    pub fn page_up(&mut self) -> bool {
        self.scroll(-self.page())
    }

    pub fn page_down(&mut self) -> bool {
        self.scroll(self.page())
    }

    pub fn jump_to_begin(&mut self) -> bool {
        self.set_offset(0)
    }

    pub fn jump_to_end(&mut self) -> bool {
        self.set_offset(self.max_offset())
    }

    /// Range of line indices currently visible.
    pub fn visible(&self) -> std::ops::Range<usize> {
        self.offset..(self.offset + self.height).min(self.lines)
    }

    fn page(&self) -> isize {
        isize::try_from(self.height).unwrap_or(isize::MAX)
    }

    fn set_offset(&mut self, offset: usize) -> bool {
        if offset == self.offset {
            return false;
        }
        self.offset = offset;
        true
    }
}
