use std::ops::Range;

/// How a cursor move treats the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveMode {
    /// Collapse the selection: anchor follows the position
    MoveAnchor,
    /// Extend the selection from the current anchor
    KeepAnchor,
}

/// The native edit cursor: an anchor/position pair of byte offsets.
///
/// The anchor is where a selection started and the position is where the
/// caret is drawn, so `anchor > position` is a backwards selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextCursor {
    pub anchor: usize,
    pub position: usize,
}

impl TextCursor {
    pub fn new(position: usize) -> Self {
        Self {
            anchor: position,
            position,
        }
    }

    pub fn with_selection(anchor: usize, position: usize) -> Self {
        Self { anchor, position }
    }

    pub fn has_selection(&self) -> bool {
        self.anchor != self.position
    }

    pub fn selection_start(&self) -> usize {
        self.anchor.min(self.position)
    }

    pub fn selection_end(&self) -> usize {
        self.anchor.max(self.position)
    }

    pub fn selection_range(&self) -> Range<usize> {
        self.selection_start()..self.selection_end()
    }

    pub fn move_to(&mut self, position: usize, mode: MoveMode) {
        self.position = position;
        if mode == MoveMode::MoveAnchor {
            self.anchor = position;
        }
    }

    pub fn clear_selection(&mut self) {
        self.anchor = self.position;
    }

    /// Clamp both ends into `[0, len]`
    pub(crate) fn clamped(self, len: usize) -> Self {
        Self {
            anchor: self.anchor.min(len),
            position: self.position.min(len),
        }
    }
}
