//! Block geometry: where blocks sit vertically and which of them the
//! viewport shows.
//!
//! All values are logical pixels with `y = 0` at the top of the first block.

pub mod layout;
pub mod viewport;

pub use layout::{BlockLayout, display_columns};
pub use viewport::{
    Viewport, ViewportRange, content_offset_at_top, find_block_by_y_position, first_visible_block,
    last_visible_block, scroll_block_in_page, visible_block_range,
};

/// Font measurements the layout is computed from
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub line_height: f32,
    /// Width of one display column
    pub char_width: f32,
    pub space_width: f32,
}

impl TextMetrics {
    pub fn new(line_height: f32, char_width: f32) -> Self {
        Self {
            line_height,
            char_width,
            space_width: char_width,
        }
    }

    /// Columns that fit in `wrap_width`, at least one
    pub fn wrap_columns(&self, wrap_width: f32) -> usize {
        ((wrap_width.max(0.0) / self.char_width.max(f32::EPSILON)).floor() as usize).max(1)
    }

    /// Pixel distance between tab stops
    pub fn tab_stop_distance(&self, tab_stop_columns: usize) -> f32 {
        tab_stop_columns as f32 * self.space_width
    }
}

impl Default for TextMetrics {
    fn default() -> Self {
        Self::new(20.0, 8.0)
    }
}

/// Where in the viewport a block should land when scrolling to it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagePosition {
    Top,
    Center,
    Bottom,
}
