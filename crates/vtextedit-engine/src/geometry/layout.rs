//! Per-block visual row layout with prefix-row mapping.
//!
//! Heights are whole visual rows times the line height, so block tops are
//! exact multiples of the line height and pixel-to-block lookups are a
//! binary search over prefix rows.

use unicode_width::UnicodeWidthChar;

use crate::editing::Document;
use crate::geometry::TextMetrics;

fn div_ceil(value: usize, divisor: usize) -> usize {
    if value == 0 {
        0
    } else {
        (value - 1) / divisor + 1
    }
}

/// Display column count of a block, expanding tabs to tab stops
pub fn display_columns(text: &str, tab_stop_columns: usize) -> usize {
    let tab = tab_stop_columns.max(1);
    text.chars().fold(0, |col, ch| match ch {
        '\t' => (col / tab + 1) * tab,
        _ => col + ch.width().unwrap_or(0),
    })
}

/// Vertical layout of every block of a document
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BlockLayout {
    revision: u64,
    line_height: f32,
    wrap_columns: usize,
    /// `prefix_rows[i]` is the first visual row of block `i`; one extra entry
    /// holds the total row count
    prefix_rows: Vec<usize>,
}

impl BlockLayout {
    /// Lay out all blocks wrapped at `wrap_width` pixels
    pub fn build(
        doc: &Document,
        metrics: &TextMetrics,
        wrap_width: f32,
        tab_stop_columns: usize,
    ) -> Self {
        let wrap_columns = metrics.wrap_columns(wrap_width);

        let mut prefix_rows = Vec::with_capacity(doc.block_count() + 1);
        prefix_rows.push(0);
        let mut total_rows = 0usize;
        for block in doc.blocks() {
            let columns = display_columns(&block.text, tab_stop_columns);
            let rows = div_ceil(columns, wrap_columns).max(1);
            total_rows = total_rows.saturating_add(rows);
            prefix_rows.push(total_rows);
        }

        Self {
            revision: doc.revision_with_changes(),
            line_height: metrics.line_height,
            wrap_columns,
            prefix_rows,
        }
    }

    /// True when the document text or geometry moved on since `build`
    pub fn needs_rebuild(&self, doc: &Document, metrics: &TextMetrics, wrap_width: f32) -> bool {
        self.revision != doc.revision_with_changes()
            || self.line_height.to_bits() != metrics.line_height.to_bits()
            || self.wrap_columns != metrics.wrap_columns(wrap_width)
            || self.block_count() != doc.block_count()
    }

    pub fn block_count(&self) -> usize {
        self.prefix_rows.len().saturating_sub(1)
    }

    pub fn wrap_columns(&self) -> usize {
        self.wrap_columns
    }

    pub fn line_height(&self) -> f32 {
        self.line_height
    }

    pub fn block_rows(&self, block: usize) -> Option<usize> {
        let start = *self.prefix_rows.get(block)?;
        let end = *self.prefix_rows.get(block + 1)?;
        Some(end - start)
    }

    pub fn block_top(&self, block: usize) -> Option<f32> {
        if block >= self.block_count() {
            return None;
        }
        Some(self.prefix_rows[block] as f32 * self.line_height)
    }

    pub fn block_height(&self, block: usize) -> Option<f32> {
        self.block_rows(block)
            .map(|rows| rows as f32 * self.line_height)
    }

    pub fn block_bottom(&self, block: usize) -> Option<f32> {
        Some(self.block_top(block)? + self.block_height(block)?)
    }

    pub fn total_height(&self) -> f32 {
        self.prefix_rows.last().copied().unwrap_or(0) as f32 * self.line_height
    }

    /// The block whose extent `[top, bottom)` contains `y`, or `None` when `y`
    /// is outside the rendered document
    pub fn block_at_y(&self, y: f32) -> Option<usize> {
        if y.is_nan() || y < 0.0 || y >= self.total_height() || self.line_height <= 0.0 {
            return None;
        }
        let row = (y / self.line_height).floor() as usize;
        // Blocks starting at or before `row`, minus one
        let index = self.prefix_rows[1..].partition_point(|&end| end <= row);
        (index < self.block_count()).then_some(index)
    }

    /// Number of blocks whose top lies strictly above `y`
    pub(crate) fn blocks_starting_before(&self, y: f32) -> usize {
        let count = self.block_count();
        self.prefix_rows[..count].partition_point(|&start| (start as f32 * self.line_height) < y)
    }
}
