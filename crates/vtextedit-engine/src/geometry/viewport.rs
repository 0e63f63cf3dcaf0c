use crate::geometry::{BlockLayout, PagePosition};

/// The visible window onto the laid-out document
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Viewport {
    /// Document y shown at the top edge
    pub scroll_y: f32,
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            scroll_y: 0.0,
            width,
            height,
        }
    }

    pub fn max_scroll(&self, layout: &BlockLayout) -> f32 {
        (layout.total_height() - self.height).max(0.0)
    }

    /// Scroll to `y`, clamped to the valid range. Returns true if the
    /// scroll position changed.
    pub fn scroll_to(&mut self, layout: &BlockLayout, y: f32) -> bool {
        let y = if y.is_nan() { 0.0 } else { y };
        let clamped = y.clamp(0.0, self.max_scroll(layout));
        let changed = clamped != self.scroll_y;
        self.scroll_y = clamped;
        changed
    }

    pub fn bottom(&self) -> f32 {
        self.scroll_y + self.height
    }
}

/// First and last block intersecting the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportRange {
    pub first: usize,
    pub last: usize,
}

impl ViewportRange {
    pub fn contains(&self, block: usize) -> bool {
        block >= self.first && block <= self.last
    }
}

/// The block under the top edge of the viewport
pub fn first_visible_block(layout: &BlockLayout, viewport: &Viewport) -> usize {
    let last = layout.block_count().saturating_sub(1);
    layout
        .block_at_y(viewport.scroll_y.max(0.0))
        .unwrap_or(last)
}

/// The last block whose top lies above the bottom edge of the viewport
pub fn last_visible_block(layout: &BlockLayout, viewport: &Viewport) -> usize {
    let first = first_visible_block(layout, viewport);
    layout
        .blocks_starting_before(viewport.bottom())
        .saturating_sub(1)
        .max(first)
}

/// The block whose rendered extent contains document row `y`
pub fn find_block_by_y_position(layout: &BlockLayout, y: f32) -> Option<usize> {
    layout.block_at_y(y)
}

pub fn visible_block_range(layout: &BlockLayout, viewport: &Viewport) -> ViewportRange {
    ViewportRange {
        first: first_visible_block(layout, viewport),
        last: last_visible_block(layout, viewport),
    }
}

/// How far the viewport is scrolled into its first visible block
pub fn content_offset_at_top(layout: &BlockLayout, viewport: &Viewport) -> f32 {
    let first = first_visible_block(layout, viewport);
    layout
        .block_top(first)
        .map_or(0.0, |top| (viewport.scroll_y - top).max(0.0))
}

/// Scroll so `block` sits at `dest` of the viewport, `margin` pixels in from
/// the top or bottom edge. Only the scroll position changes.
///
/// Returns true if the viewport scrolled.
pub fn scroll_block_in_page(
    layout: &BlockLayout,
    viewport: &mut Viewport,
    block: usize,
    dest: PagePosition,
    margin: f32,
) -> bool {
    let (Some(top), Some(height)) = (layout.block_top(block), layout.block_height(block)) else {
        log::debug!("scroll_block_in_page: no block {block}");
        return false;
    };

    let target = match dest {
        PagePosition::Top => margin,
        PagePosition::Center => viewport.height / 2.0 - height / 2.0,
        PagePosition::Bottom => viewport.height - height - margin,
    };
    viewport.scroll_to(layout, top - target)
}
