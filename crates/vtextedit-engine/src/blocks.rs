//! Block-level structural editing: indentation, block insertion and removal,
//! and whitespace measurements.
//!
//! Multi-block operations walk block indices from the first block of a range
//! for `count` blocks. Indentation only edits text inside blocks, so the
//! indices of blocks not yet visited stay valid throughout the loop.

use crate::editing::{Block, Cmd, Document, IndentUnit, Patch, TextCursor};

/// A run of consecutive blocks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    pub first: usize,
    pub count: usize,
}

impl BlockRange {
    pub fn last(&self) -> usize {
        self.first + self.count.saturating_sub(1)
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.first && index < self.first + self.count
    }
}

/// True if the block holds nothing but whitespace
pub fn is_empty_block(block: &Block) -> bool {
    block.text.trim().is_empty()
}

/// Number of leading whitespace characters; a tab counts as one
pub fn fetch_indentation(block: &Block) -> usize {
    block.leading_whitespace().chars().count()
}

/// Pixel width of the block's leading whitespace.
///
/// Each tab advances to the next multiple of `tab_stop_distance`; every other
/// whitespace character is one `space_width` wide.
pub fn calculate_block_margin(block: &Block, tab_stop_distance: f32, space_width: f32) -> f32 {
    block
        .leading_whitespace()
        .chars()
        .fold(0.0_f32, |x, ch| match ch {
            '\t' if tab_stop_distance > 0.0 => {
                ((x / tab_stop_distance).floor() + 1.0) * tab_stop_distance
            }
            _ => x + space_width,
        })
}

/// The blocks spanned by the cursor's selection, or the cursor block alone
/// when nothing is selected.
pub fn get_selected_block_range(doc: &Document, cursor: &TextCursor) -> BlockRange {
    let last = doc.last_block().index;
    let block_at = |offset: usize| doc.find_block(offset).map_or(last, |block| block.index);

    if !cursor.has_selection() {
        return BlockRange {
            first: block_at(cursor.position),
            count: 1,
        };
    }

    let first = block_at(cursor.selection_start());
    let end = block_at(cursor.selection_end());
    BlockRange {
        first,
        count: end - first + 1,
    }
}

/// Indent or unindent the blocks spanned by `cursor`.
///
/// Empty blocks are skipped when more than one block is involved. Returns
/// true if the text changed.
pub fn indent_blocks(
    doc: &mut Document,
    cursor: &TextCursor,
    use_tab: bool,
    spaces: usize,
    indent: bool,
) -> bool {
    let range = get_selected_block_range(doc, cursor);
    indent_block_range(doc, use_tab, spaces, range, indent)
}

fn indent_block_range(
    doc: &mut Document,
    use_tab: bool,
    spaces: usize,
    range: BlockRange,
    indent: bool,
) -> bool {
    log::debug!(
        "{} blocks {}..={} (use_tab={use_tab}, spaces={spaces})",
        if indent { "indent" } else { "unindent" },
        range.first,
        range.last()
    );

    let skip_empty = range.count > 1;
    let mut changed = false;
    for index in range.first..range.first + range.count {
        let patch = if indent {
            indent_block(doc, index, use_tab, spaces, skip_empty)
        } else {
            unindent_block(doc, index, spaces)
        };
        changed |= patch.text_changed;
    }
    changed
}

/// Insert one indent unit at the start of `block`
pub fn indent_block(
    doc: &mut Document,
    block: usize,
    use_tab: bool,
    spaces: usize,
    skip_empty: bool,
) -> Patch {
    doc.apply(Cmd::IndentBlock {
        block,
        unit: IndentUnit::new(use_tab, spaces),
        skip_empty,
    })
}

/// Remove one leading tab, or up to `spaces` leading spaces, from `block`
pub fn unindent_block(doc: &mut Document, block: usize, spaces: usize) -> Patch {
    doc.apply(Cmd::UnindentBlock { block, spaces })
}

/// True if the two offsets resolve to different blocks
pub fn cross_blocks(doc: &Document, start: usize, end: usize) -> bool {
    match (doc.find_block(start), doc.find_block(end)) {
        (Some(a), Some(b)) => a.index != b.index,
        _ => false,
    }
}

/// Extend `cursor` over the whole text of its block
pub fn select_block_under_cursor(doc: &Document, cursor: &mut TextCursor) {
    if let Some(block) = doc.find_block(cursor.position) {
        *cursor = TextCursor::with_selection(block.start(), block.end());
    }
}

/// Insert an empty block above or below the cursor block and put `cursor`
/// at the start of the new block. `None` if the cursor is outside the document.
pub fn insert_block(doc: &mut Document, cursor: &mut TextCursor, above: bool) -> Option<Patch> {
    let block = doc.find_block(cursor.position)?;

    let patch = doc.apply(Cmd::InsertBlock {
        block: block.index,
        above,
    });
    let new_start = if above { block.start() } else { block.end() + 1 };
    *cursor = TextCursor::new(new_start);
    Some(patch)
}

/// Delete a block with its separator. The sole block of a document is
/// cleared instead of removed.
pub fn remove_block(doc: &mut Document, block: usize) -> Patch {
    if doc.block_count() == 1 && block == 0 {
        log::debug!("remove_block: clearing the only block");
    }
    doc.apply(Cmd::RemoveBlock { block })
}

/// Plain text covered by the cursor's selection
pub fn selected_text(doc: &Document, cursor: &TextCursor) -> String {
    if !cursor.has_selection() {
        return String::new();
    }
    doc.slice(cursor.selection_range())
        .map(|text| text.into_owned())
        .unwrap_or_default()
}
