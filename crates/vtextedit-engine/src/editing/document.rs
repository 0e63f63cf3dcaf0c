use std::borrow::Cow;
use std::ops::Range;

use xi_rope::delta::{DeltaElement, Transformer};
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::{Block, Cmd, Patch, Span, TextCursor};

/// The text document the editor core works on.
///
/// Document keeps:
///
/// ## 1. Single source of truth (xi-rope buffer)
/// - **Lossless storage**: entire text in one `xi_rope::Rope` buffer
/// - **Exact round-trip**: `to_bytes()` returns the bytes the document was built from
/// - **Efficient edits**: O(log n) insert/delete through `Delta`s
///
/// ## 2. Blocks
/// - A block is one `\n`-separated line; the document always has at least one
/// - Blocks are addressed by index, which only changes when a whole block is
///   inserted or removed, so "for `count` blocks from `first`" loops stay valid
///   across in-block edits
///
/// ## 3. Command-based editing
/// - Every change is a `Cmd` compiled to a `Delta` and applied by [`Document::apply`]
/// - The native cursor, and any tracked ranges, are transformed through each delta
///
/// ```rust
/// # use vtextedit_engine::editing::{Cmd, Document};
/// let mut doc = Document::new("alpha\nbeta");
/// doc.apply(Cmd::InsertText { at: 0, text: "> ".to_string() });
///
/// assert_eq!(doc.text(), "> alpha\nbeta");
/// assert_eq!(doc.block_count(), 2);
/// ```
#[derive(Clone)]
pub struct Document {
    /// xi-rope buffer containing the entire document as UTF-8 bytes
    pub(crate) buffer: Rope,
    /// Native edit cursor as byte offsets in buffer
    pub(crate) cursor: TextCursor,
    /// Incremented on every applied command
    pub(crate) version: u64,
    /// Version of the last command that actually changed the text
    pub(crate) revision_with_changes: u64,
    /// Ranges kept in step with the text, e.g. selections outside the cursor
    pub(crate) tracked: Vec<Range<usize>>,
}

impl Document {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            cursor: TextCursor::default(),
            version: 0,
            revision_with_changes: 0,
            tracked: Vec::new(),
        }
    }

    /// Create a new document from raw bytes
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::new(text))
    }

    /// Get the document's content as raw bytes (exact round-trip)
    pub fn to_bytes(&self) -> Vec<u8> {
        self.buffer.to_string().into_bytes()
    }

    /// Apply a command to the document.
    ///
    /// The command is compiled to a delta against the current buffer, the
    /// delta is applied, and the cursor is carried through it. Commands that
    /// address missing blocks or invalid ranges compile to an identity delta;
    /// they still bump the version but leave `text_changed` false.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let delta = self.compile_command(&cmd);

        // Inserted ranges, in post-edit coordinates
        let mut changed = Vec::new();
        let mut new_pos = 0;
        for op in delta.els.iter() {
            match op {
                DeltaElement::Copy(from, to) => {
                    new_pos += to - from;
                }
                DeltaElement::Insert(inserted) => {
                    let end = new_pos + inserted.len();
                    changed.push(new_pos..end);
                    new_pos = end;
                }
            }
        }

        let old_len = self.buffer.len();
        self.buffer = delta.apply(&self.buffer);
        let text_changed = !changed.is_empty() || self.buffer.len() != old_len;

        self.cursor = transform_cursor(self.cursor, &delta);
        for range in self.tracked.iter_mut() {
            *range = transform_range(range.clone(), &delta);
        }
        self.version += 1;
        if text_changed {
            self.revision_with_changes = self.version;
        }

        log::trace!(
            "applied {cmd:?}: version={} text_changed={text_changed}",
            self.version
        );

        Patch {
            changed,
            new_cursor: self.cursor,
            version: self.version,
            text_changed,
        }
    }

    pub fn cursor(&self) -> TextCursor {
        self.cursor
    }

    /// Install a new native cursor, clamped to the document
    pub fn set_cursor(&mut self, cursor: TextCursor) {
        self.cursor = cursor.clamped(self.len());
    }

    /// Replace the ranges carried through later edits
    pub fn set_tracked_ranges(&mut self, ranges: Vec<Range<usize>>) {
        self.tracked = ranges;
    }

    pub fn tracked_ranges(&self) -> &[Range<usize>] {
        &self.tracked
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn revision_with_changes(&self) -> u64 {
        self.revision_with_changes
    }

    pub fn text(&self) -> String {
        self.buffer.to_string()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.len() == 0
    }

    /// Text over `[range.start, range.end)`, or `None` when the range is
    /// inverted, out of bounds, or splits a character
    pub fn slice(&self, range: Range<usize>) -> Option<Cow<'_, str>> {
        if range.start > range.end
            || !self.is_char_boundary(range.start)
            || !self.is_char_boundary(range.end)
        {
            return None;
        }
        Some(self.buffer.slice_to_cow(range))
    }

    /// True if `offset` is within `[0, len]` and not inside a multi-byte character
    pub fn is_char_boundary(&self, offset: usize) -> bool {
        if offset > self.len() {
            return false;
        }
        self.find_block(offset)
            .is_some_and(|block| block.text.is_char_boundary(offset - block.start()))
    }

    pub fn block_count(&self) -> usize {
        self.buffer.line_of_offset(self.buffer.len()) + 1
    }

    pub fn block(&self, index: usize) -> Option<Block> {
        let count = self.block_count();
        if index >= count {
            return None;
        }

        let start = self.buffer.offset_of_line(index);
        let end = if index + 1 < count {
            // Stop before the separator
            self.buffer.offset_of_line(index + 1) - 1
        } else {
            self.buffer.len()
        };

        Some(Block {
            index,
            span: Span::new(start, end),
            text: self.buffer.slice_to_cow(start..end).into_owned(),
        })
    }

    /// The block containing `offset`; the document end resolves to the last block
    pub fn find_block(&self, offset: usize) -> Option<Block> {
        if offset > self.len() {
            return None;
        }
        self.block(self.buffer.line_of_offset(offset))
    }

    pub fn first_block(&self) -> Block {
        self.block(0).unwrap_or_else(|| Block {
            index: 0,
            span: Span::default(),
            text: String::new(),
        })
    }

    pub fn last_block(&self) -> Block {
        let last = self.block_count() - 1;
        self.block(last).unwrap_or_else(|| self.first_block())
    }

    pub fn blocks(&self) -> impl Iterator<Item = Block> + '_ {
        (0..self.block_count()).filter_map(|index| self.block(index))
    }

    // Forward declaration for the compiler implemented in the commands module
    pub(crate) fn compile_command(&self, cmd: &Cmd) -> Delta<RopeInfo> {
        crate::editing::commands::compile_command(self, cmd)
    }
}

/// Carry a cursor through a delta. A cursor sitting on an insertion point
/// ends up after the inserted text.
fn transform_cursor(cursor: TextCursor, delta: &Delta<RopeInfo>) -> TextCursor {
    // Transformer walks the delta forward, so feed it ascending offsets
    let mut transformer = Transformer::new(delta);
    let start = transformer.transform(cursor.selection_start(), true);
    let end = transformer.transform(cursor.selection_end(), true);

    if cursor.anchor <= cursor.position {
        TextCursor::with_selection(start, end)
    } else {
        TextCursor::with_selection(end, start)
    }
}

fn transform_range(range: Range<usize>, delta: &Delta<RopeInfo>) -> Range<usize> {
    let mut transformer = Transformer::new(delta);
    let start = transformer.transform(range.start, true);
    let end = transformer.transform(range.end.max(range.start), true);
    start..end
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("text", &self.buffer.to_string())
            .field("cursor", &self.cursor)
            .field("version", &self.version)
            .finish()
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool {
        // Compare buffer content as strings; ropes with equal text may differ in shape
        self.buffer.to_string() == other.buffer.to_string()
            && self.cursor == other.cursor
            && self.version == other.version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    // ============ Basic document tests ============

    #[test]
    fn test_document_from_bytes_valid_utf8() {
        let text = "Hello World\n\nThis is a test document.";

        let doc = Document::from_bytes(text.as_bytes()).expect("valid UTF-8");

        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.version(), 0);
        assert_eq!(doc.cursor(), TextCursor::new(0));
    }

    #[test]
    fn test_document_from_bytes_invalid_utf8() {
        let invalid_bytes = vec![0xFF, 0xFE, 0xFD];

        assert!(Document::from_bytes(&invalid_bytes).is_err());
    }

    #[test]
    fn test_document_with_windows_line_endings() {
        let text = "Line 1\r\nLine 2\r\nLine 3";
        let doc = Document::new(text);

        // \r stays part of the block text
        assert_eq!(doc.to_bytes(), text.as_bytes());
        assert_eq!(doc.block(0).unwrap().text, "Line 1\r");
        assert_eq!(doc.block_count(), 3);
    }

    // ============ Block lookup tests ============

    #[test]
    fn test_empty_document_has_one_block() {
        let doc = Document::new("");

        assert_eq!(doc.block_count(), 1);
        let block = doc.block(0).unwrap();
        assert_eq!(block.span, Span::new(0, 0));
        assert_eq!(block.text, "");
    }

    #[test]
    fn test_trailing_newline_yields_empty_last_block() {
        let doc = Document::new("one\ntwo\n");

        assert_eq!(doc.block_count(), 3);
        assert_eq!(doc.block(1).unwrap().span, Span::new(4, 7));
        assert_eq!(doc.block(2).unwrap().span, Span::new(8, 8));
        assert!(doc.block(3).is_none());
    }

    #[test]
    fn test_find_block_by_offset() {
        let doc = Document::new("one\ntwo\nthree");

        assert_eq!(doc.find_block(0).unwrap().index, 0);
        // The separator position belongs to the block it ends
        assert_eq!(doc.find_block(3).unwrap().index, 0);
        assert_eq!(doc.find_block(4).unwrap().index, 1);
        assert_eq!(doc.find_block(13).unwrap().index, 2);
        assert!(doc.find_block(14).is_none());
    }

    #[test]
    fn test_slice_rejects_split_characters() {
        let doc = Document::new("héllo");

        assert_eq!(doc.slice(0..1).as_deref(), Some("h"));
        assert!(doc.slice(0..2).is_none());
        assert_eq!(doc.slice(0..3).as_deref(), Some("hé"));
        assert!(doc.slice(4..2).is_none());
        assert!(doc.slice(0..99).is_none());
    }

    // ============ Apply tests ============

    #[test]
    fn test_apply_reports_inserted_range_and_version() {
        let mut doc = Document::new("Hello World");

        let patch = doc.apply(Cmd::InsertText {
            at: 5,
            text: " Beautiful".to_string(),
        });

        assert_eq!(doc.text(), "Hello Beautiful World");
        assert_eq!(patch.changed, vec![5..15]);
        assert_eq!(patch.version, 1);
        assert!(patch.text_changed);
        assert_eq!(doc.revision_with_changes(), 1);
    }

    #[test]
    fn test_identity_command_keeps_revision_with_changes() {
        let mut doc = Document::new("text");

        let patch = doc.apply(Cmd::DeleteRange { range: 10..20 });

        assert!(!patch.text_changed);
        assert_eq!(doc.version(), 1);
        assert_eq!(doc.revision_with_changes(), 0);
        assert_eq!(doc.text(), "text");
    }

    #[test]
    fn test_cursor_at_insertion_point_moves_after_text() {
        let mut doc = Document::new("abc");
        doc.set_cursor(TextCursor::new(1));

        doc.apply(Cmd::InsertText {
            at: 1,
            text: "XY".to_string(),
        });

        assert_eq!(doc.cursor(), TextCursor::new(3));
    }

    #[test]
    fn test_backwards_selection_keeps_direction_through_edit() {
        let mut doc = Document::new("0123456789");
        doc.set_cursor(TextCursor::with_selection(8, 4));

        doc.apply(Cmd::DeleteRange { range: 0..2 });

        assert_eq!(doc.cursor(), TextCursor::with_selection(6, 2));
    }

    #[test]
    fn test_tracked_ranges_follow_edits() {
        let mut doc = Document::new("one\ntwo\nthree");
        doc.set_tracked_ranges(vec![5..9, 0..3]);

        doc.apply(Cmd::InsertText {
            at: 4,
            text: "\t".to_string(),
        });
        doc.apply(Cmd::DeleteRange { range: 0..2 });

        assert_eq!(doc.text(), "e\n\ttwo\nthree");
        assert_eq!(doc.tracked_ranges(), &[4..8, 0..1]);
    }

    #[test]
    fn test_set_cursor_clamps_to_document() {
        let mut doc = Document::new("abc");
        doc.set_cursor(TextCursor::with_selection(1, 50));

        assert_eq!(doc.cursor(), TextCursor::with_selection(1, 3));
    }
}
