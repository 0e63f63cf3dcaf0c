use std::ops::Range;

use xi_rope::delta::Builder;
use xi_rope::{Delta, Rope, RopeInfo};

use crate::editing::Document;

/// One indent unit inserted at a block start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentUnit {
    Tab,
    Spaces(usize),
}

impl IndentUnit {
    pub fn new(use_tab: bool, spaces: usize) -> Self {
        if use_tab {
            IndentUnit::Tab
        } else {
            IndentUnit::Spaces(spaces)
        }
    }

    pub fn as_text(self) -> String {
        match self {
            IndentUnit::Tab => "\t".to_string(),
            IndentUnit::Spaces(n) => " ".repeat(n),
        }
    }
}

/// Edit commands understood by [`Document::apply`]
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    InsertText {
        at: usize,
        text: String,
    },
    DeleteRange {
        range: Range<usize>,
    },
    ReplaceRange {
        range: Range<usize>,
        text: String,
    },
    /// Insert one indent unit at the block start. With `skip_empty`, blocks
    /// holding only whitespace are left alone.
    IndentBlock {
        block: usize,
        unit: IndentUnit,
        skip_empty: bool,
    },
    /// Remove one leading tab, or up to `spaces` leading spaces
    UnindentBlock {
        block: usize,
        spaces: usize,
    },
    /// Insert an empty block directly above or below `block`
    InsertBlock {
        block: usize,
        above: bool,
    },
    /// Delete a block with its separator. The sole block is cleared instead.
    RemoveBlock {
        block: usize,
    },
    SetBlockText {
        block: usize,
        text: String,
    },
}

/// Compile a command into a delta against the document's current buffer.
/// Commands that don't apply compile to the identity delta.
pub(crate) fn compile_command(doc: &Document, cmd: &Cmd) -> Delta<RopeInfo> {
    let len = doc.buffer.len();
    let mut builder = Builder::new(len);

    match cmd {
        Cmd::InsertText { at, text } => {
            if doc.is_char_boundary(*at) && !text.is_empty() {
                builder.replace(*at..*at, Rope::from(text.as_str()));
            }
        }
        Cmd::DeleteRange { range } => {
            if valid_range(doc, range) && !range.is_empty() {
                builder.delete(range.clone());
            }
        }
        Cmd::ReplaceRange { range, text } => {
            if valid_range(doc, range) && !(range.is_empty() && text.is_empty()) {
                builder.replace(range.clone(), Rope::from(text.as_str()));
            }
        }
        Cmd::IndentBlock {
            block,
            unit,
            skip_empty,
        } => {
            if let Some(block) = doc.block(*block) {
                let unit_text = unit.as_text();
                let skip = *skip_empty && block.text.trim().is_empty();
                if !skip && !unit_text.is_empty() {
                    builder.replace(block.start()..block.start(), Rope::from(unit_text));
                }
            }
        }
        Cmd::UnindentBlock { block, spaces } => {
            if let Some(block) = doc.block(*block) {
                let remove = if block.text.starts_with('\t') {
                    1
                } else {
                    block
                        .text
                        .bytes()
                        .take(*spaces)
                        .take_while(|b| *b == b' ')
                        .count()
                };
                if remove > 0 {
                    builder.delete(block.start()..block.start() + remove);
                }
            }
        }
        Cmd::InsertBlock { block, above } => {
            if let Some(block) = doc.block(*block) {
                let at = if *above { block.start() } else { block.end() };
                builder.replace(at..at, Rope::from("\n"));
            }
        }
        Cmd::RemoveBlock { block } => {
            if let Some(block) = doc.block(*block) {
                let count = doc.block_count();
                let range = if count == 1 {
                    block.span.to_range()
                } else if block.index + 1 == count {
                    // Last block: take the separator before it
                    block.start() - 1..block.end()
                } else {
                    block.start()..block.end() + 1
                };
                if !range.is_empty() {
                    builder.delete(range);
                }
            }
        }
        Cmd::SetBlockText { block, text } => {
            if let Some(block) = doc.block(*block) {
                if block.text != *text {
                    builder.replace(block.span.to_range(), Rope::from(text.as_str()));
                }
            }
        }
    }

    builder.build()
}

fn valid_range(doc: &Document, range: &Range<usize>) -> bool {
    range.start <= range.end && doc.is_char_boundary(range.start) && doc.is_char_boundary(range.end)
}
