/*!
 * # Editing Core Module
 *
 * The document the editor works on and the command pipeline that mutates it.
 *
 * ## Architecture Overview
 *
 * ### 1. Single Source of Truth: xi-rope Buffer
 * - The entire document is stored in a single **`xi_rope::Rope`** buffer
 * - Provides efficient insert/delete operations and **Delta** representation of edits
 * - **Lossless round-trip**: the buffer bytes are the document
 *
 * ### 2. Blocks as Indices
 * - A **Block** is one `\n`-separated line, addressed by its index
 * - Edits inside a block never renumber blocks; only `InsertBlock` and
 *   `RemoveBlock` do
 * - `Block` values are snapshots; look them up again after an edit
 *
 * ### 3. Command-Based Editing
 * - All edits are **Commands** (`Cmd` enum) compiled to **Deltas**
 * - Invalid commands (missing block, range off a char boundary) compile to
 *   the identity delta instead of failing
 * - The native **TextCursor** is carried through every delta
 *
 * ## Module Structure
 *
 * - **`document`**: `Document` with the rope buffer, block lookups and `apply`
 * - **`commands`**: `Cmd` enum and delta compilation
 * - **`block`**, **`span`**: block snapshots and byte spans
 * - **`cursor`**: the anchor/position edit cursor
 * - **`patch`**: edit result metadata including changed ranges and new cursor
 *
 * ## Usage Pattern
 *
 * ```rust
 * use vtextedit_engine::editing::*;
 *
 * let mut doc = Document::from_bytes(b"first\nsecond").unwrap();
 *
 * let patch = doc.apply(Cmd::IndentBlock {
 *     block: 1,
 *     unit: IndentUnit::Spaces(4),
 *     skip_empty: false,
 * });
 *
 * assert!(patch.text_changed);
 * assert_eq!(doc.text(), "first\n    second");
 * ```
 */

pub mod block;
pub mod commands;
pub mod cursor;
pub mod document;
pub mod patch;
pub mod span;

pub use block::Block;
pub use commands::{Cmd, IndentUnit};
pub use cursor::{MoveMode, TextCursor};
pub use document::Document;
pub use patch::Patch;
pub use span::Span;
