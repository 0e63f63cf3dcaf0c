pub mod blocks;
pub mod editing;
pub mod editor;
pub mod geometry;
pub mod input;
pub mod mime;
pub mod search;
pub mod selection;

// Re-export key types for easier usage
pub use editing::{Block, Cmd, Document, IndentUnit, MoveMode, Patch, Span, TextCursor};
pub use editor::{EditorEvent, TextEdit};
pub use geometry::{BlockLayout, PagePosition, TextMetrics, Viewport, ViewportRange};
pub use input::{
    InputMode, InputModeEditor, InputModeFactory, InputModeRegistry, Key, KeyEvent, Modifiers,
    NormalInputMode, NormalInputModeFactory,
};
pub use mime::{MimeData, MimeHandler};
pub use search::{FindFlags, SearchError};
pub use selection::{Selection, Selections};
pub use vtextedit_config::{CenterCursor, EditorConfig};
