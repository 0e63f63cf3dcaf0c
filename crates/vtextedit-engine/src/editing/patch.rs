use crate::editing::TextCursor;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Byte ranges of inserted text, in post-edit coordinates
    pub changed: Vec<std::ops::Range<usize>>,
    pub new_cursor: TextCursor,
    pub version: u64,
    /// False when the command compiled to an identity edit
    pub text_changed: bool,
}
