use crate::editing::Span;

/// A snapshot of one block (a `\n`-separated line) of the document.
///
/// Blocks are addressed by index; the value is not updated by later edits,
/// look the block up again after mutating the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub index: usize,
    /// Byte span of the block text, excluding the trailing separator
    pub span: Span,
    pub text: String,
}

impl Block {
    pub fn start(&self) -> usize {
        self.span.start
    }

    pub fn end(&self) -> usize {
        self.span.end
    }

    pub fn len(&self) -> usize {
        self.span.len()
    }

    pub fn is_empty(&self) -> bool {
        self.span.is_empty()
    }

    /// True if the offset lies within the block or at its end
    pub fn contains(&self, offset: usize) -> bool {
        self.span.touches(offset)
    }

    /// The run of whitespace characters the block text starts with
    pub fn leading_whitespace(&self) -> &str {
        let trimmed = self.text.trim_start();
        &self.text[..self.text.len() - trimmed.len()]
    }
}
