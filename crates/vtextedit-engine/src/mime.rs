//! Clipboard and drag-and-drop payloads.
//!
//! A host can install a [`MimeHandler`] to intercept pastes before the
//! editor's default plain-text insertion runs.

use crate::input::InputModeEditor;

/// A clipboard payload in the formats the editor understands
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MimeData {
    pub text: Option<String>,
    pub html: Option<String>,
    pub urls: Vec<String>,
}

impl MimeData {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn has_text(&self) -> bool {
        self.text.is_some()
    }

    pub fn has_html(&self) -> bool {
        self.html.is_some()
    }

    pub fn has_urls(&self) -> bool {
        !self.urls.is_empty()
    }
}

pub trait MimeHandler {
    /// Whether `source` may be inserted; `None` defers to the default check
    fn can_insert(&self, source: &MimeData) -> Option<bool>;

    /// Insert `source`. Returns false to let the default insertion run.
    fn insert(&mut self, editor: &mut dyn InputModeEditor, source: &MimeData) -> bool;
}
