//! Pluggable input modes.
//!
//! An input mode sees every key press before the editor's default handling
//! and reports whether it consumed the event. Modes reach the editor only
//! through [`InputModeEditor`], so they hold no editor state of their own.

pub mod key;
pub mod registry;

pub use key::{Key, KeyEvent, Modifiers};
pub use registry::InputModeRegistry;

use crate::editing::{Cmd, Document, Patch, TextCursor};
use crate::selection::{Selection, Selections};

/// What an input mode may see and change in the editor
pub trait InputModeEditor {
    fn document(&self) -> &Document;

    fn cursor(&self) -> TextCursor;

    fn set_cursor(&mut self, cursor: TextCursor);

    fn selections(&self) -> &Selections;

    fn set_overridden_selection(&mut self, start: usize, end: usize);

    fn clear_overridden_selection(&mut self);

    fn set_additional_selections(&mut self, selections: Vec<Selection>);

    /// Edit the document through the editor so cursor and change tracking
    /// stay in sync
    fn apply(&mut self, cmd: Cmd) -> Patch;
}

pub trait InputMode {
    fn name(&self) -> &str;

    /// Returns true if the event was handled and default handling must not run
    fn key_press(&mut self, editor: &mut dyn InputModeEditor, event: &KeyEvent) -> bool;

    fn activate(&mut self, _editor: &mut dyn InputModeEditor) {}

    fn deactivate(&mut self, _editor: &mut dyn InputModeEditor) {}
}

pub trait InputModeFactory {
    fn create_input_mode(&self) -> Box<dyn InputMode>;

    fn name(&self) -> &str;

    fn description(&self) -> &str;
}

pub const NORMAL_INPUT_MODE: &str = "normal";

/// Plain editing: every key goes to the default handling
#[derive(Debug, Default)]
pub struct NormalInputMode;

impl InputMode for NormalInputMode {
    fn name(&self) -> &str {
        NORMAL_INPUT_MODE
    }

    fn key_press(&mut self, _editor: &mut dyn InputModeEditor, _event: &KeyEvent) -> bool {
        false
    }
}

#[derive(Debug, Default)]
pub struct NormalInputModeFactory;

impl InputModeFactory for NormalInputModeFactory {
    fn create_input_mode(&self) -> Box<dyn InputMode> {
        Box::new(NormalInputMode)
    }

    fn name(&self) -> &str {
        NORMAL_INPUT_MODE
    }

    fn description(&self) -> &str {
        "Normal input mode"
    }
}
