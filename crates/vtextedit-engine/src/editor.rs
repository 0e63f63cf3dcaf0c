//! The editor facade a host application drives.
//!
//! `TextEdit` ties the document, the selection model, block layout and the
//! installed input mode together. Every edit goes through [`TextEdit::apply`]
//! (or a helper built on it) so the selections, layout and change events
//! stay in step with the document.

use std::ops::Range;

use vtextedit_config::{CenterCursor, EditorConfig};

use crate::blocks;
use crate::editing::{Cmd, Document, MoveMode, Patch, TextCursor};
use crate::geometry::{
    self, BlockLayout, PagePosition, TextMetrics, Viewport, ViewportRange, display_columns,
};
use crate::input::{InputMode, InputModeEditor, InputModeRegistry, Key, KeyEvent};
use crate::mime::{MimeData, MimeHandler};
use crate::search::{self, FindFlags, SearchError};
use crate::selection::{Selection, Selections};

/// Notifications for the host, drained with [`TextEdit::drain_events`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorEvent {
    /// The cursor moved to a different block
    CursorLineChanged,
    /// An edit changed the text
    ContentsChanged,
    Resized,
}

pub struct TextEdit {
    doc: Document,
    selections: Selections,
    metrics: TextMetrics,
    layout: BlockLayout,
    viewport: Viewport,
    input_mode: Option<Box<dyn InputMode>>,
    mime_handler: Option<Box<dyn MimeHandler>>,
    events: Vec<EditorEvent>,
    cursor_block: usize,
    center_cursor: CenterCursor,
    expand_tab: bool,
    tab_stop_width_in_spaces: usize,
    /// Document revision of the last text-changing edit
    last_revision_with_changes: u64,
}

impl TextEdit {
    pub fn new(text: &str) -> Self {
        Self::with_config(text, &EditorConfig::default())
    }

    pub fn with_config(text: &str, config: &EditorConfig) -> Self {
        let doc = Document::new(text);
        let metrics = TextMetrics::new(config.line_height, config.char_width);
        let tab_stop_width_in_spaces = config.tab_stop_width_in_spaces.max(1);
        let viewport = Viewport::default();
        let layout = BlockLayout::build(
            &doc,
            &metrics,
            wrap_width(&viewport),
            tab_stop_width_in_spaces,
        );
        let last_revision_with_changes = doc.revision_with_changes();

        let mut edit = Self {
            doc,
            selections: Selections::new(),
            metrics,
            layout,
            viewport,
            input_mode: None,
            mime_handler: None,
            events: Vec::new(),
            cursor_block: 0,
            center_cursor: config.center_cursor,
            expand_tab: config.expand_tab,
            tab_stop_width_in_spaces,
            last_revision_with_changes,
        };
        let mode = InputModeRegistry::default().create(&config.input_mode);
        edit.set_input_mode(mode);
        edit
    }

    pub fn apply_config(&mut self, config: &EditorConfig) {
        self.expand_tab = config.expand_tab;
        self.center_cursor = config.center_cursor;
        self.tab_stop_width_in_spaces = config.tab_stop_width_in_spaces.max(1);
        self.set_metrics(TextMetrics::new(config.line_height, config.char_width));
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn text(&self) -> String {
        self.doc.text()
    }

    // ============ Cursor ============

    pub fn cursor(&self) -> TextCursor {
        self.doc.cursor()
    }

    /// Install a new native cursor and run cursor-change handling
    pub fn set_cursor(&mut self, cursor: TextCursor) {
        self.doc.set_cursor(cursor);
        self.handle_cursor_position_change();
    }

    pub fn move_cursor(&mut self, position: usize, mode: MoveMode) {
        let mut cursor = self.doc.cursor();
        cursor.move_to(position, mode);
        self.set_cursor(cursor);
    }

    /// Index of the block holding the cursor
    pub fn cursor_block(&self) -> usize {
        self.cursor_block
    }

    fn handle_cursor_position_change(&mut self) {
        let cursor = self.doc.cursor();
        self.selections.set_primary(Selection::from(cursor));

        let block = self
            .doc
            .find_block(cursor.position)
            .map_or(self.cursor_block, |block| block.index);
        if block != self.cursor_block {
            self.cursor_block = block;
            self.events.push(EditorEvent::CursorLineChanged);
            self.check_center_cursor();
        }
    }

    /// Apply the centre-cursor policy to the cursor block now
    pub fn check_center_cursor(&mut self) {
        let center = match self.center_cursor {
            CenterCursor::NeverCenter => false,
            CenterCursor::AlwaysCenter => true,
            CenterCursor::CenterOnBottom => {
                let half = self.viewport.height / 2.0;
                self.layout
                    .block_top(self.cursor_block)
                    .is_some_and(|top| top - self.viewport.scroll_y > half)
            }
        };

        if center {
            self.scroll_block_in_page(self.cursor_block, PagePosition::Center, 0.0);
        }
    }

    // ============ Settings ============

    pub fn center_cursor(&self) -> CenterCursor {
        self.center_cursor
    }

    pub fn set_center_cursor(&mut self, center_cursor: CenterCursor) {
        self.center_cursor = center_cursor;
    }

    pub fn expand_tab(&self) -> bool {
        self.expand_tab
    }

    pub fn set_expand_tab(&mut self, enable: bool) {
        self.expand_tab = enable;
    }

    pub fn tab_stop_width_in_spaces(&self) -> usize {
        self.tab_stop_width_in_spaces
    }

    pub fn set_tab_stop_width_in_spaces(&mut self, spaces: usize) {
        self.tab_stop_width_in_spaces = spaces.max(1);
        self.refresh_layout(true);
    }

    pub fn metrics(&self) -> TextMetrics {
        self.metrics
    }

    pub fn set_metrics(&mut self, metrics: TextMetrics) {
        self.metrics = metrics;
        self.refresh_layout(true);
    }

    /// Document revision of the last edit that changed the text
    pub fn contents_seq(&self) -> u64 {
        self.last_revision_with_changes
    }

    pub fn drain_events(&mut self) -> Vec<EditorEvent> {
        std::mem::take(&mut self.events)
    }

    // ============ Editing ============

    /// Apply a command to the document and update dependent state
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let patch = self.doc.apply(cmd);
        self.after_edit();
        patch
    }

    fn after_edit(&mut self) {
        self.refresh_layout(false);
        self.selections.follow_tracked_ranges(self.doc.tracked_ranges());
        self.track_selections();

        let revision = self.doc.revision_with_changes();
        if revision != self.last_revision_with_changes {
            self.last_revision_with_changes = revision;
            self.events.push(EditorEvent::ContentsChanged);
        }

        self.handle_cursor_position_change();
    }

    fn refresh_layout(&mut self, force: bool) {
        let wrap_width = wrap_width(&self.viewport);
        if force || self.layout.needs_rebuild(&self.doc, &self.metrics, wrap_width) {
            self.layout = BlockLayout::build(
                &self.doc,
                &self.metrics,
                wrap_width,
                self.tab_stop_width_in_spaces,
            );
            let scroll_y = self.viewport.scroll_y;
            self.viewport.scroll_to(&self.layout, scroll_y);
        }
    }

    /// Replace the active selection (or insert at the cursor) with `text` and
    /// put the cursor after it. Clears an overridden selection.
    pub fn insert_text(&mut self, text: &str) {
        let range = self.active_range();
        self.clear_overridden_selection();

        let patch = self.doc.apply(Cmd::ReplaceRange {
            range: range.clone(),
            text: text.to_string(),
        });
        if patch.text_changed {
            self.doc.set_cursor(TextCursor::new(range.start + text.len()));
        }
        self.after_edit();
    }

    /// Indent or unindent the blocks spanned by the active selection, or the
    /// cursor block when nothing is selected
    pub fn indent_blocks(&mut self, use_tab: bool, spaces: usize, indent: bool) {
        let cursor = self.active_cursor();
        blocks::indent_blocks(&mut self.doc, &cursor, use_tab, spaces, indent);
        self.after_edit();
    }

    /// Blocks spanned by the active selection, or the cursor block alone
    pub fn selected_block_range(&self) -> blocks::BlockRange {
        blocks::get_selected_block_range(&self.doc, &self.active_cursor())
    }

    /// Insert an empty block above or below the cursor block and move the
    /// cursor into it
    pub fn insert_block(&mut self, above: bool) {
        let mut cursor = self.doc.cursor();
        if blocks::insert_block(&mut self.doc, &mut cursor, above).is_some() {
            self.doc.set_cursor(cursor);
        }
        self.after_edit();
    }

    /// Remove a block; the only block of the document is cleared instead.
    /// Returns false for a missing block.
    pub fn remove_block(&mut self, block: usize) -> bool {
        if block >= self.doc.block_count() {
            log::debug!("remove_block: no block {block}");
            return false;
        }
        blocks::remove_block(&mut self.doc, block);
        self.after_edit();
        true
    }

    pub fn select_block_under_cursor(&mut self) {
        let mut cursor = self.doc.cursor();
        blocks::select_block_under_cursor(&self.doc, &mut cursor);
        self.set_cursor(cursor);
    }

    /// Pixel width of a block's leading whitespace
    pub fn block_margin(&self, block: usize) -> Option<f32> {
        let block = self.doc.block(block)?;
        let tab_stop_distance = self.metrics.tab_stop_distance(self.tab_stop_width_in_spaces);
        Some(blocks::calculate_block_margin(
            &block,
            tab_stop_distance,
            self.metrics.space_width,
        ))
    }

    // ============ Selection ============

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn selection(&self) -> Selection {
        self.selections.selection()
    }

    pub fn has_selection(&self) -> bool {
        self.selections.has_selection()
    }

    /// Text of the active selection; empty when nothing is selected
    pub fn selected_text(&self) -> String {
        let selection = self.selection();
        if !selection.is_valid() {
            return String::new();
        }
        self.text_by_range(selection.start, selection.end)
    }

    /// Text over `[start, end)`; empty for an invalid range
    pub fn text_by_range(&self, start: usize, end: usize) -> String {
        if start > end {
            return String::new();
        }
        self.doc
            .slice(start..end)
            .map(|text| text.into_owned())
            .unwrap_or_default()
    }

    pub fn set_overridden_selection(&mut self, start: usize, end: usize) {
        self.selections.set_overridden(start, end);
        self.track_selections();
    }

    pub fn clear_overridden_selection(&mut self) {
        self.selections.clear_overridden();
        self.track_selections();
    }

    /// Replace the block-mode selections; invalid ones are dropped
    pub fn set_additional_selections(&mut self, selections: Vec<Selection>) {
        self.selections.set_additional(selections);
        self.track_selections();
    }

    pub fn clear_additional_selections(&mut self) {
        self.selections.clear_additional();
        self.track_selections();
    }

    /// Let the document carry the non-cursor selections through edits
    fn track_selections(&mut self) {
        self.doc.set_tracked_ranges(self.selections.tracked_ranges());
    }

    /// The active selection if it can be edited: non-empty, inside the
    /// document and on character boundaries
    fn editable_selection(&self) -> Option<Selection> {
        let selection = self.selection();
        let editable = selection.is_valid()
            && self.doc.is_char_boundary(selection.start)
            && self.doc.is_char_boundary(selection.end);
        if !editable && selection.is_valid() {
            log::debug!("Ignoring selection {selection:?} outside the document");
        }
        editable.then_some(selection)
    }

    fn active_range(&self) -> Range<usize> {
        match self.editable_selection() {
            Some(selection) => selection.range(),
            None => {
                let position = self.doc.cursor().position;
                position..position
            }
        }
    }

    fn active_cursor(&self) -> TextCursor {
        match self.editable_selection() {
            Some(selection) => TextCursor::with_selection(selection.start, selection.end),
            None => TextCursor::new(self.doc.cursor().position),
        }
    }

    // ============ Search ============

    pub fn find_all_text(
        &self,
        text: &str,
        flags: FindFlags,
        start: usize,
        end: Option<usize>,
    ) -> Result<Vec<Range<usize>>, SearchError> {
        search::find_all_text(&self.doc, text, flags, start, end)
    }

    // ============ Geometry ============

    pub fn layout(&self) -> &BlockLayout {
        &self.layout
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.viewport.width = width.max(0.0);
        self.viewport.height = height.max(0.0);
        self.refresh_layout(true);
        self.events.push(EditorEvent::Resized);
    }

    pub fn scroll_to(&mut self, y: f32) -> bool {
        self.viewport.scroll_to(&self.layout, y)
    }

    /// Scroll without moving the cursor so `block` sits at `dest`
    pub fn scroll_block_in_page(&mut self, block: usize, dest: PagePosition, margin: f32) -> bool {
        geometry::scroll_block_in_page(&self.layout, &mut self.viewport, block, dest, margin)
    }

    pub fn first_visible_block(&self) -> usize {
        geometry::first_visible_block(&self.layout, &self.viewport)
    }

    pub fn last_visible_block(&self) -> usize {
        geometry::last_visible_block(&self.layout, &self.viewport)
    }

    pub fn visible_block_range(&self) -> ViewportRange {
        geometry::visible_block_range(&self.layout, &self.viewport)
    }

    pub fn content_offset_at_top(&self) -> f32 {
        geometry::content_offset_at_top(&self.layout, &self.viewport)
    }

    /// Block at document pixel row `y`
    pub fn find_block_by_y_position(&self, y: f32) -> Option<usize> {
        geometry::find_block_by_y_position(&self.layout, y)
    }

    // ============ Input ============

    pub fn input_mode_name(&self) -> Option<&str> {
        self.input_mode.as_deref().map(|mode| mode.name())
    }

    pub fn set_input_mode(&mut self, mut mode: Box<dyn InputMode>) {
        if let Some(mut old) = self.input_mode.take() {
            old.deactivate(self);
        }
        log::debug!("Installing input mode {:?}", mode.name());
        mode.activate(self);
        self.input_mode = Some(mode);
    }

    /// Offer the event to the input mode, then to the default handling.
    /// Returns true if anyone handled it.
    pub fn key_press(&mut self, event: KeyEvent) -> bool {
        if let Some(mut mode) = self.input_mode.take() {
            let handled = mode.key_press(self, &event);
            // The mode may have installed a replacement meanwhile
            if self.input_mode.is_none() {
                self.input_mode = Some(mode);
            }
            if handled {
                return true;
            }
        }
        self.handle_default_key_press(&event)
    }

    fn handle_default_key_press(&mut self, event: &KeyEvent) -> bool {
        if event.has_command_modifier() {
            return false;
        }

        let mode = if event.shift() {
            MoveMode::KeepAnchor
        } else {
            MoveMode::MoveAnchor
        };

        match event.key {
            Key::Tab if event.shift() => self.handle_key_back_tab(),
            Key::Tab => self.handle_key_tab(),
            Key::Backtab => self.handle_key_back_tab(),
            Key::Char(ch) => {
                let mut buf = [0u8; 4];
                self.insert_text(ch.encode_utf8(&mut buf));
                true
            }
            Key::Enter => {
                self.insert_text("\n");
                true
            }
            Key::Backspace => self.delete_char(false),
            Key::Delete => self.delete_char(true),
            Key::Left => {
                let target = self.prev_char_boundary(self.doc.cursor().position);
                self.move_cursor(target, mode);
                true
            }
            Key::Right => {
                let target = self.next_char_boundary(self.doc.cursor().position);
                self.move_cursor(target, mode);
                true
            }
            Key::Home | Key::End => {
                let position = self.doc.cursor().position;
                if let Some(block) = self.doc.find_block(position) {
                    let target = if event.key == Key::Home {
                        block.start()
                    } else {
                        block.end()
                    };
                    self.move_cursor(target, mode);
                }
                true
            }
            Key::Up => {
                self.move_vertically(false, mode);
                true
            }
            Key::Down => {
                self.move_vertically(true, mode);
                true
            }
            Key::Escape => false,
        }
    }

    /// Tab: indent when the selection spans blocks, otherwise insert a tab
    /// or spaces up to the next tab stop
    fn handle_key_tab(&mut self) -> bool {
        let crosses = self
            .editable_selection()
            .is_some_and(|s| blocks::cross_blocks(&self.doc, s.start, s.end));
        if crosses {
            self.indent_blocks(!self.expand_tab, self.tab_stop_width_in_spaces, true);
            return true;
        }

        if !self.expand_tab {
            self.insert_text("\t");
            return true;
        }

        let at = self.active_range().start;
        let column = self
            .doc
            .find_block(at)
            .and_then(|block| {
                block
                    .text
                    .get(..at - block.start())
                    .map(|prefix| display_columns(prefix, self.tab_stop_width_in_spaces))
            })
            .unwrap_or(0);
        let spaces = self.tab_stop_width_in_spaces - column % self.tab_stop_width_in_spaces;
        self.insert_text(&" ".repeat(spaces));
        true
    }

    fn handle_key_back_tab(&mut self) -> bool {
        self.indent_blocks(!self.expand_tab, self.tab_stop_width_in_spaces, false);
        true
    }

    fn delete_char(&mut self, forward: bool) -> bool {
        let range = match self.editable_selection() {
            Some(selection) => selection.range(),
            None => {
                let position = self.doc.cursor().position;
                if forward {
                    position..self.next_char_boundary(position)
                } else {
                    self.prev_char_boundary(position)..position
                }
            }
        };

        if range.is_empty() {
            return false;
        }
        self.clear_overridden_selection();
        let patch = self.doc.apply(Cmd::DeleteRange {
            range: range.clone(),
        });
        if patch.text_changed {
            self.doc.set_cursor(TextCursor::new(range.start));
        }
        self.after_edit();
        patch.text_changed
    }

    fn move_vertically(&mut self, down: bool, mode: MoveMode) {
        let position = self.doc.cursor().position;
        let Some(block) = self.doc.find_block(position) else {
            return;
        };
        let target_index = if down {
            block.index + 1
        } else if block.index == 0 {
            return;
        } else {
            block.index - 1
        };
        let Some(target) = self.doc.block(target_index) else {
            return;
        };

        let column = block
            .text
            .get(..position - block.start())
            .map_or(0, |prefix| prefix.chars().count());
        let offset = target
            .text
            .char_indices()
            .nth(column)
            .map_or(target.len(), |(offset, _)| offset);
        self.move_cursor(target.start() + offset, mode);
    }

    fn prev_char_boundary(&self, position: usize) -> usize {
        match self.doc.find_block(position) {
            Some(block) if position > block.start() => block
                .text
                .get(..position - block.start())
                .and_then(|prefix| prefix.chars().next_back())
                .map_or(position, |ch| position - ch.len_utf8()),
            // Step over the separator into the previous block
            Some(_) => position.saturating_sub(1),
            None => self.doc.len(),
        }
    }

    fn next_char_boundary(&self, position: usize) -> usize {
        match self.doc.find_block(position) {
            Some(block) if position < block.end() => block
                .text
                .get(position - block.start()..)
                .and_then(|suffix| suffix.chars().next())
                .map_or(position, |ch| position + ch.len_utf8()),
            Some(block) if block.index + 1 < self.doc.block_count() => position + 1,
            Some(_) => position,
            None => self.doc.len(),
        }
    }

    // ============ Clipboard ============

    pub fn set_mime_handler(&mut self, handler: Box<dyn MimeHandler>) {
        self.mime_handler = Some(handler);
    }

    pub fn clear_mime_handler(&mut self) {
        self.mime_handler = None;
    }

    pub fn can_insert_from_mime_data(&self, source: &MimeData) -> bool {
        self.mime_handler
            .as_deref()
            .and_then(|handler| handler.can_insert(source))
            .unwrap_or_else(|| source.has_text())
    }

    /// Paste `source`, letting the installed handler intercept it first
    pub fn insert_from_mime_data(&mut self, source: &MimeData) {
        if let Some(mut handler) = self.mime_handler.take() {
            let handled = handler.insert(self, source);
            if self.mime_handler.is_none() {
                self.mime_handler = Some(handler);
            }
            if handled {
                return;
            }
        }
        self.insert_from_mime_data_of_base(source);
    }

    /// Default paste: insert the plain text, replacing the active selection
    pub fn insert_from_mime_data_of_base(&mut self, source: &MimeData) {
        match &source.text {
            Some(text) => self.insert_text(text),
            None => log::debug!("Ignoring paste without text"),
        }
    }
}

fn wrap_width(viewport: &Viewport) -> f32 {
    // No width yet: lay out unwrapped
    if viewport.width > 0.0 {
        viewport.width
    } else {
        f32::INFINITY
    }
}

impl InputModeEditor for TextEdit {
    fn document(&self) -> &Document {
        &self.doc
    }

    fn cursor(&self) -> TextCursor {
        self.doc.cursor()
    }

    fn set_cursor(&mut self, cursor: TextCursor) {
        TextEdit::set_cursor(self, cursor);
    }

    fn selections(&self) -> &Selections {
        &self.selections
    }

    fn set_overridden_selection(&mut self, start: usize, end: usize) {
        TextEdit::set_overridden_selection(self, start, end);
    }

    fn clear_overridden_selection(&mut self) {
        TextEdit::clear_overridden_selection(self);
    }

    fn set_additional_selections(&mut self, selections: Vec<Selection>) {
        TextEdit::set_additional_selections(self, selections);
    }

    fn apply(&mut self, cmd: Cmd) -> Patch {
        TextEdit::apply(self, cmd)
    }
}

impl std::fmt::Debug for TextEdit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEdit")
            .field("doc", &self.doc)
            .field("selections", &self.selections)
            .field("viewport", &self.viewport)
            .field("input_mode", &self.input_mode_name())
            .field("cursor_block", &self.cursor_block)
            .finish_non_exhaustive()
    }
}
