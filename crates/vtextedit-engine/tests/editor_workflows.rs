use pretty_assertions::assert_eq;
use rstest::rstest;
use vtextedit_engine::{
    CenterCursor, Cmd, EditorConfig, EditorEvent, FindFlags, InputMode, InputModeEditor, Key,
    KeyEvent, MimeData, MimeHandler, Modifiers, PagePosition, Selection, TextCursor, TextEdit,
};

/// Ctrl+B selects every non-empty block in block mode: the cursor block
/// becomes the overridden selection and the others become additional
/// selections.
struct BlockSelectMode;

impl InputMode for BlockSelectMode {
    fn name(&self) -> &str {
        "block-select"
    }

    fn key_press(&mut self, editor: &mut dyn InputModeEditor, event: &KeyEvent) -> bool {
        if event.key != Key::Char('b') || !event.modifiers.contains(Modifiers::CONTROL) {
            return false;
        }

        let position = editor.cursor().position;
        let mut others = Vec::new();
        let mut current = None;
        for block in editor.document().blocks() {
            if block.is_empty() {
                continue;
            }
            let selection = Selection::from(block.span.to_range());
            if block.contains(position) {
                current = Some(selection);
            } else {
                others.push(selection);
            }
        }

        if let Some(current) = current {
            editor.set_overridden_selection(current.start, current.end);
        }
        // Deliberately unsorted
        others.reverse();
        editor.set_additional_selections(others);
        true
    }
}

/// Pastes URLs as a bracketed list and leaves everything else to the editor
struct UrlPaste;

impl MimeHandler for UrlPaste {
    fn can_insert(&self, source: &MimeData) -> Option<bool> {
        source.has_urls().then_some(true)
    }

    fn insert(&mut self, editor: &mut dyn InputModeEditor, source: &MimeData) -> bool {
        if !source.has_urls() {
            return false;
        }
        let at = editor.cursor().position;
        editor.apply(Cmd::InsertText {
            at,
            text: format!("<{}>", source.urls.join(", ")),
        });
        true
    }
}

#[test]
fn overridden_selection_wins_until_cleared() {
    let mut edit = TextEdit::new("0123456789");
    edit.set_cursor(TextCursor::with_selection(0, 5));
    edit.set_overridden_selection(2, 4);

    assert_eq!(edit.selection(), Selection::new(2, 4));
    assert_eq!(edit.selected_text(), "23");

    edit.clear_overridden_selection();

    assert_eq!(edit.selection(), Selection::new(0, 5));
    assert_eq!(edit.selected_text(), "01234");
}

#[test]
fn input_mode_sees_keys_first_and_keeps_secondary_selections_sorted() {
    let mut edit = TextEdit::new("alpha\n\nbeta\ngamma\ndelta");
    edit.set_input_mode(Box::new(BlockSelectMode));
    edit.set_cursor(TextCursor::new(8));

    assert!(edit.key_press(KeyEvent::new(Key::Char('b'), Modifiers::CONTROL)));

    assert_eq!(edit.selected_text(), "beta");
    let starts: Vec<usize> = edit
        .selections()
        .additional_selections()
        .iter()
        .map(|s| s.start)
        .collect();
    assert_eq!(starts, vec![0, 12, 18]);
    assert!(!edit.selections().additional_selections().contains(&edit.selection()));

    // Unhandled keys fall through to default editing
    assert!(edit.key_press(KeyEvent::plain(Key::Char('!'))));
    assert_eq!(edit.text(), "alpha\n\n!\ngamma\ndelta");
}

#[test]
fn indent_follows_overridden_selection() {
    let mut edit = TextEdit::new("one\ntwo\nthree\nfour");
    edit.set_cursor(TextCursor::new(0));
    edit.set_overridden_selection(5, 9);

    edit.indent_blocks(true, 4, true);

    assert_eq!(edit.text(), "one\n\ttwo\n\tthree\nfour");
}

#[rstest]
#[case::case_sensitive(FindFlags::CASE_SENSITIVE, vec![4..7])]
#[case::ignore_case(FindFlags::empty(), vec![0..3, 4..7, 8..11])]
#[case::backward(FindFlags::BACKWARD, vec![8..11, 4..7, 0..3])]
fn find_all_text_honours_flags(
    #[case] flags: FindFlags,
    #[case] expected: Vec<std::ops::Range<usize>>,
) {
    let edit = TextEdit::new("Foo foo FOO");

    assert_eq!(edit.find_all_text("foo", flags, 0, None).unwrap(), expected);
}

#[test]
fn search_results_feed_the_selection_model() {
    let mut edit = TextEdit::new("let a = 1;\nlet b = 2;\nlet c = 3;");

    let matches = edit
        .find_all_text("let", FindFlags::WHOLE_WORD_ONLY, 0, None)
        .unwrap();
    let mut selections: Vec<Selection> = matches.into_iter().map(Selection::from).collect();
    let first = selections.remove(0);
    edit.set_overridden_selection(first.start, first.end);
    edit.set_additional_selections(selections);

    assert_eq!(edit.selected_text(), "let");
    assert_eq!(edit.selections().additional_selections().len(), 2);
}

#[test]
fn removing_the_only_block_leaves_an_empty_block() {
    let mut edit = TextEdit::new("lonely");

    assert!(edit.remove_block(0));

    assert_eq!(edit.document().block_count(), 1);
    assert_eq!(edit.text(), "");
    assert_eq!(edit.cursor(), TextCursor::new(0));
}

#[test]
fn bottom_scroll_keeps_tall_block_above_margin() {
    let mut text: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
    // 400 columns at the default 8px char width in a 400px viewport: 8 rows
    text[5] = "w".repeat(400);
    let mut edit = TextEdit::new(&text.join("\n"));
    edit.resize(400.0, 100.0);
    let cursor = edit.cursor();

    assert!(edit.scroll_block_in_page(5, PagePosition::Bottom, 10.0));

    let layout = edit.layout();
    let bottom_in_view = layout.block_bottom(5).unwrap() - edit.viewport().scroll_y;
    assert_eq!(bottom_in_view, 90.0);
    assert_eq!(edit.cursor(), cursor);
}

#[test]
fn paste_goes_through_handler_then_default() {
    let mut edit = TextEdit::new("ab");
    edit.set_cursor(TextCursor::new(1));
    edit.set_mime_handler(Box::new(UrlPaste));

    let urls = MimeData {
        urls: vec!["https://a".to_string(), "https://b".to_string()],
        ..MimeData::default()
    };
    assert!(edit.can_insert_from_mime_data(&urls));
    edit.insert_from_mime_data(&urls);
    assert_eq!(edit.text(), "a<https://a, https://b>b");

    let text = MimeData::from_text("XY");
    edit.set_cursor(TextCursor::new(0));
    edit.insert_from_mime_data(&text);
    assert_eq!(edit.text(), "XYa<https://a, https://b>b");

    assert!(!edit.can_insert_from_mime_data(&MimeData::default()));
}

#[test]
fn events_report_cursor_contents_and_resize() {
    let mut edit = TextEdit::new("one\ntwo");
    edit.drain_events();

    edit.set_cursor(TextCursor::new(5));
    edit.insert_block(true);
    edit.resize(100.0, 50.0);

    assert_eq!(
        edit.drain_events(),
        vec![
            EditorEvent::CursorLineChanged,
            EditorEvent::ContentsChanged,
            EditorEvent::Resized,
        ]
    );
    assert!(edit.drain_events().is_empty());
}

#[test]
fn config_file_drives_editor_settings() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vtextedit").join("config.toml");
    let config = EditorConfig {
        expand_tab: false,
        tab_stop_width_in_spaces: 8,
        center_cursor: CenterCursor::AlwaysCenter,
        ..EditorConfig::default()
    };
    config.save_to_path(&path).unwrap();

    let loaded = EditorConfig::load_from_path(&path).unwrap().unwrap();
    let mut edit = TextEdit::with_config("x", &loaded);

    assert_eq!(edit.center_cursor(), CenterCursor::AlwaysCenter);
    edit.key_press(KeyEvent::plain(Key::Tab));
    assert_eq!(edit.text(), "\tx");
}
