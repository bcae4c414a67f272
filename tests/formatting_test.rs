//! Formatting dispatcher tests.
//!
//! Toolbar clicks, shortcuts and the cached format state, driven through the
//! public editor API.

use folio::config::EditorConfig;
use folio::edit::Selection;
use folio::editor::{
    EditorCollaborators, FormatCommand, FormatKey, Key, KeyChord, PagedDocumentEditor, SurfaceId,
};

fn editor_with_body(text: &str) -> PagedDocumentEditor {
    let mut editor =
        PagedDocumentEditor::open(EditorConfig::default(), EditorCollaborators::default());
    editor.focus(SurfaceId::body(0));
    editor.type_text(text);
    editor.select(Selection::all());
    editor
}

#[test]
fn test_bold_button_alternates() {
    let mut editor = editor_with_body("note");

    for expected in [true, false, true] {
        assert!(editor.click_toolbar("format-bold"));
        assert_eq!(editor.format_state().get(FormatKey::Bold), expected);
        assert_eq!(editor.toolbar().is_active("format-bold"), Some(expected));
    }
}

#[test]
fn test_shortcut_matches_button() {
    let mut editor = editor_with_body("note");

    assert!(editor.handle_key(&KeyChord::ctrl('i')));
    assert!(editor.format_state().get(FormatKey::Italic));
    assert!(editor.handle_key(&KeyChord::meta('i')));
    assert!(!editor.format_state().get(FormatKey::Italic));
    assert!(!editor.handle_key(&KeyChord::new(Key::Char('i'))));
}

#[test]
fn test_clear_formatting_after_everything() {
    let mut editor = editor_with_body("note");
    for command in [
        FormatCommand::Bold,
        FormatCommand::Italic,
        FormatCommand::Underline,
        FormatCommand::Strikethrough,
        FormatCommand::ListOrdered,
        FormatCommand::AlignRight,
    ] {
        editor.apply_format(command, None);
    }
    assert!(editor.format_state().active().len() > 1);

    assert!(editor.click_toolbar("format-clear"));
    assert_eq!(editor.format_state().active(), vec![FormatKey::AlignLeft]);
    for key in FormatKey::ALL {
        assert_eq!(editor.format_state().get(key), key == FormatKey::AlignLeft);
    }
}

#[test]
fn test_state_follows_focus() {
    let mut editor = editor_with_body("note");
    editor.click_toolbar("format-bold");
    assert!(editor.format_state().get(FormatKey::Bold));

    editor.focus(SurfaceId::title(1));
    assert!(!editor.format_state().get(FormatKey::Bold));

    editor.focus(SurfaceId::body(0));
    editor.select(Selection::all());
    assert!(editor.format_state().get(FormatKey::Bold));
}

#[test]
fn test_formatting_is_saved() {
    let mut editor = editor_with_body("note");
    editor.click_toolbar("format-heading");
    editor.click_toolbar("format-align-center");

    let document = editor.close();
    assert_eq!(
        document.page(0).unwrap().body.to_html(),
        "<h1 style=\"text-align: center;\">note</h1>"
    );
}
