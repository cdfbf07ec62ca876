use quilt_delta::{Attribute, Delta, Style};
use quilt_engine::{Document, Editor, Selection};

#[test]
fn undo_redo_roundtrips_text_edits_and_selection() {
    let mut editor = Editor::with_text("");

    editor.insert(0, "ab").unwrap();
    assert_eq!(editor.document().text(), "ab");
    assert_eq!(editor.selection(), Selection::collapsed(2));

    assert!(editor.undo());
    assert_eq!(editor.document().text(), "");
    assert_eq!(editor.selection(), Selection::collapsed(0));

    assert!(editor.redo());
    assert_eq!(editor.document().text(), "ab");
    assert_eq!(editor.selection(), Selection::collapsed(2));
}

#[test]
fn undo_restores_deleted_formatting() {
    let document = Document::from_delta(
        Delta::new()
            .insert_with("Hello", Style::single(&Attribute::bold()))
            .insert(" world"),
    )
    .unwrap();
    let mut editor = Editor::new(document, Selection::collapsed(0));

    editor.delete(0, 5).unwrap();
    assert_eq!(editor.document().text(), " world");

    assert!(editor.undo());
    let runs: Vec<_> = editor
        .document()
        .runs()
        .map(|(text, style)| (text.to_string(), style.clone()))
        .collect();
    assert_eq!(
        runs,
        vec![
            ("Hello".to_string(), Style::single(&Attribute::bold())),
            (" world".to_string(), Style::default()),
        ]
    );
}

#[test]
fn undo_unwinds_formatting_without_touching_text() {
    let mut editor = Editor::with_text("Hello world");
    editor.set_selection(Selection::new(0, 5));

    editor.format_selection(&Attribute::bold()).unwrap();
    assert!(editor.selection_style().contains(&Attribute::bold()));

    assert!(editor.undo());
    assert_eq!(editor.document().text(), "Hello world");
    assert!(!editor.selection_style().contains_same(&Attribute::bold()));

    assert!(editor.redo());
    assert!(editor.selection_style().contains(&Attribute::bold()));
}

#[test]
fn a_fresh_edit_clears_the_redo_stack() {
    let mut editor = Editor::with_text("");

    editor.insert(0, "a").unwrap();
    editor.insert(1, "b").unwrap();
    assert!(editor.undo());
    assert!(editor.can_redo());

    editor.insert(1, "c").unwrap();
    assert!(!editor.can_redo());
    assert_eq!(editor.document().text(), "ac");
}

#[test]
fn undo_on_an_empty_stack_is_a_no_op() {
    let mut editor = Editor::with_text("abc");
    assert!(!editor.can_undo());
    assert!(!editor.undo());
    assert!(!editor.redo());
    assert_eq!(editor.document().text(), "abc");
}

#[test]
fn interleaved_undo_redo_keeps_history_consistent() {
    let mut editor = Editor::with_text("");
    editor.insert(0, "one ").unwrap();
    editor.insert(4, "two ").unwrap();
    editor.insert(8, "three").unwrap();
    assert_eq!(editor.document().text(), "one two three");

    assert!(editor.undo());
    assert!(editor.undo());
    assert_eq!(editor.document().text(), "one ");

    assert!(editor.redo());
    assert_eq!(editor.document().text(), "one two ");
    assert!(editor.redo());
    assert_eq!(editor.document().text(), "one two three");
    assert!(!editor.can_redo());
}
