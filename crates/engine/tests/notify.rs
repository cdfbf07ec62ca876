use std::cell::RefCell;
use std::rc::Rc;

use quilt_delta::{Attribute, Delta, Style};
use quilt_engine::{DocumentChange, Editor, Selection};

fn record_changes(editor: &mut Editor) -> Rc<RefCell<Vec<DocumentChange>>> {
    let seen: Rc<RefCell<Vec<DocumentChange>>> = Rc::default();
    let sink = seen.clone();
    editor.subscribe(move |change| sink.borrow_mut().push(change.clone()));
    seen
}

#[test]
fn every_successful_change_notifies_subscribers() {
    let mut editor = Editor::with_text("Hello world");
    let seen = record_changes(&mut editor);

    editor.set_selection(Selection::new(0, 5));
    editor.format_selection(&Attribute::bold()).unwrap();
    editor.insert(11, "!").unwrap();

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);

    assert_eq!(seen[0].old_version, 0);
    assert_eq!(seen[0].new_version, 1);
    assert_eq!(
        seen[0].delta,
        Delta::new().retain_with(5, Style::single(&Attribute::bold()))
    );
    assert_eq!(seen[0].source.as_deref(), Some("format:bold"));

    assert_eq!(seen[1].old_version, 1);
    assert_eq!(seen[1].new_version, 2);
    assert_eq!(seen[1].source.as_deref(), Some("insert"));
}

#[test]
fn rejected_changes_notify_nobody() {
    let mut editor = Editor::with_text("abc");
    let seen = record_changes(&mut editor);

    assert!(editor.delete(0, 10).is_err());
    assert!(seen.borrow().is_empty());
    assert_eq!(editor.document().version(), 0);
}

#[test]
fn unsubscribing_stops_notifications() {
    let mut editor = Editor::with_text("abc");
    let seen: Rc<RefCell<Vec<DocumentChange>>> = Rc::default();
    let sink = seen.clone();
    let id = editor.subscribe(move |change| sink.borrow_mut().push(change.clone()));

    editor.insert(3, "d").unwrap();
    assert_eq!(seen.borrow().len(), 1);

    assert!(editor.unsubscribe(id));
    editor.insert(4, "e").unwrap();
    assert_eq!(seen.borrow().len(), 1);

    assert!(!editor.unsubscribe(id));
}

#[test]
fn undo_and_redo_notify_with_their_sources() {
    let mut editor = Editor::with_text("");
    editor.insert(0, "x").unwrap();

    let seen = record_changes(&mut editor);
    assert!(editor.undo());
    assert!(editor.redo());

    let seen = seen.borrow();
    assert_eq!(seen.len(), 2);
    assert_eq!(seen[0].source.as_deref(), Some("undo"));
    assert_eq!(seen[1].source.as_deref(), Some("redo"));
    assert_eq!(seen[1].new_version, 3);
}
