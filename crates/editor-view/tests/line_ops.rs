mod common;

use common::{SAMPLE, braces_view};
use editor_view::{CursorPos, EditorView, Selection};
use pretty_assertions::assert_eq;

fn select_lines(view: &mut EditorView, first: usize, last: usize) {
    view.set_selection(Selection::new(
        CursorPos::new(first, 0),
        CursorPos::new(last, 1),
    ));
}

#[test]
fn test_move_line_up() {
    let mut view = EditorView::from_text("one\ntwo\nthree");
    view.set_cursor_position(CursorPos::new(2, 1));

    assert!(view.move_lines_up());
    assert_eq!(view.text(), "one\nthree\ntwo");
    assert_eq!(view.cursor_position(), CursorPos::new(1, 1));

    view.undo().unwrap();
    assert_eq!(view.text(), "one\ntwo\nthree");
}

#[test]
fn test_move_lines_at_edges_are_noops() {
    let mut view = EditorView::from_text("one\ntwo");

    view.set_cursor_position(CursorPos::new(0, 0));
    assert!(!view.move_lines_up());
    view.set_cursor_position(CursorPos::new(1, 0));
    assert!(!view.move_lines_down());

    assert_eq!(view.text(), "one\ntwo");
    assert!(!view.can_undo());
}

#[test]
fn test_move_selected_block_down_keeps_selection() {
    let mut view = EditorView::from_text("a\nb\nc\nd");
    select_lines(&mut view, 0, 1);

    assert!(view.move_lines_down());
    assert_eq!(view.text(), "c\na\nb\nd");
    assert_eq!(
        view.selection(),
        Selection::new(CursorPos::new(1, 0), CursorPos::new(2, 1))
    );
}

#[test]
fn test_reversed_selection_keeps_orientation() {
    let mut view = EditorView::from_text("a\nb\nc\nd");
    view.set_selection(Selection::new(CursorPos::new(2, 1), CursorPos::new(1, 0)));

    assert!(view.move_lines_up());
    assert_eq!(view.text(), "b\nc\na\nd");
    assert_eq!(
        view.selection(),
        Selection::new(CursorPos::new(1, 1), CursorPos::new(0, 0))
    );
}

#[test]
fn test_duplicate_final_line() {
    let mut view = EditorView::from_text("x\ny");
    view.set_cursor_position(CursorPos::new(1, 0));

    assert!(view.duplicate_lines());
    assert_eq!(view.text(), "x\ny\ny");
    assert_eq!(view.line_count(), 3);
    assert_eq!(view.cursor_position(), CursorPos::new(2, 0));
}

#[test]
fn test_duplicate_selected_block() {
    let mut view = EditorView::from_text("a\nb\nc");
    select_lines(&mut view, 0, 1);

    assert!(view.duplicate_lines());
    assert_eq!(view.text(), "a\nb\na\nb\nc");
    assert_eq!(
        view.selection(),
        Selection::new(CursorPos::new(2, 0), CursorPos::new(3, 1))
    );
}

#[test]
fn test_delete_final_line() {
    let mut view = EditorView::from_text("a\nb\nc");
    view.set_cursor_position(CursorPos::new(2, 0));

    assert!(view.delete_lines());
    assert_eq!(view.text(), "a\nb");
    assert_eq!(view.line_count(), 2);
    assert_eq!(view.cursor_position(), CursorPos::new(1, 1));
}

#[test]
fn test_delete_middle_line() {
    let mut view = EditorView::from_text("a\nb\nc");
    view.set_cursor_position(CursorPos::new(1, 0));

    assert!(view.delete_lines());
    assert_eq!(view.text(), "a\nc");
    assert_eq!(view.cursor_position(), CursorPos::new(1, 0));
}

#[test]
fn test_delete_every_line_leaves_one_empty_line() {
    let mut view = EditorView::from_text("only");
    assert!(view.delete_lines());
    assert_eq!(view.text(), "");
    assert_eq!(view.line_count(), 1);

    let mut view = EditorView::from_text("a\nb");
    select_lines(&mut view, 0, 1);
    assert!(view.delete_lines());
    assert_eq!(view.text(), "");
    assert_eq!(view.cursor_position(), CursorPos::new(0, 0));
}

#[test]
fn test_each_transform_is_one_undo_step() {
    const TEXT: &str = "\tone\n  two  \nthree\n    four  ";
    let ops: [(&str, fn(&mut EditorView)); 9] = [
        ("move up", |v| {
            v.move_lines_up();
        }),
        ("move down", |v| {
            v.move_lines_down();
        }),
        ("duplicate", |v| {
            v.duplicate_lines();
        }),
        ("delete", |v| {
            v.delete_lines();
        }),
        ("to tabs", |v| v.convert_leading_whitespace_to_tabs()),
        ("to spaces", |v| v.convert_leading_whitespace_to_spaces()),
        ("trim leading", |v| v.trim_whitespace(true, false)),
        ("trim trailing", |v| v.trim_whitespace(false, true)),
        ("trim both", |v| v.trim_whitespace(true, true)),
    ];

    for (name, op) in ops {
        let mut view = EditorView::from_text(TEXT);
        select_lines(&mut view, 1, 2);

        op(&mut view);
        assert_ne!(view.text(), TEXT, "{name} changed nothing");

        view.undo().unwrap();
        assert_eq!(view.text(), TEXT, "{name} needed more than one undo");
        assert!(!view.can_undo(), "{name} left extra history");
    }
}

#[test]
fn test_whitespace_conversion() {
    let mut view = EditorView::from_text("\tfoo\n\t\tbar\n  baz");
    view.convert_leading_whitespace_to_spaces();
    assert_eq!(view.text(), "    foo\n        bar\n  baz");

    view.convert_leading_whitespace_to_tabs();
    assert_eq!(view.text(), "\tfoo\n\t\tbar\n  baz");
}

#[test]
fn test_trim() {
    let mut view = EditorView::from_text("  a  \n \t \nb");
    view.trim_whitespace(true, false);
    assert_eq!(view.text(), "a  \n\nb");

    let mut view = EditorView::from_text("  a  \n \t \nb");
    view.trim_whitespace(false, true);
    assert_eq!(view.text(), "  a\n \nb");

    let mut view = EditorView::from_text("a\n   \nb");
    view.trim_whitespace(false, true);
    assert_eq!(view.text(), "a\n \nb");

    // Both flags off: no edit, no history.
    view.trim_whitespace(false, false);
    assert!(view.can_undo());
    view.undo().unwrap();
    assert!(!view.can_undo());
}

#[test]
fn test_trim_keeps_cursor_in_range() {
    let mut view = EditorView::from_text("abc   ");
    view.set_cursor_position(CursorPos::new(0, 6));
    view.trim_whitespace(false, true);
    assert_eq!(view.cursor_position(), CursorPos::new(0, 3));
}

#[test]
fn test_move_next_to_fold_unfolds_it() {
    let mut view = braces_view(SAMPLE);
    assert!(view.toggle_fold(4));
    view.set_cursor_position(CursorPos::new(3, 0));

    assert!(view.move_lines_down());
    assert_eq!(view.hidden_line_count(), 0);
    assert_eq!(view.line(3).unwrap().text, "fn b() {");
    assert_eq!(view.line(4).unwrap().text, "}");
}

#[test]
fn test_duplicate_above_fold_shifts_it() {
    let mut view = braces_view(SAMPLE);
    assert!(view.toggle_fold(4));
    view.set_cursor_position(CursorPos::new(1, 0));

    assert!(view.duplicate_lines());
    assert!(view.is_folded(5));
    assert_eq!(view.hidden_line_count(), 4);
}

#[test]
fn test_deleting_fold_header_reveals_body() {
    let mut view = braces_view(SAMPLE);
    assert!(view.toggle_fold(4));
    view.set_cursor_position(CursorPos::new(4, 0));

    assert!(view.delete_lines());
    assert_eq!(view.line_count(), 8);
    assert_eq!(view.hidden_line_count(), 0);
}

#[test]
fn test_deleting_header_after_fold_keeps_bodies_apart() {
    let mut view = braces_view("a {\n 1\n}\nb {\n 2\n}\nend");
    assert!(view.toggle_fold(0));
    assert!(view.toggle_fold(3));
    view.set_cursor_position(CursorPos::new(3, 0));

    assert!(view.delete_lines());
    assert_eq!(view.text(), "a {\n 1\n}\n 2\n}\nend");
    assert!(view.is_folded(0));
    assert_eq!(view.find_closing_line(0), Some(2));
    assert_eq!(view.hidden_line_count(), 2);

    let lines: Vec<usize> = view
        .visible_blocks(editor_view::Rect::new(0, 0, 100, 1000))
        .map(|b| b.line)
        .collect();
    assert_eq!(lines, vec![0, 3, 4, 5]);
}
