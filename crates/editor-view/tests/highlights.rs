use editor_view::{
    Color, CursorPos, EditorView, FindDirection, LayerKind, SearchOptions, Selection, Theme,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

fn ranges(view: &EditorView, kind: LayerKind) -> Vec<std::ops::Range<usize>> {
    view.highlight_layers()
        .into_iter()
        .filter(|l| l.kind == kind)
        .flat_map(|l| l.entries.into_iter().map(|e| e.range))
        .collect()
}

#[test]
fn test_layers_come_in_fixed_order() {
    let view = EditorView::from_text("text");
    let kinds: Vec<LayerKind> = view.highlight_layers().iter().map(|l| l.kind).collect();
    assert_eq!(kinds, LayerKind::ORDER.to_vec());
}

#[test]
fn test_composited_order_ends_with_selection() {
    let mut view = EditorView::from_text("foo(bar) foo");
    view.find_in_buffer("foo", FindDirection::Forward, SearchOptions::plain())
        .unwrap();

    let theme = Theme::default();
    let entries = view.composited_highlights();
    let summary: Vec<_> = entries
        .iter()
        .map(|e| (e.range.clone(), e.style.foreground, e.style.background))
        .collect();

    assert_eq!(
        summary,
        vec![
            (0..12, None, Some(theme.current_line)),
            (3..4, Some(theme.bracket_matching), None),
            (7..8, Some(theme.bracket_matching), None),
            (0..3, Some(theme.keyword), Some(theme.search_highlight)),
            (9..12, Some(theme.keyword), Some(theme.search_highlight)),
            (0..3, None, Some(theme.search_highlight)),
            (0..3, None, Some(theme.text_selection)),
        ]
    );
    assert!(entries[0].style.full_width);
    assert!(entries.last().is_some_and(|e| e.style.clear_foreground));
}

#[test]
fn test_same_word_reports_overlaps() {
    let mut view = EditorView::from_text("aaa");
    view.set_selection(Selection::new(CursorPos::new(0, 0), CursorPos::new(0, 2)));
    assert_eq!(ranges(&view, LayerKind::SameWord), vec![0..2, 1..3]);
}

#[test]
fn test_same_word_needs_two_non_blank_chars() {
    let mut view = EditorView::from_text("a a  a");

    view.set_selection(Selection::new(CursorPos::new(0, 0), CursorPos::new(0, 1)));
    assert!(ranges(&view, LayerKind::SameWord).is_empty());

    view.set_selection(Selection::new(CursorPos::new(0, 3), CursorPos::new(0, 5)));
    assert!(ranges(&view, LayerKind::SameWord).is_empty());

    view.set_cursor_position(CursorPos::new(0, 0));
    assert!(ranges(&view, LayerKind::SameWord).is_empty());
    assert!(ranges(&view, LayerKind::TextSelection).is_empty());
}

#[test]
fn test_bracket_before_cursor_matches() {
    let mut view = EditorView::from_text("(x)");
    view.set_cursor_position(CursorPos::new(0, 3));
    assert_eq!(ranges(&view, LayerKind::MatchingBrackets), vec![0..1, 2..3]);

    view.set_cursor_position(CursorPos::new(0, 1));
    assert_eq!(ranges(&view, LayerKind::MatchingBrackets), vec![0..1, 2..3]);
}

#[test]
fn test_brackets_across_lines() {
    let mut view = EditorView::from_text("fn f() {\n    g();\n}");
    view.set_cursor_position(CursorPos::new(0, 7));
    assert_eq!(ranges(&view, LayerKind::MatchingBrackets), vec![7..8, 18..19]);
}

#[test]
fn test_current_line_follows_cursor() {
    let mut view = EditorView::from_text("one\ntwo");
    view.set_cursor_position(CursorPos::new(1, 2));
    assert_eq!(ranges(&view, LayerKind::CurrentLine), vec![4..7]);
}

#[test]
fn test_theme_swap_recolors_layers() {
    let mut view = EditorView::from_text("x");
    let mut theme = Theme::default();
    theme.name = "bright".to_string();
    theme.current_line = Color::rgb(0xff, 0xff, 0xe0);
    view.set_theme(Arc::new(theme));

    let entries = view.composited_highlights();
    assert_eq!(entries[0].style.background, Some(Color::rgb(0xff, 0xff, 0xe0)));
    assert_eq!(view.theme().name, "bright");
}
