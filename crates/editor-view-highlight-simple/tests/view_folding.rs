use editor_view::{EditorView, FoldMarker, Highlighter, Rect, Theme};
use editor_view_highlight_simple::{BraceFoldProvider, RegexFoldProvider};
use pretty_assertions::assert_eq;
use std::sync::Arc;

const RUST: &str = "\
fn main() {
    let s = \"}\";
    if ready {
        go();
    }
}
// done";

fn view_with(text: &str, syntax: Arc<dyn editor_view::SyntaxProvider>) -> EditorView {
    EditorView::from_text(text).with_highlighter(Highlighter::new(syntax, Arc::new(Theme::default())))
}

#[test]
fn test_brace_provider_drives_folding() {
    let mut view = view_with(RUST, Arc::new(BraceFoldProvider::c_like()));

    assert_eq!(view.fold_marker(0), FoldMarker::Foldable);
    assert_eq!(view.fold_marker(1), FoldMarker::None);
    assert_eq!(view.find_closing_line(0), Some(5));
    assert_eq!(view.find_closing_line(2), Some(4));

    assert!(view.toggle_fold(2));
    assert!(!view.toggle_fold(0));
    assert!(view.toggle_fold(2));
    assert!(view.toggle_fold(0));

    let lines: Vec<usize> = view
        .visible_blocks(Rect::new(0, 0, 100, 1000))
        .map(|b| b.line)
        .collect();
    assert_eq!(lines, vec![0, 6]);
}

#[test]
fn test_region_markers_drive_folding() {
    let text = "# region setup\na = 1\nb = 2\n# endregion\nrun()";
    let provider = RegexFoldProvider::new(r"^#\s*region\b", r"^#\s*endregion\b").unwrap();
    let mut view = view_with(text, Arc::new(provider));

    assert!(view.is_foldable(0));
    assert!(!view.is_foldable(3));
    assert!(view.toggle_fold(0));
    assert_eq!(view.hidden_line_count(), 3);
    assert_eq!(view.document_height(), 2 * 16);
}
