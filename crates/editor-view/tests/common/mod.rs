#![allow(dead_code)]

use editor_view::{
    EditorView, Highlighter, MonospaceMetrics, SyntaxProvider, TextBuffer, Theme,
};
use std::sync::Arc;

/// Two functions; the second holds a nested block.
pub const SAMPLE: &str =
    "fn a() {\n    x;\n    y;\n}\nfn b() {\n    if c {\n        z;\n    }\n}";

/// Folds `{` lines up to the matching `}` line by brace depth.
pub struct Braces;

impl SyntaxProvider for Braces {
    fn starts_fold_region(&self, buffer: &dyn TextBuffer, line: usize) -> bool {
        buffer.line(line).is_some_and(|t| t.trim_end().ends_with('{'))
    }

    fn fold_region_end(&self, buffer: &dyn TextBuffer, line: usize) -> Option<usize> {
        let mut depth = 0i32;
        for l in line..buffer.line_count() {
            let text = buffer.line(l)?;
            for ch in text.chars() {
                match ch {
                    '{' => depth += 1,
                    '}' => depth -= 1,
                    _ => {}
                }
            }
            if depth <= 0 && l > line {
                return Some(l);
            }
        }
        None
    }

    fn name(&self) -> &str {
        "braces"
    }
}

/// View over `text` with brace folding and 10px rows.
pub fn braces_view(text: &str) -> EditorView {
    EditorView::from_text(text)
        .with_highlighter(Highlighter::new(Arc::new(Braces), Arc::new(Theme::default())))
        .with_metrics(Arc::new(MonospaceMetrics::new(10)))
}

/// Selected range as absolute offsets.
pub fn selected_range(view: &EditorView) -> std::ops::Range<usize> {
    view.selection().ordered_offsets(view.buffer())
}
