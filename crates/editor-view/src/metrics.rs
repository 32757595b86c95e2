//! Line metrics collaborator.
//!
//! The view never measures glyphs. It asks a [`LineMetrics`] how tall a line is and how a line's
//! text breaks into visual rows. [`MonospaceMetrics`] is a headless implementation on a fixed cell
//! grid: widths follow UAX #11 (via `unicode-width`) and tabs advance to the next tab stop.

use std::ops::Range;
use std::sync::Arc;
use unicode_width::UnicodeWidthChar;

/// Default tab width (in cells).
pub const DEFAULT_TAB_WIDTH: usize = 4;

/// Geometry source for rendered lines.
pub trait LineMetrics: Send + Sync {
    /// Height of one visual row in pixels.
    fn line_height(&self) -> i32;

    /// Character ranges of each visual row of `text` (a logical line without terminator).
    ///
    /// Always returns at least one row; an empty line yields `[0..0]`.
    fn wrap_rows(&self, text: &str) -> Vec<Range<usize>>;

    /// Number of visual rows `text` occupies.
    fn rendered_line_count(&self, text: &str) -> usize {
        self.wrap_rows(text).len().max(1)
    }

    /// Copy measuring tabs at `tab_width` cells, or `None` when nothing would change.
    ///
    /// Metrics that do not lay out tab stops themselves keep the default.
    fn with_tab_stops(&self, _tab_width: usize) -> Option<Arc<dyn LineMetrics>> {
        None
    }
}

/// Soft wrapping mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WrapMode {
    /// Wrap at character boundaries.
    Char,
    /// Prefer wrapping after whitespace, falling back to character wrap.
    #[default]
    Word,
}

/// Calculate visual width of a character (based on UAX #11)
///
/// Return value:
/// - 1: Narrow character (ASCII, etc.)
/// - 2: Wide character (CJK, fullwidth, etc.)
/// - 0: Zero-width character (combining characters, etc.)
pub fn char_width(ch: char) -> usize {
    UnicodeWidthChar::width(ch).unwrap_or(1)
}

/// Width (in cells) of `ch` drawn at `cell_offset_in_line`; `'\t'` advances to the next tab stop.
pub fn cell_width_at(ch: char, cell_offset_in_line: usize, tab_width: usize) -> usize {
    if ch == '\t' {
        let tab_width = tab_width.max(1);
        tab_width - cell_offset_in_line % tab_width
    } else {
        char_width(ch)
    }
}

/// Width (in cells) of the first `column` characters of `line`.
pub fn visual_x_for_column(line: &str, column: usize, tab_width: usize) -> usize {
    let mut x = 0usize;
    for ch in line.chars().take(column) {
        x = x.saturating_add(cell_width_at(ch, x, tab_width));
    }
    x
}

/// Character indices at which `text` wraps when rows hold `wrap_width` cells.
pub fn wrap_points(text: &str, wrap_width: usize, tab_width: usize, mode: WrapMode) -> Vec<usize> {
    if wrap_width == 0 {
        return Vec::new();
    }
    match mode {
        WrapMode::Char => char_wrap_points(text, wrap_width, tab_width),
        WrapMode::Word => word_wrap_points(text, wrap_width, tab_width),
    }
}

fn char_wrap_points(text: &str, wrap_width: usize, tab_width: usize) -> Vec<usize> {
    let mut points = Vec::new();
    let mut x_in_row = 0usize;
    let mut x_in_line = 0usize;

    for (char_index, ch) in text.chars().enumerate() {
        let width = cell_width_at(ch, x_in_line, tab_width);

        // A wide character that does not fit moves whole to the next row.
        if x_in_row > 0 && x_in_row + width > wrap_width {
            points.push(char_index);
            x_in_row = 0;
        }

        x_in_row += width;
        x_in_line += width;
    }

    points
}

fn word_wrap_points(text: &str, wrap_width: usize, tab_width: usize) -> Vec<usize> {
    let mut points = Vec::new();

    let mut row_start = 0usize;
    let mut row_start_x = 0usize;
    // (char_index, x_in_line) just after the most recent whitespace in the current row.
    let mut last_break: Option<(usize, usize)> = None;
    let mut x_in_line = 0usize;

    for (char_index, ch) in text.chars().enumerate() {
        let width = cell_width_at(ch, x_in_line, tab_width);

        while char_index > row_start && x_in_line - row_start_x + width > wrap_width {
            match last_break.take() {
                Some((break_char, break_x)) if break_char > row_start => {
                    points.push(break_char);
                    row_start = break_char;
                    row_start_x = break_x;
                }
                _ => {
                    points.push(char_index);
                    row_start = char_index;
                    row_start_x = x_in_line;
                }
            }
        }

        x_in_line += width;
        if ch.is_whitespace() {
            last_break = Some((char_index + 1, x_in_line));
        }
    }

    points
}

/// Fixed-cell metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonospaceMetrics {
    line_height: i32,
    wrap_width: Option<usize>,
    tab_width: usize,
    wrap_mode: WrapMode,
}

impl MonospaceMetrics {
    /// Metrics with `line_height` pixels per row and no wrapping.
    pub fn new(line_height: i32) -> Self {
        Self {
            line_height: line_height.max(1),
            wrap_width: None,
            tab_width: DEFAULT_TAB_WIDTH,
            wrap_mode: WrapMode::default(),
        }
    }

    /// Wrap rows at `cells` columns.
    pub fn with_wrap_width(mut self, cells: usize) -> Self {
        self.wrap_width = (cells > 0).then_some(cells);
        self
    }

    /// Set the tab width used for measuring.
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    /// Set the wrap mode.
    pub fn with_wrap_mode(mut self, mode: WrapMode) -> Self {
        self.wrap_mode = mode;
        self
    }

    /// Wrap width in cells, if wrapping.
    pub fn wrap_width(&self) -> Option<usize> {
        self.wrap_width
    }

    /// Tab width in cells.
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self::new(16)
    }
}

impl LineMetrics for MonospaceMetrics {
    fn line_height(&self) -> i32 {
        self.line_height
    }

    fn with_tab_stops(&self, tab_width: usize) -> Option<Arc<dyn LineMetrics>> {
        (self.tab_width != tab_width.max(1))
            .then(|| Arc::new(self.with_tab_width(tab_width)) as Arc<dyn LineMetrics>)
    }

    fn wrap_rows(&self, text: &str) -> Vec<Range<usize>> {
        let len = text.chars().count();
        let Some(width) = self.wrap_width else {
            return vec![0..len];
        };

        let mut rows = Vec::new();
        let mut start = 0usize;
        for point in wrap_points(text, width, self.tab_width, self.wrap_mode) {
            rows.push(start..point);
            start = point;
        }
        rows.push(start..len);
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_width() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('你'), 2);
        assert_eq!(char_width('\u{0301}'), 0); // combining acute accent
    }

    #[test]
    fn test_tab_stops() {
        assert_eq!(cell_width_at('\t', 0, 4), 4);
        assert_eq!(cell_width_at('\t', 1, 4), 3);
        assert_eq!(cell_width_at('\t', 4, 4), 4);
        assert_eq!(visual_x_for_column("a\tb", 2, 4), 4);
    }

    #[test]
    fn test_char_wrap() {
        assert_eq!(wrap_points("abcdefghij", 4, 4, WrapMode::Char), vec![4, 8]);
        assert_eq!(wrap_points("abcd", 4, 4, WrapMode::Char), Vec::<usize>::new());
        // The wide character does not fit in the last cell and moves to the next row.
        assert_eq!(wrap_points("abc你", 4, 4, WrapMode::Char), vec![3]);
    }

    #[test]
    fn test_word_wrap_prefers_whitespace() {
        assert_eq!(
            wrap_points("hello world foo", 8, 4, WrapMode::Word),
            vec![6, 12]
        );
        // No whitespace: falls back to character wrap.
        assert_eq!(wrap_points("abcdefghij", 4, 4, WrapMode::Word), vec![4, 8]);
    }

    #[test]
    fn test_monospace_rows() {
        let metrics = MonospaceMetrics::new(10);
        assert_eq!(metrics.line_height(), 10);
        assert_eq!(metrics.wrap_rows("abcdef"), vec![0..6]);
        assert_eq!(metrics.rendered_line_count(""), 1);

        let wrapping = metrics.with_wrap_width(4).with_wrap_mode(WrapMode::Char);
        assert_eq!(wrapping.wrap_rows("abcdefghij"), vec![0..4, 4..8, 8..10]);
        assert_eq!(wrapping.rendered_line_count("abcdefghij"), 3);
        assert_eq!(wrapping.wrap_rows(""), vec![0..0]);
    }
}
