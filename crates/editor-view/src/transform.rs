//! Line Transform Engine.
//!
//! Pure text functions. Whole-buffer transforms map one text to another; block operations
//! compute a [`BlockEdit`] (a single ranged replacement) for a line span. The view applies the
//! result inside one undo group and fixes up cursor, selection and fold state.

use crate::buffer::TextBuffer;
use crate::metrics::{cell_width_at, visual_x_for_column};
use std::ops::Range;
use unicode_segmentation::UnicodeSegmentation;

fn is_indent_char(ch: char) -> bool {
    ch == ' ' || ch == '\t'
}

/// Leading space/tab run of `line`: `(chars, columns)` with tabs expanded to the next multiple
/// of `tab_width`.
pub fn leading_whitespace_len(line: &str, tab_width: usize) -> (usize, usize) {
    let mut chars = 0usize;
    let mut columns = 0usize;
    for ch in line.chars() {
        if !is_indent_char(ch) {
            break;
        }
        columns += cell_width_at(ch, columns, tab_width);
        chars += 1;
    }
    (chars, columns)
}

/// Leading space/tab prefix of `line`.
pub fn leading_whitespace(line: &str) -> &str {
    let end = line
        .char_indices()
        .find(|(_, ch)| !is_indent_char(*ch))
        .map_or(line.len(), |(i, _)| i);
    &line[..end]
}

fn map_lines(text: &str, f: impl Fn(&str) -> String) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, line) in text.split('\n').enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&f(line));
    }
    out
}

/// Re-emit every line's leading whitespace as tabs (plus remainder spaces) or as spaces.
pub fn convert_leading_whitespace(text: &str, to_tabs: bool, tab_width: usize) -> String {
    let tab_width = tab_width.max(1);
    map_lines(text, |line| {
        let (chars, columns) = leading_whitespace_len(line, tab_width);
        let indent = if to_tabs {
            "\t".repeat(columns / tab_width) + &" ".repeat(columns % tab_width)
        } else {
            " ".repeat(columns)
        };
        let rest: String = line.chars().skip(chars).collect();
        indent + &rest
    })
}

/// Trim spaces and tabs at the start and/or end of `line`.
///
/// A blank line trimmed only at the end keeps its first character.
pub fn trim_line(line: &str, leading: bool, trailing: bool) -> &str {
    let mut out = line;
    if leading {
        out = out.trim_start_matches(is_indent_char);
    }
    if trailing {
        out = out.trim_end_matches(is_indent_char);
        if out.is_empty() && !leading {
            let first = line.chars().next().map_or(0, char::len_utf8);
            out = &line[..first];
        }
    }
    out
}

/// Trim every line of `text`. With both flags off the text is returned unchanged.
pub fn trim_whitespace(text: &str, leading: bool, trailing: bool) -> String {
    if !leading && !trailing {
        return text.to_string();
    }
    map_lines(text, |line| trim_line(line, leading, trailing).to_string())
}

/// Spaces needed to reach the next tab stop from visual column `x`. Never zero.
pub fn spaces_to_next_tab_stop(x: usize, tab_width: usize) -> usize {
    let tab_width = tab_width.max(1);
    tab_width - x % tab_width
}

/// Spaces inserted for a tab typed at `column` of `line`.
pub fn tab_fill(line: &str, column: usize, tab_width: usize) -> String {
    " ".repeat(spaces_to_next_tab_stop(
        visual_x_for_column(line, column, tab_width),
        tab_width,
    ))
}

/// Characters a backspace at `column` removes when it can drop a whole indentation unit: the
/// text before the caret ends with `tab_width` spaces and the caret sits on a tab stop.
pub fn unindent_len(line: &str, column: usize, tab_width: usize) -> Option<usize> {
    let tab_width = tab_width.max(1);
    if column < tab_width || column % tab_width != 0 {
        return None;
    }
    let before: Vec<char> = line.chars().take(column).collect();
    if before.len() < column {
        return None;
    }
    before[column - tab_width..]
        .iter()
        .all(|c| *c == ' ')
        .then_some(tab_width)
}

/// Char range (within `line`) of the word touching `column`.
///
/// The word containing the character at `column` wins; otherwise the word ending exactly at
/// `column`. Only segments holding an alphanumeric character or `_` count as words.
pub fn word_at(line: &str, column: usize) -> Option<Range<usize>> {
    let mut char_pos = 0usize;
    let mut ending_here: Option<Range<usize>> = None;

    for (_, segment) in line.split_word_bound_indices() {
        let len = segment.chars().count();
        let range = char_pos..char_pos + len;
        char_pos += len;

        if !segment.chars().any(|c| c.is_alphanumeric() || c == '_') {
            continue;
        }
        if range.contains(&column) {
            return Some(range);
        }
        if range.end == column {
            ending_here = Some(range);
        }
    }
    ending_here
}

/// One ranged replacement produced by a block operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockEdit {
    /// Char range to replace.
    pub range: Range<usize>,
    /// Replacement text.
    pub text: String,
    /// First line whose state shifts.
    pub edit_line: usize,
    /// Change in line count.
    pub line_delta: isize,
    /// How many lines the selected span moves.
    pub span_shift: isize,
}

fn line_end(buffer: &dyn TextBuffer, line: usize) -> usize {
    buffer.line_start(line) + buffer.line_len(line)
}

fn span_text(buffer: &dyn TextBuffer, first: usize, last: usize) -> String {
    buffer.slice(buffer.line_start(first)..line_end(buffer, last))
}

/// Swap lines `first..=last` with the line above. `None` at the top of the buffer.
pub fn move_lines_up(buffer: &dyn TextBuffer, first: usize, last: usize) -> Option<BlockEdit> {
    if first == 0 || last >= buffer.line_count() {
        return None;
    }
    let above = first - 1;
    let span = span_text(buffer, first, last);
    let moved = buffer.line(above)?;

    Some(BlockEdit {
        range: buffer.line_start(above)..line_end(buffer, last),
        text: format!("{span}\n{moved}"),
        edit_line: above,
        line_delta: 0,
        span_shift: -1,
    })
}

/// Swap lines `first..=last` with the line below. `None` at the bottom of the buffer.
pub fn move_lines_down(buffer: &dyn TextBuffer, first: usize, last: usize) -> Option<BlockEdit> {
    let below = last + 1;
    if first > last || below >= buffer.line_count() {
        return None;
    }
    let span = span_text(buffer, first, last);
    let moved = buffer.line(below)?;

    Some(BlockEdit {
        range: buffer.line_start(first)..line_end(buffer, below),
        text: format!("{moved}\n{span}"),
        edit_line: first,
        line_delta: 0,
        span_shift: 1,
    })
}

/// Insert a copy of lines `first..=last` above them.
pub fn duplicate_lines(buffer: &dyn TextBuffer, first: usize, last: usize) -> BlockEdit {
    let last = last.min(buffer.line_count().saturating_sub(1));
    let first = first.min(last);
    let count = (last - first + 1) as isize;
    let start = buffer.line_start(first);

    BlockEdit {
        range: start..start,
        text: format!("{}\n", span_text(buffer, first, last)),
        edit_line: first,
        line_delta: count,
        span_shift: count,
    }
}

/// Remove lines `first..=last` together with one line terminator.
///
/// The terminator after the span goes when there is one; at the end of the buffer the one
/// before the span goes instead. Deleting every line leaves a single empty line.
pub fn delete_lines(buffer: &dyn TextBuffer, first: usize, last: usize) -> BlockEdit {
    let line_count = buffer.line_count();
    let last = last.min(line_count.saturating_sub(1));
    let first = first.min(last);
    let count = (last - first + 1) as isize;

    let (range, line_delta) = if last + 1 < line_count {
        (buffer.line_start(first)..buffer.line_start(last + 1), -count)
    } else if first > 0 {
        (buffer.line_start(first) - 1..buffer.char_count(), -count)
    } else {
        (0..buffer.char_count(), 1 - count)
    };

    BlockEdit {
        range,
        text: String::new(),
        edit_line: first,
        line_delta,
        span_shift: 0,
    }
}
