//! Position Mapper.
//!
//! Converts between `(line, column)` cursor positions and absolute character offsets. Nothing
//! here fails: out-of-range lines, columns and offsets clamp to the nearest valid value so a
//! stale position captured before the buffer shrank still resolves to *something* renderable.

use crate::buffer::TextBuffer;
use std::cmp::Ordering;
use std::ops::Range;

/// Cursor position (zero-based line and character column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CursorPos {
    /// Zero-based logical line index.
    pub line: usize,
    /// Zero-based column in characters within the line.
    pub column: usize,
}

impl CursorPos {
    /// Create a new cursor position.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Ord for CursorPos {
    fn cmp(&self, other: &Self) -> Ordering {
        self.line
            .cmp(&other.line)
            .then_with(|| self.column.cmp(&other.column))
    }
}

impl PartialOrd for CursorPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Selection between an anchor (`start`) and an active end (`end`).
///
/// `start` may come after `end`; which one is visually first is decided by
/// [`Selection::ordered_offsets`] against the current buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Selection {
    /// Anchor position.
    pub start: CursorPos,
    /// Active (caret) position.
    pub end: CursorPos,
}

impl Selection {
    /// Create a selection from anchor and active positions.
    pub const fn new(start: CursorPos, end: CursorPos) -> Self {
        Self { start, end }
    }

    /// An empty selection (caret) at `pos`.
    pub const fn caret(pos: CursorPos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Build a selection from absolute offsets.
    pub fn from_offsets(buffer: &dyn TextBuffer, anchor: usize, active: usize) -> Self {
        Self {
            start: to_cursor_pos(buffer, anchor),
            end: to_cursor_pos(buffer, active),
        }
    }

    /// Returns `true` when start and end resolve to the same offset.
    pub fn is_empty(&self, buffer: &dyn TextBuffer) -> bool {
        to_offset(buffer, self.start) == to_offset(buffer, self.end)
    }

    /// Resolved half-open offset range, lowest offset first.
    pub fn ordered_offsets(&self, buffer: &dyn TextBuffer) -> Range<usize> {
        let a = to_offset(buffer, self.start);
        let b = to_offset(buffer, self.end);
        a.min(b)..a.max(b)
    }

    /// Resolved `(first, last)` positions in document order.
    pub fn ordered(&self, buffer: &dyn TextBuffer) -> (CursorPos, CursorPos) {
        let range = self.ordered_offsets(buffer);
        (
            to_cursor_pos(buffer, range.start),
            to_cursor_pos(buffer, range.end),
        )
    }

    /// Inclusive line span covered by the selection.
    pub fn line_span(&self, buffer: &dyn TextBuffer) -> (usize, usize) {
        let (first, last) = self.ordered(buffer);
        (first.line, last.line)
    }
}

/// Clamp `line` into `[0, line_count - 1]`.
pub fn clamp_line(buffer: &dyn TextBuffer, line: usize) -> usize {
    line.min(buffer.line_count().saturating_sub(1))
}

/// Re-resolve a possibly stale position against the current buffer.
pub fn clamp(buffer: &dyn TextBuffer, pos: CursorPos) -> CursorPos {
    let line = clamp_line(buffer, pos.line);
    CursorPos::new(line, pos.column.min(buffer.line_len(line)))
}

/// Absolute character offset of `pos`.
///
/// The line clamps to the first/last line and the column to `[0, line_len]`, where `line_len`
/// excludes the line terminator.
pub fn to_offset(buffer: &dyn TextBuffer, pos: CursorPos) -> usize {
    let pos = clamp(buffer, pos);
    buffer.line_start(pos.line) + pos.column
}

/// Cursor position of an absolute character offset (clamped to `[0, char_count]`).
pub fn to_cursor_pos(buffer: &dyn TextBuffer, offset: usize) -> CursorPos {
    let offset = offset.min(buffer.char_count());
    let line = buffer.offset_to_line(offset);
    CursorPos::new(line, offset - buffer.line_start(line))
}
