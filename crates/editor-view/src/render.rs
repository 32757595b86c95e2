//! Render instructions.
//!
//! Everything a painter needs for one frame, computed from current state: per-block format
//! ranges (composited overlays clipped to the line), cursor paint, end-of-line and line-break
//! glyph positions, and gutter rows. Pixel x positions are left to the host, which owns fonts;
//! markers are reported as `(line, row, column)` plus the row's top edge.

use crate::folding::FoldMarker;
use crate::highlight::{HighlightEntry, HighlightStyle};
use crate::syntax::{Color, ThemeRole};
use crate::view::EditorView;
use crate::viewport::{BlockData, Rect, ScrollPosition};
use std::borrow::Cow;
use std::time::Duration;

/// Glyph drawn after the last character of a line (`↤`).
pub const END_OF_LINE_GLYPH: char = '\u{21A4}';

/// Glyph drawn at the end of each soft-wrapped row (`↵`).
pub const LINE_BREAK_GLYPH: char = '\u{21B5}';

/// Glyph drawn over a space (`·`).
pub const SPACE_GLYPH: char = '\u{00B7}';

/// Glyph drawn over a tab (`→`).
pub const TAB_GLYPH: char = '\u{2192}';

/// Styled range relative to the start of a line, in characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatRange {
    /// First character column.
    pub start: usize,
    /// Length in characters (may include the line terminator).
    pub len: usize,
    /// Style to apply.
    pub style: HighlightStyle,
}

/// Cursor shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorShape {
    /// Thin bar between characters.
    Line,
    /// Inverted cell over the character (overwrite mode).
    Block,
}

/// Cursor appearance for the current frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorStyle {
    /// Shape.
    pub shape: CursorShape,
    /// Blink phase.
    pub visible: bool,
    /// Blink half-period, if blinking.
    pub blink_interval: Option<Duration>,
}

/// Cursor placement inside a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPaint {
    /// Character column.
    pub column: usize,
    /// Shape actually drawn (a block cursor at end of line falls back to a bar).
    pub shape: CursorShape,
    /// Blink phase.
    pub visible: bool,
}

/// Paint instructions for one visible line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaintBlock<'a> {
    /// Geometry.
    pub block: BlockData,
    /// Line text.
    pub text: Cow<'a, str>,
    /// Overlay formats in paint order.
    pub formats: Vec<FormatRange>,
    /// Cursor, if it sits on this line.
    pub cursor: Option<CursorPaint>,
}

/// A glyph to draw at a text position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMarker {
    /// Logical line.
    pub line: usize,
    /// Visual row within the line.
    pub row: usize,
    /// Character column the glyph follows (end-of-line, line break) or covers (whitespace).
    pub column: usize,
    /// Top edge of the row (viewport pixels).
    pub top: i32,
    /// Glyph.
    pub glyph: char,
    /// Pen color.
    pub color: Color,
}

/// Hovered gutter line, valid only for the text, layout and scroll it was measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GutterHover {
    line: usize,
    text_revision: u64,
    layout_revision: u64,
    scroll: ScrollPosition,
}

/// One gutter row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GutterLine {
    /// Logical line.
    pub line: usize,
    /// 1-based number to print.
    pub number: usize,
    /// Row rectangle (gutter coordinates vertically match the text viewport).
    pub rect: Rect,
    /// Whether this is the cursor line.
    pub is_current: bool,
    /// Number color.
    pub color: Color,
    /// Fold indicator.
    pub marker: FoldMarker,
    /// For the hovered foldable line: y of the region's closing line (middle of its row).
    pub fold_range_bottom: Option<i32>,
}

/// Clip composited entries to one line.
///
/// Full-width entries apply to the line their range starts on and cover the terminator.
pub fn format_ranges_for_line(
    line_start: usize,
    line_len: usize,
    entries: &[HighlightEntry],
) -> Vec<FormatRange> {
    let line_end = line_start + line_len + 1;
    let mut formats = Vec::new();
    for entry in entries {
        if entry.style.full_width {
            if entry.range.start >= line_start && entry.range.start < line_end {
                formats.push(FormatRange {
                    start: 0,
                    len: line_len + 1,
                    style: entry.style,
                });
            }
            continue;
        }

        let start = entry.range.start.max(line_start);
        let end = entry.range.end.min(line_end);
        if start < end {
            formats.push(FormatRange {
                start: start - line_start,
                len: end - start,
                style: entry.style,
            });
        }
    }
    formats
}

fn decimal_digits(mut n: usize) -> i32 {
    let mut digits = 1;
    while n >= 10 {
        digits += 1;
        n /= 10;
    }
    digits
}

impl EditorView {
    /// Cursor shape, blink phase and interval.
    pub fn cursor_style(&self) -> CursorStyle {
        CursorStyle {
            shape: if self.config.overwrite_mode {
                CursorShape::Block
            } else {
                CursorShape::Line
            },
            visible: self.cursor_blink_on,
            blink_interval: self.cursor_blink_interval(),
        }
    }

    /// Paint instructions for every block intersecting `rect`.
    pub fn paint_blocks(&self, rect: Rect) -> Vec<PaintBlock<'_>> {
        let entries = self.composited_highlights();
        let cursor = self.cursor_position();
        let style = self.cursor_style();
        let theme = self.theme();

        self.visible_blocks(rect)
            .map(|block| {
                let line_start = self.buffer.line_start(block.line);
                let line_len = self.buffer.line_len(block.line);
                let mut formats = format_ranges_for_line(line_start, line_len, &entries);

                let cursor = (cursor.line == block.line).then(|| {
                    let mut shape = style.shape;
                    if shape == CursorShape::Block {
                        if cursor.column < line_len {
                            formats.push(FormatRange {
                                start: cursor.column,
                                len: 1,
                                style: HighlightStyle {
                                    foreground: Some(theme.color(ThemeRole::Background)),
                                    background: Some(theme.color(ThemeRole::Normal)),
                                    ..HighlightStyle::default()
                                },
                            });
                        } else {
                            shape = CursorShape::Line;
                        }
                    }
                    CursorPaint {
                        column: cursor.column,
                        shape,
                        visible: style.visible,
                    }
                });

                PaintBlock {
                    block,
                    text: self.buffer.line(block.line).unwrap_or_default(),
                    formats,
                    cursor,
                }
            })
            .collect()
    }

    /// `↤` after the last character of every visible line, when enabled.
    pub fn end_of_line_markers(&self, rect: Rect) -> Vec<GlyphMarker> {
        if !self.config.show_end_of_line_markers {
            return Vec::new();
        }
        let line_height = self.metrics.line_height();
        let color = self.theme().color(ThemeRole::Normal);

        self.visible_blocks(rect)
            .map(|block| {
                let row = block.rendered_line_count.saturating_sub(1);
                GlyphMarker {
                    line: block.line,
                    row,
                    column: self.buffer.line_len(block.line),
                    top: block.rect.top + row as i32 * line_height,
                    glyph: END_OF_LINE_GLYPH,
                    color,
                }
            })
            .collect()
    }

    /// `↵` at the end of every soft-wrapped row except a line's last, when enabled.
    pub fn line_break_markers(&self, rect: Rect) -> Vec<GlyphMarker> {
        if !self.config.show_line_breaks {
            return Vec::new();
        }
        let line_height = self.metrics.line_height();
        let color = self.theme().color(ThemeRole::Normal);

        let mut markers = Vec::new();
        for block in self.visible_blocks(rect) {
            if block.rendered_line_count <= 1 {
                continue;
            }
            let text = self.buffer.line(block.line).unwrap_or_default();
            let rows = self.metrics.wrap_rows(&text);
            for (row, range) in rows.iter().enumerate().take(rows.len() - 1) {
                markers.push(GlyphMarker {
                    line: block.line,
                    row,
                    column: range.end,
                    top: block.rect.top + row as i32 * line_height,
                    glyph: LINE_BREAK_GLYPH,
                    color,
                });
            }
        }
        markers
    }

    /// `·` over every space and `→` over every tab of the visible lines, when enabled.
    pub fn whitespace_markers(&self, rect: Rect) -> Vec<GlyphMarker> {
        if !self.config.show_whitespace {
            return Vec::new();
        }
        let line_height = self.metrics.line_height();
        let color = self.theme().color(ThemeRole::Normal);

        let mut markers = Vec::new();
        for block in self.visible_blocks(rect) {
            let text = self.buffer.line(block.line).unwrap_or_default();
            let rows = if block.rendered_line_count > 1 {
                self.metrics.wrap_rows(&text)
            } else {
                Vec::new()
            };
            let mut row = 0;
            for (column, ch) in text.chars().enumerate() {
                while row + 1 < rows.len() && column >= rows[row].end {
                    row += 1;
                }
                let glyph = match ch {
                    ' ' => SPACE_GLYPH,
                    '\t' => TAB_GLYPH,
                    _ => continue,
                };
                markers.push(GlyphMarker {
                    line: block.line,
                    row,
                    column,
                    top: block.rect.top + row as i32 * line_height,
                    glyph,
                    color,
                });
            }
        }
        markers
    }

    /// Gutter width: a quarter-line margin, the digits of the largest line number, and a
    /// square fold-marker column one line tall.
    pub fn gutter_width(&self, digit_width: i32) -> i32 {
        let line_height = self.metrics.line_height();
        line_height / 4 + decimal_digits(self.buffer.line_count()) * digit_width + line_height
    }

    /// Gutter rows for the blocks intersecting `rect`.
    pub fn gutter_lines(&self, rect: Rect) -> Vec<GutterLine> {
        let theme = self.theme();
        let current = self.cursor_position().line;
        let geometry = self.geometry();
        let half_line = self.metrics.line_height() / 2;
        let hovered = self.gutter_hover();

        self.visible_blocks(rect)
            .map(|block| {
                let is_current = block.line == current;
                let marker = self.fold_marker(block.line);
                let fold_range_bottom = if hovered == Some(block.line)
                    && marker != FoldMarker::None
                {
                    self.find_closing_line(block.line)
                        .and_then(|end| geometry.line_top(self.scroll, end))
                        .map(|top| top + half_line)
                } else {
                    None
                };

                GutterLine {
                    line: block.line,
                    number: block.line + 1,
                    rect: block.rect,
                    is_current,
                    color: theme.color(if is_current {
                        ThemeRole::CurrentLineNumber
                    } else {
                        ThemeRole::LineNumbers
                    }),
                    marker,
                    fold_range_bottom,
                }
            })
            .collect()
    }

    /// Gutter fill color.
    pub fn gutter_background(&self) -> Color {
        self.theme().color(ThemeRole::CurrentLine)
    }

    /// Track the pointer over the gutter (`None` when it leaves). Returns `true` when the
    /// hovered line changed.
    pub fn set_gutter_hover(&mut self, y: Option<i32>) -> bool {
        let line = y.and_then(|y| self.line_at_vertical_position(y));
        let changed = line != self.gutter_hover();
        self.gutter_hover = line.map(|line| GutterHover {
            line,
            text_revision: self.buffer.revision(),
            layout_revision: self.layout_revision,
            scroll: self.scroll,
        });
        changed
    }

    /// Line currently hovered in the gutter. Any edit, fold or scroll since the last
    /// [`set_gutter_hover`](Self::set_gutter_hover) clears it.
    pub fn gutter_hover(&self) -> Option<usize> {
        self.gutter_hover
            .filter(|hover| {
                hover.text_revision == self.buffer.revision()
                    && hover.layout_revision == self.layout_revision
                    && hover.scroll == self.scroll
            })
            .map(|hover| hover.line)
    }

    /// Click in the gutter. Toggles the fold when the click lands in the fold-marker column
    /// (the rightmost `line_height` pixels of a gutter `gutter_width` wide).
    pub fn gutter_click(&mut self, x: i32, y: i32, gutter_width: i32) -> bool {
        if x < gutter_width - self.metrics.line_height() {
            return false;
        }
        match self.line_at_vertical_position(y) {
            Some(line) if self.is_foldable(line) => self.toggle_fold(line),
            _ => false,
        }
    }
}
