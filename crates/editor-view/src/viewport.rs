//! Viewport Windower.
//!
//! Computes geometry only for the lines a viewport rectangle actually shows. Heights come from
//! [`LineMetrics`], visibility from the [`FoldModel`]: a hidden line is skipped and consumes no
//! vertical space. Enumeration is lazy and recomputed on every call, so nothing here can go stale.

use crate::buffer::TextBuffer;
use crate::folding::FoldModel;
use crate::metrics::LineMetrics;
use std::iter::FusedIterator;

/// Pixel rectangle with inclusive edges (`bottom = top + height - 1`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    /// Left edge.
    pub left: i32,
    /// Top edge.
    pub top: i32,
    /// Width in pixels.
    pub width: i32,
    /// Height in pixels.
    pub height: i32,
}

impl Rect {
    /// Create a rectangle.
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Last pixel row inside the rectangle.
    pub const fn bottom(&self) -> i32 {
        self.top + self.height - 1
    }

    /// Last pixel column inside the rectangle.
    pub const fn right(&self) -> i32 {
        self.left + self.width - 1
    }

    /// Whether `y` lies within `[top, bottom]`.
    pub const fn contains_y(&self, y: i32) -> bool {
        y >= self.top && y <= self.bottom()
    }
}

/// Geometry of one visible logical line, relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockData {
    /// Logical line index.
    pub line: usize,
    /// Bounding rectangle (all visual rows of the line).
    pub rect: Rect,
    /// Number of visual rows.
    pub rendered_line_count: usize,
}

/// Scroll state: the first line shown and the pixel offset (≤ 0) of its top edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollPosition {
    /// First (partially) visible line.
    pub first_line: usize,
    /// Offset of that line's top edge relative to the viewport top.
    pub offset_y: i32,
}

/// Borrowed view of everything that decides line heights.
#[derive(Clone, Copy)]
pub struct LineGeometry<'a> {
    /// Document text.
    pub buffer: &'a dyn TextBuffer,
    /// Line visibility.
    pub folds: &'a FoldModel,
    /// Row height and wrapping.
    pub metrics: &'a dyn LineMetrics,
    /// Whether soft wrapping is enabled.
    pub wrap: bool,
}

impl<'a> LineGeometry<'a> {
    /// Visual rows of `line`: 0 when hidden or out of range, otherwise at least 1.
    pub fn rendered_line_count(&self, line: usize) -> usize {
        if line >= self.buffer.line_count() || !self.folds.is_visible(line) {
            return 0;
        }
        if !self.wrap {
            return 1;
        }
        match self.buffer.line(line) {
            Some(text) => self.metrics.rendered_line_count(&text),
            None => 1,
        }
    }

    /// Pixel height of `line`.
    pub fn block_height(&self, line: usize) -> i32 {
        self.rendered_line_count(line) as i32 * self.metrics.line_height()
    }

    /// Sum of all visible line heights.
    pub fn document_height(&self) -> i64 {
        (0..self.buffer.line_count())
            .map(|line| i64::from(self.block_height(line)))
            .sum()
    }

    /// Nearest visible line before `line`.
    pub fn prev_visible(&self, line: usize) -> Option<usize> {
        (0..line).rev().find(|&l| self.folds.is_visible(l))
    }

    /// Nearest visible line after `line`.
    pub fn next_visible(&self, line: usize) -> Option<usize> {
        (line + 1..self.buffer.line_count()).find(|&l| self.folds.is_visible(l))
    }

    /// Lazily enumerate blocks intersecting `rect`.
    pub fn visible_blocks(&self, scroll: ScrollPosition, rect: Rect) -> VisibleBlocks<'a> {
        VisibleBlocks {
            geometry: *self,
            rect,
            line: scroll.first_line,
            top: scroll.offset_y,
            done: false,
        }
    }

    /// Line whose `[top, bottom)` span contains `y`.
    ///
    /// `None` above the first visible line or past the last line.
    pub fn line_at_vertical_position(&self, scroll: ScrollPosition, y: i32) -> Option<usize> {
        let mut top = scroll.offset_y;
        if y < top {
            return None;
        }
        for line in scroll.first_line..self.buffer.line_count() {
            let height = self.block_height(line);
            if height == 0 {
                continue;
            }
            if y < top + height {
                return Some(line);
            }
            top += height;
        }
        None
    }

    /// Top edge of `line` relative to the viewport, if it is at or after the first line.
    pub fn line_top(&self, scroll: ScrollPosition, line: usize) -> Option<i32> {
        if line < scroll.first_line {
            return None;
        }
        let above: i32 = (scroll.first_line..line)
            .map(|l| self.block_height(l))
            .sum();
        Some(scroll.offset_y + above)
    }

    /// Bring the scroll position back to a canonical form: the first line is visible and its
    /// top edge is in `(-height, 0]`.
    pub fn normalize_scroll(&self, scroll: ScrollPosition) -> ScrollPosition {
        let last = self.buffer.line_count().saturating_sub(1);
        let mut first_line = self.folds.visible_anchor(scroll.first_line.min(last));
        let mut offset_y = scroll.offset_y;

        while offset_y > 0 {
            match self.prev_visible(first_line) {
                Some(prev) => {
                    first_line = prev;
                    offset_y -= self.block_height(prev);
                }
                None => {
                    offset_y = 0;
                }
            }
        }

        loop {
            let height = self.block_height(first_line);
            if offset_y + height > 0 {
                break;
            }
            match self.next_visible(first_line) {
                Some(next) => {
                    offset_y += height;
                    first_line = next;
                }
                None => {
                    offset_y = 0;
                    break;
                }
            }
        }

        ScrollPosition {
            first_line,
            offset_y,
        }
    }

    /// Smallest scroll change that shows `line` entirely inside a viewport `viewport_height`
    /// pixels tall.
    pub fn reveal_line(
        &self,
        scroll: ScrollPosition,
        line: usize,
        viewport_height: i32,
    ) -> ScrollPosition {
        let line = self.folds.visible_anchor(line);
        let Some(top) = self.line_top(scroll, line) else {
            return ScrollPosition {
                first_line: line,
                offset_y: 0,
            };
        };
        if top < 0 {
            return ScrollPosition {
                first_line: line,
                offset_y: 0,
            };
        }

        let bottom = top + self.block_height(line);
        if bottom <= viewport_height {
            return scroll;
        }
        self.normalize_scroll(ScrollPosition {
            first_line: scroll.first_line,
            offset_y: scroll.offset_y - (bottom - viewport_height),
        })
    }
}

/// Lazy iterator over [`BlockData`] intersecting a rectangle.
///
/// Created by [`LineGeometry::visible_blocks`]. Holds only shared borrows.
pub struct VisibleBlocks<'a> {
    geometry: LineGeometry<'a>,
    rect: Rect,
    line: usize,
    top: i32,
    done: bool,
}

impl Iterator for VisibleBlocks<'_> {
    type Item = BlockData;

    fn next(&mut self) -> Option<Self::Item> {
        let line_count = self.geometry.buffer.line_count();
        while !self.done && self.line < line_count {
            let line = self.line;
            self.line += 1;

            let rendered_line_count = self.geometry.rendered_line_count(line);
            if rendered_line_count == 0 {
                continue;
            }

            let height = rendered_line_count as i32 * self.geometry.metrics.line_height();
            let rect = Rect::new(self.rect.left, self.top, self.rect.width, height);
            self.top += height;

            if rect.top > self.rect.bottom() {
                self.done = true;
                break;
            }
            if rect.bottom() >= self.rect.top {
                return Some(BlockData {
                    line,
                    rect,
                    rendered_line_count,
                });
            }
        }
        self.done = true;
        None
    }
}

impl FusedIterator for VisibleBlocks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RopeBuffer;
    use crate::metrics::{MonospaceMetrics, WrapMode};

    fn ten_lines() -> RopeBuffer {
        let text: Vec<String> = (0..10).map(|i| format!("line {i}")).collect();
        RopeBuffer::new(&text.join("\n"))
    }

    #[test]
    fn test_rect_edges() {
        let rect = Rect::new(0, 10, 100, 20);
        assert_eq!(rect.bottom(), 29);
        assert_eq!(rect.right(), 99);
        assert!(rect.contains_y(29));
        assert!(!rect.contains_y(30));
    }

    #[test]
    fn test_visible_blocks_window() {
        let buffer = ten_lines();
        let folds = FoldModel::new(buffer.line_count());
        let metrics = MonospaceMetrics::new(10);
        let geometry = LineGeometry {
            buffer: &buffer,
            folds: &folds,
            metrics: &metrics,
            wrap: false,
        };

        // Rows 15..=34 touch lines 1, 2 and 3.
        let lines: Vec<usize> = geometry
            .visible_blocks(ScrollPosition::default(), Rect::new(0, 15, 80, 20))
            .map(|b| b.line)
            .collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn test_visible_blocks_scrolled() {
        let buffer = ten_lines();
        let folds = FoldModel::new(buffer.line_count());
        let metrics = MonospaceMetrics::new(10);
        let geometry = LineGeometry {
            buffer: &buffer,
            folds: &folds,
            metrics: &metrics,
            wrap: false,
        };
        let scroll = ScrollPosition {
            first_line: 4,
            offset_y: -5,
        };

        let blocks: Vec<BlockData> = geometry
            .visible_blocks(scroll, Rect::new(0, 0, 80, 20))
            .collect();
        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].line, 4);
        assert_eq!(blocks[0].rect.top, -5);
        assert_eq!(blocks[2].rect.top, 15);
    }

    #[test]
    fn test_wrapped_line_height() {
        let buffer = RopeBuffer::new("abcdefghij\nx");
        let folds = FoldModel::new(buffer.line_count());
        let metrics = MonospaceMetrics::new(10)
            .with_wrap_width(4)
            .with_wrap_mode(WrapMode::Char);
        let geometry = LineGeometry {
            buffer: &buffer,
            folds: &folds,
            metrics: &metrics,
            wrap: true,
        };

        assert_eq!(geometry.rendered_line_count(0), 3);
        assert_eq!(geometry.block_height(0), 30);
        assert_eq!(geometry.document_height(), 40);
        assert_eq!(
            geometry.line_at_vertical_position(ScrollPosition::default(), 29),
            Some(0)
        );
        assert_eq!(
            geometry.line_at_vertical_position(ScrollPosition::default(), 30),
            Some(1)
        );
        assert_eq!(
            geometry.line_at_vertical_position(ScrollPosition::default(), 40),
            None
        );
    }

    #[test]
    fn test_normalize_scroll() {
        let buffer = ten_lines();
        let folds = FoldModel::new(buffer.line_count());
        let metrics = MonospaceMetrics::new(10);
        let geometry = LineGeometry {
            buffer: &buffer,
            folds: &folds,
            metrics: &metrics,
            wrap: false,
        };

        let scrolled = geometry.normalize_scroll(ScrollPosition {
            first_line: 0,
            offset_y: -25,
        });
        assert_eq!(
            scrolled,
            ScrollPosition {
                first_line: 2,
                offset_y: -5
            }
        );

        let back = geometry.normalize_scroll(ScrollPosition {
            first_line: 2,
            offset_y: 30,
        });
        assert_eq!(back, ScrollPosition::default());
    }

    #[test]
    fn test_reveal_line() {
        let buffer = ten_lines();
        let folds = FoldModel::new(buffer.line_count());
        let metrics = MonospaceMetrics::new(10);
        let geometry = LineGeometry {
            buffer: &buffer,
            folds: &folds,
            metrics: &metrics,
            wrap: false,
        };

        let start = ScrollPosition::default();
        assert_eq!(geometry.reveal_line(start, 2, 30), start);
        assert_eq!(
            geometry.reveal_line(start, 5, 30),
            ScrollPosition {
                first_line: 3,
                offset_y: 0
            }
        );
    }
}
