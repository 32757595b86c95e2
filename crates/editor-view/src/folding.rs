//! Fold Model.
//!
//! Folding is flat: each logical line carries one [`LineVisibility`] and a folded region is a
//! [`LineVisibility::FoldHeader`] followed by a run of [`LineVisibility::Hidden`] lines. There is
//! no region tree, so a region that would enclose an already-folded region cannot be folded.

use crate::buffer::TextBuffer;
use crate::syntax::SyntaxProvider;

/// Visibility state of one logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineVisibility {
    /// Rendered normally.
    #[default]
    Visible,
    /// Inside a folded region; takes no vertical space.
    Hidden,
    /// Visible first line of a folded region.
    FoldHeader,
}

/// Gutter fold indicator for a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoldMarker {
    /// Line does not open a region.
    None,
    /// Line opens a region that is currently expanded.
    Foldable,
    /// Line heads a collapsed region.
    Folded,
}

/// A foldable region as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoldRegion {
    /// Header line (stays visible).
    pub start_line: usize,
    /// Last line of the region (inclusive).
    pub end_line: usize,
    /// Whether the body is currently hidden.
    pub is_folded: bool,
}

impl FoldRegion {
    /// Whether `line` lies in the region body (header excluded).
    pub fn contains_line(&self, line: usize) -> bool {
        line > self.start_line && line <= self.end_line
    }
}

/// Per-line visibility vector, kept the same length as the buffer's line count.
#[derive(Debug, Clone, Default)]
pub struct FoldModel {
    states: Vec<LineVisibility>,
}

impl FoldModel {
    /// All-visible model for `line_count` lines.
    pub fn new(line_count: usize) -> Self {
        Self {
            states: vec![LineVisibility::Visible; line_count.max(1)],
        }
    }

    /// Number of tracked lines.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Always `false`: a buffer has at least one line.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Visibility of `line` (`Visible` when out of range).
    pub fn visibility(&self, line: usize) -> LineVisibility {
        self.states.get(line).copied().unwrap_or_default()
    }

    /// Whether `line` takes vertical space.
    pub fn is_visible(&self, line: usize) -> bool {
        self.visibility(line) != LineVisibility::Hidden
    }

    /// Whether `line` heads a collapsed region: it exists, has a next line, and that line is
    /// hidden.
    pub fn is_folded(&self, line: usize) -> bool {
        line + 1 < self.states.len() && self.states[line + 1] == LineVisibility::Hidden
    }

    /// Number of hidden lines.
    pub fn hidden_line_count(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == LineVisibility::Hidden)
            .count()
    }

    /// Whether the provider says `line` opens a region.
    pub fn is_foldable(
        &self,
        buffer: &dyn TextBuffer,
        syntax: &dyn SyntaxProvider,
        line: usize,
    ) -> bool {
        line < buffer.line_count() && syntax.starts_fold_region(buffer, line)
    }

    /// Closing line of the region opened at `line`.
    ///
    /// `None` when the line is not foldable, the region is unterminated, or the reported end is
    /// not after `line`.
    pub fn find_closing_line(
        &self,
        buffer: &dyn TextBuffer,
        syntax: &dyn SyntaxProvider,
        line: usize,
    ) -> Option<usize> {
        if !self.is_foldable(buffer, syntax, line) {
            return None;
        }
        let last_line = buffer.line_count().saturating_sub(1);
        syntax
            .fold_region_end(buffer, line)
            .filter(|&end| end > line)
            .map(|end| end.min(last_line))
    }

    /// Region opened at `line`, if any.
    pub fn region_at(
        &self,
        buffer: &dyn TextBuffer,
        syntax: &dyn SyntaxProvider,
        line: usize,
    ) -> Option<FoldRegion> {
        let end_line = self.find_closing_line(buffer, syntax, line)?;
        Some(FoldRegion {
            start_line: line,
            end_line,
            is_folded: self.is_folded(line),
        })
    }

    /// Gutter marker for `line`.
    pub fn fold_marker(
        &self,
        buffer: &dyn TextBuffer,
        syntax: &dyn SyntaxProvider,
        line: usize,
    ) -> FoldMarker {
        if self.is_folded(line) {
            FoldMarker::Folded
        } else if self.find_closing_line(buffer, syntax, line).is_some() {
            FoldMarker::Foldable
        } else {
            FoldMarker::None
        }
    }

    /// Fold or unfold the region headed by `line`. Returns `true` when visibility changed.
    pub fn toggle(
        &mut self,
        buffer: &dyn TextBuffer,
        syntax: &dyn SyntaxProvider,
        line: usize,
    ) -> bool {
        if line >= self.states.len() {
            return false;
        }

        if self.states[line] == LineVisibility::Hidden {
            tracing::debug!(line, "fold header is inside a folded region; ignoring");
            return false;
        }

        if self.is_folded(line) {
            return self.unfold(line);
        }

        let Some(end) = self.find_closing_line(buffer, syntax, line) else {
            return false;
        };
        let end = end.min(self.states.len() - 1);

        if self.states[line + 1..=end]
            .iter()
            .any(|s| *s != LineVisibility::Visible)
        {
            tracing::debug!(line, end, "region encloses a folded region; ignoring");
            return false;
        }

        self.states[line] = LineVisibility::FoldHeader;
        for state in &mut self.states[line + 1..=end] {
            *state = LineVisibility::Hidden;
        }
        tracing::debug!(line, end, "folded");
        true
    }

    /// Expand the region headed by `line`. Returns `false` if it was not folded.
    pub fn unfold(&mut self, line: usize) -> bool {
        if !self.is_folded(line) || self.states[line] == LineVisibility::Hidden {
            return false;
        }

        let mut next = line + 1;
        while next < self.states.len() && self.states[next] == LineVisibility::Hidden {
            self.states[next] = LineVisibility::Visible;
            next += 1;
        }
        self.states[line] = LineVisibility::Visible;
        tracing::debug!(line, end = next - 1, "unfolded");
        true
    }

    /// Expand every region. Returns `true` if anything was folded.
    pub fn unfold_all(&mut self) -> bool {
        let changed = self
            .states
            .iter()
            .any(|s| *s != LineVisibility::Visible);
        self.states.fill(LineVisibility::Visible);
        changed
    }

    /// Expand every folded region that touches `first..=last` (header or body).
    pub fn unfold_touching(&mut self, first: usize, last: usize) -> bool {
        let last = last.min(self.states.len().saturating_sub(1));
        let mut changed = false;
        for line in first..=last {
            if let Some(header) = self.header_of(line) {
                changed |= self.unfold(header);
            }
        }
        changed
    }

    /// Visible line that stands in for `line`: the line itself, or its fold header when hidden.
    pub fn visible_anchor(&self, line: usize) -> usize {
        let line = line.min(self.states.len().saturating_sub(1));
        if self.visibility(line) != LineVisibility::Hidden {
            return line;
        }
        self.header_of(line).unwrap_or(line)
    }

    fn header_of(&self, line: usize) -> Option<usize> {
        match self.states.get(line)? {
            LineVisibility::FoldHeader => Some(line),
            LineVisibility::Visible => None,
            LineVisibility::Hidden => {
                let mut header = line;
                while header > 0 && self.states[header] == LineVisibility::Hidden {
                    header -= 1;
                }
                (self.states[header] == LineVisibility::FoldHeader).then_some(header)
            }
        }
    }

    /// Forget all folds and track `line_count` lines.
    pub fn reset(&mut self, line_count: usize) {
        self.states.clear();
        self.states
            .resize(line_count.max(1), LineVisibility::Visible);
    }

    /// Shift line states after `line_delta` lines were inserted (positive) or removed
    /// (negative) at `edit_line`.
    ///
    /// Inserted lines are visible. A removal that cuts a region apart leaves its remaining body
    /// visible rather than attached to a different header.
    pub fn apply_line_delta(&mut self, edit_line: usize, line_delta: isize) {
        if line_delta == 0 {
            return;
        }

        let at = edit_line.min(self.states.len());
        if line_delta > 0 {
            let added = line_delta as usize;
            self.states.splice(
                at..at,
                std::iter::repeat_n(LineVisibility::Visible, added),
            );
        } else {
            let removed = line_delta.unsigned_abs().min(self.states.len() - at);
            let end = at + removed;
            if self.header_of(end).is_some_and(|header| header >= at && header < end) {
                let mut next = end;
                while next < self.states.len() && self.states[next] == LineVisibility::Hidden {
                    self.states[next] = LineVisibility::Visible;
                    next += 1;
                }
            }
            self.states.drain(at..end);
            if self.states.is_empty() {
                self.states.push(LineVisibility::Visible);
            }
        }
        self.normalize();
    }

    /// Repair orphaned states: hidden lines without a header and headers without a body.
    fn normalize(&mut self) {
        let mut prev = LineVisibility::Visible;
        for state in &mut self.states {
            if *state == LineVisibility::Hidden && prev == LineVisibility::Visible {
                *state = LineVisibility::Visible;
            }
            prev = *state;
        }

        for i in 0..self.states.len() {
            if self.states[i] == LineVisibility::FoldHeader && !self.is_folded(i) {
                self.states[i] = LineVisibility::Visible;
            }
        }
    }
}
