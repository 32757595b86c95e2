//! `EditorView`: the public surface of the engine.
//!
//! The view owns the buffer, the fold model, cursor/selection, scroll state, the injected
//! [`Highlighter`] and [`LineMetrics`], and the [`ViewConfig`]. Mutating operations take
//! `&mut self` and run to completion; queries take `&self` and never change state.

use crate::buffer::{RopeBuffer, TextBuffer};
use crate::config::ViewConfig;
use crate::error::ViewError;
use crate::folding::{FoldMarker, FoldModel, FoldRegion, LineVisibility};
use crate::highlight::{
    HighlightEntry, HighlightLayer, composite, current_line_layer, matching_brackets_layer,
    same_word_layer, search_hit_layer, text_selection_layer,
};
use crate::metrics::{LineMetrics, MonospaceMetrics};
use crate::position::{self, CursorPos, Selection};
use crate::render::GutterHover;
use crate::search::{FindDirection, SearchOptions, SearchRegion, find_in_region};
use crate::syntax::{Highlighter, SyntaxProvider, Theme};
use crate::transform::{self, BlockEdit};
use crate::viewport::{LineGeometry, Rect, ScrollPosition, VisibleBlocks};
use std::borrow::Cow;
use std::ops::Range;
use std::sync::Arc;
use std::time::Duration;

/// One logical line as seen through the view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line<'a> {
    /// Zero-based line index.
    pub index: usize,
    /// Text without terminator.
    pub text: Cow<'a, str>,
    /// Whether the line takes vertical space.
    pub visible: bool,
    /// Visual rows: 0 when hidden, more than 1 when soft-wrapped.
    pub rendered_line_count: usize,
}

/// Headless code-editor view over a [`TextBuffer`].
pub struct EditorView {
    pub(crate) buffer: Box<dyn TextBuffer>,
    pub(crate) folds: FoldModel,
    pub(crate) metrics: Arc<dyn LineMetrics>,
    pub(crate) highlighter: Highlighter,
    pub(crate) config: ViewConfig,
    pub(crate) selection: Selection,
    pub(crate) scroll: ScrollPosition,
    pub(crate) term_selected: bool,
    pub(crate) layout_revision: u64,
    pub(crate) cursor_blink_on: bool,
    pub(crate) gutter_hover: Option<GutterHover>,
}

impl EditorView {
    /// View over `buffer` with default highlighter, metrics and config.
    pub fn new(buffer: Box<dyn TextBuffer>) -> Self {
        let folds = FoldModel::new(buffer.line_count());
        Self {
            buffer,
            folds,
            metrics: Arc::new(MonospaceMetrics::default()),
            highlighter: Highlighter::default(),
            config: ViewConfig::default(),
            selection: Selection::default(),
            scroll: ScrollPosition::default(),
            term_selected: false,
            layout_revision: 0,
            cursor_blink_on: true,
            gutter_hover: None,
        }
    }

    /// View over a fresh [`RopeBuffer`] holding `text`.
    pub fn from_text(text: &str) -> Self {
        Self::new(Box::new(RopeBuffer::new(text)))
    }

    /// Replace the highlighter.
    pub fn with_highlighter(mut self, highlighter: Highlighter) -> Self {
        self.highlighter = highlighter;
        self
    }

    /// Replace the line metrics.
    pub fn with_metrics(mut self, metrics: Arc<dyn LineMetrics>) -> Self {
        self.metrics = metrics;
        self.sync_metrics_tab_width();
        self
    }

    /// Replace the configuration after validating it.
    pub fn with_config(mut self, config: ViewConfig) -> Result<Self, ViewError> {
        self.set_config(config)?;
        Ok(self)
    }

    /// The underlying buffer.
    pub fn buffer(&self) -> &dyn TextBuffer {
        self.buffer.as_ref()
    }

    /// The current highlighter.
    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// The current theme.
    pub fn theme(&self) -> &Theme {
        &self.highlighter.theme
    }

    /// Swap syntax provider and theme together.
    pub fn set_highlighter(&mut self, highlighter: Highlighter) {
        tracing::debug!(?highlighter, "highlighter replaced");
        self.highlighter = highlighter;
        self.resync_folds_with_syntax();
    }

    /// Swap only the theme.
    pub fn set_theme(&mut self, theme: Arc<Theme>) {
        tracing::debug!(theme = %theme.name, "theme replaced");
        self.highlighter.theme = theme;
    }

    /// Swap only the syntax provider.
    pub fn set_syntax(&mut self, syntax: Arc<dyn SyntaxProvider>) {
        tracing::debug!(syntax = syntax.name(), "syntax replaced");
        self.highlighter.syntax = syntax;
        self.resync_folds_with_syntax();
    }

    /// Folds are dropped whenever the fold source changes.
    fn resync_folds_with_syntax(&mut self) {
        if self.folds.unfold_all() {
            self.bump_layout();
        }
    }

    /// The line metrics.
    pub fn metrics(&self) -> &dyn LineMetrics {
        self.metrics.as_ref()
    }

    /// Swap the line metrics (font change, resize).
    pub fn set_metrics(&mut self, metrics: Arc<dyn LineMetrics>) {
        self.metrics = metrics;
        self.sync_metrics_tab_width();
        self.bump_layout();
    }

    /// The configuration.
    pub fn config(&self) -> &ViewConfig {
        &self.config
    }

    /// Replace the configuration after validating it.
    pub fn set_config(&mut self, config: ViewConfig) -> Result<(), ViewError> {
        config.validate()?;
        let wrap_changed = config.word_wrap != self.config.word_wrap;
        self.config = config;
        let tabs_changed = self.sync_metrics_tab_width();
        if wrap_changed || tabs_changed {
            self.bump_layout();
        }
        Ok(())
    }

    /// Set the tab width (must be positive). Metrics that lay out tab stops follow it.
    pub fn set_tab_width(&mut self, tab_width: usize) -> Result<(), ViewError> {
        if tab_width == 0 {
            return Err(ViewError::InvalidTabWidth(tab_width));
        }
        self.config.tab_width = tab_width;
        if self.sync_metrics_tab_width() {
            self.bump_layout();
        }
        Ok(())
    }

    fn sync_metrics_tab_width(&mut self) -> bool {
        match self.metrics.with_tab_stops(self.config.tab_width) {
            Some(metrics) => {
                tracing::trace!(tab_width = self.config.tab_width, "metrics tab width updated");
                self.metrics = metrics;
                true
            }
            None => false,
        }
    }

    /// Enable or disable soft wrapping.
    pub fn set_word_wrap(&mut self, enable: bool) {
        if self.config.word_wrap != enable {
            self.config.word_wrap = enable;
            self.bump_layout();
        }
    }

    /// Tab key inserts spaces.
    pub fn set_tab_to_spaces(&mut self, enable: bool) {
        self.config.tab_to_spaces = enable;
    }

    /// New lines copy the previous line's indentation.
    pub fn set_smart_indent(&mut self, enable: bool) {
        self.config.smart_indent = enable;
    }

    /// Show the end-of-line glyph.
    pub fn set_end_of_line_markers_visible(&mut self, enable: bool) {
        self.config.show_end_of_line_markers = enable;
    }

    /// Show the soft-wrap glyph.
    pub fn set_show_line_breaks(&mut self, enable: bool) {
        self.config.show_line_breaks = enable;
    }

    /// Show glyphs over spaces and tabs.
    pub fn set_whitespace_visible(&mut self, enable: bool) {
        self.config.show_whitespace = enable;
    }

    /// Set overwrite mode.
    pub fn set_overwrite_mode(&mut self, enable: bool) {
        self.config.overwrite_mode = enable;
    }

    /// Flip overwrite mode (the Insert key).
    pub fn toggle_overwrite_mode(&mut self) {
        self.config.overwrite_mode = !self.config.overwrite_mode;
        tracing::trace!(overwrite = self.config.overwrite_mode, "overwrite mode toggled");
    }

    /// Counter bumped whenever line geometry may have changed (folds, wrapping, metrics).
    pub fn layout_revision(&self) -> u64 {
        self.layout_revision
    }

    fn bump_layout(&mut self) {
        self.layout_revision = self.layout_revision.wrapping_add(1);
        self.scroll = self.geometry().normalize_scroll(self.scroll);
    }

    /// Whole text.
    pub fn text(&self) -> String {
        self.buffer.text()
    }

    /// Number of logical lines.
    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    /// Number of characters.
    pub fn char_count(&self) -> usize {
        self.buffer.char_count()
    }

    /// Line `index` with its visibility and row count.
    pub fn line(&self, index: usize) -> Option<Line<'_>> {
        let text = self.buffer.line(index)?;
        Some(Line {
            index,
            text,
            visible: self.folds.is_visible(index),
            rendered_line_count: self.geometry().rendered_line_count(index),
        })
    }

    /// Replace the whole text as one undo step. Folds are reset.
    pub fn set_text(&mut self, text: &str) {
        let pos = self.cursor_position();
        let len = self.buffer.char_count();
        self.buffer.begin_group();
        self.buffer.replace(0..len, text);
        self.buffer.end_group();
        self.folds.reset(self.buffer.line_count());
        self.bump_layout();
        self.set_cursor_position(pos);
    }

    /// Replace the selection with `text`. With `keep_selection` the inserted text ends up
    /// selected, otherwise the caret lands after it.
    pub fn set_text_in_selection(&mut self, text: &str, keep_selection: bool) {
        let range = self.selection_range();
        let start = range.start;
        self.edit(range, text);

        let end = start + text.chars().count();
        if keep_selection && end > start {
            self.set_selection(Selection::from_offsets(self.buffer(), start, end));
        } else {
            self.set_absolute_cursor_position(end);
        }
    }

    /// Type `text` at the cursor. In overwrite mode characters under the cursor are replaced
    /// up to the end of the line.
    pub fn insert_text(&mut self, text: &str) {
        let mut range = self.selection_range();
        if range.is_empty() && self.config.overwrite_mode && !text.contains('\n') {
            let pos = self.cursor_position();
            let remaining = self.buffer.line_len(pos.line) - pos.column;
            range.end += text.chars().count().min(remaining);
        }
        let start = range.start;
        self.edit(range, text);
        self.set_absolute_cursor_position(start + text.chars().count());
    }

    /// Tab key: spaces up to the next tab stop when `tab_to_spaces`, otherwise `'\t'`.
    pub fn insert_tab(&mut self) {
        if !self.config.tab_to_spaces {
            self.insert_text("\t");
            return;
        }
        let pos = self.cursor_position();
        let line = self.buffer.line(pos.line).unwrap_or_default();
        let fill = transform::tab_fill(&line, pos.column, self.config.tab_width);
        self.insert_text(&fill);
    }

    /// Return key, copying the current line's indentation when `smart_indent` is on.
    pub fn insert_newline(&mut self) {
        let pos = self.cursor_position();
        let mut text = String::from("\n");
        if self.config.smart_indent {
            let line = self.buffer.line(pos.line).unwrap_or_default();
            text.push_str(transform::leading_whitespace(&line));
        }
        self.buffer.begin_group();
        self.insert_text(&text);
        self.buffer.end_group();
    }

    /// Backspace: deletes the selection, a whole indentation unit of spaces (with
    /// `tab_to_spaces`), or the previous character.
    pub fn backspace(&mut self) {
        let range = self.selection_range();
        if !range.is_empty() {
            self.edit(range.clone(), "");
            self.set_absolute_cursor_position(range.start);
            return;
        }

        let caret = range.start;
        if caret == 0 {
            return;
        }

        let mut remove = 1;
        if self.config.tab_to_spaces {
            let pos = self.cursor_position();
            let line = self.buffer.line(pos.line).unwrap_or_default();
            if let Some(len) = transform::unindent_len(&line, pos.column, self.config.tab_width) {
                remove = len;
            }
        }
        self.edit(caret - remove..caret, "");
        self.set_absolute_cursor_position(caret - remove);
    }

    /// Word under the cursor (empty when the cursor is not on a word).
    pub fn current_word(&self) -> String {
        let pos = self.cursor_position();
        let Some(line) = self.buffer.line(pos.line) else {
            return String::new();
        };
        match transform::word_at(&line, pos.column) {
            Some(range) => line
                .chars()
                .skip(range.start)
                .take(range.len())
                .collect(),
            None => String::new(),
        }
    }

    /// Replace `range` and keep the fold vector in step with the buffer.
    fn edit(&mut self, range: Range<usize>, text: &str) {
        let old_line_count = self.buffer.line_count();
        let first = self.buffer.offset_to_line(range.start);
        let last = self.buffer.offset_to_line(range.end);

        if (first != last || text.contains('\n')) && self.folds.unfold_touching(first, last) {
            self.bump_layout();
        }

        self.buffer.replace(range, text);

        let delta = self.buffer.line_count() as isize - old_line_count as isize;
        if delta != 0 {
            self.folds.apply_line_delta(first + 1, delta);
        }
        self.sync_fold_len();
    }

    fn sync_fold_len(&mut self) {
        if self.folds.len() != self.buffer.line_count() {
            self.folds.reset(self.buffer.line_count());
            self.bump_layout();
        }
    }

    /// Cursor (active selection end), re-resolved against the buffer.
    pub fn cursor_position(&self) -> CursorPos {
        position::clamp(self.buffer(), self.selection.end)
    }

    /// Move the cursor, collapsing the selection.
    pub fn set_cursor_position(&mut self, pos: CursorPos) {
        let pos = position::clamp(self.buffer(), pos);
        self.set_selection(Selection::caret(pos));
    }

    /// Cursor as an absolute character offset.
    pub fn absolute_cursor_position(&self) -> usize {
        position::to_offset(self.buffer(), self.selection.end)
    }

    /// Move the cursor to an absolute offset (clamped), collapsing the selection.
    pub fn set_absolute_cursor_position(&mut self, offset: usize) {
        let pos = position::to_cursor_pos(self.buffer(), offset);
        self.set_selection(Selection::caret(pos));
    }

    /// Selection as stored (anchor first).
    pub fn selection(&self) -> Selection {
        self.selection
    }

    /// Replace the selection. Clears the "search term selected" flag.
    pub fn set_selection(&mut self, selection: Selection) {
        self.selection = selection;
        self.term_selected = false;
        self.cursor_blink_on = true;
    }

    /// Whether the selection is non-empty.
    pub fn has_selection(&self) -> bool {
        !self.selection.is_empty(self.buffer())
    }

    /// Selected text.
    pub fn selected_text(&self) -> String {
        self.buffer.slice(self.selection_range())
    }

    fn selection_range(&self) -> Range<usize> {
        self.selection.ordered_offsets(self.buffer())
    }

    /// Undo the last edit group.
    pub fn undo(&mut self) -> Result<(), ViewError> {
        let old_line_count = self.buffer.line_count();
        let caret = self.buffer.undo().ok_or(ViewError::NothingToUndo)?;
        tracing::debug!(caret, "undo");
        self.after_history_step(old_line_count, caret);
        Ok(())
    }

    /// Redo the last undone edit group.
    pub fn redo(&mut self) -> Result<(), ViewError> {
        let old_line_count = self.buffer.line_count();
        let caret = self.buffer.redo().ok_or(ViewError::NothingToRedo)?;
        tracing::debug!(caret, "redo");
        self.after_history_step(old_line_count, caret);
        Ok(())
    }

    fn after_history_step(&mut self, old_line_count: usize, caret: usize) {
        if self.buffer.line_count() != old_line_count {
            self.folds.reset(self.buffer.line_count());
            self.bump_layout();
        }
        self.set_absolute_cursor_position(caret);
    }

    /// Whether undo is possible.
    pub fn can_undo(&self) -> bool {
        self.buffer.can_undo()
    }

    /// Whether redo is possible.
    pub fn can_redo(&self) -> bool {
        self.buffer.can_redo()
    }

    /// Whether the text differs from its last clean point.
    pub fn is_modified(&self) -> bool {
        self.buffer.is_modified()
    }

    /// Mark clean (`false`) or dirty (`true`).
    pub fn set_modified(&mut self, modified: bool) {
        self.buffer.set_modified(modified);
    }

    /// Buffer revision, bumped on every text change.
    pub fn modification_revision(&self) -> u64 {
        self.buffer.revision()
    }

    /// Drop undo/redo history.
    pub fn clear_history(&mut self) {
        self.buffer.clear_history();
    }

    /// Whether the syntax provider lets `line` open a region.
    pub fn is_foldable(&self, line: usize) -> bool {
        self.folds
            .is_foldable(self.buffer(), self.highlighter.syntax.as_ref(), line)
    }

    /// Whether `line` heads a collapsed region.
    pub fn is_folded(&self, line: usize) -> bool {
        self.folds.is_folded(line)
    }

    /// Closing line of the region opened at `line`.
    pub fn find_closing_line(&self, line: usize) -> Option<usize> {
        self.folds
            .find_closing_line(self.buffer(), self.highlighter.syntax.as_ref(), line)
    }

    /// Region opened at `line`.
    pub fn fold_region(&self, line: usize) -> Option<FoldRegion> {
        self.folds
            .region_at(self.buffer(), self.highlighter.syntax.as_ref(), line)
    }

    /// Gutter marker for `line`.
    pub fn fold_marker(&self, line: usize) -> FoldMarker {
        self.folds
            .fold_marker(self.buffer(), self.highlighter.syntax.as_ref(), line)
    }

    /// Visibility state of `line`.
    pub fn line_visibility(&self, line: usize) -> LineVisibility {
        self.folds.visibility(line)
    }

    /// Number of hidden lines.
    pub fn hidden_line_count(&self) -> usize {
        self.folds.hidden_line_count()
    }

    /// Fold or unfold the region headed by `line`. Returns `true` when visibility changed.
    ///
    /// A cursor left inside a newly hidden body moves to the end of the header line.
    pub fn toggle_fold(&mut self, line: usize) -> bool {
        let syntax = Arc::clone(&self.highlighter.syntax);
        let changed = self.folds.toggle(self.buffer.as_ref(), syntax.as_ref(), line);
        tracing::debug!(line, changed, folded = self.folds.is_folded(line), "toggle fold");
        if !changed {
            return false;
        }

        self.bump_layout();
        let cursor = self.cursor_position();
        if !self.folds.is_visible(cursor.line) {
            let header = self.folds.visible_anchor(cursor.line);
            self.set_cursor_position(CursorPos::new(header, self.buffer.line_len(header)));
        }
        true
    }

    /// Expand every folded region.
    pub fn unfold_all(&mut self) -> bool {
        let changed = self.folds.unfold_all();
        if changed {
            self.bump_layout();
        }
        changed
    }

    /// Borrowed geometry for the current state.
    pub fn geometry(&self) -> LineGeometry<'_> {
        LineGeometry {
            buffer: self.buffer.as_ref(),
            folds: &self.folds,
            metrics: self.metrics.as_ref(),
            wrap: self.config.word_wrap,
        }
    }

    /// Visual rows of `line` (0 when hidden).
    pub fn rendered_line_count(&self, line: usize) -> usize {
        self.geometry().rendered_line_count(line)
    }

    /// Lazily enumerate the blocks intersecting `rect` (viewport coordinates).
    pub fn visible_blocks(&self, rect: Rect) -> VisibleBlocks<'_> {
        self.geometry().visible_blocks(self.scroll, rect)
    }

    /// Line under viewport row `y`.
    pub fn line_at_vertical_position(&self, y: i32) -> Option<usize> {
        self.geometry().line_at_vertical_position(self.scroll, y)
    }

    /// Height of all visible lines.
    pub fn document_height(&self) -> i64 {
        self.geometry().document_height()
    }

    /// Current scroll position.
    pub fn scroll_position(&self) -> ScrollPosition {
        self.scroll
    }

    /// Set the scroll position; hidden lines snap to their fold header.
    pub fn set_scroll_position(&mut self, scroll: ScrollPosition) {
        self.scroll = self.geometry().normalize_scroll(scroll);
    }

    /// Put `line` (or its fold header) at the top of the viewport.
    pub fn scroll_to_line(&mut self, line: usize) {
        self.set_scroll_position(ScrollPosition {
            first_line: line,
            offset_y: 0,
        });
    }

    /// Scroll content up by `dy` pixels (negative scrolls back).
    pub fn scroll_by_pixels(&mut self, dy: i32) {
        self.set_scroll_position(ScrollPosition {
            first_line: self.scroll.first_line,
            offset_y: self.scroll.offset_y - dy,
        });
    }

    /// Scroll the minimum needed to show the cursor line in a viewport `viewport_height` tall.
    pub fn ensure_cursor_visible(&mut self, viewport_height: i32) {
        let line = self.cursor_position().line;
        self.scroll = self
            .geometry()
            .reveal_line(self.scroll, line, viewport_height);
    }

    /// Search `term` inside `region`, starting from the selection, and select the match.
    ///
    /// A cursor outside the region first moves to the nearest region bound. Returns the new
    /// selection, `Ok(None)` when nothing acceptable was found, or an error for a malformed
    /// pattern.
    pub fn find(
        &mut self,
        term: &str,
        region: SearchRegion,
        direction: FindDirection,
        options: SearchOptions,
        wrap_around: bool,
    ) -> Result<Option<Selection>, ViewError> {
        let bounds = region.resolve(self.buffer.char_count());
        let cursor = self.absolute_cursor_position();
        if cursor < bounds.start {
            self.set_absolute_cursor_position(bounds.start);
        } else if cursor > bounds.end {
            self.set_absolute_cursor_position(bounds.end);
        }

        let text = self.buffer.text();
        let hit = find_in_region(
            &text,
            term,
            options,
            bounds.clone(),
            self.selection_range(),
            direction,
            wrap_around,
        )?;
        tracing::debug!(term, ?bounds, ?direction, wrap_around, found = ?hit, "find");

        let Some(hit) = hit else {
            return Ok(None);
        };
        let selection = Selection::from_offsets(self.buffer(), hit.start, hit.end);
        self.set_selection(selection);
        self.term_selected = true;
        Ok(Some(selection))
    }

    /// Search again from the selection start, so a match that is already selected can be found
    /// again while the term is still being typed.
    pub fn find_tentative(
        &mut self,
        term: &str,
        direction: FindDirection,
        options: SearchOptions,
    ) -> Result<Option<Selection>, ViewError> {
        let start = self.selection_range().start;
        self.set_absolute_cursor_position(start);
        self.find(term, SearchRegion::whole(), direction, options, true)
    }

    /// Search the whole buffer without wrapping.
    pub fn find_in_buffer(
        &mut self,
        term: &str,
        direction: FindDirection,
        options: SearchOptions,
    ) -> Result<Option<Selection>, ViewError> {
        self.find(term, SearchRegion::whole(), direction, options, false)
    }

    /// Whether the selection is an unmodified search match.
    pub fn is_term_selected(&self) -> bool {
        self.term_selected
    }

    /// Re-emit leading whitespace as tabs (`true`) or spaces (`false`).
    pub fn convert_leading_whitespace(&mut self, to_tabs: bool) {
        let text = self.buffer.text();
        let converted = transform::convert_leading_whitespace(&text, to_tabs, self.config.tab_width);
        tracing::debug!(to_tabs, tab_width = self.config.tab_width, "convert leading whitespace");
        self.replace_all(text, converted);
    }

    /// Convert leading whitespace to tabs.
    pub fn convert_leading_whitespace_to_tabs(&mut self) {
        self.convert_leading_whitespace(true);
    }

    /// Convert leading whitespace to spaces.
    pub fn convert_leading_whitespace_to_spaces(&mut self) {
        self.convert_leading_whitespace(false);
    }

    /// Trim spaces and tabs at line starts and/or ends.
    pub fn trim_whitespace(&mut self, leading: bool, trailing: bool) {
        if !leading && !trailing {
            return;
        }
        let text = self.buffer.text();
        let trimmed = transform::trim_whitespace(&text, leading, trailing);
        tracing::debug!(leading, trailing, "trim whitespace");
        self.replace_all(text, trimmed);
    }

    fn replace_all(&mut self, old: String, new: String) {
        if old == new {
            return;
        }
        let pos = self.cursor_position();
        let len = self.buffer.char_count();
        self.buffer.begin_group();
        self.buffer.replace(0..len, &new);
        self.buffer.end_group();
        self.folds.reset(self.buffer.line_count());
        self.bump_layout();
        self.set_cursor_position(pos);
    }

    fn selected_line_span(&self) -> (usize, usize) {
        self.selection.line_span(self.buffer())
    }

    /// Swap the selected lines with the line above.
    pub fn move_lines_up(&mut self) -> bool {
        let (first, last) = self.selected_line_span();
        if first == 0 {
            return false;
        }
        if self.folds.unfold_touching(first - 1, last) {
            self.bump_layout();
        }
        match transform::move_lines_up(self.buffer(), first, last) {
            Some(edit) => self.apply_block_edit(edit, "move lines up"),
            None => false,
        }
    }

    /// Swap the selected lines with the line below.
    pub fn move_lines_down(&mut self) -> bool {
        let (first, last) = self.selected_line_span();
        if last + 1 >= self.buffer.line_count() {
            return false;
        }
        if self.folds.unfold_touching(first, last + 1) {
            self.bump_layout();
        }
        match transform::move_lines_down(self.buffer(), first, last) {
            Some(edit) => self.apply_block_edit(edit, "move lines down"),
            None => false,
        }
    }

    /// Copy the selected lines above themselves.
    pub fn duplicate_lines(&mut self) -> bool {
        let (first, last) = self.selected_line_span();
        let edit = transform::duplicate_lines(self.buffer(), first, last);
        self.apply_block_edit(edit, "duplicate lines")
    }

    /// Remove the selected lines.
    pub fn delete_lines(&mut self) -> bool {
        let (first, last) = self.selected_line_span();
        let had_next_line = last + 1 < self.buffer.line_count();
        let edit = transform::delete_lines(self.buffer(), first, last);
        if !self.apply_block_edit(edit, "delete lines") {
            return false;
        }

        let cursor = if had_next_line {
            CursorPos::new(first, 0)
        } else if first > 0 {
            CursorPos::new(first - 1, self.buffer.line_len(first - 1))
        } else {
            CursorPos::new(0, 0)
        };
        self.set_cursor_position(cursor);
        true
    }

    fn apply_block_edit(&mut self, edit: BlockEdit, what: &str) -> bool {
        let (start, end) = self.selection.ordered(self.buffer());
        let anchor_first = self.selection.start <= self.selection.end;

        self.buffer.begin_group();
        self.buffer.replace(edit.range.clone(), &edit.text);
        self.buffer.end_group();

        if edit.line_delta != 0 {
            self.folds.apply_line_delta(edit.edit_line, edit.line_delta);
            self.bump_layout();
        }
        self.sync_fold_len();
        tracing::debug!(
            op = what,
            line = edit.edit_line,
            line_delta = edit.line_delta,
            span_shift = edit.span_shift,
            "block edit"
        );

        let shift = |pos: CursorPos| {
            CursorPos::new(pos.line.saturating_add_signed(edit.span_shift), pos.column)
        };
        let (start, end) = (shift(start), shift(end));
        let selection = if anchor_first {
            Selection::new(start, end)
        } else {
            Selection::new(end, start)
        };
        self.set_selection(Selection::new(
            position::clamp(self.buffer(), selection.start),
            position::clamp(self.buffer(), selection.end),
        ));
        true
    }

    /// Overlay layers in composition order.
    pub fn highlight_layers(&self) -> Vec<HighlightLayer> {
        let buffer = self.buffer();
        let theme = self.theme();
        let selection = self.selection_range();
        let search_hit = self.term_selected.then(|| selection.clone());

        vec![
            current_line_layer(buffer, self.cursor_position().line, theme),
            matching_brackets_layer(buffer, self.absolute_cursor_position(), theme),
            same_word_layer(buffer, selection.clone(), theme),
            search_hit_layer(search_hit, theme),
            text_selection_layer(selection, theme),
        ]
    }

    /// All overlay entries, flattened in composition order.
    pub fn composited_highlights(&self) -> Vec<HighlightEntry> {
        composite(&self.highlight_layers())
    }

    /// Blink half-period, or `None` when blinking is disabled.
    pub fn cursor_blink_interval(&self) -> Option<Duration> {
        (self.config.cursor_blink_ms > 0).then(|| Duration::from_millis(self.config.cursor_blink_ms))
    }

    /// Advance the blink phase. Returns the new visibility.
    pub fn tick_cursor_blink(&mut self) -> bool {
        if self.cursor_blink_interval().is_some() {
            self.cursor_blink_on = !self.cursor_blink_on;
        } else {
            self.cursor_blink_on = true;
        }
        self.cursor_blink_on
    }
}

impl Default for EditorView {
    fn default() -> Self {
        Self::from_text("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_clamps() {
        let mut view = EditorView::from_text("abc\nde");
        view.set_cursor_position(CursorPos::new(1, 10));
        assert_eq!(view.cursor_position(), CursorPos::new(1, 2));
        assert_eq!(view.absolute_cursor_position(), 6);
    }

    #[test]
    fn test_set_text_in_selection_keeps_selection() {
        let mut view = EditorView::from_text("hello world");
        view.set_selection(Selection::new(CursorPos::new(0, 6), CursorPos::new(0, 11)));
        view.set_text_in_selection("rust", true);
        assert_eq!(view.text(), "hello rust");
        assert_eq!(view.selected_text(), "rust");

        view.set_text_in_selection("RUST", false);
        assert_eq!(view.text(), "hello RUST");
        assert!(!view.has_selection());
        assert_eq!(view.absolute_cursor_position(), 10);
    }

    #[test]
    fn test_overwrite_mode() {
        let mut view = EditorView::from_text("abcd");
        view.toggle_overwrite_mode();
        view.set_cursor_position(CursorPos::new(0, 1));
        view.insert_text("XY");
        assert_eq!(view.text(), "aXYd");
        view.insert_text("123");
        assert_eq!(view.text(), "aXY123");
    }

    #[test]
    fn test_smart_indent_newline() {
        let mut view = EditorView::from_text("    foo");
        view.set_cursor_position(CursorPos::new(0, 7));
        view.insert_newline();
        assert_eq!(view.text(), "    foo\n    ");
        assert_eq!(view.cursor_position(), CursorPos::new(1, 4));

        // One undo removes newline and indent together.
        assert!(view.undo().is_ok());
        assert_eq!(view.text(), "    foo");
    }

    #[test]
    fn test_tab_and_backspace_with_spaces() {
        let mut view = EditorView::from_text("");
        view.set_tab_to_spaces(true);
        view.insert_tab();
        view.insert_tab();
        assert_eq!(view.text(), "        ");
        view.backspace();
        assert_eq!(view.text(), "    ");
        view.insert_text("x");
        view.backspace();
        assert_eq!(view.text(), "    ");
    }

    #[test]
    fn test_current_word() {
        let mut view = EditorView::from_text("let value = 1;");
        view.set_cursor_position(CursorPos::new(0, 6));
        assert_eq!(view.current_word(), "value");
        view.set_cursor_position(CursorPos::new(0, 3));
        assert_eq!(view.current_word(), "let");
    }

    #[test]
    fn test_undo_on_empty_history() {
        let mut view = EditorView::from_text("x");
        assert!(matches!(view.undo(), Err(ViewError::NothingToUndo)));
        assert!(matches!(view.redo(), Err(ViewError::NothingToRedo)));
    }

    #[test]
    fn test_blink() {
        let mut view = EditorView::from_text("x");
        assert_eq!(view.cursor_blink_interval(), Some(Duration::from_millis(500)));
        assert!(!view.tick_cursor_blink());
        view.set_cursor_position(CursorPos::new(0, 1));
        assert!(view.cursor_blink_on);
    }
}
