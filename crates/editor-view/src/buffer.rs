//! Buffer collaborator.
//!
//! The view engine never owns text directly. It talks to a [`TextBuffer`], which exposes line
//! geometry, ranged replacement and grouped undo/redo. [`RopeBuffer`] is the default
//! implementation, backed by a `ropey::Rope` with LF-only line breaks.
//!
//! All offsets are **character offsets** (Unicode scalar values), never bytes.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

/// Capability interface the view engine needs from a document.
pub trait TextBuffer {
    /// Total number of characters (line terminators included).
    fn char_count(&self) -> usize;

    /// Number of logical lines. An empty buffer has one (empty) line.
    fn line_count(&self) -> usize;

    /// Text of `line` without its terminator, or `None` if out of range.
    fn line(&self, line: usize) -> Option<Cow<'_, str>>;

    /// Character length of `line` excluding its terminator (0 when out of range).
    fn line_len(&self, line: usize) -> usize;

    /// Character offset of the first character of `line`.
    ///
    /// Lines past the end map to [`TextBuffer::char_count`].
    fn line_start(&self, line: usize) -> usize;

    /// Line containing `offset` (clamped to the buffer).
    fn offset_to_line(&self, offset: usize) -> usize;

    /// Character at `offset`, if any.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Copy of the text in `range` (clamped).
    fn slice(&self, range: Range<usize>) -> String;

    /// Copy of the whole text.
    fn text(&self) -> String {
        self.slice(0..self.char_count())
    }

    /// Replace `range` (clamped) with `text`, recording it for undo.
    fn replace(&mut self, range: Range<usize>, text: &str);

    /// Open an undo group. Every replace until the matching [`TextBuffer::end_group`] undoes as
    /// one step. Groups nest; only the outermost bracket closes the group.
    fn begin_group(&mut self);

    /// Close the undo group opened by [`TextBuffer::begin_group`].
    fn end_group(&mut self);

    /// Undo the most recent group. Returns the caret offset after undoing, or `None` when the
    /// undo stack is empty.
    fn undo(&mut self) -> Option<usize>;

    /// Redo the most recently undone group. Returns the caret offset after redoing.
    fn redo(&mut self) -> Option<usize>;

    /// Whether an undo step is available.
    fn can_undo(&self) -> bool;

    /// Whether a redo step is available.
    fn can_redo(&self) -> bool;

    /// Whether the buffer differs from its last clean point.
    fn is_modified(&self) -> bool;

    /// Mark the current state clean (`false`) or force it dirty (`true`).
    fn set_modified(&mut self, modified: bool);

    /// Monotonic revision counter, bumped on every text change (including undo/redo).
    fn revision(&self) -> u64;

    /// Drop all undo/redo history.
    fn clear_history(&mut self);
}

#[derive(Debug, Clone)]
struct TextEdit {
    start: usize,
    deleted_text: String,
    inserted_text: String,
}

impl TextEdit {
    fn deleted_len(&self) -> usize {
        self.deleted_text.chars().count()
    }

    fn inserted_len(&self) -> usize {
        self.inserted_text.chars().count()
    }
}

#[derive(Debug, Clone)]
struct UndoStep {
    group_id: usize,
    edit: TextEdit,
}

#[derive(Debug)]
struct UndoHistory {
    undo_stack: Vec<UndoStep>,
    redo_stack: Vec<UndoStep>,
    max_undo: usize,
    /// Clean point as an `undo_stack.len()`. May point into the redo area.
    clean_index: Option<usize>,
    next_group_id: usize,
    open_group_id: Option<usize>,
    group_depth: usize,
}

impl UndoHistory {
    fn new(max_undo: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo,
            clean_index: Some(0),
            next_group_id: 0,
            open_group_id: None,
            group_depth: 0,
        }
    }

    fn is_clean(&self) -> bool {
        self.clean_index == Some(self.undo_stack.len())
    }

    fn begin_group(&mut self) {
        if self.group_depth == 0 {
            self.open_group_id = None;
        }
        self.group_depth += 1;
    }

    fn end_group(&mut self) {
        self.group_depth = self.group_depth.saturating_sub(1);
        if self.group_depth == 0 {
            self.open_group_id = None;
        }
    }

    fn clear_redo_and_adjust_clean(&mut self) {
        if self.redo_stack.is_empty() {
            return;
        }

        if let Some(clean_index) = self.clean_index
            && clean_index > self.undo_stack.len()
        {
            self.clean_index = None;
        }

        self.redo_stack.clear();
    }

    fn push(&mut self, edit: TextEdit) {
        self.clear_redo_and_adjust_clean();

        if self.undo_stack.len() >= self.max_undo {
            self.undo_stack.remove(0);
            self.clean_index = match self.clean_index {
                Some(0) | None => None,
                Some(idx) => Some(idx - 1),
            };
        }

        let group_id = match self.open_group_id {
            Some(id) if self.group_depth > 0 => id,
            _ => {
                let id = self.next_group_id;
                self.next_group_id = self.next_group_id.wrapping_add(1);
                if self.group_depth > 0 {
                    self.open_group_id = Some(id);
                }
                id
            }
        };

        self.undo_stack.push(UndoStep { group_id, edit });
    }

    fn pop_group(stack: &mut Vec<UndoStep>) -> Option<Vec<UndoStep>> {
        let last_group_id = stack.last().map(|s| s.group_id)?;
        let mut steps = Vec::new();
        while stack.last().is_some_and(|s| s.group_id == last_group_id) {
            if let Some(step) = stack.pop() {
                steps.push(step);
            }
        }
        Some(steps)
    }

    fn clear(&mut self) {
        let was_clean = self.is_clean();
        self.undo_stack.clear();
        self.redo_stack.clear();
        self.clean_index = was_clean.then_some(0);
        self.open_group_id = None;
    }
}

/// Default [`TextBuffer`] implementation over a `ropey::Rope`.
///
/// CRLF input is normalized to LF on construction; only `'\n'` terminates lines.
pub struct RopeBuffer {
    rope: Rope,
    history: UndoHistory,
    revision: u64,
}

impl RopeBuffer {
    /// Maximum number of undo steps kept before the oldest are discarded.
    pub const MAX_UNDO: usize = 1000;

    /// Build a buffer from text.
    pub fn new(text: &str) -> Self {
        let rope = if text.contains('\r') {
            Rope::from_str(&text.replace("\r\n", "\n"))
        } else {
            Rope::from_str(text)
        };

        Self {
            rope,
            history: UndoHistory::new(Self::MAX_UNDO),
            revision: 0,
        }
    }

    /// Build an empty buffer.
    pub fn empty() -> Self {
        Self::new("")
    }

    fn clamp_range(&self, range: Range<usize>) -> Range<usize> {
        let len = self.rope.len_chars();
        let start = range.start.min(len);
        let end = range.end.clamp(start, len);
        start..end
    }

    fn apply(&mut self, start: usize, delete_len: usize, insert: &str) {
        if delete_len > 0 {
            self.rope.remove(start..start + delete_len);
        }
        if !insert.is_empty() {
            self.rope.insert(start, insert);
        }
        self.revision = self.revision.wrapping_add(1);
    }
}

impl Default for RopeBuffer {
    fn default() -> Self {
        Self::empty()
    }
}

impl TextBuffer for RopeBuffer {
    fn char_count(&self) -> usize {
        self.rope.len_chars()
    }

    fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    fn line(&self, line: usize) -> Option<Cow<'_, str>> {
        if line >= self.rope.len_lines() {
            return None;
        }
        let start = self.rope.line_to_char(line);
        let len = self.line_len(line);
        Some(Cow::from(self.rope.slice(start..start + len)))
    }

    fn line_len(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return 0;
        }
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }

    fn line_start(&self, line: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        self.rope.line_to_char(line)
    }

    fn offset_to_line(&self, offset: usize) -> usize {
        self.rope.char_to_line(offset.min(self.rope.len_chars()))
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        if offset >= self.rope.len_chars() {
            return None;
        }
        Some(self.rope.char(offset))
    }

    fn slice(&self, range: Range<usize>) -> String {
        let range = self.clamp_range(range);
        self.rope.slice(range).to_string()
    }

    fn replace(&mut self, range: Range<usize>, text: &str) {
        let range = self.clamp_range(range);
        if range.is_empty() && text.is_empty() {
            return;
        }

        let deleted_text = self.rope.slice(range.clone()).to_string();
        if deleted_text == text {
            return;
        }

        self.apply(range.start, range.len(), text);
        self.history.push(TextEdit {
            start: range.start,
            deleted_text,
            inserted_text: text.to_string(),
        });
    }

    fn begin_group(&mut self) {
        self.history.begin_group();
    }

    fn end_group(&mut self) {
        self.history.end_group();
    }

    fn undo(&mut self) -> Option<usize> {
        // Undo always closes any coalescing group first.
        self.history.open_group_id = None;
        let steps = UndoHistory::pop_group(&mut self.history.undo_stack)?;

        // `steps` is newest -> oldest, which is the order inverses must be applied in.
        let mut caret = 0;
        for step in &steps {
            let edit = &step.edit;
            self.apply(edit.start, edit.inserted_len(), &edit.deleted_text);
            caret = edit.start + edit.deleted_len();
        }

        // Redo pops oldest first.
        self.history.redo_stack.extend(steps);
        Some(caret)
    }

    fn redo(&mut self) -> Option<usize> {
        self.history.open_group_id = None;
        let steps = UndoHistory::pop_group(&mut self.history.redo_stack)?;

        let mut caret = 0;
        for step in &steps {
            let edit = &step.edit;
            self.apply(edit.start, edit.deleted_len(), &edit.inserted_text);
            caret = edit.start + edit.inserted_len();
        }

        self.history.undo_stack.extend(steps);
        Some(caret)
    }

    fn can_undo(&self) -> bool {
        !self.history.undo_stack.is_empty()
    }

    fn can_redo(&self) -> bool {
        !self.history.redo_stack.is_empty()
    }

    fn is_modified(&self) -> bool {
        !self.history.is_clean()
    }

    fn set_modified(&mut self, modified: bool) {
        self.history.clean_index = if modified {
            None
        } else {
            Some(self.history.undo_stack.len())
        };
    }

    fn revision(&self) -> u64 {
        self.revision
    }

    fn clear_history(&mut self) {
        self.history.clear();
    }
}
