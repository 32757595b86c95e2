//! Search Engine.
//!
//! Search helpers over a UTF-8 `&str`, using **character offsets** (not byte offsets) for all
//! public inputs/outputs:
//!
//! - plain substring search (escaped and compiled into a regex)
//! - regex search
//! - optional whole-word matching
//! - region-bounded, direction-aware search with wraparound ([`find_in_region`])

use crate::error::ViewError;
use regex::{Regex, RegexBuilder};
use std::ops::Range;

/// Options that control how search is performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// If `true`, performs a case-sensitive search.
    pub case_sensitive: bool,
    /// If `true`, matches only whole words (alphanumeric and `_`).
    pub whole_word: bool,
    /// If `true`, treats the query as a regex pattern.
    pub regex: bool,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            case_sensitive: true,
            whole_word: false,
            regex: true,
        }
    }
}

impl SearchOptions {
    /// Literal, case-sensitive matching.
    pub fn plain() -> Self {
        Self {
            regex: false,
            ..Self::default()
        }
    }
}

/// A match returned by the search APIs, expressed as a half-open character range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchMatch {
    /// Inclusive start character offset.
    pub start: usize,
    /// Exclusive end character offset.
    pub end: usize,
}

impl SearchMatch {
    /// Returns the length of the match in characters.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns `true` if the match is empty.
    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    /// Whether the match lies entirely inside `region`.
    pub fn is_within(&self, region: &Range<usize>) -> bool {
        self.start >= region.start && self.end <= region.end
    }
}

/// Search direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FindDirection {
    /// Toward the end of the buffer.
    #[default]
    Forward,
    /// Toward the start of the buffer.
    Backward,
}

/// Character range a search is confined to. `end = None` means the end of the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchRegion {
    /// First character offset of the region.
    pub start: usize,
    /// One past the last character offset, or `None` for the buffer end.
    pub end: Option<usize>,
}

impl SearchRegion {
    /// The whole buffer.
    pub const fn whole() -> Self {
        Self {
            start: 0,
            end: None,
        }
    }

    /// `[start, end)`.
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start,
            end: Some(end),
        }
    }

    /// Concrete bounds for a buffer of `char_count` characters.
    pub fn resolve(&self, char_count: usize) -> Range<usize> {
        let end = self.end.unwrap_or(char_count).min(char_count);
        self.start.min(end)..end
    }
}

#[derive(Debug)]
pub(crate) struct CharIndex {
    char_to_byte: Vec<usize>,
    text_len: usize,
}

impl CharIndex {
    pub(crate) fn new(text: &str) -> Self {
        let mut char_to_byte: Vec<usize> = text.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(text.len());
        Self {
            char_to_byte,
            text_len: text.len(),
        }
    }

    pub(crate) fn char_count(&self) -> usize {
        self.char_to_byte.len().saturating_sub(1)
    }

    pub(crate) fn char_to_byte(&self, char_offset: usize) -> usize {
        let clamped = char_offset.min(self.char_count());
        self.char_to_byte
            .get(clamped)
            .copied()
            .unwrap_or(self.text_len)
    }

    pub(crate) fn byte_to_char(&self, byte_offset: usize) -> usize {
        let clamped = byte_offset.min(self.text_len);
        match self.char_to_byte.binary_search(&clamped) {
            Ok(idx) | Err(idx) => idx,
        }
    }

    pub(crate) fn char_at(&self, text: &str, char_offset: usize) -> Option<char> {
        if char_offset >= self.char_count() {
            return None;
        }
        let start = self.char_to_byte[char_offset];
        let end = self.char_to_byte[char_offset + 1];
        text.get(start..end)?.chars().next()
    }
}

fn compile_search_regex(query: &str, options: SearchOptions) -> Result<Regex, ViewError> {
    let pattern = if options.regex {
        query.to_string()
    } else {
        regex::escape(query)
    };

    Ok(RegexBuilder::new(&pattern)
        .case_insensitive(!options.case_sensitive)
        .multi_line(true)
        .build()?)
}

fn is_word_char(ch: char) -> bool {
    ch == '_' || ch.is_alphanumeric()
}

fn is_whole_word(text: &str, index: &CharIndex, m: SearchMatch) -> bool {
    if m.is_empty() {
        return false;
    }

    let before = if m.start == 0 {
        None
    } else {
        index.char_at(text, m.start - 1)
    };
    let after = index.char_at(text, m.end);

    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

/// Compiled query plus char index, reused across the scans of one search.
struct Matcher<'t> {
    text: &'t str,
    re: Regex,
    index: CharIndex,
    whole_word: bool,
}

impl<'t> Matcher<'t> {
    fn new(text: &'t str, query: &str, options: SearchOptions) -> Result<Self, ViewError> {
        Ok(Self {
            text,
            re: compile_search_regex(query, options)?,
            index: CharIndex::new(text),
            whole_word: options.whole_word,
        })
    }

    /// First acceptable match starting at or after `from_char`.
    fn next_from(&self, from_char: usize) -> Option<SearchMatch> {
        let mut start_char = from_char.min(self.index.char_count());
        loop {
            let start_byte = self.index.char_to_byte(start_char);
            let m = self.re.find_at(self.text, start_byte)?;

            let candidate = SearchMatch {
                start: self.index.byte_to_char(m.start()),
                end: self.index.byte_to_char(m.end()),
            };

            if candidate.is_empty() {
                if candidate.end >= self.index.char_count() {
                    return None;
                }
                start_char = candidate.end + 1;
                continue;
            }

            if self.whole_word && !is_whole_word(self.text, &self.index, candidate) {
                start_char = candidate.start + 1;
                continue;
            }

            return Some(candidate);
        }
    }

    /// Every acceptable match, advancing one character past each match start.
    fn overlapping(&self) -> impl Iterator<Item = SearchMatch> + '_ {
        let mut from = 0usize;
        std::iter::from_fn(move || {
            let m = self.next_from(from)?;
            from = m.start + 1;
            Some(m)
        })
    }
}

/// Find the next occurrence of `query` in `text`, searching forward from `from_char`.
///
/// - Returns `Ok(None)` if no match is found (or if `query` is empty).
/// - Match ranges are character offsets and are half-open (`[start, end)`).
pub fn find_next(
    text: &str,
    query: &str,
    options: SearchOptions,
    from_char: usize,
) -> Result<Option<SearchMatch>, ViewError> {
    if query.is_empty() {
        return Ok(None);
    }
    Ok(Matcher::new(text, query, options)?.next_from(from_char))
}

/// Find the last occurrence of `query` that starts strictly before `before_char`.
///
/// Overlapping candidates are considered, so in `"aaa"` the last `"aa"` before 2 starts at 1.
pub fn find_prev(
    text: &str,
    query: &str,
    options: SearchOptions,
    before_char: usize,
) -> Result<Option<SearchMatch>, ViewError> {
    if query.is_empty() || before_char == 0 {
        return Ok(None);
    }
    let matcher = Matcher::new(text, query, options)?;
    Ok(matcher
        .overlapping()
        .take_while(|m| m.start < before_char)
        .last())
}

/// Find all non-overlapping occurrences of `query` in `text`.
///
/// - Returns an empty list if `query` is empty.
/// - Match ranges are character offsets and are half-open (`[start, end)`).
pub fn find_all(
    text: &str,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<SearchMatch>, ViewError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }

    let matcher = Matcher::new(text, query, options)?;
    let mut matches: Vec<SearchMatch> = Vec::new();
    let mut from = 0usize;
    while let Some(m) = matcher.next_from(from) {
        from = m.end;
        matches.push(m);
    }
    Ok(matches)
}

/// Find all occurrences of `query`, restarting one character after each match start so that
/// overlapping occurrences are reported too.
pub fn find_all_overlapping(
    text: &str,
    query: &str,
    options: SearchOptions,
) -> Result<Vec<SearchMatch>, ViewError> {
    if query.is_empty() {
        return Ok(Vec::new());
    }
    let matcher = Matcher::new(text, query, options)?;
    Ok(matcher.overlapping().collect())
}

/// Returns `true` if `range` exactly matches an occurrence of `query` in `text`.
///
/// This is useful for checking whether a current selection range corresponds to the
/// "current match" when implementing find/replace flows.
pub fn is_match_exact(
    text: &str,
    query: &str,
    options: SearchOptions,
    range: SearchMatch,
) -> Result<bool, ViewError> {
    if range.is_empty() {
        return Ok(false);
    }

    let Some(next) = find_next(text, query, options, range.start)? else {
        return Ok(false);
    };

    Ok(next == range)
}

/// Directional search confined to `region`, starting from the current selection.
///
/// - Forward looks for the first match starting at or after `selection.end`.
/// - Backward looks for the last match starting before `selection.start`.
/// - Only matches fully inside `region` are accepted. When none is found and `wrap_around` is
///   set, the search restarts once from the opposite end of the region.
pub fn find_in_region(
    text: &str,
    query: &str,
    options: SearchOptions,
    region: Range<usize>,
    selection: Range<usize>,
    direction: FindDirection,
    wrap_around: bool,
) -> Result<Option<SearchMatch>, ViewError> {
    if query.is_empty() {
        return Ok(None);
    }
    let matcher = Matcher::new(text, query, options)?;

    let search = |origin: usize| -> Option<SearchMatch> {
        match direction {
            FindDirection::Forward => matcher.next_from(origin),
            FindDirection::Backward => {
                if origin == 0 {
                    return None;
                }
                matcher
                    .overlapping()
                    .take_while(|m| m.start < origin)
                    .last()
            }
        }
    };

    let origin = match direction {
        FindDirection::Forward => selection.end,
        FindDirection::Backward => selection.start,
    };
    if let Some(m) = search(origin).filter(|m| m.is_within(&region)) {
        return Ok(Some(m));
    }
    if !wrap_around {
        return Ok(None);
    }

    let restart = match direction {
        FindDirection::Forward => region.start,
        FindDirection::Backward => region.end,
    };
    Ok(search(restart).filter(|m| m.is_within(&region)))
}
