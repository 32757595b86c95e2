//! Highlight Compositor.
//!
//! Overlay highlights are computed as independent layers, each a pure function of the current
//! buffer, cursor and theme. Layers are concatenated in a fixed order and never merged; the
//! text-selection entry is appended last so it paints over everything before it.

use crate::buffer::TextBuffer;
use crate::search::{SearchOptions, find_all_overlapping};
use crate::syntax::{Color, Theme, ThemeRole};
use std::ops::Range;

/// Overlay layers, in composition order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Line holding the cursor.
    CurrentLine,
    /// Bracket pair at the cursor.
    MatchingBrackets,
    /// Other occurrences of the selected text.
    SameWord,
    /// Active search match.
    SearchHit,
    /// The selection itself.
    TextSelection,
}

impl LayerKind {
    /// All layers in composition order.
    pub const ORDER: [LayerKind; 5] = [
        LayerKind::CurrentLine,
        LayerKind::MatchingBrackets,
        LayerKind::SameWord,
        LayerKind::SearchHit,
        LayerKind::TextSelection,
    ];
}

/// Visual overrides applied to a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HighlightStyle {
    /// Foreground override.
    pub foreground: Option<Color>,
    /// Background override.
    pub background: Option<Color>,
    /// Drop foreground overrides painted by earlier entries.
    pub clear_foreground: bool,
    /// Paint the background across the full viewport width.
    pub full_width: bool,
}

/// One styled character range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightEntry {
    /// Absolute character range.
    pub range: Range<usize>,
    /// Style to apply.
    pub style: HighlightStyle,
}

/// Entries of one layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightLayer {
    /// Which layer this is.
    pub kind: LayerKind,
    /// Entries in document order.
    pub entries: Vec<HighlightEntry>,
}

impl HighlightLayer {
    fn new(kind: LayerKind, entries: Vec<HighlightEntry>) -> Self {
        Self { kind, entries }
    }
}

/// Full-width background on `line`.
pub fn current_line_layer(buffer: &dyn TextBuffer, line: usize, theme: &Theme) -> HighlightLayer {
    let start = buffer.line_start(line);
    let entry = HighlightEntry {
        range: start..start + buffer.line_len(line),
        style: HighlightStyle {
            background: Some(theme.color(ThemeRole::CurrentLine)),
            full_width: true,
            ..HighlightStyle::default()
        },
    };
    HighlightLayer::new(LayerKind::CurrentLine, vec![entry])
}

fn bracket_partner(ch: char) -> Option<(char, bool)> {
    match ch {
        '(' => Some((')', true)),
        '[' => Some((']', true)),
        '{' => Some(('}', true)),
        ')' => Some(('(', false)),
        ']' => Some(('[', false)),
        '}' => Some(('{', false)),
        _ => None,
    }
}

fn scan_for_partner(buffer: &dyn TextBuffer, at: usize) -> Option<usize> {
    let open = buffer.char_at(at)?;
    let (close, forward) = bracket_partner(open)?;
    let mut depth = 0usize;

    if forward {
        for offset in at + 1..buffer.char_count() {
            match buffer.char_at(offset) {
                Some(c) if c == open => depth += 1,
                Some(c) if c == close => {
                    if depth == 0 {
                        return Some(offset);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    } else {
        for offset in (0..at).rev() {
            match buffer.char_at(offset) {
                Some(c) if c == open => depth += 1,
                Some(c) if c == close => {
                    if depth == 0 {
                        return Some(offset);
                    }
                    depth -= 1;
                }
                _ => {}
            }
        }
    }
    None
}

/// Offsets of the bracket pair at `cursor` (the character after the caret) or, failing that,
/// just before it.
pub fn matching_bracket_pair(buffer: &dyn TextBuffer, cursor: usize) -> Option<(usize, usize)> {
    let candidates = [Some(cursor), cursor.checked_sub(1)];
    candidates.into_iter().flatten().find_map(|at| {
        let partner = scan_for_partner(buffer, at)?;
        Some((at.min(partner), at.max(partner)))
    })
}

/// Zero or two one-character entries for the bracket pair around `cursor`.
pub fn matching_brackets_layer(
    buffer: &dyn TextBuffer,
    cursor: usize,
    theme: &Theme,
) -> HighlightLayer {
    let style = HighlightStyle {
        foreground: Some(theme.color(ThemeRole::BracketMatching)),
        ..HighlightStyle::default()
    };
    let entries = match matching_bracket_pair(buffer, cursor) {
        Some((a, b)) => vec![
            HighlightEntry {
                range: a..a + 1,
                style,
            },
            HighlightEntry {
                range: b..b + 1,
                style,
            },
        ],
        None => Vec::new(),
    };
    HighlightLayer::new(LayerKind::MatchingBrackets, entries)
}

/// Every occurrence (overlaps included) of the text in `selection`.
///
/// Empty unless the selected text has at least two characters and is not all whitespace.
pub fn same_word_layer(
    buffer: &dyn TextBuffer,
    selection: Range<usize>,
    theme: &Theme,
) -> HighlightLayer {
    let mut entries = Vec::new();
    if selection.len() >= 2 {
        let needle = buffer.slice(selection);
        if !needle.trim().is_empty() {
            let style = HighlightStyle {
                foreground: Some(theme.color(ThemeRole::Keyword)),
                background: Some(theme.color(ThemeRole::SearchHighlight)),
                ..HighlightStyle::default()
            };
            let hits =
                find_all_overlapping(&buffer.text(), &needle, SearchOptions::plain())
                    .unwrap_or_default();
            entries = hits
                .into_iter()
                .map(|m| HighlightEntry {
                    range: m.start..m.end,
                    style,
                })
                .collect();
        }
    }
    HighlightLayer::new(LayerKind::SameWord, entries)
}

/// The active search match, if any.
pub fn search_hit_layer(hit: Option<Range<usize>>, theme: &Theme) -> HighlightLayer {
    let entries = hit
        .filter(|r| !r.is_empty())
        .map(|range| HighlightEntry {
            range,
            style: HighlightStyle {
                background: Some(theme.color(ThemeRole::SearchHighlight)),
                ..HighlightStyle::default()
            },
        })
        .into_iter()
        .collect();
    HighlightLayer::new(LayerKind::SearchHit, entries)
}

/// Selection entry: clears foreground overrides and paints the selection background.
pub fn text_selection_layer(selection: Range<usize>, theme: &Theme) -> HighlightLayer {
    let mut entries = Vec::new();
    if !selection.is_empty() {
        entries.push(HighlightEntry {
            range: selection,
            style: HighlightStyle {
                background: Some(theme.color(ThemeRole::TextSelection)),
                clear_foreground: true,
                ..HighlightStyle::default()
            },
        });
    }
    HighlightLayer::new(LayerKind::TextSelection, entries)
}

/// Flatten layers into one list, preserving layer order.
pub fn composite(layers: &[HighlightLayer]) -> Vec<HighlightEntry> {
    layers
        .iter()
        .flat_map(|layer| layer.entries.iter().cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::RopeBuffer;

    #[test]
    fn test_bracket_pair_at_and_before_cursor() {
        let buffer = RopeBuffer::new("f(a[1], {b})");
        assert_eq!(matching_bracket_pair(&buffer, 1), Some((1, 11)));
        assert_eq!(matching_bracket_pair(&buffer, 12), Some((1, 11)));
        assert_eq!(matching_bracket_pair(&buffer, 3), Some((3, 5)));
        assert_eq!(matching_bracket_pair(&buffer, 8), Some((8, 10)));
        assert_eq!(matching_bracket_pair(&buffer, 0), None);
    }

    #[test]
    fn test_unbalanced_bracket() {
        let buffer = RopeBuffer::new("((a)");
        assert_eq!(matching_bracket_pair(&buffer, 0), None);
        assert_eq!(matching_bracket_pair(&buffer, 1), Some((1, 3)));
    }

    #[test]
    fn test_same_word_overlapping() {
        let buffer = RopeBuffer::new("aaa");
        let theme = Theme::default();
        let layer = same_word_layer(&buffer, 0..2, &theme);
        let ranges: Vec<_> = layer.entries.iter().map(|e| e.range.clone()).collect();
        assert_eq!(ranges, vec![0..2, 1..3]);
        assert_eq!(layer.entries[0].style.foreground, Some(theme.keyword));
    }

    #[test]
    fn test_same_word_thresholds() {
        let buffer = RopeBuffer::new("a a  a");
        let theme = Theme::default();
        assert!(same_word_layer(&buffer, 0..1, &theme).entries.is_empty());
        assert!(same_word_layer(&buffer, 3..5, &theme).entries.is_empty());
    }

    #[test]
    fn test_selection_entry_is_last() {
        let buffer = RopeBuffer::new("ab ab");
        let theme = Theme::default();
        let layers = vec![
            current_line_layer(&buffer, 0, &theme),
            matching_brackets_layer(&buffer, 0, &theme),
            same_word_layer(&buffer, 0..2, &theme),
            search_hit_layer(None, &theme),
            text_selection_layer(0..2, &theme),
        ];
        let flat = composite(&layers);
        assert_eq!(flat.len(), 4);
        let last = flat.last().map(|e| e.style);
        assert_eq!(
            last,
            Some(HighlightStyle {
                foreground: None,
                background: Some(theme.text_selection),
                clear_foreground: true,
                full_width: false,
            })
        );
    }
}
