//! `editor-view-highlight-simple` - Simple fold providers for `editor-view`.
//!
//! These are line-oriented heuristics, intended for formats where a full parser is unnecessary:
//!
//! - [`BraceFoldProvider`]: a line opens a region when it leaves more `{` open than it closes;
//!   the region ends on the line that brings the depth back down.
//! - [`RegexFoldProvider`]: regions are delimited by start/end marker lines such as
//!   `// #region` / `// #endregion`, with nesting.

use editor_view::{SyntaxProvider, TextBuffer};
use regex::Regex;

/// Folds by bracket depth.
///
/// Brackets inside `"..."` literals and after a line comment prefix are ignored.
#[derive(Debug, Clone)]
pub struct BraceFoldProvider {
    open: char,
    close: char,
    line_comment: Option<String>,
}

impl BraceFoldProvider {
    pub fn new(open: char, close: char) -> Self {
        Self {
            open,
            close,
            line_comment: None,
        }
    }

    /// Ignore everything after `prefix` on a line.
    pub fn with_line_comment(mut self, prefix: impl Into<String>) -> Self {
        self.line_comment = Some(prefix.into());
        self
    }

    /// `{`/`}` folding with `//` comments (C, Rust, JavaScript...).
    pub fn c_like() -> Self {
        Self::new('{', '}').with_line_comment("//")
    }

    /// Net bracket change over one line, and the lowest depth reached relative to its start.
    fn line_balance(&self, text: &str) -> (isize, isize) {
        let code = match &self.line_comment {
            Some(prefix) => strip_line_comment(text, prefix),
            None => text,
        };

        let mut depth = 0isize;
        let mut lowest = 0isize;
        let mut quote: Option<char> = None;
        let mut escaped = false;

        for ch in code.chars() {
            if let Some(q) = quote {
                if escaped {
                    escaped = false;
                } else if ch == '\\' {
                    escaped = true;
                } else if ch == q {
                    quote = None;
                }
                continue;
            }

            if ch == '"' {
                quote = Some(ch);
            } else if ch == self.open {
                depth += 1;
            } else if ch == self.close {
                depth -= 1;
                lowest = lowest.min(depth);
            }
        }
        (depth, lowest)
    }
}

impl Default for BraceFoldProvider {
    fn default() -> Self {
        Self::c_like()
    }
}

impl SyntaxProvider for BraceFoldProvider {
    fn starts_fold_region(&self, buffer: &dyn TextBuffer, line: usize) -> bool {
        buffer
            .line(line)
            .is_some_and(|text| self.line_balance(&text).0 > 0)
    }

    fn fold_region_end(&self, buffer: &dyn TextBuffer, line: usize) -> Option<usize> {
        let (mut depth, _) = self.line_balance(&buffer.line(line)?);
        if depth <= 0 {
            return None;
        }

        for next in line + 1..buffer.line_count() {
            let text = buffer.line(next)?;
            let (delta, lowest) = self.line_balance(&text);
            if depth + lowest <= 0 {
                return Some(next);
            }
            depth += delta;
        }
        tracing::trace!(line, "unterminated brace region");
        None
    }

    fn name(&self) -> &str {
        "brace"
    }
}

/// Folds between lines matching a start marker and lines matching an end marker.
#[derive(Debug, Clone)]
pub struct RegexFoldProvider {
    start: Regex,
    end: Regex,
}

impl RegexFoldProvider {
    pub fn new(start: &str, end: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            start: Regex::new(start)?,
            end: Regex::new(end)?,
        })
    }

    /// `#region` / `#endregion` markers, optionally behind a comment prefix.
    pub fn region_markers() -> Result<Self, regex::Error> {
        Self::new(
            r"^\s*(?://|#|--|;)?\s*#?region\b",
            r"^\s*(?://|#|--|;)?\s*#?endregion\b",
        )
    }

    fn is_start(&self, text: &str) -> bool {
        self.start.is_match(text) && !self.end.is_match(text)
    }
}

impl SyntaxProvider for RegexFoldProvider {
    fn starts_fold_region(&self, buffer: &dyn TextBuffer, line: usize) -> bool {
        buffer.line(line).is_some_and(|text| self.is_start(&text))
    }

    fn fold_region_end(&self, buffer: &dyn TextBuffer, line: usize) -> Option<usize> {
        if !self.starts_fold_region(buffer, line) {
            return None;
        }

        let mut depth = 1usize;
        for next in line + 1..buffer.line_count() {
            let text = buffer.line(next)?;
            if self.end.is_match(&text) {
                depth -= 1;
                if depth == 0 {
                    return Some(next);
                }
            } else if self.is_start(&text) {
                depth += 1;
            }
        }
        tracing::trace!(line, "unterminated marker region");
        None
    }

    fn name(&self) -> &str {
        "regex-markers"
    }
}

fn strip_line_comment<'a>(text: &'a str, prefix: &str) -> &'a str {
    let mut quote: Option<char> = None;
    let mut escaped = false;
    for (i, ch) in text.char_indices() {
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        if ch == '"' {
            quote = Some(ch);
        } else if text[i..].starts_with(prefix) {
            return &text[..i];
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use editor_view::RopeBuffer;

    #[test]
    fn test_brace_regions() {
        let buffer = RopeBuffer::new("fn a() {\n    if x {\n        y();\n    }\n}\nz");
        let provider = BraceFoldProvider::c_like();

        assert!(provider.starts_fold_region(&buffer, 0));
        assert!(provider.starts_fold_region(&buffer, 1));
        assert!(!provider.starts_fold_region(&buffer, 2));
        assert_eq!(provider.fold_region_end(&buffer, 0), Some(4));
        assert_eq!(provider.fold_region_end(&buffer, 1), Some(3));
        assert_eq!(provider.fold_region_end(&buffer, 5), None);
    }

    #[test]
    fn test_brace_else_line_closes_and_reopens() {
        let buffer = RopeBuffer::new("if a {\n  b\n} else {\n  c\n}");
        let provider = BraceFoldProvider::c_like();

        assert_eq!(provider.fold_region_end(&buffer, 0), Some(2));
        assert!(!provider.starts_fold_region(&buffer, 2));
    }

    #[test]
    fn test_brace_ignores_strings_and_comments() {
        let buffer = RopeBuffer::new("let s = \"{\"; // {\nx {\n}");
        let provider = BraceFoldProvider::c_like();

        assert!(!provider.starts_fold_region(&buffer, 0));
        assert_eq!(provider.fold_region_end(&buffer, 1), Some(2));
    }

    #[test]
    fn test_brace_unterminated() {
        let buffer = RopeBuffer::new("{\n{\n}");
        let provider = BraceFoldProvider::default();
        assert_eq!(provider.fold_region_end(&buffer, 0), None);
        assert_eq!(provider.fold_region_end(&buffer, 1), Some(2));
    }

    #[test]
    fn test_region_markers_nest() {
        let text = "// #region outer\na\n// #region inner\nb\n// #endregion\n// #endregion\nc";
        let buffer = RopeBuffer::new(text);
        let provider = RegexFoldProvider::region_markers().unwrap();

        assert!(provider.starts_fold_region(&buffer, 0));
        assert!(!provider.starts_fold_region(&buffer, 4));
        assert_eq!(provider.fold_region_end(&buffer, 0), Some(5));
        assert_eq!(provider.fold_region_end(&buffer, 2), Some(4));
        assert_eq!(provider.fold_region_end(&buffer, 1), None);
    }

    #[test]
    fn test_invalid_marker_pattern() {
        assert!(RegexFoldProvider::new("(", "x").is_err());
    }
}
