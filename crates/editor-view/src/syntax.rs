//! Syntax and theme collaborators.
//!
//! Tokenization lives outside the engine. What the view needs from a language is narrow: which
//! lines open a fold region and where that region closes. Colors come from a [`Theme`] keyed by
//! [`ThemeRole`]. Both are bundled in a [`Highlighter`] that the host injects into the view and
//! may swap at runtime.

use crate::buffer::TextBuffer;
use crate::error::ViewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Fold-region knowledge supplied by a language definition.
pub trait SyntaxProvider: Send + Sync {
    /// Whether `line` opens a fold region.
    fn starts_fold_region(&self, buffer: &dyn TextBuffer, line: usize) -> bool;

    /// Last line of the region opened at `line`, or `None` if it is unterminated.
    fn fold_region_end(&self, buffer: &dyn TextBuffer, line: usize) -> Option<usize>;

    /// Short name, used in logs.
    fn name(&self) -> &str {
        "custom"
    }
}

/// Provider for plain text: nothing is foldable.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSyntax;

impl SyntaxProvider for NoSyntax {
    fn starts_fold_region(&self, _buffer: &dyn TextBuffer, _line: usize) -> bool {
        false
    }

    fn fold_region_end(&self, _buffer: &dyn TextBuffer, _line: usize) -> Option<usize> {
        None
    }

    fn name(&self) -> &str {
        "none"
    }
}

/// ARGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Alpha.
    pub a: u8,
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
}

impl Color {
    /// Opaque color from RGB components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { a: 0xff, r, g, b }
    }

    /// Parse `#RRGGBB` or `#AARRGGBB`.
    pub fn parse(s: &str) -> Result<Self, ViewError> {
        let invalid = || ViewError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Self::rgb(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            )),
            8 => Ok(Self {
                a: (value >> 24) as u8,
                r: (value >> 16) as u8,
                g: (value >> 8) as u8,
                b: value as u8,
            }),
            _ => Err(invalid()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xff {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(
                f,
                "#{:02x}{:02x}{:02x}{:02x}",
                self.a, self.r, self.g, self.b
            )
        }
    }
}

impl TryFrom<String> for Color {
    type Error = ViewError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Editor color roles the view paints with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeRole {
    /// Default text color.
    Normal,
    /// Editor background.
    Background,
    /// Background of the line holding the cursor (also the gutter fill).
    CurrentLine,
    /// Gutter number of the cursor line.
    CurrentLineNumber,
    /// Gutter numbers of other lines.
    LineNumbers,
    /// Foreground of a matched bracket pair.
    BracketMatching,
    /// Background of the text selection.
    TextSelection,
    /// Background of search hits and same-word occurrences.
    SearchHighlight,
    /// Foreground of same-word occurrences.
    Keyword,
}

/// Named color set.
///
/// Loadable from TOML; missing roles keep the built-in dark defaults:
///
/// ```toml
/// name = "solarized"
/// background = "#002b36"
/// current_line = "#073642"
/// text_selection = "#80268bd2"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)]
pub struct Theme {
    pub name: String,
    pub normal: Color,
    pub background: Color,
    pub current_line: Color,
    pub current_line_number: Color,
    pub line_numbers: Color,
    pub bracket_matching: Color,
    pub text_selection: Color,
    pub search_highlight: Color,
    pub keyword: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            normal: Color::rgb(0xd4, 0xd4, 0xd4),
            background: Color::rgb(0x1e, 0x1e, 0x1e),
            current_line: Color::rgb(0x2a, 0x2d, 0x2e),
            current_line_number: Color::rgb(0xc6, 0xc6, 0xc6),
            line_numbers: Color::rgb(0x85, 0x85, 0x85),
            bracket_matching: Color::rgb(0xff, 0xd7, 0x00),
            text_selection: Color::rgb(0x26, 0x4f, 0x78),
            search_highlight: Color::rgb(0x61, 0x3a, 0x14),
            keyword: Color::rgb(0x56, 0x9c, 0xd6),
        }
    }
}

impl Theme {
    /// Parse a theme from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ViewError> {
        let theme: Theme = toml::from_str(source)?;
        tracing::debug!(theme = %theme.name, "theme loaded");
        Ok(theme)
    }

    /// Color assigned to `role`.
    pub fn color(&self, role: ThemeRole) -> Color {
        match role {
            ThemeRole::Normal => self.normal,
            ThemeRole::Background => self.background,
            ThemeRole::CurrentLine => self.current_line,
            ThemeRole::CurrentLineNumber => self.current_line_number,
            ThemeRole::LineNumbers => self.line_numbers,
            ThemeRole::BracketMatching => self.bracket_matching,
            ThemeRole::TextSelection => self.text_selection,
            ThemeRole::SearchHighlight => self.search_highlight,
            ThemeRole::Keyword => self.keyword,
        }
    }
}

/// Syntax provider plus theme, shared with the host.
#[derive(Clone)]
pub struct Highlighter {
    /// Fold-region source.
    pub syntax: Arc<dyn SyntaxProvider>,
    /// Color source.
    pub theme: Arc<Theme>,
}

impl Highlighter {
    /// Bundle a provider and a theme.
    pub fn new(syntax: Arc<dyn SyntaxProvider>, theme: Arc<Theme>) -> Self {
        Self { syntax, theme }
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(Arc::new(NoSyntax), Arc::new(Theme::default()))
    }
}

impl fmt::Debug for Highlighter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Highlighter")
            .field("syntax", &self.syntax.name())
            .field("theme", &self.theme.name)
            .finish()
    }
}
