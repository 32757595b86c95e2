//! View configuration.

use crate::error::ViewError;
use serde::{Deserialize, Serialize};

/// Behavior switches of an [`EditorView`](crate::EditorView).
///
/// Every field has a default, so a TOML document only needs the keys it changes:
///
/// ```toml
/// tab_width = 2
/// tab_to_spaces = true
/// show_end_of_line_markers = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Tab stop distance in columns.
    pub tab_width: usize,
    /// Insert spaces instead of `'\t'` for the tab key; backspace removes whole indent units.
    pub tab_to_spaces: bool,
    /// New lines copy the leading whitespace of the line above.
    pub smart_indent: bool,
    /// Soft-wrap long lines.
    pub word_wrap: bool,
    /// Draw a glyph after the last character of each line.
    pub show_end_of_line_markers: bool,
    /// Draw a glyph at the end of each soft-wrapped row.
    pub show_line_breaks: bool,
    /// Draw a glyph over every space and tab.
    pub show_whitespace: bool,
    /// Cursor blink half-period in milliseconds; 0 disables blinking.
    pub cursor_blink_ms: u64,
    /// Typed characters replace the character under the cursor.
    pub overwrite_mode: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            tab_width: 4,
            tab_to_spaces: false,
            smart_indent: true,
            word_wrap: false,
            show_end_of_line_markers: false,
            show_line_breaks: false,
            show_whitespace: false,
            cursor_blink_ms: 500,
            overwrite_mode: false,
        }
    }
}

impl ViewConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, ViewError> {
        let config: ViewConfig = toml::from_str(source)?;
        config.validate()?;
        tracing::debug!(?config, "view config loaded");
        Ok(config)
    }

    /// Reject values the view cannot work with.
    pub fn validate(&self) -> Result<(), ViewError> {
        if self.tab_width == 0 {
            return Err(ViewError::InvalidTabWidth(self.tab_width));
        }
        Ok(())
    }
}
