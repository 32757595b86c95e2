//! Error types.

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced by `editor-view`.
///
/// Most view operations never fail: positions clamp, folds degrade to no-ops and searches report
/// "not found". The variants below cover genuinely malformed input.
pub enum ViewError {
    #[error("invalid search pattern: {0}")]
    /// The search term failed to compile as a regular expression.
    InvalidPattern(#[from] regex::Error),

    #[error("config parse error: {0}")]
    /// A TOML config or theme document could not be parsed.
    Config(#[from] toml::de::Error),

    #[error("invalid color '{0}' (expected #RRGGBB or #AARRGGBB)")]
    /// A theme color string was malformed.
    InvalidColor(String),

    #[error("tab width must be greater than 0 (got {0})")]
    /// A zero tab width was configured.
    InvalidTabWidth(usize),

    #[error("nothing to undo")]
    /// Undo was requested with an empty undo stack.
    NothingToUndo,

    #[error("nothing to redo")]
    /// Redo was requested with an empty redo stack.
    NothingToRedo,
}
