#![warn(missing_docs)]
//! Editor View - Headless Code-Editor View Engine
//!
//! # Overview
//!
//! `editor-view` is the view layer of a code editor without the widget: it maps a
//! line/column editing model onto a linear character buffer, folds lines, windows the visible
//! lines of a scrolling viewport, searches inside regions with wraparound, applies whole-buffer
//! and block-level line transforms atomically, and composes overlay highlights into an ordered
//! instruction list for a painter.
//!
//! Glyph rendering, font metrics, tokenization and input dispatch stay with the host and are
//! reached through traits ([`TextBuffer`], [`LineMetrics`], [`SyntaxProvider`]).
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorView (cursor, scroll, operations)    │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Render / Highlight Compositor              │  ← Paint Instructions
//! ├─────────────────────────────────────────────┤
//! │  Search / Line Transforms                   │  ← Text Operations
//! ├─────────────────────────────────────────────┤
//! │  Viewport Windower (LineMetrics)            │  ← Geometry
//! ├─────────────────────────────────────────────┤
//! │  Fold Model (SyntaxProvider)                │  ← Visibility
//! ├─────────────────────────────────────────────┤
//! │  Position Mapper                            │  ← Coordinates
//! ├─────────────────────────────────────────────┤
//! │  TextBuffer (RopeBuffer)                    │  ← Text Storage + Undo
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use editor_view::{CursorPos, EditorView, FindDirection, Rect, SearchOptions, SearchRegion};
//!
//! let mut view = EditorView::from_text("alpha\nbeta\ngamma\nbeta");
//!
//! // Region search with wraparound selects the match.
//! let hit = view
//!     .find("beta", SearchRegion::whole(), FindDirection::Forward, SearchOptions::default(), true)
//!     .unwrap();
//! assert!(hit.is_some());
//! assert_eq!(view.cursor_position(), CursorPos::new(1, 4));
//!
//! // Block operations are single undo steps.
//! view.duplicate_lines();
//! assert_eq!(view.line_count(), 5);
//! view.undo().unwrap();
//! assert_eq!(view.line_count(), 4);
//!
//! // Only the lines inside the viewport rectangle are laid out.
//! let lines: Vec<usize> = view.visible_blocks(Rect::new(0, 0, 200, 32)).map(|b| b.line).collect();
//! assert_eq!(lines, vec![0, 1]);
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - buffer trait and rope-backed default with grouped undo
//! - [`position`] - cursor positions and offset mapping
//! - [`folding`] - flat per-line fold model
//! - [`metrics`] - line heights and soft wrapping
//! - [`viewport`] - lazy visible-block enumeration and scrolling
//! - [`search`] - char-offset search helpers and region search
//! - [`transform`] - whitespace and block line transforms
//! - [`syntax`] - fold provider trait, theme and colors
//! - [`highlight`] - overlay layers and composition
//! - [`render`] - per-block paint instructions, glyph markers and gutter
//! - [`config`] - view configuration
//! - [`error`] - error types
//!
//! # Unicode Support
//!
//! - All offsets and columns count Unicode scalar values, never bytes
//! - CJK double-width characters measured per UAX #11 when wrapping
//! - Word lookup follows UAX #29 word boundaries

pub mod buffer;
pub mod config;
pub mod error;
pub mod folding;
pub mod highlight;
pub mod metrics;
pub mod position;
pub mod render;
pub mod search;
pub mod syntax;
pub mod transform;
mod view;
pub mod viewport;

pub use buffer::{RopeBuffer, TextBuffer};
pub use config::ViewConfig;
pub use error::ViewError;
pub use folding::{FoldMarker, FoldModel, FoldRegion, LineVisibility};
pub use highlight::{HighlightEntry, HighlightLayer, HighlightStyle, LayerKind};
pub use metrics::{LineMetrics, MonospaceMetrics, WrapMode};
pub use position::{CursorPos, Selection};
pub use render::{
    CursorPaint, CursorShape, CursorStyle, FormatRange, GlyphMarker, GutterLine, PaintBlock,
};
pub use search::{FindDirection, SearchMatch, SearchOptions, SearchRegion};
pub use syntax::{Color, Highlighter, NoSyntax, SyntaxProvider, Theme, ThemeRole};
pub use view::{EditorView, Line};
pub use viewport::{BlockData, LineGeometry, Rect, ScrollPosition, VisibleBlocks};
