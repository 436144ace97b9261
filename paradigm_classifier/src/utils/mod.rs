//! Shared source-location types used by the scanner, parser and diagnostics

pub mod span;

pub use span::{Position, SourceMap, Span, Spanned};
