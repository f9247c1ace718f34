//! Common types and utilities for the jsck JavaScript checker.
//!
//! This crate provides foundational types used across all jsck crates:
//! - Input identities (`InputId`)
//! - Source spans (`Span`)
//! - Line/column conversion for reporters (`LineMap`, `Position`)
//! - Recursion limits (`limits`)
//! - Diagnostic definitions, sinks and severity overrides

// Input identities shared by the parser and binder
pub mod input;
pub use input::InputId;

// Span - Source location tracking (byte offsets)
pub mod span;
pub use span::Span;

// Position types for line/column source locations
pub mod position;
pub use position::{LineMap, Position};

// Limits - recursion bounds shared by the parser and traversals
pub mod limits;

// Diagnostics - definitions, collection and warning levels
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticBag, DiagnosticCategory, DiagnosticSink, DiagnosticType, WarningLevels,
    format_message,
};
