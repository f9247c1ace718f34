//! Diagnostic Infrastructure
//!
//! Passes describe each kind of problem they can find with a static
//! [`DiagnosticType`]: a stable key (`JSC_UNDEFINED_VARIABLE`), a default
//! category and a message template with `{0}`, `{1}`, ... placeholders.
//! Reports are handed to a [`DiagnosticSink`]; the standard sink is
//! [`DiagnosticBag`], which applies [`WarningLevels`] overrides before
//! storing anything.
//!
//! # Example
//!
//! ```ignore
//! static UNDEFINED: DiagnosticType =
//!     DiagnosticType::error("JSC_UNDEFINED_VARIABLE", "variable {0} is undefined");
//!
//! let mut bag = DiagnosticBag::new();
//! bag.report(Diagnostic::new(&UNDEFINED, "a.js", span, &["x"]));
//! assert!(bag.has_errors());
//! ```

use crate::span::Span;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Diagnostic Category
// =============================================================================

/// Severity of a diagnostic.
///
/// `Disabled` diagnostics are defined but not reported unless a
/// [`WarningLevels`] override turns them on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticCategory {
    Error,
    Warning,
    #[serde(rename = "off", alias = "disabled")]
    Disabled,
}

impl DiagnosticCategory {
    pub fn name(&self) -> &'static str {
        match self {
            DiagnosticCategory::Error => "error",
            DiagnosticCategory::Warning => "warning",
            DiagnosticCategory::Disabled => "off",
        }
    }
}

impl fmt::Display for DiagnosticCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Diagnostic Types
// =============================================================================

/// A diagnostic definition with key, default category, and message template.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DiagnosticType {
    pub key: &'static str,
    pub category: DiagnosticCategory,
    pub message: &'static str,
}

impl DiagnosticType {
    pub const fn error(key: &'static str, message: &'static str) -> Self {
        DiagnosticType {
            key,
            category: DiagnosticCategory::Error,
            message,
        }
    }

    pub const fn warning(key: &'static str, message: &'static str) -> Self {
        DiagnosticType {
            key,
            category: DiagnosticCategory::Warning,
            message,
        }
    }

    pub const fn disabled(key: &'static str, message: &'static str) -> Self {
        DiagnosticType {
            key,
            category: DiagnosticCategory::Disabled,
            message,
        }
    }

    /// Fill the message template with `args`.
    #[must_use]
    pub fn format(&self, args: &[&str]) -> String {
        format_message(self.message, args)
    }
}

/// Format a diagnostic message by replacing {0}, {1}, etc. with arguments.
///
/// Placeholders are substituted in one pass, so argument text that looks like
/// a placeholder is copied through unchanged. Placeholders without a matching
/// argument are kept as written.
#[must_use]
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        result.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let digits = after.bytes().take_while(u8::is_ascii_digit).count();
        let arg = (digits > 0 && after[digits..].starts_with('}'))
            .then(|| after[..digits].parse::<usize>().ok())
            .flatten()
            .and_then(|i| args.get(i));
        match arg {
            Some(arg) => {
                result.push_str(arg);
                rest = &after[digits + 1..];
            }
            None => {
                result.push('{');
                rest = after;
            }
        }
    }
    result.push_str(rest);
    result
}

// =============================================================================
// Diagnostic
// =============================================================================

/// A reported diagnostic with location, category and rendered message.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Name of the input the diagnostic points into
    pub file: String,
    pub start: u32,
    pub length: u32,
    /// Stable key of the diagnostic type (e.g. `JSC_UNDEFINED_VARIABLE`)
    pub key: String,
    pub category: DiagnosticCategory,
    pub message_text: String,
    /// Message arguments in template order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl Diagnostic {
    /// Create a diagnostic of type `ty` at `span`, with the type's default category.
    #[must_use]
    pub fn new(ty: &DiagnosticType, file: impl Into<String>, span: Span, args: &[&str]) -> Self {
        Diagnostic {
            file: file.into(),
            start: span.start,
            length: span.len(),
            key: ty.key.to_string(),
            category: ty.category,
            message_text: ty.format(args),
            args: args.iter().map(|arg| (*arg).to_string()).collect(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.category == DiagnosticCategory::Error
    }

    pub fn is_warning(&self) -> bool {
        self.category == DiagnosticCategory::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} {}: {}",
            self.file, self.start, self.category, self.key, self.message_text
        )
    }
}

// =============================================================================
// Sinks
// =============================================================================

/// Receiver for diagnostics produced by a pass.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

/// Per-key category overrides.
///
/// Used to turn on diagnostics that are disabled by default, to promote
/// warnings to errors, or to silence a key completely.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WarningLevels {
    overrides: FxHashMap<String, DiagnosticCategory>,
}

impl WarningLevels {
    pub fn new() -> Self {
        WarningLevels::default()
    }

    pub fn set(&mut self, key: impl Into<String>, category: DiagnosticCategory) {
        self.overrides.insert(key.into(), category);
    }

    pub fn get(&self, key: &str) -> Option<DiagnosticCategory> {
        self.overrides.get(key).copied()
    }

    /// Effective category for a diagnostic key whose default is `default`.
    pub fn level_for(&self, key: &str, default: DiagnosticCategory) -> DiagnosticCategory {
        self.get(key).unwrap_or(default)
    }

    /// Merge `other` on top of `self`; entries in `other` win.
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, DiagnosticCategory)> {
        self.overrides.iter().map(|(key, category)| (key.as_str(), *category))
    }
}

/// A collection of diagnostics for a compilation.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
    levels: WarningLevels,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        DiagnosticBag::default()
    }

    pub fn with_levels(levels: WarningLevels) -> Self {
        DiagnosticBag {
            diagnostics: Vec::new(),
            levels,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    /// Diagnostics with the given key, in report order.
    pub fn with_key<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Diagnostic> + 'a {
        self.diagnostics.iter().filter(move |d| d.key == key)
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticBag {
    fn report(&mut self, mut diagnostic: Diagnostic) {
        diagnostic.category = self.levels.level_for(&diagnostic.key, diagnostic.category);
        if diagnostic.category == DiagnosticCategory::Disabled {
            return;
        }
        self.diagnostics.push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static MISSING: DiagnosticType = DiagnosticType::warning(
        "JSC_TEST_MISSING",
        "module {0} should depend on module {1} because it references {2}",
    );
    static STRICT: DiagnosticType =
        DiagnosticType::disabled("JSC_TEST_STRICT", "module {0} cannot reference {2}");

    #[test]
    fn test_format_message_orders_args_by_index() {
        let text = format_message("{1} loads after {0}; {1}!", &["a", "b"]);
        assert_eq!(text, "b loads after a; b!");
    }

    #[test]
    fn test_format_message_does_not_rescan_args() {
        let text = format_message(
            "module {0} cannot reference {2}, defined in module {1}",
            &["a{1}", "b{2}", "x{0}"],
        );
        assert_eq!(text, "module a{1} cannot reference x{0}, defined in module b{2}");
        assert_eq!(format_message("{3} and {} and {x", &["a"]), "{3} and {} and {x");
    }

    #[test]
    fn test_diagnostic_records_args_and_span() {
        let diag = Diagnostic::new(&MISSING, "c.js", Span::new(5, 8), &["C", "B", "x"]);
        assert_eq!(diag.start, 5);
        assert_eq!(diag.length, 3);
        assert_eq!(diag.key, "JSC_TEST_MISSING");
        assert_eq!(
            diag.message_text,
            "module C should depend on module B because it references x"
        );
        assert_eq!(diag.args, vec!["C", "B", "x"]);
        assert!(diag.is_warning());
    }

    #[test]
    fn test_bag_drops_disabled_diagnostics() {
        let mut bag = DiagnosticBag::new();
        bag.report(Diagnostic::new(&STRICT, "a.js", Span::dummy(), &["A", "B", "x"]));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_bag_applies_warning_levels() {
        let mut levels = WarningLevels::new();
        levels.set("JSC_TEST_STRICT", DiagnosticCategory::Warning);
        levels.set("JSC_TEST_MISSING", DiagnosticCategory::Error);

        let mut bag = DiagnosticBag::with_levels(levels);
        bag.report(Diagnostic::new(&STRICT, "a.js", Span::dummy(), &["A", "B", "x"]));
        bag.report(Diagnostic::new(&MISSING, "a.js", Span::dummy(), &["A", "B", "x"]));

        let categories: Vec<_> = bag.iter().map(|d| d.category).collect();
        assert_eq!(
            categories,
            vec![DiagnosticCategory::Warning, DiagnosticCategory::Error]
        );
        assert!(bag.has_errors());
    }

    #[test]
    fn test_warning_levels_deserialize_off() {
        let levels: WarningLevels =
            serde_json::from_str(r#"{"JSC_A": "off", "JSC_B": "error", "JSC_C": "disabled"}"#)
                .expect("valid levels");
        assert_eq!(levels.get("JSC_A"), Some(DiagnosticCategory::Disabled));
        assert_eq!(levels.get("JSC_B"), Some(DiagnosticCategory::Error));
        assert_eq!(levels.get("JSC_C"), Some(DiagnosticCategory::Disabled));
    }
}
