//! Diagnostic definitions reported by the variable checks.

use jsck_common::DiagnosticType;

pub const UNDEFINED_VAR_ERROR: DiagnosticType =
    DiagnosticType::error("JSC_UNDEFINED_VARIABLE", "variable {0} is undefined");

pub const VIOLATED_MODULE_DEP_ERROR: DiagnosticType = DiagnosticType::error(
    "JSC_VIOLATED_MODULE_DEPENDENCY",
    "module {0} cannot reference {2}, defined in module {1}, since {1} loads after {0}",
);

pub const MISSING_MODULE_DEP_ERROR: DiagnosticType = DiagnosticType::warning(
    "JSC_MISSING_MODULE_DEPENDENCY",
    "missing module dependency; module {0} should depend on module {1} because it references {2}",
);

/// Reported for every unordered cross-module reference, off unless enabled.
pub const STRICT_MODULE_DEP_ERROR: DiagnosticType = DiagnosticType::disabled(
    "JSC_STRICT_MODULE_DEPENDENCY",
    "module {0} cannot reference {2}, defined in module {1}",
);

pub const NAME_REFERENCE_IN_EXTERNS_ERROR: DiagnosticType = DiagnosticType::warning(
    "JSC_NAME_REFERENCE_IN_EXTERNS",
    "accessing name {0} in externs has no effect",
);

pub const INVALID_FUNCTION_DECL: DiagnosticType = DiagnosticType::error(
    "JSC_INVALID_FUNCTION_DECL",
    "Syntax error: function declaration must have a name",
);

/// Every diagnostic these checks can report.
pub const ALL: &[DiagnosticType] = &[
    UNDEFINED_VAR_ERROR,
    VIOLATED_MODULE_DEP_ERROR,
    MISSING_MODULE_DEP_ERROR,
    STRICT_MODULE_DEP_ERROR,
    NAME_REFERENCE_IN_EXTERNS_ERROR,
    INVALID_FUNCTION_DECL,
];

/// Find a diagnostic definition by key.
pub fn lookup(key: &str) -> Option<&'static DiagnosticType> {
    ALL.iter().find(|ty| ty.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsck_common::DiagnosticCategory;

    #[test]
    fn test_templates_render_in_parameter_order() {
        assert_eq!(
            VIOLATED_MODULE_DEP_ERROR.format(&["B", "A", "x"]),
            "module B cannot reference x, defined in module A, since A loads after B"
        );
        assert_eq!(
            MISSING_MODULE_DEP_ERROR.format(&["C", "B", "y"]),
            "missing module dependency; module C should depend on module B because it references y"
        );
    }

    #[test]
    fn test_lookup_by_key() {
        let strict = lookup("JSC_STRICT_MODULE_DEPENDENCY").expect("strict");
        assert_eq!(strict.category, DiagnosticCategory::Disabled);
        assert!(lookup("JSC_NOPE").is_none());
    }
}
