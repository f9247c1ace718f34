//! Checks that every variable reference resolves to a declaration the
//! referencing module is allowed to see.
//!
//! Undefined variables are reported and, outside sanity-check mode, given a
//! placeholder declaration in a synthetic extern input so later passes never
//! see an unresolved name. References that cross modules are checked against
//! the declared module dependencies.

use crate::diagnostics::{
    INVALID_FUNCTION_DECL, MISSING_MODULE_DEP_ERROR, STRICT_MODULE_DEP_ERROR, UNDEFINED_VAR_ERROR,
    VIOLATED_MODULE_DEP_ERROR,
};
use crate::externs_check::NameRefInExternsCheck;
use crate::synthetic::SyntheticExterns;
use jsck_binder::{Callback, Compiler, CompilerPass, NodeTraversal};
use jsck_common::{InputId, Span};
use jsck_parser::{
    NodeIndex, NodeKind, is_function_declaration, is_function_expression, is_label_name,
};
use std::fmt;
use tracing::{Level, debug, span};

/// Internal errors that stop the pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarCheckError {
    /// An undefined variable found while verifying an already-processed
    /// program.
    UnexpectedVariable {
        name: String,
        file: String,
        span: Span,
    },
    /// A `Name` with empty text outside a function's name slot.
    EmptyName { file: String, span: Span },
}

impl fmt::Display for VarCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarCheckError::UnexpectedVariable { name, file, span } => {
                write!(f, "Unexpected variable {name} at {file}:{}", span.start)
            }
            VarCheckError::EmptyName { file, span } => {
                write!(
                    f,
                    "empty name outside a function name at {file}:{}",
                    span.start
                )
            }
        }
    }
}

impl std::error::Error for VarCheckError {}

/// The variable reference check.
///
/// In sanity-check mode the program is expected to be fully resolved already,
/// so an undefined variable is an internal error rather than something to
/// repair, and every cross-module reference without a dependency takes the
/// strict diagnostic.
#[derive(Debug, Default)]
pub struct VarCheck {
    sanity_check: bool,
    synthetic: Option<SyntheticExterns>,
}

impl VarCheck {
    pub fn new(sanity_check: bool) -> VarCheck {
        VarCheck {
            sanity_check,
            synthetic: None,
        }
    }

    pub fn sanity_check(&self) -> bool {
        self.sanity_check
    }

    /// The synthetic extern input, if any placeholder was needed so far.
    pub fn synthetic_externs(&self) -> Option<&SyntheticExterns> {
        self.synthetic.as_ref()
    }

    fn get_or_create_synthetic(&mut self, compiler: &mut Compiler) -> &SyntheticExterns {
        self.synthetic
            .get_or_insert_with(|| SyntheticExterns::create(compiler))
    }

    /// Input holding synthesized declarations, created on first use.
    pub fn get_or_create_synthetic_input(&mut self, compiler: &mut Compiler) -> InputId {
        self.get_or_create_synthetic(compiler).input()
    }

    /// Script root of the synthetic input, created together with it.
    pub fn get_or_create_synthetic_root(&mut self, compiler: &mut Compiler) -> NodeIndex {
        self.get_or_create_synthetic(compiler).root()
    }

    fn malformed(t: &NodeTraversal<'_>, n: NodeIndex) -> VarCheckError {
        VarCheckError::EmptyName {
            file: t.source_name().to_string(),
            span: t.arena().span(n),
        }
    }

    /// Handle a name that resolves to nothing.
    fn undefined_variable(
        &mut self,
        t: &mut NodeTraversal<'_>,
        n: NodeIndex,
        name: &str,
    ) -> Result<(), VarCheckError> {
        t.report(n, &UNDEFINED_VAR_ERROR, &[name]);

        if self.sanity_check {
            return Err(VarCheckError::UnexpectedVariable {
                name: name.to_string(),
                file: t.source_name().to_string(),
                span: t.arena().span(n),
            });
        }

        let synthetic = self.get_or_create_synthetic(t.compiler_mut());
        let input = synthetic.input();
        let decl = synthetic.declare(t.compiler_mut(), name);
        t.declare_global(name, decl, Some(input));
        Ok(())
    }
}

impl CompilerPass for VarCheck {
    type Error = VarCheckError;

    fn process(
        &mut self,
        compiler: &mut Compiler,
        externs: NodeIndex,
        root: NodeIndex,
    ) -> Result<(), VarCheckError> {
        let _span = span!(Level::DEBUG, "var_check", sanity_check = self.sanity_check).entered();

        NodeTraversal::traverse(compiler, externs, &mut NameRefInExternsCheck)
            .unwrap_or_else(|never| match never {});
        NodeTraversal::traverse_roots(compiler, &[externs, root], self)
    }
}

impl Callback for VarCheck {
    type Error = VarCheckError;

    fn visit(
        &mut self,
        t: &mut NodeTraversal<'_>,
        n: NodeIndex,
        parent: NodeIndex,
    ) -> Result<(), VarCheckError> {
        let arena = t.arena();
        if arena.kind(n) != Some(NodeKind::Name) || is_label_name(arena, n) {
            return Ok(());
        }

        let name = arena.text(n).to_string();
        if name.is_empty() {
            // Only a function's name slot may be empty
            if arena.kind(parent) != Some(NodeKind::Function) {
                return Err(Self::malformed(t, n));
            }
            if is_function_declaration(arena, parent) {
                t.report(n, &INVALID_FUNCTION_DECL, &[]);
            }
            return Ok(());
        }

        let Some(var) = t.get_var(&name).cloned() else {
            // A function expression's name is only bound inside the function
            if is_function_expression(t.arena(), parent) {
                return Ok(());
            }
            return self.undefined_variable(t, n, &name);
        };

        let (Some(current_input), Some(var_input)) = (t.input(), var.input) else {
            return Ok(());
        };
        if current_input == var_input {
            return Ok(());
        }

        let compiler = t.compiler();
        let (Some(module), Some(var_module)) = (
            compiler.module_of(current_input),
            compiler.module_of(var_input),
        ) else {
            return Ok(());
        };
        let graph = &compiler.module_graph;
        if module == var_module || graph.depends_on(module, var_module) {
            return Ok(());
        }

        let module_name = graph.module_name(module).to_string();
        let var_module_name = graph.module_name(var_module).to_string();
        let ty = if !self.sanity_check && var.is_global {
            if graph.depends_on(var_module, module) {
                &VIOLATED_MODULE_DEP_ERROR
            } else {
                &MISSING_MODULE_DEP_ERROR
            }
        } else {
            &STRICT_MODULE_DEP_ERROR
        };
        debug!(
            name = %name,
            module = %module_name,
            var_module = %var_module_name,
            key = ty.key,
            "cross-module reference"
        );
        t.report(n, ty, &[&module_name, &var_module_name, &name]);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = VarCheckError::UnexpectedVariable {
            name: "x".to_string(),
            file: "a.js".to_string(),
            span: Span::new(4, 5),
        };
        assert_eq!(err.to_string(), "Unexpected variable x at a.js:4");
    }

    #[test]
    fn test_new_starts_without_synthetic_input() {
        let check = VarCheck::new(true);
        assert!(check.sanity_check());
        assert!(check.synthetic_externs().is_none());
    }
}
