//! Scopes, inputs, modules and traversal for the jsck checker.
//!
//! This crate provides the compilation context passes run against:
//! - `Compiler` - AST arena, inputs, module graph and diagnostics
//! - `ModuleGraph` - Named modules and their declared dependencies
//! - `ScopeArena` / `SyntacticScopeCreator` - Lexical scopes built from declarations
//! - `NodeTraversal` - Post-order walk with the current scope and input
//! - `CompilerPass` / `Callback` - Hooks implemented by checks

pub mod inputs;
pub use inputs::{CompilerInput, InputArena};

pub mod module_graph;
pub use module_graph::{
    CircularDependency, ModuleGraph, ModuleId, ModuleInfo,
};

pub mod scopes;
pub use scopes::{Scope, ScopeArena, ScopeId, SyntacticScopeCreator, Var, VarId};

pub mod compiler;
pub use compiler::{Compiler, CompilerPass};

pub mod traversal;
pub use traversal::{Callback, NodeTraversal};
