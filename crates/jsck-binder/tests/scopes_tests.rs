//! Tests for the syntactic scope creator.

use jsck_binder::{Compiler, ScopeArena, SyntacticScopeCreator};
use jsck_common::InputId;
use jsck_parser::{NodeKind, function_name};

fn compiler_with(externs: &str, sources: &[(&str, &str)]) -> Compiler {
    let mut compiler = Compiler::new();
    compiler.add_extern("externs.js", externs).expect("externs");
    for (name, source) in sources {
        compiler.add_source(name, source, None).expect("source");
    }
    compiler
}

#[test]
fn test_global_scope_spans_externs_and_sources() {
    let compiler = compiler_with(
        "var window;",
        &[("a.js", "var a = 1; function f() { var local; }"), ("b.js", "if (a) { var b; }")],
    );
    let mut scopes = ScopeArena::new();
    let global = SyntacticScopeCreator::create_global(
        &mut scopes,
        &compiler.arena,
        &[compiler.externs_root(), compiler.main_root()],
    );

    let window = scopes.get_var(global, "window").expect("window");
    assert_eq!(window.input, Some(InputId(0)));
    assert!(window.is_global);
    assert_eq!(scopes.get_var(global, "a").and_then(|v| v.input), Some(InputId(1)));
    assert_eq!(scopes.get_var(global, "f").and_then(|v| v.input), Some(InputId(1)));
    // Hoisted out of the if block
    assert_eq!(scopes.get_var(global, "b").and_then(|v| v.input), Some(InputId(2)));
    // Function locals stay local
    assert!(scopes.get_var(global, "local").is_none());
}

#[test]
fn test_function_scope_binds_params_vars_and_expression_name() {
    let compiler = compiler_with("", &[("a.js", "var g = function inner(p, q) { var v; function nested() {} };")]);
    let mut scopes = ScopeArena::new();
    let global = SyntacticScopeCreator::create_global(&mut scopes, &compiler.arena, &[compiler.main_root()]);

    let function = (0..compiler.arena.len() as u32)
        .map(jsck_parser::NodeIndex)
        .find(|&n| compiler.arena.kind(n) == Some(NodeKind::Function) && compiler.arena.text(function_name(&compiler.arena, n)) == "inner")
        .expect("function");
    let scope = SyntacticScopeCreator::create_function_scope(&mut scopes, &compiler.arena, function, global);

    for name in ["inner", "p", "q", "v", "nested"] {
        let var = scopes.get_own_var(scope, name).unwrap_or_else(|| panic!("{name} not bound"));
        assert!(!var.is_global);
    }
    // The expression name does not leak into the global scope
    assert!(scopes.get_var(global, "inner").is_none());
    assert!(scopes.get_var(scope, "g").is_some_and(|v| v.is_global));
}

#[test]
fn test_anonymous_function_declares_nothing() {
    let compiler = compiler_with("", &[("a.js", "function() {}")]);
    let mut scopes = ScopeArena::new();
    let global = SyntacticScopeCreator::create_global(&mut scopes, &compiler.arena, &[compiler.main_root()]);

    assert!(scopes.get(global).is_some_and(|s| s.is_empty()));
}
