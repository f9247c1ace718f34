//! Tests for `NodeTraversal` ordering, scopes and inputs.

use jsck_binder::{Callback, Compiler, NodeTraversal};
use jsck_common::{DiagnosticType, InputId};
use jsck_parser::{NodeIndex, NodeKind};
use std::convert::Infallible;

#[derive(Default)]
struct Recorder {
    names: Vec<(String, usize, Option<InputId>)>,
    kinds: Vec<NodeKind>,
}

impl Callback for Recorder {
    type Error = Infallible;

    fn visit(&mut self, t: &mut NodeTraversal<'_>, n: NodeIndex, _parent: NodeIndex) -> Result<(), Infallible> {
        let kind = t.arena().kind(n).unwrap_or(NodeKind::Empty);
        self.kinds.push(kind);
        if kind == NodeKind::Name {
            self.names.push((t.arena().text(n).to_string(), t.scope_depth(), t.input()));
        }
        Ok(())
    }
}

fn compiler_with(sources: &[(&str, &str)]) -> Compiler {
    let mut compiler = Compiler::new();
    for (name, source) in sources {
        compiler.add_source(name, source, None).expect("source");
    }
    compiler
}

#[test]
fn test_post_order_visits_children_first() {
    let mut compiler = compiler_with(&[("a.js", "var a = b;")]);
    let root = compiler.main_root();
    let mut recorder = Recorder::default();
    NodeTraversal::traverse(&mut compiler, root, &mut recorder).expect("traverse");

    assert_eq!(
        recorder.kinds,
        vec![NodeKind::Name, NodeKind::Name, NodeKind::Var, NodeKind::Script, NodeKind::Root]
    );
    assert_eq!(recorder.names[0].0, "b");
    assert_eq!(recorder.names[1].0, "a");
}

#[test]
fn test_function_names_and_bodies_get_their_scopes() {
    let mut compiler = compiler_with(&[("a.js", "function f(x) { return x; }\nvar g = function h() {};")]);
    let root = compiler.main_root();
    let mut recorder = Recorder::default();
    NodeTraversal::traverse(&mut compiler, root, &mut recorder).expect("traverse");

    let depth_of = |name: &str| {
        recorder
            .names
            .iter()
            .find(|(n, _, _)| n == name)
            .map(|(_, depth, _)| *depth)
    };
    // Declaration name in the enclosing scope, expression name inside
    assert_eq!(depth_of("f"), Some(1));
    assert_eq!(depth_of("x"), Some(2));
    assert_eq!(depth_of("h"), Some(2));
    assert_eq!(depth_of("g"), Some(1));
}

#[test]
fn test_input_tracks_current_script() {
    let mut compiler = compiler_with(&[("a.js", "var a;"), ("b.js", "var b;")]);
    let root = compiler.main_root();
    let mut recorder = Recorder::default();
    NodeTraversal::traverse(&mut compiler, root, &mut recorder).expect("traverse");

    assert_eq!(recorder.names[0], ("a".to_string(), 1, Some(InputId(0))));
    assert_eq!(recorder.names[1], ("b".to_string(), 1, Some(InputId(1))));
}

const TEST_DIAGNOSTIC: DiagnosticType = DiagnosticType::warning("JSC_TEST", "saw {0}");

struct AppendingCallback;

impl Callback for AppendingCallback {
    type Error = Infallible;

    fn visit(&mut self, t: &mut NodeTraversal<'_>, n: NodeIndex, _parent: NodeIndex) -> Result<(), Infallible> {
        if t.arena().kind(n) == Some(NodeKind::Name) {
            let name = t.arena().text(n).to_string();
            t.report(n, &TEST_DIAGNOSTIC, &[&name]);
            // Appended after the externs root's children were snapshotted
            let externs = t.compiler().externs_root();
            if t.arena().children(externs).len() < 2 {
                t.compiler_mut().new_extern_input("extra");
            }
        }
        Ok(())
    }
}

#[test]
fn test_appended_scripts_are_not_visited_and_reports_name_the_input() {
    let mut compiler = Compiler::new();
    compiler.add_extern("externs.js", "var e;").expect("externs");
    compiler.add_source("a.js", "var a;", None).expect("source");
    let roots = [compiler.externs_root(), compiler.main_root()];
    NodeTraversal::traverse_roots(&mut compiler, &roots, &mut AppendingCallback).expect("traverse");

    let reported: Vec<_> = compiler
        .diagnostics
        .iter()
        .map(|d| (d.file.as_str(), d.message_text.as_str()))
        .collect();
    assert_eq!(reported, vec![("externs.js", "saw e"), ("a.js", "saw a")]);
    assert_eq!(compiler.arena.children(compiler.externs_root()).len(), 2);
}

#[test]
fn test_global_lookup_sees_both_roots() {
    struct Lookup(Vec<bool>);
    impl Callback for Lookup {
        type Error = Infallible;
        fn visit(&mut self, t: &mut NodeTraversal<'_>, n: NodeIndex, _parent: NodeIndex) -> Result<(), Infallible> {
            if t.arena().kind(n) == Some(NodeKind::Name) {
                let name = t.arena().text(n).to_string();
                self.0.push(t.get_var(&name).is_some());
            }
            Ok(())
        }
    }

    let mut compiler = Compiler::new();
    compiler.add_extern("externs.js", "var window;").expect("externs");
    compiler.add_source("a.js", "window; missing;", None).expect("source");
    let roots = [compiler.externs_root(), compiler.main_root()];
    let mut lookup = Lookup(Vec::new());
    NodeTraversal::traverse_roots(&mut compiler, &roots, &mut lookup).expect("traverse");

    assert_eq!(lookup.0, vec![true, true, false]);
}
