//! Post-order AST traversal with scope tracking.
//!
//! Children are visited before their parent. A `Function` pushes its own
//! scope for its parameters and body; a declaration's name is visited in the
//! enclosing scope and an expression's name inside the function scope, where
//! it is bound. Each node's child list is snapshotted before descending, so
//! nodes appended by a callback are not visited by the same traversal.

use crate::compiler::Compiler;
use crate::scopes::{ScopeArena, ScopeId, SyntacticScopeCreator, Var, VarId};
use jsck_common::{Diagnostic, DiagnosticType, InputId};
use jsck_parser::{NodeArena, NodeIndex, NodeKind, is_function_expression};
use smallvec::SmallVec;
use tracing::{Level, span, trace};

/// Per-node hook called by [`NodeTraversal`] after a node's children.
pub trait Callback {
    type Error;

    fn visit(
        &mut self,
        t: &mut NodeTraversal<'_>,
        n: NodeIndex,
        parent: NodeIndex,
    ) -> Result<(), Self::Error>;
}

pub struct NodeTraversal<'c> {
    compiler: &'c mut Compiler,
    scopes: ScopeArena,
    scope_stack: Vec<ScopeId>,
    input: Option<InputId>,
}

impl<'c> NodeTraversal<'c> {
    fn new(compiler: &'c mut Compiler) -> Self {
        NodeTraversal {
            compiler,
            scopes: ScopeArena::new(),
            scope_stack: Vec::new(),
            input: None,
        }
    }

    /// Traverse a single root with a global scope built from it alone.
    pub fn traverse<C: Callback>(
        compiler: &'c mut Compiler,
        root: NodeIndex,
        cb: &mut C,
    ) -> Result<(), C::Error> {
        Self::traverse_roots(compiler, &[root], cb)
    }

    /// Traverse `roots` in order under one global scope declared from all of
    /// them.
    pub fn traverse_roots<C: Callback>(
        compiler: &'c mut Compiler,
        roots: &[NodeIndex],
        cb: &mut C,
    ) -> Result<(), C::Error> {
        let _span = span!(Level::DEBUG, "traverse_roots", roots = roots.len()).entered();

        let mut t = NodeTraversal::new(compiler);
        t.enter_global(roots);
        for &root in roots {
            t.traverse_branch(root, NodeIndex::NONE, cb)?;
        }
        Ok(())
    }

    /// Traverse only the subtree at `root`, with the global scope declared
    /// from `scope_roots` as the current scope.
    pub fn traverse_with_scope<C: Callback>(
        compiler: &'c mut Compiler,
        scope_roots: &[NodeIndex],
        root: NodeIndex,
        cb: &mut C,
    ) -> Result<(), C::Error> {
        let mut t = NodeTraversal::new(compiler);
        t.enter_global(scope_roots);
        t.input = t.compiler.arena.input_of(root);
        let parent = t.compiler.arena.parent(root);
        t.traverse_branch(root, parent, cb)
    }

    fn enter_global(&mut self, roots: &[NodeIndex]) {
        let global =
            SyntacticScopeCreator::create_global(&mut self.scopes, &self.compiler.arena, roots);
        trace!(
            vars = self.scopes.get(global).map_or(0, |s| s.len()),
            "global scope"
        );
        self.scope_stack.push(global);
    }

    fn children_of(&self, n: NodeIndex) -> SmallVec<[NodeIndex; 4]> {
        SmallVec::from_slice(self.compiler.arena.children(n))
    }

    fn traverse_branch<C: Callback>(
        &mut self,
        n: NodeIndex,
        parent: NodeIndex,
        cb: &mut C,
    ) -> Result<(), C::Error> {
        let Some(kind) = self.compiler.arena.kind(n) else {
            return Ok(());
        };

        let outer_input = self.input;
        if kind == NodeKind::Script {
            self.input = self.compiler.arena.get(n).and_then(|node| node.input);
        }

        if kind == NodeKind::Function {
            self.traverse_function(n, parent, cb)?;
        } else {
            for child in self.children_of(n) {
                self.traverse_branch(child, n, cb)?;
            }
        }

        let result = cb.visit(self, n, parent);
        self.input = outer_input;
        result
    }

    fn traverse_function<C: Callback>(
        &mut self,
        n: NodeIndex,
        parent: NodeIndex,
        cb: &mut C,
    ) -> Result<(), C::Error> {
        let children = self.children_of(n);
        let Some((&name, rest)) = children.split_first() else {
            return Ok(());
        };
        let is_expression = parent.is_some() && is_function_expression(&self.compiler.arena, n);

        // Declared names belong to the enclosing scope
        if !is_expression {
            self.traverse_branch(name, n, cb)?;
        }

        let outer = self.scope();
        let scope = SyntacticScopeCreator::create_function_scope(
            &mut self.scopes,
            &self.compiler.arena,
            n,
            outer,
        );
        self.scope_stack.push(scope);

        if is_expression {
            self.traverse_branch(name, n, cb)?;
        }
        for &child in rest {
            self.traverse_branch(child, n, cb)?;
        }

        self.scope_stack.pop();
        Ok(())
    }

    pub fn compiler(&self) -> &Compiler {
        &*self.compiler
    }

    pub fn compiler_mut(&mut self) -> &mut Compiler {
        &mut *self.compiler
    }

    pub fn arena(&self) -> &NodeArena {
        &self.compiler.arena
    }

    /// Innermost scope at the current node.
    pub fn scope(&self) -> ScopeId {
        self.scope_stack.last().copied().unwrap_or(ScopeId::NONE)
    }

    pub fn global_scope(&self) -> ScopeId {
        self.scope_stack.first().copied().unwrap_or(ScopeId::NONE)
    }

    pub fn scopes(&self) -> &ScopeArena {
        &self.scopes
    }

    pub fn scope_depth(&self) -> usize {
        self.scope_stack.len()
    }

    /// Resolve `name` from the current scope outward.
    pub fn get_var(&self, name: &str) -> Option<&Var> {
        self.scopes.get_var(self.scope(), name)
    }

    /// Declare `name` in the global scope of this traversal.
    pub fn declare_global(&mut self, name: &str, node: NodeIndex, input: Option<InputId>) -> VarId {
        let global = self.global_scope();
        self.scopes.declare(global, name, node, input)
    }

    /// Input of the script being traversed.
    pub fn input(&self) -> Option<InputId> {
        self.input
    }

    pub fn source_name(&self) -> &str {
        self.input
            .map(|id| self.compiler.input_name(id))
            .unwrap_or("")
    }

    /// Report a diagnostic of type `ty` at node `n`.
    pub fn report(&mut self, n: NodeIndex, ty: &DiagnosticType, args: &[&str]) {
        let file = self.source_name().to_string();
        let span = self.compiler.arena.span(n);
        self.compiler.report(Diagnostic::new(ty, file, span, args));
    }
}
