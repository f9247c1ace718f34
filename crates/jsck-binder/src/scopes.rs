//! Lexical scopes and the syntactic scope creator.
//!
//! Scopes are stored in a [`ScopeArena`] and linked by parent id. The global
//! scope is created over every script of the externs and main roots; each
//! function gets its own scope holding its expression name, its parameters,
//! its `var`s and its nested function declarations.

use jsck_common::InputId;
use jsck_parser::{
    NodeArena, NodeIndex, NodeKind, function_body, function_name, function_params,
    is_function_declaration, is_function_expression,
};
use rustc_hash::FxHashMap;
use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

impl ScopeId {
    pub const NONE: ScopeId = ScopeId(u32::MAX);

    pub const fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

/// A declared binding.
#[derive(Clone, Debug)]
pub struct Var {
    pub name: String,
    /// Declaring `Name` node
    pub node: NodeIndex,
    /// Input the declaration lives in
    pub input: Option<InputId>,
    pub scope: ScopeId,
    pub is_global: bool,
}

#[derive(Debug)]
pub struct Scope {
    pub parent: ScopeId,
    /// Node that created this scope (a root or a `Function`)
    pub root: NodeIndex,
    table: FxHashMap<String, VarId>,
}

impl Scope {
    pub fn new(parent: ScopeId, root: NodeIndex) -> Scope {
        Scope {
            parent,
            root,
            table: FxHashMap::default(),
        }
    }

    pub fn is_global(&self) -> bool {
        self.parent.is_none()
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

/// Storage for scopes and the variables declared in them.
#[derive(Debug, Default)]
pub struct ScopeArena {
    scopes: Vec<Scope>,
    vars: Vec<Var>,
}

impl ScopeArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: Scope) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(scope);
        id
    }

    pub fn get(&self, id: ScopeId) -> Option<&Scope> {
        if id.is_none() {
            None
        } else {
            self.scopes.get(id.0 as usize)
        }
    }

    pub fn var(&self, id: VarId) -> Option<&Var> {
        self.vars.get(id.0 as usize)
    }

    pub fn is_global(&self, id: ScopeId) -> bool {
        self.get(id).is_some_and(Scope::is_global)
    }

    /// The outermost scope enclosing `id`.
    pub fn global_scope(&self, mut id: ScopeId) -> ScopeId {
        while let Some(scope) = self.get(id) {
            if scope.parent.is_none() {
                return id;
            }
            id = scope.parent;
        }
        ScopeId::NONE
    }

    /// Declare `name` in `scope`. A name already declared in that scope keeps
    /// its first declaration.
    pub fn declare(
        &mut self,
        scope: ScopeId,
        name: &str,
        node: NodeIndex,
        input: Option<InputId>,
    ) -> VarId {
        if let Some(&existing) = self.get(scope).and_then(|s| s.table.get(name)) {
            return existing;
        }

        let id = VarId(self.vars.len() as u32);
        let is_global = self.is_global(scope);
        self.vars.push(Var {
            name: name.to_string(),
            node,
            input,
            scope,
            is_global,
        });
        if let Some(s) = self.scopes.get_mut(scope.0 as usize) {
            s.table.insert(name.to_string(), id);
        }
        trace!(name, ?scope, ?input, "declare");
        id
    }

    /// Binding declared directly in `scope`.
    pub fn get_own_var(&self, scope: ScopeId, name: &str) -> Option<&Var> {
        let id = *self.get(scope)?.table.get(name)?;
        self.var(id)
    }

    /// Resolve `name` starting at `scope` and walking outward.
    pub fn get_var(&self, mut scope: ScopeId, name: &str) -> Option<&Var> {
        while let Some(s) = self.get(scope) {
            if let Some(var) = self.get_own_var(scope, name) {
                return Some(var);
            }
            scope = s.parent;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }
}

/// Builds scopes from declarations alone.
///
/// `var` and function declarations are hoisted to the nearest function (or
/// the global scope); names with empty text are never declared.
pub struct SyntacticScopeCreator;

impl SyntacticScopeCreator {
    /// Create the global scope over all scripts under `roots`.
    pub fn create_global(scopes: &mut ScopeArena, arena: &NodeArena, roots: &[NodeIndex]) -> ScopeId {
        let root = roots.first().copied().unwrap_or(NodeIndex::NONE);
        let global = scopes.push(Scope::new(ScopeId::NONE, root));
        for &root in roots {
            for &script in arena.children(root) {
                let input = arena.get(script).and_then(|n| n.input);
                Self::scan_vars(scopes, arena, global, script, input);
            }
        }
        global
    }

    /// Create the scope of `function`, nested in `parent`.
    pub fn create_function_scope(
        scopes: &mut ScopeArena,
        arena: &NodeArena,
        function: NodeIndex,
        parent: ScopeId,
    ) -> ScopeId {
        let scope = scopes.push(Scope::new(parent, function));
        let input = arena.input_of(function);

        // A function expression's own name is visible inside its body only
        if is_function_expression(arena, function) {
            let name = function_name(arena, function);
            Self::declare_name(scopes, arena, scope, name, input);
        }

        for &param in arena.children(function_params(arena, function)) {
            Self::declare_name(scopes, arena, scope, param, input);
        }

        Self::scan_vars(scopes, arena, scope, function_body(arena, function), input);
        scope
    }

    fn declare_name(
        scopes: &mut ScopeArena,
        arena: &NodeArena,
        scope: ScopeId,
        name: NodeIndex,
        input: Option<InputId>,
    ) {
        let text = arena.text(name);
        if !text.is_empty() {
            scopes.declare(scope, text, name, input);
        }
    }

    fn scan_vars(
        scopes: &mut ScopeArena,
        arena: &NodeArena,
        scope: ScopeId,
        n: NodeIndex,
        input: Option<InputId>,
    ) {
        let Some(kind) = arena.kind(n) else {
            return;
        };
        match kind {
            NodeKind::Var => {
                for &name in arena.children(n) {
                    Self::declare_name(scopes, arena, scope, name, input);
                }
            }
            NodeKind::Function => {
                // Inner scopes are created when the traversal reaches them
                if is_function_declaration(arena, n) {
                    Self::declare_name(scopes, arena, scope, function_name(arena, n), input);
                }
            }
            NodeKind::Script | NodeKind::Block | NodeKind::If | NodeKind::Label => {
                for &child in arena.children(n) {
                    Self::scan_vars(scopes, arena, scope, child, input);
                }
            }
            _ => {}
        }
    }
}
