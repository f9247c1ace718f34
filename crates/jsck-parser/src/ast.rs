//! AST types and arena storage.
//!
//! The tree keeps the shape later passes expect from a JavaScript compiler
//! front end:
//!
//! - `var a = 1, b;` is `Var(Name a (Number 1), Name b)`; initializers hang
//!   off the declared name.
//! - `function f(x) {}` is `Function(Name f, ParamList(Name x), Block)`; an
//!   anonymous function has a `Name` child with empty text.
//! - `a.b` is `GetProp(Name a, PropertyName b)`; only the receiver is a name
//!   reference.
//! - `l: { ... }` is `Label(Name l, Block)`, and
//!   `break l` is `Break(Name l)`.

use jsck_common::{InputId, Span};
use serde::Serialize;
use smallvec::SmallVec;

/// Index of a node in a [`NodeArena`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeIndex(pub u32);

impl NodeIndex {
    pub const NONE: NodeIndex = NodeIndex(u32::MAX);

    pub const fn is_none(&self) -> bool {
        self.0 == u32::MAX
    }

    pub const fn is_some(&self) -> bool {
        self.0 != u32::MAX
    }
}

/// Closed set of syntactic node kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum NodeKind {
    /// Container of scripts (the externs root or the main root)
    Root,
    /// One compilation input
    Script,
    Block,
    Var,
    Name,
    Function,
    ParamList,
    /// Expression statement
    ExprResult,
    Return,
    If,
    Label,
    Break,
    Continue,
    Empty,
    GetProp,
    /// Property name after `.`; never a variable reference
    PropertyName,
    Call,
    Assign,
    Binary,
    Unary,
    Number,
    String,
    This,
    Null,
    True,
    False,
}

impl NodeKind {
    /// Kinds whose children are statements.
    pub const fn is_statement_parent(self) -> bool {
        matches!(self, NodeKind::Script | NodeKind::Block | NodeKind::Label)
    }
}

/// A single AST node.
#[derive(Clone, Debug, Serialize)]
pub struct Node {
    pub kind: NodeKind,
    /// Identifier text, literal text or operator, depending on `kind`
    pub text: String,
    pub span: Span,
    pub parent: NodeIndex,
    pub children: SmallVec<[NodeIndex; 4]>,
    /// Set on `Script` nodes only
    pub input: Option<InputId>,
}

impl Node {
    pub fn new(kind: NodeKind, span: Span) -> Node {
        Node {
            kind,
            text: String::new(),
            span,
            parent: NodeIndex::NONE,
            children: SmallVec::new(),
            input: None,
        }
    }

    pub fn with_text(kind: NodeKind, text: impl Into<String>, span: Span) -> Node {
        Node {
            text: text.into(),
            ..Node::new(kind, span)
        }
    }

    pub fn first_child(&self) -> NodeIndex {
        self.children.first().copied().unwrap_or(NodeIndex::NONE)
    }
}

/// Arena-based storage for AST nodes.
/// Nodes are stored contiguously and referenced by index.
#[derive(Debug, Default, Serialize)]
pub struct NodeArena {
    pub nodes: Vec<Node>,
}

impl NodeArena {
    pub fn new() -> NodeArena {
        NodeArena { nodes: Vec::new() }
    }

    /// Add a node to the arena and return its index
    pub fn add(&mut self, node: Node) -> NodeIndex {
        let index = self.nodes.len() as u32;
        self.nodes.push(node);
        NodeIndex(index)
    }

    pub fn get(&self, index: NodeIndex) -> Option<&Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get(index.0 as usize)
        }
    }

    pub fn get_mut(&mut self, index: NodeIndex) -> Option<&mut Node> {
        if index.is_none() {
            None
        } else {
            self.nodes.get_mut(index.0 as usize)
        }
    }

    /// Append `child` to `parent`'s children and set its parent link.
    pub fn add_child_to_back(&mut self, parent: NodeIndex, child: NodeIndex) {
        if let Some(child_node) = self.get_mut(child) {
            child_node.parent = parent;
        }
        if let Some(parent_node) = self.get_mut(parent) {
            parent_node.children.push(child);
        }
    }

    /// Create a node with the given children, linking parents.
    pub fn add_with_children(&mut self, node: Node, children: &[NodeIndex]) -> NodeIndex {
        let idx = self.add(node);
        for &child in children {
            self.add_child_to_back(idx, child);
        }
        idx
    }

    pub fn kind(&self, index: NodeIndex) -> Option<NodeKind> {
        self.get(index).map(|n| n.kind)
    }

    pub fn parent(&self, index: NodeIndex) -> NodeIndex {
        self.get(index).map(|n| n.parent).unwrap_or(NodeIndex::NONE)
    }

    pub fn children(&self, index: NodeIndex) -> &[NodeIndex] {
        self.get(index).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub fn text(&self, index: NodeIndex) -> &str {
        self.get(index).map(|n| n.text.as_str()).unwrap_or("")
    }

    pub fn span(&self, index: NodeIndex) -> Span {
        self.get(index).map(|n| n.span).unwrap_or_default()
    }

    /// Walk parents until a `Script` node; returns its input.
    pub fn input_of(&self, mut index: NodeIndex) -> Option<InputId> {
        while let Some(node) = self.get(index) {
            if node.kind == NodeKind::Script {
                return node.input;
            }
            index = node.parent;
        }
        None
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

// =============================================================================
// Syntactic queries
// =============================================================================

/// A `Name` used as the label of a `Label`, `Break` or `Continue`.
pub fn is_label_name(arena: &NodeArena, idx: NodeIndex) -> bool {
    let Some(node) = arena.get(idx) else {
        return false;
    };
    if node.kind != NodeKind::Name {
        return false;
    }
    match arena.get(node.parent) {
        Some(parent) => {
            matches!(
                parent.kind,
                NodeKind::Label | NodeKind::Break | NodeKind::Continue
            ) && parent.first_child() == idx
        }
        None => false,
    }
}

/// A function in statement position, which must carry a name.
pub fn is_function_declaration(arena: &NodeArena, idx: NodeIndex) -> bool {
    arena.kind(idx) == Some(NodeKind::Function)
        && arena
            .kind(arena.parent(idx))
            .is_some_and(NodeKind::is_statement_parent)
}

/// A function used as a value; its name, if any, is local to its own body.
pub fn is_function_expression(arena: &NodeArena, idx: NodeIndex) -> bool {
    arena.kind(idx) == Some(NodeKind::Function) && !is_function_declaration(arena, idx)
}

/// The `Name` child of a `Function`.
pub fn function_name(arena: &NodeArena, function: NodeIndex) -> NodeIndex {
    arena.get(function).map(Node::first_child).unwrap_or(NodeIndex::NONE)
}

/// The `ParamList` child of a `Function`.
pub fn function_params(arena: &NodeArena, function: NodeIndex) -> NodeIndex {
    arena
        .children(function)
        .get(1)
        .copied()
        .unwrap_or(NodeIndex::NONE)
}

/// The body `Block` of a `Function`.
pub fn function_body(arena: &NodeArena, function: NodeIndex) -> NodeIndex {
    arena
        .children(function)
        .get(2)
        .copied()
        .unwrap_or(NodeIndex::NONE)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_with(arena: &mut NodeArena, stmt: NodeIndex) -> NodeIndex {
        let mut script = Node::new(NodeKind::Script, Span::dummy());
        script.input = Some(InputId(3));
        arena.add_with_children(script, &[stmt])
    }

    #[test]
    fn test_add_child_links_parent() {
        let mut arena = NodeArena::new();
        let name = arena.add(Node::with_text(NodeKind::Name, "x", Span::new(4, 5)));
        let var = arena.add_with_children(Node::new(NodeKind::Var, Span::new(0, 6)), &[name]);

        assert_eq!(arena.parent(name), var);
        assert_eq!(arena.children(var), &[name]);
        assert_eq!(arena.text(name), "x");
    }

    #[test]
    fn test_input_of_walks_to_script() {
        let mut arena = NodeArena::new();
        let name = arena.add(Node::with_text(NodeKind::Name, "x", Span::dummy()));
        let var = arena.add_with_children(Node::new(NodeKind::Var, Span::dummy()), &[name]);
        script_with(&mut arena, var);

        assert_eq!(arena.input_of(name), Some(InputId(3)));
        assert_eq!(arena.input_of(NodeIndex::NONE), None);
    }

    #[test]
    fn test_function_position() {
        let mut arena = NodeArena::new();
        let name = arena.add(Node::with_text(NodeKind::Name, "", Span::dummy()));
        let params = arena.add(Node::new(NodeKind::ParamList, Span::dummy()));
        let body = arena.add(Node::new(NodeKind::Block, Span::dummy()));
        let function = arena.add_with_children(
            Node::new(NodeKind::Function, Span::dummy()),
            &[name, params, body],
        );
        let call = arena.add_with_children(Node::new(NodeKind::Call, Span::dummy()), &[function]);

        assert!(is_function_expression(&arena, function));
        assert!(!is_function_declaration(&arena, function));
        assert_eq!(function_name(&arena, function), name);
        assert_eq!(function_params(&arena, function), params);
        assert_eq!(function_body(&arena, function), body);

        let stmt = arena.add_with_children(Node::new(NodeKind::ExprResult, Span::dummy()), &[call]);
        script_with(&mut arena, stmt);
        assert!(is_function_expression(&arena, function));
    }
}
