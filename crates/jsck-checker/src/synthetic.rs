//! Placeholder declarations for undefined variables.

use jsck_binder::Compiler;
use jsck_common::{InputId, Span};
use jsck_parser::{Node, NodeIndex, NodeKind};
use tracing::debug;

/// Name of the extern input that holds synthesized declarations.
pub const SYNTHETIC_VARS_DECLAR: &str = "{SyntheticVarsDeclar}";

/// An extern input that collects one `var name;` per undefined variable.
///
/// Its script is appended to the externs root when created, so the
/// declarations stay visible to later passes over the same compiler.
#[derive(Clone, Debug)]
pub struct SyntheticExterns {
    input: InputId,
    root: NodeIndex,
}

impl SyntheticExterns {
    pub fn create(compiler: &mut Compiler) -> SyntheticExterns {
        let input = compiler.new_extern_input(SYNTHETIC_VARS_DECLAR);
        let root = compiler
            .input(input)
            .map(|i| i.root)
            .unwrap_or(NodeIndex::NONE);
        SyntheticExterns { input, root }
    }

    pub fn input(&self) -> InputId {
        self.input
    }

    pub fn root(&self) -> NodeIndex {
        self.root
    }

    /// Append `var name;` to the synthetic script and return the new `Name`.
    pub fn declare(&self, compiler: &mut Compiler, name: &str) -> NodeIndex {
        let arena = &mut compiler.arena;
        let name_node = arena.add(Node::with_text(NodeKind::Name, name, Span::dummy()));
        let var = arena.add_with_children(Node::new(NodeKind::Var, Span::dummy()), &[name_node]);
        arena.add_child_to_back(self.root, var);
        debug!(name, "synthesized extern declaration");
        name_node
    }

    /// Names declared so far, in declaration order.
    pub fn declared_names<'a>(&self, compiler: &'a Compiler) -> Vec<&'a str> {
        let arena = &compiler.arena;
        arena
            .children(self.root)
            .iter()
            .flat_map(|&var| arena.children(var))
            .map(|&name| arena.text(name))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declare_appends_var_statements() {
        let mut compiler = Compiler::new();
        let synthetic = SyntheticExterns::create(&mut compiler);
        synthetic.declare(&mut compiler, "x");
        let y = synthetic.declare(&mut compiler, "y");

        assert_eq!(synthetic.declared_names(&compiler), vec!["x", "y"]);
        assert_eq!(compiler.arena.input_of(y), Some(synthetic.input()));
        assert_eq!(compiler.input_name(synthetic.input()), SYNTHETIC_VARS_DECLAR);
        assert_eq!(
            compiler.arena.parent(synthetic.root()),
            compiler.externs_root()
        );
    }
}
