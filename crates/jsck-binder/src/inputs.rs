//! Compilation inputs.

use crate::module_graph::ModuleId;
use jsck_common::InputId;
use jsck_parser::NodeIndex;

/// One unit of source: a parsed file or a synthesized script.
#[derive(Clone, Debug)]
pub struct CompilerInput {
    pub id: InputId,
    pub name: String,
    /// Owning module; `None` for externs and synthesized inputs
    pub module: Option<ModuleId>,
    pub is_extern: bool,
    /// The input's `Script` node
    pub root: NodeIndex,
    /// Source text, when the input came from a file
    pub source: Option<String>,
}

/// All inputs of a compilation, indexed by [`InputId`].
#[derive(Debug, Default)]
pub struct InputArena {
    inputs: Vec<CompilerInput>,
}

impl InputArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id the next call to [`InputArena::push`] will assign.
    pub fn next_id(&self) -> InputId {
        InputId(self.inputs.len() as u32)
    }

    pub fn push(&mut self, input: CompilerInput) -> InputId {
        debug_assert_eq!(input.id, self.next_id());
        let id = input.id;
        self.inputs.push(input);
        id
    }

    pub fn get(&self, id: InputId) -> Option<&CompilerInput> {
        self.inputs.get(id.index())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompilerInput> {
        self.inputs.iter()
    }

    pub fn len(&self) -> usize {
        self.inputs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inputs.is_empty()
    }
}
