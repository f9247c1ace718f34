//! The compilation context shared by all passes.

use crate::inputs::{CompilerInput, InputArena};
use crate::module_graph::{ModuleGraph, ModuleId};
use jsck_common::{Diagnostic, DiagnosticBag, DiagnosticSink, InputId, Span, WarningLevels};
use jsck_parser::{Node, NodeArena, NodeIndex, NodeKind, ParseError, parse_script};
use tracing::debug;

/// A pass run over the externs and main roots of a [`Compiler`].
pub trait CompilerPass {
    type Error;

    fn process(
        &mut self,
        compiler: &mut Compiler,
        externs: NodeIndex,
        root: NodeIndex,
    ) -> Result<(), Self::Error>;
}

/// Owns the AST, the inputs, the module graph and reported diagnostics.
#[derive(Debug)]
pub struct Compiler {
    pub arena: NodeArena,
    pub inputs: InputArena,
    pub module_graph: ModuleGraph,
    pub diagnostics: DiagnosticBag,
    externs_root: NodeIndex,
    main_root: NodeIndex,
}

impl Default for Compiler {
    fn default() -> Self {
        Compiler::new()
    }
}

impl Compiler {
    pub fn new() -> Compiler {
        Compiler::with_warning_levels(WarningLevels::new())
    }

    pub fn with_warning_levels(levels: WarningLevels) -> Compiler {
        let mut arena = NodeArena::new();
        let externs_root = arena.add(Node::new(NodeKind::Root, Span::dummy()));
        let main_root = arena.add(Node::new(NodeKind::Root, Span::dummy()));
        Compiler {
            arena,
            inputs: InputArena::new(),
            module_graph: ModuleGraph::new(),
            diagnostics: DiagnosticBag::with_levels(levels),
            externs_root,
            main_root,
        }
    }

    pub fn externs_root(&self) -> NodeIndex {
        self.externs_root
    }

    pub fn main_root(&self) -> NodeIndex {
        self.main_root
    }

    /// Parse an externs file and append it to the externs root.
    pub fn add_extern(&mut self, name: &str, source: &str) -> Result<InputId, ParseError> {
        self.add_parsed(name, source, None, true)
    }

    /// Parse a source file of `module` (if any) and append it to the main root.
    pub fn add_source(
        &mut self,
        name: &str,
        source: &str,
        module: Option<ModuleId>,
    ) -> Result<InputId, ParseError> {
        self.add_parsed(name, source, module, false)
    }

    fn add_parsed(
        &mut self,
        name: &str,
        source: &str,
        module: Option<ModuleId>,
        is_extern: bool,
    ) -> Result<InputId, ParseError> {
        let id = self.inputs.next_id();
        let script = parse_script(&mut self.arena, id, source)?;
        let root = if is_extern {
            self.externs_root
        } else {
            self.main_root
        };
        self.arena.add_child_to_back(root, script);
        debug!(name, %id, is_extern, "added input");
        Ok(self.inputs.push(CompilerInput {
            id,
            name: name.to_string(),
            module,
            is_extern,
            root: script,
            source: Some(source.to_string()),
        }))
    }

    /// Create an empty extern input whose script is appended to the externs
    /// root. Nodes added under the returned input's `root` become part of the
    /// externs for every later pass.
    pub fn new_extern_input(&mut self, name: &str) -> InputId {
        let id = self.inputs.next_id();
        let mut script = Node::new(NodeKind::Script, Span::dummy());
        script.input = Some(id);
        let script = self.arena.add(script);
        self.arena.add_child_to_back(self.externs_root, script);
        debug!(name, %id, "created extern input");
        self.inputs.push(CompilerInput {
            id,
            name: name.to_string(),
            module: None,
            is_extern: true,
            root: script,
            source: None,
        })
    }

    pub fn input(&self, id: InputId) -> Option<&CompilerInput> {
        self.inputs.get(id)
    }

    pub fn input_name(&self, id: InputId) -> &str {
        self.inputs.get(id).map(|i| i.name.as_str()).unwrap_or("")
    }

    /// Module owning `input`, if any.
    pub fn module_of(&self, input: InputId) -> Option<ModuleId> {
        self.inputs.get(input).and_then(|i| i.module)
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.report(diagnostic);
    }
}
