//! Module Dependency Graph
//!
//! A program is split into named modules, each owning some inputs and
//! declaring which other modules it depends on. The graph answers
//! reachability questions between modules and detects circular
//! dependencies.

use indexmap::IndexMap;
use rustc_hash::{FxHashMap, FxHashSet};
use std::collections::VecDeque;

/// Unique identifier for a module in the graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(pub u32);

/// Information about a module in the dependency graph
#[derive(Debug)]
pub struct ModuleInfo {
    pub id: ModuleId,
    pub name: String,
    /// Modules this module directly depends on
    pub dependencies: FxHashSet<ModuleId>,
}

impl ModuleInfo {
    pub fn new(id: ModuleId, name: String) -> Self {
        Self {
            id,
            name,
            dependencies: FxHashSet::default(),
        }
    }
}

/// Circular dependency information
#[derive(Debug, Clone)]
pub struct CircularDependency {
    /// Modules forming the cycle
    pub cycle: Vec<ModuleId>,
    /// Module names for display
    pub names: Vec<String>,
}

/// Module dependency graph
#[derive(Debug, Default)]
pub struct ModuleGraph {
    /// All modules, in declaration order
    modules: IndexMap<ModuleId, ModuleInfo>,
    /// Name to module ID mapping
    name_to_id: FxHashMap<String, ModuleId>,
    next_id: u32,
    /// Detected circular dependencies
    circular_dependencies: Vec<CircularDependency>,
}

impl ModuleGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or get a module by name
    pub fn add_module(&mut self, name: &str) -> ModuleId {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }

        let id = ModuleId(self.next_id);
        self.next_id += 1;

        self.modules
            .insert(id, ModuleInfo::new(id, name.to_string()));
        self.name_to_id.insert(name.to_string(), id);

        id
    }

    /// Name of a module, or `""` for an unknown id.
    pub fn module_name(&self, id: ModuleId) -> &str {
        self.modules.get(&id).map(|m| m.name.as_str()).unwrap_or("")
    }

    /// Declare that `from` depends on `to`.
    pub fn add_dependency(&mut self, from: ModuleId, to: ModuleId) {
        if let Some(from_module) = self.modules.get_mut(&from) {
            from_module.dependencies.insert(to);
        }
    }

    /// Detect circular dependencies using Tarjan's algorithm
    pub fn detect_circular_dependencies(&mut self) -> &[CircularDependency] {
        self.circular_dependencies.clear();

        let mut state = TarjanState::default();
        let module_ids: Vec<ModuleId> = self.modules.keys().copied().collect();

        for module_id in module_ids {
            if !state.indices.contains_key(&module_id) {
                self.strongconnect(module_id, &mut state);
            }
        }

        &self.circular_dependencies
    }

    fn strongconnect(&mut self, v: ModuleId, state: &mut TarjanState) {
        state.indices.insert(v, state.index_counter);
        state.lowlinks.insert(v, state.index_counter);
        state.index_counter += 1;

        state.stack.push(v);
        state.on_stack.insert(v);

        let mut deps: Vec<ModuleId> = self
            .modules
            .get(&v)
            .map(|m| m.dependencies.iter().copied().collect())
            .unwrap_or_default();
        deps.sort();

        for w in deps {
            if !state.indices.contains_key(&w) {
                self.strongconnect(w, state);
                let w_lowlink = state.lowlink(w);
                state.lower(v, w_lowlink);
            } else if state.on_stack.contains(&w) {
                let w_index = state.indices.get(&w).copied().unwrap_or(u32::MAX);
                state.lower(v, w_index);
            }
        }

        // Root of SCC
        if state.lowlinks.get(&v) == state.indices.get(&v) {
            let mut scc = Vec::new();
            while let Some(w) = state.stack.pop() {
                state.on_stack.remove(&w);
                scc.push(w);
                if w == v {
                    break;
                }
            }

            let is_cycle = scc.len() > 1
                || self
                    .modules
                    .get(&v)
                    .is_some_and(|m| m.dependencies.contains(&v));
            if is_cycle {
                let names = scc
                    .iter()
                    .map(|&id| self.module_name(id).to_string())
                    .collect();
                self.circular_dependencies
                    .push(CircularDependency { cycle: scc, names });
            }
        }
    }

    /// Get all dependencies of a module (transitive)
    pub fn get_dependencies(&self, id: ModuleId) -> FxHashSet<ModuleId> {
        let mut result = FxHashSet::default();
        let mut queue = VecDeque::new();

        if let Some(module) = self.modules.get(&id) {
            queue.extend(module.dependencies.iter().copied());
        }

        while let Some(current) = queue.pop_front() {
            if result.insert(current) {
                if let Some(module) = self.modules.get(&current) {
                    queue.extend(
                        module
                            .dependencies
                            .iter()
                            .filter(|dep| !result.contains(*dep)),
                    );
                }
            }
        }

        result
    }

    /// Check if a module depends on another (directly or transitively)
    pub fn depends_on(&self, from: ModuleId, to: ModuleId) -> bool {
        self.get_dependencies(from).contains(&to)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

#[derive(Default)]
struct TarjanState {
    index_counter: u32,
    stack: Vec<ModuleId>,
    on_stack: FxHashSet<ModuleId>,
    indices: FxHashMap<ModuleId, u32>,
    lowlinks: FxHashMap<ModuleId, u32>,
}

impl TarjanState {
    fn lowlink(&self, id: ModuleId) -> u32 {
        self.lowlinks.get(&id).copied().unwrap_or(u32::MAX)
    }

    fn lower(&mut self, id: ModuleId, candidate: u32) {
        if let Some(lowlink) = self.lowlinks.get_mut(&id) {
            *lowlink = (*lowlink).min(candidate);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_graph_dedup_by_name() {
        let mut graph = ModuleGraph::new();

        let a1 = graph.add_module("a");
        let a2 = graph.add_module("a");
        let b = graph.add_module("b");

        assert_eq!(a1, a2);
        assert_ne!(a1, b);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.module_name(b), "b");
        assert_eq!(graph.module_name(ModuleId(7)), "");
    }

    #[test]
    fn test_add_dependency() {
        let mut graph = ModuleGraph::new();

        let a = graph.add_module("a");
        let b = graph.add_module("b");
        graph.add_dependency(a, b);

        assert!(graph.depends_on(a, b));
        assert!(!graph.depends_on(b, a));
    }

    #[test]
    fn test_circular_dependency_detection() {
        let mut graph = ModuleGraph::new();

        let a = graph.add_module("a");
        let b = graph.add_module("b");
        let c = graph.add_module("c");

        // Create cycle: a -> b -> c -> a
        graph.add_dependency(a, b);
        graph.add_dependency(b, c);
        graph.add_dependency(c, a);

        let cycles = graph.detect_circular_dependencies();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].cycle.len(), 3);
    }

    #[test]
    fn test_self_loop_is_a_cycle() {
        let mut graph = ModuleGraph::new();
        let a = graph.add_module("a");
        graph.add_dependency(a, a);

        assert_eq!(graph.detect_circular_dependencies().len(), 1);
    }

    #[test]
    fn test_depends_on_is_transitive_and_directed() {
        let mut graph = ModuleGraph::new();

        let a = graph.add_module("a");
        let b = graph.add_module("b");
        let c = graph.add_module("c");

        graph.add_dependency(a, b);
        graph.add_dependency(b, c);

        assert!(graph.depends_on(a, b));
        assert!(graph.depends_on(a, c));
        assert!(!graph.depends_on(c, a));
        assert!(!graph.depends_on(a, a));
    }
}
