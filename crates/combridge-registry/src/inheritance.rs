//! Inheritance graph over class declarations.
//!
//! Uses `petgraph::DiGraph` with:
//! - Nodes: class names
//! - Edges: derived -> base, one per declared base, in declaration order

use petgraph::Direction;
use petgraph::algo::{has_path_connecting, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use rustc_hash::FxHashMap;

use combridge_core::{ClassEntry, ModelError};

/// Directed graph of class inheritance.
#[derive(Debug, Default, Clone)]
pub struct InheritanceGraph {
    graph: DiGraph<String, ()>,
    nodes: FxHashMap<String, NodeIndex>,
}

impl InheritanceGraph {
    /// Build the graph for a set of classes.
    ///
    /// Every base must already be known to be a declared class.
    pub fn build<'a>(classes: impl IntoIterator<Item = &'a ClassEntry>) -> Result<Self, ModelError> {
        let mut this = Self::default();
        let classes: Vec<&ClassEntry> = classes.into_iter().collect();

        for class in &classes {
            this.node(&class.name);
        }
        for class in &classes {
            let derived = this.node(&class.name);
            for base in &class.bases {
                let base = this.node(base);
                this.graph.add_edge(derived, base, ());
            }
        }

        if let Err(cycle) = toposort(&this.graph, None) {
            return Err(ModelError::CircularInheritance {
                class: this.graph[cycle.node_id()].clone(),
            });
        }

        Ok(this)
    }

    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.nodes.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.nodes.insert(name.to_string(), idx);
        idx
    }

    /// Check whether `class` is `ancestor` or transitively derives from it.
    pub fn derives_from(&self, class: &str, ancestor: &str) -> bool {
        match (self.nodes.get(class), self.nodes.get(ancestor)) {
            (Some(&from), Some(&to)) => has_path_connecting(&self.graph, from, to, None),
            _ => false,
        }
    }

    /// Classes that directly derive from `class`, sorted by name.
    pub fn derived(&self, class: &str) -> Vec<&str> {
        let Some(&idx) = self.nodes.get(class) else {
            return Vec::new();
        };
        let mut names: Vec<&str> = self
            .graph
            .neighbors_directed(idx, Direction::Incoming)
            .map(|n| self.graph[n].as_str())
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    /// Number of classes in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Check if the graph has no classes.
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }
}
