//! Graph: insertion-ordered directed node/edge store.
//!
//! Nodes live in an id-keyed arena; edges are two adjacency indices
//! (children and parents) of id sets. Every iteration follows insertion
//! order, which keeps trimming, leveling and rendering deterministic.

pub mod cycles;
pub mod johnson;
pub mod level;

use indexmap::{IndexMap, IndexSet};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};

use crate::error::GraphError;

pub use cycles::{Cycle, CycleResolver};
pub use level::LevelAssigner;

// ─── Node ────────────────────────────────────────────────────────────────────

/// A graph node: stable id, caller-owned payload and non-fatal errors
/// collected while its dependencies were discovered.
#[derive(Debug, Clone, PartialEq)]
pub struct Node<T> {
    pub id: String,
    pub data: T,
    pub errors: Vec<String>,
}

impl<T> Node<T> {
    pub fn new(id: impl Into<String>, data: T) -> Self {
        Self {
            id: id.into(),
            data,
            errors: Vec::new(),
        }
    }

    pub fn add_error(&mut self, error: impl ToString) {
        self.errors.push(error.to_string());
    }
}

// ─── Graph ───────────────────────────────────────────────────────────────────

/// Directed graph keyed by node id.
#[derive(Debug, Clone)]
pub struct Graph<T> {
    nodes: IndexMap<String, Node<T>>,
    children: IndexMap<String, IndexSet<String>>,
    parents: IndexMap<String, IndexSet<String>>,
}

impl<T> Default for Graph<T> {
    fn default() -> Self {
        Self {
            nodes: IndexMap::new(),
            children: IndexMap::new(),
            parents: IndexMap::new(),
        }
    }
}

impl<T> Graph<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a node, replacing the payload of an existing node with the same id.
    /// Replacement keeps the node's original position and its edges.
    pub fn add_node(&mut self, node: Node<T>) {
        self.children.entry(node.id.clone()).or_default();
        self.parents.entry(node.id.clone()).or_default();
        self.nodes.insert(node.id.clone(), node);
    }

    pub fn has(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn get(&self, id: &str) -> Option<&Node<T>> {
        self.nodes.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Node<T>> {
        self.nodes.get_mut(id)
    }

    /// All nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node<T>> {
        self.nodes.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn edge_count(&self) -> usize {
        self.children.values().map(IndexSet::len).sum()
    }

    /// Add the edge `from -> to`. Both ends must already be nodes.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<(), GraphError> {
        if !self.has(from) {
            return Err(GraphError::UnknownNode(from.to_string()));
        }
        if !self.has(to) {
            return Err(GraphError::UnknownNode(to.to_string()));
        }
        self.children
            .entry(from.to_string())
            .or_default()
            .insert(to.to_string());
        self.parents
            .entry(to.to_string())
            .or_default()
            .insert(from.to_string());
        Ok(())
    }

    /// Remove the edge `from -> to`, returning whether it existed.
    /// Remaining neighbours keep their relative order.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> bool {
        let removed = self
            .children
            .get_mut(from)
            .is_some_and(|set| set.shift_remove(to));
        if let Some(set) = self.parents.get_mut(to) {
            set.shift_remove(from);
        }
        removed
    }

    pub fn has_edge(&self, from: &str, to: &str) -> bool {
        self.children.get(from).is_some_and(|set| set.contains(to))
    }

    /// Ids this node points to, in insertion order. Empty for unknown ids.
    pub fn children(&self, id: &str) -> Vec<String> {
        self.children
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Ids pointing to this node, in insertion order. Empty for unknown ids.
    pub fn parents(&self, id: &str) -> Vec<String> {
        self.parents
            .get(id)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn nodes_without_parents(&self) -> Vec<String> {
        self.nodes
            .keys()
            .filter(|id| self.parents.get(*id).is_none_or(IndexSet::is_empty))
            .cloned()
            .collect()
    }

    /// Build a petgraph view of the current edges. Node weights are ids;
    /// node indices follow insertion order.
    pub fn to_digraph(&self) -> DiGraph<&str, ()> {
        let mut digraph = DiGraph::with_capacity(self.nodes.len(), self.edge_count());
        let index: IndexMap<&str, NodeIndex> = self
            .nodes
            .keys()
            .map(|id| (id.as_str(), digraph.add_node(id.as_str())))
            .collect();
        for (from, set) in &self.children {
            for to in set {
                if let (Some(&a), Some(&b)) = (index.get(from.as_str()), index.get(to.as_str())) {
                    digraph.add_edge(a, b, ());
                }
            }
        }
        digraph
    }

    pub fn is_acyclic(&self) -> bool {
        !is_cyclic_directed(&self.to_digraph())
    }

    /// Structural copy without payloads or errors.
    pub fn topology(&self) -> Graph<()> {
        Graph {
            nodes: self
                .nodes
                .keys()
                .map(|id| (id.clone(), Node::new(id.clone(), ())))
                .collect(),
            children: self.children.clone(),
            parents: self.parents.clone(),
        }
    }
}

impl Graph<()> {
    /// Build a payload-free graph from `(id, children)` pairs. Children that
    /// were not declared as ids are created on first mention.
    pub fn from_adjacency<'a, I, C>(table: I) -> Result<Self, GraphError>
    where
        I: IntoIterator<Item = (&'a str, C)>,
        C: IntoIterator<Item = &'a str>,
    {
        let table: Vec<(&str, Vec<&str>)> = table
            .into_iter()
            .map(|(id, children)| (id, children.into_iter().collect()))
            .collect();
        let mut graph = Graph::new();
        for (id, _) in &table {
            graph.add_node(Node::new(*id, ()));
        }
        for (id, children) in &table {
            for child in children {
                if !graph.has(child) {
                    graph.add_node(Node::new(*child, ()));
                }
                graph.add_edge(id, child)?;
            }
        }
        Ok(graph)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
