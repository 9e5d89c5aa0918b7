//! CycleResolver: makes a graph acyclic and records every edge it removed.
//!
//! Phase 1 walks depth-first from each entrypoint and cuts the edge that
//! closes a cycle on the current path. Phase 2 enumerates the elementary
//! cycles still left (components unreachable from every entrypoint) and cuts
//! the first edge of each one not already broken.

use std::collections::HashSet;
use std::iter;

use indexmap::{IndexMap, IndexSet};
use log::debug;

use super::Graph;
use super::johnson::elementary_cycles;

/// A removed cycle.
///
/// `stack` starts and ends at the same id, and its last edge is `cause`, the
/// edge that was removed to break it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cycle {
    pub cause: [String; 2],
    pub stack: Vec<String>,
}

/// Removed cycles keyed by cause, in discovery order.
pub type Cycles = IndexMap<[String; 2], Cycle>;

struct Frame {
    id: String,
    children: Vec<String>,
    next: usize,
}

/// Two-phase cycle remover. Nodes fully explored from one entrypoint are
/// never walked again from another.
#[derive(Debug, Default)]
pub struct CycleResolver {
    done: HashSet<String>,
    cycles: Cycles,
}

impl CycleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run both phases and return the removed cycles, entrypoint-guided ones first.
    pub fn run<T>(graph: &mut Graph<T>, entrypoints: &[String]) -> Cycles {
        let mut resolver = Self::new();
        for entrypoint in entrypoints {
            resolver.resolve_from(graph, entrypoint);
        }
        resolver.resolve_residual(graph);
        resolver.cycles
    }

    /// Phase 1: depth-first walk from `entrypoint`, cutting back edges.
    pub fn resolve_from<T>(&mut self, graph: &mut Graph<T>, entrypoint: &str) {
        if self.done.contains(entrypoint) || !graph.has(entrypoint) {
            return;
        }
        let mut path: IndexSet<String> = IndexSet::new();
        path.insert(entrypoint.to_string());
        let mut frames = vec![Frame {
            id: entrypoint.to_string(),
            children: graph.children(entrypoint),
            next: 0,
        }];

        while let Some(frame) = frames.last_mut() {
            let Some(child) = frame.children.get(frame.next).cloned() else {
                self.done.insert(frame.id.clone());
                path.pop();
                frames.pop();
                continue;
            };
            frame.next += 1;

            if let Some(idx) = path.get_index_of(child.as_str()) {
                let top = frame.id.clone();
                graph.remove_edge(&top, &child);
                let stack = path
                    .iter()
                    .skip(idx)
                    .cloned()
                    .chain(iter::once(child.clone()))
                    .collect();
                self.record([top, child], stack, "entrypoint");
            } else if !self.done.contains(&child) {
                path.insert(child.clone());
                frames.push(Frame {
                    children: graph.children(&child),
                    id: child,
                    next: 0,
                });
            }
        }
    }

    /// Phase 2: break every elementary cycle left in the graph.
    pub fn resolve_residual<T>(&mut self, graph: &mut Graph<T>) {
        for circuit in elementary_cycles(graph) {
            let len = circuit.len();
            let intact = (0..len).all(|i| graph.has_edge(&circuit[i], &circuit[(i + 1) % len]));
            if !intact {
                continue;
            }
            let from = circuit[0].clone();
            let to = circuit[1 % len].clone();
            graph.remove_edge(&from, &to);
            let stack = circuit
                .iter()
                .skip(1)
                .chain(iter::once(&from))
                .chain(iter::once(&to))
                .cloned()
                .collect();
            self.record([from, to], stack, "residual");
        }
    }

    pub fn cycles(&self) -> &Cycles {
        &self.cycles
    }

    pub fn into_cycles(self) -> Cycles {
        self.cycles
    }

    fn record(&mut self, cause: [String; 2], stack: Vec<String>, phase: &str) {
        debug!(
            "removed {} cycle edge {} -> {} ({})",
            phase,
            cause[0],
            cause[1],
            stack.join(" -> ")
        );
        self.cycles.insert(cause.clone(), Cycle { cause, stack });
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
