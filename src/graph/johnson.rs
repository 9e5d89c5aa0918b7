//! Johnson's elementary-cycle enumeration.
//!
//! Vertices are ordered by graph insertion order. For each start vertex `s`
//! the strongly connected component holding the least vertex of the subgraph
//! induced by `{s..}` is located with `petgraph::algo::tarjan_scc`, then every
//! circuit through that vertex is enumerated with blocking sets. The circuit
//! search keeps its own frame stack, so deep graphs do not grow the call stack.

use std::collections::{HashMap, HashSet};

use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};

use super::Graph;

/// Every elementary cycle of `graph`, as ordered id sequences without the
/// closing repetition. Cycles come out grouped by least vertex, each one
/// starting at its least vertex.
pub fn elementary_cycles<T>(graph: &Graph<T>) -> Vec<Vec<String>> {
    let ids: Vec<&str> = graph.ids().collect();
    let index: HashMap<&str, usize> = ids.iter().enumerate().map(|(i, id)| (*id, i)).collect();
    let adjacency: Vec<Vec<usize>> = ids
        .iter()
        .map(|id| {
            graph
                .children(id)
                .iter()
                .filter_map(|child| index.get(child.as_str()).copied())
                .collect()
        })
        .collect();

    let mut cycles = Vec::new();
    let mut start = 0;
    while start < ids.len() {
        let Some((least, component)) = least_component(&adjacency, start) else {
            break;
        };
        let circuits = Circuits::new(&adjacency, least, component).collect_all();
        cycles.extend(
            circuits
                .into_iter()
                .map(|c| c.into_iter().map(|i| ids[i].to_string()).collect()),
        );
        start = least + 1;
    }
    cycles
}

/// The non-trivial SCC of the subgraph induced by vertices `>= start` that
/// contains the smallest vertex, together with that vertex.
fn least_component(adjacency: &[Vec<usize>], start: usize) -> Option<(usize, HashSet<usize>)> {
    let mut sub: DiGraph<usize, ()> = DiGraph::new();
    let nodes: Vec<NodeIndex> = (start..adjacency.len()).map(|v| sub.add_node(v)).collect();
    for (v, targets) in adjacency.iter().enumerate().skip(start) {
        for &w in targets.iter().filter(|&&w| w >= start) {
            sub.add_edge(nodes[v - start], nodes[w - start], ());
        }
    }

    tarjan_scc(&sub)
        .into_iter()
        .filter(|scc| {
            scc.len() > 1 || scc.iter().any(|&n| sub.contains_edge(n, n))
        })
        .map(|scc| {
            let members: HashSet<usize> = scc.iter().map(|&n| sub[n]).collect();
            let least = members.iter().copied().min().unwrap_or(usize::MAX);
            (least, members)
        })
        .min_by_key(|(least, _)| *least)
}

// ─── Circuit search ──────────────────────────────────────────────────────────

struct Frame {
    vertex: usize,
    next: usize,
    found: bool,
}

struct Circuits<'a> {
    adjacency: &'a [Vec<usize>],
    start: usize,
    members: HashSet<usize>,
    blocked: Vec<bool>,
    blocked_by: Vec<HashSet<usize>>,
}

impl<'a> Circuits<'a> {
    fn new(adjacency: &'a [Vec<usize>], start: usize, members: HashSet<usize>) -> Self {
        let n = adjacency.len();
        Self {
            adjacency,
            start,
            members,
            blocked: vec![false; n],
            blocked_by: vec![HashSet::new(); n],
        }
    }

    fn collect_all(mut self) -> Vec<Vec<usize>> {
        let mut found = Vec::new();
        let mut path = vec![self.start];
        let mut frames = vec![Frame {
            vertex: self.start,
            next: 0,
            found: false,
        }];
        self.blocked[self.start] = true;

        while let Some(frame) = frames.last_mut() {
            let v = frame.vertex;
            if let Some(&w) = self.adjacency[v].get(frame.next) {
                frame.next += 1;
                if !self.members.contains(&w) {
                    continue;
                }
                if w == self.start {
                    found.push(path.clone());
                    frame.found = true;
                } else if !self.blocked[w] {
                    path.push(w);
                    self.blocked[w] = true;
                    frames.push(Frame {
                        vertex: w,
                        next: 0,
                        found: false,
                    });
                }
                continue;
            }

            let closed = frame.found;
            frames.pop();
            path.pop();
            if closed {
                self.unblock(v);
                if let Some(parent) = frames.last_mut() {
                    parent.found = true;
                }
            } else {
                for &w in &self.adjacency[v] {
                    if self.members.contains(&w) {
                        self.blocked_by[w].insert(v);
                    }
                }
            }
        }
        found
    }

    fn unblock(&mut self, vertex: usize) {
        let mut work = vec![vertex];
        while let Some(u) = work.pop() {
            if !self.blocked[u] {
                continue;
            }
            self.blocked[u] = false;
            work.extend(self.blocked_by[u].drain());
        }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::tests::numeric;

    fn cycles(table: &[&[usize]]) -> Vec<Vec<String>> {
        elementary_cycles(&numeric(table))
    }

    fn ids(v: &[usize]) -> Vec<String> {
        v.iter().map(|i| i.to_string()).collect()
    }

    #[test]
    fn test_acyclic_graph_has_no_cycles() {
        assert!(cycles(&[&[1, 2], &[3], &[3], &[]]).is_empty());
    }

    #[test]
    fn test_single_cycle() {
        assert_eq!(cycles(&[&[1], &[2], &[0]]), vec![ids(&[0, 1, 2])]);
    }

    #[test]
    fn test_cycle_not_containing_first_vertex() {
        assert_eq!(
            cycles(&[&[1], &[2], &[3], &[4], &[2]]),
            vec![ids(&[2, 3, 4])]
        );
    }

    #[test]
    fn test_complete_triangle() {
        // 0 <-> 1, 0 <-> 2, 1 <-> 2 has five elementary cycles.
        let found = cycles(&[&[1, 2], &[2, 0], &[0, 1]]);
        assert_eq!(
            found,
            vec![
                ids(&[0, 1, 2]),
                ids(&[0, 1]),
                ids(&[0, 2]),
                ids(&[0, 2, 1]),
                ids(&[1, 2]),
            ]
        );
    }

    #[test]
    fn test_self_loop() {
        let mut g = numeric(&[&[1], &[]]);
        g.add_edge("1", "1").unwrap();
        assert_eq!(elementary_cycles(&g), vec![ids(&[1])]);
    }

    #[test]
    fn test_disjoint_components() {
        let found = cycles(&[&[1], &[0], &[3], &[2]]);
        assert_eq!(found, vec![ids(&[0, 1]), ids(&[2, 3])]);
    }
}
