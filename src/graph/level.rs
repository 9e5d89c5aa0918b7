//! LevelAssigner: longest cycle-free distance from a root.
//!
//! `level(root) == 0`, every other node sits one past its deepest parent.
//! Levels are computed on the untrimmed edge set. A parent edge that closed a
//! loop during an earlier walk is skipped; if skipping leaves a node without
//! any resolvable parent, its parents are walked again without skipping.
//! Nodes the root cannot reach have no level.

use std::collections::{HashMap, HashSet, VecDeque};

use super::Graph;
use crate::error::LevelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Walk {
    Level(usize),
    /// The walk reached a node already on the current path.
    Cyclic,
    /// No parent produced a level, even without skipping cyclic edges.
    Unresolved,
}

#[derive(Debug)]
struct Frame {
    id: String,
    parents: Vec<String>,
    next: usize,
    fallback: bool,
    best: Option<usize>,
}

/// Memoized longest-path walker. Caches are keyed by root, so one assigner
/// can serve several roots without mixing results.
pub struct LevelAssigner<'g, T> {
    graph: &'g Graph<T>,
    levels: HashMap<(String, String), usize>,
    cyclic: HashSet<(String, String, String)>,
    /// Descendants of each root, the root included.
    reachable: HashMap<String, HashSet<String>>,
}

impl<'g, T> LevelAssigner<'g, T> {
    pub fn new(graph: &'g Graph<T>) -> Self {
        Self {
            graph,
            levels: HashMap::new(),
            cyclic: HashSet::new(),
            reachable: HashMap::new(),
        }
    }

    /// Level of `node` relative to `root`.
    pub fn level(&mut self, root: &str, node: &str) -> Result<usize, LevelError> {
        for id in [root, node] {
            if !self.graph.has(id) {
                return Err(LevelError::UnknownNode(id.to_string()));
            }
        }
        if !self.reaches(root, node) {
            return Err(LevelError::Unreachable {
                node: node.to_string(),
                root: root.to_string(),
            });
        }

        let mut path: HashSet<String> = HashSet::new();
        let mut frames: Vec<Frame> = Vec::new();
        let mut result = self.enter(root, node, &mut path, &mut frames);

        while let Some(frame) = frames.last_mut() {
            if let Some(walk) = result.take() {
                match walk {
                    Walk::Level(level) => {
                        frame.best = Some(frame.best.map_or(level, |best| best.max(level)));
                    }
                    Walk::Cyclic | Walk::Unresolved if !frame.fallback => {
                        let parent = frame.parents[frame.next - 1].clone();
                        self.cyclic
                            .insert((root.to_string(), parent, frame.id.clone()));
                    }
                    Walk::Cyclic | Walk::Unresolved => {}
                }
            }

            if let Some(parent) = frame.parents.get(frame.next).cloned() {
                frame.next += 1;
                let edge = (root.to_string(), parent, frame.id.clone());
                if !frame.fallback && self.cyclic.contains(&edge) {
                    continue;
                }
                result = self.enter(root, &edge.1, &mut path, &mut frames);
                continue;
            }

            if frame.best.is_none() && !frame.fallback {
                frame.fallback = true;
                frame.next = 0;
                continue;
            }

            let id = frame.id.clone();
            let best = frame.best;
            frames.pop();
            path.remove(&id);
            result = Some(match best {
                Some(best) => {
                    self.levels.insert((root.to_string(), id), best + 1);
                    Walk::Level(best + 1)
                }
                None => Walk::Unresolved,
            });
        }

        match result {
            Some(Walk::Level(level)) => Ok(level),
            _ => Err(LevelError::Unresolved {
                node: node.to_string(),
                parents: self.graph.parents(node).len(),
            }),
        }
    }

    /// Every node with its level, sorted by level and then by id.
    pub fn ordered(&mut self, root: &str) -> Result<Vec<(String, usize)>, LevelError> {
        let graph = self.graph;
        let mut result = graph
            .ids()
            .map(|id| -> Result<(String, usize), LevelError> {
                Ok((id.to_string(), self.level(root, id)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        result.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        Ok(result)
    }

    fn reaches(&mut self, root: &str, node: &str) -> bool {
        let graph = self.graph;
        self.reachable
            .entry(root.to_string())
            .or_insert_with(|| {
                let mut seen = HashSet::from([root.to_string()]);
                let mut queue = VecDeque::from([root.to_string()]);
                while let Some(id) = queue.pop_front() {
                    for child in graph.children(&id) {
                        if seen.insert(child.clone()) {
                            queue.push_back(child);
                        }
                    }
                }
                seen
            })
            .contains(node)
    }

    fn enter(
        &self,
        root: &str,
        id: &str,
        path: &mut HashSet<String>,
        frames: &mut Vec<Frame>,
    ) -> Option<Walk> {
        if let Some(&level) = self.levels.get(&(root.to_string(), id.to_string())) {
            return Some(Walk::Level(level));
        }
        if id == root {
            return Some(Walk::Level(0));
        }
        if path.contains(id) {
            return Some(Walk::Cyclic);
        }
        path.insert(id.to_string());
        frames.push(Frame {
            id: id.to_string(),
            parents: self.graph.parents(id),
            next: 0,
            fallback: false,
            best: None,
        });
        None
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
