//! Structured output: the trimmed graph as a nested JSON document.
//!
//! ```json
//! {
//!   "tree": { "root": { "dep": null } },
//!   "circularDependencies": [["a", "b", "a"]],
//!   "errors": { "c": ["could not read c"] }
//! }
//! ```

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::{Map, Value};

use super::DepTree;
use crate::error::TreeError;
use crate::graph::Node;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredTree {
    /// Display name of the root mapped to its nested dependencies. Leaves are `null`.
    pub tree: Map<String, Value>,
    pub circular_dependencies: Vec<Vec<String>>,
    pub errors: IndexMap<String, Vec<String>>,
}

impl StructuredTree {
    /// Pretty-printed JSON with two-space indentation.
    pub fn to_json(&self) -> Result<String, TreeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

struct Frame {
    id: String,
    children: Vec<String>,
    next: usize,
}

impl<T> DepTree<T> {
    /// Walk the trimmed graph from the single entrypoint.
    pub fn structured<F>(&self, display: F) -> Result<StructuredTree, TreeError>
    where
        F: Fn(&Node<T>) -> String,
    {
        let root = self.root()?;
        let name = |id: &str| self.graph.get(id).map_or_else(|| id.to_string(), &display);

        let mut tree = Map::new();
        tree.insert(name(root), self.subtree(root, &name)?);

        let circular_dependencies = self
            .cycles
            .values()
            .map(|cycle| cycle.stack.iter().map(|id| name(id.as_str())).collect())
            .collect();

        let errors = self
            .nodes
            .iter()
            .filter_map(|leveled| self.graph.get(&leveled.id))
            .filter(|node| !node.errors.is_empty())
            .map(|node| (display(node), node.errors.clone()))
            .collect();

        Ok(StructuredTree {
            tree,
            circular_dependencies,
            errors,
        })
    }

    /// Post-order walk building each node's dependency map once.
    fn subtree(&self, root: &str, name: &dyn Fn(&str) -> String) -> Result<Value, TreeError> {
        let mut memo: HashMap<String, Value> = HashMap::new();
        let mut path: IndexSet<String> = IndexSet::new();
        let mut frames = vec![self.frame(root)];
        path.insert(root.to_string());

        while let Some(frame) = frames.last_mut() {
            if let Some(child) = frame.children.get(frame.next).cloned() {
                frame.next += 1;
                if memo.contains_key(&child) {
                    continue;
                }
                if let Some(start) = path.get_index_of(&child) {
                    let mut stack: Vec<String> = path.iter().skip(start).cloned().collect();
                    stack.push(child);
                    return Err(TreeError::ResidualCycle(stack));
                }
                path.insert(child.clone());
                frames.push(self.frame(&child));
                continue;
            }

            let value = if frame.children.is_empty() {
                Value::Null
            } else {
                let mut deps = Map::new();
                for child in &frame.children {
                    deps.insert(name(child.as_str()), memo.get(child).cloned().unwrap_or(Value::Null));
                }
                Value::Object(deps)
            };
            let id = frame.id.clone();
            frames.pop();
            path.pop();
            memo.insert(id, value);
        }

        Ok(memo.remove(root).unwrap_or(Value::Null))
    }

    fn frame(&self, id: &str) -> Frame {
        Frame {
            id: id.to_string(),
            children: self.graph.children(id),
            next: 0,
        }
    }
}
