//! DepTree: load a graph through a [`NodeParser`], trim its cycles, level it
//! from a single entrypoint and lay it out on a [`Board`].

pub mod structured;

use std::collections::{HashSet, VecDeque};
use std::fmt::Display;

use log::{debug, info, warn};

use crate::board::Board;
use crate::config::RenderConfig;
use crate::error::TreeError;
use crate::graph::cycles::Cycles;
use crate::graph::{CycleResolver, Graph, LevelAssigner, Node};
use crate::renderers::{Point, Tags};

pub use structured::StructuredTree;

pub const NODE_ID_TAG: &str = "nodeId";
pub const NODE_INDEX_TAG: &str = "nodeIndex";
pub const NODE_PARENTS_TAG: &str = "nodeParents";
pub const CONNECTOR_ORIGIN_TAG: &str = "connectorOrigin";
pub const CONNECTOR_DESTINATION_TAG: &str = "connectorDestination";

// ─── Collaborator contracts ──────────────────────────────────────────────────

/// Discovers nodes and their dependencies. Implemented once per input format.
pub trait NodeParser<T> {
    type Error: Display;

    /// Resolve a requested id into its node.
    fn node(&mut self, id: &str) -> Result<Node<T>, Self::Error>;

    /// Dependencies of `node`. An error is attached to the node and the
    /// node is kept as a leaf.
    fn deps(&mut self, node: &Node<T>) -> Result<Vec<Node<T>>, Self::Error>;

    /// Text drawn for `node`.
    fn display(&self, node: &Node<T>) -> String {
        node.id.clone()
    }
}

/// Observes loading. Nothing returned here influences the result.
pub trait LoadCallbacks<T> {
    fn on_start(&mut self, _ids: &[String]) {}
    fn on_node_start(&mut self, _node: &Node<T>) {}
    fn on_node_loaded(&mut self, _node: &Node<T>, _deps: &[Node<T>]) {}
    fn on_finish(&mut self) {}
}

impl<T> LoadCallbacks<T> for () {}

// ─── DepTree ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeveledNode {
    pub id: String,
    pub level: usize,
}

#[derive(Debug, Clone)]
pub struct DepTree<T> {
    /// The loaded graph with cycle edges removed.
    pub graph: Graph<T>,
    pub entrypoints: Vec<String>,
    pub cycles: Cycles,
    /// Nodes sorted by level, then by id.
    pub nodes: Vec<LeveledNode>,
}

impl<T> DepTree<T> {
    /// Load `ids` and everything they depend on, then trim and level the graph.
    pub fn load<P>(
        parser: &mut P,
        ids: &[String],
        callbacks: &mut dyn LoadCallbacks<T>,
    ) -> Result<Self, TreeError>
    where
        P: NodeParser<T>,
    {
        let (mut graph, entrypoints) = load_graph(parser, ids, callbacks)?;
        let untrimmed = graph.topology();
        let cycles = CycleResolver::run(&mut graph, &entrypoints);
        if !cycles.is_empty() {
            info!("removed {} cyclic dependencies", cycles.len());
        }

        let root = match entrypoints.as_slice() {
            [] => return Err(TreeError::NoEntrypoint),
            [root] => root,
            many => return Err(TreeError::TooManyEntrypoints(many.len())),
        };
        let nodes = LevelAssigner::new(&untrimmed)
            .ordered(root)?
            .into_iter()
            .map(|(id, level)| LeveledNode { id, level })
            .collect();

        Ok(Self {
            graph,
            entrypoints,
            cycles,
            nodes,
        })
    }

    pub fn root(&self) -> Result<&str, TreeError> {
        match self.entrypoints.as_slice() {
            [] => Err(TreeError::NoEntrypoint),
            [root] => Ok(root),
            many => Err(TreeError::TooManyEntrypoints(many.len())),
        }
    }

    /// Lay out every node as a block and every trimmed edge as a connector.
    /// Removed cycles are not drawn; they stay listed in `cycles`.
    pub fn render<F>(&self, display: F, config: &RenderConfig) -> Result<Board, TreeError>
    where
        F: Fn(&Node<T>) -> String,
    {
        let mut board = Board::new().with_charset(config.charset());
        let indent = config.indent as i64;

        let mut last_level = None;
        let mut prefix = String::new();
        let mut x_offset_count = 0;
        let mut x_offset = 0;
        let mut y_offset = 0;
        for (i, leveled) in self.nodes.iter().enumerate() {
            if last_level == Some(leveled.level) {
                if i > 0 && self.has_outgoing(&self.nodes[i - 1].id) {
                    x_offset_count += 1;
                    prefix.push(' ');
                }
            } else {
                if last_level.is_some() {
                    y_offset += 1;
                }
                last_level = Some(leveled.level);
                x_offset += x_offset_count;
                x_offset_count = 0;
                prefix.clear();
            }

            let Some(node) = self.graph.get(&leveled.id) else {
                continue;
            };
            let parents: String = self
                .graph
                .parents(&leveled.id)
                .iter()
                .map(|p| format!("{};", p))
                .collect();
            let index = i.to_string();
            let tags = tags(&[
                (NODE_ID_TAG, leveled.id.as_str()),
                (NODE_INDEX_TAG, index.as_str()),
                (NODE_PARENTS_TAG, parents.as_str()),
            ]);
            let position = Point::new(
                indent * leveled.level as i64 + x_offset,
                i as i64 + y_offset,
            );
            board.add_block(&leveled.id, &format!("{}{}", prefix, display(node)), position, tags)?;
        }

        for leveled in &self.nodes {
            for child in self.graph.children(&leveled.id) {
                let tags = tags(&[
                    (CONNECTOR_ORIGIN_TAG, leveled.id.as_str()),
                    (CONNECTOR_DESTINATION_TAG, child.as_str()),
                ]);
                board.add_connector(&leveled.id, &child, tags)?;
            }
        }
        Ok(board)
    }

    fn has_outgoing(&self, id: &str) -> bool {
        !self.graph.children(id).is_empty()
    }
}

fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Breadth-first discovery from each requested id. Returns the graph and
/// the entrypoints: the requested node when exactly one was given, the
/// nodes without parents otherwise.
fn load_graph<T, P>(
    parser: &mut P,
    ids: &[String],
    callbacks: &mut dyn LoadCallbacks<T>,
) -> Result<(Graph<T>, Vec<String>), TreeError>
where
    P: NodeParser<T>,
{
    callbacks.on_start(ids);
    let mut graph = Graph::new();
    let mut visited: HashSet<String> = HashSet::new();
    let mut roots = Vec::with_capacity(ids.len());

    for id in ids {
        let root = parser
            .node(id)
            .map_err(|e| TreeError::Parser(e.to_string()))?;
        let root_id = root.id.clone();
        if !graph.has(&root_id) {
            graph.add_node(root);
        }
        roots.push(root_id.clone());

        let mut queue = VecDeque::from([root_id]);
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }
            let Some(node) = graph.get(&current) else {
                continue;
            };
            callbacks.on_node_start(node);
            let deps = match parser.deps(node) {
                Ok(deps) => deps,
                Err(err) => {
                    warn!("could not load dependencies of {}: {}", current, err);
                    if let Some(node) = graph.get_mut(&current) {
                        node.add_error(err);
                    }
                    continue;
                }
            };
            callbacks.on_node_loaded(node, &deps);
            debug!("loaded {} with {} dependencies", current, deps.len());

            for dep in deps {
                if dep.id == current {
                    continue;
                }
                let dep_id = dep.id.clone();
                if !graph.has(&dep_id) {
                    graph.add_node(dep);
                }
                graph.add_edge(&current, &dep_id)?;
                queue.push_back(dep_id);
            }
        }
    }

    let entrypoints = if roots.len() == 1 {
        roots
    } else {
        graph.nodes_without_parents()
    };
    callbacks.on_finish();
    Ok((graph, entrypoints))
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::LevelError;

    /// Numeric parser: entry `i` lists the dependencies of node `i`.
    /// Ids past the end of the table fail to load.
    pub(crate) struct TableParser {
        pub table: Vec<Vec<usize>>,
    }

    impl TableParser {
        pub(crate) fn new(table: &[&[usize]]) -> Self {
            Self {
                table: table.iter().map(|c| c.to_vec()).collect(),
            }
        }
    }

    impl NodeParser<usize> for TableParser {
        type Error = String;

        fn node(&mut self, id: &str) -> Result<Node<usize>, String> {
            let index: usize = id.parse().map_err(|_| format!("invalid id {}", id))?;
            Ok(Node::new(id, index))
        }

        fn deps(&mut self, node: &Node<usize>) -> Result<Vec<Node<usize>>, String> {
            let children = self
                .table
                .get(node.data)
                .ok_or_else(|| format!("{} not present in table", node.id))?;
            Ok(children
                .iter()
                .map(|&c| Node::new(c.to_string(), c))
                .collect())
        }
    }

    pub(crate) fn load(table: &[&[usize]]) -> DepTree<usize> {
        let mut parser = TableParser::new(table);
        DepTree::load(&mut parser, &["0".to_string()], &mut ()).unwrap()
    }

    fn render(table: &[&[usize]]) -> String {
        let tree = load(table);
        tree.render(|n| n.id.clone(), &RenderConfig::default())
            .unwrap()
            .render()
            .unwrap()
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }

    impl LoadCallbacks<usize> for Recorder {
        fn on_start(&mut self, ids: &[String]) {
            self.events.push(format!("start {}", ids.join(",")));
        }
        fn on_node_start(&mut self, node: &Node<usize>) {
            self.events.push(format!("node {}", node.id));
        }
        fn on_node_loaded(&mut self, node: &Node<usize>, deps: &[Node<usize>]) {
            self.events.push(format!("loaded {} ({})", node.id, deps.len()));
        }
        fn on_finish(&mut self) {
            self.events.push("finish".to_string());
        }
    }

    #[test]
    fn test_load_breadth_first_order() {
        let tree = load(&[&[2, 1], &[3], &[3], &[]]);
        let ids: Vec<&str> = tree.graph.ids().collect();
        assert_eq!(ids, vec!["0", "2", "1", "3"]);
        assert_eq!(tree.entrypoints, vec!["0"]);
    }

    #[test]
    fn test_callbacks_observe_loading() {
        let mut parser = TableParser::new(&[&[1], &[]]);
        let mut recorder = Recorder::default();
        DepTree::load(&mut parser, &["0".to_string()], &mut recorder).unwrap();
        assert_eq!(
            recorder.events,
            vec!["start 0", "node 0", "loaded 0 (1)", "node 1", "loaded 1 (0)", "finish"]
        );
    }

    #[test]
    fn test_self_dependency_is_ignored() {
        let tree = load(&[&[0, 1], &[]]);
        assert_eq!(tree.graph.children("0"), vec!["1"]);
        assert!(tree.cycles.is_empty());
    }

    #[test]
    fn test_dependency_errors_are_attached_to_the_node() {
        // node 2 is referenced but not described by the table.
        let tree = load(&[&[1, 2], &[]]);
        let errored = tree.graph.get("2").unwrap();
        assert_eq!(errored.errors, vec!["2 not present in table"]);
        assert!(tree.graph.children("2").is_empty());
        assert_eq!(tree.nodes.len(), 3);
    }

    #[test]
    fn test_entry_error_is_fatal() {
        let mut parser = TableParser::new(&[&[]]);
        let result = DepTree::load(&mut parser, &["x".to_string()], &mut ());
        assert!(matches!(result, Err(TreeError::Parser(msg)) if msg == "invalid id x"));
    }

    #[test]
    fn test_no_entrypoint() {
        let mut parser = TableParser::new(&[&[]]);
        let result = DepTree::load(&mut parser, &[], &mut ());
        assert!(matches!(result, Err(TreeError::NoEntrypoint)));
    }

    #[test]
    fn test_too_many_entrypoints() {
        let mut parser = TableParser::new(&[&[], &[], &[0]]);
        let ids = ["0".to_string(), "1".to_string()];
        let result = DepTree::load(&mut parser, &ids, &mut ());
        assert!(matches!(result, Err(TreeError::TooManyEntrypoints(2))));
    }

    #[test]
    fn test_many_ids_use_nodes_without_parents() {
        let mut parser = TableParser::new(&[&[1], &[2], &[]]);
        let ids = ["1".to_string(), "0".to_string()];
        let tree = DepTree::load(&mut parser, &ids, &mut ()).unwrap();
        assert_eq!(tree.entrypoints, vec!["0"]);
        assert_eq!(tree.root().unwrap(), "0");
    }

    #[test]
    fn test_requested_component_unreachable_from_root() {
        // 2 <-> 3 has no parentless node, so 0 becomes the only entrypoint.
        let mut parser = TableParser::new(&[&[1], &[], &[3], &[2]]);
        let ids = ["0".to_string(), "2".to_string()];
        let result = DepTree::load(&mut parser, &ids, &mut ());
        assert!(matches!(
            result,
            Err(TreeError::Level(LevelError::Unreachable { node, root })) if node == "2" && root == "0"
        ));
    }

    #[test]
    fn test_levels_use_untrimmed_graph() {
        let tree = load(&[&[1, 2, 3], &[2, 4], &[3, 4], &[4], &[3]]);
        let levels: Vec<(&str, usize)> = tree
            .nodes
            .iter()
            .map(|n| (n.id.as_str(), n.level))
            .collect();
        assert_eq!(levels, vec![("0", 0), ("1", 1), ("2", 2), ("4", 3), ("3", 4)]);
        let causes: Vec<_> = tree.cycles.keys().cloned().collect();
        assert_eq!(causes, vec![["4".to_string(), "3".to_string()]]);
        assert_eq!(tree.cycles[0].stack, vec!["3", "4", "3"]);
    }

    #[test]
    fn test_render_cycle() {
        assert_eq!(
            render(&[&[1], &[2], &[1]]),
            "0    \n│    \n└▷1  \n  │  \n  └▷2\n"
        );
    }

    #[test]
    fn test_render_back_edge_under_longer_sibling() {
        // 2 -> 0 is trimmed; 2 sits right under the wider label of 1.
        let tree = load(&[&[1, 2], &[], &[0]]);
        assert_eq!(tree.cycles.len(), 1);
        let display = |n: &Node<usize>| if n.id == "1" { "1_long".to_string() } else { n.id.clone() };
        let text = tree
            .render(display, &RenderConfig::default())
            .unwrap()
            .render()
            .unwrap();
        assert_eq!(text, "0       \n│       \n├▷1_long\n└▷2     \n");
    }

    #[test]
    fn test_render_two_in_the_same_level() {
        assert_eq!(
            render(&[&[1, 2, 3], &[3], &[3], &[]]),
            "0     \n│     \n├▷1   \n├▷│2  \n│ ││  \n└─┴┴▷3\n"
        );
    }

    #[test]
    fn test_render_tags_blocks_and_connectors() {
        let tree = load(&[&[1], &[2], &[1]]);
        let board = tree.render(|n| n.id.clone(), &RenderConfig::default()).unwrap();
        let block = board.block("1").unwrap();
        assert_eq!(block.tags.get(NODE_ID_TAG).map(String::as_str), Some("1"));
        assert_eq!(block.tags.get(NODE_INDEX_TAG).map(String::as_str), Some("1"));
        assert_eq!(block.tags.get(NODE_PARENTS_TAG).map(String::as_str), Some("0;"));
        let connectors: Vec<_> = board
            .connectors()
            .map(|c| {
                (
                    c.tags.get(CONNECTOR_ORIGIN_TAG).map(String::as_str),
                    c.tags.get(CONNECTOR_DESTINATION_TAG).map(String::as_str),
                )
            })
            .collect();
        assert_eq!(connectors, vec![(Some("0"), Some("1")), (Some("1"), Some("2"))]);
    }

    #[test]
    fn test_render_with_wider_indent() {
        let tree = load(&[&[1], &[]]);
        let config = RenderConfig {
            indent: 4,
            ..RenderConfig::default()
        };
        let text = tree
            .render(|n| n.id.clone(), &config)
            .unwrap()
            .render()
            .unwrap();
        assert_eq!(text, "0    \n│    \n└──▷1\n");
    }

    #[test]
    fn test_render_is_deterministic() {
        let table: &[&[usize]] = &[&[1, 2, 3], &[2, 4], &[3, 4], &[4], &[3]];
        assert_eq!(render(table), render(table));
    }
}
