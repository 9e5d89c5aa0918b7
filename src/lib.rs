//! deptree: dependency graphs as box-drawing text diagrams.
//!
//! Pipeline: a [`tree::NodeParser`] discovers the graph, the
//! [`graph::CycleResolver`] trims it to a DAG, the [`graph::LevelAssigner`]
//! assigns every node its longest distance from the entrypoint, and a
//! [`board::Board`] lays the leveled nodes out and routes their edges.
//!
//! Public API: [`render_edge_list`] and [`structured_edge_list`].

pub mod board;
pub mod config;
pub mod error;
pub mod graph;
pub mod parsers;
pub mod renderers;
pub mod tree;

#[cfg(feature = "wasm")]
mod wasm;

pub use config::RenderConfig;
pub use error::Error;

use error::TreeError;
use parsers::EdgeListParser;
use tree::{DepTree, NodeParser};

/// Load an edge list from `entrypoints`, or from its first declared node
/// when none are given.
fn load(src: &str, entrypoints: &[String]) -> Result<(EdgeListParser, DepTree<usize>), Error> {
    let mut parser = EdgeListParser::parse(src)?;
    let ids = if entrypoints.is_empty() {
        parser.first_id().map(str::to_string).into_iter().collect()
    } else {
        entrypoints.to_vec()
    };
    let tree = DepTree::load(&mut parser, &ids, &mut ())?;
    Ok((parser, tree))
}

/// Render an edge list to a text diagram.
///
/// # Example
///
/// ```
/// let text = deptree::render_edge_list("a -> b", &[], &deptree::RenderConfig::default()).unwrap();
/// assert_eq!(text, "a  \n│  \n└▷b\n");
/// ```
pub fn render_edge_list(
    src: &str,
    entrypoints: &[String],
    config: &RenderConfig,
) -> Result<String, Error> {
    let (parser, tree) = load(src, entrypoints)?;
    let board = tree.render(|node| parser.display(node), config)?;
    Ok(board.render().map_err(TreeError::from)?)
}

/// Render an edge list as the `{tree, circularDependencies, errors}` JSON document.
pub fn structured_edge_list(src: &str, entrypoints: &[String]) -> Result<String, Error> {
    let (parser, tree) = load(src, entrypoints)?;
    let structured = tree.structured(|node| parser.display(node))?;
    Ok(structured.to_json()?)
}
