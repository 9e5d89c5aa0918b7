//! Error types for every stage of the pipeline.
//!
//! Structural misuse (unknown ids, duplicates, entrypoint count) and geometry
//! failures are surfaced as explicit errors. A residual cycle found after
//! trimming is an internal defect, but it is still reported as an error value.

use thiserror::Error;

// ─── Graph ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("node '{0}' is not present in the graph")]
    UnknownNode(String),
}

// ─── Level ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LevelError {
    #[error("node '{0}' is not present in the graph")]
    UnknownNode(String),

    #[error("node '{node}' is not reachable from entrypoint '{root}'")]
    Unreachable { node: String, root: String },

    #[error("could not resolve a level for node '{node}' from any of its {parents} parents")]
    Unresolved { node: String, parents: usize },
}

// ─── Canvas / routing ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanvasError {
    #[error("cannot ray cast from ({x}, {y}) because it is out of bounds")]
    OutOfBounds { x: i64, y: i64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("could not draw first vertical step on ({x}, {y}) because there is no space")]
    NoSpaceForFirstStep { x: i64, y: i64 },

    #[error("tried to draw on unreachable position ({x}, {y})")]
    UnreachablePosition { x: i64, y: i64 },

    #[error(transparent)]
    Canvas(#[from] CanvasError),
}

// ─── Board ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("block '{0}' is already present")]
    DuplicateBlock(String),

    #[error("block '{0}' not found")]
    UnknownBlock(String),

    #[error("connector from '{from}' to '{to}' already present")]
    DuplicateConnector { from: String, to: String },

    #[error("error rendering block '{id}': {source}")]
    Block { id: String, source: RouteError },

    #[error("error rendering connector from '{from}' to '{to}': {source}")]
    Connector {
        from: String,
        to: String,
        source: RouteError,
    },
}

// ─── Tree pipeline ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum TreeError {
    #[error("{0}")]
    Parser(String),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Level(#[from] LevelError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("this functionality requires that at least 1 entrypoint is provided")]
    NoEntrypoint,

    #[error(
        "this functionality requires that only 1 entrypoint is provided, but {0} were detected"
    )]
    TooManyEntrypoints(usize),

    #[error("cycle detected while walking the trimmed graph: {}", .0.join(" -> "))]
    ResidualCycle(Vec<String>),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

// ─── Edge-list parser ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("syntax error on line {line}: '{text}'")]
    Syntax { line: usize, text: String },

    #[error("unknown node '{0}'")]
    UnknownId(String),

    #[error("input declares no nodes")]
    Empty,
}

// ─── Top level ───────────────────────────────────────────────────────────────

/// Errors of the edge-list convenience entry points.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Tree(#[from] TreeError),
}
