//! Edge-list text format.
//!
//! One statement per line, `#` starts a comment:
//!
//! ```text
//! # the entrypoint comes first
//! main -> parser, render
//! parser -> lexer
//! render
//! ```
//!
//! A bare id declares a node, `from -> a, b` declares `from` and an edge to
//! each listed id. Ids referenced on the right-hand side are declared
//! implicitly. Declaration order is kept.

use std::sync::OnceLock;

use indexmap::{IndexMap, IndexSet};
use regex::Regex;

use crate::error::ParseError;
use crate::graph::Node;
use crate::tree::NodeParser;

#[derive(Debug, Clone, PartialEq, Eq)]
struct Declaration {
    line: usize,
    deps: IndexSet<String>,
}

/// Parsed edge list. Node data is the 1-based line the node was first seen on.
#[derive(Debug, Clone, Default)]
pub struct EdgeListParser {
    nodes: IndexMap<String, Declaration>,
}

fn statement() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(?P<from>[^\s,]+?)\s*(?:->\s*(?P<deps>.*))?$")
            .expect("statement pattern is valid")
    })
}

fn is_id(text: &str) -> bool {
    !text.is_empty() && !text.contains(|c: char| c.is_whitespace() || c == ',')
}

impl EdgeListParser {
    pub fn parse(src: &str) -> Result<Self, ParseError> {
        let mut parser = Self::default();
        for (i, raw) in src.lines().enumerate() {
            let line = i + 1;
            let text = raw.split('#').next().unwrap_or("").trim();
            if text.is_empty() {
                continue;
            }
            let syntax = || ParseError::Syntax {
                line,
                text: raw.trim().to_string(),
            };

            let caps = statement().captures(text).ok_or_else(syntax)?;
            let from = caps.name("from").map_or("", |m| m.as_str());
            parser.declare(from, line);

            let Some(deps) = caps.name("deps") else {
                continue;
            };
            for dep in deps.as_str().split(',').map(str::trim) {
                if !is_id(dep) {
                    return Err(syntax());
                }
                parser.declare(dep, line);
                if let Some(decl) = parser.nodes.get_mut(from) {
                    decl.deps.insert(dep.to_string());
                }
            }
        }

        if parser.nodes.is_empty() {
            return Err(ParseError::Empty);
        }
        Ok(parser)
    }

    fn declare(&mut self, id: &str, line: usize) {
        self.nodes
            .entry(id.to_string())
            .or_insert_with(|| Declaration {
                line,
                deps: IndexSet::new(),
            });
    }

    /// The first declared id, the default entrypoint.
    pub fn first_id(&self) -> Option<&str> {
        self.nodes.keys().next().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn lookup(&self, id: &str) -> Result<&Declaration, ParseError> {
        self.nodes
            .get(id)
            .ok_or_else(|| ParseError::UnknownId(id.to_string()))
    }
}

impl NodeParser<usize> for EdgeListParser {
    type Error = ParseError;

    fn node(&mut self, id: &str) -> Result<Node<usize>, ParseError> {
        let decl = self.lookup(id)?;
        Ok(Node::new(id, decl.line))
    }

    fn deps(&mut self, node: &Node<usize>) -> Result<Vec<Node<usize>>, ParseError> {
        let decl = self.lookup(&node.id)?;
        decl.deps
            .iter()
            .map(|dep| self.lookup(dep).map(|d| Node::new(dep.as_str(), d.line)))
            .collect()
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
