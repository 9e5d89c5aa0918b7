//! End-to-end tests of the library pipeline: parse, trim, level, lay out, render.

use deptree::error::{Error, LevelError, ParseError, TreeError};
use deptree::graph::Node;
use deptree::parsers::EdgeListParser;
use deptree::tree::{DepTree, NodeParser};
use deptree::{RenderConfig, render_edge_list, structured_edge_list};

const CYCLE_EXAMPLE: &str = "\
0 -> 1, 2, 3
1 -> 2, 4
2 -> 3, 4
3 -> 4
4 -> 3
";

fn render(src: &str) -> String {
    render_edge_list(src, &[], &RenderConfig::default()).unwrap()
}

#[test]
fn test_cycle_example_levels_and_cycle() {
    let mut parser = EdgeListParser::parse(CYCLE_EXAMPLE).unwrap();
    let tree = DepTree::load(&mut parser, &["0".to_string()], &mut ()).unwrap();

    let mut levels: Vec<(String, usize)> =
        tree.nodes.iter().map(|n| (n.id.clone(), n.level)).collect();
    levels.sort();
    let by_id: Vec<usize> = levels.into_iter().map(|(_, level)| level).collect();
    assert_eq!(by_id, vec![0, 1, 2, 4, 3]);

    let stacks: Vec<&Vec<String>> = tree.cycles.values().map(|c| &c.stack).collect();
    assert_eq!(stacks, vec![&vec!["3".to_string(), "4".to_string(), "3".to_string()]]);
    assert!(tree.graph.is_acyclic());
}

#[test]
fn test_cycle_example_renders_deterministically() {
    let first = render(CYCLE_EXAMPLE);
    assert_eq!(first, render(CYCLE_EXAMPLE));
    assert_eq!(
        first,
        "0        \n│        \n├▷1      \n│ │      \n├─┼▷2    \n│ │ │    \n│ └─├▷4◁┐\n│   │   │\n└───┴──▷3\n"
    );
}

#[test]
fn test_render_cycle() {
    assert_eq!(
        render("0 -> 1\n1 -> 2\n2 -> 1\n"),
        "0    \n│    \n└▷1  \n  │  \n  └▷2\n"
    );
}

#[test]
fn test_render_back_edge_to_root() {
    assert_eq!(
        render("0 -> a_long, b\nb -> 0\n"),
        "0       \n│       \n├▷a_long\n└▷b     \n"
    );
}

#[test]
fn test_render_shared_dependency() {
    assert_eq!(
        render("0 -> 1, 2, 3\n1 -> 3\n2 -> 3\n"),
        "0     \n│     \n├▷1   \n├▷│2  \n│ ││  \n└─┴┴▷3\n"
    );
}

#[test]
fn test_render_single_node() {
    assert_eq!(render("alone"), "alone\n");
}

#[test]
fn test_render_ascii() {
    let config = RenderConfig {
        unicode: false,
        ..RenderConfig::default()
    };
    let text = render_edge_list("0 -> 1\n1 -> 2\n2 -> 1\n", &[], &config).unwrap();
    assert_eq!(text, "0    \n|    \n+>1  \n  |  \n  +>2\n");
}

#[test]
fn test_structured_output() {
    let json = structured_edge_list("0 -> 1\n1 -> 2\n2 -> 1\n", &[]).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "tree": { "0": { "1": { "2": null } } },
            "circularDependencies": [["1", "2", "1"]],
            "errors": {}
        })
    );
}

#[test]
fn test_structured_requires_one_entrypoint() {
    let ids = ["a".to_string(), "b".to_string()];
    let err = structured_edge_list("a\nb", &ids).unwrap_err();
    assert!(matches!(err, Error::Tree(TreeError::TooManyEntrypoints(2))));
}

#[test]
fn test_unreachable_requested_id_is_reported() {
    let ids = ["0".to_string(), "2".to_string()];
    let err = render_edge_list("0 -> 1\n2 -> 3\n3 -> 2\n", &ids, &RenderConfig::default()).unwrap_err();
    assert!(matches!(
        &err,
        Error::Tree(TreeError::Level(LevelError::Unreachable { node, root })) if node == "2" && root == "0"
    ));
    assert_eq!(err.to_string(), "node '2' is not reachable from entrypoint '0'");
}

#[test]
fn test_parse_errors_surface() {
    let err = render_edge_list("a -> ,", &[], &RenderConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::Syntax { line: 1, .. })));
    let err = render_edge_list("", &[], &RenderConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Parse(ParseError::Empty)));
}

/// Parser whose `broken` node cannot list its dependencies.
struct FlakyParser;

impl NodeParser<()> for FlakyParser {
    type Error = String;

    fn node(&mut self, id: &str) -> Result<Node<()>, String> {
        Ok(Node::new(id, ()))
    }

    fn deps(&mut self, node: &Node<()>) -> Result<Vec<Node<()>>, String> {
        match node.id.as_str() {
            "root" => Ok(vec![Node::new("ok", ()), Node::new("broken", ())]),
            "broken" => Err("could not read broken".to_string()),
            _ => Ok(vec![]),
        }
    }

    fn display(&self, node: &Node<()>) -> String {
        node.id.to_uppercase()
    }
}

#[test]
fn test_dependency_errors_do_not_abort() {
    let mut parser = FlakyParser;
    let tree = DepTree::load(&mut parser, &["root".to_string()], &mut ()).unwrap();
    assert_eq!(tree.nodes.len(), 3);

    let text = tree
        .render(|n| parser.display(n), &RenderConfig::default())
        .unwrap()
        .render()
        .unwrap();
    assert_eq!(text, "ROOT    \n│       \n├▷BROKEN\n└▷OK    \n");

    let structured = tree.structured(|n| parser.display(n)).unwrap();
    assert_eq!(
        structured.errors.get("BROKEN"),
        Some(&vec!["could not read broken".to_string()])
    );
}
