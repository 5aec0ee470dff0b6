//! Path Evaluation
//!
//! Evaluates parsed paths against a `Document`. Every step moves from a node
//! to its own children or attributes, so each step's output stays in
//! document order without sorting or deduplication.

use super::parser::{NodeTest, PathExpr};
use super::NodeRef;
use crate::dom::{Document, NodeId, NodeKind, DOCUMENT_NODE};

/// Evaluate a path from a context node
///
/// Absolute paths ignore `context` and start at the document node.
pub fn evaluate(doc: &Document, expr: &PathExpr, context: NodeRef) -> Vec<NodeRef> {
    let start = if expr.absolute { NodeRef::Node(DOCUMENT_NODE) } else { context };
    let mut current = vec![start];

    for step in &expr.steps {
        let mut next = Vec::new();
        for &node in &current {
            let matches = select(doc, node, &step.test);
            next.extend(apply_positions(matches, &step.positions));
        }
        if next.is_empty() {
            return next;
        }
        current = next;
    }

    current
}

/// Apply `[n]` filters to one parent's matches
fn apply_positions(mut matches: Vec<NodeRef>, positions: &[usize]) -> Vec<NodeRef> {
    for &position in positions {
        matches = position
            .checked_sub(1)
            .and_then(|index| matches.get(index).copied())
            .into_iter()
            .collect();
    }
    matches
}

/// Nodes selected by a single step from one node
fn select(doc: &Document, node: NodeRef, test: &NodeTest) -> Vec<NodeRef> {
    let id = match (test, node) {
        (NodeTest::SelfNode, _) => return vec![node],
        (_, NodeRef::Attribute(..)) => return Vec::new(),
        (_, NodeRef::Node(id)) => id,
    };

    match test {
        NodeTest::Attribute(name) => (0..doc.attribute_count(id))
            .filter(|&index| doc.attribute_at(id, index).is_some_and(|(n, _)| n == name.as_str()))
            .map(|index| NodeRef::Attribute(id, index))
            .collect(),
        NodeTest::AnyAttribute => (0..doc.attribute_count(id))
            .map(|index| NodeRef::Attribute(id, index))
            .collect(),
        _ => doc
            .children(id)
            .filter(|&child| child_matches(doc, child, test))
            .map(NodeRef::Node)
            .collect(),
    }
}

fn child_matches(doc: &Document, child: NodeId, test: &NodeTest) -> bool {
    let Some(node) = doc.get_node(child) else {
        return false;
    };
    match test {
        NodeTest::Name(name) => node.kind == NodeKind::Element && doc.node_name(child) == Some(name.as_str()),
        NodeTest::AnyElement => node.is_element(),
        NodeTest::Text => node.is_text(),
        NodeTest::Node => true,
        NodeTest::SelfNode | NodeTest::Attribute(_) | NodeTest::AnyAttribute => false,
    }
}
