//! Derivation tree data structure.
//!
//! Trees are deep-owned per individual: a parent exclusively owns its
//! children, while the grammar the tree was derived from stays shared and
//! read-only. Equality is structural (same rule or literal at every
//! corresponding position), not serialization equality.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::grammar::RuleId;

/// A single node of a derivation tree.
///
/// An internal node records which rule it instantiates; its children are one
/// of that rule's productions, elaborated. A leaf wraps a literal's text.
/// Depth metric: a leaf contributes 0, an internal node is 1 + the deepest
/// child, so a chain `S -> a S -> a S -> b` has depth 3.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DerivationNode {
    Internal {
        rule: RuleId,
        children: Vec<DerivationNode>,
    },
    Leaf {
        text: String,
    },
}

impl DerivationNode {
    pub fn internal(rule: RuleId, children: Vec<DerivationNode>) -> Self {
        DerivationNode::Internal { rule, children }
    }

    pub fn leaf(text: impl Into<String>) -> Self {
        DerivationNode::Leaf { text: text.into() }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, DerivationNode::Leaf { .. })
    }

    pub fn children(&self) -> &[DerivationNode] {
        match self {
            DerivationNode::Internal { children, .. } => children,
            DerivationNode::Leaf { .. } => &[],
        }
    }

    /// Total node count, leaves included.
    pub fn size(&self) -> usize {
        1 + self.children().iter().map(DerivationNode::size).sum::<usize>()
    }

    pub fn leaf_count(&self) -> usize {
        match self {
            DerivationNode::Leaf { .. } => 1,
            DerivationNode::Internal { children, .. } => {
                children.iter().map(DerivationNode::leaf_count).sum()
            }
        }
    }

    pub fn depth(&self) -> usize {
        match self {
            DerivationNode::Leaf { .. } => 0,
            DerivationNode::Internal { children, .. } => {
                1 + children.iter().map(DerivationNode::depth).max().unwrap_or(0)
            }
        }
    }

    fn write_source(&self, out: &mut String) {
        match self {
            DerivationNode::Leaf { text } => out.push_str(text),
            DerivationNode::Internal { children, .. } => {
                for child in children {
                    child.write_source(out);
                }
            }
        }
    }
}

/// A rooted derivation tree with pre-order node addressing (root = index 0).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivationTree {
    root: DerivationNode,
}

impl DerivationTree {
    pub fn new(root: DerivationNode) -> Self {
        DerivationTree { root }
    }

    pub fn root(&self) -> &DerivationNode {
        &self.root
    }

    pub fn size(&self) -> usize {
        self.root.size()
    }

    pub fn leaf_count(&self) -> usize {
        self.root.leaf_count()
    }

    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Pre-order node access; the root is index 0.
    pub fn node_at(&self, index: usize) -> Option<&DerivationNode> {
        let mut counter = 0;
        nth(&self.root, index, &mut counter)
    }

    /// Replace the subtree rooted at pre-order index `index`.
    ///
    /// # Panics
    ///
    /// Panics on index 0 (replacing the root means replacing the whole tree
    /// reference) and on an out-of-range index. Both are programmer errors,
    /// not recoverable conditions.
    pub fn replace(&mut self, index: usize, subtree: DerivationNode) {
        assert!(index != 0, "replacing the root replaces the tree, not a subtree");
        let mut counter = 0;
        let slot = nth_mut(&mut self.root, index, &mut counter);
        match slot {
            Some(node) => *node = subtree,
            None => panic!("node index {} out of range", index),
        }
    }

    /// Left-to-right concatenation of all leaf text; the sole channel by
    /// which a tree becomes source code for an external interpreter.
    pub fn to_source(&self) -> String {
        let mut out = String::new();
        self.root.write_source(&mut out);
        out
    }
}

impl fmt::Display for DerivationTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_source())
    }
}

fn nth<'a>(node: &'a DerivationNode, index: usize, counter: &mut usize) -> Option<&'a DerivationNode> {
    if *counter == index {
        return Some(node);
    }
    *counter += 1;
    if let DerivationNode::Internal { children, .. } = node {
        for child in children {
            if let Some(found) = nth(child, index, counter) {
                return Some(found);
            }
        }
    }
    None
}

fn nth_mut<'a>(
    node: &'a mut DerivationNode,
    index: usize,
    counter: &mut usize,
) -> Option<&'a mut DerivationNode> {
    if *counter == index {
        return Some(node);
    }
    *counter += 1;
    if let DerivationNode::Internal { children, .. } = node {
        for child in children {
            if let Some(found) = nth_mut(child, index, counter) {
                return Some(found);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// S(0) -> [a, S(0) -> [b]] in pre-order: S, a, S, b
    fn sample() -> DerivationTree {
        DerivationTree::new(DerivationNode::internal(
            0,
            vec![
                DerivationNode::leaf("a"),
                DerivationNode::internal(0, vec![DerivationNode::leaf("b")]),
            ],
        ))
    }

    #[test]
    fn structural_queries() {
        let tree = sample();
        assert_eq!(tree.size(), 4);
        assert_eq!(tree.leaf_count(), 2);
        assert_eq!(tree.depth(), 2);
        assert_eq!(tree.to_source(), "ab");
    }

    #[test]
    fn preorder_addressing_counts_root_as_zero() {
        let tree = sample();
        assert!(matches!(tree.node_at(0), Some(DerivationNode::Internal { .. })));
        assert_eq!(tree.node_at(1), Some(&DerivationNode::leaf("a")));
        assert!(matches!(tree.node_at(2), Some(DerivationNode::Internal { .. })));
        assert_eq!(tree.node_at(3), Some(&DerivationNode::leaf("b")));
        assert_eq!(tree.node_at(4), None);
    }

    #[test]
    fn replace_swaps_an_addressed_subtree() {
        let mut tree = sample();
        tree.replace(2, DerivationNode::leaf("c"));
        assert_eq!(tree.to_source(), "ac");
        assert_eq!(tree.depth(), 1);
    }

    #[test]
    #[should_panic(expected = "replacing the root")]
    fn replace_rejects_the_root() {
        let mut tree = sample();
        tree.replace(0, DerivationNode::leaf("c"));
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn replace_rejects_out_of_range_index() {
        let mut tree = sample();
        tree.replace(9, DerivationNode::leaf("c"));
    }

    #[test]
    fn equality_is_structural_not_textual() {
        // "ab" two ways: S -> [ab] vs S -> [a, b]
        let one = DerivationTree::new(DerivationNode::internal(
            0,
            vec![DerivationNode::leaf("ab")],
        ));
        let two = DerivationTree::new(DerivationNode::internal(
            0,
            vec![DerivationNode::leaf("a"), DerivationNode::leaf("b")],
        ));
        assert_eq!(one.to_source(), two.to_source());
        assert_ne!(one, two);
    }
}
