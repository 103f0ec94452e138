//! Statistics and introspection for the trees.
//!
//! [`RedBlackTree::stats`] summarises the shape of a tree (height, black height, colour counts);
//! [`RedBlackTree::validate`] additionally checks every structural invariant the balancing
//! algorithms maintain, which makes it the main oracle for tests and fuzzing.

use std::cmp::{max, Ordering};

use thiserror::Error;

use crate::compare::Comparator;
use crate::node::{Color, Linked, RbNode};
use crate::tree::RedBlackTree;
use crate::utils::arena::{Arena, NodeId, NIL};

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TreeStats {
    /// Number of elements reachable from the root.
    pub len: usize,
    /// Nodes on the longest root-to-leaf path; 0 for an empty tree.
    pub height: usize,
    /// Black nodes on any root-to-leaf path, sentinel excluded.
    pub black_height: usize,
    pub red_nodes: usize,
    pub black_nodes: usize,
}

#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum InvariantViolation {
    #[error("elements out of order at in-order position {0}")]
    Unordered(usize),
    #[error("root is red")]
    RedRoot,
    #[error("sentinel was altered")]
    SentinelAltered,
    #[error("red node at depth {depth} has a red child")]
    RedRed { depth: usize },
    #[error("black height differs below depth {depth}: {left} on the left, {right} on the right")]
    BlackHeight {
        depth: usize,
        left: usize,
        right: usize,
    },
    #[error("child at depth {depth} does not point back to its parent")]
    BrokenParentLink { depth: usize },
    #[error("{reachable} elements reachable but length is {recorded}")]
    Count { reachable: usize, recorded: usize },
}

/// Number of nodes on the longest root-to-leaf path, walked without recursion since an unbalanced
/// tree can be as deep as it is long.
pub(crate) fn height<N: Linked>(nodes: &Arena<N>, root: NodeId) -> usize {
    let mut deepest = 0;
    let mut stack = vec![(root, 1usize)];
    while let Some((id, depth)) = stack.pop() {
        if id.is_nil() {
            continue;
        }
        deepest = max(deepest, depth);
        stack.push((nodes[id].left(), depth + 1));
        stack.push((nodes[id].right(), depth + 1));
    }
    deepest
}

struct Walk<'a, T> {
    nodes: &'a Arena<RbNode<T>>,
    stats: TreeStats,
    violation: Option<InvariantViolation>,
}

impl<'a, T> Walk<'a, T> {
    fn flag(&mut self, violation: InvariantViolation) {
        if self.violation.is_none() {
            self.violation = Some(violation);
        }
    }

    // Returns the black height of the subtree at `id`.
    fn visit(&mut self, id: NodeId, depth: usize) -> usize {
        if id.is_nil() {
            return 0;
        }
        let nodes = self.nodes;
        let node = &nodes[id];
        self.stats.len += 1;
        self.stats.height = max(self.stats.height, depth + 1);
        match node.color {
            Color::Red => self.stats.red_nodes += 1,
            Color::Black => self.stats.black_nodes += 1,
        }

        let (left, right) = (node.left, node.right);
        if node.color == Color::Red
            && (nodes[left].color == Color::Red || nodes[right].color == Color::Red)
        {
            self.flag(InvariantViolation::RedRed { depth });
        }
        for child in [left, right] {
            if !child.is_nil() && nodes[child].parent != id {
                self.flag(InvariantViolation::BrokenParentLink { depth: depth + 1 });
            }
        }

        let lh = self.visit(left, depth + 1);
        let rh = self.visit(right, depth + 1);
        if lh != rh {
            self.flag(InvariantViolation::BlackHeight {
                depth,
                left: lh,
                right: rh,
            });
        }
        max(lh, rh) + usize::from(node.color == Color::Black)
    }
}

impl<T, C: Comparator<T>> RedBlackTree<T, C> {
    /// Shape summary of the tree.
    pub fn stats(&self) -> TreeStats {
        self.walk().0
    }

    /// Check that the tree satisfies every red-black invariant: in-order traversal sorted under
    /// the comparator, black root and sentinel, no red node with a red child, equal black height
    /// on every path, consistent parent links, and a length matching the reachable nodes.
    pub fn validate(&self) -> Result<TreeStats, InvariantViolation> {
        let (stats, violation) = self.walk();
        if let Some(violation) = violation {
            return Err(violation);
        }

        let sentinel = &self.nodes[NIL];
        if sentinel.color != Color::Black
            || sentinel.key.is_some()
            || !sentinel.left.is_nil()
            || !sentinel.right.is_nil()
            || !sentinel.parent.is_nil()
        {
            return Err(InvariantViolation::SentinelAltered);
        }
        if self.nodes[self.root].color != Color::Black {
            return Err(InvariantViolation::RedRoot);
        }
        if !self.nodes[self.root].parent.is_nil() {
            return Err(InvariantViolation::BrokenParentLink { depth: 0 });
        }
        if stats.len != self.count {
            return Err(InvariantViolation::Count {
                reachable: stats.len,
                recorded: self.count,
            });
        }

        let mut previous: Option<&T> = None;
        for (position, element) in self.iter().enumerate() {
            if let Some(previous) = previous {
                match self.cmp.compare(previous, element) {
                    Some(Ordering::Less) | Some(Ordering::Equal) => {}
                    _ => return Err(InvariantViolation::Unordered(position)),
                }
            }
            previous = Some(element);
        }

        Ok(stats)
    }

    fn walk(&self) -> (TreeStats, Option<InvariantViolation>) {
        let mut walk = Walk {
            nodes: &self.nodes,
            stats: TreeStats::default(),
            violation: None,
        };
        walk.stats.black_height = walk.visit(self.root, 0);
        (walk.stats, walk.violation)
    }
}
