//! Red-black tree implementation.
//!
//! This module contains [`RedBlackTree`], an ordered collection whose nodes live in an index
//! arena. Slot 0 of the arena is a permanently black sentinel that stands in for every missing
//! child and for the parent of the root, so the rebalancing code can read the colour and parent of
//! any link without checking it first.

use std::cmp::Ordering;
use std::fmt;

use log::{debug, trace};

use crate::compare::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::iter::{CursorMut, Iter};
use crate::node::{maximum, minimum, successor, Color, RbNode};
use crate::utils::arena::{Arena, NodeId, NIL};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// An ordered collection backed by a red-black tree.
///
/// Elements are kept in ascending order under the tree's [`Comparator`]: their natural order by
/// default, or any `Fn(&T, &T) -> Ordering` given to [`RedBlackTree::with_comparator`].
/// Duplicates are accepted and sort after the elements they compare equal to. Insertion, lookup
/// and removal are `O(log n)` whatever order the elements arrive in.
///
/// ## Examples
///
/// ```rust
/// use ordtree::RedBlackTree;
///
/// let mut tree = RedBlackTree::new();
/// for key in [50, 25, 75, 10, 30, 60, 80] {
///     tree.insert(key).unwrap();
/// }
/// assert!(tree.remove(&50));
/// assert_eq!(tree.len(), 6);
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![10, 25, 30, 60, 75, 80]);
/// ```
///
/// Custom ordering:
///
/// ```rust
/// use ordtree::RedBlackTree;
///
/// let mut tree = RedBlackTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
/// for key in [10, 20, 30, 5] {
///     tree.insert(key).unwrap();
/// }
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![30, 20, 10, 5]);
/// ```
pub struct RedBlackTree<T, C = NaturalOrder> {
    pub(crate) nodes: Arena<RbNode<T>>,
    pub(crate) root: NodeId,
    pub(crate) count: usize,
    pub(crate) cmp: C,
}

impl<T: PartialOrd> Default for RedBlackTree<T, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialOrd> RedBlackTree<T, NaturalOrder> {
    /// Create an empty tree ordered by the elements' natural order.
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    /// Create a tree holding `elements`, inserted one after the other in natural order.
    pub fn from_elements<I>(elements: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = T>,
    {
        Self::from_elements_with(elements, NaturalOrder)
    }
}

impl<T, C: Comparator<T>> RedBlackTree<T, C> {
    /// Create an empty tree ordered by `cmp`.
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: Arena::with_capacity(16),
            root: NIL,
            count: 0,
            cmp,
        }
    }

    /// Create a tree holding `elements` ordered by `cmp`. Stops at the first element that
    /// cannot be inserted and reports why.
    pub fn from_elements_with<I>(elements: I, cmp: C) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::with_comparator(cmp);
        for element in elements {
            tree.insert(element)?;
        }
        debug!("bulk-loaded red-black tree with {} elements", tree.count);
        Ok(tree)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// Insert `element`. Always returns `Ok(true)` once the element is accepted; duplicates are
    /// kept.
    ///
    /// # Errors
    ///
    /// - [`TreeError::InvalidElement`] if `element` does not compare equal to itself.
    /// - [`TreeError::Incomparable`] if `element` cannot be ordered against an element already in
    ///   the tree.
    ///
    /// The tree is unchanged in both cases.
    pub fn insert(&mut self, element: T) -> Result<bool, TreeError> {
        if !self.cmp.admits(&element) {
            return Err(TreeError::InvalidElement);
        }

        // Find the attachment point first; nothing is touched until the whole path compared.
        let mut parent = NIL;
        let mut side = Side::Left;
        let mut x = self.root;
        while let Some(key) = self.nodes[x].key.as_ref() {
            parent = x;
            side = match self.cmp.compare(&element, key) {
                Some(Ordering::Less) => Side::Left,
                Some(_) => Side::Right,
                None => return Err(TreeError::Incomparable),
            };
            x = self.child(x, side);
        }

        let z = self.nodes.add(RbNode::new_red(element, parent));
        if parent.is_nil() {
            self.root = z;
        } else {
            self.set_child(parent, side, z);
        }
        self.count += 1;
        self.insert_fixup(z);
        Ok(true)
    }

    /// Look up an element comparing equal to `element`.
    ///
    /// # Errors
    ///
    /// [`TreeError::Incomparable`] if `element` cannot be ordered against the elements met on
    /// the way down.
    pub fn find(&self, element: &T) -> Result<Option<&T>, TreeError> {
        let id = self.locate(element)?;
        Ok(self.nodes[id].key.as_ref())
    }

    /// Like [`find`](Self::find), treating an incomparable `element` as absent.
    pub fn get(&self, element: &T) -> Option<&T> {
        self.find(element).ok().flatten()
    }

    pub fn contains(&self, element: &T) -> bool {
        self.get(element).is_some()
    }

    /// Remove one element comparing equal to `element`. Returns whether one was removed.
    pub fn remove(&mut self, element: &T) -> bool {
        self.take(element).is_some()
    }

    /// Remove one element comparing equal to `element` and hand it back.
    pub fn take(&mut self, element: &T) -> Option<T> {
        let z = self.locate(element).ok()?;
        if z.is_nil() {
            return None;
        }
        self.unlink(z).0
    }

    /// Remove every element of `elements` that is present. Returns whether anything was removed.
    pub fn remove_all<'e, I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        let before = self.count;
        for element in elements {
            self.remove(element);
        }
        debug!(
            "remove_all dropped {} of {} elements",
            before - self.count,
            before
        );
        self.count != before
    }

    /// Reset to the empty tree.
    pub fn clear(&mut self) {
        debug!("clearing red-black tree of {} elements", self.count);
        self.nodes.clear();
        self.root = NIL;
        self.count = 0;
    }

    /// Smallest element under the tree's ordering.
    pub fn first(&self) -> Option<&T> {
        self.nodes[minimum(&self.nodes, self.root)].key.as_ref()
    }

    /// Largest element under the tree's ordering.
    pub fn last(&self) -> Option<&T> {
        self.nodes[maximum(&self.nodes, self.root)].key.as_ref()
    }

    /// Ascending traversal of the elements.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.nodes, self.root, self.count)
    }

    /// Ascending traversal that can remove the element it last yielded.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T, C> {
        CursorMut::new(self)
    }

    /// Text rendering of the tree's shape, one node per line with its colour. Empty for an empty
    /// tree. Meant for debugging, not parsing.
    pub fn to_display_string(&self) -> String
    where
        T: fmt::Display,
    {
        crate::display::render(&self.nodes, self.root)
    }

    // Descend from the root to the first node comparing equal to `element`; NIL if none does.
    fn locate(&self, element: &T) -> Result<NodeId, TreeError> {
        let mut x = self.root;
        while let Some(key) = self.nodes[x].key.as_ref() {
            x = match self.cmp.compare(element, key) {
                Some(Ordering::Equal) => return Ok(x),
                Some(Ordering::Less) => self.nodes[x].left,
                Some(Ordering::Greater) => self.nodes[x].right,
                None => return Err(TreeError::Incomparable),
            };
        }
        Ok(NIL)
    }

    /// Structurally remove the element held by `z`.
    ///
    /// If `z` has two children its in-order successor is the node actually detached, and the
    /// successor's element moves into `z`. Returns the removed element together with the id of the
    /// node that left the tree, so cursors can tell whether an element changed node.
    pub(crate) fn unlink(&mut self, z: NodeId) -> (Option<T>, NodeId) {
        let y = if self.nodes[z].left.is_nil() || self.nodes[z].right.is_nil() {
            z
        } else {
            successor(&self.nodes, z)
        };
        let x = if !self.nodes[y].left.is_nil() {
            self.nodes[y].left
        } else {
            self.nodes[y].right
        };

        // Unconditional, even when x is the sentinel: the fixup walks up from x.
        self.nodes[x].parent = self.nodes[y].parent;
        self.replace_in_parent(y, x);

        if y != z {
            let (zn, yn) = self.nodes.pair_mut(z, y);
            std::mem::swap(&mut zn.key, &mut yn.key);
        }

        if self.nodes[y].color == Color::Black {
            self.delete_fixup(x);
        }
        self.nodes[NIL].parent = NIL;

        let detached = self.nodes.free(y);
        self.count -= 1;
        (detached.key, y)
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        while self.color(self.parent(z)) == Color::Red {
            let parent = self.parent(z);
            // A red parent is never the root, so the grandparent is a real node.
            let grand = self.parent(parent);
            let side = self.side_of(parent);
            let uncle = self.child(grand, side.opposite());

            if self.color(uncle) == Color::Red {
                self.set_color(parent, Color::Black);
                self.set_color(uncle, Color::Black);
                self.set_color(grand, Color::Red);
                z = grand;
                continue;
            }

            if z == self.child(parent, side.opposite()) {
                // Inner grandchild: straighten it into the outer case.
                z = parent;
                self.rotate(z, side);
            }
            let parent = self.parent(z);
            let grand = self.parent(parent);
            self.set_color(parent, Color::Black);
            self.set_color(grand, Color::Red);
            self.rotate(grand, side.opposite());
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn delete_fixup(&mut self, mut x: NodeId) {
        while x != self.root && self.color(x) == Color::Black {
            let parent = self.parent(x);
            let side = if x == self.nodes[parent].left {
                Side::Left
            } else {
                Side::Right
            };
            let far = side.opposite();
            let mut w = self.child(parent, far);

            if self.color(w) == Color::Red {
                self.set_color(w, Color::Black);
                self.set_color(parent, Color::Red);
                self.rotate(parent, side);
                w = self.child(parent, far);
            }

            if self.color(self.nodes[w].left) == Color::Black
                && self.color(self.nodes[w].right) == Color::Black
            {
                self.set_color(w, Color::Red);
                x = parent;
                continue;
            }

            if self.color(self.child(w, far)) == Color::Black {
                let near = self.child(w, side);
                self.set_color(near, Color::Black);
                self.set_color(w, Color::Red);
                self.rotate(w, far);
                w = self.child(parent, far);
            }

            let parent_color = self.color(parent);
            self.set_color(w, parent_color);
            self.set_color(parent, Color::Black);
            let far_child = self.child(w, far);
            self.set_color(far_child, Color::Black);
            self.rotate(parent, side);
            x = self.root;
        }
        self.set_color(x, Color::Black);
    }

    /// Exchange `x` with its right child, keeping the in-order sequence.
    pub(crate) fn rotate_left(&mut self, x: NodeId) {
        trace!("rotate left at {:?}", x);
        let y = self.nodes[x].right;
        debug_assert!(!y.is_nil(), "rotate_left needs a right child");

        let beta = self.nodes[y].left;
        self.nodes[x].right = beta;
        if !beta.is_nil() {
            self.nodes[beta].parent = x;
        }
        self.nodes[y].parent = self.nodes[x].parent;
        self.replace_in_parent(x, y);
        self.nodes[y].left = x;
        self.nodes[x].parent = y;
    }

    /// Exchange `x` with its left child, keeping the in-order sequence.
    pub(crate) fn rotate_right(&mut self, x: NodeId) {
        trace!("rotate right at {:?}", x);
        let y = self.nodes[x].left;
        debug_assert!(!y.is_nil(), "rotate_right needs a left child");

        let beta = self.nodes[y].right;
        self.nodes[x].left = beta;
        if !beta.is_nil() {
            self.nodes[beta].parent = x;
        }
        self.nodes[y].parent = self.nodes[x].parent;
        self.replace_in_parent(x, y);
        self.nodes[y].right = x;
        self.nodes[x].parent = y;
    }

    /// Rotate `x` down towards `side`.
    #[inline]
    fn rotate(&mut self, x: NodeId, side: Side) {
        match side {
            Side::Left => self.rotate_left(x),
            Side::Right => self.rotate_right(x),
        }
    }

    // Point whatever referenced `old` (its parent's child slot, or the root) at `new`. Only
    // touches the parent side; `new.parent` is the caller's business.
    fn replace_in_parent(&mut self, old: NodeId, new: NodeId) {
        let parent = self.nodes[old].parent;
        if parent.is_nil() {
            self.root = new;
        } else if self.nodes[parent].left == old {
            self.nodes[parent].left = new;
        } else {
            self.nodes[parent].right = new;
        }
    }

    #[inline]
    fn color(&self, id: NodeId) -> Color {
        self.nodes[id].color
    }

    #[inline]
    fn set_color(&mut self, id: NodeId, color: Color) {
        debug_assert!(
            !(id.is_nil() && color == Color::Red),
            "the sentinel must stay black"
        );
        self.nodes[id].color = color;
    }

    #[inline]
    fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id].parent
    }

    #[inline]
    fn child(&self, id: NodeId, side: Side) -> NodeId {
        match side {
            Side::Left => self.nodes[id].left,
            Side::Right => self.nodes[id].right,
        }
    }

    #[inline]
    fn set_child(&mut self, id: NodeId, side: Side, child: NodeId) {
        match side {
            Side::Left => self.nodes[id].left = child,
            Side::Right => self.nodes[id].right = child,
        }
    }

    #[inline]
    fn side_of(&self, id: NodeId) -> Side {
        if self.nodes[self.parent(id)].left == id {
            Side::Left
        } else {
            Side::Right
        }
    }
}

impl<T: fmt::Display, C: Comparator<T>> fmt::Display for RedBlackTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl<T: fmt::Debug, C> fmt::Debug for RedBlackTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set()
            .entries(Iter::new(&self.nodes, self.root, self.count))
            .finish()
    }
}

impl<'a, T, C: Comparator<T>> IntoIterator for &'a RedBlackTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use rand::seq::SliceRandom;
    use rand::{thread_rng, Rng};

    use crate::compare::Comparator;
    use crate::error::TreeError;
    use crate::node::Color;
    use crate::tree::RedBlackTree;
    use crate::utils::arena::NIL;

    fn collect<C: Comparator<i32>>(tree: &RedBlackTree<i32, C>) -> Vec<i32> {
        tree.iter().copied().collect()
    }

    #[test]
    fn test_empty_tree() {
        let tree = RedBlackTree::<i32>::new();
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.iter().next(), None);
        assert_eq!(tree.to_display_string(), "");
        assert_eq!(tree.first(), None);
        assert!(!tree.contains(&1));
    }

    #[test]
    fn test_insert_root_is_black() {
        let mut tree = RedBlackTree::new();
        assert_eq!(tree.insert(10), Ok(true));
        assert_eq!(tree.nodes[tree.root].color, Color::Black);
        assert_eq!(tree.nodes[NIL].color, Color::Black);
    }

    #[test]
    fn test_remove_root_with_two_children() {
        let mut tree = RedBlackTree::from_elements([50, 25, 75, 10, 30, 60, 80]).unwrap();
        assert!(tree.remove(&50));
        assert_eq!(tree.len(), 6);
        assert!(!tree.contains(&50));
        assert_eq!(collect(&tree), vec![10, 25, 30, 60, 75, 80]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_ascending_insert_stays_balanced() {
        let tree = RedBlackTree::from_elements(1..=20).unwrap();
        let stats = tree.validate().unwrap();
        assert_eq!(stats.len, 20);
        assert!((stats.height as f64) <= 2.0 * 21f64.log2());
    }

    #[test]
    fn test_descending_comparator() {
        let mut tree = RedBlackTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for key in [10, 20, 30, 5] {
            tree.insert(key).unwrap();
        }
        assert_eq!(collect(&tree), vec![30, 20, 10, 5]);
        assert_eq!(tree.first(), Some(&30));
        assert_eq!(tree.last(), Some(&5));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let mut tree = RedBlackTree::new();
        assert_eq!(tree.insert(10), Ok(true));
        assert_eq!(tree.insert(10), Ok(true));
        assert_eq!(tree.insert(5), Ok(true));
        assert_eq!(tree.insert(10), Ok(true));
        assert_eq!(tree.len(), 4);
        assert_eq!(collect(&tree), vec![5, 10, 10, 10]);

        assert!(tree.remove(&10));
        assert_eq!(collect(&tree), vec![5, 10, 10]);
        tree.validate().unwrap();
    }

    #[test]
    fn test_nan_rejected_without_mutation() {
        let mut tree = RedBlackTree::from_elements([1.0, 2.0, 3.0]).unwrap();
        assert_eq!(tree.insert(f64::NAN), Err(TreeError::InvalidElement));
        assert_eq!(tree.len(), 3);
        assert!(!tree.contains(&f64::NAN));
        assert!(!tree.remove(&f64::NAN));
        tree.validate().unwrap();
    }

    // Elements of different parity can't be ordered against each other.
    struct SameParity;

    impl Comparator<i32> for SameParity {
        fn compare(&self, a: &i32, b: &i32) -> Option<Ordering> {
            if a % 2 == b % 2 {
                Some(a.cmp(b))
            } else {
                None
            }
        }
    }

    #[test]
    fn test_incomparable_elements() {
        let mut tree = RedBlackTree::with_comparator(SameParity);
        tree.insert(2).unwrap();
        tree.insert(4).unwrap();
        assert_eq!(tree.insert(3), Err(TreeError::Incomparable));
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.find(&3), Err(TreeError::Incomparable));
        assert!(!tree.contains(&3));
        assert!(!tree.remove(&3));
        assert_eq!(tree.find(&4), Ok(Some(&4)));
        assert_eq!(tree.find(&6), Ok(None));
    }

    #[test]
    fn test_remove_absent_leaves_size() {
        let mut tree = RedBlackTree::from_elements([3, 1, 2]).unwrap();
        assert!(!tree.remove(&42));
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.take(&2), Some(2));
        assert_eq!(tree.take(&2), None);
    }

    #[test]
    fn test_remove_leaf_and_single_child() {
        let mut tree = RedBlackTree::from_elements([50, 25, 75, 10]).unwrap();
        // 25 has only the 10 below it.
        assert!(tree.remove(&25));
        tree.validate().unwrap();
        assert_eq!(collect(&tree), vec![10, 50, 75]);
        // 75 is a leaf.
        assert!(tree.remove(&75));
        tree.validate().unwrap();
        assert_eq!(collect(&tree), vec![10, 50]);
    }

    #[test]
    fn test_rotations_keep_order() {
        let mut tree = RedBlackTree::from_elements([4, 2, 6, 1, 3, 5, 7]).unwrap();
        let before = collect(&tree);
        let root = tree.root;
        tree.rotate_left(root);
        assert_eq!(tree.nodes[tree.root].key, Some(6));
        assert_eq!(tree.nodes[tree.root].parent, NIL);
        assert_eq!(collect(&tree), before);

        let root = tree.root;
        tree.rotate_right(root);
        assert_eq!(tree.nodes[tree.root].key, Some(4));
        assert_eq!(collect(&tree), before);
        tree.validate().unwrap();
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut tree = RedBlackTree::from_elements([10, 20]).unwrap();
        tree.clear();
        assert!(tree.is_empty());
        assert!(!tree.contains(&10));
        tree.insert(30).unwrap();
        assert_eq!(tree.len(), 1);
        assert!(tree.contains(&30));
        assert!(tree.remove(&30));
        assert!(tree.is_empty());
    }

    #[test]
    fn test_remove_all() {
        let mut tree = RedBlackTree::from_elements([50, 25, 75, 10, 30, 60, 80]).unwrap();
        assert!(tree.remove_all(&[25, 75, 80]));
        assert_eq!(tree.len(), 4);
        for key in [25, 75, 80] {
            assert!(!tree.contains(&key));
        }
        assert!(!tree.remove_all(&[1, 2, 3]));
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_every_element_sequentially() {
        let mut tree = RedBlackTree::from_elements(0..20).unwrap();
        for key in 0..20 {
            assert!(tree.remove(&key));
            tree.validate().unwrap();
        }
        assert!(tree.is_empty());
        assert_eq!(tree.root, NIL);
    }

    #[test]
    fn test_random_insert_delete_preserves_invariants() {
        let mut rng = thread_rng();
        let mut keys: Vec<i32> = (0..500).collect();
        keys.shuffle(&mut rng);

        let mut tree = RedBlackTree::new();
        let mut expected = std::collections::BTreeMap::<i32, usize>::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(*key).unwrap();
            *expected.entry(*key).or_default() += 1;
            if i % 3 == 0 {
                let victim = rng.gen_range(0..500);
                let removed = tree.remove(&victim);
                let present = expected.get(&victim).copied().unwrap_or(0) > 0;
                assert_eq!(removed, present);
                if present {
                    *expected.get_mut(&victim).unwrap() -= 1;
                }
            }
            tree.validate().unwrap();
        }

        let flattened: Vec<i32> = expected
            .iter()
            .flat_map(|(k, n)| std::iter::repeat(*k).take(*n))
            .collect();
        assert_eq!(collect(&tree), flattened);
    }

    #[test]
    fn test_insert_then_remove_all_in_random_order() {
        let mut rng = thread_rng();
        let mut keys: Vec<i32> = (0..1000).collect();
        keys.shuffle(&mut rng);
        let mut tree = RedBlackTree::from_elements(keys.iter().copied()).unwrap();

        keys.shuffle(&mut rng);
        for key in &keys {
            assert!(tree.remove(key));
        }
        assert_eq!(tree.len(), 0);
        assert_eq!(tree.iter().count(), 0);
        // Every slot went back to the arena.
        assert!(tree.nodes.is_empty());
    }

    #[test]
    fn test_debug_lists_elements() {
        let tree = RedBlackTree::from_elements([3, 1, 2]).unwrap();
        assert_eq!(format!("{:?}", tree), "{1, 2, 3}");
    }
}
