//! Unbalanced binary search tree.
//!
//! Same ordering and traversal contract as [`RedBlackTree`](crate::RedBlackTree), without any
//! rebalancing: ascending input degrades it into a linked list. It exists as the baseline the
//! red-black tree is measured against. Unlike the red-black tree it keeps elements unique.

use std::cmp::Ordering;
use std::fmt;

use log::debug;

use crate::compare::{Comparator, NaturalOrder};
use crate::error::TreeError;
use crate::iter::{InOrder, Position};
use crate::node::{minimum, BstNode};
use crate::utils::arena::{Arena, NodeId, NIL};

pub struct BinarySearchTree<T, C = NaturalOrder> {
    nodes: Arena<BstNode<T>>,
    root: NodeId,
    count: usize,
    cmp: C,
}

impl<T: PartialOrd> Default for BinarySearchTree<T, NaturalOrder> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: PartialOrd> BinarySearchTree<T, NaturalOrder> {
    pub fn new() -> Self {
        Self::with_comparator(NaturalOrder)
    }

    pub fn from_elements<I>(elements: I) -> Result<Self, TreeError>
    where
        I: IntoIterator<Item = T>,
    {
        let mut tree = Self::new();
        for element in elements {
            tree.insert(element)?;
        }
        debug!("bulk-loaded binary search tree with {} elements", tree.count);
        Ok(tree)
    }
}

impl<T, C: Comparator<T>> BinarySearchTree<T, C> {
    pub fn with_comparator(cmp: C) -> Self {
        Self {
            nodes: Arena::with_capacity(16),
            root: NIL,
            count: 0,
            cmp,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.count
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Insert `element` unless an equal one is already present, in which case `Ok(false)` is
    /// returned and nothing changes.
    pub fn insert(&mut self, element: T) -> Result<bool, TreeError> {
        if !self.cmp.admits(&element) {
            return Err(TreeError::InvalidElement);
        }

        let mut parent = NIL;
        let mut went_left = false;
        let mut x = self.root;
        while let Some(key) = self.nodes[x].key.as_ref() {
            parent = x;
            match self.cmp.compare(&element, key) {
                Some(Ordering::Equal) => return Ok(false),
                Some(Ordering::Less) => went_left = true,
                Some(Ordering::Greater) => went_left = false,
                None => return Err(TreeError::Incomparable),
            }
            x = if went_left {
                self.nodes[x].left
            } else {
                self.nodes[x].right
            };
        }

        let z = self.nodes.add(BstNode::new_leaf(element, parent));
        if parent.is_nil() {
            self.root = z;
        } else if went_left {
            self.nodes[parent].left = z;
        } else {
            self.nodes[parent].right = z;
        }
        self.count += 1;
        Ok(true)
    }

    pub fn find(&self, element: &T) -> Result<Option<&T>, TreeError> {
        let mut x = self.root;
        while let Some(key) = self.nodes[x].key.as_ref() {
            x = match self.cmp.compare(element, key) {
                Some(Ordering::Equal) => return Ok(Some(key)),
                Some(Ordering::Less) => self.nodes[x].left,
                Some(Ordering::Greater) => self.nodes[x].right,
                None => return Err(TreeError::Incomparable),
            };
        }
        Ok(None)
    }

    pub fn contains(&self, element: &T) -> bool {
        matches!(self.find(element), Ok(Some(_)))
    }

    pub fn remove(&mut self, element: &T) -> bool {
        let mut x = self.root;
        while let Some(key) = self.nodes[x].key.as_ref() {
            x = match self.cmp.compare(element, key) {
                Some(Ordering::Equal) => break,
                Some(Ordering::Less) => self.nodes[x].left,
                Some(Ordering::Greater) => self.nodes[x].right,
                None => return false,
            };
        }
        if x.is_nil() {
            return false;
        }
        self.unlink(x);
        true
    }

    pub fn remove_all<'e, I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        let before = self.count;
        for element in elements {
            self.remove(element);
        }
        self.count != before
    }

    pub fn clear(&mut self) {
        debug!("clearing binary search tree of {} elements", self.count);
        self.nodes.clear();
        self.root = NIL;
        self.count = 0;
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            inner: InOrder::new(&self.nodes, self.root, self.count),
        }
    }

    pub fn cursor_mut(&mut self) -> CursorMut<'_, T, C> {
        let position = Position::start(&self.nodes, self.root);
        CursorMut {
            tree: self,
            position,
        }
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn height(&self) -> usize {
        crate::stats::height(&self.nodes, self.root)
    }

    pub fn to_display_string(&self) -> String
    where
        T: fmt::Display,
    {
        crate::display::render(&self.nodes, self.root)
    }

    // A node with two children takes its successor's element; the successor, which has no left
    // child, is the one spliced out.
    fn unlink(&mut self, z: NodeId) -> (Option<T>, NodeId) {
        let y = if self.nodes[z].left.is_nil() || self.nodes[z].right.is_nil() {
            z
        } else {
            minimum(&self.nodes, self.nodes[z].right)
        };
        let x = if !self.nodes[y].left.is_nil() {
            self.nodes[y].left
        } else {
            self.nodes[y].right
        };

        let parent = self.nodes[y].parent;
        if !x.is_nil() {
            self.nodes[x].parent = parent;
        }
        if parent.is_nil() {
            self.root = x;
        } else if self.nodes[parent].left == y {
            self.nodes[parent].left = x;
        } else {
            self.nodes[parent].right = x;
        }

        if y != z {
            let (zn, yn) = self.nodes.pair_mut(z, y);
            std::mem::swap(&mut zn.key, &mut yn.key);
        }

        let detached = self.nodes.free(y);
        self.count -= 1;
        (detached.key, y)
    }
}

impl<T: fmt::Display, C: Comparator<T>> fmt::Display for BinarySearchTree<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl<'a, T, C: Comparator<T>> IntoIterator for &'a BinarySearchTree<T, C> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over the elements of a [`BinarySearchTree`].
pub struct Iter<'a, T> {
    inner: InOrder<'a, BstNode<T>>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}

/// Ascending traversal over a [`BinarySearchTree`] that can remove the element it last yielded.
pub struct CursorMut<'a, T, C> {
    tree: &'a mut BinarySearchTree<T, C>,
    position: Position,
}

impl<'a, T, C: Comparator<T>> CursorMut<'a, T, C> {
    pub fn has_next(&self) -> bool {
        self.position.has_next()
    }

    pub fn advance(&mut self) -> Result<&T, TreeError> {
        self.position.advance(&self.tree.nodes)
    }

    pub fn remove_current(&mut self) -> Result<T, TreeError> {
        let id = self.position.take_last()?;
        let (element, detached) = self.tree.unlink(id);
        self.position.unlinked(id, detached);
        element.ok_or(TreeError::NoCurrent)
    }
}

#[cfg(test)]
mod tests {
    use crate::bst::BinarySearchTree;
    use crate::error::TreeError;

    #[test]
    fn test_duplicates_rejected() {
        let mut tree = BinarySearchTree::new();
        assert_eq!(tree.insert(10), Ok(true));
        assert_eq!(tree.insert(10), Ok(false));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_sorted_input_degenerates() {
        let tree = BinarySearchTree::from_elements(0..100).unwrap();
        assert_eq!(tree.height(), 100);
        assert_eq!(tree.iter().len(), 100);
    }

    #[test]
    fn test_remove_cases() {
        let mut tree = BinarySearchTree::from_elements([50, 25, 75, 10, 30, 60, 80]).unwrap();
        assert!(tree.remove(&50));
        assert!(tree.remove(&10));
        assert!(tree.remove(&75));
        assert!(!tree.remove(&75));
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![25, 30, 60, 80]);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_nan_rejected() {
        let mut tree = BinarySearchTree::new();
        tree.insert(1.0).unwrap();
        assert_eq!(tree.insert(f64::NAN), Err(TreeError::InvalidElement));
        assert!(!tree.contains(&f64::NAN));
    }

    #[test]
    fn test_cursor_removal() {
        let mut tree = BinarySearchTree::from_elements([50, 25, 75, 10, 30, 60, 80]).unwrap();
        let mut seen = vec![];
        let mut cursor = tree.cursor_mut();
        assert_eq!(cursor.remove_current(), Err(TreeError::NoCurrent));
        while cursor.has_next() {
            let key = *cursor.advance().unwrap();
            seen.push(key);
            if key == 25 || key == 50 {
                cursor.remove_current().unwrap();
            }
        }
        assert_eq!(cursor.advance(), Err(TreeError::Exhausted));
        assert_eq!(seen, vec![10, 25, 30, 50, 60, 75, 80]);
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![10, 30, 60, 75, 80]);
    }

    #[test]
    fn test_descending_comparator() {
        let mut tree = BinarySearchTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
        for key in [10, 20, 30, 5] {
            tree.insert(key).unwrap();
        }
        assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![30, 20, 10, 5]);
    }
}
