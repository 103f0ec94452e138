//! Ordered collections backed by binary search trees whose nodes live in an index arena.
//!
//! [`RedBlackTree`] keeps itself balanced through red-black colouring and rotations, so insertion,
//! lookup and removal stay `O(log n)` whatever order elements arrive in.
//! [`BinarySearchTree`] offers the same contract without rebalancing and serves as a baseline;
//! the [`study`] module times one against the other.

use std::fmt::Display;

pub use crate::bst::BinarySearchTree;
pub use crate::compare::{Comparator, NaturalOrder};
pub use crate::error::TreeError;
pub use crate::iter::{CursorMut, Iter};
pub use crate::node::Color;
pub use crate::stats::{InvariantViolation, TreeStats};
pub use crate::tree::RedBlackTree;

pub mod bst;
pub mod compare;
mod display;
pub mod error;
pub mod iter;
mod node;
pub mod stats;
pub mod study;
pub mod tree;
pub mod utils;

/// The collection contract shared by both trees, so harnesses can drive either one.
pub trait OrderedCollection<T> {
    type Iter<'a>: Iterator<Item = &'a T>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Add `element`. `Ok(false)` means the collection declined it as a duplicate.
    fn add(&mut self, element: T) -> Result<bool, TreeError>;

    fn contains(&self, element: &T) -> bool;

    fn remove(&mut self, element: &T) -> bool;

    /// Remove each of `elements` that is present. Returns whether anything was removed.
    fn remove_all<'e, I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        let mut changed = false;
        for element in elements {
            changed |= self.remove(element);
        }
        changed
    }

    fn clear(&mut self);

    fn iter(&self) -> Self::Iter<'_>;

    /// Text rendering of the tree's shape. The only part of the contract that needs `T: Display`.
    fn to_display_string(&self) -> String
    where
        T: Display;
}

impl<T, C: Comparator<T>> OrderedCollection<T> for RedBlackTree<T, C> {
    type Iter<'a>
        = Iter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        RedBlackTree::len(self)
    }

    fn add(&mut self, element: T) -> Result<bool, TreeError> {
        self.insert(element)
    }

    fn contains(&self, element: &T) -> bool {
        RedBlackTree::contains(self, element)
    }

    fn remove(&mut self, element: &T) -> bool {
        RedBlackTree::remove(self, element)
    }

    fn remove_all<'e, I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        RedBlackTree::remove_all(self, elements)
    }

    fn clear(&mut self) {
        RedBlackTree::clear(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        RedBlackTree::iter(self)
    }

    fn to_display_string(&self) -> String
    where
        T: Display,
    {
        RedBlackTree::to_display_string(self)
    }
}

impl<T, C: Comparator<T>> OrderedCollection<T> for BinarySearchTree<T, C> {
    type Iter<'a>
        = bst::Iter<'a, T>
    where
        Self: 'a,
        T: 'a;

    fn len(&self) -> usize {
        BinarySearchTree::len(self)
    }

    fn add(&mut self, element: T) -> Result<bool, TreeError> {
        self.insert(element)
    }

    fn contains(&self, element: &T) -> bool {
        BinarySearchTree::contains(self, element)
    }

    fn remove(&mut self, element: &T) -> bool {
        BinarySearchTree::remove(self, element)
    }

    fn remove_all<'e, I>(&mut self, elements: I) -> bool
    where
        I: IntoIterator<Item = &'e T>,
        T: 'e,
    {
        BinarySearchTree::remove_all(self, elements)
    }

    fn clear(&mut self) {
        BinarySearchTree::clear(self)
    }

    fn iter(&self) -> Self::Iter<'_> {
        BinarySearchTree::iter(self)
    }

    fn to_display_string(&self) -> String
    where
        T: Display,
    {
        BinarySearchTree::to_display_string(self)
    }
}
