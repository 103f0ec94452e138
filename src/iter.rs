use crate::compare::Comparator;
use crate::error::TreeError;
use crate::node::{minimum, successor, Linked, RbNode};
use crate::tree::RedBlackTree;
use crate::utils::arena::{Arena, NodeId, NIL};

/// Walks an arena tree in ascending order by repeated successor steps.
pub(crate) struct InOrder<'a, N: Linked> {
    nodes: &'a Arena<N>,
    next: NodeId,
    remaining: usize,
}

impl<'a, N: Linked> InOrder<'a, N> {
    pub(crate) fn new(nodes: &'a Arena<N>, root: NodeId, len: usize) -> Self {
        Self {
            nodes,
            next: minimum(nodes, root),
            remaining: len,
        }
    }
}

impl<'a, N: Linked> Iterator for InOrder<'a, N> {
    type Item = &'a N::Key;

    fn next(&mut self) -> Option<Self::Item> {
        let nodes: &'a Arena<N> = self.nodes;
        let key = nodes[self.next].key()?;
        self.next = successor(nodes, self.next);
        self.remaining = self.remaining.saturating_sub(1);
        Some(key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

/// Ascending iterator over the elements of a [`RedBlackTree`].
pub struct Iter<'a, T> {
    inner: InOrder<'a, RbNode<T>>,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(nodes: &'a Arena<RbNode<T>>, root: NodeId, len: usize) -> Self {
        Self {
            inner: InOrder::new(nodes, root, len),
        }
    }
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

/// The two-field cursor behind the mutating traversals: the node last handed out and the node to
/// hand out next. Both are node identities, never keys, because removing a node with two children
/// moves its successor's element into it.
pub(crate) struct Position {
    last: NodeId,
    next: NodeId,
}

impl Position {
    pub(crate) fn start<N: Linked>(nodes: &Arena<N>, root: NodeId) -> Self {
        Self {
            last: NIL,
            next: minimum(nodes, root),
        }
    }

    #[inline]
    pub(crate) fn has_next(&self) -> bool {
        !self.next.is_nil()
    }

    pub(crate) fn peek<'a, N: Linked>(&self, nodes: &'a Arena<N>) -> Option<&'a N::Key> {
        nodes[self.next].key()
    }

    pub(crate) fn advance<'a, N: Linked>(
        &mut self,
        nodes: &'a Arena<N>,
    ) -> Result<&'a N::Key, TreeError> {
        let key = nodes[self.next].key().ok_or(TreeError::Exhausted)?;
        self.last = self.next;
        self.next = successor(nodes, self.next);
        Ok(key)
    }

    /// Hand over the node to remove, forgetting it so a second removal is refused.
    pub(crate) fn take_last(&mut self) -> Result<NodeId, TreeError> {
        if self.last.is_nil() {
            return Err(TreeError::NoCurrent);
        }
        Ok(std::mem::replace(&mut self.last, NIL))
    }

    /// Account for the removal of `removed`, where `detached` is the node that physically left the
    /// tree. When they differ, `detached` was the successor and its element now lives in
    /// `removed`, which is therefore the next node to visit.
    pub(crate) fn unlinked(&mut self, removed: NodeId, detached: NodeId) {
        if detached != removed {
            debug_assert_eq!(detached, self.next);
            self.next = removed;
        }
    }
}

/// Ascending traversal over a [`RedBlackTree`] that can remove the element it last yielded.
///
/// ```rust
/// use ordtree::RedBlackTree;
///
/// let mut tree = RedBlackTree::from_elements(1..=6).unwrap();
/// let mut cursor = tree.cursor_mut();
/// while cursor.has_next() {
///     if cursor.advance().unwrap() % 2 == 0 {
///         cursor.remove_current().unwrap();
///     }
/// }
/// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), vec![1, 3, 5]);
/// ```
pub struct CursorMut<'a, T, C> {
    tree: &'a mut RedBlackTree<T, C>,
    position: Position,
}

impl<'a, T, C: Comparator<T>> CursorMut<'a, T, C> {
    pub(crate) fn new(tree: &'a mut RedBlackTree<T, C>) -> Self {
        let position = Position::start(&tree.nodes, tree.root);
        Self { tree, position }
    }

    /// Whether [`advance`](Self::advance) would yield another element.
    pub fn has_next(&self) -> bool {
        self.position.has_next()
    }

    /// The element the next [`advance`](Self::advance) would yield.
    pub fn peek(&self) -> Option<&T> {
        self.position.peek(&self.tree.nodes)
    }

    /// Move to the next element and return it.
    ///
    /// # Errors
    ///
    /// [`TreeError::Exhausted`] once every element has been yielded.
    pub fn advance(&mut self) -> Result<&T, TreeError> {
        self.position.advance(&self.tree.nodes)
    }

    /// Remove the element most recently returned by [`advance`](Self::advance) and hand it back.
    /// The traversal carries on with the element that followed it.
    ///
    /// # Errors
    ///
    /// [`TreeError::NoCurrent`] if nothing has been yielded yet, or the current element was
    /// already removed.
    pub fn remove_current(&mut self) -> Result<T, TreeError> {
        let id = self.position.take_last()?;
        let (element, detached) = self.tree.unlink(id);
        self.position.unlinked(id, detached);
        element.ok_or(TreeError::NoCurrent)
    }
}

#[cfg(test)]
mod tests {
    use crate::error::TreeError;
    use crate::tree::RedBlackTree;

    #[test]
    fn test_iter_in_order() {
        let tree = RedBlackTree::from_elements([5, 3, 8, 1, 4, 7, 9, 2, 6]).unwrap();
        let it = tree.iter();
        assert_eq!(it.len(), 9);
        assert_eq!(it.copied().collect::<Vec<_>>(), (1..=9).collect::<Vec<_>>());
        let mut total = 0;
        for key in &tree {
            total += key;
        }
        assert_eq!(total, 45);
    }

    #[test]
    fn test_cursor_on_empty_tree() {
        let mut tree = RedBlackTree::<i32>::new();
        let mut cursor = tree.cursor_mut();
        assert!(!cursor.has_next());
        assert_eq!(cursor.advance(), Err(TreeError::Exhausted));
        assert_eq!(cursor.remove_current(), Err(TreeError::NoCurrent));
    }

    #[test]
    fn test_remove_without_advance() {
        let mut tree = RedBlackTree::from_elements([50]).unwrap();
        let mut cursor = tree.cursor_mut();
        assert_eq!(cursor.remove_current(), Err(TreeError::NoCurrent));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_remove_twice() {
        let mut tree = RedBlackTree::from_elements([50, 25]).unwrap();
        let mut cursor = tree.cursor_mut();
        assert_eq!(cursor.advance(), Ok(&25));
        assert_eq!(cursor.remove_current(), Ok(25));
        assert_eq!(cursor.remove_current(), Err(TreeError::NoCurrent));
        assert_eq!(cursor.advance(), Ok(&50));
        assert_eq!(cursor.advance(), Err(TreeError::Exhausted));
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_remove_node_with_two_children() {
        // 50 is the root with both children; removing it moves 60 into its node.
        let mut tree = RedBlackTree::from_elements([50, 25, 75, 10, 30, 60, 80]).unwrap();
        let mut seen = vec![];
        let mut cursor = tree.cursor_mut();
        while cursor.has_next() {
            let key = *cursor.advance().unwrap();
            seen.push(key);
            if key == 50 {
                assert_eq!(cursor.remove_current(), Ok(50));
                assert_eq!(cursor.peek(), Some(&60));
            }
        }
        assert_eq!(seen, vec![10, 25, 30, 50, 60, 75, 80]);
        assert_eq!(
            tree.iter().copied().collect::<Vec<_>>(),
            vec![10, 25, 30, 60, 75, 80]
        );
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_every_element_while_walking() {
        let mut tree = RedBlackTree::from_elements(0..64).unwrap();
        let mut seen = vec![];
        let mut cursor = tree.cursor_mut();
        while cursor.has_next() {
            seen.push(*cursor.advance().unwrap());
            cursor.remove_current().unwrap();
        }
        assert_eq!(seen, (0..64).collect::<Vec<_>>());
        assert!(tree.is_empty());
        tree.validate().unwrap();
    }

    #[test]
    fn test_remove_selected_elements_while_walking() {
        let mut tree = RedBlackTree::from_elements((0..200).rev()).unwrap();
        let mut seen = vec![];
        {
            let mut cursor = tree.cursor_mut();
            while let Ok(key) = cursor.advance() {
                let key = *key;
                seen.push(key);
                if key % 3 == 0 {
                    assert_eq!(cursor.remove_current(), Ok(key));
                }
            }
        }
        assert_eq!(seen, (0..200).collect::<Vec<_>>());
        let remaining: Vec<_> = tree.iter().copied().collect();
        assert_eq!(
            remaining,
            (0..200).filter(|k| k % 3 != 0).collect::<Vec<_>>()
        );
        tree.validate().unwrap();
    }
}
