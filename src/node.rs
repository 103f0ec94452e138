use crate::utils::arena::{Arena, NodeId, Slot, NIL};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Color {
    Red,
    Black,
}

impl Color {
    /// Single letter tag used by the diagnostic rendering.
    pub fn tag(self) -> char {
        match self {
            Color::Red => 'R',
            Color::Black => 'N',
        }
    }
}

/// Uniform access to the parts of a node that ordered traversal and rendering need.
pub(crate) trait Linked: Slot {
    type Key;

    /// `None` only for vacant slots, including the sentinel.
    fn key(&self) -> Option<&Self::Key>;
    fn left(&self) -> NodeId;
    fn right(&self) -> NodeId;
    fn parent(&self) -> NodeId;

    /// Colour shown next to the key when rendering, if the node has one.
    fn color_tag(&self) -> Option<char> {
        None
    }
}

pub(crate) struct RbNode<T> {
    pub(crate) key: Option<T>,
    pub(crate) color: Color,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) parent: NodeId,
}

impl<T> RbNode<T> {
    /// Freshly inserted nodes are red and hang off sentinels on both sides.
    #[inline]
    pub(crate) fn new_red(key: T, parent: NodeId) -> Self {
        Self {
            key: Some(key),
            color: Color::Red,
            left: NIL,
            right: NIL,
            parent,
        }
    }
}

impl<T> Slot for RbNode<T> {
    fn vacant() -> Self {
        Self {
            key: None,
            color: Color::Black,
            left: NIL,
            right: NIL,
            parent: NIL,
        }
    }
}

impl<T> Linked for RbNode<T> {
    type Key = T;

    #[inline]
    fn key(&self) -> Option<&T> {
        self.key.as_ref()
    }
    #[inline]
    fn left(&self) -> NodeId {
        self.left
    }
    #[inline]
    fn right(&self) -> NodeId {
        self.right
    }
    #[inline]
    fn parent(&self) -> NodeId {
        self.parent
    }
    fn color_tag(&self) -> Option<char> {
        Some(self.color.tag())
    }
}

pub(crate) struct BstNode<T> {
    pub(crate) key: Option<T>,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) parent: NodeId,
}

impl<T> BstNode<T> {
    #[inline]
    pub(crate) fn new_leaf(key: T, parent: NodeId) -> Self {
        Self {
            key: Some(key),
            left: NIL,
            right: NIL,
            parent,
        }
    }
}

impl<T> Slot for BstNode<T> {
    fn vacant() -> Self {
        Self {
            key: None,
            left: NIL,
            right: NIL,
            parent: NIL,
        }
    }
}

impl<T> Linked for BstNode<T> {
    type Key = T;

    #[inline]
    fn key(&self) -> Option<&T> {
        self.key.as_ref()
    }
    #[inline]
    fn left(&self) -> NodeId {
        self.left
    }
    #[inline]
    fn right(&self) -> NodeId {
        self.right
    }
    #[inline]
    fn parent(&self) -> NodeId {
        self.parent
    }
}

/// Leftmost node of the subtree rooted at `id`, or `NIL` for an empty subtree.
pub(crate) fn minimum<N: Linked>(nodes: &Arena<N>, mut id: NodeId) -> NodeId {
    if id.is_nil() {
        return NIL;
    }
    while !nodes[id].left().is_nil() {
        id = nodes[id].left();
    }
    id
}

/// Rightmost node of the subtree rooted at `id`, or `NIL` for an empty subtree.
pub(crate) fn maximum<N: Linked>(nodes: &Arena<N>, mut id: NodeId) -> NodeId {
    if id.is_nil() {
        return NIL;
    }
    while !nodes[id].right().is_nil() {
        id = nodes[id].right();
    }
    id
}

/// In-order successor: the minimum of the right subtree if there is one, else the nearest
/// ancestor whose left subtree holds `id`.
pub(crate) fn successor<N: Linked>(nodes: &Arena<N>, id: NodeId) -> NodeId {
    let right = nodes[id].right();
    if !right.is_nil() {
        return minimum(nodes, right);
    }
    let mut current = id;
    let mut parent = nodes[id].parent();
    while !parent.is_nil() && current == nodes[parent].right() {
        current = parent;
        parent = nodes[parent].parent();
    }
    parent
}
