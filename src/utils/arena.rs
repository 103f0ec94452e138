use std::ops::{Index, IndexMut};

// A u32 rather than usize: trees won't hold more than 4 billion nodes, and every node carries three
// of these links.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub u32);

/// The reserved slot. Stands in for "no node" on every leaf link and above the root.
pub const NIL: NodeId = NodeId(0);

impl NodeId {
    #[inline]
    pub fn is_nil(self) -> bool {
        self == NIL
    }
}

/// What the arena needs to know about the things it stores: how to make the placeholder that
/// occupies the reserved slot and every freed slot.
pub trait Slot {
    fn vacant() -> Self;
}

/// A place to store (owned) nodes that are addressed by index, with holes being re-used through a
/// separate free list. Slot 0 is permanently occupied by a vacant placeholder which the trees use
/// as their sentinel, so a link can always be followed and read without checking it first.
pub struct Arena<N: Slot> {
    slots: Vec<N>,
    free_list: Vec<u32>,
    size: usize,
}

impl<N: Slot> Arena<N> {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut slots = Vec::with_capacity(capacity + 1);
        slots.push(N::vacant());
        Self {
            slots,
            free_list: Vec::with_capacity(16),
            size: 0,
        }
    }

    /// Store `node`, reusing a freed slot if one is available.
    pub fn add(&mut self, node: N) -> NodeId {
        let id = match self.free_list.pop() {
            None => {
                let id = next_id(self.slots.len());
                self.slots.push(node);
                id
            }
            Some(idx) => {
                self.slots[idx as usize] = node;
                NodeId(idx)
            }
        };
        self.size += 1;
        id
    }

    /// Release the slot at `id`, handing back what it held. The reserved slot is never released.
    pub fn free(&mut self, id: NodeId) -> N {
        assert!(!id.is_nil(), "the reserved slot cannot be freed");
        let idx = id.0 as usize;
        assert!(idx < self.slots.len());

        let node = if idx == self.slots.len() - 1 {
            self.slots.pop().unwrap_or_else(N::vacant)
        } else {
            self.free_list.push(id.0);
            std::mem::replace(&mut self.slots[idx], N::vacant())
        };
        self.size -= 1;
        node
    }

    /// Drop every stored node, leaving only a fresh reserved slot.
    pub fn clear(&mut self) {
        self.slots.truncate(1);
        self.slots[0] = N::vacant();
        self.free_list.clear();
        self.size = 0;
    }

    /// Borrow two distinct slots mutably at once.
    pub fn pair_mut(&mut self, a: NodeId, b: NodeId) -> (&mut N, &mut N) {
        let (a, b) = (a.0 as usize, b.0 as usize);
        assert_ne!(a, b);
        if a < b {
            let (lo, hi) = self.slots.split_at_mut(b);
            (&mut lo[a], &mut hi[0])
        } else {
            let (lo, hi) = self.slots.split_at_mut(a);
            (&mut hi[0], &mut lo[b])
        }
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Number of occupied slots, not counting the reserved one.
    pub fn size(&self) -> usize {
        self.size
    }
}

// Ids are u32, so the arena stops growing at u32::MAX slots rather than handing out aliases.
fn next_id(len: usize) -> NodeId {
    match u32::try_from(len) {
        Ok(idx) => NodeId(idx),
        Err(_) => panic!("arena is full: {} slots", len),
    }
}

impl<N: Slot> Index<NodeId> for Arena<N> {
    type Output = N;

    #[inline]
    fn index(&self, index: NodeId) -> &Self::Output {
        &self.slots[index.0 as usize]
    }
}

impl<N: Slot> IndexMut<NodeId> for Arena<N> {
    #[inline]
    fn index_mut(&mut self, index: NodeId) -> &mut Self::Output {
        &mut self.slots[index.0 as usize]
    }
}

impl<N: Slot> Default for Arena<N> {
    fn default() -> Self {
        Self::new()
    }
}
