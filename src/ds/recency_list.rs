//! Arena-backed doubly linked recency list.
//!
//! Nodes live in a `Vec` of slots and link to each other by [`NodeId`]
//! (a slot index) instead of by pointer. Freed slots are threaded into an
//! in-place free list and reused by the next push, so handles stay stable
//! for the lifetime of a node and the structure needs no `unsafe`.
//!
//! ## Architecture
//!
//! ```text
//!   slots: Vec<Slot<T>>
//!   ┌──────┬───────────────────────────────────────────────┐
//!   │ idx  │ Slot                                          │
//!   ├──────┼───────────────────────────────────────────────┤
//!   │  0   │ Occupied { value: A, prev: None, next: 2 }    │
//!   │  1   │ Vacant   { next_free: None }   ◄── free_head  │
//!   │  2   │ Occupied { value: B, prev: 0, next: 3 }       │
//!   │  3   │ Occupied { value: C, prev: 2, next: None }    │
//!   └──────┴───────────────────────────────────────────────┘
//!
//!   head (MRU) ─► [0] ◄──► [2] ◄──► [3] ◄── tail (LRU)
//! ```
//!
//! ## Performance
//! - `push_front` / `pop_back` / `remove` / `move_to_front`: O(1)
//! - `iter`: O(n), head to tail

/// Stable handle to a node in a [`RecencyList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
enum Slot<T> {
    Occupied {
        value: T,
        prev: Option<NodeId>,
        next: Option<NodeId>,
    },
    Vacant {
        next_free: Option<usize>,
    },
}

/// Doubly linked list ordered from most-recently-used (front) to
/// least-recently-used (back).
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<usize>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
    len: usize,
}

impl<T> RecencyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free_head: None,
            head: None,
            tail: None,
            len: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: NodeId) -> bool {
        matches!(self.slots.get(id.0), Some(Slot::Occupied { .. }))
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        match self.slots.get(id.0)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        match self.slots.get_mut(id.0)? {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Value at the MRU end.
    pub fn front(&self) -> Option<&T> {
        self.head.and_then(|id| self.get(id))
    }

    /// Value at the LRU end.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    /// Inserts `value` at the MRU end and returns its handle.
    pub fn push_front(&mut self, value: T) -> NodeId {
        let id = self.alloc(Slot::Occupied {
            value,
            prev: None,
            next: self.head,
        });
        match self.head {
            Some(old_head) => self.set_prev(old_head, Some(id)),
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
        id
    }

    /// Moves a live node to the MRU end; returns `false` if `id` is not live.
    pub fn move_to_front(&mut self, id: NodeId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.unlink(id);
        let old_head = self.head;
        self.set_links(id, None, old_head);
        if let Some(old_head) = old_head {
            self.set_prev(old_head, Some(id));
        } else {
            self.tail = Some(id);
        }
        self.head = Some(id);
        true
    }

    /// Removes node `id` and returns its value.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        if !self.contains(id) {
            return None;
        }
        self.unlink(id);
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        let slot = std::mem::replace(&mut self.slots[id.0], vacant);
        self.free_head = Some(id.0);
        self.len -= 1;
        match slot {
            Slot::Occupied { value, .. } => Some(value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Removes and returns the LRU value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Drops every node and releases the free list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates values from MRU to LRU.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
        }
    }

    fn alloc(&mut self, slot: Slot<T>) -> NodeId {
        match self.free_head {
            Some(idx) => {
                if let Slot::Vacant { next_free } = self.slots[idx] {
                    self.free_head = next_free;
                }
                self.slots[idx] = slot;
                NodeId(idx)
            },
            None => {
                self.slots.push(slot);
                NodeId(self.slots.len() - 1)
            },
        }
    }

    fn links(&self, id: NodeId) -> Option<(Option<NodeId>, Option<NodeId>)> {
        match self.slots.get(id.0)? {
            Slot::Occupied { prev, next, .. } => Some((*prev, *next)),
            Slot::Vacant { .. } => None,
        }
    }

    fn set_links(&mut self, id: NodeId, new_prev: Option<NodeId>, new_next: Option<NodeId>) {
        if let Some(Slot::Occupied { prev, next, .. }) = self.slots.get_mut(id.0) {
            *prev = new_prev;
            *next = new_next;
        }
    }

    fn set_prev(&mut self, id: NodeId, new_prev: Option<NodeId>) {
        if let Some(Slot::Occupied { prev, .. }) = self.slots.get_mut(id.0) {
            *prev = new_prev;
        }
    }

    fn set_next(&mut self, id: NodeId, new_next: Option<NodeId>) {
        if let Some(Slot::Occupied { next, .. }) = self.slots.get_mut(id.0) {
            *next = new_next;
        }
    }

    /// Splices `id` out of the chain, leaving its slot occupied.
    fn unlink(&mut self, id: NodeId) {
        let Some((prev, next)) = self.links(id) else {
            return;
        };
        match prev {
            Some(prev_id) => self.set_next(prev_id, next),
            None => self.head = next,
        }
        match next {
            Some(next_id) => self.set_prev(next_id, prev),
            None => self.tail = prev,
        }
        self.set_links(id, None, None);
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len, 0);
            return;
        }

        let mut count = 0usize;
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            let (node_prev, node_next) = self.links(id).expect("linked node is vacant");
            assert_eq!(node_prev, prev, "broken back link at {:?}", id);
            if node_next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = node_next;
            count += 1;
            assert!(count <= self.len, "cycle detected in recency list");
        }
        assert_eq!(count, self.len);

        let occupied = self
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied { .. }))
            .count();
        assert_eq!(occupied, self.len);
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over values from MRU to LRU.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<NodeId>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        match self.list.slots.get(id.0)? {
            Slot::Occupied { value, next, .. } => {
                self.current = *next;
                Some(value)
            },
            Slot::Vacant { .. } => None,
        }
    }
}
