//! Slab Storage
//!
//! `Slab<T>` is a growable array of optional slots. It backs both the
//! scene's pool table (indexed by entity type id) and its layer table
//! (indexed by layer number), so indexing past the end extends the slab
//! with empty slots instead of failing.
//!
//! Ownership follows `T`: a `Slab<Box<U>>` owns and drops its elements, a
//! `Slab<&U>` only borrows them. Growth doubles the capacity and goes
//! through `try_reserve`, so an allocation failure comes back as
//! `SlabError::Alloc` instead of aborting mid-frame.

use crate::error::SlabError;

/// Sparse, order-preserving slot array.
#[derive(Debug, Clone)]
pub struct Slab<T> {
    slots: Vec<Option<T>>,
}

impl<T> Slab<T> {
    /// Create an empty slab. No memory is allocated until the first add.
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Create a slab with room for `capacity` slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
        }
    }

    /// Make room for one more slot, doubling the capacity when full.
    fn grow_for_push(&mut self) -> Result<(), SlabError> {
        if self.slots.len() < self.slots.capacity() {
            return Ok(());
        }
        let extra = self.slots.capacity().max(1);
        self.slots
            .try_reserve_exact(extra)
            .map_err(|source| SlabError::Alloc {
                requested: self.slots.len() + extra,
                source,
            })
    }

    /// Append an element and return its index.
    pub fn add(&mut self, element: T) -> Result<usize, SlabError> {
        self.push_slot(Some(element))
    }

    fn push_slot(&mut self, slot: Option<T>) -> Result<usize, SlabError> {
        self.grow_for_push()?;
        self.slots.push(slot);
        Ok(self.slots.len() - 1)
    }

    /// Mutable access to the slot at `index`, extending the slab with empty
    /// slots up to it if needed.
    pub fn slot_mut(&mut self, index: usize) -> Result<&mut Option<T>, SlabError> {
        while self.slots.len() <= index {
            self.push_slot(None)?;
        }
        Ok(&mut self.slots[index])
    }

    /// Mutable access to an existing slot. Never extends the slab.
    pub fn get_slot_mut(&mut self, index: usize) -> Option<&mut Option<T>> {
        self.slots.get_mut(index)
    }

    /// Store `element` at `index`, replacing (and returning) any previous one.
    pub fn insert(&mut self, index: usize, element: T) -> Result<Option<T>, SlabError> {
        Ok(self.slot_mut(index)?.replace(element))
    }

    /// Get the element at `index`. Out of range and empty slots are `None`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.slots.get(index).and_then(|slot| slot.as_ref())
    }

    /// Get the element at `index` mutably.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.slots.get_mut(index).and_then(|slot| slot.as_mut())
    }

    /// Take the element out of its slot, leaving the slot empty.
    pub fn take(&mut self, index: usize) -> Option<T> {
        self.slots.get_mut(index).and_then(|slot| slot.take())
    }

    /// Remove the first element matching `pred`, shifting later slots left
    /// by one. Returns the removed element.
    pub fn remove_first<F>(&mut self, mut pred: F) -> Option<T>
    where
        F: FnMut(&T) -> bool,
    {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.as_ref().is_some_and(&mut pred))?;
        self.slots.remove(index)
    }

    /// Drop every slot. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.clear();
    }

    /// Number of slots, empty ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// All slots from first to last, empty ones included.
    pub fn slots(&self) -> &[Option<T>] {
        &self.slots
    }

    /// Iterate over `(index, element)` for occupied slots in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &T)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_ref().map(|e| (idx, e)))
    }

    /// Iterate mutably over `(index, element)` for occupied slots.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut T)> {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(idx, slot)| slot.as_mut().map(|e| (idx, e)))
    }
}

impl<T> Default for Slab<T> {
    fn default() -> Self {
        Self::new()
    }
}
