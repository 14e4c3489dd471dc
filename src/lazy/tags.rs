//! Pending-tag ledger
//!
//! One tag slot per arena node plus one dirty bit per slot.
//! Clean (bit unset): children are consistent with the node.
//! Dirty (bit set): node aggregate is current, children are stale.

use bitvec::prelude::*;

/// Parallel arena of pending tags with a dirty mask
#[derive(Debug, Clone)]
pub struct TagLedger<T> {
    /// Pending tags, meaningful only where `dirty` is set
    tags: Vec<T>,

    /// Dirty bit per slot
    dirty: BitVec,
}

impl<T: Clone + Default> TagLedger<T> {
    /// Create ledger with `slots` clean slots
    pub fn new(slots: usize) -> Self {
        Self {
            tags: vec![T::default(); slots],
            dirty: bitvec![0; slots],
        }
    }

    /// Number of slots
    pub fn slots(&self) -> usize {
        self.tags.len()
    }

    /// Check if slot carries a pending tag
    #[inline]
    pub fn is_dirty(&self, index: usize) -> bool {
        self.dirty[index]
    }

    /// Pending tag at `index`, if any
    pub fn pending(&self, index: usize) -> Option<&T> {
        if self.dirty[index] {
            Some(&self.tags[index])
        } else {
            None
        }
    }

    /// Attach `tag` to slot `index`, composing with any tag already pending
    pub fn attach(&mut self, index: usize, tag: &T, compose: impl FnOnce(&T, &T) -> T) {
        if self.dirty[index] {
            self.tags[index] = compose(&self.tags[index], tag);
        } else {
            self.tags[index] = tag.clone();
            self.dirty.set(index, true);
        }
    }

    /// Remove and return the pending tag at `index` (Dirty → Clean)
    pub fn take(&mut self, index: usize) -> Option<T> {
        if !self.dirty[index] {
            return None;
        }
        self.dirty.set(index, false);
        Some(std::mem::take(&mut self.tags[index]))
    }

    /// Number of Dirty slots
    pub fn dirty_count(&self) -> usize {
        self.dirty.count_ones()
    }
}
