//! Fixed-capacity FIFO cache of resolved row offsets.
//!
//! Slots are recycled strictly in insertion order: a hit does not refresh an
//! entry's age. Lookups compare the exact row index, so a hit always returns
//! the offsets that were stored for that row.

use std::collections::VecDeque;

/// Default number of rows kept.
pub const ROW_CACHE_CAPACITY: usize = 8;

/// Byte offsets of the lines making up one logical row, one per tile column.
///
/// `None` marks a line that could not be located (truncated stream).
pub type RowOffsets = Vec<Option<usize>>;

/// FIFO map from logical row index to [`RowOffsets`].
#[derive(Debug, Clone)]
pub struct RowCache {
    capacity: usize,
    /// Oldest entry at the front.
    slots: VecDeque<(usize, RowOffsets)>,
}

impl RowCache {
    /// Create a cache holding at most `capacity` rows.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            slots: VecDeque::with_capacity(capacity),
        }
    }

    /// Maximum number of rows held.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of rows currently held.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no row is cached.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Look up the offsets stored for `row`.
    pub fn get(&self, row: usize) -> Option<&RowOffsets> {
        self.slots
            .iter()
            .find(|(cached, _)| *cached == row)
            .map(|(_, offsets)| offsets)
    }

    /// Store `offsets` for `row`, returning the row evicted to make room.
    pub fn insert(&mut self, row: usize, offsets: RowOffsets) -> Option<usize> {
        if self.capacity == 0 {
            return None;
        }
        if let Some(slot) = self.slots.iter_mut().find(|(cached, _)| *cached == row) {
            slot.1 = offsets;
            return None;
        }
        let evicted = if self.slots.len() == self.capacity {
            self.slots.pop_front().map(|(evicted, _)| evicted)
        } else {
            None
        };
        self.slots.push_back((row, offsets));
        evicted
    }

    /// Drop every cached row.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

impl Default for RowCache {
    fn default() -> Self {
        Self::new(ROW_CACHE_CAPACITY)
    }
}
