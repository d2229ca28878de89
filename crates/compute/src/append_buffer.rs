//! Bounded append collection shared by the workers of a pass.
//!
//! Workers call [`AppendBuffer::append`], which reserves the next slot with a
//! single atomic increment and writes into it. Reservations past the end of
//! the buffer are counted as dropped instead of written.

use crate::types::ChunkEntry;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

pub struct AppendBuffer {
    slots: Box<[AtomicU64]>,
    reserved: AtomicU32,
    dropped: AtomicU32,
}

impl AppendBuffer {
    /// Empty buffer of `capacity` sentinel slots with the counter at zero.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::resume(vec![ChunkEntry::SENTINEL; capacity], 0, 0)
    }

    /// Continues appending into slots written by an earlier pass.
    #[must_use]
    pub fn resume(slots: Vec<ChunkEntry>, reserved: u32, dropped: u32) -> Self {
        Self {
            slots: slots
                .into_iter()
                .map(|entry| AtomicU64::new(entry.to_bits()))
                .collect(),
            reserved: AtomicU32::new(reserved),
            dropped: AtomicU32::new(dropped),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Appends one entry. Returns `false` when the buffer is full.
    pub fn append(&self, entry: ChunkEntry) -> bool {
        let slot = self.reserved.fetch_add(1, Ordering::Relaxed) as usize;
        match self.slots.get(slot) {
            Some(cell) => {
                cell.store(entry.to_bits(), Ordering::Relaxed);
                true
            }
            None => {
                self.dropped.fetch_add(1, Ordering::Relaxed);
                false
            }
        }
    }

    /// Number of entries actually stored.
    #[must_use]
    pub fn len(&self) -> usize {
        (self.reserved.load(Ordering::Relaxed) as usize).min(self.capacity())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn dropped(&self) -> u32 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Consumes the buffer, returning the slots and the raw counter values.
    #[must_use]
    pub fn into_parts(self) -> (Vec<ChunkEntry>, u32, u32) {
        let slots = self
            .slots
            .into_vec()
            .into_iter()
            .map(|cell| ChunkEntry::from_bits(cell.into_inner()))
            .collect();
        (slots, self.reserved.into_inner(), self.dropped.into_inner())
    }
}

#[cfg(all(test, feature = "cpu"))]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn appends_in_reservation_order() {
        let buffer = AppendBuffer::with_capacity(4);
        assert!(buffer.append(ChunkEntry::new(3, 0)));
        assert!(buffer.append(ChunkEntry::new(1, 1)));
        assert_eq!(buffer.len(), 2);

        let (slots, reserved, dropped) = buffer.into_parts();
        assert_eq!(reserved, 2);
        assert_eq!(dropped, 0);
        assert_eq!(slots[0], ChunkEntry::new(3, 0));
        assert_eq!(slots[1], ChunkEntry::new(1, 1));
        assert!(slots[2].is_sentinel() && slots[3].is_sentinel());
    }

    #[test]
    fn overflow_is_counted_not_written() {
        let buffer = AppendBuffer::with_capacity(2);
        let stored = (0..5).filter(|&i| buffer.append(ChunkEntry::new(i, i))).count();
        assert_eq!(stored, 2);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.dropped(), 3);
    }

    #[test]
    fn concurrent_appends_fill_every_slot_once() {
        let buffer = AppendBuffer::with_capacity(1024);
        (0..1024u32).into_par_iter().for_each(|i| {
            buffer.append(ChunkEntry::new(i % 17, i));
        });
        let (slots, reserved, dropped) = buffer.into_parts();
        assert_eq!(reserved, 1024);
        assert_eq!(dropped, 0);

        let mut seen: Vec<u32> = slots.iter().map(|e| e.primitive_index).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..1024).collect::<Vec<_>>());
    }

    #[test]
    fn resume_keeps_previous_entries() {
        let buffer = AppendBuffer::with_capacity(3);
        buffer.append(ChunkEntry::new(5, 0));
        let (slots, reserved, dropped) = buffer.into_parts();

        let resumed = AppendBuffer::resume(slots, reserved, dropped);
        resumed.append(ChunkEntry::new(6, 1));
        let (slots, reserved, _) = resumed.into_parts();
        assert_eq!(reserved, 2);
        assert_eq!(&slots[..2], &[ChunkEntry::new(5, 0), ChunkEntry::new(6, 1)]);
    }
}
