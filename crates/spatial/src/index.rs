use compute::{ChunkEntry, EMPTY_START};
use glam::Vec3;
use scene::GridParams;

/// Result of one rebuild: the sorted entries and their start-index table.
///
/// A chunk's primitives are the run of entries beginning at
/// `start_indices[key]` and continuing while the key matches.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SpatialIndex {
    entries: Vec<ChunkEntry>,
    start_indices: Vec<u32>,
    occupied: usize,
}

impl SpatialIndex {
    #[must_use]
    pub fn new(entries: Vec<ChunkEntry>, start_indices: Vec<u32>, occupied: usize) -> Self {
        Self {
            entries,
            start_indices,
            occupied,
        }
    }

    /// Sorted entries, padded to a power of two with sentinels.
    #[must_use]
    pub fn entries(&self) -> &[ChunkEntry] {
        &self.entries
    }

    #[must_use]
    pub fn start_indices(&self) -> &[u32] {
        &self.start_indices
    }

    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.occupied
    }

    #[must_use]
    pub fn padded_len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.occupied == 0
    }

    #[must_use]
    pub fn entries_in_chunk(&self, chunk_key: u32) -> &[ChunkEntry] {
        let Some(&start) = self.start_indices.get(chunk_key as usize) else {
            return &[];
        };
        if start == EMPTY_START {
            return &[];
        }
        let Some(tail) = self.entries.get(start as usize..) else {
            return &[];
        };
        let run = tail.iter().take_while(|e| e.chunk_key == chunk_key).count();
        &tail[..run]
    }

    /// Primitive references stored for the chunk containing `pos`.
    pub fn query_point<'a>(
        &'a self,
        grid: &GridParams,
        pos: Vec3,
    ) -> impl Iterator<Item = u32> + 'a {
        self.entries_in_chunk(grid.chunk_key(pos))
            .iter()
            .map(|entry| entry.primitive_index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SpatialIndex {
        SpatialIndex::new(
            vec![
                ChunkEntry::new(1, 4),
                ChunkEntry::new(1, 2),
                ChunkEntry::new(3, 0),
                ChunkEntry::SENTINEL,
            ],
            vec![EMPTY_START, 0, EMPTY_START, 2],
            3,
        )
    }

    #[test]
    fn chunk_runs_are_sliced_from_start() {
        let index = index();
        assert_eq!(index.entries_in_chunk(1).len(), 2);
        assert_eq!(index.entries_in_chunk(3), &[ChunkEntry::new(3, 0)]);
        assert!(index.entries_in_chunk(0).is_empty());
        assert!(index.entries_in_chunk(99).is_empty());
    }

    #[test]
    fn point_query_uses_grid_key() {
        let grid = GridParams::new(Vec3::ZERO, Vec3::new(2.0, 2.0, 1.0), 1.0, Vec3::ZERO, 1).unwrap();
        let index = index();
        let hits: Vec<u32> = index.query_point(&grid, Vec3::new(1.5, 0.5, 0.5)).collect();
        assert_eq!(hits, vec![4, 2]);
        assert_eq!(index.query_point(&grid, Vec3::new(0.5, 0.5, 0.5)).count(), 0);
    }
}
