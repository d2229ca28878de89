use crate::error::IndexError;
use compute::layout::{COUNTER_DROPPED, COUNTER_LEN, COUNTER_RESERVED};
use compute::{workgroups_for, BufferView, ChunkEntry, ComputeBackend, ComputeError, Kernel};
use scene::{GridParams, SceneModel};
use std::sync::Arc;
use tracing::debug;

/// Unsorted entries produced by one indexing run.
#[derive(Clone, Debug)]
pub struct IndexedEntries {
    /// `capacity` slots; slots past the occupied count hold the sentinel.
    pub entries: BufferView,
    pub capacity: usize,
    /// Raw reservation counter, which can exceed `capacity`.
    pub reserved: u32,
    pub dropped: u32,
}

impl IndexedEntries {
    #[must_use]
    pub fn empty() -> Self {
        Self {
            entries: BufferView::from_slice::<ChunkEntry>(&[]),
            capacity: 0,
            reserved: 0,
            dropped: 0,
        }
    }

    /// Entries actually stored: the reservation counter clamped to capacity.
    #[must_use]
    pub fn occupied(&self) -> usize {
        (self.reserved as usize).min(self.capacity)
    }
}

/// Runs the sphere and rigid object indexing passes into one append buffer.
pub struct GridIndexer {
    backend: Arc<dyn ComputeBackend>,
}

impl GridIndexer {
    #[must_use]
    pub fn new(backend: Arc<dyn ComputeBackend>) -> Self {
        Self { backend }
    }

    pub fn index(&self, scene: &SceneModel, grid: &GridParams) -> Result<IndexedEntries, IndexError> {
        let capacity = grid.entry_capacity(scene.num_objects());
        if capacity == 0 {
            return Ok(IndexedEntries::empty());
        }
        if u32::try_from(capacity).is_err() {
            return Err(IndexError::CapacityTooLarge(capacity));
        }

        // Counters start at zero on every rebuild.
        let mut entries = BufferView::from_slice(&vec![ChunkEntry::SENTINEL; capacity]);
        let mut counters = BufferView::from_slice(&[0u32; COUNTER_LEN]);

        let passes = [
            (
                Kernel::GridIndexSpheres,
                BufferView::from_slice(&scene.sphere_buffer()),
                0,
            ),
            (
                Kernel::GridIndexObjects,
                BufferView::from_slice(&scene.object_buffer()),
                scene.num_spheres() as u32,
            ),
        ];

        for (kernel, primitives, primitive_offset) in passes {
            if primitives.is_empty() {
                continue;
            }
            let count = primitives.len();
            let uniforms = BufferView::uniform(&grid.uniforms(primitive_offset));
            let results = self.backend.dispatch(
                &kernel,
                &[primitives, entries, counters, uniforms],
                [workgroups_for(count), 1, 1],
            )?;
            let mut results = results.into_iter();
            entries = BufferView::from_bytes::<ChunkEntry>(
                results
                    .next()
                    .ok_or(ComputeError::ShapeMismatch("grid indexing returned no entries"))?,
            );
            counters = BufferView::from_bytes::<u32>(
                results
                    .next()
                    .ok_or(ComputeError::ShapeMismatch("grid indexing returned no counters"))?,
            );
            debug!(kernel = kernel.name(), primitives = count, "Grid indexing pass");
        }

        // The one blocking readback of a rebuild.
        let counters: Vec<u32> = counters.read()?;
        Ok(IndexedEntries {
            entries,
            capacity,
            reserved: counters[COUNTER_RESERVED],
            dropped: counters[COUNTER_DROPPED],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compute::CpuBackend;
    use glam::Vec3;

    fn indexer() -> GridIndexer {
        GridIndexer::new(Arc::new(CpuBackend::new()))
    }

    fn grid(max: Vec3, chunks_per_object: u32) -> GridParams {
        GridParams::new(Vec3::ZERO, max, 1.0, Vec3::ZERO, chunks_per_object).unwrap()
    }

    #[test]
    fn empty_scene_dispatches_nothing() {
        let out = indexer()
            .index(&SceneModel::new(), &grid(Vec3::ONE, 4))
            .unwrap();
        assert_eq!(out.capacity, 0);
        assert_eq!(out.occupied(), 0);
    }

    #[test]
    fn objects_are_numbered_after_spheres() {
        let mut scene = SceneModel::new();
        scene.add_sphere(Vec3::new(0.5, 0.5, 0.5), 0.1, 0);
        scene.add_object(Vec3::new(2.5, 0.5, 0.5), Vec3::ZERO, []);
        scene.objects[0].contained_radius = 0.1;

        let out = indexer()
            .index(&scene, &grid(Vec3::new(4.0, 1.0, 1.0), 2))
            .unwrap();
        assert_eq!(out.capacity, 4);
        assert_eq!(out.occupied(), 2);
        let mut entries: Vec<ChunkEntry> = out.entries.read().unwrap();
        entries.truncate(out.occupied());
        entries.sort();
        assert_eq!(entries, vec![ChunkEntry::new(0, 0), ChunkEntry::new(2, 1)]);
    }

    #[test]
    fn overflow_is_counted_not_fatal() {
        let mut scene = SceneModel::new();
        // spans 4 chunks along x with room for 1
        scene.add_sphere(Vec3::new(2.0, 0.5, 0.5), 1.5, 0);
        let out = indexer()
            .index(&scene, &grid(Vec3::new(4.0, 1.0, 1.0), 1))
            .unwrap();
        assert_eq!(out.capacity, 1);
        assert_eq!(out.reserved, 4);
        assert_eq!(out.dropped, 3);
        assert_eq!(out.occupied(), 1);
    }
}
