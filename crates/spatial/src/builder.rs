use crate::error::IndexError;
use crate::index::SpatialIndex;
use crate::indexer::GridIndexer;
use crate::sorter::Sorter;
use crate::start_indices::StartIndexBuilder;
use compute::{ComputeBackend, EMPTY_START};
use scene::{next_pow2, GridParams, SceneModel};
use std::sync::Arc;
use tracing::{debug, warn};

/// Counters of one rebuild.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct RebuildStats {
    pub capacity: usize,
    pub occupied: usize,
    pub padded_len: usize,
    pub sort_passes: usize,
    pub dropped: u32,
}

/// Chains indexing, sorting and start-index construction.
pub struct IndexBuilder {
    indexer: GridIndexer,
    sorter: Sorter,
    start_indices: StartIndexBuilder,
}

impl IndexBuilder {
    #[must_use]
    pub fn new(backend: Arc<dyn ComputeBackend>) -> Self {
        Self {
            indexer: GridIndexer::new(backend.clone()),
            sorter: Sorter::new(backend.clone()),
            start_indices: StartIndexBuilder::new(backend),
        }
    }

    pub fn rebuild(
        &self,
        scene: &SceneModel,
        grid: &GridParams,
    ) -> Result<(SpatialIndex, RebuildStats), IndexError> {
        let indexed = self.indexer.index(scene, grid)?;
        let occupied = indexed.occupied();
        let mut stats = RebuildStats {
            capacity: indexed.capacity,
            occupied,
            dropped: indexed.dropped,
            ..RebuildStats::default()
        };
        if indexed.dropped > 0 {
            warn!(
                dropped = indexed.dropped,
                capacity = indexed.capacity,
                "Chunk entry buffer overflowed; entries truncated"
            );
        }

        if occupied == 0 {
            debug!("Empty scene; skipping sort and start-index passes");
            let table = vec![EMPTY_START; grid.num_chunks_all() as usize];
            return Ok((SpatialIndex::new(Vec::new(), table, 0), stats));
        }

        let padded_len = next_pow2(occupied);
        let (sorted, sort_passes) = self.sorter.sort(indexed.entries.prefix(padded_len))?;
        let table = self.start_indices.build(&sorted, grid.num_chunks_all())?;

        stats.padded_len = padded_len;
        stats.sort_passes = sort_passes;
        let index = SpatialIndex::new(sorted.read()?, table.read()?, occupied);
        Ok((index, stats))
    }
}
