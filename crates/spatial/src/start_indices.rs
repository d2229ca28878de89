use crate::error::IndexError;
use compute::{
    workgroups_for, BufferView, ChunkEntry, ComputeBackend, ComputeError, Kernel,
    StartIndexUniforms,
};
use std::sync::Arc;
use tracing::debug;

/// Builds the chunk-key to first-sorted-position table.
pub struct StartIndexBuilder {
    backend: Arc<dyn ComputeBackend>,
}

impl StartIndexBuilder {
    #[must_use]
    pub fn new(backend: Arc<dyn ComputeBackend>) -> Self {
        Self { backend }
    }

    /// A table of `num_chunks_all` empty slots.
    pub fn clear(&self, num_chunks_all: u32) -> Result<BufferView, IndexError> {
        let table = BufferView::from_slice(&vec![0u32; num_chunks_all as usize]);
        let results = self.backend.dispatch(
            &Kernel::ClearStartIndices,
            &[table],
            [workgroups_for(num_chunks_all as usize), 1, 1],
        )?;
        let table = results
            .into_iter()
            .next()
            .ok_or(ComputeError::ShapeMismatch("clear pass returned no table"))?;
        Ok(BufferView::from_bytes::<u32>(table))
    }

    /// Clears the table and records the start of every run in `sorted`.
    ///
    /// `sorted` must be ordered by chunk key.
    pub fn build(&self, sorted: &BufferView, num_chunks_all: u32) -> Result<BufferView, IndexError> {
        #[cfg(debug_assertions)]
        {
            let entries: Vec<ChunkEntry> = sorted.read()?;
            debug_assert!(
                entries.windows(2).all(|w| w[0].chunk_key <= w[1].chunk_key),
                "start indices built from unsorted entries"
            );
        }

        let table = self.clear(num_chunks_all)?;
        if sorted.is_empty() {
            return Ok(table);
        }

        let params = StartIndexUniforms {
            num_chunks_all,
            entry_count: sorted.len() as u32,
        };
        let results = self.backend.dispatch(
            &Kernel::BuildStartIndices,
            &[sorted.clone(), table, BufferView::uniform(&params)],
            [workgroups_for(sorted.len()), 1, 1],
        )?;
        let table = results
            .into_iter()
            .next()
            .ok_or(ComputeError::ShapeMismatch("build pass returned no table"))?;

        debug!(entries = sorted.len(), chunks = num_chunks_all, "Built start indices");
        Ok(BufferView::from_bytes::<u32>(table))
    }
}
