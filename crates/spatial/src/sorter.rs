use crate::error::SortError;
use crate::plan::SortPlan;
use compute::{workgroups_for, BufferView, ChunkEntry, ComputeBackend, ComputeError, Kernel};
use std::sync::Arc;
use tracing::debug;

/// Sorts a power-of-two entry buffer by chunk key, one dispatch per network pass.
pub struct Sorter {
    backend: Arc<dyn ComputeBackend>,
}

impl Sorter {
    #[must_use]
    pub fn new(backend: Arc<dyn ComputeBackend>) -> Self {
        Self { backend }
    }

    /// Returns the sorted buffer and the number of passes dispatched.
    pub fn sort(&self, entries: BufferView) -> Result<(BufferView, usize), SortError> {
        if entries.element_size_in_bytes != std::mem::size_of::<ChunkEntry>() {
            return Err(ComputeError::ShapeMismatch("sorter expects chunk entries").into());
        }
        let plan = SortPlan::for_len(entries.len())?;
        let entry_count = plan.len();
        let workgroups = [workgroups_for(entries.len() / 2), 1, 1];

        let mut entries = entries;
        for step in plan.iter() {
            let uniforms = BufferView::uniform(&step.uniforms(entry_count));
            let results = self
                .backend
                .dispatch(&Kernel::BitonicSortStep, &[entries, uniforms], workgroups)?;
            entries = BufferView::from_bytes::<ChunkEntry>(
                results
                    .into_iter()
                    .next()
                    .ok_or(ComputeError::ShapeMismatch("sort pass returned no entries"))?,
            );
        }

        debug!(len = entry_count, passes = plan.steps().len(), "Sorted entries");
        Ok((entries, plan.steps().len()))
    }

    /// Sorts host entries in place.
    pub fn sort_slice(&self, entries: &mut [ChunkEntry]) -> Result<usize, SortError> {
        let (sorted, passes) = self.sort(BufferView::from_slice(entries))?;
        entries.copy_from_slice(&sorted.read::<ChunkEntry>()?);
        Ok(passes)
    }
}
