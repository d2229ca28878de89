use crate::types::{ChunkEntry, SortStepUniforms};
use crate::{BufferView, ComputeError};
use rayon::prelude::*;

/// One compare-exchange pass of the bitonic network over the entry buffer.
///
/// With the direction flag set the pass pairs positions mirrored across each
/// `sequence_length` block, which orders the upper half in the reverse
/// direction of the lower half and turns two sorted runs into one bitonic
/// sequence. Otherwise it pairs `(i, i + compare_distance)` inside blocks of
/// `2 * compare_distance`. Either way the lower index ends up with the
/// smaller key.
pub fn handle_bitonic_sort_step(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 2 {
        return Err(ComputeError::ShapeMismatch(
            "BitonicSortStep expects 2 buffers (entries, step)",
        ));
    }
    let mut entries: Vec<ChunkEntry> = binds[0].read()?;
    let step: SortStepUniforms = binds[1].read_uniform()?;

    if step.entry_count as usize != entries.len() {
        return Err(ComputeError::ShapeMismatch(
            "BitonicSortStep entry count does not match the bound buffer",
        ));
    }
    if !entries.len().is_power_of_two() {
        return Err(ComputeError::ShapeMismatch(
            "BitonicSortStep requires a power-of-two entry buffer",
        ));
    }
    if !step.sequence_length.is_power_of_two()
        || step.sequence_length < 2
        || step.sequence_length as usize > entries.len()
        || step.compare_distance == 0
        || step.compare_distance > step.sequence_length / 2
    {
        return Err(ComputeError::ShapeMismatch(
            "BitonicSortStep received an invalid network step",
        ));
    }

    apply_step(&mut entries, &step);
    Ok(vec![bytemuck::cast_slice(&entries).to_vec()])
}

fn apply_step(entries: &mut [ChunkEntry], step: &SortStepUniforms) {
    if step.direction_flag != 0 {
        let block = step.sequence_length as usize;
        entries.par_chunks_mut(block).for_each(|block| {
            let (lower, upper) = block.split_at_mut(block.len() / 2);
            for (a, b) in lower.iter_mut().zip(upper.iter_mut().rev()) {
                compare_exchange(a, b);
            }
        });
    } else {
        let distance = step.compare_distance as usize;
        entries.par_chunks_mut(distance * 2).for_each(|block| {
            let (lower, upper) = block.split_at_mut(distance);
            for (a, b) in lower.iter_mut().zip(upper.iter_mut()) {
                compare_exchange(a, b);
            }
        });
    }
}

#[inline]
fn compare_exchange(low: &mut ChunkEntry, high: &mut ChunkEntry) {
    if low.chunk_key > high.chunk_key {
        std::mem::swap(low, high);
    }
}
