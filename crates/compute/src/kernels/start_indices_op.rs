use crate::types::{ChunkEntry, StartIndexUniforms, EMPTY_START};
use crate::{BufferView, ComputeError};
use rayon::prelude::*;
use std::sync::atomic::{AtomicU32, Ordering};

/// Fills the start-index table with the empty marker.
pub fn handle_clear_start_indices(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.is_empty() {
        return Err(ComputeError::ShapeMismatch(
            "ClearStartIndices expects 1 buffer (start indices)",
        ));
    }
    let table_view = &binds[0];
    if table_view.element_size_in_bytes != std::mem::size_of::<u32>() {
        return Err(ComputeError::ShapeMismatch(
            "ClearStartIndices only supports u32 tables",
        ));
    }

    let mut table = vec![0u32; table_view.len()];
    table.par_iter_mut().for_each(|slot| *slot = EMPTY_START);
    Ok(vec![bytemuck::cast_slice(&table).to_vec()])
}

/// Records, for every chunk key, the first sorted position holding it.
///
/// Only positions where the key changes write; sentinel keys and keys
/// outside the table write nothing. The entries must already be sorted.
pub fn handle_build_start_indices(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 3 {
        return Err(ComputeError::ShapeMismatch(
            "BuildStartIndices expects 3 buffers (entries, start indices, params)",
        ));
    }
    let entries: Vec<ChunkEntry> = binds[0].read()?;
    let table: Vec<u32> = binds[1].read()?;
    let params: StartIndexUniforms = binds[2].read_uniform()?;

    if params.num_chunks_all as usize != table.len() {
        return Err(ComputeError::ShapeMismatch(
            "BuildStartIndices table length does not match the chunk count",
        ));
    }
    if params.entry_count as usize > entries.len() {
        return Err(ComputeError::ShapeMismatch(
            "BuildStartIndices entry count exceeds the bound buffer",
        ));
    }

    let table: Vec<AtomicU32> = table.into_iter().map(AtomicU32::new).collect();
    let entries = &entries[..params.entry_count as usize];

    entries.par_iter().enumerate().for_each(|(i, entry)| {
        let key = entry.chunk_key;
        if key >= params.num_chunks_all {
            return;
        }
        if i == 0 || entries[i - 1].chunk_key != key {
            table[key as usize].store(i as u32, Ordering::Relaxed);
        }
    });

    let table: Vec<u32> = table.into_iter().map(AtomicU32::into_inner).collect();
    Ok(vec![bytemuck::cast_slice(&table).to_vec()])
}
