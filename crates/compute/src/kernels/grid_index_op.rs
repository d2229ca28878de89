use crate::layout::{
    COUNTER_DROPPED, COUNTER_LEN, COUNTER_RESERVED, GRID_COUNTERS, GRID_ENTRIES, GRID_PRIMITIVES,
    GRID_UNIFORMS,
};
use crate::types::{ChunkEntry, GridUniforms, ObjectData, SphereData};
use crate::{AppendBuffer, BufferView, ComputeError};
use rayon::prelude::*;

/// Emits one entry per chunk overlapped by each sphere.
pub fn handle_grid_index_spheres(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 4 {
        return Err(ComputeError::ShapeMismatch(
            "GridIndexSpheres expects 4 buffers (spheres, entries, counters, grid)",
        ));
    }
    let spheres: Vec<SphereData> = binds[GRID_PRIMITIVES as usize].read()?;
    let bounds = spheres
        .iter()
        .map(|sphere| (sphere.pos, sphere.radius))
        .collect::<Vec<_>>();
    index_bounding_spheres(&bounds, binds)
}

/// Emits one entry per chunk overlapped by the enclosing sphere of each
/// rigid object.
pub fn handle_grid_index_objects(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 4 {
        return Err(ComputeError::ShapeMismatch(
            "GridIndexObjects expects 4 buffers (objects, entries, counters, grid)",
        ));
    }
    let objects: Vec<ObjectData> = binds[GRID_PRIMITIVES as usize].read()?;
    let bounds = objects
        .iter()
        .map(|object| (object.pos, object.contained_radius))
        .collect::<Vec<_>>();
    index_bounding_spheres(&bounds, binds)
}

fn index_bounding_spheres(
    bounds: &[([f32; 3], f32)],
    binds: &[BufferView],
) -> Result<Vec<Vec<u8>>, ComputeError> {
    let entries: Vec<ChunkEntry> = binds[GRID_ENTRIES as usize].read()?;
    let counters: Vec<u32> = binds[GRID_COUNTERS as usize].read()?;
    if counters.len() != COUNTER_LEN {
        return Err(ComputeError::ShapeMismatch(
            "Grid indexing counter buffer must hold [reserved, dropped]",
        ));
    }
    let grid: GridUniforms = binds[GRID_UNIFORMS as usize].read_uniform()?;
    if grid.cell_size.is_nan() || grid.cell_size <= 0.0 {
        return Err(ComputeError::ShapeMismatch("Grid cell size must be positive"));
    }

    let buffer = AppendBuffer::resume(entries, counters[COUNTER_RESERVED], counters[COUNTER_DROPPED]);

    bounds.par_iter().enumerate().for_each(|(i, &(center, radius))| {
        let primitive_index = grid.primitive_offset + i as u32;
        let (lo, hi) = grid.overlap_range(center, radius);
        for z in lo[2]..=hi[2] {
            for y in lo[1]..=hi[1] {
                for x in lo[0]..=hi[0] {
                    let chunk_key = grid.linear_index([x, y, z]);
                    buffer.append(ChunkEntry::new(chunk_key, primitive_index));
                }
            }
        }
    });

    let (slots, reserved, dropped) = buffer.into_parts();
    let mut counters = [0u32; COUNTER_LEN];
    counters[COUNTER_RESERVED] = reserved;
    counters[COUNTER_DROPPED] = dropped;

    Ok(vec![
        bytemuck::cast_slice(&slots).to_vec(),
        bytemuck::cast_slice(&counters).to_vec(),
    ])
}

#[cfg(test)]
mod tests {
    use crate::types::{ChunkEntry, GridUniforms, SphereData};
    use crate::{BufferView, ComputeBackend, CpuBackend, Kernel};

    fn grid(num_chunks: [u32; 3]) -> GridUniforms {
        GridUniforms {
            min_world_bounds: [0.0; 3],
            cell_size: 1.0,
            chunk_grid_offset: [0.0; 3],
            primitive_offset: 0,
            num_chunks,
            num_chunks_all: num_chunks.iter().product(),
        }
    }

    fn run(spheres: &[SphereData], capacity: usize, grid: &GridUniforms) -> (Vec<ChunkEntry>, [u32; 2]) {
        let cpu = CpuBackend::new();
        let binds = [
            BufferView::from_slice(spheres),
            BufferView::from_slice(&vec![ChunkEntry::SENTINEL; capacity]),
            BufferView::from_slice(&[0u32, 0]),
            BufferView::uniform(grid),
        ];
        let out = cpu
            .dispatch(&Kernel::GridIndexSpheres, &binds, [1, 1, 1])
            .expect("GridIndexSpheres dispatch failed");
        assert_eq!(out.len(), 2);
        let entries = bytemuck::pod_collect_to_vec(&out[0]);
        let counters: Vec<u32> = bytemuck::pod_collect_to_vec(&out[1]);
        (entries, [counters[0], counters[1]])
    }

    #[test]
    fn sphere_inside_one_chunk_emits_one_entry() {
        let sphere = SphereData { pos: [0.5, 0.5, 0.5], radius: 0.1, material_key: 0 };
        let (entries, counters) = run(&[sphere], 4, &grid([2, 2, 1]));
        assert_eq!(counters, [1, 0]);
        assert_eq!(entries[0], ChunkEntry::new(0, 0));
        assert!(entries[1..].iter().all(ChunkEntry::is_sentinel));
    }

    #[test]
    fn sphere_spanning_k_chunks_emits_k_entries() {
        // Box spans x in [0.4, 3.6] -> chunks 0..=3, y and z stay in one chunk
        let sphere = SphereData { pos: [2.0, 0.5, 0.5], radius: 1.6, material_key: 0 };
        let (entries, counters) = run(&[sphere], 8, &grid([8, 1, 1]));
        assert_eq!(counters[0], 4);
        let mut keys: Vec<u32> = entries[..4].iter().map(|e| e.chunk_key).collect();
        keys.sort_unstable();
        assert_eq!(keys, vec![0, 1, 2, 3]);
    }

    #[test]
    fn overflow_truncates_and_counts() {
        let sphere = SphereData { pos: [2.0, 0.5, 0.5], radius: 1.6, material_key: 0 };
        let (entries, counters) = run(&[sphere], 2, &grid([8, 1, 1]));
        assert_eq!(entries.len(), 2);
        assert!(entries.iter().all(|e| !e.is_sentinel()));
        assert_eq!(counters, [4, 2]);
    }

    #[test]
    fn object_pass_continues_after_sphere_pass() {
        let cpu = CpuBackend::new();
        let mut grid = grid([2, 2, 1]);
        let sphere = SphereData { pos: [0.5, 0.5, 0.5], radius: 0.1, material_key: 0 };
        let first = cpu
            .dispatch(
                &Kernel::GridIndexSpheres,
                &[
                    BufferView::from_slice(&[sphere]),
                    BufferView::from_slice(&[ChunkEntry::SENTINEL; 4]),
                    BufferView::from_slice(&[0u32, 0]),
                    BufferView::uniform(&grid),
                ],
                [1, 1, 1],
            )
            .unwrap();

        grid.primitive_offset = 1;
        let object = crate::types::ObjectData {
            pos: [1.5, 1.5, 0.5],
            contained_radius: 0.2,
            ..Default::default()
        };
        let mut first = first.into_iter();
        let entries = first.next().unwrap();
        let counters = first.next().unwrap();
        let second = cpu
            .dispatch(
                &Kernel::GridIndexObjects,
                &[
                    BufferView::from_slice(&[object]),
                    BufferView::from_bytes::<ChunkEntry>(entries),
                    BufferView::from_bytes::<u32>(counters),
                    BufferView::uniform(&grid),
                ],
                [1, 1, 1],
            )
            .unwrap();
        let entries: Vec<ChunkEntry> = bytemuck::pod_collect_to_vec(&second[0]);
        assert_eq!(entries[0], ChunkEntry::new(0, 0));
        assert_eq!(entries[1], ChunkEntry::new(3, 1));
        let counters: Vec<u32> = bytemuck::pod_collect_to_vec(&second[1]);
        assert_eq!(counters, vec![2, 0]);
    }
}
