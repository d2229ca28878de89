//! Buffer record layouts as seen by the kernels.
//!
//! Every record is `#[repr(C)]`, tightly packed on 4-byte boundaries, so a
//! slice of host records can be uploaded with `bytemuck::cast_slice`.

use bytemuck::{Pod, Zeroable};

/// Chunk key carried by padding entries. Sorts after every real key.
pub const SENTINEL_KEY: u32 = u32::MAX;

/// Start-index value of a chunk no entry maps to.
pub const EMPTY_START: u32 = u32::MAX;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct SphereData {
    pub pos: [f32; 3],
    pub radius: f32,
    pub material_key: i32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct TriangleData {
    pub v_a: [f32; 3],
    pub v_b: [f32; 3],
    pub v_c: [f32; 3],
    pub normal: [f32; 3],
    pub material_key: i32,
    pub parent_key: i32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ObjectData {
    pub pos: [f32; 3],
    pub rot: [f32; 3],
    pub last_rot: [f32; 3],
    pub contained_radius: f32,
    pub tri_start: i32,
    pub tri_end: i32,
}

/// One `(chunk, primitive)` pair of the spatial lookup.
///
/// Field order makes the derived `Ord` compare by chunk key first.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Pod, Zeroable)]
pub struct ChunkEntry {
    pub chunk_key: u32,
    pub primitive_index: u32,
}

impl ChunkEntry {
    pub const SENTINEL: Self = Self {
        chunk_key: SENTINEL_KEY,
        primitive_index: u32::MAX,
    };

    #[must_use]
    pub const fn new(chunk_key: u32, primitive_index: u32) -> Self {
        Self { chunk_key, primitive_index }
    }

    #[must_use]
    pub const fn is_sentinel(&self) -> bool {
        self.chunk_key == SENTINEL_KEY
    }

    /// Packs the entry into one word so it can live in an atomic slot.
    #[must_use]
    pub const fn to_bits(self) -> u64 {
        ((self.chunk_key as u64) << 32) | self.primitive_index as u64
    }

    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            chunk_key: (bits >> 32) as u32,
            primitive_index: bits as u32,
        }
    }
}

impl Default for ChunkEntry {
    fn default() -> Self {
        Self::SENTINEL
    }
}

/// Grid constants bound to both indexing passes.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct GridUniforms {
    pub min_world_bounds: [f32; 3],
    pub cell_size: f32,
    pub chunk_grid_offset: [f32; 3],
    /// Added to the primitive's position in its own buffer to form the
    /// primitive reference stored in the entry.
    pub primitive_offset: u32,
    pub num_chunks: [u32; 3],
    pub num_chunks_all: u32,
}

impl GridUniforms {
    /// Chunk coordinate of a world position, clamped to the grid.
    #[must_use]
    pub fn chunk_coord(&self, pos: [f32; 3]) -> [u32; 3] {
        let mut coord = [0u32; 3];
        for axis in 0..3 {
            let cell = ((pos[axis] - self.min_world_bounds[axis] + self.chunk_grid_offset[axis])
                / self.cell_size)
                .floor();
            let max = self.num_chunks[axis].saturating_sub(1) as f32;
            // NaN clamps to 0
            coord[axis] = cell.clamp(0.0, max) as u32;
        }
        coord
    }

    #[must_use]
    pub fn linear_index(&self, coord: [u32; 3]) -> u32 {
        coord[0] + coord[1] * self.num_chunks[0] + coord[2] * self.num_chunks[0] * self.num_chunks[1]
    }

    /// Inclusive chunk range overlapped by the box around a bounding sphere.
    #[must_use]
    pub fn overlap_range(&self, center: [f32; 3], radius: f32) -> ([u32; 3], [u32; 3]) {
        let r = radius.abs();
        let lo = self.chunk_coord([center[0] - r, center[1] - r, center[2] - r]);
        let hi = self.chunk_coord([center[0] + r, center[1] + r, center[2] + r]);
        (lo, hi)
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct SortStepUniforms {
    pub sequence_length: u32,
    pub compare_distance: u32,
    /// Nonzero on the first pass of each outer step.
    pub direction_flag: u32,
    pub entry_count: u32,
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Pod, Zeroable)]
pub struct StartIndexUniforms {
    pub num_chunks_all: u32,
    pub entry_count: u32,
}
