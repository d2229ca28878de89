//! Uniform chunk grid over the world bounds.
//!
//! The key formula here is the one the renderer evaluates when it looks a
//! position up in the start-index table:
//!
//! ```text
//! coord = clamp(floor((pos - min_world_bounds + chunk_grid_offset) / cell_size), 0, num_chunks - 1)
//! key   = coord.x + coord.y * num_chunks.x + coord.z * num_chunks.x * num_chunks.y
//! ```

use crate::error::ConfigError;
use compute::{GridUniforms, SENTINEL_KEY};
use glam::{UVec3, Vec3};

/// Validated grid parameters. Construct with [`GridParams::new`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GridParams {
    min_world_bounds: Vec3,
    max_world_bounds: Vec3,
    cell_size: f32,
    chunk_grid_offset: Vec3,
    chunks_per_object: u32,
    num_chunks: UVec3,
}

impl GridParams {
    pub fn new(
        min_world_bounds: Vec3,
        max_world_bounds: Vec3,
        cell_size: f32,
        chunk_grid_offset: Vec3,
        chunks_per_object: u32,
    ) -> Result<Self, ConfigError> {
        if !cell_size.is_finite() || cell_size <= 0.0 {
            return Err(ConfigError::InvalidCellSize(cell_size));
        }
        if chunks_per_object == 0 {
            return Err(ConfigError::ZeroChunksPerObject);
        }
        if u32::try_from(next_pow2(chunks_per_object as usize)).is_err() {
            return Err(ConfigError::CapacityTooLarge {
                primitives: 1,
                chunks_per_object,
            });
        }

        let mut num_chunks = [0u32; 3];
        for (axis, name) in ['x', 'y', 'z'].into_iter().enumerate() {
            let (min, max) = (min_world_bounds[axis], max_world_bounds[axis]);
            let extent = max - min;
            if !extent.is_finite() || extent <= 0.0 {
                return Err(ConfigError::DegenerateBounds { axis: name, min, max });
            }
            let count = (extent / cell_size).ceil();
            if count >= SENTINEL_KEY as f32 {
                return Err(ConfigError::GridTooLarge(u64::MAX));
            }
            #[allow(clippy::cast_sign_loss)]
            {
                num_chunks[axis] = (count as u32).max(1);
            }
        }

        let total = num_chunks.iter().map(|&n| u64::from(n)).product::<u64>();
        if total >= u64::from(SENTINEL_KEY) {
            return Err(ConfigError::GridTooLarge(total));
        }

        Ok(Self {
            min_world_bounds,
            max_world_bounds,
            cell_size,
            chunk_grid_offset,
            chunks_per_object,
            num_chunks: UVec3::from_array(num_chunks),
        })
    }

    #[must_use]
    pub fn min_world_bounds(&self) -> Vec3 {
        self.min_world_bounds
    }

    #[must_use]
    pub fn max_world_bounds(&self) -> Vec3 {
        self.max_world_bounds
    }

    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    #[must_use]
    pub fn chunk_grid_offset(&self) -> Vec3 {
        self.chunk_grid_offset
    }

    #[must_use]
    pub fn chunks_per_object(&self) -> u32 {
        self.chunks_per_object
    }

    /// Chunk count along each axis.
    #[must_use]
    pub fn num_chunks(&self) -> UVec3 {
        self.num_chunks
    }

    /// Total chunk count, which is also the start-index table length.
    #[must_use]
    pub fn num_chunks_all(&self) -> u32 {
        self.num_chunks.x * self.num_chunks.y * self.num_chunks.z
    }

    /// Chunk coordinate of `pos`, clamped into the grid.
    #[must_use]
    pub fn chunk_coord(&self, pos: Vec3) -> UVec3 {
        let cell = ((pos - self.min_world_bounds + self.chunk_grid_offset) / self.cell_size).floor();
        let max = (self.num_chunks - UVec3::ONE).as_vec3();
        // NaN components clamp to 0 through the saturating cast
        cell.clamp(Vec3::ZERO, max).as_uvec3()
    }

    #[must_use]
    pub fn linear_index(&self, coord: UVec3) -> u32 {
        coord.x + coord.y * self.num_chunks.x + coord.z * self.num_chunks.x * self.num_chunks.y
    }

    #[must_use]
    pub fn chunk_key(&self, pos: Vec3) -> u32 {
        self.linear_index(self.chunk_coord(pos))
    }

    /// Entry buffer capacity for a scene of `num_objects` primitives
    /// (spheres plus rigid objects). Zero for an empty scene, saturating at
    /// `usize::MAX`.
    #[must_use]
    pub fn entry_capacity(&self, num_objects: usize) -> usize {
        let wanted = num_objects.saturating_mul(self.chunks_per_object as usize);
        if wanted == 0 {
            0
        } else {
            wanted.checked_next_power_of_two().unwrap_or(usize::MAX)
        }
    }

    /// [`Self::entry_capacity`], rejected when entry positions would not fit
    /// in a `u32`.
    pub fn checked_entry_capacity(&self, num_objects: usize) -> Result<usize, ConfigError> {
        let capacity = self.entry_capacity(num_objects);
        if u32::try_from(capacity).is_err() {
            return Err(ConfigError::CapacityTooLarge {
                primitives: num_objects,
                chunks_per_object: self.chunks_per_object,
            });
        }
        Ok(capacity)
    }

    /// Kernel-side uniforms for an indexing pass whose primitives start at
    /// `primitive_offset` in the combined primitive numbering.
    #[must_use]
    pub fn uniforms(&self, primitive_offset: u32) -> GridUniforms {
        GridUniforms {
            min_world_bounds: self.min_world_bounds.to_array(),
            cell_size: self.cell_size,
            chunk_grid_offset: self.chunk_grid_offset.to_array(),
            primitive_offset,
            num_chunks: self.num_chunks.to_array(),
            num_chunks_all: self.num_chunks_all(),
        }
    }
}

/// Smallest power of two `>= n`, with `next_pow2(0) == 0`.
#[must_use]
pub fn next_pow2(n: usize) -> usize {
    if n == 0 {
        0
    } else {
        n.next_power_of_two()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_grid(max: Vec3) -> GridParams {
        GridParams::new(Vec3::ZERO, max, 1.0, Vec3::ZERO, 4).unwrap()
    }

    #[test]
    fn chunk_counts_round_up() {
        let grid = GridParams::new(Vec3::ZERO, Vec3::new(2.5, 1.0, 0.2), 1.0, Vec3::ZERO, 1).unwrap();
        assert_eq!(grid.num_chunks(), UVec3::new(3, 1, 1));
        assert_eq!(grid.num_chunks_all(), 3);
    }

    #[test]
    fn keys_are_x_major_and_clamped() {
        let grid = unit_grid(Vec3::new(2.0, 2.0, 1.0));
        assert_eq!(grid.chunk_key(Vec3::new(0.5, 0.5, 0.5)), 0);
        assert_eq!(grid.chunk_key(Vec3::new(1.5, 0.5, 0.5)), 1);
        assert_eq!(grid.chunk_key(Vec3::new(0.5, 1.5, 0.5)), 2);
        assert_eq!(grid.chunk_key(Vec3::new(9.0, 9.0, 9.0)), 3);
        assert_eq!(grid.chunk_key(Vec3::new(-9.0, -9.0, -9.0)), 0);
    }

    #[test]
    fn host_formula_matches_kernel_uniforms() {
        let grid = GridParams::new(
            Vec3::new(-3.0, -1.0, 0.0),
            Vec3::new(5.0, 4.0, 2.0),
            0.75,
            Vec3::new(0.2, 0.0, -0.1),
            2,
        )
        .unwrap();
        let uniforms = grid.uniforms(0);
        let rng = fastrand::Rng::with_seed(11);
        for _ in 0..500 {
            let pos = Vec3::new(
                rng.f32() * 12.0 - 5.0,
                rng.f32() * 9.0 - 3.0,
                rng.f32() * 5.0 - 1.5,
            );
            let host = grid.chunk_key(pos);
            let device = uniforms.linear_index(uniforms.chunk_coord(pos.to_array()));
            assert_eq!(host, device, "key mismatch at {pos}");
        }
    }

    #[test]
    fn capacity_is_next_power_of_two() {
        let grid = unit_grid(Vec3::ONE);
        assert_eq!(grid.entry_capacity(0), 0);
        assert_eq!(grid.entry_capacity(1), 4);
        assert_eq!(grid.entry_capacity(3), 16);
        assert_eq!(next_pow2(5), 8);
        assert_eq!(next_pow2(8), 8);
    }

    #[test]
    fn oversized_capacity_is_rejected() {
        let grid = GridParams::new(Vec3::ZERO, Vec3::ONE, 1.0, Vec3::ZERO, 1_000_000_000).unwrap();
        assert_eq!(grid.checked_entry_capacity(1).unwrap(), 1 << 30);
        assert!(matches!(
            grid.checked_entry_capacity(5),
            Err(ConfigError::CapacityTooLarge { primitives: 5, .. })
        ));
        assert_eq!(grid.entry_capacity(usize::MAX), usize::MAX);
        assert!(grid.checked_entry_capacity(usize::MAX).is_err());

        assert!(matches!(
            GridParams::new(Vec3::ZERO, Vec3::ONE, 1.0, Vec3::ZERO, u32::MAX),
            Err(ConfigError::CapacityTooLarge { primitives: 1, .. })
        ));
    }

    #[test]
    fn invalid_parameters_are_rejected() {
        assert!(matches!(
            GridParams::new(Vec3::ZERO, Vec3::ONE, 0.0, Vec3::ZERO, 1),
            Err(ConfigError::InvalidCellSize(_))
        ));
        assert!(matches!(
            GridParams::new(Vec3::ZERO, Vec3::ONE, f32::NAN, Vec3::ZERO, 1),
            Err(ConfigError::InvalidCellSize(_))
        ));
        assert!(matches!(
            GridParams::new(Vec3::ZERO, Vec3::new(1.0, 0.0, 1.0), 1.0, Vec3::ZERO, 1),
            Err(ConfigError::DegenerateBounds { axis: 'y', .. })
        ));
        assert!(matches!(
            GridParams::new(Vec3::ZERO, Vec3::ONE, 1.0, Vec3::ZERO, 0),
            Err(ConfigError::ZeroChunksPerObject)
        ));
        assert!(matches!(
            GridParams::new(Vec3::ZERO, Vec3::splat(1.0e4), 1.0, Vec3::ZERO, 1),
            Err(ConfigError::GridTooLarge(_))
        ));
    }
}
