// This module re-exports handlers for each kernel operation.

// Spatial hashing
pub mod grid_index_op;
pub use grid_index_op::{handle_grid_index_objects, handle_grid_index_spheres};

// Sort network
pub mod bitonic_sort_step_op;
pub use bitonic_sort_step_op::handle_bitonic_sort_step;

// Lookup table
pub mod start_indices_op;
pub use start_indices_op::{handle_build_start_indices, handle_clear_start_indices};

// PreCalc
pub mod precalc_op;
pub use precalc_op::{handle_recompute_normals, handle_roll_object_rotations};
