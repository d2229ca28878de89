#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc
)]
//! # Compute
//!
//! Device abstraction for the spatial-index rebuild. Every pass of the
//! pipeline is one [`Kernel`] dispatched through a [`ComputeBackend`] with a
//! list of [`BufferView`] bindings. A dispatch returns only after every worker
//! of that pass has finished, so consecutive dispatches are separated by a
//! full barrier.
//!
//! The [`CpuBackend`] runs each kernel data-parallel on the `rayon` thread
//! pool. Buffer layouts shared by the kernels live in [`types`].

use std::sync::Arc;
use thiserror::Error;

pub mod append_buffer;
pub mod backend;
#[cfg(feature = "cpu")]
pub mod cpu_backend;
#[cfg(feature = "cpu")]
pub mod kernels;
pub mod layout;
pub mod types;

pub use append_buffer::AppendBuffer;
pub use backend::ComputeBackend;
#[cfg(feature = "cpu")]
pub use cpu_backend::CpuBackend;
pub use types::{
    ChunkEntry, GridUniforms, ObjectData, SortStepUniforms, SphereData, StartIndexUniforms,
    TriangleData, EMPTY_START, SENTINEL_KEY,
};

/// Threads per workgroup assumed by every kernel.
pub const WORKGROUP_SIZE: u32 = 256;

#[derive(Error, Debug)]
pub enum ComputeError {
    #[error("buffer shape mismatch: {0}")]
    ShapeMismatch(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kernel {
    // Spatial hashing
    GridIndexSpheres,
    GridIndexObjects,

    // Sort network
    BitonicSortStep,

    // Lookup table
    ClearStartIndices,
    BuildStartIndices,

    // PreCalc
    RecomputeNormals,
    RollObjectRotations,
}

impl Kernel {
    #[must_use]
    pub const fn binding_count(&self) -> u32 {
        layout::binding_count(self)
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Kernel::GridIndexSpheres => "grid_index_spheres",
            Kernel::GridIndexObjects => "grid_index_objects",
            Kernel::BitonicSortStep => "bitonic_sort_step",
            Kernel::ClearStartIndices => "clear_start_indices",
            Kernel::BuildStartIndices => "build_start_indices",
            Kernel::RecomputeNormals => "recompute_normals",
            Kernel::RollObjectRotations => "roll_object_rotations",
        }
    }
}

#[derive(Clone, Debug)]
pub struct BufferView {
    pub data: Arc<[u8]>,
    pub shape: Vec<usize>, // Number of elements per dimension
    pub element_size_in_bytes: usize, // Size of a single element described by the innermost dimension of shape
}

impl BufferView {
    #[must_use]
    pub fn new(data: Arc<[u8]>, shape: Vec<usize>, element_size_in_bytes: usize) -> Self {
        Self { data, shape, element_size_in_bytes }
    }

    /// Uploads a slice of plain-old-data records as a one dimensional buffer.
    #[must_use]
    pub fn from_slice<T: bytemuck::Pod>(values: &[T]) -> Self {
        Self::new(
            Arc::from(bytemuck::cast_slice::<T, u8>(values)),
            vec![values.len()],
            std::mem::size_of::<T>(),
        )
    }

    /// Uploads a single uniform record.
    #[must_use]
    pub fn uniform<T: bytemuck::Pod>(value: &T) -> Self {
        Self::new(
            Arc::from(bytemuck::bytes_of(value)),
            vec![1],
            std::mem::size_of::<T>(),
        )
    }

    /// Wraps bytes returned by a dispatch so they can be bound to the next pass.
    #[must_use]
    pub fn from_bytes<T: bytemuck::Pod>(bytes: Vec<u8>) -> Self {
        let element_size = std::mem::size_of::<T>();
        let len = bytes.len() / element_size;
        Self::new(bytes.into(), vec![len], element_size)
    }

    /// The first `len` elements of a one dimensional buffer, as a new buffer.
    #[must_use]
    pub fn prefix(&self, len: usize) -> Self {
        let len = len.min(self.len());
        let bytes = (len * self.element_size_in_bytes).min(self.data.len());
        Self::new(
            Arc::from(&self.data[..bytes]),
            vec![len],
            self.element_size_in_bytes,
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.shape.iter().product()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte length implied by `shape` and the element size.
    #[must_use]
    pub fn expected_bytes(&self) -> usize {
        self.len() * self.element_size_in_bytes
    }

    /// Copies the buffer out as typed records.
    ///
    /// The copy sidesteps alignment requirements on the shared byte storage.
    ///
    /// # Errors
    /// Returns [`ComputeError::ShapeMismatch`] when the element size does not
    /// match `T`.
    pub fn read<T: bytemuck::Pod>(&self) -> Result<Vec<T>, ComputeError> {
        if self.element_size_in_bytes != std::mem::size_of::<T>() {
            return Err(ComputeError::ShapeMismatch(
                "buffer element size does not match the requested record type",
            ));
        }
        Ok(bytemuck::pod_collect_to_vec(&self.data))
    }

    /// Reads a single uniform record.
    ///
    /// # Errors
    /// Returns [`ComputeError::ShapeMismatch`] unless the buffer holds exactly
    /// one `T`.
    pub fn read_uniform<T: bytemuck::Pod>(&self) -> Result<T, ComputeError> {
        if self.data.len() != std::mem::size_of::<T>() || self.len() != 1 {
            return Err(ComputeError::ShapeMismatch(
                "uniform buffer has incorrect size or shape",
            ));
        }
        bytemuck::try_pod_read_unaligned(&self.data)
            .map_err(|_| ComputeError::ShapeMismatch("uniform buffer could not be read"))
    }
}

/// Number of workgroups needed to cover `num_elements` threads.
#[must_use]
pub fn workgroups_for(num_elements: usize) -> u32 {
    (num_elements as u32).div_ceil(WORKGROUP_SIZE).max(1)
}

/// Returns the compute backend used by the pipeline.
///
/// Only the CPU implementation ships today; it is selected unconditionally.
#[cfg(feature = "cpu")]
#[must_use]
pub fn default_backend() -> Arc<dyn ComputeBackend> {
    tracing::info!(threads = rayon::current_num_threads(), "Using CpuBackend.");
    Arc::new(CpuBackend::new())
}
