use crate::{kernels, layout, BufferView, ComputeBackend, ComputeError, Kernel};

/// Runs every kernel on the `rayon` pool. A dispatch returns once all
/// parallel work of the pass has joined.
#[derive(Default, Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ComputeBackend for CpuBackend {
    fn dispatch(
        &self,
        kernel: &Kernel,
        binds: &[BufferView],
        workgroups: [u32; 3],
    ) -> Result<Vec<Vec<u8>>, ComputeError> {
        if binds.len() != layout::binding_count(kernel) as usize {
            return Err(ComputeError::ShapeMismatch(
                "Number of bound buffers does not match the kernel layout",
            ));
        }
        for buffer_view in binds {
            if buffer_view.data.len() != buffer_view.expected_bytes() {
                return Err(ComputeError::ShapeMismatch(
                    "Buffer data length does not match product of shape dimensions and element size",
                ));
            }
        }
        tracing::trace!(kernel = kernel.name(), ?workgroups, "dispatch");

        let outputs = match kernel {
            Kernel::GridIndexSpheres => kernels::handle_grid_index_spheres(binds),
            Kernel::GridIndexObjects => kernels::handle_grid_index_objects(binds),
            Kernel::BitonicSortStep => kernels::handle_bitonic_sort_step(binds),
            Kernel::ClearStartIndices => kernels::handle_clear_start_indices(binds),
            Kernel::BuildStartIndices => kernels::handle_build_start_indices(binds),
            Kernel::RecomputeNormals => kernels::handle_recompute_normals(binds),
            Kernel::RollObjectRotations => kernels::handle_roll_object_rotations(binds),
        }?;
        check_outputs(kernel, binds, &outputs)?;
        Ok(outputs)
    }
}

/// Each written buffer must come back in layout order with its bound size.
fn check_outputs(
    kernel: &Kernel,
    binds: &[BufferView],
    outputs: &[Vec<u8>],
) -> Result<(), ComputeError> {
    let written = layout::output_bindings(kernel);
    if outputs.len() != written.len() {
        return Err(ComputeError::ShapeMismatch(
            "Kernel returned a different number of buffers than it writes",
        ));
    }
    for (output, &binding) in outputs.iter().zip(written) {
        if output.len() != binds[binding as usize].data.len() {
            return Err(ComputeError::ShapeMismatch(
                "Kernel output size does not match its bound buffer",
            ));
        }
    }
    Ok(())
}
