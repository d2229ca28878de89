use crate::{BufferView, ComputeError, Kernel};

pub trait ComputeBackend: Send + Sync + 'static {
    /// Dispatches one pass of a kernel with the given bindings and workgroup configuration.
    ///
    /// # Arguments
    /// * `kernel`: The kernel to dispatch.
    /// * `binds`: A slice of `BufferView`s in the order listed by
    ///            [`crate::layout`] for that kernel.
    /// * `workgroups`: The number of workgroups to dispatch.
    ///
    /// # Returns
    ///
    /// Returns `Ok(Vec<Vec<u8>>)` where each inner `Vec<u8>` holds the bytes of
    /// a buffer the pass wrote, in the order given by
    /// [`crate::layout::output_bindings`]. The call returns only after every
    /// invocation of the pass has completed, so the next dispatch may depend on
    /// any element written here.
    ///
    /// Returns `ComputeError::ShapeMismatch` if any bound buffer is invalid.
    fn dispatch(
        &self,
        kernel: &Kernel,
        binds: &[BufferView],
        workgroups: [u32; 3],
    ) -> Result<Vec<Vec<u8>>, ComputeError>;
}
