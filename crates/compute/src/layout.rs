//! Binding layout of every kernel.
//!
//! | kernel                | bindings                                          | written   |
//! |-----------------------|---------------------------------------------------|-----------|
//! | `GridIndexSpheres`    | spheres, entries, counters, grid uniforms         | 1, 2      |
//! | `GridIndexObjects`    | objects, entries, counters, grid uniforms         | 1, 2      |
//! | `BitonicSortStep`     | entries, step uniforms                            | 0         |
//! | `ClearStartIndices`   | start indices                                     | 0         |
//! | `BuildStartIndices`   | sorted entries, start indices, table uniforms     | 1         |
//! | `RecomputeNormals`    | triangles, objects                                | 0, 1      |
//! | `RollObjectRotations` | objects, committed rotations                      | 0, 1      |

use crate::Kernel;

pub const GRID_PRIMITIVES: u32 = 0;
pub const GRID_ENTRIES: u32 = 1;
pub const GRID_COUNTERS: u32 = 2;
pub const GRID_UNIFORMS: u32 = 3;

/// Counter buffer slots shared by both grid indexing passes.
pub const COUNTER_RESERVED: usize = 0;
pub const COUNTER_DROPPED: usize = 1;
pub const COUNTER_LEN: usize = 2;

const _: () = assert!(GRID_UNIFORMS == 3);

/// Return expected number of bindings for each kernel.
pub const fn binding_count(kernel: &Kernel) -> u32 {
    match kernel {
        Kernel::GridIndexSpheres | Kernel::GridIndexObjects => 4,
        Kernel::BitonicSortStep | Kernel::RecomputeNormals | Kernel::RollObjectRotations => 2,
        Kernel::ClearStartIndices => 1,
        Kernel::BuildStartIndices => 3,
    }
}

/// Bindings a kernel writes, in the order the dispatch returns them.
pub const fn output_bindings(kernel: &Kernel) -> &'static [u32] {
    match kernel {
        Kernel::GridIndexSpheres | Kernel::GridIndexObjects => &[GRID_ENTRIES, GRID_COUNTERS],
        Kernel::BitonicSortStep | Kernel::ClearStartIndices => &[0],
        Kernel::BuildStartIndices => &[1],
        Kernel::RecomputeNormals | Kernel::RollObjectRotations => &[0, 1],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Kernel; 7] = [
        Kernel::GridIndexSpheres,
        Kernel::GridIndexObjects,
        Kernel::BitonicSortStep,
        Kernel::ClearStartIndices,
        Kernel::BuildStartIndices,
        Kernel::RecomputeNormals,
        Kernel::RollObjectRotations,
    ];

    #[test]
    fn outputs_are_within_binding_range() {
        for kernel in ALL {
            let count = binding_count(&kernel);
            for &binding in output_bindings(&kernel) {
                assert!(binding < count, "{kernel:?} writes binding {binding} of {count}");
            }
        }
    }

    #[test]
    fn uniforms_are_never_written() {
        assert!(!output_bindings(&Kernel::GridIndexSpheres).contains(&GRID_UNIFORMS));
        assert!(!output_bindings(&Kernel::GridIndexObjects).contains(&GRID_PRIMITIVES));
        assert!(output_bindings(&Kernel::GridIndexObjects).contains(&GRID_COUNTERS));
        assert!(!output_bindings(&Kernel::BuildStartIndices).contains(&0));
        assert!(!output_bindings(&Kernel::BitonicSortStep).contains(&1));
    }
}
