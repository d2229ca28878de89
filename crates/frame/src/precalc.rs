use compute::{
    workgroups_for, BufferView, ComputeBackend, ComputeError, Kernel, ObjectData, TriangleData,
};
use scene::SceneModel;
use std::sync::Arc;
use tracing::debug;

/// Derived per-object data recomputed after the scene changes: triangle
/// normals, contained radii and the rotation history.
pub struct PreCalc {
    backend: Arc<dyn ComputeBackend>,
    committed_rotations: Vec<[f32; 3]>,
}

impl PreCalc {
    #[must_use]
    pub fn new(backend: Arc<dyn ComputeBackend>) -> Self {
        Self {
            backend,
            committed_rotations: Vec::new(),
        }
    }

    /// Rotation history is dropped; the next run treats every object as
    /// unrotated since the previous frame.
    pub fn reset(&mut self) {
        self.committed_rotations.clear();
    }

    pub fn run(&mut self, scene: &mut SceneModel) -> Result<(), ComputeError> {
        if scene.objects.is_empty() && scene.triangles.is_empty() {
            return Ok(());
        }

        let results = self.backend.dispatch(
            &Kernel::RecomputeNormals,
            &[
                BufferView::from_slice(&scene.triangle_buffer()),
                BufferView::from_slice(&scene.object_buffer()),
            ],
            [workgroups_for(scene.triangles.len().max(scene.objects.len())), 1, 1],
        )?;
        let [triangles, objects] = take_pair(results)?;
        scene.apply_triangle_buffer(&bytemuck::pod_collect_to_vec::<u8, TriangleData>(&triangles));

        if scene.objects.is_empty() {
            return Ok(());
        }

        // Objects added since the last run start with no rotation delta.
        let known = self.committed_rotations.len().min(scene.objects.len());
        self.committed_rotations.truncate(known);
        self.committed_rotations
            .extend(scene.objects[known..].iter().map(|o| o.rot.to_array()));

        let results = self.backend.dispatch(
            &Kernel::RollObjectRotations,
            &[
                BufferView::from_bytes::<ObjectData>(objects),
                BufferView::from_slice(&self.committed_rotations),
            ],
            [workgroups_for(scene.objects.len()), 1, 1],
        )?;
        let [objects, committed] = take_pair(results)?;
        scene.apply_object_buffer(&bytemuck::pod_collect_to_vec::<u8, ObjectData>(&objects));
        self.committed_rotations = bytemuck::pod_collect_to_vec(&committed);

        debug!(
            triangles = scene.triangles.len(),
            objects = scene.objects.len(),
            "PreCalc complete"
        );
        Ok(())
    }
}

fn take_pair(results: Vec<Vec<u8>>) -> Result<[Vec<u8>; 2], ComputeError> {
    <[Vec<u8>; 2]>::try_from(results).map_err(|_| {
        ComputeError::ShapeMismatch("precalc kernel returned the wrong number of buffers")
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use compute::CpuBackend;
    use glam::Vec3;
    use scene::Triangle;

    fn scene() -> SceneModel {
        let mut scene = SceneModel::new();
        let tri = Triangle {
            v_a: Vec3::ZERO,
            v_b: Vec3::new(2.0, 0.0, 0.0),
            v_c: Vec3::new(0.0, 3.0, 0.0),
            ..Triangle::default()
        };
        scene.add_object(Vec3::new(1.0, 1.0, 1.0), Vec3::new(0.0, 0.5, 0.0), [tri]);
        scene
    }

    #[test]
    fn recomputes_normals_and_radius() {
        let mut scene = scene();
        let mut precalc = PreCalc::new(Arc::new(CpuBackend::new()));
        precalc.run(&mut scene).unwrap();
        assert_eq!(scene.triangles[0].normal, Vec3::Z);
        assert!((scene.objects[0].contained_radius - 3.0).abs() < 1e-6);
    }

    #[test]
    fn rotation_history_rolls_forward() {
        let mut scene = scene();
        let mut precalc = PreCalc::new(Arc::new(CpuBackend::new()));

        precalc.run(&mut scene).unwrap();
        assert_eq!(scene.objects[0].last_rot, Vec3::new(0.0, 0.5, 0.0));

        scene.objects[0].rot = Vec3::new(0.0, 0.7, 0.0);
        precalc.run(&mut scene).unwrap();
        assert_eq!(scene.objects[0].last_rot, Vec3::new(0.0, 0.5, 0.0));
        assert_eq!(scene.objects[0].rot, Vec3::new(0.0, 0.7, 0.0));

        precalc.run(&mut scene).unwrap();
        assert_eq!(scene.objects[0].last_rot, Vec3::new(0.0, 0.7, 0.0));
    }
}
