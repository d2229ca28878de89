use crate::types::{ObjectData, TriangleData};
use crate::{BufferView, ComputeError};
use rayon::prelude::*;

fn sub(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn cross(a: [f32; 3], b: [f32; 3]) -> [f32; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn length(v: [f32; 3]) -> f32 {
    (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt()
}

/// Unit normal of the triangle's winding. Degenerate triangles get a zero normal.
fn face_normal(tri: &TriangleData) -> [f32; 3] {
    let n = cross(sub(tri.v_b, tri.v_a), sub(tri.v_c, tri.v_a));
    let len = length(n);
    if len > f32::EPSILON {
        [n[0] / len, n[1] / len, n[2] / len]
    } else {
        [0.0; 3]
    }
}

/// Clamps an object's triangle range to the triangle buffer.
fn tri_range(object: &ObjectData, num_tris: usize) -> std::ops::Range<usize> {
    let start = usize::try_from(object.tri_start).unwrap_or(0).min(num_tris);
    let end = usize::try_from(object.tri_end).unwrap_or(0).clamp(start, num_tris);
    start..end
}

/// Recomputes triangle normals and the radius of the sphere, centred on the
/// object origin, that contains every vertex of the object's triangles.
///
/// Outputs `[triangles, objects]`.
pub fn handle_recompute_normals(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 2 {
        return Err(ComputeError::ShapeMismatch(
            "RecomputeNormals expects 2 buffers (triangles, objects)",
        ));
    }
    let mut triangles: Vec<TriangleData> = binds[0].read()?;
    let mut objects: Vec<ObjectData> = binds[1].read()?;

    triangles
        .par_iter_mut()
        .for_each(|tri| tri.normal = face_normal(tri));

    objects.par_iter_mut().for_each(|object| {
        object.contained_radius = triangles[tri_range(object, triangles.len())]
            .iter()
            .flat_map(|tri| [tri.v_a, tri.v_b, tri.v_c])
            .map(length)
            .fold(0.0, f32::max);
    });

    Ok(vec![
        bytemuck::cast_slice(&triangles).to_vec(),
        bytemuck::cast_slice(&objects).to_vec(),
    ])
}

/// Rolls each object's rotation history forward: `last_rot` receives the
/// rotation committed at the previous roll and the current `rot` becomes the
/// new committed value.
///
/// Outputs `[objects, committed rotations]`.
pub fn handle_roll_object_rotations(binds: &[BufferView]) -> Result<Vec<Vec<u8>>, ComputeError> {
    if binds.len() < 2 {
        return Err(ComputeError::ShapeMismatch(
            "RollObjectRotations expects 2 buffers (objects, committed rotations)",
        ));
    }
    let mut objects: Vec<ObjectData> = binds[0].read()?;
    let mut committed: Vec<[f32; 3]> = binds[1].read()?;
    if committed.len() != objects.len() {
        return Err(ComputeError::ShapeMismatch(
            "RollObjectRotations needs one committed rotation per object",
        ));
    }

    objects
        .par_iter_mut()
        .zip(committed.par_iter_mut())
        .for_each(|(object, committed)| {
            object.last_rot = *committed;
            *committed = object.rot;
        });

    Ok(vec![
        bytemuck::cast_slice(&objects).to_vec(),
        bytemuck::cast_slice(&committed).to_vec(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tri(v_a: [f32; 3], v_b: [f32; 3], v_c: [f32; 3]) -> TriangleData {
        TriangleData { v_a, v_b, v_c, ..Default::default() }
    }

    #[test]
    fn normals_follow_winding() {
        let tris = [
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
            tri([0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [1.0, 0.0, 0.0]),
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]),
        ];
        let out = handle_recompute_normals(&[
            BufferView::from_slice(&tris),
            BufferView::from_slice::<ObjectData>(&[]),
        ])
        .unwrap();
        let tris: Vec<TriangleData> = bytemuck::pod_collect_to_vec(&out[0]);
        assert_eq!(tris[0].normal, [0.0, 0.0, 1.0]);
        assert_eq!(tris[1].normal, [0.0, 0.0, -1.0]);
        assert_eq!(tris[2].normal, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn contained_radius_covers_only_own_range() {
        let tris = [
            tri([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 2.0, 0.0]),
            tri([0.0, 0.0, 5.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ];
        let objects = [
            ObjectData { tri_start: 0, tri_end: 1, ..Default::default() },
            ObjectData { tri_start: 0, tri_end: 2, ..Default::default() },
            ObjectData { tri_start: 1, tri_end: 9, ..Default::default() },
        ];
        let out = handle_recompute_normals(&[
            BufferView::from_slice(&tris),
            BufferView::from_slice(&objects),
        ])
        .unwrap();
        let objects: Vec<ObjectData> = bytemuck::pod_collect_to_vec(&out[1]);
        assert!((objects[0].contained_radius - 2.0).abs() < 1e-6);
        assert!((objects[1].contained_radius - 5.0).abs() < 1e-6);
        assert!((objects[2].contained_radius - 5.0).abs() < 1e-6, "range is clamped");
    }

    #[test]
    fn roll_carries_previous_rotation_forward() {
        let objects = [ObjectData { rot: [0.1, 0.2, 0.3], ..Default::default() }];
        let committed = [[0.0f32, 0.0, 0.5]];
        let out = handle_roll_object_rotations(&[
            BufferView::from_slice(&objects),
            BufferView::from_slice(&committed),
        ])
        .unwrap();
        let objects: Vec<ObjectData> = bytemuck::pod_collect_to_vec(&out[0]);
        let committed: Vec<[f32; 3]> = bytemuck::pod_collect_to_vec(&out[1]);
        assert_eq!(objects[0].last_rot, [0.0, 0.0, 0.5]);
        assert_eq!(objects[0].rot, [0.1, 0.2, 0.3]);
        assert_eq!(committed[0], [0.1, 0.2, 0.3]);
    }
}
