use glam::Vec3;
use scene::{GridConfig, Material, RigidObject, SceneConfig, Sphere, Triangle};

/// Scene used when no `--scene` file is given: a ring of spheres around a
/// small tetrahedron on a 16 x 8 x 16 grid.
pub fn scene() -> SceneConfig {
    let center = Vec3::new(8.0, 3.0, 8.0);

    let spheres = (0..12)
        .map(|i| {
            let angle = i as f32 / 12.0 * std::f32::consts::TAU;
            let pos = center + Vec3::new(angle.cos() * 5.0, (i % 3) as f32 * 0.75, angle.sin() * 5.0);
            Sphere::new(pos, 0.4 + (i % 4) as f32 * 0.2, (i % 3) as i32)
        })
        .collect();

    let corners = [
        Vec3::new(0.0, 1.2, 0.0),
        Vec3::new(-1.0, -0.6, -0.6),
        Vec3::new(1.0, -0.6, -0.6),
        Vec3::new(0.0, -0.6, 1.1),
    ];
    let faces = [[0, 1, 2], [0, 2, 3], [0, 3, 1], [1, 3, 2]];
    let triangles = faces
        .iter()
        .map(|&[a, b, c]| Triangle {
            v_a: corners[a],
            v_b: corners[b],
            v_c: corners[c],
            material_key: 3,
            parent_key: 0,
            ..Triangle::default()
        })
        .collect();

    SceneConfig {
        grid: GridConfig {
            min_world_bounds: Vec3::ZERO,
            max_world_bounds: Vec3::new(16.0, 8.0, 16.0),
            cell_size: 1.0,
            chunk_grid_offset: Vec3::ZERO,
            chunks_per_object: 32,
        },
        spheres,
        materials: vec![
            Material {
                color: Vec3::new(0.9, 0.3, 0.3),
                ..Material::default()
            },
            Material {
                color: Vec3::new(0.3, 0.9, 0.3),
                smoothness: 0.6,
                ..Material::default()
            },
            Material {
                color: Vec3::new(0.3, 0.3, 0.9),
                smoothness: 0.95,
                ..Material::default()
            },
            Material {
                color: Vec3::ONE,
                brightness: 4.0,
                ..Material::default()
            },
        ],
        objects: vec![RigidObject {
            pos: center,
            tri_start: 0,
            tri_end: 4,
            ..RigidObject::default()
        }],
        triangles,
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn demo_scene_validates() {
        let (scene, grid) = super::scene().validate().unwrap();
        assert_eq!(scene.num_objects(), 13);
        assert_eq!(grid.num_chunks_all(), 16 * 8 * 16);
    }
}
