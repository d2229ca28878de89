//! Scene primitives and their conversion into kernel buffer records.

use compute::{ObjectData, SphereData, TriangleData};
use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Sphere {
    pub pos: Vec3,
    pub radius: f32,
    #[serde(default)]
    pub material_key: i32,
}

impl Sphere {
    #[must_use]
    pub fn new(pos: Vec3, radius: f32, material_key: i32) -> Self {
        Self { pos, radius, material_key }
    }
}

/// A triangle in its parent object's local frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Triangle {
    pub v_a: Vec3,
    pub v_b: Vec3,
    pub v_c: Vec3,
    /// Recomputed during PreCalc.
    #[serde(default)]
    pub normal: Vec3,
    #[serde(default)]
    pub material_key: i32,
    pub parent_key: i32,
}

/// A contiguous triangle range `[tri_start, tri_end)` under one rigid transform.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidObject {
    pub pos: Vec3,
    #[serde(default)]
    pub rot: Vec3,
    /// Rotation at the previous PreCalc. Written only by the frame pipeline.
    #[serde(default)]
    pub last_rot: Vec3,
    /// Recomputed during PreCalc.
    #[serde(default)]
    pub contained_radius: f32,
    pub tri_start: i32,
    pub tri_end: i32,
}

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Vec3,
    #[serde(default = "white")]
    pub specular_color: Vec3,
    #[serde(default)]
    pub brightness: f32,
    #[serde(default)]
    pub smoothness: f32,
}

fn white() -> Vec3 {
    Vec3::ONE
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Vec3::ONE,
            specular_color: white(),
            brightness: 0.0,
            smoothness: 0.0,
        }
    }
}

impl From<&Sphere> for SphereData {
    fn from(sphere: &Sphere) -> Self {
        Self {
            pos: sphere.pos.to_array(),
            radius: sphere.radius,
            material_key: sphere.material_key,
        }
    }
}

impl From<&Triangle> for TriangleData {
    fn from(tri: &Triangle) -> Self {
        Self {
            v_a: tri.v_a.to_array(),
            v_b: tri.v_b.to_array(),
            v_c: tri.v_c.to_array(),
            normal: tri.normal.to_array(),
            material_key: tri.material_key,
            parent_key: tri.parent_key,
        }
    }
}

impl From<&TriangleData> for Triangle {
    fn from(data: &TriangleData) -> Self {
        Self {
            v_a: Vec3::from_array(data.v_a),
            v_b: Vec3::from_array(data.v_b),
            v_c: Vec3::from_array(data.v_c),
            normal: Vec3::from_array(data.normal),
            material_key: data.material_key,
            parent_key: data.parent_key,
        }
    }
}

impl From<&RigidObject> for ObjectData {
    fn from(object: &RigidObject) -> Self {
        Self {
            pos: object.pos.to_array(),
            rot: object.rot.to_array(),
            last_rot: object.last_rot.to_array(),
            contained_radius: object.contained_radius,
            tri_start: object.tri_start,
            tri_end: object.tri_end,
        }
    }
}

impl From<&ObjectData> for RigidObject {
    fn from(data: &ObjectData) -> Self {
        Self {
            pos: Vec3::from_array(data.pos),
            rot: Vec3::from_array(data.rot),
            last_rot: Vec3::from_array(data.last_rot),
            contained_radius: data.contained_radius,
            tri_start: data.tri_start,
            tri_end: data.tri_end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn object_round_trips_through_buffer_record() {
        let object = RigidObject {
            pos: Vec3::new(1.0, 2.0, 3.0),
            rot: Vec3::new(0.1, 0.0, 0.0),
            last_rot: Vec3::ZERO,
            contained_radius: 4.0,
            tri_start: 2,
            tri_end: 5,
        };
        assert_eq!(RigidObject::from(&ObjectData::from(&object)), object);
    }

    #[test]
    fn material_defaults_to_white_specular() {
        let material: Material = serde_json::from_str(r#"{ "color": [1.0, 0.0, 0.0] }"#).unwrap();
        assert_eq!(material.specular_color, Vec3::ONE);
        assert_eq!(material.brightness, 0.0);
    }
}
