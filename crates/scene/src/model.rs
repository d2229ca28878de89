use crate::error::ConfigError;
use crate::types::{Material, RigidObject, Sphere, Triangle};
use compute::{ObjectData, SphereData, TriangleData};
use glam::Vec3;

/// Every primitive, object and material of one scene.
///
/// Primitive references used by the spatial index number spheres first:
/// `index < num_spheres()` is a sphere, anything else is rigid object
/// `index - num_spheres()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SceneModel {
    pub spheres: Vec<Sphere>,
    pub triangles: Vec<Triangle>,
    pub objects: Vec<RigidObject>,
    pub materials: Vec<Material>,
}

/// A primitive resolved from a spatial index reference.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PrimitiveRef<'a> {
    Sphere(&'a Sphere),
    Object(&'a RigidObject),
}

impl SceneModel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn num_spheres(&self) -> usize {
        self.spheres.len()
    }

    /// Primitives indexed by the grid: spheres plus rigid objects.
    #[must_use]
    pub fn num_objects(&self) -> usize {
        self.spheres.len() + self.objects.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.num_objects() == 0
    }

    pub fn add_sphere(&mut self, pos: Vec3, radius: f32, material_key: i32) -> usize {
        self.spheres.push(Sphere::new(pos, radius, material_key));
        self.spheres.len() - 1
    }

    /// Appends a rigid object owning `triangles`, which are given in the
    /// object's local frame. Returns the object's index.
    pub fn add_object(
        &mut self,
        pos: Vec3,
        rot: Vec3,
        triangles: impl IntoIterator<Item = Triangle>,
    ) -> usize {
        let object = self.objects.len();
        let tri_start = self.triangles.len();
        self.triangles.extend(triangles.into_iter().map(|tri| Triangle {
            parent_key: object as i32,
            ..tri
        }));
        self.objects.push(RigidObject {
            pos,
            rot,
            tri_start: tri_start as i32,
            tri_end: self.triangles.len() as i32,
            ..RigidObject::default()
        });
        object
    }

    /// Resolves a primitive reference stored in a chunk entry.
    #[must_use]
    pub fn primitive(&self, index: u32) -> Option<PrimitiveRef<'_>> {
        let index = index as usize;
        match index.checked_sub(self.spheres.len()) {
            None => self.spheres.get(index).map(PrimitiveRef::Sphere),
            Some(object) => self.objects.get(object).map(PrimitiveRef::Object),
        }
    }

    /// Checks cross-references between buffers.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, sphere) in self.spheres.iter().enumerate() {
            if !sphere.radius.is_finite() || sphere.radius < 0.0 {
                return Err(ConfigError::InvalidRadius {
                    index,
                    radius: sphere.radius,
                });
            }
        }

        let num_triangles = self.triangles.len();
        for (object, obj) in self.objects.iter().enumerate() {
            let in_range = obj.tri_start >= 0
                && obj.tri_start <= obj.tri_end
                && usize::try_from(obj.tri_end).is_ok_and(|end| end <= num_triangles);
            if !in_range {
                return Err(ConfigError::InvalidTriangleRange {
                    object,
                    start: obj.tri_start,
                    end: obj.tri_end,
                    num_triangles,
                });
            }
        }

        let num_objects = self.objects.len();
        for (triangle, tri) in self.triangles.iter().enumerate() {
            if !matches!(usize::try_from(tri.parent_key), Ok(parent) if parent < num_objects) {
                return Err(ConfigError::InvalidParent {
                    triangle,
                    parent: tri.parent_key,
                    num_objects,
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn sphere_buffer(&self) -> Vec<SphereData> {
        self.spheres.iter().map(SphereData::from).collect()
    }

    #[must_use]
    pub fn triangle_buffer(&self) -> Vec<TriangleData> {
        self.triangles.iter().map(TriangleData::from).collect()
    }

    #[must_use]
    pub fn object_buffer(&self) -> Vec<ObjectData> {
        self.objects.iter().map(ObjectData::from).collect()
    }

    /// Copies recomputed triangle records back into the model.
    pub fn apply_triangle_buffer(&mut self, data: &[TriangleData]) {
        for (tri, data) in self.triangles.iter_mut().zip(data) {
            *tri = Triangle::from(data);
        }
    }

    /// Copies recomputed object records back into the model.
    pub fn apply_object_buffer(&mut self, data: &[ObjectData]) {
        for (object, data) in self.objects.iter_mut().zip(data) {
            *object = RigidObject::from(data);
        }
    }
}
