//! JSON scene descriptions.
//!
//! ```json
//! {
//!   "grid": { "min_world_bounds": [0, 0, 0], "max_world_bounds": [8, 4, 8],
//!             "cell_size": 1.0, "chunks_per_object": 8 },
//!   "spheres": [{ "pos": [1, 1, 1], "radius": 0.5 }],
//!   "objects": [{ "pos": [4, 1, 4], "tri_start": 0, "tri_end": 1 }],
//!   "triangles": [{ "v_a": [0, 0, 0], "v_b": [1, 0, 0], "v_c": [0, 1, 0], "parent_key": 0 }]
//! }
//! ```

use crate::error::ConfigError;
use crate::grid::GridParams;
use crate::model::SceneModel;
use crate::types::{Material, RigidObject, Sphere, Triangle};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    pub min_world_bounds: Vec3,
    pub max_world_bounds: Vec3,
    pub cell_size: f32,
    #[serde(default)]
    pub chunk_grid_offset: Vec3,
    #[serde(default = "default_chunks_per_object")]
    pub chunks_per_object: u32,
}

fn default_chunks_per_object() -> u32 {
    8
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SceneConfig {
    pub grid: GridConfig,
    #[serde(default)]
    pub spheres: Vec<Sphere>,
    #[serde(default)]
    pub materials: Vec<Material>,
    #[serde(default)]
    pub objects: Vec<RigidObject>,
    #[serde(default)]
    pub triangles: Vec<Triangle>,
}

impl SceneConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the scene model and grid, rejecting any configuration the
    /// rebuild cannot run with.
    pub fn validate(&self) -> Result<(SceneModel, GridParams), ConfigError> {
        let grid = GridParams::new(
            self.grid.min_world_bounds,
            self.grid.max_world_bounds,
            self.grid.cell_size,
            self.grid.chunk_grid_offset,
            self.grid.chunks_per_object,
        )?;
        let scene = SceneModel {
            spheres: self.spheres.clone(),
            triangles: self.triangles.clone(),
            objects: self.objects.clone(),
            materials: self.materials.clone(),
        };
        scene.validate()?;
        grid.checked_entry_capacity(scene.num_objects())?;

        tracing::info!(
            spheres = scene.spheres.len(),
            objects = scene.objects.len(),
            triangles = scene.triangles.len(),
            chunks = grid.num_chunks_all(),
            "scene loaded"
        );
        Ok((scene, grid))
    }
}
