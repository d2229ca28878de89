//! Headless stand-in for the ray marcher.
//!
//! Walks a ray from the camera through the grid one half-cell at a time and
//! looks every sample up in the start-index table, the way the marcher finds
//! candidate primitives. Grids too fine for that get a coarser step so a ray
//! never takes more than [`MAX_SAMPLES`] lookups.

use frame::{FrameView, Renderer};
use glam::Vec3;
use scene::PrimitiveRef;
use std::collections::BTreeSet;
use tracing::{debug, info};

pub const MAX_SAMPLES: u32 = 4096;

pub struct ProbeRenderer {
    pub frames: u64,
    pub last_hits: usize,
    log_every: u64,
}

impl ProbeRenderer {
    pub fn new(log_every: u64) -> Self {
        Self {
            frames: 0,
            last_hits: 0,
            log_every: log_every.max(1),
        }
    }
}

impl Renderer for ProbeRenderer {
    fn render(&mut self, view: &FrameView<'_>) -> anyhow::Result<()> {
        let camera = view.camera.matrix();
        let origin = camera.transform_point3(Vec3::ZERO);
        let forward = camera.transform_vector3(Vec3::Z);
        let reach = (view.grid.max_world_bounds() - view.grid.min_world_bounds()).length();
        let samples = ray_samples(reach, view.grid.cell_size() * 0.5);
        let step = reach / samples as f32;

        let mut candidates = BTreeSet::new();
        for i in 0..=samples {
            let t = i as f32 * step;
            candidates.extend(view.index.query_point(view.grid, origin + forward * t));
        }

        let (mut spheres, mut objects) = (0usize, 0usize);
        for &primitive in &candidates {
            match view.scene.primitive(primitive) {
                Some(PrimitiveRef::Sphere(_)) => spheres += 1,
                Some(PrimitiveRef::Object(_)) => objects += 1,
                None => anyhow::bail!("index references missing primitive {primitive}"),
            }
        }

        self.last_hits = candidates.len();
        self.frames += 1;
        if view.frame_index % self.log_every == 0 {
            info!(
                frame = view.frame_index,
                accumulated = view.frame_count,
                occupied = view.index.occupied_count(),
                spheres,
                objects,
                "Probe ray candidates"
            );
        } else {
            debug!(frame = view.frame_index, candidates = candidates.len(), "Probe ray");
        }
        Ok(())
    }
}

/// Number of steps of at most `step` needed to cover `reach`, capped at
/// [`MAX_SAMPLES`].
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn ray_samples(reach: f32, step: f32) -> u32 {
    let wanted = (reach / step).ceil();
    if wanted.is_nan() || wanted < 1.0 {
        1
    } else if wanted >= MAX_SAMPLES as f32 {
        MAX_SAMPLES
    } else {
        wanted as u32
    }
}
