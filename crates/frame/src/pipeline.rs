//! The per-frame state machine.
//!
//! ```text
//! Idle --(authoring change / camera move)--> SettingsDirty
//! SettingsDirty --(render_frame)--> Rebuilding --> Idle
//! Idle --(render_frame)--> Rebuilding --> Idle
//! ```
//!
//! The index is rebuilt on every frame. PreCalc only runs when the scene
//! generation moved past the one PreCalc last saw.

use crate::context::FrameContext;
use crate::error::PipelineError;
use crate::precalc::PreCalc;
use crate::renderer::{FrameView, Renderer};
use compute::ComputeBackend;
use scene::{GridParams, SceneModel};
use spatial::{IndexBuilder, SpatialIndex};
use std::sync::Arc;
use tracing::{debug, info};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PipelineState {
    Idle,
    SettingsDirty,
    Rebuilding,
}

/// What one `render_frame` call did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub frame_index: u64,
    pub generation: u64,
    pub precalc_ran: bool,
    pub occupied: usize,
    pub padded_len: usize,
    pub sort_passes: usize,
    pub dropped: u32,
    /// Accumulation counter handed to the renderer.
    pub frame_count: u32,
}

pub struct FramePipeline {
    index_builder: IndexBuilder,
    precalc: PreCalc,
    scene: SceneModel,
    grid: GridParams,
    index: SpatialIndex,
    state: PipelineState,
    generation: u64,
    precalc_generation: Option<u64>,
    frame_index: u64,
}

impl FramePipeline {
    #[must_use]
    pub fn new(backend: Arc<dyn ComputeBackend>, scene: SceneModel, grid: GridParams) -> Self {
        Self {
            index_builder: IndexBuilder::new(backend.clone()),
            precalc: PreCalc::new(backend),
            scene,
            grid,
            index: SpatialIndex::default(),
            state: PipelineState::SettingsDirty,
            generation: 1,
            precalc_generation: None,
            frame_index: 0,
        }
    }

    #[must_use]
    pub fn state(&self) -> PipelineState {
        self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn scene(&self) -> &SceneModel {
        &self.scene
    }

    #[must_use]
    pub fn grid(&self) -> &GridParams {
        &self.grid
    }

    /// Index produced by the most recent frame.
    #[must_use]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    /// Replaces the whole scene. Rotation history starts over.
    pub fn set_scene(&mut self, scene: SceneModel) {
        info!(
            spheres = scene.spheres.len(),
            objects = scene.objects.len(),
            "Scene replaced"
        );
        self.scene = scene;
        self.precalc.reset();
        self.mark_dirty();
    }

    pub fn set_grid(&mut self, grid: GridParams) {
        info!(chunks = grid.num_chunks_all(), "Grid replaced");
        self.grid = grid;
        self.mark_dirty();
    }

    /// Edits the scene in place, e.g. moving a rigid object.
    pub fn update_scene(&mut self, edit: impl FnOnce(&mut SceneModel)) {
        edit(&mut self.scene);
        self.mark_dirty();
    }

    fn mark_dirty(&mut self) {
        self.generation += 1;
        self.state = PipelineState::SettingsDirty;
    }

    /// Runs one frame: PreCalc if dirty, the full index rebuild, then the
    /// renderer. The accumulation counter in `ctx` advances after rendering.
    pub fn render_frame(
        &mut self,
        ctx: &mut FrameContext,
        renderer: &mut dyn Renderer,
    ) -> Result<FrameStats, PipelineError> {
        if ctx.take_camera_delta() {
            debug!("Camera moved");
            self.mark_dirty();
        }
        ctx.observe_generation(self.generation);

        let previous = self.state;
        self.state = PipelineState::Rebuilding;
        let rebuilt = self.rebuild();
        self.state = if rebuilt.is_ok() {
            PipelineState::Idle
        } else {
            previous
        };
        let (precalc_ran, rebuild) = rebuilt?;

        let stats = FrameStats {
            frame_index: self.frame_index,
            generation: self.generation,
            precalc_ran,
            occupied: rebuild.occupied,
            padded_len: rebuild.padded_len,
            sort_passes: rebuild.sort_passes,
            dropped: rebuild.dropped,
            frame_count: ctx.frame_count(),
        };

        let view = FrameView {
            scene: &self.scene,
            index: &self.index,
            grid: &self.grid,
            camera: ctx.camera,
            frame_count: ctx.frame_count(),
            frame_index: self.frame_index,
        };
        renderer.render(&view).map_err(PipelineError::Renderer)?;

        ctx.advance();
        self.frame_index += 1;
        debug!(
            frame = stats.frame_index,
            occupied = stats.occupied,
            passes = stats.sort_passes,
            "Frame complete"
        );
        Ok(stats)
    }

    fn rebuild(&mut self) -> Result<(bool, spatial::RebuildStats), PipelineError> {
        let precalc_ran = self.precalc_generation != Some(self.generation);
        if precalc_ran {
            self.precalc.run(&mut self.scene)?;
            self.precalc_generation = Some(self.generation);
        }

        let (index, stats) = self.index_builder.rebuild(&self.scene, &self.grid)?;
        self.index = index;
        Ok((precalc_ran, stats))
    }
}
