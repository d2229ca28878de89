use crate::context::CameraTransform;
use scene::{GridParams, SceneModel};
use spatial::SpatialIndex;

/// Everything a renderer may read for one frame.
#[derive(Copy, Clone, Debug)]
pub struct FrameView<'a> {
    pub scene: &'a SceneModel,
    pub index: &'a SpatialIndex,
    pub grid: &'a GridParams,
    pub camera: CameraTransform,
    /// Progressive accumulation counter; zero right after any change.
    pub frame_count: u32,
    pub frame_index: u64,
}

/// Consumer of the rebuilt index, typically the ray marcher.
pub trait Renderer {
    fn render(&mut self, view: &FrameView<'_>) -> anyhow::Result<()>;
}

impl<F> Renderer for F
where
    F: FnMut(&FrameView<'_>) -> anyhow::Result<()>,
{
    fn render(&mut self, view: &FrameView<'_>) -> anyhow::Result<()> {
        self(view)
    }
}
