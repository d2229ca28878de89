use glam::{Mat4, Quat, Vec3};

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraTransform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for CameraTransform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl CameraTransform {
    #[must_use]
    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self { position, rotation }
    }

    /// Camera-to-world matrix.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

/// Per-viewer state carried across `render_frame` calls.
#[derive(Clone, Debug, Default)]
pub struct FrameContext {
    pub camera: CameraTransform,
    last_camera: Option<CameraTransform>,
    frame_count: u32,
    seen_generation: u64,
}

impl FrameContext {
    #[must_use]
    pub fn new(camera: CameraTransform) -> Self {
        Self {
            camera,
            ..Self::default()
        }
    }

    /// Frames accumulated since the last reset.
    #[must_use]
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Returns true when the camera differs from the one seen last frame and
    /// records the current camera as seen.
    pub(crate) fn take_camera_delta(&mut self) -> bool {
        let moved = self.last_camera.is_some_and(|last| last != self.camera);
        self.last_camera = Some(self.camera);
        moved
    }

    /// Resets accumulation when the scene generation moved on.
    pub(crate) fn observe_generation(&mut self, generation: u64) {
        if self.seen_generation != generation {
            self.seen_generation = generation;
            self.frame_count = 0;
        }
    }

    pub(crate) fn advance(&mut self) {
        self.frame_count = self.frame_count.wrapping_add(1);
    }
}
