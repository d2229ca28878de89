#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! # Frame
//!
//! Per-frame orchestration of the spatial index rebuild.
//!
//! [`FramePipeline::render_frame`] runs PreCalc when the scene changed,
//! rebuilds the [`spatial::SpatialIndex`] unconditionally and then hands a
//! read-only [`FrameView`] to a [`Renderer`]. Camera state and the
//! progressive accumulation counter travel in an explicit [`FrameContext`].

pub mod context;
pub mod error;
pub mod pipeline;
pub mod precalc;
pub mod renderer;

pub use context::{CameraTransform, FrameContext};
pub use error::PipelineError;
pub use pipeline::{FramePipeline, FrameStats, PipelineState};
pub use precalc::PreCalc;
pub use renderer::{FrameView, Renderer};
