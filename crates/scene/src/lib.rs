#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::cast_possible_truncation,
    clippy::missing_errors_doc,
    clippy::cast_possible_wrap,
    clippy::cast_precision_loss
)]
//! # Scene
//!
//! Host-side scene description for the spatial index rebuild.
//!
//! -   **Primitives:** [`Sphere`], [`Triangle`] grouped under a
//!     [`RigidObject`], and their [`Material`]s, held together by a
//!     [`SceneModel`].
//! -   **Grid:** [`GridParams`] carries the validated world bounds, cell size
//!     and capacity multiplier, and implements the chunk-key formula the
//!     renderer replicates to query the index.
//! -   **Authoring:** [`SceneConfig`] is the JSON form of a scene.
//!     [`SceneConfig::validate`] turns it into a model and grid, rejecting
//!     bad configurations before any rebuild runs.

pub mod config;
pub mod error;
pub mod grid;
pub mod model;
pub mod types;

pub use config::{GridConfig, SceneConfig};
pub use error::ConfigError;
pub use grid::{next_pow2, GridParams};
pub use model::{PrimitiveRef, SceneModel};
pub use types::{Material, RigidObject, Sphere, Triangle};
