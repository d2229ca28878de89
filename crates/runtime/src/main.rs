#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::unnecessary_wraps, clippy::cast_precision_loss)]

mod demo;
mod probe;
mod watcher;

use anyhow::{Context, Result};
use clap::Parser;
use frame::{CameraTransform, FrameContext, FramePipeline};
use glam::{Quat, Vec3};
use scene::SceneConfig;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Rebuilds the chunk lookup of a ray-marched scene every frame and probes
/// it with a camera ray.
#[derive(Parser, Debug)]
#[command(name = "runtime_main")]
struct Args {
    /// JSON scene description. The built-in demo scene is used when omitted.
    #[arg(long)]
    scene: Option<PathBuf>,

    /// Number of frames to run.
    #[arg(long, default_value_t = 120)]
    frames: u64,

    /// Orbit the camera around the grid centre, one step per frame.
    #[arg(long)]
    orbit: bool,

    /// Reload the scene file whenever it changes on disk.
    #[arg(long, requires = "scene")]
    watch: bool,

    /// Log a probe summary every N frames.
    #[arg(long, default_value_t = 30)]
    log_every: u64,
}

fn load_config(path: Option<&Path>) -> Result<SceneConfig> {
    match path {
        Some(path) => {
            tracing::info!("Loading scene from {:?}", path);
            SceneConfig::from_path(path).with_context(|| format!("failed to load {}", path.display()))
        }
        None => {
            tracing::info!("No scene given; using the built-in demo scene.");
            Ok(demo::scene())
        }
    }
}

/// Camera on a horizontal circle around `center`, looking at it.
fn orbit_camera(center: Vec3, radius: f32, angle: f32) -> CameraTransform {
    let position = center + Vec3::new(angle.sin() * radius, radius * 0.25, -angle.cos() * radius);
    let forward = (center - position).normalize_or_zero();
    CameraTransform::new(position, Quat::from_rotation_arc(Vec3::Z, forward))
}

fn reload(pipeline: &mut FramePipeline, path: &Path) {
    match SceneConfig::from_path(path).and_then(|config| config.validate()) {
        Ok((scene, grid)) => {
            pipeline.set_scene(scene);
            pipeline.set_grid(grid);
        }
        Err(e) => tracing::error!("Scene reload rejected, keeping previous scene: {e}"),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let config = load_config(args.scene.as_deref())?;
    let (scene, grid) = config.validate().context("invalid scene configuration")?;

    let center = (grid.min_world_bounds() + grid.max_world_bounds()) * 0.5;
    let radius = (grid.max_world_bounds() - grid.min_world_bounds()).max_element();
    let mut ctx = FrameContext::new(orbit_camera(center, radius, 0.0));

    let mut pipeline = FramePipeline::new(compute::default_backend(), scene, grid);
    let mut renderer = probe::ProbeRenderer::new(args.log_every);

    let scene_watcher = match (&args.scene, args.watch) {
        (Some(path), true) => match watcher::start(path) {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("Failed to start scene watcher: {e:?}");
                None
            }
        },
        _ => None,
    };

    tracing::info!(
        "Starting frame loop for {} frames (orbit: {})...",
        args.frames,
        args.orbit
    );
    let mut precalc_runs = 0u64;
    let mut dropped_total = 0u64;
    for frame in 0..args.frames {
        if let (Some((_, changes)), Some(path)) = (&scene_watcher, &args.scene) {
            if changes.try_iter().count() > 0 {
                tracing::info!("Scene file changed; reloading.");
                reload(&mut pipeline, path);
            }
        }
        if args.orbit {
            ctx.camera = orbit_camera(center, radius, frame as f32 * 0.05);
        }

        let stats = pipeline
            .render_frame(&mut ctx, &mut renderer)
            .with_context(|| format!("frame {frame} failed"))?;
        precalc_runs += u64::from(stats.precalc_ran);
        dropped_total += u64::from(stats.dropped);
    }

    tracing::info!(
        frames = renderer.frames,
        precalc_runs,
        dropped_total,
        last_hits = renderer.last_hits,
        "Frame loop finished."
    );
    Ok(())
}
