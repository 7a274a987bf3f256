//! Ember - ECS driver for the Ember engine
//!
//! Builds a demo scene on top of the ECS coordinator and runs it headless for
//! a configured number of frames, reporting what the systems produced.

mod scene;
mod settings;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use scene::{Scene, Triangle};
use settings::EmberSettings;

fn init_logging(settings: &EmberSettings) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log.level))
        .context("Invalid log filter")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(settings.log.targets)
        .try_init()
        .map_err(|e| anyhow::anyhow!(e))
        .context("Failed to set subscriber")
}

fn main() -> Result<()> {
    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let (settings, origin) = EmberSettings::load(path.as_deref());
    init_logging(&settings)?;
    origin.log();
    settings.validate()?;

    info!("Starting Ember ECS driver...");

    let mut scene = Scene::new(settings.scene.clone())?;
    let started = Instant::now();
    let mut triangles = 0;
    for frame in 0..settings.scene.frames {
        let stats = scene.step(frame)?;
        triangles += stats.triangles.len();
        if frame % 30 == 0 {
            let area: f32 = stats.triangles.iter().map(Triangle::area).sum();
            let metallic = stats
                .triangles
                .iter()
                .filter(|t| t.material.metallic > 0.5)
                .count();
            info!(
                frame,
                spun = stats.spun,
                triangles = stats.triangles.len(),
                area,
                metallic,
                live = scene.coordinator().object_count(),
                renderable = scene.coordinator().members(scene.renderable())?.len(),
                "frame"
            );
        }
    }

    let elapsed = started.elapsed();
    info!(
        frames = settings.scene.frames,
        triangles,
        live = scene.coordinator().object_count(),
        "Finished in {:.2?} ({:.1} us/frame)",
        elapsed,
        elapsed.as_secs_f64() * 1e6 / settings.scene.frames as f64
    );
    Ok(())
}
