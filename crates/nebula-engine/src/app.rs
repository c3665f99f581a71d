//! Headless host: plays scripted page events against a raster scene.
//!
//! The host stands in for the page controller. It owns a [`Scene`] over a
//! [`PixelSurface`], feeds it the configured button activations and resizes
//! on their frames, ticks the frame clock, and optionally writes a PNG
//! snapshot of one frame.

use std::path::PathBuf;

use nebula_common::{NebulaResult, SurfaceSize};
use nebula_kernel::raster::PixelSurface;
use nebula_kernel::scene::Scene;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::snapshot;

/// Outcome of a headless run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Frames ticked
    pub frames: u64,
    /// Bursts triggered
    pub bursts: u64,
    /// Most particles alive after any single frame
    pub peak_particles: usize,
    /// Snapshot written, if any
    pub snapshot: Option<PathBuf>,
}

/// Headless application state.
#[derive(Debug)]
pub struct HeadlessApp {
    config: EngineConfig,
    scene: Scene<PixelSurface>,
}

impl HeadlessApp {
    /// Builds the scene described by `config`.
    pub fn new(config: EngineConfig) -> NebulaResult<Self> {
        let surface = PixelSurface::new(config.surface_size()?);
        let scene = Scene::new(surface, config.scene.clone())?;
        Ok(Self { config, scene })
    }

    /// The running scene.
    #[must_use]
    pub fn scene(&self) -> &Scene<PixelSurface> {
        &self.scene
    }

    fn apply_events(&mut self, frame: u64) -> NebulaResult<()> {
        for resize in self.config.resizes.iter().filter(|r| r.frame == frame) {
            let size = SurfaceSize::new(resize.width, resize.height)?;
            self.scene.resize(size);
        }

        for activation in self.config.activations.iter().filter(|a| a.frame == frame) {
            let task = self.scene.on_button_activated(&activation.button);
            debug!("Frame {frame}: button activated, burst task {}", task.raw());
        }
        Ok(())
    }

    fn snapshot(&self) -> NebulaResult<Option<PathBuf>> {
        match &self.config.snapshot_path {
            Some(path) => {
                snapshot::write_png(self.scene.surface(), path)?;
                Ok(Some(path.clone()))
            },
            None => Ok(None),
        }
    }

    /// Runs frames until the frame cap, or until idle with no events left.
    pub fn run(&mut self) -> NebulaResult<RunSummary> {
        let mut summary = RunSummary::default();
        let last_event = self.config.last_event_frame().unwrap_or(0);

        for frame in 1..=self.config.max_frames {
            self.apply_events(frame)?;

            let report = self.scene.tick();
            summary.frames = report.frame;
            summary.peak_particles = summary.peak_particles.max(report.live_particles);

            if self.config.snapshot_frame == Some(frame) {
                summary.snapshot = self.snapshot()?;
            }

            if self.config.stop_when_idle && frame >= last_event && self.scene.is_idle() {
                info!("Scene idle after frame {frame}");
                break;
            }
        }

        match self.config.snapshot_frame {
            None => summary.snapshot = self.snapshot()?,
            Some(frame) if summary.snapshot.is_none() && self.config.snapshot_path.is_some() => {
                warn!(
                    "Run ended at frame {} before snapshot frame {frame}, writing final frame",
                    summary.frames
                );
                summary.snapshot = self.snapshot()?;
            },
            Some(_) => {},
        }

        summary.bursts = self.scene.bursts_emitted();
        info!(
            "Ran {} frames, {} bursts, peak {} particles",
            summary.frames, summary.bursts, summary.peak_particles
        );
        Ok(summary)
    }
}

/// Builds and runs a headless app.
pub fn run(config: EngineConfig) -> NebulaResult<RunSummary> {
    HeadlessApp::new(config)?.run()
}
