//! Scene: the owning context that ties the subsystems to one surface.
//!
//! The scene owns the drawing surface, the starfield, the burst emitter and
//! the frame clock. Subsystems never hold the surface themselves; they borrow
//! it for the duration of a draw. Within a frame the starfield (when
//! animated) draws first and every queued burst draws on top, in the order
//! the bursts were triggered.

use glam::Vec2;
use nebula_common::{NebulaResult, ScreenRect, SurfaceSize};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::burst::{BurstConfig, BurstEmitter};
use crate::frame_clock::{FrameClock, TaskId};
use crate::starfield::{Starfield, StarfieldConfig, StarfieldMode};
use crate::surface::DrawSurface;

/// Scene configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// RNG seed (None = random)
    pub seed: Option<u64>,
    /// Starfield settings
    pub starfield: StarfieldConfig,
    /// Burst settings
    pub burst: BurstConfig,
}

/// What happened during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frame number, starting at 1.
    pub frame: u64,
    /// Stars drawn this frame (0 in static mode).
    pub stars_drawn: usize,
    /// Burst tasks that ran.
    pub bursts_run: usize,
    /// Burst tasks that finished.
    pub bursts_finished: usize,
    /// Burst tasks still scheduled.
    pub bursts_pending: usize,
    /// Particles alive after the frame.
    pub live_particles: usize,
}

/// Owns the surface and drives both animation subsystems.
#[derive(Debug)]
pub struct Scene<S: DrawSurface> {
    surface: S,
    starfield: Starfield,
    emitter: BurstEmitter,
    clock: FrameClock,
}

impl<S: DrawSurface> Scene<S> {
    /// Builds a scene over `surface`. A static starfield is drawn immediately.
    pub fn new(mut surface: S, config: SceneConfig) -> NebulaResult<Self> {
        let mut root = match config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        let starfield_rng = fastrand::Rng::with_seed(root.u64(..));
        let emitter_rng = fastrand::Rng::with_seed(root.u64(..));

        let size = surface.size();
        let starfield = Starfield::new(size, config.starfield, starfield_rng)?;
        let emitter = BurstEmitter::new(config.burst, emitter_rng)?;

        if starfield.mode() == StarfieldMode::Static {
            starfield.draw_static(&mut surface);
        }

        info!("Scene ready at {}x{}", size.width(), size.height());

        Ok(Self {
            surface,
            starfield,
            emitter,
            clock: FrameClock::new(),
        })
    }

    /// Runs one frame.
    pub fn tick(&mut self) -> FrameReport {
        let stars_drawn = match self.starfield.mode() {
            StarfieldMode::Animated => self.starfield.render_frame(&mut self.surface),
            StarfieldMode::Static => 0,
        };

        let summary = self.clock.tick(&mut self.surface);

        let report = FrameReport {
            frame: self.clock.frame_number(),
            stars_drawn,
            bursts_run: summary.ran,
            bursts_finished: summary.finished.len(),
            bursts_pending: self.clock.pending(),
            live_particles: self.clock.live_entities(),
        };
        debug!(?report, "Frame complete");
        report
    }

    /// Starts a burst at `origin`.
    pub fn trigger_burst(&mut self, origin: Vec2) -> TaskId {
        self.emitter.emit(origin, &mut self.clock)
    }

    /// Starts a burst at the center of an activated button.
    pub fn on_button_activated(&mut self, button: &ScreenRect) -> TaskId {
        self.trigger_burst(button.center())
    }

    /// Resizes the surface and the starfield projection.
    pub fn resize(&mut self, size: SurfaceSize) {
        self.surface.resize(size);
        self.starfield.resize(size, &mut self.surface);
    }

    /// True when nothing will change on screen without a new trigger.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.starfield.mode() == StarfieldMode::Static && !self.clock.has_pending()
    }

    /// The drawing surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the drawing surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The starfield.
    #[must_use]
    pub fn starfield(&self) -> &Starfield {
        &self.starfield
    }

    /// The frame clock.
    #[must_use]
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Bursts emitted so far.
    #[must_use]
    pub fn bursts_emitted(&self) -> u64 {
        self.emitter.emitted()
    }

    /// Consumes the scene, returning the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }
}
