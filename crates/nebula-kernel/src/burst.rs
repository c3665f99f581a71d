//! Burst emitter: short-lived star-shaped particle bursts.
//!
//! Each trigger creates a [`ParticleBatch`] and hands it to the frame clock
//! as a [`BurstTask`]. The task steps and draws its own particles every
//! frame and finishes once the batch is empty, so a burst always runs to
//! natural completion and never touches another burst's particles.
//!
//! # Example
//!
//! ```
//! use glam::Vec2;
//! use nebula_common::SurfaceSize;
//! use nebula_kernel::burst::{BurstConfig, BurstEmitter};
//! use nebula_kernel::frame_clock::FrameClock;
//! use nebula_kernel::surface::RecordingSurface;
//!
//! let mut clock = FrameClock::new();
//! let mut emitter = BurstEmitter::with_seed(BurstConfig::default(), 7).unwrap();
//! let mut surface = RecordingSurface::new(SurfaceSize::new(640, 480).unwrap());
//!
//! emitter.emit(Vec2::new(320.0, 240.0), &mut clock);
//! while clock.has_pending() {
//!     clock.tick(&mut surface);
//! }
//! assert_eq!(clock.frame_number(), 60);
//! ```

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use nebula_common::{ConfigError, NebulaResult, Rgba, BURST_PALETTE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::frame_clock::{FrameClock, FrameTask, TaskId, TaskStatus};
use crate::surface::{DrawSurface, Glow, Transform};

/// Burst tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BurstConfig {
    /// Particles per burst
    pub particle_count: usize,
    /// Starting life of every particle
    pub initial_life: f32,
    /// Life lost per frame
    pub life_step: f32,
    /// Initial velocity is uniform in `[-spread, spread]` per axis
    pub velocity_spread: f32,
    /// Minimum particle radius
    pub size_min: f32,
    /// Maximum particle radius (exclusive)
    pub size_max: f32,
    /// Angular velocity is uniform in `[-spin_max, spin_max)`
    pub spin_max: f32,
    /// Added to vertical velocity every frame
    pub gravity: f32,
    /// Horizontal velocity multiplier every frame
    pub friction: f32,
    /// Glow blur radius
    pub glow_blur: f32,
    /// Particle colors
    pub palette: Vec<Rgba>,
}

impl Default for BurstConfig {
    fn default() -> Self {
        Self {
            particle_count: 25,
            initial_life: 120.0,
            life_step: 2.0,
            velocity_spread: 7.5,
            size_min: 2.0,
            size_max: 6.0,
            spin_max: 0.15,
            gravity: 0.3,
            friction: 0.99,
            glow_blur: 20.0,
            palette: BURST_PALETTE.to_vec(),
        }
    }
}

impl BurstConfig {
    /// Checks that bursts built from this config terminate and can be drawn.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid {
                field: "burst.palette",
                reason: "must contain at least one color".into(),
            });
        }
        if self.initial_life <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "burst.initial_life",
                reason: "must be positive".into(),
            });
        }
        if self.life_step <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "burst.life_step",
                reason: "must be positive or bursts never end".into(),
            });
        }
        if self.size_max < self.size_min {
            return Err(ConfigError::Invalid {
                field: "burst.size_max",
                reason: format!("{} is below size_min {}", self.size_max, self.size_min),
            });
        }
        Ok(())
    }

    /// Per-frame physics shared by every particle of a batch.
    #[must_use]
    pub fn physics(&self) -> BurstPhysics {
        BurstPhysics {
            initial_life: self.initial_life,
            life_step: self.life_step,
            gravity: self.gravity,
            friction: self.friction,
            glow_blur: self.glow_blur,
        }
    }
}

/// Per-frame constants for a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BurstPhysics {
    /// Life at spawn; alpha is `life / initial_life`.
    pub initial_life: f32,
    /// Life lost per frame.
    pub life_step: f32,
    /// Downward velocity added per frame.
    pub gravity: f32,
    /// Horizontal damping factor per frame.
    pub friction: f32,
    /// Glow blur radius.
    pub glow_blur: f32,
}

impl Default for BurstPhysics {
    fn default() -> Self {
        BurstConfig::default().physics()
    }
}

/// A single burst particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    /// Position.
    pub position: Vec2,
    /// Velocity per frame.
    pub velocity: Vec2,
    /// Remaining life; removed at or below zero.
    pub life: f32,
    /// Outer radius of the star shape.
    pub size: f32,
    /// Rotation, radians.
    pub rotation: f32,
    /// Rotation per frame.
    pub spin: f32,
    /// Fill and glow color.
    pub color: Rgba,
}

impl Particle {
    /// Advances one frame.
    pub fn step(&mut self, physics: &BurstPhysics) {
        self.position += self.velocity;
        self.life -= physics.life_step;
        self.velocity.y += physics.gravity;
        self.velocity.x *= physics.friction;
        self.rotation += self.spin;
    }

    /// Whether the particle still has life left.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.life > 0.0
    }

    /// Opacity from remaining life.
    #[must_use]
    pub fn alpha(&self, physics: &BurstPhysics) -> f32 {
        (self.life / physics.initial_life).clamp(0.0, 1.0)
    }
}

/// Points of a five-pointed star, tip up, outer radius `size`, inner `size / 2`.
#[must_use]
pub fn star_polygon(size: f32) -> [Vec2; 10] {
    std::array::from_fn(|i| {
        let angle = i as f32 * PI / 5.0 - PI / 2.0;
        let radius = if i % 2 == 0 { size } else { size / 2.0 };
        Vec2::from_angle(angle) * radius
    })
}

/// One cohort of particles created by a single trigger.
#[derive(Debug, Clone)]
pub struct ParticleBatch {
    particles: Vec<Particle>,
    physics: BurstPhysics,
    steps: u32,
}

impl ParticleBatch {
    /// Wraps already-built particles.
    #[must_use]
    pub fn from_particles(particles: Vec<Particle>, physics: BurstPhysics) -> Self {
        Self {
            particles,
            physics,
            steps: 0,
        }
    }

    /// Live particles.
    #[must_use]
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Number of live particles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Whether every particle has expired.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Frames stepped so far.
    #[must_use]
    pub const fn steps(&self) -> u32 {
        self.steps
    }

    /// Steps every particle once, then drops the expired ones.
    ///
    /// Returns how many particles expired.
    pub fn step(&mut self) -> usize {
        for particle in &mut self.particles {
            particle.step(&self.physics);
        }
        let before = self.particles.len();
        self.particles.retain(Particle::is_alive);
        self.steps += 1;
        before - self.particles.len()
    }

    /// Draws every live particle as a rotated, glowing star.
    pub fn draw(&self, surface: &mut dyn DrawSurface) {
        for particle in &self.particles {
            surface.set_global_alpha(particle.alpha(&self.physics));
            surface.set_glow(Some(Glow::new(self.physics.glow_blur, particle.color)));
            surface.fill_polygon(
                &star_polygon(particle.size),
                Transform::new(particle.position, particle.rotation),
                particle.color,
            );
        }
        surface.reset_style();
    }
}

/// Frame task that animates one batch until it is empty.
#[derive(Debug)]
pub struct BurstTask {
    label: String,
    batch: ParticleBatch,
}

impl BurstTask {
    /// Creates a task for a batch.
    #[must_use]
    pub fn new(label: impl Into<String>, batch: ParticleBatch) -> Self {
        Self {
            label: label.into(),
            batch,
        }
    }

    /// The batch being animated.
    #[must_use]
    pub fn batch(&self) -> &ParticleBatch {
        &self.batch
    }
}

impl FrameTask for BurstTask {
    fn name(&self) -> &str {
        &self.label
    }

    fn on_frame(&mut self, surface: &mut dyn DrawSurface) -> TaskStatus {
        self.batch.step();
        self.batch.draw(surface);
        if self.batch.is_empty() {
            TaskStatus::Finished
        } else {
            TaskStatus::Continue
        }
    }

    fn live_entities(&self) -> usize {
        self.batch.len()
    }
}

/// Spawns particle batches on demand.
#[derive(Debug)]
pub struct BurstEmitter {
    config: BurstConfig,
    rng: fastrand::Rng,
    emitted: u64,
}

impl BurstEmitter {
    /// Creates an emitter.
    pub fn new(config: BurstConfig, rng: fastrand::Rng) -> NebulaResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            rng,
            emitted: 0,
        })
    }

    /// Creates an emitter with a deterministic seed.
    pub fn with_seed(config: BurstConfig, seed: u64) -> NebulaResult<Self> {
        Self::new(config, fastrand::Rng::with_seed(seed))
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &BurstConfig {
        &self.config
    }

    /// Number of bursts emitted so far.
    #[must_use]
    pub const fn emitted(&self) -> u64 {
        self.emitted
    }

    fn symmetric(&mut self, extent: f32) -> f32 {
        (self.rng.f32() - 0.5) * 2.0 * extent
    }

    /// Builds a fresh batch at `origin` without scheduling it.
    pub fn spawn(&mut self, origin: Vec2) -> ParticleBatch {
        let spread = self.config.velocity_spread;
        let spin_max = self.config.spin_max;
        let (size_min, size_max) = (self.config.size_min, self.config.size_max);

        let particles = (0..self.config.particle_count)
            .map(|_| {
                let velocity = Vec2::new(self.symmetric(spread), self.symmetric(spread));
                let size = size_min + self.rng.f32() * (size_max - size_min);
                let rotation = self.rng.f32() * TAU;
                let spin = self.symmetric(spin_max);
                let color = self.config.palette[self.rng.usize(..self.config.palette.len())];
                Particle {
                    position: origin,
                    velocity,
                    life: self.config.initial_life,
                    size,
                    rotation,
                    spin,
                    color,
                }
            })
            .collect();

        ParticleBatch::from_particles(particles, self.config.physics())
    }

    /// Spawns a batch at `origin` and schedules it on the clock.
    pub fn emit(&mut self, origin: Vec2, clock: &mut FrameClock) -> TaskId {
        let batch = self.spawn(origin);
        self.emitted += 1;
        debug!(
            "Burst #{} of {} particles at ({:.1}, {:.1})",
            self.emitted,
            batch.len(),
            origin.x,
            origin.y
        );
        clock.request_frame(Box::new(BurstTask::new(
            format!("burst #{}", self.emitted),
            batch,
        )))
    }
}
