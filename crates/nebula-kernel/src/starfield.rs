//! Field renderer: a constant population of stars flying toward the viewer.
//!
//! Stars live in a pseudo-3D box `[0,W) x [0,H) x (0,W]` and are projected
//! onto the surface with a perspective divide by depth. Each update moves
//! every star closer; a star that passes the viewer is re-seeded at the far
//! plane, so the population never changes size.
//!
//! The field can be drawn two ways, chosen by [`StarfieldMode`]:
//! - `Static`: one flat draw of the raw star positions, repeated only on
//!   resize.
//! - `Animated`: every frame clears the background, updates, and draws the
//!   projected stars with twinkle and motion trails.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};
use nebula_common::{ConfigError, NebulaResult, Rgba, SurfaceSize, BACKGROUND, STAR_PALETTE};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::surface::{DrawSurface, Glow};

/// How the starfield is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StarfieldMode {
    /// Drawn once at start-up and on resize.
    #[default]
    Static,
    /// Updated and redrawn every frame.
    Animated,
}

/// Starfield tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Rendering mode
    pub mode: StarfieldMode,
    /// Number of stars
    pub star_count: usize,
    /// Upper bound of star size (lower bound is 0)
    pub size_max: f32,
    /// Lower bound of depth speed per frame
    pub speed_min: f32,
    /// Upper bound of depth speed per frame
    pub speed_max: f32,
    /// Twinkle phase advance per frame, radians
    pub twinkle_step: f32,
    /// Trail length as a fraction divisor of the projected offset
    pub trail_divisor: f32,
    /// Background fill color
    pub background: Rgba,
    /// Star colors
    pub palette: Vec<Rgba>,
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            mode: StarfieldMode::Static,
            star_count: 100,
            size_max: 3.0,
            speed_min: 0.3,
            speed_max: 1.1,
            twinkle_step: 0.05,
            trail_divisor: 40.0,
            background: BACKGROUND,
            palette: STAR_PALETTE.to_vec(),
        }
    }
}

impl StarfieldConfig {
    /// Checks that the configuration can produce a valid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.palette.is_empty() {
            return Err(ConfigError::Invalid {
                field: "starfield.palette",
                reason: "must contain at least one color".into(),
            });
        }
        if !(self.speed_min > 0.0 && self.speed_max >= self.speed_min) {
            return Err(ConfigError::Invalid {
                field: "starfield.speed_min",
                reason: format!(
                    "speed range {}..{} must be positive and ordered",
                    self.speed_min, self.speed_max
                ),
            });
        }
        if self.trail_divisor <= 0.0 {
            return Err(ConfigError::Invalid {
                field: "starfield.trail_divisor",
                reason: "must be positive".into(),
            });
        }
        Ok(())
    }
}

/// One star.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Star {
    /// x, y in surface space; z is depth in (0, W].
    pub position: Vec3,
    /// Unprojected radius.
    pub size: f32,
    /// Depth decrement per frame.
    pub speed: f32,
    /// Draw color.
    pub color: Rgba,
    /// Twinkle phase, radians.
    pub twinkle: f32,
}

impl Star {
    fn random(rng: &mut fastrand::Rng, size: SurfaceSize, config: &StarfieldConfig) -> Self {
        let w = size.width_f32();
        let mut z = rng.f32() * w;
        if z <= 0.0 {
            z = w;
        }
        Self {
            position: Vec3::new(rng.f32() * w, rng.f32() * size.height_f32(), z),
            size: rng.f32() * config.size_max,
            speed: config.speed_min + rng.f32() * (config.speed_max - config.speed_min),
            color: config.palette[rng.usize(..config.palette.len())],
            twinkle: rng.f32() * TAU,
        }
    }

    /// Twinkle brightness in 0..=1.
    #[must_use]
    pub fn twinkle_level(&self) -> f32 {
        (self.twinkle.sin() + 1.0) / 2.0
    }
}

/// A star mapped to screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Screen position.
    pub point: Vec2,
    /// Offset of the screen position from the surface center.
    pub offset: Vec2,
    /// Scaled radius.
    pub radius: f32,
}

/// Projects a star onto a surface of the given size.
///
/// `point = center + (xy - center) * (W / z)`, radius scaled by the same
/// factor. Pure: the result depends only on the arguments.
#[must_use]
pub fn project(star: &Star, size: SurfaceSize) -> Projection {
    let center = size.center();
    let scale = size.width_f32() / star.position.z;
    let offset = (star.position.truncate() - center) * scale;
    Projection {
        point: center + offset,
        offset,
        radius: star.size * scale,
    }
}

/// The star population and its surface dimensions.
#[derive(Debug)]
pub struct Starfield {
    stars: Vec<Star>,
    size: SurfaceSize,
    config: StarfieldConfig,
    rng: fastrand::Rng,
}

impl Starfield {
    /// Creates `config.star_count` random stars for a surface of `size`.
    pub fn new(size: SurfaceSize, config: StarfieldConfig, mut rng: fastrand::Rng) -> NebulaResult<Self> {
        config.validate()?;
        let stars = (0..config.star_count)
            .map(|_| Star::random(&mut rng, size, &config))
            .collect();

        info!(
            "Created starfield with {} stars ({:?} mode) for {}x{}",
            config.star_count,
            config.mode,
            size.width(),
            size.height()
        );

        Ok(Self {
            stars,
            size,
            config,
            rng,
        })
    }

    /// Creates a starfield with a deterministic seed.
    pub fn with_seed(size: SurfaceSize, config: StarfieldConfig, seed: u64) -> NebulaResult<Self> {
        Self::new(size, config, fastrand::Rng::with_seed(seed))
    }

    /// All stars.
    #[must_use]
    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Number of stars.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stars.len()
    }

    /// Whether the field has no stars.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stars.is_empty()
    }

    /// Current surface dimensions used for projection.
    #[must_use]
    pub const fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Rendering mode.
    #[must_use]
    pub const fn mode(&self) -> StarfieldMode {
        self.config.mode
    }

    /// Moves every star one frame closer and advances its twinkle.
    pub fn update(&mut self) {
        let w = self.size.width_f32();
        let mut recycled = 0usize;

        for i in 0..self.stars.len() {
            let star = &mut self.stars[i];
            star.position.z -= star.speed;
            star.twinkle += self.config.twinkle_step;

            if star.position.z <= 0.0 {
                let mut fresh = Star::random(&mut self.rng, self.size, &self.config);
                fresh.position.z = w;
                self.stars[i] = fresh;
                recycled += 1;
            }
        }

        if recycled > 0 {
            debug!("Recycled {recycled} stars to the far plane");
        }
    }

    /// Draws the projected stars with glow and trails. Returns how many were visible.
    pub fn draw(&self, surface: &mut dyn DrawSurface) -> usize {
        let mut drawn = 0;

        for star in &self.stars {
            let projection = project(star, self.size);
            if !self.size.contains(projection.point) {
                continue;
            }

            let level = star.twinkle_level();
            surface.set_glow(Some(Glow::new(15.0 + level * 10.0, star.color)));
            surface.set_global_alpha(0.6 + level * 0.4);
            surface.fill_circle(projection.point, projection.radius, star.color);

            let trail_end = projection.point + projection.offset / self.config.trail_divisor;
            surface.set_glow(Some(Glow::new(20.0, star.color)));
            surface.set_global_alpha(0.5);
            surface.stroke_line(
                projection.point,
                trail_end,
                projection.radius / 1.5,
                star.color,
            );

            drawn += 1;
        }

        surface.reset_style();
        drawn
    }

    /// Fills the background and draws every star flat at its raw position.
    pub fn draw_static(&self, surface: &mut dyn DrawSurface) -> usize {
        surface.fill_surface(self.config.background);

        for star in &self.stars {
            surface.set_glow(Some(Glow::new(5.0, star.color)));
            surface.set_global_alpha(0.8);
            surface.fill_circle(star.position.truncate(), star.size, star.color);
        }

        surface.reset_style();
        self.stars.len()
    }

    /// One animated frame: clear, update, draw. Returns visible star count.
    pub fn render_frame(&mut self, surface: &mut dyn DrawSurface) -> usize {
        surface.fill_surface(self.config.background);
        self.update();
        self.draw(surface)
    }

    /// Adopts new surface dimensions and redraws.
    ///
    /// Stored star state is untouched; only later projections see the new size.
    pub fn resize(&mut self, size: SurfaceSize, surface: &mut dyn DrawSurface) {
        info!(
            "Starfield resized {}x{} -> {}x{}",
            self.size.width(),
            self.size.height(),
            size.width(),
            size.height()
        );
        self.size = size;

        match self.config.mode {
            StarfieldMode::Static => {
                self.draw_static(surface);
            },
            StarfieldMode::Animated => {
                surface.fill_surface(self.config.background);
                self.draw(surface);
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::{DrawCommand, RecordingSurface};
    use proptest::prelude::*;

    fn size(w: u32, h: u32) -> SurfaceSize {
        SurfaceSize::new(w, h).expect("valid size")
    }

    fn field(seed: u64) -> Starfield {
        Starfield::with_seed(size(800, 600), StarfieldConfig::default(), seed).expect("valid field")
    }

    #[test]
    fn test_initial_population() {
        let f = field(1);
        assert_eq!(f.len(), 100);
        for star in f.stars() {
            assert!(star.position.x >= 0.0 && star.position.x < 800.0);
            assert!(star.position.y >= 0.0 && star.position.y < 600.0);
            assert!(star.position.z > 0.0 && star.position.z <= 800.0);
            assert!(star.size >= 0.0 && star.size < 3.0);
            assert!(star.speed >= 0.3 && star.speed < 1.1);
            assert!(STAR_PALETTE.contains(&star.color));
            assert!(star.twinkle >= 0.0 && star.twinkle < TAU);
        }
    }

    #[test]
    fn test_update_advances_depth_and_twinkle() {
        let mut f = field(2);
        f.stars[0].position.z = 500.0;
        f.stars[0].speed = 1.0;
        let before = f.stars()[0];
        f.update();
        let after = f.stars()[0];
        assert!((after.position.z - 499.0).abs() < 1e-4);
        assert!((after.twinkle - (before.twinkle + 0.05)).abs() < 1e-5);
        assert_eq!(after.position.truncate(), before.position.truncate());
    }

    #[test]
    fn test_star_passing_viewer_is_recycled_at_far_plane() {
        let mut f = field(3);
        f.stars[0].position.z = 0.1;
        f.stars[0].speed = 0.5;
        f.update();
        assert!((f.stars()[0].position.z - 800.0).abs() < f32::EPSILON);
        assert_eq!(f.len(), 100);
    }

    #[test]
    fn test_projection_math() {
        let star = Star {
            position: Vec3::new(500.0, 400.0, 400.0),
            size: 2.0,
            speed: 1.0,
            color: Rgba::WHITE,
            twinkle: 0.0,
        };
        let p = project(&star, size(800, 600));
        // scale = 800 / 400 = 2
        assert_eq!(p.offset, Vec2::new(200.0, 200.0));
        assert_eq!(p.point, Vec2::new(600.0, 500.0));
        assert!((p.radius - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_draw_culls_offscreen_stars() {
        let mut f = field(4);
        f.stars.truncate(2);
        // On screen: dead center.
        f.stars[0].position = Vec3::new(400.0, 300.0, 400.0);
        // Off screen after projection: far corner, very close to the viewer.
        f.stars[1].position = Vec3::new(790.0, 590.0, 1.0);

        let mut surface = RecordingSurface::new(f.size());
        assert_eq!(f.draw(&mut surface), 1);
        assert_eq!(surface.circle_count(), 1);
        assert_eq!(surface.line_count(), 1);
    }

    #[test]
    fn test_draw_styles_follow_twinkle() {
        let mut f = field(5);
        f.stars.truncate(1);
        // Depth at half the width doubles the offset from center.
        f.stars[0].position = Vec3::new(500.0, 350.0, 400.0);
        f.stars[0].size = 3.0;
        f.stars[0].twinkle = std::f32::consts::FRAC_PI_2; // level 1.0

        let mut surface = RecordingSurface::new(f.size());
        f.draw(&mut surface);
        let draws = surface.draws();

        assert!((draws[0].alpha - 1.0).abs() < 1e-5);
        assert!((draws[0].glow.expect("glow").blur - 25.0).abs() < 1e-4);
        assert!((draws[1].alpha - 0.5).abs() < 1e-5);
        assert!((draws[1].glow.expect("glow").blur - 20.0).abs() < 1e-5);
        match draws[1].command {
            DrawCommand::StrokeLine { from, to, width, .. } => {
                assert!((from - Vec2::new(600.0, 400.0)).length() < 1e-3);
                assert!((to - Vec2::new(605.0, 402.5)).length() < 1e-3);
                assert!((width - 4.0).abs() < 1e-4);
            },
            _ => panic!("expected a trail line"),
        }
        assert!((surface.global_alpha() - 1.0).abs() < f32::EPSILON);
        assert!(surface.glow().is_none());
    }

    #[test]
    fn test_static_draw() {
        let f = field(6);
        let mut surface = RecordingSurface::new(f.size());
        assert_eq!(f.draw_static(&mut surface), 100);

        let draws = surface.draws();
        assert!(matches!(
            draws[0].command,
            DrawCommand::FillRect { color, .. } if color == BACKGROUND
        ));
        assert_eq!(surface.circle_count(), 100);
        assert!(draws[1..].iter().all(|d| (d.alpha - 0.8).abs() < 1e-5));
        if let DrawCommand::FillCircle { center, radius, .. } = draws[1].command {
            assert_eq!(center, f.stars()[0].position.truncate());
            assert!((radius - f.stars()[0].size).abs() < f32::EPSILON);
        } else {
            panic!("expected a circle");
        }
    }

    #[test]
    fn test_resize_keeps_star_state() {
        let mut f = field(7);
        let before: Vec<Star> = f.stars().to_vec();
        let sample = before[0];
        let old_projection = project(&sample, f.size());

        let mut surface = RecordingSurface::new(f.size());
        f.resize(size(1024, 768), &mut surface);

        assert_eq!(f.stars(), before.as_slice());
        assert_eq!(f.size(), size(1024, 768));
        assert_ne!(project(&sample, f.size()), old_projection);
        // Static mode redraws the flat frame.
        assert_eq!(surface.rect_count(), 1);
        assert_eq!(surface.circle_count(), 100);
    }

    #[test]
    fn test_narrowing_resize_keeps_old_depths_until_recycled() {
        let mut f = field(8);
        f.stars[0].position.z = 0.5;
        f.stars[0].speed = 1.0;

        let mut surface = RecordingSurface::new(size(200, 150));
        f.resize(size(200, 150), &mut surface);
        f.update();

        // The recycled star starts at the new far plane.
        assert!((f.stars()[0].position.z - 200.0).abs() < f32::EPSILON);
        // The rest keep depths from the old width.
        assert!(f.stars().iter().all(|s| s.position.z > 0.0 && s.position.z <= 800.0));
        assert!(f.stars().iter().any(|s| s.position.z > 200.0));
    }

    #[test]
    fn test_animated_frame_clears_first() {
        let config = StarfieldConfig {
            mode: StarfieldMode::Animated,
            ..StarfieldConfig::default()
        };
        let mut f = Starfield::with_seed(size(640, 480), config, 8).expect("valid field");
        let mut surface = RecordingSurface::new(f.size());
        let drawn = f.render_frame(&mut surface);

        assert!(matches!(surface.draws()[0].command, DrawCommand::FillRect { .. }));
        assert_eq!(surface.circle_count(), drawn);
        assert_eq!(surface.line_count(), drawn);
    }

    #[test]
    fn test_empty_palette_rejected() {
        let config = StarfieldConfig {
            palette: Vec::new(),
            ..StarfieldConfig::default()
        };
        assert!(Starfield::with_seed(size(10, 10), config, 0).is_err());
    }

    #[test]
    fn test_config_from_toml() {
        let config: StarfieldConfig =
            toml::from_str("mode = \"animated\"\nstar_count = 12\npalette = [\"#ffffff\"]")
                .expect("valid toml");
        assert_eq!(config.mode, StarfieldMode::Animated);
        assert_eq!(config.star_count, 12);
        assert_eq!(config.palette, vec![Rgba::WHITE]);
        assert!((config.twinkle_step - 0.05).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn depth_stays_in_range_and_population_constant(
            seed in any::<u64>(),
            steps in 0usize..1500,
            width in 1u32..2000,
            height in 1u32..2000,
        ) {
            let mut f = Starfield::with_seed(size(width, height), StarfieldConfig::default(), seed)
                .expect("valid field");
            let w = width as f32;
            for _ in 0..steps {
                f.update();
            }
            prop_assert_eq!(f.len(), 100);
            for star in f.stars() {
                prop_assert!(star.position.z > 0.0, "depth {} not positive", star.position.z);
                prop_assert!(star.position.z <= w, "depth {} beyond {}", star.position.z, w);
            }
        }

        #[test]
        fn projection_is_deterministic(
            x in 0.0f32..1000.0,
            y in 0.0f32..1000.0,
            z in 0.01f32..1000.0,
            star_size in 0.0f32..3.0,
        ) {
            let star = Star {
                position: Vec3::new(x, y, z),
                size: star_size,
                speed: 1.0,
                color: Rgba::WHITE,
                twinkle: 0.0,
            };
            let s = size(1000, 700);
            prop_assert_eq!(project(&star, s), project(&star, s));
        }
    }
}
