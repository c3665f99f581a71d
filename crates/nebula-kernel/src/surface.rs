//! The 2D drawing surface both subsystems paint onto.
//!
//! [`DrawSurface`] mirrors the subset of a canvas 2D context the animation
//! needs: rectangle fill, filled circles, stroked lines, transformed
//! polygons, a global alpha and a glow (shadow) effect. Alpha and glow are
//! stateful, like on a canvas, and apply to every draw until changed.
//!
//! [`RecordingSurface`] keeps every draw call as a [`RecordedDraw`] so frames
//! can be inspected without rasterizing.

use glam::Vec2;
use nebula_common::{Rgba, SurfaceSize};

/// Glow (canvas shadow) around drawn shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Blur radius in pixels.
    pub blur: f32,
    /// Glow color.
    pub color: Rgba,
}

impl Glow {
    /// Creates a glow.
    #[must_use]
    pub const fn new(blur: f32, color: Rgba) -> Self {
        Self { blur, color }
    }
}

/// Translate-then-rotate transform applied to polygon points.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    /// Translation applied after rotation.
    pub translate: Vec2,
    /// Rotation in radians.
    pub rotation: f32,
}

impl Transform {
    /// Creates a transform.
    #[must_use]
    pub const fn new(translate: Vec2, rotation: f32) -> Self {
        Self {
            translate,
            rotation,
        }
    }

    /// Maps a local point into surface space.
    #[must_use]
    pub fn apply(&self, point: Vec2) -> Vec2 {
        Vec2::from_angle(self.rotation).rotate(point) + self.translate
    }
}

/// A 2D raster drawing surface.
pub trait DrawSurface {
    /// Current dimensions.
    fn size(&self) -> SurfaceSize;

    /// Changes the dimensions. Surface contents after a resize are unspecified.
    fn resize(&mut self, size: SurfaceSize);

    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgba);

    /// Fills a circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba);

    /// Strokes a straight line of the given width.
    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba);

    /// Fills a closed polygon whose points are in local space.
    fn fill_polygon(&mut self, points: &[Vec2], transform: Transform, color: Rgba);

    /// Sets the alpha multiplier for subsequent draws.
    fn set_global_alpha(&mut self, alpha: f32);

    /// Current alpha multiplier.
    fn global_alpha(&self) -> f32;

    /// Sets or clears the glow for subsequent draws.
    fn set_glow(&mut self, glow: Option<Glow>);

    /// Current glow.
    fn glow(&self) -> Option<Glow>;

    /// Fills the whole surface with no glow and full alpha.
    fn fill_surface(&mut self, color: Rgba) {
        let size = self.size();
        self.reset_style();
        self.fill_rect(
            Vec2::ZERO,
            Vec2::new(size.width_f32(), size.height_f32()),
            color,
        );
    }

    /// Restores alpha 1.0 and no glow.
    fn reset_style(&mut self) {
        self.set_global_alpha(1.0);
        self.set_glow(None);
    }
}

/// A single draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Rectangle fill.
    FillRect {
        /// Top-left corner.
        origin: Vec2,
        /// Width and height.
        extent: Vec2,
        /// Fill color.
        color: Rgba,
    },
    /// Circle fill.
    FillCircle {
        /// Center point.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Fill color.
        color: Rgba,
    },
    /// Line stroke.
    StrokeLine {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Line width.
        width: f32,
        /// Stroke color.
        color: Rgba,
    },
    /// Polygon fill.
    FillPolygon {
        /// Local-space points.
        points: Vec<Vec2>,
        /// Transform applied to the points.
        transform: Transform,
        /// Fill color.
        color: Rgba,
    },
}

/// A draw call together with the style active when it was issued.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDraw {
    /// The draw call.
    pub command: DrawCommand,
    /// Global alpha at the time of the call.
    pub alpha: f32,
    /// Glow at the time of the call.
    pub glow: Option<Glow>,
}

/// Surface that records draw calls instead of rasterizing them.
#[derive(Debug, Clone)]
pub struct RecordingSurface {
    size: SurfaceSize,
    alpha: f32,
    glow: Option<Glow>,
    draws: Vec<RecordedDraw>,
}

impl RecordingSurface {
    /// Creates an empty recording surface.
    #[must_use]
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            alpha: 1.0,
            glow: None,
            draws: Vec::new(),
        }
    }

    /// All draws recorded so far.
    #[must_use]
    pub fn draws(&self) -> &[RecordedDraw] {
        &self.draws
    }

    /// Takes the recorded draws, leaving the log empty.
    pub fn take_draws(&mut self) -> Vec<RecordedDraw> {
        std::mem::take(&mut self.draws)
    }

    /// Number of recorded circle fills.
    #[must_use]
    pub fn circle_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::FillCircle { .. }))
    }

    /// Number of recorded line strokes.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::StrokeLine { .. }))
    }

    /// Number of recorded polygon fills.
    #[must_use]
    pub fn polygon_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::FillPolygon { .. }))
    }

    /// Number of recorded rectangle fills.
    #[must_use]
    pub fn rect_count(&self) -> usize {
        self.count(|c| matches!(c, DrawCommand::FillRect { .. }))
    }

    fn count(&self, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        self.draws.iter().filter(|d| pred(&d.command)).count()
    }

    fn record(&mut self, command: DrawCommand) {
        self.draws.push(RecordedDraw {
            command,
            alpha: self.alpha,
            glow: self.glow,
        });
    }
}

impl DrawSurface for RecordingSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgba) {
        self.record(DrawCommand::FillRect {
            origin,
            extent,
            color,
        });
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        self.record(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        self.record(DrawCommand::StrokeLine {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], transform: Transform, color: Rgba) {
        self.record(DrawCommand::FillPolygon {
            points: points.to_vec(),
            transform,
            color,
        });
    }

    fn set_global_alpha(&mut self, alpha: f32) {
        self.alpha = alpha.clamp(0.0, 1.0);
    }

    fn global_alpha(&self) -> f32 {
        self.alpha
    }

    fn set_glow(&mut self, glow: Option<Glow>) {
        self.glow = glow;
    }

    fn glow(&self) -> Option<Glow> {
        self.glow
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn size() -> SurfaceSize {
        SurfaceSize::new(64, 32).expect("valid size")
    }

    #[test]
    fn test_transform_rotates_then_translates() {
        let t = Transform::new(Vec2::new(10.0, 5.0), FRAC_PI_2);
        let p = t.apply(Vec2::new(1.0, 0.0));
        assert!((p.x - 10.0).abs() < 1e-5);
        assert!((p.y - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_recording_captures_style() {
        let mut surface = RecordingSurface::new(size());
        surface.set_global_alpha(0.5);
        surface.set_glow(Some(Glow::new(15.0, Rgba::WHITE)));
        surface.fill_circle(Vec2::new(1.0, 1.0), 2.0, Rgba::WHITE);

        let draw = &surface.draws()[0];
        assert!((draw.alpha - 0.5).abs() < f32::EPSILON);
        assert_eq!(draw.glow, Some(Glow::new(15.0, Rgba::WHITE)));
        assert_eq!(surface.circle_count(), 1);
    }

    #[test]
    fn test_fill_surface_resets_style() {
        let mut surface = RecordingSurface::new(size());
        surface.set_global_alpha(0.2);
        surface.set_glow(Some(Glow::new(5.0, Rgba::WHITE)));
        surface.fill_surface(Rgba::rgb(1, 2, 3));

        let draw = &surface.draws()[0];
        assert!((draw.alpha - 1.0).abs() < f32::EPSILON);
        assert!(draw.glow.is_none());
        assert_eq!(
            draw.command,
            DrawCommand::FillRect {
                origin: Vec2::ZERO,
                extent: Vec2::new(64.0, 32.0),
                color: Rgba::rgb(1, 2, 3),
            }
        );
    }

    #[test]
    fn test_alpha_is_clamped() {
        let mut surface = RecordingSurface::new(size());
        surface.set_global_alpha(3.0);
        assert!((surface.global_alpha() - 1.0).abs() < f32::EPSILON);
        surface.set_global_alpha(-1.0);
        assert!(surface.global_alpha().abs() < f32::EPSILON);
    }

    #[test]
    fn test_take_draws_empties_log() {
        let mut surface = RecordingSurface::new(size());
        surface.stroke_line(Vec2::ZERO, Vec2::ONE, 1.0, Rgba::WHITE);
        assert_eq!(surface.take_draws().len(), 1);
        assert!(surface.draws().is_empty());
    }
}
