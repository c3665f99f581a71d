//! Software RGBA raster surface.
//!
//! Every shape is rasterized from a signed distance function: pixels whose
//! centers are inside get full coverage, a half-pixel band on the edge is
//! anti-aliased, and when a glow is set a halo is blended out to `blur`
//! pixels past the edge before the body is drawn on top.

use glam::Vec2;
use nebula_common::{Rgba, SurfaceSize};
use tracing::trace;

use crate::surface::{DrawSurface, Glow, Transform};

/// Peak opacity of a glow halo relative to the glow color.
const HALO_STRENGTH: f32 = 0.6;

/// RGBA8 pixel buffer implementing [`DrawSurface`].
#[derive(Clone)]
pub struct PixelSurface {
    size: SurfaceSize,
    pixels: Vec<Rgba>,
    alpha: f32,
    glow: Option<Glow>,
}

impl PixelSurface {
    /// Creates a transparent surface.
    #[must_use]
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            pixels: vec![Rgba::TRANSPARENT; size.area()],
            alpha: 1.0,
            glow: None,
        }
    }

    /// Reads one pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        if x >= self.size.width() || y >= self.size.height() {
            return None;
        }
        self.pixels
            .get(y as usize * self.size.width() as usize + x as usize)
            .copied()
    }

    /// All pixels, row-major.
    #[must_use]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA bytes, row-major, ready for image encoding.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    fn blend(&mut self, index: usize, color: Rgba, coverage: f32) {
        let a = color.alpha_f32() * self.alpha * coverage;
        if a <= 0.0 {
            return;
        }
        let dst = &mut self.pixels[index];
        // Straight-alpha source-over: destination color counts by its own alpha.
        let dst_weight = dst.alpha_f32() * (1.0 - a);
        let out_alpha = a + dst_weight;
        let mix = |s: u8, d: u8| {
            ((f32::from(s) * a + f32::from(d) * dst_weight) / out_alpha).round() as u8
        };
        *dst = Rgba::new(
            mix(color.r, dst.r),
            mix(color.g, dst.g),
            mix(color.b, dst.b),
            (out_alpha * 255.0).round() as u8,
        );
    }

    /// Rasterizes a shape bounded by `min..max` and described by `sdf`.
    fn rasterize(&mut self, min: Vec2, max: Vec2, color: Rgba, sdf: impl Fn(Vec2) -> f32) {
        let halo = self.glow.filter(|g| g.blur > 0.0);
        let pad = halo.map_or(0.0, |g| g.blur) + 1.0;
        let width = self.size.width() as usize;

        let x0 = (min.x - pad).floor().max(0.0) as usize;
        let y0 = (min.y - pad).floor().max(0.0) as usize;
        let x1 = (max.x + pad).ceil().min(self.size.width_f32()) as usize;
        let y1 = (max.y + pad).ceil().min(self.size.height_f32()) as usize;

        if x0 >= x1 || y0 >= y1 {
            trace!("Shape fully outside surface, skipped");
            return;
        }

        for y in y0..y1 {
            for x in x0..x1 {
                let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = sdf(p);
                let index = y * width + x;

                if let Some(glow) = halo {
                    if d > -0.5 && d < glow.blur {
                        let falloff = 1.0 - d.max(0.0) / glow.blur;
                        self.blend(index, glow.color, falloff * falloff * HALO_STRENGTH);
                    }
                }

                let coverage = (0.5 - d).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(index, color, coverage);
                }
            }
        }
    }
}

impl std::fmt::Debug for PixelSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelSurface")
            .field("size", &self.size)
            .field("alpha", &self.alpha)
            .field("glow", &self.glow)
            .finish_non_exhaustive()
    }
}

impl DrawSurface for PixelSurface {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn resize(&mut self, size: SurfaceSize) {
        // Same as a canvas: resizing clears the backing store.
        self.size = size;
        self.pixels = vec![Rgba::TRANSPARENT; size.area()];
    }

    fn fill_rect(&mut self, origin: Vec2, extent: Vec2, color: Rgba) {
        let min = origin.min(origin + extent);
        let max = origin.max(origin + extent);
        let center = (min + max) / 2.0;
        let half = (max - min) / 2.0;
        self.rasterize(min, max, color, |p| box_distance(p, center, half));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Rgba) {
        if radius <= 0.0 {
            return;
        }
        let r = Vec2::splat(radius);
        self.rasterize(center - r, center + r, color, |p| {
            (p - center).length() - radius
        });
    }

    fn stroke_line(&mut self, from: Vec2, to: Vec2, width: f32, color: Rgba) {
        if width <= 0.0 {
            return;
        }
        let half = width / 2.0;
        let pad = Vec2::splat(half);
        self.rasterize(from.min(to) - pad, from.max(to) + pad, color, |p| {
            segment_distance(p, from, to) - half
        });
    }

    fn fill_polygon(&mut self, points: &[Vec2], transform: Transform, color: Rgba) {
        if points.len() < 3 {
            return;
        }
        let world: Vec<Vec2> = points.iter().map(|p| transform.apply(*p)).collect();
        let (min, max) = world.iter().fold(
            (Vec2::splat(f32::INFINITY), Vec2::splat(f32::NEG_INFINITY)),
            |(lo, hi), p| (lo.min(*p), hi.max(*p)),
        );
        self.rasterize(min, max, color, |p| polygon_distance(p, &world));
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

fn box_distance(p: Vec2, center: Vec2, half: Vec2) -> f32 {
    let q = (p - center).abs() - half;
    q.max(Vec2::ZERO).length() + q.x.max(q.y).min(0.0)
}

fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let pa = p - a;
    let ba = b - a;
    let len_sq = ba.length_squared();
    let h = if len_sq > 0.0 {
        (pa.dot(ba) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (pa - ba * h).length()
}

/// Signed distance to a closed polygon, negative inside (non-zero winding).
fn polygon_distance(p: Vec2, points: &[Vec2]) -> f32 {
    let mut distance = f32::INFINITY;
    let mut winding = 0i32;

    for (i, &a) in points.iter().enumerate() {
        let b = points[(i + 1) % points.len()];
        distance = distance.min(segment_distance(p, a, b));

        let cross = (b - a).perp_dot(p - a);
        if a.y <= p.y {
            if b.y > p.y && cross > 0.0 {
                winding += 1;
            }
        } else if b.y <= p.y && cross < 0.0 {
            winding -= 1;
        }
    }

    if winding == 0 {
        distance
    } else {
        -distance
    }
}
