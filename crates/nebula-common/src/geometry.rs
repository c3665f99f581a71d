//! Surface dimensions and screen-space rectangles.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SurfaceError;

/// Pixel dimensions of a drawing surface. Always non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawSurfaceSize")]
pub struct SurfaceSize {
    width: u32,
    height: u32,
}

#[derive(Deserialize)]
struct RawSurfaceSize {
    width: u32,
    height: u32,
}

impl TryFrom<RawSurfaceSize> for SurfaceSize {
    type Error = SurfaceError;

    fn try_from(raw: RawSurfaceSize) -> Result<Self, Self::Error> {
        Self::new(raw.width, raw.height)
    }
}

impl SurfaceSize {
    /// Creates a surface size, rejecting zero-area surfaces.
    pub const fn new(width: u32, height: u32) -> Result<Self, SurfaceError> {
        if width == 0 || height == 0 {
            return Err(SurfaceError::ZeroSized { width, height });
        }
        Ok(Self { width, height })
    }

    /// Width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Width as a float, the unit used by all projection math.
    #[must_use]
    pub fn width_f32(&self) -> f32 {
        self.width as f32
    }

    /// Height as a float.
    #[must_use]
    pub fn height_f32(&self) -> f32 {
        self.height as f32
    }

    /// Center point of the surface.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width_f32() / 2.0, self.height_f32() / 2.0)
    }

    /// Whether a point lies within the surface, edges inclusive.
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0
            && point.x <= self.width_f32()
            && point.y >= 0.0
            && point.y <= self.height_f32()
    }

    /// Number of pixels.
    #[must_use]
    pub const fn area(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Axis-aligned screen rectangle, e.g. a button's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScreenRect {
    /// Left edge
    pub left: f32,
    /// Top edge
    pub top: f32,
    /// Width
    pub width: f32,
    /// Height
    pub height: f32,
}

impl ScreenRect {
    /// Creates a rectangle.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Center of the rectangle.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.left + self.width / 2.0, self.top + self.height / 2.0)
    }
}
