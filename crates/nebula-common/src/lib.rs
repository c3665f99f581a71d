//! # Nebula Common
//!
//! Common types, utilities, and shared abstractions for Project Nebula.
//!
//! This crate provides foundational types used across all Nebula subsystems:
//! - RGBA colors and the fixed star/burst palettes
//! - Surface dimensions and screen rectangles
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod color;
pub mod error;
pub mod geometry;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::color::*;
    pub use crate::error::*;
    pub use crate::geometry::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_error_converts_to_top_level() {
        let err: NebulaError = SurfaceSize::new(0, 0)
            .expect_err("zero size must fail")
            .into();
        assert!(matches!(err, NebulaError::Surface(SurfaceError::ZeroSized { .. })));
        assert_eq!(
            err.to_string(),
            "Surface error: Surface must have non-zero dimensions, got 0x0"
        );
    }

    #[test]
    fn test_color_error_message() {
        let err = Rgba::from_hex("nope").expect_err("invalid hex");
        assert_eq!(err.to_string(), "Invalid hex color `nope`");
    }
}
