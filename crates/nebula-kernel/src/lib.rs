//! # Nebula Kernel
//!
//! Starfield and particle-burst animation over a shared 2D drawing surface.
//!
//! This crate provides:
//! - The [`surface::DrawSurface`] abstraction, a recording implementation
//!   and a software raster implementation
//! - A single-threaded frame clock that runs per-frame tasks until they finish
//! - The field renderer (constant population of projected stars)
//! - The burst emitter (self-terminating particle batches)
//! - The [`scene::Scene`] owning context that wires them to one surface
//!
//! ## Frame order
//!
//! Everything runs on one thread. Each [`scene::Scene::tick`] first redraws
//! the starfield (animated mode only) and then runs every scheduled burst in
//! trigger order. Bursts own disjoint particle sets and share nothing but the
//! surface, so they never influence each other.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod burst;
pub mod frame_clock;
pub mod raster;
pub mod scene;
pub mod starfield;
pub mod surface;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::burst::*;
    pub use crate::frame_clock::*;
    pub use crate::raster::*;
    pub use crate::scene::*;
    pub use crate::starfield::*;
    pub use crate::surface::*;
}
