//! # Nebula Engine
//!
//! Headless host for the Nebula starfield and burst animation.
//!
//! This crate ties the kernel to the outside world:
//! - Config: TOML engine configuration with scripted page events
//! - App: frame loop standing in for the page controller
//! - Snapshot: PNG export of the raster surface

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod app;
pub mod config;
pub mod snapshot;
