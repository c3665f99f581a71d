//! Error types for Project Nebula.

use thiserror::Error;

/// Top-level error type for Nebula operations.
#[derive(Debug, Error)]
pub enum NebulaError {
    /// Drawing surface errors
    #[error("Surface error: {0}")]
    Surface(#[from] SurfaceError),

    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Color parsing errors
    #[error("Color error: {0}")]
    Color(#[from] ColorError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image encoding errors
    #[error("Image error: {0}")]
    Image(String),
}

/// Drawing surface errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    /// The surface has no drawable area.
    #[error("Surface must have non-zero dimensions, got {width}x{height}")]
    ZeroSized {
        /// Requested width
        width: u32,
        /// Requested height
        height: u32,
    },
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The config text could not be parsed.
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A field holds a value the engine cannot run with.
    #[error("Invalid value for `{field}`: {reason}")]
    Invalid {
        /// Offending field name
        field: &'static str,
        /// Human readable reason
        reason: String,
    },
}

/// Color parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Not a `#rrggbb` or `#rrggbbaa` string.
    #[error("Invalid hex color `{0}`")]
    InvalidHex(String),
}

/// Result type alias for Nebula operations.
pub type NebulaResult<T> = Result<T, NebulaError>;
