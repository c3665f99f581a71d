//! Engine configuration.
//!
//! Provides surface, run-loop, scene and scripted-event settings.
//! Configuration can be loaded from and saved to a TOML file.

use nebula_common::{ConfigError, ScreenRect, SurfaceSize};
use nebula_kernel::scene::SceneConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "nebula.toml";

/// Upper bound on frames in one headless run.
const MAX_FRAMES_LIMIT: u64 = 1_000_000;

/// A scripted button activation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ButtonActivation {
    /// Frame on which the button is activated (1-based)
    pub frame: u64,
    /// Bounding box of the activated button
    pub button: ScreenRect,
}

/// A scripted surface resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResizeEvent {
    /// Frame on which the resize happens (1-based)
    pub frame: u64,
    /// New width
    pub width: u32,
    /// New height
    pub height: u32,
}

/// Engine configuration parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Surface Settings ===
    /// Surface width in pixels
    pub surface_width: u32,
    /// Surface height in pixels
    pub surface_height: u32,

    // === Run Settings ===
    /// Hard cap on frames to run
    pub max_frames: u64,
    /// Stop early once nothing is left to animate
    pub stop_when_idle: bool,

    // === Output Settings ===
    /// Where to write a PNG snapshot (None = no snapshot)
    pub snapshot_path: Option<PathBuf>,
    /// Frame to snapshot (None = last frame)
    pub snapshot_frame: Option<u64>,

    // === Scene Settings ===
    /// Starfield, burst and seed settings
    pub scene: SceneConfig,

    // === Scripted Events ===
    /// Button activations that trigger bursts
    pub activations: Vec<ButtonActivation>,
    /// Surface resizes
    pub resizes: Vec<ResizeEvent>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            surface_width: 1280,
            surface_height: 720,

            max_frames: 600,
            stop_when_idle: true,

            snapshot_path: None,
            snapshot_frame: None,

            scene: SceneConfig::default(),

            // The search button, centered under the query box.
            activations: vec![ButtonActivation {
                frame: 1,
                button: ScreenRect::new(560.0, 400.0, 160.0, 48.0),
            }],
            resizes: Vec::new(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(CONFIG_FILE)
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("Failed to read config file: {e}");
                return Self::default();
            },
        };

        match Self::from_toml_str(&contents) {
            Ok(config) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                warn!("{e}");
                Self::default()
            },
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save configuration to the default file location.
    pub fn save(&self) -> io::Result<()> {
        self.save_to(CONFIG_FILE)
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Surface dimensions, rejecting zero-sized surfaces.
    pub fn surface_size(&self) -> Result<SurfaceSize, ConfigError> {
        SurfaceSize::new(self.surface_width, self.surface_height).map_err(|e| {
            ConfigError::Invalid {
                field: "surface_width",
                reason: e.to_string(),
            }
        })
    }

    /// Clamp run settings and reject values the engine cannot run with.
    pub fn validate(&mut self) -> Result<(), ConfigError> {
        self.max_frames = self.max_frames.clamp(1, MAX_FRAMES_LIMIT);

        self.surface_size()?;
        self.scene.starfield.validate()?;
        self.scene.burst.validate()?;

        if self.activations.iter().any(|a| a.frame == 0) {
            return Err(ConfigError::Invalid {
                field: "activations",
                reason: "event frames start at 1".into(),
            });
        }
        if self.resizes.iter().any(|r| r.frame == 0) {
            return Err(ConfigError::Invalid {
                field: "resizes",
                reason: "event frames start at 1".into(),
            });
        }

        for resize in &self.resizes {
            if resize.width == 0 || resize.height == 0 {
                return Err(ConfigError::Invalid {
                    field: "resizes",
                    reason: format!(
                        "frame {} resizes to {}x{}",
                        resize.frame, resize.width, resize.height
                    ),
                });
            }
        }

        self.activations.sort_by_key(|a| a.frame);
        self.resizes.sort_by_key(|r| r.frame);
        Ok(())
    }

    /// Last frame with a scripted event, if any.
    #[must_use]
    pub fn last_event_frame(&self) -> Option<u64> {
        let activations = self.activations.iter().map(|a| a.frame);
        let resizes = self.resizes.iter().map(|r| r.frame);
        activations.chain(resizes).max()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nebula_kernel::starfield::StarfieldMode;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.surface_width, 1280);
        assert_eq!(config.surface_height, 720);
        assert_eq!(config.scene.starfield.star_count, 100);
        assert_eq!(config.scene.burst.particle_count, 25);
        assert_eq!(config.activations.len(), 1);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig {
            max_frames: 0,
            ..EngineConfig::default()
        };
        config.validate().expect("defaults are valid");
        assert_eq!(config.max_frames, 1);

        config.surface_height = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "surface_width",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_sized_resize_rejected() {
        let mut config = EngineConfig::default();
        config.resizes.push(ResizeEvent {
            frame: 3,
            width: 0,
            height: 10,
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_zero_events_rejected() {
        let mut config = EngineConfig::default();
        config.activations[0].frame = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "activations",
                ..
            })
        ));

        let mut config = EngineConfig::default();
        config.resizes.push(ResizeEvent {
            frame: 0,
            width: 640,
            height: 480,
        });
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { field: "resizes", .. })
        ));
    }

    #[test]
    fn test_validation_sorts_events() {
        let mut config = EngineConfig::default();
        config.activations = vec![
            ButtonActivation {
                frame: 9,
                button: ScreenRect::default(),
            },
            ButtonActivation {
                frame: 2,
                button: ScreenRect::default(),
            },
        ];
        config.validate().expect("valid");
        assert_eq!(config.activations[0].frame, 2);
        assert_eq!(config.last_event_frame(), Some(9));
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("test_config.toml");

        let mut config = EngineConfig::default();
        config.surface_width = 1920;
        config.stop_when_idle = false;
        config.scene.seed = Some(12345);
        config.scene.starfield.mode = StarfieldMode::Animated;
        config.resizes.push(ResizeEvent {
            frame: 10,
            width: 640,
            height: 480,
        });

        config.save_to(&config_path).expect("Failed to save config");

        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/config.toml");
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("broken.toml");
        fs::write(&config_path, "surface_width = \"wide\"").expect("write");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config, EngineConfig::default());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = EngineConfig::from_toml_str(
            r##"
            surface_width = 320

            [scene.starfield]
            mode = "animated"

            [[activations]]
            frame = 5
            button = { left = 10.0, top = 20.0, width = 30.0, height = 40.0 }
            "##,
        )
        .expect("valid toml");

        assert_eq!(config.surface_width, 320);
        assert_eq!(config.surface_height, 720);
        assert_eq!(config.scene.starfield.mode, StarfieldMode::Animated);
        assert_eq!(config.activations.len(), 1);
        assert_eq!(config.activations[0].frame, 5);
        assert_eq!(config.scene.burst.particle_count, 25);
    }

    #[test]
    fn test_parse_error_reported() {
        let err = EngineConfig::from_toml_str("max_frames = [").expect_err("broken toml");
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
