//! Tunable constants of the stepper, loadable from TOML.
//!
//! Every field is optional; missing fields fall back to the defaults below.
//!
//! ```toml
//! radius_scale = 0.5      # radius = radius_scale * cbrt(mass)
//! speed_multiplier = 3.0  # visual time scale for position updates
//! max_frame_dt = 0.033    # clamp on per-frame elapsed seconds
//! start_offset = 10.0     # bodies start at -start_offset and +start_offset
//! boundary = 25.0         # |x| beyond this ends a post-collision run
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::common::ConfigError;

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub radius_scale: f64,
    pub speed_multiplier: f64,
    pub max_frame_dt: f64,
    pub start_offset: f64,
    pub boundary: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            radius_scale: 0.5,
            speed_multiplier: 3.0,
            max_frame_dt: 0.033,
            start_offset: 10.0,
            boundary: 25.0,
        }
    }
}

impl SimulationConfig {
    /// Parses and validates a config from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&text)?;
        log::info!("loaded simulation config from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let fields = [
            ("radius_scale", self.radius_scale),
            ("speed_multiplier", self.speed_multiplier),
            ("max_frame_dt", self.max_frame_dt),
            ("start_offset", self.start_offset),
            ("boundary", self.boundary),
        ];
        for (name, value) in fields {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be a positive finite number, got {value}"
                )));
            }
        }
        // Bodies must start inside the arena or a run finishes on its first post-collision frame
        if self.start_offset >= self.boundary {
            return Err(ConfigError::Invalid(format!(
                "start_offset ({}) must be smaller than boundary ({})",
                self.start_offset, self.boundary
            )));
        }
        Ok(())
    }
}
