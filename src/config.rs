//! Render configuration for a sparkles field.
//!
//! A [`SparklesConfig`] is immutable for the lifetime of a mounted field.
//! Every field has a default, so a TOML file only needs the values it
//! changes:
//!
//! ```toml
//! particle_density = 250
//! particle_color = "#c4b5fd"
//! min_size = 0.4
//! max_size = 1.0
//! ```

use std::path::Path;

use serde::Deserialize;

use crate::color::Color;
use crate::error::ConfigError;

/// Default particle radius lower bound, in pixels.
pub const DEFAULT_MIN_SIZE: f32 = 0.6;
/// Default particle radius upper bound, in pixels.
pub const DEFAULT_MAX_SIZE: f32 = 1.4;
/// Default number of particles in a field.
pub const DEFAULT_PARTICLE_DENSITY: usize = 100;
/// Default identifier, also used as the window title.
pub const DEFAULT_ID: &str = "tsparticles";
/// Default style class: fill the parent viewport.
pub const DEFAULT_CLASS_NAME: &str = "h-full w-full";

/// Construction-time configuration of a particle field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SparklesConfig {
    /// Identifier of the field. Used as the window title.
    pub id: String,
    /// Fill drawn behind the particles.
    pub background: Color,
    /// Smallest particle radius.
    pub min_size: f32,
    /// Largest particle radius.
    pub max_size: f32,
    /// Number of particles in the field.
    pub particle_density: usize,
    /// Style class of the field. Reported in logs only.
    pub class_name: String,
    /// Fill color of every particle.
    pub particle_color: Color,
    /// Seed for reproducible fields. `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Width assumed before the viewport has been measured.
    pub initial_width: u32,
    /// Height assumed before the viewport has been measured.
    pub initial_height: u32,
}

impl Default for SparklesConfig {
    fn default() -> Self {
        Self {
            id: DEFAULT_ID.to_string(),
            background: Color::TRANSPARENT,
            min_size: DEFAULT_MIN_SIZE,
            max_size: DEFAULT_MAX_SIZE,
            particle_density: DEFAULT_PARTICLE_DENSITY,
            class_name: DEFAULT_CLASS_NAME.to_string(),
            particle_color: Color::WHITE,
            seed: None,
            initial_width: 1200,
            initial_height: 800,
        }
    }
}

impl SparklesConfig {
    /// Parse and validate a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: SparklesConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }

    /// Check that the size range is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let (min, max) = (self.min_size, self.max_size);
        if !min.is_finite() || !max.is_finite() || min < 0.0 || min > max {
            return Err(ConfigError::InvalidSizeRange { min, max });
        }
        Ok(())
    }

    /// The per-particle subset of the configuration.
    pub fn particle_config(&self) -> ParticleConfig {
        ParticleConfig {
            min_size: self.min_size,
            max_size: self.max_size,
            particle_color: self.particle_color,
        }
    }

    /// Whether switching from `self` to `other` requires rebuilding the
    /// particle collection.
    pub fn needs_rebuild(&self, other: &SparklesConfig) -> bool {
        self.particle_config() != other.particle_config()
            || self.particle_density != other.particle_density
    }
}

/// The parameters that shape individual particles.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleConfig {
    pub min_size: f32,
    pub max_size: f32,
    pub particle_color: Color,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        SparklesConfig::default().particle_config()
    }
}
