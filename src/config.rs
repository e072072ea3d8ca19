use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::ConfigError;


/// Fixed output canvas, in canvas units
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
    pub margin: f64,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 700.0,
            margin: 150.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Marker speed in canvas units per second
    pub speed: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self { speed: 200.0 }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Circle radius for the automatic layout, normalized units
    pub circle_radius: f64,
    /// Pointer distance within which a vertex can be picked up, canvas units
    pub hit_radius: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            circle_radius: 0.35,
            hit_radius: 16.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeightConfig {
    /// Largest change applied to a weight by one jitter pass
    pub jitter: f64,
    /// Jittered weights never go below this
    pub min_weight: f64,
}

impl Default for WeightConfig {
    fn default() -> Self {
        Self {
            jitter: 0.6,
            min_weight: 1.0,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub canvas: CanvasConfig,
    pub animation: AnimationConfig,
    pub layout: LayoutConfig,
    pub weights: WeightConfig,
}

impl Config {

    /// Parse a JSON config, fields left out keep their defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults, overridden by the file at path when one is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let Some(path) = path else {
            return Ok(Config::default());
        };
        let contents = std::fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let canvas = &self.canvas;
        if !(canvas.width > 0.0 && canvas.height > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "canvas size must be positive, got {}x{}", canvas.width, canvas.height
            )));
        }
        if !(canvas.margin >= 0.0 && 2.0 * canvas.margin < canvas.width.min(canvas.height)) {
            return Err(ConfigError::Invalid(format!(
                "margin {} leaves no usable area on a {}x{} canvas", canvas.margin, canvas.width, canvas.height
            )));
        }
        if !(self.animation.speed > 0.0 && self.animation.speed.is_finite()) {
            return Err(ConfigError::Invalid(format!("animation speed must be positive, got {}", self.animation.speed)));
        }
        if !(self.layout.circle_radius > 0.0 && self.layout.circle_radius <= 0.5) {
            return Err(ConfigError::Invalid(format!(
                "circle radius must be in (0, 0.5], got {}", self.layout.circle_radius
            )));
        }
        if !(self.layout.hit_radius >= 0.0) {
            return Err(ConfigError::Invalid(format!("hit radius must be non-negative, got {}", self.layout.hit_radius)));
        }
        if !(self.weights.jitter >= 0.0 && self.weights.jitter.is_finite()) {
            return Err(ConfigError::Invalid(format!("jitter must be non-negative, got {}", self.weights.jitter)));
        }
        if !(self.weights.min_weight >= 0.0 && self.weights.min_weight.is_finite()) {
            return Err(ConfigError::Invalid(format!("min weight must be non-negative, got {}", self.weights.min_weight)));
        }
        Ok(())
    }
}
