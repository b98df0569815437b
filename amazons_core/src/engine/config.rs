use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_BEAM_WIDTH: usize = 12;
pub const DEFAULT_CENTER_BASE: i32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed engine config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid engine config: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // Search Parameters
    /// Queen moves that survive the cheap center-weight ranking.
    pub beam_width: usize,

    // Evaluation Parameters
    pub mobility_weight: f64,
    pub positional_weight: f64,
    /// Center weight of a cell is `center_base - round(distance to center)`.
    pub center_base: i32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            beam_width: DEFAULT_BEAM_WIDTH,
            mobility_weight: 1.0,
            positional_weight: 0.5,
            center_base: DEFAULT_CENTER_BASE,
        }
    }
}

/// Tuning file format: every field is a multiplier on the default, except
/// `center_base` which is absolute.
#[derive(Deserialize)]
struct EngineConfigJson {
    beam_width: Option<f32>,
    mobility_weight: Option<f64>,
    positional_weight: Option<f64>,
    center_base: Option<i32>,
}

impl EngineConfig {
    pub fn load_from_json(json_str: &str) -> Result<Self, ConfigError> {
        let json_config: EngineConfigJson = serde_json::from_str(json_str)?;
        let default = Self::default();

        let config = Self {
            beam_width: apply_scale(default.beam_width, json_config.beam_width),
            mobility_weight: json_config
                .mobility_weight
                .map_or(default.mobility_weight, |s| default.mobility_weight * s),
            positional_weight: json_config
                .positional_weight
                .map_or(default.positional_weight, |s| default.positional_weight * s),
            center_base: json_config.center_base.unwrap_or(default.center_base),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.beam_width == 0 {
            return Err(ConfigError::Invalid("beam_width must be at least 1"));
        }
        if !self.mobility_weight.is_finite() || !self.positional_weight.is_finite() {
            return Err(ConfigError::Invalid("evaluation weights must be finite"));
        }
        Ok(())
    }
}

#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn apply_scale(default_val: usize, scale: Option<f32>) -> usize {
    scale.map_or(default_val, |s| (default_val as f32 * s).max(0.0) as usize)
}
