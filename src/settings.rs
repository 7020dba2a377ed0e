//! Battle configuration
//!
//! Validated before a round starts; invalid settings never reach the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::{MAX_POPULATION, MIN_POPULATION};

/// Difficulty preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Normal => "normal",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "med" | "medium" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Mean launch speed (pixels/frame) before the speed multiplier
    pub fn base_speed(&self) -> f32 {
        match self {
            Difficulty::Easy => 3.0,
            Difficulty::Normal => 5.0,
            Difficulty::Hard => 8.0,
        }
    }

    /// Spread around `base_speed` for launch speeds
    pub fn speed_variation(&self) -> f32 {
        match self {
            Difficulty::Easy => 2.0,
            Difficulty::Normal => 3.0,
            Difficulty::Hard => 4.0,
        }
    }

    /// Sparks per elimination explosion
    pub fn explosion_particles(&self) -> usize {
        match self {
            Difficulty::Easy | Difficulty::Normal => 8,
            Difficulty::Hard => 12,
        }
    }
}

/// Configuration rejected at round start
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("ball count {count} is below the minimum of {min}")]
    TooFewBalls { count: usize, min: usize },
    #[error("ball count {count} exceeds the maximum of {max}")]
    TooManyBalls { count: usize, max: usize },
    #[error("speed multiplier must be a positive finite number, got {0}")]
    InvalidSpeedMultiplier(f32),
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Settings chosen on the configuration screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Number of participants entering the battle
    pub ball_count: usize,
    /// Scales every launch velocity
    pub speed_multiplier: f32,
    pub difficulty: Difficulty,
    /// Constant downward pull on every body
    pub gravity_enabled: bool,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            ball_count: 8,
            speed_multiplier: 1.0,
            difficulty: Difficulty::Normal,
            gravity_enabled: false,
        }
    }
}

impl BattleConfig {
    /// Check the invariants a round relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.ball_count < MIN_POPULATION {
            return Err(ConfigError::TooFewBalls {
                count: self.ball_count,
                min: MIN_POPULATION,
            });
        }
        if self.ball_count > MAX_POPULATION {
            return Err(ConfigError::TooManyBalls {
                count: self.ball_count,
                max: MAX_POPULATION,
            });
        }
        if !self.speed_multiplier.is_finite() || self.speed_multiplier <= 0.0 {
            return Err(ConfigError::InvalidSpeedMultiplier(self.speed_multiplier));
        }
        Ok(())
    }

    /// Parse a JSON config; missing fields take their defaults
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!(
            "Loaded battle config from {}: {} balls, {} difficulty",
            path.display(),
            config.ball_count,
            config.difficulty.as_str()
        );
        Ok(config)
    }
}
