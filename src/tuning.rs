//! Data-driven gameplay constants
//!
//! Every field falls back to its default when missing from the JSON, so a
//! tuning file only needs to list what it overrides.

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;

/// Gameplay and physics tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Extra distance allowed between two gears that still count as touching
    pub connect_tolerance: f32,
    /// Seconds between win-condition checks
    pub win_check_interval: f32,
    /// Score bonus for completing a level
    pub win_bonus: u64,
    /// Gap between the tap point and a spawned gear's lower edge
    pub spawn_margin: f32,

    // === Physics ===
    /// Downward acceleration (px/s²)
    pub gravity: f32,
    pub friction: f32,
    pub restitution: f32,
    /// Density of anchor bodies
    pub density_fixed: f32,
    /// Density of placed bodies
    pub density_free: f32,
    /// Thickness of the floor and side walls, centered on the board edges
    pub wall_thickness: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            connect_tolerance: CONNECT_TOLERANCE,
            win_check_interval: WIN_CHECK_INTERVAL,
            win_bonus: WIN_BONUS,
            spawn_margin: SPAWN_MARGIN,

            gravity: 980.0,
            friction: 0.7,
            restitution: 0.3,
            density_fixed: 0.001,
            density_free: 0.1,
            wall_thickness: 60.0,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) tuning document
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning = serde_json::from_str(json)?;
        Ok(tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{"connect_tolerance": 8.0}"#).unwrap();
        assert_eq!(tuning.connect_tolerance, 8.0);
        assert_eq!(tuning.win_bonus, 100);
        assert_eq!(tuning.win_check_interval, 0.5);
    }

    #[test]
    fn test_bad_json_is_config_error() {
        assert!(matches!(
            Tuning::from_json("{nope"),
            Err(ConfigError::Parse(_))
        ));
    }
}
