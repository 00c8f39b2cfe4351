//! Level configuration
//!
//! A level is a set of fixed anchor gears plus an ordered inventory of gear
//! radii the player drops in. The first two anchors are the chain endpoints.
//!
//! JSON format:
//! ```json
//! { "gears": [{"x": 100, "y": 300, "radius": 40, "isFixed": true}, ...],
//!   "inventory": [{"x": 0, "y": 0, "radius": 30}, ...] }
//! ```
//! Inventory positions are ignored; they are assigned at placement time.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::Bounds;
use crate::consts::GEAR_SIZES;
use crate::error::ConfigError;

/// A gear as described in level data
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GearSpec {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    pub radius: f32,
    #[serde(rename = "isFixed", default, skip_serializing_if = "Option::is_none")]
    pub is_fixed: Option<bool>,
}

impl GearSpec {
    /// A fixed anchor at `(x, y)`
    pub fn anchor(x: f32, y: f32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            is_fixed: Some(true),
        }
    }

    /// An inventory entry; only the radius matters
    pub fn queued(radius: f32) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            radius,
            is_fixed: None,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    fn radius_is_valid(&self) -> bool {
        self.radius.is_finite() && self.radius > 0.0
    }
}

/// Anchors and inventory for one level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    #[serde(rename = "gears")]
    pub anchors: Vec<GearSpec>,
    #[serde(default)]
    pub inventory: Vec<GearSpec>,
}

impl LevelConfig {
    /// Parse and validate level JSON
    pub fn from_json(json: &str, bounds: Bounds) -> Result<Self, ConfigError> {
        let config: LevelConfig = serde_json::from_str(json)?;
        config.validate(bounds)?;
        Ok(config)
    }

    /// Check the level is playable on a board of `bounds`
    pub fn validate(&self, bounds: Bounds) -> Result<(), ConfigError> {
        if self.anchors.len() < 2 {
            return Err(ConfigError::MissingAnchors {
                found: self.anchors.len(),
            });
        }

        for (index, anchor) in self.anchors.iter().enumerate() {
            if !anchor.radius_is_valid() {
                return Err(ConfigError::InvalidRadius {
                    index,
                    radius: anchor.radius,
                });
            }
            if anchor.is_fixed != Some(true) {
                return Err(ConfigError::UnfixedAnchor { index });
            }
            if !bounds.contains(anchor.position()) {
                return Err(ConfigError::AnchorOutOfBounds { index });
            }
        }

        for (i, spec) in self.inventory.iter().enumerate() {
            if !spec.radius_is_valid() {
                return Err(ConfigError::InvalidRadius {
                    index: self.anchors.len() + i,
                    radius: spec.radius,
                });
            }
        }

        Ok(())
    }

    /// The starter level: two medium anchors at mid-height and just enough
    /// gears to chain across the gap
    pub fn default_level(bounds: Bounds) -> Self {
        let y = bounds.height / 2.0;
        Self {
            anchors: vec![
                GearSpec::anchor(100.0, y, GEAR_SIZES[2]),
                GearSpec::anchor(bounds.width - 100.0, y, GEAR_SIZES[2]),
            ],
            inventory: [3, 3, 3, 2, 2, 1]
                .into_iter()
                .map(|i| GearSpec::queued(GEAR_SIZES[i]))
                .collect(),
        }
    }

    /// Edge-to-edge distance between the two chain endpoints
    pub fn gap(&self) -> f32 {
        match self.anchors.as_slice() {
            [start, end, ..] => {
                (start.position().distance(end.position()) - start.radius - end.radius).max(0.0)
            }
            _ => 0.0,
        }
    }

    /// Longest straight chain the inventory can form between the anchors,
    /// counting `tolerance` of slack at every contact
    pub fn reach(&self, tolerance: f32) -> f32 {
        let diameters: f32 = self.inventory.iter().map(|g| g.radius * 2.0).sum();
        diameters + tolerance * (self.inventory.len() + 1) as f32
    }

    /// Procedural level for `level` (1-based). Level 1 is the starter level;
    /// later levels offset the anchors vertically, hand out random gear
    /// sizes until the gap can be spanned, and give fewer spares as the
    /// level rises. Spannability is judged with the board's contact
    /// `tolerance`. Same inputs always produce the same layout.
    pub fn generate(level: u32, seed: u64, bounds: Bounds, tolerance: f32) -> Self {
        if level <= 1 {
            return Self::default_level(bounds);
        }

        let level_seed = (level as u64).wrapping_mul(2654435761).wrapping_add(seed);
        let mut rng = Pcg32::seed_from_u64(level_seed);

        let anchor_radius = |rng: &mut Pcg32| GEAR_SIZES[rng.random_range(1..GEAR_SIZES.len())];
        let anchor_y = |rng: &mut Pcg32| rng.random_range(bounds.height * 0.3..bounds.height * 0.7);
        let queued =
            |rng: &mut Pcg32| GearSpec::queued(GEAR_SIZES[rng.random_range(0..GEAR_SIZES.len())]);

        let start = GearSpec::anchor(100.0, anchor_y(&mut rng), anchor_radius(&mut rng));
        let end = GearSpec::anchor(
            bounds.width - 100.0,
            anchor_y(&mut rng),
            anchor_radius(&mut rng),
        );

        let mut config = Self {
            anchors: vec![start, end],
            inventory: Vec::new(),
        };
        while config.reach(tolerance) < config.gap() {
            config.inventory.push(queued(&mut rng));
        }
        let spares = 3u32.saturating_sub(level / 3);
        for _ in 0..spares {
            config.inventory.push(queued(&mut rng));
        }

        log::info!(
            "Level {}: gap {:.0}, {} gears in inventory",
            level,
            config.gap(),
            config.inventory.len()
        );

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::CONNECT_TOLERANCE;

    #[test]
    fn test_parse_level_json() {
        let json = r#"{
            "gears": [
                {"x": 100, "y": 300, "radius": 40, "isFixed": true},
                {"x": 700, "y": 300, "radius": 40, "isFixed": true}
            ],
            "inventory": [{"x": 0, "y": 0, "radius": 30}, {"radius": 20}]
        }"#;
        let level = LevelConfig::from_json(json, Bounds::default()).unwrap();
        assert_eq!(level.anchors.len(), 2);
        assert_eq!(level.inventory[0].radius, 30.0);
        assert_eq!(level.inventory[1].radius, 20.0);
    }

    #[test]
    fn test_missing_anchor_is_config_error() {
        let json = r#"{"gears": [{"x": 100, "y": 300, "radius": 40, "isFixed": true}], "inventory": []}"#;
        assert!(matches!(
            LevelConfig::from_json(json, Bounds::default()),
            Err(ConfigError::MissingAnchors { found: 1 })
        ));
    }

    #[test]
    fn test_unfixed_anchor_rejected() {
        let json = r#"{"gears": [
            {"x": 100, "y": 300, "radius": 40, "isFixed": true},
            {"x": 700, "y": 300, "radius": 40}
        ]}"#;
        assert!(matches!(
            LevelConfig::from_json(json, Bounds::default()),
            Err(ConfigError::UnfixedAnchor { index: 1 })
        ));
    }

    #[test]
    fn test_bad_radius_rejected() {
        let mut level = LevelConfig::default_level(Bounds::default());
        level.inventory.push(GearSpec::queued(0.0));
        assert!(matches!(
            level.validate(Bounds::default()),
            Err(ConfigError::InvalidRadius { index: 8, .. })
        ));
    }

    #[test]
    fn test_anchor_outside_board_rejected() {
        let mut level = LevelConfig::default_level(Bounds::default());
        level.anchors[1].x = 900.0;
        assert!(matches!(
            level.validate(Bounds::default()),
            Err(ConfigError::AnchorOutOfBounds { index: 1 })
        ));
    }

    #[test]
    fn test_default_level_is_valid() {
        let bounds = Bounds::default();
        let level = LevelConfig::default_level(bounds);
        assert!(level.validate(bounds).is_ok());
        assert_eq!(level.anchors[0].position(), Vec2::new(100.0, 300.0));
        assert_eq!(level.anchors[1].position(), Vec2::new(700.0, 300.0));
        assert!(level.reach(CONNECT_TOLERANCE) >= level.gap());
    }

    #[test]
    fn test_generate_is_deterministic_and_valid() {
        let bounds = Bounds::default();
        for level in 1..12 {
            let a = LevelConfig::generate(level, 42, bounds, CONNECT_TOLERANCE);
            let b = LevelConfig::generate(level, 42, bounds, CONNECT_TOLERANCE);
            assert_eq!(a, b);
            assert!(a.validate(bounds).is_ok());
        }
        assert_eq!(
            LevelConfig::generate(1, 7, bounds, CONNECT_TOLERANCE),
            LevelConfig::default_level(bounds)
        );
    }

    #[test]
    fn test_levels_can_be_spanned() {
        let bounds = Bounds::default();
        for level in 1..30 {
            let config = LevelConfig::generate(level, 1234, bounds, CONNECT_TOLERANCE);
            assert!(
                config.reach(CONNECT_TOLERANCE) >= config.gap(),
                "level {level} cannot be spanned"
            );
        }
    }

    #[test]
    fn test_tight_tolerance_still_spannable() {
        let bounds = Bounds::default();
        for level in 2..20 {
            let config = LevelConfig::generate(level, 5, bounds, 0.5);
            assert!(
                config.reach(0.5) >= config.gap(),
                "level {level} cannot be spanned at tolerance 0.5"
            );
        }
    }

    #[test]
    fn test_spares_shrink_with_level() {
        let bounds = Bounds::default();
        let spare = |level| {
            let config = LevelConfig::generate(level, 99, bounds, CONNECT_TOLERANCE);
            let mut needed = config.clone();
            needed.inventory.clear();
            for g in &config.inventory {
                if needed.reach(CONNECT_TOLERANCE) >= needed.gap() {
                    break;
                }
                needed.inventory.push(*g);
            }
            config.inventory.len() - needed.inventory.len()
        };
        assert_eq!(spare(2), 3);
        assert_eq!(spare(12), 0);
    }
}
