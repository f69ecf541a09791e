//! Session tuning
//!
//! Data-driven knobs for a play session. Loaded from JSON by the host
//! application; every field falls back to its default when absent.

use serde::{Deserialize, Serialize};

use crate::error::BrawlError;

/// Session-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Map ===
    /// Grid width in tiles
    pub grid_width: u32,
    /// Grid height in tiles
    pub grid_height: u32,
    /// Tile edge length in world units
    pub cell_size: f32,
    /// Interior wall clusters attempted per generation pass
    pub wall_clusters: u32,
    /// Chance of each non-seed cell in a wall cluster
    pub wall_fill: f64,
    /// Bush cluster seeds
    pub bush_clusters: u32,
    /// Chance of each cell in a bush cluster
    pub bush_fill: f64,
    /// Generation passes before falling back to a bordered map
    pub map_attempts: u32,

    // === Waves ===
    /// Enemies per wave (one of them is always the boss)
    pub wave_size: u32,
    /// Waves to clear for victory
    pub max_waves: u32,
    /// Score awarded per kill
    pub kill_score: u64,

    // === Spawning ===
    /// Random candidates tried before the raster-scan fallback
    pub spawn_attempts: u32,

    /// Fixed RNG seed (entropy when absent)
    pub seed: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            grid_width: 20,
            grid_height: 15,
            cell_size: 40.0,
            wall_clusters: 15,
            wall_fill: 0.7,
            bush_clusters: 10,
            bush_fill: 0.6,
            map_attempts: 10,

            wave_size: 5,
            max_waves: 3,
            kill_score: 100,

            spawn_attempts: 4096,

            seed: None,
        }
    }
}

impl Tuning {
    /// Default tuning with a fixed seed
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    /// Parse and validate a JSON tuning document
    pub fn from_json(json: &str) -> Result<Self, BrawlError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: {}x{} grid, {} waves of {}",
            tuning.grid_width,
            tuning.grid_height,
            tuning.max_waves,
            tuning.wave_size
        );
        Ok(tuning)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, BrawlError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check every constraint the simulation relies on
    pub fn validate(&self) -> Result<(), BrawlError> {
        // Cluster seeds are drawn from [2, size - 3], which needs at least 5 tiles
        if self.grid_width < 5 {
            return Err(invalid("grid_width", format!("{} < 5", self.grid_width)));
        }
        if self.grid_height < 5 {
            return Err(invalid("grid_height", format!("{} < 5", self.grid_height)));
        }
        if self.cell_size.is_nan() || self.cell_size <= 0.0 {
            return Err(invalid("cell_size", format!("{} is not positive", self.cell_size)));
        }
        if self.wave_size == 0 {
            return Err(invalid("wave_size", "must be at least 1".into()));
        }
        if self.max_waves == 0 {
            return Err(invalid("max_waves", "must be at least 1".into()));
        }
        if self.map_attempts == 0 {
            return Err(invalid("map_attempts", "must be at least 1".into()));
        }
        for (field, p) in [("wall_fill", self.wall_fill), ("bush_fill", self.bush_fill)] {
            if !(0.0..=1.0).contains(&p) {
                return Err(invalid(field, format!("{p} outside [0, 1]")));
            }
        }
        Ok(())
    }

    /// World-space width of the arena
    pub fn world_width(&self) -> f32 {
        self.grid_width as f32 * self.cell_size
    }

    /// World-space height of the arena
    pub fn world_height(&self) -> f32 {
        self.grid_height as f32 * self.cell_size
    }
}

fn invalid(field: &'static str, reason: String) -> BrawlError {
    BrawlError::InvalidTuning { field, reason }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tuning = Tuning::default();
        assert!(tuning.validate().is_ok());
        assert_eq!(tuning.world_width(), 800.0);
        assert_eq!(tuning.world_height(), 600.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning = Tuning::from_json(r#"{ "max_waves": 5, "seed": 7 }"#).unwrap();
        assert_eq!(tuning.max_waves, 5);
        assert_eq!(tuning.seed, Some(7));
        assert_eq!(tuning.grid_width, 20);
    }

    #[test]
    fn test_rejects_bad_probability() {
        let err = Tuning::from_json(r#"{ "wall_fill": 1.5 }"#).unwrap_err();
        assert!(matches!(err, BrawlError::InvalidTuning { field: "wall_fill", .. }));
    }

    #[test]
    fn test_rejects_tiny_grid() {
        let err = Tuning::from_json(r#"{ "grid_width": 3 }"#).unwrap_err();
        assert!(matches!(err, BrawlError::InvalidTuning { field: "grid_width", .. }));
    }

    #[test]
    fn test_rejects_non_positive_or_nan_cell_size() {
        for cell_size in [0.0, -40.0, f32::NAN] {
            let tuning = Tuning {
                cell_size,
                ..Tuning::default()
            };
            assert!(matches!(
                tuning.validate(),
                Err(BrawlError::InvalidTuning { field: "cell_size", .. })
            ));
        }
    }

    #[test]
    fn test_malformed_json() {
        let err = Tuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, BrawlError::Json(_)));
    }

    #[test]
    fn test_json_roundtrip_keeps_seed() {
        let tuning = Tuning::seeded(42);
        let back = Tuning::from_json(&tuning.to_json().unwrap()).unwrap();
        assert_eq!(back, tuning);
    }
}
