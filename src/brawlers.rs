//! Playable brawler roster

use serde::{Deserialize, Serialize};

use crate::error::BrawlError;

/// Base combat stats for a brawler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BrawlerStats {
    pub name: String,
    pub health: f32,
    /// World units per step
    pub speed: f32,
    pub damage: f32,
    /// Bursts per second
    pub attack_speed: f32,
    pub range: f32,
}

impl BrawlerStats {
    fn new(name: &str, health: f32, speed: f32, damage: f32, attack_speed: f32, range: f32) -> Self {
        Self {
            name: name.to_string(),
            health,
            speed,
            damage,
            attack_speed,
            range,
        }
    }
}

/// Identifiers of the built-in brawlers, in select-screen order
pub const BRAWLER_IDS: [&str; 3] = ["Shelly", "Colt", "El Primo"];

/// All built-in brawlers
pub fn roster() -> Vec<BrawlerStats> {
    vec![
        // Balanced shotgunner
        BrawlerStats::new("Shelly", 100.0, 5.0, 20.0, 1.0, 200.0),
        // Fast, long range
        BrawlerStats::new("Colt", 80.0, 6.0, 15.0, 1.5, 300.0),
        // Tank, close range
        BrawlerStats::new("El Primo", 150.0, 4.0, 30.0, 0.8, 100.0),
    ]
}

/// Look up a brawler by identifier (case-insensitive)
pub fn lookup(id: &str) -> Result<BrawlerStats, BrawlError> {
    roster()
        .into_iter()
        .find(|b| b.name.eq_ignore_ascii_case(id.trim()))
        .ok_or_else(|| BrawlError::UnknownBrawler(id.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_case_insensitive() {
        let colt = lookup("colt").unwrap();
        assert_eq!(colt.name, "Colt");
        assert_eq!(colt.range, 300.0);
    }

    #[test]
    fn test_lookup_unknown() {
        assert!(matches!(lookup("Spike"), Err(BrawlError::UnknownBrawler(_))));
    }

    #[test]
    fn test_ids_match_roster() {
        for id in BRAWLER_IDS {
            assert!(lookup(id).is_ok(), "{id} missing from roster");
        }
    }
}
