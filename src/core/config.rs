//! Simulation configuration with documented constants
//!
//! All tuned numbers are collected here. The world owns one
//! `SimulationConfig` and hands references to the systems that need it;
//! there is no process-wide config.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{EcoError, Result};
use crate::core::types::Species;
use crate::entity::species::SpeciesProfile;

/// Five-step scale shared by the three vital signs
///
/// Values are in percent (0-100). Tiers are ordered from best to worst.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierScale {
    pub best: f32,
    pub good: f32,
    pub low: f32,
    pub critical: f32,
    pub worst: f32,
}

impl TierScale {
    fn is_descending(&self) -> bool {
        self.best > self.good && self.good > self.low && self.low > self.critical && self.critical >= self.worst
    }
}

/// Vital thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VitalThresholds {
    /// healthy / wounded / badly wounded / mortally wounded / dead
    pub health: TierScale,
    /// full / satisfied / hungry / very hungry / starving
    pub hunger: TierScale,
    /// full / satisfied / thirsty / very thirsty / severely dehydrated
    pub thirst: TierScale,
}

impl Default for VitalThresholds {
    fn default() -> Self {
        let scale = TierScale {
            best: 80.0,
            good: 60.0,
            low: 40.0,
            critical: 20.0,
            worst: 0.0,
        };
        Self {
            health: scale,
            hunger: scale,
            thirst: scale,
        }
    }
}

/// Vision and acquisition constants
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Cone threshold with zero EyeStrength (dot product against forward)
    pub base_dot: f32,
    /// Threshold reduction per EyeStrength point
    pub dot_per_eye: f32,
    /// EyeStrength beyond this no longer widens the cone
    pub eye_cap: u32,
    /// Agents this close skip the cone and sight checks
    pub agent_nearby_radius: f32,
    /// Food and water this close skip the cone and sight checks
    pub resource_nearby_radius: f32,
    /// Shelters this close skip the cone and sight checks
    pub shelter_nearby_radius: f32,
    /// Shelters are visible this much further than EyeStrength
    pub shelter_sight_bonus: f32,
    /// Random jitter applied to a chosen water target (each axis)
    pub water_jitter: f32,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_dot: 0.6,
            dot_per_eye: 0.05,
            eye_cap: 11,
            agent_nearby_radius: 2.5,
            resource_nearby_radius: 2.0,
            shelter_nearby_radius: 6.0,
            shelter_sight_bonus: 4.0,
            water_jitter: 0.4,
        }
    }
}

/// Overnight settlement amounts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OvernightConfig {
    /// Hunger/thirst at or above the "satisfied" tier gain this much
    pub well_fed_bonus: f32,
    pub starving_penalty: f32,
    pub very_hungry_penalty: f32,
    pub dehydrated_penalty: f32,
    pub very_thirsty_penalty: f32,
    /// Hunger spent sleeping
    pub hunger_cost: f32,
    /// Thirst spent sleeping
    pub thirst_cost: f32,
}

impl Default for OvernightConfig {
    fn default() -> Self {
        Self {
            well_fed_bonus: 10.0,
            starving_penalty: 10.0,
            very_hungry_penalty: 5.0,
            dehydrated_penalty: 15.0,
            very_thirsty_penalty: 8.0,
            hunger_cost: 25.0,
            thirst_cost: 35.0,
        }
    }
}

/// Day/night timings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayCycleConfig {
    /// Game minutes added per clock step
    pub minutes_per_step: u32,
    /// Real seconds per clock step during the day
    pub day_step_seconds: f32,
    /// Real seconds per clock step between midnight and dawn
    pub night_step_seconds: f32,
    pub dusk_hour: u32,
    pub dawn_hour: u32,
    pub cleanup_hour: u32,
    /// Shelter-seek delay is `base - NightSurvivability * per_point` seconds
    pub seek_delay_base: f32,
    pub seek_delay_per_point: f32,
}

impl Default for DayCycleConfig {
    fn default() -> Self {
        Self {
            minutes_per_step: 10,
            day_step_seconds: 0.9,
            night_step_seconds: 0.12,
            dusk_hour: 19,
            dawn_hour: 7,
            cleanup_hour: 2,
            seek_delay_base: 5.0,
            seek_delay_per_point: 0.5,
        }
    }
}

/// Population floor applied at dawn
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PopulationFloor {
    /// Restock when the live count is at or below this
    pub minimum: usize,
    /// How many to spawn when restocking
    pub restock: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationConfig {
    pub top_predator: PopulationFloor,
    pub mid_predator: PopulationFloor,
    pub prey: PopulationFloor,
}

impl PopulationConfig {
    pub fn floor(&self, species: Species) -> PopulationFloor {
        match species {
            Species::TopPredator => self.top_predator,
            Species::MidPredator => self.mid_predator,
            Species::Prey => self.prey,
        }
    }
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            top_predator: PopulationFloor { minimum: 2, restock: 2 },
            mid_predator: PopulationFloor { minimum: 3, restock: 6 },
            prey: PopulationFloor { minimum: 8, restock: 15 },
        }
    }
}

/// Per-species profiles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeciesProfiles {
    pub top_predator: SpeciesProfile,
    pub mid_predator: SpeciesProfile,
    pub prey: SpeciesProfile,
}

impl SpeciesProfiles {
    pub fn get(&self, species: Species) -> &SpeciesProfile {
        match species {
            Species::TopPredator => &self.top_predator,
            Species::MidPredator => &self.mid_predator,
            Species::Prey => &self.prey,
        }
    }
}

impl Default for SpeciesProfiles {
    fn default() -> Self {
        Self {
            top_predator: SpeciesProfile::top_predator(),
            mid_predator: SpeciesProfile::mid_predator(),
            prey: SpeciesProfile::prey(),
        }
    }
}

/// Configuration for the simulation systems
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Fixed tick length in seconds (20 Hz)
    pub tick_seconds: f32,

    /// Cell size of the neighbour grid
    ///
    /// Should be close to the largest EyeStrength so a radius query touches
    /// few cells.
    pub grid_cell_size: f32,

    /// Eating and drinking happen within this distance of the item
    pub interact_distance: f32,

    /// Shelter entry happens within this distance of the entrance
    pub shelter_entry_distance: f32,

    /// Seconds between health ticks
    pub health_tick_seconds: f32,

    /// Drinking takes `(100 - thirst) / drink_rate` seconds
    pub drink_rate: f32,

    /// Carcass meat is scattered this far around the body
    pub carcass_scatter: f32,

    pub thresholds: VitalThresholds,
    pub vision: VisionConfig,
    pub overnight: OvernightConfig,
    pub day_cycle: DayCycleConfig,
    pub population: PopulationConfig,
    pub species: SpeciesProfiles,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_seconds: 0.05,
            grid_cell_size: 20.0,
            interact_distance: 1.0,
            shelter_entry_distance: 0.5,
            health_tick_seconds: 1.5,
            drink_rate: 15.0,
            carcass_scatter: 1.0,
            thresholds: VitalThresholds::default(),
            vision: VisionConfig::default(),
            overnight: OvernightConfig::default(),
            day_cycle: DayCycleConfig::default(),
            population: PopulationConfig::default(),
            species: SpeciesProfiles::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn profile(&self, species: Species) -> &SpeciesProfile {
        self.species.get(species)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.tick_seconds <= 0.0 {
            return Err(EcoError::InvalidConfig("tick_seconds must be positive".into()));
        }

        if self.grid_cell_size <= 0.0 {
            return Err(EcoError::InvalidConfig("grid_cell_size must be positive".into()));
        }

        for (name, scale) in [
            ("health", &self.thresholds.health),
            ("hunger", &self.thresholds.hunger),
            ("thirst", &self.thresholds.thirst),
        ] {
            if !scale.is_descending() {
                return Err(EcoError::InvalidConfig(format!(
                    "{} thresholds must be strictly descending",
                    name
                )));
            }
        }

        if self.drink_rate <= 0.0 {
            return Err(EcoError::InvalidConfig("drink_rate must be positive".into()));
        }

        for species in Species::ALL {
            self.profile(species)
                .validate()
                .map_err(|e| EcoError::InvalidConfig(format!("{}: {}", species.name(), e)))?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimulationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = SimulationConfig::from_toml_str(
            r#"
            tick_seconds = 0.1

            [vision]
            base_dot = 0.5
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_seconds, 0.1);
        assert_eq!(config.vision.base_dot, 0.5);
        assert_eq!(config.vision.agent_nearby_radius, 2.5);
        assert_eq!(config.thresholds, VitalThresholds::default());
        assert_eq!(config.profile(Species::TopPredator).shelter_cost, 3);
    }

    #[test]
    fn test_unordered_thresholds_rejected() {
        let mut config = SimulationConfig::default();
        config.thresholds.hunger.good = 90.0;
        assert!(matches!(config.validate(), Err(EcoError::InvalidConfig(_))));
    }

    #[test]
    fn test_garbage_toml_is_parse_error() {
        let err = SimulationConfig::from_toml_str("tick_seconds = [").unwrap_err();
        assert!(matches!(err, EcoError::ConfigParse(_)));
    }
}
