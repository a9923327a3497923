//! Species profiles
//!
//! Everything that differs between species is data in a `SpeciesProfile`;
//! systems never branch on a concrete species for tuning values.

pub mod mid_predator;
pub mod prey;
pub mod top_predator;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::timer::SecondsRange;
use crate::core::types::FoodKind;

/// Which decision strategy drives the species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyKind {
    /// Ordered rule list, first applicable behavior wins
    PriorityChain,
    /// Every action scored each tick, highest cost wins
    UtilityScoring,
}

/// Reproduction odds and litter size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LitterProfile {
    /// Probability that an eligible adult has young
    pub chance: f64,
    pub min_young: u32,
    pub max_young: u32,
}

impl LitterProfile {
    /// Roll the litter; zero when the chance fails
    pub fn roll<R: Rng + ?Sized>(&self, rng: &mut R) -> u32 {
        if !rng.gen_bool(self.chance.clamp(0.0, 1.0)) {
            return 0;
        }
        rng.gen_range(self.min_young..=self.max_young)
    }
}

/// Tuning for one species
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesProfile {
    pub policy: PolicyKind,
    pub diet: FoodKind,

    /// Centre of the birth attribute-total distribution
    pub base_attribute_total: u32,
    /// Spread of the birth attribute-total distribution
    pub attribute_range: u32,
    /// Inherited totals never exceed this
    pub max_base_total: u32,
    /// Cap on any single attribute
    pub max_attribute: u32,

    /// Units consumed in a shelter
    pub shelter_cost: u32,

    pub attack_range: f32,
    pub attack_cooldown: f32,

    /// Hunger drops by one point every interval
    pub hunger_decay: SecondsRange,
    /// Thirst drops by one point every interval
    pub thirst_decay: SecondsRange,

    /// Hunger restored by one meal
    pub meal_gain: f32,
    pub eating_seconds: f32,

    /// Meat items left behind on death
    pub carcass_food: u32,

    pub litter: LitterProfile,

    /// Spread of the sight reference points around the body
    pub body_radius: f32,
}

impl SpeciesProfile {
    pub fn top_predator() -> Self {
        top_predator::profile()
    }

    pub fn mid_predator() -> Self {
        mid_predator::profile()
    }

    pub fn prey() -> Self {
        prey::profile()
    }

    /// True if this species ever hunts
    pub fn is_predator(&self) -> bool {
        self.diet == FoodKind::Meat
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.attribute_range == 0 {
            return Err("attribute_range must be at least 1".into());
        }
        if self.max_attribute == 0 {
            return Err("max_attribute must be at least 1".into());
        }
        if self.base_attribute_total < 5 {
            return Err(format!(
                "base_attribute_total ({}) must cover one point per attribute",
                self.base_attribute_total
            ));
        }
        if self.max_base_total < self.base_attribute_total {
            return Err(format!(
                "max_base_total ({}) should be >= base_attribute_total ({})",
                self.max_base_total, self.base_attribute_total
            ));
        }
        if self.attack_cooldown <= 0.0 {
            return Err("attack_cooldown must be positive".into());
        }
        if self.litter.min_young > self.litter.max_young {
            return Err("litter min_young must be <= max_young".into());
        }
        if self.hunger_decay.min <= 0.0 || self.thirst_decay.min <= 0.0 {
            return Err("decay intervals must be positive".into());
        }
        Ok(())
    }
}
