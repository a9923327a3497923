//! Mid predator (fox)
//!
//! Hunts prey and, when starving, weaker foxes. Flees wolves.

use super::{LitterProfile, PolicyKind, SpeciesProfile};
use crate::core::timer::SecondsRange;
use crate::core::types::FoodKind;

pub fn profile() -> SpeciesProfile {
    SpeciesProfile {
        policy: PolicyKind::PriorityChain,
        diet: FoodKind::Meat,
        base_attribute_total: 35,
        attribute_range: 15,
        max_base_total: 50,
        max_attribute: 15,
        shelter_cost: 2,
        attack_range: 1.0,
        attack_cooldown: 0.5,
        hunger_decay: SecondsRange::new(0.7, 0.9),
        thirst_decay: SecondsRange::new(0.5, 0.7),
        meal_gain: 50.0,
        eating_seconds: 1.5,
        carcass_food: 4,
        litter: LitterProfile {
            chance: 0.625,
            min_young: 1,
            max_young: 2,
        },
        body_radius: 0.3,
    }
}
