//! Prey (rabbit)
//!
//! Grazes on plants, never attacks, flees both predators. Breeds in large
//! litters.

use super::{LitterProfile, PolicyKind, SpeciesProfile};
use crate::core::timer::SecondsRange;
use crate::core::types::FoodKind;

pub fn profile() -> SpeciesProfile {
    SpeciesProfile {
        policy: PolicyKind::PriorityChain,
        diet: FoodKind::Plant,
        base_attribute_total: 25,
        attribute_range: 10,
        max_base_total: 35,
        max_attribute: 10,
        shelter_cost: 1,
        attack_range: 1.0,
        attack_cooldown: 0.5,
        hunger_decay: SecondsRange::new(0.7, 0.9),
        thirst_decay: SecondsRange::new(0.5, 0.7),
        meal_gain: 35.0,
        eating_seconds: 1.5,
        carcass_food: 2,
        litter: LitterProfile {
            chance: 6.0 / 7.0,
            min_young: 2,
            max_young: 4,
        },
        body_radius: 0.2,
    }
}
