//! Top predator (wolf)
//!
//! Hunts both lower species, fears only hungry rivals of its own kind and
//! decides by utility scoring. Eats little per meal and gets hungry fast.

use super::{LitterProfile, PolicyKind, SpeciesProfile};
use crate::core::timer::SecondsRange;
use crate::core::types::FoodKind;

pub fn profile() -> SpeciesProfile {
    SpeciesProfile {
        policy: PolicyKind::UtilityScoring,
        diet: FoodKind::Meat,
        base_attribute_total: 50,
        attribute_range: 20,
        max_base_total: 70,
        max_attribute: 20,
        shelter_cost: 3,
        attack_range: 1.0,
        attack_cooldown: 0.75,
        hunger_decay: SecondsRange::new(0.3, 0.5),
        thirst_decay: SecondsRange::new(0.5, 0.7),
        meal_gain: 25.0,
        eating_seconds: 1.5,
        carcass_food: 7,
        litter: LitterProfile {
            chance: 0.5,
            min_young: 1,
            max_young: 2,
        },
        body_radius: 0.35,
    }
}
