//! Utility scoring for the top predator
//!
//! Every tick each candidate action gets a cost in [0, 1] and the highest
//! one runs. Ties go to the action that comes last in evaluation order.

use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// Per-tick shelter cost growth at NightSurvivability 100
pub const SHELTER_COST_RATE: f32 = 0.15;

const CHASE_CEILING: f32 = 0.92;
const ATTACK_CEILING: f32 = 0.96;
const WANDER_CEILING: f32 = 0.92;
const ATTACK_EXPONENT: f32 = 1.3;
const WANDER_EXPONENT: f32 = 0.8;

/// Candidate actions, in evaluation order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UtilityAction {
    Shelter,
    Flee,
    Chase,
    Attack,
    Eat,
    Drink,
    Wander,
}

impl UtilityAction {
    pub const ALL: [UtilityAction; 7] = [
        UtilityAction::Shelter,
        UtilityAction::Flee,
        UtilityAction::Chase,
        UtilityAction::Attack,
        UtilityAction::Eat,
        UtilityAction::Drink,
        UtilityAction::Wander,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            UtilityAction::Shelter => "shelter",
            UtilityAction::Flee => "flee",
            UtilityAction::Chase => "chase",
            UtilityAction::Attack => "attack",
            UtilityAction::Eat => "eat",
            UtilityAction::Drink => "drink",
            UtilityAction::Wander => "wander",
        }
    }
}

/// Cost table for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionCosts {
    pub shelter: f32,
    pub flee: f32,
    pub chase: f32,
    pub attack: f32,
    pub eat: f32,
    pub drink: f32,
    pub wander: f32,
}

impl ActionCosts {
    pub fn get(&self, action: UtilityAction) -> f32 {
        match action {
            UtilityAction::Shelter => self.shelter,
            UtilityAction::Flee => self.flee,
            UtilityAction::Chase => self.chase,
            UtilityAction::Attack => self.attack,
            UtilityAction::Eat => self.eat,
            UtilityAction::Drink => self.drink,
            UtilityAction::Wander => self.wander,
        }
    }

    /// (action, cost) pairs in evaluation order
    pub fn iter(&self) -> impl Iterator<Item = (UtilityAction, f32)> + '_ {
        UtilityAction::ALL.iter().map(move |&a| (a, self.get(a)))
    }

    /// Highest-cost action; the last of equal maxima wins
    pub fn select(&self) -> UtilityAction {
        self.iter()
            .max_by_key(|&(_, cost)| OrderedFloat(cost))
            .map(|(action, _)| action)
            .unwrap_or(UtilityAction::Wander)
    }
}

/// Inputs for one evaluation
///
/// Distances are `None` when the corresponding target is absent or stale.
#[derive(Debug, Clone, Copy, Default)]
pub struct UtilityInputs {
    pub shelter_cost: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub eye_strength: u32,
    pub attack_range: f32,
    pub threat_distance: Option<f32>,
    pub target_distance: Option<f32>,
    pub food_distance: Option<f32>,
    pub water_distance: Option<f32>,
}

impl UtilityInputs {
    pub fn evaluate(&self) -> ActionCosts {
        let eye = self.eye_strength.max(1) as f32;
        let chase = chase_cost(self.hunger, self.target_distance.is_some());
        ActionCosts {
            shelter: self.shelter_cost.clamp(0.0, 1.0),
            flee: flee_cost(self.threat_distance, eye),
            chase,
            attack: attack_cost(self.target_distance, self.attack_range, eye, chase),
            eat: resource_cost(self.hunger / 2.0, self.food_distance, eye),
            drink: resource_cost(self.thirst, self.water_distance, eye),
            wander: wander_cost(self.hunger, self.thirst),
        }
    }
}

/// Shelter cost after one more tick of accrual
pub fn accrue_shelter_cost(current: f32, night_survivability: u32) -> f32 {
    (current + SHELTER_COST_RATE * night_survivability as f32 / 100.0).clamp(0.0, 1.0)
}

pub fn flee_cost(threat_distance: Option<f32>, eye: f32) -> f32 {
    let Some(distance) = threat_distance else {
        return 0.0;
    };
    let base = 1.0 - distance / eye;
    (base + base.powi(3)).clamp(0.0, 1.0)
}

pub fn chase_cost(hunger: f32, has_target: bool) -> f32 {
    if !has_target {
        return 0.0;
    }
    let base = (100.0 - (hunger / 1.25).clamp(1.0, 99.0)) / 100.0;
    (base + base.powi(5)).clamp(0.0, CHASE_CEILING)
}

pub fn attack_cost(target_distance: Option<f32>, attack_range: f32, eye: f32, chase: f32) -> f32 {
    let Some(distance) = target_distance else {
        return 0.0;
    };
    let range = (attack_range - distance) / eye;
    let shaped = range.signum() * range.abs().powf(ATTACK_EXPONENT);
    (shaped + chase).clamp(0.0, ATTACK_CEILING)
}

/// Eat and drink share a shape; `need` is the already-scaled vital
pub fn resource_cost(need: f32, distance: Option<f32>, eye: f32) -> f32 {
    let Some(distance) = distance else {
        return 0.0;
    };
    let mut cost = (100.0 - need.clamp(1.0, 99.0)) / 100.0;
    let closeness = distance / eye;
    if closeness < 1.0 {
        cost += (1.0 - closeness) / 3.0;
    }
    cost.clamp(0.0, 1.0)
}

pub fn wander_cost(hunger: f32, thirst: f32) -> f32 {
    let comfort = (hunger.clamp(1.0, 99.0) / 100.0 + thirst.clamp(1.0, 99.0) / 100.0) / 2.0;
    comfort.powf(WANDER_EXPONENT).clamp(0.0, WANDER_CEILING)
}
