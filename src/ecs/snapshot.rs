//! Read-only views of the population for display and reports

use serde::Serialize;

use crate::core::config::VitalThresholds;
use crate::core::types::{AgentId, Species, Tick};
use crate::entity::agent::{Agent, Behavior};
use crate::entity::attributes::Attributes;
use crate::simulation::utility::ActionCosts;

#[derive(Debug, Clone, Serialize)]
pub struct AgentSnapshot {
    pub id: AgentId,
    pub species: Species,
    pub attributes: Attributes,
    pub attribute_total: u32,
    pub health: f32,
    pub max_health: f32,
    pub hunger: f32,
    pub thirst: f32,
    pub health_tier: &'static str,
    pub hunger_tier: &'static str,
    pub thirst_tier: &'static str,
    pub behavior: Behavior,
    /// Last utility cost table, top predators only
    pub costs: Option<ActionCosts>,
    pub sheltered: bool,
    pub generation: u32,
}

impl AgentSnapshot {
    pub fn capture(agent: &Agent, thresholds: &VitalThresholds) -> Self {
        let v = &agent.vitals;
        Self {
            id: agent.id,
            species: agent.species,
            attributes: agent.attributes,
            attribute_total: agent.attribute_total,
            health: v.health,
            max_health: v.max_health,
            hunger: v.hunger,
            thirst: v.thirst,
            health_tier: v.health_tier(thresholds).health_label(),
            hunger_tier: v.hunger_tier(thresholds).hunger_label(),
            thirst_tier: v.thirst_tier(thresholds).thirst_label(),
            behavior: agent.behavior,
            costs: agent.last_costs,
            sheltered: agent.is_sheltered(),
            generation: agent.generation,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SpeciesCounts {
    pub top_predator: usize,
    pub mid_predator: usize,
    pub prey: usize,
}

impl SpeciesCounts {
    pub fn get(&self, species: Species) -> usize {
        match species {
            Species::TopPredator => self.top_predator,
            Species::MidPredator => self.mid_predator,
            Species::Prey => self.prey,
        }
    }

    pub fn total(&self) -> usize {
        self.top_predator + self.mid_predator + self.prey
    }
}

/// Whole-population view
#[derive(Debug, Clone, Serialize)]
pub struct PopulationSnapshot {
    pub tick: Tick,
    pub counts: SpeciesCounts,
    pub sheltered: usize,
    pub food_items: usize,
    pub agents: Vec<AgentSnapshot>,
}
