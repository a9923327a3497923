//! Agent state
//!
//! An agent is the unit the decision engine drives: attributes, vitals,
//! remembered targets, behavior flags, cadence timers and day-cycle state.
//! Position and heading are owned by the navigation service, not here.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::SimulationConfig;
use crate::core::error::{EcoError, Result};
use crate::core::timer::IntervalTimer;
use crate::core::types::{AgentId, FoodId, ShelterId, Species, Vec2};
use crate::entity::attributes::Attributes;
use crate::entity::species::SpeciesProfile;
use crate::entity::vitals::{BusyState, Vitals};
use crate::simulation::utility::ActionCosts;

/// What the agent is currently doing, for display and logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Behavior {
    #[default]
    Idle,
    Wander,
    Flee,
    Chase,
    Attack,
    SeekFood,
    SeekWater,
    SeekShelter,
    Eating,
    Drinking,
    Sheltered,
}

/// Remembered sensing results
///
/// Handles may go stale between ticks; consumers re-validate them against
/// the world before use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Targets {
    pub chase: Option<AgentId>,
    pub threat: Option<AgentId>,
    pub food: Option<FoodId>,
    pub water: Option<Vec2>,
    pub shelter: Option<ShelterId>,
}

/// Behavior flags set by sensing and cleared by actions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehaviorFlags {
    pub should_chase: bool,
    pub should_flee: bool,
    pub should_attack: bool,
    pub go_to_food: bool,
    pub go_to_water: bool,
    pub go_to_shelter: bool,
    /// Took damage since the last display refresh
    pub hurt: bool,
}

/// Cadence timers
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentTimers {
    pub wander: IntervalTimer,
    pub look_threats: IntervalTimer,
    pub look_food: IntervalTimer,
    pub look_water: IntervalTimer,
    pub look_shelter: IntervalTimer,
    pub attack_cooldown: IntervalTimer,
}

impl AgentTimers {
    pub fn new(profile: &SpeciesProfile) -> Self {
        Self {
            wander: IntervalTimer::ready(0.0),
            look_threats: IntervalTimer::ready(0.0),
            look_food: IntervalTimer::ready(0.0),
            look_water: IntervalTimer::ready(0.0),
            look_shelter: IntervalTimer::ready(0.0),
            attack_cooldown: IntervalTimer::ready(profile.attack_cooldown),
        }
    }
}

/// Day-cycle flags delivered by the clock and the per-agent reaction state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DayCycleState {
    pub day_ending: bool,
    pub day_over: bool,
    pub day_starting: bool,
    /// Dusk reaction already armed this evening
    pub dusk_handled: bool,
    /// Seconds left before shelter seeking starts
    pub seek_delay: Option<f32>,
    /// Looking for a shelter
    pub seek_shelter: bool,
    /// Top predator accumulates shelter cost while set
    pub shelter_cost_active: bool,
    pub shelter_cost: f32,
    /// Dawn reached; overnight settlement pending
    pub day_finished: bool,
}

impl DayCycleState {
    pub fn reset_evening(&mut self) {
        self.day_ending = false;
        self.day_over = false;
        self.dusk_handled = false;
        self.seek_delay = None;
        self.seek_shelter = false;
        self.shelter_cost_active = false;
    }
}

/// A simulated animal
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub species: Species,
    pub attributes: Attributes,
    /// Attribute total rolled at birth
    pub attribute_total: u32,
    pub vitals: Vitals,
    pub targets: Targets,
    pub flags: BehaviorFlags,
    pub timers: AgentTimers,
    pub cycle: DayCycleState,
    pub busy: BusyState,
    pub behavior: Behavior,
    pub sheltered_in: Option<ShelterId>,
    /// Marked for removal
    pub kill: bool,
    /// Removal processed
    pub killed: bool,
    pub last_costs: Option<ActionCosts>,
    pub generation: u32,
    pub parent: Option<AgentId>,
}

impl Agent {
    pub fn new<R: Rng + ?Sized>(
        id: AgentId,
        species: Species,
        attributes: Attributes,
        attribute_total: u32,
        config: &SimulationConfig,
        rng: &mut R,
    ) -> Self {
        let profile = config.profile(species);
        Self {
            id,
            species,
            attributes,
            attribute_total,
            vitals: Vitals::new(&attributes, profile, config.health_tick_seconds, rng),
            targets: Targets::default(),
            flags: BehaviorFlags::default(),
            timers: AgentTimers::new(profile),
            cycle: DayCycleState::default(),
            busy: BusyState::Idle,
            behavior: Behavior::Idle,
            sheltered_in: None,
            kill: false,
            killed: false,
            last_costs: None,
            generation: 0,
            parent: None,
        }
    }

    pub fn is_sheltered(&self) -> bool {
        self.sheltered_in.is_some()
    }

    /// Alive and not awaiting removal
    pub fn is_active(&self) -> bool {
        !self.kill && !self.killed && !self.vitals.is_dead()
    }

    /// Can be seen, hunted or fled from
    pub fn is_visible(&self) -> bool {
        self.is_active() && !self.is_sheltered()
    }

    /// Mark for removal when health reached zero
    ///
    /// Returns `LethalHealth` exactly once: while marked and not yet
    /// processed. The caller removes the agent and sets `killed`.
    pub fn check_death(&mut self) -> Result<()> {
        if self.vitals.is_dead() {
            self.kill = true;
        }
        if self.kill && !self.killed {
            return Err(EcoError::LethalHealth(self.id));
        }
        Ok(())
    }

    /// Forget everything tied to movement goals
    pub fn clear_pursuits(&mut self) {
        self.targets.chase = None;
        self.targets.threat = None;
        self.targets.food = None;
        self.targets.water = None;
        self.flags.should_chase = false;
        self.flags.should_flee = false;
        self.flags.should_attack = false;
        self.flags.go_to_food = false;
        self.flags.go_to_water = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn agent(species: Species) -> Agent {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let config = SimulationConfig::default();
        Agent::new(
            AgentId::from_rng(&mut rng),
            species,
            Attributes::new(10, 10, 10, 10, 10),
            50,
            &config,
            &mut rng,
        )
    }

    #[test]
    fn test_check_death_fires_once() {
        let mut a = agent(Species::MidPredator);
        assert!(a.check_death().is_ok());

        a.vitals.health = 0.0;
        assert!(matches!(a.check_death(), Err(EcoError::LethalHealth(_))));
        // still pending until processed
        assert!(a.check_death().is_err());

        a.killed = true;
        assert!(a.check_death().is_ok());
        assert!(!a.is_active());
    }

    #[test]
    fn test_sheltered_agents_are_invisible() {
        let mut a = agent(Species::Prey);
        assert!(a.is_visible());
        a.sheltered_in = Some(ShelterId(0));
        assert!(a.is_active());
        assert!(!a.is_visible());
    }

    #[test]
    fn test_new_agent_can_attack_immediately() {
        let a = agent(Species::TopPredator);
        assert!(a.timers.attack_cooldown.is_elapsed());
    }

    #[test]
    fn test_clear_pursuits() {
        let mut a = agent(Species::MidPredator);
        a.targets.food = Some(FoodId(3));
        a.flags.go_to_food = true;
        a.flags.should_flee = true;
        a.clear_pursuits();
        assert!(a.targets.food.is_none());
        assert!(!a.flags.go_to_food);
        assert!(!a.flags.should_flee);
    }
}
