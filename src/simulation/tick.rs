//! Tick system - one decision pass over the roster
//!
//! For every agent, in roster order:
//! vitals -> death check -> day cycle -> sensing -> policy -> action.
//!
//! Deaths found during the pass are only recorded; the agents are removed
//! after the pass, so roster indices stay valid while agents are being
//! processed. Newborns join the roster after the pass as well.

use rand::Rng;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::combat::resolution::{advance_cooldown, can_attack, ready_to_strike, strike};
use crate::core::timer::SecondsRange;
use crate::core::types::{AgentId, FoodId, FoodKind, ShelterId, Species, Vec2};
use crate::ecs::world::World;
use crate::entity::agent::{Agent, Behavior};
use crate::entity::species::PolicyKind;
use crate::entity::vitals::BusyState;
use crate::simulation::action_select::{select_priority_behavior, PriorityContext};
use crate::simulation::movement::{flee_destination, should_reissue, wander_destination, within};
use crate::simulation::perception::{SensoryFrame, SensorySystem};
use crate::simulation::population::litter_size;
use crate::simulation::utility::{accrue_shelter_cost, UtilityAction, UtilityInputs};
use crate::world::services::{Navigation, Terrain};

const THREAT_SCAN: SecondsRange = SecondsRange::new(0.1, 0.25);
const RESOURCE_SCAN: SecondsRange = SecondsRange::new(0.1, 0.2);
const URGENT_SCAN: SecondsRange = SecondsRange::fixed(0.05);
const SHELTER_SCAN: SecondsRange = SecondsRange::new(0.1, 0.15);
const WANDER_RELAXED: SecondsRange = SecondsRange::new(7.0, 12.0);
const WANDER_NEEDY: SecondsRange = SecondsRange::fixed(0.5);
const WANDER_SEARCHING: SecondsRange = SecondsRange::new(0.05, 0.1);

/// Why an agent left the roster
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeathCause {
    /// Starvation or dehydration wore health down to zero
    Attrition,
    /// Killed by a predator
    Combat,
    /// Still outside a shelter at midnight
    Curfew,
    /// Did not survive the night in shelter
    Overnight,
}

/// Events generated during a tick
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SimulationEvent {
    /// Fresh agent from a restock
    Spawned { agent: AgentId, species: Species },
    Born {
        agent: AgentId,
        parent: AgentId,
        species: Species,
        generation: u32,
    },
    Died {
        agent: AgentId,
        species: Species,
        cause: DeathCause,
    },
    Attacked {
        attacker: AgentId,
        target: AgentId,
        damage: f32,
        target_health: f32,
    },
    Ate { agent: AgentId, food: FoodId },
    Drank { agent: AgentId },
    EnteredShelter { agent: AgentId, shelter: ShelterId },
    Evicted {
        agent: AgentId,
        shelter: ShelterId,
        by: AgentId,
    },
    LeftShelter { agent: AgentId, shelter: ShelterId },
    ShelterDenied { agent: AgentId, shelter: ShelterId },
}

struct Litter {
    parent: AgentId,
    position: Vec2,
    young: u32,
}

struct TickState {
    dt: f32,
    frame: SensoryFrame,
    deaths: Vec<(AgentId, DeathCause)>,
    litters: Vec<Litter>,
    events: Vec<SimulationEvent>,
}

impl TickState {
    fn record_death(&mut self, agent: &mut Agent, cause: DeathCause) {
        agent.kill = true;
        self.deaths.push((agent.id, cause));
    }
}

enum CycleOutcome {
    Continue,
    Doomed,
}

/// Run a single simulation tick
///
/// Returns the events that occurred, in the order they happened.
pub fn run_simulation_tick<N, T>(world: &mut World, nav: &mut N, terrain: &T) -> Vec<SimulationEvent>
where
    N: Navigation + ?Sized,
    T: Terrain + ?Sized,
{
    let mut state = TickState {
        dt: world.config.tick_seconds,
        frame: SensoryFrame::capture(&world.agents, nav, world.config.grid_cell_size),
        deaths: Vec::new(),
        litters: Vec::new(),
        events: Vec::new(),
    };

    for i in 0..world.agents.len() {
        update_agent(world, i, nav, terrain, &mut state);
    }

    deliver_litters(world, nav, &mut state);
    settle_deaths(world, nav, &mut state);

    world.current_tick += 1;
    state.events
}

fn update_agent<N, T>(world: &mut World, i: usize, nav: &mut N, terrain: &T, st: &mut TickState)
where
    N: Navigation + ?Sized,
    T: Terrain + ?Sized,
{
    if world.agents[i].kill || world.agents[i].killed {
        return;
    }

    update_vitals(world, i, st.dt);

    if world.agents[i].check_death().is_err() {
        debug!(agent = %world.agents[i].id, "health ran out");
        st.deaths.push((world.agents[i].id, DeathCause::Attrition));
        return;
    }

    if let CycleOutcome::Doomed = day_cycle(world, i, nav, st) {
        return;
    }

    if world.agents[i].is_sheltered() {
        world.agents[i].behavior = Behavior::Sheltered;
        return;
    }

    if !nav.is_ready(world.agents[i].id) {
        return;
    }

    match world.config.profile(world.agents[i].species).policy {
        PolicyKind::PriorityChain => priority_step(world, i, nav, terrain, st),
        PolicyKind::UtilityScoring => utility_step(world, i, nav, terrain, st),
    }
}

/// Decay, health tick and meal absorption; frozen while sheltered
fn update_vitals(world: &mut World, i: usize, dt: f32) {
    let agent = &mut world.agents[i];
    let profile = world.config.profile(agent.species);

    advance_cooldown(agent, dt);
    if agent.is_sheltered() {
        return;
    }

    agent.vitals.decay(dt, profile, &mut world.rng);
    agent.vitals.advance_health(dt, &world.config.thresholds);
    agent.busy.tick(dt);
    if let Some(busy) = agent.vitals.absorb(profile, world.config.drink_rate) {
        agent.busy = busy;
    }
}

// ---- day cycle ----

fn day_cycle<N: Navigation + ?Sized>(world: &mut World, i: usize, nav: &mut N, st: &mut TickState) -> CycleOutcome {
    let cycle_cfg = world.config.day_cycle;
    let policy = world.config.profile(world.agents[i].species).policy;
    let agent = &mut world.agents[i];
    let ns = agent.attributes.night_survivability;

    if agent.cycle.day_over && !agent.cycle.day_starting {
        agent.cycle.day_ending = false;
        agent.cycle.day_over = false;
        if !agent.is_sheltered() {
            info!(agent = %agent.id, species = agent.species.name(), "caught outside at midnight");
            st.record_death(agent, DeathCause::Curfew);
            return CycleOutcome::Doomed;
        }
    }

    if agent.cycle.day_ending && !agent.cycle.dusk_handled {
        agent.cycle.dusk_handled = true;
        match policy {
            PolicyKind::UtilityScoring => agent.cycle.shelter_cost_active = true,
            PolicyKind::PriorityChain => {
                let delay = (cycle_cfg.seek_delay_base - ns as f32 * cycle_cfg.seek_delay_per_point).max(0.0);
                agent.cycle.seek_delay = Some(delay);
            }
        }
    }

    if let Some(remaining) = agent.cycle.seek_delay {
        let remaining = remaining - st.dt;
        if remaining <= 0.0 {
            agent.cycle.seek_delay = None;
            agent.cycle.seek_shelter = true;
            debug!(agent = %agent.id, "looking for shelter");
        } else {
            agent.cycle.seek_delay = Some(remaining);
        }
    }

    if agent.cycle.shelter_cost_active {
        agent.cycle.shelter_cost = accrue_shelter_cost(agent.cycle.shelter_cost, ns);
    }

    if agent.cycle.day_starting {
        agent.cycle.reset_evening();
        agent.cycle.day_starting = false;
        agent.cycle.day_finished = true;
    }

    if agent.cycle.day_finished {
        agent.cycle.day_finished = false;
        return finish_day(world, i, nav, st);
    }

    CycleOutcome::Continue
}

/// Overnight settlement, breeding and leaving the shelter
fn finish_day<N: Navigation + ?Sized>(world: &mut World, i: usize, nav: &mut N, st: &mut TickState) -> CycleOutcome {
    let id = world.agents[i].id;
    let species = world.agents[i].species;
    let ns = world.agents[i].attributes.night_survivability;

    let survived = world.agents[i].vitals.overnight(
        ns,
        &world.config.thresholds,
        &world.config.overnight,
        &mut world.rng,
    );
    if !survived {
        info!(agent = %id, species = species.name(), "did not survive the night");
        st.record_death(&mut world.agents[i], DeathCause::Overnight);
        return CycleOutcome::Doomed;
    }

    let litter = world.config.profile(species).litter;
    let young = litter_size(&world.agents[i].vitals, ns, &litter, &mut world.rng);
    let den_exit = world.agents[i]
        .sheltered_in
        .and_then(|s| world.shelter(s))
        .map(|s| s.exit);

    match world.exit_shelter(id, nav) {
        Ok(Some(shelter)) => st.events.push(SimulationEvent::LeftShelter { agent: id, shelter }),
        Ok(None) => {}
        Err(e) => warn!(agent = %id, error = %e, "could not leave shelter"),
    }

    if young > 0 {
        if let Some(position) = den_exit.or_else(|| nav.position(id)) {
            st.litters.push(Litter { parent: id, position, young });
        }
    }

    let agent = &mut world.agents[i];
    agent.cycle.shelter_cost = 0.0;
    agent.cycle.shelter_cost_active = false;
    agent.behavior = Behavior::Idle;
    CycleOutcome::Continue
}

// ---- sensing ----

fn sense_threats<T: Terrain + ?Sized>(world: &mut World, i: usize, terrain: &T, st: &TickState) {
    if !world.agents[i].timers.look_threats.advance(st.dt) {
        return;
    }
    let wait = THREAT_SCAN.sample(&mut world.rng);
    world.agents[i].timers.look_threats.set_wait(wait);

    let threat = SensorySystem::new(&world.config, terrain).look_for_attackers(i, &world.agents, &st.frame);
    world.agents[i].targets.threat = threat;
}

fn sense_food<T: Terrain + ?Sized>(world: &mut World, i: usize, terrain: &T, st: &TickState, urgent: bool) {
    if !world.agents[i].timers.look_food.advance(st.dt) {
        return;
    }
    let cadence = if urgent { URGENT_SCAN } else { RESOURCE_SCAN };
    let wait = cadence.sample(&mut world.rng);
    world.agents[i].timers.look_food.set_wait(wait);

    let sensing = SensorySystem::new(&world.config, terrain);
    let food = sensing.look_for_food(i, &world.agents, &st.frame, &world.food);
    let prey = if world.config.profile(world.agents[i].species).is_predator() {
        sensing.look_for_targets(i, &world.agents, &st.frame)
    } else {
        None
    };

    let agent = &mut world.agents[i];
    agent.targets.food = food;
    agent.targets.chase = prey;
}

fn sense_water<T: Terrain + ?Sized>(world: &mut World, i: usize, terrain: &T, st: &TickState, urgent: bool) {
    if !world.agents[i].timers.look_water.advance(st.dt) {
        return;
    }
    let cadence = if urgent { URGENT_SCAN } else { RESOURCE_SCAN };
    let wait = cadence.sample(&mut world.rng);
    world.agents[i].timers.look_water.set_wait(wait);

    let spot = SensorySystem::new(&world.config, terrain).look_for_water(
        i,
        &world.agents,
        &st.frame,
        &world.water,
        &mut world.rng,
    );
    // water never runs out; keep the last known spot when nothing is in view
    if spot.is_some() {
        world.agents[i].targets.water = spot;
    }
}

fn sense_shelter<T: Terrain + ?Sized>(world: &mut World, i: usize, terrain: &T, st: &TickState) {
    if !world.agents[i].timers.look_shelter.advance(st.dt) {
        return;
    }
    let wait = SHELTER_SCAN.sample(&mut world.rng);
    world.agents[i].timers.look_shelter.set_wait(wait);

    let den = SensorySystem::new(&world.config, terrain).look_for_shelter(i, &world.agents, &st.frame, &world.shelters);
    world.agents[i].targets.shelter = den;
}

/// Position of a still-valid agent reference
fn live_position<N: Navigation + ?Sized>(world: &World, id: Option<AgentId>, nav: &N) -> Option<Vec2> {
    let id = id?;
    world.agent(id).filter(|a| a.is_visible())?;
    nav.position(id)
}

/// Drop remembered targets that no longer exist
fn validate_targets<N: Navigation + ?Sized>(world: &mut World, i: usize, nav: &N) {
    let (chase, threat, food, shelter) = {
        let t = &world.agents[i].targets;
        (t.chase, t.threat, t.food, t.shelter)
    };
    let species = world.agents[i].species;
    let units = world.config.profile(species).shelter_cost;

    let chase_ok = live_position(world, chase, nav).is_some();
    let threat_ok = live_position(world, threat, nav).is_some();
    let food_ok = food.map_or(true, |f| world.food_item(f).is_some());
    let shelter_ok = shelter.map_or(true, |s| world.shelter(s).is_some_and(|d| d.can_admit(species, units)));

    let agent = &mut world.agents[i];
    if chase.is_some() && !chase_ok {
        debug!(agent = %agent.id, "chase target gone");
        agent.targets.chase = None;
    }
    if threat.is_some() && !threat_ok {
        agent.targets.threat = None;
    }
    if !food_ok {
        debug!(agent = %agent.id, "food target gone");
        agent.targets.food = None;
    }
    if !shelter_ok {
        agent.targets.shelter = None;
    }
}

// ---- policies ----

fn priority_step<N, T>(world: &mut World, i: usize, nav: &mut N, terrain: &T, st: &mut TickState)
where
    N: Navigation + ?Sized,
    T: Terrain + ?Sized,
{
    let thresholds = world.config.thresholds;
    let (hunger, thirst) = (world.agents[i].vitals.hunger, world.agents[i].vitals.thirst);
    let thirsty = thirst <= thresholds.thirst.low;
    let hungry = hunger < thresholds.hunger.good;

    sense_threats(world, i, terrain, st);
    if thirsty {
        sense_water(world, i, terrain, st, thirst <= thresholds.thirst.critical);
    }
    if hungry {
        sense_food(world, i, terrain, st, hunger < thresholds.hunger.low);
    }
    if world.agents[i].cycle.seek_shelter {
        sense_shelter(world, i, terrain, st);
    }
    validate_targets(world, i, nav);

    let agent = &world.agents[i];
    let id = agent.id;
    let range = world.config.profile(agent.species).attack_range;
    let my_pos = nav.position(id);
    let target = agent
        .targets
        .chase
        .and_then(|t| Some((world.agent(t)?, nav.position(t)?)));

    let ctx = PriorityContext {
        doomed: agent.kill,
        sheltered: agent.is_sheltered(),
        seek_shelter: agent.cycle.seek_shelter,
        busy: agent.busy,
        threat_visible: agent.targets.threat.is_some(),
        thirsty,
        hungry,
        water_known: agent.targets.water.is_some(),
        food_known: agent.targets.food.is_some(),
        target_known: target.is_some(),
        target_in_range: my_pos.is_some_and(|p| can_attack(p, range, target)),
        cooldown_ready: agent.timers.attack_cooldown.is_elapsed(),
    };

    let Some(behavior) = select_priority_behavior(&ctx) else {
        return;
    };
    perform(world, i, behavior, nav, terrain, st);
}

fn utility_step<N, T>(world: &mut World, i: usize, nav: &mut N, terrain: &T, st: &mut TickState)
where
    N: Navigation + ?Sized,
    T: Terrain + ?Sized,
{
    let thresholds = world.config.thresholds;
    let (hunger, thirst) = (world.agents[i].vitals.hunger, world.agents[i].vitals.thirst);

    sense_threats(world, i, terrain, st);
    sense_food(world, i, terrain, st, hunger < thresholds.hunger.critical);
    sense_water(world, i, terrain, st, thirst <= thresholds.thirst.critical);
    if world.agents[i].cycle.shelter_cost_active {
        sense_shelter(world, i, terrain, st);
    }
    validate_targets(world, i, nav);

    match world.agents[i].busy {
        BusyState::Eating { .. } => {
            world.agents[i].behavior = Behavior::Eating;
            return;
        }
        BusyState::Drinking { .. } => {
            world.agents[i].behavior = Behavior::Drinking;
            return;
        }
        BusyState::Idle => {}
    }

    let agent = &world.agents[i];
    let Some(my_pos) = nav.position(agent.id) else {
        return;
    };
    let distance_to = |p: Option<Vec2>| p.map(|p| my_pos.distance(p));
    let inputs = UtilityInputs {
        shelter_cost: agent.cycle.shelter_cost,
        hunger,
        thirst,
        eye_strength: agent.attributes.eye_strength,
        attack_range: world.config.profile(agent.species).attack_range,
        threat_distance: distance_to(live_position(world, agent.targets.threat, nav)),
        target_distance: distance_to(live_position(world, agent.targets.chase, nav)),
        food_distance: distance_to(agent.targets.food.and_then(|f| world.food_item(f)).map(|f| f.position)),
        water_distance: distance_to(agent.targets.water),
    };

    let costs = inputs.evaluate();
    let action = costs.select();
    world.agents[i].last_costs = Some(costs);

    let behavior = match action {
        UtilityAction::Shelter => Behavior::SeekShelter,
        UtilityAction::Flee => Behavior::Flee,
        UtilityAction::Chase => Behavior::Chase,
        UtilityAction::Attack => Behavior::Attack,
        UtilityAction::Eat => Behavior::SeekFood,
        UtilityAction::Drink => Behavior::SeekWater,
        UtilityAction::Wander => Behavior::Wander,
    };
    perform(world, i, behavior, nav, terrain, st);
}

// ---- actions ----

fn perform<N, T>(world: &mut World, i: usize, behavior: Behavior, nav: &mut N, terrain: &T, st: &mut TickState)
where
    N: Navigation + ?Sized,
    T: Terrain + ?Sized,
{
    {
        let agent = &mut world.agents[i];
        agent.behavior = behavior;
        agent.flags.should_flee = behavior == Behavior::Flee;
        agent.flags.should_chase = matches!(behavior, Behavior::Chase | Behavior::Attack);
        agent.flags.should_attack = behavior == Behavior::Attack;
        agent.flags.go_to_food = behavior == Behavior::SeekFood;
        agent.flags.go_to_water = behavior == Behavior::SeekWater;
        agent.flags.go_to_shelter = behavior == Behavior::SeekShelter;
    }

    let id = world.agents[i].id;
    let Some(my_pos) = nav.position(id) else {
        return;
    };

    match behavior {
        Behavior::Idle | Behavior::Sheltered | Behavior::Eating | Behavior::Drinking => {}
        Behavior::SeekShelter => go_to_shelter(world, i, my_pos, nav, terrain, st),
        Behavior::Flee => flee(world, i, my_pos, nav, terrain),
        Behavior::SeekWater => go_to_water(world, i, my_pos, nav, st),
        Behavior::SeekFood => go_to_food(world, i, my_pos, nav, st),
        Behavior::Attack => attack(world, i, my_pos, nav, st),
        Behavior::Chase => chase(world, i, nav),
        Behavior::Wander => wander(world, i, my_pos, nav, terrain, st),
    }
}

fn chase<N: Navigation + ?Sized>(world: &mut World, i: usize, nav: &mut N) {
    let id = world.agents[i].id;
    if let Some(target) = live_position(world, world.agents[i].targets.chase, nav) {
        nav.set_destination(id, target);
    }
}

fn attack<N: Navigation + ?Sized>(world: &mut World, i: usize, my_pos: Vec2, nav: &mut N, st: &mut TickState) {
    let id = world.agents[i].id;
    let range = world.config.profile(world.agents[i].species).attack_range;
    let target_id = world.agents[i].targets.chase;
    let target_idx = target_id.and_then(|t| world.index_of(t));
    let target_pos = target_id.and_then(|t| nav.position(t));

    let lookup = target_idx.zip(target_pos).map(|(t, p)| (&world.agents[t], p));
    if let Err(e) = ready_to_strike(&world.agents[i], my_pos, range, lookup) {
        debug!(agent = %id, error = %e, "attack not possible");
        return;
    }
    let (Some(t), Some(target_id)) = (target_idx, target_id) else {
        return;
    };
    let Some((attacker, target)) = pair_mut(&mut world.agents, i, t) else {
        return;
    };

    let result = strike(attacker, target);
    st.events.push(SimulationEvent::Attacked {
        attacker: id,
        target: target_id,
        damage: result.damage,
        target_health: result.target_health,
    });

    if result.lethal {
        info!(attacker = %id, target = %target_id, species = target.species.name(), "killed");
        st.record_death(target, DeathCause::Combat);
        attacker.targets.chase = None;
    }
}

fn flee<N, T>(world: &mut World, i: usize, my_pos: Vec2, nav: &mut N, terrain: &T)
where
    N: Navigation + ?Sized,
    T: Terrain + ?Sized,
{
    let id = world.agents[i].id;
    let Some(threat) = live_position(world, world.agents[i].targets.threat, nav) else {
        return;
    };
    let eye = world.agents[i].attributes.eye_strength;
    match flee_destination(my_pos, threat, eye, terrain, &mut world.rng) {
        Ok(dest) => {
            if should_reissue(nav.destination(id), dest) {
                nav.set_destination(id, dest);
            }
        }
        Err(e) => debug!(agent = %id, error = %e, "flee intent dropped"),
    }
}

fn go_to_food<N: Navigation + ?Sized>(world: &mut World, i: usize, my_pos: Vec2, nav: &mut N, st: &mut TickState) {
    let id = world.agents[i].id;
    let Some(food) = world.agents[i].targets.food.and_then(|f| world.food_item(f)).copied() else {
        return;
    };

    if within(my_pos, food.position, world.config.interact_distance) {
        world.remove_food(food.id);
        let agent = &mut world.agents[i];
        agent.vitals.ate = true;
        agent.targets.food = None;
        agent.flags.go_to_food = false;
        st.events.push(SimulationEvent::Ate { agent: id, food: food.id });
    } else {
        nav.set_destination(id, food.position);
    }
}

fn go_to_water<N: Navigation + ?Sized>(world: &mut World, i: usize, my_pos: Vec2, nav: &mut N, st: &mut TickState) {
    let id = world.agents[i].id;
    let Some(spot) = world.agents[i].targets.water else {
        return;
    };

    if within(my_pos, spot, world.config.interact_distance) {
        let agent = &mut world.agents[i];
        agent.vitals.drank = true;
        agent.targets.water = None;
        agent.flags.go_to_water = false;
        st.events.push(SimulationEvent::Drank { agent: id });
    } else {
        nav.set_destination(id, spot);
    }
}

fn go_to_shelter<N, T>(world: &mut World, i: usize, my_pos: Vec2, nav: &mut N, terrain: &T, st: &mut TickState)
where
    N: Navigation + ?Sized,
    T: Terrain + ?Sized,
{
    let id = world.agents[i].id;
    let den = world.agents[i]
        .targets
        .shelter
        .and_then(|s| world.shelter(s))
        .map(|s| (s.id, s.entrance));

    let Some((shelter, entrance)) = den else {
        // nothing in view yet: keep searching
        wander(world, i, my_pos, nav, terrain, st);
        return;
    };

    if !within(my_pos, entrance, world.config.shelter_entry_distance) {
        nav.set_destination(id, entrance);
        return;
    }

    match world.enter_shelter(id, shelter, nav) {
        Ok(entry) => {
            st.events.push(SimulationEvent::EnteredShelter { agent: id, shelter });
            for agent in entry.evicted {
                st.events.push(SimulationEvent::Evicted { agent, shelter, by: id });
            }
        }
        Err(e) => {
            debug!(agent = %id, shelter = shelter.0, error = %e, "shelter entry refused");
            st.events.push(SimulationEvent::ShelterDenied { agent: id, shelter });
            let agent = &mut world.agents[i];
            agent.targets.shelter = None;
            agent.flags.go_to_shelter = false;
            agent.behavior = Behavior::Wander;
            wander(world, i, my_pos, nav, terrain, st);
        }
    }
}

fn wander<N, T>(world: &mut World, i: usize, my_pos: Vec2, nav: &mut N, terrain: &T, st: &TickState)
where
    N: Navigation + ?Sized,
    T: Terrain + ?Sized,
{
    let thresholds = world.config.thresholds;
    let agent = &mut world.agents[i];
    let id = agent.id;

    let searching = agent.cycle.seek_shelter || agent.cycle.shelter_cost_active;
    let needy = agent.vitals.hunger < thresholds.hunger.low || agent.vitals.thirst <= thresholds.thirst.low;
    let cadence = if searching {
        WANDER_SEARCHING
    } else if needy {
        WANDER_NEEDY
    } else {
        WANDER_RELAXED
    };

    // a shorter cadence takes effect at once
    if agent.timers.wander.wait() > cadence.max {
        agent.timers.wander.set_wait(cadence.sample(&mut world.rng));
    }
    if !agent.timers.wander.advance(st.dt) {
        return;
    }
    agent.timers.wander.set_wait(cadence.sample(&mut world.rng));

    let heading = nav.heading(id).unwrap_or(Vec2::X);
    let eye = agent.attributes.eye_strength;
    match wander_destination(my_pos, heading, eye, terrain, &mut world.rng) {
        Ok(dest) => nav.set_destination(id, dest),
        Err(e) => debug!(agent = %id, error = %e, "wander intent dropped"),
    }
}

/// Two distinct agents borrowed mutably
fn pair_mut(agents: &mut [Agent], a: usize, b: usize) -> Option<(&mut Agent, &mut Agent)> {
    if a == b || a >= agents.len() || b >= agents.len() {
        return None;
    }
    if a < b {
        let (left, right) = agents.split_at_mut(b);
        Some((&mut left[a], &mut right[0]))
    } else {
        let (left, right) = agents.split_at_mut(a);
        Some((&mut right[0], &mut left[b]))
    }
}

// ---- end of tick ----

fn deliver_litters<N: Navigation + ?Sized>(world: &mut World, nav: &mut N, st: &mut TickState) {
    for litter in std::mem::take(&mut st.litters) {
        for _ in 0..litter.young {
            match world.spawn_child(litter.parent, litter.position, nav) {
                Ok(child) => {
                    let Some(c) = world.agent(child) else {
                        continue;
                    };
                    info!(agent = %child, parent = %litter.parent, species = c.species.name(), "born");
                    st.events.push(SimulationEvent::Born {
                        agent: child,
                        parent: litter.parent,
                        species: c.species,
                        generation: c.generation,
                    });
                }
                Err(e) => warn!(parent = %litter.parent, error = %e, "birth failed"),
            }
        }
    }
}

fn settle_deaths<N: Navigation + ?Sized>(world: &mut World, nav: &mut N, st: &mut TickState) {
    for (id, cause) in std::mem::take(&mut st.deaths) {
        let body = nav.position(id);
        // a second cause for an already removed agent is ignored
        let Ok(agent) = world.remove_agent(id, nav) else {
            continue;
        };
        info!(agent = %id, species = agent.species.name(), cause = ?cause, "died");

        if cause != DeathCause::Overnight {
            if let Some(pos) = body {
                drop_carcass(world, agent.species, pos);
            }
        }
        st.events.push(SimulationEvent::Died {
            agent: id,
            species: agent.species,
            cause,
        });
    }
}

fn drop_carcass(world: &mut World, species: Species, at: Vec2) {
    let pieces = world.config.profile(species).carcass_food;
    let scatter = world.config.carcass_scatter;
    for _ in 0..pieces {
        let offset = if scatter > 0.0 {
            Vec2::new(
                world.rng.gen_range(-scatter..=scatter),
                world.rng.gen_range(-scatter..=scatter),
            )
        } else {
            Vec2::ZERO
        };
        world.add_food(FoodKind::Meat, at + offset);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::SimulationConfig;
    use crate::entity::vitals::Vitals;
    use crate::world::blocking::OpenField;
    use crate::world::navigation::KinematicNavigator;

    fn setup() -> (World, KinematicNavigator) {
        (World::new(SimulationConfig::default(), 42), KinematicNavigator::new())
    }

    #[test]
    fn test_vitals_stay_clamped() {
        let (mut world, mut nav) = setup();
        for i in 0..10 {
            world.spawn_agent(Species::Prey, Vec2::new(i as f32 * 3.0, 0.0), &mut nav);
        }
        for _ in 0..400 {
            run_simulation_tick(&mut world, &mut nav, &OpenField);
            nav.step(0.05);
            assert!(world.agents().iter().all(|a| a.vitals.is_clamped()));
        }
        assert_eq!(world.current_tick, 400);
    }

    #[test]
    fn test_starved_agent_dies_and_leaves_carcass() {
        let (mut world, mut nav) = setup();
        let fox = world.spawn_agent(Species::MidPredator, Vec2::new(5.0, 5.0), &mut nav);
        world.agent_mut(fox).unwrap().vitals = Vitals::with_values(0.0, 40.0, 0.0, 0.0);

        let events = run_simulation_tick(&mut world, &mut nav, &OpenField);
        assert!(events.iter().any(|e| matches!(
            e,
            SimulationEvent::Died { cause: DeathCause::Attrition, .. }
        )));
        assert_eq!(world.agent_count(), 0);
        assert_eq!(world.food.len(), 4);
        assert!(world.food.iter().all(|f| f.kind == FoodKind::Meat));
        assert!(world
            .food
            .iter()
            .all(|f| (f.position - Vec2::new(5.0, 5.0)).abs().max_element() <= 1.0));
    }

    #[test]
    fn test_curfew_kills_agents_outside() {
        let (mut world, mut nav) = setup();
        let den = world.add_shelter(Vec2::new(50.0, 50.0), Vec2::new(50.0, 48.0), Vec2::new(50.0, 47.0), 10);
        let inside = world.spawn_agent(Species::Prey, Vec2::new(50.0, 48.0), &mut nav);
        let outside = world.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        world.enter_shelter(inside, den, &mut nav).unwrap();

        world.notify_midnight();
        let events = run_simulation_tick(&mut world, &mut nav, &OpenField);

        assert!(world.agent(inside).is_some());
        assert!(world.agent(outside).is_none());
        assert!(events.contains(&SimulationEvent::Died {
            agent: outside,
            species: Species::Prey,
            cause: DeathCause::Curfew,
        }));
        assert!(!world.agent(inside).unwrap().cycle.day_over);
    }

    #[test]
    fn test_prey_flees_visible_predator() {
        let (mut world, mut nav) = setup();
        let rabbit = world.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        let fox = world.spawn_agent(Species::MidPredator, Vec2::new(2.0, 0.0), &mut nav);
        // fox is sated so it stays put
        world.agent_mut(fox).unwrap().vitals.hunger = 100.0;

        run_simulation_tick(&mut world, &mut nav, &OpenField);
        let r = world.agent(rabbit).unwrap();
        assert_eq!(r.targets.threat, Some(fox));
        assert_eq!(r.behavior, Behavior::Flee);
        let dest = nav.destination(rabbit).unwrap();
        assert!(dest.x < 0.0);
    }

    #[test]
    fn test_hungry_fox_attacks_adjacent_rabbit() {
        let (mut world, mut nav) = setup();
        let fox = world.spawn_agent(Species::MidPredator, Vec2::ZERO, &mut nav);
        let rabbit = world.spawn_agent(Species::Prey, Vec2::new(0.5, 0.0), &mut nav);
        world.agent_mut(fox).unwrap().vitals.hunger = 10.0;
        world.agent_mut(fox).unwrap().attributes.strength = 500;

        let events = run_simulation_tick(&mut world, &mut nav, &OpenField);
        assert!(events.iter().any(|e| matches!(e, SimulationEvent::Attacked { attacker, .. } if *attacker == fox)));
        assert!(events.contains(&SimulationEvent::Died {
            agent: rabbit,
            species: Species::Prey,
            cause: DeathCause::Combat,
        }));
        assert!(world.agent(rabbit).is_none());
        assert_eq!(world.food.iter().filter(|f| f.kind == FoodKind::Meat).count(), 2);
        assert!(!world.agent(fox).unwrap().timers.attack_cooldown.is_elapsed());
    }

    #[test]
    fn test_eating_adds_meal_and_busies() {
        let (mut world, mut nav) = setup();
        let rabbit = world.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        world.agent_mut(rabbit).unwrap().vitals.hunger = 30.0;
        let heading = nav.heading(rabbit).unwrap();
        world.add_food(FoodKind::Plant, heading * 0.5);

        let events = run_simulation_tick(&mut world, &mut nav, &OpenField);
        assert!(events.iter().any(|e| matches!(e, SimulationEvent::Ate { .. })));
        assert!(world.food.is_empty());

        run_simulation_tick(&mut world, &mut nav, &OpenField);
        let r = world.agent(rabbit).unwrap();
        assert!(r.busy.is_busy());
        assert!(r.vitals.hunger > 60.0);
        assert_eq!(r.behavior, Behavior::Eating);
    }

    #[test]
    fn test_dusk_arms_shelter_seek_after_delay() {
        let (mut world, mut nav) = setup();
        let fox = world.spawn_agent(Species::MidPredator, Vec2::ZERO, &mut nav);
        world.agent_mut(fox).unwrap().attributes.night_survivability = 8;
        world.notify_dusk_approaching();

        // delay is 5 - 8 * 0.5 = 1 second
        run_simulation_tick(&mut world, &mut nav, &OpenField);
        assert!(!world.agent(fox).unwrap().cycle.seek_shelter);
        for _ in 0..20 {
            run_simulation_tick(&mut world, &mut nav, &OpenField);
        }
        assert!(world.agent(fox).unwrap().cycle.seek_shelter);
    }

    #[test]
    fn test_top_predator_accrues_shelter_cost() {
        let (mut world, mut nav) = setup();
        let wolf = world.spawn_agent(Species::TopPredator, Vec2::ZERO, &mut nav);
        world.notify_dusk_approaching();
        for _ in 0..5 {
            run_simulation_tick(&mut world, &mut nav, &OpenField);
        }
        let w = world.agent(wolf).unwrap();
        assert!(w.cycle.shelter_cost_active);
        assert!(w.cycle.shelter_cost > 0.0);
        assert!(w.last_costs.is_some());
    }

    #[test]
    fn test_shelter_entry_and_dawn_exit() {
        let (mut world, mut nav) = setup();
        let den = world.add_shelter(Vec2::new(0.0, 3.0), Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.5), 10);
        let rabbit = world.spawn_agent(Species::Prey, Vec2::new(0.0, 0.8), &mut nav);
        {
            let r = world.agent_mut(rabbit).unwrap();
            r.cycle.seek_shelter = true;
            r.vitals = Vitals::with_values(30.0, 40.0, 90.0, 90.0);
        }

        let events = run_simulation_tick(&mut world, &mut nav, &OpenField);
        assert!(events.contains(&SimulationEvent::EnteredShelter { agent: rabbit, shelter: den }));
        assert_eq!(world.agent(rabbit).unwrap().sheltered_in, Some(den));
        let (hunger, thirst) = {
            let v = &world.agent(rabbit).unwrap().vitals;
            (v.hunger, v.thirst)
        };

        world.notify_dawn();
        let events = run_simulation_tick(&mut world, &mut nav, &OpenField);
        assert!(events.contains(&SimulationEvent::LeftShelter { agent: rabbit, shelter: den }));
        let r = world.agent(rabbit).unwrap();
        assert!(!r.is_sheltered());
        assert!(!r.cycle.seek_shelter);
        assert_eq!(nav.position(rabbit), Some(Vec2::new(0.0, 0.5)));
        assert_eq!(r.vitals.hunger, hunger - 25.0);
        assert_eq!(r.vitals.thirst, thirst - 35.0);
    }

    #[test]
    fn test_overnight_death_leaves_no_carcass() {
        let (mut world, mut nav) = setup();
        let den = world.add_shelter(Vec2::ZERO, Vec2::new(0.0, -2.0), Vec2::new(0.0, -3.0), 10);
        let fox = world.spawn_agent(Species::MidPredator, Vec2::ZERO, &mut nav);
        world.enter_shelter(fox, den, &mut nav).unwrap();
        {
            let f = world.agent_mut(fox).unwrap();
            f.attributes.night_survivability = 1;
            f.vitals = Vitals::with_values(5.0, 40.0, 0.0, 0.0);
        }

        world.notify_dawn();
        let events = run_simulation_tick(&mut world, &mut nav, &OpenField);
        assert!(events.contains(&SimulationEvent::Died {
            agent: fox,
            species: Species::MidPredator,
            cause: DeathCause::Overnight,
        }));
        assert!(world.food.is_empty());
        assert!(world.shelter(den).unwrap().is_empty());
    }

    #[test]
    fn test_failed_attack_leaves_destination_alone() {
        let (mut world, mut nav) = setup();
        let wolf = world.spawn_agent(Species::TopPredator, Vec2::ZERO, &mut nav);
        let fox = world.spawn_agent(Species::MidPredator, Vec2::new(0.5, 0.0), &mut nav);
        world.agent_mut(wolf).unwrap().targets.chase = Some(fox);
        // just struck: still cooling down
        world.agent_mut(wolf).unwrap().timers.attack_cooldown.reset();
        nav.set_destination(wolf, Vec2::new(-4.0, 0.0));
        let health = world.agent(fox).unwrap().vitals.health;

        let mut st = TickState {
            dt: world.config.tick_seconds,
            frame: SensoryFrame::capture(&world.agents, &nav, world.config.grid_cell_size),
            deaths: Vec::new(),
            litters: Vec::new(),
            events: Vec::new(),
        };
        attack(&mut world, 0, Vec2::ZERO, &mut nav, &mut st);

        assert!(st.events.is_empty());
        assert_eq!(nav.destination(wolf), Some(Vec2::new(-4.0, 0.0)));
        assert_eq!(world.agent(fox).unwrap().vitals.health, health);
    }

    #[test]
    fn test_wander_cadence_follows_hungry_tier() {
        let (mut world, mut nav) = setup();
        let peckish = world.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        let hungry = world.spawn_agent(Species::Prey, Vec2::new(40.0, 0.0), &mut nav);
        world.agent_mut(peckish).unwrap().vitals = Vitals::with_values(30.0, 40.0, 50.0, 90.0);
        world.agent_mut(hungry).unwrap().vitals = Vitals::with_values(30.0, 40.0, 30.0, 90.0);

        run_simulation_tick(&mut world, &mut nav, &OpenField);

        let relaxed = world.agent(peckish).unwrap();
        assert_eq!(relaxed.behavior, Behavior::Wander);
        assert!(relaxed.timers.wander.wait() >= WANDER_RELAXED.min);
        let needy = world.agent(hungry).unwrap();
        assert_eq!(needy.behavior, Behavior::Wander);
        assert!(needy.timers.wander.wait() <= WANDER_NEEDY.max);
    }

    #[test]
    fn test_evicted_prey_finds_another_den() {
        let (mut world, mut nav) = setup();
        let taken = world.add_shelter(Vec2::new(0.0, 3.0), Vec2::new(0.0, 1.0), Vec2::new(0.0, 0.5), 10);
        let spare = world.add_shelter(Vec2::new(3.0, -3.0), Vec2::new(3.0, -1.0), Vec2::new(3.0, -0.5), 10);
        let rabbit = world.spawn_agent(Species::Prey, Vec2::new(0.0, 0.8), &mut nav);
        let wolf = world.spawn_agent(Species::TopPredator, Vec2::new(0.0, 1.0), &mut nav);
        for id in [rabbit, wolf] {
            world.agent_mut(id).unwrap().vitals.hunger = 90.0;
            world.agent_mut(id).unwrap().vitals.thirst = 90.0;
        }

        world.notify_dusk_approaching();
        {
            let r = world.agent_mut(rabbit).unwrap();
            r.cycle.dusk_handled = true;
            r.cycle.seek_shelter = true;
        }
        world.enter_shelter(rabbit, taken, &mut nav).unwrap();
        let entry = world.enter_shelter(wolf, taken, &mut nav).unwrap();
        assert_eq!(entry.evicted, vec![rabbit]);
        assert!(world.agent(rabbit).unwrap().cycle.seek_shelter);

        nav.set_speed(rabbit, 4.0);
        for _ in 0..80 {
            run_simulation_tick(&mut world, &mut nav, &OpenField);
            nav.step(0.05);
            if world.agent(rabbit).unwrap().is_sheltered() {
                break;
            }
        }
        assert_eq!(world.agent(rabbit).unwrap().sheltered_in, Some(spare));

        world.notify_midnight();
        let events = run_simulation_tick(&mut world, &mut nav, &OpenField);
        assert!(!events.iter().any(|e| matches!(e, SimulationEvent::Died { .. })));
        assert!(world.agent(rabbit).is_some());
        assert!(world.agent(wolf).is_some());
    }

    #[test]
    fn test_pair_mut() {
        let (mut world, mut nav) = setup();
        world.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        world.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        assert!(pair_mut(&mut world.agents, 0, 0).is_none());
        let (a, b) = pair_mut(&mut world.agents, 1, 0).unwrap();
        assert_ne!(a.id, b.id);
    }
}
