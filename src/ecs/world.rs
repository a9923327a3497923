//! World registry - agents, shelters, food and water
//!
//! Agents live in a roster vector processed in order every tick. An
//! id -> index map gives O(1) lookup; removals compact the roster and
//! rewrite the index of every agent after the removed one.

use ahash::AHashMap;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::core::config::SimulationConfig;
use crate::core::error::{EcoError, Result};
use crate::core::types::{heading_from_degrees, AgentId, FoodId, FoodKind, ShelterId, Species, Tick, Vec2, WaterId};
use crate::ecs::snapshot::{AgentSnapshot, PopulationSnapshot, SpeciesCounts};
use crate::entity::agent::{Agent, Behavior};
use crate::genetics::{inherit, Phenotype};
use crate::simulation::shelter::{Entry, Shelter};
use crate::world::objects::{FoodItem, WaterPoint};
use crate::world::services::Navigation;

/// Navigation speed per point of Speed
const SPEED_DIVISOR: f32 = 4.0;

/// The simulated ecosystem
pub struct World {
    pub config: SimulationConfig,
    pub current_tick: Tick,
    pub(crate) agents: Vec<Agent>,
    index: AHashMap<AgentId, usize>,
    pub shelters: Vec<Shelter>,
    pub food: Vec<FoodItem>,
    pub water: Vec<WaterPoint>,
    pub rng: ChaCha8Rng,
    next_food: u64,
}

impl World {
    pub fn new(config: SimulationConfig, seed: u64) -> Self {
        Self {
            config,
            current_tick: 0,
            agents: Vec::new(),
            index: AHashMap::new(),
            shelters: Vec::new(),
            food: Vec::new(),
            water: Vec::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            next_food: 0,
        }
    }

    // ---- agents ----

    /// Live roster in processing order
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    pub fn index_of(&self, id: AgentId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.index_of(id).and_then(|i| self.agents.get(i))
    }

    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        let i = self.index_of(id)?;
        self.agents.get_mut(i)
    }

    /// Active agents of a species
    pub fn count(&self, species: Species) -> usize {
        self.agents
            .iter()
            .filter(|a| a.species == species && a.is_active())
            .count()
    }

    /// Spawn a first-generation agent with random attributes
    pub fn spawn_agent<N: Navigation + ?Sized>(&mut self, species: Species, position: Vec2, nav: &mut N) -> AgentId {
        let phenotype = Phenotype::random(self.config.profile(species), &mut self.rng);
        self.insert_agent(species, phenotype, position, None, nav)
    }

    /// Spawn a child that inherits from `parent`
    pub fn spawn_child<N: Navigation + ?Sized>(&mut self, parent: AgentId, position: Vec2, nav: &mut N) -> Result<AgentId> {
        let idx = self.index_of(parent).ok_or(EcoError::AgentNotFound(parent))?;
        let species = self.agents[idx].species;
        let attributes = self.agents[idx].attributes;
        let phenotype = inherit(&attributes, self.config.profile(species), &mut self.rng);
        Ok(self.insert_agent(species, phenotype, position, Some(parent), nav))
    }

    fn insert_agent<N: Navigation + ?Sized>(
        &mut self,
        species: Species,
        phenotype: Phenotype,
        position: Vec2,
        parent: Option<AgentId>,
        nav: &mut N,
    ) -> AgentId {
        let id = AgentId::from_rng(&mut self.rng);
        let mut agent = Agent::new(id, species, phenotype.attributes, phenotype.total, &self.config, &mut self.rng);
        if let Some(parent_id) = parent {
            agent.parent = Some(parent_id);
            agent.generation = self.agent(parent_id).map_or(1, |p| p.generation + 1);
        }

        let heading = heading_from_degrees(self.rng.gen_range(0.0..360.0));
        nav.place(id, position, heading);
        nav.set_speed(id, agent.attributes.speed as f32 / SPEED_DIVISOR);

        self.index.insert(id, self.agents.len());
        self.agents.push(agent);
        id
    }

    /// Remove an agent and compact the roster
    ///
    /// Frees its shelter units and unregisters it from navigation.
    pub fn remove_agent<N: Navigation + ?Sized>(&mut self, id: AgentId, nav: &mut N) -> Result<Agent> {
        let idx = self.index.remove(&id).ok_or(EcoError::AgentNotFound(id))?;
        let mut agent = self.agents.remove(idx);
        for (i, a) in self.agents.iter().enumerate().skip(idx) {
            self.index.insert(a.id, i);
        }

        if let Some(shelter_id) = agent.sheltered_in.take() {
            if let Some(shelter) = self.shelter_mut(shelter_id) {
                shelter.exit(id);
            }
        }
        nav.remove(id);
        agent.kill = true;
        agent.killed = true;
        Ok(agent)
    }

    // ---- shelters ----

    pub fn add_shelter(&mut self, position: Vec2, entrance: Vec2, exit: Vec2, capacity: u32) -> ShelterId {
        let id = ShelterId(self.shelters.len() as u32);
        self.shelters.push(Shelter::new(id, position, entrance, exit, capacity));
        id
    }

    pub fn shelter(&self, id: ShelterId) -> Option<&Shelter> {
        self.shelters.get(id.0 as usize)
    }

    pub fn shelter_mut(&mut self, id: ShelterId) -> Option<&mut Shelter> {
        self.shelters.get_mut(id.0 as usize)
    }

    /// Put an agent inside a shelter, turning out anyone it displaces
    pub fn enter_shelter<N: Navigation + ?Sized>(&mut self, agent: AgentId, shelter: ShelterId, nav: &mut N) -> Result<Entry> {
        let idx = self.index_of(agent).ok_or(EcoError::AgentNotFound(agent))?;
        let species = self.agents[idx].species;
        let units = self.config.profile(species).shelter_cost;

        let den = self
            .shelters
            .get_mut(shelter.0 as usize)
            .ok_or(EcoError::ShelterNotFound(shelter))?;
        let entry = den.try_enter(agent, species, units)?;
        let (inside, exit) = (den.position, den.exit);

        for &evicted in &entry.evicted {
            info!(agent = %evicted, shelter = shelter.0, by = %agent, "evicted from shelter");
            self.release(evicted, exit, nav);
        }

        let a = &mut self.agents[idx];
        a.sheltered_in = Some(shelter);
        a.clear_pursuits();
        a.targets.shelter = None;
        a.flags.go_to_shelter = false;
        a.behavior = Behavior::Sheltered;

        let heading = nav.heading(agent).unwrap_or(Vec2::X);
        nav.place(agent, inside, heading);
        nav.set_enabled(agent, false);
        debug!(agent = %agent, shelter = shelter.0, "entered shelter");
        Ok(entry)
    }

    /// Leave the current shelter; returns the shelter left, if any
    pub fn exit_shelter<N: Navigation + ?Sized>(&mut self, agent: AgentId, nav: &mut N) -> Result<Option<ShelterId>> {
        let idx = self.index_of(agent).ok_or(EcoError::AgentNotFound(agent))?;
        let Some(shelter_id) = self.agents[idx].sheltered_in else {
            return Ok(None);
        };
        let exit = match self.shelter_mut(shelter_id) {
            Some(den) => {
                den.exit(agent);
                den.exit
            }
            None => nav.position(agent).unwrap_or(Vec2::ZERO),
        };
        self.release(agent, exit, nav);
        Ok(Some(shelter_id))
    }

    /// Turn everyone out of a shelter
    pub fn evict_shelter<N: Navigation + ?Sized>(&mut self, shelter: ShelterId, nav: &mut N) -> Result<Vec<AgentId>> {
        let den = self
            .shelters
            .get_mut(shelter.0 as usize)
            .ok_or(EcoError::ShelterNotFound(shelter))?;
        let exit = den.exit;
        let evicted = den.evict_all();
        for &agent in &evicted {
            self.release(agent, exit, nav);
        }
        Ok(evicted)
    }

    fn release<N: Navigation + ?Sized>(&mut self, agent: AgentId, exit: Vec2, nav: &mut N) {
        let Some(a) = self.agent_mut(agent) else {
            return;
        };
        a.sheltered_in = None;
        a.behavior = Behavior::Idle;
        let heading = nav.heading(agent).unwrap_or(Vec2::X);
        nav.place(agent, exit, heading);
        nav.set_enabled(agent, true);
    }

    // ---- food and water ----

    pub fn add_food(&mut self, kind: FoodKind, position: Vec2) -> FoodId {
        let id = FoodId(self.next_food);
        self.next_food += 1;
        self.food.push(FoodItem { id, kind, position });
        id
    }

    pub fn food_item(&self, id: FoodId) -> Option<&FoodItem> {
        self.food.iter().find(|f| f.id == id)
    }

    /// Take a food item out of the world
    pub fn remove_food(&mut self, id: FoodId) -> Option<FoodItem> {
        let pos = self.food.iter().position(|f| f.id == id)?;
        Some(self.food.remove(pos))
    }

    pub fn add_water(&mut self, position: Vec2) -> WaterId {
        let id = WaterId(self.water.len() as u32);
        self.water.push(WaterPoint { id, position });
        id
    }

    // ---- day cycle ----

    pub fn notify_dusk_approaching(&mut self) {
        info!(agents = self.agents.len(), "dusk approaching");
        for a in &mut self.agents {
            a.cycle.day_ending = true;
        }
    }

    pub fn notify_midnight(&mut self) {
        info!(agents = self.agents.len(), "midnight");
        for a in &mut self.agents {
            a.cycle.day_over = true;
        }
    }

    pub fn notify_dawn(&mut self) {
        info!(agents = self.agents.len(), "dawn");
        for a in &mut self.agents {
            a.cycle.day_starting = true;
        }
    }

    /// Drop every remaining food item
    pub fn clean_up_day(&mut self) -> usize {
        let removed = self.food.len();
        self.food.clear();
        debug!(removed, "cleared leftover food");
        removed
    }

    // ---- display ----

    pub fn snapshot(&self) -> PopulationSnapshot {
        let thresholds = &self.config.thresholds;
        let agents: Vec<AgentSnapshot> = self
            .agents
            .iter()
            .filter(|a| a.is_active())
            .map(|a| AgentSnapshot::capture(a, thresholds))
            .collect();

        PopulationSnapshot {
            tick: self.current_tick,
            counts: SpeciesCounts {
                top_predator: self.count(Species::TopPredator),
                mid_predator: self.count(Species::MidPredator),
                prey: self.count(Species::Prey),
            },
            sheltered: agents.iter().filter(|a| a.sheltered).count(),
            food_items: self.food.len(),
            agents,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::navigation::KinematicNavigator;

    fn world() -> World {
        World::new(SimulationConfig::default(), 7)
    }

    #[test]
    fn test_spawn_registers_with_navigation() {
        let mut w = world();
        let mut nav = KinematicNavigator::new();
        let id = w.spawn_agent(Species::Prey, Vec2::new(3.0, 4.0), &mut nav);

        assert_eq!(w.agent_count(), 1);
        assert_eq!(w.index_of(id), Some(0));
        assert_eq!(nav.position(id), Some(Vec2::new(3.0, 4.0)));
        let a = w.agent(id).unwrap();
        assert!(a.attributes.within_bounds(w.config.profile(Species::Prey).max_attribute));
        assert_eq!(a.vitals.health, (a.attributes.vitality * 3) as f32);
        assert_eq!(a.vitals.hunger, 75.0);
    }

    #[test]
    fn test_remove_compacts_and_reindexes() {
        let mut w = world();
        let mut nav = KinematicNavigator::new();
        let ids: Vec<AgentId> = (0..4)
            .map(|i| w.spawn_agent(Species::Prey, Vec2::new(i as f32, 0.0), &mut nav))
            .collect();

        let removed = w.remove_agent(ids[1], &mut nav).unwrap();
        assert!(removed.killed);
        assert_eq!(w.agent_count(), 3);
        assert_eq!(w.index_of(ids[0]), Some(0));
        assert_eq!(w.index_of(ids[2]), Some(1));
        assert_eq!(w.index_of(ids[3]), Some(2));
        assert!(w.index_of(ids[1]).is_none());
        assert!(nav.position(ids[1]).is_none());
        assert!(matches!(w.remove_agent(ids[1], &mut nav), Err(EcoError::AgentNotFound(_))));
    }

    #[test]
    fn test_child_inherits_lineage() {
        let mut w = world();
        let mut nav = KinematicNavigator::new();
        let parent = w.spawn_agent(Species::MidPredator, Vec2::ZERO, &mut nav);
        let child = w.spawn_child(parent, Vec2::ONE, &mut nav).unwrap();
        let c = w.agent(child).unwrap();
        assert_eq!(c.parent, Some(parent));
        assert_eq!(c.generation, 1);
        assert_eq!(c.species, Species::MidPredator);
    }

    #[test]
    fn test_enter_and_exit_shelter_moves_agent() {
        let mut w = world();
        let mut nav = KinematicNavigator::new();
        let den = w.add_shelter(Vec2::new(10.0, 10.0), Vec2::new(10.0, 8.0), Vec2::new(10.0, 7.0), 10);
        let fox = w.spawn_agent(Species::MidPredator, Vec2::new(10.0, 8.2), &mut nav);

        w.enter_shelter(fox, den, &mut nav).unwrap();
        assert_eq!(w.agent(fox).unwrap().sheltered_in, Some(den));
        assert_eq!(nav.position(fox), Some(Vec2::new(10.0, 10.0)));
        assert!(!nav.is_ready(fox));
        assert_eq!(w.shelter(den).unwrap().occupied_units(), 2);

        assert_eq!(w.exit_shelter(fox, &mut nav).unwrap(), Some(den));
        assert_eq!(nav.position(fox), Some(Vec2::new(10.0, 7.0)));
        assert!(nav.is_ready(fox));
        assert_eq!(w.shelter(den).unwrap().occupied_units(), 0);
    }

    #[test]
    fn test_takeover_releases_residents() {
        let mut w = world();
        let mut nav = KinematicNavigator::new();
        let den = w.add_shelter(Vec2::ZERO, Vec2::new(0.0, -2.0), Vec2::new(0.0, -3.0), 10);
        let r1 = w.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        let r2 = w.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        let wolf = w.spawn_agent(Species::TopPredator, Vec2::ZERO, &mut nav);
        for r in [r1, r2] {
            w.agent_mut(r).unwrap().cycle.seek_shelter = true;
            w.enter_shelter(r, den, &mut nav).unwrap();
        }

        let entry = w.enter_shelter(wolf, den, &mut nav).unwrap();
        assert_eq!(entry.evicted, vec![r1, r2]);
        for r in [r1, r2] {
            assert!(!w.agent(r).unwrap().is_sheltered());
            // still out after dusk, so the search goes on
            assert!(w.agent(r).unwrap().cycle.seek_shelter);
            assert_eq!(nav.position(r), Some(Vec2::new(0.0, -3.0)));
            assert!(nav.is_ready(r));
        }
        assert_eq!(w.shelter(den).unwrap().occupied_units(), 3);
    }

    #[test]
    fn test_removing_sheltered_agent_frees_units() {
        let mut w = world();
        let mut nav = KinematicNavigator::new();
        let den = w.add_shelter(Vec2::ZERO, Vec2::new(0.0, -2.0), Vec2::new(0.0, -3.0), 10);
        let fox = w.spawn_agent(Species::MidPredator, Vec2::ZERO, &mut nav);
        w.enter_shelter(fox, den, &mut nav).unwrap();
        w.remove_agent(fox, &mut nav).unwrap();
        assert!(w.shelter(den).unwrap().is_empty());
        assert_eq!(w.shelter(den).unwrap().occupant(), None);
    }

    #[test]
    fn test_evict_shelter() {
        let mut w = world();
        let mut nav = KinematicNavigator::new();
        let den = w.add_shelter(Vec2::ZERO, Vec2::new(0.0, -2.0), Vec2::new(0.0, -3.0), 10);
        let a = w.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        w.enter_shelter(a, den, &mut nav).unwrap();
        assert_eq!(w.evict_shelter(den, &mut nav).unwrap(), vec![a]);
        assert!(!w.agent(a).unwrap().is_sheltered());
        assert!(matches!(w.evict_shelter(ShelterId(9), &mut nav), Err(EcoError::ShelterNotFound(_))));
    }

    #[test]
    fn test_day_notifications_and_cleanup() {
        let mut w = world();
        let mut nav = KinematicNavigator::new();
        w.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        w.add_food(FoodKind::Plant, Vec2::ONE);
        w.add_food(FoodKind::Meat, Vec2::ONE);

        w.notify_dusk_approaching();
        w.notify_midnight();
        w.notify_dawn();
        let c = &w.agents()[0].cycle;
        assert!(c.day_ending && c.day_over && c.day_starting);

        assert_eq!(w.clean_up_day(), 2);
        assert!(w.food.is_empty());
    }

    #[test]
    fn test_food_ids_unique_after_removal() {
        let mut w = world();
        let a = w.add_food(FoodKind::Plant, Vec2::ZERO);
        w.remove_food(a).unwrap();
        let b = w.add_food(FoodKind::Plant, Vec2::ZERO);
        assert_ne!(a, b);
        assert!(w.food_item(a).is_none());
        assert!(w.food_item(b).is_some());
    }

    #[test]
    fn test_snapshot_counts() {
        let mut w = world();
        let mut nav = KinematicNavigator::new();
        w.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        w.spawn_agent(Species::Prey, Vec2::ZERO, &mut nav);
        w.spawn_agent(Species::TopPredator, Vec2::ZERO, &mut nav);
        let snap = w.snapshot();
        assert_eq!(snap.counts.prey, 2);
        assert_eq!(snap.counts.top_predator, 1);
        assert_eq!(snap.counts.mid_predator, 0);
        assert_eq!(snap.agents.len(), 3);
    }
}
