//! Headless ecosystem driver
//!
//! Owns the world together with the reference navigation and terrain
//! services, and reacts to day clock boundaries.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use tracing::info;

use crate::core::calendar::{DayClock, DayEvent};
use crate::core::config::SimulationConfig;
use crate::core::types::Species;
use crate::ecs::snapshot::SpeciesCounts;
use crate::ecs::world::World;
use crate::simulation::population::restock_population;
use crate::simulation::tick::{run_simulation_tick, DeathCause, SimulationEvent};
use crate::world::blocking::ObstacleMap;
use crate::world::navigation::KinematicNavigator;
use crate::world::placement::{random_navigable_point, scatter_plants, LayoutFile};

/// Plants scattered at every dawn
pub const PLANTS_PER_DAWN_MIN: usize = 65;
pub const PLANTS_PER_DAWN_MAX: usize = 84;

/// Counters for one simulated day
#[derive(Debug, Clone, Default, Serialize)]
pub struct DayReport {
    pub day: u32,
    pub ticks: u64,
    pub counts: SpeciesCounts,
    pub births: usize,
    pub spawned: usize,
    pub deaths_attrition: usize,
    pub deaths_combat: usize,
    pub deaths_curfew: usize,
    pub deaths_overnight: usize,
    pub meals: usize,
    pub drinks: usize,
    pub evictions: usize,
}

impl DayReport {
    fn record(&mut self, event: &SimulationEvent) {
        match event {
            SimulationEvent::Spawned { .. } => self.spawned += 1,
            SimulationEvent::Born { .. } => self.births += 1,
            SimulationEvent::Died { cause, .. } => match cause {
                DeathCause::Attrition => self.deaths_attrition += 1,
                DeathCause::Combat => self.deaths_combat += 1,
                DeathCause::Curfew => self.deaths_curfew += 1,
                DeathCause::Overnight => self.deaths_overnight += 1,
            },
            SimulationEvent::Ate { .. } => self.meals += 1,
            SimulationEvent::Drank { .. } => self.drinks += 1,
            SimulationEvent::Evicted { .. } => self.evictions += 1,
            _ => {}
        }
    }

    pub fn deaths(&self) -> usize {
        self.deaths_attrition + self.deaths_combat + self.deaths_curfew + self.deaths_overnight
    }
}

/// World plus the services it runs against
pub struct Ecosystem {
    pub world: World,
    pub nav: KinematicNavigator,
    pub terrain: ObstacleMap,
    pub clock: DayClock,
}

impl Ecosystem {
    /// Build from a layout; the layout's plants are placed as given
    pub fn new(config: SimulationConfig, layout: &LayoutFile, seed: u64) -> Self {
        let clock = DayClock::new(config.day_cycle);
        let mut world = World::new(config, seed);
        let (terrain, _) = layout.apply(&mut world);
        Self {
            world,
            nav: KinematicNavigator::new(),
            terrain,
            clock,
        }
    }

    /// Generated layout with a first crop of plants
    pub fn demo(config: SimulationConfig, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed.wrapping_add(1));
        let layout = LayoutFile::demo(&mut rng);
        let mut eco = Self::new(config, &layout, seed);
        eco.replenish_plants();
        eco
    }

    /// Spawn agents of one species at random navigable points
    pub fn populate(&mut self, species: Species, count: usize) -> usize {
        let mut spawned = 0;
        for _ in 0..count {
            if let Some(p) = random_navigable_point(&self.terrain, &mut self.world.rng) {
                self.world.spawn_agent(species, p, &mut self.nav);
                spawned += 1;
            }
        }
        spawned
    }

    fn replenish_plants(&mut self) -> usize {
        let count = self.world.rng.gen_range(PLANTS_PER_DAWN_MIN..=PLANTS_PER_DAWN_MAX);
        scatter_plants(&mut self.world, &self.terrain, count)
    }

    fn on_day_event(&mut self, event: DayEvent) -> Vec<SimulationEvent> {
        match event {
            DayEvent::DuskApproaching => {
                self.world.notify_dusk_approaching();
                Vec::new()
            }
            DayEvent::Midnight => {
                self.world.notify_midnight();
                Vec::new()
            }
            DayEvent::Cleanup => {
                self.world.clean_up_day();
                Vec::new()
            }
            DayEvent::Dawn => {
                self.world.notify_dawn();
                let terrain = &self.terrain;
                let events = restock_population(&mut self.world, &mut self.nav, |rng| {
                    random_navigable_point(terrain, rng)
                });
                self.replenish_plants();
                events
            }
        }
    }

    /// Clock, day boundaries, one tick, then movement
    pub fn step(&mut self) -> (Vec<DayEvent>, Vec<SimulationEvent>) {
        let dt = self.world.config.tick_seconds;
        let boundaries = self.clock.advance(dt);

        let mut events = Vec::new();
        for &boundary in &boundaries {
            events.extend(self.on_day_event(boundary));
        }
        events.extend(run_simulation_tick(&mut self.world, &mut self.nav, &self.terrain));
        self.nav.step(dt);

        (boundaries, events)
    }

    /// Run until the clock reaches the next day
    pub fn run_day(&mut self) -> DayReport {
        let day = self.clock.day();
        let mut report = DayReport {
            day,
            ..Default::default()
        };

        while self.clock.day() == day {
            let (_, events) = self.step();
            report.ticks += 1;
            for event in &events {
                report.record(event);
            }
        }

        report.counts = self.world.snapshot().counts;
        info!(
            day,
            top = report.counts.top_predator,
            mid = report.counts.mid_predator,
            prey = report.counts.prey,
            births = report.births,
            deaths = report.deaths(),
            "day complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_has_plants_and_caves() {
        let eco = Ecosystem::demo(SimulationConfig::default(), 3);
        assert_eq!(eco.world.shelters.len(), 8);
        assert!(eco.world.food.len() >= PLANTS_PER_DAWN_MIN);
        assert!(eco.world.food.len() <= PLANTS_PER_DAWN_MAX);
    }

    #[test]
    fn test_step_advances_tick() {
        let mut eco = Ecosystem::demo(SimulationConfig::default(), 4);
        eco.populate(Species::Prey, 5);
        for _ in 0..10 {
            eco.step();
        }
        assert_eq!(eco.world.current_tick, 10);
        assert_eq!(eco.world.count(Species::Prey), 5);
    }

    #[test]
    fn test_report_counts_events() {
        let mut report = DayReport::default();
        let agent = crate::core::types::AgentId::new();
        report.record(&SimulationEvent::Died {
            agent,
            species: Species::Prey,
            cause: DeathCause::Curfew,
        });
        report.record(&SimulationEvent::Drank { agent });
        assert_eq!(report.deaths(), 1);
        assert_eq!(report.deaths_curfew, 1);
        assert_eq!(report.drinks, 1);
    }
}
