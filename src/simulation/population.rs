//! Population dynamics
//!
//! Agents that wake up healthy may breed; species that have dwindled
//! below their floor are restocked at dawn.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::core::config::PopulationFloor;
use crate::core::types::{Species, Vec2};
use crate::ecs::world::World;
use crate::entity::species::LitterProfile;
use crate::entity::vitals::Vitals;
use crate::simulation::tick::SimulationEvent;
use crate::world::services::Navigation;

/// Health at or above which breeding is certain to be considered
pub const BREEDING_HEALTH: f32 = 80.0;
/// Health above which NightSurvivability gives a chance to breed
pub const FALLBACK_BREEDING_HEALTH: f32 = 60.0;
/// Upper bound of the NightSurvivability roll
pub const FERTILITY_ROLL_MAX: u32 = 29;

/// Whether an agent that survived the night may breed
pub fn can_reproduce<R: Rng + ?Sized>(vitals: &Vitals, night_survivability: u32, rng: &mut R) -> bool {
    if vitals.health >= BREEDING_HEALTH {
        return true;
    }
    vitals.health > FALLBACK_BREEDING_HEALTH && rng.gen_range(1..=FERTILITY_ROLL_MAX) <= night_survivability
}

/// Number of young for an eligible parent; zero when the litter roll fails
pub fn litter_size<R: Rng + ?Sized>(
    vitals: &Vitals,
    night_survivability: u32,
    litter: &LitterProfile,
    rng: &mut R,
) -> u32 {
    if !can_reproduce(vitals, night_survivability, rng) {
        return 0;
    }
    litter.roll(rng)
}

/// How many fresh agents a species needs, if any
pub fn shortfall(live: usize, floor: &PopulationFloor) -> Option<usize> {
    (live <= floor.minimum && floor.restock > 0).then_some(floor.restock)
}

/// Spawn fresh batches for every species at or below its floor
///
/// `spawn_point` picks a navigable location for each newcomer; returning
/// `None` skips that spawn.
pub fn restock_population<N, F>(world: &mut World, nav: &mut N, mut spawn_point: F) -> Vec<SimulationEvent>
where
    N: Navigation + ?Sized,
    F: FnMut(&mut ChaCha8Rng) -> Option<Vec2>,
{
    let mut events = Vec::new();

    for species in Species::ALL {
        let live = world.count(species);
        let floor = world.config.population.floor(species);
        let Some(batch) = shortfall(live, &floor) else {
            continue;
        };

        let mut spawned = 0;
        for _ in 0..batch {
            let Some(position) = spawn_point(&mut world.rng) else {
                continue;
            };
            let agent = world.spawn_agent(species, position, nav);
            events.push(SimulationEvent::Spawned { agent, species });
            spawned += 1;
        }

        if spawned < batch {
            warn!(species = species.name(), wanted = batch, spawned, "restock found too few spawn points");
        }
        info!(species = species.name(), live, spawned, "population restocked");
    }

    events
}
