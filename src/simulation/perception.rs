//! Sensory system - target and resource acquisition
//!
//! Every acquisition has the same shape:
//! range filter -> distance ranking -> vision cone -> line of sight.
//! The nearest candidate that survives all checks is the result. Anything
//! inside the category's nearby radius is noticed regardless of facing or
//! obstruction.

use ordered_float::OrderedFloat;
use rand::Rng;

use crate::core::config::{SimulationConfig, VisionConfig, VitalThresholds};
use crate::core::types::{AgentId, FoodId, ShelterId, Species, Vec2};
use crate::entity::agent::Agent;
use crate::simulation::shelter::Shelter;
use crate::spatial::sparse_hash::SparseHashGrid;
use crate::world::objects::{FoodItem, WaterPoint};
use crate::world::services::{Navigation, Terrain};

/// Positions and headings of the whole roster, captured once per tick
pub struct SensoryFrame {
    pub positions: Vec<Option<Vec2>>,
    pub headings: Vec<Option<Vec2>>,
    grid: SparseHashGrid,
}

impl SensoryFrame {
    pub fn new(positions: Vec<Option<Vec2>>, headings: Vec<Option<Vec2>>, cell_size: f32) -> Self {
        let mut grid = SparseHashGrid::new(cell_size);
        grid.rebuild(&positions);
        Self {
            positions,
            headings,
            grid,
        }
    }

    /// Snapshot the navigation service for every agent in the roster
    pub fn capture<N: Navigation + ?Sized>(agents: &[Agent], nav: &N, cell_size: f32) -> Self {
        let positions = agents.iter().map(|a| nav.position(a.id)).collect();
        let headings = agents.iter().map(|a| nav.heading(a.id)).collect();
        Self::new(positions, headings, cell_size)
    }

    pub fn position(&self, index: usize) -> Option<Vec2> {
        self.positions.get(index).copied().flatten()
    }

    pub fn heading(&self, index: usize) -> Vec2 {
        self.headings
            .get(index)
            .copied()
            .flatten()
            .and_then(|h| h.try_normalize())
            .unwrap_or(Vec2::X)
    }

    fn agents_near(&self, center: Vec2, radius: f32) -> Vec<usize> {
        self.grid.query_radius(center, radius, &self.positions)
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate<C> {
    item: C,
    position: Vec2,
    distance: f32,
}

/// Cone threshold for an EyeStrength
pub fn vision_threshold(eye_strength: u32, vision: &VisionConfig) -> f32 {
    vision.base_dot - vision.dot_per_eye * eye_strength.min(vision.eye_cap) as f32
}

/// True when `target` lies strictly inside the vision cone
pub fn in_vision_cone(from: Vec2, forward: Vec2, target: Vec2, eye_strength: u32, vision: &VisionConfig) -> bool {
    let dir = (target - from).normalize_or_zero();
    dir.dot(forward) > vision_threshold(eye_strength, vision)
}

/// Points on an agent's body that sight rays are cast to
pub fn sight_points(position: Vec2, heading: Vec2, body_radius: f32) -> [Vec2; 5] {
    let side = heading.perp() * body_radius;
    let along = heading * body_radius;
    [position, position + along, position - along, position + side, position - side]
}

/// May `hunter` hunt `target`?
pub fn is_rival(hunter: &Agent, target: &Agent, thresholds: &VitalThresholds) -> bool {
    let very_hungry = hunter.vitals.hunger <= thresholds.hunger.critical;
    let hunter_hp = hunter.vitals.health_percent();
    let target_hp = target.vitals.health_percent();

    match (hunter.species, target.species) {
        (Species::TopPredator, Species::TopPredator) => {
            let outmatched = target_hp > thresholds.health.low && hunter_hp < thresholds.health.good;
            very_hungry && !outmatched
        }
        (Species::TopPredator, _) => true,
        (Species::MidPredator, Species::TopPredator) => false,
        (Species::MidPredator, Species::MidPredator) => very_hungry && hunter_hp >= target_hp,
        (Species::MidPredator, Species::Prey) => true,
        (Species::Prey, _) => false,
    }
}

/// Would `other` hunt `observer`?
pub fn is_threat(observer: &Agent, other: &Agent, thresholds: &VitalThresholds) -> bool {
    is_rival(other, observer, thresholds)
}

fn rank<C>(mut candidates: Vec<Candidate<C>>) -> Vec<Candidate<C>> {
    // stable: equal distances keep encounter order
    candidates.sort_by_key(|c| OrderedFloat(c.distance));
    candidates
}

/// Sensory queries for one tick
pub struct SensorySystem<'a, T: Terrain + ?Sized> {
    config: &'a SimulationConfig,
    terrain: &'a T,
}

impl<'a, T: Terrain + ?Sized> SensorySystem<'a, T> {
    pub fn new(config: &'a SimulationConfig, terrain: &'a T) -> Self {
        Self { config, terrain }
    }

    fn vision(&self) -> &VisionConfig {
        &self.config.vision
    }

    /// Walk ranked candidates and return the first one the observer notices
    fn first_noticed<C: Copy>(
        &self,
        from: Vec2,
        forward: Vec2,
        eye_strength: u32,
        nearby: f32,
        ranked: &[Candidate<C>],
        visible: impl Fn(&Candidate<C>) -> bool,
    ) -> Option<C> {
        ranked
            .iter()
            .find(|c| {
                if c.distance <= nearby {
                    return true;
                }
                in_vision_cone(from, forward, c.position, eye_strength, self.vision()) && visible(c)
            })
            .map(|c| c.item)
    }

    fn acquire_agent(
        &self,
        observer: usize,
        agents: &[Agent],
        frame: &SensoryFrame,
        eligible: impl Fn(&Agent, &Agent) -> bool,
    ) -> Option<AgentId> {
        let me = agents.get(observer)?;
        let from = frame.position(observer)?;
        let forward = frame.heading(observer);
        let reach = me.attributes.sight();
        let nearby = self.vision().agent_nearby_radius;

        let candidates: Vec<Candidate<usize>> = frame
            .agents_near(from, reach.max(nearby))
            .into_iter()
            .filter(|&idx| idx != observer)
            .filter_map(|idx| {
                let other = agents.get(idx)?;
                if !other.is_visible() || !eligible(me, other) {
                    return None;
                }
                let position = frame.position(idx)?;
                let distance = from.distance(position);
                (distance < reach || distance <= nearby).then_some(Candidate {
                    item: idx,
                    position,
                    distance,
                })
            })
            .collect();

        let ranked = rank(candidates);
        let found = self.first_noticed(from, forward, me.attributes.eye_strength, nearby, &ranked, |c| {
            let other = &agents[c.item];
            let radius = self.config.profile(other.species).body_radius;
            sight_points(c.position, frame.heading(c.item), radius)
                .iter()
                .any(|&p| self.terrain.line_of_sight(from, p, None))
        })?;

        agents.get(found).map(|a| a.id)
    }

    /// Nearest visible agent this observer may hunt
    pub fn look_for_targets(&self, observer: usize, agents: &[Agent], frame: &SensoryFrame) -> Option<AgentId> {
        let thresholds = &self.config.thresholds;
        self.acquire_agent(observer, agents, frame, |me, other| is_rival(me, other, thresholds))
    }

    /// Nearest visible agent that would hunt this observer
    pub fn look_for_attackers(&self, observer: usize, agents: &[Agent], frame: &SensoryFrame) -> Option<AgentId> {
        let thresholds = &self.config.thresholds;
        self.acquire_agent(observer, agents, frame, |me, other| is_threat(me, other, thresholds))
    }

    /// Nearest visible food item of the observer's diet
    pub fn look_for_food(
        &self,
        observer: usize,
        agents: &[Agent],
        frame: &SensoryFrame,
        food: &[FoodItem],
    ) -> Option<FoodId> {
        let me = agents.get(observer)?;
        let from = frame.position(observer)?;
        let forward = frame.heading(observer);
        let diet = self.config.profile(me.species).diet;
        let reach = me.attributes.sight();
        let nearby = self.vision().resource_nearby_radius;

        let candidates = food
            .iter()
            .filter(|f| f.kind == diet)
            .filter_map(|f| {
                let distance = from.distance(f.position);
                (distance < reach || distance <= nearby).then_some(Candidate {
                    item: f.id,
                    position: f.position,
                    distance,
                })
            })
            .collect();

        let ranked = rank(candidates);
        self.first_noticed(from, forward, me.attributes.eye_strength, nearby, &ranked, |c| {
            self.terrain.line_of_sight(from, c.position, None)
        })
    }

    /// Nearest visible water point, jittered so drinkers spread out
    pub fn look_for_water<R: Rng + ?Sized>(
        &self,
        observer: usize,
        agents: &[Agent],
        frame: &SensoryFrame,
        water: &[WaterPoint],
        rng: &mut R,
    ) -> Option<Vec2> {
        let me = agents.get(observer)?;
        let from = frame.position(observer)?;
        let forward = frame.heading(observer);
        let reach = me.attributes.sight();
        let nearby = self.vision().resource_nearby_radius;

        let candidates = water
            .iter()
            .filter_map(|w| {
                let distance = from.distance(w.position);
                (distance < reach || distance <= nearby).then_some(Candidate {
                    item: w.position,
                    position: w.position,
                    distance,
                })
            })
            .collect();

        let ranked = rank(candidates);
        let spot = self.first_noticed(from, forward, me.attributes.eye_strength, nearby, &ranked, |c| {
            self.terrain.line_of_sight(from, c.position, None)
        })?;

        let jitter = self.vision().water_jitter;
        if jitter > 0.0 {
            Some(spot + Vec2::new(rng.gen_range(-jitter..=jitter), rng.gen_range(-jitter..=jitter)))
        } else {
            Some(spot)
        }
    }

    /// Nearest visible den that would admit the observer
    pub fn look_for_shelter(
        &self,
        observer: usize,
        agents: &[Agent],
        frame: &SensoryFrame,
        shelters: &[Shelter],
    ) -> Option<ShelterId> {
        let me = agents.get(observer)?;
        let from = frame.position(observer)?;
        let forward = frame.heading(observer);
        let units = self.config.profile(me.species).shelter_cost;
        let reach = me.attributes.sight() + self.vision().shelter_sight_bonus;
        let nearby = self.vision().shelter_nearby_radius;

        let candidates = shelters
            .iter()
            .filter(|s| s.can_admit(me.species, units))
            .filter_map(|s| {
                let distance = from.distance(s.entrance);
                (distance < reach || distance <= nearby).then_some(Candidate {
                    item: s.id,
                    position: s.entrance,
                    distance,
                })
            })
            .collect();

        let ranked = rank(candidates);
        self.first_noticed(from, forward, me.attributes.eye_strength, nearby, &ranked, |c| {
            self.terrain.line_of_sight(from, c.position, Some(c.item))
        })
    }
}
