//! Kinematic navigator
//!
//! Straight-line movement toward the current destination at a fixed speed.
//! Agents turn instantly to face their direction of travel.

use ahash::AHashMap;
use glam::Vec2;

use crate::core::types::AgentId;
use crate::world::services::Navigation;

const ARRIVAL_EPSILON: f32 = 1e-3;

#[derive(Debug, Clone)]
struct NavBody {
    position: Vec2,
    heading: Vec2,
    destination: Option<Vec2>,
    speed: f32,
    enabled: bool,
}

#[derive(Debug, Clone, Default)]
pub struct KinematicNavigator {
    bodies: AHashMap<AgentId, NavBody>,
}

impl KinematicNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move every enabled agent toward its destination
    pub fn step(&mut self, dt: f32) {
        for body in self.bodies.values_mut() {
            if !body.enabled {
                continue;
            }
            let Some(dest) = body.destination else {
                continue;
            };

            let to_dest = dest - body.position;
            let distance = to_dest.length();
            if distance <= ARRIVAL_EPSILON {
                body.destination = None;
                continue;
            }

            let dir = to_dest / distance;
            body.heading = dir;
            let travel = body.speed * dt;
            if travel >= distance {
                body.position = dest;
                body.destination = None;
            } else {
                body.position += dir * travel;
            }
        }
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }
}

impl Navigation for KinematicNavigator {
    fn place(&mut self, agent: AgentId, position: Vec2, heading: Vec2) {
        let heading = heading.try_normalize().unwrap_or(Vec2::X);
        let body = self.bodies.entry(agent).or_insert(NavBody {
            position,
            heading,
            destination: None,
            speed: 1.0,
            enabled: true,
        });
        body.position = position;
        body.heading = heading;
        body.destination = None;
    }

    fn remove(&mut self, agent: AgentId) {
        self.bodies.remove(&agent);
    }

    fn position(&self, agent: AgentId) -> Option<Vec2> {
        self.bodies.get(&agent).map(|b| b.position)
    }

    fn heading(&self, agent: AgentId) -> Option<Vec2> {
        self.bodies.get(&agent).map(|b| b.heading)
    }

    fn destination(&self, agent: AgentId) -> Option<Vec2> {
        self.bodies.get(&agent).and_then(|b| b.destination)
    }

    fn set_destination(&mut self, agent: AgentId, point: Vec2) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.destination = Some(point);
        }
    }

    fn set_speed(&mut self, agent: AgentId, speed: f32) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.speed = speed.max(0.0);
        }
    }

    fn set_enabled(&mut self, agent: AgentId, enabled: bool) {
        if let Some(body) = self.bodies.get_mut(&agent) {
            body.enabled = enabled;
            if !enabled {
                body.destination = None;
            }
        }
    }

    fn is_ready(&self, agent: AgentId) -> bool {
        self.bodies.get(&agent).map(|b| b.enabled).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moves_toward_destination() {
        let mut nav = KinematicNavigator::new();
        let id = AgentId::new();
        nav.place(id, Vec2::ZERO, Vec2::X);
        nav.set_speed(id, 2.0);
        nav.set_destination(id, Vec2::new(0.0, 10.0));

        nav.step(1.0);
        let pos = nav.position(id).unwrap();
        assert!((pos.y - 2.0).abs() < 1e-5);
        assert!((nav.heading(id).unwrap() - Vec2::Y).length() < 1e-5);
    }

    #[test]
    fn test_arrival_clears_destination() {
        let mut nav = KinematicNavigator::new();
        let id = AgentId::new();
        nav.place(id, Vec2::ZERO, Vec2::X);
        nav.set_speed(id, 5.0);
        nav.set_destination(id, Vec2::new(1.0, 0.0));
        nav.step(1.0);
        assert_eq!(nav.position(id), Some(Vec2::new(1.0, 0.0)));
        assert_eq!(nav.destination(id), None);
    }

    #[test]
    fn test_disabled_agents_stay_put() {
        let mut nav = KinematicNavigator::new();
        let id = AgentId::new();
        nav.place(id, Vec2::ZERO, Vec2::X);
        nav.set_destination(id, Vec2::new(5.0, 0.0));
        nav.set_enabled(id, false);
        nav.step(1.0);
        assert_eq!(nav.position(id), Some(Vec2::ZERO));
        assert!(!nav.is_ready(id));
    }

    #[test]
    fn test_unknown_agent_not_ready() {
        let nav = KinematicNavigator::new();
        assert!(!nav.is_ready(AgentId::new()));
        assert!(nav.position(AgentId::new()).is_none());
    }
}
