//! External services the engine depends on
//!
//! The engine never moves agents or raycasts itself. Movement goes through
//! a `Navigation` implementation and sight/placement queries through a
//! `Terrain` implementation, both supplied by the host.

use crate::core::types::{AgentId, ShelterId, Vec2};

/// Navigation service: owns agent positions and headings
pub trait Navigation {
    /// Put an agent at a position facing `heading`, registering it if new
    fn place(&mut self, agent: AgentId, position: Vec2, heading: Vec2);

    fn remove(&mut self, agent: AgentId);

    fn position(&self, agent: AgentId) -> Option<Vec2>;

    /// Unit forward vector
    fn heading(&self, agent: AgentId) -> Option<Vec2>;

    fn destination(&self, agent: AgentId) -> Option<Vec2>;

    fn set_destination(&mut self, agent: AgentId, point: Vec2);

    /// Movement speed in world units per second
    fn set_speed(&mut self, agent: AgentId, speed: f32);

    /// Disabled agents keep their position but do not move
    fn set_enabled(&mut self, agent: AgentId, enabled: bool);

    /// Registered and able to accept destinations
    fn is_ready(&self, agent: AgentId) -> bool;
}

/// World query service: sight lines and navigable points
pub trait Terrain {
    /// True when nothing solid lies on the segment `from -> to`
    ///
    /// `target_shelter` names a shelter whose own structure is ignored, so
    /// a den's entrance can be seen even though the den is solid.
    fn line_of_sight(&self, from: Vec2, to: Vec2, target_shelter: Option<ShelterId>) -> bool;

    /// Nearest navigable point within `max_distance` of `near`
    fn sample_navigable_point(&self, near: Vec2, max_distance: f32) -> Option<Vec2>;
}
