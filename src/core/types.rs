//! Core type definitions used throughout the codebase

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use glam::Vec2;

/// Unique identifier for agents
///
/// Stable across roster compaction: an agent keeps its id for its whole life
/// even when its roster index changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub Uuid);

impl AgentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Draw an id from a seeded generator so runs replay identically
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(uuid::Builder::from_random_bytes(rng.gen()).into_uuid())
    }
}

impl Default for AgentId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = self.0.simple().to_string();
        write!(f, "{}", &s[..8])
    }
}

/// Shelter (den/cave) identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShelterId(pub u32);

/// Food item identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodId(pub u64);

/// Water point identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WaterId(pub u32);

/// Simulation tick counter
pub type Tick = u64;

/// Species enumeration
///
/// Declaration order is dominance order: a species outranks every species
/// declared before it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Species {
    Prey = 1,
    MidPredator = 2,
    TopPredator = 3,
}

impl Species {
    pub const ALL: [Species; 3] = [Species::TopPredator, Species::MidPredator, Species::Prey];

    /// Returns true if this species outranks the other
    pub fn outranks(&self, other: &Species) -> bool {
        (*self as u8) > (*other as u8)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Species::TopPredator => "wolf",
            Species::MidPredator => "fox",
            Species::Prey => "rabbit",
        }
    }
}

/// What a food item is made of
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodKind {
    Meat,
    Plant,
}

/// Unit vector for a heading given in degrees, counter-clockwise from +x
pub fn heading_from_degrees(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

/// Heading in degrees of a (not necessarily normalized) direction
pub fn degrees_from_heading(dir: Vec2) -> f32 {
    dir.y.atan2(dir.x).to_degrees()
}
