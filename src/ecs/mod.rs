//! Agent registry

pub mod snapshot;
pub mod world;

pub use snapshot::{AgentSnapshot, PopulationSnapshot, SpeciesCounts};
pub use world::World;
