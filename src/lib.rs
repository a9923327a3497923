//! Den Ecology - agent decision and sensing engine for a predator/prey ecosystem

pub mod combat;
pub mod core;
pub mod ecs;
pub mod entity;
pub mod genetics;
pub mod simulation;
pub mod spatial;
pub mod world;
