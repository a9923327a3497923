use thiserror::Error;

use crate::core::types::{AgentId, ShelterId};

#[derive(Error, Debug)]
pub enum EcoError {
    /// A remembered target (agent, food item, shelter) no longer exists
    #[error("Stale reference: {0}")]
    StaleReference(String),

    #[error("Agent not found: {0}")]
    AgentNotFound(AgentId),

    #[error("Shelter not found: {0:?}")]
    ShelterNotFound(ShelterId),

    #[error("Shelter {shelter:?} cannot admit {requested} units ({occupied}/{capacity} occupied)")]
    CapacityExceeded {
        shelter: ShelterId,
        requested: u32,
        occupied: u32,
        capacity: u32,
    },

    #[error("No navigable destination found after {attempts} attempts")]
    Unreachable { attempts: u32 },

    /// Health reached zero; the agent must be removed exactly once
    #[error("Agent {0} has lethal health")]
    LethalHealth(AgentId),

    #[error("Target out of attack range ({distance:.2} > {range:.2})")]
    OutOfRange { distance: f32, range: f32 },

    #[error("Attack on cooldown ({remaining:.2}s remaining)")]
    AttackOnCooldown { remaining: f32 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EcoError>;
