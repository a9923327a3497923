//! Combat: range/liveness checks, cooldown-gated strikes

pub mod resolution;

pub use resolution::{advance_cooldown, can_attack, ready_to_strike, strike, StrikeResult};
