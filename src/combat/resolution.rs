//! Attack resolution
//!
//! An attack is a single strike: the target loses health equal to the
//! attacker's Strength. Attacks are gated by range and by the attacker's
//! per-species cooldown, which starts over after every strike.

use serde::{Deserialize, Serialize};

use crate::core::error::{EcoError, Result};
use crate::core::types::Vec2;
use crate::entity::agent::Agent;

/// Result of a strike
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StrikeResult {
    pub damage: f32,
    pub target_health: f32,
    /// Target's health reached zero
    pub lethal: bool,
}

/// True when the target exists, is alive and is within attack range
pub fn can_attack(
    attacker_pos: Vec2,
    attack_range: f32,
    target: Option<(&Agent, Vec2)>,
) -> bool {
    match target {
        Some((agent, pos)) => agent.is_visible() && attacker_pos.distance(pos) <= attack_range,
        None => false,
    }
}

/// Check every precondition of a strike
pub fn ready_to_strike(
    attacker: &Agent,
    attacker_pos: Vec2,
    attack_range: f32,
    target: Option<(&Agent, Vec2)>,
) -> Result<()> {
    let Some((agent, pos)) = target else {
        return Err(EcoError::StaleReference("chase target".into()));
    };
    if !agent.is_visible() {
        return Err(EcoError::StaleReference(format!("chase target {}", agent.id)));
    }
    let distance = attacker_pos.distance(pos);
    if distance > attack_range {
        return Err(EcoError::OutOfRange {
            distance,
            range: attack_range,
        });
    }
    if !attacker.timers.attack_cooldown.is_elapsed() {
        return Err(EcoError::AttackOnCooldown {
            remaining: attacker.timers.attack_cooldown.remaining(),
        });
    }
    Ok(())
}

/// Apply one strike and restart the attacker's cooldown
pub fn strike(attacker: &mut Agent, target: &mut Agent) -> StrikeResult {
    let damage = attacker.attributes.strength as f32;
    target.vitals.change_health(-damage);
    target.flags.hurt = true;
    attacker.timers.attack_cooldown.reset();

    StrikeResult {
        damage,
        target_health: target.vitals.health,
        lethal: target.vitals.is_dead(),
    }
}

/// Let the cooldown run; does nothing once it has elapsed
pub fn advance_cooldown(agent: &mut Agent, dt: f32) {
    agent.timers.attack_cooldown.accumulate(dt);
}
