//! Priority-chain behavior selection for mid predators and prey

use crate::entity::agent::Behavior;
use crate::entity::vitals::BusyState;

/// Facts the ladder decides on, gathered by the tick after sensing
#[derive(Debug, Clone, Copy, Default)]
pub struct PriorityContext {
    /// Marked for removal this tick (death or curfew)
    pub doomed: bool,
    pub sheltered: bool,
    pub seek_shelter: bool,
    pub busy: BusyState,
    pub threat_visible: bool,
    /// Thirst at or below the "thirsty" tier
    pub thirsty: bool,
    /// Hunger below the "satisfied" tier
    pub hungry: bool,
    pub water_known: bool,
    pub food_known: bool,
    pub target_known: bool,
    pub target_in_range: bool,
    pub cooldown_ready: bool,
}

/// Walk the ladder and return the first applicable behavior
///
/// Returns `None` for an agent that is being removed; nothing else runs.
/// Order:
/// 1. death / day-end
/// 2. inside a shelter, or looking for one after dusk
/// 3. eating or drinking
/// 4. flee from a visible threat
/// 5. drink when thirsty
/// 6. forage, attack or chase when hungry
/// 7. wander
pub fn select_priority_behavior(ctx: &PriorityContext) -> Option<Behavior> {
    if ctx.doomed {
        return None;
    }

    if ctx.sheltered {
        return Some(Behavior::Sheltered);
    }

    if ctx.seek_shelter {
        return Some(Behavior::SeekShelter);
    }

    match ctx.busy {
        BusyState::Eating { .. } => return Some(Behavior::Eating),
        BusyState::Drinking { .. } => return Some(Behavior::Drinking),
        BusyState::Idle => {}
    }

    // Threats always preempt appetite
    if ctx.threat_visible {
        return Some(Behavior::Flee);
    }

    if ctx.thirsty && ctx.water_known {
        return Some(Behavior::SeekWater);
    }

    if ctx.hungry {
        if let Some(behavior) = hunt_or_forage(ctx) {
            return Some(behavior);
        }
    }

    Some(Behavior::Wander)
}

/// Food in view beats a hunt
fn hunt_or_forage(ctx: &PriorityContext) -> Option<Behavior> {
    if ctx.food_known {
        return Some(Behavior::SeekFood);
    }
    if ctx.target_known {
        if ctx.target_in_range && ctx.cooldown_ready {
            return Some(Behavior::Attack);
        }
        return Some(Behavior::Chase);
    }
    None
}
