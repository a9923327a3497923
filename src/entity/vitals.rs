//! Vital signs: health, hunger and thirst
//!
//! Hunger and thirst run from 0 (starving / dehydrated) to 100 (full) and
//! drop one point per species-specific interval. Every health tick they
//! push health up or down depending on their tier. Overnight the three are
//! settled in one step.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{OvernightConfig, TierScale, VitalThresholds};
use crate::core::timer::IntervalTimer;
use crate::entity::attributes::Attributes;
use crate::entity::species::SpeciesProfile;

pub const VITAL_MAX: f32 = 100.0;
const STARTING_HUNGER: f32 = 75.0;
const STARTING_THIRST: f32 = 75.0;

/// Where a value sits on a five-step scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// healthy / full
    Best,
    /// wounded / satisfied
    Good,
    /// badly wounded / hungry / thirsty
    Low,
    /// mortally wounded / very hungry / very thirsty
    Critical,
    /// dead / starving / severely dehydrated
    Worst,
}

impl Tier {
    pub fn classify(value: f32, scale: &TierScale) -> Self {
        if value >= scale.best {
            Tier::Best
        } else if value >= scale.good {
            Tier::Good
        } else if value >= scale.low {
            Tier::Low
        } else if value > scale.worst {
            Tier::Critical
        } else {
            Tier::Worst
        }
    }

    pub fn health_label(&self) -> &'static str {
        match self {
            Tier::Best => "healthy",
            Tier::Good => "wounded",
            Tier::Low => "badly wounded",
            Tier::Critical => "mortally wounded",
            Tier::Worst => "dead",
        }
    }

    pub fn hunger_label(&self) -> &'static str {
        match self {
            Tier::Best => "full",
            Tier::Good => "satisfied",
            Tier::Low => "hungry",
            Tier::Critical => "very hungry",
            Tier::Worst => "starving",
        }
    }

    pub fn thirst_label(&self) -> &'static str {
        match self {
            Tier::Best => "full",
            Tier::Good => "satisfied",
            Tier::Low => "thirsty",
            Tier::Critical => "very thirsty",
            Tier::Worst => "severely dehydrated",
        }
    }
}

/// What an agent is busy doing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum BusyState {
    #[default]
    Idle,
    Eating { remaining: f32 },
    Drinking { remaining: f32 },
}

impl BusyState {
    pub fn is_busy(&self) -> bool {
        !matches!(self, BusyState::Idle)
    }

    /// Count down; returns true while still busy
    pub fn tick(&mut self, dt: f32) -> bool {
        match self {
            BusyState::Idle => false,
            BusyState::Eating { remaining } | BusyState::Drinking { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    *self = BusyState::Idle;
                    false
                } else {
                    true
                }
            }
        }
    }
}

/// Vital signs of an agent
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vitals {
    pub health: f32,
    pub max_health: f32,
    pub hunger: f32,
    pub thirst: f32,
    /// A meal was taken and not yet absorbed
    pub ate: bool,
    /// A drink was taken and not yet absorbed
    pub drank: bool,
    hunger_timer: IntervalTimer,
    thirst_timer: IntervalTimer,
    health_timer: IntervalTimer,
}

impl Vitals {
    /// Fresh vitals for the given attributes
    pub fn new<R: Rng + ?Sized>(
        attributes: &Attributes,
        profile: &SpeciesProfile,
        health_tick_seconds: f32,
        rng: &mut R,
    ) -> Self {
        Self {
            health: (attributes.vitality * 3) as f32,
            max_health: (attributes.vitality * 4) as f32,
            hunger: STARTING_HUNGER,
            thirst: STARTING_THIRST,
            ate: false,
            drank: false,
            hunger_timer: IntervalTimer::new(profile.hunger_decay.sample(rng)),
            thirst_timer: IntervalTimer::new(profile.thirst_decay.sample(rng)),
            health_timer: IntervalTimer::new(health_tick_seconds),
        }
    }

    /// Vitals with explicit values and default timers
    pub fn with_values(health: f32, max_health: f32, hunger: f32, thirst: f32) -> Self {
        Self {
            health,
            max_health,
            hunger,
            thirst,
            ate: false,
            drank: false,
            hunger_timer: IntervalTimer::new(0.4),
            thirst_timer: IntervalTimer::new(0.6),
            health_timer: IntervalTimer::new(1.5),
        }
    }

    pub fn health_percent(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        self.health / self.max_health * 100.0
    }

    pub fn health_tier(&self, thresholds: &VitalThresholds) -> Tier {
        Tier::classify(self.health_percent(), &thresholds.health)
    }

    pub fn hunger_tier(&self, thresholds: &VitalThresholds) -> Tier {
        Tier::classify(self.hunger, &thresholds.hunger)
    }

    pub fn thirst_tier(&self, thresholds: &VitalThresholds) -> Tier {
        Tier::classify(self.thirst, &thresholds.thirst)
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0.0
    }

    pub fn change_health(&mut self, delta: f32) {
        self.health = (self.health + delta).clamp(0.0, self.max_health);
    }

    pub fn change_hunger(&mut self, delta: f32) {
        self.hunger = (self.hunger + delta).clamp(0.0, VITAL_MAX);
    }

    pub fn change_thirst(&mut self, delta: f32) {
        self.thirst = (self.thirst + delta).clamp(0.0, VITAL_MAX);
    }

    /// Drop hunger and thirst by one point each time their interval elapses
    pub fn decay<R: Rng + ?Sized>(&mut self, dt: f32, profile: &SpeciesProfile, rng: &mut R) {
        if self.hunger_timer.advance(dt) {
            self.change_hunger(-1.0);
            self.hunger_timer.set_wait(profile.hunger_decay.sample(rng));
        }
        if self.thirst_timer.advance(dt) {
            self.change_thirst(-1.0);
            self.thirst_timer.set_wait(profile.thirst_decay.sample(rng));
        }
    }

    /// Advance the health clock; applies one health tick when it fires
    pub fn advance_health(&mut self, dt: f32, thresholds: &VitalThresholds) -> bool {
        if self.health_timer.advance(dt) {
            self.health_tick(thresholds);
            true
        } else {
            false
        }
    }

    /// One health tick
    ///
    /// Well-fed and well-watered agents heal, starving and dehydrated ones
    /// lose health. The middle bands leave health alone.
    pub fn health_tick(&mut self, thresholds: &VitalThresholds) {
        let hunger = &thresholds.hunger;
        let delta = if self.hunger >= hunger.best {
            3.0
        } else if self.hunger >= hunger.good {
            2.0
        } else if self.hunger <= hunger.worst {
            -2.0
        } else if self.hunger <= hunger.critical {
            -1.0
        } else {
            0.0
        };
        self.change_health(delta);

        let thirst = &thresholds.thirst;
        let delta = if self.thirst >= thirst.best {
            3.0
        } else if self.thirst >= thirst.good {
            1.0
        } else if self.thirst <= thirst.worst {
            -2.0
        } else if self.thirst <= thirst.critical {
            -1.0
        } else {
            0.0
        };
        self.change_health(delta);
    }

    /// Turn a pending meal or drink into a busy period
    pub fn absorb(&mut self, profile: &SpeciesProfile, drink_rate: f32) -> Option<BusyState> {
        if self.ate {
            self.ate = false;
            self.change_hunger(profile.meal_gain);
            return Some(BusyState::Eating {
                remaining: profile.eating_seconds,
            });
        }
        if self.drank {
            self.drank = false;
            let remaining = (VITAL_MAX - self.thirst) / drink_rate;
            self.thirst = VITAL_MAX;
            return Some(BusyState::Drinking { remaining });
        }
        None
    }

    /// Settle the night spent in shelter
    ///
    /// Returns false when the agent did not survive.
    pub fn overnight<R: Rng + ?Sized>(
        &mut self,
        night_survivability: u32,
        thresholds: &VitalThresholds,
        cfg: &OvernightConfig,
        rng: &mut R,
    ) -> bool {
        let hunger = &thresholds.hunger;
        if self.hunger >= hunger.good {
            self.health += cfg.well_fed_bonus;
        } else if self.hunger <= hunger.worst {
            self.health -= cfg.starving_penalty;
        } else if self.hunger < hunger.critical {
            self.health -= cfg.very_hungry_penalty;
        }

        let thirst = &thresholds.thirst;
        if self.thirst >= thirst.good {
            self.health += cfg.well_fed_bonus;
        } else if self.thirst <= thirst.worst {
            self.health -= cfg.dehydrated_penalty;
        } else if self.thirst < thirst.critical {
            self.health -= cfg.very_thirsty_penalty;
        }

        let low = night_survivability / 3;
        let bonus = if night_survivability > low {
            rng.gen_range(low..night_survivability)
        } else {
            low
        };
        self.health += bonus as f32;

        self.hunger -= cfg.hunger_cost;
        self.thirst -= cfg.thirst_cost;

        self.health = self.health.clamp(0.0, self.max_health);
        self.hunger = self.hunger.clamp(0.0, VITAL_MAX);
        self.thirst = self.thirst.clamp(0.0, VITAL_MAX);

        self.health > 0.0
    }

    /// All values inside their ranges
    pub fn is_clamped(&self) -> bool {
        (0.0..=self.max_health).contains(&self.health)
            && (0.0..=VITAL_MAX).contains(&self.hunger)
            && (0.0..=VITAL_MAX).contains(&self.thirst)
    }
}
