//! Heritable attributes

use serde::{Deserialize, Serialize};

/// The five heritable attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttributeKind {
    Strength,
    Vitality,
    Speed,
    EyeStrength,
    NightSurvivability,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 5] = [
        AttributeKind::Strength,
        AttributeKind::Vitality,
        AttributeKind::Speed,
        AttributeKind::EyeStrength,
        AttributeKind::NightSurvivability,
    ];
}

/// Attribute values, each in `1..=max_attribute` for the species
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attributes {
    /// Damage dealt per attack
    pub strength: u32,
    /// Health is 3x vitality at birth, max health 4x
    pub vitality: u32,
    /// Movement speed is speed / 4 units per second
    pub speed: u32,
    /// Sight range in world units; also widens the vision cone
    pub eye_strength: u32,
    /// Overnight recovery, reproduction odds, earlier shelter seeking
    pub night_survivability: u32,
}

impl Default for Attributes {
    fn default() -> Self {
        Self {
            strength: 1,
            vitality: 1,
            speed: 1,
            eye_strength: 1,
            night_survivability: 1,
        }
    }
}

impl Attributes {
    pub fn new(strength: u32, vitality: u32, speed: u32, eye_strength: u32, night_survivability: u32) -> Self {
        Self {
            strength,
            vitality,
            speed,
            eye_strength,
            night_survivability,
        }
    }

    pub fn get(&self, kind: AttributeKind) -> u32 {
        match kind {
            AttributeKind::Strength => self.strength,
            AttributeKind::Vitality => self.vitality,
            AttributeKind::Speed => self.speed,
            AttributeKind::EyeStrength => self.eye_strength,
            AttributeKind::NightSurvivability => self.night_survivability,
        }
    }

    pub fn get_mut(&mut self, kind: AttributeKind) -> &mut u32 {
        match kind {
            AttributeKind::Strength => &mut self.strength,
            AttributeKind::Vitality => &mut self.vitality,
            AttributeKind::Speed => &mut self.speed,
            AttributeKind::EyeStrength => &mut self.eye_strength,
            AttributeKind::NightSurvivability => &mut self.night_survivability,
        }
    }

    pub fn total(&self) -> u32 {
        AttributeKind::ALL.iter().map(|&k| self.get(k)).sum()
    }

    /// Sight range as a distance
    pub fn sight(&self) -> f32 {
        self.eye_strength as f32
    }

    /// True when every attribute is in `1..=max`
    pub fn within_bounds(&self, max: u32) -> bool {
        AttributeKind::ALL
            .iter()
            .all(|&k| (1..=max).contains(&self.get(k)))
    }
}
