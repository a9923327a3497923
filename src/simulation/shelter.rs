//! Shelter (den) occupancy
//!
//! A den holds agents of one species at a time. Each agent takes up its
//! species' unit cost. A more dominant species may take over an occupied
//! den; everyone inside is turned out first.

use serde::{Deserialize, Serialize};

use crate::core::error::{EcoError, Result};
use crate::core::types::{AgentId, ShelterId, Species, Vec2};

/// How a den would treat an entry request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// Den is empty
    Vacant,
    /// Same species inside and room left
    Shared,
    /// Requester outranks the occupants; they will be evicted
    Takeover,
    Refused,
}

impl Admission {
    pub fn is_admitted(&self) -> bool {
        !matches!(self, Admission::Refused)
    }
}

/// Result of a successful entry
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Entry {
    /// Agents turned out to make room, in the order they entered
    pub evicted: Vec<AgentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Resident {
    agent: AgentId,
    units: u32,
}

/// A den
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shelter {
    pub id: ShelterId,
    /// Interior point agents are parked at while inside
    pub position: Vec2,
    /// Agents walk here to enter
    pub entrance: Vec2,
    /// Agents are placed here when leaving
    pub exit: Vec2,
    capacity: u32,
    occupant: Option<Species>,
    occupied: u32,
    residents: Vec<Resident>,
}

impl Shelter {
    pub fn new(id: ShelterId, position: Vec2, entrance: Vec2, exit: Vec2, capacity: u32) -> Self {
        Self {
            id,
            position,
            entrance,
            exit,
            capacity,
            occupant: None,
            occupied: 0,
            residents: Vec::new(),
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn occupied_units(&self) -> u32 {
        self.occupied
    }

    pub fn remaining(&self) -> u32 {
        self.capacity.saturating_sub(self.occupied)
    }

    /// Species currently inside, None when empty
    pub fn occupant(&self) -> Option<Species> {
        self.occupant
    }

    pub fn residents(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.residents.iter().map(|r| r.agent)
    }

    pub fn contains(&self, agent: AgentId) -> bool {
        self.residents.iter().any(|r| r.agent == agent)
    }

    pub fn is_empty(&self) -> bool {
        self.residents.is_empty()
    }

    pub fn admission(&self, species: Species, units: u32) -> Admission {
        if units > self.capacity {
            return Admission::Refused;
        }
        match self.occupant {
            None => Admission::Vacant,
            Some(current) if current == species => {
                if self.remaining() >= units {
                    Admission::Shared
                } else {
                    Admission::Refused
                }
            }
            Some(current) if species.outranks(&current) => Admission::Takeover,
            Some(_) => Admission::Refused,
        }
    }

    pub fn can_admit(&self, species: Species, units: u32) -> bool {
        self.admission(species, units).is_admitted()
    }

    /// Admit an agent, evicting lower-ranked occupants if needed
    ///
    /// On refusal the den is left untouched.
    pub fn try_enter(&mut self, agent: AgentId, species: Species, units: u32) -> Result<Entry> {
        if self.contains(agent) {
            return Ok(Entry::default());
        }

        let mut entry = Entry::default();
        match self.admission(species, units) {
            Admission::Refused => {
                return Err(EcoError::CapacityExceeded {
                    shelter: self.id,
                    requested: units,
                    occupied: self.occupied,
                    capacity: self.capacity,
                });
            }
            Admission::Takeover => entry.evicted = self.evict_all(),
            Admission::Vacant | Admission::Shared => {}
        }

        self.occupant = Some(species);
        self.occupied += units;
        self.residents.push(Resident { agent, units });
        Ok(entry)
    }

    /// Release an agent's units; returns false if it was not inside
    pub fn exit(&mut self, agent: AgentId) -> bool {
        let Some(pos) = self.residents.iter().position(|r| r.agent == agent) else {
            return false;
        };
        let resident = self.residents.remove(pos);
        self.occupied = self.occupied.saturating_sub(resident.units);
        if self.residents.is_empty() {
            self.occupant = None;
            self.occupied = 0;
        }
        true
    }

    /// Turn everyone out
    pub fn evict_all(&mut self) -> Vec<AgentId> {
        let evicted = self.residents.drain(..).map(|r| r.agent).collect();
        self.occupant = None;
        self.occupied = 0;
        evicted
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn den(capacity: u32) -> Shelter {
        Shelter::new(ShelterId(0), Vec2::ZERO, Vec2::new(0.0, -2.0), Vec2::new(0.0, -3.0), capacity)
    }

    #[test]
    fn test_empty_den_admits_anyone() {
        let mut s = den(10);
        assert_eq!(s.admission(Species::Prey, 1), Admission::Vacant);
        s.try_enter(AgentId::new(), Species::MidPredator, 2).unwrap();
        assert_eq!(s.occupant(), Some(Species::MidPredator));
        assert_eq!(s.occupied_units(), 2);
    }

    #[test]
    fn test_same_species_until_full() {
        let mut s = den(10);
        for _ in 0..3 {
            s.try_enter(AgentId::new(), Species::TopPredator, 3).unwrap();
        }
        assert_eq!(s.occupied_units(), 9);
        let err = s.try_enter(AgentId::new(), Species::TopPredator, 3).unwrap_err();
        assert!(matches!(err, EcoError::CapacityExceeded { occupied: 9, capacity: 10, .. }));
        assert_eq!(s.occupied_units(), 9);
    }

    #[test]
    fn test_lower_species_refused() {
        let mut s = den(10);
        s.try_enter(AgentId::new(), Species::MidPredator, 2).unwrap();
        assert!(s.try_enter(AgentId::new(), Species::Prey, 1).is_err());
        assert_eq!(s.occupant(), Some(Species::MidPredator));
    }

    #[test]
    fn test_takeover_evicts_all_prey() {
        let mut s = den(10);
        let a = AgentId::new();
        let b = AgentId::new();
        s.try_enter(a, Species::Prey, 1).unwrap();
        s.try_enter(b, Species::Prey, 1).unwrap();
        assert_eq!(s.occupied_units(), 2);

        let wolf = AgentId::new();
        let entry = s.try_enter(wolf, Species::TopPredator, 3).unwrap();
        assert_eq!(entry.evicted, vec![a, b]);
        assert_eq!(s.occupied_units(), 3);
        assert_eq!(s.occupant(), Some(Species::TopPredator));
        assert!(s.contains(wolf));
        assert!(!s.contains(a));
    }

    #[test]
    fn test_exit_resets_tag_when_empty() {
        let mut s = den(10);
        let a = AgentId::new();
        let b = AgentId::new();
        s.try_enter(a, Species::Prey, 1).unwrap();
        s.try_enter(b, Species::Prey, 1).unwrap();

        assert!(s.exit(a));
        assert_eq!(s.occupied_units(), 1);
        assert_eq!(s.occupant(), Some(Species::Prey));

        assert!(s.exit(b));
        assert_eq!(s.occupied_units(), 0);
        assert_eq!(s.occupant(), None);
        assert!(!s.exit(b));
    }

    #[test]
    fn test_oversized_request_refused_even_when_empty() {
        let mut s = den(2);
        assert_eq!(s.admission(Species::TopPredator, 3), Admission::Refused);
        assert!(s.try_enter(AgentId::new(), Species::TopPredator, 3).is_err());
        assert_eq!(s.occupant(), None);
    }

    #[test]
    fn test_reentry_is_noop() {
        let mut s = den(10);
        let a = AgentId::new();
        s.try_enter(a, Species::Prey, 1).unwrap();
        s.try_enter(a, Species::Prey, 1).unwrap();
        assert_eq!(s.occupied_units(), 1);
    }
}
