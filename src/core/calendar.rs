//! Day clock driving the dusk / midnight / dawn cycle
//!
//! The clock moves in fixed game-minute steps. A step takes longer in real
//! time during the day than during the night, so nights pass quickly.

use serde::{Deserialize, Serialize};

use crate::core::config::DayCycleConfig;

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Coarse time of day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimePeriod {
    Day,   // dawn-dusk
    Dusk,  // dusk-midnight
    Night, // midnight-dawn
}

impl TimePeriod {
    pub fn from_hour(hour: u32, cycle: &DayCycleConfig) -> Self {
        if hour >= cycle.dusk_hour {
            TimePeriod::Dusk
        } else if hour < cycle.dawn_hour {
            TimePeriod::Night
        } else {
            TimePeriod::Day
        }
    }
}

/// Boundary crossed by a clock step
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DayEvent {
    /// Agents should start looking for shelter
    DuskApproaching,
    /// Curfew: anything outside a shelter dies
    Midnight,
    /// Remaining food rots away
    Cleanup,
    /// Agents leave shelter, settle the night and may reproduce
    Dawn,
}

/// Day clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayClock {
    day: u32,
    minute_of_day: u32,
    step_elapsed: f32,
    cycle: DayCycleConfig,
}

impl DayClock {
    /// Clock starting at dawn of day 1
    pub fn new(cycle: DayCycleConfig) -> Self {
        Self {
            day: 1,
            minute_of_day: cycle.dawn_hour * 60,
            step_elapsed: 0.0,
            cycle,
        }
    }

    /// Advance by `dt` real seconds, returning the boundaries crossed
    pub fn advance(&mut self, dt: f32) -> Vec<DayEvent> {
        let mut events = Vec::new();
        self.step_elapsed += dt;

        while self.step_elapsed >= self.step_seconds() {
            self.step_elapsed -= self.step_seconds();
            if let Some(event) = self.step() {
                events.push(event);
            }
        }

        events
    }

    /// Move the clock one step forward
    pub fn step(&mut self) -> Option<DayEvent> {
        self.minute_of_day += self.cycle.minutes_per_step;
        if self.minute_of_day >= MINUTES_PER_DAY {
            self.minute_of_day -= MINUTES_PER_DAY;
            self.day += 1;
            return Some(DayEvent::Midnight);
        }

        if self.minute_of_day % 60 != 0 {
            return None;
        }

        let hour = self.hour();
        if hour == self.cycle.dusk_hour {
            Some(DayEvent::DuskApproaching)
        } else if hour == self.cycle.cleanup_hour {
            Some(DayEvent::Cleanup)
        } else if hour == self.cycle.dawn_hour {
            Some(DayEvent::Dawn)
        } else {
            None
        }
    }

    fn step_seconds(&self) -> f32 {
        match self.current_time_period() {
            TimePeriod::Night => self.cycle.night_step_seconds,
            _ => self.cycle.day_step_seconds,
        }
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    pub fn hour(&self) -> u32 {
        self.minute_of_day / 60
    }

    pub fn minute(&self) -> u32 {
        self.minute_of_day % 60
    }

    pub fn current_time_period(&self) -> TimePeriod {
        TimePeriod::from_hour(self.hour(), &self.cycle)
    }

    /// "HH:MM" for display
    pub fn label(&self) -> String {
        format!("{:02}:{:02}", self.hour(), self.minute())
    }
}

impl Default for DayClock {
    fn default() -> Self {
        Self::new(DayCycleConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_period_from_hour() {
        let cycle = DayCycleConfig::default();
        assert_eq!(TimePeriod::from_hour(7, &cycle), TimePeriod::Day);
        assert_eq!(TimePeriod::from_hour(18, &cycle), TimePeriod::Day);
        assert_eq!(TimePeriod::from_hour(19, &cycle), TimePeriod::Dusk);
        assert_eq!(TimePeriod::from_hour(23, &cycle), TimePeriod::Dusk);
        assert_eq!(TimePeriod::from_hour(0, &cycle), TimePeriod::Night);
        assert_eq!(TimePeriod::from_hour(6, &cycle), TimePeriod::Night);
    }

    #[test]
    fn test_clock_starts_at_dawn() {
        let clock = DayClock::default();
        assert_eq!(clock.day(), 1);
        assert_eq!(clock.label(), "07:00");
    }

    #[test]
    fn test_full_day_event_order() {
        let mut clock = DayClock::default();
        let mut events = Vec::new();

        // 24h of 10-minute steps
        for _ in 0..144 {
            if let Some(e) = clock.step() {
                events.push(e);
            }
        }

        assert_eq!(
            events,
            vec![
                DayEvent::DuskApproaching,
                DayEvent::Midnight,
                DayEvent::Cleanup,
                DayEvent::Dawn
            ]
        );
        assert_eq!(clock.day(), 2);
        assert_eq!(clock.label(), "07:00");
    }

    #[test]
    fn test_advance_uses_real_seconds() {
        let mut clock = DayClock::default();
        // Twelve day steps of 0.9s take us from 07:00 to 09:00
        clock.advance(0.9 * 12.0 + 0.01);
        assert_eq!(clock.label(), "09:00");
    }
}
