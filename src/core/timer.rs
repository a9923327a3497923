//! Per-agent interval timers
//!
//! Every cadence in the engine (sensing refresh, vital decay, wander re-path,
//! attack cooldown) is a timer that accumulates tick time until it reaches
//! its wait, fires once, and starts over.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Inclusive-exclusive range of seconds a timer may be re-armed with
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SecondsRange {
    pub min: f32,
    pub max: f32,
}

impl SecondsRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub const fn fixed(secs: f32) -> Self {
        Self { min: secs, max: secs }
    }

    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f32 {
        if self.max > self.min {
            rng.gen_range(self.min..self.max)
        } else {
            self.min
        }
    }
}

/// Accumulating timer
///
/// `advance` adds `dt` while the timer is still waiting. Once the wait has
/// been reached, the next `advance` fires and resets the elapsed time, so a
/// timer with wait `w` fires on the first tick after `w` seconds passed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntervalTimer {
    elapsed: f32,
    wait: f32,
}

impl IntervalTimer {
    pub fn new(wait: f32) -> Self {
        Self { elapsed: 0.0, wait }
    }

    /// Timer that fires on its first advance
    pub fn ready(wait: f32) -> Self {
        Self { elapsed: wait, wait }
    }

    pub fn advance(&mut self, dt: f32) -> bool {
        if self.elapsed < self.wait {
            self.elapsed += dt;
            false
        } else {
            self.elapsed = 0.0;
            true
        }
    }

    pub fn is_elapsed(&self) -> bool {
        self.elapsed >= self.wait
    }

    pub fn remaining(&self) -> f32 {
        (self.wait - self.elapsed).max(0.0)
    }

    /// Add time without firing (used by cooldowns)
    pub fn accumulate(&mut self, dt: f32) {
        if self.elapsed < self.wait {
            self.elapsed += dt;
        }
    }

    pub fn reset(&mut self) {
        self.elapsed = 0.0;
    }

    pub fn set_wait(&mut self, wait: f32) {
        self.wait = wait;
    }

    pub fn wait(&self) -> f32 {
        self.wait
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_fires_after_wait() {
        let mut t = IntervalTimer::new(0.1);
        assert!(!t.advance(0.05));
        assert!(!t.advance(0.05));
        // 0.1 reached; next advance fires and resets
        assert!(t.advance(0.05));
        assert!(!t.is_elapsed());
    }

    #[test]
    fn test_ready_timer_fires_immediately() {
        let mut t = IntervalTimer::ready(7.0);
        assert!(t.advance(0.05));
    }

    #[test]
    fn test_accumulate_saturates() {
        let mut t = IntervalTimer::new(0.5);
        for _ in 0..20 {
            t.accumulate(0.05);
        }
        assert!(t.is_elapsed());
        assert_eq!(t.remaining(), 0.0);
    }

    #[test]
    fn test_fixed_range_sample() {
        let mut rng = rand::thread_rng();
        assert_eq!(SecondsRange::fixed(0.05).sample(&mut rng), 0.05);
        let r = SecondsRange::new(7.0, 12.0);
        for _ in 0..100 {
            let v = r.sample(&mut rng);
            assert!((7.0..12.0).contains(&v));
        }
    }
}
