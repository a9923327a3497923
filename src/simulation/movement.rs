//! Movement intents
//!
//! Picks wander and flee destinations on navigable ground. A rejected
//! sample is retried with a wider angle; after the retries one point
//! directly behind is tried, and if that fails too the intent is dropped.

use rand::Rng;

use crate::core::error::{EcoError, Result};
use crate::core::types::Vec2;
use crate::world::services::Terrain;

/// Half-width of the wander arc around the current heading
pub const WANDER_SPREAD_DEGREES: f32 = 67.5;
/// Half-width of the flee arc around the direction away from the threat
pub const FLEE_SPREAD_DEGREES: f32 = 15.0;
/// A new flee destination this close to the current one is not issued
pub const FLEE_REISSUE_DISTANCE: f32 = 0.5;

const RETRY_ATTEMPTS: u32 = 8;
const RETRY_WIDEN_DEGREES: f32 = 15.0;
const NAV_SAMPLE_RADIUS: f32 = 1.0;

/// True when `a` is within `reach` of `b`
#[inline]
pub fn within(a: Vec2, b: Vec2, reach: f32) -> bool {
    a.distance_squared(b) <= reach * reach
}

/// Travel distance band for wander and flee: [eye/2, 4eye/5]
fn stride<R: Rng + ?Sized>(eye_strength: u32, rng: &mut R) -> f32 {
    let eye = eye_strength.max(1) as f32;
    rng.gen_range(eye * 0.5..=eye * 0.8)
}

fn rotate(dir: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(dir)
}

/// Sample a navigable point `distance` away along `direction`, spread by
/// up to `spread` degrees
fn sample_toward<T, R>(
    origin: Vec2,
    direction: Vec2,
    spread: f32,
    eye_strength: u32,
    terrain: &T,
    rng: &mut R,
) -> Result<Vec2>
where
    T: Terrain + ?Sized,
    R: Rng + ?Sized,
{
    let direction = direction.try_normalize().unwrap_or(Vec2::X);

    let first = rotate(direction, rng.gen_range(-spread..=spread));
    if let Some(point) = terrain.sample_navigable_point(origin + first * stride(eye_strength, rng), NAV_SAMPLE_RADIUS) {
        return Ok(point);
    }

    for attempt in 1..=RETRY_ATTEMPTS {
        let widened = spread + RETRY_WIDEN_DEGREES * attempt as f32;
        let side = if rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        let dir = rotate(direction, side * widened);
        let candidate = origin + dir * stride(eye_strength, rng);
        if let Some(point) = terrain.sample_navigable_point(candidate, NAV_SAMPLE_RADIUS) {
            return Ok(point);
        }
    }

    let behind = origin - direction * stride(eye_strength, rng);
    terrain
        .sample_navigable_point(behind, NAV_SAMPLE_RADIUS)
        .ok_or(EcoError::Unreachable {
            attempts: RETRY_ATTEMPTS + 2,
        })
}

/// Somewhere ahead, within the wander arc
pub fn wander_destination<T, R>(position: Vec2, heading: Vec2, eye_strength: u32, terrain: &T, rng: &mut R) -> Result<Vec2>
where
    T: Terrain + ?Sized,
    R: Rng + ?Sized,
{
    sample_toward(position, heading, WANDER_SPREAD_DEGREES, eye_strength, terrain, rng)
}

/// Somewhere away from `threat`
pub fn flee_destination<T, R>(position: Vec2, threat: Vec2, eye_strength: u32, terrain: &T, rng: &mut R) -> Result<Vec2>
where
    T: Terrain + ?Sized,
    R: Rng + ?Sized,
{
    let away = position - threat;
    sample_toward(position, away, FLEE_SPREAD_DEGREES, eye_strength, terrain, rng)
}

/// Whether a fresh flee destination differs enough to be issued
pub fn should_reissue(current: Option<Vec2>, candidate: Vec2) -> bool {
    current.map_or(true, |dest| !within(dest, candidate, FLEE_REISSUE_DISTANCE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::ShelterId;
    use crate::world::blocking::{ObstacleMap, OpenField};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct Void;

    impl Terrain for Void {
        fn line_of_sight(&self, _: Vec2, _: Vec2, _: Option<ShelterId>) -> bool {
            true
        }

        fn sample_navigable_point(&self, _: Vec2, _: f32) -> Option<Vec2> {
            None
        }
    }

    #[test]
    fn test_wander_stays_in_arc_and_band() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..200 {
            let dest = wander_destination(Vec2::ZERO, Vec2::Y, 10, &OpenField, &mut rng).unwrap();
            let d = dest.length();
            assert!((5.0..=8.0 + 1e-4).contains(&d));
            let cos = dest.normalize().dot(Vec2::Y);
            assert!(cos >= WANDER_SPREAD_DEGREES.to_radians().cos() - 1e-4);
        }
    }

    #[test]
    fn test_flee_points_away_from_threat() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..200 {
            let dest = flee_destination(Vec2::ZERO, Vec2::new(3.0, 0.0), 10, &OpenField, &mut rng).unwrap();
            assert!(dest.x < 0.0);
            let cos = dest.normalize().dot(Vec2::NEG_X);
            assert!(cos >= FLEE_SPREAD_DEGREES.to_radians().cos() - 1e-4);
        }
    }

    #[test]
    fn test_blocked_ahead_widens_search() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        // map ends just ahead of the agent
        let map = ObstacleMap::new(Vec2::new(-50.0, -50.0), Vec2::new(0.5, 50.0));
        for _ in 0..50 {
            let dest = wander_destination(Vec2::ZERO, Vec2::X, 10, &map, &mut rng).unwrap();
            assert!(map.is_navigable(dest));
        }
    }

    #[test]
    fn test_unreachable_after_all_attempts() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let err = wander_destination(Vec2::ZERO, Vec2::X, 10, &Void, &mut rng).unwrap_err();
        assert!(matches!(err, EcoError::Unreachable { attempts: 10 }));
    }

    #[test]
    fn test_flee_reissue_threshold() {
        assert!(should_reissue(None, Vec2::ZERO));
        assert!(!should_reissue(Some(Vec2::ZERO), Vec2::new(0.3, 0.0)));
        assert!(should_reissue(Some(Vec2::ZERO), Vec2::new(0.6, 0.0)));
    }
}
