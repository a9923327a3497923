//! Terrain implementations
//!
//! `ObstacleMap` is a rectangular map with solid polygon obstacles and den
//! footprints. Sight lines are blocked by any obstacle or den the segment
//! touches; navigable points are inside the bounds and outside every
//! polygon. `OpenField` has no obstacles at all.

use geo::{coord, Contains, Intersects, Line, LineString, Point, Polygon};
use glam::Vec2;

use crate::core::types::ShelterId;
use crate::world::services::Terrain;

const SAMPLE_RING_STEP: f32 = 0.5;
const SAMPLE_RING_DIRECTIONS: u32 = 12;

/// Solidity of a map feature
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockingState {
    /// Blocks sight and movement
    Solid,
    /// Blocks movement only (water, shallow pits)
    Impassable,
}

impl BlockingState {
    pub fn blocks_sight(&self) -> bool {
        matches!(self, BlockingState::Solid)
    }
}

#[derive(Debug, Clone)]
struct Feature {
    polygon: Polygon<f64>,
    state: BlockingState,
}

/// Rectangular terrain with polygon obstacles
#[derive(Debug, Clone)]
pub struct ObstacleMap {
    min: Vec2,
    max: Vec2,
    features: Vec<Feature>,
    shelters: Vec<(ShelterId, Polygon<f64>)>,
}

impl ObstacleMap {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self {
            min,
            max,
            features: Vec::new(),
            shelters: Vec::new(),
        }
    }

    pub fn bounds(&self) -> (Vec2, Vec2) {
        (self.min, self.max)
    }

    /// Add an obstacle footprint
    pub fn add_obstacle(&mut self, footprint: &[Vec2], state: BlockingState) {
        if let Some(polygon) = to_polygon(footprint) {
            self.features.push(Feature { polygon, state });
        }
    }

    /// Square obstacle centred on `centre`
    pub fn add_square(&mut self, centre: Vec2, half: f32, state: BlockingState) {
        self.add_obstacle(&square(centre, half), state);
    }

    /// Register a den footprint
    pub fn add_shelter(&mut self, id: ShelterId, footprint: &[Vec2]) {
        if let Some(polygon) = to_polygon(footprint) {
            self.shelters.push((id, polygon));
        }
    }

    pub fn in_bounds(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Inside the map and outside every footprint
    pub fn is_navigable(&self, p: Vec2) -> bool {
        if !self.in_bounds(p) {
            return false;
        }
        let point = Point::new(p.x as f64, p.y as f64);
        !self.features.iter().any(|f| f.polygon.contains(&point))
            && !self.shelters.iter().any(|(_, poly)| poly.contains(&point))
    }
}

impl Terrain for ObstacleMap {
    fn line_of_sight(&self, from: Vec2, to: Vec2, target_shelter: Option<ShelterId>) -> bool {
        let line = Line::new(
            coord! { x: from.x as f64, y: from.y as f64 },
            coord! { x: to.x as f64, y: to.y as f64 },
        );

        let blocked_by_feature = self
            .features
            .iter()
            .filter(|f| f.state.blocks_sight())
            .any(|f| line.intersects(&f.polygon));
        if blocked_by_feature {
            return false;
        }

        !self
            .shelters
            .iter()
            .filter(|(id, _)| Some(*id) != target_shelter)
            .any(|(_, poly)| line.intersects(poly))
    }

    fn sample_navigable_point(&self, near: Vec2, max_distance: f32) -> Option<Vec2> {
        if self.is_navigable(near) {
            return Some(near);
        }

        let mut radius = SAMPLE_RING_STEP;
        while radius <= max_distance {
            for i in 0..SAMPLE_RING_DIRECTIONS {
                let angle = i as f32 / SAMPLE_RING_DIRECTIONS as f32 * std::f32::consts::TAU;
                let candidate = near + Vec2::new(angle.cos(), angle.sin()) * radius;
                if self.is_navigable(candidate) {
                    return Some(candidate);
                }
            }
            radius += SAMPLE_RING_STEP;
        }
        None
    }
}

/// Unbounded, obstruction-free terrain
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenField;

impl Terrain for OpenField {
    fn line_of_sight(&self, _from: Vec2, _to: Vec2, _target_shelter: Option<ShelterId>) -> bool {
        true
    }

    fn sample_navigable_point(&self, near: Vec2, _max_distance: f32) -> Option<Vec2> {
        Some(near)
    }
}

/// Corners of an axis-aligned square
pub fn square(centre: Vec2, half: f32) -> Vec<Vec2> {
    vec![
        centre + Vec2::new(-half, -half),
        centre + Vec2::new(half, -half),
        centre + Vec2::new(half, half),
        centre + Vec2::new(-half, half),
    ]
}

fn to_polygon(footprint: &[Vec2]) -> Option<Polygon<f64>> {
    if footprint.len() < 3 {
        return None;
    }
    let coords: Vec<(f64, f64)> = footprint.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    Some(Polygon::new(LineString::from(coords), vec![]))
}
