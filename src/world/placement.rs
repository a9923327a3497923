//! JSON schema types for map layouts
//!
//! A layout file lists positioned caves, water pools, rocks and plants
//! inside a rectangular map. `LayoutFile::apply` registers the objects with
//! a `World` and builds the matching `ObstacleMap` terrain.

use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::error::{EcoError, Result};
use crate::core::types::{heading_from_degrees, FoodKind, Vec2};
use crate::ecs::world::World;
use crate::world::blocking::{square, BlockingState, ObstacleMap};

/// Current schema version
pub const LAYOUT_VERSION: u32 = 1;

const DEFAULT_CAVE_SIZE: f32 = 3.0;
const DEFAULT_CAVE_CAPACITY: u32 = 10;
const DEFAULT_POOL_SIZE: f32 = 2.0;
const DEFAULT_ROCK_SIZE: f32 = 1.5;
/// Entrance sits this far outside the cave footprint
const ENTRANCE_CLEARANCE: f32 = 0.4;
/// Exit sits this far outside the cave footprint
const EXIT_CLEARANCE: f32 = 1.0;
/// Drinking spots sit this far outside the pool edge
const BANK_CLEARANCE: f32 = 0.3;
const SPAWN_ATTEMPTS: u32 = 32;

/// Root structure for layout JSON files
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutFile {
    /// Schema version (currently 1)
    pub version: u32,
    #[serde(default)]
    pub metadata: Option<LayoutMetadata>,
    pub bounds: LayoutBounds,
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LayoutMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Map rectangle, `[x, y]` corners
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct LayoutBounds {
    pub min: [f32; 2],
    pub max: [f32; 2],
}

/// What a placement puts on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlacementKind {
    /// Shelter with a solid square footprint
    Cave,
    /// Impassable pool with a drinking spot on each bank
    Water,
    /// Solid square obstacle
    Rock,
    /// Single plant food item
    Plant,
}

/// A single placed object
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Placement {
    pub kind: PlacementKind,
    /// World position [x, y]
    pub position: [f32; 2],
    /// Side length of the square footprint
    #[serde(default)]
    pub size: Option<f32>,
    /// Shelter units, caves only
    #[serde(default)]
    pub capacity: Option<u32>,
    /// Direction the cave mouth faces, in degrees (defaults to 0 = +x)
    #[serde(default)]
    pub rotation_deg: Option<f32>,
}

impl Placement {
    fn centre(&self) -> Vec2 {
        Vec2::from(self.position)
    }

    fn half_size(&self, default: f32) -> f32 {
        self.size.unwrap_or(default).max(0.1) / 2.0
    }
}

/// What `LayoutFile::apply` registered
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutSummary {
    pub caves: usize,
    pub water_points: usize,
    pub rocks: usize,
    pub plants: usize,
}

impl LayoutFile {
    pub fn from_json(content: &str) -> Result<Self> {
        let layout: LayoutFile = serde_json::from_str(content)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.version != LAYOUT_VERSION {
            return Err(EcoError::InvalidConfig(format!(
                "unsupported layout version {}",
                self.version
            )));
        }
        let (min, max) = self.corners();
        if min.x >= max.x || min.y >= max.y {
            return Err(EcoError::InvalidConfig("layout bounds are empty".into()));
        }
        if let Some(p) = self.placements.iter().find(|p| {
            let c = p.centre();
            c.x < min.x || c.y < min.y || c.x > max.x || c.y > max.y
        }) {
            return Err(EcoError::InvalidConfig(format!(
                "{:?} at {:?} lies outside the layout bounds",
                p.kind, p.position
            )));
        }
        Ok(())
    }

    pub fn corners(&self) -> (Vec2, Vec2) {
        (Vec2::from(self.bounds.min), Vec2::from(self.bounds.max))
    }

    /// Generated layout: a ring of caves, a few pools and rocks, no plants
    ///
    /// Plants are added separately with `scatter_plants` so they can be
    /// replenished every dawn.
    pub fn demo<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let half_extent = 60.0;
        let mut placements = Vec::new();

        for i in 0..8 {
            let angle = i as f32 * 45.0 + rng.gen_range(-10.0..10.0);
            let radius = rng.gen_range(30.0..45.0);
            let centre = heading_from_degrees(angle) * radius;
            placements.push(Placement {
                kind: PlacementKind::Cave,
                position: centre.to_array(),
                size: Some(DEFAULT_CAVE_SIZE),
                capacity: Some(DEFAULT_CAVE_CAPACITY),
                // mouth faces the middle of the map
                rotation_deg: Some(angle + 180.0),
            });
        }

        for _ in 0..4 {
            let centre = Vec2::new(rng.gen_range(-20.0..20.0), rng.gen_range(-20.0..20.0));
            placements.push(Placement {
                kind: PlacementKind::Water,
                position: centre.to_array(),
                size: Some(rng.gen_range(2.0..4.0)),
                capacity: None,
                rotation_deg: None,
            });
        }

        for _ in 0..12 {
            let centre = Vec2::new(
                rng.gen_range(-half_extent + 5.0..half_extent - 5.0),
                rng.gen_range(-half_extent + 5.0..half_extent - 5.0),
            );
            placements.push(Placement {
                kind: PlacementKind::Rock,
                position: centre.to_array(),
                size: Some(rng.gen_range(1.0..3.0)),
                capacity: None,
                rotation_deg: None,
            });
        }

        LayoutFile {
            version: LAYOUT_VERSION,
            metadata: Some(LayoutMetadata {
                name: Some("demo".into()),
                description: Some("generated valley".into()),
            }),
            bounds: LayoutBounds {
                min: [-half_extent, -half_extent],
                max: [half_extent, half_extent],
            },
            placements,
        }
    }

    /// Register every placement with `world` and build the terrain
    pub fn apply(&self, world: &mut World) -> (ObstacleMap, LayoutSummary) {
        let (min, max) = self.corners();
        let mut terrain = ObstacleMap::new(min, max);
        let mut summary = LayoutSummary::default();

        for p in &self.placements {
            let centre = p.centre();
            match p.kind {
                PlacementKind::Cave => {
                    let half = p.half_size(DEFAULT_CAVE_SIZE);
                    let mouth = heading_from_degrees(p.rotation_deg.unwrap_or(0.0));
                    let entrance = centre + mouth * (half + ENTRANCE_CLEARANCE);
                    let exit = centre + mouth * (half + EXIT_CLEARANCE);
                    let capacity = p.capacity.unwrap_or(DEFAULT_CAVE_CAPACITY);
                    let id = world.add_shelter(centre, entrance, exit, capacity);
                    terrain.add_shelter(id, &square(centre, half));
                    summary.caves += 1;
                }
                PlacementKind::Water => {
                    let half = p.half_size(DEFAULT_POOL_SIZE);
                    terrain.add_square(centre, half, BlockingState::Impassable);
                    for dir in [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y] {
                        world.add_water(centre + dir * (half + BANK_CLEARANCE));
                        summary.water_points += 1;
                    }
                }
                PlacementKind::Rock => {
                    terrain.add_square(centre, p.half_size(DEFAULT_ROCK_SIZE), BlockingState::Solid);
                    summary.rocks += 1;
                }
                PlacementKind::Plant => {
                    world.add_food(FoodKind::Plant, centre);
                    summary.plants += 1;
                }
            }
        }

        info!(
            caves = summary.caves,
            water = summary.water_points,
            rocks = summary.rocks,
            plants = summary.plants,
            "layout applied"
        );
        (terrain, summary)
    }
}

/// Uniform random navigable point inside the terrain bounds
pub fn random_navigable_point<R: Rng + ?Sized>(terrain: &ObstacleMap, rng: &mut R) -> Option<Vec2> {
    let (min, max) = terrain.bounds();
    (0..SPAWN_ATTEMPTS)
        .map(|_| Vec2::new(rng.gen_range(min.x..max.x), rng.gen_range(min.y..max.y)))
        .find(|&p| terrain.is_navigable(p))
}

/// Drop `count` plants at random navigable points; returns how many landed
pub fn scatter_plants(world: &mut World, terrain: &ObstacleMap, count: usize) -> usize {
    let mut placed = 0;
    for _ in 0..count {
        if let Some(p) = random_navigable_point(terrain, &mut world.rng) {
            world.add_food(FoodKind::Plant, p);
            placed += 1;
        }
    }
    debug!(placed, requested = count, "plants scattered");
    placed
}
