//! External services and the reference implementations the runner uses

pub mod blocking;
pub mod navigation;
pub mod objects;
pub mod placement;
pub mod services;

pub use blocking::{BlockingState, ObstacleMap, OpenField};
pub use navigation::KinematicNavigator;
pub use objects::{FoodItem, WaterPoint};
pub use placement::{LayoutFile, Placement, PlacementKind};
pub use services::{Navigation, Terrain};
