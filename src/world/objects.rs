//! Food items and water points

use serde::{Deserialize, Serialize};

use crate::core::types::{FoodId, FoodKind, Vec2, WaterId};

/// A consumable food item; removed when eaten
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub id: FoodId,
    pub kind: FoodKind,
    pub position: Vec2,
}

/// A drinking spot; never depleted
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WaterPoint {
    pub id: WaterId,
    pub position: Vec2,
}
