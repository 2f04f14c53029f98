//! Safe zones: regions where hostile targeting is suppressed

use serde::{Deserialize, Serialize};

use crate::core::types::{ClanId, Rect, Vec2};

/// Per-clan rectangular safe zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafeZone {
    pub clan: ClanId,
    pub rect: Rect,
}

impl SafeZone {
    pub fn new(clan: ClanId, rect: Rect) -> Self {
        Self { clan, rect }
    }

    pub fn contains(&self, point: Vec2) -> bool {
        self.rect.contains(point)
    }
}

/// Shared central zone, either rectangular or circular
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "lowercase")]
pub enum CentralZone {
    Rect { x: f64, y: f64, width: f64, height: f64 },
    Circle { x: f64, y: f64, radius: f64 },
}

impl CentralZone {
    pub fn contains(&self, point: Vec2) -> bool {
        match *self {
            CentralZone::Rect { x, y, width, height } => {
                Rect::new(x, y, width, height).contains(point)
            }
            CentralZone::Circle { x, y, radius } => point.distance(&Vec2::new(x, y)) <= radius,
        }
    }
}
