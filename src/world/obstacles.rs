//! Static obstacles consumed by steering and base targeting
//!
//! The engine never generates geometry; obstacles arrive with `Init` and are
//! only read afterwards.

use serde::{Deserialize, Serialize};

use crate::core::types::{ClanId, Rect, Vec2};

/// Obstacle category as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObstacleKind {
    Asteroid,
    Debris,
    /// A clan base; permeable for bots of the owning clan
    Base,
}

/// Axis-aligned obstacle rectangle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub kind: ObstacleKind,
    /// Owning clan, only meaningful for bases
    #[serde(default)]
    pub clan: Option<ClanId>,
    #[serde(default)]
    pub health: Option<f64>,
    #[serde(default)]
    pub max_health: Option<f64>,
    /// Destroyed obstacles neither block nor get targeted
    #[serde(default)]
    pub destroyed: bool,
}

impl Obstacle {
    pub fn new(rect: Rect, kind: ObstacleKind) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            kind,
            clan: None,
            health: None,
            max_health: None,
            destroyed: false,
        }
    }

    pub fn asteroid(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::new(Rect::new(x, y, width, height), ObstacleKind::Asteroid)
    }

    pub fn base(clan: ClanId, rect: Rect, health: f64) -> Self {
        Self {
            clan: Some(clan),
            health: Some(health),
            max_health: Some(health),
            ..Self::new(rect, ObstacleKind::Base)
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    /// Whether this obstacle stops a mover belonging to `clan`
    pub fn blocks(&self, clan: ClanId) -> bool {
        if self.destroyed {
            return false;
        }
        !(self.kind == ObstacleKind::Base && self.clan == Some(clan))
    }

    /// Whether this is a live base owned by some clan other than `clan`
    pub fn is_enemy_base(&self, clan: ClanId) -> bool {
        self.kind == ObstacleKind::Base
            && !self.destroyed
            && matches!(self.clan, Some(owner) if owner != clan)
    }

    /// Current and maximum health; bases without explicit values count as full
    pub fn health_pair(&self) -> (f64, f64) {
        let max = self.max_health.or(self.health).unwrap_or(1.0);
        (self.health.unwrap_or(max), max)
    }
}
