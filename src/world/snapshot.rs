//! Per-tick view of the world supplied by the host
//!
//! `WorldGeometry` is the static part delivered once with `Init`;
//! `WorldSnapshot` adds the live player list and satellite flags and is
//! read-only for the duration of a tick.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::{ClanId, EntityId, Rect, Vec2};
use crate::world::obstacles::Obstacle;
use crate::world::zones::{CentralZone, SafeZone};

/// Live entity (human or bot) as seen by the targeting system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerView {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub health: f64,
    pub max_health: f64,
    pub clan: ClanId,
    #[serde(default)]
    pub is_human: bool,
    #[serde(default)]
    pub is_elite: bool,
    #[serde(default)]
    pub is_boss: bool,
}

impl PlayerView {
    pub fn new(id: impl Into<EntityId>, clan: ClanId, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            health: 100.0,
            max_health: 100.0,
            clan,
            is_human: false,
            is_elite: false,
            is_boss: false,
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Reject records that would poison distance or score arithmetic
    pub fn validate(&self) -> Result<()> {
        let malformed = |reason: &str| EngineError::MalformedPlayer {
            id: self.id.clone(),
            reason: reason.to_string(),
        };
        if !self.position().is_finite() {
            return Err(malformed("non-finite position"));
        }
        if !self.health.is_finite() {
            return Err(malformed("non-finite health"));
        }
        if !(self.max_health.is_finite() && self.max_health > 0.0) {
            return Err(malformed("max_health must be positive"));
        }
        Ok(())
    }
}

/// Clan descriptor from the world layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClanInfo {
    pub id: ClanId,
    #[serde(default)]
    pub base_rect: Option<Rect>,
    #[serde(default)]
    pub color: Option<String>,
}

/// Static world layout delivered with `Init`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorldGeometry {
    pub world_size: f64,
    #[serde(default)]
    pub clans: Vec<ClanInfo>,
    #[serde(default)]
    pub safe_zones: Vec<SafeZone>,
    #[serde(default)]
    pub central_safe_zone: Option<CentralZone>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
}

impl WorldGeometry {
    /// Every clan mentioned anywhere in the layout
    pub fn known_clans(&self) -> Vec<ClanId> {
        let mut clans: Vec<ClanId> = self
            .clans
            .iter()
            .map(|c| c.id)
            .chain(self.safe_zones.iter().map(|z| z.clan))
            .chain(self.obstacles.iter().filter_map(|o| o.clan))
            .collect();
        clans.sort_unstable();
        clans.dedup();
        clans
    }
}

/// Immutable-per-tick world view
#[derive(Debug, Clone, Default)]
pub struct WorldSnapshot {
    pub world_size: f64,
    pub obstacles: Vec<Obstacle>,
    pub safe_zones: Vec<SafeZone>,
    pub central_zone: Option<CentralZone>,
    pub players: Vec<PlayerView>,
    satellite_active: AHashMap<ClanId, bool>,
}

impl WorldSnapshot {
    pub fn new(world_size: f64) -> Self {
        Self {
            world_size,
            ..Self::default()
        }
    }

    /// Build from static geometry; every known clan starts with its satellite active
    pub fn from_geometry(geometry: WorldGeometry) -> Self {
        let satellite_active = geometry
            .known_clans()
            .into_iter()
            .map(|clan| (clan, true))
            .collect();
        Self {
            world_size: geometry.world_size,
            obstacles: geometry.obstacles,
            safe_zones: geometry.safe_zones,
            central_zone: geometry.central_safe_zone,
            players: Vec::new(),
            satellite_active,
        }
    }

    pub fn with_obstacle(mut self, obstacle: Obstacle) -> Self {
        self.obstacles.push(obstacle);
        self
    }

    pub fn with_safe_zone(mut self, zone: SafeZone) -> Self {
        self.safe_zones.push(zone);
        self
    }

    pub fn with_central_zone(mut self, zone: CentralZone) -> Self {
        self.central_zone = Some(zone);
        self
    }

    pub fn with_player(mut self, player: PlayerView) -> Self {
        self.players.push(player);
        self
    }

    pub fn with_satellite(mut self, clan: ClanId, active: bool) -> Self {
        self.set_satellite(clan, active);
        self
    }

    pub fn set_satellite(&mut self, clan: ClanId, active: bool) {
        self.satellite_active.insert(clan, active);
    }

    /// Unknown clans have no satellite coverage
    pub fn satellite_active(&self, clan: ClanId) -> bool {
        self.satellite_active.get(&clan).copied().unwrap_or(false)
    }

    pub fn player(&self, id: &EntityId) -> Option<&PlayerView> {
        self.players.iter().find(|p| &p.id == id)
    }

    /// Inside any clan safe zone or the central zone
    pub fn is_in_safe_zone(&self, point: Vec2) -> bool {
        self.safe_zones.iter().any(|zone| zone.contains(point))
            || self.central_zone.is_some_and(|zone| zone.contains(point))
    }

    /// Whether `rect` overlaps any obstacle that blocks `clan`
    pub fn collides(&self, rect: &Rect, clan: ClanId) -> bool {
        self.obstacles
            .iter()
            .any(|o| o.blocks(clan) && o.rect().intersects(rect))
    }

    /// The live enemy base standing behind a synthesized `base_<clan>` target id
    pub fn base_target(&self, id: &EntityId, attacker: ClanId) -> Option<&Obstacle> {
        self.obstacles.iter().find(|o| {
            o.is_enemy_base(attacker) && o.clan.is_some_and(|clan| &EntityId::base(clan) == id)
        })
    }

    /// Clamp a top-left position so an entity of the given extent stays inside the world
    pub fn clamp(&self, pos: Vec2, width: f64, height: f64) -> Vec2 {
        let max_x = (self.world_size - width).max(0.0);
        let max_y = (self.world_size - height).max(0.0);
        Vec2::new(pos.x.clamp(0.0, max_x), pos.y.clamp(0.0, max_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::obstacles::ObstacleKind;

    fn geometry() -> WorldGeometry {
        WorldGeometry {
            world_size: 3000.0,
            clans: vec![ClanInfo { id: ClanId(0), base_rect: None, color: None }],
            safe_zones: vec![SafeZone::new(ClanId(1), Rect::new(0.0, 0.0, 200.0, 200.0))],
            central_safe_zone: None,
            obstacles: vec![Obstacle::base(
                ClanId(2),
                Rect::new(2500.0, 2500.0, 300.0, 300.0),
                1000.0,
            )],
        }
    }

    #[test]
    fn test_from_geometry_enables_all_known_satellites() {
        let snapshot = WorldSnapshot::from_geometry(geometry());
        assert!(snapshot.satellite_active(ClanId(0)));
        assert!(snapshot.satellite_active(ClanId(1)));
        assert!(snapshot.satellite_active(ClanId(2)));
        assert!(!snapshot.satellite_active(ClanId(9)));
    }

    #[test]
    fn test_clamp_keeps_extent_inside() {
        let snapshot = WorldSnapshot::new(1000.0);
        let clamped = snapshot.clamp(Vec2::new(995.0, -4.0), 40.0, 40.0);
        assert_eq!(clamped, Vec2::new(960.0, 0.0));
    }

    #[test]
    fn test_collides_ignores_own_base() {
        let snapshot = WorldSnapshot::from_geometry(geometry());
        let probe = Rect::new(2600.0, 2600.0, 40.0, 40.0);
        assert!(!snapshot.collides(&probe, ClanId(2)));
        assert!(snapshot.collides(&probe, ClanId(0)));
    }

    #[test]
    fn test_base_target_lookup() {
        let snapshot = WorldSnapshot::from_geometry(geometry());
        let found = snapshot.base_target(&EntityId::new("base_2"), ClanId(0));
        assert!(found.is_some_and(|o| o.kind == ObstacleKind::Base));
        assert!(snapshot.base_target(&EntityId::new("base_2"), ClanId(2)).is_none());
    }

    #[test]
    fn test_player_validation() {
        let mut player = PlayerView::new("p1", ClanId(1), 10.0, 10.0);
        assert!(player.validate().is_ok());
        player.max_health = 0.0;
        assert!(player.validate().is_err());
        player.max_health = 100.0;
        player.x = f64::NAN;
        assert!(player.validate().is_err());
    }
}
