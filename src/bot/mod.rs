//! Bot records: identity, kinematics, combat stats and AI bookkeeping
//!
//! Bots are created by the host and handed to the engine each tick. The
//! engine mutates them in place and returns them; it never creates or
//! destroys bots.

pub mod abilities;

use serde::{Deserialize, Serialize};

use crate::core::error::{EngineError, Result};
use crate::core::types::{ClanId, EntityId, Millis, Rect, Vec2};

pub use abilities::{AbilityBlock, Skill, SkillSet};

/// Bot rank; elite and boss bots are "aggressive" and carry abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BotTier {
    #[default]
    Normal,
    Elite,
    Boss,
}

impl BotTier {
    /// Boss wins when both flags are set
    pub fn from_flags(is_elite: bool, is_boss: bool) -> Self {
        if is_boss {
            BotTier::Boss
        } else if is_elite {
            BotTier::Elite
        } else {
            BotTier::Normal
        }
    }

    pub fn is_aggressive(self) -> bool {
        matches!(self, BotTier::Elite | BotTier::Boss)
    }
}

/// Behaviour state of the per-bot state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AiState {
    #[default]
    Patrol,
    Chase,
}

/// Cached view of the current target, refreshed on every scan
///
/// Never trusted as live: the engine resolves `id` against the current
/// snapshot before moving or firing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TargetRef {
    pub id: EntityId,
    pub cached_x: f64,
    pub cached_y: f64,
    pub cached_clan: ClanId,
    pub cached_health: f64,
    pub cached_max_health: f64,
    #[serde(default)]
    pub is_base: bool,
}

impl TargetRef {
    pub fn position(&self) -> Vec2 {
        Vec2::new(self.cached_x, self.cached_y)
    }
}

/// A non-human combatant
///
/// On the wire the tier may arrive either as `tier` or as the host's
/// `isElite`/`isBoss` flags; encoding emits all three.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBot", into = "RawBot")]
pub struct Bot {
    // Identity
    pub id: EntityId,
    pub clan: ClanId,
    pub tier: BotTier,

    // Kinematics
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Facing in radians; `None` until a heading has been assigned
    pub angle: Option<f64>,
    pub speed: f64,

    // Combat
    pub health: f64,
    pub max_health: f64,
    pub damage: f64,
    /// Seconds between shots
    pub fire_rate: f64,
    pub last_shot: Millis,

    // AI bookkeeping
    pub state: AiState,
    pub target: Option<TargetRef>,
    /// Ticks since the last target scan
    pub patrol_timer: u32,

    /// Present iff the tier is elite or boss
    pub abilities: Option<AbilityBlock>,
}

/// Wire shape of [`Bot`]
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBot {
    id: EntityId,
    clan: ClanId,
    #[serde(default)]
    tier: Option<BotTier>,
    #[serde(default)]
    is_elite: bool,
    #[serde(default)]
    is_boss: bool,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    #[serde(default)]
    angle: Option<f64>,
    speed: f64,
    health: f64,
    max_health: f64,
    #[serde(default)]
    damage: f64,
    fire_rate: f64,
    #[serde(default)]
    last_shot: Millis,
    #[serde(default)]
    state: AiState,
    #[serde(default)]
    target: Option<TargetRef>,
    #[serde(default)]
    patrol_timer: u32,
    #[serde(default)]
    abilities: Option<AbilityBlock>,
}

impl From<RawBot> for Bot {
    fn from(raw: RawBot) -> Self {
        // Host flags take precedence over an explicit tier
        let tier = if raw.is_elite || raw.is_boss {
            BotTier::from_flags(raw.is_elite, raw.is_boss)
        } else {
            raw.tier.unwrap_or_default()
        };
        Self {
            id: raw.id,
            clan: raw.clan,
            tier,
            x: raw.x,
            y: raw.y,
            width: raw.width,
            height: raw.height,
            angle: raw.angle,
            speed: raw.speed,
            health: raw.health,
            max_health: raw.max_health,
            damage: raw.damage,
            fire_rate: raw.fire_rate,
            last_shot: raw.last_shot,
            state: raw.state,
            target: raw.target,
            patrol_timer: raw.patrol_timer,
            abilities: raw.abilities,
        }
    }
}

impl From<Bot> for RawBot {
    fn from(bot: Bot) -> Self {
        Self {
            id: bot.id,
            clan: bot.clan,
            tier: Some(bot.tier),
            is_elite: bot.tier == BotTier::Elite,
            is_boss: bot.tier == BotTier::Boss,
            x: bot.x,
            y: bot.y,
            width: bot.width,
            height: bot.height,
            angle: bot.angle,
            speed: bot.speed,
            health: bot.health,
            max_health: bot.max_health,
            damage: bot.damage,
            fire_rate: bot.fire_rate,
            last_shot: bot.last_shot,
            state: bot.state,
            target: bot.target,
            patrol_timer: bot.patrol_timer,
            abilities: bot.abilities,
        }
    }
}

impl Bot {
    /// Bot with stock stats; aggressive tiers get the standard ability block
    pub fn new(id: impl Into<EntityId>, clan: ClanId, tier: BotTier, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            clan,
            tier,
            x,
            y,
            width: 40.0,
            height: 40.0,
            angle: None,
            speed: 3.0,
            health: 100.0,
            max_health: 100.0,
            damage: 10.0,
            fire_rate: 0.5,
            last_shot: 0.0,
            state: AiState::Patrol,
            target: None,
            patrol_timer: 0,
            abilities: tier.is_aggressive().then(AbilityBlock::standard),
        }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn set_position(&mut self, pos: Vec2) {
        self.x = pos.x;
        self.y = pos.y;
    }

    /// Footprint of this bot if it stood at `pos`
    pub fn rect_at(&self, pos: Vec2) -> Rect {
        Rect::new(pos.x, pos.y, self.width, self.height)
    }

    pub fn is_aggressive(&self) -> bool {
        self.tier.is_aggressive()
    }

    /// Structural checks; a failing bot is skipped for the tick and returned unchanged
    pub fn validate(&self, world_size: f64) -> Result<()> {
        let malformed = |reason: String| EngineError::MalformedBot {
            id: self.id.clone(),
            reason,
        };

        if !self.position().is_finite() {
            return Err(malformed("non-finite position".into()));
        }
        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(malformed("extent must be positive".into()));
        }
        if self.width > world_size || self.height > world_size {
            return Err(malformed(format!(
                "extent {}x{} exceeds world size {}",
                self.width, self.height, world_size
            )));
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(malformed("speed must be finite and non-negative".into()));
        }
        if !self.health.is_finite() || !(self.max_health.is_finite() && self.max_health > 0.0) {
            return Err(malformed("invalid health values".into()));
        }
        if !(self.fire_rate.is_finite() && self.fire_rate >= 0.0) || !self.last_shot.is_finite() {
            return Err(malformed("invalid fire timing".into()));
        }
        if self.angle.is_some_and(|a| !a.is_finite()) {
            return Err(malformed("non-finite angle".into()));
        }
        match (&self.abilities, self.is_aggressive()) {
            (Some(block), true) => block
                .validate()
                .map_err(|reason| malformed(reason.to_string()))?,
            (None, false) => {}
            (None, true) => return Err(malformed("aggressive bot without abilities".into())),
            (Some(_), false) => return Err(malformed("normal bot with abilities".into())),
        }
        Ok(())
    }
}
