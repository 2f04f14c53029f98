//! Engine configuration with documented constants
//!
//! All tactical magic numbers are collected here with explanations of their
//! purpose. The defaults reproduce the reference bot behaviour; a TOML file
//! may override any subset of them.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::bot::BotTier;
use crate::core::error::{EngineError, Result};

/// Preferred and maximum engagement distances for one bot tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierRanges {
    /// Distance the bot tries to hold while chasing (world units)
    pub optimal_range: f64,
    /// Maximum distance at which the bot fires (world units)
    pub shoot_range: f64,
}

impl TierRanges {
    pub const fn new(optimal_range: f64, shoot_range: f64) -> Self {
        Self { optimal_range, shoot_range }
    }
}

/// Configuration for the tactical engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === TIMING ===
    /// Fixed duration of one simulation tick (milliseconds)
    ///
    /// Ability cooldowns are decremented by this amount every tick,
    /// independent of the host clock.
    pub tick_ms: f64,

    // === TARGETING ===
    /// Detection radius for normal bots (world units)
    pub detection_radius: f64,

    /// Detection radius for elite and boss bots (world units)
    pub elite_detection_radius: f64,

    /// Radius for satellite-assisted enemy base detection (world units)
    ///
    /// Only consulted when no player target is in range and the bot's clan
    /// has its satellite flag set.
    pub base_detection_radius: f64,

    /// Ticks a patrolling normal bot waits between target scans
    pub rescan_interval: u32,

    /// Ticks a patrolling elite or boss bot waits between target scans
    pub elite_rescan_interval: u32,

    /// Target weight for enemy bosses
    pub boss_weight: f64,

    /// Target weight for human players
    pub human_weight: f64,

    /// Target weight for enemy elites
    pub elite_weight: f64,

    /// Target weight for everything else
    pub default_weight: f64,

    /// Multiplier on missing health fraction, rewards finishing off wounded targets
    pub health_bonus_factor: f64,

    /// Score numerator for virtual base targets (`score = base_score / (d + 1)`)
    pub base_score: f64,

    // === STEERING ===
    /// Fraction of `speed` used while patrolling
    pub patrol_speed_factor: f64,

    /// Fraction of `speed` used while kiting away from a close target
    pub retreat_speed_factor: f64,

    /// Below `optimal_range * kite_ratio` the bot backs off
    pub kite_ratio: f64,

    /// Heading offset tried once when the direct chase step is blocked (degrees)
    pub deflection_angle_deg: f64,

    /// Engagement ranges for normal bots
    pub normal_ranges: TierRanges,

    /// Engagement ranges for elite bots
    pub elite_ranges: TierRanges,

    /// Engagement ranges for boss bots
    pub boss_ranges: TierRanges,

    // === ABILITIES ===
    /// Mega-shot (T) only triggers below this distance
    pub mega_shot_range: f64,

    /// Probability gate for the mega-shot once its cooldown is ready
    pub mega_shot_chance: f64,

    /// Shield (E) only triggers below `max_health * shield_health_ratio`
    pub shield_health_ratio: f64,

    /// Probability gate for the shield once its cooldown is ready
    pub shield_chance: f64,

    /// How long a shield stays up (milliseconds)
    pub shield_duration_ms: f64,

    /// Turbo (R) only triggers beyond this distance
    pub turbo_min_distance: f64,

    /// Probability gate for the turbo boost once its cooldown is ready
    pub turbo_chance: f64,

    /// How long a turbo boost lasts (milliseconds)
    pub turbo_duration_ms: f64,

    /// Speed multiplier while boosted
    pub turbo_multiplier: f64,

    // === PARALLELIZATION ===
    /// Minimum batch size before a tick is processed with rayon
    ///
    /// Below this threshold, thread overhead exceeds benefits.
    pub parallel_threshold: usize,

    /// Capacity of the worker command queue
    pub channel_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_ms: 16.0,

            detection_radius: 450.0,
            elite_detection_radius: 800.0,
            base_detection_radius: 2000.0,
            rescan_interval: 240,
            elite_rescan_interval: 90,
            boss_weight: 10.0,
            human_weight: 5.0,
            elite_weight: 3.0,
            default_weight: 1.0,
            health_bonus_factor: 2.5,
            base_score: 2.0,

            patrol_speed_factor: 0.5,
            retreat_speed_factor: 0.5,
            kite_ratio: 0.7,
            deflection_angle_deg: 60.0,
            normal_ranges: TierRanges::new(200.0, 300.0),
            elite_ranges: TierRanges::new(300.0, 450.0),
            boss_ranges: TierRanges::new(400.0, 550.0),

            mega_shot_range: 450.0,
            mega_shot_chance: 0.4,
            shield_health_ratio: 0.6,
            shield_chance: 0.5,
            shield_duration_ms: 5000.0,
            turbo_min_distance: 350.0,
            turbo_chance: 0.3,
            turbo_duration_ms: 4000.0,
            turbo_multiplier: 1.5,

            parallel_threshold: 256,
            channel_capacity: 64,
        }
    }
}

impl EngineConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Engagement ranges for a bot tier
    pub fn ranges(&self, tier: BotTier) -> TierRanges {
        match tier {
            BotTier::Normal => self.normal_ranges,
            BotTier::Elite => self.elite_ranges,
            BotTier::Boss => self.boss_ranges,
        }
    }

    /// Player detection radius for a bot tier
    pub fn detection_radius_for(&self, tier: BotTier) -> f64 {
        if tier.is_aggressive() {
            self.elite_detection_radius
        } else {
            self.detection_radius
        }
    }

    /// Patrol re-scan interval (ticks) for a bot tier
    pub fn rescan_interval_for(&self, tier: BotTier) -> u32 {
        if tier.is_aggressive() {
            self.elite_rescan_interval
        } else {
            self.rescan_interval
        }
    }

    pub fn deflection_angle(&self) -> f64 {
        self.deflection_angle_deg.to_radians()
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.tick_ms <= 0.0 {
            return Err(EngineError::InvalidConfig("tick_ms must be positive".into()));
        }

        let radii = [
            self.detection_radius,
            self.elite_detection_radius,
            self.base_detection_radius,
        ];
        if radii.iter().any(|r| !r.is_finite() || *r <= 0.0) {
            return Err(EngineError::InvalidConfig(
                "Detection radii must be positive".into(),
            ));
        }

        let chances = [
            ("mega_shot_chance", self.mega_shot_chance),
            ("shield_chance", self.shield_chance),
            ("turbo_chance", self.turbo_chance),
        ];
        for (name, chance) in chances {
            if !(0.0..=1.0).contains(&chance) {
                return Err(EngineError::InvalidConfig(format!(
                    "{} ({}) must be within [0, 1]",
                    name, chance
                )));
            }
        }

        if !(self.kite_ratio > 0.0 && self.kite_ratio < 1.0) {
            return Err(EngineError::InvalidConfig(format!(
                "kite_ratio ({}) must be within (0, 1)",
                self.kite_ratio
            )));
        }

        for (tier, ranges) in [
            ("normal", self.normal_ranges),
            ("elite", self.elite_ranges),
            ("boss", self.boss_ranges),
        ] {
            if ranges.optimal_range <= 0.0 || ranges.optimal_range >= ranges.shoot_range {
                return Err(EngineError::InvalidConfig(format!(
                    "{} optimal_range ({}) should be positive and < shoot_range ({})",
                    tier, ranges.optimal_range, ranges.shoot_range
                )));
            }
        }

        if self.turbo_multiplier <= 0.0 {
            return Err(EngineError::InvalidConfig("turbo_multiplier must be positive".into()));
        }

        if self.channel_capacity == 0 {
            return Err(EngineError::InvalidConfig("channel_capacity must be > 0".into()));
        }

        Ok(())
    }
}

/// Load and validate an engine configuration from a TOML file
///
/// Keys missing from the file keep their default values.
pub fn load_config(path: impl AsRef<Path>) -> Result<EngineConfig> {
    let contents = fs::read_to_string(path.as_ref())?;
    let config: EngineConfig = toml::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}
