//! Target selection
//!
//! Scores every visible hostile player and keeps the best one. When nothing
//! is in range and the bot's clan has satellite coverage, enemy bases within
//! the extended radius become candidates instead.

use crate::bot::{Bot, TargetRef};
use crate::core::config::EngineConfig;
use crate::core::types::EntityId;
use crate::world::{PlayerView, WorldSnapshot};

/// Priority weight of a candidate: boss > human > elite > other
pub fn target_weight(player: &PlayerView, config: &EngineConfig) -> f64 {
    if player.is_boss {
        config.boss_weight
    } else if player.is_human {
        config.human_weight
    } else if player.is_elite {
        config.elite_weight
    } else {
        config.default_weight
    }
}

/// Whether `player` may be targeted by `bot` at all, ignoring range
pub fn is_valid_target(bot: &Bot, player: &PlayerView, snapshot: &WorldSnapshot) -> bool {
    player.id != bot.id
        && player.is_alive()
        && player.clan != bot.clan
        && !snapshot.is_in_safe_zone(player.position())
}

/// Score of `player` as a target for `bot`, `None` if not eligible or out of range
pub fn score_player(
    bot: &Bot,
    player: &PlayerView,
    snapshot: &WorldSnapshot,
    config: &EngineConfig,
) -> Option<f64> {
    if !is_valid_target(bot, player, snapshot) {
        return None;
    }

    let distance = bot.position().distance(&player.position());
    if distance > config.detection_radius_for(bot.tier) {
        return None;
    }

    let weight = target_weight(player, config);
    let health_bonus = (1.0 - player.health / player.max_health) * config.health_bonus_factor;
    Some((weight + health_bonus) / (distance + 1.0))
}

/// Pick the best target for `bot`, or `None`
///
/// Ties keep the first candidate in snapshot order. Bases are only
/// considered when no player qualifies.
pub fn select_best_target(
    bot: &Bot,
    snapshot: &WorldSnapshot,
    config: &EngineConfig,
) -> Option<TargetRef> {
    let mut best: Option<(f64, &PlayerView)> = None;

    for player in &snapshot.players {
        let Some(score) = score_player(bot, player, snapshot, config) else {
            continue;
        };
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, player));
        }
    }

    if let Some((_, player)) = best {
        return Some(TargetRef {
            id: player.id.clone(),
            cached_x: player.x,
            cached_y: player.y,
            cached_clan: player.clan,
            cached_health: player.health,
            cached_max_health: player.max_health,
            is_base: false,
        });
    }

    if snapshot.satellite_active(bot.clan) {
        return select_base_target(bot, snapshot, config);
    }

    None
}

/// Extended mode: nearest-scoring live enemy base within the satellite radius
fn select_base_target(
    bot: &Bot,
    snapshot: &WorldSnapshot,
    config: &EngineConfig,
) -> Option<TargetRef> {
    let mut best: Option<(f64, TargetRef)> = None;

    for obstacle in &snapshot.obstacles {
        if !obstacle.is_enemy_base(bot.clan) {
            continue;
        }
        let Some(owner) = obstacle.clan else {
            continue;
        };

        let center = obstacle.center();
        let distance = bot.position().distance(&center);
        if distance > config.base_detection_radius {
            continue;
        }

        let score = config.base_score / (distance + 1.0);
        if best.as_ref().map_or(true, |(best_score, _)| score > *best_score) {
            let (health, max_health) = obstacle.health_pair();
            best = Some((
                score,
                TargetRef {
                    id: EntityId::base(owner),
                    cached_x: center.x,
                    cached_y: center.y,
                    cached_clan: owner,
                    cached_health: health,
                    cached_max_health: max_health,
                    is_base: true,
                },
            ));
        }
    }

    best.map(|(_, target)| target)
}
