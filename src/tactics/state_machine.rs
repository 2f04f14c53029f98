//! Per-bot patrol/chase state machine
//!
//! One call to [`step_bot`] is one tick for one bot: cooldown decay,
//! target bookkeeping, steering, combat, bounds clamp and effect expiry,
//! in that order. The bot reads only the snapshot, never other bots.

use crate::actions::Action;
use crate::bot::{AiState, Bot, TargetRef};
use crate::core::config::EngineConfig;
use crate::core::random::RandomSource;
use crate::core::types::{Millis, Vec2};
use crate::world::WorldSnapshot;

use super::combat::{expire_effects, try_abilities, try_fire};
use super::steering::{chase_step, clamp_to_world, patrol_step};
use super::targeting::select_best_target;

/// Outcome of the target bookkeeping phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// New target (different id), now chasing
    Acquired,
    /// Same target as before, still chasing
    Retained,
    /// Scan found nothing, back to patrol
    Lost,
    /// No scan this tick, patrol timer advanced
    Waiting,
}

/// Run the target scan if due and apply the patrol/chase transition
pub fn update_target(bot: &mut Bot, snapshot: &WorldSnapshot, config: &EngineConfig) -> Transition {
    let interval = config.rescan_interval_for(bot.tier);
    if bot.state != AiState::Chase && bot.patrol_timer <= interval {
        bot.patrol_timer = bot.patrol_timer.saturating_add(1);
        return Transition::Waiting;
    }

    match select_best_target(bot, snapshot, config) {
        Some(found) => {
            let changed = bot.target.as_ref().map_or(true, |current| current.id != found.id);
            if changed {
                tracing::debug!(bot = %bot.id, target = %found.id, base = found.is_base, "target acquired");
                bot.patrol_timer = 0;
            }
            bot.target = Some(found);
            bot.state = AiState::Chase;
            if changed {
                Transition::Acquired
            } else {
                Transition::Retained
            }
        }
        None => {
            if bot.state == AiState::Chase {
                tracing::debug!(bot = %bot.id, "target lost, patrolling");
            }
            bot.target = None;
            bot.state = AiState::Patrol;
            bot.patrol_timer = 0;
            Transition::Lost
        }
    }
}

/// Current position of the stored target, looked up by id in this snapshot
pub fn resolve_target(target: &TargetRef, bot: &Bot, snapshot: &WorldSnapshot) -> Option<Vec2> {
    if target.is_base {
        snapshot
            .base_target(&target.id, bot.clan)
            .map(|base| base.center())
    } else {
        snapshot
            .player(&target.id)
            .filter(|player| player.is_alive() && player.clan != bot.clan)
            .map(|player| player.position())
    }
}

/// Advance one bot by one tick, appending any emitted actions
pub fn step_bot(
    bot: &mut Bot,
    snapshot: &WorldSnapshot,
    config: &EngineConfig,
    now: Millis,
    rng: &mut impl RandomSource,
    actions: &mut Vec<Action>,
) -> Transition {
    if let Some(block) = bot.abilities.as_mut() {
        block.decay(config.tick_ms);
    }

    let transition = update_target(bot, snapshot, config);

    match bot.state {
        AiState::Patrol => {
            patrol_step(bot, snapshot, config, rng);
        }
        AiState::Chase => {
            let resolved = bot
                .target
                .as_ref()
                .and_then(|target| resolve_target(target, bot, snapshot));
            match resolved {
                Some(position) => {
                    let step = chase_step(bot, position, snapshot, config);
                    if let Some(heading) = step.heading {
                        actions.extend(try_fire(bot, heading, step.distance, now, config));
                        actions.extend(try_abilities(bot, step.distance, now, config, rng));
                    }
                }
                None => {
                    tracing::debug!(bot = %bot.id, "target no longer present");
                    bot.target = None;
                    bot.state = AiState::Patrol;
                }
            }
        }
    }

    clamp_to_world(bot, snapshot);

    if bot.is_aggressive() {
        let expired = expire_effects(bot, now);
        if expired.shield || expired.turbo {
            tracing::debug!(bot = %bot.id, shield = expired.shield, turbo = expired.turbo, "effects expired");
        }
    }

    transition
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::BotTier;
    use crate::core::random::{FixedRandom, SeededRandom};
    use crate::core::types::{ClanId, Rect};
    use crate::world::{Obstacle, PlayerView};

    fn world() -> WorldSnapshot {
        WorldSnapshot::new(2000.0)
    }

    #[test]
    fn test_patrol_timer_counts_up_without_scan() {
        let config = EngineConfig::default();
        let snapshot = world().with_player(PlayerView::new("enemy", ClanId(1), 150.0, 100.0));
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Normal, 100.0, 100.0);
        bot.patrol_timer = 10;

        assert_eq!(update_target(&mut bot, &snapshot, &config), Transition::Waiting);
        assert_eq!(bot.patrol_timer, 11);
        assert!(bot.target.is_none());
    }

    #[test]
    fn test_scan_after_interval_acquires_target() {
        let config = EngineConfig::default();
        let snapshot = world().with_player(PlayerView::new("enemy", ClanId(1), 150.0, 100.0));
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Normal, 100.0, 100.0);
        bot.patrol_timer = 241;

        assert_eq!(update_target(&mut bot, &snapshot, &config), Transition::Acquired);
        assert_eq!(bot.state, AiState::Chase);
        assert_eq!(bot.patrol_timer, 0);
        assert_eq!(bot.target.as_ref().map(|t| t.id.as_str()), Some("enemy"));
    }

    #[test]
    fn test_elite_scans_sooner() {
        let config = EngineConfig::default();
        let snapshot = world().with_player(PlayerView::new("enemy", ClanId(1), 150.0, 100.0));
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Elite, 100.0, 100.0);
        bot.patrol_timer = 91;

        assert_eq!(update_target(&mut bot, &snapshot, &config), Transition::Acquired);
    }

    #[test]
    fn test_chasing_same_target_keeps_timer() {
        let config = EngineConfig::default();
        let snapshot = world().with_player(PlayerView::new("enemy", ClanId(1), 150.0, 100.0));
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Normal, 100.0, 100.0);
        bot.patrol_timer = 241;
        update_target(&mut bot, &snapshot, &config);
        bot.patrol_timer = 7;

        assert_eq!(update_target(&mut bot, &snapshot, &config), Transition::Retained);
        assert_eq!(bot.patrol_timer, 7);
    }

    #[test]
    fn test_chase_falls_back_to_patrol() {
        let config = EngineConfig::default();
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Normal, 100.0, 100.0);
        bot.patrol_timer = 241;
        let with_enemy = world().with_player(PlayerView::new("enemy", ClanId(1), 150.0, 100.0));
        update_target(&mut bot, &with_enemy, &config);

        assert_eq!(update_target(&mut bot, &world(), &config), Transition::Lost);
        assert_eq!(bot.state, AiState::Patrol);
        assert!(bot.target.is_none());
        assert_eq!(bot.patrol_timer, 0);
    }

    #[test]
    fn test_missing_player_does_not_resolve() {
        let config = EngineConfig::default();
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Normal, 100.0, 100.0);
        let snapshot = world().with_player(PlayerView::new("enemy", ClanId(1), 150.0, 100.0));
        bot.patrol_timer = 241;
        update_target(&mut bot, &snapshot, &config);

        let target = bot.target.clone().expect("target acquired");
        let empty = world();
        assert!(resolve_target(&target, &bot, &empty).is_none());
    }

    #[test]
    fn test_base_target_resolves_to_center() {
        let snapshot = world().with_obstacle(Obstacle::base(
            ClanId(1),
            Rect::new(1000.0, 1000.0, 200.0, 100.0),
            500.0,
        ));
        let bot = Bot::new("bot", ClanId(0), BotTier::Normal, 100.0, 100.0);
        let target = TargetRef {
            id: "base_1".into(),
            cached_x: 0.0,
            cached_y: 0.0,
            cached_clan: ClanId(1),
            cached_health: 500.0,
            cached_max_health: 500.0,
            is_base: true,
        };
        assert_eq!(
            resolve_target(&target, &bot, &snapshot),
            Some(Vec2::new(1100.0, 1050.0))
        );
    }

    #[test]
    fn test_step_decays_cooldowns_first() {
        let config = EngineConfig::default();
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Elite, 100.0, 100.0);
        let mut rng = SeededRandom::new(7);
        let mut actions = Vec::new();
        step_bot(&mut bot, &world(), &config, 1000.0, &mut rng, &mut actions);

        let block = bot.abilities.as_ref().expect("elite has abilities");
        assert_eq!(block.skills.q, -16.0);
        assert_eq!(block.skills.t, -16.0);
    }

    #[test]
    fn test_step_chases_and_fires() {
        let config = EngineConfig::default();
        let snapshot = world().with_player(PlayerView::new("enemy", ClanId(1), 350.0, 100.0));
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Normal, 100.0, 100.0);
        bot.patrol_timer = 241;
        let mut rng = FixedRandom::constant(0.99);
        let mut actions = Vec::new();

        step_bot(&mut bot, &snapshot, &config, 10_000.0, &mut rng, &mut actions);

        assert_eq!(bot.state, AiState::Chase);
        // 250 away: beyond optimal 200, advances 3 units east
        assert_eq!(bot.x, 103.0);
        assert_eq!(bot.angle, Some(0.0));
        assert_eq!(actions.len(), 1);
        assert!(matches!(actions[0], Action::Shoot { angle, .. } if angle == 0.0));
        assert_eq!(bot.last_shot, 10_000.0);
    }

    #[test]
    fn test_step_keeps_bot_in_bounds() {
        let config = EngineConfig::default();
        let snapshot = WorldSnapshot::new(500.0);
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Normal, 470.0, -5.0);
        let mut rng = FixedRandom::constant(0.0);
        let mut actions = Vec::new();

        step_bot(&mut bot, &snapshot, &config, 0.0, &mut rng, &mut actions);

        assert!(bot.x >= 0.0 && bot.x <= 460.0);
        assert!(bot.y >= 0.0 && bot.y <= 460.0);
    }

    #[test]
    fn test_step_expires_turbo() {
        let config = EngineConfig::default();
        let mut bot = Bot::new("bot", ClanId(0), BotTier::Elite, 100.0, 100.0);
        bot.speed = 4.5;
        if let Some(block) = bot.abilities.as_mut() {
            block.turbo_boost_active = true;
            block.turbo_boost_end_time = 1000.0;
            block.original_speed = Some(3.0);
        }
        let mut rng = FixedRandom::constant(0.5);
        let mut actions = Vec::new();

        step_bot(&mut bot, &world(), &config, 1000.5, &mut rng, &mut actions);

        assert_eq!(bot.speed, 3.0);
        assert!(bot.abilities.as_ref().is_some_and(|a| !a.turbo_boost_active));
    }
}
