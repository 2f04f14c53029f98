//! Randomised invariants over multi-tick runs

use std::collections::HashMap;

use proptest::prelude::*;

use skirmish_ai::actions::Action;
use skirmish_ai::bot::{Bot, BotTier, Skill};
use skirmish_ai::core::config::EngineConfig;
use skirmish_ai::core::types::{ClanId, EntityId, Rect};
use skirmish_ai::engine::{InitMessage, TacticalEngine, TickMessage, TickReply};
use skirmish_ai::world::{
    CentralZone, ClanInfo, Obstacle, PlayerView, SafeZone, WorldGeometry, WorldSnapshot,
};

const WORLD: f64 = 1500.0;
const TICKS: u32 = 80;
const TICK_MS: f64 = 16.0;

fn geometry() -> WorldGeometry {
    WorldGeometry {
        world_size: WORLD,
        clans: (0..3)
            .map(|id| ClanInfo {
                id: ClanId(id),
                base_rect: None,
                color: None,
            })
            .collect(),
        safe_zones: vec![
            SafeZone::new(ClanId(0), Rect::new(0.0, 0.0, 300.0, 300.0)),
            SafeZone::new(ClanId(1), Rect::new(1200.0, 1200.0, 300.0, 300.0)),
        ],
        central_safe_zone: Some(CentralZone::Circle {
            x: 750.0,
            y: 750.0,
            radius: 120.0,
        }),
        obstacles: vec![
            Obstacle::asteroid(500.0, 300.0, 80.0, 60.0),
            Obstacle::asteroid(900.0, 1000.0, 50.0, 120.0),
            Obstacle::base(ClanId(2), Rect::new(100.0, 1300.0, 120.0, 120.0), 1500.0),
        ],
    }
}

fn tier_from(code: u8) -> BotTier {
    match code {
        0 => BotTier::Normal,
        1 => BotTier::Elite,
        _ => BotTier::Boss,
    }
}

fn bots_strategy() -> impl Strategy<Value = Vec<Bot>> {
    prop::collection::vec(
        (
            0u32..3,
            0u8..3,
            0.0..(WORLD - 40.0),
            0.0..(WORLD - 40.0),
            0.05f64..1.0,
            1.0f64..100.0,
            1.0f64..6.0,
            0u32..300,
        ),
        1..12,
    )
    .prop_map(|params| {
        params
            .into_iter()
            .enumerate()
            .map(|(i, (clan, tier, x, y, fire_rate, health, speed, timer))| {
                let mut bot = Bot::new(format!("bot_{i}"), ClanId(clan), tier_from(tier), x, y);
                bot.fire_rate = fire_rate;
                bot.health = health;
                bot.speed = speed;
                bot.patrol_timer = timer;
                bot
            })
            .collect()
    })
}

fn players_strategy() -> impl Strategy<Value = Vec<PlayerView>> {
    prop::collection::vec(
        (0u32..3, 0.0..WORLD, 0.0..WORLD, 0.0f64..100.0, any::<bool>()),
        0..10,
    )
    .prop_map(|params| {
        params
            .into_iter()
            .enumerate()
            .map(|(i, (clan, x, y, health, is_human))| {
                let mut player = PlayerView::new(format!("player_{i}"), ClanId(clan), x, y);
                player.health = health;
                player.is_human = is_human;
                player
            })
            .collect()
    })
}

fn as_player(bot: &Bot) -> PlayerView {
    let mut view = PlayerView::new(bot.id.clone(), bot.clan, bot.x, bot.y);
    view.health = bot.health;
    view.max_health = bot.max_health;
    view.is_elite = bot.tier == BotTier::Elite;
    view.is_boss = bot.tier == BotTier::Boss;
    view
}

/// Run the skirmish, handing every (before, message, reply) to `check`
fn simulate(
    seed: u64,
    bots: Vec<Bot>,
    humans: &[PlayerView],
    mut check: impl FnMut(&[Bot], &TickMessage, &TickReply),
) {
    let mut engine = TacticalEngine::with_seed(EngineConfig::default(), seed);
    engine.init(InitMessage::new(geometry()));

    let mut bots = bots;
    for step in 0..TICKS {
        let mut live_players: Vec<PlayerView> = bots.iter().map(as_player).collect();
        live_players.extend_from_slice(humans);
        let message = TickMessage {
            bots: bots.clone(),
            live_players,
            now_ms: 1_000.0 + step as f64 * TICK_MS,
        };
        let reply = engine.tick(message.clone());
        check(&bots, &message, &reply);
        bots = reply.updated_bots;
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_never_targets_self_or_ally(
        seed in any::<u64>(),
        bots in bots_strategy(),
        humans in players_strategy(),
    ) {
        simulate(seed, bots, &humans, |_, _, reply| {
            for bot in &reply.updated_bots {
                if let Some(target) = &bot.target {
                    assert_ne!(target.id, bot.id);
                    assert_ne!(target.cached_clan, bot.clan);
                }
            }
        });
    }

    #[test]
    fn prop_sheltered_players_untargeted(
        seed in any::<u64>(),
        bots in bots_strategy(),
        humans in players_strategy(),
    ) {
        let zones = WorldSnapshot::from_geometry(geometry());
        simulate(seed, bots, &humans, |_, message, reply| {
            for player in &message.live_players {
                if !zones.is_in_safe_zone(player.position()) {
                    continue;
                }
                for bot in &reply.updated_bots {
                    let targeted = bot.target.as_ref().is_some_and(|t| !t.is_base && t.id == player.id);
                    assert!(!targeted, "{} targeted sheltered {}", bot.id, player.id);
                }
            }
        });
    }

    #[test]
    fn prop_bots_stay_in_bounds(
        seed in any::<u64>(),
        bots in bots_strategy(),
        humans in players_strategy(),
    ) {
        simulate(seed, bots, &humans, |_, _, reply| {
            for bot in &reply.updated_bots {
                assert!(bot.x >= 0.0 && bot.x <= WORLD - bot.width, "x {}", bot.x);
                assert!(bot.y >= 0.0 && bot.y <= WORLD - bot.height, "y {}", bot.y);
            }
        });
    }

    #[test]
    fn prop_cooldowns_only_rise_on_trigger(
        seed in any::<u64>(),
        bots in bots_strategy(),
        humans in players_strategy(),
    ) {
        simulate(seed, bots, &humans, |before, _, reply| {
            for (old, new) in before.iter().zip(&reply.updated_bots) {
                let (Some(old_block), Some(new_block)) = (&old.abilities, &new.abilities) else {
                    continue;
                };
                for skill in Skill::ALL {
                    let old_cd = old_block.skills.get(skill);
                    let new_cd = new_block.skills.get(skill);
                    let max = new_block.skill_cooldowns.get(skill);
                    assert!(new_cd <= old_cd || new_cd == max, "{skill:?}: {old_cd} -> {new_cd}");
                }
            }
        });
    }

    #[test]
    fn prop_speed_restored_after_boost(
        seed in any::<u64>(),
        bots in bots_strategy(),
        humans in players_strategy(),
    ) {
        let base_speed: HashMap<EntityId, f64> =
            bots.iter().map(|b| (b.id.clone(), b.speed)).collect();
        simulate(seed, bots, &humans, |_, _, reply| {
            for bot in &reply.updated_bots {
                let boosted = bot.abilities.as_ref().is_some_and(|a| a.turbo_boost_active);
                if !boosted {
                    assert_eq!(bot.speed, base_speed[&bot.id]);
                }
            }
        });
    }

    #[test]
    fn prop_shots_respect_fire_interval(
        seed in any::<u64>(),
        bots in bots_strategy(),
        humans in players_strategy(),
    ) {
        let intervals: HashMap<EntityId, f64> =
            bots.iter().map(|b| (b.id.clone(), b.fire_rate * 1000.0)).collect();
        let mut last_shot: HashMap<EntityId, f64> = HashMap::new();
        simulate(seed, bots, &humans, |_, message, reply| {
            for action in &reply.actions {
                let Action::Shoot { bot_id, .. } = action else {
                    continue;
                };
                if let Some(previous) = last_shot.get(bot_id) {
                    assert!(message.now_ms - previous > intervals[bot_id]);
                }
                last_shot.insert(bot_id.clone(), message.now_ms);
            }
        });
    }
}
