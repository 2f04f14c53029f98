//! Combat policy: rate-limited firing and cooldown-gated abilities
//!
//! Abilities draw from the injected random source so that bots sharing a
//! cooldown schedule do not trigger in lockstep. A draw only happens once
//! every other condition for that ability holds.

use crate::actions::Action;
use crate::bot::{Bot, BotTier, Skill};
use crate::core::config::EngineConfig;
use crate::core::random::RandomSource;
use crate::core::types::Millis;

/// Effects that ended during an expiry check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiredEffects {
    pub shield: bool,
    pub turbo: bool,
}

/// Minimum time between two shots of this bot (milliseconds)
pub fn shot_interval(bot: &Bot) -> Millis {
    bot.fire_rate * 1000.0
}

/// Aim at the target and fire if in range and off cooldown
///
/// The facing written here is the only facing update while chasing.
pub fn try_fire(
    bot: &mut Bot,
    heading: f64,
    distance: f64,
    now: Millis,
    config: &EngineConfig,
) -> Option<Action> {
    bot.angle = Some(heading);

    let shoot_range = config.ranges(bot.tier).shoot_range;
    if distance >= shoot_range || now - bot.last_shot <= shot_interval(bot) {
        return None;
    }

    bot.last_shot = now;
    tracing::trace!(bot = %bot.id, angle = heading, "shot fired");
    Some(Action::Shoot {
        bot_id: bot.id.clone(),
        angle: heading,
    })
}

/// Evaluate mega-shot, shield and turbo for an elite or boss bot
///
/// Returns the mega-shot action when it triggers; shield and turbo only
/// change bot state.
pub fn try_abilities(
    bot: &mut Bot,
    distance: f64,
    now: Millis,
    config: &EngineConfig,
    rng: &mut impl RandomSource,
) -> Option<Action> {
    let tier = bot.tier;
    let health_ratio = bot.health / bot.max_health;
    let speed = bot.speed;
    let block = bot.abilities.as_mut()?;

    let mut emitted = None;

    if tier == BotTier::Boss
        && block.is_ready(Skill::T)
        && distance < config.mega_shot_range
        && rng.next_f64() < config.mega_shot_chance
    {
        block.reset(Skill::T);
        tracing::debug!(bot = %bot.id, "mega-shot triggered");
        emitted = Some(Action::MegaShot {
            bot_id: bot.id.clone(),
        });
    }

    if block.is_ready(Skill::E)
        && health_ratio < config.shield_health_ratio
        && rng.next_f64() < config.shield_chance
    {
        block.reset(Skill::E);
        block.shield_active = true;
        block.shield_end_time = now + config.shield_duration_ms;
        tracing::debug!(bot = %bot.id, until = block.shield_end_time, "shield raised");
    }

    if !block.turbo_boost_active
        && block.is_ready(Skill::R)
        && distance > config.turbo_min_distance
        && rng.next_f64() < config.turbo_chance
    {
        block.reset(Skill::R);
        block.turbo_boost_active = true;
        block.turbo_boost_end_time = now + config.turbo_duration_ms;
        block.original_speed = Some(speed);
        bot.speed = speed * config.turbo_multiplier;
        tracing::debug!(bot = %bot.id, speed = bot.speed, "turbo engaged");
    }

    emitted
}

/// Drop shield and turbo once their end time has passed
///
/// Turbo expiry restores the exact pre-boost speed.
pub fn expire_effects(bot: &mut Bot, now: Millis) -> ExpiredEffects {
    let mut expired = ExpiredEffects::default();
    let Some(block) = bot.abilities.as_mut() else {
        return expired;
    };

    if block.shield_active && now > block.shield_end_time {
        block.shield_active = false;
        expired.shield = true;
    }

    if block.turbo_boost_active && now > block.turbo_boost_end_time {
        block.turbo_boost_active = false;
        if let Some(original) = block.original_speed.take() {
            bot.speed = original;
        }
        expired.turbo = true;
    }

    expired
}
