//! Steering: patrol wandering, chase approach with single-deflection
//! avoidance, and kiting inside the optimal range band.
//!
//! No path search; every step is a direct displacement checked against the
//! obstacle rectangles of the current snapshot.

use crate::bot::Bot;
use crate::core::config::EngineConfig;
use crate::core::random::RandomSource;
use crate::core::types::Vec2;
use crate::world::WorldSnapshot;

/// What a steering step did to the bot's position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SteeringOutcome {
    /// Moved along the intended heading
    Moved,
    /// Direct step blocked, moved along the deflected heading
    Deflected,
    /// Backed away from a target that is too close
    Retreated,
    /// Inside the preferred band, no translation
    Holding,
    /// Every candidate step collided, no translation
    Blocked,
    /// Target exactly on top of the bot, nothing to do
    Stationary,
}

/// Result of a chase step, measured before moving
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChaseStep {
    pub distance: f64,
    /// Heading from bot to target, `None` when `distance == 0`
    pub heading: Option<f64>,
    pub outcome: SteeringOutcome,
}

/// Whether the bot's footprint at `pos` is free of blocking obstacles
fn is_clear(bot: &Bot, pos: Vec2, snapshot: &WorldSnapshot) -> bool {
    !snapshot.collides(&bot.rect_at(pos), bot.clan)
}

/// Wander along the current facing at reduced speed
///
/// A blocked step picks a fresh random heading and leaves the bot in place.
/// Steps past the world edge are committed; the post-move clamp bounds them.
pub fn patrol_step(
    bot: &mut Bot,
    snapshot: &WorldSnapshot,
    config: &EngineConfig,
    rng: &mut impl RandomSource,
) -> SteeringOutcome {
    let angle = match bot.angle {
        Some(angle) => angle,
        None => {
            let angle = rng.next_angle();
            bot.angle = Some(angle);
            angle
        }
    };

    let step = Vec2::from_angle(angle) * (bot.speed * config.patrol_speed_factor);
    let next = bot.position() + step;

    if !is_clear(bot, next, snapshot) {
        bot.angle = Some(rng.next_angle());
        return SteeringOutcome::Blocked;
    }

    bot.set_position(next);
    SteeringOutcome::Moved
}

/// Close in on, hold at, or back away from `target` depending on range
///
/// Does not touch `bot.angle`; facing is owned by the combat policy while
/// chasing.
pub fn chase_step(
    bot: &mut Bot,
    target: Vec2,
    snapshot: &WorldSnapshot,
    config: &EngineConfig,
) -> ChaseStep {
    let offset = target - bot.position();
    let distance = offset.length();
    if distance == 0.0 {
        return ChaseStep {
            distance,
            heading: None,
            outcome: SteeringOutcome::Stationary,
        };
    }

    let heading = offset.angle();
    let optimal_range = config.ranges(bot.tier).optimal_range;

    let outcome = if distance > optimal_range {
        advance(bot, heading, snapshot, config)
    } else if distance < optimal_range * config.kite_ratio {
        let retreat = Vec2::from_angle(heading) * -(bot.speed * config.retreat_speed_factor);
        let next = bot.position() + retreat;
        if is_clear(bot, next, snapshot) {
            bot.set_position(next);
            SteeringOutcome::Retreated
        } else {
            SteeringOutcome::Blocked
        }
    } else {
        SteeringOutcome::Holding
    };

    ChaseStep {
        distance,
        heading: Some(heading),
        outcome,
    }
}

/// Full-speed approach with one deflected retry
fn advance(
    bot: &mut Bot,
    heading: f64,
    snapshot: &WorldSnapshot,
    config: &EngineConfig,
) -> SteeringOutcome {
    let direct = bot.position() + Vec2::from_angle(heading) * bot.speed;
    if is_clear(bot, direct, snapshot) {
        bot.set_position(direct);
        return SteeringOutcome::Moved;
    }

    let deflected_heading = heading + config.deflection_angle();
    let deflected = bot.position() + Vec2::from_angle(deflected_heading) * bot.speed;
    if is_clear(bot, deflected, snapshot) {
        bot.set_position(deflected);
        return SteeringOutcome::Deflected;
    }

    SteeringOutcome::Blocked
}

/// Pull the bot back inside `[0, world_size - extent]`
pub fn clamp_to_world(bot: &mut Bot, snapshot: &WorldSnapshot) {
    let clamped = snapshot.clamp(bot.position(), bot.width, bot.height);
    bot.set_position(clamped);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::BotTier;
    use crate::core::random::FixedRandom;
    use crate::core::types::ClanId;
    use crate::world::Obstacle;

    fn bot_at(tier: BotTier, x: f64, y: f64) -> Bot {
        let mut bot = Bot::new("bot", ClanId(0), tier, x, y);
        bot.speed = 4.0;
        bot
    }

    #[test]
    fn test_patrol_assigns_heading_and_moves() {
        let config = EngineConfig::default();
        let snapshot = WorldSnapshot::new(2000.0);
        let mut bot = bot_at(BotTier::Normal, 100.0, 100.0);
        // 0.0 * TAU => heading 0, east
        let mut rng = FixedRandom::constant(0.0);
        let outcome = patrol_step(&mut bot, &snapshot, &config, &mut rng);
        assert_eq!(outcome, SteeringOutcome::Moved);
        assert_eq!(bot.angle, Some(0.0));
        assert!((bot.x - 102.0).abs() < 1e-12);
        assert!((bot.y - 100.0).abs() < 1e-12);
    }

    #[test]
    fn test_patrol_blocked_turns_without_moving() {
        let config = EngineConfig::default();
        let snapshot =
            WorldSnapshot::new(2000.0).with_obstacle(Obstacle::asteroid(141.0, 90.0, 50.0, 60.0));
        let mut bot = bot_at(BotTier::Normal, 100.0, 100.0);
        bot.angle = Some(0.0);
        let mut rng = FixedRandom::constant(0.25);
        let outcome = patrol_step(&mut bot, &snapshot, &config, &mut rng);
        assert_eq!(outcome, SteeringOutcome::Blocked);
        assert_eq!(bot.position(), Vec2::new(100.0, 100.0));
        let new_angle = bot.angle.expect("heading reassigned");
        assert!((new_angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_patrol_past_edge_commits_then_clamps() {
        let config = EngineConfig::default();
        let snapshot = WorldSnapshot::new(1000.0);
        let mut bot = bot_at(BotTier::Normal, 959.0, 500.0);
        bot.speed = 3.0;
        bot.angle = Some(0.0);
        let mut rng = FixedRandom::constant(0.5);
        let outcome = patrol_step(&mut bot, &snapshot, &config, &mut rng);
        assert_eq!(outcome, SteeringOutcome::Moved);
        assert!((bot.x - 960.5).abs() < 1e-12);
        clamp_to_world(&mut bot, &snapshot);
        assert_eq!(bot.position(), Vec2::new(960.0, 500.0));
        assert_eq!(bot.angle, Some(0.0));
    }

    #[test]
    fn test_chase_advances_when_far() {
        let config = EngineConfig::default();
        let snapshot = WorldSnapshot::new(2000.0);
        let mut bot = bot_at(BotTier::Normal, 100.0, 100.0);
        let step = chase_step(&mut bot, Vec2::new(600.0, 100.0), &snapshot, &config);
        assert_eq!(step.outcome, SteeringOutcome::Moved);
        assert_eq!(step.distance, 500.0);
        assert!((bot.x - 104.0).abs() < 1e-12);
        assert!(bot.angle.is_none());
    }

    #[test]
    fn test_chase_deflects_once() {
        let config = EngineConfig::default();
        // Wall directly east of the bot, open to the south-east
        let snapshot =
            WorldSnapshot::new(2000.0).with_obstacle(Obstacle::asteroid(143.0, 60.0, 20.0, 60.0));
        let mut bot = bot_at(BotTier::Normal, 100.0, 100.0);
        let step = chase_step(&mut bot, Vec2::new(600.0, 100.0), &snapshot, &config);
        assert_eq!(step.outcome, SteeringOutcome::Deflected);
        let expected = Vec2::new(100.0, 100.0) + Vec2::from_angle(60f64.to_radians()) * 4.0;
        assert!((bot.x - expected.x).abs() < 1e-9);
        assert!((bot.y - expected.y).abs() < 1e-9);
    }

    #[test]
    fn test_chase_holds_when_both_headings_blocked() {
        let config = EngineConfig::default();
        let snapshot =
            WorldSnapshot::new(2000.0).with_obstacle(Obstacle::asteroid(141.0, 60.0, 20.0, 200.0));
        let mut bot = bot_at(BotTier::Normal, 100.0, 100.0);
        let step = chase_step(&mut bot, Vec2::new(600.0, 100.0), &snapshot, &config);
        assert_eq!(step.outcome, SteeringOutcome::Blocked);
        assert_eq!(bot.position(), Vec2::new(100.0, 100.0));
    }

    #[test]
    fn test_chase_kites_when_too_close() {
        let config = EngineConfig::default();
        let snapshot = WorldSnapshot::new(2000.0);
        let mut bot = bot_at(BotTier::Normal, 500.0, 500.0);
        // 100 < 200 * 0.7
        let step = chase_step(&mut bot, Vec2::new(600.0, 500.0), &snapshot, &config);
        assert_eq!(step.outcome, SteeringOutcome::Retreated);
        assert!((bot.x - 498.0).abs() < 1e-12);
    }

    #[test]
    fn test_chase_kite_blocked_holds() {
        let config = EngineConfig::default();
        // Asteroid ends at x = 499, just behind the bot's left edge
        let snapshot =
            WorldSnapshot::new(2000.0).with_obstacle(Obstacle::asteroid(460.0, 480.0, 39.0, 80.0));
        let mut bot = bot_at(BotTier::Normal, 500.0, 500.0);
        let step = chase_step(&mut bot, Vec2::new(600.0, 500.0), &snapshot, &config);
        assert_eq!(step.outcome, SteeringOutcome::Blocked);
        assert_eq!(step.distance, 100.0);
        assert_eq!(bot.position(), Vec2::new(500.0, 500.0));
        assert!(bot.angle.is_none());
    }

    #[test]
    fn test_chase_holds_in_band() {
        let config = EngineConfig::default();
        let snapshot = WorldSnapshot::new(2000.0);
        let mut bot = bot_at(BotTier::Boss, 500.0, 500.0);
        // boss band is [280, 400]
        let step = chase_step(&mut bot, Vec2::new(850.0, 500.0), &snapshot, &config);
        assert_eq!(step.outcome, SteeringOutcome::Holding);
        assert_eq!(bot.position(), Vec2::new(500.0, 500.0));
    }

    #[test]
    fn test_chase_zero_distance_is_noop() {
        let config = EngineConfig::default();
        let snapshot = WorldSnapshot::new(2000.0);
        let mut bot = bot_at(BotTier::Normal, 500.0, 500.0);
        let step = chase_step(&mut bot, Vec2::new(500.0, 500.0), &snapshot, &config);
        assert_eq!(step.outcome, SteeringOutcome::Stationary);
        assert!(step.heading.is_none());
        assert!(bot.position().is_finite());
    }

    #[test]
    fn test_own_base_does_not_block_chase() {
        let config = EngineConfig::default();
        let snapshot = WorldSnapshot::new(2000.0).with_obstacle(Obstacle::base(
            ClanId(0),
            crate::core::types::Rect::new(90.0, 90.0, 100.0, 100.0),
            500.0,
        ));
        let mut bot = bot_at(BotTier::Normal, 100.0, 100.0);
        let step = chase_step(&mut bot, Vec2::new(600.0, 100.0), &snapshot, &config);
        assert_eq!(step.outcome, SteeringOutcome::Moved);
    }

    #[test]
    fn test_clamp() {
        let snapshot = WorldSnapshot::new(1000.0);
        let mut bot = bot_at(BotTier::Normal, 990.0, -3.0);
        clamp_to_world(&mut bot, &snapshot);
        assert_eq!(bot.position(), Vec2::new(960.0, 0.0));
    }
}
