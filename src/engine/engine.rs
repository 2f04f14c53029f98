//! Synchronous tactical engine
//!
//! Owns the static world geometry, the per-clan satellite flags and the
//! tick counter. Every tick is computed to completion before returning;
//! large batches fan out over the rayon pool.

use rayon::prelude::*;

use crate::actions::Action;
use crate::bot::Bot;
use crate::core::config::EngineConfig;
use crate::core::random::SeededRandom;
use crate::core::types::{ClanId, EntityId};
use crate::tactics::step_bot;
use crate::world::WorldSnapshot;

use super::messages::{EngineStats, InitMessage, SetSatelliteMessage, TickMessage, TickReply};

/// Per-bot result of one tick
enum BotOutcome {
    Stepped(Vec<Action>),
    Skipped(EntityId),
}

pub struct TacticalEngine {
    config: EngineConfig,
    seed: u64,
    /// `None` until the first `init`
    world: Option<WorldSnapshot>,
    parallel_threshold: usize,
    tick_counter: u64,
    stats: EngineStats,
}

impl TacticalEngine {
    /// Engine with a random seed
    pub fn new(config: EngineConfig) -> Self {
        Self::with_seed(config, rand::random())
    }

    /// Engine whose patrol headings and ability rolls are reproducible
    pub fn with_seed(config: EngineConfig, seed: u64) -> Self {
        let parallel_threshold = config.parallel_threshold;
        Self {
            config,
            seed,
            world: None,
            parallel_threshold,
            tick_counter: 0,
            stats: EngineStats::default(),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn is_initialized(&self) -> bool {
        self.world.is_some()
    }

    pub fn stats(&self) -> EngineStats {
        self.stats
    }

    /// Current world view, if initialised
    pub fn world(&self) -> Option<&WorldSnapshot> {
        self.world.as_ref()
    }

    /// Replace the static world; every known clan gets its satellite enabled
    pub fn init(&mut self, message: InitMessage) {
        self.parallel_threshold = message
            .performance_hints
            .parallel_threshold
            .unwrap_or(self.config.parallel_threshold);

        let world = WorldSnapshot::from_geometry(message.geometry);
        tracing::info!(
            world_size = world.world_size,
            obstacles = world.obstacles.len(),
            safe_zones = world.safe_zones.len(),
            parallel_threshold = self.parallel_threshold,
            "engine initialised"
        );
        self.world = Some(world);
    }

    /// Toggle long-range base detection for a clan, effective next tick
    ///
    /// Ignored before `init`, which resets every flag anyway.
    pub fn set_satellite(&mut self, message: SetSatelliteMessage) {
        match self.world.as_mut() {
            Some(world) => {
                world.set_satellite(message.clan, message.active);
                tracing::info!(clan = message.clan.0, active = message.active, "satellite toggled");
            }
            None => {
                tracing::warn!(clan = message.clan.0, "satellite toggle before init ignored");
            }
        }
    }

    pub fn satellite_active(&self, clan: ClanId) -> bool {
        self.world
            .as_ref()
            .is_some_and(|world| world.satellite_active(clan))
    }

    /// Advance every bot in the batch by one tick
    ///
    /// Malformed bots are returned untouched and listed in `skipped`;
    /// malformed players are left out of the live list.
    pub fn tick(&mut self, message: TickMessage) -> TickReply {
        let TickMessage {
            mut bots,
            live_players,
            now_ms,
        } = message;

        let Some(world) = self.world.as_mut() else {
            tracing::warn!(bots = bots.len(), "tick before init, bots returned unchanged");
            return TickReply {
                updated_bots: bots,
                actions: Vec::new(),
                skipped: Vec::new(),
            };
        };

        world.players = live_players
            .into_iter()
            .filter(|player| match player.validate() {
                Ok(()) => true,
                Err(err) => {
                    tracing::warn!(%err, "player dropped from live list");
                    false
                }
            })
            .collect();

        let world: &WorldSnapshot = world;
        let config = &self.config;
        let seed = self.seed;
        let tick = self.tick_counter;

        let process = |bot: &mut Bot| -> BotOutcome {
            if let Err(err) = bot.validate(world.world_size) {
                tracing::warn!(%err, "bot skipped this tick");
                return BotOutcome::Skipped(bot.id.clone());
            }
            let mut rng = SeededRandom::for_bot(seed, &bot.id, tick);
            let mut actions = Vec::new();
            step_bot(bot, world, config, now_ms, &mut rng, &mut actions);
            BotOutcome::Stepped(actions)
        };

        let outcomes: Vec<BotOutcome> = if bots.len() >= self.parallel_threshold {
            bots.par_iter_mut().map(&process).collect()
        } else {
            bots.iter_mut().map(&process).collect()
        };

        let mut actions = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                BotOutcome::Stepped(emitted) => actions.extend(emitted),
                BotOutcome::Skipped(id) => skipped.push(id),
            }
        }

        self.tick_counter += 1;
        self.stats.ticks += 1;
        self.stats.bots_processed += (bots.len() - skipped.len()) as u64;
        self.stats.bots_skipped += skipped.len() as u64;
        self.stats.actions_emitted += actions.len() as u64;

        tracing::trace!(
            tick,
            bots = bots.len(),
            actions = actions.len(),
            skipped = skipped.len(),
            "tick complete"
        );

        TickReply {
            updated_bots: bots,
            actions,
            skipped,
        }
    }
}
