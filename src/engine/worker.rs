//! Channel-driven execution context for the engine
//!
//! The worker owns the [`TacticalEngine`] on a blocking thread and drains
//! commands one at a time, so replies come back in request order and the
//! world state has a single writer.

use tokio::sync::{mpsc, oneshot};

use crate::core::types::ClanId;

use super::engine::TacticalEngine;
use super::messages::{EngineStats, InitMessage, SetSatelliteMessage, TickMessage, TickReply};

/// Commands that can be sent to the engine worker
pub enum Command {
    /// Load static world geometry
    Init {
        message: InitMessage,
        reply: oneshot::Sender<()>,
    },
    /// Advance a batch of bots by one tick
    Tick {
        message: TickMessage,
        reply: oneshot::Sender<TickReply>,
    },
    /// Toggle a clan's satellite flag
    SetSatellite {
        message: SetSatelliteMessage,
        reply: oneshot::Sender<()>,
    },
    /// Read a clan's satellite flag
    SatelliteActive {
        clan: ClanId,
        reply: oneshot::Sender<bool>,
    },
    /// Read the running counters
    Stats { reply: oneshot::Sender<EngineStats> },
    /// Stop after replying to everything queued before this command
    Shutdown,
}

/// Worker that owns the engine and processes commands
pub struct EngineWorker {
    engine: TacticalEngine,
    command_rx: mpsc::Receiver<Command>,
}

impl EngineWorker {
    pub fn new(engine: TacticalEngine, command_rx: mpsc::Receiver<Command>) -> Self {
        Self { engine, command_rx }
    }

    /// Main worker loop; must run on a blocking thread
    ///
    /// Ends when every sender is dropped or on `Shutdown`, handing the
    /// engine back to the caller.
    pub fn run(mut self) -> TacticalEngine {
        tracing::info!(seed = self.engine.seed(), "engine worker started");

        while let Some(cmd) = self.command_rx.blocking_recv() {
            if !self.handle_command(cmd) {
                break;
            }
        }

        let stats = self.engine.stats();
        tracing::info!(
            ticks = stats.ticks,
            bots = stats.bots_processed,
            actions = stats.actions_emitted,
            "engine worker stopped"
        );
        self.engine
    }

    /// Returns `false` when the loop should stop
    fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::Init { message, reply } => {
                self.engine.init(message);
                let _ = reply.send(());
            }
            Command::Tick { message, reply } => {
                let result = self.engine.tick(message);
                let _ = reply.send(result);
            }
            Command::SetSatellite { message, reply } => {
                self.engine.set_satellite(message);
                let _ = reply.send(());
            }
            Command::SatelliteActive { clan, reply } => {
                let _ = reply.send(self.engine.satellite_active(clan));
            }
            Command::Stats { reply } => {
                let _ = reply.send(self.engine.stats());
            }
            Command::Shutdown => return false,
        }
        true
    }
}
