//! Cloneable async façade over the engine worker
//!
//! [`EngineHandle`] hides the channel plumbing. Every request carries its
//! own oneshot reply; a closed channel surfaces as an error instead of a
//! hang.

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::core::config::EngineConfig;
use crate::core::error::{EngineError, Result};
use crate::core::types::ClanId;

use super::engine::TacticalEngine;
use super::messages::{EngineStats, InitMessage, SetSatelliteMessage, TickMessage, TickReply};
use super::worker::{Command, EngineWorker};

/// Client-facing handle to a running engine worker
#[derive(Clone)]
pub struct EngineHandle {
    command_tx: mpsc::Sender<Command>,
}

impl EngineHandle {
    pub(crate) fn new(command_tx: mpsc::Sender<Command>) -> Self {
        Self { command_tx }
    }

    async fn send(&self, cmd: Command) -> Result<()> {
        self.command_tx
            .send(cmd)
            .await
            .map_err(|_| EngineError::CommandChannelClosed)
    }

    /// Load the static world layout
    pub async fn init(&self, message: InitMessage) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Init {
            message,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(EngineError::ReplyChannelClosed)
    }

    /// Advance a batch of bots and wait for the result
    pub async fn tick(&self, message: TickMessage) -> Result<TickReply> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Tick {
            message,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(EngineError::ReplyChannelClosed)
    }

    /// Toggle long-range base detection for one clan
    pub async fn set_satellite(&self, clan: ClanId, active: bool) -> Result<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::SetSatellite {
            message: SetSatelliteMessage { clan, active },
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(EngineError::ReplyChannelClosed)
    }

    pub async fn satellite_active(&self, clan: ClanId) -> Result<bool> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::SatelliteActive {
            clan,
            reply: reply_tx,
        })
        .await?;
        reply_rx.await.map_err(EngineError::ReplyChannelClosed)
    }

    pub async fn stats(&self) -> Result<EngineStats> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.send(Command::Stats { reply: reply_tx }).await?;
        reply_rx.await.map_err(EngineError::ReplyChannelClosed)
    }

    /// Ask the worker to stop once queued commands are answered
    pub async fn shutdown(&self) -> Result<()> {
        self.send(Command::Shutdown).await
    }
}

/// Join handle of the blocking worker thread
pub struct EngineTask {
    join: JoinHandle<TacticalEngine>,
}

impl EngineTask {
    /// Wait for the worker to stop and take back the engine
    pub async fn join(self) -> Result<TacticalEngine> {
        self.join
            .await
            .map_err(|err| EngineError::WorkerGone(err.to_string()))
    }
}

/// Start an engine worker on tokio's blocking pool
///
/// Must be called from within a tokio runtime.
pub fn spawn_engine(config: EngineConfig, seed: u64) -> Result<(EngineHandle, EngineTask)> {
    config.validate()?;
    let (command_tx, command_rx) = mpsc::channel(config.channel_capacity);
    let worker = EngineWorker::new(TacticalEngine::with_seed(config, seed), command_rx);
    let join = tokio::task::spawn_blocking(move || worker.run());
    Ok((EngineHandle::new(command_tx), EngineTask { join }))
}
