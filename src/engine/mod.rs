//! Engine orchestration
//!
//! [`TacticalEngine`] is the synchronous core. [`spawn_engine`] moves it
//! onto its own thread behind an [`EngineHandle`] so the host loop never
//! blocks on a tick. `wire` offers the same messages as JSON text.

pub mod engine;
pub mod handle;
pub mod messages;
pub mod wire;
pub mod worker;

pub use engine::TacticalEngine;
pub use handle::{spawn_engine, EngineHandle, EngineTask};
pub use messages::{
    EngineStats, InitMessage, PerformanceHints, SetSatelliteMessage, TickMessage, TickReply,
};
pub use worker::{Command, EngineWorker};
