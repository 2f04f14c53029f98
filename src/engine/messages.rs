//! Messages exchanged between the host simulation and the engine

use serde::{Deserialize, Serialize};

use crate::actions::Action;
use crate::bot::Bot;
use crate::core::types::{ClanId, EntityId, Millis};
use crate::world::{PlayerView, WorldGeometry};

/// Optional tuning supplied by the host at init time
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceHints {
    /// Batch size at which a tick switches to the rayon pool
    #[serde(default)]
    pub parallel_threshold: Option<usize>,
}

/// Static world layout, sent once before the first tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitMessage {
    #[serde(flatten)]
    pub geometry: WorldGeometry,
    #[serde(default)]
    pub performance_hints: PerformanceHints,
}

impl InitMessage {
    pub fn new(geometry: WorldGeometry) -> Self {
        Self {
            geometry,
            performance_hints: PerformanceHints::default(),
        }
    }

    pub fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.performance_hints.parallel_threshold = Some(threshold);
        self
    }
}

/// One simulation step: the bots to advance and who is alive right now
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickMessage {
    pub bots: Vec<Bot>,
    #[serde(default)]
    pub live_players: Vec<PlayerView>,
    /// Host clock in milliseconds
    #[serde(default)]
    pub now_ms: Millis,
}

/// Toggle long-range base detection for one clan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetSatelliteMessage {
    pub clan: ClanId,
    pub active: bool,
}

/// Result of one tick
///
/// `updated_bots` keeps the input order. Bots listed in `skipped` are
/// returned exactly as received.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TickReply {
    pub updated_bots: Vec<Bot>,
    pub actions: Vec<Action>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub skipped: Vec<EntityId>,
}

/// Running counters since the engine was created
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineStats {
    pub ticks: u64,
    pub bots_processed: u64,
    pub bots_skipped: u64,
    pub actions_emitted: u64,
}
