//! JSON envelope codec for hosts that talk to the engine as text
//!
//! Inbound messages are tagged by `"type"` (`init`, `tick`,
//! `setSatellite`) with camelCase fields. Bot records that do not decode
//! are echoed back verbatim in `updatedBots` and listed in `skipped`, so
//! one corrupt record never fails the whole batch.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::actions::Action;
use crate::bot::Bot;
use crate::core::error::Result;
use crate::core::types::{EntityId, Millis};
use crate::world::PlayerView;

use super::engine::TacticalEngine;
use super::messages::{InitMessage, SetSatelliteMessage, TickMessage};

/// Tick payload before per-record decoding
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTick {
    pub bots: Vec<Value>,
    #[serde(default)]
    pub live_players: Vec<Value>,
    #[serde(default)]
    pub now_ms: Millis,
}

/// Messages accepted from the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Inbound {
    Init(InitMessage),
    Tick(RawTick),
    SetSatellite(SetSatelliteMessage),
}

/// Tick result with bots kept as raw JSON
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireTickReply {
    pub updated_bots: Vec<Value>,
    pub actions: Vec<Action>,
    #[serde(default)]
    pub skipped: Vec<EntityId>,
}

/// Messages sent back to the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Outbound {
    Ready,
    TickResult(WireTickReply),
    SatelliteUpdated(SetSatelliteMessage),
}

pub fn decode(input: &str) -> Result<Inbound> {
    Ok(serde_json::from_str(input)?)
}

pub fn encode(message: &Outbound) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// Apply one inbound message to the engine
pub fn dispatch(engine: &mut TacticalEngine, inbound: Inbound) -> Result<Outbound> {
    match inbound {
        Inbound::Init(message) => {
            engine.init(message);
            Ok(Outbound::Ready)
        }
        Inbound::SetSatellite(message) => {
            engine.set_satellite(message);
            Ok(Outbound::SatelliteUpdated(message))
        }
        Inbound::Tick(raw) => dispatch_tick(engine, raw).map(Outbound::TickResult),
    }
}

/// Decode, apply and encode in one step
pub fn process_json(engine: &mut TacticalEngine, input: &str) -> Result<String> {
    let inbound = decode(input)?;
    let outbound = dispatch(engine, inbound)?;
    encode(&outbound)
}

/// Best-effort label for an undecodable record: its string id, else the
/// raw JSON of a non-string id, else its slot in the batch
fn record_id(raw: &Value, index: usize) -> EntityId {
    match raw.get("id") {
        Some(Value::String(id)) => EntityId::new(id.clone()),
        Some(Value::Null) | None => EntityId::new(format!("<index {index}>")),
        Some(other) => EntityId::new(other.to_string()),
    }
}

fn dispatch_tick(engine: &mut TacticalEngine, raw: RawTick) -> Result<WireTickReply> {
    let mut bots = Vec::with_capacity(raw.bots.len());
    // `None` marks a slot filled from the engine reply, in order
    let mut slots: Vec<Option<Value>> = Vec::with_capacity(raw.bots.len());
    let mut skipped = Vec::new();

    for (index, record) in raw.bots.into_iter().enumerate() {
        match serde_json::from_value::<Bot>(record.clone()) {
            Ok(bot) => {
                bots.push(bot);
                slots.push(None);
            }
            Err(err) => {
                let id = record_id(&record, index);
                tracing::warn!(%id, %err, "undecodable bot passed through");
                skipped.push(id);
                slots.push(Some(record));
            }
        }
    }

    let live_players: Vec<PlayerView> = raw
        .live_players
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<PlayerView>(record) {
            Ok(player) => Some(player),
            Err(err) => {
                tracing::warn!(%err, "undecodable player dropped");
                None
            }
        })
        .collect();

    let reply = engine.tick(TickMessage {
        bots,
        live_players,
        now_ms: raw.now_ms,
    });
    skipped.extend(reply.skipped);

    let mut updated = reply.updated_bots.into_iter();
    let mut updated_bots = Vec::with_capacity(slots.len());
    for slot in slots {
        match slot {
            Some(record) => updated_bots.push(record),
            None => {
                if let Some(bot) = updated.next() {
                    updated_bots.push(serde_json::to_value(bot)?);
                }
            }
        }
    }

    Ok(WireTickReply {
        updated_bots,
        actions: reply.actions,
        skipped,
    })
}
