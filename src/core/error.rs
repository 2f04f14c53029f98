use thiserror::Error;

use crate::core::types::EntityId;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Malformed bot record {id}: {reason}")]
    MalformedBot { id: EntityId, reason: String },

    #[error("Malformed player record {id}: {reason}")]
    MalformedPlayer { id: EntityId, reason: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("Engine command channel closed")]
    CommandChannelClosed,

    #[error("Engine reply channel closed: {0}")]
    ReplyChannelClosed(#[from] tokio::sync::oneshot::error::RecvError),

    #[error("Engine worker terminated: {0}")]
    WorkerGone(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
