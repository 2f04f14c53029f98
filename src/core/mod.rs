pub mod config;
pub mod error;
pub mod random;
pub mod types;

pub use config::{load_config, EngineConfig, TierRanges};
pub use error::{EngineError, Result};
pub use random::{FixedRandom, RandomSource, SeededRandom};
pub use types::{ClanId, EntityId, Millis, Rect, Vec2};
