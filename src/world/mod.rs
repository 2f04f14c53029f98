//! World geometry and per-tick snapshots consumed by the tactical policies

pub mod obstacles;
pub mod snapshot;
pub mod zones;

pub use obstacles::{Obstacle, ObstacleKind};
pub use snapshot::{ClanInfo, PlayerView, WorldGeometry, WorldSnapshot};
pub use zones::{CentralZone, SafeZone};
