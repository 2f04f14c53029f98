//! Actions emitted to the host

pub mod catalog;

pub use catalog::{Action, ProjectileSpec, MEGA_SHOT_DAMAGE_MULTIPLIER, MEGA_SHOT_SPREAD};
