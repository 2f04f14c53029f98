//! Tactical decision making for a single bot
//!
//! - `targeting`: who to engage
//! - `steering`: where to move
//! - `combat`: when to shoot and which ability to use
//! - `state_machine`: glues the three together for one tick

pub mod combat;
pub mod state_machine;
pub mod steering;
pub mod targeting;

pub use combat::{expire_effects, try_abilities, try_fire, ExpiredEffects};
pub use state_machine::{resolve_target, step_bot, update_target, Transition};
pub use steering::{chase_step, clamp_to_world, patrol_step, ChaseStep, SteeringOutcome};
pub use targeting::{is_valid_target, score_player, select_best_target, target_weight};
