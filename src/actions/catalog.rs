//! Action definitions emitted by the engine

use serde::{Deserialize, Serialize};

use crate::core::types::EntityId;

/// Angular offset of the outer mega-shot projectiles (radians)
pub const MEGA_SHOT_SPREAD: f64 = 0.3;

/// Damage multiplier for each mega-shot projectile
pub const MEGA_SHOT_DAMAGE_MULTIPLIER: f64 = 2.0;

/// Something the host must apply to its authoritative simulation
///
/// Shield and turbo activations are not actions; the host reads them from
/// the returned bot state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Action {
    /// A single projectile fired along `angle`
    #[serde(rename_all = "camelCase")]
    Shoot { bot_id: EntityId, angle: f64 },
    /// Boss mega-shot, expanded into three projectiles by the host
    #[serde(rename_all = "camelCase")]
    MegaShot { bot_id: EntityId },
}

/// Projectile the host should spawn for an action
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSpec {
    pub angle: f64,
    pub damage: f64,
}

impl Action {
    pub fn bot_id(&self) -> &EntityId {
        match self {
            Action::Shoot { bot_id, .. } | Action::MegaShot { bot_id } => bot_id,
        }
    }

    /// Standard projectile expansion
    ///
    /// `Shoot` carries its own heading and ignores `facing`; `MegaShot`
    /// fans three double-damage projectiles around `facing`.
    pub fn projectiles(&self, base_damage: f64, facing: f64) -> Vec<ProjectileSpec> {
        match self {
            Action::Shoot { angle, .. } => vec![ProjectileSpec {
                angle: *angle,
                damage: base_damage,
            }],
            Action::MegaShot { .. } => [-MEGA_SHOT_SPREAD, 0.0, MEGA_SHOT_SPREAD]
                .into_iter()
                .map(|offset| ProjectileSpec {
                    angle: facing + offset,
                    damage: base_damage * MEGA_SHOT_DAMAGE_MULTIPLIER,
                })
                .collect(),
        }
    }
}
