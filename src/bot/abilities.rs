//! Ability state carried by elite and boss bots

use serde::{Deserialize, Serialize};

use crate::core::types::Millis;

/// Ability slot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Skill {
    /// Reserved primary slot; bots never trigger it but it still cools down
    Q,
    /// Shield
    E,
    /// Turbo boost
    R,
    /// Mega-shot (boss only)
    T,
}

impl Skill {
    pub const ALL: [Skill; 4] = [Skill::Q, Skill::E, Skill::R, Skill::T];
}

/// One millisecond value per skill slot
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillSet {
    #[serde(rename = "Q", default)]
    pub q: Millis,
    #[serde(rename = "E", default)]
    pub e: Millis,
    #[serde(rename = "R", default)]
    pub r: Millis,
    #[serde(rename = "T", default)]
    pub t: Millis,
}

impl SkillSet {
    pub fn new(q: Millis, e: Millis, r: Millis, t: Millis) -> Self {
        Self { q, e, r, t }
    }

    pub fn get(&self, skill: Skill) -> Millis {
        match skill {
            Skill::Q => self.q,
            Skill::E => self.e,
            Skill::R => self.r,
            Skill::T => self.t,
        }
    }

    pub fn get_mut(&mut self, skill: Skill) -> &mut Millis {
        match skill {
            Skill::Q => &mut self.q,
            Skill::E => &mut self.e,
            Skill::R => &mut self.r,
            Skill::T => &mut self.t,
        }
    }
}

/// Standard maximum cooldowns (milliseconds)
pub const STANDARD_COOLDOWNS: SkillSet = SkillSet {
    q: 3000.0,
    e: 15000.0,
    r: 12000.0,
    t: 20000.0,
};

/// Cooldowns, shield and turbo state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbilityBlock {
    /// Remaining cooldown per skill; may go negative, only `<= 0` is checked
    #[serde(default)]
    pub skills: SkillSet,
    /// Configured maximum per skill
    pub skill_cooldowns: SkillSet,
    #[serde(default)]
    pub shield_active: bool,
    #[serde(default)]
    pub shield_end_time: Millis,
    #[serde(default)]
    pub turbo_boost_active: bool,
    #[serde(default)]
    pub turbo_boost_end_time: Millis,
    /// Speed before the current boost, restored verbatim on expiry
    #[serde(default)]
    pub original_speed: Option<f64>,
}

impl AbilityBlock {
    /// All skills ready, with the given maximum cooldowns
    pub fn new(skill_cooldowns: SkillSet) -> Self {
        Self {
            skills: SkillSet::default(),
            skill_cooldowns,
            shield_active: false,
            shield_end_time: 0.0,
            turbo_boost_active: false,
            turbo_boost_end_time: 0.0,
            original_speed: None,
        }
    }

    pub fn standard() -> Self {
        Self::new(STANDARD_COOLDOWNS)
    }

    /// Decrement every cooldown by one tick; no floor is applied
    pub fn decay(&mut self, tick_ms: Millis) {
        for skill in Skill::ALL {
            *self.skills.get_mut(skill) -= tick_ms;
        }
    }

    pub fn is_ready(&self, skill: Skill) -> bool {
        self.skills.get(skill) <= 0.0
    }

    /// Put a skill back on its full cooldown
    pub fn reset(&mut self, skill: Skill) {
        *self.skills.get_mut(skill) = self.skill_cooldowns.get(skill);
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), &'static str> {
        for skill in Skill::ALL {
            if !self.skills.get(skill).is_finite() || !self.skill_cooldowns.get(skill).is_finite() {
                return Err("non-finite cooldown");
            }
        }
        if self.turbo_boost_active && self.original_speed.is_none() {
            return Err("turbo active without original speed");
        }
        Ok(())
    }
}
