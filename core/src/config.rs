use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::error::ConfigError;

/// Probabilities and ranges for the opponent policy.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    // Projectile dodge
    pub projectile_dodge_chance: f64,
    pub projectile_dodge_range: f64,
    pub projectile_dodge_height: f64,
    pub dodge_jump_scale: f64,
    pub projectile_dodge_cooldown: u32,

    // Melee defense
    pub melee_threat_range: f64,
    pub block_chance: f64,
    pub retreat_chance: f64,
    /// Share of retreats that step back instead of dashing away.
    pub retreat_step_chance: f64,
    pub block_hold_ticks: u32,
    pub melee_dodge_cooldown: u32,

    // Platform chase
    pub platform_jump_chance: f64,
    pub platform_align_range: f64,

    // Aerial attacks
    pub air_attack_height: f64,
    pub air_attack_range: f64,
    pub air_kick_chance: f64,
    pub ground_pound_chance: f64,

    // Ranged and melee offense
    pub teleport_chance: f64,
    pub teleport_min_range: f64,
    pub fireball_min_range: f64,
    pub fireball_max_range: f64,
    pub melee_range: f64,
    pub punch_chance: f64,
    pub melee_cooldown: u32,
    pub hold_range: f64,
}

impl Default for AiTuning {
    fn default() -> Self {
        AiTuning {
            projectile_dodge_chance: 0.9,
            projectile_dodge_range: 300.0,
            projectile_dodge_height: 50.0,
            dodge_jump_scale: 0.8,
            projectile_dodge_cooldown: 60,
            melee_threat_range: 120.0,
            block_chance: 0.4,
            retreat_chance: 0.4,
            retreat_step_chance: 0.5,
            block_hold_ticks: 30,
            melee_dodge_cooldown: 40,
            platform_jump_chance: 0.05,
            platform_align_range: 50.0,
            air_attack_height: 50.0,
            air_attack_range: 100.0,
            air_kick_chance: 0.05,
            ground_pound_chance: 0.05,
            teleport_chance: 0.02,
            teleport_min_range: 400.0,
            fireball_min_range: 200.0,
            fireball_max_range: 500.0,
            melee_range: 80.0,
            punch_chance: 0.7,
            melee_cooldown: 50,
            hold_range: 400.0,
        }
    }
}

impl AiTuning {
    fn probabilities(&self) -> [(&'static str, f64); 9] {
        [
            ("projectile_dodge_chance", self.projectile_dodge_chance),
            ("block_chance", self.block_chance),
            ("retreat_chance", self.retreat_chance),
            ("retreat_step_chance", self.retreat_step_chance),
            ("platform_jump_chance", self.platform_jump_chance),
            ("air_kick_chance", self.air_kick_chance),
            ("ground_pound_chance", self.ground_pound_chance),
            ("teleport_chance", self.teleport_chance),
            ("punch_chance", self.punch_chance),
        ]
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, p) in self.probabilities() {
            if !(0.0..=1.0).contains(&p) {
                return Err(ConfigError::Invalid(format!("ai.{name} = {p} is not a probability")));
            }
        }
        if self.block_chance + self.retreat_chance > 1.0 {
            return Err(ConfigError::Invalid(
                "ai.block_chance + ai.retreat_chance exceeds 1".into(),
            ));
        }
        if self.air_kick_chance + self.ground_pound_chance > 1.0 {
            return Err(ConfigError::Invalid(
                "ai.air_kick_chance + ai.ground_pound_chance exceeds 1".into(),
            ));
        }
        if self.fireball_min_range > self.fireball_max_range {
            return Err(ConfigError::Invalid(
                "ai.fireball_min_range is above ai.fireball_max_range".into(),
            ));
        }
        Ok(())
    }
}

/// Round and progression tunables. Every field is optional in JSON.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub round_duration_ticks: u32,
    pub max_level: u32,
    /// Lowest value a cooldown power-up can bring a cooldown down to.
    pub cooldown_floor: u32,
    pub ko_delay_ticks: u32,
    pub timeout_delay_ticks: u32,
    pub ai: AiTuning,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            round_duration_ticks: ROUND_DURATION_TICKS,
            max_level: MAX_LEVEL,
            cooldown_floor: COOLDOWN_FLOOR,
            ko_delay_ticks: KO_DELAY_TICKS,
            timeout_delay_ticks: TIMEOUT_DELAY_TICKS,
            ai: AiTuning::default(),
        }
    }
}

impl GameConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.round_duration_ticks == 0 {
            return Err(ConfigError::Invalid("round_duration_ticks must be positive".into()));
        }
        if self.max_level == 0 {
            return Err(ConfigError::Invalid("max_level must be at least 1".into()));
        }
        if self.timeout_delay_ticks == 0 || self.ko_delay_ticks == 0 {
            return Err(ConfigError::Invalid("outcome delays must be positive".into()));
        }
        self.ai.validate()
    }
}
