use log::debug;
use serde::{Deserialize, Serialize};

use crate::arena::Arena;
use crate::constants::*;
use crate::fighter::{Fighter, FighterStats};
use crate::prng::RandomSource;
use crate::types::Side;

// ── Power-ups ───────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PowerUpKind {
    MaxHealth,
    Damage,
    Speed,
    SpecialCooldown,
    DashCooldown,
    TeleportCooldown,
    FullHeal,
    CritChance,
    FireballDamage,
    StompDamage,
    UltChargeRate,
    AirDash,
    UltAura,
}

pub const CATALOG: [PowerUpKind; 13] = [
    PowerUpKind::MaxHealth,
    PowerUpKind::Damage,
    PowerUpKind::Speed,
    PowerUpKind::SpecialCooldown,
    PowerUpKind::DashCooldown,
    PowerUpKind::TeleportCooldown,
    PowerUpKind::FullHeal,
    PowerUpKind::CritChance,
    PowerUpKind::FireballDamage,
    PowerUpKind::StompDamage,
    PowerUpKind::UltChargeRate,
    PowerUpKind::AirDash,
    PowerUpKind::UltAura,
];

impl PowerUpKind {
    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::MaxHealth => "Health Boost",
            PowerUpKind::Damage => "Damage Up",
            PowerUpKind::Speed => "Speed Up",
            PowerUpKind::SpecialCooldown => "Special Cooldown",
            PowerUpKind::DashCooldown => "Dash Cooldown",
            PowerUpKind::TeleportCooldown => "Teleport Cooldown",
            PowerUpKind::FullHeal => "Full Heal",
            PowerUpKind::CritChance => "Critical Hit",
            PowerUpKind::FireballDamage => "Fireball Damage",
            PowerUpKind::StompDamage => "Stomp Damage",
            PowerUpKind::UltChargeRate => "Ultimate Charge",
            PowerUpKind::AirDash => "Air Dash",
            PowerUpKind::UltAura => "Ultimate Aura",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            PowerUpKind::MaxHealth => "+25 Max HP",
            PowerUpKind::Damage => "+2 Melee Damage",
            PowerUpKind::Speed => "+ Move Speed",
            PowerUpKind::SpecialCooldown => "Special Recharges Faster",
            PowerUpKind::DashCooldown => "Dash Recharges Faster",
            PowerUpKind::TeleportCooldown => "Teleport Recharges Faster",
            PowerUpKind::FullHeal => "Restores all HP (for next level)",
            PowerUpKind::CritChance => "+10% Crit Chance (2x Dmg)",
            PowerUpKind::FireballDamage => "+10 Fireball Damage",
            PowerUpKind::StompDamage => "+15 Air Attack Damage",
            PowerUpKind::UltChargeRate => "+5 Bonus Ult Charge on Hit",
            PowerUpKind::AirDash => "+1 Max Air Dash",
            PowerUpKind::UltAura => "+Dmg/Speed when Ult is full",
        }
    }

    /// Whether the opponent can be granted this on Hard.
    pub fn ai_eligible(self) -> bool {
        !matches!(
            self,
            PowerUpKind::FullHeal | PowerUpKind::UltAura | PowerUpKind::UltChargeRate
        )
    }
}

/// Lower a cooldown by `by`, but never below `floor`. A cooldown already under
/// the floor is left alone.
fn reduce_cooldown(cooldown: u32, by: u32, floor: u32) -> u32 {
    if cooldown <= floor {
        return cooldown;
    }
    cooldown.saturating_sub(by).max(floor)
}

// ── Player profile ──────────────────────────────────────────

/// Persistent player modifiers for one playthrough.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub stats: FighterStats,
    /// Ultimate charge carried into the next round.
    pub ult_charge: u32,
    pub full_heal_next_round: bool,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        PlayerProfile {
            stats: FighterStats::default(),
            ult_charge: 0,
            full_heal_next_round: false,
        }
    }
}

impl PlayerProfile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply a chosen power-up additively.
    pub fn apply(&mut self, kind: PowerUpKind, cooldown_floor: u32) {
        let s = &mut self.stats;
        match kind {
            PowerUpKind::MaxHealth => s.max_health += 25.0,
            PowerUpKind::Damage => s.damage += 2.0,
            PowerUpKind::Speed => s.speed += 0.5,
            PowerUpKind::SpecialCooldown => {
                s.max_special_cooldown = reduce_cooldown(s.max_special_cooldown, 30, cooldown_floor)
            }
            PowerUpKind::DashCooldown => {
                s.max_dash_cooldown = reduce_cooldown(s.max_dash_cooldown, 15, cooldown_floor)
            }
            PowerUpKind::TeleportCooldown => {
                s.max_teleport_cooldown = reduce_cooldown(s.max_teleport_cooldown, 20, cooldown_floor)
            }
            PowerUpKind::FullHeal => self.full_heal_next_round = true,
            PowerUpKind::CritChance => s.crit_chance = (s.crit_chance + 0.1).min(1.0),
            PowerUpKind::FireballDamage => s.fireball_damage += 10.0,
            PowerUpKind::StompDamage => s.stomp_damage += 15.0,
            PowerUpKind::UltChargeRate => s.ult_charge_bonus += 5,
            PowerUpKind::AirDash => s.max_air_dashes += 1,
            PowerUpKind::UltAura => s.has_ult_aura = true,
        }
    }

    /// Build the player's fighter for a new round. Always spawns at full
    /// health; a pending full heal is consumed.
    pub fn spawn_fighter(&mut self, arena: &Arena) -> Fighter {
        let mut fighter = Fighter::new(Side::Player, PLAYER_SPAWN_X, arena.ground_y, self.stats);
        fighter.ult_charge = self.ult_charge.min(self.stats.max_ult_charge);
        self.full_heal_next_round = false;
        fighter
    }
}

/// Sample `count` distinct power-ups from the catalog.
pub fn sample_offers(rng: &mut impl RandomSource, count: usize) -> Vec<PowerUpKind> {
    let mut pool = CATALOG.to_vec();
    let count = count.min(pool.len());
    for i in 0..count {
        let j = i + rng.index(pool.len() - i);
        pool.swap(i, j);
    }
    pool.truncate(count);
    pool
}

// ── Opponent ────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// Health, damage and speed scaling for the opponent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DifficultyScale {
    pub health: f64,
    pub damage: f64,
    pub speed: f64,
}

impl Difficulty {
    pub fn scale(self) -> DifficultyScale {
        match self {
            Difficulty::Easy => DifficultyScale {
                health: 0.75,
                damage: 0.8,
                speed: 0.9,
            },
            Difficulty::Medium => DifficultyScale {
                health: 1.0,
                damage: 1.0,
                speed: 1.0,
            },
            Difficulty::Hard => DifficultyScale {
                health: 1.3,
                damage: 1.25,
                speed: 1.15,
            },
        }
    }

    /// Case-insensitive lookup by name.
    pub fn from_name(name: &str) -> Option<Difficulty> {
        match name.to_ascii_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OpponentLevel {
    pub health: f64,
    pub speed_multiplier: f64,
    pub damage: f64,
}

const fn lvl(health: f64, speed_multiplier: f64, damage: f64) -> OpponentLevel {
    OpponentLevel {
        health,
        speed_multiplier,
        damage,
    }
}

/// Base opponent stats for levels 1..=10, in order.
pub const OPPONENT_LEVELS: [OpponentLevel; 10] = [
    lvl(100.0, 1.0, 5.0),
    lvl(120.0, 1.0, 7.0),
    lvl(140.0, 1.1, 9.0),
    lvl(160.0, 1.1, 11.0),
    lvl(200.0, 1.2, 13.0),
    lvl(220.0, 1.2, 15.0),
    lvl(250.0, 1.3, 16.0),
    lvl(280.0, 1.3, 17.0),
    lvl(320.0, 1.4, 18.0),
    lvl(400.0, 1.5, 20.0),
];

/// Table entry for `level`. Levels past the table use the last entry.
pub fn opponent_level(level: u32) -> OpponentLevel {
    debug_assert!(level >= 1, "levels are 1-based");
    let idx = (level.max(1) - 1) as usize;
    if idx >= OPPONENT_LEVELS.len() {
        debug!("level {} past opponent table, clamping to {}", level, OPPONENT_LEVELS.len());
    }
    OPPONENT_LEVELS[idx.min(OPPONENT_LEVELS.len() - 1)]
}

pub fn opponent_stats(level: u32, difficulty: Difficulty) -> FighterStats {
    let base = opponent_level(level);
    let scale = difficulty.scale();
    let damage = base.damage * scale.damage;
    FighterStats {
        max_health: base.health * scale.health,
        damage,
        speed: BASE_SPEED,
        speed_multiplier: base.speed_multiplier * scale.speed,
        stomp_damage: 10.0 * damage / 5.0,
        ..FighterStats::default()
    }
}

/// Hard mode grants the opponent a power-up at levels 4, 7 and 10.
pub fn opponent_power_up_due(level: u32, difficulty: Difficulty) -> bool {
    difficulty == Difficulty::Hard && level > 1 && (level - 1) % 3 == 0
}

pub fn roll_opponent_power_up(rng: &mut impl RandomSource) -> PowerUpKind {
    let eligible: Vec<PowerUpKind> = CATALOG.iter().copied().filter(|k| k.ai_eligible()).collect();
    eligible[rng.index(eligible.len())]
}

/// Apply a power-up to opponent stats. Speed scales the AI multiplier.
pub fn apply_to_opponent(stats: &mut FighterStats, kind: PowerUpKind, cooldown_floor: u32) {
    debug_assert!(kind.ai_eligible(), "{kind:?} is not an opponent power-up");
    match kind {
        PowerUpKind::MaxHealth => stats.max_health += 25.0,
        PowerUpKind::Damage => stats.damage += 2.0,
        PowerUpKind::Speed => stats.speed_multiplier += 0.1,
        PowerUpKind::SpecialCooldown => {
            stats.max_special_cooldown = reduce_cooldown(stats.max_special_cooldown, 30, cooldown_floor)
        }
        PowerUpKind::DashCooldown => {
            stats.max_dash_cooldown = reduce_cooldown(stats.max_dash_cooldown, 15, cooldown_floor)
        }
        PowerUpKind::TeleportCooldown => {
            stats.max_teleport_cooldown = reduce_cooldown(stats.max_teleport_cooldown, 20, cooldown_floor)
        }
        PowerUpKind::CritChance => stats.crit_chance = (stats.crit_chance + 0.1).min(1.0),
        PowerUpKind::FireballDamage => stats.fireball_damage += 10.0,
        PowerUpKind::StompDamage => stats.stomp_damage += 15.0,
        PowerUpKind::AirDash => stats.max_air_dashes += 1,
        PowerUpKind::FullHeal | PowerUpKind::UltChargeRate | PowerUpKind::UltAura => {}
    }
}
