use log::info;
use serde::{Deserialize, Serialize};

use crate::ai;
use crate::arena::{self, Arena};
use crate::combat;
use crate::config::GameConfig;
use crate::constants::*;
use crate::fighter::{Fighter, Intent, Target};
use crate::prng::RandomSource;
use crate::progression::{self, Difficulty, PlayerProfile};
use crate::projectiles::{advance_projectiles, spawn_projectile, Projectile};
use crate::types::*;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundOutcome {
    Win,
    Lose,
    Draw,
}

/// Everything owned by one round: arena, both fighters and live projectiles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoundState {
    pub level: u32,
    pub difficulty: Difficulty,
    pub arena: Arena,
    pub player: Fighter,
    pub opponent: Fighter,
    pub projectiles: Vec<Projectile>,
    pub next_projectile_id: u32,
    pub tick: Tick,
    pub ticks_remaining: u32,
    /// Trigger events emitted during the most recent tick.
    pub events: Vec<TriggerEvent>,
}

impl RoundState {
    /// Round setup: build the arena, spawn the player from the profile and
    /// the opponent from the level table, and roll a Hard-mode opponent
    /// power-up when one is due.
    pub fn new(
        level: u32,
        profile: &mut PlayerProfile,
        difficulty: Difficulty,
        config: &GameConfig,
        rng: &mut impl RandomSource,
    ) -> Self {
        let arena = arena::build(level);
        let mut events = Vec::new();
        let player = profile.spawn_fighter(&arena);

        let mut stats = progression::opponent_stats(level, difficulty);
        if progression::opponent_power_up_due(level, difficulty) {
            let power_up = progression::roll_opponent_power_up(rng);
            progression::apply_to_opponent(&mut stats, power_up, config.cooldown_floor);
            log::debug!("opponent granted {:?} at level {}", power_up, level);
            events.push(TriggerEvent::PowerUpGranted {
                side: Side::Opponent,
                power_up,
            });
        }
        let opponent = Fighter::new(Side::Opponent, OPPONENT_SPAWN_X, arena.ground_y, stats);

        info!(
            "round start: level {} ({:?}), opponent hp {:.0}",
            level, difficulty, opponent.stats.max_health
        );

        RoundState {
            level,
            difficulty,
            arena,
            player,
            opponent,
            projectiles: Vec::new(),
            next_projectile_id: 0,
            tick: 0,
            ticks_remaining: config.round_duration_ticks,
            events,
        }
    }

    /// KO first (player checked before opponent), then timeout on health.
    pub fn outcome(&self) -> Option<RoundOutcome> {
        if !self.player.is_alive() {
            Some(RoundOutcome::Lose)
        } else if !self.opponent.is_alive() {
            Some(RoundOutcome::Win)
        } else if self.ticks_remaining == 0 {
            Some(if self.player.health > self.opponent.health {
                RoundOutcome::Win
            } else if self.opponent.health > self.player.health {
                RoundOutcome::Lose
            } else {
                RoundOutcome::Draw
            })
        } else {
            None
        }
    }

    fn spawn_fireballs(&mut self) {
        for side in [Side::Player, Side::Opponent] {
            let fighter = match side {
                Side::Player => &self.player,
                Side::Opponent => &self.opponent,
            };
            if !fighter.releases_projectile() {
                continue;
            }
            let proj = spawn_projectile(
                fighter.projectile_origin(),
                fighter.facing,
                fighter.stats.fireball_damage,
                side,
                self.next_projectile_id,
            );
            self.next_projectile_id += 1;
            self.projectiles.push(proj);
        }
    }
}

/// Advance one round tick in place.
///
/// Sub-step order:
///  1. Resolve intents (human input, AI policy)
///  2. Player update
///  3. Opponent update
///  4. Projectile spawns
///  5. Move projectiles, drop off-screen ones
///  6. Combat resolution
///  7. Round timer + outcome check
///
/// When `live` is false (the round already ended and the outcome delay is
/// running) both sides stand idle, nothing spawns, combat is skipped and the
/// timer is frozen; fighters and projectiles still animate.
///
/// Returns the outcome on the tick it is first detected.
pub fn step_mut(
    round: &mut RoundState,
    input: &InputFrame,
    config: &GameConfig,
    rng: &mut impl RandomSource,
    live: bool,
) -> Option<RoundOutcome> {
    round.events.clear();
    round.tick += 1;

    // 1. Resolve intents
    let (player_intent, opponent_intent) = if live {
        (
            round.player.intent_from_input(input),
            ai::decide(
                &round.opponent,
                &round.player,
                &round.projectiles,
                &round.arena,
                &config.ai,
                rng,
            ),
        )
    } else {
        (Intent::idle(), Intent::idle())
    };
    let opponent_target = Target::from(&round.opponent);
    round
        .player
        .apply_intent(&player_intent, &opponent_target, &round.arena, &mut round.events);
    let player_target = Target::from(&round.player);
    round
        .opponent
        .apply_intent(&opponent_intent, &player_target, &round.arena, &mut round.events);

    // 2–3. Fighter updates
    round.player.update(&round.arena, &mut round.events);
    round.opponent.update(&round.arena, &mut round.events);

    // 4. Projectile spawns
    if live {
        round.spawn_fireballs();
    }

    // 5. Projectile maintenance
    advance_projectiles(&mut round.projectiles, &round.arena);

    if !live {
        return None;
    }

    // 6. Combat
    combat::resolve(
        &mut round.player,
        &mut round.opponent,
        &mut round.projectiles,
        rng,
        &mut round.events,
    );

    // 7. Timer + outcome
    round.ticks_remaining = round.ticks_remaining.saturating_sub(1);
    let outcome = round.outcome();
    if let Some(outcome) = outcome {
        info!(
            "round {} over: {:?} (player {:.0} hp, opponent {:.0} hp, {} ticks left)",
            round.level, outcome, round.player.health, round.opponent.health, round.ticks_remaining
        );
    }
    outcome
}
