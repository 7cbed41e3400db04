use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::constants::*;
use crate::error::GameError;
use crate::prng::{Prng, RandomSource};
use crate::progression::{sample_offers, Difficulty, PlayerProfile, PowerUpKind};
use crate::snapshot::Frame;
use crate::step::{step_mut, RoundOutcome, RoundState};
use crate::types::*;

/// Outer playthrough state.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Phase {
    RoundSetup,
    Playing,
    /// Round decided; let the defeat animation play out.
    RoundEndPending { remaining: u32, outcome: RoundOutcome },
    PowerUpSelect { offers: Vec<PowerUpKind> },
    Victory,
    Defeat,
    Draw,
}

impl Phase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Victory | Phase::Defeat | Phase::Draw)
    }
}

/// One playthrough: level progression, the persistent profile, and the
/// current round.
pub struct Game<R: RandomSource = Prng> {
    pub config: GameConfig,
    pub difficulty: Difficulty,
    pub level: u32,
    pub profile: PlayerProfile,
    pub phase: Phase,
    pub round: Option<RoundState>,
    rng: R,
}

impl Game<Prng> {
    pub fn new(seed: Seed, difficulty: Difficulty) -> Self {
        Game::with_config(GameConfig::default(), difficulty, Prng::new(seed))
    }
}

impl<R: RandomSource> Game<R> {
    pub fn with_config(config: GameConfig, difficulty: Difficulty, rng: R) -> Self {
        Game {
            config,
            difficulty,
            level: 1,
            profile: PlayerProfile::new(),
            phase: Phase::RoundSetup,
            round: None,
            rng,
        }
    }

    /// Advance the playthrough by one tick.
    pub fn tick(&mut self, input: &InputFrame) {
        match self.phase.clone() {
            Phase::RoundSetup => {
                self.round = Some(RoundState::new(
                    self.level,
                    &mut self.profile,
                    self.difficulty,
                    &self.config,
                    &mut self.rng,
                ));
                self.phase = Phase::Playing;
            }
            Phase::Playing => {
                let Some(round) = self.round.as_mut() else {
                    self.phase = Phase::RoundSetup;
                    return;
                };
                if let Some(outcome) = step_mut(round, input, &self.config, &mut self.rng, true) {
                    let knocked_out = !round.player.is_alive() || !round.opponent.is_alive();
                    let remaining = if knocked_out {
                        self.config.ko_delay_ticks
                    } else {
                        self.config.timeout_delay_ticks
                    };
                    self.phase = Phase::RoundEndPending { remaining, outcome };
                }
            }
            Phase::RoundEndPending { remaining, outcome } => {
                if let Some(round) = self.round.as_mut() {
                    step_mut(round, input, &self.config, &mut self.rng, false);
                }
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    self.finish_round(outcome);
                } else {
                    self.phase = Phase::RoundEndPending { remaining, outcome };
                }
            }
            Phase::PowerUpSelect { .. } => {
                if let Some(choice) = input.selection {
                    self.select_power_up(choice as usize).ok();
                }
            }
            Phase::Victory | Phase::Defeat | Phase::Draw => {}
        }
    }

    fn finish_round(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::Win => {
                if let Some(round) = &self.round {
                    self.profile.ult_charge = round.player.ult_charge;
                }
                if self.level >= self.config.max_level {
                    info!("playthrough won at level {}", self.level);
                    self.phase = Phase::Victory;
                } else {
                    let offers = sample_offers(&mut self.rng, POWER_UP_OFFERS);
                    self.phase = Phase::PowerUpSelect { offers };
                }
            }
            RoundOutcome::Lose => {
                info!("playthrough lost at level {}", self.level);
                self.phase = Phase::Defeat;
            }
            RoundOutcome::Draw => {
                info!("playthrough drawn at level {}", self.level);
                self.phase = Phase::Draw;
            }
        }
    }

    /// Take one of the pending offers, apply it to the profile and queue
    /// the next level.
    pub fn select_power_up(&mut self, choice: usize) -> Result<PowerUpKind, GameError> {
        let Phase::PowerUpSelect { offers } = &self.phase else {
            warn!("power-up selection {} outside of selection phase", choice);
            return Err(GameError::NotSelecting);
        };
        let Some(&kind) = offers.get(choice) else {
            warn!("power-up selection {} out of {} offers", choice, offers.len());
            return Err(GameError::InvalidChoice {
                choice,
                offered: offers.len(),
            });
        };

        self.profile.apply(kind, self.config.cooldown_floor);
        info!("level {} cleared, took {:?}", self.level, kind);
        if let Some(round) = self.round.as_mut() {
            round.events.clear();
            round.events.push(TriggerEvent::PowerUpGranted {
                side: Side::Player,
                power_up: kind,
            });
        }
        self.level += 1;
        self.phase = Phase::RoundSetup;
        Ok(kind)
    }

    pub fn frame(&self) -> Frame {
        Frame::capture(&self.phase, self.level, self.round.as_ref())
    }
}
