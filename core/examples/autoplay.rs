//! Headless playthrough with a scripted player, for balance checks.
//!
//! Usage:
//!   cargo run -p stickfight-core --example autoplay -- [seed] [easy|medium|hard] > summary.json

use serde::Serialize;
use stickfight_core::*;

/// Hard cap so a stalemate loop can't run forever.
const MAX_TICKS: u32 = 200_000;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LevelResult {
    level: u32,
    ticks: u32,
    player_health: f64,
    opponent_health: f64,
    power_up: Option<PowerUpKind>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Summary {
    seed: Seed,
    difficulty: Difficulty,
    result: Phase,
    total_ticks: u32,
    levels: Vec<LevelResult>,
}

/// Walk in, punch up close, throw fireballs from range, ult when charged.
fn scripted_input(round: &RoundState) -> InputFrame {
    let me = &round.player;
    let foe = &round.opponent;
    let dx = foe.x - me.x;
    let dist = dx.abs();
    let toward = if dx >= 0.0 { button::RIGHT } else { button::LEFT };

    let mut buttons = 0;
    if me.ult_ready() {
        buttons |= button::ULTIMATE;
    } else if dist < 70.0 {
        buttons |= if round.tick % 3 == 0 { button::KICK } else { button::PUNCH };
    } else if dist < 600.0 && me.timers.special_cooldown == 0 {
        buttons |= toward | button::FIREBALL;
    } else {
        buttons |= toward;
        if dist > 500.0 && me.timers.dash_cooldown == 0 {
            buttons |= button::DASH;
        }
    }
    InputFrame::new(buttons)
}

fn main() {
    let mut args = std::env::args().skip(1);
    let seed: Seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(42);
    let difficulty = args
        .next()
        .and_then(|d| Difficulty::from_name(&d))
        .unwrap_or(Difficulty::Medium);

    let mut game = Game::new(seed, difficulty);
    let mut levels = Vec::new();
    let mut round_ticks = 0;
    let mut total_ticks = 0;

    while !game.phase.is_terminal() && total_ticks < MAX_TICKS {
        total_ticks += 1;
        match game.phase {
            Phase::PowerUpSelect { .. } => {
                let (player_health, opponent_health) = game
                    .round
                    .as_ref()
                    .map_or((0.0, 0.0), |r| (r.player.health, r.opponent.health));
                let level = game.level;
                let power_up = game.select_power_up(0).ok();
                levels.push(LevelResult {
                    level,
                    ticks: round_ticks,
                    player_health,
                    opponent_health,
                    power_up,
                });
                round_ticks = 0;
            }
            Phase::Playing => {
                let input = game.round.as_ref().map_or(NULL_INPUT, scripted_input);
                round_ticks += 1;
                game.tick(&input);
            }
            _ => game.tick(&NULL_INPUT),
        }
    }

    if let Some(round) = &game.round {
        levels.push(LevelResult {
            level: game.level,
            ticks: round_ticks,
            player_health: round.player.health,
            opponent_health: round.opponent.health,
            power_up: None,
        });
    }

    eprintln!("=== Autoplay ({:?}, seed {}) ===", difficulty, seed);
    eprintln!("Result: {:?} at level {}", game.phase, game.level);
    eprintln!("Total ticks: {}", total_ticks);

    let summary = Summary {
        seed,
        difficulty,
        result: game.phase.clone(),
        total_ticks,
        levels,
    };
    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("failed to serialize summary: {}", e);
            std::process::exit(1);
        }
    }
}
