pub mod ai;
pub mod arena;
pub mod combat;
pub mod config;
pub mod constants;
pub mod error;
pub mod fighter;
pub mod game;
pub mod physics;
pub mod prng;
pub mod progression;
pub mod projectiles;
pub mod snapshot;
pub mod step;
pub mod types;

pub use arena::Arena;
pub use config::{AiTuning, GameConfig};
pub use constants::*;
pub use error::{ConfigError, GameError};
pub use fighter::{ActionState, Fighter, FighterStats, Intent};
pub use game::{Game, Phase};
pub use prng::*;
pub use progression::{Difficulty, PlayerProfile, PowerUpKind};
pub use projectiles::Projectile;
pub use snapshot::{FighterView, Frame, PowerUpOffer};
pub use step::{step_mut, RoundOutcome, RoundState};
pub use types::*;
