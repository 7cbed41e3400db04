use thiserror::Error;

/// Rejected calls from the outer surface. The simulation itself never fails.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("power-up choice {choice} out of range (0..{offered})")]
    InvalidChoice { choice: usize, offered: usize },
    #[error("no power-up selection is pending")]
    NotSelecting,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}
