//! Error types for the game's fallible edges (config, terminal I/O).

use thiserror::Error;

/// Everything that can go wrong outside the pure game logic.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config parse error: {0}")]
    ConfigParse(String),

    #[error("Config serialization error: {0}")]
    ConfigSerialize(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Terminal too small: {width}x{height}, need at least {min_width}x{min_height}")]
    TerminalTooSmall {
        width: u16,
        height: u16,
        min_width: u16,
        min_height: u16,
    },
}

pub type Result<T> = std::result::Result<T, GameError>;

impl From<toml::de::Error> for GameError {
    fn from(err: toml::de::Error) -> Self {
        GameError::ConfigParse(err.to_string())
    }
}

impl From<toml::ser::Error> for GameError {
    fn from(err: toml::ser::Error) -> Self {
        GameError::ConfigSerialize(err.to_string())
    }
}
