use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board size must be at least 1")]
    InvalidSize,
    #[error("Difficulty must be a probability between 0 and 1")]
    InvalidDifficulty,
    #[error("Game must be won to create a stat")]
    GameNotWon,
}

pub type Result<T> = core::result::Result<T, GameError>;
