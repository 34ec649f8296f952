//! Error types for the board games engine.

use std::fmt;

use thiserror::Error;

/// Why a move was refused by a rule engine.
///
/// These are recoverable: the caller reports them and asks again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidMove {
    /// Row or column lies outside the board.
    OutOfBounds { row: usize, col: usize },
    /// The cell already holds a mark.
    Occupied { row: usize, col: usize },
    /// The number is not (or no longer) in the mover's pool.
    NumberUnavailable { number: u32 },
    /// Notakto board index does not exist.
    NoSuchBoard { board: usize },
    /// Notakto board is dead and accepts no more marks.
    DeadBoard { board: usize },
}

impl fmt::Display for InvalidMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidMove::OutOfBounds { row, col } => {
                write!(f, "cell ({row}, {col}) is out of bounds")
            }
            InvalidMove::Occupied { row, col } => write!(f, "cell ({row}, {col}) is already taken"),
            InvalidMove::NumberUnavailable { number } => {
                write!(f, "number {number} is not available to you")
            }
            InvalidMove::NoSuchBoard { board } => write!(f, "there is no board {board}"),
            InvalidMove::DeadBoard { board } => write!(f, "board {board} is no longer playable"),
        }
    }
}

/// Main error type for the engine, the persistence gateway and the shell.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GameError {
    #[error("invalid move: {0}")]
    InvalidMove(InvalidMove),

    #[error("game already over")]
    GameOver,

    #[error("no valid moves available for {player}")]
    NoMovesAvailable { player: String },

    #[error("invalid setup: {message}")]
    InvalidSetup { message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("save name '{name}' does not follow {expected}")]
    MalformedSaveName { name: String, expected: String },

    #[error("unrecognized game type '{token}'")]
    UnknownGameType { token: String },

    #[error("corrupt save '{name}': {reason}")]
    CorruptSave { name: String, reason: String },
}

impl GameError {
    /// True for failures of the persistence gateway (load/save), which send
    /// the user back to the menu rather than re-prompting for a move.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            GameError::Io { .. }
                | GameError::Serialization(_)
                | GameError::MalformedSaveName { .. }
                | GameError::UnknownGameType { .. }
                | GameError::CorruptSave { .. }
        )
    }
}

impl From<InvalidMove> for GameError {
    fn from(reason: InvalidMove) -> Self {
        GameError::InvalidMove(reason)
    }
}

/// Convenience type alias for Results using the crate's error type.
pub type Result<T> = std::result::Result<T, GameError>;
