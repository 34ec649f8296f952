//! Boardgames: a turn-based engine for three pencil-and-paper games.
//!
//! - Numerical Tic-Tac-Toe: odd against even numbers, lines must hit the
//!   magic sum.
//! - Notakto: misère tic-tac-toe on several boards with a shared mark.
//! - Gomoku: five in a row.
//!
//! Games are played human-vs-human or human-vs-computer, with undo/redo
//! backed by serialized snapshots and JSON save files.
//!
//! ## Modules
//!
//! - [`constants`] - Board sizes, limits and save-file tokens
//! - [`board`] - The NxN grid, line geometry and run counting
//! - [`player`] - Seats, players and human/computer controllers
//! - [`variant`] - The rule-set trait the turn controller is generic over
//! - [`numeric`], [`notakto`], [`gomoku`] - The three rule engines
//! - [`game`] - Turn controller and game state
//! - [`history`] - Snapshot-based undo/redo
//! - [`setup`] - Typed game configuration and the constructor table
//! - [`persistence`] - Save names, storage adapters, save/load
//! - [`shell`] - Interactive text menu
//!
//! ## Example
//!
//! ```
//! use boardgames::game::Phase;
//! use boardgames::gomoku::GomokuMove;
//! use boardgames::setup::{AnyGame, GameSetup, Mode};
//! use boardgames::variant::GameKind;
//!
//! let setup = GameSetup::new(GameKind::Gomoku, 9, Mode::HumanVsHuman);
//! let AnyGame::Gomoku(mut game) = setup.start()? else {
//!     unreachable!()
//! };
//! game.play(GomokuMove::new(4, 4))?;
//! assert!(matches!(game.phase(), Phase::AwaitingMove(_)));
//! # Ok::<(), boardgames::GameError>(())
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod gomoku;
pub mod history;
pub mod notakto;
pub mod numeric;
pub mod persistence;
pub mod player;
pub mod setup;
pub mod shell;
pub mod variant;

pub use error::{GameError, InvalidMove, Result};
