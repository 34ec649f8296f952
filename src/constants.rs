//! Constants for board dimensions, game limits, and save-file naming.
//!
//! Every tunable number the rule engines and the shell agree on lives here,
//! so the setup validation and the menu prompts never drift apart.

// =============================================================================
// Numerical Tic-Tac-Toe
// =============================================================================

/// Smallest accepted Numerical Tic-Tac-Toe board (NxN).
pub const NUMERIC_MIN_SIZE: usize = 1;

/// Largest accepted Numerical Tic-Tac-Toe board (NxN).
pub const NUMERIC_MAX_SIZE: usize = 10;

/// Board size suggested by the setup prompt.
pub const NUMERIC_DEFAULT_SIZE: usize = 3;

// =============================================================================
// Notakto
// =============================================================================

/// Notakto always plays on 3x3 boards.
pub const NOTAKTO_BOARD_SIZE: usize = 3;

/// Fewest boards a Notakto game may use.
pub const NOTAKTO_MIN_BOARDS: usize = 1;

/// Most boards a Notakto game may use.
pub const NOTAKTO_MAX_BOARDS: usize = 5;

/// Board count suggested by the setup prompt.
pub const NOTAKTO_DEFAULT_BOARDS: usize = 3;

/// The single mark both Notakto players place.
pub const NOTAKTO_MARK: u32 = 1;

// =============================================================================
// Gomoku
// =============================================================================

/// Smallest accepted Gomoku board (NxN).
pub const GOMOKU_MIN_SIZE: usize = 5;

/// Largest accepted Gomoku board (NxN).
pub const GOMOKU_MAX_SIZE: usize = 15;

/// Board size suggested by the setup prompt.
pub const GOMOKU_DEFAULT_SIZE: usize = 15;

/// Contiguous stones needed to win. Overlines count.
pub const GOMOKU_WIN_LENGTH: usize = 5;

/// Cell value of player 1's stones.
pub const GOMOKU_STONE_X: u32 = 1;

/// Cell value of player 2's stones.
pub const GOMOKU_STONE_O: u32 = 2;

/// The four axes through a cell: horizontal, vertical, and both diagonals.
pub const AXES: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

// =============================================================================
// Players
// =============================================================================

pub const PLAYER_ONE_NAME: &str = "Player 1";
pub const PLAYER_TWO_NAME: &str = "Player 2";
pub const COMPUTER_NAME: &str = "Computer";

// =============================================================================
// Save Files
// =============================================================================

/// Extension of every save file.
pub const SAVE_EXTENSION: &str = "json";

/// Mode token for human-vs-computer saves.
pub const MODE_HUMAN_VS_COMPUTER: &str = "HumanVsComputer";

/// Mode token for human-vs-human saves.
pub const MODE_HUMAN_VS_HUMAN: &str = "HumanVsHuman";

/// File name endings that belong to build tooling, never to saves.
pub const METADATA_SUFFIXES: [&str; 2] = [".runtimeconfig.json", ".deps.json"];

/// Prefix of the program's own JSON files, skipped by the save listing.
pub const METADATA_PREFIX: &str = "boardgames";
