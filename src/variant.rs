//! The seam between the turn controller and the per-game rule engines.
//!
//! Each game is a zero-sized marker type implementing [`Variant`]. The turn
//! controller in [`crate::game`] is generic over it and never needs to know
//! which game it is running.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::InvalidMove;
use crate::game::GameState;
use crate::player::{Heuristic, Seat};
use crate::setup::GameSetup;

/// The three supported rule sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameKind {
    NumericTtt,
    Notakto,
    Gomoku,
}

impl GameKind {
    pub const ALL: [GameKind; 3] = [GameKind::NumericTtt, GameKind::Notakto, GameKind::Gomoku];

    /// Token used in save file names.
    pub fn suffix(self) -> &'static str {
        match self {
            GameKind::NumericTtt => "TicTacToe",
            GameKind::Notakto => "Notakto",
            GameKind::Gomoku => "Gomoku",
        }
    }

    pub fn from_suffix(token: &str) -> Option<GameKind> {
        GameKind::ALL.into_iter().find(|kind| kind.suffix() == token)
    }

    pub fn title(self) -> &'static str {
        match self {
            GameKind::NumericTtt => "Numerical Tic-Tac-Toe",
            GameKind::Notakto => "Notakto",
            GameKind::Gomoku => "Gomoku",
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Terminal result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Win(Seat),
    Tie,
}

/// A move string that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMoveError {
    pub expected: &'static str,
}

impl fmt::Display for ParseMoveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid format, use: {}", self.expected)
    }
}

impl std::error::Error for ParseMoveError {}

/// Parse exactly `N` whitespace-separated non-negative integers.
pub fn parse_fields<const N: usize>(
    input: &str,
    expected: &'static str,
) -> Result<[usize; N], ParseMoveError> {
    let err = || ParseMoveError { expected };
    let parts: Vec<&str> = input.split_whitespace().collect();
    if parts.len() != N {
        return Err(err());
    }
    let mut fields = [0usize; N];
    for (field, part) in fields.iter_mut().zip(parts) {
        *field = part.parse().map_err(|_| err())?;
    }
    Ok(fields)
}

/// A rule set: move legality, the mutation a move performs, terminal
/// detection, and the computer's move choice.
pub trait Variant: Copy + fmt::Debug + PartialEq + Sized + 'static {
    const KIND: GameKind;

    /// Board(s) of the game.
    type Position: Clone + fmt::Debug + PartialEq + fmt::Display + Serialize + DeserializeOwned;
    /// Per-player resource: number pool, stone, or nothing.
    type Resource: Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned;
    type Move: Copy + fmt::Debug + PartialEq + fmt::Display + FromStr<Err = ParseMoveError>;

    /// Input syntax shown to humans, e.g. `row col number`.
    const MOVE_SYNTAX: &'static str;

    /// Fresh state for a validated setup.
    fn initial_state(setup: &GameSetup) -> GameState<Self>;

    /// Side length of the board(s), used in save names.
    fn board_size(position: &Self::Position) -> usize;

    /// Whether the player on turn may play `mv`.
    fn check(state: &GameState<Self>, mv: &Self::Move) -> Result<(), InvalidMove>;

    /// Mutate the state for the player on turn. `check` has already passed.
    fn apply(state: &mut GameState<Self>, mv: &Self::Move);

    /// Terminal test, run strictly after `apply` and before the turn passes.
    fn verdict(state: &GameState<Self>, mover: Seat, mv: &Self::Move) -> Option<Verdict>;

    /// Every legal move for the player on turn.
    fn legal_moves(state: &GameState<Self>) -> Vec<Self::Move>;

    /// The game's one-ply heuristic for the player on turn.
    fn tactical_move(state: &GameState<Self>) -> Option<Self::Move>;

    /// Extra per-player line shown under the board (e.g. remaining numbers).
    fn describe_resource(_resource: &Self::Resource) -> Option<String> {
        None
    }
}

/// Move for a computer seat playing `heuristic`.
pub fn computer_move<V: Variant>(state: &GameState<V>, heuristic: Heuristic) -> Option<V::Move> {
    match heuristic {
        Heuristic::Tactical => V::tactical_move(state),
        Heuristic::Random => pick(&V::legal_moves(state)),
    }
}

/// Uniform choice from `candidates`.
pub fn pick<T: Copy>(candidates: &[T]) -> Option<T> {
    if candidates.is_empty() {
        return None;
    }
    Some(candidates[fastrand::usize(..candidates.len())])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_round_trip() {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_suffix(kind.suffix()), Some(kind));
        }
        assert_eq!(GameKind::from_suffix("Chess"), None);
    }

    #[test]
    fn test_parse_fields() {
        assert_eq!(parse_fields::<3>(" 1 0  5 ", "r c n"), Ok([1, 0, 5]));
        assert!(parse_fields::<3>("1 0", "r c n").is_err());
        assert!(parse_fields::<2>("1 -1", "r c").is_err());
        assert!(parse_fields::<2>("a b", "r c").is_err());
    }

    #[test]
    fn test_pick_from_candidates() {
        assert_eq!(pick::<u8>(&[]), None);
        let candidates = [3, 5, 7];
        for _ in 0..20 {
            let choice = pick(&candidates).unwrap();
            assert!(candidates.contains(&choice));
        }
    }
}
