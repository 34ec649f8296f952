//! Gomoku: five in a row on an NxN board.
//!
//! Player 1 plays `X`, player 2 plays `O`. A stone wins when it completes a
//! contiguous run of five or more along any axis; a full board without one
//! is a tie.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Grid, Point, longest_run};
use crate::constants::{GOMOKU_STONE_O, GOMOKU_STONE_X, GOMOKU_WIN_LENGTH};
use crate::error::InvalidMove;
use crate::game::GameState;
use crate::player::Seat;
use crate::setup::GameSetup;
use crate::variant::{GameKind, ParseMoveError, Variant, Verdict, parse_fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gomoku;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GomokuMove {
    pub row: usize,
    pub col: usize,
}

impl GomokuMove {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    fn point(self) -> Point {
        (self.row, self.col)
    }
}

impl FromStr for GomokuMove {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [row, col] = parse_fields::<2>(s, Gomoku::MOVE_SYNTAX)?;
        Ok(GomokuMove { row, col })
    }
}

impl fmt::Display for GomokuMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A player's stone colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stone {
    X,
    O,
}

impl Stone {
    /// Cell value stored on the board.
    pub fn value(self) -> u32 {
        match self {
            Stone::X => GOMOKU_STONE_X,
            Stone::O => GOMOKU_STONE_O,
        }
    }

    pub fn from_value(value: u32) -> Option<Stone> {
        match value {
            GOMOKU_STONE_X => Some(Stone::X),
            GOMOKU_STONE_O => Some(Stone::O),
            _ => None,
        }
    }

    pub fn other(self) -> Stone {
        match self {
            Stone::X => Stone::O,
            Stone::O => Stone::X,
        }
    }
}

impl fmt::Display for Stone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stone::X => f.write_str("X"),
            Stone::O => f.write_str("O"),
        }
    }
}

/// Gomoku board; cells hold stone values and render as `X`/`O`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GomokuBoard(Board);

impl GomokuBoard {
    pub fn new(size: usize) -> Self {
        Self(Board::new(size))
    }
}

impl fmt::Display for GomokuBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.0.render_with(|_, value| {
            value
                .and_then(Stone::from_value)
                .map(|stone| stone.to_string())
                .unwrap_or_else(|| ".".to_string())
        });
        f.write_str(&text)
    }
}

/// True if `stone` at `point` sits in a run of at least the win length.
pub fn completes_five<G: Grid>(grid: &G, point: Point, stone: Stone) -> bool {
    longest_run(grid, point, stone.value()) >= GOMOKU_WIN_LENGTH
}

/// First empty cell, row-major, where `stone` would complete five.
fn winning_cell(board: &Board, stone: Stone) -> Option<Point> {
    board
        .empty_cells()
        .find(|&(row, col)| completes_five(&board.with(row, col, stone.value()), (row, col), stone))
}

/// Empty cell giving `stone` its longest run; the first one wins ties.
fn best_extension(board: &Board, stone: Stone) -> Option<Point> {
    let mut best = None;
    let mut best_len = 0;
    for (row, col) in board.empty_cells() {
        let len = longest_run(&board.with(row, col, stone.value()), (row, col), stone.value());
        if len > best_len {
            best_len = len;
            best = Some((row, col));
        }
    }
    best
}

impl Variant for Gomoku {
    const KIND: GameKind = GameKind::Gomoku;
    const MOVE_SYNTAX: &'static str = "row col (e.g. 7 7)";

    type Position = GomokuBoard;
    type Resource = Stone;
    type Move = GomokuMove;

    fn initial_state(setup: &GameSetup) -> GameState<Self> {
        GameState::new(
            GomokuBoard::new(setup.size),
            setup.players(Stone::X, Stone::O),
            setup.mode.vs_computer(),
        )
    }

    fn board_size(position: &GomokuBoard) -> usize {
        position.0.size()
    }

    fn check(state: &GameState<Self>, mv: &GomokuMove) -> Result<(), InvalidMove> {
        let board = &state.position.0;
        if !board.in_bounds(mv.row, mv.col) {
            return Err(InvalidMove::OutOfBounds {
                row: mv.row,
                col: mv.col,
            });
        }
        if !board.is_valid_move(mv.row, mv.col) {
            return Err(InvalidMove::Occupied {
                row: mv.row,
                col: mv.col,
            });
        }
        Ok(())
    }

    fn apply(state: &mut GameState<Self>, mv: &GomokuMove) {
        let stone = state.current_player().resource;
        state.position.0.place(mv.row, mv.col, stone.value());
    }

    fn verdict(state: &GameState<Self>, mover: Seat, mv: &GomokuMove) -> Option<Verdict> {
        let board = &state.position.0;
        let stone = state.player(mover).resource;
        if completes_five(board, mv.point(), stone) {
            Some(Verdict::Win(mover))
        } else if board.is_full() {
            Some(Verdict::Tie)
        } else {
            None
        }
    }

    fn legal_moves(state: &GameState<Self>) -> Vec<GomokuMove> {
        state
            .position
            .0
            .empty_cells()
            .map(|(row, col)| GomokuMove { row, col })
            .collect()
    }

    /// Win if possible, else block the opponent's win, else extend the
    /// longest own run.
    fn tactical_move(state: &GameState<Self>) -> Option<GomokuMove> {
        let board = &state.position.0;
        let own = state.current_player().resource;
        winning_cell(board, own)
            .or_else(|| winning_cell(board, own.other()))
            .or_else(|| best_extension(board, own))
            .map(|(row, col)| GomokuMove { row, col })
    }

    fn describe_resource(stone: &Stone) -> Option<String> {
        Some(format!("plays {stone}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GameError;
    use crate::game::{Game, Phase};
    use crate::player::Heuristic;
    use crate::setup::Mode;

    fn new_game(size: usize, mode: Mode) -> Game<Gomoku> {
        let setup = GameSetup::new(GameKind::Gomoku, size, mode);
        Game::new(Gomoku::initial_state(&setup)).unwrap()
    }

    fn board_with(size: usize, stones: &[(usize, usize, Stone)]) -> Board {
        let mut board = Board::new(size);
        for &(r, c, stone) in stones {
            board.place(r, c, stone.value());
        }
        board
    }

    #[test]
    fn test_parse_move() {
        assert_eq!("7 7".parse::<GomokuMove>(), Ok(GomokuMove::new(7, 7)));
        assert!("7".parse::<GomokuMove>().is_err());
        assert!("7 7 7".parse::<GomokuMove>().is_err());
    }

    #[test]
    fn test_five_in_a_row_wins() {
        let mut game = new_game(9, Mode::HumanVsHuman);
        for col in 0..4 {
            game.play(GomokuMove::new(0, col)).unwrap();
            game.play(GomokuMove::new(8, col)).unwrap();
        }
        assert_eq!(game.phase(), Phase::AwaitingMove(Seat::One));
        let plies = game.play(GomokuMove::new(0, 4)).unwrap();
        assert_eq!(plies[0].verdict, Some(Verdict::Win(Seat::One)));
        assert!(matches!(
            game.play(GomokuMove::new(5, 5)).unwrap_err(),
            GameError::GameOver
        ));
    }

    #[test]
    fn test_four_is_not_enough() {
        let board = board_with(9, &[(2, 2, Stone::O), (3, 3, Stone::O), (4, 4, Stone::O), (5, 5, Stone::O)]);
        assert!(!completes_five(&board, (5, 5), Stone::O));
        assert!(completes_five(&board.with(6, 6, Stone::O.value()), (6, 6), Stone::O));
    }

    #[test]
    fn test_overline_wins() {
        let mut stones: Vec<_> = (0..3).map(|r| (r, 4, Stone::X)).collect();
        stones.extend((4..7).map(|r| (r, 4, Stone::X)));
        let board = board_with(9, &stones);
        let filled = board.with(3, 4, Stone::X.value());
        assert_eq!(longest_run(&filled, (3, 4), Stone::X.value()), 7);
        assert!(completes_five(&filled, (3, 4), Stone::X));
    }

    #[test]
    fn test_anti_diagonal_win() {
        let stones: Vec<_> = (0..4).map(|i| (i, 4 - i, Stone::X)).collect();
        let board = board_with(5, &stones);
        assert!(completes_five(&board.with(4, 0, Stone::X.value()), (4, 0), Stone::X));
    }

    #[test]
    fn test_occupied_cell_rejected() {
        let mut game = new_game(5, Mode::HumanVsHuman);
        game.play(GomokuMove::new(2, 2)).unwrap();
        let err = game.play(GomokuMove::new(2, 2)).unwrap_err();
        assert!(matches!(err, GameError::InvalidMove(InvalidMove::Occupied { row: 2, col: 2 })));
        let err = game.play(GomokuMove::new(5, 0)).unwrap_err();
        assert!(matches!(err, GameError::InvalidMove(InvalidMove::OutOfBounds { .. })));
        assert_eq!(game.phase(), Phase::AwaitingMove(Seat::Two));
    }

    #[test]
    fn test_computer_wins_before_blocking() {
        let mut state = new_game(9, Mode::HumanVsComputer(Heuristic::Tactical)).state().clone();
        state.turn = Seat::Two;
        for col in 0..4 {
            state.position.0.place(0, col, Stone::X.value());
            state.position.0.place(4, col + 1, Stone::O.value());
        }
        let mv = Gomoku::tactical_move(&state).unwrap();
        assert_eq!(mv, GomokuMove::new(4, 0), "first winning cell in row-major order");
    }

    #[test]
    fn test_computer_blocks_open_four() {
        let mut state = new_game(9, Mode::HumanVsComputer(Heuristic::Tactical)).state().clone();
        state.turn = Seat::Two;
        for row in 1..5 {
            state.position.0.place(row, 3, Stone::X.value());
        }
        state.position.0.place(0, 3, Stone::O.value());
        let mv = Gomoku::tactical_move(&state).unwrap();
        assert_eq!(mv, GomokuMove::new(5, 3));
    }

    #[test]
    fn test_computer_extends_longest_run() {
        let mut state = new_game(9, Mode::HumanVsComputer(Heuristic::Tactical)).state().clone();
        state.turn = Seat::Two;
        state.position.0.place(4, 4, Stone::O.value());
        state.position.0.place(4, 5, Stone::O.value());
        state.position.0.place(0, 0, Stone::X.value());
        let mv = Gomoku::tactical_move(&state).unwrap();
        assert_eq!(mv, GomokuMove::new(4, 3), "first cell reaching a run of three");
    }

    #[test]
    fn test_computer_replies_and_board_renders_stones() {
        let mut game = new_game(5, Mode::HumanVsComputer(Heuristic::Tactical));
        let plies = game.play(GomokuMove::new(2, 2)).unwrap();
        assert_eq!(plies.len(), 2);
        let text = game.state().position.to_string();
        assert!(text.contains('X'));
        assert!(text.contains('O'));
        assert_eq!(text.matches('.').count(), 23);
    }
}
