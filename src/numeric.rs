//! Numerical Tic-Tac-Toe.
//!
//! Player 1 places the odd numbers of `1..=N²`, player 2 the evens, each
//! number once. A line wins when all its cells are filled and they add up
//! to the magic sum `N·(N²+1)/2`. A full board with no such line is a tie.

use std::fmt;
use std::str::FromStr;

use crate::board::{Board, Grid, filled_line, lines};
use crate::error::InvalidMove;
use crate::game::GameState;
use crate::player::{NumberPool, Seat};
use crate::setup::GameSetup;
use crate::variant::{GameKind, ParseMoveError, Variant, Verdict, parse_fields, pick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericTtt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericMove {
    pub row: usize,
    pub col: usize,
    pub number: u32,
}

impl NumericMove {
    pub fn new(row: usize, col: usize, number: u32) -> Self {
        Self { row, col, number }
    }
}

impl FromStr for NumericMove {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [row, col, number] = parse_fields::<3>(s, NumericTtt::MOVE_SYNTAX)?;
        let number = u32::try_from(number).map_err(|_| ParseMoveError {
            expected: NumericTtt::MOVE_SYNTAX,
        })?;
        Ok(NumericMove { row, col, number })
    }
}

impl fmt::Display for NumericMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at ({}, {})", self.number, self.row, self.col)
    }
}

/// Common line total of an NxN magic square.
pub fn magic_sum(n: usize) -> u64 {
    let n = n as u64;
    n * (n * n + 1) / 2
}

/// True if some row, column or diagonal is full and hits the magic sum.
pub fn has_magic_line<G: Grid>(grid: &G) -> bool {
    let target = magic_sum(grid.size());
    lines(grid.size()).iter().any(|line| {
        filled_line(grid, line)
            .is_some_and(|values| values.iter().map(|&v| u64::from(v)).sum::<u64>() == target)
    })
}

impl Variant for NumericTtt {
    const KIND: GameKind = GameKind::NumericTtt;
    const MOVE_SYNTAX: &'static str = "row col number (e.g. 1 0 5)";

    type Position = Board;
    type Resource = NumberPool;
    type Move = NumericMove;

    fn initial_state(setup: &GameSetup) -> GameState<Self> {
        let limit = (setup.size * setup.size) as u32;
        let players = setup.players(NumberPool::odds(limit), NumberPool::evens(limit));
        GameState::new(Board::new(setup.size), players, setup.mode.vs_computer())
    }

    fn board_size(position: &Board) -> usize {
        position.size()
    }

    fn check(state: &GameState<Self>, mv: &NumericMove) -> Result<(), InvalidMove> {
        let board = &state.position;
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
        if !state.current_player().resource.contains(mv.number) {
            return Err(InvalidMove::NumberUnavailable { number: mv.number });
        }
        Ok(())
    }

    fn apply(state: &mut GameState<Self>, mv: &NumericMove) {
        let seat = state.turn;
        if state.position.place(mv.row, mv.col, mv.number) {
            state.player_mut(seat).resource.take(mv.number);
        }
    }

    fn verdict(state: &GameState<Self>, mover: Seat, _mv: &NumericMove) -> Option<Verdict> {
        if has_magic_line(&state.position) {
            Some(Verdict::Win(mover))
        } else if state.position.is_full() {
            Some(Verdict::Tie)
        } else {
            None
        }
    }

    fn legal_moves(state: &GameState<Self>) -> Vec<NumericMove> {
        let pool = state.current_player().resource.numbers();
        state
            .position
            .empty_cells()
            .flat_map(|(row, col)| pool.iter().map(move |&number| NumericMove { row, col, number }))
            .collect()
    }

    /// First immediate win in row-major cell order, then pool order;
    /// otherwise a random empty cell with a random remaining number.
    fn tactical_move(state: &GameState<Self>) -> Option<NumericMove> {
        let board = &state.position;
        let pool = state.current_player().resource.numbers();
        for (row, col) in board.empty_cells() {
            for &number in pool {
                if has_magic_line(&board.with(row, col, number)) {
                    return Some(NumericMove { row, col, number });
                }
            }
        }

        let cells: Vec<_> = board.empty_cells().collect();
        let (row, col) = pick(&cells)?;
        let number = pick(pool)?;
        Some(NumericMove { row, col, number })
    }

    fn describe_resource(pool: &NumberPool) -> Option<String> {
        Some(format!("numbers left: {pool}"))
    }
}
