//! Notakto: misère tic-tac-toe on several 3x3 boards.
//!
//! Both players place the same mark. Completing a row, column or diagonal
//! kills that board; dead boards take no more marks. Whoever kills the last
//! live board loses. There are no ties.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Grid, Point, lines};
use crate::constants::{NOTAKTO_BOARD_SIZE, NOTAKTO_MARK};
use crate::error::InvalidMove;
use crate::game::GameState;
use crate::player::Seat;
use crate::setup::GameSetup;
use crate::variant::{GameKind, ParseMoveError, Variant, Verdict, parse_fields, pick};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notakto;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotaktoMove {
    pub board: usize,
    pub row: usize,
    pub col: usize,
}

impl NotaktoMove {
    pub fn new(board: usize, row: usize, col: usize) -> Self {
        Self { board, row, col }
    }
}

impl FromStr for NotaktoMove {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let [board, row, col] = parse_fields::<3>(s, Notakto::MOVE_SYNTAX)?;
        Ok(NotaktoMove { board, row, col })
    }
}

impl fmt::Display for NotaktoMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "X on board {} at ({}, {})", self.board, self.row, self.col)
    }
}

/// The row of boards plus the indices of the dead ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawBoards")]
pub struct NotaktoBoards {
    boards: Vec<Board>,
    dead: BTreeSet<usize>,
}

#[derive(Deserialize)]
struct RawBoards {
    boards: Vec<Board>,
    #[serde(default)]
    dead: BTreeSet<usize>,
}

impl TryFrom<RawBoards> for NotaktoBoards {
    type Error = String;

    fn try_from(raw: RawBoards) -> Result<Self, Self::Error> {
        if raw.boards.is_empty() {
            return Err("notakto needs at least one board".to_string());
        }
        if raw.boards.iter().any(|b| b.size() != NOTAKTO_BOARD_SIZE) {
            return Err(format!("notakto boards must be {0}x{0}", NOTAKTO_BOARD_SIZE));
        }
        if let Some(&bad) = raw.dead.iter().find(|&&i| i >= raw.boards.len()) {
            return Err(format!("dead board {bad} does not exist"));
        }
        let completed: BTreeSet<usize> = (0..raw.boards.len())
            .filter(|&i| has_full_line(&raw.boards[i]))
            .collect();
        if completed != raw.dead {
            return Err(format!(
                "dead boards {:?} disagree with completed lines on boards {:?}",
                raw.dead, completed
            ));
        }
        Ok(NotaktoBoards {
            boards: raw.boards,
            dead: raw.dead,
        })
    }
}

impl NotaktoBoards {
    pub fn new(count: usize) -> Self {
        Self {
            boards: vec![Board::new(NOTAKTO_BOARD_SIZE); count],
            dead: BTreeSet::new(),
        }
    }

    pub fn boards(&self) -> &[Board] {
        &self.boards
    }

    pub fn board(&self, index: usize) -> Option<&Board> {
        self.boards.get(index)
    }

    pub fn dead(&self) -> &BTreeSet<usize> {
        &self.dead
    }

    pub fn is_dead(&self, index: usize) -> bool {
        self.dead.contains(&index)
    }

    pub fn live_count(&self) -> usize {
        self.boards.len() - self.dead.len()
    }

    /// Indices of boards still in play.
    pub fn live(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.boards.len()).filter(|i| !self.dead.contains(i))
    }
}

impl fmt::Display for NotaktoBoards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, board) in self.boards.iter().enumerate() {
            let dead = self.is_dead(i);
            writeln!(f, "Board {i} {}", if dead { "[DEAD]" } else { "[ACTIVE]" })?;
            let completed = if dead { completed_cells(board) } else { HashSet::new() };
            let text = board.render_with(|point, value| match value {
                Some(_) if completed.contains(&point) => "*".to_string(),
                Some(_) => "X".to_string(),
                None => " ".to_string(),
            });
            writeln!(f, "{text}")?;
        }
        Ok(())
    }
}

/// True if some row, column or diagonal is all marks.
pub fn has_full_line<G: Grid>(grid: &G) -> bool {
    lines(grid.size()).iter().any(|line| {
        line.iter()
            .all(|&(row, col)| grid.cell(row, col) == Some(NOTAKTO_MARK))
    })
}

/// Cells belonging to completed lines.
pub fn completed_cells(board: &Board) -> HashSet<Point> {
    lines(board.size())
        .into_iter()
        .filter(|line| line.iter().all(|&(r, c)| board.get(r, c) == Some(NOTAKTO_MARK)))
        .flatten()
        .collect()
}

fn kills(boards: &NotaktoBoards, mv: &NotaktoMove) -> bool {
    boards
        .board(mv.board)
        .is_some_and(|board| has_full_line(&board.with(mv.row, mv.col, NOTAKTO_MARK)))
}

impl Variant for Notakto {
    const KIND: GameKind = GameKind::Notakto;
    const MOVE_SYNTAX: &'static str = "board row col (e.g. 0 1 1)";

    type Position = NotaktoBoards;
    type Resource = ();
    type Move = NotaktoMove;

    fn initial_state(setup: &GameSetup) -> GameState<Self> {
        GameState::new(
            NotaktoBoards::new(setup.size),
            setup.players((), ()),
            setup.mode.vs_computer(),
        )
    }

    fn board_size(_position: &NotaktoBoards) -> usize {
        NOTAKTO_BOARD_SIZE
    }

    fn check(state: &GameState<Self>, mv: &NotaktoMove) -> Result<(), InvalidMove> {
        let boards = &state.position;
        let Some(board) = boards.board(mv.board) else {
            return Err(InvalidMove::NoSuchBoard { board: mv.board });
        };
        if boards.is_dead(mv.board) {
            return Err(InvalidMove::DeadBoard { board: mv.board });
        }
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

    fn apply(state: &mut GameState<Self>, mv: &NotaktoMove) {
        let boards = &mut state.position;
        let Some(board) = boards.boards.get_mut(mv.board) else {
            return;
        };
        if board.place(mv.row, mv.col, NOTAKTO_MARK) && has_full_line(board) {
            boards.dead.insert(mv.board);
        }
    }

    /// Killing the last live board loses for the mover.
    fn verdict(state: &GameState<Self>, mover: Seat, _mv: &NotaktoMove) -> Option<Verdict> {
        (state.position.live_count() == 0).then_some(Verdict::Win(mover.other()))
    }

    fn legal_moves(state: &GameState<Self>) -> Vec<NotaktoMove> {
        let boards = &state.position;
        boards
            .live()
            .flat_map(|b| {
                boards.boards[b]
                    .empty_cells()
                    .map(move |(row, col)| NotaktoMove::new(b, row, col))
            })
            .collect()
    }

    /// Prefer a kill that leaves an even number of live boards, then any
    /// kill that is not fatal, then a random safe move. A fatal move is
    /// only played when nothing else is left.
    fn tactical_move(state: &GameState<Self>) -> Option<NotaktoMove> {
        let boards = &state.position;
        let options = Self::legal_moves(state);
        let live = boards.live_count();

        let (kill_moves, safe_moves): (Vec<NotaktoMove>, Vec<NotaktoMove>) =
            options.iter().partition(|mv| kills(boards, mv));
        let non_fatal: Vec<NotaktoMove> = if live > 1 { kill_moves } else { Vec::new() };

        if live % 2 == 1 {
            if let Some(mv) = pick(&non_fatal) {
                return Some(mv);
            }
        }
        pick(&non_fatal)
            .or_else(|| pick(&safe_moves))
            .or_else(|| pick(&options))
    }
}
