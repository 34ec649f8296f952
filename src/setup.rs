//! Game setup: the typed options for a new game and the table that maps a
//! game kind to its constructor.

use std::ops::RangeInclusive;

use crate::constants::{
    COMPUTER_NAME, GOMOKU_MAX_SIZE, GOMOKU_MIN_SIZE, NOTAKTO_MAX_BOARDS, NOTAKTO_MIN_BOARDS,
    NUMERIC_MAX_SIZE, NUMERIC_MIN_SIZE, PLAYER_ONE_NAME, PLAYER_TWO_NAME,
};
use crate::error::{GameError, Result};
use crate::game::Game;
use crate::gomoku::Gomoku;
use crate::notakto::Notakto;
use crate::numeric::NumericTtt;
use crate::player::{Heuristic, Player};
use crate::variant::{GameKind, Variant};

/// Who sits in seat 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    HumanVsHuman,
    HumanVsComputer(Heuristic),
}

impl Mode {
    pub fn vs_computer(self) -> bool {
        matches!(self, Mode::HumanVsComputer(_))
    }
}

/// Options for a new game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameSetup {
    pub kind: GameKind,
    /// Board side length; for Notakto, the number of 3x3 boards.
    pub size: usize,
    pub mode: Mode,
}

impl GameSetup {
    pub fn new(kind: GameKind, size: usize, mode: Mode) -> Self {
        Self { kind, size, mode }
    }

    /// Accepted values of `size` for `kind`.
    pub fn size_range(kind: GameKind) -> RangeInclusive<usize> {
        match kind {
            GameKind::NumericTtt => NUMERIC_MIN_SIZE..=NUMERIC_MAX_SIZE,
            GameKind::Notakto => NOTAKTO_MIN_BOARDS..=NOTAKTO_MAX_BOARDS,
            GameKind::Gomoku => GOMOKU_MIN_SIZE..=GOMOKU_MAX_SIZE,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let range = Self::size_range(self.kind);
        if range.contains(&self.size) {
            return Ok(());
        }
        let what = match self.kind {
            GameKind::Notakto => "board count",
            _ => "board size",
        };
        Err(GameError::InvalidSetup {
            message: format!(
                "{} {what} must be between {} and {}, got {}",
                self.kind,
                range.start(),
                range.end(),
                self.size
            ),
        })
    }

    /// The two players for this setup, each holding its own resource.
    pub fn players<R>(&self, first: R, second: R) -> [Player<R>; 2] {
        let second = match self.mode {
            Mode::HumanVsHuman => Player::human(PLAYER_TWO_NAME, second),
            Mode::HumanVsComputer(heuristic) => Player::computer(COMPUTER_NAME, heuristic, second),
        };
        [Player::human(PLAYER_ONE_NAME, first), second]
    }

    /// Validate and build the game through the constructor table.
    pub fn start(&self) -> Result<AnyGame> {
        self.validate()?;
        let (_, construct) = CONSTRUCTORS
            .iter()
            .find(|(kind, _)| *kind == self.kind)
            .ok_or_else(|| GameError::InvalidSetup {
                message: format!("no constructor for {}", self.kind),
            })?;
        construct(self)
    }
}

/// A game of any kind.
#[derive(Debug, Clone)]
pub enum AnyGame {
    Numeric(Game<NumericTtt>),
    Notakto(Game<Notakto>),
    Gomoku(Game<Gomoku>),
}

impl AnyGame {
    pub fn kind(&self) -> GameKind {
        match self {
            AnyGame::Numeric(_) => GameKind::NumericTtt,
            AnyGame::Notakto(_) => GameKind::Notakto,
            AnyGame::Gomoku(_) => GameKind::Gomoku,
        }
    }
}

type Constructor = fn(&GameSetup) -> Result<AnyGame>;

const CONSTRUCTORS: [(GameKind, Constructor); 3] = [
    (GameKind::NumericTtt, start_numeric),
    (GameKind::Notakto, start_notakto),
    (GameKind::Gomoku, start_gomoku),
];

fn build<V: Variant>(setup: &GameSetup) -> Result<Game<V>> {
    Game::new(V::initial_state(setup))
}

fn start_numeric(setup: &GameSetup) -> Result<AnyGame> {
    build(setup).map(AnyGame::Numeric)
}

fn start_notakto(setup: &GameSetup) -> Result<AnyGame> {
    build(setup).map(AnyGame::Notakto)
}

fn start_gomoku(setup: &GameSetup) -> Result<AnyGame> {
    build(setup).map(AnyGame::Gomoku)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::Controller;

    #[test]
    fn test_table_covers_every_kind() {
        for kind in GameKind::ALL {
            let size = *GameSetup::size_range(kind).end();
            let game = GameSetup::new(kind, size, Mode::HumanVsHuman).start().unwrap();
            assert_eq!(game.kind(), kind);
        }
    }

    #[test]
    fn test_size_out_of_range() {
        let err = GameSetup::new(GameKind::Gomoku, 4, Mode::HumanVsHuman)
            .start()
            .unwrap_err();
        assert!(matches!(err, GameError::InvalidSetup { .. }));
        assert!(GameSetup::new(GameKind::Notakto, 6, Mode::HumanVsHuman).validate().is_err());
        assert!(GameSetup::new(GameKind::NumericTtt, 0, Mode::HumanVsHuman).validate().is_err());
    }

    #[test]
    fn test_computer_takes_second_seat() {
        let setup = GameSetup::new(GameKind::Gomoku, 9, Mode::HumanVsComputer(Heuristic::Random));
        let [first, second] = setup.players(1, 2);
        assert!(first.is_human());
        assert_eq!(first.name, PLAYER_ONE_NAME);
        assert_eq!(second.name, COMPUTER_NAME);
        assert_eq!(
            second.controller,
            Controller::Computer {
                heuristic: Heuristic::Random
            }
        );
    }
}
