//! Turn controller.
//!
//! A [`Game`] owns the live [`GameState`] and the undo/redo [`History`]. Every
//! ply goes through the same pipeline: legality check, mutation, verdict,
//! turn switch, snapshot. In human-vs-computer games the computer's reply is
//! run through that pipeline right after the human's ply.
//!
//! State machine:
//!
//! ```text
//! AwaitingMove(seat) --play--> [ply applied] --+--> AwaitingMove(other seat)
//!                                              +--> Won(seat)   (terminal)
//!                                              +--> Tied        (terminal)
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{GameError, Result};
use crate::history::History;
use crate::player::{Controller, Player, Seat};
use crate::variant::{Variant, Verdict, computer_move};

/// Everything needed to resume a game, minus its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound = "")]
pub struct GameState<V: Variant> {
    pub position: V::Position,
    pub players: [Player<V::Resource>; 2],
    /// Seat on turn; after a terminal ply, the seat that made it.
    pub turn: Seat,
    pub vs_computer: bool,
    /// Set once the game has ended.
    #[serde(default)]
    pub verdict: Option<Verdict>,
}

/// Where the turn state machine stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    AwaitingMove(Seat),
    Won(Seat),
    Tied,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Phase::AwaitingMove(_))
    }
}

impl<V: Variant> GameState<V> {
    pub fn new(position: V::Position, players: [Player<V::Resource>; 2], vs_computer: bool) -> Self {
        Self {
            position,
            players,
            turn: Seat::One,
            vs_computer,
            verdict: None,
        }
    }

    pub fn phase(&self) -> Phase {
        match self.verdict {
            None => Phase::AwaitingMove(self.turn),
            Some(Verdict::Win(seat)) => Phase::Won(seat),
            Some(Verdict::Tie) => Phase::Tied,
        }
    }

    pub fn player(&self, seat: Seat) -> &Player<V::Resource> {
        &self.players[seat.index()]
    }

    pub fn player_mut(&mut self, seat: Seat) -> &mut Player<V::Resource> {
        &mut self.players[seat.index()]
    }

    pub fn current_player(&self) -> &Player<V::Resource> {
        self.player(self.turn)
    }

    /// In progress with a human on turn, or finished. Undo and redo stop at
    /// such states so one step covers a whole human decision.
    pub fn is_decision_point(&self) -> bool {
        self.verdict.is_some() || self.current_player().is_human()
    }
}

/// One applied move.
#[derive(Debug, Clone, PartialEq)]
pub struct Ply<V: Variant> {
    pub seat: Seat,
    pub player: String,
    pub mv: V::Move,
    pub verdict: Option<Verdict>,
}

/// Outcome of an undo or redo request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Stepped,
    Nothing,
}

/// A running game: live state plus its snapshot history.
#[derive(Debug, Clone)]
pub struct Game<V: Variant> {
    state: GameState<V>,
    history: History,
}

impl<V: Variant> Game<V> {
    /// Start a game from `state`, recording it as the initial snapshot.
    pub fn new(state: GameState<V>) -> Result<Self> {
        let mut history = History::new();
        history.snapshot(&state)?;
        Ok(Self { state, history })
    }

    /// Resume a game with an existing history, repairing it if its top does
    /// not match `state`.
    pub fn resume(state: GameState<V>, mut history: History) -> Result<Self> {
        history.repair(&state)?;
        Ok(Self { state, history })
    }

    pub fn state(&self) -> &GameState<V> {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn into_parts(self) -> (GameState<V>, History) {
        (self.state, self.history)
    }

    /// Play `mv` for the seat on turn, then let any computer seat answer.
    ///
    /// An illegal move leaves the game untouched and returns
    /// [`GameError::InvalidMove`]; the caller should ask again.
    pub fn play(&mut self, mv: V::Move) -> Result<Vec<Ply<V>>> {
        let mut plies = vec![self.apply(mv)?];
        plies.extend(self.run_computer()?);
        Ok(plies)
    }

    /// Let computer seats move until a human is on turn or the game ends.
    pub fn run_computer(&mut self) -> Result<Vec<Ply<V>>> {
        let mut plies = Vec::new();
        while self.state.verdict.is_none() {
            let heuristic = match self.state.current_player().controller {
                Controller::Human => break,
                Controller::Computer { heuristic } => heuristic,
            };
            let mv = computer_move(&self.state, heuristic).ok_or_else(|| {
                GameError::NoMovesAvailable {
                    player: self.state.current_player().name.clone(),
                }
            })?;
            debug!(kind = ?V::KIND, ?heuristic, %mv, "computer chose move");
            plies.push(self.apply(mv)?);
        }
        Ok(plies)
    }

    /// The single-ply pipeline: check, apply, verdict, switch turn, snapshot.
    pub fn apply(&mut self, mv: V::Move) -> Result<Ply<V>> {
        if self.state.verdict.is_some() {
            return Err(GameError::GameOver);
        }
        V::check(&self.state, &mv)?;

        let seat = self.state.turn;
        V::apply(&mut self.state, &mv);
        let verdict = V::verdict(&self.state, seat, &mv);
        match verdict {
            Some(v) => {
                info!(kind = ?V::KIND, %seat, ?v, "game over");
                self.state.verdict = Some(v);
            }
            None => self.state.turn = seat.other(),
        }
        self.history.snapshot(&self.state)?;
        debug!(kind = ?V::KIND, %seat, %mv, "ply applied");

        Ok(Ply {
            seat,
            player: self.state.player(seat).name.clone(),
            mv,
            verdict,
        })
    }

    /// Step back to the previous human decision. The walk runs on a copy of
    /// the history, so a snapshot that fails to restore leaves the game as
    /// it was.
    pub fn undo(&mut self) -> Result<Step> {
        let mut history = self.history.clone();
        let Some(mut restored) = history.undo::<GameState<V>>()? else {
            return Ok(Step::Nothing);
        };
        while !restored.is_decision_point() {
            match history.undo()? {
                Some(earlier) => restored = earlier,
                None => break,
            }
        }
        self.state = restored;
        self.history = history;
        debug!(kind = ?V::KIND, depth = self.history.undo_len(), "undo");
        Ok(Step::Stepped)
    }

    /// Step forward to the next human decision (or the end of the game).
    pub fn redo(&mut self) -> Result<Step> {
        let mut history = self.history.clone();
        let Some(mut restored) = history.redo::<GameState<V>>()? else {
            return Ok(Step::Nothing);
        };
        while !restored.is_decision_point() {
            match history.redo()? {
                Some(later) => restored = later,
                None => break,
            }
        }
        self.state = restored;
        self.history = history;
        debug!(kind = ?V::KIND, depth = self.history.undo_len(), "redo");
        Ok(Step::Stepped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::{NumericMove, NumericTtt};
    use crate::player::Heuristic;
    use crate::setup::{GameSetup, Mode};
    use crate::variant::GameKind;

    fn vs_computer() -> Game<NumericTtt> {
        let setup = GameSetup::new(GameKind::NumericTtt, 3, Mode::HumanVsComputer(Heuristic::Tactical));
        Game::new(NumericTtt::initial_state(&setup)).unwrap()
    }

    /// Replace one snapshot of `history` with a document that is not a state.
    fn corrupt(history: &History, stack: &str, index: usize) -> History {
        let mut document = serde_json::to_value(history).unwrap();
        document[stack][index] = serde_json::json!({ "garbage": true });
        serde_json::from_value(document).unwrap()
    }

    #[test]
    fn test_failed_undo_leaves_game_untouched() {
        let mut game = vs_computer();
        game.play(NumericMove::new(1, 1, 5)).unwrap();
        let (state, history) = game.into_parts();
        assert_eq!(history.undo_len(), 3, "initial, human ply, computer reply");

        let mut game = Game::resume(state.clone(), corrupt(&history, "undo", 0)).unwrap();
        assert!(game.undo().is_err());
        assert_eq!(game.state(), &state);
        assert_eq!(game.history().undo_len(), 3);
        assert_eq!(game.history().redo_len(), 0);
    }

    #[test]
    fn test_failed_redo_leaves_game_untouched() {
        let mut game = vs_computer();
        game.play(NumericMove::new(1, 1, 5)).unwrap();
        assert_eq!(game.undo().unwrap(), Step::Stepped);
        let (state, history) = game.into_parts();
        assert_eq!(history.redo_len(), 2);

        // The computer's reply sits at the bottom of the redo stack.
        let mut game = Game::resume(state.clone(), corrupt(&history, "redo", 0)).unwrap();
        assert!(game.redo().is_err());
        assert_eq!(game.state(), &state);
        assert_eq!(game.history().undo_len(), 1);
        assert_eq!(game.history().redo_len(), 2);
    }

    #[test]
    fn test_undo_redo_walk_to_decision_points() {
        let mut game = vs_computer();
        let initial = game.state().clone();
        game.play(NumericMove::new(1, 1, 5)).unwrap();
        let answered = game.state().clone();

        assert_eq!(game.undo().unwrap(), Step::Stepped);
        assert_eq!(game.state(), &initial);
        assert_eq!(game.undo().unwrap(), Step::Nothing);
        assert_eq!(game.redo().unwrap(), Step::Stepped);
        assert_eq!(game.state(), &answered);
        assert_eq!(game.history().undo_len(), 3);
    }
}
