//! Interactive text shell.
//!
//! The shell reads lines from any [`BufRead`] and writes to any [`Write`], so
//! the same loop serves stdin/stdout and scripted sessions in tests.
//!
//! ## Main menu
//!
//! - `[1]`-`[3]` start a new game of the chosen kind
//! - `[4]` load a saved game
//! - `[5]` help
//! - `[6]` quit
//!
//! ## In-game commands
//!
//! - `move [args]` - play a move, prompting for it if no args are given
//! - `save [name]` - save the game
//! - `undo` / `redo` - step through the history
//! - `help` - show commands and the move syntax
//! - `quit` - return to the main menu
//!
//! End of input at any prompt ends the session.

use std::fmt;
use std::io::{BufRead, Write};

use tracing::{debug, warn};

use crate::constants::{GOMOKU_DEFAULT_SIZE, NOTAKTO_DEFAULT_BOARDS, NUMERIC_DEFAULT_SIZE};
use crate::error::{GameError, Result};
use crate::game::{Game, Phase, Ply, Step};
use crate::persistence::{SaveStore, list_saves, load_game, save_game};
use crate::player::Heuristic;
use crate::setup::{AnyGame, GameSetup, Mode};
use crate::variant::{GameKind, Variant};

/// The in-game commands.
const KNOWN_COMMANDS: &[&str] = &["help", "move", "quit", "redo", "save", "undo"];

/// Where control goes after a game or a prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    /// Back to the main menu.
    Menu,
    /// Input is exhausted; end the session.
    Exit,
}

/// Outcome of one in-game command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Turn {
    Continue,
    Leave(Flow),
}

pub struct Shell<R, W, S> {
    input: R,
    output: W,
    store: S,
}

impl<R: BufRead, W: Write, S: SaveStore> Shell<R, W, S> {
    pub fn new(input: R, output: W, store: S) -> Self {
        Self {
            input,
            output,
            store,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Run the main menu until the user quits or input runs out.
    pub fn run(&mut self) -> Result<()> {
        self.say("Welcome to Board Games!")?;
        loop {
            self.say("")?;
            self.say("Please select an option:")?;
            for (i, kind) in GameKind::ALL.iter().enumerate() {
                self.say(format_args!("[{}] {}", i + 1, kind.title()))?;
            }
            self.say("[4] Load Previous Game")?;
            self.say("[5] Help")?;
            self.say("[6] Quit")?;

            let Some(choice) = self.ask("> ")? else {
                return Ok(());
            };
            let flow = match choice.as_str() {
                "1" => self.new_game(GameKind::NumericTtt)?,
                "2" => self.new_game(GameKind::Notakto)?,
                "3" => self.new_game(GameKind::Gomoku)?,
                "4" => self.load_menu()?,
                "5" => {
                    self.show_instructions()?;
                    Flow::Menu
                }
                "6" | "quit" => {
                    self.say("Goodbye!")?;
                    return Ok(());
                }
                "" => Flow::Menu,
                _ => {
                    self.say("Invalid option, please enter a number from 1 to 6.")?;
                    Flow::Menu
                }
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Print the save listing.
    pub fn list(&mut self) -> Result<()> {
        let saves = list_saves(&self.store)?;
        if saves.is_empty() {
            return self.say("No saved games found.");
        }
        for (i, name) in saves.iter().enumerate() {
            self.say(format_args!("[{}] {name}", i + 1))?;
        }
        Ok(())
    }

    // =========================================================================
    // Setup
    // =========================================================================

    fn new_game(&mut self, kind: GameKind) -> Result<Flow> {
        let Some(setup) = self.ask_setup(kind)? else {
            return Ok(Flow::Exit);
        };
        debug!(?setup, "starting game");
        match setup.start() {
            Ok(game) => self.play(game),
            Err(GameError::InvalidSetup { message }) => {
                self.say(message)?;
                Ok(Flow::Menu)
            }
            Err(e) => Err(e),
        }
    }

    fn ask_setup(&mut self, kind: GameKind) -> Result<Option<GameSetup>> {
        let range = GameSetup::size_range(kind);
        let (what, default) = match kind {
            GameKind::NumericTtt => ("board size", NUMERIC_DEFAULT_SIZE),
            GameKind::Notakto => ("number of boards", NOTAKTO_DEFAULT_BOARDS),
            GameKind::Gomoku => ("board size", GOMOKU_DEFAULT_SIZE),
        };
        let prompt = format!(
            "Enter {what} ({}-{}, default {default}): ",
            range.start(),
            range.end()
        );

        let size = loop {
            let Some(answer) = self.ask(&prompt)? else {
                return Ok(None);
            };
            if answer.is_empty() {
                break default;
            }
            match answer.parse::<usize>() {
                Ok(size) if range.contains(&size) => break size,
                _ => self.say(format_args!(
                    "Please enter a whole number between {} and {}.",
                    range.start(),
                    range.end()
                ))?,
            }
        };

        self.say("Select game mode:")?;
        self.say("[1] Human vs Human")?;
        self.say("[2] Human vs Computer")?;
        let mode = loop {
            let Some(answer) = self.ask("> ")? else {
                return Ok(None);
            };
            match answer.as_str() {
                "1" => break Mode::HumanVsHuman,
                "2" => break Mode::HumanVsComputer(Heuristic::default()),
                _ => self.say("Please enter 1 or 2.")?,
            }
        };

        let mode = match mode {
            Mode::HumanVsComputer(_) => {
                let Some(heuristic) = self.ask_heuristic()? else {
                    return Ok(None);
                };
                Mode::HumanVsComputer(heuristic)
            }
            other => other,
        };
        Ok(Some(GameSetup::new(kind, size, mode)))
    }

    fn ask_heuristic(&mut self) -> Result<Option<Heuristic>> {
        self.say("Computer strength:")?;
        self.say("[1] Tactical (default)")?;
        self.say("[2] Random")?;
        loop {
            let Some(answer) = self.ask("> ")? else {
                return Ok(None);
            };
            match answer.as_str() {
                "" | "1" => return Ok(Some(Heuristic::Tactical)),
                "2" => return Ok(Some(Heuristic::Random)),
                _ => self.say("Please enter 1 or 2.")?,
            }
        }
    }

    fn load_menu(&mut self) -> Result<Flow> {
        let saves = match list_saves(&self.store) {
            Ok(saves) => saves,
            Err(e) if e.is_persistence() => {
                self.say(format_args!("Could not list saved games: {e}"))?;
                return Ok(Flow::Menu);
            }
            Err(e) => return Err(e),
        };
        if saves.is_empty() {
            self.say("No saved games found.")?;
            return Ok(Flow::Menu);
        }
        self.say("Saved games:")?;
        for (i, name) in saves.iter().enumerate() {
            self.say(format_args!("[{}] {name}", i + 1))?;
        }
        let Some(answer) = self.ask("Select a save (number or file name, empty to go back): ")?
        else {
            return Ok(Flow::Exit);
        };
        if answer.is_empty() {
            return Ok(Flow::Menu);
        }
        let file_name = match answer.parse::<usize>() {
            Ok(n) if (1..=saves.len()).contains(&n) => saves[n - 1].clone(),
            Ok(_) => {
                self.say("No save with that number.")?;
                return Ok(Flow::Menu);
            }
            Err(_) => answer,
        };

        match load_game(&self.store, &file_name) {
            Ok(game) => {
                self.say(format_args!("Loaded {file_name}."))?;
                self.play(game)
            }
            Err(e) if e.is_persistence() => {
                warn!(%file_name, error = %e, "load failed");
                self.say(format_args!("Could not load game: {e}"))?;
                Ok(Flow::Menu)
            }
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Game Loop
    // =========================================================================

    fn play(&mut self, game: AnyGame) -> Result<Flow> {
        match game {
            AnyGame::Numeric(game) => self.play_game(game),
            AnyGame::Notakto(game) => self.play_game(game),
            AnyGame::Gomoku(game) => self.play_game(game),
        }
    }

    fn play_game<V: Variant>(&mut self, mut game: Game<V>) -> Result<Flow> {
        // A loaded game may leave the computer on turn.
        let plies = game.run_computer()?;
        self.report_plies(&plies)?;

        loop {
            self.show(&game)?;
            match game.phase() {
                Phase::Won(seat) => {
                    let name = game.state().player(seat).name.clone();
                    self.say(format_args!("{name} wins!"))?;
                    return Ok(Flow::Menu);
                }
                Phase::Tied => {
                    self.say("It's a tie!")?;
                    return Ok(Flow::Menu);
                }
                Phase::AwaitingMove(_) => {}
            }

            let name = game.state().current_player().name.clone();
            let Some(line) = self.ask(&format!("{name}, enter a command (move, save, undo, redo, help, quit): "))?
            else {
                return Ok(Flow::Exit);
            };
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let (command, args) = match line.split_once(char::is_whitespace) {
                Some((command, args)) => (command.to_lowercase(), args.trim().to_string()),
                None => (line.to_lowercase(), String::new()),
            };

            match self.execute(&mut game, &command, &args)? {
                Turn::Continue => {}
                Turn::Leave(flow) => return Ok(flow),
            }
        }
    }

    fn execute<V: Variant>(&mut self, game: &mut Game<V>, command: &str, args: &str) -> Result<Turn> {
        match command {
            "move" | "m" => self.read_move(game, args),

            "save" => {
                let base = if args.is_empty() {
                    match self.ask("Enter a name for the save: ")? {
                        Some(name) => name,
                        None => return Ok(Turn::Leave(Flow::Exit)),
                    }
                } else {
                    args.to_string()
                };
                if base.is_empty() {
                    self.say("Save cancelled.")?;
                    return Ok(Turn::Continue);
                }
                match save_game(&self.store, &base, game) {
                    Ok(file_name) => self.say(format_args!("Game saved as {file_name}"))?,
                    Err(e) if e.is_persistence() => {
                        warn!(error = %e, "save failed");
                        self.say(format_args!("Could not save game: {e}"))?;
                    }
                    Err(e) => return Err(e),
                }
                Ok(Turn::Continue)
            }

            "undo" => {
                match game.undo() {
                    Ok(Step::Stepped) => self.say("Move undone.")?,
                    Ok(Step::Nothing) => self.say("Nothing to undo.")?,
                    Err(e) => {
                        warn!(error = %e, "undo failed");
                        self.say(format_args!("Could not undo: {e}"))?;
                    }
                }
                Ok(Turn::Continue)
            }

            "redo" => {
                match game.redo() {
                    Ok(Step::Stepped) => self.say("Move redone.")?,
                    Ok(Step::Nothing) => self.say("Nothing to redo.")?,
                    Err(e) => {
                        warn!(error = %e, "redo failed");
                        self.say(format_args!("Could not redo: {e}"))?;
                    }
                }
                Ok(Turn::Continue)
            }

            "help" => {
                self.say("Commands:")?;
                self.say(" move  - make a move (or `move <args>` inline)")?;
                self.say(" save  - save the game (or `save <name>`)")?;
                self.say(" undo  - undo your last move")?;
                self.say(" redo  - redo an undone move")?;
                self.say(" help  - show this help")?;
                self.say(" quit  - return to the main menu")?;
                self.say(format_args!("Move format: {}", V::MOVE_SYNTAX))?;
                Ok(Turn::Continue)
            }

            "quit" => {
                self.say("Returning to main menu...")?;
                Ok(Turn::Leave(Flow::Menu))
            }

            _ => {
                self.say(format_args!(
                    "Unknown command '{command}'. Known commands: {}",
                    KNOWN_COMMANDS.join(", ")
                ))?;
                Ok(Turn::Continue)
            }
        }
    }

    /// Ask until a legal move is played. Parse errors and illegal moves are
    /// reported and re-prompted.
    fn read_move<V: Variant>(&mut self, game: &mut Game<V>, inline: &str) -> Result<Turn> {
        let mut text = inline.to_string();
        loop {
            if text.is_empty() {
                match self.ask(&format!("Enter your move ({}): ", V::MOVE_SYNTAX))? {
                    Some(answer) => text = answer,
                    None => return Ok(Turn::Leave(Flow::Exit)),
                }
                if text.is_empty() {
                    continue;
                }
            }
            let mv = match text.parse::<V::Move>() {
                Ok(mv) => mv,
                Err(e) => {
                    self.say(format_args!("Invalid input: {e}"))?;
                    text.clear();
                    continue;
                }
            };
            match game.play(mv) {
                Ok(plies) => {
                    self.report_plies(&plies[1..])?;
                    return Ok(Turn::Continue);
                }
                Err(GameError::InvalidMove(reason)) => {
                    self.say(format_args!("Invalid move: {reason}. Try again."))?;
                    text.clear();
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn report_plies<V: Variant>(&mut self, plies: &[Ply<V>]) -> Result<()> {
        for ply in plies {
            self.say(format_args!("{} played {}.", ply.player, ply.mv))?;
        }
        Ok(())
    }

    fn show<V: Variant>(&mut self, game: &Game<V>) -> Result<()> {
        let state = game.state();
        self.say("")?;
        self.say(format_args!("=== {} ===", V::KIND))?;
        self.say(&state.position)?;
        for player in &state.players {
            if let Some(text) = V::describe_resource(&player.resource) {
                self.say(format_args!("{}: {text}", player.name))?;
            }
        }
        Ok(())
    }

    fn show_instructions(&mut self) -> Result<()> {
        self.say("Numerical Tic-Tac-Toe:")?;
        self.say(" - NxN grid; player 1 places odd numbers, player 2 even numbers.")?;
        self.say(" - Complete a line that adds up to N(N^2+1)/2 to win.")?;
        self.say("Notakto:")?;
        self.say(" - Several 3x3 boards; both players place X.")?;
        self.say(" - Three in a row kills a board. Kill the last board and you lose.")?;
        self.say("Gomoku:")?;
        self.say(" - Players alternate X and O; five in a row wins.")?;
        self.say("In a game, type `help` for the commands.")
    }

    // =========================================================================
    // I/O
    // =========================================================================

    fn say(&mut self, text: impl fmt::Display) -> Result<()> {
        writeln!(self.output, "{text}").map_err(|source| GameError::Io {
            operation: "write to the terminal".to_string(),
            source,
        })
    }

    /// Prompt and read one trimmed line. `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        let io_err = |source| GameError::Io {
            operation: "talk to the terminal".to_string(),
            source,
        };
        write!(self.output, "{prompt}").map_err(io_err)?;
        self.output.flush().map_err(io_err)?;

        let mut line = String::new();
        let read = self.input.read_line(&mut line).map_err(io_err)?;
        if read == 0 {
            debug!("end of input");
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }
}
