//! Save files.
//!
//! A save is a pretty-printed JSON document `{state, undo, redo}` named
//! `{base}_{game}_{N}x{N}_{mode}.json`. The game type is read back from the
//! name, so loading needs nothing but the file name.
//!
//! Storage goes through the [`SaveStore`] port: [`JsonDirStore`] writes to a
//! directory, [`MemoryStore`] keeps everything in memory for tests.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::constants::{
    METADATA_PREFIX, METADATA_SUFFIXES, MODE_HUMAN_VS_COMPUTER, MODE_HUMAN_VS_HUMAN, SAVE_EXTENSION,
};
use crate::error::{GameError, Result};
use crate::game::{Game, GameState};
use crate::history::History;
use crate::setup::AnyGame;
use crate::variant::{GameKind, Variant};

const NAME_PATTERN: &str = "{name}_{game}_{N}x{N}_{mode}.json";

/// The parts encoded in a save file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveName {
    pub base: String,
    pub kind: GameKind,
    pub size: usize,
    pub vs_computer: bool,
}

impl SaveName {
    /// Build a name from user input. A trailing `.json` on `base` is dropped.
    pub fn new(base: &str, kind: GameKind, size: usize, vs_computer: bool) -> Self {
        let base = base.trim();
        let base = base
            .strip_suffix(&format!(".{SAVE_EXTENSION}"))
            .unwrap_or(base);
        Self {
            base: base.to_string(),
            kind,
            size,
            vs_computer,
        }
    }

    /// Parse a file name, reading tokens from the right so the base name may
    /// itself contain underscores.
    pub fn parse(file_name: &str) -> Result<Self> {
        let malformed = || GameError::MalformedSaveName {
            name: file_name.to_string(),
            expected: NAME_PATTERN.to_string(),
        };
        let stem = file_name
            .strip_suffix(&format!(".{SAVE_EXTENSION}"))
            .ok_or_else(malformed)?;

        let mut parts = stem.rsplitn(4, '_');
        let (Some(mode), Some(dims), Some(game), Some(base)) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(malformed());
        };
        if !is_valid_base(base) {
            return Err(malformed());
        }

        let kind = GameKind::from_suffix(game).ok_or_else(|| GameError::UnknownGameType {
            token: game.to_string(),
        })?;
        let size = match dims.split_once('x') {
            Some((rows, cols)) if rows == cols => rows.parse::<usize>().map_err(|_| malformed())?,
            _ => return Err(malformed()),
        };
        let vs_computer = match mode {
            MODE_HUMAN_VS_COMPUTER => true,
            MODE_HUMAN_VS_HUMAN => false,
            _ => return Err(malformed()),
        };

        Ok(Self {
            base: base.to_string(),
            kind,
            size,
            vs_computer,
        })
    }

    pub fn file_name(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SaveName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = if self.vs_computer {
            MODE_HUMAN_VS_COMPUTER
        } else {
            MODE_HUMAN_VS_HUMAN
        };
        write!(
            f,
            "{}_{}_{}x{}_{}.{}",
            self.base,
            self.kind.suffix(),
            self.size,
            self.size,
            mode,
            SAVE_EXTENSION
        )
    }
}

/// A base name must stay a single file name inside the save directory.
fn is_valid_base(base: &str) -> bool {
    !base.is_empty() && !base.contains(['/', '\\']) && !base.contains("..")
}

/// True for JSON files that are not build or program metadata.
pub fn is_save_file(file_name: &str) -> bool {
    file_name.ends_with(&format!(".{SAVE_EXTENSION}"))
        && !METADATA_SUFFIXES.iter().any(|suffix| file_name.ends_with(suffix))
        && !file_name.starts_with(METADATA_PREFIX)
}

// =============================================================================
// Storage Port
// =============================================================================

/// Where save documents live. Keys are bare file names.
pub trait SaveStore {
    /// Store `contents` under `file_name`, replacing any previous document.
    /// Returns a human-readable location.
    fn write(&self, file_name: &str, contents: &str) -> Result<String>;

    fn read(&self, file_name: &str) -> Result<String>;

    /// Every file name in the store, unfiltered.
    fn list(&self) -> Result<Vec<String>>;
}

/// Saves as files in one directory.
#[derive(Debug, Clone)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.dir.join(file_name)
    }
}

impl SaveStore for JsonDirStore {
    fn write(&self, file_name: &str, contents: &str) -> Result<String> {
        fs::create_dir_all(&self.dir).map_err(|source| GameError::Io {
            operation: format!("create save directory {}", self.dir.display()),
            source,
        })?;
        let path = self.path(file_name);
        fs::write(&path, contents).map_err(|source| GameError::Io {
            operation: format!("write {}", path.display()),
            source,
        })?;
        Ok(path.display().to_string())
    }

    fn read(&self, file_name: &str) -> Result<String> {
        let path = self.path(file_name);
        fs::read_to_string(&path).map_err(|source| GameError::Io {
            operation: format!("read {}", path.display()),
            source,
        })
    }

    fn list(&self) -> Result<Vec<String>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(GameError::Io {
                    operation: format!("list {}", self.dir.display()),
                    source,
                });
            }
        };
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| GameError::Io {
                operation: format!("list {}", self.dir.display()),
                source,
            })?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        Ok(names)
    }
}

/// In-memory store. Clones share the same documents.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    files: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, file_name: &str, contents: &str) {
        self.files_mut().insert(file_name.to_string(), contents.to_string());
    }

    pub fn get(&self, file_name: &str) -> Option<String> {
        self.files_mut().get(file_name).cloned()
    }

    fn files_mut(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SaveStore for MemoryStore {
    fn write(&self, file_name: &str, contents: &str) -> Result<String> {
        self.insert(file_name, contents);
        Ok(format!("memory:{file_name}"))
    }

    fn read(&self, file_name: &str) -> Result<String> {
        self.get(file_name).ok_or_else(|| GameError::Io {
            operation: format!("read {file_name}"),
            source: io::Error::new(io::ErrorKind::NotFound, "no such save"),
        })
    }

    fn list(&self) -> Result<Vec<String>> {
        Ok(self.files_mut().keys().cloned().collect())
    }
}

// =============================================================================
// Save / Load
// =============================================================================

#[derive(Serialize)]
#[serde(bound = "")]
struct SavedGameRef<'a, V: Variant> {
    state: &'a GameState<V>,
    #[serde(flatten)]
    history: &'a History,
}

/// A save document as read back from storage.
#[derive(Debug, Clone, Deserialize)]
#[serde(bound = "")]
pub struct SavedGame<V: Variant> {
    pub state: GameState<V>,
    #[serde(flatten)]
    pub history: History,
}

/// Save names in `store`, metadata files excluded, sorted.
pub fn list_saves<S: SaveStore + ?Sized>(store: &S) -> Result<Vec<String>> {
    let mut names: Vec<String> = store
        .list()?
        .into_iter()
        .filter(|name| is_save_file(name))
        .collect();
    names.sort();
    Ok(names)
}

/// Save `game` under `base`; returns the file name written.
pub fn save_game<V: Variant, S: SaveStore + ?Sized>(
    store: &S,
    base: &str,
    game: &Game<V>,
) -> Result<String> {
    let state = game.state();
    let name = SaveName::new(base, V::KIND, V::board_size(&state.position), state.vs_computer);
    if !is_valid_base(&name.base) {
        return Err(GameError::MalformedSaveName {
            name: base.to_string(),
            expected: NAME_PATTERN.to_string(),
        });
    }
    let document = SavedGameRef {
        state,
        history: game.history(),
    };
    let contents = serde_json::to_string_pretty(&document)?;
    let file_name = name.file_name();
    let location = store.write(&file_name, &contents)?;
    info!(%location, undo = game.history().undo_len(), redo = game.history().redo_len(), "game saved");
    Ok(file_name)
}

/// Load the save `file_name`, dispatching on the game token in its name.
pub fn load_game<S: SaveStore + ?Sized>(store: &S, file_name: &str) -> Result<AnyGame> {
    let name = SaveName::parse(file_name)?;
    let contents = store.read(file_name)?;
    debug!(file_name, kind = ?name.kind, "loading save");
    match name.kind {
        GameKind::NumericTtt => load(&name, file_name, &contents).map(AnyGame::Numeric),
        GameKind::Notakto => load(&name, file_name, &contents).map(AnyGame::Notakto),
        GameKind::Gomoku => load(&name, file_name, &contents).map(AnyGame::Gomoku),
    }
}

fn load<V: Variant>(name: &SaveName, file_name: &str, contents: &str) -> Result<Game<V>> {
    let corrupt = |reason: String| GameError::CorruptSave {
        name: file_name.to_string(),
        reason,
    };
    let saved: SavedGame<V> = serde_json::from_str(contents).map_err(|e| corrupt(e.to_string()))?;
    saved
        .history
        .validate::<GameState<V>>()
        .map_err(|e| corrupt(format!("bad history snapshot: {e}")))?;
    let state = saved.state;

    if state.vs_computer == state.players[1].is_human() {
        return Err(corrupt("mode flag disagrees with the second player".to_string()));
    }
    if !state.players[0].is_human() {
        return Err(corrupt("the first player must be human".to_string()));
    }
    let size = V::board_size(&state.position);
    if size != name.size || state.vs_computer != name.vs_computer {
        warn!(file_name, size, "save name disagrees with its contents, trusting the contents");
    }

    Game::resume(state, saved.history)
}
