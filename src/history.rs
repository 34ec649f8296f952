//! Undo/redo history built on serialized snapshots.
//!
//! The manager never holds a live alias of the game: a [`Snapshot`] is a
//! detached JSON document of the bare state, and restoring one always
//! deserializes a fresh copy. Snapshots never contain history themselves;
//! only the top-level save document carries the two stacks.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::Result;

/// Immutable serialized copy of a game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot(serde_json::Value);

impl Snapshot {
    pub fn capture<T: Serialize>(state: &T) -> Result<Self> {
        Ok(Snapshot(serde_json::to_value(state)?))
    }

    pub fn restore<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(T::deserialize(&self.0)?)
    }
}

/// Two stacks of snapshots. The top of `undo` is always the live state and
/// its bottom is the initial state, which is never popped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default)]
    undo: Vec<Snapshot>,
    #[serde(default)]
    redo: Vec<Snapshot>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    /// Push the state reached by a new ply. Clears the redo stack.
    pub fn snapshot<T: Serialize>(&mut self, state: &T) -> Result<()> {
        self.undo.push(Snapshot::capture(state)?);
        if !self.redo.is_empty() {
            debug!(dropped = self.redo.len(), "redo stack cleared");
            self.redo.clear();
        }
        Ok(())
    }

    /// Move the live snapshot onto the redo stack and return the state under
    /// it. `None` when only the initial state is left.
    pub fn undo<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let len = self.undo.len();
        if len < 2 {
            return Ok(None);
        }
        let restored = self.undo[len - 2].restore()?;
        if let Some(top) = self.undo.pop() {
            self.redo.push(top);
        }
        Ok(Some(restored))
    }

    /// Move the latest undone snapshot back onto the undo stack and return it.
    /// `None` when nothing has been undone.
    pub fn redo<T: DeserializeOwned>(&mut self) -> Result<Option<T>> {
        let Some(top) = self.redo.last() else {
            return Ok(None);
        };
        let restored = top.restore()?;
        if let Some(top) = self.redo.pop() {
            self.undo.push(top);
        }
        Ok(Some(restored))
    }

    /// Restore the live (top) snapshot.
    pub fn current<T: DeserializeOwned>(&self) -> Result<Option<T>> {
        self.undo.last().map(|snapshot| snapshot.restore()).transpose()
    }

    /// Restore every snapshot on both stacks as `T`, failing on the first
    /// one that does not deserialize.
    pub fn validate<T: DeserializeOwned>(&self) -> Result<()> {
        for snapshot in self.undo.iter().chain(&self.redo) {
            snapshot.restore::<T>()?;
        }
        Ok(())
    }

    pub fn can_undo(&self) -> bool {
        self.undo.len() >= 2
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Make the top of the undo stack equal `live`. A history loaded from
    /// disk may be empty or out of step with its state; the live state is
    /// then pushed and the redo chain dropped. Returns whether anything changed.
    pub fn repair<T: Serialize>(&mut self, live: &T) -> Result<bool> {
        let live = Snapshot::capture(live)?;
        if self.undo.last() == Some(&live) {
            return Ok(false);
        }
        warn!(
            undo = self.undo.len(),
            redo = self.redo.len(),
            "history out of step with live state, re-seeding"
        );
        self.undo.push(live);
        self.redo.clear();
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Counter {
        value: u32,
    }

    fn history_with(values: &[u32]) -> History {
        let mut history = History::new();
        for &value in values {
            history.snapshot(&Counter { value }).unwrap();
        }
        history
    }

    #[test]
    fn test_undo_peeks_new_top() {
        let mut history = history_with(&[0, 1, 2]);
        let restored: Counter = history.undo().unwrap().unwrap();
        assert_eq!(restored, Counter { value: 1 });
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.redo_len(), 1);
        let top: Counter = history.current().unwrap().unwrap();
        assert_eq!(top, restored, "undo stack top must equal the live state");
    }

    #[test]
    fn test_undo_keeps_initial_state() {
        let mut history = history_with(&[0]);
        assert!(history.undo::<Counter>().unwrap().is_none());
        assert_eq!(history.undo_len(), 1);
        assert!(!history.can_undo());
    }

    #[test]
    fn test_redo_after_undo() {
        let mut history = history_with(&[0, 1]);
        history.undo::<Counter>().unwrap();
        let redone: Counter = history.redo().unwrap().unwrap();
        assert_eq!(redone, Counter { value: 1 });
        assert!(history.redo::<Counter>().unwrap().is_none());
    }

    #[test]
    fn test_snapshot_clears_redo() {
        let mut history = history_with(&[0, 1, 2]);
        history.undo::<Counter>().unwrap();
        assert!(history.can_redo());
        history.snapshot(&Counter { value: 7 }).unwrap();
        assert!(!history.can_redo());
        let top: Counter = history.current().unwrap().unwrap();
        assert_eq!(top.value, 7);
    }

    #[test]
    fn test_failed_restore_leaves_stacks_alone() {
        let mut history = History::new();
        history.snapshot(&"not a counter").unwrap();
        history.snapshot(&Counter { value: 1 }).unwrap();
        assert!(history.undo::<Counter>().is_err());
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.redo_len(), 0);
    }

    #[test]
    fn test_validate_finds_bad_redo_entry() {
        let mut history = history_with(&[0, 1]);
        assert!(history.validate::<Counter>().is_ok());
        history.undo::<Counter>().unwrap();
        history.redo.push(Snapshot::capture(&"broken").unwrap());
        assert!(history.validate::<Counter>().is_err());
    }

    #[test]
    fn test_repair_seeds_empty_history() {
        let mut history = History::new();
        assert!(history.repair(&Counter { value: 3 }).unwrap());
        assert!(!history.repair(&Counter { value: 3 }).unwrap());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_repair_drops_stale_redo() {
        let mut history = history_with(&[0, 1]);
        history.undo::<Counter>().unwrap();
        assert!(history.repair(&Counter { value: 9 }).unwrap());
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 2);
    }
}
