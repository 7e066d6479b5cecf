//! Library snapshots and the port they are persisted through.
//!
//! A [`PersistedState`] is a full copy of the library's collections. Ports
//! replace the whole snapshot on every save; there is no incremental write.

use std::{
    cell::{Cell, RefCell},
    io,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{Category, Prompt, Tag};

/// One full snapshot of the library's collections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedState {
    /// All prompts.
    #[serde(default)]
    pub prompts: Vec<Prompt>,
    /// All categories.
    #[serde(default)]
    pub categories: Vec<Category>,
    /// All tags.
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// Errors raised by a [`StatePort`].
#[derive(Debug, Error)]
pub enum PortError {
    /// A snapshot file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// A snapshot file could not be written.
    #[error("failed to write {path}: {source}")]
    Write {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        source: io::Error,
    },
    /// A snapshot file exists but does not parse.
    #[error("malformed snapshot {path}: {source}")]
    Malformed {
        /// The file that failed.
        path: PathBuf,
        /// The underlying parse error.
        source: serde_json::Error,
    },
    /// A snapshot could not be encoded.
    #[error("failed to encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Reads and writes library snapshots.
///
/// `load` returning `Ok(None)` means nothing has been persisted yet and the
/// caller starts from an empty library.
pub trait StatePort {
    /// Reads the most recent snapshot, if any.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a snapshot exists but cannot be read or
    /// parsed.
    fn load(&self) -> Result<Option<PersistedState>, PortError>;

    /// Replaces the persisted snapshot.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if the snapshot cannot be encoded or written.
    fn save(&self, state: &PersistedState) -> Result<(), PortError>;
}

/// An in-memory port for tests and ephemeral libraries.
#[derive(Debug, Default)]
pub struct MemoryPort {
    state: RefCell<Option<PersistedState>>,
    saves: Cell<usize>,
}

impl MemoryPort {
    /// Creates an empty port.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a port pre-loaded with a snapshot.
    #[must_use]
    pub fn with_state(state: PersistedState) -> Self {
        Self {
            state: RefCell::new(Some(state)),
            saves: Cell::new(0),
        }
    }

    /// How many times [`StatePort::save`] has been called.
    #[must_use]
    pub fn saves(&self) -> usize {
        self.saves.get()
    }

    /// The last saved snapshot, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<PersistedState> {
        self.state.borrow().clone()
    }
}

impl StatePort for MemoryPort {
    fn load(&self) -> Result<Option<PersistedState>, PortError> {
        Ok(self.state.borrow().clone())
    }

    fn save(&self, state: &PersistedState) -> Result<(), PortError> {
        *self.state.borrow_mut() = Some(state.clone());
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_port_loads_nothing() {
        let port = MemoryPort::new();
        assert_eq!(port.load().unwrap(), None);
        assert_eq!(port.saves(), 0);
    }

    #[test]
    fn saved_state_round_trips() {
        let port = MemoryPort::new();
        let state = PersistedState::default();

        port.save(&state).unwrap();

        assert_eq!(port.load().unwrap(), Some(state));
        assert_eq!(port.saves(), 1);
    }

    #[test]
    fn preloaded_state_is_visible() {
        let port = MemoryPort::with_state(PersistedState::default());
        assert!(port.load().unwrap().is_some());
    }
}
