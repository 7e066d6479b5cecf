//! Local-first Prompt Management
//!
//! Prompts are versioned text snippets stored as JSON snapshots in a
//! directory.

pub mod domain;
pub use domain::{
    Config, Library, LibraryError, NewPrompt, Prompt, PromptPatch, SearchFilter, Tag,
};

/// Filesystem persistence, import, and export for the library.
pub mod storage;
pub use storage::{JsonPort, MemoryPort, PersistedState, PromptStore, StatePort};
