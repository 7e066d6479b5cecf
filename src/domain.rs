//! Domain models for the prompt library.
//!
//! This module contains the core domain types including prompts with their
//! version history, the content diff engine, categories, tags, and
//! configuration.

/// Prompt aggregate, version history, and update logic.
pub mod prompt;
pub use prompt::{HistoryError, NewPrompt, Prompt, PromptPatch, Version, VersionDataError};

/// Content fingerprints and line diffs.
pub mod diff;
pub use diff::{DiffLine, DiffSegment, SegmentKind, SideBySideDiff, diff, format_for_display};

/// Categories and tags for organizing prompts.
pub mod category;
pub use category::{Category, CategoryNode, CategoryPatch, Tag};

mod config;
pub use config::Config;

/// The in-memory collection and its operations.
pub mod library;
pub use library::{Error as LibraryError, Library, LibraryStats, SearchFilter};

/// Field validation rules shared by the domain types.
pub mod validate;
pub use validate::{Title, ValidationError};
