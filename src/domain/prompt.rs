//! Prompt aggregate: versioned content snapshots and the update rules.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{
    diff,
    validate::{Title, ValidationError, validate_content, validate_description},
};

const INITIAL_CHANGE_LOG: &str = "Initial version";
const UPDATE_CHANGE_LOG: &str = "Content updated";

/// A user-authored reusable text template, the root entity of the library.
///
/// A prompt owns an append-only list of immutable content snapshots
/// ([`Version`]) and a pointer to the one whose content is authoritative.
/// `content` always mirrors the pointed-at version after an update completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub(crate) id: Uuid,
    pub(crate) title: Title,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    pub(crate) content: String,
    #[serde(default)]
    pub(crate) tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) category_id: Option<Uuid>,
    pub(crate) versions: Vec<Version>,
    pub(crate) current_version: u32,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    #[serde(default)]
    pub(crate) is_favorite: bool,
}

/// An immutable, numbered snapshot of a prompt's content.
///
/// Numbers start at 1 and increase by one on every append. Snapshots hold the
/// full content, never a delta; differences are computed on demand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub(crate) id: Uuid,
    pub(crate) version: u32,
    pub(crate) content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) change_log: Option<String>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) checksum: String,
}

/// The fields required to create a prompt.
#[derive(Debug, Clone, Default)]
pub struct NewPrompt {
    /// Title of the prompt. Validated on creation.
    pub title: String,
    /// Initial content. Becomes version 1.
    pub content: String,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Tags; duplicates are dropped, keeping first occurrences.
    pub tags: Vec<String>,
    /// Optional owning category.
    pub category_id: Option<Uuid>,
    /// Initial favorite flag.
    pub is_favorite: bool,
}

/// A partial update to a prompt's mutable fields.
///
/// Neither `versions` nor `current_version` is representable here: version
/// history changes only through [`Prompt::apply_update`] appending a snapshot
/// or through the restore operations, so stale caller data cannot corrupt it.
#[derive(Debug, Clone, Default)]
pub struct PromptPatch {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement content.
    pub content: Option<String>,
    /// Replacement tag list.
    pub tags: Option<Vec<String>>,
    /// Replacement category reference; `Some(None)` clears it.
    pub category_id: Option<Option<Uuid>>,
    /// Replacement favorite flag.
    pub is_favorite: Option<bool>,
}

/// Error raised when a prompt's stored version data is unusable.
///
/// Callers fail closed on this: they render an explicit error state instead
/// of fabricating a version.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionDataError {
    /// The stored version list is empty.
    #[error("prompt {0} has no versions")]
    Empty(Uuid),
    /// The current-version pointer refers to a version that does not exist.
    #[error("prompt {id} refers to missing version {version}")]
    MissingCurrent {
        /// The prompt with the dangling pointer.
        id: Uuid,
        /// The version number the pointer holds.
        version: u32,
    },
}

/// Error raised when a history operation targets a version that does not
/// exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// No version carries the requested id.
    #[error("version id {0} not found")]
    IdNotFound(Uuid),
    /// No version carries the requested number.
    #[error("version {0} not found")]
    NumberNotFound(u32),
}

impl Prompt {
    /// Creates a prompt with its initial version (number 1).
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the title, content, or description
    /// fails the field rules.
    pub fn new(new: NewPrompt) -> Result<Self, ValidationError> {
        let NewPrompt {
            title,
            content,
            description,
            tags,
            category_id,
            is_favorite,
        } = new;

        let title = Title::new(title)?;
        validate_content(&content)?;
        if let Some(description) = &description {
            validate_description(description)?;
        }

        let now = Utc::now();
        let version = Version {
            id: Uuid::new_v4(),
            version: 1,
            checksum: diff::fingerprint(&content),
            content: content.clone(),
            change_log: Some(INITIAL_CHANGE_LOG.to_string()),
            created_at: now,
        };

        Ok(Self {
            id: Uuid::new_v4(),
            title,
            description,
            content,
            tags: dedupe_tags(tags),
            category_id,
            versions: vec![version],
            current_version: 1,
            created_at: now,
            updated_at: now,
            is_favorite,
        })
    }

    /// The prompt's stable identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The prompt's title.
    #[must_use]
    pub fn title(&self) -> &str {
        self.title.as_str()
    }

    /// The prompt's description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The content of the currently selected version.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The prompt's tags, in insertion order.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// The owning category, if any.
    #[must_use]
    pub const fn category_id(&self) -> Option<Uuid> {
        self.category_id
    }

    /// All versions, oldest first.
    #[must_use]
    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    /// The number of the currently selected version.
    #[must_use]
    pub const fn current_version(&self) -> u32 {
        self.current_version
    }

    /// When the prompt was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the prompt was last mutated.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Whether the prompt is marked as a favorite.
    #[must_use]
    pub const fn is_favorite(&self) -> bool {
        self.is_favorite
    }

    /// Looks up a version by its number.
    #[must_use]
    pub fn version(&self, number: u32) -> Option<&Version> {
        self.versions.iter().find(|v| v.version == number)
    }

    /// Looks up a version by its id.
    #[must_use]
    pub fn version_by_id(&self, id: Uuid) -> Option<&Version> {
        self.versions.iter().find(|v| v.id == id)
    }

    /// Returns the version the current-version pointer refers to.
    ///
    /// # Errors
    ///
    /// Returns a [`VersionDataError`] when the version list is empty or the
    /// pointer refers to a version that does not exist. A persisted prompt
    /// should never be in either state.
    pub fn current(&self) -> Result<&Version, VersionDataError> {
        if self.versions.is_empty() {
            return Err(VersionDataError::Empty(self.id));
        }
        self.version(self.current_version)
            .ok_or(VersionDataError::MissingCurrent {
                id: self.id,
                version: self.current_version,
            })
    }

    /// Returns `true` if saving this patch should create a new version: the
    /// patch carries content and it differs from the prompt's current
    /// content. Cosmetic edits never version.
    #[must_use]
    pub fn should_version(&self, patch: &PromptPatch) -> bool {
        patch
            .content
            .as_deref()
            .is_some_and(|content| content != self.content)
    }

    /// Applies a partial update.
    ///
    /// With `create_new_version` set, the effective content (the patch's if
    /// provided, the existing otherwise) is appended as a new version, which
    /// becomes current. Without it, content is replaced in place when the
    /// patch provides it and the version list is untouched. All other fields
    /// merge as plain overwrites, and `updated_at` is refreshed either way.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a provided field fails the field
    /// rules. Nothing is mutated on error.
    pub fn apply_update(
        &mut self,
        patch: PromptPatch,
        create_new_version: bool,
    ) -> Result<(), ValidationError> {
        let PromptPatch {
            title,
            description,
            content,
            tags,
            category_id,
            is_favorite,
        } = patch;

        let title = title.map(Title::new).transpose()?;
        if let Some(description) = &description {
            validate_description(description)?;
        }
        if let Some(content) = &content {
            validate_content(content)?;
        }

        if create_new_version {
            let next = content.unwrap_or_else(|| self.content.clone());
            self.push_version(next, UPDATE_CHANGE_LOG.to_string());
        } else if let Some(content) = content {
            self.content = content;
        }

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            self.description = Some(description);
        }
        if let Some(tags) = tags {
            self.tags = dedupe_tags(tags);
        }
        if let Some(category_id) = category_id {
            self.category_id = category_id;
        }
        if let Some(is_favorite) = is_favorite {
            self.is_favorite = is_favorite;
        }
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Re-points the current version at an existing snapshot, without
    /// appending anything. This is the restore operation the version history
    /// exposes; `content` is set to the snapshot's content.
    ///
    /// Returns the restored version number.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::IdNotFound`] if no version carries the id.
    pub fn restore(&mut self, version_id: Uuid) -> Result<u32, HistoryError> {
        let (number, content) = self
            .versions
            .iter()
            .find(|v| v.id == version_id)
            .map(|v| (v.version, v.content.clone()))
            .ok_or(HistoryError::IdNotFound(version_id))?;

        self.content = content;
        self.current_version = number;
        self.updated_at = Utc::now();
        Ok(number)
    }

    /// Appends a fresh version whose content mirrors an older one, keeping
    /// the jump in the audit trail. The new version becomes current.
    ///
    /// Returns the new version number.
    ///
    /// # Errors
    ///
    /// Returns [`HistoryError::NumberNotFound`] if no version carries the
    /// number.
    pub fn restore_as_new(&mut self, version_number: u32) -> Result<u32, HistoryError> {
        let content = self
            .version(version_number)
            .map(|v| v.content.clone())
            .ok_or(HistoryError::NumberNotFound(version_number))?;

        self.push_version(content, format!("Restored from version {version_number}"));
        Ok(self.current_version)
    }

    /// Makes an externally sourced record usable.
    ///
    /// Seeds version 1 when the history is empty, and re-points
    /// `current_version` at the newest snapshot when it matches nothing.
    /// Returns a note for each repair made.
    pub(crate) fn repair_history(&mut self) -> Vec<String> {
        let mut notes = Vec::new();

        if self.versions.is_empty() {
            self.versions.push(Version {
                id: Uuid::new_v4(),
                version: 1,
                checksum: diff::fingerprint(&self.content),
                content: self.content.clone(),
                change_log: Some(INITIAL_CHANGE_LOG.to_string()),
                created_at: self.created_at,
            });
            self.current_version = 1;
            notes.push("no versions recorded; seeded version 1".to_string());
        } else if self.version(self.current_version).is_none() {
            if let Some(last) = self.versions.last() {
                self.current_version = last.version;
                notes.push(format!("current version pointed nowhere; now {}", last.version));
            }
        }

        notes
    }

    fn push_version(&mut self, content: String, change_log: String) {
        let number = self.versions.last().map_or(0, |v| v.version) + 1;
        let version = Version {
            id: Uuid::new_v4(),
            version: number,
            checksum: diff::fingerprint(&content),
            content,
            change_log: Some(change_log),
            created_at: Utc::now(),
        };

        self.content = version.content.clone();
        self.current_version = number;
        self.versions.push(version);
        self.updated_at = Utc::now();
    }
}

impl Version {
    /// The snapshot's stable identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The snapshot's number within its prompt, starting at 1.
    #[must_use]
    pub const fn number(&self) -> u32 {
        self.version
    }

    /// The full content of the snapshot.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// The change description recorded with the snapshot, if any.
    #[must_use]
    pub fn change_log(&self) -> Option<&str> {
        self.change_log.as_deref()
    }

    /// When the snapshot was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// The content fingerprint recorded at snapshot time.
    #[must_use]
    pub fn checksum(&self) -> &str {
        &self.checksum
    }
}

fn dedupe_tags(tags: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    tags.into_iter()
        .filter(|tag| seen.insert(tag.clone()))
        .collect()
}
