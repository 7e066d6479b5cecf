//! The persistent prompt store.
//!
//! [`PromptStore`] couples a [`Library`] to a [`StatePort`] and writes a full
//! snapshot after every completed mutation, so the persisted state always
//! reflects the last operation. [`JsonPort`] is the production port: two JSON
//! files under a root directory, replaced via temp file and rename.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::{
    import::{self, ImportError, ImportReport},
    snapshot::{PersistedState, PortError, StatePort},
};
use crate::domain::{
    Category, CategoryPatch, Config, Library, LibraryError, NewPrompt, Prompt, PromptPatch, Tag,
};

const PROMPTS_FILE: &str = "prompts.json";
const CATEGORIES_FILE: &str = "categories.json";

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The in-memory operation failed. Nothing was persisted.
    #[error(transparent)]
    Library(#[from] LibraryError),
    /// The snapshot could not be loaded or saved.
    #[error(transparent)]
    Port(#[from] PortError),
    /// The import payload could not be understood at the top level.
    #[error(transparent)]
    Import(#[from] ImportError),
}

/// A library bound to a persistence port.
#[derive(Debug)]
pub struct PromptStore<P> {
    library: Library,
    port: P,
}

impl<P: StatePort> PromptStore<P> {
    /// Opens the store, loading the persisted snapshot if one exists.
    ///
    /// # Errors
    ///
    /// Returns a [`PortError`] if a snapshot exists but cannot be read or
    /// parsed.
    pub fn open(port: P, config: Config) -> Result<Self, StoreError> {
        let library = match port.load()? {
            Some(state) => {
                Library::from_parts(config, state.prompts, state.categories, state.tags)
            }
            None => Library::new(config),
        };
        Ok(Self { library, port })
    }

    /// Read access to the library.
    #[must_use]
    pub const fn library(&self) -> &Library {
        &self.library
    }

    /// The underlying port.
    #[must_use]
    pub const fn port(&self) -> &P {
        &self.port
    }

    /// Creates a prompt and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on validation failure, or a [`PortError`]
    /// if the snapshot cannot be written.
    pub fn create_prompt(&mut self, new: NewPrompt) -> Result<Prompt, StoreError> {
        let prompt = self.library.create_prompt(new)?.clone();
        self.persist()?;
        Ok(prompt)
    }

    /// Applies a partial update to a prompt and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown id or validation failure, or
    /// a [`PortError`] if the snapshot cannot be written.
    pub fn update_prompt(
        &mut self,
        id: Uuid,
        patch: PromptPatch,
        create_new_version: bool,
    ) -> Result<Prompt, StoreError> {
        let prompt = self
            .library
            .update_prompt(id, patch, create_new_version)?
            .clone();
        self.persist()?;
        Ok(prompt)
    }

    /// Deletes a prompt and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown id, or a [`PortError`] if the
    /// snapshot cannot be written.
    pub fn delete_prompt(&mut self, id: Uuid) -> Result<Prompt, StoreError> {
        let prompt = self.library.delete_prompt(id)?;
        self.persist()?;
        Ok(prompt)
    }

    /// Flips a prompt's favorite flag and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown id, or a [`PortError`] if the
    /// snapshot cannot be written.
    pub fn toggle_favorite(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let state = self.library.toggle_favorite(id)?;
        self.persist()?;
        Ok(state)
    }

    /// Re-points a prompt at an existing version and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown prompt or version id, or a
    /// [`PortError`] if the snapshot cannot be written.
    pub fn restore_version(&mut self, id: Uuid, version_id: Uuid) -> Result<u32, StoreError> {
        let number = self.library.restore_version(id, version_id)?;
        self.persist()?;
        Ok(number)
    }

    /// Appends a fresh version mirroring an older snapshot and persists the
    /// result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown prompt or version number, or
    /// a [`PortError`] if the snapshot cannot be written.
    pub fn restore_version_as_new(
        &mut self,
        id: Uuid,
        version_number: u32,
    ) -> Result<u32, StoreError> {
        let number = self.library.restore_version_as_new(id, version_number)?;
        self.persist()?;
        Ok(number)
    }

    /// Creates a category and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown parent or validation failure,
    /// or a [`PortError`] if the snapshot cannot be written.
    pub fn create_category(
        &mut self,
        name: String,
        color: Option<String>,
        parent_id: Option<Uuid>,
    ) -> Result<Category, StoreError> {
        let category = self.library.create_category(name, color, parent_id)?.clone();
        self.persist()?;
        Ok(category)
    }

    /// Applies a partial update to a category and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown id, a rejected reparent, or
    /// validation failure, or a [`PortError`] if the snapshot cannot be
    /// written.
    pub fn update_category(
        &mut self,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<Category, StoreError> {
        let category = self.library.update_category(id, patch)?.clone();
        self.persist()?;
        Ok(category)
    }

    /// Deletes a category and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown id, or a [`PortError`] if the
    /// snapshot cannot be written.
    pub fn delete_category(&mut self, id: Uuid) -> Result<Category, StoreError> {
        let category = self.library.delete_category(id)?;
        self.persist()?;
        Ok(category)
    }

    /// Deletes a category subtree and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown id, or a [`PortError`] if the
    /// snapshot cannot be written.
    pub fn delete_category_recursive(&mut self, id: Uuid) -> Result<Vec<Category>, StoreError> {
        let removed = self.library.delete_category_recursive(id)?;
        self.persist()?;
        Ok(removed)
    }

    /// Creates a tag and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on a duplicate name or validation failure,
    /// or a [`PortError`] if the snapshot cannot be written.
    pub fn create_tag(&mut self, name: String, color: Option<String>) -> Result<Tag, StoreError> {
        let tag = self.library.create_tag(name, color)?.clone();
        self.persist()?;
        Ok(tag)
    }

    /// Renames or recolors a tag and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown name, a duplicate new name,
    /// or validation failure, or a [`PortError`] if the snapshot cannot be
    /// written.
    pub fn update_tag(
        &mut self,
        name: &str,
        new_name: Option<String>,
        color: Option<String>,
    ) -> Result<Tag, StoreError> {
        let tag = self.library.update_tag(name, new_name, color)?.clone();
        self.persist()?;
        Ok(tag)
    }

    /// Deletes a tag and persists the result.
    ///
    /// # Errors
    ///
    /// Returns the library error on an unknown name, or a [`PortError`] if
    /// the snapshot cannot be written.
    pub fn delete_tag(&mut self, name: &str) -> Result<Tag, StoreError> {
        let tag = self.library.delete_tag(name)?;
        self.persist()?;
        Ok(tag)
    }

    /// Imports previously exported JSON and persists the merged result.
    ///
    /// Item-level problems are collected into the report; only a payload
    /// that cannot be understood at the top level is an error, and in that
    /// case nothing is mutated or persisted.
    ///
    /// # Errors
    ///
    /// Returns an [`ImportError`] for an unusable payload, or a
    /// [`PortError`] if the snapshot cannot be written.
    pub fn import(&mut self, text: &str) -> Result<ImportReport, StoreError> {
        let report = import::import_json(&mut self.library, text)?;
        self.persist()?;
        Ok(report)
    }

    fn persist(&self) -> Result<(), StoreError> {
        let state = PersistedState {
            prompts: self.library.prompts().to_vec(),
            categories: self.library.categories().to_vec(),
            tags: self.library.tags().to_vec(),
        };
        self.port.save(&state)?;
        Ok(())
    }
}

/// Snapshot files on disk.
///
/// `prompts.json` holds `{"state": {"prompts": […]}}` and `categories.json`
/// holds `{"state": {"categories": […], "tags": […]}}`, both under the root
/// directory. Files are replaced by writing a temp file and renaming it over
/// the target.
#[derive(Debug, Clone)]
pub struct JsonPort {
    root: PathBuf,
    pretty: bool,
}

#[derive(Debug, Default, Deserialize)]
struct PromptsFile {
    #[serde(default)]
    state: PromptsState,
}

#[derive(Debug, Default, Deserialize)]
struct PromptsState {
    #[serde(default)]
    prompts: Vec<Prompt>,
}

#[derive(Debug, Default, Deserialize)]
struct CategoriesFile {
    #[serde(default)]
    state: CatalogState,
}

#[derive(Debug, Default, Deserialize)]
struct CatalogState {
    #[serde(default)]
    categories: Vec<Category>,
    #[serde(default)]
    tags: Vec<Tag>,
}

impl JsonPort {
    /// Creates a port rooted at the given directory.
    pub fn new(root: impl Into<PathBuf>, pretty: bool) -> Self {
        Self {
            root: root.into(),
            pretty,
        }
    }

    fn prompts_path(&self) -> PathBuf {
        self.root.join(PROMPTS_FILE)
    }

    fn categories_path(&self) -> PathBuf {
        self.root.join(CATEGORIES_FILE)
    }

    fn read_file<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PortError> {
        match fs::read_to_string(path) {
            Ok(text) => serde_json::from_str(&text)
                .map(Some)
                .map_err(|source| PortError::Malformed {
                    path: path.to_path_buf(),
                    source,
                }),
            Err(source) if source.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(PortError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    fn write_file<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), PortError> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, text).map_err(|source| PortError::Write {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| PortError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl StatePort for JsonPort {
    fn load(&self) -> Result<Option<PersistedState>, PortError> {
        let prompts: Option<PromptsFile> = Self::read_file(&self.prompts_path())?;
        let catalog: Option<CategoriesFile> = Self::read_file(&self.categories_path())?;

        if prompts.is_none() && catalog.is_none() {
            return Ok(None);
        }

        let prompts = prompts.unwrap_or_default();
        let catalog = catalog.unwrap_or_default();
        Ok(Some(PersistedState {
            prompts: prompts.state.prompts,
            categories: catalog.state.categories,
            tags: catalog.state.tags,
        }))
    }

    fn save(&self, state: &PersistedState) -> Result<(), PortError> {
        fs::create_dir_all(&self.root).map_err(|source| PortError::Write {
            path: self.root.clone(),
            source,
        })?;

        let prompts = serde_json::json!({ "state": { "prompts": &state.prompts } });
        self.write_file(&self.prompts_path(), &prompts)?;

        let catalog = serde_json::json!({
            "state": { "categories": &state.categories, "tags": &state.tags }
        });
        self.write_file(&self.categories_path(), &catalog)?;

        debug!(root = %self.root.display(), "saved snapshot");
        Ok(())
    }
}
