//! In-memory prompt library.
//!
//! The [`Library`] knows nothing about persistence. It owns the prompt,
//! category, and tag collections, keeps the category hierarchy in a graph
//! for traversal and cycle checks, and recomputes the derived usage counters
//! after every mutation.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use chrono::Utc;
use petgraph::{algo::has_path_connecting, graphmap::DiGraphMap};
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use super::{
    category::{Category, CategoryNode, CategoryPatch, Tag},
    config::Config,
    prompt::{HistoryError, NewPrompt, Prompt, PromptPatch, VersionDataError},
    validate::{self, ValidationError},
};

/// The in-memory collection of prompts, categories, and tags.
///
/// All reads and writes go through this type. Mutating calls fully replace
/// the affected record before returning, and callers re-fetch by id through
/// [`Library::prompt`] after a mutation instead of holding on to a copy.
#[derive(Debug, Default)]
pub struct Library {
    config: Config,
    prompts: Vec<Prompt>,
    categories: Vec<Category>,
    tags: Vec<Tag>,
    /// Category hierarchy. Nodes are category ids, edges point from child to
    /// parent. Edges exist only where the parent is present in the library.
    hierarchy: DiGraphMap<Uuid, ()>,
}

/// Errors from library operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A field failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// No prompt with the requested id.
    #[error("prompt {0} not found")]
    PromptNotFound(Uuid),
    /// A version lookup failed.
    #[error(transparent)]
    History(#[from] HistoryError),
    /// A prompt's stored version data is unusable.
    #[error(transparent)]
    VersionData(#[from] VersionDataError),
    /// No category with the requested id.
    #[error("category {0} not found")]
    CategoryNotFound(Uuid),
    /// No tag with the requested name.
    #[error("tag '{0}' not found")]
    TagNotFound(String),
    /// A tag with the same case-insensitive name already exists.
    #[error("tag '{0}' already exists")]
    DuplicateTag(String),
    /// Reparenting would make a category its own ancestor.
    #[error("category {child} cannot be moved under its descendant {parent}")]
    CategoryCycle {
        /// The category being reparented.
        child: Uuid,
        /// The requested parent, which descends from `child`.
        parent: Uuid,
    },
}

/// Criteria for searching prompts. All present criteria must match.
#[derive(Debug, Clone, Default)]
pub struct SearchFilter {
    /// Case-insensitive term matched against title, content, description,
    /// and tags.
    pub term: Option<String>,
    /// Keep prompts carrying any of these tags (case-insensitive).
    pub tags: Vec<String>,
    /// Keep prompts filed under this category.
    pub category_id: Option<Uuid>,
    /// Keep only favorites.
    pub favorites_only: bool,
}

/// Aggregate statistics over the library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryStats {
    /// Total number of prompts.
    pub total_prompts: usize,
    /// How many prompts are marked favorite.
    pub favorites: usize,
    /// Prompt counts keyed by category name.
    pub by_category: BTreeMap<String, usize>,
    /// Prompt counts keyed by tag name.
    pub by_tag: BTreeMap<String, usize>,
    /// Total number of stored versions across all prompts.
    pub total_versions: usize,
}

impl Library {
    /// Creates an empty library with the given configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Rebuilds a library from persisted collections.
    ///
    /// Hierarchy edges are created only for categories whose parent exists;
    /// a category with a dangling parent reference behaves as a root. The
    /// derived counters are recomputed rather than trusted.
    #[must_use]
    pub fn from_parts(
        config: Config,
        prompts: Vec<Prompt>,
        categories: Vec<Category>,
        tags: Vec<Tag>,
    ) -> Self {
        let mut library = Self {
            config,
            prompts,
            categories,
            tags,
            hierarchy: DiGraphMap::new(),
        };

        for category in &library.categories {
            library.hierarchy.add_node(category.id);
        }
        let edges: Vec<(Uuid, Uuid)> = library
            .categories
            .iter()
            .filter_map(|c| {
                c.parent_id
                    .filter(|p| library.categories.iter().any(|other| other.id == *p))
                    .map(|p| (c.id, p))
            })
            .collect();
        for (child, parent) in edges {
            library.hierarchy.add_edge(child, parent, ());
        }

        library.refresh_counts();
        debug!(
            prompts = library.prompts.len(),
            categories = library.categories.len(),
            tags = library.tags.len(),
            "loaded library"
        );
        library
    }

    /// The library's configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// All prompts, in stored order.
    #[must_use]
    pub fn prompts(&self) -> &[Prompt] {
        &self.prompts
    }

    /// All categories, in stored order.
    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// All tags, in stored order.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Looks up the latest state of a prompt by id.
    ///
    /// Callers re-fetch through this after any mutation rather than holding
    /// a stale copy.
    #[must_use]
    pub fn prompt(&self, id: Uuid) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    /// Looks up a category by id.
    #[must_use]
    pub fn category(&self, id: Uuid) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    /// Looks up a category by name (case-insensitive).
    #[must_use]
    pub fn category_by_name(&self, name: &str) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.name.to_lowercase() == name.to_lowercase())
    }

    /// Looks up a tag by name (case-insensitive).
    #[must_use]
    pub fn tag_by_name(&self, name: &str) -> Option<&Tag> {
        self.tags
            .iter()
            .find(|t| t.name.to_lowercase() == name.to_lowercase())
    }

    /// Creates a prompt, registering any unknown tag names as tags with the
    /// configured default color.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a field fails the field rules.
    /// Nothing is mutated on error.
    pub fn create_prompt(&mut self, new: NewPrompt) -> Result<&Prompt, Error> {
        for name in &new.tags {
            validate::validate_tag_name(name)?;
        }
        let prompt = Prompt::new(new)?;

        let names = prompt.tags().to_vec();
        self.ensure_tags(&names)?;

        debug!(id = %prompt.id(), title = prompt.title(), "created prompt");
        self.prompts.push(prompt);
        self.refresh_counts();
        Ok(self.prompts.last().expect("pushed above"))
    }

    /// Applies a partial update to a prompt.
    ///
    /// `create_new_version` follows the caller's decision, normally taken
    /// via [`Prompt::should_version`]: content that differs from the current
    /// content appends a version, cosmetic edits merge in place.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PromptNotFound`] for an unknown id, or a
    /// [`ValidationError`] if a provided field fails the field rules.
    pub fn update_prompt(
        &mut self,
        id: Uuid,
        patch: PromptPatch,
        create_new_version: bool,
    ) -> Result<&Prompt, Error> {
        let index = self.index_of(id).ok_or(Error::PromptNotFound(id))?;

        if let Some(tags) = &patch.tags {
            for name in tags {
                validate::validate_tag_name(name)?;
            }
            self.ensure_tags(&tags.clone())?;
        }

        self.prompts[index].apply_update(patch, create_new_version)?;
        debug!(id = %id, versioned = create_new_version, "updated prompt");
        self.refresh_counts();
        Ok(&self.prompts[index])
    }

    /// Removes a prompt, returning it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PromptNotFound`] for an unknown id.
    pub fn delete_prompt(&mut self, id: Uuid) -> Result<Prompt, Error> {
        let index = self.index_of(id).ok_or(Error::PromptNotFound(id))?;
        let prompt = self.prompts.remove(index);
        debug!(id = %id, "deleted prompt");
        self.refresh_counts();
        Ok(prompt)
    }

    /// Flips a prompt's favorite flag, returning the new state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PromptNotFound`] for an unknown id.
    pub fn toggle_favorite(&mut self, id: Uuid) -> Result<bool, Error> {
        let index = self.index_of(id).ok_or(Error::PromptNotFound(id))?;
        let prompt = &mut self.prompts[index];
        prompt.is_favorite = !prompt.is_favorite;
        prompt.updated_at = Utc::now();
        Ok(prompt.is_favorite)
    }

    /// Re-points a prompt's current version at an existing snapshot.
    ///
    /// Returns the restored version number. The version list is untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PromptNotFound`] for an unknown prompt, or
    /// [`HistoryError::IdNotFound`] for an unknown version id.
    pub fn restore_version(&mut self, id: Uuid, version_id: Uuid) -> Result<u32, Error> {
        let index = self.index_of(id).ok_or(Error::PromptNotFound(id))?;
        let number = self.prompts[index].restore(version_id)?;
        debug!(id = %id, version = number, "restored version");
        Ok(number)
    }

    /// Appends a fresh version mirroring an older snapshot's content.
    ///
    /// Returns the new version number.
    ///
    /// # Errors
    ///
    /// Returns [`Error::PromptNotFound`] for an unknown prompt, or
    /// [`HistoryError::NumberNotFound`] for an unknown version number.
    pub fn restore_version_as_new(&mut self, id: Uuid, version_number: u32) -> Result<u32, Error> {
        let index = self.index_of(id).ok_or(Error::PromptNotFound(id))?;
        let number = self.prompts[index].restore_as_new(version_number)?;
        debug!(id = %id, version = number, "restored version as new snapshot");
        Ok(number)
    }

    /// Returns the prompts matching all criteria of the filter, in stored
    /// order.
    #[must_use]
    pub fn search(&self, filter: &SearchFilter) -> Vec<&Prompt> {
        self.prompts.iter().filter(|p| filter.matches(p)).collect()
    }

    /// Computes aggregate statistics.
    #[must_use]
    pub fn stats(&self) -> LibraryStats {
        let mut by_category = BTreeMap::new();
        let mut by_tag = BTreeMap::new();

        for prompt in &self.prompts {
            if let Some(category) = prompt.category_id.and_then(|id| self.category(id)) {
                *by_category.entry(category.name.clone()).or_insert(0) += 1;
            }
            for tag in &prompt.tags {
                *by_tag.entry(tag.clone()).or_insert(0) += 1;
            }
        }

        LibraryStats {
            total_prompts: self.prompts.len(),
            favorites: self.prompts.iter().filter(|p| p.is_favorite).count(),
            by_category,
            by_tag,
            total_versions: self.prompts.iter().map(|p| p.versions.len()).sum(),
        }
    }

    /// Creates a category. Without an explicit color the configured default
    /// is used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] if the parent does not exist, or
    /// a [`ValidationError`] if the name or color fails the field rules.
    pub fn create_category(
        &mut self,
        name: String,
        color: Option<String>,
        parent_id: Option<Uuid>,
    ) -> Result<&Category, Error> {
        if let Some(parent) = parent_id {
            self.category(parent).ok_or(Error::CategoryNotFound(parent))?;
        }

        let color = color.unwrap_or_else(|| self.config.default_category_color().to_string());
        let category = Category::new(name, color, parent_id)?;

        self.hierarchy.add_node(category.id);
        if let Some(parent) = parent_id {
            self.hierarchy.add_edge(category.id, parent, ());
        }

        debug!(id = %category.id(), name = category.name(), "created category");
        self.categories.push(category);
        Ok(self.categories.last().expect("pushed above"))
    }

    /// Applies a partial update to a category.
    ///
    /// Reparenting to the category itself or to one of its descendants is
    /// rejected, keeping the hierarchy acyclic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] for an unknown id or parent,
    /// [`Error::CategoryCycle`] for a reparent that would introduce a cycle,
    /// or a [`ValidationError`] if a provided field fails the field rules.
    pub fn update_category(&mut self, id: Uuid, patch: CategoryPatch) -> Result<&Category, Error> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(Error::CategoryNotFound(id))?;

        if let Some(name) = &patch.name {
            validate::validate_category_name(name)?;
        }
        if let Some(color) = &patch.color {
            validate::validate_color(color)?;
        }

        if let Some(new_parent) = patch.parent_id {
            if let Some(parent) = new_parent {
                self.category(parent).ok_or(Error::CategoryNotFound(parent))?;
                if parent == id || has_path_connecting(&self.hierarchy, parent, id, None) {
                    return Err(Error::CategoryCycle { child: id, parent });
                }
            }

            if let Some(old_parent) = self.categories[index].parent_id {
                self.hierarchy.remove_edge(id, old_parent);
            }
            if let Some(parent) = new_parent {
                self.hierarchy.add_edge(id, parent, ());
            }
            self.categories[index].parent_id = new_parent;
        }

        let category = &mut self.categories[index];
        if let Some(name) = patch.name {
            category.name = name;
        }
        if let Some(description) = patch.description {
            category.description = Some(description);
        }
        if let Some(color) = patch.color {
            category.color = color;
        }
        if let Some(order) = patch.order {
            category.order = order;
        }
        Ok(&self.categories[index])
    }

    /// Removes a category. Its children are reparented to its parent and
    /// member prompts become uncategorized.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] for an unknown id.
    pub fn delete_category(&mut self, id: Uuid) -> Result<Category, Error> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == id)
            .ok_or(Error::CategoryNotFound(id))?;
        let parent = self.categories[index].parent_id;

        for category in &mut self.categories {
            if category.parent_id == Some(id) {
                category.parent_id = parent;
            }
        }
        let reparented: Vec<Uuid> = self
            .hierarchy
            .neighbors_directed(id, petgraph::Direction::Incoming)
            .collect();
        for child in reparented {
            self.hierarchy.remove_edge(child, id);
            if let Some(parent) = parent {
                self.hierarchy.add_edge(child, parent, ());
            }
        }

        self.uncategorize(&[id]);
        self.hierarchy.remove_node(id);
        let category = self.categories.remove(index);
        debug!(id = %id, "deleted category");
        self.refresh_counts();
        Ok(category)
    }

    /// Removes a category together with all of its descendants. Member
    /// prompts of every removed category become uncategorized.
    ///
    /// Returns the removed categories, the target first.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] for an unknown id.
    pub fn delete_category_recursive(&mut self, id: Uuid) -> Result<Vec<Category>, Error> {
        if self.category(id).is_none() {
            return Err(Error::CategoryNotFound(id));
        }

        let mut doomed = vec![id];
        let mut queue = VecDeque::from([id]);
        let mut seen: HashSet<Uuid> = HashSet::from([id]);
        while let Some(current) = queue.pop_front() {
            for child in self
                .hierarchy
                .neighbors_directed(current, petgraph::Direction::Incoming)
            {
                if seen.insert(child) {
                    doomed.push(child);
                    queue.push_back(child);
                }
            }
        }

        self.uncategorize(&doomed);
        let mut removed = Vec::with_capacity(doomed.len());
        for target in &doomed {
            self.hierarchy.remove_node(*target);
            if let Some(index) = self.categories.iter().position(|c| c.id == *target) {
                removed.push(self.categories.remove(index));
            }
        }

        debug!(id = %id, count = removed.len(), "deleted category subtree");
        self.refresh_counts();
        Ok(removed)
    }

    /// Builds the category tree: roots with nested children, each level
    /// ordered by `order` then name. A category whose parent is missing
    /// behaves as a root.
    #[must_use]
    pub fn category_tree(&self) -> Vec<CategoryNode> {
        let mut visited = HashSet::new();
        self.build_nodes(None, &mut visited)
    }

    /// Returns the names along the path from a root to the category.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CategoryNotFound`] for an unknown id.
    pub fn category_path(&self, id: Uuid) -> Result<Vec<String>, Error> {
        let mut names = Vec::new();
        let mut seen = HashSet::new();
        let mut cursor = Some(id);

        while let Some(current) = cursor {
            if !seen.insert(current) {
                break;
            }
            let category = self
                .category(current)
                .ok_or(Error::CategoryNotFound(current))?;
            names.push(category.name.clone());
            cursor = category.parent_id.filter(|p| self.category(*p).is_some());
        }

        names.reverse();
        Ok(names)
    }

    /// Creates a tag. Without an explicit color the configured default is
    /// used.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateTag`] if a tag with the same
    /// case-insensitive name exists, or a [`ValidationError`] if the name or
    /// color fails the field rules.
    pub fn create_tag(&mut self, name: String, color: Option<String>) -> Result<&Tag, Error> {
        if self.tag_by_name(&name).is_some() {
            return Err(Error::DuplicateTag(name));
        }

        let color = color.unwrap_or_else(|| self.config.default_tag_color().to_string());
        let tag = Tag::new(name, color)?;
        debug!(id = %tag.id(), name = tag.name(), "created tag");
        self.tags.push(tag);
        Ok(self.tags.last().expect("pushed above"))
    }

    /// Returns the tag with the given name, creating it with the configured
    /// default color if absent.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a tag has to be created and the name
    /// fails the field rules.
    pub fn find_or_create_tag(&mut self, name: &str) -> Result<&Tag, Error> {
        if let Some(index) = self
            .tags
            .iter()
            .position(|t| t.name.to_lowercase() == name.to_lowercase())
        {
            return Ok(&self.tags[index]);
        }

        let color = self.config.default_tag_color().to_string();
        let tag = Tag::new(name.to_string(), color)?;
        debug!(id = %tag.id(), name = tag.name(), "registered tag");
        self.tags.push(tag);
        Ok(self.tags.last().expect("pushed above"))
    }

    /// Renames or recolors a tag. A rename is propagated to every prompt
    /// carrying the old name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagNotFound`] for an unknown name,
    /// [`Error::DuplicateTag`] if the new name collides case-insensitively
    /// with another tag, or a [`ValidationError`] if a provided field fails
    /// the field rules.
    pub fn update_tag(
        &mut self,
        name: &str,
        new_name: Option<String>,
        color: Option<String>,
    ) -> Result<&Tag, Error> {
        let index = self
            .tags
            .iter()
            .position(|t| t.name.to_lowercase() == name.to_lowercase())
            .ok_or_else(|| Error::TagNotFound(name.to_string()))?;

        if let Some(new_name) = &new_name {
            validate::validate_tag_name(new_name)?;
            let collides = self
                .tags
                .iter()
                .enumerate()
                .any(|(i, t)| i != index && t.name.to_lowercase() == new_name.to_lowercase());
            if collides {
                return Err(Error::DuplicateTag(new_name.clone()));
            }
        }
        if let Some(color) = &color {
            validate::validate_color(color)?;
        }

        if let Some(new_name) = new_name {
            let old_name = self.tags[index].name.clone();
            for prompt in &mut self.prompts {
                for tag in &mut prompt.tags {
                    if tag.to_lowercase() == old_name.to_lowercase() {
                        tag.clone_from(&new_name);
                    }
                }
            }
            self.tags[index].name = new_name;
        }
        if let Some(color) = color {
            self.tags[index].color = color;
        }

        self.refresh_counts();
        Ok(&self.tags[index])
    }

    /// Removes a tag and strips its name from every prompt's tag list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TagNotFound`] for an unknown name.
    pub fn delete_tag(&mut self, name: &str) -> Result<Tag, Error> {
        let index = self
            .tags
            .iter()
            .position(|t| t.name.to_lowercase() == name.to_lowercase())
            .ok_or_else(|| Error::TagNotFound(name.to_string()))?;

        let tag = self.tags.remove(index);
        for prompt in &mut self.prompts {
            prompt
                .tags
                .retain(|t| t.to_lowercase() != tag.name.to_lowercase());
        }
        debug!(name = tag.name(), "deleted tag");
        self.refresh_counts();
        Ok(tag)
    }

    /// Inserts an already-validated prompt record, keeping its id and
    /// version history as-is. Used by the importer.
    pub(crate) fn insert_prompt_record(&mut self, prompt: Prompt) {
        self.prompts.push(prompt);
    }

    /// Inserts an already-validated category record, keeping its id.
    pub(crate) fn insert_category_record(&mut self, category: Category) {
        self.hierarchy.add_node(category.id);
        if let Some(parent) = category
            .parent_id
            .filter(|p| self.categories.iter().any(|c| c.id == *p))
        {
            self.hierarchy.add_edge(category.id, parent, ());
        }
        self.categories.push(category);
    }

    /// Inserts an already-validated tag record, keeping its id.
    pub(crate) fn insert_tag_record(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    /// Recomputes the derived per-category and per-tag counters.
    pub(crate) fn refresh_counts(&mut self) {
        let mut by_category: HashMap<Uuid, u32> = HashMap::new();
        let mut by_tag: HashMap<String, u32> = HashMap::new();

        for prompt in &self.prompts {
            if let Some(category) = prompt.category_id {
                *by_category.entry(category).or_default() += 1;
            }
            for tag in &prompt.tags {
                *by_tag.entry(tag.to_lowercase()).or_default() += 1;
            }
        }

        for category in &mut self.categories {
            category.prompt_count = by_category.get(&category.id).copied().unwrap_or(0);
        }
        for tag in &mut self.tags {
            tag.usage_count = by_tag.get(&tag.name.to_lowercase()).copied().unwrap_or(0);
        }
    }

    fn index_of(&self, id: Uuid) -> Option<usize> {
        self.prompts.iter().position(|p| p.id == id)
    }

    fn ensure_tags(&mut self, names: &[String]) -> Result<(), Error> {
        for name in names {
            self.find_or_create_tag(name)?;
        }
        Ok(())
    }

    fn uncategorize(&mut self, category_ids: &[Uuid]) {
        for prompt in &mut self.prompts {
            if let Some(current) = prompt.category_id {
                if category_ids.contains(&current) {
                    prompt.category_id = None;
                    prompt.updated_at = Utc::now();
                }
            }
        }
    }

    fn build_nodes(&self, parent: Option<Uuid>, visited: &mut HashSet<Uuid>) -> Vec<CategoryNode> {
        let mut level: Vec<&Category> = self
            .categories
            .iter()
            .filter(|c| {
                let effective = c.parent_id.filter(|p| self.category(*p).is_some());
                effective == parent && !visited.contains(&c.id)
            })
            .collect();
        level.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));

        level
            .into_iter()
            .map(|category| {
                visited.insert(category.id);
                CategoryNode {
                    category: category.clone(),
                    children: self.build_nodes(Some(category.id), visited),
                }
            })
            .collect()
    }
}

impl SearchFilter {
    /// Returns `true` if the prompt satisfies every present criterion.
    #[must_use]
    pub fn matches(&self, prompt: &Prompt) -> bool {
        if let Some(term) = &self.term {
            let term = term.to_lowercase();
            let in_title = prompt.title().to_lowercase().contains(&term);
            let in_content = prompt.content().to_lowercase().contains(&term);
            let in_description = prompt
                .description()
                .is_some_and(|d| d.to_lowercase().contains(&term));
            let in_tags = prompt
                .tags()
                .iter()
                .any(|t| t.to_lowercase().contains(&term));
            if !(in_title || in_content || in_description || in_tags) {
                return false;
            }
        }

        if !self.tags.is_empty() {
            let any = self.tags.iter().any(|wanted| {
                prompt
                    .tags()
                    .iter()
                    .any(|t| t.to_lowercase() == wanted.to_lowercase())
            });
            if !any {
                return false;
            }
        }

        if let Some(category) = self.category_id {
            if prompt.category_id() != Some(category) {
                return false;
            }
        }

        if self.favorites_only && !prompt.is_favorite() {
            return false;
        }

        true
    }
}
