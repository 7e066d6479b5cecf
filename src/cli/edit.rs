use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use promptlib::PromptPatch;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Edit a prompt's fields")]
pub struct Edit {
    /// The prompt to edit (id, unique id prefix, or title)
    prompt: String,

    /// Replacement title
    #[arg(long)]
    title: Option<String>,

    /// Replacement description
    #[arg(long)]
    description: Option<String>,

    /// Replacement content
    #[arg(long, conflicts_with = "file")]
    content: Option<String>,

    /// Read the replacement content from a file
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Replace the tag list (repeatable, comma-separated accepted)
    #[arg(long = "tag", value_name = "TAG", value_delimiter = ',', conflicts_with = "clear_tags")]
    tags: Vec<String>,

    /// Remove every tag
    #[arg(long)]
    clear_tags: bool,

    /// Move the prompt to a category
    #[arg(long, value_name = "NAME", conflicts_with = "no_category")]
    category: Option<String>,

    /// Remove the prompt from its category
    #[arg(long)]
    no_category: bool,

    /// Set the favorite flag
    #[arg(long, value_name = "BOOL")]
    favorite: Option<bool>,

    /// Do not record a new version even if the content changed
    #[arg(long)]
    no_version: bool,
}

impl Edit {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let content = match self.file {
            Some(path) => Some(
                std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read {}", path.display()))?,
            ),
            None => self.content,
        };

        let tags = if self.clear_tags {
            Some(Vec::new())
        } else if self.tags.is_empty() {
            None
        } else {
            Some(self.tags)
        };

        let mut store = super::open_store(&root)?;
        let id = super::resolve_prompt(store.library(), &self.prompt)?;

        let category_id = if self.no_category {
            Some(None)
        } else {
            match self.category {
                Some(name) => Some(Some(super::resolve_category(store.library(), &name)?)),
                None => None,
            }
        };

        let patch = PromptPatch {
            title: self.title,
            description: self.description,
            content,
            tags,
            category_id,
            is_favorite: self.favorite,
        };

        if patch.title.is_none()
            && patch.description.is_none()
            && patch.content.is_none()
            && patch.tags.is_none()
            && patch.category_id.is_none()
            && patch.is_favorite.is_none()
        {
            anyhow::bail!("nothing to change; pass at least one field option");
        }

        let (before, create_version) = {
            let prompt = store.library().prompt(id).expect("resolved above");
            (
                prompt.current_version(),
                !self.no_version && prompt.should_version(&patch),
            )
        };
        let updated = store.update_prompt(id, patch, create_version)?;

        if updated.current_version() == before {
            println!("Updated '{}'", updated.title());
        } else {
            println!(
                "Updated '{}'; content recorded as version {}",
                updated.title(),
                updated.current_version()
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use promptlib::NewPrompt;
    use tempfile::tempdir;
    use uuid::Uuid;

    use super::*;

    fn edit(key: &str) -> Edit {
        Edit {
            prompt: key.to_string(),
            title: None,
            description: None,
            content: None,
            file: None,
            tags: Vec::new(),
            clear_tags: false,
            category: None,
            no_category: false,
            favorite: None,
            no_version: false,
        }
    }

    fn seed(root: &std::path::Path) -> Uuid {
        let mut store = super::super::open_store(root).unwrap();
        store
            .create_prompt(NewPrompt {
                title: "Draft".to_string(),
                content: "first".to_string(),
                ..NewPrompt::default()
            })
            .unwrap()
            .id()
    }

    #[test]
    fn edit_run_versions_changed_content() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let id = seed(&root);

        let mut command = edit("Draft");
        command.content = Some("second".to_string());
        command.run(root.clone()).expect("edit should succeed");

        let store = super::super::open_store(&root).unwrap();
        let prompt = store.library().prompt(id).unwrap();
        assert_eq!(prompt.current_version(), 2);
        assert_eq!(prompt.content(), "second");
    }

    #[test]
    fn edit_run_title_only_does_not_version() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let id = seed(&root);

        let mut command = edit("Draft");
        command.title = Some("Renamed".to_string());
        command.run(root.clone()).expect("edit should succeed");

        let store = super::super::open_store(&root).unwrap();
        let prompt = store.library().prompt(id).unwrap();
        assert_eq!(prompt.title(), "Renamed");
        assert_eq!(prompt.current_version(), 1);
        assert_eq!(prompt.versions().len(), 1);
    }

    #[test]
    fn edit_run_rejects_an_empty_patch() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        seed(&root);

        let err = edit("Draft").run(root).unwrap_err();
        assert!(err.to_string().contains("nothing to change"));
    }
}
