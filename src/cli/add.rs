use std::{
    io::{IsTerminal, Read},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use promptlib::NewPrompt;
use tracing::instrument;

#[derive(Debug, Parser)]
#[command(about = "Create a new prompt")]
pub struct Add {
    /// The title of the new prompt
    title: String,

    /// The prompt content
    #[arg(long, conflicts_with = "file")]
    content: Option<String>,

    /// Read the content from a file
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Free-text description
    #[arg(long)]
    description: Option<String>,

    /// Tags to attach (repeatable, comma-separated accepted)
    #[arg(long = "tag", value_name = "TAG", value_delimiter = ',')]
    tags: Vec<String>,

    /// File the prompt under an existing category
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Mark the prompt as a favorite
    #[arg(long)]
    favorite: bool,
}

impl Add {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let content = if let Some(text) = self.content {
            text
        } else if let Some(path) = self.file {
            std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?
        } else {
            let mut stdin = std::io::stdin();
            if stdin.is_terminal() {
                anyhow::bail!("no content given; pass --content, --file, or pipe to stdin");
            }
            let mut buffer = String::new();
            stdin.read_to_string(&mut buffer)?;
            buffer
        };

        let mut store = super::open_store(&root)?;
        let category_id = match self.category {
            Some(name) => Some(super::resolve_category(store.library(), &name)?),
            None => None,
        };

        let prompt = store.create_prompt(NewPrompt {
            title: self.title,
            content,
            description: self.description,
            tags: self.tags,
            category_id,
            is_favorite: self.favorite,
        })?;

        println!(
            "Added prompt {} '{}'",
            super::short_id(prompt.id()),
            prompt.title()
        );
        Ok(())
    }
}
