use std::path::PathBuf;

use clap::Parser;
use promptlib::{
    domain::{CategoryNode, CategoryPatch},
    storage::export,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Manage categories")]
pub struct Category {
    #[command(subcommand)]
    command: CategoryCommand,
}

#[derive(Debug, Parser)]
enum CategoryCommand {
    /// Create a category
    Add {
        /// The category name
        name: String,

        /// Nest the new category under an existing one
        #[arg(long, value_name = "NAME")]
        parent: Option<String>,

        /// Display color (hex), defaulting to the configured color
        #[arg(long, value_name = "COLOR")]
        color: Option<String>,
    },

    /// List categories
    List {
        /// Output format (table, json)
        #[arg(long, value_name = "FORMAT", default_value = "table")]
        output: OutputFormat,
    },

    /// Show the category hierarchy as a tree
    Tree,

    /// Move a category under a new parent
    Move {
        /// The category to move
        name: String,

        /// The new parent category
        #[arg(long, value_name = "NAME", conflicts_with = "to_root")]
        to: Option<String>,

        /// Make the category a top-level one
        #[arg(long)]
        to_root: bool,
    },

    /// Delete a category
    Remove {
        /// The category to delete
        name: String,

        /// Also delete every nested subcategory
        #[arg(long)]
        recursive: bool,

        /// Skip the confirmation prompt
        #[arg(long, short)]
        force: bool,
    },
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Category {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self.command {
            CategoryCommand::Add {
                name,
                parent,
                color,
            } => Self::add(&root, name, parent, color),
            CategoryCommand::List { output } => Self::list(&root, output),
            CategoryCommand::Tree => Self::tree(&root),
            CategoryCommand::Move { name, to, to_root } => Self::reparent(&root, &name, to, to_root),
            CategoryCommand::Remove {
                name,
                recursive,
                force,
            } => Self::remove(&root, &name, recursive, force),
        }
    }

    fn add(
        root: &std::path::Path,
        name: String,
        parent: Option<String>,
        color: Option<String>,
    ) -> anyhow::Result<()> {
        let mut store = super::open_store(root)?;
        let parent_id = match parent {
            Some(parent) => Some(super::resolve_category(store.library(), &parent)?),
            None => None,
        };

        let category = store.create_category(name, color, parent_id)?;
        println!("Added category '{}'", category.name());
        Ok(())
    }

    fn list(root: &std::path::Path, output: OutputFormat) -> anyhow::Result<()> {
        let store = super::open_store(root)?;
        let library = store.library();

        match output {
            OutputFormat::Json => {
                print!("{}", export::categories_to_json(library.categories(), true)?);
                println!();
            }
            OutputFormat::Table => {
                if library.categories().is_empty() {
                    println!("No categories yet. Create one with 'pm category add'.");
                    return Ok(());
                }

                println!("{:<20} {:<20} {:<8} COLOR", "NAME", "PARENT", "PROMPTS");
                println!("{}", "─".repeat(60).dim());
                for category in library.categories() {
                    let parent = category
                        .parent_id()
                        .and_then(|id| library.category(id))
                        .map(|parent| parent.name().to_string())
                        .unwrap_or_default();
                    println!(
                        "{:<20} {:<20} {:<8} {}",
                        category.name(),
                        parent,
                        category.prompt_count(),
                        category.color()
                    );
                }
            }
        }

        Ok(())
    }

    fn tree(root: &std::path::Path) -> anyhow::Result<()> {
        let store = super::open_store(root)?;
        let nodes = store.library().category_tree();

        if nodes.is_empty() {
            println!("No categories yet. Create one with 'pm category add'.");
            return Ok(());
        }

        print_tree(&nodes, "");
        Ok(())
    }

    fn reparent(
        root: &std::path::Path,
        name: &str,
        to: Option<String>,
        to_root: bool,
    ) -> anyhow::Result<()> {
        let mut store = super::open_store(root)?;
        let id = super::resolve_category(store.library(), name)?;

        let parent_id = if to_root {
            Some(None)
        } else {
            let Some(parent) = to else {
                anyhow::bail!("pass --to <PARENT> or --to-root");
            };
            Some(Some(super::resolve_category(store.library(), &parent)?))
        };

        let patch = CategoryPatch {
            parent_id,
            ..CategoryPatch::default()
        };
        let category = store.update_category(id, patch)?;

        match category.parent_id() {
            Some(_) => println!("Moved '{}' under its new parent", category.name()),
            None => println!("Moved '{}' to the top level", category.name()),
        }
        Ok(())
    }

    fn remove(
        root: &std::path::Path,
        name: &str,
        recursive: bool,
        force: bool,
    ) -> anyhow::Result<()> {
        let mut store = super::open_store(root)?;
        let id = super::resolve_category(store.library(), name)?;
        let children = store
            .library()
            .categories()
            .iter()
            .filter(|category| category.parent_id() == Some(id))
            .count();

        if !force {
            let question = if recursive {
                format!("Remove category '{name}' and all its subcategories? Their prompts become uncategorized.")
            } else if children > 0 {
                format!("Remove category '{name}'? Its {children} subcategories move up a level and its prompts become uncategorized.")
            } else {
                format!("Remove category '{name}'? Its prompts become uncategorized.")
            };
            super::confirm(&question)?;
        }

        if recursive {
            let removed = store.delete_category_recursive(id)?;
            if removed.len() == 1 {
                println!("{}", format!("✅ Removed category '{name}'").success());
            } else {
                println!(
                    "{}",
                    format!(
                        "✅ Removed category '{name}' and {} subcategories",
                        removed.len() - 1
                    )
                    .success()
                );
            }
        } else {
            let category = store.delete_category(id)?;
            println!("{}", format!("✅ Removed category '{}'", category.name()).success());
        }

        Ok(())
    }
}

fn print_tree(nodes: &[CategoryNode], prefix: &str) {
    for (idx, node) in nodes.iter().enumerate() {
        let last = idx == nodes.len() - 1;
        let connector = if last { "└─" } else { "├─" };
        println!(
            "{prefix}{connector} {} ({})",
            node.category.name(),
            node.category.prompt_count()
        );

        let child_prefix = format!("{prefix}{}  ", if last { " " } else { "│" });
        print_tree(&node.children, &child_prefix);
    }
}
