use std::path::PathBuf;

use clap::Parser;
use promptlib::storage::export;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Manage tags")]
pub struct Tag {
    #[command(subcommand)]
    command: TagCommand,
}

#[derive(Debug, Parser)]
enum TagCommand {
    /// Create a tag
    Add {
        /// The tag name
        name: String,

        /// Display color (hex), defaulting to the configured color
        #[arg(long, value_name = "COLOR")]
        color: Option<String>,
    },

    /// List tags
    List {
        /// Output format (table, json)
        #[arg(long, value_name = "FORMAT", default_value = "table")]
        output: OutputFormat,
    },

    /// Rename a tag everywhere it is used
    Rename {
        /// The current tag name
        name: String,

        /// The new tag name
        new_name: String,
    },

    /// Delete a tag, removing it from every prompt
    Remove {
        /// The tag to delete
        name: String,
    },
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Tag {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self.command {
            TagCommand::Add { name, color } => {
                let mut store = super::open_store(&root)?;
                let tag = store.create_tag(name, color)?;
                println!("Added tag '{}'", tag.name());
            }
            TagCommand::List { output } => Self::list(&root, output)?,
            TagCommand::Rename { name, new_name } => {
                let mut store = super::open_store(&root)?;
                let tag = store.update_tag(&name, Some(new_name), None)?;
                println!(
                    "{}",
                    format!("✅ Renamed tag '{name}' to '{}'", tag.name()).success()
                );
            }
            TagCommand::Remove { name } => {
                let mut store = super::open_store(&root)?;
                let tag = store.delete_tag(&name)?;
                if tag.usage_count() == 0 {
                    println!("{}", format!("✅ Removed tag '{}'", tag.name()).success());
                } else {
                    println!(
                        "{}",
                        format!(
                            "✅ Removed tag '{}' from {} prompt(s)",
                            tag.name(),
                            tag.usage_count()
                        )
                        .success()
                    );
                }
            }
        }

        Ok(())
    }

    fn list(root: &std::path::Path, output: OutputFormat) -> anyhow::Result<()> {
        let store = super::open_store(root)?;
        let library = store.library();

        match output {
            OutputFormat::Json => {
                print!("{}", export::tags_to_json(library.tags(), true)?);
                println!();
            }
            OutputFormat::Table => {
                if library.tags().is_empty() {
                    println!("No tags yet. Create one with 'pm tag add'.");
                    return Ok(());
                }

                println!("{:<20} {:<8} COLOR", "NAME", "PROMPTS");
                println!("{}", "─".repeat(40).dim());
                for tag in library.tags() {
                    println!(
                        "{:<20} {:<8} {}",
                        tag.name(),
                        tag.usage_count(),
                        tag.color()
                    );
                }
            }
        }

        Ok(())
    }
}
