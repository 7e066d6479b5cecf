use std::path::PathBuf;

use clap::Parser;
use promptlib::{Library, Prompt};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Display detailed information about a prompt")]
pub struct Show {
    /// The prompt to display (id, unique id prefix, or title)
    prompt: String,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,

    /// Include the full content in the output
    #[arg(long)]
    with_content: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Show {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        let library = store.library();
        let id = super::resolve_prompt(library, &self.prompt)?;
        let prompt = library.prompt(id).expect("resolved above");

        match self.output {
            OutputFormat::Pretty => self.output_pretty(library, prompt),
            OutputFormat::Json => self.output_json(library, prompt)?,
        }

        Ok(())
    }

    fn output_pretty(&self, library: &Library, prompt: &Prompt) {
        println!("# {}", super::short_id(prompt.id()));
        println!("{}\n", prompt.title());

        println!("{}", "Metadata".dim());
        println!("  Id:        {}", prompt.id());
        match prompt.current() {
            Ok(version) => {
                println!(
                    "  Version:   {} (of {})",
                    version.number(),
                    prompt.versions().len()
                );
                let mut checksum = version.checksum().to_string();
                checksum.truncate(12);
                println!("  Checksum:  {checksum}");
            }
            Err(e) => println!("{}", format!("  Version:   unavailable ({e})").warning()),
        }
        if let Some(path) = category_path(library, prompt) {
            println!("  Category:  {path}");
        }
        println!("  Created:   {}", prompt.created_at().format("%Y-%m-%d %H:%M"));
        println!("  Updated:   {}", prompt.updated_at().format("%Y-%m-%d %H:%M"));
        if prompt.is_favorite() {
            println!("  Favorite:  ★");
        }

        if !prompt.tags().is_empty() {
            println!("\n{}", "Tags".dim());
            for tag in prompt.tags() {
                println!("  • {tag}");
            }
        }

        if let Some(description) = prompt.description() {
            println!("\n{}", "Description".dim());
            println!("{description}");
        }

        if self.with_content {
            println!("\n{}", "Content".dim());
            println!("{}", prompt.content());
        }
    }

    fn output_json(&self, library: &Library, prompt: &Prompt) -> anyhow::Result<()> {
        use serde_json::json;

        let mut output = json!({
            "id": prompt.id(),
            "title": prompt.title(),
            "description": prompt.description(),
            "tags": prompt.tags(),
            "categoryId": prompt.category_id(),
            "category": category_path(library, prompt),
            "currentVersion": prompt.current_version(),
            "versionCount": prompt.versions().len(),
            "isFavorite": prompt.is_favorite(),
            "createdAt": prompt.created_at().to_rfc3339(),
            "updatedAt": prompt.updated_at().to_rfc3339(),
        });

        if self.with_content {
            output["content"] = json!(prompt.content());
        }

        println!("{}", serde_json::to_string_pretty(&output)?);
        Ok(())
    }
}

/// Root-to-leaf category path, joined for display.
fn category_path(library: &Library, prompt: &Prompt) -> Option<String> {
    let id = prompt.category_id()?;
    library.category_path(id).ok().map(|path| path.join(" / "))
}
