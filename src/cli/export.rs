use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use promptlib::{
    storage::{export, PromptDocFormat},
    Prompt,
};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Export the library to a file")]
pub struct Export {
    /// Destination file
    file: PathBuf,

    /// Output format
    #[arg(long, value_name = "FORMAT", default_value = "json")]
    format: ExportFormat,

    /// Export only the prompts, without categories and tags
    #[arg(long)]
    prompts_only: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum ExportFormat {
    #[default]
    Json,
    Csv,
}

impl Export {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        let library = store.library();
        let prompts: Vec<&Prompt> = library.prompts().iter().collect();

        let text = match (self.format, self.prompts_only) {
            (ExportFormat::Json, false) => export::library_to_json(library, true)?,
            (ExportFormat::Json, true) => export::prompts_to_json(&prompts, true)?,
            (ExportFormat::Csv, _) => export::prompts_to_csv(library, &prompts),
        };

        std::fs::write(&self.file, text)
            .with_context(|| format!("failed to write {}", self.file.display()))?;

        if matches!(self.format, ExportFormat::Json) && !self.prompts_only {
            let report = export::report(library);
            println!(
                "{}",
                format!(
                    "✅ Exported {} prompts, {} categories, {} tags ({} versions) to {}",
                    report.total_prompts,
                    report.total_categories,
                    report.total_tags,
                    report.total_versions,
                    self.file.display()
                )
                .success()
            );
        } else {
            println!(
                "{}",
                format!(
                    "✅ Exported {} prompt(s) to {}",
                    prompts.len(),
                    self.file.display()
                )
                .success()
            );
        }

        Ok(())
    }
}

#[derive(Debug, Parser)]
#[command(about = "Export a single prompt as a document")]
pub struct ExportPrompt {
    /// The prompt to export (id, unique id prefix, or title)
    prompt: String,

    /// Destination file
    file: PathBuf,

    /// Document format
    #[arg(long, value_name = "FORMAT", default_value = "markdown")]
    format: DocFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum DocFormat {
    #[default]
    Markdown,
    Text,
    Json,
}

impl From<DocFormat> for PromptDocFormat {
    fn from(format: DocFormat) -> Self {
        match format {
            DocFormat::Markdown => Self::Markdown,
            DocFormat::Text => Self::Text,
            DocFormat::Json => Self::Json,
        }
    }
}

impl ExportPrompt {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        let id = super::resolve_prompt(store.library(), &self.prompt)?;
        let prompt = store.library().prompt(id).expect("resolved above");

        let doc = export::prompt_to_doc(prompt, self.format.into(), true)?;
        std::fs::write(&self.file, doc)
            .with_context(|| format!("failed to write {}", self.file.display()))?;

        println!(
            "{}",
            format!("✅ Exported '{}' to {}", prompt.title(), self.file.display()).success()
        );
        Ok(())
    }
}
