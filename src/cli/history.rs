use std::path::PathBuf;

use clap::Parser;
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Show a prompt's version history")]
pub struct History {
    /// The prompt to inspect (id, unique id prefix, or title)
    prompt: String,

    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl History {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        let id = super::resolve_prompt(store.library(), &self.prompt)?;
        let prompt = store.library().prompt(id).expect("resolved above");

        // Newest first.
        let mut versions: Vec<_> = prompt.versions().iter().collect();
        versions.sort_by_key(|version| std::cmp::Reverse(version.number()));

        match self.output {
            OutputFormat::Json => {
                use serde_json::json;

                let rows: Vec<_> = versions
                    .iter()
                    .map(|version| {
                        json!({
                            "version": version.number(),
                            "createdAt": version.created_at().to_rfc3339(),
                            "checksum": version.checksum(),
                            "changeLog": version.change_log(),
                            "current": version.number() == prompt.current_version(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows)?);
            }
            OutputFormat::Table => {
                println!("'{}': {} version(s)", prompt.title(), versions.len());
                println!();
                println!(
                    "{:<2} {:<8} {:<17} {:<13} CHANGE LOG",
                    "", "VERSION", "CREATED", "CHECKSUM"
                );
                println!("{}", "─".repeat(60).dim());

                for version in versions {
                    let marker = if version.number() == prompt.current_version() {
                        "→"
                    } else {
                        ""
                    };
                    let mut checksum = version.checksum().to_string();
                    checksum.truncate(12);
                    println!(
                        "{:<2} {:<8} {:<17} {:<13} {}",
                        marker,
                        format!("v{}", version.number()),
                        version.created_at().format("%Y-%m-%d %H:%M"),
                        checksum,
                        version.change_log().unwrap_or("")
                    );
                }
            }
        }

        Ok(())
    }
}
