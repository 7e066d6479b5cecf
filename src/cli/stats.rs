use std::path::PathBuf;

use clap::Parser;
use promptlib::domain::library::LibraryStats;
use tracing::instrument;

use super::terminal::{is_narrow, Colorize};

#[derive(Debug, Parser, Default)]
#[command(about = "Show prompt, favorite, and version counts")]
pub struct Stats {
    /// Output format (table, json)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl Stats {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        let stats = store.library().stats();

        if stats.total_prompts == 0 {
            println!("No prompts found yet. Create one with 'pm add'.");
            return Ok(());
        }

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
            OutputFormat::Table => {
                if self.quiet {
                    Self::output_quiet(&stats);
                } else {
                    Self::output_table(&stats);
                }
            }
        }

        Ok(())
    }

    fn output_quiet(stats: &LibraryStats) {
        println!(
            "prompts={} favorites={} versions={}",
            stats.total_prompts, stats.favorites, stats.total_versions
        );
    }

    fn output_table(stats: &LibraryStats) {
        let narrow = is_narrow();

        println!("Prompt library");
        println!("{}", "──────────────".dim());
        println!("{:<12} {}", "Prompts", stats.total_prompts);
        println!("{:<12} {}", "Favorites", stats.favorites);
        println!("{:<12} {}", "Versions", stats.total_versions);

        if !stats.by_category.is_empty() {
            println!();
            println!("By category");
            if narrow {
                // Stacked output for narrow terminals
                for (name, count) in &stats.by_category {
                    println!("{name}: {count}");
                }
            } else {
                for (name, count) in &stats.by_category {
                    println!("  {name:<20} {count}");
                }
            }
        }

        if !stats.by_tag.is_empty() {
            println!();
            println!("By tag");
            if narrow {
                for (name, count) in &stats.by_tag {
                    println!("{name}: {count}");
                }
            } else {
                for (name, count) in &stats.by_tag {
                    println!("  {name:<20} {count}");
                }
            }
        }
    }
}
