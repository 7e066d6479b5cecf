use std::path::PathBuf;

use clap::Parser;
use promptlib::domain::diff::{diff, format_for_display, SegmentKind};
use tracing::instrument;

use super::terminal::Colorize;

#[derive(Debug, Parser)]
#[command(about = "Compare two versions of a prompt")]
pub struct Diff {
    /// The prompt to compare (id, unique id prefix, or title)
    prompt: String,

    /// The version number to compare from
    from: u32,

    /// The version number to compare to
    to: u32,

    /// Output format (pretty, json)
    #[arg(long, value_name = "FORMAT", default_value = "pretty")]
    output: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Pretty,
    Json,
}

impl Diff {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        let id = super::resolve_prompt(store.library(), &self.prompt)?;
        let prompt = store.library().prompt(id).expect("resolved above");

        let Some(from) = prompt.version(self.from) else {
            anyhow::bail!("'{}' has no version {}", prompt.title(), self.from);
        };
        let Some(to) = prompt.version(self.to) else {
            anyhow::bail!("'{}' has no version {}", prompt.title(), self.to);
        };

        let view = format_for_display(&diff(from.content(), to.content()));

        match self.output {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
            OutputFormat::Pretty => {
                println!(
                    "'{}': version {} to version {}",
                    prompt.title(),
                    self.from,
                    self.to
                );
                println!();

                if !view.has_changes() {
                    println!("{}", "No differences.".dim());
                    return Ok(());
                }

                for line in &view.right {
                    match line.tag {
                        SegmentKind::Equal => println!("  {}", line.text),
                        SegmentKind::Delete => {
                            println!("{}", format!("- {}", line.text).error());
                        }
                        SegmentKind::Insert => {
                            println!("{}", format!("+ {}", line.text).success());
                        }
                    }
                }
            }
        }

        Ok(())
    }
}
