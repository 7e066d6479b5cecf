use std::{
    io::BufRead,
    path::{Path, PathBuf},
};

mod add;
mod category;
mod diff;
mod edit;
mod export;
mod history;
mod list;
mod show;
mod stats;
mod tag;
mod terminal;

use add::Add;
use category::Category;
use clap::ArgAction;
use diff::Diff;
use edit::Edit;
use export::{Export, ExportPrompt};
use history::History;
use list::{List, Search};
use promptlib::{Config, JsonPort, Library, PromptStore};
use show::Show;
use stats::Stats;
use tag::Tag;
use tracing::instrument;
use uuid::Uuid;

/// Name of the configuration file inside a library root.
const CONFIG_FILE: &str = "pm.toml";

/// Opens the prompt store rooted at the given directory.
///
/// A missing configuration file falls back to defaults, so any directory
/// works as a library root without running `init` first.
fn open_store(root: &Path) -> anyhow::Result<PromptStore<JsonPort>> {
    let config_path = root.join(CONFIG_FILE);
    let config = if config_path.exists() {
        Config::load(&config_path).map_err(|e| anyhow::anyhow!(e))?
    } else {
        Config::default()
    };

    let port = JsonPort::new(root, config.pretty());
    Ok(PromptStore::open(port, config)?)
}

/// Resolves user input to a prompt id.
///
/// This is a CLI boundary function: it accepts a full id, a unique prefix of
/// one, or an exact title (case-insensitive), and reports ambiguity rather
/// than guessing.
fn resolve_prompt(library: &Library, key: &str) -> anyhow::Result<Uuid> {
    if let Ok(id) = key.parse::<Uuid>() {
        if library.prompt(id).is_some() {
            return Ok(id);
        }
        anyhow::bail!("no prompt with id {id}");
    }

    let needle = key.to_lowercase();
    let by_prefix: Vec<Uuid> = library
        .prompts()
        .iter()
        .filter(|prompt| prompt.id().to_string().starts_with(&needle))
        .map(|prompt| prompt.id())
        .collect();
    match by_prefix.as_slice() {
        [id] => return Ok(*id),
        [] => {}
        ids => anyhow::bail!("'{key}' is ambiguous: {} prompt ids start with it", ids.len()),
    }

    let by_title: Vec<Uuid> = library
        .prompts()
        .iter()
        .filter(|prompt| prompt.title().to_lowercase() == needle)
        .map(|prompt| prompt.id())
        .collect();
    match by_title.as_slice() {
        [id] => Ok(*id),
        [] => anyhow::bail!("no prompt matches '{key}'"),
        ids => anyhow::bail!("'{key}' is ambiguous: {} prompts share that title", ids.len()),
    }
}

/// Resolves a category name to its id.
fn resolve_category(library: &Library, name: &str) -> anyhow::Result<Uuid> {
    library
        .category_by_name(name)
        .map(|category| category.id())
        .ok_or_else(|| anyhow::anyhow!("category '{name}' not found"))
}

/// Shortened id used in listings and messages.
fn short_id(id: Uuid) -> String {
    let mut id = id.to_string();
    id.truncate(8);
    id
}

/// Asks for confirmation on stderr, exiting with code 130 when declined.
fn confirm(question: &str) -> anyhow::Result<()> {
    eprint!("{question} (y/N) ");
    let stdin = std::io::stdin();
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    if !line.trim().eq_ignore_ascii_case("y") {
        println!("Cancelled");
        std::process::exit(130);
    }
    Ok(())
}

#[derive(Debug, clap::Parser)]
#[command(version, about)]
pub struct Cli {
    /// Verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// The path to the root of the prompt library
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

impl Cli {
    pub fn run(self) -> anyhow::Result<()> {
        Self::setup_logging(self.verbose);

        self.command
            .unwrap_or_else(|| Command::List(List::default()))
            .run(self.root)
    }

    fn setup_logging(verbosity: u8) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let level = match verbosity {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        };

        let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into());

        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_names(false)
            .with_line_number(false);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .init();
    }
}

#[derive(Debug, clap::Parser)]
pub enum Command {
    /// Initialize a new prompt library
    Init,

    /// Create a new prompt
    Add(Add),

    /// List prompts with filters (default)
    List(List),

    /// Search prompts by term, with the same filters as list
    Search(Search),

    /// Show detailed information about a prompt
    Show(Show),

    /// Edit a prompt's fields
    ///
    /// A new version is recorded only when the content actually changes.
    Edit(Edit),

    /// Show a prompt's version history
    History(History),

    /// Compare two versions of a prompt
    Diff(Diff),

    /// Restore a prompt to an earlier version
    Restore(Restore),

    /// Toggle a prompt's favorite flag
    Favorite(Favorite),

    /// Delete a prompt and its version history
    Delete(Delete),

    /// Show library statistics
    Stats(Stats),

    /// Manage categories
    Category(Category),

    /// Manage tags
    Tag(Tag),

    /// Export the library to a file
    Export(Export),

    /// Export a single prompt as a document
    ExportPrompt(ExportPrompt),

    /// Import prompts, categories, and tags from a file
    Import(Import),
}

impl Command {
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        match self {
            Self::Init => Init::run(&root)?,
            Self::Add(command) => command.run(root)?,
            Self::List(command) => command.run(root)?,
            Self::Search(command) => command.run(root)?,
            Self::Show(command) => command.run(root)?,
            Self::Edit(command) => command.run(root)?,
            Self::History(command) => command.run(root)?,
            Self::Diff(command) => command.run(root)?,
            Self::Restore(command) => command.run(root)?,
            Self::Favorite(command) => command.run(root)?,
            Self::Delete(command) => command.run(root)?,
            Self::Stats(command) => command.run(root)?,
            Self::Category(command) => command.run(root)?,
            Self::Tag(command) => command.run(root)?,
            Self::Export(command) => command.run(root)?,
            Self::ExportPrompt(command) => command.run(root)?,
            Self::Import(command) => command.run(root)?,
        }
        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Init {}

impl Init {
    #[instrument]
    fn run(root: &Path) -> anyhow::Result<()> {
        use promptlib::storage::{PersistedState, StatePort};

        let config_path = root.join(CONFIG_FILE);
        if config_path.exists() {
            anyhow::bail!("Library already initialized (found existing {CONFIG_FILE})");
        }

        std::fs::create_dir_all(root)
            .map_err(|e| anyhow::anyhow!("Failed to create library root: {e}"))?;

        let config = Config::default();
        config
            .save(&config_path)
            .map_err(|e| anyhow::anyhow!("Failed to create {CONFIG_FILE}: {e}"))?;

        let port = JsonPort::new(root, config.pretty());
        port.save(&PersistedState::default())?;

        println!("Initialized prompt library in {}", root.display());
        println!("  Created: pm.toml");
        println!("  Created: prompts.json");
        println!("  Created: categories.json");
        println!();
        println!("Next steps:");
        println!("  pm add \"My first prompt\" --content \"...\"");

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Restore {
    /// The prompt to restore (id, unique id prefix, or title)
    prompt: String,

    /// The version number to restore
    version: u32,

    /// Append the old content as a new version instead of moving the pointer
    #[arg(long)]
    as_new: bool,
}

impl Restore {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = open_store(&root)?;
        let id = resolve_prompt(store.library(), &self.prompt)?;

        let (title, version_id) = {
            let prompt = store.library().prompt(id).expect("resolved above");
            let version_id = prompt.version(self.version).map(|version| version.id());
            (prompt.title().to_string(), version_id)
        };

        if self.as_new {
            let number = store.restore_version_as_new(id, self.version)?;
            println!(
                "Restored version {} of '{title}' as new version {number}",
                self.version
            );
        } else {
            let Some(version_id) = version_id else {
                anyhow::bail!("'{title}' has no version {}", self.version);
            };
            let number = store.restore_version(id, version_id)?;
            println!("Restored '{title}' to version {number}");
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Favorite {
    /// The prompt to toggle (id, unique id prefix, or title)
    prompt: String,
}

impl Favorite {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let mut store = open_store(&root)?;
        let id = resolve_prompt(store.library(), &self.prompt)?;
        let title = store
            .library()
            .prompt(id)
            .expect("resolved above")
            .title()
            .to_string();

        if store.toggle_favorite(id)? {
            println!("★ '{title}' marked as favorite");
        } else {
            println!("'{title}' is no longer a favorite");
        }

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Delete {
    /// The prompt to delete (id, unique id prefix, or title)
    prompt: String,

    /// Skip the confirmation prompt
    #[arg(long, short)]
    force: bool,
}

impl Delete {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let mut store = open_store(&root)?;
        let id = resolve_prompt(store.library(), &self.prompt)?;
        let (title, versions) = {
            let prompt = store.library().prompt(id).expect("resolved above");
            (prompt.title().to_string(), prompt.versions().len())
        };

        if !self.force {
            confirm(&format!(
                "Delete '{title}' and its {versions} stored version(s)?"
            ))?;
        }

        store.delete_prompt(id)?;
        println!("{}", format!("✅ Deleted '{title}'").success());

        Ok(())
    }
}

#[derive(Debug, clap::Parser)]
pub struct Import {
    /// The JSON file to import
    file: PathBuf,
}

impl Import {
    #[instrument]
    fn run(self, root: PathBuf) -> anyhow::Result<()> {
        use terminal::Colorize;

        let text = std::fs::read_to_string(&self.file)
            .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", self.file.display()))?;

        let mut store = open_store(&root)?;
        let report = store.import(&text)?;

        println!(
            "Imported {} item(s): {} prompts, {} categories, {} tags",
            report.imported(),
            report.prompts,
            report.categories,
            report.tags
        );

        for line in &report.skipped {
            println!("{}", format!("  skipped: {line}").dim());
        }
        for line in &report.warnings {
            println!("{}", format!("  warning: {line}").warning());
        }
        for line in &report.errors {
            eprintln!("{}", format!("  error: {line}").error());
        }

        if !report.success() {
            eprintln!(
                "{}",
                format!("{} item(s) could not be imported", report.errors.len()).error()
            );
            std::process::exit(1);
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use promptlib::NewPrompt;
    use serde_json::json;
    use tempfile::tempdir;

    use super::*;

    fn add_prompt(root: &Path, title: &str, content: &str) -> Uuid {
        let mut store = open_store(root).expect("failed to open store");
        let prompt = store
            .create_prompt(NewPrompt {
                title: title.to_string(),
                content: content.to_string(),
                ..NewPrompt::default()
            })
            .expect("failed to create prompt");
        prompt.id()
    }

    #[test]
    fn init_creates_the_root_layout() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().join("library");

        Init::run(&root).expect("init should succeed");

        assert!(root.join("pm.toml").exists());
        assert!(root.join("prompts.json").exists());
        assert!(root.join("categories.json").exists());

        let err = Init::run(&root).unwrap_err();
        assert!(err.to_string().contains("already initialized"));
    }

    #[test]
    fn resolve_prompt_accepts_id_prefix_and_title() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let id = add_prompt(&root, "Code Review", "review this");
        add_prompt(&root, "Other", "unrelated");

        let store = open_store(&root).unwrap();
        let library = store.library();

        assert_eq!(resolve_prompt(library, &id.to_string()).unwrap(), id);
        assert_eq!(resolve_prompt(library, &short_id(id)).unwrap(), id);
        assert_eq!(resolve_prompt(library, "code review").unwrap(), id);
        assert!(resolve_prompt(library, "missing").is_err());
    }

    #[test]
    fn resolve_prompt_reports_ambiguous_titles() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        add_prompt(&root, "Same", "one");
        add_prompt(&root, "same", "two");

        let store = open_store(&root).unwrap();
        let err = resolve_prompt(store.library(), "SAME").unwrap_err();
        assert!(err.to_string().contains("ambiguous"));
    }

    #[test]
    fn delete_run_with_force_removes_the_prompt() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        add_prompt(&root, "Short Lived", "gone soon");

        let delete = Delete {
            prompt: "Short Lived".to_string(),
            force: true,
        };
        delete.run(root.clone()).expect("delete should succeed");

        let store = open_store(&root).unwrap();
        assert!(store.library().prompts().is_empty());
    }

    #[test]
    fn favorite_run_toggles_the_flag() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let id = add_prompt(&root, "Starred", "content");

        Favorite {
            prompt: "Starred".to_string(),
        }
        .run(root.clone())
        .expect("favorite should succeed");

        let store = open_store(&root).unwrap();
        assert!(store.library().prompt(id).unwrap().is_favorite());
    }

    #[test]
    fn restore_run_moves_the_version_pointer() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let id = add_prompt(&root, "Evolving", "first draft");

        let mut store = open_store(&root).unwrap();
        store
            .update_prompt(
                id,
                promptlib::PromptPatch {
                    content: Some("second draft".to_string()),
                    ..promptlib::PromptPatch::default()
                },
                true,
            )
            .unwrap();
        drop(store);

        Restore {
            prompt: "Evolving".to_string(),
            version: 1,
            as_new: false,
        }
        .run(root.clone())
        .expect("restore should succeed");

        let store = open_store(&root).unwrap();
        let prompt = store.library().prompt(id).unwrap();
        assert_eq!(prompt.current_version(), 1);
        assert_eq!(prompt.content(), "first draft");
        assert_eq!(prompt.versions().len(), 2);
    }

    #[test]
    fn restore_run_as_new_appends_a_version() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let id = add_prompt(&root, "Evolving", "first draft");

        let mut store = open_store(&root).unwrap();
        store
            .update_prompt(
                id,
                promptlib::PromptPatch {
                    content: Some("second draft".to_string()),
                    ..promptlib::PromptPatch::default()
                },
                true,
            )
            .unwrap();
        drop(store);

        Restore {
            prompt: "Evolving".to_string(),
            version: 1,
            as_new: true,
        }
        .run(root.clone())
        .expect("restore --as-new should succeed");

        let store = open_store(&root).unwrap();
        let prompt = store.library().prompt(id).unwrap();
        assert_eq!(prompt.current_version(), 3);
        assert_eq!(prompt.content(), "first draft");
    }

    #[test]
    fn import_run_loads_a_prompt_array() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();
        let id = Uuid::new_v4();
        let version_id = Uuid::new_v4();

        let file = root.join("incoming.json");
        std::fs::write(
            &file,
            json!([{
                "id": id,
                "title": "Imported",
                "content": "payload",
                "tags": ["shared"],
                "versions": [{
                    "id": version_id,
                    "version": 1,
                    "content": "payload",
                    "changeLog": "Initial version",
                    "createdAt": "2024-01-01T00:00:00Z",
                    "checksum": "abc123"
                }],
                "currentVersion": 1,
                "createdAt": "2024-01-01T00:00:00Z",
                "updatedAt": "2024-01-01T00:00:00Z",
                "isFavorite": false
            }])
            .to_string(),
        )
        .unwrap();

        Import { file }
            .run(root.clone())
            .expect("import should succeed");

        let store = open_store(&root).unwrap();
        assert_eq!(store.library().prompts().len(), 1);
        assert_eq!(store.library().prompt(id).unwrap().title(), "Imported");
    }

    #[test]
    fn list_run_succeeds_on_an_empty_library() {
        let tmp = tempdir().unwrap();
        let root = tmp.path().to_path_buf();

        List::default()
            .run(root)
            .expect("list should succeed on an empty library");
    }
}
