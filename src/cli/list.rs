use std::{cmp::Reverse, path::PathBuf};

use anyhow::Context;
use clap::Parser;
use promptlib::{storage::export, Library, Prompt, SearchFilter};
use regex::Regex;
use serde_json::json;
use tracing::instrument;

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    #[default]
    Table,
    Json,
    Csv,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum SortKey {
    /// Most recently updated first
    #[default]
    Updated,
    /// Most recently created first
    Created,
    /// Title, A to Z
    Title,
}

/// Filter and output options shared by `list` and `search`.
#[derive(Debug, Default, clap::Args)]
struct FilterArgs {
    /// Keep prompts carrying any of these tags
    #[arg(long = "tag", value_name = "TAG", value_delimiter = ',')]
    tags: Vec<String>,

    /// Keep prompts filed under this category
    #[arg(long, value_name = "NAME")]
    category: Option<String>,

    /// Keep only favorites
    #[arg(long)]
    favorites: bool,

    /// Keep prompts whose title or content matches a regular expression
    #[arg(long, value_name = "PATTERN")]
    regex: Option<String>,

    /// Sort order
    #[arg(long, value_name = "KEY", default_value = "updated")]
    sort: SortKey,

    /// Show at most N prompts
    #[arg(long, value_name = "N")]
    limit: Option<usize>,

    /// Skip the first N prompts
    #[arg(long, value_name = "N", default_value_t = 0)]
    offset: usize,

    /// Output format (table, json, csv)
    #[arg(long, value_name = "FORMAT", default_value = "table")]
    output: OutputFormat,

    /// Suppress headers and format for scripting
    #[arg(long)]
    quiet: bool,
}

#[derive(Debug, Default, Parser)]
#[command(about = "List prompts with filters")]
pub struct List {
    /// Keep prompts whose title, content, description, or tags contain TERM
    #[arg(long, value_name = "TERM")]
    contains: Option<String>,

    #[command(flatten)]
    filters: FilterArgs,
}

impl List {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        run_query(store.library(), self.contains, self.filters)
    }
}

#[derive(Debug, Parser)]
#[command(about = "Search prompts by term")]
pub struct Search {
    /// The term to search for
    term: String,

    #[command(flatten)]
    filters: FilterArgs,
}

impl Search {
    #[instrument(level = "debug", skip(self))]
    pub fn run(self, root: PathBuf) -> anyhow::Result<()> {
        let store = super::open_store(&root)?;
        run_query(store.library(), Some(self.term), self.filters)
    }
}

fn run_query(library: &Library, term: Option<String>, filters: FilterArgs) -> anyhow::Result<()> {
    let FilterArgs {
        tags,
        category,
        favorites,
        regex,
        sort,
        limit,
        offset,
        output,
        quiet,
    } = filters;

    let category_id = match category {
        Some(name) => Some(super::resolve_category(library, &name)?),
        None => None,
    };

    let filter = SearchFilter {
        term,
        tags,
        category_id,
        favorites_only: favorites,
    };
    let mut prompts = library.search(&filter);

    if let Some(pattern) = regex {
        let re = Regex::new(&pattern).context("invalid regular expression")?;
        prompts.retain(|prompt| re.is_match(prompt.title()) || re.is_match(prompt.content()));
    }

    match sort {
        SortKey::Updated => prompts.sort_by_key(|prompt| Reverse(prompt.updated_at())),
        SortKey::Created => prompts.sort_by_key(|prompt| Reverse(prompt.created_at())),
        SortKey::Title => prompts.sort_by_key(|prompt| prompt.title().to_lowercase()),
    }

    let prompts: Vec<&Prompt> = prompts
        .into_iter()
        .skip(offset)
        .take(limit.unwrap_or(usize::MAX))
        .collect();

    match output {
        OutputFormat::Table => render_table(library, &prompts, quiet),
        OutputFormat::Json => render_json(library, &prompts)?,
        OutputFormat::Csv => print!("{}", export::prompts_to_csv(library, &prompts)),
    }

    Ok(())
}

fn category_name(library: &Library, prompt: &Prompt) -> Option<String> {
    prompt
        .category_id()
        .and_then(|id| library.category(id))
        .map(|category| category.name().to_string())
}

fn render_table(library: &Library, prompts: &[&Prompt], quiet: bool) {
    let headers = ["ID", "TITLE", "VER", "TAGS", "CATEGORY", "UPDATED", "FAV"];

    let rows: Vec<[String; 7]> = prompts
        .iter()
        .map(|prompt| {
            [
                super::short_id(prompt.id()),
                prompt.title().to_string(),
                format!("v{}", prompt.current_version()),
                prompt.tags().join(", "),
                category_name(library, prompt).unwrap_or_default(),
                prompt.updated_at().format("%Y-%m-%d").to_string(),
                if prompt.is_favorite() {
                    "★".to_string()
                } else {
                    String::new()
                },
            ]
        })
        .collect();

    if quiet {
        for row in &rows {
            println!("{}", row.join("\t"));
        }
        return;
    }

    if rows.is_empty() {
        println!("No prompts matched.");
        return;
    }

    // Column widths for alignment.
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, header)| {
            rows.iter()
                .map(|row| row[idx].len())
                .max()
                .unwrap_or(0)
                .max(header.len())
        })
        .collect();

    for (header, width) in headers.iter().zip(&widths) {
        print!("{header:<width$}  ");
    }
    println!();

    for width in &widths {
        print!("{:-<width$}  ", "");
    }
    println!();

    for row in &rows {
        for (value, width) in row.iter().zip(&widths) {
            print!("{value:<width$}  ");
        }
        println!();
    }
}

fn render_json(library: &Library, prompts: &[&Prompt]) -> anyhow::Result<()> {
    let rows: Vec<_> = prompts
        .iter()
        .map(|prompt| {
            json!({
                "id": prompt.id(),
                "title": prompt.title(),
                "description": prompt.description(),
                "tags": prompt.tags(),
                "category": category_name(library, prompt),
                "currentVersion": prompt.current_version(),
                "isFavorite": prompt.is_favorite(),
                "createdAt": prompt.created_at().to_rfc3339(),
                "updatedAt": prompt.updated_at().to_rfc3339(),
            })
        })
        .collect();

    serde_json::to_writer_pretty(std::io::stdout(), &rows)
        .context("failed to render json output")?;
    println!();
    Ok(())
}
