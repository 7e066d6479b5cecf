//! Export to JSON, CSV, and single-prompt documents.
//!
//! The full export carries a versioned envelope (`version`, `exportedAt`,
//! `data`) so a later import can recognize it. Section exports put their
//! collection at the top level instead, which the importer also accepts.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

use crate::domain::{Category, Library, Prompt, Tag};

const EXPORT_FORMAT_VERSION: &str = "1.0";

/// Errors from encoding an export payload.
#[derive(Debug, Error)]
pub enum ExportError {
    /// JSON encoding failed.
    #[error("failed to encode export: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Target rendering for a single-prompt document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptDocFormat {
    /// A small markdown document.
    Markdown,
    /// Labelled plain text.
    Text,
    /// The raw prompt record as JSON.
    Json,
}

/// Summary of what an export of the whole library carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportReport {
    /// Number of prompts.
    pub total_prompts: usize,
    /// Number of categories.
    pub total_categories: usize,
    /// Number of tags.
    pub total_tags: usize,
    /// Number of stored versions across all prompts.
    pub total_versions: usize,
    /// Number of favorite prompts.
    pub favorites: usize,
}

/// Counts the records a full export would carry.
#[must_use]
pub fn report(library: &Library) -> ExportReport {
    ExportReport {
        total_prompts: library.prompts().len(),
        total_categories: library.categories().len(),
        total_tags: library.tags().len(),
        total_versions: library.prompts().iter().map(|p| p.versions().len()).sum(),
        favorites: library.prompts().iter().filter(|p| p.is_favorite()).count(),
    }
}

/// Serializes the whole library as a versioned export envelope.
///
/// # Errors
///
/// Returns an [`ExportError`] if the payload cannot be encoded.
pub fn library_to_json(library: &Library, pretty: bool) -> Result<String, ExportError> {
    let doc = json!({
        "version": EXPORT_FORMAT_VERSION,
        "exportedAt": now(),
        "data": {
            "prompts": library.prompts(),
            "categories": library.categories(),
            "tags": library.tags(),
        },
    });
    encode(&doc, pretty)
}

/// Serializes a set of prompts under a top-level `prompts` key.
///
/// # Errors
///
/// Returns an [`ExportError`] if the payload cannot be encoded.
pub fn prompts_to_json(prompts: &[&Prompt], pretty: bool) -> Result<String, ExportError> {
    let doc = json!({
        "version": EXPORT_FORMAT_VERSION,
        "exportedAt": now(),
        "prompts": prompts,
    });
    encode(&doc, pretty)
}

/// Serializes the categories under a top-level `categories` key.
///
/// # Errors
///
/// Returns an [`ExportError`] if the payload cannot be encoded.
pub fn categories_to_json(categories: &[Category], pretty: bool) -> Result<String, ExportError> {
    let doc = json!({
        "version": EXPORT_FORMAT_VERSION,
        "exportedAt": now(),
        "categories": categories,
    });
    encode(&doc, pretty)
}

/// Serializes the tags under a top-level `tags` key.
///
/// # Errors
///
/// Returns an [`ExportError`] if the payload cannot be encoded.
pub fn tags_to_json(tags: &[Tag], pretty: bool) -> Result<String, ExportError> {
    let doc = json!({
        "version": EXPORT_FORMAT_VERSION,
        "exportedAt": now(),
        "tags": tags,
    });
    encode(&doc, pretty)
}

/// Renders prompts as CSV, one line per prompt.
///
/// Fields containing a comma, quote, or newline are quoted with `""`
/// escaping. Tags are joined by `;` and the category column carries the
/// resolved category name.
#[must_use]
pub fn prompts_to_csv(library: &Library, prompts: &[&Prompt]) -> String {
    let mut out = String::from("ID,Title,Content,Tags,Category,Created At,Updated At\n");

    for prompt in prompts {
        let category = prompt
            .category_id()
            .and_then(|id| library.category(id))
            .map_or_else(String::new, |c| c.name().to_string());

        let fields = [
            prompt.id().to_string(),
            prompt.title().to_string(),
            prompt.content().to_string(),
            prompt.tags().join(";"),
            category,
            iso(prompt.created_at()),
            iso(prompt.updated_at()),
        ];
        let row: Vec<String> = fields.iter().map(|f| csv_escape(f)).collect();
        out.push_str(&row.join(","));
        out.push('\n');
    }

    out
}

/// Renders one prompt as a standalone document.
///
/// # Errors
///
/// Returns an [`ExportError`] if the JSON rendering cannot be encoded; the
/// markdown and text renderings never fail.
pub fn prompt_to_doc(
    prompt: &Prompt,
    format: PromptDocFormat,
    pretty: bool,
) -> Result<String, ExportError> {
    match format {
        PromptDocFormat::Markdown => Ok(prompt_to_markdown(prompt)),
        PromptDocFormat::Text => Ok(prompt_to_text(prompt)),
        PromptDocFormat::Json => encode(prompt, pretty),
    }
}

fn prompt_to_markdown(prompt: &Prompt) -> String {
    let mut doc = format!("# {}\n\n", prompt.title());
    if let Some(description) = prompt.description() {
        doc.push_str(&format!("> {description}\n\n"));
    }
    doc.push_str(&format!("**Tags**: {}\n\n", tag_list(prompt)));
    doc.push_str(&format!(
        "**Created**: {}\n\n---\n\n",
        prompt.created_at().format("%Y-%m-%d %H:%M:%S")
    ));
    doc.push_str(prompt.content());
    doc
}

fn prompt_to_text(prompt: &Prompt) -> String {
    format!(
        "Title: {}\nDescription: {}\nTags: {}\nCreated: {}\n\n{}",
        prompt.title(),
        prompt.description().unwrap_or("none"),
        tag_list(prompt),
        prompt.created_at().format("%Y-%m-%d %H:%M:%S"),
        prompt.content()
    )
}

fn tag_list(prompt: &Prompt) -> String {
    if prompt.tags().is_empty() {
        "none".to_string()
    } else {
        prompt.tags().join(", ")
    }
}

fn csv_escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn iso(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn now() -> String {
    iso(Utc::now())
}

fn encode<T: Serialize>(value: &T, pretty: bool) -> Result<String, ExportError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}
