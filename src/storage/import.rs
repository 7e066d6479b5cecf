//! Import of previously exported JSON.
//!
//! The importer merges an export payload into an existing library. Three
//! shapes are probed in order: a bare JSON array of prompts, an object with
//! top-level `prompts`/`categories`/`tags` keys, and the full export
//! envelope with its `data` wrapper. Existing records win: prompts and
//! categories are matched by id, tags by case-insensitive name. Item-level
//! problems are collected into the report instead of aborting the run.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{info, instrument};

use crate::domain::{Category, Library, Prompt, Tag, validate};

/// The import payload could not be understood at the top level.
#[derive(Debug, Error)]
pub enum ImportError {
    /// Not valid JSON at all.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// Valid JSON, but none of the known shapes.
    #[error("unrecognized import shape: expected an array of prompts or an export object")]
    UnknownShape,
}

/// Counts and notes from one import run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Prompts added to the library.
    pub prompts: usize,
    /// Categories added to the library.
    pub categories: usize,
    /// Tags added to the library.
    pub tags: usize,
    /// Items left untouched because an equivalent record already exists.
    pub skipped: Vec<String>,
    /// Non-fatal anomalies that were repaired or tolerated.
    pub warnings: Vec<String>,
    /// Items that could not be imported.
    pub errors: Vec<String>,
}

impl ImportReport {
    /// `true` when every item either imported or was skipped cleanly.
    #[must_use]
    pub fn success(&self) -> bool {
        self.errors.is_empty()
    }

    /// Total number of records added.
    #[must_use]
    pub const fn imported(&self) -> usize {
        self.prompts + self.categories + self.tags
    }
}

#[derive(Debug, Deserialize)]
struct ExportEnvelope {
    data: Sections,
}

#[derive(Debug, Default, Deserialize)]
struct Sections {
    #[serde(default)]
    prompts: Vec<Value>,
    #[serde(default)]
    categories: Vec<Value>,
    #[serde(default)]
    tags: Vec<Value>,
}

/// Merges an export payload into the library.
///
/// # Errors
///
/// Returns an [`ImportError`] if the payload is not JSON or matches none of
/// the known shapes. In that case the library is untouched.
#[instrument(skip_all)]
pub fn import_json(library: &mut Library, text: &str) -> Result<ImportReport, ImportError> {
    let value: Value = serde_json::from_str(text)?;
    let sections = classify(value)?;

    let mut report = ImportReport::default();
    for (index, item) in sections.categories.into_iter().enumerate() {
        import_category(library, item, index, &mut report);
    }
    for (index, item) in sections.tags.into_iter().enumerate() {
        import_tag(library, item, index, &mut report);
    }
    for (index, item) in sections.prompts.into_iter().enumerate() {
        import_prompt(library, item, index, &mut report);
    }

    library.refresh_counts();
    info!(
        imported = report.imported(),
        skipped = report.skipped.len(),
        errors = report.errors.len(),
        "import finished"
    );
    Ok(report)
}

fn classify(value: Value) -> Result<Sections, ImportError> {
    match value {
        Value::Array(items) => Ok(Sections {
            prompts: items,
            ..Sections::default()
        }),
        Value::Object(map) => {
            if map.contains_key("prompts")
                || map.contains_key("categories")
                || map.contains_key("tags")
            {
                Ok(serde_json::from_value(Value::Object(map))?)
            } else if map.contains_key("data") {
                let envelope: ExportEnvelope = serde_json::from_value(Value::Object(map))?;
                Ok(envelope.data)
            } else {
                Err(ImportError::UnknownShape)
            }
        }
        _ => Err(ImportError::UnknownShape),
    }
}

fn import_prompt(library: &mut Library, item: Value, index: usize, report: &mut ImportReport) {
    let mut prompt: Prompt = match serde_json::from_value(item) {
        Ok(prompt) => prompt,
        Err(error) => {
            report.errors.push(format!("prompt {}: {error}", index + 1));
            return;
        }
    };

    if library.prompt(prompt.id()).is_some() {
        report
            .skipped
            .push(format!("prompt '{}' already exists", prompt.title()));
        return;
    }
    if let Err(error) = validate::validate_content(prompt.content()) {
        report
            .errors
            .push(format!("prompt '{}': {error}", prompt.title()));
        return;
    }

    for note in prompt.repair_history() {
        report
            .warnings
            .push(format!("prompt '{}': {note}", prompt.title()));
    }

    library.insert_prompt_record(prompt);
    report.prompts += 1;
}

fn import_category(library: &mut Library, item: Value, index: usize, report: &mut ImportReport) {
    let category: Category = match serde_json::from_value(item) {
        Ok(category) => category,
        Err(error) => {
            report.errors.push(format!("category {}: {error}", index + 1));
            return;
        }
    };

    if library.category(category.id()).is_some() {
        report
            .skipped
            .push(format!("category '{}' already exists", category.name()));
        return;
    }
    if let Err(error) = validate::validate_category_name(category.name())
        .and_then(|()| validate::validate_color(category.color()))
    {
        report
            .errors
            .push(format!("category '{}': {error}", category.name()));
        return;
    }

    library.insert_category_record(category);
    report.categories += 1;
}

fn import_tag(library: &mut Library, item: Value, index: usize, report: &mut ImportReport) {
    let tag: Tag = match serde_json::from_value(item) {
        Ok(tag) => tag,
        Err(error) => {
            report.errors.push(format!("tag {}: {error}", index + 1));
            return;
        }
    };

    if library.tag_by_name(tag.name()).is_some() {
        report
            .skipped
            .push(format!("tag '{}' already exists", tag.name()));
        return;
    }
    if let Err(error) = validate::validate_tag_name(tag.name())
        .and_then(|()| validate::validate_color(tag.color()))
    {
        report.errors.push(format!("tag '{}': {error}", tag.name()));
        return;
    }

    library.insert_tag_record(tag);
    report.tags += 1;
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use uuid::Uuid;

    use super::*;
    use crate::domain::Config;

    fn library() -> Library {
        Library::new(Config::default())
    }

    fn prompt_value(id: Uuid, title: &str, content: &str) -> Value {
        let version_id = Uuid::new_v4();
        json!({
            "id": id,
            "title": title,
            "content": content,
            "tags": [],
            "versions": [{
                "id": version_id,
                "version": 1,
                "content": content,
                "changeLog": "Initial version",
                "createdAt": "2024-01-01T00:00:00Z",
                "checksum": "abc123"
            }],
            "currentVersion": 1,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z",
            "isFavorite": false
        })
    }

    #[test]
    fn bare_array_imports_prompts() {
        let mut library = library();
        let payload = json!([prompt_value(Uuid::new_v4(), "One", "a")]).to_string();

        let report = import_json(&mut library, &payload).unwrap();

        assert!(report.success());
        assert_eq!(report.prompts, 1);
        assert_eq!(library.prompts().len(), 1);
        assert_eq!(library.prompts()[0].title(), "One");
    }

    #[test]
    fn top_level_keys_import_all_sections() {
        let mut library = library();
        let payload = json!({
            "prompts": [prompt_value(Uuid::new_v4(), "One", "a")],
            "categories": [{
                "id": Uuid::new_v4(),
                "name": "Writing",
                "color": "#aabbcc",
                "promptCount": 0,
                "order": 0,
                "createdAt": "2024-01-01T00:00:00Z"
            }],
            "tags": [{
                "id": Uuid::new_v4(),
                "name": "draft",
                "color": "#aabbcc",
                "usageCount": 0,
                "createdAt": "2024-01-01T00:00:00Z"
            }]
        })
        .to_string();

        let report = import_json(&mut library, &payload).unwrap();

        assert!(report.success());
        assert_eq!((report.prompts, report.categories, report.tags), (1, 1, 1));
        assert!(library.category_by_name("Writing").is_some());
        assert!(library.tag_by_name("draft").is_some());
    }

    #[test]
    fn data_wrapper_imports() {
        let mut library = library();
        let payload = json!({
            "version": "1.0",
            "exportedAt": "2024-06-01T00:00:00Z",
            "data": { "prompts": [prompt_value(Uuid::new_v4(), "Wrapped", "a")] }
        })
        .to_string();

        let report = import_json(&mut library, &payload).unwrap();

        assert_eq!(report.prompts, 1);
        assert_eq!(library.prompts()[0].title(), "Wrapped");
    }

    #[test]
    fn reimporting_the_same_payload_skips_everything() {
        let mut library = library();
        let payload = json!([prompt_value(Uuid::new_v4(), "Once", "a")]).to_string();

        import_json(&mut library, &payload).unwrap();
        let second = import_json(&mut library, &payload).unwrap();

        assert!(second.success());
        assert_eq!(second.prompts, 0);
        assert_eq!(second.skipped.len(), 1);
        assert_eq!(library.prompts().len(), 1);
    }

    #[test]
    fn tag_collisions_match_case_insensitively() {
        let mut library = library();
        library.create_tag("Rust".to_string(), None).unwrap();
        let payload = json!({
            "tags": [{
                "id": Uuid::new_v4(),
                "name": "rust",
                "color": "#aabbcc",
                "usageCount": 3,
                "createdAt": "2024-01-01T00:00:00Z"
            }]
        })
        .to_string();

        let report = import_json(&mut library, &payload).unwrap();

        assert_eq!(report.tags, 0);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(library.tags().len(), 1);
    }

    #[test]
    fn bad_items_are_collected_and_the_rest_import() {
        let mut library = library();
        let payload = json!([
            prompt_value(Uuid::new_v4(), "Good", "a"),
            { "id": "not-a-uuid", "title": "Bad" }
        ])
        .to_string();

        let report = import_json(&mut library, &payload).unwrap();

        assert!(!report.success());
        assert_eq!(report.prompts, 1);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(library.prompts().len(), 1);
    }

    #[test]
    fn empty_title_is_rejected_per_item() {
        let mut library = library();
        let payload = json!([prompt_value(Uuid::new_v4(), "", "a")]).to_string();

        let report = import_json(&mut library, &payload).unwrap();

        assert_eq!(report.prompts, 0);
        assert_eq!(report.errors.len(), 1);
        assert!(library.prompts().is_empty());
    }

    #[test]
    fn missing_versions_are_seeded_with_a_warning() {
        let mut library = library();
        let payload = json!([{
            "id": Uuid::new_v4(),
            "title": "Bare",
            "content": "only content",
            "versions": [],
            "currentVersion": 1,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }])
        .to_string();

        let report = import_json(&mut library, &payload).unwrap();

        assert_eq!(report.prompts, 1);
        assert_eq!(report.warnings.len(), 1);
        let prompt = &library.prompts()[0];
        assert_eq!(prompt.versions().len(), 1);
        assert_eq!(prompt.current().unwrap().content(), "only content");
    }

    #[test]
    fn dangling_current_version_is_repointed() {
        let mut library = library();
        let mut value = prompt_value(Uuid::new_v4(), "Dangling", "a");
        value["currentVersion"] = json!(9);
        let payload = json!([value]).to_string();

        let report = import_json(&mut library, &payload).unwrap();

        assert_eq!(report.warnings.len(), 1);
        assert_eq!(library.prompts()[0].current_version(), 1);
    }

    #[test]
    fn unparseable_payload_changes_nothing() {
        let mut library = library();
        let error = import_json(&mut library, "{ nope").unwrap_err();

        assert!(matches!(error, ImportError::Parse(_)));
        assert!(library.prompts().is_empty());
    }

    #[test]
    fn unknown_object_shape_is_rejected() {
        let mut library = library();
        let error = import_json(&mut library, r#"{"foo": 1}"#).unwrap_err();

        assert!(matches!(error, ImportError::UnknownShape));
    }

    #[test]
    fn scalar_payload_is_rejected() {
        let mut library = library();
        let error = import_json(&mut library, "42").unwrap_err();

        assert!(matches!(error, ImportError::UnknownShape));
    }

    #[test]
    fn imported_tags_get_recounted() {
        let mut library = library();
        let mut prompt = prompt_value(Uuid::new_v4(), "Tagged", "a");
        prompt["tags"] = json!(["draft"]);
        let payload = json!({
            "prompts": [prompt],
            "tags": [{
                "id": Uuid::new_v4(),
                "name": "draft",
                "color": "#aabbcc",
                "usageCount": 99,
                "createdAt": "2024-01-01T00:00:00Z"
            }]
        })
        .to_string();

        import_json(&mut library, &payload).unwrap();

        assert_eq!(library.tag_by_name("draft").unwrap().usage_count(), 1);
    }
}
