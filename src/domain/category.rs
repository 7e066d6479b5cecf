//! Category and tag reference entities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::validate::{
    ValidationError, validate_category_name, validate_color, validate_tag_name,
};

/// A named grouping for prompts, arranged in a hierarchy via `parent_id`.
///
/// `prompt_count` is derived from the prompt collection and refreshed by the
/// library after mutations; it is persisted for display but never trusted as
/// a source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) description: Option<String>,
    pub(crate) color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) parent_id: Option<Uuid>,
    #[serde(default)]
    pub(crate) prompt_count: u32,
    #[serde(default)]
    pub(crate) order: u32,
    pub(crate) created_at: DateTime<Utc>,
}

/// A label attached to prompts, unique by case-insensitive name.
///
/// `usage_count` is derived, like [`Category::prompt_count`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) color: String,
    #[serde(default)]
    pub(crate) usage_count: u32,
    pub(crate) created_at: DateTime<Utc>,
}

/// A partial update to a category's mutable fields.
#[derive(Debug, Clone, Default)]
pub struct CategoryPatch {
    /// Replacement name.
    pub name: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement color.
    pub color: Option<String>,
    /// Replacement parent; `Some(None)` makes the category a root.
    pub parent_id: Option<Option<Uuid>>,
    /// Replacement display order.
    pub order: Option<u32>,
}

/// A category with its nested children, ready for tree display.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryNode {
    /// The category itself, flattened into the node.
    #[serde(flatten)]
    pub category: Category,
    /// Child nodes, ordered by `order` then name.
    pub children: Vec<CategoryNode>,
}

impl Category {
    /// Creates a category.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or color fails the field
    /// rules.
    pub fn new(
        name: String,
        color: String,
        parent_id: Option<Uuid>,
    ) -> Result<Self, ValidationError> {
        validate_category_name(&name)?;
        validate_color(&color)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            description: None,
            color,
            parent_id,
            prompt_count: 0,
            order: 0,
            created_at: Utc::now(),
        })
    }

    /// The category's stable identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The category's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The category's description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The category's display color.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// The parent category, if this is not a root.
    #[must_use]
    pub const fn parent_id(&self) -> Option<Uuid> {
        self.parent_id
    }

    /// How many prompts are filed under this category.
    #[must_use]
    pub const fn prompt_count(&self) -> u32 {
        self.prompt_count
    }

    /// The category's position among its siblings.
    #[must_use]
    pub const fn order(&self) -> u32 {
        self.order
    }

    /// When the category was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl Tag {
    /// Creates a tag.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name or color fails the field
    /// rules.
    pub fn new(name: String, color: String) -> Result<Self, ValidationError> {
        validate_tag_name(&name)?;
        validate_color(&color)?;

        Ok(Self {
            id: Uuid::new_v4(),
            name,
            color,
            usage_count: 0,
            created_at: Utc::now(),
        })
    }

    /// The tag's stable identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// The tag's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The tag's display color.
    #[must_use]
    pub fn color(&self) -> &str {
        &self.color
    }

    /// How many prompts carry this tag.
    #[must_use]
    pub const fn usage_count(&self) -> u32 {
        self.usage_count
    }

    /// When the tag was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_rejects_bad_color() {
        let error = Category::new("Writing".to_string(), "blue".to_string(), None).unwrap_err();
        assert_eq!(error, ValidationError::InvalidColor("blue".to_string()));
    }

    #[test]
    fn category_rejects_blank_name() {
        let error = Category::new("  ".to_string(), "#000000".to_string(), None).unwrap_err();
        assert_eq!(error, ValidationError::EmptyCategoryName);
    }

    #[test]
    fn new_category_starts_with_zero_counts() {
        let category = Category::new("Writing".to_string(), "#000000".to_string(), None).unwrap();
        assert_eq!(category.prompt_count(), 0);
        assert_eq!(category.order(), 0);
        assert_eq!(category.parent_id(), None);
    }

    #[test]
    fn tag_rejects_oversized_name() {
        let error = Tag::new("t".repeat(51), "#3b82f6".to_string()).unwrap_err();
        assert_eq!(error, ValidationError::TagNameTooLong);
    }

    #[test]
    fn category_wire_format_uses_camel_case_keys() {
        let mut category =
            Category::new("Writing".to_string(), "#000000".to_string(), None).unwrap();
        category.parent_id = Some(Uuid::new_v4());

        let value = serde_json::to_value(&category).unwrap();
        assert!(value.get("parentId").is_some());
        assert!(value.get("promptCount").is_some());
        assert!(value.get("createdAt").is_some());
    }
}
