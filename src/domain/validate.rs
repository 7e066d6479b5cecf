//! Field validation rules shared by the library and the importer.

use std::{fmt, ops::Deref, str::FromStr, sync::OnceLock};

use non_empty_string::NonEmptyString;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Maximum length of a prompt title, in characters.
pub const MAX_TITLE_LEN: usize = 200;
/// Maximum length of a prompt description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 500;
/// Maximum length of a category name, in characters.
pub const MAX_CATEGORY_NAME_LEN: usize = 100;
/// Maximum length of a tag name, in characters.
pub const MAX_TAG_NAME_LEN: usize = 50;

/// The reason a field value was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Title was empty or whitespace-only.
    #[error("title must not be empty")]
    EmptyTitle,
    /// Title exceeded [`MAX_TITLE_LEN`].
    #[error("title must be at most {MAX_TITLE_LEN} characters")]
    TitleTooLong,
    /// Content was empty or whitespace-only.
    #[error("content must not be empty")]
    EmptyContent,
    /// Description exceeded [`MAX_DESCRIPTION_LEN`].
    #[error("description must be at most {MAX_DESCRIPTION_LEN} characters")]
    DescriptionTooLong,
    /// Category name was empty or whitespace-only.
    #[error("category name must not be empty")]
    EmptyCategoryName,
    /// Category name exceeded [`MAX_CATEGORY_NAME_LEN`].
    #[error("category name must be at most {MAX_CATEGORY_NAME_LEN} characters")]
    CategoryNameTooLong,
    /// Tag name was empty or whitespace-only.
    #[error("tag name must not be empty")]
    EmptyTagName,
    /// Tag name exceeded [`MAX_TAG_NAME_LEN`].
    #[error("tag name must be at most {MAX_TAG_NAME_LEN} characters")]
    TagNameTooLong,
    /// Color was not a six-digit hex code.
    #[error("color '{0}' is not a hex color like #1a2b3c")]
    InvalidColor(String),
}

/// A validated prompt title: non-empty, at most [`MAX_TITLE_LEN`] characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Title(NonEmptyString);

impl Title {
    /// Creates a new `Title` from a string.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyTitle`] if the string is empty or
    /// whitespace-only, and [`ValidationError::TitleTooLong`] if it exceeds
    /// [`MAX_TITLE_LEN`] characters.
    pub fn new(s: String) -> Result<Self, ValidationError> {
        if s.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if s.chars().count() > MAX_TITLE_LEN {
            return Err(ValidationError::TitleTooLong);
        }
        let non_empty = NonEmptyString::new(s).map_err(|_| ValidationError::EmptyTitle)?;
        Ok(Self(non_empty))
    }

    /// Returns the string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for Title {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Title {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value.to_string())
    }
}

impl From<Title> for String {
    fn from(title: Title) -> Self {
        title.0.to_string()
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Title {
    type Target = str;

    fn deref(&self) -> &Self::Target {
        self.0.as_str()
    }
}

impl fmt::Display for Title {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Title {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

/// Validates prompt content.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyContent`] if the content is empty or
/// whitespace-only.
pub fn validate_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    Ok(())
}

/// Validates a prompt description.
///
/// # Errors
///
/// Returns [`ValidationError::DescriptionTooLong`] if the description exceeds
/// [`MAX_DESCRIPTION_LEN`] characters.
pub fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(ValidationError::DescriptionTooLong);
    }
    Ok(())
}

/// Validates a category name.
///
/// # Errors
///
/// Returns an error if the name is empty, whitespace-only, or exceeds
/// [`MAX_CATEGORY_NAME_LEN`] characters.
pub fn validate_category_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyCategoryName);
    }
    if name.chars().count() > MAX_CATEGORY_NAME_LEN {
        return Err(ValidationError::CategoryNameTooLong);
    }
    Ok(())
}

/// Validates a tag name.
///
/// # Errors
///
/// Returns an error if the name is empty, whitespace-only, or exceeds
/// [`MAX_TAG_NAME_LEN`] characters.
pub fn validate_tag_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyTagName);
    }
    if name.chars().count() > MAX_TAG_NAME_LEN {
        return Err(ValidationError::TagNameTooLong);
    }
    Ok(())
}

/// Validates a display color.
///
/// # Errors
///
/// Returns [`ValidationError::InvalidColor`] if the value is not a `#RRGGBB`
/// hex code.
///
/// # Panics
///
/// Panics if the color pattern fails to compile (which should never happen).
pub fn validate_color(color: &str) -> Result<(), ValidationError> {
    static COLOR: OnceLock<Regex> = OnceLock::new();
    let pattern = COLOR.get_or_init(|| {
        Regex::new("^#[0-9A-Fa-f]{6}$").expect("this pattern is valid")
    });

    if pattern.is_match(color) {
        Ok(())
    } else {
        Err(ValidationError::InvalidColor(color.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_rejects_empty_and_whitespace() {
        assert_eq!(Title::new(String::new()), Err(ValidationError::EmptyTitle));
        assert_eq!(
            Title::new("   ".to_string()),
            Err(ValidationError::EmptyTitle)
        );
    }

    #[test]
    fn title_rejects_oversized() {
        let long = "x".repeat(MAX_TITLE_LEN + 1);
        assert_eq!(Title::new(long), Err(ValidationError::TitleTooLong));
    }

    #[test]
    fn title_accepts_boundary_length() {
        let max = "x".repeat(MAX_TITLE_LEN);
        let title = Title::new(max.clone()).unwrap();
        assert_eq!(title.as_str(), max);
    }

    #[test]
    fn content_must_not_be_blank() {
        assert!(validate_content("hello").is_ok());
        assert_eq!(validate_content(""), Err(ValidationError::EmptyContent));
        assert_eq!(validate_content("  \n"), Err(ValidationError::EmptyContent));
    }

    #[test]
    fn description_length_ceiling() {
        assert!(validate_description(&"d".repeat(MAX_DESCRIPTION_LEN)).is_ok());
        assert_eq!(
            validate_description(&"d".repeat(MAX_DESCRIPTION_LEN + 1)),
            Err(ValidationError::DescriptionTooLong)
        );
    }

    #[test]
    fn tag_name_length_ceiling() {
        assert!(validate_tag_name(&"t".repeat(MAX_TAG_NAME_LEN)).is_ok());
        assert_eq!(
            validate_tag_name(&"t".repeat(MAX_TAG_NAME_LEN + 1)),
            Err(ValidationError::TagNameTooLong)
        );
    }

    #[test]
    fn color_accepts_hex_codes() {
        assert!(validate_color("#1a2b3c").is_ok());
        assert!(validate_color("#ABCDEF").is_ok());
        assert!(validate_color("#000000").is_ok());
    }

    #[test]
    fn color_rejects_malformed_values() {
        for bad in ["red", "#12345", "#1234567", "112233", "#12g45z", ""] {
            assert_eq!(
                validate_color(bad),
                Err(ValidationError::InvalidColor(bad.to_string())),
                "expected rejection for {bad:?}"
            );
        }
    }
}
