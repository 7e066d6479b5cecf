use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a prompt library root.
///
/// This struct holds settings that control how snapshots are written and
/// which display colors newly created categories and tags receive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Versions", into = "Versions")]
pub struct Config {
    /// Whether persisted snapshot files are pretty-printed.
    ///
    /// Compact output is smaller; pretty output diffs better under version
    /// control.
    pretty: bool,

    /// Display color assigned to categories created without an explicit
    /// color.
    default_category_color: String,

    /// Display color assigned to tags created without an explicit color.
    default_tag_color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pretty: default_pretty(),
            default_category_color: default_category_color(),
            default_tag_color: default_tag_color(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file: {e}"))?;
        toml::from_str(&content).map_err(|e| format!("Failed to parse config file: {e}"))
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), String> {
        let content =
            toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize config: {e}"))?;
        std::fs::write(path, content).map_err(|e| format!("Failed to write config file: {e}"))
    }

    /// Whether persisted snapshot files are pretty-printed.
    #[must_use]
    pub const fn pretty(&self) -> bool {
        self.pretty
    }

    /// The color assigned to categories created without an explicit color.
    #[must_use]
    pub fn default_category_color(&self) -> &str {
        &self.default_category_color
    }

    /// The color assigned to tags created without an explicit color.
    #[must_use]
    pub fn default_tag_color(&self) -> &str {
        &self.default_tag_color
    }
}

const fn default_pretty() -> bool {
    true
}

fn default_category_color() -> String {
    "#000000".to_string()
}

fn default_tag_color() -> String {
    "#3b82f6".to_string()
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_pretty")]
        pretty: bool,

        #[serde(default = "default_category_color")]
        default_category_color: String,

        #[serde(default = "default_tag_color")]
        default_tag_color: String,
    },
}

impl From<Versions> for Config {
    fn from(versions: Versions) -> Self {
        match versions {
            Versions::V1 {
                pretty,
                default_category_color,
                default_tag_color,
            } => Self {
                pretty,
                default_category_color,
                default_tag_color,
            },
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            pretty: config.pretty,
            default_category_color: config.default_category_color,
            default_tag_color: config.default_tag_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn load_reads_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(
            b"_version = \"1\"\npretty = false\ndefault_category_color = \"#112233\"\ndefault_tag_color = \"#445566\"\n",
        )
        .unwrap();

        let config = Config::load(file.path()).unwrap();

        assert!(!config.pretty());
        assert_eq!(config.default_category_color(), "#112233");
        assert_eq!(config.default_tag_color(), "#445566");
    }

    #[test]
    fn load_missing_file_returns_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("missing.toml");

        let error = Config::load(&missing).unwrap_err();
        assert!(error.starts_with("Failed to read config file:"));
    }

    #[test]
    fn load_invalid_toml_returns_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"_version = \"1\"\npretty = \"yes\"\n").unwrap();

        let error = Config::load(file.path()).unwrap_err();
        assert!(error.starts_with("Failed to parse config file:"));
    }

    #[test]
    fn empty_file_returns_default() {
        // Tests that deserialising a bare version header returns the default
        // configuration.
        let expected = Config::default();
        let actual: Config = toml::from_str(r#"_version = "1""#).unwrap();
        assert_eq!(actual, expected);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let restored: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(restored, config);
    }
}
