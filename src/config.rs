//! Options for inlining SVG files
//!
//! Loaded from JSON, for example:
//!
//! ```json
//! { "attributes": { "class": "logo", "width": 120, "height": null }, "stripIds": false }
//! ```
//!
//! `attributes` overrides attributes on the root `<svg>`: strings and numbers
//! set the value, `null` removes the attribute.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read options from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid options JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct InlineOptions {
    /// Root `<svg>` attribute overrides; None removes the attribute
    #[serde(default, deserialize_with = "attribute_overrides")]
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, Option<String>>,
    /// Drop auto-generated editor ids such as `path1234`
    #[serde(default = "enabled")]
    pub strip_ids: bool,
    /// Rewrite `style` attributes into sorted canonical form
    #[serde(default = "enabled")]
    pub clean_styles: bool,
}

fn enabled() -> bool {
    true
}

impl Default for InlineOptions {
    fn default() -> Self {
        InlineOptions {
            attributes: BTreeMap::new(),
            strip_ids: true,
            clean_styles: true,
        }
    }
}

impl InlineOptions {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Set an attribute override
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.attributes.insert(name.into(), Some(value.into()));
        self
    }

    /// Request removal of an attribute
    pub fn remove_attribute(&mut self, name: impl Into<String>) -> &mut Self {
        self.attributes.insert(name.into(), None);
        self
    }
}

/// Accept strings, numbers and booleans as values; `null` means removal
fn attribute_overrides<'de, D>(deserializer: D) -> Result<BTreeMap<String, Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    use serde_json::Value;

    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, value)| {
            let value = match value {
                Value::Null => None,
                Value::String(text) => Some(text),
                Value::Number(number) => Some(number.to_string()),
                Value::Bool(flag) => Some(flag.to_string()),
                other => {
                    return Err(D::Error::custom(format!(
                        "attribute \"{name}\" must be a string, number, boolean or null, got {other}"
                    )))
                }
            };
            Ok((name, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let options = InlineOptions::from_json_str("{}").unwrap();
        assert_eq!(options, InlineOptions::default());
        assert!(options.strip_ids);
        assert!(options.clean_styles);
    }

    #[test]
    fn test_attribute_overrides() {
        let options = InlineOptions::from_json_str(
            r#"{"attributes": {"class": "logo", "width": 120, "height": null}, "cleanStyles": false}"#,
        )
        .unwrap();
        assert_eq!(options.attributes["class"].as_deref(), Some("logo"));
        assert_eq!(options.attributes["width"].as_deref(), Some("120"));
        assert_eq!(options.attributes["height"], None);
        assert!(!options.clean_styles);
    }

    #[test]
    fn test_nested_value_rejected() {
        let result = InlineOptions::from_json_str(r#"{"attributes": {"style": {"fill": "red"}}}"#);
        assert!(matches!(result, Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"stripIds": false}}"#).unwrap();
        let options = InlineOptions::from_json_file(file.path()).unwrap();
        assert!(!options.strip_ids);

        let missing = InlineOptions::from_json_file("/nonexistent/options.json");
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_builder_helpers() {
        let mut options = InlineOptions::default();
        options.set_attribute("class", "icon").remove_attribute("width");
        assert_eq!(options.attributes.len(), 2);
        assert_eq!(options.attributes["width"], None);
    }
}
