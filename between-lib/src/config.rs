//! Options for the spacing pass.
//!
//! Options are read from JSON with camelCase keys. Any key left out keeps
//! its default, so a config file only needs the values it changes:
//!
//! ```json
//! { "spaceUnrelatedRule": 2, "headingCommentIdentifiers": ["///"] }
//! ```

use crate::style::heading::HeadingMatcher;
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Heading markers used when none are configured.
pub const DEFAULT_HEADING_IDENTIFIERS: &[&str] = &["---", "===", "___", "+++", "***"];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid options: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid heading comment identifiers: {0}")]
    HeadingPattern(#[from] regex::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Options {
    /// Blank lines between related consecutive rules.
    pub space_related_rule: usize,
    /// Blank lines between unrelated consecutive rules.
    pub space_unrelated_rule: usize,
    /// Blank lines before a heading comment.
    pub space_heading_before: usize,
    /// Blank lines after a heading comment.
    pub space_heading_after: usize,
    /// Blank lines around a conditional group related to the current block.
    pub space_related_at_rule: usize,
    /// Blank lines around an unrelated (or empty) conditional group.
    pub space_unrelated_at_rule: usize,
    /// Put each selector of a selector list on its own line.
    pub break_multiple_selectors: bool,
    /// Substrings marking a comment as a section heading. `[]`, `null` or
    /// `false` turn heading detection off.
    #[serde(deserialize_with = "deserialize_identifiers")]
    pub heading_comment_identifiers: Vec<String>,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            space_related_rule: 0,
            space_unrelated_rule: 1,
            space_heading_before: 2,
            space_heading_after: 1,
            space_related_at_rule: 1,
            space_unrelated_at_rule: 2,
            break_multiple_selectors: false,
            heading_comment_identifiers: DEFAULT_HEADING_IDENTIFIERS
                .iter()
                .map(|id| id.to_string())
                .collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IdentifierList {
    List(Vec<String>),
    Flag(bool),
}

fn deserialize_identifiers<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<IdentifierList>::deserialize(deserializer)? {
        None | Some(IdentifierList::Flag(false)) => Ok(Vec::new()),
        Some(IdentifierList::List(list)) => Ok(list),
        Some(IdentifierList::Flag(true)) => Err(de::Error::custom(
            "headingCommentIdentifiers must be a list of strings, null or false",
        )),
    }
}

impl Options {
    /// Parse options from a JSON object, filling in defaults for missing keys.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read options from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("loaded options from {}", path.display());
        Self::from_json_str(&json)
    }

    pub fn to_json_pretty(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn heading_matcher(&self) -> Result<HeadingMatcher, ConfigError> {
        Ok(HeadingMatcher::new(&self.heading_comment_identifiers)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = Options::default();
        assert_eq!(options.space_related_rule, 0);
        assert_eq!(options.space_unrelated_rule, 1);
        assert_eq!(options.space_heading_before, 2);
        assert_eq!(options.space_heading_after, 1);
        assert_eq!(options.space_related_at_rule, 1);
        assert_eq!(options.space_unrelated_at_rule, 2);
        assert!(!options.break_multiple_selectors);
        assert_eq!(
            options.heading_comment_identifiers,
            vec!["---", "===", "___", "+++", "***"]
        );
    }

    #[test]
    fn test_partial_json_merges_over_defaults() {
        let options =
            Options::from_json_str(r#"{ "spaceUnrelatedRule": 3, "breakMultipleSelectors": true }"#)
                .unwrap();
        assert_eq!(
            options,
            Options {
                space_unrelated_rule: 3,
                break_multiple_selectors: true,
                ..Options::default()
            }
        );
    }

    #[test]
    fn test_empty_object_is_default() {
        assert_eq!(Options::from_json_str("{}").unwrap(), Options::default());
    }

    #[test]
    fn test_identifiers_can_be_disabled() {
        for json in [
            r#"{ "headingCommentIdentifiers": [] }"#,
            r#"{ "headingCommentIdentifiers": null }"#,
            r#"{ "headingCommentIdentifiers": false }"#,
        ] {
            let options = Options::from_json_str(json).unwrap();
            assert!(options.heading_comment_identifiers.is_empty(), "{}", json);
            assert!(!options.heading_matcher().unwrap().is_enabled());
        }
    }

    #[test]
    fn test_identifiers_true_is_rejected() {
        let err = Options::from_json_str(r#"{ "headingCommentIdentifiers": true }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_unknown_and_negative_values_are_rejected() {
        assert!(Options::from_json_str(r#"{ "spaceEverything": 1 }"#).is_err());
        assert!(Options::from_json_str(r#"{ "spaceRelatedRule": -1 }"#).is_err());
    }

    #[test]
    fn test_json_round_trip_uses_camel_case() {
        let json = Options::default().to_json_pretty().unwrap();
        assert!(json.contains("\"spaceHeadingBefore\": 2"));
        assert_eq!(Options::from_json_str(&json).unwrap(), Options::default());
    }

    #[test]
    fn test_missing_file() {
        let err = Options::from_path("/nonexistent/between.json").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
