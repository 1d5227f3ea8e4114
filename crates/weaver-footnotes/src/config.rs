//! Editor configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::command::{FOOTNOTE_KEY, FOOTNOTE_MARKER};
use crate::error::ConfigError;
use crate::template::default_types;
use crate::types::PARAGRAPH_BREAK;

/// Names used by the footnote feature. Every field falls back to its default
/// when missing from the serialized form.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Model attribute key holding the footnote title.
    pub attribute_key: SmolStr,
    /// View element name.
    pub element: SmolStr,
    /// Class set on the view element.
    pub class: SmolStr,
    /// Character inserted after a new footnote.
    pub marker: char,
    /// Values offered by the signature dropdown.
    pub signature_types: Vec<SmolStr>,
    /// Values offered by the newsletter form dropdown.
    pub newsletter_form_types: Vec<SmolStr>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            attribute_key: FOOTNOTE_KEY.into(),
            element: "fn".into(),
            class: "footnote".into(),
            marker: FOOTNOTE_MARKER,
            signature_types: default_types(),
            newsletter_form_types: default_types(),
        }
    }
}

impl EditorConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(
            target: "weaver::footnotes",
            path = %path.as_ref().display(),
            "loading editor config"
        );
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attribute_key.trim().is_empty() {
            return Err(ConfigError::Invalid("attribute_key is empty".into()));
        }
        if self.element.trim().is_empty() {
            return Err(ConfigError::Invalid("element is empty".into()));
        }
        if self.marker == PARAGRAPH_BREAK {
            return Err(ConfigError::Invalid(
                "marker cannot be a paragraph break".into(),
            ));
        }
        let mut types = self.signature_types.iter().chain(&self.newsletter_form_types);
        if types.any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("template types cannot be blank".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_default() {
        let config = EditorConfig::from_json_str(r#"{ "class": "note" }"#).unwrap();
        assert_eq!(config.attribute_key, "footnotes");
        assert_eq!(config.element, "fn");
        assert_eq!(config.class, "note");
        assert_eq!(config.marker, '\u{200D}');
        assert_eq!(config.signature_types, ["date", "first name", "surname"]);
        assert_eq!(config.newsletter_form_types, config.signature_types);
    }

    #[test]
    fn test_template_types_from_json() {
        let config =
            EditorConfig::from_json_str(r#"{ "signature_types": ["company", "title"] }"#).unwrap();
        assert_eq!(config.signature_types, ["company", "title"]);

        let err = EditorConfig::from_json_str(r#"{ "newsletter_form_types": [" "] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_round_trip_through_json() {
        let config = EditorConfig {
            marker: '\u{200B}',
            ..EditorConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(EditorConfig::from_json_str(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_values() {
        let err = EditorConfig::from_json_str(r#"{ "attribute_key": "" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EditorConfig::from_json_str(r#"{ "marker": "\n" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));

        let err = EditorConfig::from_json_str("{ nope").unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = EditorConfig::load("/nonexistent/weaver-footnotes.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
