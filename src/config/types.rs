//! Settings types and their validation.

use std::collections::HashSet;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "attributes.key")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Numbered list of `field_path - message` lines.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    pub translation_files: TranslationFilesConfig,

    /// Separator between the segments of a dotted key.
    pub key_separator: String,

    /// Language active before the first successful switch.
    /// Not checked against the loaded table.
    pub default_language: String,

    pub attributes: AttributeConfig,

    /// Deepest nesting of encapsulated sub-trees that is rendered.
    pub max_shadow_depth: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslationFilesConfig {
    pub file_pattern: String,
}

impl Default for TranslationFilesConfig {
    fn default() -> Self {
        Self { file_pattern: "**/{locales,messages}/**/*.json".to_string() }
    }
}

/// Marker attributes on render targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeConfig {
    /// Carries the dotted key.
    pub key: String,
    /// Carries a JSON object of placeholder values.
    pub vars: String,
    /// Opts the target into unescaped markup output.
    pub html: String,
}

impl Default for AttributeConfig {
    fn default() -> Self {
        Self {
            key: "data-i18n".to_string(),
            vars: "data-i18n-vars".to_string(),
            html: "data-i18n-html".to_string(),
        }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            translation_files: TranslationFilesConfig::default(),
            key_separator: ".".to_string(),
            default_language: "en".to_string(),
            attributes: AttributeConfig::default(),
            max_shadow_depth: 64,
        }
    }
}

impl I18nSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    /// - Attribute names collide
    /// - Zero shadow depth
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.default_language.trim().is_empty() {
            errors.push(ValidationError::new(
                "defaultLanguage",
                "The default language cannot be empty. Example: \"en\"",
            ));
        }

        let attributes = [
            ("attributes.key", &self.attributes.key),
            ("attributes.vars", &self.attributes.vars),
            ("attributes.html", &self.attributes.html),
        ];
        let mut seen = HashSet::new();
        for (field_path, name) in attributes {
            if name.trim().is_empty() {
                errors.push(ValidationError::new(field_path, "The attribute name cannot be empty"));
            } else if !seen.insert(name.as_str()) {
                errors.push(ValidationError::new(
                    field_path,
                    format!("The attribute name '{name}' is already used by another marker"),
                ));
            }
        }

        if self.translation_files.file_pattern.is_empty() {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                "The pattern cannot be empty. Example: \"**/{locales,messages}/**/*.json\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.translation_files.file_pattern) {
            errors.push(ValidationError::new(
                "translationFiles.filePattern",
                format!("Invalid glob pattern '{}': {e}", self.translation_files.file_pattern),
            ));
        }

        if self.max_shadow_depth == 0 {
            errors.push(ValidationError::new(
                "maxShadowDepth",
                "Must be at least 1 to render inside encapsulated sub-trees",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}
