//! Validated settings of one workspace.

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    I18nSettings,
    loader,
};

/// Settings of one workspace together with the root they were read from.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    /// Validated settings.
    settings: I18nSettings,
    /// Directory holding the settings file and translation files.
    workspace_root: PathBuf,
}

impl ConfigManager {
    /// Read the settings file below `workspace_root`, falling back to defaults
    /// when it is absent.
    ///
    /// # Errors
    /// - File read error
    /// - JSON parse error
    /// - Validation error
    pub fn load(workspace_root: &Path) -> Result<Self, ConfigError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let settings = loader::load_from_workspace(workspace_root)?.unwrap_or_else(|| {
            tracing::debug!("No settings file in {:?}, using defaults", workspace_root);
            I18nSettings::default()
        });
        settings.validate().map_err(ConfigError::ValidationErrors)?;
        tracing::debug!(?settings, "Settings loaded");

        Ok(Self { settings, workspace_root: workspace_root.to_path_buf() })
    }

    #[must_use]
    pub const fn settings(&self) -> &I18nSettings {
        &self.settings
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;

    #[rstest]
    fn test_load_without_settings_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();

        let manager = ConfigManager::load(temp_dir.path()).unwrap();

        assert_eq!(manager.settings(), &I18nSettings::default());
        assert_eq!(manager.workspace_root(), temp_dir.path());
    }

    #[rstest]
    fn test_load_reads_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"defaultLanguage": "es"}"#)
            .unwrap();

        let manager = ConfigManager::load(temp_dir.path()).unwrap();

        assert_eq!(manager.settings().default_language, "es");
        assert_eq!(manager.settings().key_separator, ".");
    }

    #[rstest]
    fn test_load_rejects_invalid_settings() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"maxShadowDepth": 0}"#).unwrap();

        let result = ConfigManager::load(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ValidationErrors(_))));
    }

    #[rstest]
    fn test_load_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), "{ nope").unwrap();

        let result = ConfigManager::load(temp_dir.path());

        assert!(matches!(result, Err(ConfigError::ParseError(_))));
    }
}
