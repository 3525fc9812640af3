//! Workspace settings.
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::ConfigManager;
pub use types::{
    AttributeConfig,
    ConfigError,
    I18nSettings,
    TranslationFilesConfig,
    ValidationError,
};
