//! Settings store configuration and the language pin policy.

use serde::{Deserialize, Serialize};

use crate::error::{SettingsError, SettingsResult};
use crate::model::{Settings, DEFAULT_LANGUAGE};

/// Durable store key the settings record is written under.
pub const DEFAULT_STORAGE_KEY: &str = "settings";

/// Construction-time configuration for a settings scope.
///
/// `pinned_language` holds the language every observed and persisted
/// record is forced to. It defaults to `Some("Cpp")`; `None` lets the
/// language follow its setter like any other field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub storage_key: String,
    pub pinned_language: Option<String>,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            pinned_language: Some(DEFAULT_LANGUAGE.to_string()),
        }
    }
}

impl SettingsConfig {
    /// Parse a TOML document. Missing keys take their defaults. An empty
    /// `pinned_language` string disables the pin.
    pub fn from_toml_str(s: &str) -> SettingsResult<Self> {
        let mut config: Self =
            toml::from_str(s).map_err(|e| SettingsError::Config(e.to_string()))?;
        if config.pinned_language.as_deref() == Some("") {
            config.pinned_language = None;
        }
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no scope can run with.
    pub fn validate(&self) -> SettingsResult<()> {
        if self.storage_key.trim().is_empty() {
            return Err(SettingsError::Config("storage_key must not be empty".into()));
        }
        Ok(())
    }

    pub fn with_storage_key(mut self, key: impl Into<String>) -> Self {
        self.storage_key = key.into();
        self
    }

    /// Pin the language to `language`.
    pub fn pinned(mut self, language: impl Into<String>) -> Self {
        self.pinned_language = Some(language.into());
        self
    }

    /// Let the language field change freely.
    pub fn unpinned(mut self) -> Self {
        self.pinned_language = None;
        self
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_language.is_some()
    }

    /// Force the pinned field onto `settings`.
    ///
    /// Every seed, mutation, reset and persisted snapshot passes through
    /// here, so the pinned value is the only language ever observed.
    pub fn apply_pin(&self, mut settings: Settings) -> Settings {
        if let Some(language) = &self.pinned_language {
            settings.language.clone_from(language);
        }
        settings
    }
}
