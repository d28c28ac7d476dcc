// Tab Sidebar Settings Engine
// Loads panel settings from a JSON file and applies in-memory updates by dot path.
// The panel keeps no persistent state, so nothing is written back.

use std::fs;
use std::path::{Path, PathBuf};

use crate::services::localization_engine::SUPPORTED_LOCALES;
use crate::types::errors::SettingsError;
use crate::types::settings::PanelSettings;

/// Environment variable that overrides the settings file location.
pub const CONFIG_ENV_VAR: &str = "TAB_SIDEBAR_CONFIG";

/// Trait defining the settings engine interface.
pub trait SettingsEngineTrait {
    fn load(&mut self) -> Result<PanelSettings, SettingsError>;
    fn get_settings(&self) -> &PanelSettings;
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError>;
    fn reset(&mut self);
    fn get_config_path(&self) -> &str;
}

/// Settings engine backed by a read-only JSON file.
pub struct SettingsEngine {
    config_path: String,
    settings: PanelSettings,
}

impl SettingsEngine {
    /// Creates a new SettingsEngine.
    ///
    /// The config file is `path_override` when given, else `$TAB_SIDEBAR_CONFIG`,
    /// else `settings.json` under the platform config directory.
    pub fn new(path_override: Option<String>) -> Self {
        let config_path = path_override
            .or_else(|| std::env::var(CONFIG_ENV_VAR).ok().filter(|p| !p.is_empty()))
            .unwrap_or_else(|| default_config_path().to_string_lossy().to_string());

        Self {
            config_path,
            settings: PanelSettings::default(),
        }
    }

    /// Whether the config file exists on disk.
    pub fn config_exists(&self) -> bool {
        Path::new(&self.config_path).exists()
    }
}

/// `<config dir>/tab-sidebar/settings.json`, or a relative path when the
/// platform has no config directory.
fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tab-sidebar")
        .join("settings.json")
}

/// Rejects values that deserialize but make no sense for the panel.
fn validate(settings: &PanelSettings) -> Result<(), SettingsError> {
    if settings.history.max_entries < 2 {
        return Err(SettingsError::InvalidValue {
            key: "history.max_entries".to_string(),
            reason: format!("must be at least 2, got {}", settings.history.max_entries),
        });
    }
    if !SUPPORTED_LOCALES.contains(&settings.general.language.as_str()) {
        return Err(SettingsError::InvalidValue {
            key: "general.language".to_string(),
            reason: format!("unsupported locale '{}'", settings.general.language),
        });
    }
    Ok(())
}

impl SettingsEngineTrait for SettingsEngine {
    /// Loads settings from the JSON config file.
    ///
    /// If the file does not exist, returns default settings.
    /// If the file exists but is malformed, returns a serialization error.
    fn load(&mut self) -> Result<PanelSettings, SettingsError> {
        let path = Path::new(&self.config_path);

        if !path.exists() {
            log::debug!("No settings file at {}, using defaults", self.config_path);
            self.settings = PanelSettings::default();
            return Ok(self.settings.clone());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| SettingsError::IoError(format!("Failed to read config file: {}", e)))?;

        let settings: PanelSettings = serde_json::from_str(&content).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to parse config file: {}", e))
        })?;
        validate(&settings)?;

        self.settings = settings;
        Ok(self.settings.clone())
    }

    /// Returns a reference to the current in-memory settings.
    fn get_settings(&self) -> &PanelSettings {
        &self.settings
    }

    /// Updates an individual setting by dot-notation key path.
    ///
    /// The settings are round-tripped through a `serde_json::Value` so the new
    /// value is type-checked by deserialization.
    ///
    /// # Examples
    /// - `"history.max_entries"` → updates `settings.history.max_entries`
    /// - `"groups.default_color"` → updates `settings.groups.default_color`
    fn set_value(&mut self, key: &str, value: serde_json::Value) -> Result<(), SettingsError> {
        if key.is_empty() {
            return Err(SettingsError::InvalidKey("Key cannot be empty".to_string()));
        }

        let parts: Vec<&str> = key.split('.').collect();
        let (last, parents) = match parts.split_last() {
            Some(split) => split,
            None => return Err(SettingsError::InvalidKey("Key cannot be empty".to_string())),
        };

        let mut json_value = serde_json::to_value(&self.settings).map_err(|e| {
            SettingsError::SerializationError(format!("Failed to serialize settings: {}", e))
        })?;

        let mut current = &mut json_value;
        for part in parents {
            current = current
                .get_mut(*part)
                .ok_or_else(|| SettingsError::InvalidKey(format!("Key '{}' not found in settings", key)))?;
        }
        match current {
            serde_json::Value::Object(map) if map.contains_key(*last) => {
                map.insert(last.to_string(), value);
            }
            serde_json::Value::Object(_) => {
                return Err(SettingsError::InvalidKey(format!(
                    "Key '{}' not found in settings",
                    key
                )));
            }
            _ => {
                return Err(SettingsError::InvalidKey(format!(
                    "Cannot navigate to key '{}': intermediate value is not an object",
                    key
                )));
            }
        }

        let new_settings: PanelSettings =
            serde_json::from_value(json_value).map_err(|e| SettingsError::InvalidValue {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        validate(&new_settings)?;

        self.settings = new_settings;
        Ok(())
    }

    /// Restores factory defaults in memory.
    fn reset(&mut self) {
        self.settings = PanelSettings::default();
    }

    fn get_config_path(&self) -> &str {
        &self.config_path
    }
}
