//! Application configuration
//!
//! This module re-exports the shared `AppConfig` from skirmish-types and
//! provides platform-specific defaults and persistence for it.

use std::path::PathBuf;

pub use skirmish_types::AppConfig;

use super::ConfigError;

const APP_NAME: &str = "skirmish";
const CONFIG_NAME: &str = "config";

// ─────────────────────────────────────────────────────────────────────────────
// Platform-Specific Defaults
// ─────────────────────────────────────────────────────────────────────────────

fn default_data_directory() -> String {
    dirs::data_local_dir()
        .map(|p| p.join(APP_NAME))
        .and_then(|p| p.to_str().map(String::from))
        .unwrap_or_default()
}

// ─────────────────────────────────────────────────────────────────────────────
// AppConfig Extensions
// ─────────────────────────────────────────────────────────────────────────────

/// Extension trait for AppConfig persistence and path resolution
pub trait AppConfigExt: Sized {
    fn load() -> Self;
    fn try_load() -> Result<Self, ConfigError>;
    fn load_with_defaults() -> Self;
    fn save(&self) -> Result<(), ConfigError>;
    fn config_path() -> Result<PathBuf, ConfigError>;
    fn data_dir(&self) -> Result<PathBuf, ConfigError>;
    fn snapshot_path(&self) -> Result<PathBuf, ConfigError>;
}

impl AppConfigExt for AppConfig {
    fn load() -> Self {
        Self::try_load().unwrap_or_else(|err| {
            tracing::warn!(error = %err, "Using default configuration");
            Self::load_with_defaults()
        })
    }

    fn try_load() -> Result<Self, ConfigError> {
        let config: AppConfig = confy::load(APP_NAME, CONFIG_NAME)?;
        if config.data_directory.is_empty() {
            return Ok(AppConfig {
                data_directory: default_data_directory(),
                ..config
            });
        }
        Ok(config)
    }

    /// Load with platform-specific defaults (used when no config file exists)
    fn load_with_defaults() -> Self {
        AppConfig::with_data_directory(default_data_directory())
    }

    fn save(&self) -> Result<(), ConfigError> {
        confy::store(APP_NAME, CONFIG_NAME, self).map_err(ConfigError::Save)
    }

    fn config_path() -> Result<PathBuf, ConfigError> {
        confy::get_configuration_file_path(APP_NAME, CONFIG_NAME).map_err(ConfigError::Locate)
    }

    fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        if !self.data_directory.is_empty() {
            return Ok(PathBuf::from(&self.data_directory));
        }
        let fallback = default_data_directory();
        if fallback.is_empty() {
            return Err(ConfigError::NoDataDirectory {
                path: Self::config_path().unwrap_or_default(),
            });
        }
        Ok(PathBuf::from(fallback))
    }

    fn snapshot_path(&self) -> Result<PathBuf, ConfigError> {
        Ok(self.data_dir()?.join(&self.snapshot_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_path_joins_data_directory() {
        let config = AppConfig::with_data_directory("/tmp/skirmish-test".to_string());
        assert_eq!(
            config.snapshot_path().unwrap(),
            PathBuf::from("/tmp/skirmish-test/roster.json")
        );
    }

    #[test]
    fn custom_snapshot_file_name() {
        let config = AppConfig {
            snapshot_file: "tuesday.json".to_string(),
            ..AppConfig::with_data_directory("/srv/campaign".to_string())
        };
        assert_eq!(
            config.snapshot_path().unwrap(),
            PathBuf::from("/srv/campaign/tuesday.json")
        );
    }

    #[test]
    fn config_survives_toml() {
        let config = AppConfig {
            rng_seed: Some(99),
            max_results: 50,
            ..AppConfig::default()
        };
        let text = toml::to_string(&config).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back, config);
    }
}
