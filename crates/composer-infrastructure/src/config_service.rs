//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the composer configuration
//! from the configuration file (~/.config/composer/config.toml) and caches it
//! for the rest of the process.

use composer_core::config::ComposerConfig;
use composer_core::{ComposerError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

const CONFIG_DIR: &str = "composer";
const CONFIG_FILE: &str = "config.toml";

/// Configuration service that loads and caches the composer configuration.
///
/// This implementation reads the configuration from config.toml
/// and caches it to avoid repeated file I/O operations.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: Option<PathBuf>,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<ComposerConfig>>>,
}

impl ConfigService {
    /// Creates a ConfigService reading the default config path.
    ///
    /// The configuration is loaded lazily on first access.
    pub fn new() -> Self {
        Self {
            path: default_config_path(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    /// Creates a ConfigService reading an explicit file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Gets the configuration, loading from file if not cached.
    ///
    /// A missing file yields defaults silently; an unreadable, malformed or
    /// invalid one yields defaults with a warning.
    pub fn get_config(&self) -> ComposerConfig {
        self.try_get_config().unwrap_or_else(|e| {
            tracing::warn!(target: "composer::config", error = %e, "Falling back to default configuration");
            let defaults = ComposerConfig::default();
            self.store(defaults.clone());
            defaults
        })
    }

    /// Like [`get_config`](Self::get_config), but returns the load error
    /// instead of falling back. Only a successful load is cached.
    pub fn try_get_config(&self) -> Result<ComposerConfig> {
        {
            let read_lock = self.config.read().unwrap_or_else(|e| e.into_inner());
            if let Some(ref cached) = *read_lock {
                return Ok(cached.clone());
            }
        }

        let loaded = self.load()?;
        self.store(loaded.clone());
        Ok(loaded)
    }

    fn store(&self, config: ComposerConfig) {
        let mut write_lock = self.config.write().unwrap_or_else(|e| e.into_inner());
        *write_lock = Some(config);
    }

    /// Reads the config file without touching the cache.
    pub fn load(&self) -> Result<ComposerConfig> {
        let Some(path) = self.path.as_deref() else {
            return Err(ComposerError::config("Could not determine home directory"));
        };
        if !path.exists() {
            tracing::debug!(target: "composer::config", path = %path.display(), "No config file, using defaults");
            return Ok(ComposerConfig::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: ComposerConfig = toml::from_str(&content)?;
        config.validate()?;
        tracing::debug!(target: "composer::config", path = %path.display(), "Configuration loaded");
        Ok(config)
    }

    /// Writes `config` to the config file and refreshes the cache.
    pub fn save(&self, config: &ComposerConfig) -> Result<()> {
        let Some(path) = self.path.as_deref() else {
            return Err(ComposerError::config("Could not determine home directory"));
        };
        config.validate()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(config)?)?;
        tracing::info!(target: "composer::config", path = %path.display(), "Configuration saved");

        self.store(config.clone());
        Ok(())
    }
}

impl Default for ConfigService {
    fn default() -> Self {
        Self::new()
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(CONFIG_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let service = ConfigService::with_path(dir.path().join("config.toml"));
        assert_eq!(service.get_config(), ComposerConfig::default());
    }

    #[test]
    fn test_loads_partial_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sdk]\nresponse_delay_ms = 0\nseed = 7\n").unwrap();

        let config = ConfigService::with_path(&path).get_config();
        assert_eq!(config.sdk.response_delay_ms, 0);
        assert_eq!(config.sdk.seed, Some(7));
        assert_eq!(config.sdk.stream_interval_ms, 100);
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sdk\nbroken").unwrap();

        let service = ConfigService::with_path(&path);
        assert!(service.load().is_err());
        assert_eq!(service.get_config(), ComposerConfig::default());
    }

    #[test]
    fn test_cache_survives_file_changes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let service = ConfigService::with_path(&path);
        assert_eq!(service.get_config().auth.session_ttl_minutes, 30);

        std::fs::write(&path, "[auth]\nsession_ttl_minutes = 5\n").unwrap();
        assert_eq!(service.get_config().auth.session_ttl_minutes, 30);
        assert_eq!(ConfigService::with_path(&path).get_config().auth.session_ttl_minutes, 5);
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let service = ConfigService::with_path(&path);

        let mut config = ComposerConfig::default();
        config.deployment.domain = "example.test".to_string();
        service.save(&config).unwrap();

        let reloaded = ConfigService::with_path(&path).load().unwrap();
        assert_eq!(reloaded.deployment.domain, "example.test");
        assert_eq!(service.get_config().deployment.domain, "example.test");
    }

    #[test]
    fn test_out_of_range_ttl_is_rejected_on_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[auth]\nsession_ttl_minutes = 9223372036854775807\n").unwrap();

        let service = ConfigService::with_path(&path);
        assert!(service.load().is_err());
        assert!(service.try_get_config().is_err());
        assert_eq!(service.get_config().auth.session_ttl_minutes, 30);
    }

    #[test]
    fn test_try_get_config_caches_successful_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[logging]\nlevel = \"debug\"\n").unwrap();

        let service = ConfigService::with_path(&path);
        assert_eq!(service.try_get_config().unwrap().logging.level, "debug");

        std::fs::remove_file(&path).unwrap();
        assert_eq!(service.try_get_config().unwrap().logging.level, "debug");
        assert_eq!(service.clone().get_config().logging.level, "debug");
    }
}
