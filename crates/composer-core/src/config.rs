//! Configuration models.
//!
//! Loaded from `~/.config/composer/config.toml` by the infrastructure
//! `ConfigService`. Every section and field has a default, so an empty or
//! missing file yields a working configuration.

use crate::{ComposerError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Session lifetime used when none is configured.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 30;

/// Root configuration structure for config.toml
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    pub sdk: SdkSettings,
    pub auth: AuthSettings,
    pub deployment: DeploymentSettings,
    pub logging: LoggingSettings,
}

impl ComposerConfig {
    /// Same configuration with every simulated delay set to zero.
    pub fn without_delays(mut self) -> Self {
        self.sdk.response_delay_ms = 0;
        self.sdk.stream_interval_ms = 0;
        self.deployment.build_delay_ms = 0;
        self.deployment.deploy_delay_ms = 0;
        self.deployment.finalize_delay_ms = 0;
        self
    }

    /// Rejects values that deserialize fine but cannot be used.
    pub fn validate(&self) -> Result<()> {
        self.auth.session_ttl()?;
        Ok(())
    }
}

/// Mock SDK behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdkSettings {
    pub model: String,
    pub response_delay_ms: u64,
    pub stream_interval_ms: u64,
    /// Seed for response selection. Unset means entropy-seeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SdkSettings {
    fn default() -> Self {
        Self {
            model: "tambo-mock-1".to_string(),
            response_delay_ms: 1000,
            stream_interval_ms: 100,
            seed: None,
        }
    }
}

impl SdkSettings {
    pub fn response_delay(&self) -> Duration {
        Duration::from_millis(self.response_delay_ms)
    }

    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub session_ttl_minutes: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            session_ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
        }
    }
}

impl AuthSettings {
    /// `session_ttl_minutes` as a duration. Must be positive and fit a `chrono::Duration`.
    pub fn session_ttl(&self) -> Result<chrono::Duration> {
        if self.session_ttl_minutes <= 0 {
            return Err(ComposerError::config(format!(
                "auth.session_ttl_minutes must be positive, got {}",
                self.session_ttl_minutes
            )));
        }
        chrono::Duration::try_minutes(self.session_ttl_minutes).ok_or_else(|| {
            ComposerError::config(format!(
                "auth.session_ttl_minutes is out of range: {}",
                self.session_ttl_minutes
            ))
        })
    }
}

/// Delays of the three simulated pipeline steps and the fabricated domain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeploymentSettings {
    pub build_delay_ms: u64,
    pub deploy_delay_ms: u64,
    pub finalize_delay_ms: u64,
    pub domain: String,
}

impl Default for DeploymentSettings {
    fn default() -> Self {
        Self {
            build_delay_ms: 2000,
            deploy_delay_ms: 1500,
            finalize_delay_ms: 500,
            domain: "composer.app".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `tracing` filter directive, e.g. `info` or `composer=debug`.
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: ComposerConfig = toml::from_str("[auth]\nsession_ttl_minutes = 5\n").unwrap();
        assert_eq!(config.auth.session_ttl_minutes, 5);
        assert_eq!(config.sdk, SdkSettings::default());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_without_delays() {
        let config = ComposerConfig::default().without_delays();
        assert_eq!(config.sdk.response_delay(), Duration::ZERO);
        assert_eq!(config.deployment.build_delay_ms, 0);
        assert_eq!(config.auth.session_ttl().unwrap(), chrono::Duration::minutes(30));
    }

    #[test]
    fn test_session_ttl_bounds() {
        let huge: ComposerConfig =
            toml::from_str("[auth]\nsession_ttl_minutes = 9223372036854775807\n").unwrap();
        assert!(huge.auth.session_ttl().is_err());
        assert!(huge.validate().is_err());

        for minutes in [0, -5] {
            let settings = AuthSettings {
                session_ttl_minutes: minutes,
            };
            assert!(settings.session_ttl().is_err());
        }
        assert!(ComposerConfig::default().validate().is_ok());
    }
}
