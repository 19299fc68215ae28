//! # Configuration
//!
//! hiredesk configuration is managed by [`clapfig`], which handles layered
//! loading from TOML files, environment variables, and programmatic overrides.
//!
//! ## Storage Hierarchy
//!
//! Configuration is resolved in priority order:
//! 1. **Environment variables**: `HIREDESK__VALIDATION_MODE`, `HIREDESK__DASHBOARD_TTL_SECS`, etc.
//! 2. **Data directory config**: `hiredesk.toml` next to the stored collections.
//! 3. **Compiled Defaults**: Built-in fallbacks via `#[config(default = ...)]`.
//!
//! ## Available Settings
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `validation_mode` | `soft` | `soft` strips suspicious input, `strict` rejects it |
//! | `max_field_length` | `10000` | Longest accepted string field, in characters |
//! | `backup_interval_secs` | `300` | Periodic snapshot interval |
//! | `backup_retention_days` | `7` | Snapshots older than this are not restored |
//! | `dashboard_ttl_secs` | `300` | Lifetime of the cached dashboard summary |
//!
//! ## CLI Usage
//!
//! - `hiredesk config`: Show all configuration values.

use crate::validate::{SoftValidator, ValidationMode, DEFAULT_MAX_FIELD_LENGTH};
use chrono::Duration;
use confique::Config;
use serde::{Deserialize, Serialize};

const DEFAULT_BACKUP_INTERVAL_SECS: i64 = 300;
const DEFAULT_BACKUP_RETENTION_DAYS: i64 = 7;
const DEFAULT_DASHBOARD_TTL_SECS: i64 = 300;

/// Configuration for hiredesk, stored in `hiredesk.toml`.
#[derive(Config, Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct HireConfig {
    /// How suspicious input is handled: "soft" (strip) or "strict" (reject).
    #[config(default = "soft")]
    pub validation_mode: ValidationMode,

    /// Longest accepted string field, in characters.
    #[config(default = 10000)]
    pub max_field_length: usize,

    /// Seconds between periodic snapshots of every collection.
    #[config(default = 300)]
    pub backup_interval_secs: i64,

    /// Snapshots older than this many days are ignored on restore.
    #[config(default = 7)]
    pub backup_retention_days: i64,

    /// Seconds the dashboard summary stays cached.
    #[config(default = 300)]
    pub dashboard_ttl_secs: i64,
}

impl Default for HireConfig {
    fn default() -> Self {
        Self {
            validation_mode: ValidationMode::Soft,
            max_field_length: DEFAULT_MAX_FIELD_LENGTH,
            backup_interval_secs: DEFAULT_BACKUP_INTERVAL_SECS,
            backup_retention_days: DEFAULT_BACKUP_RETENTION_DAYS,
            dashboard_ttl_secs: DEFAULT_DASHBOARD_TTL_SECS,
        }
    }
}

impl HireConfig {
    pub fn validator(&self) -> SoftValidator {
        SoftValidator::new(self.validation_mode, self.max_field_length)
    }

    /// Snapshot interval, never shorter than one second.
    ///
    /// Values too large for a [`Duration`] fall back to the default, as do
    /// the other duration settings below.
    pub fn backup_interval(&self) -> Duration {
        seconds_or(self.backup_interval_secs.max(1), DEFAULT_BACKUP_INTERVAL_SECS)
    }

    pub fn backup_retention(&self) -> Duration {
        Duration::try_days(self.backup_retention_days.max(0))
            .unwrap_or_else(|| Duration::days(DEFAULT_BACKUP_RETENTION_DAYS))
    }

    pub fn dashboard_ttl(&self) -> Duration {
        seconds_or(self.dashboard_ttl_secs.max(0), DEFAULT_DASHBOARD_TTL_SECS)
    }
}

fn seconds_or(secs: i64, default: i64) -> Duration {
    Duration::try_seconds(secs).unwrap_or_else(|| Duration::seconds(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HireConfig::default();
        assert_eq!(config.validation_mode, ValidationMode::Soft);
        assert_eq!(config.max_field_length, 10_000);
        assert_eq!(config.backup_interval(), Duration::minutes(5));
        assert_eq!(config.backup_retention(), Duration::days(7));
        assert_eq!(config.dashboard_ttl(), Duration::minutes(5));
    }

    #[test]
    fn test_interval_has_a_floor() {
        let config = HireConfig {
            backup_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.backup_interval(), Duration::seconds(1));
    }

    #[test]
    fn test_negative_retention_clamps_to_zero() {
        let config = HireConfig {
            backup_retention_days: -3,
            ..Default::default()
        };
        assert_eq!(config.backup_retention(), Duration::zero());
    }

    #[test]
    fn test_out_of_range_durations_use_defaults() {
        let config = HireConfig {
            backup_interval_secs: i64::MAX,
            backup_retention_days: i64::MAX,
            dashboard_ttl_secs: i64::MAX,
            ..Default::default()
        };
        assert_eq!(config.backup_interval(), Duration::seconds(300));
        assert_eq!(config.backup_retention(), Duration::days(7));
        assert_eq!(config.dashboard_ttl(), Duration::seconds(300));
    }

    #[test]
    fn test_validator_follows_mode() {
        let config = HireConfig {
            validation_mode: ValidationMode::Strict,
            ..Default::default()
        };
        assert_eq!(config.validator().mode(), ValidationMode::Strict);
    }

    #[test]
    fn test_from_toml() {
        let config: HireConfig = toml::from_str(
            r#"
            validation_mode = "strict"
            max_field_length = 500
            backup_interval_secs = 60
            backup_retention_days = 3
            dashboard_ttl_secs = 30
            "#,
        )
        .unwrap();
        assert_eq!(config.validation_mode, ValidationMode::Strict);
        assert_eq!(config.max_field_length, 500);
        assert_eq!(config.dashboard_ttl(), Duration::seconds(30));
    }
}
