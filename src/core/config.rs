//! Configuration system: TOML file + env var overrides + smart defaults.

#![allow(missing_docs)]

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::errors::{Result, SpmError};
use crate::dashboard::activity;
use crate::dashboard::dialogs::CancelPolicy;
use crate::dashboard::view::View;

/// Smallest refresh interval accepted; anything faster just burns the host page.
pub const MIN_REFRESH_INTERVAL_MS: u64 = 100;

/// Upper bound on the activity log capacity.
pub const MAX_ACTIVITY_CAPACITY: usize = 1_000;

/// Full status monitor configuration model.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct Config {
    pub refresh: RefreshConfig,
    pub activity: ActivityConfig,
    pub dialogs: DialogConfig,
    pub session: SessionConfig,
}

/// Periodic refresh timer knobs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RefreshConfig {
    /// Interval between stats refresh passes.
    pub interval_ms: u64,
    /// Granularity of the background ticker that drives the session clock.
    pub tick_ms: u64,
    /// Start the refresh timer as soon as the session is built.
    pub auto_start: bool,
}

/// Activity log sizing and display.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ActivityConfig {
    pub capacity: usize,
    /// chrono strftime pattern used by the log panel.
    pub time_format: String,
}

/// Modal dialog behavior.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct DialogConfig {
    pub cancel_policy: CancelPolicy,
}

/// Session startup state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(default)]
pub struct SessionConfig {
    pub start_view: View,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval_ms: 5_000,
            tick_ms: 250,
            auto_start: true,
        }
    }
}

impl RefreshConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            capacity: activity::DEFAULT_CAPACITY,
            time_format: activity::DEFAULT_TIME_FORMAT.to_string(),
        }
    }
}

impl Config {
    /// Default configuration path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        let home_dir = env::var_os("HOME").map_or_else(
            || {
                tracing::warn!("HOME not set, falling back to /tmp for config path");
                PathBuf::from("/tmp")
            },
            PathBuf::from,
        );
        home_dir
            .join(".config")
            .join("spm-monitor")
            .join("config.toml")
    }

    /// Load config from default or explicit path, then apply env overrides.
    ///
    /// Missing config file is not an error when loading from default path; defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path_buf = path.map_or_else(Self::default_path, Path::to_path_buf);
        let is_explicit_path = path.is_some();

        let mut cfg = if path_buf.exists() {
            let raw =
                fs::read_to_string(&path_buf).map_err(|source| SpmError::io(&path_buf, source))?;
            Self::from_toml_str(&raw)?
        } else if is_explicit_path {
            return Err(SpmError::MissingConfig { path: path_buf });
        } else {
            tracing::debug!(path = %path_buf.display(), "no config file, using defaults");
            Self::default()
        };

        cfg.apply_env_overrides_from(env_var)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse a TOML document without env overrides or validation.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Render the effective configuration as TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    fn apply_env_overrides_from<F>(&mut self, mut lookup: F) -> Result<()>
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("SPM_REFRESH_INTERVAL_MS") {
            self.refresh.interval_ms = parse_env("SPM_REFRESH_INTERVAL_MS", &raw)?;
        }
        if let Some(raw) = lookup("SPM_REFRESH_TICK_MS") {
            self.refresh.tick_ms = parse_env("SPM_REFRESH_TICK_MS", &raw)?;
        }
        if let Some(raw) = lookup("SPM_REFRESH_AUTO_START") {
            self.refresh.auto_start = parse_env("SPM_REFRESH_AUTO_START", &raw)?;
        }
        if let Some(raw) = lookup("SPM_ACTIVITY_CAPACITY") {
            self.activity.capacity = parse_env("SPM_ACTIVITY_CAPACITY", &raw)?;
        }
        if let Some(raw) = lookup("SPM_ACTIVITY_TIME_FORMAT") {
            self.activity.time_format = raw;
        }
        if let Some(raw) = lookup("SPM_CANCEL_POLICY") {
            self.dialogs.cancel_policy = parse_env("SPM_CANCEL_POLICY", &raw)?;
        }
        if let Some(raw) = lookup("SPM_START_VIEW") {
            self.session.start_view = parse_env("SPM_START_VIEW", &raw)?;
        }
        Ok(())
    }

    /// Check cross-field constraints on an assembled config.
    pub fn validate(&self) -> Result<()> {
        if self.refresh.interval_ms < MIN_REFRESH_INTERVAL_MS {
            return Err(SpmError::InvalidConfig {
                details: format!(
                    "refresh.interval_ms must be >= {MIN_REFRESH_INTERVAL_MS}, got {}",
                    self.refresh.interval_ms
                ),
            });
        }

        if self.refresh.tick_ms == 0 || self.refresh.tick_ms > self.refresh.interval_ms {
            return Err(SpmError::InvalidConfig {
                details: format!(
                    "refresh.tick_ms must be in [1, interval_ms={}], got {}",
                    self.refresh.interval_ms, self.refresh.tick_ms
                ),
            });
        }

        if !(1..=MAX_ACTIVITY_CAPACITY).contains(&self.activity.capacity) {
            return Err(SpmError::InvalidConfig {
                details: format!(
                    "activity.capacity must be in [1, {MAX_ACTIVITY_CAPACITY}], got {}",
                    self.activity.capacity
                ),
            });
        }

        if !activity::is_valid_time_format(&self.activity.time_format) {
            return Err(SpmError::InvalidConfig {
                details: format!(
                    "activity.time_format is not a valid strftime pattern: {:?}",
                    self.activity.time_format
                ),
            });
        }

        Ok(())
    }
}

fn env_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|raw| !raw.trim().is_empty())
}

fn parse_env<T>(name: &str, raw: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|error| SpmError::ConfigParse {
            context: "env",
            details: format!("{name}={raw:?}: {error}"),
        })
}
