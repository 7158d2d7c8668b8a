//! SPM-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, SpmError>;

/// Top-level error type for the status monitor core.
#[derive(Debug, Error)]
pub enum SpmError {
    #[error("[SPM-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[SPM-1002] missing configuration file: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[SPM-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[SPM-2001] unknown view: {requested:?}")]
    InvalidView { requested: String },

    #[error("[SPM-2002] tab {tab:?} is not registered for view {view}")]
    InvalidTab { view: &'static str, tab: String },

    #[error("[SPM-2101] serialization failure in {context}: {details}")]
    Serialization {
        context: &'static str,
        details: String,
    },

    #[error("[SPM-2201] stats source unavailable: {details}")]
    StatsUnavailable { details: String },

    #[error("[SPM-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("[SPM-3003] channel closed in component {component}")]
    ChannelClosed { component: &'static str },

    #[error("[SPM-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl SpmError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "SPM-1001",
            Self::MissingConfig { .. } => "SPM-1002",
            Self::ConfigParse { .. } => "SPM-1003",
            Self::InvalidView { .. } => "SPM-2001",
            Self::InvalidTab { .. } => "SPM-2002",
            Self::Serialization { .. } => "SPM-2101",
            Self::StatsUnavailable { .. } => "SPM-2201",
            Self::Io { .. } => "SPM-3002",
            Self::ChannelClosed { .. } => "SPM-3003",
            Self::Runtime { .. } => "SPM-3900",
        }
    }

    /// Whether retrying might resolve the failure.
    ///
    /// Invalid view/tab requests are logic bugs in the caller and never
    /// resolve on their own.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Io { .. }
                | Self::ChannelClosed { .. }
                | Self::StatsUnavailable { .. }
                | Self::Runtime { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }
}

impl From<serde_json::Error> for SpmError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialization {
            context: "serde_json",
            details: value.to_string(),
        }
    }
}

impl From<toml::de::Error> for SpmError {
    fn from(value: toml::de::Error) -> Self {
        Self::ConfigParse {
            context: "toml",
            details: value.to_string(),
        }
    }
}

impl From<toml::ser::Error> for SpmError {
    fn from(value: toml::ser::Error) -> Self {
        Self::Serialization {
            context: "toml",
            details: value.to_string(),
        }
    }
}
