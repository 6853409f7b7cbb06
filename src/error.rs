//! Error types for the weighing log.

use std::path::PathBuf;

use thiserror::Error;

use crate::store::DraftField;

/// Input-validation failures raised by the record store. These never reach
/// the user as text; the UI reacts by moving focus to the offending field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{0} is required")]
    MissingRequiredField(DraftField),
}

/// Problems locating or reading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not locate a configuration directory")]
    NoConfigDir,

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
