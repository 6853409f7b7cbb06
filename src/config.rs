//! Runtime settings. The file is optional and lives at
//! `<config dir>/caravan-weigh/config.toml`; anything it leaves out falls
//! back to the defaults below.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use serde::Deserialize;

use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "config.toml";
const LOG_FILE_NAME: &str = "caravan-weigh.log";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// How long the relay notification stays on screen.
    pub relay_dismiss_ms: u64,
    /// Terminal event poll interval; also the granularity of timers.
    pub poll_interval_ms: u64,
    /// Default tracing filter when `RUST_LOG` is not set.
    pub log_level: String,
    /// Log destination. Defaults to the platform data directory.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            relay_dismiss_ms: 4500,
            poll_interval_ms: 250,
            log_level: "info".to_string(),
            log_file: None,
        }
    }
}

impl Config {
    /// Load the config from the platform location, or defaults if the file
    /// does not exist.
    pub fn load() -> Result<Self, ConfigError> {
        let dirs = project_dirs()?;
        Self::load_from(&dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load from an explicit path. A missing file is not an error.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn relay_dismiss(&self) -> Duration {
        Duration::from_millis(self.relay_dismiss_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    /// Resolve where log output goes.
    pub fn log_path(&self) -> Result<PathBuf, ConfigError> {
        if let Some(path) = &self.log_file {
            return Ok(path.clone());
        }
        Ok(project_dirs()?.data_dir().join(LOG_FILE_NAME))
    }
}

fn project_dirs() -> Result<ProjectDirs, ConfigError> {
    ProjectDirs::from("", "", "caravan-weigh").ok_or(ConfigError::NoConfigDir)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.relay_dismiss(), Duration::from_millis(4500));
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "relay_dismiss_ms = 1000\nlog_file = \"/tmp/cw.log\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.relay_dismiss_ms, 1000);
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_path().unwrap(), PathBuf::from("/tmp/cw.log"));
    }

    #[test]
    fn malformed_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&path, "relay_dismiss_ms = \"soon\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains(CONFIG_FILE_NAME));
    }

    #[test]
    fn poll_interval_is_never_zero() {
        let config = Config {
            poll_interval_ms: 0,
            ..Config::default()
        };
        assert_eq!(config.poll_interval(), Duration::from_millis(1));
    }
}
