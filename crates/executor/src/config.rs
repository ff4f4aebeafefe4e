//! Dispatcher configuration via `verba.toml`
//!
//! Every field has a default, so an empty file is a valid configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Conventional config file name.
pub const CONFIG_FILE_NAME: &str = "verba.toml";

/// Dispatcher configuration loaded from `verba.toml`.
///
/// # Example
///
/// ```toml
/// max_workers = 4
/// max_queue_depth = 4096
/// thread_name_prefix = "verba-exec"
/// print_usage_on_error = true
/// suggest_commands = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Upper bound on worker threads; workers are spawned on demand.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,
    /// Queued executions beyond this are rejected.
    #[serde(default = "default_max_queue_depth")]
    pub max_queue_depth: usize,
    /// Worker threads are named `{prefix}-{n}`.
    #[serde(default = "default_thread_name_prefix")]
    pub thread_name_prefix: String,
    /// Print usage lines of the reached command after a count error.
    #[serde(default = "default_true")]
    pub print_usage_on_error: bool,
    /// Suggest a similar command for unknown input.
    #[serde(default = "default_true")]
    pub suggest_commands: bool,
}

fn default_max_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

fn default_max_queue_depth() -> usize {
    4096
}

fn default_thread_name_prefix() -> String {
    "verba-exec".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            max_workers: default_max_workers(),
            max_queue_depth: default_max_queue_depth(),
            thread_name_prefix: default_thread_name_prefix(),
            print_usage_on_error: true,
            suggest_commands: true,
        }
    }
}

impl DispatcherConfig {
    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# verba dispatcher configuration
#
# Maximum number of worker threads for asynchronous execution.
# Defaults to the number of available CPUs.
# max_workers = 4

# Executions queued beyond this depth are rejected (default: 4096).
max_queue_depth = 4096

# Worker thread name prefix (default: "verba-exec").
thread_name_prefix = "verba-exec"

# Print usage of the reached command when the argument count is wrong.
print_usage_on_error = true

# Suggest a similar command name for unknown input.
suggest_commands = true
"#
    }

    /// Check field values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_workers == 0 {
            return Err(ConfigError::Invalid {
                field: "max_workers",
                reason: "must be at least 1".to_string(),
            });
        }
        if self.max_queue_depth == 0 {
            return Err(ConfigError::Invalid {
                field: "max_queue_depth",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Read, parse and validate config from a file path.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let config: DispatcherConfig = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize {
            message: e.to_string(),
        })?;
        std::fs::write(path, content).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        let config = DispatcherConfig::default();
        assert!(config.max_workers >= 1);
        assert_eq!(config.max_queue_depth, 4096);
        assert_eq!(config.thread_name_prefix, "verba-exec");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn default_toml_parses_correctly() {
        let config: DispatcherConfig = toml::from_str(DispatcherConfig::default_toml()).unwrap();
        assert_eq!(config.max_queue_depth, 4096);
        assert!(config.print_usage_on_error);
        assert!(config.suggest_commands);
    }

    #[test]
    fn zero_workers_rejected() {
        let config: DispatcherConfig = toml::from_str("max_workers = 0").unwrap();
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "max_workers", .. }));
    }

    #[test]
    fn write_default_creates_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        assert!(!path.exists());

        DispatcherConfig::write_default_if_missing(&path).unwrap();
        assert!(path.exists());

        let config = DispatcherConfig::from_file(&path).unwrap();
        assert_eq!(config.thread_name_prefix, "verba-exec");
    }

    #[test]
    fn write_default_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "max_workers = 2\n").unwrap();

        DispatcherConfig::write_default_if_missing(&path).unwrap();

        let config = DispatcherConfig::from_file(&path).unwrap();
        assert_eq!(config.max_workers, 2);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "").unwrap();

        let config = DispatcherConfig::from_file(&path).unwrap();
        assert_eq!(config, DispatcherConfig::default());
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "max_workers = \"many\"").unwrap();

        let err = DispatcherConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = DispatcherConfig::from_file(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn write_to_file_round_trip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        let config = DispatcherConfig {
            max_workers: 3,
            max_queue_depth: 16,
            thread_name_prefix: "cmd".to_string(),
            print_usage_on_error: false,
            suggest_commands: false,
        };
        config.write_to_file(&path).unwrap();
        assert_eq!(DispatcherConfig::from_file(&path).unwrap(), config);
    }
}
