//! Dispatcher configuration from `verba.toml`

use tempfile::TempDir;

use crate::common::*;
use verba::{
    BuildError, CommandDispatcher, ConfigError, DispatcherConfig, ResultCode, Sinks,
    CONFIG_FILE_NAME,
};

#[test]
fn dispatcher_uses_loaded_config() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &path,
        "max_workers = 1\nthread_name_prefix = \"cli\"\nsuggest_commands = false\n",
    )
    .unwrap();

    let config = DispatcherConfig::from_file(&path).unwrap();
    let (sinks, _, err) = Sinks::buffered();
    let dispatcher = CommandDispatcher::builder()
        .config(config)
        .sinks(sinks)
        .define("status", printing())
        .build()
        .unwrap();

    assert_eq!(dispatcher.config().max_workers, 1);
    assert_eq!(dispatcher.execute_sync("statsu"), ResultCode::Invalid);
    assert_eq!(err.lines(), vec!["unknown command 'statsu'"]);

    dispatcher.execute_async("status").result().unwrap();
    assert_eq!(dispatcher.pool_stats().worker_count, 1);
    dispatcher.shutdown();
}

#[test]
fn usage_on_error_can_be_disabled() {
    let (sinks, _, err) = Sinks::buffered();
    let dispatcher = CommandDispatcher::builder()
        .config(DispatcherConfig {
            print_usage_on_error: false,
            ..small_config()
        })
        .sinks(sinks)
        .define(
            "echo",
            printing().param(verba::ParameterDescriptor::new("s", verba::ValueType::String)),
        )
        .build()
        .unwrap();

    assert_eq!(dispatcher.execute_sync("echo"), ResultCode::Invalid);
    assert_eq!(err.lines(), vec!["missing 1 argument(s)"]);
}

#[test]
fn invalid_config_fails_build() {
    let err = CommandDispatcher::builder()
        .config(DispatcherConfig {
            max_queue_depth: 0,
            ..small_config()
        })
        .build()
        .unwrap_err();
    assert!(matches!(
        err,
        BuildError::Config(ConfigError::Invalid {
            field: "max_queue_depth",
            ..
        })
    ));
}

#[test]
fn config_file_rejects_zero_workers() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(&path, "max_workers = 0\n").unwrap();

    assert!(matches!(
        DispatcherConfig::from_file(&path),
        Err(ConfigError::Invalid {
            field: "max_workers",
            ..
        })
    ));
}

#[test]
fn default_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join(CONFIG_FILE_NAME);

    DispatcherConfig::write_default_if_missing(&path).unwrap();
    let loaded = DispatcherConfig::from_file(&path).unwrap();
    assert_eq!(loaded, DispatcherConfig::default());
}
