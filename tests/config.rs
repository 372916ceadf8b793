use std::time::Duration;

use entry_repo::config::Config;
use entry_repo::constants::DEFAULT_WATCH_INTERVAL_MS;

#[test]
fn test_default_config() {
    let config = Config::default();
    assert!(!config.store.in_memory);
    assert!(config.store.database_path.is_none());
    assert_eq!(config.store.watch_interval_ms, DEFAULT_WATCH_INTERVAL_MS);
    assert!(!config.logging.enabled);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_config_validation() {
    let mut config = Config::default();

    // Valid config should pass
    assert!(config.validate().is_ok());

    // Watch interval above one hour should fail
    config.store.watch_interval_ms = 2 * 60 * 60 * 1_000;
    assert!(config.validate().is_err());

    // Zero disables the watcher and is fine
    config.store.watch_interval_ms = 0;
    assert!(config.validate().is_ok());

    config.logging.level = "chatty".to_string();
    assert!(config.validate().is_err());

    config.logging.level = "debug".to_string();
    config.store.database_path = Some("".into());
    assert!(config.validate().is_err());
}

#[test]
fn test_watch_interval() {
    let mut config = Config::default();
    assert_eq!(
        config.store.watch_interval(),
        Some(Duration::from_millis(DEFAULT_WATCH_INTERVAL_MS))
    );

    config.store.watch_interval_ms = 0;
    assert_eq!(config.store.watch_interval(), None);
}

#[test]
fn test_explicit_paths_win_over_defaults() {
    let mut config = Config::default();
    config.store.database_path = Some("/tmp/custom/entries.sqlite".into());
    config.logging.file = Some("/tmp/custom/entry-repo.log".into());

    assert_eq!(
        config.store.database_path().unwrap(),
        std::path::PathBuf::from("/tmp/custom/entries.sqlite")
    );
    assert_eq!(
        config.logging.log_file_path().unwrap(),
        std::path::PathBuf::from("/tmp/custom/entry-repo.log")
    );
}

#[test]
fn test_config_serialization() {
    let config = Config::default();
    let toml_str = toml::to_string_pretty(&config).unwrap();
    assert!(toml_str.contains("in_memory = false"));
    assert!(toml_str.contains("watch_interval_ms = 1000"));
    assert!(toml_str.contains("level = \"info\""));
}

#[test]
fn test_partial_config_deserialization() {
    let partial_toml = r#"
[store]
in_memory = true

[logging]
enabled = true
"#;

    let config: Config = toml::from_str(partial_toml).unwrap();

    assert!(config.store.in_memory);
    assert!(config.logging.enabled);

    assert_eq!(config.store.watch_interval_ms, DEFAULT_WATCH_INTERVAL_MS); // default value
    assert_eq!(config.logging.level, "info"); // default value
    assert!(config.logging.file.is_none()); // default value
}

#[test]
fn test_empty_config_deserialization() {
    let config: Config = toml::from_str("").unwrap();
    let default_config = Config::default();

    assert_eq!(config.store.in_memory, default_config.store.in_memory);
    assert_eq!(config.store.watch_interval_ms, default_config.store.watch_interval_ms);
    assert_eq!(config.logging.enabled, default_config.logging.enabled);
    assert_eq!(config.logging.level, default_config.logging.level);
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entry-repo.toml");
    std::fs::write(
        &path,
        r#"
[store]
database_path = "/var/lib/entry-repo/entries.sqlite"
watch_interval_ms = 250
"#,
    )
    .unwrap();

    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.store.watch_interval(), Some(Duration::from_millis(250)));
    assert!(config.store.database_path.is_some());
}

#[test]
fn test_load_from_file_rejects_invalid_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("entry-repo.toml");
    std::fs::write(&path, "[store]\nwatch_interval_ms = 99999999\n").unwrap();

    assert!(Config::load_from_file(&path).is_err());
    assert!(Config::load_from_file(dir.path().join("missing.toml")).is_err());
}

#[test]
fn test_generate_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("config.toml");

    Config::generate_default_config(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.starts_with("# entry-repo Configuration File"));
    let config = Config::load_from_file(&path).unwrap();
    assert_eq!(config.store.watch_interval_ms, DEFAULT_WATCH_INTERVAL_MS);
}
