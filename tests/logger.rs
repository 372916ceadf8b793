use entry_repo::config::LoggingConfig;
use entry_repo::logger;

#[test]
fn test_config_based_logging_disabled() {
    let config = LoggingConfig::default();
    assert!(logger::init(&config).unwrap().is_none());
}

#[test]
fn test_invalid_level_is_rejected() {
    let config = LoggingConfig {
        enabled: true,
        level: "shouting".to_string(),
        file: None,
    };
    assert!(logger::init(&config).is_err());
}

#[test]
fn test_config_based_logging_enabled() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("entry-repo.log");
    let config = LoggingConfig {
        enabled: true,
        level: "debug".to_string(),
        file: Some(path.clone()),
    };

    let active = logger::init(&config).unwrap();
    assert_eq!(active.as_deref(), Some(path.as_path()));
    assert_eq!(logger::log_file(), Some(path.clone()));

    // Second init keeps the first file
    let again = logger::init(&LoggingConfig {
        file: Some(dir.path().join("other.log")),
        ..config
    })
    .unwrap();
    assert_eq!(again, Some(path.clone()));

    log::info!("Test message with file");
    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("Test message with file"));
}
