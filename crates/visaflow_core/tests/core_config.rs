use std::path::PathBuf;
use visaflow_core::config::DEFAULT_DB_FILE_NAME;
use visaflow_core::{default_log_level, logging_status, ConfigError, CoreConfig};

#[test]
fn missing_fields_take_defaults() {
    let config = CoreConfig::from_json_str(r#"{"dataDir": "/var/lib/visaflow"}"#).unwrap();

    assert_eq!(config.data_dir, PathBuf::from("/var/lib/visaflow"));
    assert_eq!(config.db_file_name, DEFAULT_DB_FILE_NAME);
    assert_eq!(config.log_level, default_log_level());
    assert_eq!(
        config.db_path(),
        PathBuf::from("/var/lib/visaflow").join(DEFAULT_DB_FILE_NAME)
    );
    assert_eq!(
        config.effective_log_dir(),
        PathBuf::from("/var/lib/visaflow/logs")
    );
}

#[test]
fn explicit_log_dir_wins() {
    let config = CoreConfig::from_json_str(
        r#"{"dataDir": "/data", "logDir": "/logs", "logLevel": "warn", "dbFileName": "agency.db"}"#,
    )
    .unwrap();

    assert_eq!(config.effective_log_dir(), PathBuf::from("/logs"));
    assert_eq!(config.log_level, "warn");
    assert_eq!(config.db_path(), PathBuf::from("/data/agency.db"));
}

#[test]
fn malformed_config_is_a_parse_error() {
    let err = CoreConfig::from_json_str("{not json").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
}

#[test]
fn open_data_file_creates_missing_directories() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::new(dir.path().join("nested").join("data"));

    let conn = config.open_data_file().unwrap();
    drop(conn);
    assert!(config.db_path().exists());
}

// Only test in this binary that touches the working directory or the
// process-wide logger.
#[test]
fn relative_data_dir_logs_under_working_directory() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_current_dir(dir.path()).unwrap();

    let config = CoreConfig::from_json_str(r#"{"dataDir": "agency", "logLevel": "info"}"#).unwrap();
    config.init_logging().unwrap();
    config.init_logging().unwrap();

    let (level, log_dir) = logging_status().unwrap();
    assert_eq!(level, "info");
    assert_eq!(
        log_dir,
        std::env::current_dir().unwrap().join("agency").join("logs")
    );
    assert!(log_dir.is_dir());
}
