//! Integration tests for `haproxy2pb config` and config loading.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use haproxy2pb_cli::commands::config::{config_report, validation_report};
use haproxy2pb_cli::commands::load_config;
use haproxy2pb_core::config::{Framing, Haproxy2pbConfig};

#[tokio::test]
async fn test_config_validate_valid_toml() {
    // Given: A valid config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("haproxy2pb.toml");

    let valid_config = r#"
[general]
log_level = "debug"
log_format = "json"

[input]
path = "/var/log/haproxy.log"
max_line_bytes = 8192

[output]
path = "/tmp/haproxy.pb"
framing = "raw"

[scanner]
stop_on_error = true
"#;
    fs::write(&config_path, valid_config).expect("should write config");

    // When: Loading the config
    let config = Haproxy2pbConfig::load(&config_path)
        .await
        .expect("valid config should load");

    // Then: Every section is applied
    assert_eq!(config.general.log_format, "json");
    assert_eq!(config.input.max_line_bytes, 8192);
    assert_eq!(config.output.framing, Framing::Raw);
    assert!(config.scanner.stop_on_error);

    let report = validation_report(&config_path).await;
    assert!(report.valid);
}

#[tokio::test]
async fn test_config_validate_malformed_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[general\nlog_level = \"info\"\n").expect("should write");

    let report = validation_report(&config_path).await;
    assert!(!report.valid, "malformed TOML should be reported");
    assert_eq!(report.errors.len(), 1);

    let err = load_config(&config_path, None)
        .await
        .expect_err("malformed TOML should fail to load");
    assert_eq!(err.exit_code(), 2);
}

#[tokio::test]
async fn test_config_invalid_value_is_rejected() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("haproxy2pb.toml");
    fs::write(&config_path, "[input]\nmax_line_bytes = 0\n").expect("should write");

    let report = validation_report(&config_path).await;
    assert!(!report.valid);
    assert!(report.errors[0].contains("input.max_line_bytes"));
}

#[tokio::test]
async fn test_config_empty_file_uses_defaults() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("empty.toml");
    fs::write(&config_path, "").expect("should write empty file");

    let config = load_config(&config_path, None)
        .await
        .expect("empty config should load");
    assert_eq!(config.general.log_level, "info");
    assert_eq!(config.output.framing, Framing::LengthDelimited);
}

#[tokio::test]
async fn test_config_log_level_flag_wins_over_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("haproxy2pb.toml");
    fs::write(&config_path, "[general]\nlog_level = \"error\"\n").expect("should write");

    let config = load_config(&config_path, Some("trace"))
        .await
        .expect("config should load");
    assert_eq!(config.general.log_level, "trace");
}

#[test]
fn test_config_show_section_output() {
    let report = config_report(
        &Haproxy2pbConfig::default(),
        Path::new("haproxy2pb.toml"),
        Some("output".to_owned()),
    )
    .expect("known section");
    assert!(report.config_toml.contains("framing = \"length_delimited\""));
}
