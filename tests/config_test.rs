//! Integration tests for layered Settings loading
//!
//! Every test passes an explicit config file so a global config on the host
//! never leaks in. Environment overrides are process wide, so everything
//! touching `ORGCHART_*` lives in a single test.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use orgchart::application::ApplicationError;
use orgchart::config::{Settings, DEFAULT_DATA_FILE};

#[test]
fn given_missing_explicit_config_when_loading_then_returns_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("absent.toml");

    let err = Settings::load(Some(&path)).unwrap_err();

    match err {
        ApplicationError::Config { message } => {
            assert!(message.contains("config file not found"), "message: {message}")
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn given_invalid_toml_when_loading_then_reports_parse_failure() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orgchart.toml");
    fs::write(&path, "company_name = [unterminated").unwrap();

    let err = Settings::load(Some(&path)).unwrap_err();

    assert!(matches!(err, ApplicationError::Config { ref message } if message.starts_with("parse")));
}

#[test]
fn given_config_file_and_env_overrides_when_loading_then_applies_layers_in_order() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("orgchart.toml");

    // File layer only sets the company, data file keeps its default
    fs::write(&path, "company_name = \"Acme Corp\"\n").unwrap();
    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.company_name, "Acme Corp");
    assert_eq!(settings.data_file, PathBuf::from(DEFAULT_DATA_FILE));

    // Variables in the data file path are expanded
    std::env::set_var("CHART_TEST_DIR", "/var/charts");
    fs::write(
        &path,
        "company_name = \"Acme Corp\"\ndata_file = \"$CHART_TEST_DIR/acme.txt\"\n",
    )
    .unwrap();
    let settings = Settings::load(Some(&path)).unwrap();
    assert_eq!(settings.data_file, PathBuf::from("/var/charts/acme.txt"));

    // Environment wins over the file
    std::env::set_var("ORGCHART_COMPANY_NAME", "Env Corp");
    std::env::set_var("ORGCHART_DATA_FILE", "/tmp/env_chart.txt");
    let settings = Settings::load(Some(&path));
    std::env::remove_var("ORGCHART_COMPANY_NAME");
    std::env::remove_var("ORGCHART_DATA_FILE");
    std::env::remove_var("CHART_TEST_DIR");

    let settings = settings.unwrap();
    assert_eq!(settings.company_name, "Env Corp");
    assert_eq!(settings.data_file, PathBuf::from("/tmp/env_chart.txt"));
}
