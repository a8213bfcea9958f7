//! Tests for CLI settings resolution and exit code mapping

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::Parser;
use rstest::rstest;
use tempfile::TempDir;

use orgchart::application::ApplicationError;
use orgchart::cli::commands::load_settings;
use orgchart::cli::{Cli, CliError};
use orgchart::domain::{CodecError, DomainError};
use orgchart::exitcode;
use orgchart::infrastructure::InfraError;

fn write_config(dir: &Path) -> PathBuf {
    let path = dir.join("orgchart.toml");
    fs::write(&path, "company_name = \"File Corp\"\ndata_file = \"file.txt\"\n").unwrap();
    path
}

#[test]
fn given_flags_when_loading_settings_then_flags_override_config_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let cli = Cli::parse_from([
        "orgchart",
        "--config",
        config.to_str().unwrap(),
        "-c",
        "Flag Corp",
        "-f",
        "flag.txt",
        "budget",
    ]);

    let settings = load_settings(&cli).unwrap();

    assert_eq!(settings.company_name, "Flag Corp");
    assert_eq!(settings.data_file, PathBuf::from("flag.txt"));
}

#[test]
fn given_no_flags_when_loading_settings_then_uses_config_file() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let cli = Cli::parse_from(["orgchart", "--config", config.to_str().unwrap()]);

    let settings = load_settings(&cli).unwrap();

    assert!(cli.command.is_none());
    assert_eq!(settings.company_name, "File Corp");
    assert_eq!(settings.data_file, PathBuf::from("file.txt"));
}

#[test]
fn given_blank_company_flag_when_loading_settings_then_rejects_with_usage() {
    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path());
    let cli = Cli::parse_from(["orgchart", "--config", config.to_str().unwrap(), "-c", "  "]);

    let err = load_settings(&cli).unwrap_err();

    assert!(matches!(err, CliError::InvalidArgs(_)));
    assert_eq!(err.exit_code(), exitcode::USAGE);
}

fn app(e: ApplicationError) -> CliError {
    CliError::from(e)
}

#[rstest]
#[case::domain(app(DomainError::EmployeeNotFound(3).into()), exitcode::DATAERR)]
#[case::codec(app(CodecError::TrailingContent { line: 4 }.into()), exitcode::DATAERR)]
#[case::config(app(ApplicationError::Config { message: "bad".into() }), exitcode::CONFIG)]
#[case::missing_file(
    app(ApplicationError::OperationFailed {
        context: "read chart".into(),
        source: Box::new(io::Error::new(io::ErrorKind::NotFound, "gone")),
    }),
    exitcode::NOINPUT
)]
#[case::denied(
    app(ApplicationError::OperationFailed {
        context: "save chart".into(),
        source: Box::new(io::Error::new(io::ErrorKind::PermissionDenied, "no")),
    }),
    exitcode::IOERR
)]
#[case::console(
    CliError::Infra(InfraError::io("write output", io::Error::new(io::ErrorKind::BrokenPipe, "closed"))),
    exitcode::IOERR
)]
fn given_error_when_mapping_exit_code_then_matches_sysexits(#[case] err: CliError, #[case] code: i32) {
    assert_eq!(err.exit_code(), code);
}
