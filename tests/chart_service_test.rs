//! Tests for ChartService save/load against the real filesystem

use std::fs;
use std::sync::Arc;

use rstest::{fixture, rstest};
use tempfile::TempDir;

use orgchart::application::services::ChartService;
use orgchart::application::ApplicationError;
use orgchart::domain::{CodecError, Employee, OrgChart};
use orgchart::infrastructure::traits::{FileSystem, RealFileSystem};
use orgchart::util::testing;

#[fixture]
fn filesystem() -> Arc<dyn FileSystem> {
    testing::init_test_setup();
    Arc::new(RealFileSystem)
}

fn sample_chart() -> OrgChart {
    let mut chart = OrgChart::new("HQ");
    let eng = chart.add_department(chart.root(), "Eng").unwrap();
    chart
        .hire_under(eng, Employee::new(1, "Ann", "Dev", 1000.0).unwrap())
        .unwrap();
    chart
        .hire(1, Employee::new(2, "Bob", "QA", 800.0).unwrap())
        .unwrap();
    chart
}

#[rstest]
fn given_chart_when_saving_then_writes_file_and_reports(filesystem: Arc<dyn FileSystem>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("org_data.txt");
    let service = ChartService::new(filesystem, sample_chart());

    let report = service.save(&path).expect("save should succeed");

    assert_eq!(report.path, path);
    assert_eq!(report.nodes, 4);
    let written = fs::read_to_string(&path).unwrap();
    assert_eq!(report.bytes, written.len());
    assert_eq!(
        written,
        "1,HQ\n1\n1,Eng\n1\n0,1,Ann,Dev,1000\n1\n0,2,Bob,QA,800\n0\n"
    );
}

#[rstest]
fn given_saved_chart_when_loading_then_replaces_current_chart(filesystem: Arc<dyn FileSystem>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("org_data.txt");
    let original = sample_chart();
    ChartService::new(filesystem.clone(), sample_chart()).save(&path).unwrap();

    let mut service = ChartService::new(filesystem, OrgChart::new("Other"));
    service.load(&path).unwrap();

    assert_eq!(service.chart().display(), original.display());
    assert_eq!(service.chart().total_budget(), 1800.0);
}

#[rstest]
fn given_saved_chart_when_opening_then_builds_service(filesystem: Arc<dyn FileSystem>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("chart.txt");
    ChartService::new(filesystem.clone(), sample_chart()).save(&path).unwrap();

    let service = ChartService::open(filesystem, &path).unwrap();

    assert_eq!(service.chart().company_name(), "HQ");
    assert!(service.chart().find_node(2).is_some());
}

#[rstest]
fn given_missing_directory_when_saving_then_returns_io_failure(filesystem: Arc<dyn FileSystem>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("org_data.txt");
    let service = ChartService::new(filesystem, sample_chart());

    let err = service.save(&path).unwrap_err();

    match err {
        ApplicationError::OperationFailed { context, .. } => {
            assert!(context.starts_with("save chart"), "context: {context}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!path.exists());
}

#[rstest]
fn given_unencodable_name_when_saving_then_leaves_destination_untouched(filesystem: Arc<dyn FileSystem>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("org_data.txt");
    let mut chart = OrgChart::new("HQ");
    chart
        .hire(0, Employee::new(1, "Doe, Jane", "Dev", 1.0).unwrap())
        .unwrap();
    let service = ChartService::new(filesystem, chart);

    let err = service.save(&path).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Codec(CodecError::UnencodableField { .. })
    ));
    assert!(!path.exists());
}

#[rstest]
fn given_corrupt_file_when_loading_then_keeps_current_chart(filesystem: Arc<dyn FileSystem>) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("org_data.txt");
    fs::write(&path, "1,HQ\n3\n").unwrap();
    let mut service = ChartService::new(filesystem, sample_chart());

    let err = service.load(&path).unwrap_err();

    assert!(matches!(err, ApplicationError::Codec(_)));
    assert_eq!(service.chart().size(), 4);
}

#[rstest]
fn given_missing_file_when_loading_then_reports_read_failure(filesystem: Arc<dyn FileSystem>) {
    let dir = TempDir::new().unwrap();
    let mut service = ChartService::new(filesystem, sample_chart());

    let err = service.load(&dir.path().join("nope.txt")).unwrap_err();

    assert!(err.to_string().contains("read chart"));
}
