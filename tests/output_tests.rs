use chrono::NaiveDate;
use loss_sentinel::output::{read_report, write_report, write_sheets, ReportDocument};
use loss_sentinel::records::{Record, RecordSet};
use loss_sentinel::report::{calculate_default_metrics, export_sheets};
use loss_sentinel::scenario::ScenarioParameters;
use loss_sentinel::utils::config::SCHEMA_VERSION;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

fn sample_report() -> loss_sentinel::report::MetricsReport {
    let day = |d| NaiveDate::from_ymd_opt(2024, 3, d).unwrap();
    let set = RecordSet::new(vec![
        Record::new(day(1), 700.0).with_entity("North").with_category("Frozen"),
        Record::new(day(2), 200.0).with_entity("South").with_category("Frozen"),
        Record::new(day(3), 100.0).with_entity("East").with_category("Fresh"),
    ]);
    calculate_default_metrics(&set, &ScenarioParameters::default())
}

#[test]
fn test_report_document_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("out/report.json");

    let document = ReportDocument::new(sample_report());
    write_report(&document, &path).unwrap();

    let loaded = read_report(&path).unwrap();
    assert_eq!(loaded.version, SCHEMA_VERSION);
    assert_eq!(loaded.report, document.report);
}

#[test]
fn test_report_json_field_names() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("report.json");
    write_report(&ReportDocument::new(sample_report()), &path).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let report = &raw["report"];

    assert_eq!(report["total_value"], 1000.0);
    assert_eq!(report["entity_aggregate"]["rows"][0]["key"], "North");
    assert_eq!(report["abc"]["rows"][0]["abc_class"], "B");
    assert_eq!(report["pareto"]["rows"][0]["is_frontier"], true);
    assert_eq!(report["scenarios"]["reduce_frontier"], 20.0);
    assert!(raw["generated_at"].is_string());
}

#[test]
fn test_export_sheets_to_csv() {
    let dir = tempdir().unwrap();
    let report = sample_report();

    let paths = write_sheets(&export_sheets(&report), dir.path()).unwrap();
    let names: Vec<String> = paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["by_category.csv", "by_entity.csv", "abc.csv", "pareto.csv", "what_if.csv"]
    );

    let what_if = std::fs::read_to_string(dir.path().join("what_if.csv")).unwrap();
    let last = what_if.lines().last().unwrap();
    assert_eq!(last, format!("total,-,{}", report.savings.total));

    let by_entity = std::fs::read_to_string(dir.path().join("by_entity.csv")).unwrap();
    assert_eq!(by_entity.lines().next(), Some("entity,value,percentage"));
}
