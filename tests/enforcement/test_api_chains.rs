// Tests for API chain detection and the chain report log.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use apiguard_core::config::ApiguardConfig;
use apiguard_enforce::types::FileReport;
use apiguard_enforce::{AnalysisEngine, RuleCatalog};
use apiguard_output::report::ReportWriter;

use super::common::{create_project, java_class};

fn engine(config: &ApiguardConfig) -> AnalysisEngine {
    AnalysisEngine::new(Some(Arc::new(RuleCatalog::builtin())), config)
}

fn check(body: &str) -> FileReport {
    engine(&ApiguardConfig::default())
        .check_source("Chain.java", &java_class("Chain", body))
        .unwrap()
}

fn lines(report: &FileReport) -> Vec<String> {
    report.chains.iter().map(|c| c.report_line()).collect()
}

#[test]
fn test_direct_nested_call() {
    let report = check("void run() {\n    foo(bar());\n}");
    assert_eq!(lines(&report), vec!["foo(bar()) -> bar() in line 3"]);
    let v = &report.violations[0];
    assert_eq!(v.code, "W001");
    assert_eq!(v.severity, "INFO");
    assert_eq!(v.rule, "api-chain");
}

#[test]
fn test_call_through_local() {
    let report = check("void run() {\n    Token v = bar();\n    foo(v);\n}");
    assert_eq!(lines(&report), vec!["foo(v) -> bar() in line 4"]);
}

#[test]
fn test_unrelated_parameter_is_not_a_chain() {
    let report = check("void run(Token x) {\n    foo(x);\n}");
    assert!(report.chains.is_empty());
    assert!(report.violations.is_empty());
}

#[test]
fn test_output_calls_are_not_chains() {
    let report = check("void run(Token t) {\n    System.out.println(t.describe());\n}");
    assert!(report.chains.is_empty());
}

#[test]
fn test_configured_excluded_calls() {
    let mut config = ApiguardConfig::default();
    config.chain.excluded_calls = vec!["LOG.debug".to_string()];
    let report = engine(&config)
        .check_source(
            "Chain.java",
            &java_class("Chain", "void run(Token t) {\n    LOG.debug(t.describe());\n}"),
        )
        .unwrap();
    assert!(report.chains.is_empty());
}

#[test]
fn test_chain_records_are_appended_to_report_log() {
    let source = java_class(
        "Chain",
        "void run() {\n    foo(bar());\n    Token v = load();\n    save(v);\n}",
    );
    let dir = create_project(&[("src/Chain.java", source.as_str())]);
    let on_disk = fs::read_to_string(dir.path().join("src/Chain.java")).unwrap();
    let report = engine(&ApiguardConfig::default())
        .check_source("src/Chain.java", &on_disk)
        .unwrap();

    let reports = dir.path().join("reports");
    let writer = ReportWriter::new(&reports);
    writer.append(Path::new("src/Chain.java"), &report.chains).unwrap();
    writer.append(Path::new("src/Chain.java"), &report.chains).unwrap();

    let log = fs::read_to_string(reports.join("Chain.java.txt")).unwrap();
    let expected = "foo(bar()) -> bar() in line 3\nsave(v) -> load() in line 5\n";
    assert_eq!(log, format!("{expected}{expected}"));
}

#[test]
fn test_clean_file_writes_no_report() {
    let dir = create_project(&[]);
    let report = check("void run(Token x) {\n    foo(x);\n}");
    let writer = ReportWriter::new(dir.path().join("reports"));
    assert_eq!(writer.append(Path::new("Chain.java"), &report.chains).unwrap(), None);
    assert!(!dir.path().join("reports").exists());
}
