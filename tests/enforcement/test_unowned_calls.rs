// Tests for calls with no enclosing method: they are skipped and counted,
// and never abort the rest of the file.

use std::sync::Arc;

use apiguard_core::config::ApiguardConfig;
use apiguard_enforce::{AnalysisEngine, RuleCatalog};

use super::common::{create_project, java_class};

fn engine() -> AnalysisEngine {
    AnalysisEngine::new(
        Some(Arc::new(RuleCatalog::builtin())),
        &ApiguardConfig::default(),
    )
}

#[test]
fn test_lambda_calls_are_skipped() {
    let body = "void each(java.util.List<Iterator<String>> its) {\n    its.forEach(it -> it.next());\n}";
    let report = engine()
        .check_source("L.java", &java_class("L", body))
        .unwrap();
    assert!(report.violations.is_empty(), "{:?}", report.violations);
    assert_eq!(report.unowned.len(), 1);
    assert_eq!(report.unowned[0].line, 3);
}

#[test]
fn test_method_after_lambda_is_still_checked() {
    let body = "void each(java.util.List<Iterator<String>> its) {\n    its.forEach(it -> it.next());\n}\nvoid first(Iterator<String> it) {\n    it.next();\n}";
    let report = engine()
        .check_source("L.java", &java_class("L", body))
        .unwrap();
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].line, 6);
}

#[test]
fn test_anonymous_class_method_is_its_own_function() {
    let body = "Runnable task(Iterator<String> it) {\n    return new Runnable() {\n        public void run() {\n            it.next();\n        }\n    };\n}";
    let report = engine()
        .check_source("A.java", &java_class("A", body))
        .unwrap();
    assert_eq!(report.functions, 2);
    let codes: Vec<&str> = report.violations.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(codes, vec!["A003"]);
    assert!(report.unowned.is_empty());
}

#[test]
fn test_unowned_calls_are_totalled() {
    let body = "void each(java.util.List<String> xs) {\n    xs.forEach(x -> log(x.trim()));\n}";
    let source = java_class("U", body);
    let dir = create_project(&[("U.java", source.as_str())]);
    let result = engine().check_files(&[dir.path().join("U.java")]);
    assert_eq!(result.info.unowned_calls, 2);
    assert_eq!(result.info.call_events, 1);
    assert_eq!(result.info.functions_analyzed, 1);
}
