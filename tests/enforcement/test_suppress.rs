// Tests for --suppress handling across a multi-file check.

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
fn test_suppressed_code_is_kept_as_info() {
    let source = java_class("A", "void f(Iterator<String> it) {\n    it.next();\n    foo(bar());\n}");
    let dir = create_project(&[("A.java", source.as_str())]);

    let mut engine = engine();
    engine.suppress("a003");
    let result = engine.check_files(&[dir.path().join("A.java")]);

    assert_eq!(result.violations.len(), 2);
    let suppressed = &result.violations[0];
    assert_eq!(suppressed.code, "S001");
    assert_eq!(suppressed.severity, "INFO");
    assert!(suppressed.suppressed);
    assert_eq!(
        suppressed.suppress_hint.as_deref(),
        Some("Suppressed A003 via --suppress flag")
    );
    assert_eq!(result.violations[1].code, "W001");
    assert_eq!(result.active_count(), 1);
    assert_eq!(result.status, "warning");
}

#[test]
fn test_suppressing_every_code_gives_ok_status() {
    let source = java_class("A", "void f(Iterator<String> it) {\n    it.next();\n    foo(bar());\n}");
    let dir = create_project(&[("A.java", source.as_str())]);

    let mut engine = engine();
    for code in ["A003", "W001"] {
        engine.suppress(code);
    }
    let result = engine.check_files(&[dir.path().join("A.java")]);
    assert_eq!(result.violations.len(), 2);
    assert_eq!(result.active_count(), 0);
    assert_eq!(result.status, "ok");
}

#[test]
fn test_suppressed_finding_keeps_its_hash() {
    let source = java_class("A", "void f(Iterator<String> it) {\n    it.next();\n}");
    let plain = engine().check_source("A.java", &source).unwrap();

    let mut quiet = engine();
    quiet.suppress("A003");
    let suppressed = quiet.check_source("A.java", &source).unwrap();
    assert_eq!(plain.violations[0].hash, suppressed.violations[0].hash);
}
