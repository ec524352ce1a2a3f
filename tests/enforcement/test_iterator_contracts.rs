// Tests for the iterator contracts: next() needs a hasNext() guard, and
// remove() needs an earlier next().

use std::sync::Arc;

use apiguard_core::config::ApiguardConfig;
use apiguard_enforce::types::FileReport;
use apiguard_enforce::{AnalysisEngine, RuleCatalog};

use super::common::java_class;

fn check(body: &str) -> FileReport {
    let engine = AnalysisEngine::new(
        Some(Arc::new(RuleCatalog::builtin())),
        &ApiguardConfig::default(),
    );
    engine
        .check_source("Items.java", &java_class("Items", body))
        .unwrap()
}

#[test]
fn test_next_without_has_next_is_flagged() {
    let report = check(
        "void first(java.util.List<String> list) {\n    Iterator<String> it = list.iterator();\n    it.next();\n}",
    );
    assert_eq!(report.violations.len(), 1);
    let v = &report.violations[0];
    assert_eq!(v.code, "A003");
    assert_eq!(v.line, 4);
    assert!(v
        .message
        .starts_with("Missing state checking: hasNext() should be true"));
    assert!(v.message.ends_with("NoSuchElementException"));
}

#[test]
fn test_next_guarded_by_if_is_clean() {
    let report = check(
        "void first(Iterator<String> it) {\n    if (it.hasNext()) {\n        it.next();\n    }\n}",
    );
    assert!(report.violations.is_empty(), "{:?}", report.violations);
}

#[test]
fn test_next_guarded_by_while_loop_is_clean() {
    let report = check(
        "void drain(Iterator<String> it) {\n    while (it.hasNext()) {\n        String s = it.next();\n    }\n}",
    );
    assert!(report.violations.is_empty(), "{:?}", report.violations);
}

#[test]
fn test_next_under_negated_guard_is_flagged() {
    let report = check(
        "void first(Iterator<String> it) {\n    if (!it.hasNext()) {\n        it.next();\n    }\n}",
    );
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].code, "A003");
}

#[test]
fn test_else_branch_uses_condition_as_written() {
    let report = check(
        "String first(Iterator<String> it) {\n    if (!it.hasNext()) {\n        return null;\n    } else {\n        return it.next();\n    }\n}",
    );
    assert_eq!(report.violations.len(), 1);
    assert_eq!(report.violations[0].code, "A003");
    assert_eq!(report.violations[0].line, 6);

    let report = check(
        "void first(Iterator<String> it) {\n    if (it.hasNext()) {\n    } else {\n        it.next();\n    }\n}",
    );
    assert!(report.violations.is_empty(), "{:?}", report.violations);
}

#[test]
fn test_scanner_next_is_excluded() {
    let report = check("void read(java.util.Scanner scanner) {\n    scanner.next();\n}");
    assert!(report.violations.is_empty(), "{:?}", report.violations);
}

#[test]
fn test_remove_without_next_is_flagged() {
    let report = check(
        "void drop(Iterator<String> it) {\n    if (it.hasNext()) {\n        it.remove();\n    }\n}",
    );
    assert_eq!(report.violations.len(), 1);
    let v = &report.violations[0];
    assert_eq!(v.code, "A001");
    assert_eq!(v.category, "call_order");
    assert!(v.message.contains("next() should precede remove()"));
    assert!(v.message.ends_with("IllegalStateException"));
}

#[test]
fn test_remove_after_next_is_clean() {
    let report = check(
        "void drop(Iterator<String> it) {\n    while (it.hasNext()) {\n        it.next();\n        it.remove();\n    }\n}",
    );
    assert!(report.violations.is_empty(), "{:?}", report.violations);
}

#[test]
fn test_collection_remove_is_excluded() {
    let report = check("void drop(java.util.List<String> list) {\n    list.remove(0);\n}");
    assert!(report.violations.is_empty(), "{:?}", report.violations);
}

#[test]
fn test_next_in_other_method_does_not_satisfy_remove() {
    let report = check(
        "void advance(Iterator<String> it) {\n    if (it.hasNext()) { it.next(); }\n}\nvoid drop(Iterator<String> it) {\n    it.remove();\n}",
    );
    let codes: Vec<&str> = report.violations.iter().map(|v| v.code.as_str()).collect();
    assert_eq!(codes, vec!["A001"]);
    assert_eq!(report.violations[0].line, 6);
}
