// Tests that generated sources with very deep expressions are analysed
// rather than aborting the run.

use std::sync::Arc;

use apiguard_core::config::ApiguardConfig;
use apiguard_enforce::{AnalysisEngine, RuleCatalog};

use super::common::{create_project, java_class};

fn concatenation(terms: usize) -> String {
    (0..terms)
        .map(|i| format!("\"a{i}\""))
        .collect::<Vec<_>>()
        .join(" + ")
}

#[test]
fn test_deep_concatenation_is_checked() {
    let body = format!(
        "void f(java.util.Iterator<String> it) {{\n    String s = {};\n    foo(s);\n    it.next();\n}}",
        concatenation(20_000)
    );
    let generated = java_class("Generated", &body);
    let plain = java_class("Plain", "void g() {\n    foo(bar());\n}");
    let dir = create_project(&[
        ("Generated.java", generated.as_str()),
        ("Plain.java", plain.as_str()),
    ]);

    let engine = AnalysisEngine::new(
        Some(Arc::new(RuleCatalog::builtin())),
        &ApiguardConfig::default(),
    );
    let result = engine.check_files(&[
        dir.path().join("Generated.java"),
        dir.path().join("Plain.java"),
    ]);

    assert_eq!(result.files_analyzed.len(), 2);
    assert!(result.skipped.is_empty());
    let codes: Vec<&str> = result.violations.iter().map(|v| v.code.as_str()).collect();
    assert!(codes.contains(&"A003"), "{codes:?}");
    assert!(codes.contains(&"W001"), "{codes:?}");
}
