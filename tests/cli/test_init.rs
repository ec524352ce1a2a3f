// Tests for `apiguard init`.

use std::fs;

use super::common::{create_project, run_apiguard};

#[test]
fn test_init_creates_config_and_catalog() {
    let dir = create_project(&[]);
    let out = run_apiguard(dir.path(), &["init"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let config: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join(".apiguard/apiguard.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(config["rules"]["catalog"], ".apiguard/rules.json");
    assert_eq!(config["rules"]["builtin"], false);
    assert_eq!(config["chain"]["enabled"], true);

    let catalog: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(dir.path().join(".apiguard/rules.json")).unwrap(),
    )
    .unwrap();
    assert!(catalog["constraint"].as_array().map_or(false, |c| !c.is_empty()));
    assert!(dir.path().join(".apiguardignore").exists());
}

#[test]
fn test_init_twice_fails() {
    let dir = create_project(&[]);
    assert!(run_apiguard(dir.path(), &["init"]).status.success());
    let out = run_apiguard(dir.path(), &["init"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("already exists"));
}

#[test]
fn test_init_keeps_existing_ignore_file() {
    let dir = create_project(&[(".apiguardignore", "legacy/\n")]);
    assert!(run_apiguard(dir.path(), &["init"]).status.success());
    assert_eq!(
        fs::read_to_string(dir.path().join(".apiguardignore")).unwrap(),
        "legacy/\n"
    );
}

#[test]
fn test_check_after_init_uses_project_catalog() {
    let dir = create_project(&[(
        "src/A.java",
        "class A {\n  void f(Iterator<String> it) {\n    it.next();\n  }\n}\n",
    )]);
    assert!(run_apiguard(dir.path(), &["init"]).status.success());
    fs::write(dir.path().join(".apiguard/rules.json"), r#"{ "constraint": [] }"#).unwrap();

    let out = run_apiguard(dir.path(), &["check"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).trim().is_empty());
}
