// Tests for `apiguard rules`.

use super::common::{create_project, run_apiguard};

#[test]
fn test_rules_lists_builtin_catalog() {
    let dir = create_project(&[]);
    let out = run_apiguard(dir.path(), &["rules"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("A003  next (hasNext()==true)"), "{stdout}");
    assert!(stdout.contains("A002  add -> validate (follow)"), "{stdout}");
    assert!(stdout.contains("A004  FileReader (require_try)"), "{stdout}");
}

#[test]
fn test_rules_json() {
    let dir = create_project(&[]);
    let out = run_apiguard(dir.path(), &["rules", "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["command"], "rules");
    let rules = json["rules"].as_array().unwrap();
    assert_eq!(rules.len(), 9);
    assert_eq!(rules[2]["start"], "next");
    assert_eq!(rules[2]["check"]["kind"], "guard");
}

#[test]
fn test_rules_override() {
    let dir = create_project(&[(
        "mine.json",
        r#"{ "constraint": [ { "start": "open", "end": "close",
              "constraint": { "check": "follow", "Desc": "close it" } } ] }"#,
    )]);
    let out = run_apiguard(dir.path(), &["rules", "--json", "--rules", "mine.json"]);
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["rules"].as_array().unwrap().len(), 10);
}

#[test]
fn test_rules_bad_catalog_is_an_error() {
    let dir = create_project(&[("mine.json", "[]")]);
    let out = run_apiguard(dir.path(), &["rules", "--rules", "mine.json"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("apiguard rules:"));
}
