// Tests for `apiguard facts`.

use super::common::{create_project, run_apiguard};

const SOURCE: &str = "class A {\n  void f(Iterator<String> it) {\n    if (!it.hasNext()) {\n      return;\n    }\n    try {\n      use(it.next());\n    } catch (RuntimeException e) {\n    }\n  }\n}\n";

#[test]
fn test_facts_json() {
    let dir = create_project(&[("A.java", SOURCE)]);
    let out = run_apiguard(dir.path(), &["facts", "--json", "A.java"]);
    assert_eq!(out.status.code(), Some(0));
    let json: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(json["command"], "facts");
    assert_eq!(json["file"], "A.java");

    let function = &json["functions"][0];
    assert_eq!(function["name"], "f");
    assert_eq!(function["line"], 2);
    let events = function["events"].as_array().unwrap();
    let names: Vec<&str> = events
        .iter()
        .map(|e| e["short_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["use", "next"]);
    assert_eq!(events[1]["in_try"], true);
    assert_eq!(function["chains"][0]["inner_text"], "it.next()");
}

#[test]
fn test_facts_human() {
    let dir = create_project(&[("A.java", SOURCE)]);
    let out = run_apiguard(dir.path(), &["facts", "A.java"]);
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("fn f (line 2): 2 call(s)"), "{stdout}");
    assert!(stdout.contains("it.next"), "{stdout}");
}

#[test]
fn test_facts_missing_file() {
    let dir = create_project(&[]);
    let out = run_apiguard(dir.path(), &["facts", "Nope.java"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("apiguard facts:"));
}
