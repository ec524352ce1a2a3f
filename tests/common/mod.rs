/// Shared test helpers for all apiguard integration tests.
///
/// Import from any integration test file with:
///   `#[path = "common/mod.rs"] mod common;`
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Create a project directory holding `files`, each `(relative_path, content)`.
/// Hold the TempDir to keep the directory alive.
#[allow(dead_code)]
pub fn create_project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::Builder::new()
        .prefix("apiguard_it")
        .tempdir()
        .unwrap();
    for (path, content) in files {
        let full_path = dir.path().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content).unwrap();
    }
    dir
}

/// Wrap method declarations in a class so snippets parse as a compilation unit.
/// The first body line is line 2.
#[allow(dead_code)]
pub fn java_class(name: &str, body: &str) -> String {
    format!("class {name} {{\n{body}\n}}\n")
}

/// Get path to compiled apiguard binary.
///
/// Builds the binary if it doesn't exist yet.
#[allow(dead_code)]
pub fn apiguard_bin() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove 'deps'
    path.push("apiguard");
    if path.exists() {
        return path;
    }
    let workspace = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let fallback = workspace.join("target/debug/apiguard");
    if fallback.exists() {
        return fallback;
    }
    let status = Command::new("cargo")
        .args(["build", "-p", "apiguard-cli"])
        .current_dir(&workspace)
        .status()
        .expect("Failed to build apiguard");
    assert!(status.success(), "Failed to build apiguard binary");
    fallback
}

/// Run apiguard with `args` inside `dir`.
#[allow(dead_code)]
pub fn run_apiguard(dir: &Path, args: &[&str]) -> Output {
    Command::new(apiguard_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("APIGUARD_LOG")
        .output()
        .expect("Failed to run apiguard")
}
