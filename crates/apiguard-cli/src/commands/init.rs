use std::fs;
use std::path::Path;

use apiguard_core::config::{ApiguardConfig, RulesConfig, APIGUARD_DIR, CONFIG_FILE};
use apiguard_enforce::rules::BUILTIN_CATALOG;

const PROJECT_CATALOG: &str = "rules.json";

const DEFAULT_IGNORE: &str = "\
target/
build/
out/
.gradle/
.idea/
";

/// Run `apiguard init`: create `.apiguard/` with a config that points at an
/// editable copy of the builtin catalog.
pub fn run(verbose: bool) -> i32 {
    let cwd = match super::project_root("init") {
        Ok(p) => p,
        Err(code) => return code,
    };

    let apiguard_dir = cwd.join(APIGUARD_DIR);
    if apiguard_dir.exists() {
        eprintln!("apiguard init: {}/ directory already exists", APIGUARD_DIR);
        return 2;
    }
    if let Err(e) = fs::create_dir_all(&apiguard_dir) {
        eprintln!("apiguard init: failed to create {}/: {}", APIGUARD_DIR, e);
        return 2;
    }

    let catalog_path = apiguard_dir.join(PROJECT_CATALOG);
    if let Err(e) = fs::write(&catalog_path, BUILTIN_CATALOG) {
        eprintln!("apiguard init: failed to write rule catalog: {}", e);
        return 2;
    }

    // The project copy stands in for the builtin rules.
    let config = ApiguardConfig {
        rules: RulesConfig {
            catalog: Some(Path::new(APIGUARD_DIR).join(PROJECT_CATALOG)),
            builtin: false,
        },
        ..ApiguardConfig::default()
    };
    let json = match serde_json::to_string_pretty(&config) {
        Ok(j) => j,
        Err(e) => {
            eprintln!("apiguard init: failed to serialize config: {}", e);
            return 2;
        }
    };
    if let Err(e) = fs::write(apiguard_dir.join(CONFIG_FILE), json) {
        eprintln!("apiguard init: failed to write config: {}", e);
        return 2;
    }

    create_apiguardignore(&cwd, verbose);

    if verbose {
        eprintln!("apiguard init: initialized in {}", cwd.display());
    }
    0
}

/// Create a default `.apiguardignore` if one doesn't exist.
fn create_apiguardignore(root: &Path, verbose: bool) {
    let ignore_path = root.join(".apiguardignore");
    if ignore_path.exists() {
        return;
    }
    match fs::write(&ignore_path, DEFAULT_IGNORE) {
        Ok(_) => {
            if verbose {
                eprintln!("apiguard init: created .apiguardignore");
            }
        }
        Err(e) => {
            eprintln!("apiguard init: warning: failed to create .apiguardignore: {}", e);
        }
    }
}
