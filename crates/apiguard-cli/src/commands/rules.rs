use std::path::PathBuf;

use apiguard_enforce::types::RulesResult;
use apiguard_output::OutputFormatter;

/// Run `apiguard rules`: list the usage contracts a check would apply.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool, rules: Option<PathBuf>) -> i32 {
    let root = match super::project_root("rules") {
        Ok(p) => p,
        Err(code) => return code,
    };
    let config = super::load_config(&root);

    let catalog = match super::catalog_for(&root, &config, rules.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("apiguard rules: {}", e);
            return 2;
        }
    };
    if verbose {
        eprintln!("apiguard rules: loaded {} rule(s)", catalog.len());
    }

    let result = RulesResult {
        version: env!("CARGO_PKG_VERSION").to_string(),
        command: "rules".to_string(),
        rules: catalog.rules().to_vec(),
    };
    let output = formatter.format_rules(&result);
    if !output.is_empty() {
        println!("{}", output);
    }
    0
}
