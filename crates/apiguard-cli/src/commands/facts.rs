use std::path::PathBuf;

use apiguard_core::config::ApiguardConfig;
use apiguard_enforce::AnalysisEngine;
use apiguard_output::OutputFormatter;
use apiguard_parsers::JavaParser;

/// Run `apiguard facts <file>`: dump the call events and chains the
/// checker sees in each function.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool, file: PathBuf) -> i32 {
    let root = match super::project_root("facts") {
        Ok(p) => p,
        Err(code) => return code,
    };
    let config = super::load_config(&root);

    let path = ApiguardConfig::resolve(&root, &file);
    let tree = match JavaParser::new().parse_file(&path) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("apiguard facts: {}", e);
            return 2;
        }
    };

    let display = super::relative_to(&root, &path).display().to_string();
    let engine = AnalysisEngine::new(None, &config);
    let result = engine.facts(&display, &tree);

    if verbose {
        eprintln!(
            "apiguard facts: {} function(s), {} unowned call(s)",
            result.functions.len(),
            result.unowned.len()
        );
    }

    let output = formatter.format_facts(&result);
    if !output.is_empty() {
        println!("{}", output);
    }
    0
}
