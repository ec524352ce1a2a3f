use std::path::{Path, PathBuf};
use std::sync::Arc;

use apiguard_core::config::ApiguardConfig;
use apiguard_enforce::types::CheckResult;
use apiguard_enforce::AnalysisEngine;
use apiguard_output::report::ReportWriter;
use apiguard_output::OutputFormatter;
use apiguard_parsers::detect_language;
use apiguard_parsers::walker::FileWalker;

pub struct CheckOptions {
    pub paths: Vec<String>,
    pub strict: bool,
    pub suppress: Vec<String>,
    pub rules: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
}

/// Run `apiguard check`: analyse Java files against the rule catalog.
pub fn run(formatter: &dyn OutputFormatter, verbose: bool, opts: CheckOptions) -> i32 {
    let root = match super::project_root("check") {
        Ok(p) => p,
        Err(code) => return code,
    };
    let config = super::load_config(&root);

    let files = match collect_files(&root, &config, &opts.paths) {
        Ok(f) => f,
        Err(code) => return code,
    };
    if verbose {
        eprintln!("apiguard check: checking {} file(s)", files.len());
    }

    let engine = build_engine(&root, &config, opts.rules.as_deref(), &opts.suppress);
    let report_dir = opts
        .report_dir
        .or_else(|| config.report.enabled.then(|| config.report.dir.clone()))
        .map(|dir| ApiguardConfig::resolve(&root, &dir));

    let (result, write_failed) = check_and_print(
        formatter,
        &engine,
        &root,
        &files,
        report_dir.as_deref(),
        verbose,
    );

    if write_failed {
        2
    } else if opts.strict && result.active_count() > 0 {
        1
    } else {
        0
    }
}

/// Engine for one run. A catalog that fails to load is logged and the run
/// continues with chain detection only.
pub(crate) fn build_engine(
    root: &Path,
    config: &ApiguardConfig,
    rules_override: Option<&Path>,
    suppress: &[String],
) -> AnalysisEngine {
    let catalog = match super::catalog_for(root, config, rules_override) {
        Ok(c) => Some(Arc::new(c)),
        Err(e) => {
            tracing::error!(error = %e, "failed to load rule catalog, checking API chains only");
            None
        }
    };
    let mut engine = AnalysisEngine::new(catalog, config);
    for code in suppress {
        engine.suppress(code);
    }
    engine
}

/// Check `files`, print the result, and append chain reports when
/// `report_dir` is set. The flag is true when a report could not be written.
pub(crate) fn check_and_print(
    formatter: &dyn OutputFormatter,
    engine: &AnalysisEngine,
    root: &Path,
    files: &[PathBuf],
    report_dir: Option<&Path>,
    verbose: bool,
) -> (CheckResult, bool) {
    let result = engine.check_files(files);

    let mut write_failed = false;
    if let Some(dir) = report_dir {
        let writer = ReportWriter::new(dir);
        for chains in &result.chains {
            let source = root.join(&chains.file);
            match writer.append(&source, &chains.records) {
                Ok(Some(path)) if verbose => {
                    eprintln!("apiguard check: wrote {}", path.display());
                }
                Ok(_) => {}
                Err(e) => {
                    eprintln!("apiguard check: {}", e);
                    write_failed = true;
                }
            }
        }
    }

    let output = formatter.format_check(&result);
    if !output.is_empty() {
        println!("{}", output);
    }
    if verbose {
        eprintln!(
            "apiguard check: {} function(s), {} call(s), {} unowned call(s) skipped",
            result.info.functions_analyzed, result.info.call_events, result.info.unowned_calls
        );
    }
    (result, write_failed)
}

/// Java files named on the command line, or every Java file under the root.
/// Directories are walked; a path that does not exist is a usage error.
fn collect_files(
    root: &Path,
    config: &ApiguardConfig,
    paths: &[String],
) -> Result<Vec<PathBuf>, i32> {
    let walk = |dir: &Path| -> Vec<PathBuf> {
        FileWalker::new(dir)
            .with_ignore_patterns(&config.ignore_patterns)
            .walk()
            .into_iter()
            .map(|entry| super::relative_to(root, &entry.path))
            .collect()
    };

    if paths.is_empty() {
        return Ok(walk(root));
    }

    let mut files = Vec::new();
    for raw in paths {
        let path = ApiguardConfig::resolve(root, Path::new(raw));
        if path.is_dir() {
            files.extend(walk(&path));
        } else if path.is_file() {
            if detect_language(&path).is_none() {
                eprintln!("apiguard check: skipping {}: not a Java file", raw);
                continue;
            }
            files.push(super::relative_to(root, &path));
        } else {
            eprintln!("apiguard check: no such file or directory: {}", raw);
            return Err(2);
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}
