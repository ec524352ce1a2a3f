pub mod check;
pub mod facts;
pub mod init;
pub mod rules;
pub mod watch;

use std::path::{Path, PathBuf};

use apiguard_core::config::{ApiguardConfig, APIGUARD_DIR};
use apiguard_enforce::rules::{load_catalog, RuleCatalog, RuleLoadError};

/// Working directory, or an exit code after reporting the failure.
pub(crate) fn project_root(command: &str) -> Result<PathBuf, i32> {
    std::env::current_dir().map_err(|e| {
        eprintln!("apiguard {}: failed to get current directory: {}", command, e);
        2
    })
}

/// `.apiguard/apiguard.json` under `root`, or defaults when absent.
pub(crate) fn load_config(root: &Path) -> ApiguardConfig {
    ApiguardConfig::load(&root.join(APIGUARD_DIR))
}

pub(crate) fn catalog_for(
    root: &Path,
    config: &ApiguardConfig,
    override_path: Option<&Path>,
) -> Result<RuleCatalog, RuleLoadError> {
    load_catalog(root, &config.rules, override_path)
}

/// `path` relative to `root` when it lies under it, so findings and report
/// names stay short.
pub(crate) fn relative_to(root: &Path, path: &Path) -> PathBuf {
    path.strip_prefix(root)
        .map(Path::to_path_buf)
        .unwrap_or_else(|_| path.to_path_buf())
}
