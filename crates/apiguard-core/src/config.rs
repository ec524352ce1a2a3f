//! Configuration file loading for apiguard.
//!
//! Reads `.apiguard/apiguard.json` and provides typed access to all settings.
//! Falls back to defaults when the config file is missing or incomplete.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Name of the per-project directory holding config, catalog and reports.
pub const APIGUARD_DIR: &str = ".apiguard";
pub const CONFIG_FILE: &str = "apiguard.json";

/// Top-level apiguard configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiguardConfig {
    pub version: String,
    #[serde(default)]
    pub rules: RulesConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub chain: ChainConfig,
    #[serde(default)]
    pub ignore_patterns: Vec<String>,
}

/// Where the rule catalog comes from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Project catalog, relative to the project root.
    #[serde(default)]
    pub catalog: Option<PathBuf>,
    /// Also load the embedded catalog.
    #[serde(default = "default_true")]
    pub builtin: bool,
}

/// Chain report log settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_report_dir")]
    pub dir: PathBuf,
}

/// API chain detection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Qualified call names that never count as the outer call of a chain,
    /// on top of the `print`/`println`/`printf` family.
    #[serde(default)]
    pub excluded_calls: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_report_dir() -> PathBuf {
    Path::new(APIGUARD_DIR).join("reports")
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            catalog: None,
            builtin: true,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            dir: default_report_dir(),
        }
    }
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            excluded_calls: vec![],
        }
    }
}

impl Default for ApiguardConfig {
    fn default() -> Self {
        Self {
            version: "0.1.0".to_string(),
            rules: RulesConfig::default(),
            report: ReportConfig::default(),
            chain: ChainConfig::default(),
            ignore_patterns: vec![],
        }
    }
}

impl ApiguardConfig {
    /// Load configuration from `apiguard.json` inside the given apiguard
    /// directory. Returns defaults if the file doesn't exist or can't be parsed.
    pub fn load(apiguard_dir: &Path) -> Self {
        let config_path = apiguard_dir.join(CONFIG_FILE);
        let content = match std::fs::read_to_string(&config_path) {
            Ok(c) => c,
            Err(_) => return Self::default(),
        };
        match serde_json::from_str(&content) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(
                    path = %config_path.display(),
                    error = %e,
                    "failed to parse config, using defaults"
                );
                Self::default()
            }
        }
    }

    /// Resolve a configured path against the project root.
    pub fn resolve(root: &Path, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            root.join(path)
        }
    }
}
