use apiguard_core::types::{Anchor, CallEvent, ChainRecord};
use serde::{Deserialize, Serialize};

use crate::rules::Rule;

/// Code reported for an API chain.
pub const CHAIN_CODE: &str = "W001";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckResult {
    pub version: String,
    pub command: String,
    pub status: String, // "ok" | "warning"
    pub files_analyzed: Vec<String>,
    pub violations: Vec<Violation>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub chains: Vec<ChainReport>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub skipped: Vec<SkippedFile>,
    pub info: CheckInfo,
}

impl CheckResult {
    /// Findings that were not silenced with `--suppress`.
    pub fn active_count(&self) -> usize {
        self.violations.iter().filter(|v| !v.suppressed).count()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    pub code: String,
    pub severity: String, // "WARNING" | "INFO"
    pub category: String,
    pub message: String,
    pub file: String,
    pub line: u32,
    pub hash: String,
    /// Label of the rule or pass that produced it.
    pub rule: String,
    pub suppressed: bool,
    pub suppress_hint: Option<String>,
}

/// Chain records of one source file, in the order they were found.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainReport {
    pub file: String,
    pub records: Vec<ChainRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub file: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckInfo {
    pub functions_analyzed: u32,
    pub call_events: u32,
    /// Calls in lambdas, initializers and field initialisers, which have no
    /// enclosing method and were not checked.
    pub unowned_calls: u32,
    /// Rules in the loaded catalog; `None` when the catalog failed to load
    /// and only chain detection ran.
    pub rules_loaded: Option<u32>,
}

/// Result of checking one parsed file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub file: String,
    pub functions: u32,
    pub call_events: u32,
    pub unowned: Vec<Anchor>,
    pub violations: Vec<Violation>,
    pub chains: Vec<ChainRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactsResult {
    pub version: String,
    pub command: String,
    pub file: String,
    pub functions: Vec<FunctionFacts>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub unowned: Vec<Anchor>,
}

/// Everything the engine knows about one function body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionFacts {
    pub name: String,
    pub line: u32,
    pub events: Vec<CallEvent>,
    pub chains: Vec<ChainRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RulesResult {
    pub version: String,
    pub command: String,
    pub rules: Vec<Rule>,
}
