//! Output for apiguard command results.
//!
//! - **Human** (default): compiler-style diagnostics for terminal users
//! - **JSON** (`--json`): machine-readable structured output
//! - **Report log**: append-only per-file text log of API chains

pub mod human;
pub(crate) mod human_helpers;
pub mod json;
pub mod report;

use apiguard_enforce::types::{CheckResult, FactsResult, RulesResult};

pub trait OutputFormatter {
    fn format_check(&self, result: &CheckResult) -> String;
    fn format_facts(&self, result: &FactsResult) -> String;
    fn format_rules(&self, result: &RulesResult) -> String;
}
