//! Enforcement engine for apiguard usage contracts.
//!
//! Walks each function body once, matches its call events against the rule
//! catalog, and produces violations:
//! - A001: precede (a required earlier call is missing)
//! - A002: follow (a required later call is missing)
//! - A003: guard (the call is not protected by the required state check)
//! - A004: require-try (the call is not inside a `try` block)
//! - W001: API chain (a call's argument is itself a call, directly or through a local)

pub mod types;
pub mod extract;
pub mod rules;
pub mod evaluate;
pub mod chain;
pub mod sink;
pub mod suppress;
pub mod engine;

pub use engine::AnalysisEngine;
pub use rules::{CheckKind, Rule, RuleCatalog, RuleLoadError};
