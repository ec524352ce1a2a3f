use std::collections::HashSet;

use apiguard_core::types::Anchor;
use serde::{Deserialize, Serialize};

/// A finding before it is turned into a file-level violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub anchor: Anchor,
    pub code: String,
    /// Label of the rule (or pass) that produced it.
    pub rule: String,
    pub message: String,
}

/// Collects diagnostics for one run, dropping repeats of the same
/// `(anchor, message)` pair. Anchors compare by source span, so a rule that
/// recomputes an anchor still de-duplicates.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    seen: HashSet<(Anchor, String)>,
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic. Returns `false` if it was a duplicate.
    pub fn report(&mut self, anchor: Anchor, code: &str, rule: &str, message: &str) -> bool {
        if !self.seen.insert((anchor, message.to_string())) {
            return false;
        }
        self.diagnostics.push(Diagnostic {
            anchor,
            code: code.to_string(),
            rule: rule.to_string(),
            message: message.to_string(),
        });
        true
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
