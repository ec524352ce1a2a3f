use std::collections::HashSet;

use crate::types::Violation;

/// Code a suppressed finding is re-labelled with.
pub const SUPPRESSED_CODE: &str = "S001";

/// Manages finding codes silenced with `--suppress`.
///
/// A suppressed violation keeps its place in the output but is:
/// - downgraded to severity "INFO" and marked `suppressed = true`
/// - re-coded to "S001"
/// - given a `suppress_hint` naming the replaced code
#[derive(Debug, Default)]
pub struct SuppressionManager {
    suppressed_codes: HashSet<String>,
}

impl SuppressionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a code to suppress (e.g. "A002", "W001").
    pub fn suppress(&mut self, code: &str) {
        self.suppressed_codes.insert(code.trim().to_ascii_uppercase());
    }

    pub fn is_suppressed(&self, code: &str) -> bool {
        self.suppressed_codes.contains(code)
    }

    /// Apply suppression to a violation. Unsuppressed codes pass through.
    pub fn apply(&self, mut violation: Violation) -> Violation {
        if self.is_suppressed(&violation.code) {
            violation.suppress_hint = Some(format!(
                "Suppressed {} via --suppress flag",
                violation.code
            ));
            violation.suppressed = true;
            violation.code = SUPPRESSED_CODE.to_string();
            violation.severity = "INFO".to_string();
        }
        violation
    }

    pub fn count(&self) -> usize {
        self.suppressed_codes.len()
    }
}
