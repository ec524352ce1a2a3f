//! Rule catalog: declarative usage contracts loaded from JSON and indexed by
//! the API short names they reference.
//!
//! Catalog format:
//!
//! ```json
//! { "constraint": [
//!     { "start": "next", "end": "remove", "exclude": ["panel"],
//!       "constraint": { "check": "precede",
//!                       "Violation": "IllegalStateException",
//!                       "Desc": "Missing call: next() should precede remove()" } } ] }
//! ```
//!
//! `check` is one of `precede`, `follow`, `within try-catch`, or a state
//! check `<api><op><value>` with `op` in `<=`, `>=`, `==`, `<`, `>`.

use std::collections::HashMap;
use std::path::Path;

use apiguard_core::config::{ApiguardConfig, RulesConfig};
use serde::{Deserialize, Serialize};

/// The embedded catalog: Swing add/remove→validate, Iterator
/// hasNext/next/remove, String indexOf/substring, FileReader checks.
pub const BUILTIN_CATALOG: &str = include_str!("rules/builtin.json");

/// Searched in this order so `<=`/`>=`/`==` are not split at `<`/`>`.
const GUARD_OPERATORS: &[&str] = &["<=", ">=", "==", "<", ">"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CheckKind {
    /// `start` must be called at or before every `end`.
    Precede,
    /// `end` must be called at or after every `start`.
    Follow,
    /// `start` must sit under an `if`/`while` testing `condition_api`.
    Guard {
        op: String,
        condition_api: String,
        required_state: String,
    },
    /// `start` must sit inside a `try` block.
    RequireTry,
}

impl CheckKind {
    pub fn code(&self) -> &'static str {
        match self {
            CheckKind::Precede => "A001",
            CheckKind::Follow => "A002",
            CheckKind::Guard { .. } => "A003",
            CheckKind::RequireTry => "A004",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CheckKind::Precede => "precede",
            CheckKind::Follow => "follow",
            CheckKind::Guard { .. } => "guard",
            CheckKind::RequireTry => "require_try",
        }
    }
}

/// One usage contract. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub start: String,
    pub end: Option<String>,
    pub check: CheckKind,
    pub violation: Option<String>,
    pub description: String,
    /// Substrings of a qualified call name that switch this rule off, e.g.
    /// `panel` so `panel.remove` is not treated as `iterator.remove`.
    pub exclusions: Vec<String>,
}

impl Rule {
    /// Diagnostic text: the description, plus the thrown exception if known.
    pub fn message(&self) -> String {
        match &self.violation {
            Some(v) => format!("{}; if violated, throws {}", self.description, v),
            None => self.description.clone(),
        }
    }

    pub fn excludes(&self, qualified_name: &str) -> bool {
        self.exclusions
            .iter()
            .any(|x| !x.is_empty() && qualified_name.contains(x.as_str()))
    }

    /// Short human label, e.g. `next -> remove (precede)`.
    pub fn label(&self) -> String {
        if let CheckKind::Guard {
            op,
            condition_api,
            required_state,
        } = &self.check
        {
            return format!("{} ({}(){}{})", self.start, condition_api, op, required_state);
        }
        match &self.end {
            Some(end) => format!("{} -> {} ({})", self.start, end, self.check.as_str()),
            None => format!("{} ({})", self.start, self.check.as_str()),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuleLoadError {
    #[error("failed to read rule catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed rule catalog {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid rule #{index}: {reason}")]
    Invalid { index: usize, reason: String },
}

#[derive(Deserialize)]
struct RawCatalog {
    constraint: Vec<RawEntry>,
}

#[derive(Deserialize)]
struct RawEntry {
    start: String,
    #[serde(default)]
    end: Option<String>,
    constraint: RawConstraint,
    #[serde(default)]
    exclude: Vec<String>,
}

#[derive(Deserialize)]
struct RawConstraint {
    check: String,
    #[serde(rename = "Violation", default)]
    violation: Option<String>,
    #[serde(rename = "Desc", default)]
    desc: String,
}

/// Loaded rules plus lookup indexes by start and end name.
#[derive(Debug, Clone, Default)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
    by_start: HashMap<String, Vec<usize>>,
    by_end: HashMap<String, Vec<usize>>,
}

impl RuleCatalog {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut catalog = Self {
            rules,
            ..Self::default()
        };
        catalog.reindex();
        catalog
    }

    pub fn load(path: &Path) -> Result<Self, RuleLoadError> {
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| RuleLoadError::Io {
            path: display.clone(),
            source: e,
        })?;
        Self::parse(&content, &display)
    }

    pub fn from_json(json: &str) -> Result<Self, RuleLoadError> {
        Self::parse(json, "<inline>")
    }

    /// The embedded catalog. An empty catalog if it somehow fails to parse.
    pub fn builtin() -> Self {
        Self::parse(BUILTIN_CATALOG, "<builtin>").unwrap_or_else(|e| {
            tracing::error!(error = %e, "embedded rule catalog is invalid");
            Self::default()
        })
    }

    fn parse(json: &str, path: &str) -> Result<Self, RuleLoadError> {
        let raw: RawCatalog = serde_json::from_str(json).map_err(|e| RuleLoadError::Parse {
            path: path.to_string(),
            source: e,
        })?;
        let rules = raw
            .constraint
            .into_iter()
            .enumerate()
            .map(|(index, entry)| build_rule(index, entry))
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(path, rules = rules.len(), "loaded rule catalog");
        Ok(Self::new(rules))
    }

    /// Append `other`'s rules after this catalog's.
    pub fn merge(&mut self, other: RuleCatalog) {
        self.rules.extend(other.rules);
        self.reindex();
    }

    fn reindex(&mut self) {
        self.by_start.clear();
        self.by_end.clear();
        for (i, rule) in self.rules.iter().enumerate() {
            self.by_start.entry(rule.start.clone()).or_default().push(i);
            if let Some(end) = &rule.end {
                self.by_end.entry(end.clone()).or_default().push(i);
            }
        }
    }

    pub fn lookup_by_start(&self, name: &str) -> Vec<&Rule> {
        self.indexed(&self.by_start, name).map(|i| &self.rules[i]).collect()
    }

    pub fn lookup_by_end(&self, name: &str) -> Vec<&Rule> {
        self.indexed(&self.by_end, name).map(|i| &self.rules[i]).collect()
    }

    /// Rules naming `name` as start or end, each once, in catalog order.
    pub fn candidates(&self, name: &str) -> Vec<&Rule> {
        let mut indexes: Vec<usize> = self
            .indexed(&self.by_start, name)
            .chain(self.indexed(&self.by_end, name))
            .collect();
        indexes.sort_unstable();
        indexes.dedup();
        indexes.into_iter().map(|i| &self.rules[i]).collect()
    }

    fn indexed<'a>(
        &'a self,
        index: &'a HashMap<String, Vec<usize>>,
        name: &str,
    ) -> impl Iterator<Item = usize> + 'a {
        index.get(name).into_iter().flatten().copied()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Build the catalog a project asks for: the builtin rules (unless turned
/// off), then the project catalog. `override_path` replaces the configured
/// catalog path.
pub fn load_catalog(
    root: &Path,
    config: &RulesConfig,
    override_path: Option<&Path>,
) -> Result<RuleCatalog, RuleLoadError> {
    let mut catalog = if config.builtin {
        RuleCatalog::builtin()
    } else {
        RuleCatalog::default()
    };
    let project = override_path.or(config.catalog.as_deref());
    if let Some(path) = project {
        let path = ApiguardConfig::resolve(root, path);
        catalog.merge(RuleCatalog::load(&path)?);
    }
    Ok(catalog)
}

fn build_rule(index: usize, entry: RawEntry) -> Result<Rule, RuleLoadError> {
    let invalid = |reason: &str| RuleLoadError::Invalid {
        index,
        reason: reason.to_string(),
    };

    let start = normalize_api(&entry.start);
    if start.is_empty() {
        return Err(invalid("empty start"));
    }
    let end = entry
        .end
        .as_deref()
        .map(normalize_api)
        .filter(|e| !e.is_empty() && e.as_str() != "null");

    let check = parse_check(&entry.constraint.check).ok_or_else(|| {
        invalid(&format!("unrecognised check {:?}", entry.constraint.check))
    })?;
    match &check {
        CheckKind::Precede | CheckKind::Follow if end.is_none() => {
            return Err(invalid(&format!("{} rule needs an end", check.as_str())));
        }
        CheckKind::Guard { condition_api, .. } if condition_api.is_empty() => {
            return Err(invalid("state check names no API"));
        }
        _ => {}
    }

    Ok(Rule {
        start,
        end,
        check,
        violation: entry
            .constraint
            .violation
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty()),
        description: entry.constraint.desc.trim().to_string(),
        exclusions: entry.exclude,
    })
}

fn parse_check(check: &str) -> Option<CheckKind> {
    let check = check.trim();
    match check {
        "precede" => return Some(CheckKind::Precede),
        "follow" => return Some(CheckKind::Follow),
        "within try-catch" => return Some(CheckKind::RequireTry),
        _ => {}
    }
    for op in GUARD_OPERATORS {
        if let Some(idx) = check.find(op) {
            let required_state = check[idx + op.len()..].trim();
            if required_state.is_empty() {
                return None;
            }
            return Some(CheckKind::Guard {
                op: op.to_string(),
                condition_api: normalize_api(&check[..idx]),
                required_state: required_state.to_string(),
            });
        }
    }
    None
}

/// `file.exists()` → `exists`, `string.indexOf(c)` → `indexOf`.
fn normalize_api(name: &str) -> String {
    let mut name = name.trim();
    if name.ends_with(')') {
        if let Some(open) = name.rfind('(') {
            name = &name[..open];
        }
    }
    name.rsplit('.').next().unwrap_or(name).trim().to_string()
}

#[cfg(test)]
#[path = "rules_tests.rs"]
mod tests;
