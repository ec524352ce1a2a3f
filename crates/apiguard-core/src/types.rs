use serde::{Deserialize, Serialize};

use crate::ast::{NodeId, Span, SyntaxTree};

/// Positional identity of an AST node, used to place and de-duplicate
/// diagnostics. Two anchors for the same source span are equal no matter
/// which pass computed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Anchor {
    pub start: usize,
    pub end: usize,
    pub line: u32,
}

impl Anchor {
    pub fn of(tree: &SyntaxTree, id: NodeId) -> Self {
        let Span { start, end } = tree.span(id);
        Self {
            start,
            end,
            line: tree.line(id),
        }
    }
}

/// Kind of control construct guarding a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuardKind {
    If,
    While,
}

impl GuardKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardKind::If => "if",
            GuardKind::While => "while",
        }
    }
}

impl std::fmt::Display for GuardKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `api op value` test found in a guard, e.g. `s.indexOf(c) > -1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardComparison {
    pub api: String,
    pub op: String,
    pub value: String,
}

/// The nearest enclosing `if`/`while` of a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardContext {
    pub kind: GuardKind,
    /// The test is a direct call or a negated direct call.
    pub condition_is_call: bool,
    /// Method name of the call tested, when `condition_is_call`.
    pub condition_api: Option<String>,
    pub negated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison: Option<GuardComparison>,
}

impl GuardContext {
    /// State the test asserts for the guarded API: `"false"` when negated,
    /// `"true"` otherwise, or `None` if the test is not a plain call. Calls
    /// in either branch of an `if` see the same state.
    pub fn effective_state(&self) -> Option<&'static str> {
        if !self.condition_is_call {
            return None;
        }
        Some(if self.negated {
            "false"
        } else {
            "true"
        })
    }
}

/// One call or object-construction occurrence inside a function body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEvent {
    /// Traversal order within the function.
    pub seq: u32,
    /// Receiver plus method (`iterator.next`) or the constructed class.
    pub qualified_name: String,
    /// Last segment of `qualified_name`; what rules match on.
    pub short_name: String,
    pub line: u32,
    /// Enclosing function node.
    pub function: NodeId,
    pub guard: Option<GuardContext>,
    pub in_try: bool,
    pub anchor: Anchor,
}

/// A call whose argument is itself a call, directly or through a local
/// variable last assigned from one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRecord {
    pub outer_anchor: Anchor,
    pub outer_text: String,
    pub inner_text: String,
    pub line: u32,
}

impl ChainRecord {
    /// `"<call-text> -> <dependency-text> in line <n>"`
    pub fn report_line(&self) -> String {
        format!("{} -> {} in line {}", self.outer_text, self.inner_text, self.line)
    }
}
