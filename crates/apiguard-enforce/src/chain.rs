//! API chain detection: calls whose argument is itself a call, either
//! directly (`foo(bar())`) or through a local whose latest assignment was a
//! call (`T v = bar(); foo(v);`).
//!
//! One forward pass per function with its own alias table. Redeclaring or
//! reassigning a name replaces its origin; shadowing in nested blocks is not
//! tracked separately.

use std::collections::HashMap;

use apiguard_core::ast::{NodeId, NodeKind, SyntaxTree};
use apiguard_core::types::{Anchor, ChainRecord};

use crate::extract::unwrap_parens;

/// Output calls never count as the outer call of a chain.
const OUTPUT_CALLS: &[&str] = &["print", "println", "printf"];

/// Alias table for one function visit: local name → text of the call it was
/// last assigned from.
#[derive(Debug, Default)]
pub struct ChainScope {
    aliases: HashMap<String, String>,
}

impl ChainScope {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bind(&mut self, name: &str, origin: Option<String>) {
        match origin {
            Some(text) => {
                self.aliases.insert(name.to_string(), text);
            }
            None => {
                self.aliases.remove(name);
            }
        }
    }

    pub fn origin(&self, name: &str) -> Option<&str> {
        self.aliases.get(name).map(String::as_str)
    }
}

/// Chain records for `function`, in source order. `excluded_calls` lists
/// qualified names (`LOG.info`) that are never reported as outer calls.
///
/// Lambdas, initializers and nested class bodies are not entered, matching
/// the calls [`crate::extract::extract`] attributes to `function`.
pub fn detect_chains(
    tree: &SyntaxTree,
    function: NodeId,
    excluded_calls: &[String],
) -> Vec<ChainRecord> {
    let mut pass = ChainPass {
        tree,
        excluded_calls,
        scope: ChainScope::new(),
        records: Vec::new(),
    };
    pass.visit(function);
    pass.records
}

struct ChainPass<'t> {
    tree: &'t SyntaxTree,
    excluded_calls: &'t [String],
    scope: ChainScope,
    records: Vec<ChainRecord>,
}

/// Work item of the chain walk. A declaration binds its name only after its
/// value subtree has been visited.
enum Step {
    Enter(NodeId),
    Bind(NodeId),
}

impl ChainPass<'_> {
    fn visit(&mut self, root: NodeId) {
        let tree = self.tree;
        let mut stack = vec![Step::Enter(root)];
        while let Some(step) = stack.pop() {
            let id = match step {
                Step::Enter(id) => id,
                Step::Bind(id) => {
                    self.bind(id);
                    continue;
                }
            };
            match tree.kind(id) {
                kind if kind.is_function_boundary() && id != root => continue,
                NodeKind::LocalVariable { .. } | NodeKind::Assignment { .. } => {
                    stack.push(Step::Bind(id));
                }
                kind if kind.is_call() => self.check_call(id, kind),
                _ => {}
            }
            stack.extend(tree.children(id).iter().rev().map(|&c| Step::Enter(c)));
        }
    }

    fn bind(&mut self, id: NodeId) {
        let tree = self.tree;
        let (name, value) = match tree.kind(id) {
            NodeKind::LocalVariable { name, value } => (name, *value),
            NodeKind::Assignment { target, value } => (target, *value),
            _ => return,
        };
        let origin = self.call_text(value);
        self.scope.bind(name, origin);
    }

    /// Text of `value` if it is a method call.
    fn call_text(&self, value: Option<NodeId>) -> Option<String> {
        let value = unwrap_parens(self.tree, value?);
        match self.tree.kind(value) {
            NodeKind::MethodCall { .. } => Some(compact(self.tree.text(value))),
            _ => None,
        }
    }

    fn check_call(&mut self, id: NodeId, kind: &NodeKind) {
        if self.is_excluded(kind) {
            return;
        }
        let Some(arguments) = kind.arguments() else {
            return;
        };
        let tree = self.tree;
        for &arg in tree.children(arguments) {
            let arg = unwrap_parens(tree, arg);
            let inner = match tree.kind(arg) {
                NodeKind::MethodCall { .. } => Some(compact(tree.text(arg))),
                NodeKind::Name(name) => self.scope.origin(name).map(str::to_string),
                _ => None,
            };
            if let Some(inner_text) = inner {
                self.records.push(ChainRecord {
                    outer_anchor: Anchor::of(tree, id),
                    outer_text: compact(tree.text(id)),
                    inner_text,
                    line: tree.line(id),
                });
            }
        }
    }

    fn is_excluded(&self, kind: &NodeKind) -> bool {
        let NodeKind::MethodCall {
            receiver, method, ..
        } = kind
        else {
            return false;
        };
        if OUTPUT_CALLS.contains(&method.as_str()) {
            return true;
        }
        let qualified = match receiver {
            Some(r) => format!("{r}.{method}"),
            None => method.clone(),
        };
        self.excluded_calls.iter().any(|x| *x == qualified)
    }
}

/// Collapse runs of whitespace so a call spanning lines reports on one.
fn compact(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
