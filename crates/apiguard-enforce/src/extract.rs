//! Fact extraction: one walk over a function body producing its ordered
//! [`CallEvent`] stream.
//!
//! Every method call and object creation outside the condition of an
//! `if`/`while` becomes an event. Each event records its nearest enclosing
//! control construct (only an `if`/`while` yields a [`GuardContext`]) and,
//! from a separate upward walk, whether a `try` block protects it.
//!
//! Extraction is best-effort: missing roles in a partial tree leave the
//! corresponding facts unset, and calls that cannot be attributed to the
//! visited function are collected in [`Extraction::unowned`] instead of
//! failing the walk.

use apiguard_core::ast::{NodeId, NodeKind, SyntaxTree};
use apiguard_core::types::{Anchor, CallEvent, GuardComparison, GuardContext, GuardKind};

/// Facts collected from one function body.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Events ordered by `(line, seq)`.
    pub events: Vec<CallEvent>,
    /// Calls whose nearest scope boundary is a lambda, initializer or class
    /// body rather than the visited function.
    pub unowned: Vec<Anchor>,
}

/// Extract the call events of `function`. Nested method declarations
/// (anonymous or local classes) are left for their own visit.
pub fn extract(tree: &SyntaxTree, function: NodeId) -> Extraction {
    let mut ctx = TraversalContext::new(tree, function);
    ctx.visit(function);
    ctx.finish()
}

/// Per-visit scratch state. Created for one function and dropped with it.
struct TraversalContext<'t> {
    tree: &'t SyntaxTree,
    function: NodeId,
    next_seq: u32,
    events: Vec<CallEvent>,
    unowned: Vec<Anchor>,
}

impl<'t> TraversalContext<'t> {
    fn new(tree: &'t SyntaxTree, function: NodeId) -> Self {
        Self {
            tree,
            function,
            next_seq: 0,
            events: Vec::new(),
            unowned: Vec::new(),
        }
    }

    /// Pre-order walk of `root`'s body on an explicit stack, so `seq`
    /// follows source order however deeply expressions nest.
    fn visit(&mut self, root: NodeId) {
        let tree = self.tree;
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let skip = match tree.kind(id) {
                NodeKind::Function { .. } if id != root => continue,
                NodeKind::If { condition, .. } | NodeKind::While { condition } => *condition,
                kind if kind.is_call() => {
                    self.record(id);
                    None
                }
                _ => None,
            };
            stack.extend(
                tree.children(id)
                    .iter()
                    .rev()
                    .copied()
                    .filter(|&child| Some(child) != skip),
            );
        }
    }

    fn record(&mut self, id: NodeId) {
        let tree = self.tree;
        match tree.owner(id) {
            Ok(owner) if owner == self.function => {}
            Ok(_) => return,
            Err(e) => {
                tracing::debug!(error = %e, "skipping call outside a modelled function");
                self.unowned.push(Anchor::of(tree, id));
                return;
            }
        }

        let (qualified_name, short_name) = call_names(tree.kind(id));
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(CallEvent {
            seq,
            qualified_name,
            short_name,
            line: tree.line(id),
            function: self.function,
            guard: guard_context(tree, self.function, id),
            in_try: in_try(tree, id),
            anchor: Anchor::of(tree, id),
        });
    }

    fn finish(mut self) -> Extraction {
        self.events.sort_by_key(|e| (e.line, e.seq));
        Extraction {
            events: self.events,
            unowned: self.unowned,
        }
    }
}

/// `(qualified, short)` names of a call node. Unknown parts come out empty.
fn call_names(kind: &NodeKind) -> (String, String) {
    match kind {
        NodeKind::MethodCall {
            receiver, method, ..
        } => {
            let qualified = match receiver {
                Some(r) => format!("{r}.{method}"),
                None => method.clone(),
            };
            (qualified, method.clone())
        }
        NodeKind::New { class, .. } => {
            let qualified = class.clone().unwrap_or_default();
            let short = last_segment(&qualified).to_string();
            (qualified, short)
        }
        _ => (String::new(), String::new()),
    }
}

fn last_segment(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name).trim()
}

/// Nearest of `if`/`while`/`try`/function boundary above `id`. Only an
/// `if`/`while` produces a context.
fn guard_context(tree: &SyntaxTree, function: NodeId, id: NodeId) -> Option<GuardContext> {
    for ancestor in tree.ancestors(id) {
        match tree.kind(ancestor) {
            NodeKind::If { condition, .. } => {
                return Some(classify_condition(tree, function, GuardKind::If, *condition));
            }
            NodeKind::While { condition } => {
                return Some(classify_condition(tree, function, GuardKind::While, *condition));
            }
            NodeKind::Try => return None,
            kind if kind.is_function_boundary() => return None,
            _ => {}
        }
    }
    None
}

fn classify_condition(
    tree: &SyntaxTree,
    function: NodeId,
    kind: GuardKind,
    condition: Option<NodeId>,
) -> GuardContext {
    let mut ctx = GuardContext {
        kind,
        condition_is_call: false,
        condition_api: None,
        negated: false,
        comparison: None,
    };
    let Some(mut test) = condition.map(|c| unwrap_parens(tree, c)) else {
        return ctx;
    };

    if let NodeKind::Not { operand } = tree.kind(test) {
        let Some(operand) = operand else {
            return ctx;
        };
        ctx.negated = true;
        test = unwrap_parens(tree, *operand);
    }

    match tree.kind(test) {
        NodeKind::MethodCall { method, .. } => {
            ctx.condition_is_call = true;
            ctx.condition_api = Some(method.clone());
        }
        NodeKind::Comparison { op, left, right } if !ctx.negated => {
            let api = left.and_then(|l| compared_api(tree, function, l, test));
            let value = right.map(|r| tree.text(r).trim().to_string());
            if let (Some(api), Some(value)) = (api, value) {
                ctx.comparison = Some(GuardComparison {
                    api,
                    op: op.clone(),
                    value,
                });
            }
        }
        _ => {}
    }
    ctx
}

/// The API whose result the left side of a comparison tests: a direct call,
/// or a local most recently initialised from a call before the guard.
fn compared_api(tree: &SyntaxTree, function: NodeId, left: NodeId, guard: NodeId) -> Option<String> {
    let left = unwrap_parens(tree, left);
    match tree.kind(left) {
        NodeKind::MethodCall { method, .. } => Some(method.clone()),
        NodeKind::Name(name) => local_origin(tree, function, name, tree.span(guard).start),
        // `(ch = reader.read()) != -1`
        NodeKind::Assignment { value: Some(v), .. } => match tree.kind(unwrap_parens(tree, *v)) {
            NodeKind::MethodCall { method, .. } => Some(method.clone()),
            _ => None,
        },
        _ => None,
    }
}

/// Method name of the call last assigned to `name` before byte `before`.
/// `None` if the latest assignment is not a call.
pub(crate) fn local_origin(
    tree: &SyntaxTree,
    function: NodeId,
    name: &str,
    before: usize,
) -> Option<String> {
    let mut origin = None;
    for id in tree.descendants(function) {
        if tree.span(id).start >= before {
            break;
        }
        let value = match tree.kind(id) {
            NodeKind::LocalVariable { name: n, value } if n == name => value,
            NodeKind::Assignment { target, value } if target == name => value,
            _ => continue,
        };
        origin = value.and_then(|v| match tree.kind(unwrap_parens(tree, v)) {
            NodeKind::MethodCall { method, .. } => Some(method.clone()),
            _ => None,
        });
    }
    origin
}

pub(crate) fn unwrap_parens(tree: &SyntaxTree, mut id: NodeId) -> NodeId {
    while matches!(tree.kind(id), NodeKind::Parenthesized) {
        match tree.children(id).first() {
            Some(&inner) => id = inner,
            None => break,
        }
    }
    id
}

/// True if a `try` block encloses `id` before the function boundary. Code in
/// a `catch` or `finally` clause is not protected by that clause's `try`.
fn in_try(tree: &SyntaxTree, id: NodeId) -> bool {
    let mut in_handler = false;
    for ancestor in tree.ancestors(id) {
        match tree.kind(ancestor) {
            NodeKind::Handler => in_handler = true,
            NodeKind::Try if in_handler => in_handler = false,
            NodeKind::Try => return true,
            kind if kind.is_function_boundary() => return false,
            _ => {}
        }
    }
    false
}

#[cfg(test)]
#[path = "extract_tests.rs"]
mod tests;
