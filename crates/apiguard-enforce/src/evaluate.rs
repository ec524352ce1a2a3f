//! Constraint evaluation over one function's call events.
//!
//! Source-line order stands in for execution order: a call on an earlier
//! line "happens before" one on a later line. Branches and loops are not
//! followed, so the result is only exact for straight-line code.

use apiguard_core::types::{CallEvent, GuardContext};

use crate::rules::{CheckKind, Rule, RuleCatalog};
use crate::sink::DiagnosticSink;

/// Check every event against the rules naming its short name and report
/// each violation, anchored at the offending call, to `sink`.
pub fn evaluate(events: &[CallEvent], catalog: &RuleCatalog, sink: &mut DiagnosticSink) {
    for (index, event) in events.iter().enumerate() {
        for rule in catalog.candidates(&event.short_name) {
            if rule.excludes(&event.qualified_name) {
                continue;
            }
            if let Some(false) = check(rule, index, event, events) {
                sink.report(event.anchor, rule.check.code(), &rule.label(), &rule.message());
            }
        }
    }
}

/// `Some(compliant)` when `rule` applies to `event` in its role, `None`
/// when the event only matched the rule's other end.
fn check(rule: &Rule, index: usize, event: &CallEvent, events: &[CallEvent]) -> Option<bool> {
    let is_start = rule.start == event.short_name;
    let is_end = rule.end.as_deref() == Some(event.short_name.as_str());

    match &rule.check {
        CheckKind::Precede => {
            if !is_end {
                return None;
            }
            Some(others(events, index).any(|s| s.short_name == rule.start && s.line <= event.line))
        }
        CheckKind::Follow => {
            if !is_start {
                return None;
            }
            let end = rule.end.as_deref()?;
            Some(others(events, index).any(|f| f.short_name == end && f.line >= event.line))
        }
        CheckKind::Guard {
            op,
            condition_api,
            required_state,
        } => {
            if !is_start {
                return None;
            }
            Some(guard_holds(
                event.guard.as_ref(),
                op,
                condition_api,
                required_state,
            ))
        }
        CheckKind::RequireTry => {
            if !is_start {
                return None;
            }
            Some(event.in_try)
        }
    }
}

fn others(events: &[CallEvent], index: usize) -> impl Iterator<Item = &CallEvent> {
    events
        .iter()
        .enumerate()
        .filter(move |(i, _)| *i != index)
        .map(|(_, e)| e)
}

/// A missing or unrecognised guard never satisfies a state check.
fn guard_holds(guard: Option<&GuardContext>, op: &str, api: &str, state: &str) -> bool {
    let Some(guard) = guard else {
        return false;
    };
    if guard.condition_is_call {
        return guard.condition_api.as_deref() == Some(api) && guard.effective_state() == Some(state);
    }
    match &guard.comparison {
        Some(c) => c.api == api && c.op == op && c.value == state,
        _ => false,
    }
}

#[cfg(test)]
#[path = "evaluate_tests.rs"]
mod tests;
