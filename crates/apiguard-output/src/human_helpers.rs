use apiguard_core::types::{CallEvent, GuardContext};
use apiguard_enforce::types::Violation;

pub(crate) fn format_violation_human(v: &Violation) -> String {
    let severity_label = match v.severity.as_str() {
        "ERROR" => "error",
        "WARNING" => "warning",
        "INFO" => "info",
        _ => "note",
    };

    let mut out = format!(
        "{}[{}]: {}\n  --> {}:{}\n",
        severity_label, v.code, v.message, v.file, v.line,
    );

    if !v.rule.is_empty() {
        out.push_str(&format!("   = rule: {}\n", v.rule));
    }
    if !v.hash.is_empty() {
        out.push_str(&format!("   = hash: {}\n", v.hash));
    }
    if v.suppressed {
        if let Some(hint) = &v.suppress_hint {
            out.push_str(&format!("   = {}\n", hint));
        }
    }

    out
}

/// `L12  it.next  [if hasNext()] [try]`
pub(crate) fn format_event_human(e: &CallEvent) -> String {
    let mut out = format!("    L{:<4} {}", e.line, e.qualified_name);
    if let Some(guard) = &e.guard {
        out.push_str(&format!("  [{}]", describe_guard(guard)));
    }
    if e.in_try {
        out.push_str("  [try]");
    }
    out.push('\n');
    out
}

fn describe_guard(g: &GuardContext) -> String {
    let test = match (&g.condition_api, &g.comparison) {
        (Some(api), _) if g.condition_is_call => {
            format!("{}{}()", if g.negated { "!" } else { "" }, api)
        }
        (_, Some(c)) => format!("{}() {} {}", c.api, c.op, c.value),
        _ => "?".to_string(),
    };
    format!("{} {}", g.kind, test)
}
