use crate::human_helpers::{format_event_human, format_violation_human};
use crate::OutputFormatter;
use apiguard_enforce::rules::CheckKind;
use apiguard_enforce::types::{CheckResult, FactsResult, RulesResult};

pub struct HumanFormatter;

impl OutputFormatter for HumanFormatter {
    fn format_check(&self, result: &CheckResult) -> String {
        let mut out = String::new();

        for s in &result.skipped {
            out.push_str(&format!("skipped {}: {}\n", s.file, s.reason));
        }

        if result.violations.is_empty() {
            return out; // Clean check = empty stdout
        }

        for v in &result.violations {
            out.push_str(&format_violation_human(v));
        }

        let warnings = result
            .violations
            .iter()
            .filter(|v| v.severity == "WARNING")
            .count();
        let info = result.violations.len() - warnings;
        out.push_str(&format!(
            "\n{} warning(s), {} info in {} file(s)\n",
            warnings,
            info,
            result.files_analyzed.len(),
        ));

        out
    }

    fn format_facts(&self, result: &FactsResult) -> String {
        let mut out = format!("{}\n", result.file);

        for f in &result.functions {
            out.push_str(&format!(
                "  fn {} (line {}): {} call(s)\n",
                f.name,
                f.line,
                f.events.len()
            ));
            for e in &f.events {
                out.push_str(&format_event_human(e));
            }
            for c in &f.chains {
                out.push_str(&format!("    chain: {}\n", c.report_line()));
            }
        }

        if !result.unowned.is_empty() {
            let lines: Vec<String> = result.unowned.iter().map(|a| a.line.to_string()).collect();
            out.push_str(&format!(
                "  unowned calls (lambda/initializer) at line(s): {}\n",
                lines.join(", ")
            ));
        }

        out
    }

    fn format_rules(&self, result: &RulesResult) -> String {
        let mut out = String::new();

        for r in &result.rules {
            out.push_str(&format!("{}  {}\n", r.check.code(), r.label()));
            out.push_str(&format!("      {}\n", r.message()));
            if !r.exclusions.is_empty() {
                out.push_str(&format!("      except: {}\n", r.exclusions.join(", ")));
            }
        }

        let guards = result
            .rules
            .iter()
            .filter(|r| matches!(r.check, CheckKind::Guard { .. }))
            .count();
        out.push_str(&format!(
            "\n{} rule(s), {} state check(s)\n",
            result.rules.len(),
            guards
        ));
        out
    }
}
