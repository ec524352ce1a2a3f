use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use apiguard_core::ast::SyntaxTree;
use apiguard_core::config::{ApiguardConfig, ChainConfig};
use apiguard_core::hash::finding_hash;
use apiguard_parsers::{JavaParser, ParseError};
use rayon::prelude::*;

use crate::chain::detect_chains;
use crate::evaluate::evaluate;
use crate::extract::extract;
use crate::rules::RuleCatalog;
use crate::sink::{Diagnostic, DiagnosticSink};
use crate::suppress::SuppressionManager;
use crate::types::{
    ChainReport, CheckInfo, CheckResult, FactsResult, FileReport, FunctionFacts, SkippedFile,
    Violation, CHAIN_CODE,
};

/// Runs extraction, evaluation and chain detection over parsed files.
///
/// The catalog is shared read-only, so one engine can check many files in
/// parallel; every per-function structure lives inside a single visit.
pub struct AnalysisEngine {
    catalog: Option<Arc<RuleCatalog>>,
    chain: ChainConfig,
    suppressions: SuppressionManager,
}

impl AnalysisEngine {
    /// `catalog` is `None` when the rule catalog failed to load: constraint
    /// evaluation is then skipped and only chain detection runs.
    pub fn new(catalog: Option<Arc<RuleCatalog>>, config: &ApiguardConfig) -> Self {
        Self {
            catalog,
            chain: config.chain.clone(),
            suppressions: SuppressionManager::new(),
        }
    }

    pub fn catalog(&self) -> Option<&RuleCatalog> {
        self.catalog.as_deref()
    }

    /// Suppress a specific finding code.
    pub fn suppress(&mut self, code: &str) {
        self.suppressions.suppress(code);
    }

    /// Check every function of one parsed file. One sink per call, so
    /// duplicates are merged across the whole file.
    pub fn check_tree(&self, path: &str, tree: &SyntaxTree) -> FileReport {
        let started = Instant::now();
        let mut sink = DiagnosticSink::new();
        let mut chains = Vec::new();
        let mut unowned = Vec::new();
        let mut call_events = 0u32;
        let functions = tree.functions();

        for &function in &functions {
            let extraction = extract(tree, function);
            call_events += extraction.events.len() as u32;
            unowned.extend(extraction.unowned);

            if let Some(catalog) = &self.catalog {
                evaluate(&extraction.events, catalog, &mut sink);
            }

            if self.chain.enabled {
                for record in detect_chains(tree, function, &self.chain.excluded_calls) {
                    let message = format!("API call involves {}", record.inner_text);
                    if sink.report(record.outer_anchor, CHAIN_CODE, "api-chain", &message) {
                        chains.push(record);
                    }
                }
            }
        }

        let violations = sink
            .into_diagnostics()
            .into_iter()
            .map(|d| self.suppressions.apply(to_violation(path, d)))
            .collect();

        tracing::debug!(
            file = path,
            functions = functions.len(),
            events = call_events,
            elapsed_us = started.elapsed().as_micros() as u64,
            "checked file"
        );

        FileReport {
            file: path.to_string(),
            functions: functions.len() as u32,
            call_events,
            unowned,
            violations,
            chains,
        }
    }

    pub fn check_source(&self, path: &str, source: &str) -> Result<FileReport, ParseError> {
        let tree = JavaParser::new().parse(source)?;
        Ok(self.check_tree(path, &tree))
    }

    /// Check a set of files in parallel. Unreadable files are listed in
    /// `skipped` and do not stop the run.
    pub fn check_files(&self, files: &[PathBuf]) -> CheckResult {
        let outcomes: Vec<Result<FileReport, SkippedFile>> = files
            .par_iter()
            .map(|path| self.check_path(path))
            .collect();

        let mut reports = Vec::new();
        let mut skipped = Vec::new();
        for outcome in outcomes {
            match outcome {
                Ok(report) => reports.push(report),
                Err(skip) => skipped.push(skip),
            }
        }
        self.merge(reports, skipped)
    }

    fn check_path(&self, path: &Path) -> Result<FileReport, SkippedFile> {
        let file_display = path.display().to_string();
        let tree = JavaParser::new().parse_file(path).map_err(|e| {
            tracing::warn!(file = %file_display, error = %e, "skipping file");
            SkippedFile {
                file: file_display.clone(),
                reason: e.to_string(),
            }
        })?;
        Ok(self.check_tree(&file_display, &tree))
    }

    /// Fold per-file reports into one result, ordered by file then line.
    pub fn merge(&self, reports: Vec<FileReport>, skipped: Vec<SkippedFile>) -> CheckResult {
        let mut info = CheckInfo {
            rules_loaded: self.catalog.as_ref().map(|c| c.len() as u32),
            ..CheckInfo::default()
        };
        let mut files_analyzed = Vec::new();
        let mut violations = Vec::new();
        let mut chains = Vec::new();

        for report in reports {
            info.functions_analyzed += report.functions;
            info.call_events += report.call_events;
            info.unowned_calls += report.unowned.len() as u32;
            files_analyzed.push(report.file.clone());
            violations.extend(report.violations);
            if !report.chains.is_empty() {
                chains.push(ChainReport {
                    file: report.file,
                    records: report.chains,
                });
            }
        }
        files_analyzed.sort();
        violations.sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
        chains.sort_by(|a, b| a.file.cmp(&b.file));

        let status = if violations.iter().any(|v| !v.suppressed) {
            "warning"
        } else {
            "ok"
        };

        CheckResult {
            version: env!("CARGO_PKG_VERSION").to_string(),
            command: "check".to_string(),
            status: status.to_string(),
            files_analyzed,
            violations,
            chains,
            skipped,
            info,
        }
    }

    /// Per-function call events and chains, without rule evaluation.
    pub fn facts(&self, path: &str, tree: &SyntaxTree) -> FactsResult {
        let mut functions = Vec::new();
        let mut unowned = Vec::new();
        for function in tree.functions() {
            let extraction = extract(tree, function);
            unowned.extend(extraction.unowned);
            let chains = if self.chain.enabled {
                detect_chains(tree, function, &self.chain.excluded_calls)
            } else {
                Vec::new()
            };
            functions.push(FunctionFacts {
                name: tree.function_name(function).unwrap_or_default().to_string(),
                line: tree.line(function),
                events: extraction.events,
                chains,
            });
        }
        FactsResult {
            version: env!("CARGO_PKG_VERSION").to_string(),
            command: "facts".to_string(),
            file: path.to_string(),
            functions,
            unowned,
        }
    }
}

fn to_violation(path: &str, diagnostic: Diagnostic) -> Violation {
    let (severity, category) = match diagnostic.code.as_str() {
        "A001" | "A002" => ("WARNING", "call_order"),
        "A003" => ("WARNING", "state_guard"),
        "A004" => ("WARNING", "exception_handling"),
        _ => ("INFO", "api_chain"),
    };
    Violation {
        hash: finding_hash(
            path,
            &diagnostic.anchor,
            &diagnostic.code,
            &diagnostic.message,
        ),
        code: diagnostic.code,
        severity: severity.to_string(),
        category: category.to_string(),
        message: diagnostic.message,
        file: path.to_string(),
        line: diagnostic.anchor.line,
        rule: diagnostic.rule,
        suppressed: false,
        suppress_hint: None,
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
