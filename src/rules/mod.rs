// SPDX-License-Identifier: MIT OR Apache-2.0

//! The rule engine: two passes over one template
//!
//! Pass one offers every line to every registered single-line rule; pass
//! two runs the whole-document rules that need cross-line context.
//! Findings accumulate into a caller-owned vector, so the engine itself
//! carries no per-call state and a fresh run is always a clean run.

pub mod document;
pub mod line;

use crate::types::{Dialect, Finding, LintStats, Policy};

pub use line::MatchSpan;

/// Runs both passes and returns every finding, ordered by line then
/// column. Deterministic for identical input.
pub fn run(text: &str, dialect: Dialect, strict: bool, policy: &Policy) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (idx, raw_line) in text.lines().enumerate() {
        line::run_line_rules(raw_line, idx + 1, dialect, strict, policy, &mut findings);
    }

    document::run_document_rules(text, dialect, &mut findings);

    findings.sort_by_key(|f| (f.line, f.column.unwrap_or(0)));
    findings
}

/// Splits findings into the lint contract shape: `violations` holds every
/// blocking (error or critical) finding, `warnings` everything else.
pub fn partition(findings: Vec<Finding>) -> (Vec<Finding>, Vec<Finding>) {
    findings
        .into_iter()
        .partition(|f| f.severity.is_blocking())
}

pub fn stats_for(text: &str, violations: &[Finding], warnings: &[Finding]) -> LintStats {
    LintStats {
        lines_analyzed: text.lines().count(),
        violation_count: violations.len(),
        warning_count: warnings.len(),
    }
}
