// SPDX-License-Identifier: MIT OR Apache-2.0

//! Report assembly
//!
//! Merges per-template analysis results into one aggregate report.
//! Statistics are additive sums accumulated during the merge, never
//! re-derived from the merged lists, so assembly stays O(n). One
//! unreadable file reduces `templates_analyzed` and nothing else.

pub mod formatter;
pub mod output;

use crate::types::{
    AnalysisReport, ComplexityMetrics, Dialect, Finding, ReportStatistics, ReportStatus,
    Severity, Suggestion, TemplateMetricsEntry,
};
use std::collections::BTreeMap;

const RENDER_BUDGET_SOFT_MS: f64 = 500.0;
const RENDER_BUDGET_HARD_MS: f64 = 1000.0;
const RENDER_BUDGET_PENALTY: f64 = 15.0;

/// One template's worth of analysis, fed to the assembler.
#[derive(Debug)]
pub struct TemplateResult {
    pub path: String,
    pub dialect: Dialect,
    pub metrics: ComplexityMetrics,
    pub render_time_estimate_ms: f64,
    pub findings: Vec<Finding>,
    pub edge_cases: Vec<Finding>,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Debug, Default)]
pub struct Assembler {
    templates_analyzed: usize,
    findings: Vec<Finding>,
    edge_cases: Vec<Finding>,
    suggestions: Vec<Suggestion>,
    metrics_by_template: BTreeMap<String, TemplateMetricsEntry>,
    total_issues: usize,
    critical_issues: usize,
    estimated_render_time_ms: f64,
}

impl Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, mut result: TemplateResult) {
        self.templates_analyzed += 1;

        self.total_issues += result.findings.len();
        self.critical_issues += result
            .findings
            .iter()
            .filter(|f| f.severity == Severity::Critical)
            .count();
        self.estimated_render_time_ms += result.render_time_estimate_ms;

        for finding in &mut result.findings {
            finding.file = Some(result.path.clone());
        }
        for finding in &mut result.edge_cases {
            finding.file = Some(result.path.clone());
        }

        self.findings.extend(result.findings);
        self.edge_cases.extend(result.edge_cases);
        self.suggestions.extend(result.suggestions);
        self.metrics_by_template.insert(
            result.path,
            TemplateMetricsEntry {
                dialect: result.dialect,
                metrics: result.metrics,
                render_time_estimate_ms: result.render_time_estimate_ms,
            },
        );
    }

    /// Skipped files only shrink `templates_analyzed` relative to the
    /// collection count; they contribute nothing else.
    pub fn finish(self) -> AnalysisReport {
        let other_issues = self.total_issues - self.critical_issues;

        let mut score = 100.0 - self.critical_issues as f64 * 20.0 - other_issues as f64 * 10.0;
        if self.estimated_render_time_ms > RENDER_BUDGET_SOFT_MS {
            score -= RENDER_BUDGET_PENALTY;
        }
        if self.estimated_render_time_ms > RENDER_BUDGET_HARD_MS {
            score -= RENDER_BUDGET_PENALTY;
        }
        let score = score.max(0.0);

        AnalysisReport {
            templates_analyzed: self.templates_analyzed,
            findings: self.findings,
            metrics_by_template: self.metrics_by_template,
            suggestions: self.suggestions,
            edge_cases: self.edge_cases,
            statistics: ReportStatistics {
                total_issues: self.total_issues,
                critical_issues: self.critical_issues,
                performance_score: score,
                estimated_render_time_ms: self.estimated_render_time_ms,
                status: ReportStatus::from_score(score),
            },
        }
    }
}
