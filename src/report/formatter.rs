// SPDX-License-Identifier: MIT OR Apache-2.0

//! Console rendering of lint outcomes and analysis reports

use crate::types::{AnalysisReport, Finding, LintOutcome, OptimizationPlan, Severity};
use colored::*;

pub struct ReportFormatter;

impl ReportFormatter {
    pub fn new() -> Self {
        Self
    }

    pub fn print_lint(&self, outcome: &LintOutcome) {
        println!("\n{}", "=== TEMPLATE LINT REPORT ===".bold().cyan());
        println!();

        let status = if outcome.ok {
            "OK".green().bold()
        } else {
            "FAILED".red().bold()
        };
        println!(
            "  Status: {} ({} lines, {} violations, {} warnings)",
            status,
            outcome.stats.lines_analyzed,
            outcome.stats.violation_count,
            outcome.stats.warning_count
        );
        println!();

        if !outcome.violations.is_empty() {
            println!("{}", "VIOLATIONS".bold().red());
            for finding in &outcome.violations {
                Self::print_finding(finding);
            }
            println!();
        }

        if !outcome.warnings.is_empty() {
            println!("{}", "WARNINGS".bold().yellow());
            for finding in &outcome.warnings {
                Self::print_finding(finding);
            }
            println!();
        }

        if let Some(perf) = &outcome.performance {
            println!("{}", "PERFORMANCE".bold().yellow());
            println!(
                "  Complexity score: {:.1} (est. render {:.0}ms)",
                perf.metrics.score, perf.render_time_estimate_ms
            );
            for factor in &perf.metrics.factors {
                println!("    - {factor}");
            }
            for finding in &perf.findings {
                Self::print_finding(finding);
            }
            println!();
        }

        if let Some(edge_cases) = &outcome.edge_cases {
            if !edge_cases.is_empty() {
                println!("{}", "EDGE CASES (advisory)".bold().magenta());
                for finding in edge_cases {
                    Self::print_finding(finding);
                }
                println!();
            }
        }

        if let Some(suggestions) = &outcome.suggestions {
            if !suggestions.is_empty() {
                println!("{}", "SUGGESTIONS".bold().green());
                for s in suggestions {
                    println!(
                        "  [{}x{}] {} ({}x)",
                        s.impact.weight(),
                        s.effort.weight(),
                        s.title,
                        s.occurrences
                    );
                    if let (Some(before), Some(after)) = (&s.before_snippet, &s.after_snippet) {
                        println!("      - {}", before.dimmed());
                        println!("      + {}", after.green());
                    }
                }
                println!();
            }
        }
    }

    pub fn print_analysis(&self, report: &AnalysisReport) {
        println!("\n{}", "=== TEMPLATE PERFORMANCE REPORT ===".bold().cyan());
        println!();
        println!("  Templates analyzed: {}", report.templates_analyzed);

        let stats = &report.statistics;
        let score_str = format!("{:.0}", stats.performance_score);
        let score_colored = if stats.performance_score >= 80.0 {
            score_str.green()
        } else if stats.performance_score >= 40.0 {
            score_str.yellow()
        } else {
            score_str.red()
        };
        println!(
            "  Performance score: {}/100 ({})",
            score_colored, stats.status
        );
        println!(
            "  Issues: {} total, {} critical",
            stats.total_issues, stats.critical_issues
        );
        println!(
            "  Estimated render time: {:.0}ms (heuristic, not a measurement)",
            stats.estimated_render_time_ms
        );
        println!();

        if !report.findings.is_empty() {
            println!("{}", "FINDINGS".bold().yellow());
            for finding in &report.findings {
                Self::print_finding(finding);
            }
            println!();
        }

        if !report.edge_cases.is_empty() {
            println!("{}", "EDGE CASES (advisory)".bold().magenta());
            for finding in &report.edge_cases {
                Self::print_finding(finding);
            }
            println!();
        }

        if !report.suggestions.is_empty() {
            println!("{}", "SUGGESTIONS".bold().green());
            for s in &report.suggestions {
                println!(
                    "  {} [{} / impact {:?}, effort {:?}]",
                    s.title, s.category, s.impact, s.effort
                );
            }
            println!();
        }
    }

    pub fn print_plan(&self, plan: &OptimizationPlan) {
        println!("\n{}", "=== OPTIMIZATION PLAN ===".bold().cyan());
        println!();

        for s in &plan.suggestions {
            println!(
                "  [rank {}] {} ({}, saves ~{:.0}ms)",
                s.rank(),
                s.title.bold(),
                s.category,
                s.estimated_time_saved_ms
            );
            if let (Some(before), Some(after)) = (&s.before_snippet, &s.after_snippet) {
                println!("      - {}", before.dimmed());
                println!("      + {}", after.green());
            }
            for alt in &s.alternatives {
                println!("      * {alt}");
            }
        }
        println!();

        println!("{}", "ROADMAP".bold().yellow());
        Self::print_bucket("immediate", &plan.roadmap.immediate);
        Self::print_bucket("short term", &plan.roadmap.short_term);
        Self::print_bucket("long term", &plan.roadmap.long_term);
        println!();
    }

    fn print_bucket(label: &str, titles: &[String]) {
        if titles.is_empty() {
            return;
        }
        println!("  {label}:");
        for title in titles {
            println!("    - {title}");
        }
    }

    fn print_finding(finding: &Finding) {
        let severity = match finding.severity {
            Severity::Critical => finding.severity.to_string().red().bold(),
            Severity::Error => finding.severity.to_string().red(),
            Severity::Warning => finding.severity.to_string().yellow(),
            Severity::Info => finding.severity.to_string().blue(),
        };
        let location = match (&finding.file, finding.column) {
            (Some(file), Some(col)) => format!("{file}:{}:{col}", finding.line),
            (Some(file), None) => format!("{file}:{}", finding.line),
            (None, Some(col)) => format!("line {}:{col}", finding.line),
            (None, None) => format!("line {}", finding.line),
        };
        println!(
            "  [{severity}] {} {} - {}",
            finding.rule_code.bold(),
            location.dimmed(),
            finding.message
        );
        if let Some(suggestion) = &finding.suggestion {
            println!("      hint: {suggestion}");
        }
    }
}

impl Default for ReportFormatter {
    fn default() -> Self {
        Self::new()
    }
}
