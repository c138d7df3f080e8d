// SPDX-License-Identifier: MIT OR Apache-2.0

//! Structural metrics and the complexity score
//!
//! Counts structural tokens per dialect and derives a scalar complexity
//! score plus a render-time estimate. Both are order-of-magnitude
//! heuristics with uncalibrated weights (see `MetricsWeights`), not
//! measurements: loops weigh most because they multiply everything
//! inside them at render time.

use crate::types::{ComplexityMetrics, Dialect, Finding, MetricsWeights, Severity};
use regex::Regex;
use std::sync::OnceLock;

const FACTOR_TAG_COUNT: usize = 50;
const FACTOR_CONDITIONALS: usize = 10;
const FACTOR_LOOPS: usize = 5;
const FACTOR_LINES: usize = 200;
const FACTOR_INCLUDES: usize = 5;

fn blade_directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@[a-zA-Z]+|\{\{|\{!!").expect("valid regex"))
}

fn antlers_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{").expect("valid regex"))
}

fn count_any(text: &str, needles: &[&str]) -> usize {
    needles.iter().map(|n| text.matches(n).count()).sum()
}

fn tag_count(text: &str, dialect: Dialect) -> usize {
    match dialect {
        Dialect::Blade => blade_directive_re().find_iter(text).count(),
        Dialect::Antlers => antlers_tag_re().find_iter(text).count(),
        Dialect::Unknown => count_any(text, &["{{", "{%"]),
    }
}

fn conditional_count(text: &str, dialect: Dialect) -> usize {
    match dialect {
        Dialect::Blade => count_any(text, &["@if", "@unless", "@elseif", "@switch"]),
        Dialect::Antlers => count_any(text, &["{{ if ", "{{ unless ", "{{ elseif "]),
        Dialect::Unknown => 0,
    }
}

fn loop_count(text: &str, dialect: Dialect) -> usize {
    match dialect {
        Dialect::Blade => count_any(text, &["@foreach", "@forelse", "@for (", "@for(", "@while"]),
        Dialect::Antlers => count_any(
            text,
            &["{{ collection", "{{ taxonomy", "{{ loop", "{{ foreach", "{{ nav"],
        ),
        Dialect::Unknown => 0,
    }
}

fn include_count(text: &str, dialect: Dialect) -> usize {
    match dialect {
        Dialect::Blade => count_any(text, &["@include", "@each"]),
        Dialect::Antlers => text.matches("{{ partial").count(),
        Dialect::Unknown => 0,
    }
}

/// Collects structural counts and derives the complexity score. A pure
/// function of the template text: identical input, identical output.
pub fn collect(text: &str, dialect: Dialect, weights: &MetricsWeights) -> ComplexityMetrics {
    let line_count = text.lines().count();
    let tag_count = tag_count(text, dialect);
    let conditional_count = conditional_count(text, dialect);
    let loop_count = loop_count(text, dialect);
    let include_count = include_count(text, dialect);

    let score = (line_count as f64 / weights.line_divisor).min(weights.line_score_cap)
        + tag_count as f64 * weights.tag_weight
        + conditional_count as f64 * weights.conditional_weight
        + loop_count as f64 * weights.loop_weight;

    let mut factors = Vec::new();
    if tag_count > FACTOR_TAG_COUNT {
        factors.push(format!("high tag density ({tag_count} tags)"));
    }
    if conditional_count > FACTOR_CONDITIONALS {
        factors.push(format!("many conditionals ({conditional_count})"));
    }
    if loop_count > FACTOR_LOOPS {
        factors.push(format!("many loops ({loop_count})"));
    }
    if line_count > FACTOR_LINES {
        factors.push(format!("long template ({line_count} lines)"));
    }
    if include_count > FACTOR_INCLUDES {
        factors.push(format!("many includes ({include_count})"));
    }

    ComplexityMetrics {
        line_count,
        tag_count,
        conditional_count,
        loop_count,
        include_count,
        score,
        factors,
    }
}

/// Render-time estimate in milliseconds: a base cost, per-construct
/// costs, and a penalty per finding severity. Order-of-magnitude only.
pub fn render_time_estimate(
    metrics: &ComplexityMetrics,
    findings: &[Finding],
    weights: &MetricsWeights,
) -> f64 {
    let severity_penalty: f64 = findings
        .iter()
        .map(|f| match f.severity {
            Severity::Critical => weights.critical_penalty_ms,
            Severity::Warning => weights.warning_penalty_ms,
            _ => 0.0,
        })
        .sum();

    weights.base_render_ms
        + metrics.loop_count as f64 * weights.loop_render_ms
        + metrics.conditional_count as f64 * weights.conditional_render_ms
        + metrics.tag_count as f64 * weights.tag_render_ms
        + severity_penalty
}
