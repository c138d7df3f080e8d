// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core type definitions for templint
//!
//! Covers both template dialects the analyzer understands: Blade
//! (directive-embedding, `.blade.php`) and Antlers (tag-bracket,
//! `.antlers.html`). Every report type is serde-serializable so reports
//! can be exported as JSON or YAML.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Template dialects the analyzer recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    Blade,
    Antlers,
    Unknown,
}

impl Dialect {
    /// Recognized template file suffixes, longest match first.
    pub fn recognized_suffixes() -> &'static [(&'static str, Dialect)] {
        &[
            (".antlers.html", Dialect::Antlers),
            (".antlers.php", Dialect::Antlers),
            (".blade.php", Dialect::Blade),
        ]
    }

    pub fn from_path(path: &str) -> Option<Self> {
        Self::recognized_suffixes()
            .iter()
            .find(|(suffix, _)| path.ends_with(suffix))
            .map(|(_, dialect)| *dialect)
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::Blade => write!(f, "blade"),
            Dialect::Antlers => write!(f, "antlers"),
            Dialect::Unknown => write!(f, "unknown"),
        }
    }
}

/// Caller-supplied dialect hint; `Auto` defers to classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectHint {
    #[default]
    Auto,
    Blade,
    Antlers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
    Critical,
}

impl Severity {
    /// Error and critical findings block the lint gate.
    pub fn is_blocking(&self) -> bool {
        *self >= Severity::Error
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "INFO"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Error => write!(f, "ERROR"),
            Severity::Critical => write!(f, "CRITICAL"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Policy,
    Performance,
    Security,
    Accessibility,
    Maintainability,
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::Policy => write!(f, "policy"),
            Category::Performance => write!(f, "performance"),
            Category::Security => write!(f, "security"),
            Category::Accessibility => write!(f, "accessibility"),
            Category::Maintainability => write!(f, "maintainability"),
        }
    }
}

/// A single reported issue, tied to a stable rule code and a 1-based
/// source location. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    pub rule_code: String,
    pub category: Category,
    pub severity: Severity,
    pub line: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evidence: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Set by batch analysis; absent for inline-text lints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Finding {
    pub fn new(
        rule_code: &str,
        category: Category,
        severity: Severity,
        line: usize,
        message: impl Into<String>,
    ) -> Self {
        Self {
            rule_code: rule_code.to_string(),
            category,
            severity,
            line,
            column: None,
            message: message.into(),
            evidence: None,
            suggestion: None,
            file: None,
        }
    }

    pub fn at_column(mut self, column: usize) -> Self {
        self.column = Some(column);
        self
    }

    pub fn with_evidence(mut self, evidence: impl Into<String>) -> Self {
        self.evidence = Some(evidence.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// One collected template file. Not persisted after analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateSource {
    pub path: PathBuf,
    pub dialect: Dialect,
    pub text: String,
    pub size_bytes: u64,
    pub line_count: usize,
    /// Seconds since the epoch; 0 for inline text.
    pub mtime_unix: i64,
}

impl TemplateSource {
    /// Wraps inline template text that did not come from a file.
    pub fn inline(text: &str, dialect: Dialect) -> Self {
        Self {
            path: PathBuf::from("<inline>"),
            dialect,
            text: text.to_string(),
            size_bytes: text.len() as u64,
            line_count: text.lines().count().max(1),
            mtime_unix: 0,
        }
    }
}

/// Structural counts and the derived complexity score for one template.
/// A pure function of the template text.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ComplexityMetrics {
    pub line_count: usize,
    pub tag_count: usize,
    pub conditional_count: usize,
    pub loop_count: usize,
    pub include_count: usize,
    pub score: f64,
    pub factors: Vec<String>,
}

/// Weights behind the complexity score and render-time estimate.
///
/// These are uncalibrated heuristics: the render-time figure is an
/// order-of-magnitude guess, not a measurement. Override per call if a
/// project has better numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsWeights {
    pub line_divisor: f64,
    pub line_score_cap: f64,
    pub tag_weight: f64,
    pub conditional_weight: f64,
    pub loop_weight: f64,
    pub base_render_ms: f64,
    pub loop_render_ms: f64,
    pub conditional_render_ms: f64,
    pub tag_render_ms: f64,
    pub critical_penalty_ms: f64,
    pub warning_penalty_ms: f64,
}

impl Default for MetricsWeights {
    fn default() -> Self {
        Self {
            line_divisor: 10.0,
            line_score_cap: 20.0,
            tag_weight: 0.5,
            conditional_weight: 2.0,
            loop_weight: 3.0,
            base_render_ms: 10.0,
            loop_render_ms: 5.0,
            conditional_render_ms: 1.0,
            tag_render_ms: 0.1,
            critical_penalty_ms: 50.0,
            warning_penalty_ms: 20.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Low,
    Medium,
    High,
}

impl Impact {
    pub fn weight(&self) -> u32 {
        match self {
            Impact::Low => 1,
            Impact::Medium => 2,
            Impact::High => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Low,
    Medium,
    High,
}

impl Effort {
    /// Inverted: cheap fixes rank first.
    pub fn weight(&self) -> u32 {
        match self {
            Effort::Low => 3,
            Effort::Medium => 2,
            Effort::High => 1,
        }
    }
}

/// A ranked, deduplicated recommendation derived from one or more findings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Content hash of (pattern text, template path).
    pub id: String,
    pub title: String,
    pub category: Category,
    pub impact: Impact,
    pub effort: Effort,
    pub template_path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub before_snippet: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub after_snippet: Option<String>,
    /// Alternatives offered when no mechanical fix exists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<String>,
    pub estimated_time_saved_ms: f64,
    /// Identical findings collapse into one suggestion with a count.
    pub occurrences: usize,
}

impl Suggestion {
    /// Cheap-and-high-impact ranks first: impact 3/2/1 times effort 3/2/1.
    pub fn rank(&self) -> u32 {
        self.impact.weight() * self.effort.weight()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LintStats {
    pub lines_analyzed: usize,
    pub violation_count: usize,
    pub warning_count: usize,
}

/// Per-template performance section attached to a lint outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplatePerformance {
    pub metrics: ComplexityMetrics,
    pub render_time_estimate_ms: f64,
    pub findings: Vec<Finding>,
}

/// The lint contract: `ok` is true exactly when no error-severity finding
/// exists. Downstream tooling gates on `ok`; edge cases and performance
/// findings live outside the violations list and never affect it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintOutcome {
    pub ok: bool,
    pub violations: Vec<Finding>,
    pub warnings: Vec<Finding>,
    pub stats: LintStats,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestions: Option<Vec<Suggestion>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub performance: Option<TemplatePerformance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_cases: Option<Vec<Finding>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Excellent,
    Good,
    NeedsImprovement,
    Poor,
}

impl ReportStatus {
    pub fn from_score(score: f64) -> Self {
        if score >= 80.0 {
            ReportStatus::Excellent
        } else if score >= 60.0 {
            ReportStatus::Good
        } else if score >= 40.0 {
            ReportStatus::NeedsImprovement
        } else {
            ReportStatus::Poor
        }
    }
}

impl std::fmt::Display for ReportStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReportStatus::Excellent => write!(f, "excellent"),
            ReportStatus::Good => write!(f, "good"),
            ReportStatus::NeedsImprovement => write!(f, "needs_improvement"),
            ReportStatus::Poor => write!(f, "poor"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportStatistics {
    pub total_issues: usize,
    pub critical_issues: usize,
    pub performance_score: f64,
    pub estimated_render_time_ms: f64,
    pub status: ReportStatus,
}

/// Per-template metrics entry inside an aggregate report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateMetricsEntry {
    pub dialect: Dialect,
    pub metrics: ComplexityMetrics,
    pub render_time_estimate_ms: f64,
}

/// Root aggregate produced by `analyze_performance`. Built fresh per
/// invocation; the engine holds no state between calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub templates_analyzed: usize,
    pub findings: Vec<Finding>,
    pub metrics_by_template: BTreeMap<String, TemplateMetricsEntry>,
    pub suggestions: Vec<Suggestion>,
    pub edge_cases: Vec<Finding>,
    pub statistics: ReportStatistics,
}

/// Roadmap buckets for `suggest_optimizations`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Roadmap {
    pub immediate: Vec<String>,
    pub short_term: Vec<String>,
    pub long_term: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationPlan {
    pub suggestions: Vec<Suggestion>,
    pub categories: BTreeMap<String, usize>,
    pub roadmap: Roadmap,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizationFocus {
    Performance,
    Maintainability,
    Security,
    #[default]
    All,
}

impl OptimizationFocus {
    /// Parsed up front so an unsupported value fails before any analysis.
    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_lowercase().as_str() {
            "performance" => Some(OptimizationFocus::Performance),
            "maintainability" => Some(OptimizationFocus::Maintainability),
            "security" => Some(OptimizationFocus::Security),
            "all" => Some(OptimizationFocus::All),
            _ => None,
        }
    }

    pub fn admits(&self, category: Category) -> bool {
        match self {
            OptimizationFocus::All => true,
            OptimizationFocus::Performance => category == Category::Performance,
            OptimizationFocus::Security => category == Category::Security,
            OptimizationFocus::Maintainability => {
                matches!(category, Category::Maintainability | Category::Accessibility)
            }
        }
    }
}

/// Externally supplied policy: what templates may not do. Immutable,
/// injected at engine construction, never read from any ambient source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    /// Deny-list of privileged service/data accessor call patterns.
    pub forbidden_accessors: Vec<String>,
    /// When false, inline code execution (`@php`, `<?php`) is a violation.
    pub allow_inline_code: bool,
    /// Prefer declarative tags over facade calls in suggestions.
    pub prefer_declarative_tags: bool,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            forbidden_accessors: vec![
                "Entry::".to_string(),
                "Collection::".to_string(),
                "Taxonomy::".to_string(),
                "GlobalSet::".to_string(),
                "User::".to_string(),
                "Statamic::".to_string(),
            ],
            allow_inline_code: false,
            prefer_declarative_tags: true,
        }
    }
}

/// Tunables for the performance rule set. Defaults are heuristic, not
/// calibrated; override per project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfConfig {
    /// Field names that look like relationships when referenced in a loop.
    pub relationship_fields: Vec<String>,
    /// Markers that count as an eager-load hint in a loop's opening tag.
    pub eager_hints: Vec<String>,
    /// Loops capped above this many items should paginate.
    pub pagination_threshold: usize,
    /// Caps above this raise a memory-exhaustion edge case.
    pub memory_cap_threshold: usize,
}

impl Default for PerfConfig {
    fn default() -> Self {
        Self {
            relationship_fields: vec![
                "author".to_string(),
                "entries".to_string(),
                "related".to_string(),
                "taxonomy".to_string(),
                "terms".to_string(),
                "user".to_string(),
            ],
            eager_hints: vec![
                "with=".to_string(),
                "with(".to_string(),
                "eager".to_string(),
                "load:".to_string(),
            ],
            pagination_threshold: 50,
            memory_cap_threshold: 1000,
        }
    }
}

/// Per-call toggles for `lint`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LintOptions {
    pub strict_mode: bool,
    pub auto_fix: bool,
    pub performance_analysis: bool,
    pub dialect: DialectHint,
}

impl Default for LintOptions {
    fn default() -> Self {
        Self {
            strict_mode: false,
            auto_fix: true,
            performance_analysis: true,
            dialect: DialectHint::Auto,
        }
    }
}

/// Per-call toggles for `analyze_performance`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerfOptions {
    pub template_type: DialectHint,
    pub include_partials: bool,
    pub check_n_plus_one: bool,
    pub analyze_loops: bool,
    pub suggest_caching: bool,
    pub complexity_threshold: f64,
}

impl Default for PerfOptions {
    fn default() -> Self {
        Self {
            template_type: DialectHint::Auto,
            include_partials: true,
            check_n_plus_one: true,
            analyze_loops: true,
            suggest_caching: true,
            complexity_threshold: 50.0,
        }
    }
}

/// Per-call toggles for `suggest_optimizations`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuggestOptions {
    pub template_type: DialectHint,
    pub focus: OptimizationFocus,
    pub include_code_examples: bool,
    pub prioritize_suggestions: bool,
    pub max_suggestions: usize,
}

impl Default for SuggestOptions {
    fn default() -> Self {
        Self {
            template_type: DialectHint::Auto,
            focus: OptimizationFocus::All,
            include_code_examples: true,
            prioritize_suggestions: true,
            max_suggestions: 20,
        }
    }
}
