// SPDX-License-Identifier: MIT OR Apache-2.0

//! The analysis engine: lint, performance analysis, and optimization
//! suggestions
//!
//! One `Engine` owns the immutable configuration (policy, performance
//! tunables, metric weights) and nothing else. Findings are threaded
//! through each pass and into the result; no accumulator lives on the
//! engine, so a single instance can be reused or rebuilt freely and two
//! runs over the same text are byte-identical.

use crate::collector;
use crate::dialect;
use crate::error::AnalyzeError;
use crate::metrics;
use crate::perf;
use crate::report::{Assembler, TemplateResult};
use crate::rules;
use crate::suggest;
use crate::types::{
    AnalysisReport, Category, Dialect, DialectHint, Finding, LintOptions, LintOutcome,
    MetricsWeights, OptimizationPlan, PerfConfig, PerfOptions, Policy, Severity, SuggestOptions,
    TemplatePerformance, TemplateSource,
};
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct Engine {
    policy: Policy,
    perf_config: PerfConfig,
    weights: MetricsWeights,
}

impl Engine {
    pub fn new(policy: Policy) -> Self {
        Self {
            policy,
            perf_config: PerfConfig::default(),
            weights: MetricsWeights::default(),
        }
    }

    pub fn with_perf_config(mut self, config: PerfConfig) -> Self {
        self.perf_config = config;
        self
    }

    pub fn with_weights(mut self, weights: MetricsWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Lints one template text. `ok` reflects the rule-engine findings
    /// only; performance findings and edge cases ride along in their own
    /// sections and never affect the gate.
    pub fn lint(&self, template: &str, options: &LintOptions) -> LintOutcome {
        let source = TemplateSource::inline(
            template,
            dialect::classify("<inline>", template, options.dialect),
        );

        let findings = rules::run(template, source.dialect, options.strict_mode, &self.policy);
        let (violations, warnings) = rules::partition(findings);
        let stats = rules::stats_for(template, &violations, &warnings);

        let (performance, edge_cases, cache_opportunities) = if options.performance_analysis {
            let perf_options = PerfOptions {
                template_type: options.dialect,
                ..PerfOptions::default()
            };
            let analysis = perf::analyze(&source, &self.perf_config, &perf_options);
            let template_metrics = metrics::collect(template, source.dialect, &self.weights);

            let mut penalized: Vec<Finding> = Vec::new();
            penalized.extend(violations.iter().cloned());
            penalized.extend(warnings.iter().cloned());
            penalized.extend(analysis.findings.iter().cloned());
            let estimate =
                metrics::render_time_estimate(&template_metrics, &penalized, &self.weights);

            let edge = perf::edge_cases::detect(&source, &self.perf_config);
            (
                Some(TemplatePerformance {
                    metrics: template_metrics,
                    render_time_estimate_ms: estimate,
                    findings: analysis.findings,
                }),
                Some(edge),
                analysis.cache_opportunities,
            )
        } else {
            (None, None, Vec::new())
        };

        let mut suggestible: Vec<Finding> = Vec::new();
        suggestible.extend(violations.iter().cloned());
        suggestible.extend(warnings.iter().cloned());
        if let Some(perf_section) = &performance {
            suggestible.extend(perf_section.findings.iter().cloned());
        }
        let suggestions = suggest::from_findings(
            &suggestible,
            &cache_opportunities,
            "<inline>",
            options.auto_fix,
            true,
        );

        LintOutcome {
            ok: violations.is_empty(),
            violations,
            warnings,
            stats,
            suggestions: Some(suggestions),
            performance,
            edge_cases,
        }
    }

    /// Analyzes one path (file or directory) or inline text for
    /// performance. Per-file failures degrade to skip-and-continue; only
    /// a missing path aborts.
    pub fn analyze_performance(
        &self,
        path_or_text: &str,
        options: &PerfOptions,
    ) -> Result<AnalysisReport, AnalyzeError> {
        let sources = self.resolve(path_or_text, options.template_type)?;
        let mut assembler = Assembler::new();

        for source in &sources {
            if !options.include_partials && is_partial(&source.path) {
                continue;
            }
            assembler.push(self.analyze_one(source, options));
        }

        Ok(assembler.finish())
    }

    fn analyze_one(&self, source: &TemplateSource, options: &PerfOptions) -> TemplateResult {
        let template_metrics = metrics::collect(&source.text, source.dialect, &self.weights);
        let analysis = perf::analyze(source, &self.perf_config, options);

        let mut findings = analysis.findings;
        if template_metrics.score > options.complexity_threshold {
            findings.push(
                Finding::new(
                    "high_complexity",
                    Category::Performance,
                    Severity::Warning,
                    1,
                    format!(
                        "complexity score {:.1} exceeds threshold {:.1}",
                        template_metrics.score, options.complexity_threshold
                    ),
                )
                .with_suggestion("split the template or reduce loop/conditional density"),
            );
        }

        let estimate = metrics::render_time_estimate(&template_metrics, &findings, &self.weights);
        let edge_cases = perf::edge_cases::detect(source, &self.perf_config);

        let path = source.path.to_string_lossy().to_string();
        let suggestions = suggest::from_findings(
            &findings,
            &analysis.cache_opportunities,
            &path,
            true,
            true,
        );

        TemplateResult {
            path,
            dialect: source.dialect,
            metrics: template_metrics,
            render_time_estimate_ms: estimate,
            findings,
            edge_cases,
            suggestions,
        }
    }

    /// Builds a ranked optimization plan across one or more templates.
    /// An unsupported focus never reaches this far: `OptimizationFocus`
    /// is typed, and string boundaries parse it up front.
    pub fn suggest_optimizations(
        &self,
        path_or_text: &str,
        options: &SuggestOptions,
    ) -> Result<OptimizationPlan, AnalyzeError> {
        let sources = self.resolve(path_or_text, options.template_type)?;
        let mut all: Vec<crate::types::Suggestion> = Vec::new();

        for source in &sources {
            let lint_findings =
                rules::run(&source.text, source.dialect, false, &self.policy);
            let perf_options = PerfOptions {
                template_type: options.template_type,
                ..PerfOptions::default()
            };
            let analysis = perf::analyze(source, &self.perf_config, &perf_options);
            let edge = perf::edge_cases::detect(source, &self.perf_config);

            let mut findings = lint_findings;
            findings.extend(analysis.findings);
            findings.extend(edge);

            let path = source.path.to_string_lossy().to_string();
            all.extend(suggest::from_findings(
                &findings,
                &analysis.cache_opportunities,
                &path,
                options.include_code_examples,
                options.include_code_examples,
            ));
        }

        all.retain(|s| options.focus.admits(s.category));
        let suggestions = suggest::rank_and_truncate(
            all,
            options.max_suggestions,
            options.prioritize_suggestions,
        );

        Ok(OptimizationPlan {
            categories: suggest::categories(&suggestions),
            roadmap: suggest::roadmap(&suggestions),
            suggestions,
        })
    }

    /// A string that resolves to an existing path is collected from
    /// disk. A string that merely looks like a template path (single
    /// line, recognized suffix) but does not exist is `NotFound`.
    /// Everything else is analyzed as inline template text.
    fn resolve(
        &self,
        path_or_text: &str,
        hint: DialectHint,
    ) -> Result<Vec<TemplateSource>, AnalyzeError> {
        let path = Path::new(path_or_text);
        if path.exists() {
            return collector::collect(path, hint);
        }
        if !path_or_text.contains('\n') && Dialect::from_path(path_or_text).is_some() {
            return Err(AnalyzeError::NotFound(path.to_path_buf()));
        }

        let classified = dialect::classify("<inline>", path_or_text, hint);
        Ok(vec![TemplateSource::inline(path_or_text, classified)])
    }
}

/// Partial naming convention: `_sidebar.antlers.html`.
fn is_partial(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|name| name.starts_with('_'))
}
