// SPDX-License-Identifier: MIT OR Apache-2.0

//! Performance and edge-case rule set
//!
//! Layered on the rule engine and the metrics collector: loop spans are
//! extracted once and shared across the N+1, nesting, and pagination
//! detectors. Caching opportunities come back separately because they
//! turn into suggestions rather than findings.

pub mod caching;
pub mod edge_cases;
pub mod loops;
pub mod nplusone;

pub use caching::{CacheKind, CacheOpportunity};
pub use loops::LoopSpan;

use crate::types::{Finding, PerfConfig, PerfOptions, TemplateSource};

/// Output of one template's performance pass.
#[derive(Debug, Default)]
pub struct PerfAnalysis {
    pub findings: Vec<Finding>,
    pub cache_opportunities: Vec<CacheOpportunity>,
}

pub fn analyze(
    source: &TemplateSource,
    config: &PerfConfig,
    options: &PerfOptions,
) -> PerfAnalysis {
    let spans = loops::extract(&source.text, source.dialect);
    let mut findings = Vec::new();

    if options.check_n_plus_one {
        findings.extend(nplusone::detect(&source.text, &spans, config));
    }
    if options.analyze_loops {
        findings.extend(loops::detect_nested(&spans));
        findings.extend(loops::detect_unpaginated(
            &source.text,
            &spans,
            config.pagination_threshold,
        ));
    }
    findings.sort_by_key(|f| (f.line, f.rule_code.clone()));

    let cache_opportunities = if options.suggest_caching {
        caching::detect(&source.text, source.dialect)
    } else {
        Vec::new()
    };

    PerfAnalysis {
        findings,
        cache_opportunities,
    }
}
