// SPDX-License-Identifier: MIT OR Apache-2.0

//! Templint — static analysis for CMS page templates.
//!
//! This crate provides the core engine for linting and profiling
//! templates written in the Blade and Antlers dialects. It is purely
//! lexical: no template is ever rendered, and no network or database is
//! touched.
//!
//! ENGINE PILLARS:
//! 1. **Rules**: Policy, security, and accessibility checks over lines
//!    and whole documents (raw output, privileged accessors, unclosed
//!    directives, missing alt text, ...).
//! 2. **Perf**: Loop-structure analysis detecting N+1 query patterns,
//!    nested loops, unpaginated collections, and caching opportunities.
//! 3. **Suggest**: Deduplicated, impact/effort-ranked optimization
//!    suggestions with textual auto-fixes where a safe rewrite exists.

pub mod collector;
pub mod dialect;
pub mod engine;
pub mod error;
pub mod metrics;
pub mod perf;
pub mod report;
pub mod rules;
pub mod suggest;
pub mod types;

pub use engine::Engine;
pub use error::AnalyzeError;
pub use types::{
    AnalysisReport, Dialect, DialectHint, Finding, LintOptions, LintOutcome, OptimizationFocus,
    OptimizationPlan, PerfOptions, Policy, Severity, SuggestOptions,
};
