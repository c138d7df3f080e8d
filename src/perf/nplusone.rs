// SPDX-License-Identifier: MIT OR Apache-2.0

//! N+1 data-access detection
//!
//! A loop whose body references a relationship-like field while the
//! opening construct carries no eager-load hint fires one query per
//! iteration at render time. Detection is purely lexical: substring
//! presence inside the loop's matched text range, never semantic.

use crate::perf::loops::LoopSpan;
use crate::types::{Category, Finding, PerfConfig, Severity};

pub fn detect(text: &str, spans: &[LoopSpan], config: &PerfConfig) -> Vec<Finding> {
    let mut findings = Vec::new();

    for span in spans {
        if has_eager_hint(&span.open_tag, config) {
            continue;
        }
        let body = span.body_text(text);
        let referenced: Vec<&str> = config
            .relationship_fields
            .iter()
            .map(String::as_str)
            .filter(|field| references_field(body, field))
            .collect();

        if referenced.is_empty() {
            continue;
        }

        findings.push(
            Finding::new(
                "n_plus_one",
                Category::Performance,
                Severity::Critical,
                span.open_line,
                format!(
                    "loop `{}` reads relationship field(s) {} without an eager-load hint",
                    span.name,
                    referenced.join(", ")
                ),
            )
            .with_evidence(span.open_tag.clone())
            .with_suggestion("add an eager-load hint to the loop's opening tag"),
        );
    }

    findings
}

fn has_eager_hint(open_tag: &str, config: &PerfConfig) -> bool {
    config.eager_hints.iter().any(|hint| open_tag.contains(hint.as_str()))
}

/// Substring probe with a crude word boundary so `user` does not match
/// `username`. Bounded false positives are accepted by design.
fn references_field(body: &str, field: &str) -> bool {
    let mut from = 0;
    while let Some(pos) = body[from..].find(field) {
        let at = from + pos;
        let end = at + field.len();
        let before_ok = at == 0
            || !body[..at]
                .chars()
                .next_back()
                .is_some_and(|c| c.is_alphanumeric());
        let after_ok = end >= body.len()
            || !body[end..].chars().next().is_some_and(|c| c.is_alphanumeric());
        if before_ok && after_ok {
            return true;
        }
        from = end;
    }
    false
}
