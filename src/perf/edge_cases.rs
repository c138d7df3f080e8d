// SPDX-License-Identifier: MIT OR Apache-2.0

//! Edge-case detectors: rare, high-severity conditions
//!
//! Always advisory: results land in a separate edge-case list and never
//! flip the lint gate. The raw-output probe deliberately duplicates the
//! line rule of the same name because this set is also invocable on its
//! own, without the rule engine.

use crate::perf::loops;
use crate::types::{Category, Dialect, Finding, PerfConfig, Severity, TemplateSource};

pub fn detect(source: &TemplateSource, config: &PerfConfig) -> Vec<Finding> {
    let mut findings = Vec::new();
    detect_recursive_include(source, &mut findings);
    detect_memory_risk(source, config, &mut findings);
    detect_unbounded_iteration(source, &mut findings);
    detect_raw_output(source, &mut findings);
    findings.sort_by_key(|f| f.line);
    findings
}

/// Template stem used for self-reference checks: `cards.antlers.html`
/// and `cards.blade.php` both reduce to `cards`.
fn template_stem(source: &TemplateSource) -> Option<String> {
    let name = source.path.file_name()?.to_str()?;
    Some(name.split('.').next().unwrap_or(name).to_string())
}

/// A partial referencing its own name at the reference site. Transitive
/// cycles through other partials are not resolved.
fn detect_recursive_include(source: &TemplateSource, out: &mut Vec<Finding>) {
    let Some(stem) = template_stem(source) else {
        return;
    };
    if stem.is_empty() || stem == "<inline>" {
        return;
    }

    for (idx, line) in source.text.lines().enumerate() {
        let hit = match source.dialect {
            Dialect::Antlers => {
                line.contains(&format!("partial:{stem}"))
                    || line.contains(&format!("partial src=\"{stem}\""))
            }
            Dialect::Blade => {
                line.contains("@include") && line.contains(&format!("'{stem}'"))
                    || line.contains("@include") && line.contains(&format!("\"{stem}\""))
            }
            Dialect::Unknown => false,
        };
        if hit {
            out.push(
                Finding::new(
                    "recursive_include",
                    Category::Performance,
                    Severity::Critical,
                    idx + 1,
                    format!("template includes itself (`{stem}`); rendering may never terminate"),
                )
                .with_evidence(line.trim().to_string()),
            );
        }
    }
}

fn detect_memory_risk(source: &TemplateSource, config: &PerfConfig, out: &mut Vec<Finding>) {
    for span in loops::extract(&source.text, source.dialect) {
        let Some(cap) = span.item_cap else { continue };
        if cap > config.memory_cap_threshold {
            out.push(
                Finding::new(
                    "memory_risk",
                    Category::Performance,
                    Severity::Critical,
                    span.open_line,
                    format!(
                        "loop materializes up to {cap} items (threshold {})",
                        config.memory_cap_threshold
                    ),
                )
                .with_evidence(span.open_tag),
            );
        }
    }
}

const UNBOUNDED_MARKERS: &[&str] = &["@while(true)", "@while (true)", "@for(;;)", "@for (;;)"];

fn detect_unbounded_iteration(source: &TemplateSource, out: &mut Vec<Finding>) {
    for (idx, line) in source.text.lines().enumerate() {
        if UNBOUNDED_MARKERS.iter().any(|m| line.contains(m)) {
            out.push(
                Finding::new(
                    "infinite_loop_risk",
                    Category::Performance,
                    Severity::Critical,
                    idx + 1,
                    "unbounded iteration construct; rendering may never terminate".to_string(),
                )
                .with_evidence(line.trim().to_string()),
            );
        }
    }
}

fn detect_raw_output(source: &TemplateSource, out: &mut Vec<Finding>) {
    let marker = match source.dialect {
        Dialect::Blade => "{!!",
        Dialect::Antlers => "{{{",
        Dialect::Unknown => return,
    };
    for (idx, line) in source.text.lines().enumerate() {
        if line.contains(marker) {
            out.push(
                Finding::new(
                    "xss_risk",
                    Category::Security,
                    Severity::Error,
                    idx + 1,
                    "unescaped output reaches the page without sanitization".to_string(),
                )
                .with_evidence(line.trim().to_string()),
            );
        }
    }
}
