// SPDX-License-Identifier: MIT OR Apache-2.0

//! Suggestion generation
//!
//! Maps findings and caching opportunities to ranked, deduplicated
//! recommendations through a fixed rule-code table. Identical findings
//! collapse by content hash into one suggestion with an occurrence
//! count. Ranking is impact times inverted effort, so cheap-and-high-
//! impact work sorts first; truncation happens only after ranking.

pub mod autofix;

use crate::perf::{CacheKind, CacheOpportunity};
use crate::types::{Category, Effort, Finding, Impact, Roadmap, Suggestion};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;

struct SuggestionSpec {
    title: &'static str,
    category: Category,
    impact: Impact,
    effort: Effort,
    saved_ms: f64,
}

/// The fixed rule-code table. A code missing here produces no
/// suggestion; pairing bugs, for instance, are defects to fix, not
/// optimizations to rank.
fn spec_for(rule_code: &str) -> Option<SuggestionSpec> {
    let spec = match rule_code {
        "n_plus_one" => SuggestionSpec {
            title: "Add an eager-load hint to the loop",
            category: Category::Performance,
            impact: Impact::High,
            effort: Effort::Low,
            saved_ms: 120.0,
        },
        "unpaginated_loop" => SuggestionSpec {
            title: "Paginate the large result set",
            category: Category::Performance,
            impact: Impact::High,
            effort: Effort::Low,
            saved_ms: 80.0,
        },
        "memory_risk" => SuggestionSpec {
            title: "Cap and paginate the oversized loop",
            category: Category::Performance,
            impact: Impact::High,
            effort: Effort::Low,
            saved_ms: 150.0,
        },
        "nested_loops" => SuggestionSpec {
            title: "Flatten the nested iteration",
            category: Category::Performance,
            impact: Impact::Medium,
            effort: Effort::Medium,
            saved_ms: 60.0,
        },
        "recursive_include" => SuggestionSpec {
            title: "Break the self-referencing include",
            category: Category::Performance,
            impact: Impact::High,
            effort: Effort::Medium,
            saved_ms: 200.0,
        },
        "infinite_loop_risk" => SuggestionSpec {
            title: "Bound the iteration construct",
            category: Category::Performance,
            impact: Impact::High,
            effort: Effort::Medium,
            saved_ms: 200.0,
        },
        "raw_output" | "xss_risk" => SuggestionSpec {
            title: "Escape or sanitize the raw output",
            category: Category::Security,
            impact: Impact::High,
            effort: Effort::Low,
            saved_ms: 0.0,
        },
        "privileged_accessor" => SuggestionSpec {
            title: "Replace the facade call with a declarative tag",
            category: Category::Policy,
            impact: Impact::Medium,
            effort: Effort::Low,
            saved_ms: 30.0,
        },
        "db_in_view" => SuggestionSpec {
            title: "Move data access out of the view",
            category: Category::Policy,
            impact: Impact::High,
            effort: Effort::Medium,
            saved_ms: 50.0,
        },
        "inline_code" => SuggestionSpec {
            title: "Move inline code to a composer or tag",
            category: Category::Policy,
            impact: Impact::Medium,
            effort: Effort::Medium,
            saved_ms: 20.0,
        },
        "missing_alt" => SuggestionSpec {
            title: "Add alt text to the image",
            category: Category::Accessibility,
            impact: Impact::Low,
            effort: Effort::Low,
            saved_ms: 0.0,
        },
        "vague_link_text" => SuggestionSpec {
            title: "Describe the link destination in its text",
            category: Category::Accessibility,
            impact: Impact::Low,
            effort: Effort::Low,
            saved_ms: 0.0,
        },
        "missing_form_label" => SuggestionSpec {
            title: "Associate a label with the form control",
            category: Category::Accessibility,
            impact: Impact::Low,
            effort: Effort::Low,
            saved_ms: 0.0,
        },
        "template_too_long" => SuggestionSpec {
            title: "Extract sections into reusable fragments",
            category: Category::Maintainability,
            impact: Impact::Medium,
            effort: Effort::Medium,
            saved_ms: 0.0,
        },
        "inline_style_block" | "inline_script_block" => SuggestionSpec {
            title: "Move the embedded block to a compiled asset",
            category: Category::Maintainability,
            impact: Impact::Medium,
            effort: Effort::Low,
            saved_ms: 10.0,
        },
        "hardcoded_url" => SuggestionSpec {
            title: "Route the URL through a helper",
            category: Category::Maintainability,
            impact: Impact::Low,
            effort: Effort::Low,
            saved_ms: 0.0,
        },
        "hardcoded_text" => SuggestionSpec {
            title: "Move the copy into the content store",
            category: Category::Maintainability,
            impact: Impact::Low,
            effort: Effort::Medium,
            saved_ms: 0.0,
        },
        "long_expression" => SuggestionSpec {
            title: "Extract the oversized expression",
            category: Category::Maintainability,
            impact: Impact::Low,
            effort: Effort::Medium,
            saved_ms: 0.0,
        },
        _ => return None,
    };
    Some(spec)
}

fn cache_spec(kind: CacheKind) -> SuggestionSpec {
    match kind {
        CacheKind::StaticWrapper => SuggestionSpec {
            title: "Cache the static wrapper partial",
            category: Category::Performance,
            impact: Impact::Medium,
            effort: Effort::Low,
            saved_ms: 40.0,
        },
        CacheKind::RepeatedQuery => SuggestionSpec {
            title: "Cache or hoist the repeated query",
            category: Category::Performance,
            impact: Impact::High,
            effort: Effort::Low,
            saved_ms: 100.0,
        },
        CacheKind::AssetProcessing => SuggestionSpec {
            title: "Pre-generate the processed image variant",
            category: Category::Performance,
            impact: Impact::Medium,
            effort: Effort::Low,
            saved_ms: 70.0,
        },
    }
}

/// Content hash of (pattern text, template path). Identical findings in
/// the same template share an id and collapse.
fn suggestion_id(pattern: &str, template_path: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(pattern.as_bytes());
    hasher.update(b"\0");
    hasher.update(template_path.as_bytes());
    hex::encode(&hasher.finalize()[..8])
}

fn dedup_key(suggestion: &Suggestion) -> String {
    suggestion.id.clone()
}

/// Builds zero-or-one suggestion per finding plus one per caching
/// opportunity, collapsing duplicates. Insertion order is preserved so
/// later ranking can stay stable on ties.
pub fn from_findings(
    findings: &[Finding],
    cache_opportunities: &[CacheOpportunity],
    template_path: &str,
    auto_fix: bool,
    include_examples: bool,
) -> Vec<Suggestion> {
    let mut out: Vec<Suggestion> = Vec::new();
    let mut index: BTreeMap<String, usize> = BTreeMap::new();

    for finding in findings {
        let Some(spec) = spec_for(&finding.rule_code) else {
            continue;
        };
        let pattern = finding
            .evidence
            .clone()
            .unwrap_or_else(|| finding.rule_code.clone());
        let id = suggestion_id(&pattern, template_path);

        if let Some(&at) = index.get(&id) {
            out[at].occurrences += 1;
            continue;
        }

        let (before, after) = if auto_fix {
            match autofix::fix_for(&finding.rule_code, &pattern) {
                Some(replacement) => (Some(pattern.clone()), Some(replacement)),
                None => (None, None),
            }
        } else {
            (None, None)
        };

        let alternatives = if after.is_none() && include_examples {
            autofix::alternatives_for(&finding.rule_code)
        } else {
            Vec::new()
        };

        let suggestion = Suggestion {
            id,
            title: spec.title.to_string(),
            category: spec.category,
            impact: spec.impact,
            effort: spec.effort,
            template_path: template_path.to_string(),
            before_snippet: before,
            after_snippet: after,
            alternatives,
            estimated_time_saved_ms: spec.saved_ms,
            occurrences: 1,
        };
        index.insert(dedup_key(&suggestion), out.len());
        out.push(suggestion);
    }

    for op in cache_opportunities {
        let spec = cache_spec(op.kind);
        let id = suggestion_id(&op.snippet, template_path);
        if let Some(&at) = index.get(&id) {
            out[at].occurrences += 1;
            continue;
        }
        let suggestion = Suggestion {
            id,
            title: spec.title.to_string(),
            category: spec.category,
            impact: spec.impact,
            effort: spec.effort,
            template_path: template_path.to_string(),
            before_snippet: Some(op.snippet.clone()),
            after_snippet: None,
            alternatives: Vec::new(),
            estimated_time_saved_ms: spec.saved_ms,
            occurrences: 1,
        };
        index.insert(dedup_key(&suggestion), out.len());
        out.push(suggestion);
    }

    out
}

/// Ranks by impact×effort weight descending, stable on insertion order
/// for ties, then truncates. Truncation never happens before ranking.
pub fn rank_and_truncate(
    mut suggestions: Vec<Suggestion>,
    max: usize,
    prioritize: bool,
) -> Vec<Suggestion> {
    if prioritize {
        suggestions.sort_by_key(|s| std::cmp::Reverse(s.rank()));
    }
    suggestions.truncate(max);
    suggestions
}

/// Counts suggestions per category name.
pub fn categories(suggestions: &[Suggestion]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for s in suggestions {
        *counts.entry(s.category.to_string()).or_insert(0) += 1;
    }
    counts
}

/// Buckets suggestion titles by rank: quick wins first, big refactors
/// last.
pub fn roadmap(suggestions: &[Suggestion]) -> Roadmap {
    let mut plan = Roadmap::default();
    for s in suggestions {
        let title = s.title.clone();
        match s.rank() {
            6.. => plan.immediate.push(title),
            3..=5 => plan.short_term.push(title),
            _ => plan.long_term.push(title),
        }
    }
    plan
}
