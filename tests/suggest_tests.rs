// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unit tests for suggestion generation, ranking, and auto-fixes

use templint::suggest::{self, autofix};
use templint::types::{Category, Effort, Finding, Impact, Severity};

fn finding(rule_code: &str, evidence: &str) -> Finding {
    Finding::new(rule_code, Category::Performance, Severity::Warning, 1, "test")
        .with_evidence(evidence)
}

#[test]
fn cheap_high_impact_work_ranks_nine_and_slow_low_impact_one() {
    let suggestions = suggest::from_findings(
        &[finding("n_plus_one", "{{ collection:blog }}")],
        &[],
        "home.antlers.html",
        true,
        true,
    );

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].impact, Impact::High);
    assert_eq!(suggestions[0].effort, Effort::Low);
    assert_eq!(suggestions[0].rank(), 9);

    let low = suggest::from_findings(
        &[finding("hardcoded_text", "Lorem ipsum")],
        &[],
        "home.antlers.html",
        true,
        true,
    );
    assert_eq!(low[0].rank(), 2);
}

#[test]
fn rank_spans_the_full_one_to_nine_range() {
    use templint::types::Suggestion;

    let floor = Suggestion {
        id: "0000000000000000".to_string(),
        title: "Restructure the section layout".to_string(),
        category: Category::Maintainability,
        impact: Impact::Low,
        effort: Effort::High,
        template_path: "home.antlers.html".to_string(),
        before_snippet: None,
        after_snippet: None,
        alternatives: Vec::new(),
        estimated_time_saved_ms: 0.0,
        occurrences: 1,
    };
    assert_eq!(floor.rank(), 1);

    let ceiling = Suggestion {
        impact: Impact::High,
        effort: Effort::Low,
        ..floor.clone()
    };
    assert_eq!(ceiling.rank(), 9);
    assert!(ceiling.rank() > floor.rank());
}

#[test]
fn identical_findings_collapse_with_an_occurrence_count() {
    let findings = vec![
        finding("n_plus_one", "{{ collection:blog }}"),
        finding("n_plus_one", "{{ collection:blog }}"),
        finding("n_plus_one", "{{ collection:events }}"),
    ];
    let suggestions = suggest::from_findings(&findings, &[], "home.antlers.html", true, true);

    assert_eq!(suggestions.len(), 2);
    assert_eq!(suggestions[0].occurrences, 2);
    assert_eq!(suggestions[1].occurrences, 1);
    assert_ne!(suggestions[0].id, suggestions[1].id);
}

#[test]
fn same_pattern_in_another_template_gets_its_own_id() {
    let a = suggest::from_findings(
        &[finding("n_plus_one", "{{ collection:blog }}")],
        &[],
        "a.antlers.html",
        true,
        true,
    );
    let b = suggest::from_findings(
        &[finding("n_plus_one", "{{ collection:blog }}")],
        &[],
        "b.antlers.html",
        true,
        true,
    );
    assert_ne!(a[0].id, b[0].id);
}

#[test]
fn pairing_defects_produce_no_suggestion() {
    let suggestions = suggest::from_findings(
        &[finding("unclosed_directive", "@foreach")],
        &[],
        "home.blade.php",
        true,
        true,
    );
    assert!(suggestions.is_empty());
}

#[test]
fn ranking_happens_before_truncation() {
    let findings = vec![
        finding("hardcoded_text", "Lorem ipsum"), // rank 2
        finding("nested_loops", "{{ loop }}"),    // rank 4
        finding("n_plus_one", "{{ collection:blog }}"), // rank 9
    ];
    let all = suggest::from_findings(&findings, &[], "home.antlers.html", true, true);

    let top = suggest::rank_and_truncate(all.clone(), 1, true);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].rank(), 9);

    // Without prioritization, discovery order survives.
    let unranked = suggest::rank_and_truncate(all, 1, false);
    assert_eq!(unranked[0].rank(), 2);
}

#[test]
fn roadmap_buckets_by_rank_band() {
    let findings = vec![
        finding("n_plus_one", "{{ collection:blog }}"), // 9 -> immediate
        finding("nested_loops", "{{ loop }}"),          // 4 -> short term
        finding("hardcoded_text", "Lorem ipsum"),       // 2 -> long term
    ];
    let suggestions = suggest::from_findings(&findings, &[], "home.antlers.html", true, true);
    let roadmap = suggest::roadmap(&suggestions);

    assert_eq!(roadmap.immediate.len(), 1);
    assert_eq!(roadmap.short_term.len(), 1);
    assert_eq!(roadmap.long_term.len(), 1);
    assert!(roadmap.immediate[0].contains("eager-load"));
}

#[test]
fn categories_count_suggestions_per_concern() {
    let findings = vec![
        finding("n_plus_one", "{{ collection:blog }}"),
        finding("nested_loops", "{{ loop }}"),
        finding("raw_output", "{!!"),
    ];
    let suggestions = suggest::from_findings(&findings, &[], "home.blade.php", true, true);
    let counts = suggest::categories(&suggestions);

    assert_eq!(counts.get("performance"), Some(&2));
    assert_eq!(counts.get("security"), Some(&1));
}

#[test]
fn accessor_fix_swaps_the_facade_for_its_tag() {
    assert_eq!(
        autofix::fix_privileged_accessor("Entry::all()"),
        Some("{{ collection }}".to_string())
    );
    assert_eq!(
        autofix::fix_privileged_accessor("Taxonomy::find('tags')"),
        Some("{{ taxonomy }}".to_string())
    );
    assert_eq!(autofix::fix_privileged_accessor("Custom::thing()"), None);
}

#[test]
fn alt_fix_inserts_an_empty_attribute() {
    assert_eq!(
        autofix::fix_missing_alt("<img src=\"x.png\">"),
        Some("<img src=\"x.png\" alt=\"\">".to_string())
    );
    assert_eq!(
        autofix::fix_missing_alt("<img src=\"x.png\" />"),
        Some("<img src=\"x.png\" alt=\"\" />".to_string())
    );
    assert_eq!(autofix::fix_missing_alt("<img src=\"x.png\" alt=\"ok\">"), None);
}

#[test]
fn fixable_findings_carry_before_and_after_snippets() {
    let findings = vec![Finding::new(
        "missing_alt",
        Category::Accessibility,
        Severity::Warning,
        1,
        "image tag has no alt text",
    )
    .with_evidence("<img src=\"x.png\">")];

    let fixed = suggest::from_findings(&findings, &[], "home.antlers.html", true, true);
    assert_eq!(fixed[0].before_snippet.as_deref(), Some("<img src=\"x.png\">"));
    assert_eq!(
        fixed[0].after_snippet.as_deref(),
        Some("<img src=\"x.png\" alt=\"\">")
    );

    let unfixed = suggest::from_findings(&findings, &[], "home.antlers.html", false, true);
    assert!(unfixed[0].before_snippet.is_none());
    assert!(unfixed[0].after_snippet.is_none());
}

#[test]
fn unfixable_findings_fall_back_to_alternatives() {
    let findings = vec![finding("n_plus_one", "{{ collection:blog }}")];

    let with_examples = suggest::from_findings(&findings, &[], "home.antlers.html", true, true);
    assert!(with_examples[0].after_snippet.is_none());
    assert!(!with_examples[0].alternatives.is_empty());

    let without = suggest::from_findings(&findings, &[], "home.antlers.html", true, false);
    assert!(without[0].alternatives.is_empty());
}
