// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the lint operation

use templint::types::{DialectHint, LintOptions, Policy, Severity};
use templint::Engine;

fn lint(text: &str) -> templint::LintOutcome {
    Engine::new(Policy::default()).lint(text, &LintOptions::default())
}

#[test]
fn clean_conditional_with_missing_alt_warns_but_passes() {
    let outcome = lint("@if(true)\n  <img src=\"x.png\">\n@endif");

    assert!(outcome.ok);
    assert!(outcome.violations.is_empty());
    assert_eq!(outcome.warnings.len(), 1);
    assert_eq!(outcome.warnings[0].rule_code, "missing_alt");
    assert_eq!(outcome.warnings[0].line, 2);
    assert_eq!(outcome.stats.lines_analyzed, 3);
    assert_eq!(outcome.stats.warning_count, 1);
    assert_eq!(outcome.stats.violation_count, 0);
}

#[test]
fn lint_is_deterministic() {
    let text = "@foreach($posts as $post)\n  {!! $post->body !!}\n  <img src=\"a.png\">\n@endforeach";
    let first = serde_json::to_value(lint(text)).unwrap();
    let second = serde_json::to_value(lint(text)).unwrap();
    assert_eq!(first, second);
}

#[test]
fn raw_output_is_a_blocking_violation() {
    let outcome = lint("{!! $content !!}");

    assert!(!outcome.ok);
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(outcome.violations[0].rule_code, "raw_output");
    assert_eq!(outcome.violations[0].severity, Severity::Error);
    assert!(outcome.suggestions.as_deref().is_some_and(|s| !s.is_empty()));
}

#[test]
fn unclosed_block_reported_once_at_opener() {
    let outcome = lint("@foreach($items as $item)\n<p>{{ $item }}</p>");

    assert!(!outcome.ok);
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(outcome.violations[0].rule_code, "unclosed_directive");
    assert_eq!(outcome.violations[0].line, 1);
}

#[test]
fn unmatched_closer_reported_where_it_stands() {
    let engine = Engine::new(Policy::default());
    let options = LintOptions {
        dialect: DialectHint::Blade,
        ..LintOptions::default()
    };
    let outcome = engine.lint("<div></div>\n@endif", &options);

    assert!(!outcome.ok);
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(outcome.violations[0].rule_code, "unmatched_directive");
    assert_eq!(outcome.violations[0].line, 2);
}

#[test]
fn self_closing_tag_on_the_opening_line_does_not_break_pairing() {
    let outcome = lint("{{ if logged_in }} Hello {{ avatar /}}\n{{ /if }}");

    assert!(outcome.ok, "{:?}", outcome.violations);
    assert!(outcome.violations.is_empty());
}

#[test]
fn self_closing_block_head_opens_nothing() {
    // `{{ nav /}}` has no body, so nothing is left unclosed.
    let outcome = lint("{{ nav /}}\n{{ if logged_in }}hi{{ /if }}");

    assert!(outcome.ok);
    assert!(outcome.violations.is_empty());
}

#[test]
fn privileged_accessor_and_inline_code_violate_policy() {
    let outcome = lint("@php\n$entries = Entry::all();\n@endphp");

    assert!(!outcome.ok);
    let codes: Vec<&str> = outcome
        .violations
        .iter()
        .map(|f| f.rule_code.as_str())
        .collect();
    assert!(codes.contains(&"inline_code"));
    assert!(codes.contains(&"privileged_accessor"));
}

#[test]
fn every_finding_lands_within_the_template() {
    let text = "@if($a)\n{!! $x !!}\n<img src=\"y.png\">\nDB::table('users')\n@endif";
    let outcome = lint(text);
    let lines = text.lines().count();

    for finding in outcome.violations.iter().chain(outcome.warnings.iter()) {
        assert!(finding.line >= 1 && finding.line <= lines, "{finding:?}");
    }
}

#[test]
fn hardcoded_url_only_fires_in_strict_mode() {
    let text = "<a href=\"https://example.com/pricing\">Our pricing</a>";
    let engine = Engine::new(Policy::default());

    let relaxed = engine.lint(text, &LintOptions::default());
    assert!(relaxed.ok);
    assert!(relaxed.warnings.is_empty());

    let strict = engine.lint(
        text,
        &LintOptions {
            strict_mode: true,
            ..LintOptions::default()
        },
    );
    assert!(strict.ok);
    assert_eq!(strict.warnings.len(), 1);
    assert_eq!(strict.warnings[0].rule_code, "hardcoded_url");
}

#[test]
fn edge_cases_never_flip_the_gate() {
    let outcome = lint("@foreach($items->take(2000) as $item)\n<p>{{ $item }}</p>\n@endforeach");

    assert!(outcome.ok);
    assert!(outcome.violations.is_empty());

    let edge = outcome.edge_cases.as_deref().unwrap();
    assert!(edge.iter().any(|f| f.rule_code == "memory_risk"));
    assert!(edge.iter().all(|f| f.severity == Severity::Critical || f.severity == Severity::Error));

    // The oversized cap also shows up as a performance finding, still
    // outside the violations list.
    let perf = outcome.performance.as_ref().unwrap();
    assert!(perf.findings.iter().any(|f| f.rule_code == "unpaginated_loop"));
}

#[test]
fn disabling_performance_analysis_drops_the_section() {
    let engine = Engine::new(Policy::default());
    let outcome = engine.lint(
        "{{ title }}",
        &LintOptions {
            performance_analysis: false,
            ..LintOptions::default()
        },
    );

    assert!(outcome.ok);
    assert!(outcome.performance.is_none());
    assert!(outcome.edge_cases.is_none());
}
