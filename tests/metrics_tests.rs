// SPDX-License-Identifier: MIT OR Apache-2.0

//! Unit tests for structural metrics and the complexity score

use templint::metrics;
use templint::types::{Dialect, MetricsWeights};

/// 1000 lines, 60 tags (12 conditionals, 6 loops, 42 plain), which pins
/// the score at the line cap plus the weighted counts.
fn busy_antlers_template() -> String {
    let mut text = String::new();
    for _ in 0..12 {
        text.push_str("{{ if logged_in }}\n");
    }
    for _ in 0..6 {
        text.push_str("{{ collection:blog }}\n");
    }
    for _ in 0..42 {
        text.push_str("{{ title }}\n");
    }
    for _ in 0..940 {
        text.push_str("<p>filler</p>\n");
    }
    text
}

#[test]
fn score_combines_capped_lines_and_weighted_counts() {
    let text = busy_antlers_template();
    let metrics = metrics::collect(&text, Dialect::Antlers, &MetricsWeights::default());

    assert_eq!(metrics.line_count, 1000);
    assert_eq!(metrics.tag_count, 60);
    assert_eq!(metrics.conditional_count, 12);
    assert_eq!(metrics.loop_count, 6);

    // min(1000/10, 20) + 60*0.5 + 12*2 + 6*3
    assert!((metrics.score - 92.0).abs() < 1e-9);
    assert!(metrics.score >= 92.0);
}

#[test]
fn factors_name_every_exceeded_threshold() {
    let text = busy_antlers_template();
    let metrics = metrics::collect(&text, Dialect::Antlers, &MetricsWeights::default());

    assert_eq!(metrics.factors.len(), 4);
    assert!(metrics.factors.iter().any(|f| f.contains("tag density")));
    assert!(metrics.factors.iter().any(|f| f.contains("conditionals")));
    assert!(metrics.factors.iter().any(|f| f.contains("loops")));
    assert!(metrics.factors.iter().any(|f| f.contains("long template")));
}

#[test]
fn trivial_template_scores_low_with_no_factors() {
    let metrics = metrics::collect("{{ title }}\n", Dialect::Antlers, &MetricsWeights::default());

    assert_eq!(metrics.tag_count, 1);
    assert_eq!(metrics.loop_count, 0);
    assert!(metrics.score < 1.0);
    assert!(metrics.factors.is_empty());
}

#[test]
fn blade_directives_count_as_tags() {
    let text = "@if($a)\n{{ $title }}\n{!! $raw !!}\n@endif\n";
    let metrics = metrics::collect(text, Dialect::Blade, &MetricsWeights::default());

    // @if, {{, {!!, @endif
    assert_eq!(metrics.tag_count, 4);
    assert_eq!(metrics.conditional_count, 1);
}

/// A fixed-shape template: `filler` plain lines, `tags` interpolation
/// lines, `conditionals` if-lines, `loops` collection-lines. Conditional
/// and loop lines are swapped in for tag lines so the tag count can be
/// held fixed while one of the other counts moves.
fn shaped_template(filler: usize, tags: usize, conditionals: usize, loops: usize) -> String {
    let mut text = String::new();
    for _ in 0..conditionals {
        text.push_str("{{ if logged_in }}\n");
    }
    for _ in 0..loops {
        text.push_str("{{ collection:blog }}\n");
    }
    for _ in 0..tags {
        text.push_str("{{ title }}\n");
    }
    for _ in 0..filler {
        text.push_str("<p>filler</p>\n");
    }
    text
}

fn score_of(text: &str) -> f64 {
    metrics::collect(text, Dialect::Antlers, &MetricsWeights::default()).score
}

#[test]
fn score_never_decreases_when_any_count_grows() {
    let weights = MetricsWeights::default();
    let base = metrics::collect(&shaped_template(10, 5, 2, 1), Dialect::Antlers, &weights);

    // One more line, every count unchanged.
    let more_lines = metrics::collect(&shaped_template(11, 5, 2, 1), Dialect::Antlers, &weights);
    assert_eq!(more_lines.tag_count, base.tag_count);
    assert_eq!(more_lines.line_count, base.line_count + 1);
    assert!(more_lines.score >= base.score);

    // One filler line becomes a tag line: lines fixed, tags up by one.
    let more_tags = metrics::collect(&shaped_template(9, 6, 2, 1), Dialect::Antlers, &weights);
    assert_eq!(more_tags.line_count, base.line_count);
    assert_eq!(more_tags.tag_count, base.tag_count + 1);
    assert!(more_tags.score >= base.score);

    // One tag line becomes a conditional: lines and tags fixed.
    let more_conds = metrics::collect(&shaped_template(10, 4, 3, 1), Dialect::Antlers, &weights);
    assert_eq!(more_conds.line_count, base.line_count);
    assert_eq!(more_conds.tag_count, base.tag_count);
    assert_eq!(more_conds.conditional_count, base.conditional_count + 1);
    assert!(more_conds.score >= base.score);

    // One tag line becomes a loop: lines and tags fixed.
    let more_loops = metrics::collect(&shaped_template(10, 4, 2, 2), Dialect::Antlers, &weights);
    assert_eq!(more_loops.line_count, base.line_count);
    assert_eq!(more_loops.tag_count, base.tag_count);
    assert_eq!(more_loops.loop_count, base.loop_count + 1);
    assert!(more_loops.score >= base.score);
}

#[test]
fn line_growth_past_the_cap_never_lowers_the_score() {
    // Past line_score_cap the line term saturates; growth stays non-negative.
    let capped = score_of(&shaped_template(300, 5, 2, 1));
    let beyond = score_of(&shaped_template(400, 5, 2, 1));
    assert!(beyond >= capped);
}

#[test]
fn collect_is_a_pure_function() {
    let text = busy_antlers_template();
    let weights = MetricsWeights::default();
    assert_eq!(
        metrics::collect(&text, Dialect::Antlers, &weights),
        metrics::collect(&text, Dialect::Antlers, &weights)
    );
}

#[test]
fn render_estimate_sums_per_construct_costs() {
    let text = busy_antlers_template();
    let weights = MetricsWeights::default();
    let metrics = metrics::collect(&text, Dialect::Antlers, &weights);

    // 10 + 6*5 + 12*1 + 60*0.1, no findings
    let estimate = metrics::render_time_estimate(&metrics, &[], &weights);
    assert!((estimate - 58.0).abs() < 1e-9);
}

#[test]
fn findings_add_severity_penalties_to_the_estimate() {
    use templint::types::{Category, Finding, Severity};

    let weights = MetricsWeights::default();
    let metrics = metrics::collect("{{ title }}\n", Dialect::Antlers, &weights);
    let base = metrics::render_time_estimate(&metrics, &[], &weights);

    let findings = vec![
        Finding::new("n_plus_one", Category::Performance, Severity::Critical, 1, "x"),
        Finding::new("nested_loops", Category::Performance, Severity::Warning, 1, "y"),
    ];
    let penalized = metrics::render_time_estimate(&metrics, &findings, &weights);

    assert!((penalized - base - 70.0).abs() < 1e-9);
}
