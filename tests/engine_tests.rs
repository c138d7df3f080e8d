// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for collection, batch analysis, and optimization
//! plans

use std::fs;
use templint::collector;
use templint::types::{
    Dialect, DialectHint, OptimizationFocus, PerfOptions, Policy, ReportStatus, SuggestOptions,
};
use templint::{AnalyzeError, Engine};
use tempfile::TempDir;

fn create_test_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn directory_walk_keeps_templates_and_skips_build_dirs() {
    let dir = TempDir::new().unwrap();
    create_test_file(&dir, "home.antlers.html", "{{ title }}");
    create_test_file(&dir, "post.blade.php", "@if($a)\n@endif");
    create_test_file(&dir, "readme.txt", "not a template");
    create_test_file(&dir, "node_modules/dep.antlers.html", "{{ skipped }}");
    create_test_file(&dir, "vendor/pkg.blade.php", "@skipped");

    let sources = collector::collect(dir.path(), DialectHint::Auto).unwrap();
    assert_eq!(sources.len(), 2);
    assert_eq!(sources[0].dialect, Dialect::Antlers);
    assert_eq!(sources[1].dialect, Dialect::Blade);
}

#[test]
fn missing_path_is_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");

    let err = collector::collect(&missing, DialectHint::Auto).unwrap_err();
    assert!(matches!(err, AnalyzeError::NotFound(_)));
    assert!(err.is_fatal());
}

#[test]
fn empty_directory_is_an_empty_success() {
    let dir = TempDir::new().unwrap();
    create_test_file(&dir, "notes.md", "no templates here");

    let sources = collector::collect(dir.path(), DialectHint::Auto).unwrap();
    assert!(sources.is_empty());
}

#[test]
fn windows_1252_content_decodes_via_the_fallback() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("caf.antlers.html");
    fs::write(&path, b"caf\xe9 {{ title }}").unwrap();

    let sources = collector::collect(&path, DialectHint::Auto).unwrap();
    assert_eq!(sources.len(), 1);
    assert!(sources[0].text.contains("café"));
}

#[test]
fn batch_analysis_covers_every_collected_template() {
    let dir = TempDir::new().unwrap();
    create_test_file(&dir, "home.antlers.html", "{{ title }}\n");
    create_test_file(
        &dir,
        "posts.antlers.html",
        "{{ collection:blog }}\n  {{ author }}\n{{ /collection:blog }}\n",
    );

    let engine = Engine::new(Policy::default());
    let report = engine
        .analyze_performance(dir.path().to_str().unwrap(), &PerfOptions::default())
        .unwrap();

    assert_eq!(report.templates_analyzed, 2);
    assert_eq!(report.metrics_by_template.len(), 2);
    assert!(report.findings.iter().any(|f| f.rule_code == "n_plus_one"));
    // Batch findings carry their source file.
    assert!(report
        .findings
        .iter()
        .all(|f| f.file.as_deref().is_some_and(|p| p.contains("antlers"))));
}

#[test]
fn partials_can_be_excluded_from_a_batch() {
    let dir = TempDir::new().unwrap();
    create_test_file(&dir, "home.antlers.html", "{{ title }}\n");
    create_test_file(&dir, "_sidebar.antlers.html", "{{ nav }}{{ /nav }}\n");

    let engine = Engine::new(Policy::default());
    let target = dir.path().to_str().unwrap().to_string();

    let with = engine
        .analyze_performance(&target, &PerfOptions::default())
        .unwrap();
    assert_eq!(with.templates_analyzed, 2);

    let without = engine
        .analyze_performance(
            &target,
            &PerfOptions {
                include_partials: false,
                ..PerfOptions::default()
            },
        )
        .unwrap();
    assert_eq!(without.templates_analyzed, 1);
}

#[test]
fn path_shaped_target_that_does_not_exist_is_not_found() {
    let engine = Engine::new(Policy::default());
    let err = engine
        .analyze_performance("missing/home.antlers.html", &PerfOptions::default())
        .unwrap_err();
    assert!(matches!(err, AnalyzeError::NotFound(_)));
}

#[test]
fn inline_text_is_analyzed_without_touching_disk() {
    let text = "\
{{ collection:blog }}
  {{ collection:events }}
    {{ title }}
  {{ /collection:events }}
{{ /collection:blog }}
";
    let engine = Engine::new(Policy::default());
    let report = engine.analyze_performance(text, &PerfOptions::default()).unwrap();

    assert_eq!(report.templates_analyzed, 1);
    assert!(report.findings.iter().any(|f| f.rule_code == "nested_loops"));
}

#[test]
fn performance_score_decreases_with_severity() {
    let engine = Engine::new(Policy::default());

    let clean = engine
        .analyze_performance("{{ title }}", &PerfOptions::default())
        .unwrap();
    assert!((clean.statistics.performance_score - 100.0).abs() < 1e-9);
    assert_eq!(clean.statistics.status, ReportStatus::Excellent);

    let noisy = engine
        .analyze_performance(
            "{{ collection:blog }}\n  {{ author }}\n{{ /collection:blog }}",
            &PerfOptions::default(),
        )
        .unwrap();
    assert!(noisy.statistics.performance_score < clean.statistics.performance_score);
    assert!(noisy.statistics.critical_issues >= 1);
}

#[test]
fn complexity_threshold_flags_dense_templates() {
    let mut text = String::new();
    for _ in 0..30 {
        text.push_str("{{ collection:blog }}{{ /collection:blog }}\n");
    }
    let engine = Engine::new(Policy::default());
    let report = engine
        .analyze_performance(
            &text,
            &PerfOptions {
                complexity_threshold: 50.0,
                ..PerfOptions::default()
            },
        )
        .unwrap();

    assert!(report.findings.iter().any(|f| f.rule_code == "high_complexity"));
}

#[test]
fn focus_narrows_the_optimization_plan() {
    let text = "\
{{ collection:blog }}
  {{ author }}
{{ /collection:blog }}
{{{ content }}}
";
    let engine = Engine::new(Policy::default());

    let security = engine
        .suggest_optimizations(
            text,
            &SuggestOptions {
                focus: OptimizationFocus::Security,
                ..SuggestOptions::default()
            },
        )
        .unwrap();
    assert!(!security.suggestions.is_empty());
    assert!(security.categories.keys().all(|k| k.as_str() == "security"));

    let perf_only = engine
        .suggest_optimizations(
            text,
            &SuggestOptions {
                focus: OptimizationFocus::Performance,
                ..SuggestOptions::default()
            },
        )
        .unwrap();
    assert!(perf_only
        .suggestions
        .iter()
        .all(|s| s.category == templint::types::Category::Performance));
    assert!(perf_only
        .suggestions
        .iter()
        .any(|s| s.title.contains("eager-load")));
}

#[test]
fn the_plan_is_ranked_and_truncated_after_ranking() {
    let text = "\
{{ collection:blog }}
  {{ author }}
{{ /collection:blog }}
<img src=\"a.png\">
";
    let engine = Engine::new(Policy::default());
    let plan = engine
        .suggest_optimizations(
            text,
            &SuggestOptions {
                max_suggestions: 1,
                ..SuggestOptions::default()
            },
        )
        .unwrap();

    assert_eq!(plan.suggestions.len(), 1);
    assert_eq!(plan.suggestions[0].rank(), 9);
    assert_eq!(plan.roadmap.immediate.len(), 1);
}

#[test]
fn reports_export_as_json_and_yaml() {
    use templint::report::output::ReportFormat;
    use templint::types::LintOptions;

    let engine = Engine::new(Policy::default());
    let outcome = engine.lint("{{ title }}", &LintOptions::default());

    let json = ReportFormat::Json.serialize(&outcome).unwrap();
    assert!(json.trim_start().starts_with('{'));
    assert!(json.contains("\"ok\": true"));

    let yaml = ReportFormat::Yaml.serialize(&outcome).unwrap();
    assert!(yaml.contains("ok: true"));

    assert_eq!(ReportFormat::Json.extension(), "json");
    assert_eq!(ReportFormat::Yaml.extension(), "yaml");
}

#[test]
fn unknown_focus_strings_fail_to_parse() {
    assert!(OptimizationFocus::parse("speed").is_none());
    assert_eq!(
        OptimizationFocus::parse("Security"),
        Some(OptimizationFocus::Security)
    );
}
