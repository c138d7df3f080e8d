// SPDX-License-Identifier: MIT OR Apache-2.0

//! Single-line rules
//!
//! Each rule is an independent predicate `(line) -> Vec<MatchSpan>` so it
//! can be tested without running the whole engine, and so a future
//! tokenizer swap touches only this layer. `run_line_rules` maps spans to
//! findings with the rule's code, category, and severity.

use crate::types::{Category, Dialect, Finding, Policy, Severity};
use regex::Regex;
use std::sync::OnceLock;

/// A matched region on one line. Column is 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSpan {
    pub column: usize,
    pub text: String,
}

impl MatchSpan {
    fn at(offset: usize, text: &str) -> Self {
        Self {
            column: offset + 1,
            text: text.to_string(),
        }
    }
}

fn substring_spans(line: &str, needles: &[&str]) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    for needle in needles {
        let mut from = 0;
        while let Some(pos) = line[from..].find(needle) {
            spans.push(MatchSpan::at(from + pos, needle));
            from += pos + needle.len();
        }
    }
    spans.sort_by_key(|s| s.column);
    spans
}

/// Inline code execution inside a template.
pub fn find_inline_code(line: &str, dialect: Dialect) -> Vec<MatchSpan> {
    let needles: &[&str] = match dialect {
        Dialect::Blade => &["@php", "<?php", "<?="],
        Dialect::Antlers => &["{{?", "<?php", "<?="],
        Dialect::Unknown => return Vec::new(),
    };
    substring_spans(line, needles)
}

/// Calls into privileged service or data accessors (configurable deny-list).
pub fn find_privileged_accessors(line: &str, deny_list: &[String]) -> Vec<MatchSpan> {
    let mut spans = Vec::new();
    for pattern in deny_list {
        let mut from = 0;
        while let Some(pos) = line[from..].find(pattern.as_str()) {
            spans.push(MatchSpan::at(from + pos, pattern));
            from += pos + pattern.len();
        }
    }
    spans.sort_by_key(|s| s.column);
    spans
}

/// Direct data-store access from a view.
pub fn find_db_access(line: &str) -> Vec<MatchSpan> {
    substring_spans(
        line,
        &["DB::", "->query(", "::all()", "::where(", "SELECT * FROM"],
    )
}

/// Unescaped output: Blade raw echo or Antlers triple braces.
pub fn find_raw_output(line: &str, dialect: Dialect) -> Vec<MatchSpan> {
    match dialect {
        Dialect::Blade => substring_spans(line, &["{!!"]),
        Dialect::Antlers => substring_spans(line, &["{{{"]),
        Dialect::Unknown => Vec::new(),
    }
}

fn img_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<img\b[^>]*>").expect("valid regex"))
}

/// `<img>` without an `alt` attribute.
pub fn find_missing_alt(line: &str) -> Vec<MatchSpan> {
    img_re()
        .find_iter(line)
        .filter(|m| !m.as_str().to_ascii_lowercase().contains("alt="))
        .map(|m| MatchSpan::at(m.start(), m.as_str()))
        .collect()
}

fn vague_link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)<a\b[^>]*>\s*(click here|here|read more|more|link|this)\s*</a>")
            .expect("valid regex")
    })
}

/// Anchor whose visible text says nothing about the destination.
pub fn find_vague_link_text(line: &str) -> Vec<MatchSpan> {
    vague_link_re()
        .find_iter(line)
        .map(|m| MatchSpan::at(m.start(), m.as_str()))
        .collect()
}

fn form_control_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<(input|select|textarea)\b[^>]*>").expect("valid regex"))
}

/// Form control with no label association on the same line. Heuristic:
/// an `id` can be referenced by a `<label for>` elsewhere, so it counts.
pub fn find_missing_form_label(line: &str) -> Vec<MatchSpan> {
    form_control_re()
        .find_iter(line)
        .filter(|m| {
            let tag = m.as_str().to_ascii_lowercase();
            if tag.contains("type=\"hidden\"")
                || tag.contains("type=\"submit\"")
                || tag.contains("type=\"button\"")
            {
                return false;
            }
            !tag.contains("aria-label") && !tag.contains("aria-labelledby") && !tag.contains("id=")
        })
        .map(|m| MatchSpan::at(m.start(), m.as_str()))
        .collect()
}

fn hardcoded_url_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?i)(href|src|action)=["']https?://[^"']+["']"#).expect("valid regex")
    })
}

/// Absolute URL baked into a link or asset reference (strict mode).
pub fn find_hardcoded_urls(line: &str) -> Vec<MatchSpan> {
    hardcoded_url_re()
        .find_iter(line)
        .map(|m| MatchSpan::at(m.start(), m.as_str()))
        .collect()
}

fn tag_strip_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>|\{\{[^}]*\}\}|\{!![^!]*!!\}").expect("valid regex"))
}

const HARDCODED_TEXT_LIMIT: usize = 160;

/// Long literal prose baked into the template (strict mode). Content this
/// size belongs in the content store, not the view.
pub fn find_hardcoded_text(line: &str) -> Vec<MatchSpan> {
    let stripped = tag_strip_re().replace_all(line, "");
    let stripped = stripped.trim();
    if stripped.chars().count() > HARDCODED_TEXT_LIMIT {
        let snippet: String = stripped.chars().take(HARDCODED_TEXT_LIMIT).collect();
        vec![MatchSpan::at(0, &snippet)]
    } else {
        Vec::new()
    }
}

fn long_expr_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{[^}]{120,}\}\}").expect("valid regex"))
}

/// A single interpolation expression doing too much work (strict mode).
pub fn find_long_expressions(line: &str) -> Vec<MatchSpan> {
    long_expr_re()
        .find_iter(line)
        .map(|m| MatchSpan::at(m.start(), m.as_str()))
        .collect()
}

fn finding_from_span(
    code: &str,
    category: Category,
    severity: Severity,
    line_no: usize,
    span: &MatchSpan,
    message: String,
) -> Finding {
    Finding::new(code, category, severity, line_no, message)
        .at_column(span.column)
        .with_evidence(span.text.clone())
}

/// Runs every registered single-line rule against one line. `line_no` is
/// 1-based. Dialect-specific rules are no-ops for `Dialect::Unknown`.
pub fn run_line_rules(
    line: &str,
    line_no: usize,
    dialect: Dialect,
    strict: bool,
    policy: &Policy,
    out: &mut Vec<Finding>,
) {
    if !policy.allow_inline_code {
        for span in find_inline_code(line, dialect) {
            out.push(
                finding_from_span(
                    "inline_code",
                    Category::Policy,
                    Severity::Error,
                    line_no,
                    &span,
                    "inline code execution is disabled for templates".to_string(),
                )
                .with_suggestion("move the logic to a view composer or tag"),
            );
        }
    }

    for span in find_privileged_accessors(line, &policy.forbidden_accessors) {
        let mut finding = finding_from_span(
            "privileged_accessor",
            Category::Policy,
            Severity::Error,
            line_no,
            &span,
            format!("direct call to privileged accessor `{}`", span.text),
        );
        if policy.prefer_declarative_tags {
            finding = finding.with_suggestion("use the equivalent declarative tag instead");
        }
        out.push(finding);
    }

    for span in find_db_access(line) {
        out.push(finding_from_span(
            "db_in_view",
            Category::Policy,
            Severity::Error,
            line_no,
            &span,
            "direct data-store access inside a view".to_string(),
        ));
    }

    for span in find_raw_output(line, dialect) {
        out.push(
            finding_from_span(
                "raw_output",
                Category::Security,
                Severity::Error,
                line_no,
                &span,
                "unescaped output can expose the page to XSS".to_string(),
            )
            .with_suggestion("escape the value, or sanitize it before rendering"),
        );
    }

    for span in find_missing_alt(line) {
        out.push(
            finding_from_span(
                "missing_alt",
                Category::Accessibility,
                Severity::Warning,
                line_no,
                &span,
                "image tag has no alt text".to_string(),
            )
            .with_suggestion("add an alt attribute describing the image"),
        );
    }

    for span in find_vague_link_text(line) {
        out.push(finding_from_span(
            "vague_link_text",
            Category::Accessibility,
            Severity::Warning,
            line_no,
            &span,
            "link text does not describe its destination".to_string(),
        ));
    }

    for span in find_missing_form_label(line) {
        out.push(finding_from_span(
            "missing_form_label",
            Category::Accessibility,
            Severity::Warning,
            line_no,
            &span,
            "form control has no label association".to_string(),
        ));
    }

    if strict {
        for span in find_hardcoded_urls(line) {
            out.push(finding_from_span(
                "hardcoded_url",
                Category::Maintainability,
                Severity::Warning,
                line_no,
                &span,
                "hardcoded absolute URL".to_string(),
            ));
        }

        for span in find_hardcoded_text(line) {
            out.push(finding_from_span(
                "hardcoded_text",
                Category::Maintainability,
                Severity::Info,
                line_no,
                &span,
                "long hardcoded text block; content belongs in the content store".to_string(),
            ));
        }

        for span in find_long_expressions(line) {
            out.push(finding_from_span(
                "long_expression",
                Category::Maintainability,
                Severity::Warning,
                line_no,
                &span,
                "expression is too long for a template; extract it".to_string(),
            ));
        }
    }
}
