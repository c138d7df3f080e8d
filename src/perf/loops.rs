// SPDX-License-Identifier: MIT OR Apache-2.0

//! Lexical loop-span extraction
//!
//! Finds loop constructs and their text ranges without a parser: openers
//! and closers are paired on a stack, and only properly paired loops
//! yield a span. The spans feed every loop-shaped detector (N+1, nesting,
//! pagination), so the matching lives in one place.

use crate::types::{Category, Dialect, Finding, Severity};
use regex::Regex;
use std::ops::Range;
use std::sync::OnceLock;

/// One paired loop construct, as byte ranges into the template text.
#[derive(Debug, Clone)]
pub struct LoopSpan {
    /// Construct name: `foreach`, `collection:blog`, ...
    pub name: String,
    /// 1-based line of the opening construct.
    pub open_line: usize,
    /// Text of the opening construct (directive line or opening tag).
    pub open_tag: String,
    /// Bytes strictly between the opening construct and its closer.
    pub body: Range<usize>,
    /// Bytes from opener start to closer end.
    pub full: Range<usize>,
    /// Fixed item cap parsed from the opening construct, if any.
    pub item_cap: Option<usize>,
}

impl LoopSpan {
    pub fn body_text<'a>(&self, text: &'a str) -> &'a str {
        &text[self.body.clone()]
    }

    /// True when `other` sits strictly inside this loop's body.
    pub fn encloses(&self, other: &LoopSpan) -> bool {
        self.full.start < other.full.start && other.full.end <= self.body.end
    }
}

fn blade_loop_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@(forelse|foreach|while|for)\b").expect("valid regex"))
}

fn blade_loop_close_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@end(forelse|foreach|while|for)\b").expect("valid regex"))
}

/// Antlers tag heads that iterate.
const ANTLERS_LOOP_HEADS: &[&str] = &["collection", "taxonomy", "nav", "loop", "foreach"];

fn antlers_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{\{\s*(/?)([a-zA-Z_][\w:.-]*)[^}]*\}\}").expect("valid regex"))
}

fn cap_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?:limit\s*[=:]\s*["']?(\d+)|->(?:take|limit)\((\d+)\))"#)
            .expect("valid regex")
    })
}

/// Parses a fixed item cap (`limit="500"`, `->take(500)`) out of an
/// opening construct.
pub fn parse_item_cap(open_tag: &str) -> Option<usize> {
    let caps = cap_re().captures(open_tag)?;
    caps.get(1)
        .or_else(|| caps.get(2))
        .and_then(|m| m.as_str().parse().ok())
}

fn line_starts(text: &str) -> Vec<usize> {
    let mut starts = vec![0];
    for (idx, byte) in text.bytes().enumerate() {
        if byte == b'\n' {
            starts.push(idx + 1);
        }
    }
    starts
}

fn line_of(starts: &[usize], offset: usize) -> usize {
    match starts.binary_search(&offset) {
        Ok(idx) => idx + 1,
        Err(idx) => idx,
    }
}

struct OpenLoop {
    name: String,
    start: usize,
    open_end: usize,
    open_line: usize,
    open_tag: String,
}

/// Extracts every properly paired loop construct. Unpaired openers and
/// closers yield no span; the document rules report those separately.
pub fn extract(text: &str, dialect: Dialect) -> Vec<LoopSpan> {
    match dialect {
        Dialect::Blade => extract_blade(text),
        Dialect::Antlers => extract_antlers(text),
        Dialect::Unknown => Vec::new(),
    }
}

fn extract_blade(text: &str) -> Vec<LoopSpan> {
    let starts = line_starts(text);
    let mut events: Vec<(usize, bool, String, usize)> = Vec::new();

    for m in blade_loop_open_re().find_iter(text) {
        let name = m.as_str().trim_start_matches('@').to_string();
        events.push((m.start(), false, name, blade_open_end(text, m.end())));
    }
    for m in blade_loop_close_re().find_iter(text) {
        let name = m.as_str().trim_start_matches("@end").to_string();
        events.push((m.start(), true, name, m.end()));
    }
    events.sort_by_key(|e| e.0);

    pair_events(text, &starts, events)
}

/// The opening construct runs through its balanced parenthesized
/// expression (`@foreach($posts as $post)`); a bare `@forelse` without
/// parens ends at the directive itself.
fn blade_open_end(text: &str, directive_end: usize) -> usize {
    let rest = &text[directive_end..];
    let offset = rest.len() - rest.trim_start_matches([' ', '\t']).len();
    let after = &rest[offset..];
    if !after.starts_with('(') {
        return directive_end;
    }
    let mut depth = 0usize;
    for (idx, ch) in after.char_indices() {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return directive_end + offset + idx + 1;
                }
            }
            '\n' => break,
            _ => {}
        }
    }
    directive_end
}

fn extract_antlers(text: &str) -> Vec<LoopSpan> {
    let starts = line_starts(text);
    let mut events: Vec<(usize, bool, String, usize)> = Vec::new();

    for caps in antlers_tag_re().captures_iter(text) {
        let whole = caps.get(0).expect("match exists");
        let closing = &caps[1] == "/";
        let name = caps[2].to_string();
        let head = name.split(':').next().unwrap_or(&name);
        if !ANTLERS_LOOP_HEADS.contains(&head) {
            continue;
        }
        if !closing && whole.as_str().ends_with("/}}") {
            continue; // self-closing tag, no body
        }
        events.push((whole.start(), closing, name, whole.end()));
    }

    pair_events(text, &starts, events)
}

fn pair_events(
    text: &str,
    starts: &[usize],
    events: Vec<(usize, bool, String, usize)>,
) -> Vec<LoopSpan> {
    let mut stack: Vec<OpenLoop> = Vec::new();
    let mut spans = Vec::new();

    for (offset, closing, name, end) in events {
        if closing {
            if let Some(pos) = stack.iter().rposition(|open| open.name == name) {
                let open = stack.remove(pos);
                let open_tag = open.open_tag.clone();
                spans.push(LoopSpan {
                    name: open.name,
                    open_line: open.open_line,
                    item_cap: parse_item_cap(&open_tag),
                    open_tag,
                    body: open.open_end..offset,
                    full: open.start..end,
                });
            }
        } else {
            stack.push(OpenLoop {
                open_tag: text[offset..end].to_string(),
                name,
                start: offset,
                open_end: end,
                open_line: line_of(starts, offset),
            });
        }
    }

    spans.sort_by_key(|s| s.full.start);
    spans
}

/// Nested-loop detection: one finding per inner loop that sits inside
/// another loop's body, carrying its nesting depth. Sibling loops never
/// count toward each other.
pub fn detect_nested(spans: &[LoopSpan]) -> Vec<Finding> {
    let mut findings = Vec::new();

    for (idx, inner) in spans.iter().enumerate() {
        let depth = spans
            .iter()
            .enumerate()
            .filter(|(other_idx, outer)| *other_idx != idx && outer.encloses(inner))
            .count();
        if depth > 0 {
            findings.push(
                Finding::new(
                    "nested_loops",
                    Category::Performance,
                    Severity::Warning,
                    inner.open_line,
                    format!(
                        "loop `{}` is nested {} level(s) deep; render cost multiplies",
                        inner.name,
                        depth + 1
                    ),
                )
                .with_evidence(inner.open_tag.clone())
                .with_suggestion("flatten the iteration or precompute the inner collection"),
            );
        }
    }

    findings
}

/// Unpaginated-loop detection: a fixed cap above the threshold with no
/// pagination marker anywhere in the construct.
pub fn detect_unpaginated(text: &str, spans: &[LoopSpan], threshold: usize) -> Vec<Finding> {
    let mut findings = Vec::new();

    for span in spans {
        let Some(cap) = span.item_cap else { continue };
        if cap <= threshold {
            continue;
        }
        let in_scope = &text[span.full.clone()];
        if in_scope.contains("paginate") {
            continue;
        }
        findings.push(
            Finding::new(
                "unpaginated_loop",
                Category::Performance,
                Severity::Warning,
                span.open_line,
                format!("loop renders up to {cap} items without pagination"),
            )
            .with_evidence(span.open_tag.clone())
            .with_suggestion(format!("paginate the result set (threshold {threshold})")),
        );
    }

    findings
}
