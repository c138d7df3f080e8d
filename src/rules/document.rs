// SPDX-License-Identifier: MIT OR Apache-2.0

//! Whole-document rules
//!
//! Rules that need cross-line context: block pairing, template length,
//! and embedded style/script block size. The length and style/script
//! checks are dialect-agnostic and run even for `Dialect::Unknown`.

use crate::types::{Category, Dialect, Finding, Severity};
use regex::Regex;
use std::sync::OnceLock;

const MAX_TEMPLATE_LINES: usize = 300;
const MAX_EMBEDDED_BLOCK_LINES: usize = 20;

/// Blade block directives that require a matching `@end...`.
const BLADE_BLOCK_NAMES: &[&str] = &[
    "forelse", "foreach", "unless", "switch", "while", "isset", "guest", "auth", "push", "for",
    "if",
];

/// Antlers tag heads that open a block closed by `{{ /head }}`.
const ANTLERS_BLOCK_HEADS: &[&str] = &[
    "if", "unless", "collection", "taxonomy", "nav", "loop", "foreach", "form", "search", "scope",
    "locales",
];

pub fn run_document_rules(text: &str, dialect: Dialect, out: &mut Vec<Finding>) {
    match dialect {
        Dialect::Blade | Dialect::Antlers => check_block_pairs(text, dialect, out),
        Dialect::Unknown => {}
    }
    check_template_length(text, out);
    check_embedded_block(text, "style", "inline_style_block", out);
    check_embedded_block(text, "script", "inline_script_block", out);
}

fn blade_open_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"@(forelse|foreach|unless|switch|while|isset|guest|auth|push|for|if)\b")
            .expect("valid regex")
    })
}

fn blade_close_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"@end(forelse|foreach|unless|switch|while|isset|guest|auth|push|for|if)\b")
            .expect("valid regex")
    })
}

fn antlers_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // Captures the optional closing slash and the tag name token, through
    // the closing braces so self-closing tags can be told apart.
    RE.get_or_init(|| Regex::new(r"\{\{\s*(/?)([a-zA-Z_][\w:.-]*)[^}]*\}\}").expect("valid regex"))
}

#[derive(Debug)]
struct BlockEvent {
    name: String,
    line: usize,
    column: usize,
    closing: bool,
}

fn blade_events(text: &str) -> Vec<BlockEvent> {
    let mut events = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        for m in blade_close_re().find_iter(line) {
            events.push(BlockEvent {
                name: m.as_str().trim_start_matches("@end").to_string(),
                line: idx + 1,
                column: m.start() + 1,
                closing: true,
            });
        }
        for m in blade_open_re().find_iter(line) {
            events.push(BlockEvent {
                name: m.as_str().trim_start_matches('@').to_string(),
                line: idx + 1,
                column: m.start() + 1,
                closing: false,
            });
        }
    }
    events.sort_by_key(|e| (e.line, e.column));
    events
}

fn antlers_events(text: &str) -> Vec<BlockEvent> {
    let mut events = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        for caps in antlers_tag_re().captures_iter(line) {
            let whole = caps.get(0).expect("match exists");
            let closing = &caps[1] == "/";
            let name = caps[2].to_string();
            let head = name.split(':').next().unwrap_or(&name);
            if !ANTLERS_BLOCK_HEADS.contains(&head) {
                continue;
            }
            // Self-closing `{{ tag /}}` never participates in pairing.
            if !closing && whole.as_str().ends_with("/}}") {
                continue;
            }
            events.push(BlockEvent {
                name,
                line: idx + 1,
                column: whole.start() + 1,
                closing,
            });
        }
    }
    events
}

/// Name-keyed stack pairing. Openers push; a closer pops the nearest
/// opener with the same name; an unmatched closer is reported where it
/// stands; leftovers are reported at their opening line.
///
/// Matching is by construct name only, so interleaved same-named blocks
/// can mis-pair. Nesting order is the sole signal; this is an accepted
/// approximation, not a guarantee.
pub fn check_block_pairs(text: &str, dialect: Dialect, out: &mut Vec<Finding>) {
    let events = match dialect {
        Dialect::Blade => blade_events(text),
        Dialect::Antlers => antlers_events(text),
        Dialect::Unknown => return,
    };

    let mut stack: Vec<BlockEvent> = Vec::new();
    for event in events {
        if event.closing {
            match stack.iter().rposition(|open| open.name == event.name) {
                Some(pos) => {
                    stack.remove(pos);
                }
                None => out.push(
                    Finding::new(
                        "unmatched_directive",
                        Category::Maintainability,
                        Severity::Error,
                        event.line,
                        format!("closing `{}` has no open block", event.name),
                    )
                    .at_column(event.column),
                ),
            }
        } else {
            stack.push(event);
        }
    }

    for open in stack {
        out.push(
            Finding::new(
                "unclosed_directive",
                Category::Maintainability,
                Severity::Error,
                open.line,
                format!("block `{}` is never closed", open.name),
            )
            .at_column(open.column),
        );
    }
}

fn check_template_length(text: &str, out: &mut Vec<Finding>) {
    let lines = text.lines().count();
    if lines > MAX_TEMPLATE_LINES {
        out.push(
            Finding::new(
                "template_too_long",
                Category::Maintainability,
                Severity::Warning,
                1,
                format!("template is {lines} lines (limit {MAX_TEMPLATE_LINES})"),
            )
            .with_suggestion("split the view into partials"),
        );
    }
}

fn check_embedded_block(text: &str, element: &str, code: &str, out: &mut Vec<Finding>) {
    let open = format!("<{element}");
    let close = format!("</{element}>");
    let mut open_line: Option<usize> = None;

    for (idx, line) in text.lines().enumerate() {
        let lower = line.to_ascii_lowercase();
        if open_line.is_none() && lower.contains(&open) && !lower.contains(&close) {
            open_line = Some(idx + 1);
            continue;
        }
        if let Some(start) = open_line {
            if lower.contains(&close) {
                let span = idx + 1 - start;
                if span > MAX_EMBEDDED_BLOCK_LINES {
                    out.push(
                        Finding::new(
                            code,
                            Category::Maintainability,
                            Severity::Warning,
                            start,
                            format!(
                                "embedded <{element}> block spans {span} lines; move it to an asset"
                            ),
                        )
                        .with_suggestion(format!("extract the {element} block to a compiled asset")),
                    );
                }
                open_line = None;
            }
        }
    }
}
