// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mechanical auto-fixes
//!
//! Each fixable rule code exposes a pure function from the matched
//! snippet to its literal replacement, testable without running the
//! engine. Fixes are suggested text only; nothing here writes a file.

/// Accessor-head to declarative-tag mapping used when policy prefers
/// declarative tags over facade calls.
const ACCESSOR_TAGS: &[(&str, &str)] = &[
    ("Entry::", "{{ collection }}"),
    ("Collection::", "{{ collection }}"),
    ("Taxonomy::", "{{ taxonomy }}"),
    ("GlobalSet::", "{{ global }}"),
    ("User::", "{{ user }}"),
    ("Statamic::", "{{ statamic }}"),
];

/// Replacement for a privileged-accessor call: the declarative tag that
/// covers the same data. `None` when the accessor head is unknown.
pub fn fix_privileged_accessor(matched: &str) -> Option<String> {
    ACCESSOR_TAGS
        .iter()
        .find(|(head, _)| matched.starts_with(head))
        .map(|(_, tag)| (*tag).to_string())
}

/// Inserts an empty `alt` attribute before the tag's closing bracket.
/// The author still has to fill in the description.
pub fn fix_missing_alt(matched: &str) -> Option<String> {
    if matched.to_ascii_lowercase().contains("alt=") {
        return None;
    }
    if let Some(stripped) = matched.strip_suffix("/>") {
        return Some(format!("{}alt=\"\" />", stripped));
    }
    let stripped = matched.strip_suffix('>')?;
    Some(format!("{} alt=\"\">", stripped.trim_end()))
}

/// Dispatch: the fixable subset of rule codes. Everything else yields
/// `None` and falls back to a textual alternatives list.
pub fn fix_for(rule_code: &str, matched: &str) -> Option<String> {
    match rule_code {
        "privileged_accessor" => fix_privileged_accessor(matched),
        "missing_alt" => fix_missing_alt(matched),
        _ => None,
    }
}

/// Textual alternatives for findings with no mechanical fix.
pub fn alternatives_for(rule_code: &str) -> Vec<String> {
    let options: &[&str] = match rule_code {
        "n_plus_one" => &[
            "add an eager-load hint to the loop's opening tag",
            "precompute the relationship in a view composer",
        ],
        "nested_loops" => &[
            "hoist the inner query out of the outer loop",
            "denormalize the data so one loop suffices",
        ],
        "unpaginated_loop" => &[
            "paginate the result set",
            "lower the item cap and add a browse page",
        ],
        "db_in_view" => &[
            "move the query into a controller or composer",
            "expose the data through a tag",
        ],
        "inline_code" => &[
            "move the logic to a view composer",
            "wrap the behavior in a custom tag",
        ],
        "raw_output" | "xss_risk" => &[
            "escape the value before rendering",
            "sanitize the markup server-side if HTML is required",
        ],
        _ => &[],
    };
    options.iter().map(|s| (*s).to_string()).collect()
}
