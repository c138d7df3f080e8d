// SPDX-License-Identifier: MIT OR Apache-2.0

//! Caching-opportunity detection
//!
//! Finds constructs whose output rarely changes between requests:
//! static-looking wrapper partials, repeated identical queries, and
//! on-the-fly image processing. These become info-level suggestions,
//! never blocking findings.

use crate::types::Dialect;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    StaticWrapper,
    RepeatedQuery,
    AssetProcessing,
}

/// A cacheable construct spotted in a template. The suggestion generator
/// turns these into ranked suggestions.
#[derive(Debug, Clone)]
pub struct CacheOpportunity {
    pub kind: CacheKind,
    pub line: usize,
    pub snippet: String,
    pub message: String,
}

const STATIC_WRAPPER_NAMES: &[&str] = &["footer", "header", "nav", "sidebar", "menu"];
const ASSET_MARKERS: &[&str] = &["glide:", "->resize(", "->fit(", "Image::make"];

pub fn detect(text: &str, dialect: Dialect) -> Vec<CacheOpportunity> {
    let mut opportunities = Vec::new();
    detect_static_wrappers(text, dialect, &mut opportunities);
    detect_repeated_queries(text, dialect, &mut opportunities);
    detect_asset_processing(text, &mut opportunities);
    opportunities
}

fn detect_static_wrappers(text: &str, dialect: Dialect, out: &mut Vec<CacheOpportunity>) {
    for (idx, line) in text.lines().enumerate() {
        let include = match dialect {
            Dialect::Blade => line.contains("@include"),
            Dialect::Antlers => line.contains("{{ partial"),
            Dialect::Unknown => false,
        };
        if !include {
            continue;
        }
        if STATIC_WRAPPER_NAMES.iter().any(|name| line.contains(name)) {
            out.push(CacheOpportunity {
                kind: CacheKind::StaticWrapper,
                line: idx + 1,
                snippet: line.trim().to_string(),
                message: "static wrapper partial renders identically on every request".to_string(),
            });
        }
    }
}

/// The same query tag appearing more than once, unpaginated, repeats
/// identical store work per render.
fn detect_repeated_queries(text: &str, dialect: Dialect, out: &mut Vec<CacheOpportunity>) {
    let markers: &[&str] = match dialect {
        Dialect::Blade => &["@foreach", "@forelse"],
        Dialect::Antlers => &["{{ collection:", "{{ taxonomy:"],
        Dialect::Unknown => return,
    };

    let mut seen: HashMap<String, (usize, usize)> = HashMap::new();
    for (idx, line) in text.lines().enumerate() {
        for marker in markers {
            if let Some(pos) = line.find(marker) {
                let key = line[pos..].trim_end().to_string();
                if key.contains("paginate") {
                    continue;
                }
                let entry = seen.entry(key).or_insert((idx + 1, 0));
                entry.1 += 1;
            }
        }
    }

    let mut repeated: Vec<(String, usize)> = seen
        .into_iter()
        .filter(|(_, (_, count))| *count > 1)
        .map(|(key, (line, _))| (key, line))
        .collect();
    repeated.sort_by_key(|(_, line)| *line);

    for (snippet, line) in repeated {
        out.push(CacheOpportunity {
            kind: CacheKind::RepeatedQuery,
            line,
            snippet,
            message: "identical query repeats in this template; cache or hoist it".to_string(),
        });
    }
}

fn detect_asset_processing(text: &str, out: &mut Vec<CacheOpportunity>) {
    for (idx, line) in text.lines().enumerate() {
        for marker in ASSET_MARKERS {
            if line.contains(marker) {
                out.push(CacheOpportunity {
                    kind: CacheKind::AssetProcessing,
                    line: idx + 1,
                    snippet: line.trim().to_string(),
                    message: "image processing in the render path; pre-generate the variant"
                        .to_string(),
                });
                break;
            }
        }
    }
}
