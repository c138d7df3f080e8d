// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dialect classification from path and content signatures
//!
//! An explicit hint always wins. Otherwise the tag-bracket (Antlers)
//! signatures are checked before the directive (Blade) ones, because
//! both dialects use `{{ ... }}` interpolation and only Antlers uses
//! closing tags and colon-namespaced tag names. `Unknown` is a valid
//! outcome, never an error: dialect-agnostic document checks still run.

use crate::types::{Dialect, DialectHint};

const ANTLERS_TEXT_SIGNATURES: &[&str] = &[
    "{{ /",
    "{{/",
    "{{ collection:",
    "{{ partial:",
    "{{ taxonomy:",
    "{{ nav",
    "{{ if ",
    "{{ unless ",
];

const BLADE_TEXT_SIGNATURES: &[&str] = &[
    "@if",
    "@foreach",
    "@forelse",
    "@extends",
    "@include",
    "@section",
    "@php",
    "{!!",
    "{{ $",
];

pub fn classify(path: &str, text: &str, hint: DialectHint) -> Dialect {
    match hint {
        DialectHint::Blade => return Dialect::Blade,
        DialectHint::Antlers => return Dialect::Antlers,
        DialectHint::Auto => {}
    }

    if let Some(dialect) = Dialect::from_path(path) {
        return dialect;
    }
    if path.contains(".antlers.") {
        return Dialect::Antlers;
    }

    if ANTLERS_TEXT_SIGNATURES.iter().any(|sig| text.contains(sig)) {
        return Dialect::Antlers;
    }
    if BLADE_TEXT_SIGNATURES.iter().any(|sig| text.contains(sig)) {
        return Dialect::Blade;
    }

    Dialect::Unknown
}
