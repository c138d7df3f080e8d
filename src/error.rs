// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy for the analysis boundary
//!
//! `NotFound` and `InvalidFocus` are fatal and abort an invocation before
//! or during collection. An unreadable file inside a batch is recovered
//! locally (skip and continue) and only surfaces as `UnreadableFile` when
//! it was the explicit single target. An unknown dialect is never an
//! error; the `Dialect::Unknown` variant degrades to dialect-agnostic
//! checks instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    #[error("unreadable file: {path} ({reason})")]
    UnreadableFile { path: PathBuf, reason: String },

    #[error("unsupported optimization focus: {0:?} (expected performance, maintainability, security, or all)")]
    InvalidFocus(String),
}

impl AnalyzeError {
    pub fn is_fatal(&self) -> bool {
        matches!(self, AnalyzeError::NotFound(_) | AnalyzeError::InvalidFocus(_))
    }
}
