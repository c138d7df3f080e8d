// SPDX-License-Identifier: MIT OR Apache-2.0

//! Source collection: resolve a path into template sources
//!
//! A file path yields a single-element list; a directory is walked
//! recursively, keeping only files with a recognized dialect suffix.
//! Per-file read failures degrade to skip-and-continue so one bad file
//! never aborts a batch. A directory with zero matching files is an
//! empty success, distinct from `NotFound`.

use crate::dialect;
use crate::error::AnalyzeError;
use crate::types::{Dialect, DialectHint, TemplateSource};
use filetime::FileTime;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

/// Directories that never contain project templates.
const SKIP_DIRS: &[&str] = &["node_modules", "vendor", ".git", "storage", "public"];

pub fn collect(path: &Path, hint: DialectHint) -> Result<Vec<TemplateSource>, AnalyzeError> {
    if !path.exists() {
        return Err(AnalyzeError::NotFound(path.to_path_buf()));
    }

    if path.is_file() {
        return match read_template(path, hint) {
            Some(source) => Ok(vec![source]),
            None => Err(AnalyzeError::UnreadableFile {
                path: path.to_path_buf(),
                reason: "could not read or decode file".to_string(),
            }),
        };
    }

    let mut sources = Vec::new();
    let walker = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(e.path()));

    for entry in walker.flatten() {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.path().to_string_lossy();
        if Dialect::from_path(&name).is_none() {
            continue;
        }
        // Unreadable or undecodable files are skipped, never fatal here.
        if let Some(source) = read_template(entry.path(), hint) {
            sources.push(source);
        }
    }

    Ok(sources)
}

fn is_skipped_dir(path: &Path) -> bool {
    path.is_dir()
        && path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|name| SKIP_DIRS.contains(&name))
}

fn read_template(path: &Path, hint: DialectHint) -> Option<TemplateSource> {
    let raw = fs::read(path).ok()?;
    let text = decode(raw)?;

    let meta = fs::metadata(path).ok()?;
    let mtime = FileTime::from_last_modification_time(&meta);

    let path_str = path.to_string_lossy();
    let dialect = dialect::classify(&path_str, &text, hint);

    Some(TemplateSource {
        path: path.to_path_buf(),
        dialect,
        size_bytes: meta.len(),
        line_count: text.lines().count().max(1),
        mtime_unix: mtime.unix_seconds(),
        text,
    })
}

/// UTF-8 first, WINDOWS_1252 fallback, then give up.
fn decode(raw: Vec<u8>) -> Option<String> {
    match String::from_utf8(raw) {
        Ok(s) => Some(s),
        Err(err) => {
            let bytes = err.into_bytes();
            let (cow, _, had_errors) = encoding_rs::WINDOWS_1252.decode(&bytes);
            if had_errors {
                None
            } else {
                Some(cow.into_owned())
            }
        }
    }
}
