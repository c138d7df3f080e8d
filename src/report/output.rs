// SPDX-License-Identifier: MIT OR Apache-2.0

//! Serialization helpers for exported reports

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Yaml,
}

impl ReportFormat {
    /// Default file extension for saved reports.
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Json => "json",
            ReportFormat::Yaml => "yaml",
        }
    }

    pub fn serialize<T: Serialize>(&self, report: &T) -> Result<String> {
        match self {
            ReportFormat::Json => Ok(serde_json::to_string_pretty(report)?),
            ReportFormat::Yaml => Ok(serde_yaml::to_string(report)?),
        }
    }
}
