// SPDX-License-Identifier: MIT OR Apache-2.0

//! templint: static analysis for CMS page templates
//!
//! Lints Blade and Antlers templates for policy, security, and
//! accessibility defects, estimates render cost from structural metrics,
//! and produces ranked optimization suggestions with auto-fixes.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use templint::report::formatter::ReportFormatter;
use templint::report::output::ReportFormat;
use templint::types::{
    DialectHint, LintOptions, OptimizationFocus, PerfOptions, Policy, SuggestOptions,
};
use templint::{AnalyzeError, Engine};

#[derive(Parser)]
#[command(name = "templint")]
#[command(version = "0.3.0")]
#[command(about = "Static analysis for Blade and Antlers CMS templates")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint a template file or inline template text
    Lint {
        /// Template file or inline template text
        #[arg(value_name = "TARGET")]
        target: String,

        /// Force a dialect instead of auto-detecting
        #[arg(short, long, value_enum, default_value = "auto")]
        dialect: DialectArg,

        /// Promote maintainability warnings to violations
        #[arg(short, long)]
        strict: bool,

        /// Skip the performance section
        #[arg(long)]
        no_perf: bool,

        /// Skip auto-fix snippets in suggestions
        #[arg(long)]
        no_fix: bool,

        /// Report output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ReportFormat,

        /// Output report to file instead of the console
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Profile templates: complexity, render estimates, N+1 patterns
    Perf {
        /// Template file, directory, or inline template text
        #[arg(value_name = "TARGET")]
        target: String,

        /// Force a dialect instead of auto-detecting
        #[arg(short, long, value_enum, default_value = "auto")]
        dialect: DialectArg,

        /// Skip `_`-prefixed partials when scanning a directory
        #[arg(long)]
        skip_partials: bool,

        /// Complexity score above which a template is flagged
        #[arg(long, default_value = "50.0")]
        complexity_threshold: f64,

        /// Report output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ReportFormat,

        /// Output report to file instead of the console
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Build a ranked optimization plan for templates
    Suggest {
        /// Template file, directory, or inline template text
        #[arg(value_name = "TARGET")]
        target: String,

        /// Force a dialect instead of auto-detecting
        #[arg(short, long, value_enum, default_value = "auto")]
        dialect: DialectArg,

        /// Restrict the plan to one concern
        #[arg(long, default_value = "all")]
        focus: String,

        /// Maximum number of suggestions to keep after ranking
        #[arg(long, default_value = "20")]
        max_suggestions: usize,

        /// Skip before/after code examples
        #[arg(long)]
        no_examples: bool,

        /// Keep discovery order instead of ranking by impact/effort
        #[arg(long)]
        no_ranking: bool,

        /// Report output format
        #[arg(short, long, value_enum, default_value = "json")]
        format: ReportFormat,

        /// Output report to file instead of the console
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
enum DialectArg {
    Auto,
    Blade,
    Antlers,
}

impl From<DialectArg> for DialectHint {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Auto => DialectHint::Auto,
            DialectArg::Blade => DialectHint::Blade,
            DialectArg::Antlers => DialectHint::Antlers,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let engine = Engine::new(Policy::default());
    let formatter = ReportFormatter::new();

    match cli.command {
        Commands::Lint {
            target,
            dialect,
            strict,
            no_perf,
            no_fix,
            format,
            output,
        } => {
            let options = LintOptions {
                strict_mode: strict,
                auto_fix: !no_fix,
                performance_analysis: !no_perf,
                dialect: dialect.into(),
            };

            let text = read_target(&target)?;
            let outcome = engine.lint(&text, &options);

            if let Some(path) = output {
                write_report(&outcome, format, &path)?;
            } else {
                formatter.print_lint(&outcome);
            }

            if !outcome.ok {
                return Ok(ExitCode::FAILURE);
            }
        }

        Commands::Perf {
            target,
            dialect,
            skip_partials,
            complexity_threshold,
            format,
            output,
        } => {
            let options = PerfOptions {
                template_type: dialect.into(),
                include_partials: !skip_partials,
                complexity_threshold,
                ..PerfOptions::default()
            };

            let report = engine.analyze_performance(&target, &options)?;

            if let Some(path) = output {
                write_report(&report, format, &path)?;
            } else {
                formatter.print_analysis(&report);
            }
        }

        Commands::Suggest {
            target,
            dialect,
            focus,
            max_suggestions,
            no_examples,
            no_ranking,
            format,
            output,
        } => {
            let Some(focus) = OptimizationFocus::parse(&focus) else {
                return Err(AnalyzeError::InvalidFocus(focus).into());
            };

            let options = SuggestOptions {
                template_type: dialect.into(),
                focus,
                include_code_examples: !no_examples,
                prioritize_suggestions: !no_ranking,
                max_suggestions,
            };

            let plan = engine.suggest_optimizations(&target, &options)?;

            if let Some(path) = output {
                write_report(&plan, format, &path)?;
            } else {
                formatter.print_plan(&plan);
            }
        }
    }

    Ok(ExitCode::SUCCESS)
}

/// Lint is the one command that takes template text directly, so a
/// `TARGET` naming an existing file is read here and anything else is
/// treated as inline text.
fn read_target(target: &str) -> Result<String> {
    let path = std::path::Path::new(target);
    if path.is_dir() {
        bail!("lint takes a single file or inline text; use `perf` to scan a directory");
    }
    if path.is_file() {
        return std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()));
    }
    Ok(target.to_string())
}

fn write_report<T: serde::Serialize>(
    report: &T,
    format: ReportFormat,
    path: &PathBuf,
) -> Result<()> {
    let path = if path.extension().is_none() {
        path.with_extension(format.extension())
    } else {
        path.clone()
    };
    let rendered = format.serialize(report)?;
    std::fs::write(&path, rendered)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Report saved to: {}", path.display());
    Ok(())
}
