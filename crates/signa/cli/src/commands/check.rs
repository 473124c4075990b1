//! `signa check`

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use signa_registry::PatternRegistry;

use crate::error::CliResult;
use crate::output::{print_structured, OutputFormat};
use crate::settings::load_session_config;

#[derive(Serialize)]
struct CheckSummary {
    path: String,
    patterns: usize,
    longest_pattern: usize,
    names: Vec<String>,
}

/// Execute check command. Any configuration error is returned and ends the
/// process with a non-zero status.
pub fn execute(path: &Path, config_path: Option<&Path>, format: OutputFormat) -> CliResult<()> {
    let registry = PatternRegistry::load(path)?;
    // The session must be able to run with this registry too.
    load_session_config(config_path)?.validate(&registry)?;

    let summary = CheckSummary {
        path: path.display().to_string(),
        patterns: registry.len(),
        longest_pattern: registry.max_pattern_len(),
        names: registry.names().into_iter().map(str::to_string).collect(),
    };
    if print_structured(&summary, format)? {
        return Ok(());
    }

    println!(
        "{} {}: {} pattern(s), longest {} symbol(s)",
        "ok".green().bold(),
        summary.path,
        summary.patterns,
        summary.longest_pattern
    );
    Ok(())
}
