//! `signa patterns`

use std::path::Path;

use colored::Colorize;
use serde::Serialize;
use signa_registry::{GestureCatalog, GestureInfo};
use signa_types::{PatternDefinition, Severity};

use crate::error::CliResult;
use crate::output::{print_structured, OutputFormat};
use crate::settings::load_registry;

#[derive(Serialize)]
struct Listing<'a> {
    patterns: Vec<&'a PatternDefinition>,
    gestures: Vec<&'a GestureInfo>,
}

/// Execute patterns command
pub fn execute(patterns_path: Option<&Path>, format: OutputFormat) -> CliResult<()> {
    let registry = load_registry(patterns_path)?;
    let catalog = GestureCatalog::builtin();

    let listing = Listing {
        patterns: registry.iter().collect(),
        gestures: catalog.iter().collect(),
    };
    if print_structured(&listing, format)? {
        return Ok(());
    }

    println!("{}", "Registered Patterns".bold().cyan());
    println!("{}", "=".repeat(72));
    for def in registry.iter() {
        let severity = match def.severity {
            Severity::Critical => def.severity.to_string().red().bold(),
            Severity::High => def.severity.to_string().yellow().bold(),
            Severity::Low => def.severity.to_string().normal(),
        };
        println!(
            "  {:<20} {:<8} {:<9} {}",
            def.name.bold(),
            def.literal(),
            severity,
            def.action
        );
        if !def.description.is_empty() {
            println!("  {:<20} {}", "", def.description.dimmed());
        }
    }

    println!();
    println!("{}", "Gesture Legend".bold().cyan());
    println!("{}", "=".repeat(72));
    for gesture in catalog.iter() {
        println!(
            "  {}  {:<16} {} finger(s)  {}",
            gesture.symbol.to_string().green().bold(),
            gesture.name,
            gesture.extended_fingers,
            gesture.usage.dimmed()
        );
    }
    Ok(())
}
