//! `signa replay`

use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{ArgGroup, Args};
use colored::Colorize;
use signa_runtime::{held_frames, parse_frames, replay};
use signa_types::{AlertRecord, Symbol};

use crate::error::CliResult;
use crate::output::{print_structured, OutputFormat};
use crate::settings::{load_registry, load_session_config};

/// Replay arguments
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["file", "frames", "gestures"])))]
pub struct ReplayArgs {
    /// File of raw frames: one character per frame, `.` for an empty frame,
    /// lines starting with `#` ignored
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Raw frames inline, e.g. "AAAAAAAA....BBBBBBBB"
    #[arg(long)]
    pub frames: Option<String>,

    /// Gesture literal expanded with --hold-frames/--gap-frames, e.g. "ACACAC"
    #[arg(long)]
    pub gestures: Option<String>,

    /// Frames each gesture is held (with --gestures)
    #[arg(long, default_value = "24")]
    pub hold_frames: usize,

    /// Empty frames after each gesture (with --gestures)
    #[arg(long, default_value = "4")]
    pub gap_frames: usize,
}

/// Execute replay command
pub fn execute(
    args: ReplayArgs,
    config_path: Option<&Path>,
    patterns_path: Option<&Path>,
    format: OutputFormat,
) -> CliResult<()> {
    let config = load_session_config(config_path)?;
    let registry = load_registry(patterns_path)?;
    let frames = load_frames(&args)?;

    let report = replay(&config, &registry, frames, Utc::now())?;
    if print_structured(&report, format)? {
        return Ok(());
    }

    println!("{}", "Replay".bold().cyan());
    println!("{}", "=".repeat(60));
    println!(
        "  frames: {}  confirmed: {}  alerts: {}",
        report.frames,
        report.confirmed.len(),
        report.events.len()
    );
    println!();

    let confirmed: String = report.confirmed.iter().map(|c| c.symbol.as_char()).collect();
    println!("  confirmed sequence: {}", confirmed.green());
    for event in &report.events {
        println!(
            "  {} [{}..={}] {}",
            event.pattern_name.bold(),
            event.start_index,
            event.end_index,
            AlertRecord::from_event(event).render_line().red()
        );
    }
    println!();
    println!(
        "  final state: {}  buffer: \"{}\"",
        report.final_state.state,
        report.final_state.buffer.literal()
    );
    Ok(())
}

fn load_frames(args: &ReplayArgs) -> CliResult<Vec<Option<Symbol>>> {
    if let Some(path) = &args.file {
        let contents = std::fs::read_to_string(path)?;
        let script: String = contents
            .lines()
            .filter(|line| !line.trim_start().starts_with('#'))
            .collect();
        return Ok(parse_frames(&script)?);
    }
    if let Some(frames) = &args.frames {
        return Ok(parse_frames(frames)?);
    }
    let literal = args.gestures.as_deref().unwrap_or_default();
    let gestures = Symbol::parse_sequence(literal)?;
    Ok(held_frames(&gestures, args.hold_frames, args.gap_frames))
}
