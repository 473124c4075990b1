//! `signa run`

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use colored::Colorize;
use signa_alerts::{AlertSink, ChannelAlertSink, CompositeSink, TracingAlertSink};
use signa_engine::MatchStrategyKind;
use signa_runtime::{
    Classifier, ScriptedClassifier, Session, SessionConfig, SessionEvent, SimulatedClassifier,
};
use signa_types::Symbol;
use tokio::sync::broadcast;
use tracing::info;

use crate::error::{CliError, CliResult};
use crate::output::{print_structured, OutputFormat};
use crate::settings::{load_registry, load_session_config};

/// Live session arguments
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Gestures the simulated classifier cycles through
    #[arg(long, default_value = "ABC")]
    pub script: String,

    /// Frames each simulated gesture is held
    #[arg(long, default_value = "30")]
    pub hold_frames: usize,

    /// Empty frames between simulated gestures
    #[arg(long, default_value = "10")]
    pub gap_frames: usize,

    /// Probability that a simulated frame is replaced by random jitter
    #[arg(long, default_value = "0.0")]
    pub noise: f64,

    /// Seed for the jitter, for reproducible runs
    #[arg(long)]
    pub seed: Option<u64>,

    /// Replay these raw frames once instead of simulating (`.` is an empty frame)
    #[arg(long, conflicts_with = "script")]
    pub frames: Option<String>,

    /// Stop after this many seconds; runs until Ctrl-C or the frames run out otherwise
    #[arg(long)]
    pub duration_secs: Option<u64>,

    /// Matching strategy, overrides the configuration
    #[arg(long, value_parser = parse_strategy)]
    pub strategy: Option<MatchStrategyKind>,

    /// Capture interval in milliseconds, overrides the configuration
    #[arg(long)]
    pub frame_interval_ms: Option<u64>,

    /// Print every confirmed symbol
    #[arg(long)]
    pub show_symbols: bool,
}

fn parse_strategy(value: &str) -> Result<MatchStrategyKind, String> {
    match value.to_ascii_lowercase().as_str() {
        "incremental" => Ok(MatchStrategyKind::Incremental),
        "rescan" => Ok(MatchStrategyKind::Rescan),
        other => Err(format!("unknown strategy '{other}', use incremental or rescan")),
    }
}

/// Execute run command
pub async fn execute(
    args: RunArgs,
    config_path: Option<&Path>,
    patterns_path: Option<&Path>,
    format: OutputFormat,
) -> CliResult<()> {
    let mut config = load_session_config(config_path)?;
    apply_overrides(&mut config, &args);
    let registry = load_registry(patterns_path)?;
    let classifier = build_classifier(&args)?;

    // Alert lines go to the operator log and to stdout.
    let (channel_sink, mut records) = ChannelAlertSink::channel(config.dispatch.queue_capacity);
    let sink: Arc<dyn AlertSink> = Arc::new(CompositeSink::new(vec![
        Arc::new(TracingAlertSink),
        Arc::new(channel_sink),
    ]));

    let handle = Session::start(config, registry, classifier, sink)?;
    let table = format == OutputFormat::Table;

    let printer = tokio::spawn(async move {
        while let Some(record) = records.recv().await {
            if table {
                println!("{}", record.render_line().red().bold());
            }
        }
    });
    let echo = (table && args.show_symbols).then(|| tokio::spawn(echo_symbols(handle.subscribe())));

    if table {
        println!(
            "{} session {} (Ctrl-C to stop)",
            "Signa".bold().cyan(),
            handle.id()
        );
    }

    let deadline = async {
        match args.duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending().await,
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("interrupted"),
        _ = deadline => info!("duration elapsed"),
        _ = handle.wait_stopped() => info!("frames exhausted"),
    }

    let report = handle.shutdown().await?;
    let _ = printer.await;
    if let Some(echo) = echo {
        let _ = echo.await;
    }

    if print_structured(&report, format)? {
        return Ok(());
    }
    println!();
    println!(
        "  ticks: {}  confirmed: {}  alerts: {}  dropped frames: {}  delivery failures: {}",
        report.ticks,
        report.confirmed_symbols,
        report.alerts,
        report.frames_dropped,
        report.dispatch.failed + report.dispatch.rejected
    );
    Ok(())
}

fn apply_overrides(config: &mut SessionConfig, args: &RunArgs) {
    if let Some(strategy) = args.strategy {
        config.strategy = strategy;
    }
    if let Some(ms) = args.frame_interval_ms {
        config.capture.frame_interval_ms = ms;
    }
}

fn build_classifier(args: &RunArgs) -> CliResult<Box<dyn Classifier>> {
    if let Some(frames) = &args.frames {
        return Ok(Box::new(ScriptedClassifier::parse(frames)?));
    }

    let gestures = Symbol::parse_sequence(&args.script)?;
    if args.hold_frames == 0 {
        return Err(CliError::InvalidArgument(
            "--hold-frames must be at least 1, the simulated script would never show a gesture"
                .into(),
        ));
    }
    if !(0.0..=1.0).contains(&args.noise) {
        return Err(CliError::InvalidArgument(format!(
            "--noise must be between 0 and 1, got {}",
            args.noise
        )));
    }
    let classifier = match args.seed {
        Some(seed) => SimulatedClassifier::seeded(&gestures, args.hold_frames, args.gap_frames, args.noise, seed),
        None => SimulatedClassifier::new(&gestures, args.hold_frames, args.gap_frames, args.noise),
    };
    Ok(Box::new(classifier))
}

/// Print confirmed symbols until the session stops.
async fn echo_symbols(mut events: broadcast::Receiver<SessionEvent>) {
    loop {
        match events.recv().await {
            Ok(SessionEvent::Confirmed(confirmed)) => {
                println!(
                    "  {} #{}",
                    confirmed.symbol.to_string().green(),
                    confirmed.global_index
                );
            }
            Ok(SessionEvent::Stopped(_)) | Err(broadcast::error::RecvError::Closed) => return,
            Ok(_) | Err(broadcast::error::RecvError::Lagged(_)) => {}
        }
    }
}
