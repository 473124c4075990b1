//! Offline, deterministic replay of recorded raw frames.
//!
//! Frames are stamped from a synthetic clock advancing by the configured
//! frame interval, so a recording produces the same detections on every run.

use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use signa_registry::PatternRegistry;
use signa_types::{ConfirmedSymbolEvent, PatternEvent, Symbol};
use tracing::{info, instrument};

use crate::config::SessionConfig;
use crate::error::RuntimeResult;
use crate::pipeline::{Pipeline, PipelineSnapshot};

/// Everything a replay produced
#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub frames: u64,
    pub confirmed: Vec<ConfirmedSymbolEvent>,
    pub events: Vec<PatternEvent>,
    pub final_state: PipelineSnapshot,
}

/// Run `frames` through a fresh pipeline, starting the wall clock at `started_at`.
#[instrument(skip_all, fields(strategy = %config.strategy))]
pub fn replay<I>(
    config: &SessionConfig,
    registry: &PatternRegistry,
    frames: I,
    started_at: DateTime<Utc>,
) -> RuntimeResult<ReplayReport>
where
    I: IntoIterator<Item = Option<Symbol>>,
{
    let mut pipeline = Pipeline::new(config, registry)?;
    let interval = config.capture.frame_interval();
    let base = Instant::now();

    let mut confirmed = Vec::new();
    let mut events = Vec::new();
    let mut count = 0u64;

    for raw in frames {
        let offset = interval * u32::try_from(count).unwrap_or(u32::MAX);
        let wall = started_at
            + chrono::Duration::from_std(offset).unwrap_or_else(|_| chrono::Duration::zero());
        let outcome = pipeline.tick(raw, base + offset, wall);

        confirmed.extend(outcome.confirmed);
        events.extend(outcome.events);
        count += 1;
    }

    info!(
        frames = count,
        confirmed = confirmed.len(),
        alerts = events.len(),
        "replay finished"
    );

    Ok(ReplayReport {
        frames: count,
        confirmed,
        events,
        final_state: pipeline.snapshot(),
    })
}
