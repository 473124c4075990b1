//! One detection tick, end to end.
//!
//! ```text
//! raw symbol -> Debouncer -> SequenceBuffer -> MatchStrategy -> PatternEvents
//! ```
//!
//! The pipeline is a plain sequential state machine. A session owns it from
//! a single task, so a tick is never interleaved with another one.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use signa_engine::{
    BufferSnapshot, DebounceSnapshot, Debouncer, MatchStrategy, MatchStrategyKind, MatcherSnapshot,
    SequenceBuffer,
};
use signa_registry::PatternRegistry;
use signa_types::{ConfirmedSymbolEvent, PatternEvent, Symbol};
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::error::RuntimeResult;

/// Where the evidence buffer stands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineState {
    /// Buffer empty
    #[default]
    Idle,
    /// Buffer holds evidence, nothing fired yet
    Accumulating,
    /// At least one pattern fired this tick; the pipeline is back to idle
    /// before the next tick starts
    Alerted,
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Accumulating => write!(f, "accumulating"),
            Self::Alerted => write!(f, "alerted"),
        }
    }
}

/// What one tick produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickOutcome {
    pub confirmed: Option<ConfirmedSymbolEvent>,
    /// Fired patterns in registration order
    pub events: Vec<PatternEvent>,
    /// State at the end of the tick, `Alerted` when `events` is non-empty
    pub state: PipelineState,
}

impl TickOutcome {
    pub fn alerted(&self) -> bool {
        !self.events.is_empty()
    }
}

/// Immutable copy of the pipeline for status displays
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PipelineSnapshot {
    pub state: PipelineState,
    pub strategy: MatchStrategyKind,
    pub ticks: u64,
    pub confirmed_symbols: u64,
    pub alerts: u64,
    pub debounce: Option<DebounceSnapshot>,
    pub buffer: BufferSnapshot,
    pub matchers: Vec<MatcherSnapshot>,
}

/// The detection state machine: `Idle -> Accumulating -> Alerted -> Idle`
pub struct Pipeline {
    debouncer: Debouncer,
    buffer: SequenceBuffer,
    strategy: Box<dyn MatchStrategy>,
    state: PipelineState,
    ticks: u64,
    confirmed_symbols: u64,
    alerts: u64,
}

impl Pipeline {
    /// Build a pipeline after validating `config` against `registry`.
    pub fn new(config: &SessionConfig, registry: &PatternRegistry) -> RuntimeResult<Self> {
        config.validate(registry)?;
        Ok(Self {
            debouncer: Debouncer::new(config.debounce.clone()),
            buffer: SequenceBuffer::new(config.buffer.capacity),
            strategy: config.strategy.build(registry),
            state: PipelineState::Idle,
            ticks: 0,
            confirmed_symbols: 0,
            alerts: 0,
        })
    }

    /// Run one tick for a raw observation captured at `now` (monotonic) / `wall`.
    ///
    /// When anything fires, the buffer is cleared and every non-overlap gate
    /// moves to the current index so stale evidence cannot trigger again.
    pub fn tick(&mut self, raw: Option<Symbol>, now: Instant, wall: DateTime<Utc>) -> TickOutcome {
        self.ticks += 1;

        let Some(symbol) = self.debouncer.feed(raw, now) else {
            return TickOutcome {
                confirmed: None,
                events: Vec::new(),
                state: self.state,
            };
        };

        let index = self.buffer.append(symbol);
        self.confirmed_symbols += 1;
        debug!(%symbol, index, "confirmed symbol");
        let confirmed = ConfirmedSymbolEvent {
            symbol,
            global_index: index,
            timestamp: wall,
        };

        let events = self.strategy.advance(&self.buffer, symbol, index, wall);
        if events.is_empty() {
            self.state = PipelineState::Accumulating;
            return TickOutcome {
                confirmed: Some(confirmed),
                events,
                state: self.state,
            };
        }

        for event in &events {
            warn!(
                pattern = %event.pattern_name,
                severity = %event.severity,
                start = event.start_index,
                end = event.end_index,
                "pattern detected"
            );
        }
        self.alerts += events.len() as u64;
        self.buffer.clear();
        self.strategy.reset(index);
        self.state = PipelineState::Idle;

        TickOutcome {
            confirmed: Some(confirmed),
            events,
            state: PipelineState::Alerted,
        }
    }

    pub fn state(&self) -> PipelineState {
        self.state
    }

    pub fn buffer(&self) -> &SequenceBuffer {
        &self.buffer
    }

    pub fn debouncer(&self) -> &Debouncer {
        &self.debouncer
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn confirmed_symbols(&self) -> u64 {
        self.confirmed_symbols
    }

    pub fn alerts(&self) -> u64 {
        self.alerts
    }

    pub fn snapshot(&self) -> PipelineSnapshot {
        PipelineSnapshot {
            state: self.state,
            strategy: self.strategy.kind(),
            ticks: self.ticks,
            confirmed_symbols: self.confirmed_symbols,
            alerts: self.alerts,
            debounce: Some(self.debouncer.snapshot()),
            buffer: self.buffer.snapshot(),
            matchers: self.strategy.snapshot(),
        }
    }
}
