use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use signa_types::Symbol;
use tracing::trace;

/// Debounce parameters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DebounceConfig {
    /// Consecutive identical raw observations required before confirming.
    #[serde(default = "default_confirm_frames")]
    pub confirm_frames: u32,

    /// Minimum wall-clock time between two confirmations of a held symbol.
    #[serde(default = "default_repeat_interval_ms")]
    pub repeat_interval_ms: u64,
}

impl DebounceConfig {
    pub fn repeat_interval(&self) -> Duration {
        Duration::from_millis(self.repeat_interval_ms)
    }
}

impl Default for DebounceConfig {
    fn default() -> Self {
        Self {
            confirm_frames: default_confirm_frames(),
            repeat_interval_ms: default_repeat_interval_ms(),
        }
    }
}

fn default_confirm_frames() -> u32 {
    8
}

fn default_repeat_interval_ms() -> u64 {
    1000
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    symbol: Symbol,
    since: Instant,
}

/// Point-in-time view of the debouncer for status displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DebounceSnapshot {
    pub candidate: Option<Symbol>,
    pub run_length: u32,
    pub confirmed: bool,
}

/// Temporal debouncer for raw per-tick classifications.
///
/// A symbol is confirmed once it has been observed on at least
/// `confirm_frames` consecutive ticks and `repeat_interval` has elapsed
/// since it first appeared (or since its previous confirmation). Holding a
/// symbol therefore yields at most one confirmation per interval, and a new
/// symbol is never confirmed on the tick it first appears.
#[derive(Debug)]
pub struct Debouncer {
    config: DebounceConfig,
    candidate: Option<Candidate>,
    run_length: u32,
    confirmed: bool,
}

impl Debouncer {
    pub fn new(config: DebounceConfig) -> Self {
        Self {
            config,
            candidate: None,
            run_length: 0,
            confirmed: false,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(DebounceConfig::default())
    }

    pub fn config(&self) -> &DebounceConfig {
        &self.config
    }

    /// Feed one raw observation taken at `now`.
    pub fn feed(&mut self, raw: Option<Symbol>, now: Instant) -> Option<Symbol> {
        let Some(symbol) = raw else {
            // The candidate and its start time survive a gap; only the run resets.
            self.run_length = 0;
            self.confirmed = false;
            return None;
        };

        let candidate = match self.candidate {
            Some(c) if c.symbol == symbol => c,
            _ => {
                self.candidate = Some(Candidate { symbol, since: now });
                self.run_length = 1;
                self.confirmed = false;
                return None;
            }
        };

        self.run_length = self.run_length.saturating_add(1);
        let held_for = now.saturating_duration_since(candidate.since);

        if self.run_length >= self.config.confirm_frames
            && held_for >= self.config.repeat_interval()
        {
            self.candidate = Some(Candidate { symbol, since: now });
            self.confirmed = true;
            trace!(%symbol, run_length = self.run_length, "symbol confirmed");
            return Some(symbol);
        }

        self.confirmed = false;
        None
    }

    /// Whether the most recent [`feed`](Self::feed) produced a confirmation.
    pub fn is_confirmed(&self) -> bool {
        self.confirmed
    }

    pub fn snapshot(&self) -> DebounceSnapshot {
        DebounceSnapshot {
            candidate: self.candidate.map(|c| c.symbol),
            run_length: self.run_length,
            confirmed: self.confirmed,
        }
    }

    /// Forget the current candidate entirely.
    pub fn reset(&mut self) {
        self.candidate = None;
        self.run_length = 0;
        self.confirmed = false;
    }
}
