//! Session configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};
use signa_engine::{DebounceConfig, MatchStrategyKind};
use signa_registry::PatternRegistry;

use crate::error::{RuntimeError, RuntimeResult};

/// Everything a detection session needs besides the registry and the classifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Debounce parameters
    #[serde(default)]
    pub debounce: DebounceConfig,

    /// Evidence window
    #[serde(default)]
    pub buffer: BufferConfig,

    /// Frame capture pacing
    #[serde(default)]
    pub capture: CaptureConfig,

    /// Alert dispatch
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Pattern matching strategy
    #[serde(default)]
    pub strategy: MatchStrategyKind,
}

impl SessionConfig {
    /// Reject settings the pipeline cannot run with.
    ///
    /// The evidence window must hold at least the longest registered pattern,
    /// otherwise windowed matching would miss occurrences.
    pub fn validate(&self, registry: &PatternRegistry) -> RuntimeResult<()> {
        if self.debounce.confirm_frames == 0 {
            return Err(RuntimeError::Config(
                "debounce.confirm_frames must be at least 1".into(),
            ));
        }
        if self.buffer.capacity == 0 {
            return Err(RuntimeError::Config("buffer.capacity must be at least 1".into()));
        }
        if self.capture.frame_interval_ms == 0 {
            return Err(RuntimeError::Config(
                "capture.frame_interval_ms must be at least 1".into(),
            ));
        }
        if !self.capture.queue_capacity.is_power_of_two() {
            return Err(RuntimeError::Config(format!(
                "capture.queue_capacity must be a power of two, got {}",
                self.capture.queue_capacity
            )));
        }
        if self.dispatch.queue_capacity == 0 {
            return Err(RuntimeError::Config(
                "dispatch.queue_capacity must be at least 1".into(),
            ));
        }

        let longest = registry.max_pattern_len();
        if self.buffer.capacity < longest {
            return Err(RuntimeError::Config(format!(
                "buffer.capacity {} is shorter than the longest pattern ({longest} symbols)",
                self.buffer.capacity
            )));
        }
        Ok(())
    }
}

/// Evidence window configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BufferConfig {
    /// Maximum retained confirmed symbols
    #[serde(default = "default_buffer_capacity")]
    pub capacity: usize,
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            capacity: default_buffer_capacity(),
        }
    }
}

/// Capture configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Time between two classified frames
    #[serde(default = "default_frame_interval")]
    pub frame_interval_ms: u64,

    /// Raw frames buffered between capture and pipeline; the oldest is dropped
    /// on overflow. Must be a power of two, the only sizes the broadcast queue
    /// holds exactly.
    #[serde(default = "default_capture_queue")]
    pub queue_capacity: usize,
}

impl CaptureConfig {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms)
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval(),
            queue_capacity: default_capture_queue(),
        }
    }
}

/// Alert dispatch configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Alerts waiting for delivery before new ones are dropped
    #[serde(default = "default_dispatch_queue")]
    pub queue_capacity: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_dispatch_queue(),
        }
    }
}

fn default_buffer_capacity() -> usize {
    500
}

fn default_frame_interval() -> u64 {
    50
}

fn default_capture_queue() -> usize {
    32
}

fn default_dispatch_queue() -> usize {
    64
}
