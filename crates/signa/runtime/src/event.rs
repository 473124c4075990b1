use serde::Serialize;
use signa_alerts::DispatchStats;
use signa_types::{ConfirmedSymbolEvent, PatternEvent};
use uuid::Uuid;

/// Notifications published by a running session
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SessionEvent {
    /// A symbol survived debouncing
    Confirmed(ConfirmedSymbolEvent),
    /// A pattern fired
    Pattern(PatternEvent),
    /// Raw frames were discarded because the pipeline fell behind capture
    FramesDropped { count: u64 },
    /// The session finished
    Stopped(SessionReport),
}

/// Final accounting for a session
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionReport {
    pub session_id: Uuid,
    /// Frames the pipeline processed
    pub ticks: u64,
    pub confirmed_symbols: u64,
    pub alerts: u64,
    /// Frames lost to queue overflow
    pub frames_dropped: u64,
    pub dispatch: DispatchStats,
}

impl SessionReport {
    /// Frames the producer handed over, processed or not
    pub fn frames_captured(&self) -> u64 {
        self.ticks + self.frames_dropped
    }
}
