use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pattern::{ActionTag, PatternDefinition, Severity};
use crate::symbol::Symbol;

/// A symbol that survived debouncing and was appended to the evidence log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmedSymbolEvent {
    pub symbol: Symbol,
    /// Position in the session-wide index space; never reused.
    pub global_index: u64,
    pub timestamp: DateTime<Utc>,
}

/// A fired detection of one registered pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternEvent {
    pub pattern_name: String,
    pub pattern_literal: String,
    pub description: String,
    /// Global index of the first symbol of the occurrence.
    pub start_index: u64,
    /// Global index of the last symbol of the occurrence (inclusive).
    pub end_index: u64,
    pub severity: Severity,
    pub action: ActionTag,
    pub timestamp: DateTime<Utc>,
}

impl PatternEvent {
    pub fn from_definition(
        definition: &PatternDefinition,
        start_index: u64,
        end_index: u64,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            pattern_name: definition.name.clone(),
            pattern_literal: definition.literal(),
            description: definition.description.clone(),
            start_index,
            end_index,
            severity: definition.severity,
            action: definition.action.clone(),
            timestamp,
        }
    }

    /// Number of symbols covered by the occurrence.
    pub fn span_len(&self) -> u64 {
        self.end_index - self.start_index + 1
    }
}
