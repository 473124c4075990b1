//! Alert log line contract.
//!
//! Dispatchers render one UTF-8 line per alert:
//! `"<SEVERITY> - <description> - DD/MM/YYYY HH:MM:SS"` in local time.

use std::fmt;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::RecordParseError;
use crate::event::PatternEvent;
use crate::pattern::Severity;

const SEPARATOR: &str = " - ";
const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// One alert as presented to operators and persisted by log sinks.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertRecord {
    pub severity: Severity,
    pub description: String,
    /// Originating pattern; absent when the record was read back from a log line.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern_name: Option<String>,
    pub timestamp: DateTime<Local>,
}

impl AlertRecord {
    pub fn from_event(event: &PatternEvent) -> Self {
        let description = if event.description.is_empty() {
            format!("pattern {} ({})", event.pattern_name, event.pattern_literal)
        } else {
            event.description.clone()
        };
        Self {
            severity: event.severity,
            description,
            pattern_name: Some(event.pattern_name.clone()),
            timestamp: event.timestamp.with_timezone(&Local),
        }
    }

    /// Render the log line (no trailing newline).
    pub fn render_line(&self) -> String {
        format!(
            "{}{sep}{}{sep}{}",
            self.severity,
            self.description,
            self.timestamp.format(TIMESTAMP_FORMAT),
            sep = SEPARATOR,
        )
    }

    /// Parse a line produced by [`render_line`](Self::render_line).
    ///
    /// The description may itself contain the separator; severity is taken
    /// from the first segment and the timestamp from the last.
    pub fn parse_line(line: &str) -> Result<Self, RecordParseError> {
        let line = line.trim();
        let (severity, rest) = line
            .split_once(SEPARATOR)
            .ok_or_else(|| RecordParseError::Malformed(line.to_string()))?;
        let (description, timestamp) = rest
            .rsplit_once(SEPARATOR)
            .ok_or_else(|| RecordParseError::Malformed(line.to_string()))?;

        let severity = severity
            .parse::<Severity>()
            .map_err(|_| RecordParseError::Severity(severity.to_string()))?;
        let naive = NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT)
            .map_err(|_| RecordParseError::Timestamp(timestamp.to_string()))?;
        let timestamp = Local
            .from_local_datetime(&naive)
            .earliest()
            .ok_or_else(|| RecordParseError::Timestamp(timestamp.to_string()))?;

        Ok(Self {
            severity,
            description: description.to_string(),
            pattern_name: None,
            timestamp,
        })
    }
}

impl fmt::Display for AlertRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_line())
    }
}
