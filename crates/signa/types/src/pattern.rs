use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseSeverityError;
use crate::symbol::{self, render_sequence, Symbol};

/// Urgency attached to an emergency pattern.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    High,
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "high" => Ok(Self::High),
            "critical" => Ok(Self::Critical),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}

/// Opaque tag naming the response an alert should trigger downstream.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionTag(String);

impl ActionTag {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An emergency signature: a fixed symbol sequence plus how to react to it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternDefinition {
    /// Unique name within a registry.
    pub name: String,
    /// Symbols to match, stored on disk as a literal such as `"ABC"`.
    #[serde(with = "symbol::literal")]
    pub pattern: Vec<Symbol>,
    pub severity: Severity,
    pub action: ActionTag,
    /// Human-readable description, rendered into alert log lines.
    #[serde(default)]
    pub description: String,
}

impl PatternDefinition {
    pub fn new(
        name: impl Into<String>,
        pattern: Vec<Symbol>,
        severity: Severity,
        action: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern,
            severity,
            action: ActionTag::new(action),
            description: description.into(),
        }
    }

    /// The pattern as a compact literal (`"ACACAC"`).
    pub fn literal(&self) -> String {
        render_sequence(&self.pattern)
    }

    pub fn len(&self) -> usize {
        self.pattern.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pattern.is_empty()
    }
}
