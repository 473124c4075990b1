use thiserror::Error;

/// Errors raised while turning text into symbols.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SymbolError {
    #[error("unknown symbol '{0}' (expected one of A, B, C, D)")]
    Unknown(char),

    #[error("symbol sequence is empty")]
    EmptySequence,
}

/// A severity name outside `low`, `high`, `critical`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity '{0}' (expected low, high or critical)")]
pub struct ParseSeverityError(pub String);

/// Errors raised while reading an alert log line back.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordParseError {
    #[error("malformed alert line: {0}")]
    Malformed(String),

    #[error("invalid severity in alert line: {0}")]
    Severity(String),

    #[error("invalid timestamp in alert line: {0}")]
    Timestamp(String),
}
