#![deny(unsafe_code)]
//! # signa-types
//!
//! Shared vocabulary for the Signa detection pipeline.
//!
//! - [`Symbol`]: the closed gesture alphabet a classifier can report
//! - [`PatternDefinition`]: one emergency signature (symbol sequence + metadata)
//! - [`PatternEvent`] / [`ConfirmedSymbolEvent`]: what the pipeline emits
//! - [`AlertRecord`]: the single-line alert log format consumed by dispatchers

pub mod error;
pub mod event;
pub mod pattern;
pub mod record;
pub mod symbol;

pub use error::{ParseSeverityError, RecordParseError, SymbolError};
pub use event::{ConfirmedSymbolEvent, PatternEvent};
pub use pattern::{ActionTag, PatternDefinition, Severity};
pub use record::AlertRecord;
pub use symbol::{render_sequence, Symbol};
