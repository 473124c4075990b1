#![deny(unsafe_code)]
//! # signa-alerts
//!
//! The boundary between detection and side effects. The pipeline hands
//! [`PatternEvent`](signa_types::PatternEvent)s to an [`AlertDispatcher`],
//! which never blocks the caller; a background worker renders each event as
//! an [`AlertRecord`](signa_types::AlertRecord) and delivers it to an
//! [`AlertSink`].
//!
//! Sink failures are logged and counted. They never reach the pipeline.

pub mod dispatcher;
pub mod error;
pub mod sink;

pub use dispatcher::{AlertDispatcher, DispatchStats};
pub use error::{AlertError, AlertResult};
pub use sink::{AlertSink, ChannelAlertSink, CompositeSink, MemoryAlertSink, TracingAlertSink};
