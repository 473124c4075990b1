//! Alert sinks: where rendered alert records end up

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use signa_types::{AlertRecord, Severity};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use crate::error::{AlertError, AlertResult};

/// Destination for alert records
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one record
    async fn deliver(&self, record: &AlertRecord) -> AlertResult<()>;

    /// Short name used in logs
    fn name(&self) -> &str;
}

/// In-memory sink that keeps every record, for tests and status views
pub struct MemoryAlertSink {
    records: RwLock<Vec<AlertRecord>>,
}

impl MemoryAlertSink {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    /// All delivered records, oldest first
    pub fn records(&self) -> Vec<AlertRecord> {
        self.records.read().clone()
    }

    /// Delivered records as log lines
    pub fn lines(&self) -> Vec<String> {
        self.records.read().iter().map(AlertRecord::render_line).collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    pub fn clear(&self) {
        self.records.write().clear();
    }
}

impl Default for MemoryAlertSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AlertSink for MemoryAlertSink {
    async fn deliver(&self, record: &AlertRecord) -> AlertResult<()> {
        self.records.write().push(record.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

/// Writes the alert line to the operator log at a level matching its severity
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAlertSink;

#[async_trait]
impl AlertSink for TracingAlertSink {
    async fn deliver(&self, record: &AlertRecord) -> AlertResult<()> {
        let line = record.render_line();
        let pattern = record.pattern_name.as_deref().unwrap_or("-");
        match record.severity {
            Severity::Critical => error!(target: "signa::alert", pattern, "{line}"),
            Severity::High => warn!(target: "signa::alert", pattern, "{line}"),
            Severity::Low => info!(target: "signa::alert", pattern, "{line}"),
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "tracing"
    }
}

/// Forwards records to a presentation layer (popup, sound player, UI)
pub struct ChannelAlertSink {
    sender: mpsc::Sender<AlertRecord>,
}

impl ChannelAlertSink {
    pub fn new(sender: mpsc::Sender<AlertRecord>) -> Self {
        Self { sender }
    }

    /// Create a sink together with the receiving end
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<AlertRecord>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        (Self::new(sender), receiver)
    }
}

#[async_trait]
impl AlertSink for ChannelAlertSink {
    async fn deliver(&self, record: &AlertRecord) -> AlertResult<()> {
        self.sender
            .send(record.clone())
            .await
            .map_err(|_| AlertError::ChannelClosed)
    }

    fn name(&self) -> &str {
        "channel"
    }
}

/// Fans a record out to several sinks.
///
/// Every member is attempted even when an earlier one fails; the first
/// failure is returned.
pub struct CompositeSink {
    sinks: Vec<Arc<dyn AlertSink>>,
}

impl CompositeSink {
    pub fn new(sinks: Vec<Arc<dyn AlertSink>>) -> Self {
        Self { sinks }
    }

    pub fn add(&mut self, sink: Arc<dyn AlertSink>) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

#[async_trait]
impl AlertSink for CompositeSink {
    async fn deliver(&self, record: &AlertRecord) -> AlertResult<()> {
        if self.sinks.is_empty() {
            return Err(AlertError::NoSinks);
        }

        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(err) = sink.deliver(record).await {
                warn!(sink = sink.name(), error = %err, "member sink failed");
                first_error.get_or_insert(err);
            }
        }

        match first_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "composite"
    }
}
