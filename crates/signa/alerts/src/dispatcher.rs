//! Non-blocking alert dispatch.
//!
//! [`AlertDispatcher::dispatch`] only enqueues; a spawned worker renders and
//! delivers records in enqueue order. A full queue drops the alert with an
//! error log instead of stalling the detection pipeline.

use std::sync::Arc;

use parking_lot::Mutex;
use serde::Serialize;
use signa_types::{AlertRecord, PatternEvent};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error};

use crate::sink::AlertSink;

/// Counters describing what happened to dispatched alerts
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DispatchStats {
    /// Events accepted into the queue
    pub queued: u64,
    /// Records the sink accepted
    pub delivered: u64,
    /// Records the sink rejected
    pub failed: u64,
    /// Events refused because the queue was full or the worker had stopped
    pub rejected: u64,
}

/// Handle used by the pipeline to hand off pattern events
pub struct AlertDispatcher {
    sender: mpsc::Sender<PatternEvent>,
    stats: Arc<Mutex<DispatchStats>>,
    worker: JoinHandle<()>,
}

impl AlertDispatcher {
    /// Start the delivery worker on the current tokio runtime.
    pub fn spawn(sink: Arc<dyn AlertSink>, capacity: usize) -> Self {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let stats = Arc::new(Mutex::new(DispatchStats::default()));
        let worker = tokio::spawn(deliver_loop(sink, receiver, Arc::clone(&stats)));
        Self {
            sender,
            stats,
            worker,
        }
    }

    /// Enqueue an event for delivery. Never waits.
    ///
    /// Returns false when the event was dropped.
    pub fn dispatch(&self, event: PatternEvent) -> bool {
        match self.sender.try_send(event) {
            Ok(()) => {
                self.stats.lock().queued += 1;
                true
            }
            Err(mpsc::error::TrySendError::Full(event)) => {
                self.stats.lock().rejected += 1;
                error!(pattern = %event.pattern_name, "alert queue full, dropping alert");
                false
            }
            Err(mpsc::error::TrySendError::Closed(event)) => {
                self.stats.lock().rejected += 1;
                error!(pattern = %event.pattern_name, "alert worker stopped, dropping alert");
                false
            }
        }
    }

    /// Current counters
    pub fn stats(&self) -> DispatchStats {
        *self.stats.lock()
    }

    /// Close the queue, wait for queued alerts to be delivered and return the final counters.
    pub async fn shutdown(self) -> DispatchStats {
        let Self {
            sender,
            stats,
            worker,
        } = self;
        drop(sender);

        if let Err(err) = worker.await {
            error!(error = %err, "alert worker terminated abnormally");
        }
        let stats = *stats.lock();
        debug!(?stats, "alert dispatcher stopped");
        stats
    }
}

async fn deliver_loop(
    sink: Arc<dyn AlertSink>,
    mut receiver: mpsc::Receiver<PatternEvent>,
    stats: Arc<Mutex<DispatchStats>>,
) {
    while let Some(event) = receiver.recv().await {
        let record = AlertRecord::from_event(&event);
        match sink.deliver(&record).await {
            Ok(()) => stats.lock().delivered += 1,
            Err(err) => {
                stats.lock().failed += 1;
                error!(
                    sink = sink.name(),
                    pattern = %event.pattern_name,
                    error = %err,
                    "alert delivery failed"
                );
            }
        }
    }
}
