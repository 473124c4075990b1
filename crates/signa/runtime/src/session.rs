//! Producer/consumer session.
//!
//! ```text
//! Classifier --(producer, every frame interval)--> raw frame queue (drop-oldest)
//!     --(consumer)--> Pipeline --> AlertDispatcher --> AlertSink
//!                        |--> watch: PipelineSnapshot
//!                        |--> broadcast: SessionEvent
//! ```
//!
//! The consumer task is the only owner of the pipeline; outside readers get
//! snapshot copies.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use signa_alerts::{AlertDispatcher, AlertSink};
use signa_registry::PatternRegistry;
use signa_types::Symbol;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use uuid::Uuid;

use crate::classifier::Classifier;
use crate::config::SessionConfig;
use crate::error::RuntimeResult;
use crate::event::{SessionEvent, SessionReport};
use crate::pipeline::{Pipeline, PipelineSnapshot};

const EVENT_CHANNEL_CAPACITY: usize = 256;

/// One classified frame on its way from capture to the pipeline
#[derive(Debug, Clone, Copy)]
struct RawFrame {
    symbol: Option<Symbol>,
    captured_at: Instant,
    wall: DateTime<Utc>,
}

/// Entry point for live detection sessions
pub struct Session;

impl Session {
    /// Validate the setup and spawn the producer and consumer tasks on the
    /// current tokio runtime.
    pub fn start<C>(
        config: SessionConfig,
        registry: PatternRegistry,
        classifier: C,
        sink: Arc<dyn AlertSink>,
    ) -> RuntimeResult<SessionHandle>
    where
        C: Classifier + 'static,
    {
        let pipeline = Pipeline::new(&config, &registry)?;
        let id = Uuid::new_v4();

        let (frame_tx, frame_rx) = broadcast::channel(config.capture.queue_capacity);
        let (stop_tx, stop_rx) = watch::channel(false);
        let (status_tx, status_rx) = watch::channel(pipeline.snapshot());
        let (events_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (done_tx, done_rx) = watch::channel(false);

        let dispatcher = AlertDispatcher::spawn(sink, config.dispatch.queue_capacity);

        info!(
            session = %id,
            patterns = registry.len(),
            strategy = %config.strategy,
            frame_interval_ms = config.capture.frame_interval_ms,
            "session started"
        );

        let producer = tokio::spawn(produce(
            classifier,
            frame_tx,
            config.capture.frame_interval(),
            stop_rx,
        ));
        let consumer = tokio::spawn(consume(
            id,
            pipeline,
            frame_rx,
            dispatcher,
            events_tx.clone(),
            status_tx,
            done_tx,
        ));

        Ok(SessionHandle {
            id,
            stop_tx,
            status_rx,
            done_rx,
            events_tx,
            producer,
            consumer,
        })
    }
}

/// Control handle for a running session
pub struct SessionHandle {
    id: Uuid,
    stop_tx: watch::Sender<bool>,
    status_rx: watch::Receiver<PipelineSnapshot>,
    done_rx: watch::Receiver<bool>,
    events_tx: broadcast::Sender<SessionEvent>,
    producer: JoinHandle<()>,
    consumer: JoinHandle<SessionReport>,
}

impl SessionHandle {
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Receive session events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events_tx.subscribe()
    }

    /// Latest pipeline snapshot
    pub fn status(&self) -> PipelineSnapshot {
        self.status_rx.borrow().clone()
    }

    /// Watch pipeline snapshots as they change
    pub fn watch_status(&self) -> watch::Receiver<PipelineSnapshot> {
        self.status_rx.clone()
    }

    /// Ask capture to stop; frames already queued are still processed.
    pub fn stop(&self) {
        self.stop_tx.send_replace(true);
    }

    /// Resolve once the pipeline task has finished, however it ended.
    pub async fn wait_stopped(&self) {
        let mut done = self.done_rx.clone();
        let _ = done.wait_for(|done| *done).await;
    }

    /// Whether both tasks have finished
    pub fn is_finished(&self) -> bool {
        self.producer.is_finished() && self.consumer.is_finished()
    }

    /// Wait for the session to end and return its report.
    pub async fn join(self) -> RuntimeResult<SessionReport> {
        self.producer.await?;
        let report = self.consumer.await?;
        Ok(report)
    }

    /// Stop and wait.
    pub async fn shutdown(self) -> RuntimeResult<SessionReport> {
        self.stop();
        self.join().await
    }
}

async fn produce<C: Classifier>(
    mut classifier: C,
    frames: broadcast::Sender<RawFrame>,
    interval: Duration,
    mut stop: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = stop.changed() => break,
            _ = ticker.tick() => {
                if classifier.is_exhausted() {
                    debug!("classifier exhausted");
                    break;
                }
                let frame = RawFrame {
                    symbol: classifier.next_symbol(),
                    captured_at: tokio::time::Instant::now().into_std(),
                    wall: Utc::now(),
                };
                if frames.send(frame).is_err() {
                    // Consumer is gone.
                    break;
                }
            }
        }
    }
}

async fn consume(
    id: Uuid,
    mut pipeline: Pipeline,
    mut frames: broadcast::Receiver<RawFrame>,
    dispatcher: AlertDispatcher,
    events: broadcast::Sender<SessionEvent>,
    status: watch::Sender<PipelineSnapshot>,
    done: watch::Sender<bool>,
) -> SessionReport {
    let mut frames_dropped = 0u64;

    loop {
        match frames.recv().await {
            Ok(frame) => {
                let outcome = pipeline.tick(frame.symbol, frame.captured_at, frame.wall);
                if let Some(confirmed) = outcome.confirmed {
                    let _ = events.send(SessionEvent::Confirmed(confirmed));
                }
                for event in outcome.events {
                    let _ = events.send(SessionEvent::Pattern(event.clone()));
                    dispatcher.dispatch(event);
                }
                status.send_replace(pipeline.snapshot());
            }
            Err(broadcast::error::RecvError::Lagged(count)) => {
                frames_dropped += count;
                debug!(count, "pipeline behind capture, dropped oldest frames");
                let _ = events.send(SessionEvent::FramesDropped { count });
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }

    let dispatch = dispatcher.shutdown().await;
    let report = SessionReport {
        session_id: id,
        ticks: pipeline.ticks(),
        confirmed_symbols: pipeline.confirmed_symbols(),
        alerts: pipeline.alerts(),
        frames_dropped,
        dispatch,
    };
    info!(
        session = %id,
        ticks = report.ticks,
        alerts = report.alerts,
        frames_dropped,
        "session stopped"
    );
    let _ = events.send(SessionEvent::Stopped(report.clone()));
    done.send_replace(true);
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use signa_alerts::MemoryAlertSink;

    fn frame(symbol: Symbol, base: Instant, offset_ms: u64) -> RawFrame {
        RawFrame {
            symbol: Some(symbol),
            captured_at: base + Duration::from_millis(offset_ms),
            wall: Utc::now(),
        }
    }

    #[tokio::test]
    async fn overflow_drops_the_oldest_frames() {
        let config = SessionConfig::default();
        let pipeline = Pipeline::new(&config, &PatternRegistry::builtin()).unwrap();

        let (frame_tx, frame_rx) = broadcast::channel(2);
        let base = Instant::now();
        for i in 0..5 {
            frame_tx.send(frame(Symbol::A, base, i * 50)).unwrap();
        }
        drop(frame_tx);

        let (events_tx, mut events_rx) = broadcast::channel(16);
        let (status_tx, status_rx) = watch::channel(pipeline.snapshot());
        let (done_tx, done_rx) = watch::channel(false);
        let dispatcher = AlertDispatcher::spawn(Arc::new(MemoryAlertSink::new()), 4);

        let report = consume(
            Uuid::new_v4(),
            pipeline,
            frame_rx,
            dispatcher,
            events_tx,
            status_tx,
            done_tx,
        )
        .await;

        assert_eq!(report.frames_dropped, 3);
        assert_eq!(report.ticks, 2);
        assert_eq!(report.frames_captured(), 5);
        assert!(*done_rx.borrow());

        // Only the two newest frames reached the debouncer.
        let debounce = status_rx.borrow().debounce.clone().unwrap();
        assert_eq!(debounce.candidate, Some(Symbol::A));
        assert_eq!(debounce.run_length, 2);

        assert!(matches!(
            events_rx.try_recv(),
            Ok(SessionEvent::FramesDropped { count: 3 })
        ));
        assert!(matches!(events_rx.try_recv(), Ok(SessionEvent::Stopped(_))));
    }
}
