#![deny(unsafe_code)]
//! # signa-runtime
//!
//! Runs detection sessions on top of the Signa engine.
//!
//! - [`Pipeline`]: debounce, append, match and clear-on-alert for one tick
//! - [`Session`]: a capture task and a pipeline task joined by a bounded,
//!   drop-oldest frame queue
//! - [`Classifier`]: the only thing the runtime needs from a detector
//! - [`replay`]: deterministic offline runs over recorded frames

pub mod classifier;
pub mod config;
pub mod error;
pub mod event;
pub mod pipeline;
pub mod replay;
pub mod session;

pub use classifier::{held_frames, parse_frames, Classifier, ScriptedClassifier, SimulatedClassifier};
pub use config::{BufferConfig, CaptureConfig, DispatchConfig, SessionConfig};
pub use error::{RuntimeError, RuntimeResult};
pub use event::{SessionEvent, SessionReport};
pub use pipeline::{Pipeline, PipelineSnapshot, PipelineState, TickOutcome};
pub use replay::{replay, ReplayReport};
pub use session::{Session, SessionHandle};
