use thiserror::Error;

/// Errors raised while delivering alerts
#[derive(Debug, Error)]
pub enum AlertError {
    /// A sink could not deliver the record
    #[error("sink '{sink}' failed: {reason}")]
    Sink { sink: String, reason: String },

    /// The receiving side of a channel sink went away
    #[error("alert channel closed")]
    ChannelClosed,

    /// A composite sink was built without members
    #[error("no sinks configured")]
    NoSinks,
}

impl AlertError {
    pub fn sink(sink: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Sink {
            sink: sink.into(),
            reason: reason.into(),
        }
    }
}

/// Result type for alert delivery
pub type AlertResult<T> = Result<T, AlertError>;
