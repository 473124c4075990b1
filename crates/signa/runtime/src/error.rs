use thiserror::Error;

/// Errors raised while setting up or tearing down a session
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// Invalid session configuration
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A session task panicked or was aborted
    #[error("session task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    // Every variant is a setup or teardown failure; registry problems are
    // reported by the registry crate before a session exists.
    fn is_setup_failure(err: &RuntimeError) -> bool {
        match err {
            RuntimeError::Config(_) => true,
            RuntimeError::TaskJoin(_) => false,
        }
    }

    #[test]
    fn config_error_display() {
        let err = RuntimeError::Config("buffer.capacity must be at least 1".into());
        assert!(is_setup_failure(&err));
        assert_eq!(
            err.to_string(),
            "invalid configuration: buffer.capacity must be at least 1"
        );
    }
}
