//! Store error types

/// Errors raised by the list-view store itself.
#[derive(Debug, Clone, thiserror::Error)]
pub enum StoreError {
    /// The store was built outside of a tokio runtime and no handle was given.
    #[error("No tokio runtime available to drive list requests")]
    NoRuntime,

    /// A request task panicked or was cancelled before it resolved.
    #[error("Request task failed: {0}")]
    Task(String),
}
