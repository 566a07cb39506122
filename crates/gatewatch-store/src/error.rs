//! Error types for the reading store.

/// Errors a [`ReadingStore`](crate::ReadingStore) implementation can surface.
///
/// The in-memory store never produces these; they exist so database-backed
/// implementations have a typed surface to map their failures onto, and so
/// callers (ingestion, the sweep) can be written against real failure modes.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The storage backend could not be reached or refused the operation.
    #[error("storage unavailable: {message}")]
    Unavailable {
        /// Description of the backend failure.
        message: String,
    },

    /// The storage backend did not answer within its deadline.
    #[error("storage timed out: {message}")]
    Timeout {
        /// Description of the timed-out operation.
        message: String,
    },
}
