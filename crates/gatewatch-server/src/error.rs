//! Error types for the server binary.
//!
//! [`ServiceError`] is the top-level error type that wraps all possible
//! failure modes during startup.

/// Top-level error for the server binary.
///
/// Each variant wraps a specific subsystem error, providing a single error
/// type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Configuration loading or validation failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: gatewatch_core::ConfigError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: gatewatch_api::ServerError,
    },
}
