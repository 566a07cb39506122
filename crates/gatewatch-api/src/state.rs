//! Shared application state for the API server.
//!
//! [`AppState`] is a handle to the liveness engine, wrapped in [`Arc`] and
//! injected into handlers via Axum's `State` extractor. The engine owns
//! everything; the API layer never holds sensor state of its own.

use std::sync::Arc;

use gatewatch_core::LivenessEngine;
use gatewatch_types::StatusChange;
use tokio::sync::broadcast;

/// Shared state for the Axum application.
#[derive(Clone)]
pub struct AppState {
    /// The authoritative liveness engine.
    pub engine: Arc<LivenessEngine>,
}

impl AppState {
    /// Create application state over an engine handle.
    pub const fn new(engine: Arc<LivenessEngine>) -> Self {
        Self { engine }
    }

    /// Subscribe to status-change notifications.
    ///
    /// Returns a receiver that yields a [`StatusChange`] for every real
    /// transition the engine decides.
    pub fn subscribe(&self) -> broadcast::Receiver<StatusChange> {
        self.engine.subscribe()
    }
}
