//! HTTP + `WebSocket` surface for the Gatewatch service.
//!
//! A thin Axum layer over the liveness engine: sensors POST readings in,
//! the dashboard polls the snapshot out, and a `WebSocket` stream pushes
//! status changes to anyone who would rather not poll. All state lives in
//! the engine; handlers only translate between HTTP and engine calls.
//!
//! # Modules
//!
//! - [`state`] -- Shared [`AppState`](state::AppState) injected into handlers
//! - [`router`] -- Route table + CORS/trace middleware
//! - [`handlers`] -- REST endpoint handlers
//! - [`ws`] -- Status-change `WebSocket` stream
//! - [`error`] -- HTTP error mapping
//! - [`server`] -- Bind/serve lifecycle

pub mod error;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

pub use router::build_router;
pub use server::{start_server, ServerError};
pub use state::AppState;
