//! Shared type definitions for the Gatewatch service.
//!
//! This crate is the single source of truth for the value types that flow
//! between the reading store, the liveness engine, and the HTTP surface.
//! Types defined here flow downstream to `TypeScript` via `ts-rs` for the
//! dashboard collaborator.
//!
//! # Modules
//!
//! - [`ids`] -- Identifier wrappers (reading IDs, sensor IDs)
//! - [`enums`] -- The [`SensorStatus`] liveness enumeration
//! - [`structs`] -- Core value structs (readings, snapshots, status changes)

pub mod enums;
pub mod ids;
pub mod structs;

// Re-export all public types at crate root for convenience.
pub use enums::SensorStatus;
pub use ids::{ReadingId, SensorId};
pub use structs::{Reading, SensorSnapshot, StatusChange};
