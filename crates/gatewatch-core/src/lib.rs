//! Core of the Gatewatch service: the sensor liveness state machine.
//!
//! This crate owns the authoritative per-sensor state table and the two
//! paths that mutate it: synchronous promotion on ingestion and periodic
//! demotion by the background sweep. It also holds the shared wall clock
//! (one named timezone for both ingestion timestamping and sweep
//! comparison) and the typed configuration loader.
//!
//! # Modules
//!
//! - [`clock`] -- The [`TimeSource`] seam and its system/manual clocks
//! - [`config`] -- YAML configuration with environment overrides
//! - [`engine`] -- The [`LivenessEngine`] state machine
//! - [`sweeper`] -- The permanent background sweep task

pub mod clock;
pub mod config;
pub mod engine;
pub mod sweeper;

pub use clock::{ManualClock, SystemClock, TimeSource};
pub use config::{ConfigError, GatewatchConfig, LivenessConfig, ServerConfig, TimeConfig};
pub use engine::{IngestError, LivenessEngine, SweepSummary};
pub use sweeper::spawn_sweeper;
