//! Enumeration types for the Gatewatch service.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Derived liveness status of a gate sensor.
///
/// A sensor is `ONLINE` from the moment its first reading is ingested and
/// stays so as long as readings keep arriving. The periodic sweep demotes a
/// sensor to `OFFLINE` once its most recent reading is older than the
/// configured timeout; the next ingested reading promotes it back.
///
/// Serialized as the strings `"ONLINE"` / `"OFFLINE"` -- the dashboard
/// matches on those exact values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export, export_to = "bindings/")]
pub enum SensorStatus {
    /// The sensor has reported recently enough to be considered alive.
    Online,
    /// The sensor has been silent for longer than the offline timeout.
    Offline,
}

impl SensorStatus {
    /// Whether this status is [`SensorStatus::Online`].
    pub const fn is_online(self) -> bool {
        matches!(self, Self::Online)
    }
}

impl core::fmt::Display for SensorStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Online => write!(f, "ONLINE"),
            Self::Offline => write!(f, "OFFLINE"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_serializes_screaming() {
        assert_eq!(
            serde_json::to_string(&SensorStatus::Online).ok().as_deref(),
            Some("\"ONLINE\"")
        );
        assert_eq!(
            serde_json::to_string(&SensorStatus::Offline).ok().as_deref(),
            Some("\"OFFLINE\"")
        );
    }

    #[test]
    fn status_display_matches_wire_format() {
        assert_eq!(SensorStatus::Online.to_string(), "ONLINE");
        assert_eq!(SensorStatus::Offline.to_string(), "OFFLINE");
        assert!(SensorStatus::Online.is_online());
        assert!(!SensorStatus::Offline.is_online());
    }
}
