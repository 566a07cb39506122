//! Wall-clock time source shared by ingestion and the sweep.
//!
//! Every instant the service produces -- reading timestamps at ingestion,
//! the `now` a sweep pass compares against -- comes from one [`TimeSource`]
//! holding one named timezone. Mixing clocks between the two paths would
//! let clock skew demote a sensor that just reported (or keep a dead one
//! alive), so the engine takes the time source by handle and never calls
//! [`chrono::Utc::now`] directly.

use chrono::{DateTime, FixedOffset, TimeDelta, Utc};
use chrono_tz::Tz;

/// Source of "now" for timestamping and staleness comparison.
///
/// Implementations must be cheap to call and monotone enough for liveness
/// purposes; the service assumes a correctly configured host clock (an
/// operational precondition, not something defended against at runtime).
pub trait TimeSource: Send + Sync {
    /// The current instant, expressed in the configured timezone.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// System clock pinned to a named timezone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    zone: Tz,
}

impl SystemClock {
    /// Create a system clock for the given zone.
    pub const fn new(zone: Tz) -> Self {
        Self { zone }
    }

    /// The zone this clock stamps instants in.
    pub const fn zone(&self) -> Tz {
        self.zone
    }
}

impl TimeSource for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.zone).fixed_offset()
    }
}

/// Hand-driven clock for tests.
///
/// Starts at a fixed instant and only moves when told to via [`set`] or
/// [`advance`], which makes timeout-boundary behavior exactly testable.
///
/// [`set`]: ManualClock::set
/// [`advance`]: ManualClock::advance
#[derive(Debug)]
pub struct ManualClock {
    now: std::sync::RwLock<DateTime<FixedOffset>>,
}

impl ManualClock {
    /// Create a manual clock frozen at `start`.
    pub const fn new(start: DateTime<FixedOffset>) -> Self {
        Self {
            now: std::sync::RwLock::new(start),
        }
    }

    /// Move the clock to an exact instant (backwards is allowed).
    pub fn set(&self, instant: DateTime<FixedOffset>) {
        let mut guard = self
            .now
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        *guard = instant;
    }

    /// Advance the clock by a delta. Saturates at the representable
    /// maximum instead of overflowing.
    pub fn advance(&self, delta: TimeDelta) {
        let current = self.now();
        if let Some(next) = current.checked_add_signed(delta) {
            self.set(next);
        }
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now
            .read()
            .map_or_else(|poisoned| *poisoned.into_inner(), |guard| *guard)
    }
}
