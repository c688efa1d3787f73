//! Clock capability: the current instant plus the host's civil timezone.
//!
//! Conversion branches that interpret a bare time string ("treat it as my
//! local time") depend on the machine's configured zone. That ambient state
//! lives behind this trait so tests can pin both the instant and the zone.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

/// Source of "now" and of the host's own timezone.
pub trait Clock: Send + Sync {
    /// Current absolute instant.
    fn now(&self) -> DateTime<Utc>;

    /// The host machine's civil timezone. UTC when it cannot be determined.
    fn local_zone(&self) -> Tz;
}

/// Real clock backed by the system time and the OS timezone configuration.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn local_zone(&self) -> Tz {
        iana_time_zone::get_timezone()
            .ok()
            .and_then(|name| name.parse().ok())
            .unwrap_or(Tz::UTC)
    }
}

/// Deterministic clock (for testing).
pub struct FixedClock {
    instant: DateTime<Utc>,
    zone: Tz,
}

impl FixedClock {
    pub fn new(instant: DateTime<Utc>, zone: Tz) -> Self {
        Self { instant, zone }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.instant
    }

    fn local_zone(&self) -> Tz {
        self.zone
    }
}
