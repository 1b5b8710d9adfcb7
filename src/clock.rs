//! Clock abstraction for date/time reads.
//!
//! Every operation that observes "now" goes through an injected [`Clock`] so
//! tests can pin time instead of depending on the wall clock.

use chrono::{DateTime, NaiveDate, Utc};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// The current instant.
    fn now(&self) -> DateTime<Utc>;

    /// The current calendar date (UTC).
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

/// Wall-clock implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock for testing.
#[cfg(any(test, feature = "test-support"))]
pub mod test {
    use super::*;
    use chrono::Duration;
    use std::sync::{Arc, RwLock};

    /// A clock pinned to a settable instant.
    ///
    /// Cheap to clone; clones share the same instant so a test can advance
    /// time while the engine holds its own handle.
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        instant: Arc<RwLock<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a clock pinned to the given instant.
        #[must_use]
        pub fn at(instant: DateTime<Utc>) -> Self {
            Self {
                instant: Arc::new(RwLock::new(instant)),
            }
        }

        /// Create a clock pinned to midnight (UTC) of the given date.
        ///
        /// # Panics
        ///
        /// Panics if the date components are out of range (test helper).
        #[must_use]
        pub fn at_date(year: i32, month: u32, day: u32) -> Self {
            let date = NaiveDate::from_ymd_opt(year, month, day)
                .expect("valid test date")
                .and_hms_opt(0, 0, 0)
                .expect("valid test time");
            Self::at(DateTime::from_naive_utc_and_offset(date, Utc))
        }

        /// Move the clock to a new instant.
        pub fn set(&self, instant: DateTime<Utc>) {
            *self.instant.write().unwrap() = instant;
        }

        /// Advance the clock by a duration.
        pub fn advance(&self, by: Duration) {
            let mut instant = self.instant.write().unwrap();
            *instant += by;
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            *self.instant.read().unwrap()
        }
    }
}
