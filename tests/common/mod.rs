use std::sync::{Arc, RwLock};

use chrono::{DateTime, Duration, TimeZone, Utc};
use forecourt::Clock;

/// A manually driven clock. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct ManualClock {
    instant: Arc<RwLock<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn at_date(year: i32, month: u32, day: u32) -> Self {
        let instant = Utc
            .with_ymd_and_hms(year, month, day, 9, 0, 0)
            .single()
            .unwrap();
        Self {
            instant: Arc::new(RwLock::new(instant)),
        }
    }

    pub fn advance(&self, by: Duration) {
        let mut instant = self.instant.write().unwrap();
        *instant += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.instant.read().unwrap()
    }
}
