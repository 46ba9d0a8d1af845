//! A clock tests can move forward by hand.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use chrono::{DateTime, Local, Utc};
use mockable::Clock;

/// Reports a fixed instant until [`MutableClock::advance`] moves it.
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
}

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Move the clock forward.
    ///
    /// # Panics
    /// When `by` does not fit a chrono `TimeDelta`.
    pub fn advance(&self, by: Duration) {
        let Ok(by) = chrono::TimeDelta::from_std(by) else {
            panic!("{by:?} is out of range for the test clock");
        };
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().into()
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
