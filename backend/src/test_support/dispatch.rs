//! Stand-ins for the retry seams so dispatch tests never wait on a timer.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::dispatch::{BackoffJitter, DispatchSleeper};

/// Returns from every sleep at once.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateSleeper;

#[async_trait]
impl DispatchSleeper for ImmediateSleeper {
    async fn sleep(&self, _: Duration) {}
}

/// Returns at once and remembers each requested delay.
#[derive(Debug, Default)]
pub struct RecordingSleeper {
    delays: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    /// Delays requested so far, oldest first.
    pub fn recorded(&self) -> Vec<Duration> {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl DispatchSleeper for RecordingSleeper {
    async fn sleep(&self, duration: Duration) {
        self.delays
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(duration);
    }
}

/// Leaves the backoff delay untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoJitter;

impl BackoffJitter for NoJitter {
    fn jittered_delay(&self, base: Duration, _: u32, _: DateTime<Utc>) -> Duration {
        base
    }
}
