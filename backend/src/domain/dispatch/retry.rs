//! Time seams for transport retries: how the engine waits, and how much it
//! spreads out retries that would otherwise land together.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Waits between send attempts.
#[async_trait]
pub trait DispatchSleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Stretches a backoff delay so parallel sends throttled at the same moment
/// do not all retry together.
///
/// Implementations must return at least `base`; the engine still caps the
/// result at the configured maximum backoff.
///
/// ```rust
/// use std::time::Duration;
///
/// use backend::domain::dispatch::BackoffJitter;
/// use chrono::{DateTime, TimeZone, Utc};
///
/// struct Doubling;
///
/// impl BackoffJitter for Doubling {
///     fn jittered_delay(&self, base: Duration, _attempt: u32, _now: DateTime<Utc>) -> Duration {
///         base * 2
///     }
/// }
///
/// let now = Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).single().expect("valid time");
/// assert_eq!(Doubling.jittered_delay(Duration::from_millis(100), 1, now), Duration::from_millis(200));
/// ```
pub trait BackoffJitter: Send + Sync {
    fn jittered_delay(&self, base: Duration, attempt: u32, now: DateTime<Utc>) -> Duration;
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl DispatchSleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Adds between zero and a quarter of `base`, picked from the sub-second
/// part of the clock mixed with the attempt number.
#[derive(Debug, Clone, Copy, Default)]
pub struct AttemptJitter;

impl BackoffJitter for AttemptJitter {
    fn jittered_delay(&self, base: Duration, attempt: u32, now: DateTime<Utc>) -> Duration {
        let window = base / 4;
        let window_nanos = u64::try_from(window.as_nanos()).unwrap_or(u64::MAX);
        if window_nanos == 0 {
            return base;
        }
        let seed = u64::from(now.timestamp_subsec_nanos())
            .wrapping_mul(0x9E37_79B9_7F4A_7C15)
            .rotate_left(attempt);
        base.saturating_add(Duration::from_nanos(seed % (window_nanos + 1)))
    }
}
