//! Scan tokens encoded into participant QR codes.
//!
//! A token has the shape `<event-uuid>-<unix micros>-<9 alphanumerics>`.
//! Issuance performs no registry lookup; the persistence layer holds a
//! unique index and reports collisions as
//! [`crate::domain::ports::ParticipantRepositoryError::DuplicateToken`].

use std::sync::{Arc, Mutex, PoisonError};

use mockable::Clock;
use rand::distributions::Alphanumeric;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

const SUFFIX_LEN: usize = 9;

/// Opaque participant token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ScanToken(String);

/// Raised when a token string is empty once trimmed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("scan token must not be blank")]
pub struct BlankScanToken;

impl ScanToken {
    /// Validate and wrap an existing token, e.g. one read from a scanner.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::ScanToken;
    ///
    /// let token = ScanToken::new(" abc ").expect("non-blank token");
    /// assert_eq!(token.as_str(), "abc");
    /// assert!(ScanToken::new("  ").is_err());
    /// ```
    pub fn new(value: impl AsRef<str>) -> Result<Self, BlankScanToken> {
        let trimmed = value.as_ref().trim();
        if trimmed.is_empty() {
            return Err(BlankScanToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ScanToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for ScanToken {
    type Error = BlankScanToken;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ScanToken> for String {
    fn from(value: ScanToken) -> Self {
        value.0
    }
}

/// Issues fresh tokens from the clock and a seeded generator.
pub struct ScanTokenGenerator {
    clock: Arc<dyn Clock>,
    rng: Mutex<SmallRng>,
}

impl ScanTokenGenerator {
    /// Build a generator seeded from OS entropy.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_rng(clock, SmallRng::from_entropy())
    }

    /// Build a generator with an explicit random source.
    pub fn with_rng(clock: Arc<dyn Clock>, rng: SmallRng) -> Self {
        Self {
            clock,
            rng: Mutex::new(rng),
        }
    }

    /// Issue a token for a participant of `event_id`.
    pub fn issue(&self, event_id: Uuid) -> ScanToken {
        let micros = self.clock.utc().timestamp_micros();
        let suffix: String = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            (&mut *rng)
                .sample_iter(&Alphanumeric)
                .take(SUFFIX_LEN)
                .map(char::from)
                .collect()
        };
        ScanToken(format!("{event_id}-{micros}-{suffix}"))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use chrono::{TimeZone, Utc};
    use rstest::rstest;

    use super::*;
    use crate::test_support::clock::MutableClock;

    fn fixed_clock() -> Arc<MutableClock> {
        Arc::new(MutableClock::new(
            Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0)
                .single()
                .expect("valid time"),
        ))
    }

    #[rstest]
    fn issued_tokens_embed_event_and_timestamp() {
        let clock = fixed_clock();
        let generator = ScanTokenGenerator::with_rng(clock.clone(), SmallRng::seed_from_u64(7));
        let event_id = Uuid::new_v4();

        let token = generator.issue(event_id);
        let micros = clock.utc().timestamp_micros();
        let prefix = format!("{event_id}-{micros}-");

        assert!(token.as_str().starts_with(&prefix));
        let suffix = &token.as_str()[prefix.len()..];
        assert_eq!(suffix.len(), SUFFIX_LEN);
        assert!(suffix.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[rstest]
    fn hundred_thousand_tokens_in_one_instant_are_distinct() {
        let generator = ScanTokenGenerator::new(fixed_clock());
        let event_id = Uuid::new_v4();

        let tokens: HashSet<ScanToken> = (0..100_000).map(|_| generator.issue(event_id)).collect();

        assert_eq!(tokens.len(), 100_000);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_tokens_are_rejected(#[case] raw: &str) {
        assert_eq!(ScanToken::new(raw), Err(BlankScanToken));
    }

    #[rstest]
    fn deserialising_validates_tokens() {
        let parsed: Result<ScanToken, _> = serde_json::from_str("\"  \"");
        assert!(parsed.is_err());
    }
}
