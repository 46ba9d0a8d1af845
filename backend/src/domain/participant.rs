//! Participant records scoped to one event.
//!
//! Participants are created by the roster importer, move from not attended
//! to attended exactly once, and carry per-message-type delivery flags that
//! are only set after a confirmed send.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::ScanToken;

/// Payment sub-record imported with the roster.
///
/// Every field defaults to the empty string; absent data is never `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentDetails {
    pub transaction_id: String,
    pub transaction_time: String,
    pub amount: String,
    pub payment_mode: String,
}

impl PaymentDetails {
    /// A participant "has payment" when a transaction id was recorded.
    pub fn has_payment(&self) -> bool {
        !self.transaction_id.trim().is_empty()
    }
}

/// Per-message-type delivery flags persisted on the participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeliveryFlag {
    /// A payment receipt was confirmed sent.
    ReceiptSent,
}

impl DeliveryFlag {
    /// Stable snake_case label used in logs and reports.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ReceiptSent => "receipt_sent",
        }
    }
}

/// Validation failures raised while constructing a [`Participant`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParticipantValidationError {
    #[error("participant name must not be blank")]
    EmptyName,
    #[error("participant email must not be blank")]
    EmptyEmail,
}

/// Input payload for [`Participant::new`].
#[derive(Debug, Clone)]
pub struct ParticipantDraft {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub token: ScanToken,
    pub payment: PaymentDetails,
    pub extension_fields: BTreeMap<String, String>,
}

/// One attendee of one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    id: Uuid,
    event_id: Uuid,
    name: String,
    email: String,
    phone: String,
    token: ScanToken,
    attended_at: Option<DateTime<Utc>>,
    payment: PaymentDetails,
    receipt_sent: bool,
    extension_fields: BTreeMap<String, String>,
}

impl Participant {
    /// Create a participant that has not attended and has no delivery flags.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{Participant, ParticipantDraft, PaymentDetails, ScanToken};
    /// use uuid::Uuid;
    ///
    /// let participant = Participant::new(ParticipantDraft {
    ///     id: Uuid::new_v4(),
    ///     event_id: Uuid::new_v4(),
    ///     name: "Alice".into(),
    ///     email: "a@x.io".into(),
    ///     phone: String::new(),
    ///     token: ScanToken::new("tok-1").expect("token"),
    ///     payment: PaymentDetails::default(),
    ///     extension_fields: Default::default(),
    /// })
    /// .expect("valid participant");
    /// assert!(!participant.attended());
    /// ```
    pub fn new(draft: ParticipantDraft) -> Result<Self, ParticipantValidationError> {
        let name = draft.name.trim();
        if name.is_empty() {
            return Err(ParticipantValidationError::EmptyName);
        }
        let email = draft.email.trim();
        if email.is_empty() {
            return Err(ParticipantValidationError::EmptyEmail);
        }

        Ok(Self {
            id: draft.id,
            event_id: draft.event_id,
            name: name.to_owned(),
            email: email.to_owned(),
            phone: draft.phone.trim().to_owned(),
            token: draft.token,
            attended_at: None,
            payment: draft.payment,
            receipt_sent: false,
            extension_fields: draft.extension_fields,
        })
    }

    /// Record the first attendance. Returns `false`, leaving the original
    /// timestamp untouched, when already attended.
    pub fn record_attendance(&mut self, at: DateTime<Utc>) -> bool {
        if self.attended_at.is_some() {
            return false;
        }
        self.attended_at = Some(at);
        true
    }

    /// Set a delivery flag after a confirmed send.
    pub fn set_delivery_flag(&mut self, flag: DeliveryFlag) {
        match flag {
            DeliveryFlag::ReceiptSent => self.receipt_sent = true,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn phone(&self) -> &str {
        self.phone.as_str()
    }

    pub fn token(&self) -> &ScanToken {
        &self.token
    }

    pub fn attended(&self) -> bool {
        self.attended_at.is_some()
    }

    pub fn attended_at(&self) -> Option<DateTime<Utc>> {
        self.attended_at
    }

    pub fn payment(&self) -> &PaymentDetails {
        &self.payment
    }

    pub fn has_payment(&self) -> bool {
        self.payment.has_payment()
    }

    pub fn receipt_sent(&self) -> bool {
        self.receipt_sent
    }

    /// Whether `flag` is currently set.
    pub fn has_delivery_flag(&self, flag: DeliveryFlag) -> bool {
        match flag {
            DeliveryFlag::ReceiptSent => self.receipt_sent,
        }
    }

    /// Free-form columns carried through from import.
    pub fn extension_fields(&self) -> &BTreeMap<String, String> {
        &self.extension_fields
    }
}

/// Canonical form used to compare emails within an event.
pub fn normalise_email(email: &str) -> String {
    email.trim().to_lowercase()
}
