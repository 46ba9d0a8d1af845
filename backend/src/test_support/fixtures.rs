//! Builders for events and participants.

use std::collections::BTreeMap;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use crate::domain::{
    AdminId, Event, EventDraft, Participant, ParticipantDraft, PaymentDetails, ScanToken,
};

/// An event with the given name and date, owned by a random admin.
pub fn event_on(name: &str, date: DateTime<Utc>) -> Event {
    match Event::new(
        Uuid::new_v4(),
        AdminId::random(),
        EventDraft {
            name: name.to_owned(),
            date,
            description: String::new(),
        },
        date,
    ) {
        Ok(event) => event,
        Err(error) => panic!("fixture event must be valid: {error}"),
    }
}

/// `DevFest` on 5 March 2026.
pub fn sample_event() -> Event {
    let date = match Utc.with_ymd_and_hms(2026, 3, 5, 9, 0, 0).single() {
        Some(date) => date,
        None => panic!("fixture date must be valid"),
    };
    event_on("DevFest", date)
}

/// Fluent builder for [`Participant`] values.
pub struct ParticipantBuilder {
    draft: ParticipantDraft,
    attended_at: Option<DateTime<Utc>>,
    receipt_sent: bool,
}

impl ParticipantBuilder {
    pub fn new(event_id: Uuid, name: &str, email: &str) -> Self {
        let id = Uuid::new_v4();
        let token = match ScanToken::new(format!("{event_id}-{id}")) {
            Ok(token) => token,
            Err(error) => panic!("fixture token must be valid: {error}"),
        };
        Self {
            draft: ParticipantDraft {
                id,
                event_id,
                name: name.to_owned(),
                email: email.to_owned(),
                phone: String::new(),
                token,
                payment: PaymentDetails::default(),
                extension_fields: BTreeMap::new(),
            },
            attended_at: None,
            receipt_sent: false,
        }
    }

    pub fn token(mut self, token: &str) -> Self {
        self.draft.token = match ScanToken::new(token) {
            Ok(token) => token,
            Err(error) => panic!("fixture token must be valid: {error}"),
        };
        self
    }

    pub fn phone(mut self, phone: &str) -> Self {
        self.draft.phone = phone.to_owned();
        self
    }

    pub fn transaction_id(mut self, transaction_id: &str) -> Self {
        self.draft.payment.transaction_id = transaction_id.to_owned();
        self
    }

    pub fn amount(mut self, amount: &str) -> Self {
        self.draft.payment.amount = amount.to_owned();
        self
    }

    pub fn attended_at(mut self, at: DateTime<Utc>) -> Self {
        self.attended_at = Some(at);
        self
    }

    pub fn receipt_sent(mut self) -> Self {
        self.receipt_sent = true;
        self
    }

    pub fn build(self) -> Participant {
        let mut participant = match Participant::new(self.draft) {
            Ok(participant) => participant,
            Err(error) => panic!("fixture participant must be valid: {error}"),
        };
        if let Some(at) = self.attended_at {
            participant.record_attendance(at);
        }
        if self.receipt_sent {
            participant.set_delivery_flag(crate::domain::DeliveryFlag::ReceiptSent);
        }
        participant
    }
}
