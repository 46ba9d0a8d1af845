//! Driving port for bulk participant mail.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::dispatch::{DispatchReport, RecipientSelection};

/// Sends one message family to an event's eligible participants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantMailing: Send + Sync {
    /// QR codes for every selected participant.
    async fn send_qr_codes(
        &self,
        event_id: Uuid,
        selection: RecipientSelection,
    ) -> Result<DispatchReport, Error>;

    /// Receipts for selected participants with a transaction id.
    async fn send_receipts(
        &self,
        event_id: Uuid,
        selection: RecipientSelection,
    ) -> Result<DispatchReport, Error>;

    /// Certificates for selected participants who attended.
    async fn send_certificates(
        &self,
        event_id: Uuid,
        selection: RecipientSelection,
    ) -> Result<DispatchReport, Error>;

    /// A free-form notice. Blank subject or body fails before any send.
    async fn send_notice(
        &self,
        event_id: Uuid,
        selection: RecipientSelection,
        subject: String,
        body: String,
    ) -> Result<DispatchReport, Error>;
}
