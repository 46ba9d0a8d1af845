//! Participant mailing use cases.
//!
//! Each operation narrows the caller's selection to the participants
//! eligible for that message family, then hands the narrowed set to the
//! [`DispatchEngine`] together with the matching producer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::domain::dispatch::{DispatchEngine, DispatchReport, DispatchRequest, RecipientSelection};
use crate::domain::messages::{
    CertificateProducer, MessageProducer, Notice, NoticeProducer, QrCodeProducer, ReceiptProducer,
};
use crate::domain::ports::{
    CertificateRenderer, CodeRenderer, ParticipantMailing, ParticipantRepository,
};
use crate::domain::repository_errors::map_participant_repository_error;
use crate::domain::{Error, Participant};

/// Artifact renderers used by the QR and certificate producers.
pub struct MailingRenderers {
    pub codes: Arc<dyn CodeRenderer>,
    pub certificates: Arc<dyn CertificateRenderer>,
}

/// Mailing service implementing [`ParticipantMailing`].
#[derive(Clone)]
pub struct ParticipantMailingService {
    participants: Arc<dyn ParticipantRepository>,
    engine: DispatchEngine,
    codes: Arc<dyn CodeRenderer>,
    certificates: Arc<dyn CertificateRenderer>,
}

impl ParticipantMailingService {
    pub fn new(
        participants: Arc<dyn ParticipantRepository>,
        engine: DispatchEngine,
        renderers: MailingRenderers,
    ) -> Self {
        Self {
            participants,
            engine,
            codes: renderers.codes,
            certificates: renderers.certificates,
        }
    }

    async fn dispatch_eligible(
        &self,
        event_id: Uuid,
        selection: RecipientSelection,
        producer: Arc<dyn MessageProducer>,
        eligible: fn(&Participant) -> bool,
    ) -> Result<DispatchReport, Error> {
        let selected = self
            .participants
            .list_for_event(&event_id, &selection)
            .await
            .map_err(map_participant_repository_error)?;
        let ids: Vec<Uuid> = selected
            .iter()
            .filter(|participant| eligible(participant))
            .map(Participant::id)
            .collect();
        debug!(
            %event_id,
            kind = %producer.kind(),
            selected = selected.len(),
            eligible = ids.len(),
            "recipients filtered"
        );

        self.engine
            .dispatch(DispatchRequest {
                event_id,
                recipients: RecipientSelection::Only(ids),
                producer,
                deadline: None,
            })
            .await
    }
}

#[async_trait]
impl ParticipantMailing for ParticipantMailingService {
    async fn send_qr_codes(
        &self,
        event_id: Uuid,
        selection: RecipientSelection,
    ) -> Result<DispatchReport, Error> {
        let producer = Arc::new(QrCodeProducer::new(self.codes.clone()));
        self.dispatch_eligible(event_id, selection, producer, |_| true)
            .await
    }

    async fn send_receipts(
        &self,
        event_id: Uuid,
        selection: RecipientSelection,
    ) -> Result<DispatchReport, Error> {
        self.dispatch_eligible(
            event_id,
            selection,
            Arc::new(ReceiptProducer),
            Participant::has_payment,
        )
        .await
    }

    async fn send_certificates(
        &self,
        event_id: Uuid,
        selection: RecipientSelection,
    ) -> Result<DispatchReport, Error> {
        let producer = Arc::new(CertificateProducer::new(self.certificates.clone()));
        self.dispatch_eligible(event_id, selection, producer, Participant::attended)
            .await
    }

    async fn send_notice(
        &self,
        event_id: Uuid,
        selection: RecipientSelection,
        subject: String,
        body: String,
    ) -> Result<DispatchReport, Error> {
        let notice = Notice::new(subject, body)
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let producer = Arc::new(NoticeProducer::new(notice));
        self.dispatch_eligible(event_id, selection, producer, |_| true)
            .await
    }
}

#[cfg(test)]
#[path = "mailing_service_tests.rs"]
mod tests;
