//! Producers for each message family.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CertificateRenderer, CodeRenderer};
use crate::domain::{DeliveryFlag, Event, Participant};

use super::{
    MessageKind, MessageProducer, Notice, OutboundMessage, ProduceError, compose_certificate,
    compose_notice, compose_qr, compose_receipt, format_event_date,
};

/// Renders the participant's token and mails it as a QR image.
pub struct QrCodeProducer {
    renderer: Arc<dyn CodeRenderer>,
}

impl QrCodeProducer {
    pub fn new(renderer: Arc<dyn CodeRenderer>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl MessageProducer for QrCodeProducer {
    fn kind(&self) -> MessageKind {
        MessageKind::QrCode
    }

    fn delivery_flag(&self) -> Option<DeliveryFlag> {
        None
    }

    async fn produce(
        &self,
        event: &Event,
        participant: &Participant,
    ) -> Result<OutboundMessage, ProduceError> {
        let png = self.renderer.render_code(participant.token()).await?;
        Ok(compose_qr(event, participant, png))
    }
}

/// Payment receipts; sets `receipt_sent` after delivery.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReceiptProducer;

#[async_trait]
impl MessageProducer for ReceiptProducer {
    fn kind(&self) -> MessageKind {
        MessageKind::Receipt
    }

    fn delivery_flag(&self) -> Option<DeliveryFlag> {
        Some(DeliveryFlag::ReceiptSent)
    }

    async fn produce(
        &self,
        event: &Event,
        participant: &Participant,
    ) -> Result<OutboundMessage, ProduceError> {
        compose_receipt(event, participant)
    }
}

/// Renders and mails a participation certificate.
pub struct CertificateProducer {
    renderer: Arc<dyn CertificateRenderer>,
}

impl CertificateProducer {
    pub fn new(renderer: Arc<dyn CertificateRenderer>) -> Self {
        Self { renderer }
    }
}

#[async_trait]
impl MessageProducer for CertificateProducer {
    fn kind(&self) -> MessageKind {
        MessageKind::Certificate
    }

    fn delivery_flag(&self) -> Option<DeliveryFlag> {
        None
    }

    async fn produce(
        &self,
        event: &Event,
        participant: &Participant,
    ) -> Result<OutboundMessage, ProduceError> {
        let date = format_event_date(event.date());
        let pdf = self
            .renderer
            .render_certificate(participant.name(), event.name(), &date)
            .await?;
        Ok(compose_certificate(event, participant, pdf))
    }
}

/// Mails the same caller-supplied notice to every recipient.
#[derive(Debug, Clone)]
pub struct NoticeProducer {
    notice: Notice,
}

impl NoticeProducer {
    pub fn new(notice: Notice) -> Self {
        Self { notice }
    }
}

#[async_trait]
impl MessageProducer for NoticeProducer {
    fn kind(&self) -> MessageKind {
        MessageKind::Notice
    }

    fn delivery_flag(&self) -> Option<DeliveryFlag> {
        None
    }

    async fn produce(
        &self,
        _event: &Event,
        participant: &Participant,
    ) -> Result<OutboundMessage, ProduceError> {
        Ok(compose_notice(participant, &self.notice))
    }
}
