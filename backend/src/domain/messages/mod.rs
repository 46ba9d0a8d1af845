//! Transport-ready messages and the producers that build them.
//!
//! A producer turns one participant of one event into an
//! [`OutboundMessage`]. Producers may await an artifact renderer; the HTML
//! composition itself lives in pure `compose_*` functions.

use async_trait::async_trait;

use crate::domain::ports::RenderError;
use crate::domain::{DeliveryFlag, Event, Participant};

mod compose;
mod producers;

pub use compose::{
    certificate_filename, compose_certificate, compose_notice, compose_qr, compose_receipt,
    escape_html, format_event_date,
};
pub use producers::{CertificateProducer, NoticeProducer, QrCodeProducer, ReceiptProducer};

/// One file attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

/// A message ready for [`crate::domain::ports::MailTransport::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub to: String,
    pub subject: String,
    pub html_body: String,
    pub attachments: Vec<Attachment>,
}

/// Message families the service can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    QrCode,
    Receipt,
    Certificate,
    Notice,
}

impl MessageKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::QrCode => "qr_code",
            Self::Receipt => "receipt",
            Self::Certificate => "certificate",
            Self::Notice => "notice",
        }
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a producer could not build a message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProduceError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("producer precondition violated: {message}")]
    Contract { message: String },
}

impl ProduceError {
    pub fn contract(message: impl Into<String>) -> Self {
        Self::Contract {
            message: message.into(),
        }
    }
}

/// Validation failures for a free-form notice.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NoticeValidationError {
    #[error("notice subject must not be blank")]
    EmptySubject,
    #[error("notice message must not be blank")]
    EmptyBody,
}

/// A validated free-form notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    subject: String,
    body: String,
}

impl Notice {
    /// Validate a subject and body. Both are kept verbatim once accepted.
    pub fn new(
        subject: impl Into<String>,
        body: impl Into<String>,
    ) -> Result<Self, NoticeValidationError> {
        let subject = subject.into();
        let body = body.into();
        if subject.trim().is_empty() {
            return Err(NoticeValidationError::EmptySubject);
        }
        if body.trim().is_empty() {
            return Err(NoticeValidationError::EmptyBody);
        }
        Ok(Self { subject, body })
    }

    pub fn subject(&self) -> &str {
        self.subject.as_str()
    }

    pub fn body(&self) -> &str {
        self.body.as_str()
    }
}

/// Builds one message per recipient for the dispatch engine.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessageProducer: Send + Sync {
    /// Family label used in logs.
    fn kind(&self) -> MessageKind;

    /// Flag to record once the message is confirmed sent, if any.
    fn delivery_flag(&self) -> Option<DeliveryFlag>;

    async fn produce(
        &self,
        event: &Event,
        participant: &Participant,
    ) -> Result<OutboundMessage, ProduceError>;
}
