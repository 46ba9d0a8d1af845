//! SMTP mail transport using `lettre`.
//!
//! One pooled async transport is built at startup and shared by every send.
//! SMTP replies are classified into the [`TransportError`] variants the
//! dispatch engine understands: transient (4xx) replies become
//! [`TransportError::Throttled`] carrying the configured wait hint, permanent
//! (5xx) replies and unparseable addresses become
//! [`TransportError::Rejected`], and everything else (connection, TLS,
//! timeouts) is [`TransportError::Unavailable`].

use std::time::Duration;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment as MimeAttachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::debug;

use crate::domain::messages::OutboundMessage;
use crate::domain::ports::{MailTransport, TransportError};

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SmtpSecurity {
    /// Plain connection upgraded with `STARTTLS` (usually port 587).
    #[default]
    StartTls,
    /// TLS from the first byte (usually port 465).
    Tls,
    /// No encryption; local relays and test servers only.
    None,
}

impl SmtpSecurity {
    /// Parse a configuration value (`starttls`, `tls`, `none`).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "starttls" => Some(Self::StartTls),
            "tls" | "ssl" => Some(Self::Tls),
            "none" | "plain" => Some(Self::None),
            _ => None,
        }
    }
}

/// Connection settings for [`SmtpMailTransport`].
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// Sender mailbox, e.g. `Events Team <events@example.com>`.
    pub from: String,
    pub security: SmtpSecurity,
    pub timeout: Duration,
    /// Wait hint attached to transient SMTP failures.
    pub transient_retry_after: Duration,
}

/// Errors raised while building the transport.
#[derive(Debug, thiserror::Error)]
pub enum SmtpSetupError {
    #[error("invalid sender address {from:?}: {message}")]
    InvalidSender { from: String, message: String },
    #[error("invalid SMTP relay {host:?}: {message}")]
    InvalidRelay { host: String, message: String },
}

/// [`MailTransport`] backed by an SMTP relay.
#[derive(Clone)]
pub struct SmtpMailTransport {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    transient_retry_after: Duration,
}

impl SmtpMailTransport {
    /// Build the pooled transport. No connection is opened until the first
    /// send.
    ///
    /// # Errors
    ///
    /// Returns [`SmtpSetupError`] for an unparseable sender or relay host.
    pub fn new(config: SmtpConfig) -> Result<Self, SmtpSetupError> {
        let from: Mailbox = config
            .from
            .parse()
            .map_err(|err: lettre::address::AddressError| SmtpSetupError::InvalidSender {
                from: config.from.clone(),
                message: err.to_string(),
            })?;

        let invalid_relay = |err: lettre::transport::smtp::Error| SmtpSetupError::InvalidRelay {
            host: config.host.clone(),
            message: err.to_string(),
        };
        let builder = match config.security {
            SmtpSecurity::StartTls => {
                AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
                    .map_err(invalid_relay)?
            }
            SmtpSecurity::Tls => {
                AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host).map_err(invalid_relay)?
            }
            SmtpSecurity::None => {
                AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            }
        };
        let builder = builder
            .port(config.port)
            .timeout(Some(config.timeout));
        let builder = match (config.username, config.password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username, password))
            }
            _ => builder,
        };

        Ok(Self {
            mailer: builder.build(),
            from,
            transient_retry_after: config.transient_retry_after,
        })
    }
}

/// Translate a domain message into a MIME message.
pub(super) fn build_message(
    from: &Mailbox,
    message: &OutboundMessage,
) -> Result<Message, TransportError> {
    let to: Mailbox = message.to.parse().map_err(|err| {
        TransportError::rejected(format!("invalid recipient {:?}: {err}", message.to))
    })?;

    let mut body = MultiPart::mixed().singlepart(SinglePart::html(message.html_body.clone()));
    for attachment in &message.attachments {
        let content_type = ContentType::parse(&attachment.content_type).map_err(|err| {
            TransportError::rejected(format!(
                "invalid content type {:?}: {err}",
                attachment.content_type
            ))
        })?;
        body = body.singlepart(
            MimeAttachment::new(attachment.filename.clone())
                .body(attachment.content.clone(), content_type),
        );
    }

    Message::builder()
        .from(from.clone())
        .to(to)
        .subject(message.subject.clone())
        .multipart(body)
        .map_err(|err| TransportError::rejected(format!("failed to build message: {err}")))
}

/// Coarse class of an SMTP failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum SmtpFailureClass {
    Transient,
    Permanent,
    Other,
}

impl SmtpFailureClass {
    fn of(error: &lettre::transport::smtp::Error) -> Self {
        if error.is_transient() {
            Self::Transient
        } else if error.is_permanent() {
            Self::Permanent
        } else {
            Self::Other
        }
    }
}

pub(super) fn classify(
    class: SmtpFailureClass,
    detail: String,
    transient_retry_after: Duration,
) -> TransportError {
    match class {
        SmtpFailureClass::Transient => TransportError::throttled(Some(transient_retry_after)),
        SmtpFailureClass::Permanent => TransportError::rejected(detail),
        SmtpFailureClass::Other => TransportError::unavailable(detail),
    }
}

#[async_trait]
impl MailTransport for SmtpMailTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        let email = build_message(&self.from, message)?;
        match self.mailer.send(email).await {
            Ok(response) => {
                debug!(to = %message.to, code = %response.code(), "smtp accepted message");
                Ok(())
            }
            Err(err) => Err(classify(
                SmtpFailureClass::of(&err),
                err.to_string(),
                self.transient_retry_after,
            )),
        }
    }
}
