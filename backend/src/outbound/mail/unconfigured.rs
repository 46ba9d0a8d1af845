//! No-op transport used when SMTP is not configured.

use async_trait::async_trait;
use tracing::info;

use crate::domain::messages::OutboundMessage;
use crate::domain::ports::{MailTransport, TransportError};

/// Logs each message and reports success without delivering anything.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnconfiguredMailTransport;

#[async_trait]
impl MailTransport for UnconfiguredMailTransport {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError> {
        info!(
            to = %message.to,
            subject = %message.subject,
            attachments = message.attachments.len(),
            "mail transport not configured; message dropped"
        );
        Ok(())
    }
}
