//! Port for delivering composed e-mail messages.

use std::time::Duration;

use async_trait::async_trait;

use crate::domain::messages::OutboundMessage;

use super::define_port_error;

define_port_error! {
    /// Errors raised by mail transports.
    pub enum TransportError {
        /// The server refused the message permanently.
        Rejected { message: String } => "mail rejected: {message}",
        /// The server could not be reached or failed transiently.
        Unavailable { message: String } => "mail transport unavailable: {message}",
        /// The server asked the client to slow down.
        Throttled { retry_after: Option<Duration> } =>
            "mail transport throttled (retry after {retry_after:?})",
    }
}

impl TransportError {
    /// Server-provided wait hint, when the failure carries one.
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::Throttled { retry_after } => *retry_after,
            _ => None,
        }
    }
}

/// Sends one message and confirms acceptance by the server.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn send(&self, message: &OutboundMessage) -> Result<(), TransportError>;
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(TransportError::throttled(Some(Duration::from_secs(3))), Some(Duration::from_secs(3)))]
    #[case(TransportError::throttled(Option::<Duration>::None), None)]
    #[case(TransportError::unavailable("timeout"), None)]
    #[case(TransportError::rejected("550 no such user"), None)]
    fn retry_after_only_comes_from_throttling(
        #[case] error: TransportError,
        #[case] expected: Option<Duration>,
    ) {
        assert_eq!(error.retry_after(), expected);
    }
}
