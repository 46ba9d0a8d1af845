//! Port for producing participation certificate documents.

use async_trait::async_trait;

use super::RenderError;

/// Renders a certificate document.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CertificateRenderer: Send + Sync {
    /// Return PDF bytes for the participant, event name, and formatted date.
    async fn render_certificate(
        &self,
        participant_name: &str,
        event_name: &str,
        event_date: &str,
    ) -> Result<Vec<u8>, RenderError>;
}

/// Fixture renderer returning a short text body in place of a PDF.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCertificateRenderer;

#[async_trait]
impl CertificateRenderer for FixtureCertificateRenderer {
    async fn render_certificate(
        &self,
        participant_name: &str,
        event_name: &str,
        event_date: &str,
    ) -> Result<Vec<u8>, RenderError> {
        Ok(format!("{participant_name} attended {event_name} on {event_date}").into_bytes())
    }
}
