//! Certificate rendering through an external document generator.

use async_trait::async_trait;
use serde::Serialize;
use tracing::debug;

use crate::domain::ports::{CertificateRenderer, RenderError};

use super::RenderCommand;

/// JSON document written to the generator's stdin.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CertificateRequest<'a> {
    participant_name: &'a str,
    event_name: &'a str,
    event_date: &'a str,
}

/// [`CertificateRenderer`] that sends the certificate fields as JSON to a
/// command and returns the PDF it prints.
#[derive(Debug, Clone)]
pub struct CommandCertificateRenderer {
    command: RenderCommand,
}

impl CommandCertificateRenderer {
    pub fn new(command: RenderCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl CertificateRenderer for CommandCertificateRenderer {
    async fn render_certificate(
        &self,
        participant_name: &str,
        event_name: &str,
        event_date: &str,
    ) -> Result<Vec<u8>, RenderError> {
        let request = serde_json::to_vec(&CertificateRequest {
            participant_name,
            event_name,
            event_date,
        })
        .map_err(|err| RenderError::failed(format!("encode certificate request: {err}")))?;

        let pdf = self.command.run(&request).await?;
        debug!(bytes = pdf.len(), command = %self.command.label(), "certificate rendered");
        Ok(pdf)
    }
}
