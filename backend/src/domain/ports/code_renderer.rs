//! Port for turning scan tokens into QR images.

use async_trait::async_trait;

use crate::domain::ScanToken;

use super::define_port_error;

define_port_error! {
    /// Errors raised by artifact renderers.
    pub enum RenderError {
        /// The renderer could not be started or reached.
        Unavailable { message: String } => "renderer unavailable: {message}",
        /// The renderer ran but did not produce an artifact.
        Failed { message: String } => "renderer failed: {message}",
    }
}

/// Renders a scannable code image for a token.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CodeRenderer: Send + Sync {
    /// Return PNG bytes encoding `token`.
    async fn render_code(&self, token: &ScanToken) -> Result<Vec<u8>, RenderError>;
}

/// Fixture renderer returning a fixed placeholder image.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureCodeRenderer;

#[async_trait]
impl CodeRenderer for FixtureCodeRenderer {
    async fn render_code(&self, token: &ScanToken) -> Result<Vec<u8>, RenderError> {
        Ok(token.as_str().as_bytes().to_vec())
    }
}
