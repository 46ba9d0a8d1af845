//! QR rendering through an external encoder.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ScanToken;
use crate::domain::ports::{CodeRenderer, RenderError};

use super::RenderCommand;

/// [`CodeRenderer`] that pipes the token to a command and returns the PNG it
/// prints.
#[derive(Debug, Clone)]
pub struct CommandCodeRenderer {
    command: RenderCommand,
}

impl CommandCodeRenderer {
    pub fn new(command: RenderCommand) -> Self {
        Self { command }
    }
}

#[async_trait]
impl CodeRenderer for CommandCodeRenderer {
    async fn render_code(&self, token: &ScanToken) -> Result<Vec<u8>, RenderError> {
        let png = self.command.run(token.as_str().as_bytes()).await?;
        debug!(bytes = png.len(), command = %self.command.label(), "code rendered");
        Ok(png)
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn token_is_written_to_the_command() {
        let renderer = CommandCodeRenderer::new(RenderCommand::new("cat", Vec::<String>::new()));
        let token = ScanToken::new("evt-1700000000-abcdefghi").expect("valid token");

        let bytes = renderer.render_code(&token).await.expect("render succeeds");

        assert_eq!(bytes, token.as_str().as_bytes());
    }
}
