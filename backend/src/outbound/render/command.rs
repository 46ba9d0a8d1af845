//! External command invocation shared by the renderers.

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::domain::ports::RenderError;

/// A program plus fixed arguments that reads its input on stdin and writes
/// the rendered artifact to stdout.
#[derive(Debug, Clone)]
pub struct RenderCommand {
    command: Vec<OsString>,
    timeout: Duration,
}

impl RenderCommand {
    pub fn new(
        program: impl Into<OsString>,
        args: impl IntoIterator<Item = impl Into<OsString>>,
    ) -> Self {
        let mut command = vec![program.into()];
        command.extend(args.into_iter().map(Into::into));
        Self {
            command,
            timeout: Duration::from_secs(30),
        }
    }

    /// Split a whitespace-separated command line. Quoting is not
    /// interpreted. Returns `None` for a blank line.
    pub fn from_command_line(line: &str) -> Option<Self> {
        let mut parts = line.split_whitespace();
        let program = parts.next()?;
        Some(Self::new(program, parts))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub(super) fn label(&self) -> String {
        self.command
            .iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Run the command with `input` on stdin and return its stdout.
    pub(super) async fn run(&self, input: &[u8]) -> Result<Vec<u8>, RenderError> {
        let Some(program) = self.command.first() else {
            return Err(RenderError::unavailable("render command is empty"));
        };

        let mut child = Command::new(program)
            .args(self.command.iter().skip(1))
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|err| RenderError::unavailable(format!("{}: {err}", self.label())))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin
                .write_all(input)
                .await
                .map_err(|err| RenderError::failed(format!("{}: write stdin: {err}", self.label())))?;
        }

        let output = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                RenderError::unavailable(format!(
                    "{}: timed out after {:?}",
                    self.label(),
                    self.timeout
                ))
            })?
            .map_err(|err| RenderError::failed(format!("{}: {err}", self.label())))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            return Err(RenderError::failed(format!(
                "{} exited with {:?}: {stderr}",
                self.label(),
                output.status.code()
            )));
        }
        if output.stdout.is_empty() {
            return Err(RenderError::failed(format!(
                "{} produced no output",
                self.label()
            )));
        }
        Ok(output.stdout)
    }
}
