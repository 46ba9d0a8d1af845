//! Application configuration loaded via OrthoConfig.
//!
//! Values are layered from CLI flags, `CONFERENCE_*` environment variables,
//! and an optional configuration file. Every field is optional; accessors
//! supply the defaults.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::dispatch::DispatchConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_DB_POOL_SIZE: u32 = 10;
const DEFAULT_SMTP_PORT: u16 = 587;
const DEFAULT_SMTP_SECURITY: &str = "starttls";
const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 30;
const DEFAULT_SMTP_RETRY_AFTER_SECS: u64 = 2;
const DEFAULT_RENDER_TIMEOUT_SECS: u64 = 30;

/// Top-level service settings.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CONFERENCE")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the service keeps data in memory.
    pub database_url: Option<String>,
    pub db_pool_size: Option<u32>,
    /// Maximum concurrent sends per dispatch engine.
    pub dispatch_concurrency: Option<usize>,
    /// Overall deadline for one dispatch call, in seconds.
    pub dispatch_deadline_secs: Option<u64>,
    /// Send attempts per recipient when the server asks to retry later.
    pub dispatch_max_attempts: Option<u32>,
    /// SMTP relay host. Without it mail is logged and dropped.
    pub smtp_host: Option<String>,
    pub smtp_port: Option<u16>,
    pub smtp_username: Option<String>,
    pub smtp_password: Option<String>,
    /// Sender mailbox, e.g. `Events <events@example.com>`.
    pub smtp_from: Option<String>,
    /// `starttls`, `tls`, or `none`.
    pub smtp_security: Option<String>,
    pub smtp_timeout_secs: Option<u64>,
    /// Wait hint applied to transient SMTP failures, in seconds.
    pub smtp_retry_after_secs: Option<u64>,
    /// Command printing a PNG QR code for the token read on stdin.
    pub qr_command: Option<String>,
    /// Command printing a PDF certificate for the JSON read on stdin.
    pub certificate_command: Option<String>,
    pub render_timeout_secs: Option<u64>,
}

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    BindAddr { value: String, message: String },
}

impl AppSettings {
    /// Parsed bind address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::BindAddr`] when the value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::BindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Database URL, ignoring blank values.
    pub fn database_url(&self) -> Option<&str> {
        non_blank(self.database_url.as_deref())
    }

    pub fn db_pool_size(&self) -> u32 {
        self.db_pool_size.unwrap_or(DEFAULT_DB_POOL_SIZE)
    }

    /// Dispatch tuning with configured overrides applied.
    pub fn dispatch_config(&self) -> DispatchConfig {
        let defaults = DispatchConfig::default();
        DispatchConfig {
            concurrency: self.dispatch_concurrency.unwrap_or(defaults.concurrency).max(1),
            max_attempts: self.dispatch_max_attempts.unwrap_or(defaults.max_attempts).max(1),
            deadline: self
                .dispatch_deadline_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.deadline),
            ..defaults
        }
    }

    pub fn smtp_host(&self) -> Option<&str> {
        non_blank(self.smtp_host.as_deref())
    }

    pub fn smtp_port(&self) -> u16 {
        self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT)
    }

    pub fn smtp_security(&self) -> &str {
        self.smtp_security.as_deref().unwrap_or(DEFAULT_SMTP_SECURITY)
    }

    pub fn smtp_timeout(&self) -> Duration {
        Duration::from_secs(self.smtp_timeout_secs.unwrap_or(DEFAULT_SMTP_TIMEOUT_SECS))
    }

    pub fn smtp_retry_after(&self) -> Duration {
        Duration::from_secs(
            self.smtp_retry_after_secs
                .unwrap_or(DEFAULT_SMTP_RETRY_AFTER_SECS),
        )
    }

    pub fn qr_command(&self) -> Option<&str> {
        non_blank(self.qr_command.as_deref())
    }

    pub fn certificate_command(&self) -> Option<&str> {
        non_blank(self.certificate_command.as_deref())
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs.unwrap_or(DEFAULT_RENDER_TIMEOUT_SECS))
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
