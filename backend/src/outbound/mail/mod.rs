//! Mail transport adapters.
//!
//! [`SmtpMailTransport`] relays messages through an SMTP server with
//! `lettre`. [`UnconfiguredMailTransport`] stands in when no server is
//! configured: it logs each message and reports success.

mod smtp;
mod unconfigured;

pub use smtp::{SmtpConfig, SmtpMailTransport, SmtpSecurity, SmtpSetupError};
pub use unconfigured::UnconfiguredMailTransport;
