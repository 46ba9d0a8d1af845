//! Artifact renderers backed by external commands.
//!
//! QR images and certificates are produced by configurable programs that
//! read their input on stdin and write the artifact to stdout, e.g.
//! `qrencode -o - -t PNG` for codes.

mod certificate;
mod code;
mod command;

pub use certificate::CommandCertificateRenderer;
pub use code::CommandCodeRenderer;
pub use command::RenderCommand;
