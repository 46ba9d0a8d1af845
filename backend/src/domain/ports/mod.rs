//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, renderers, the mail transport) describe what
//! the domain needs from adapters. Driving ports describe the use cases the
//! inbound HTTP adapter calls.

mod macros;
pub(crate) use macros::define_port_error;

mod attendance_command;
mod certificate_renderer;
mod code_renderer;
mod event_command;
mod event_query;
mod event_repository;
mod mail_transport;
mod participant_mailing;
mod participant_repository;
mod roster_import_command;

#[cfg(test)]
pub use attendance_command::MockAttendanceCommand;
pub use attendance_command::{AttendanceCommand, AttendanceReceipt};
#[cfg(test)]
pub use certificate_renderer::MockCertificateRenderer;
pub use certificate_renderer::{CertificateRenderer, FixtureCertificateRenderer};
#[cfg(test)]
pub use code_renderer::MockCodeRenderer;
pub use code_renderer::{CodeRenderer, FixtureCodeRenderer, RenderError};
pub use event_command::EventCommand;
#[cfg(test)]
pub use event_command::MockEventCommand;
pub use event_query::EventQuery;
#[cfg(test)]
pub use event_query::MockEventQuery;
#[cfg(test)]
pub use event_repository::MockEventRepository;
pub use event_repository::{EventRepository, EventRepositoryError, FixtureEventRepository};
#[cfg(test)]
pub use mail_transport::MockMailTransport;
pub use mail_transport::{MailTransport, TransportError};
#[cfg(test)]
pub use participant_mailing::MockParticipantMailing;
pub use participant_mailing::ParticipantMailing;
#[cfg(test)]
pub use participant_repository::MockParticipantRepository;
pub use participant_repository::{
    AttendanceMark, FixtureParticipantRepository, ParticipantRepository,
    ParticipantRepositoryError,
};
#[cfg(test)]
pub use roster_import_command::MockRosterImportCommand;
pub use roster_import_command::RosterImportCommand;
