//! Domain primitives, aggregates, and use-case services.
//!
//! Purpose: Define strongly typed conference entities (events, participants,
//! scan tokens) and the services behind the driving ports. Keep types free of
//! transport and storage concerns; adapters live under `inbound` and
//! `outbound`.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Event / Participant: the two aggregates the services operate on.
//! - DispatchEngine (in `dispatch`): bounded, deadline-aware bulk mailing.

pub mod attendance_service;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod event_service;
pub mod mailing_service;
pub mod messages;
pub mod participant;
pub mod ports;
mod repository_errors;
pub mod roster;
pub mod roster_import_service;
pub mod scan_token;

pub use self::attendance_service::AttendanceService;
pub use self::error::{Error, ErrorCode};
pub use self::event::{AdminId, Event, EventDraft, EventValidationError};
pub use self::event_service::EventService;
pub use self::mailing_service::{MailingRenderers, ParticipantMailingService};
pub use self::participant::{
    DeliveryFlag, Participant, ParticipantDraft, ParticipantValidationError, PaymentDetails,
    normalise_email,
};
pub use self::roster_import_service::RosterImportService;
pub use self::scan_token::{BlankScanToken, ScanToken, ScanTokenGenerator};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::not_found("no such event"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
