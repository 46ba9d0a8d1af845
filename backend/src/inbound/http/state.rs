//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AttendanceCommand, EventCommand, EventQuery, ParticipantMailing, RosterImportCommand,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub events: Arc<dyn EventCommand>,
    pub events_query: Arc<dyn EventQuery>,
    pub roster_import: Arc<dyn RosterImportCommand>,
    pub attendance: Arc<dyn AttendanceCommand>,
    pub mailing: Arc<dyn ParticipantMailing>,
}

impl HttpState {
    /// Construct state from explicit port implementations. `main` passes
    /// the same service for `events` and `events_query`.
    pub fn new(
        events: Arc<dyn EventCommand>,
        events_query: Arc<dyn EventQuery>,
        roster_import: Arc<dyn RosterImportCommand>,
        attendance: Arc<dyn AttendanceCommand>,
        mailing: Arc<dyn ParticipantMailing>,
    ) -> Self {
        Self {
            events,
            events_query,
            roster_import,
            attendance,
            mailing,
        }
    }
}
