//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use super::api_routes;
use super::state::HttpState;
use crate::domain::ports::{
    MockAttendanceCommand, MockEventCommand, MockEventQuery, MockParticipantMailing,
    MockRosterImportCommand,
};

/// Mocked driving ports. Tests set expectations on the ports they exercise
/// and leave the rest untouched, so any unexpected call panics.
#[derive(Default)]
pub(crate) struct MockPorts {
    pub events: MockEventCommand,
    pub events_query: MockEventQuery,
    pub roster_import: MockRosterImportCommand,
    pub attendance: MockAttendanceCommand,
    pub mailing: MockParticipantMailing,
}

impl MockPorts {
    fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.events),
            Arc::new(self.events_query),
            Arc::new(self.roster_import),
            Arc::new(self.attendance),
            Arc::new(self.mailing),
        )
    }
}

/// App serving the `/api/v1` routes backed by `ports`.
pub(crate) fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .service(web::scope("/api/v1").configure(api_routes))
}
