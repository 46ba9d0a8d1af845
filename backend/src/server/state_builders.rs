//! Builders wiring repositories, adapters, and services into [`HttpState`].

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::dispatch::{DispatchConfig, DispatchEngine, DispatchPorts};
use backend::domain::ports::{EventRepository, MailTransport, ParticipantRepository};
use backend::domain::{
    AttendanceService, EventService, MailingRenderers, ParticipantMailingService,
    RosterImportService, ScanTokenGenerator,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::{InMemoryEventRepository, InMemoryParticipantRepository};
use backend::outbound::persistence::{DieselEventRepository, DieselParticipantRepository};

use super::ServerConfig;

/// Build HTTP state over Diesel repositories when a pool is configured,
/// otherwise over in-memory repositories.
pub(crate) fn build_http_state(config: ServerConfig) -> web::Data<HttpState> {
    let ServerConfig {
        bind_addr: _,
        db_pool,
        mail,
        renderers,
        dispatch,
    } = config;
    let wiring = Wiring {
        mail,
        renderers,
        dispatch,
    };

    let state = match db_pool {
        Some(pool) => wiring.into_state(
            Arc::new(DieselEventRepository::new(pool.clone())),
            Arc::new(DieselParticipantRepository::new(pool)),
        ),
        None => wiring.into_state(
            Arc::new(InMemoryEventRepository::new()),
            Arc::new(InMemoryParticipantRepository::new()),
        ),
    };
    web::Data::new(state)
}

/// Adapters shared by every repository flavour.
struct Wiring {
    mail: Arc<dyn MailTransport>,
    renderers: MailingRenderers,
    dispatch: DispatchConfig,
}

impl Wiring {
    fn into_state<E, P>(self, events: Arc<E>, participants: Arc<P>) -> HttpState
    where
        E: EventRepository + 'static,
        P: ParticipantRepository + 'static,
    {
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);

        let event_service = Arc::new(EventService::new(
            events.clone(),
            participants.clone(),
            clock.clone(),
        ));
        let roster_import = RosterImportService::new(
            events.clone(),
            participants.clone(),
            Arc::new(ScanTokenGenerator::new(clock.clone())),
        );
        let attendance = AttendanceService::new(participants.clone(), clock.clone());

        let engine = DispatchEngine::new(
            DispatchPorts::new(events, participants.clone(), self.mail),
            clock,
            self.dispatch,
        );
        let mailing = ParticipantMailingService::new(participants, engine, self.renderers);

        HttpState::new(
            event_service.clone(),
            event_service,
            Arc::new(roster_import),
            Arc::new(attendance),
            Arc::new(mailing),
        )
    }
}
