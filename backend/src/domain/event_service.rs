//! Event administration services.
//!
//! One service backs both the command and query driving ports; it only
//! needs the two repositories and a clock for `created_at`.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;
use uuid::Uuid;

use crate::domain::dispatch::RecipientSelection;
use crate::domain::ports::{EventCommand, EventQuery, EventRepository, ParticipantRepository};
use crate::domain::repository_errors::{
    map_event_repository_error, map_participant_repository_error,
};
use crate::domain::{AdminId, Error, Event, EventDraft, Participant};

fn event_not_found(event_id: Uuid) -> Error {
    Error::not_found(format!("event {event_id} not found"))
}

/// Event service implementing [`EventCommand`] and [`EventQuery`].
#[derive(Clone)]
pub struct EventService<E, P> {
    events: Arc<E>,
    participants: Arc<P>,
    clock: Arc<dyn Clock>,
}

impl<E, P> EventService<E, P> {
    pub fn new(events: Arc<E>, participants: Arc<P>, clock: Arc<dyn Clock>) -> Self {
        Self {
            events,
            participants,
            clock,
        }
    }
}

impl<E, P> EventService<E, P>
where
    E: EventRepository,
{
    async fn load(&self, event_id: Uuid) -> Result<Event, Error> {
        self.events
            .find_by_id(&event_id)
            .await
            .map_err(map_event_repository_error)?
            .ok_or_else(|| event_not_found(event_id))
    }
}

#[async_trait]
impl<E, P> EventCommand for EventService<E, P>
where
    E: EventRepository,
    P: ParticipantRepository,
{
    async fn create_event(&self, owner: AdminId, draft: EventDraft) -> Result<Event, Error> {
        let event = Event::new(Uuid::new_v4(), owner, draft, self.clock.utc())
            .map_err(|err| Error::invalid_request(format!("invalid event: {err}")))?;
        self.events
            .insert(&event)
            .await
            .map_err(map_event_repository_error)?;
        info!(event_id = %event.id(), owner = %owner, "event created");
        Ok(event)
    }

    async fn update_event(&self, event_id: Uuid, draft: EventDraft) -> Result<Event, Error> {
        let mut event = self.load(event_id).await?;
        event
            .apply(draft)
            .map_err(|err| Error::invalid_request(format!("invalid event: {err}")))?;
        let updated = self
            .events
            .update_details(&event)
            .await
            .map_err(map_event_repository_error)?;
        if !updated {
            return Err(event_not_found(event_id));
        }
        Ok(event)
    }

    async fn delete_event(&self, event_id: Uuid) -> Result<(), Error> {
        let deleted = self
            .events
            .delete(&event_id)
            .await
            .map_err(map_event_repository_error)?;
        if !deleted {
            return Err(event_not_found(event_id));
        }
        info!(%event_id, "event deleted");
        Ok(())
    }

    async fn assign_admin(&self, event_id: Uuid, admin: AdminId) -> Result<Event, Error> {
        let mut event = self.load(event_id).await?;
        if event.add_admin(admin) {
            self.events
                .add_admin(&event_id, &admin)
                .await
                .map_err(map_event_repository_error)?;
            info!(%event_id, %admin, "admin assigned");
        }
        Ok(event)
    }
}

#[async_trait]
impl<E, P> EventQuery for EventService<E, P>
where
    E: EventRepository,
    P: ParticipantRepository,
{
    async fn get_event(&self, event_id: Uuid) -> Result<Event, Error> {
        self.load(event_id).await
    }

    async fn list_events_for(&self, admin: AdminId) -> Result<Vec<Event>, Error> {
        self.events
            .list_for_admin(&admin)
            .await
            .map_err(map_event_repository_error)
    }

    async fn list_participants(&self, event_id: Uuid) -> Result<Vec<Participant>, Error> {
        self.load(event_id).await?;
        self.participants
            .list_for_event(&event_id, &RecipientSelection::All)
            .await
            .map_err(map_participant_repository_error)
    }
}

#[cfg(test)]
#[path = "event_service_tests.rs"]
mod tests;
