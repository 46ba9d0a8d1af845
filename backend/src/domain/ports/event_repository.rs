//! Port for event persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AdminId, Event};

use super::define_port_error;

define_port_error! {
    /// Errors raised by event repository adapters.
    pub enum EventRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "event repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "event repository query failed: {message}",
    }
}

/// Port for storing events and their admin memberships.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Persist a new event together with its admin set.
    async fn insert(&self, event: &Event) -> Result<(), EventRepositoryError>;

    /// Find an event by id.
    async fn find_by_id(&self, event_id: &Uuid) -> Result<Option<Event>, EventRepositoryError>;

    /// Overwrite name, date, and description. Returns `false` when the event
    /// does not exist.
    async fn update_details(&self, event: &Event) -> Result<bool, EventRepositoryError>;

    /// Remove an event. Returns `false` when it did not exist.
    async fn delete(&self, event_id: &Uuid) -> Result<bool, EventRepositoryError>;

    /// Add `admin` to the event's admin set; adding an existing admin is a
    /// no-op.
    async fn add_admin(&self, event_id: &Uuid, admin: &AdminId)
    -> Result<(), EventRepositoryError>;

    /// List events owned by or assigned to `admin`, ordered by event date.
    async fn list_for_admin(&self, admin: &AdminId) -> Result<Vec<Event>, EventRepositoryError>;
}

/// Fixture implementation for tests that do not exercise event storage.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureEventRepository;

#[async_trait]
impl EventRepository for FixtureEventRepository {
    async fn insert(&self, _event: &Event) -> Result<(), EventRepositoryError> {
        Ok(())
    }

    async fn find_by_id(&self, _event_id: &Uuid) -> Result<Option<Event>, EventRepositoryError> {
        Ok(None)
    }

    async fn update_details(&self, _event: &Event) -> Result<bool, EventRepositoryError> {
        Ok(false)
    }

    async fn delete(&self, _event_id: &Uuid) -> Result<bool, EventRepositoryError> {
        Ok(false)
    }

    async fn add_admin(
        &self,
        _event_id: &Uuid,
        _admin: &AdminId,
    ) -> Result<(), EventRepositoryError> {
        Ok(())
    }

    async fn list_for_admin(&self, _admin: &AdminId) -> Result<Vec<Event>, EventRepositoryError> {
        Ok(Vec::new())
    }
}
