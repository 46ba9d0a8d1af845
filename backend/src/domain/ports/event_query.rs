//! Driving port for event reads.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AdminId, Error, Event, Participant};

/// Reads events and their rosters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventQuery: Send + Sync {
    async fn get_event(&self, event_id: Uuid) -> Result<Event, Error>;

    /// Events the admin owns or was assigned to.
    async fn list_events_for(&self, admin: AdminId) -> Result<Vec<Event>, Error>;

    async fn list_participants(&self, event_id: Uuid) -> Result<Vec<Participant>, Error>;
}
