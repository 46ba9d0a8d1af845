//! Driving port for event mutations.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AdminId, Error, Event, EventDraft};

/// Creates and edits events.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventCommand: Send + Sync {
    /// Create an event owned by `owner`.
    async fn create_event(&self, owner: AdminId, draft: EventDraft) -> Result<Event, Error>;

    /// Replace an event's name, date, and description.
    async fn update_event(&self, event_id: Uuid, draft: EventDraft) -> Result<Event, Error>;

    async fn delete_event(&self, event_id: Uuid) -> Result<(), Error>;

    /// Grant another admin access. Repeating the call is harmless.
    async fn assign_admin(&self, event_id: Uuid, admin: AdminId) -> Result<Event, Error>;
}
