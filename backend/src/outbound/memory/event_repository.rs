//! In-memory `EventRepository`.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{EventRepository, EventRepositoryError};
use crate::domain::{AdminId, Event};

/// Event store backed by a hash map.
#[derive(Debug, Default)]
pub struct InMemoryEventRepository {
    events: Mutex<HashMap<Uuid, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Uuid, Event>>, EventRepositoryError> {
        self.events
            .lock()
            .map_err(|_| EventRepositoryError::query("event store lock poisoned"))
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: &Event) -> Result<(), EventRepositoryError> {
        let mut events = self.lock()?;
        if events.contains_key(&event.id()) {
            return Err(EventRepositoryError::query(format!(
                "event {} already exists",
                event.id()
            )));
        }
        events.insert(event.id(), event.clone());
        Ok(())
    }

    async fn find_by_id(&self, event_id: &Uuid) -> Result<Option<Event>, EventRepositoryError> {
        Ok(self.lock()?.get(event_id).cloned())
    }

    async fn update_details(&self, event: &Event) -> Result<bool, EventRepositoryError> {
        let mut events = self.lock()?;
        let Some(stored) = events.get_mut(&event.id()) else {
            return Ok(false);
        };
        // Keep the stored admin set; only the editable details change.
        let admins = stored.admins().iter().copied().collect::<Vec<_>>();
        let mut updated = event.clone();
        for admin in admins {
            updated.add_admin(admin);
        }
        *stored = updated;
        Ok(true)
    }

    async fn delete(&self, event_id: &Uuid) -> Result<bool, EventRepositoryError> {
        Ok(self.lock()?.remove(event_id).is_some())
    }

    async fn add_admin(&self, event_id: &Uuid, admin: &AdminId) -> Result<(), EventRepositoryError> {
        if let Some(event) = self.lock()?.get_mut(event_id) {
            event.add_admin(*admin);
        }
        Ok(())
    }

    async fn list_for_admin(&self, admin: &AdminId) -> Result<Vec<Event>, EventRepositoryError> {
        let mut listed: Vec<Event> = self
            .lock()?
            .values()
            .filter(|event| event.is_administered_by(admin))
            .cloned()
            .collect();
        listed.sort_by_key(|event| (event.date(), event.id()));
        Ok(listed)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::EventDraft;

    fn event_for(owner: AdminId, offset_days: i64) -> Event {
        Event::new(
            Uuid::new_v4(),
            owner,
            EventDraft {
                name: format!("Meetup {offset_days}"),
                date: Utc::now() + Duration::days(offset_days),
                description: String::new(),
            },
            Utc::now(),
        )
        .expect("valid event")
    }

    #[rstest]
    #[tokio::test]
    async fn lists_owned_and_assigned_events_by_date() {
        let repo = InMemoryEventRepository::new();
        let owner = AdminId::random();
        let helper = AdminId::random();
        let later = event_for(owner, 10);
        let sooner = event_for(AdminId::random(), 1);
        repo.insert(&later).await.expect("insert");
        repo.insert(&sooner).await.expect("insert");
        repo.add_admin(&sooner.id(), &helper).await.expect("assign");
        repo.add_admin(&later.id(), &helper).await.expect("assign");

        let for_helper = repo.list_for_admin(&helper).await.expect("list");
        let for_owner = repo.list_for_admin(&owner).await.expect("list");

        let ids: Vec<_> = for_helper.iter().map(Event::id).collect();
        assert_eq!(ids, vec![sooner.id(), later.id()]);
        assert_eq!(for_owner.len(), 1);
    }

    #[rstest]
    #[tokio::test]
    async fn update_details_keeps_assigned_admins() {
        let repo = InMemoryEventRepository::new();
        let owner = AdminId::random();
        let helper = AdminId::random();
        let mut event = event_for(owner, 3);
        repo.insert(&event).await.expect("insert");
        repo.add_admin(&event.id(), &helper).await.expect("assign");

        event
            .apply(EventDraft {
                name: "Renamed".to_owned(),
                date: event.date(),
                description: "new".to_owned(),
            })
            .expect("valid draft");
        assert!(repo.update_details(&event).await.expect("update"));

        let stored = repo
            .find_by_id(&event.id())
            .await
            .expect("find")
            .expect("present");
        assert_eq!(stored.name(), "Renamed");
        assert!(stored.is_administered_by(&helper));
    }

    #[rstest]
    #[tokio::test]
    async fn delete_reports_missing_events() {
        let repo = InMemoryEventRepository::new();
        assert!(!repo.delete(&Uuid::new_v4()).await.expect("delete"));
    }
}
