//! Conference event aggregate.
//!
//! Events never hold their participant lists; participants point back at
//! their event through `event_id`. The owning admin is always a member of
//! the admin set so access checks only consult one collection.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of an administrator with access to events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminId(Uuid);

impl AdminId {
    /// Wrap an existing UUID.
    pub fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a random admin id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Borrow the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl std::fmt::Display for AdminId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failures raised while building or editing an [`Event`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventValidationError {
    #[error("event name must not be blank")]
    EmptyName,
}

/// Editable event fields supplied on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub name: String,
    pub date: DateTime<Utc>,
    pub description: String,
}

impl EventDraft {
    fn validated_name(&self) -> Result<String, EventValidationError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(EventValidationError::EmptyName);
        }
        Ok(name.to_owned())
    }
}

/// A single conference or gathering.
///
/// # Examples
/// ```
/// use backend::domain::{AdminId, Event, EventDraft};
/// use chrono::Utc;
/// use uuid::Uuid;
///
/// let owner = AdminId::random();
/// let draft = EventDraft {
///     name: "RustConf".into(),
///     date: Utc::now(),
///     description: String::new(),
/// };
/// let event = Event::new(Uuid::new_v4(), owner, draft, Utc::now()).expect("valid event");
/// assert!(event.is_administered_by(&owner));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    id: Uuid,
    name: String,
    date: DateTime<Utc>,
    description: String,
    owner: AdminId,
    admins: BTreeSet<AdminId>,
    created_at: DateTime<Utc>,
}

impl Event {
    /// Create an event owned by `owner`.
    pub fn new(
        id: Uuid,
        owner: AdminId,
        draft: EventDraft,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EventValidationError> {
        let name = draft.validated_name()?;
        Ok(Self {
            id,
            name,
            date: draft.date,
            description: draft.description,
            owner,
            admins: BTreeSet::from([owner]),
            created_at,
        })
    }

    /// Rehydrate an event from storage, re-establishing the owner-is-admin
    /// invariant.
    pub fn restore(
        id: Uuid,
        owner: AdminId,
        draft: EventDraft,
        admins: impl IntoIterator<Item = AdminId>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, EventValidationError> {
        let mut event = Self::new(id, owner, draft, created_at)?;
        event.admins.extend(admins);
        Ok(event)
    }

    /// Replace the editable details. The id, owner, and admins are kept.
    pub fn apply(&mut self, draft: EventDraft) -> Result<(), EventValidationError> {
        self.name = draft.validated_name()?;
        self.date = draft.date;
        self.description = draft.description;
        Ok(())
    }

    /// Grant `admin` access. Returns `false` when already present.
    pub fn add_admin(&mut self, admin: AdminId) -> bool {
        self.admins.insert(admin)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn date(&self) -> DateTime<Utc> {
        self.date
    }

    pub fn description(&self) -> &str {
        self.description.as_str()
    }

    pub fn owner(&self) -> AdminId {
        self.owner
    }

    /// All admins with access, owner included.
    pub fn admins(&self) -> &BTreeSet<AdminId> {
        &self.admins
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether `admin` owns or was assigned to this event.
    pub fn is_administered_by(&self, admin: &AdminId) -> bool {
        self.admins.contains(admin)
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn draft() -> EventDraft {
        EventDraft {
            name: "  DevFest  ".to_owned(),
            date: Utc
                .with_ymd_and_hms(2026, 3, 5, 9, 0, 0)
                .single()
                .expect("valid date"),
            description: String::new(),
        }
    }

    #[rstest]
    fn new_trims_name_and_enrols_owner(draft: EventDraft) {
        let owner = AdminId::random();
        let event = Event::new(Uuid::new_v4(), owner, draft, Utc::now()).expect("valid event");

        assert_eq!(event.name(), "DevFest");
        assert_eq!(event.admins().len(), 1);
        assert!(event.is_administered_by(&owner));
    }

    #[rstest]
    fn blank_names_are_rejected(mut draft: EventDraft) {
        draft.name = "   ".to_owned();
        let result = Event::new(Uuid::new_v4(), AdminId::random(), draft, Utc::now());
        assert_eq!(result, Err(EventValidationError::EmptyName));
    }

    #[rstest]
    fn apply_keeps_identity_and_admins(draft: EventDraft) {
        let owner = AdminId::random();
        let mut event =
            Event::new(Uuid::new_v4(), owner, draft.clone(), Utc::now()).expect("valid event");
        let id = event.id();
        let helper = AdminId::random();
        event.add_admin(helper);

        event
            .apply(EventDraft {
                name: "DevFest 2026".to_owned(),
                description: "Day two".to_owned(),
                ..draft
            })
            .expect("valid update");

        assert_eq!(event.id(), id);
        assert_eq!(event.name(), "DevFest 2026");
        assert!(event.is_administered_by(&helper));
    }

    #[rstest]
    fn add_admin_is_idempotent(draft: EventDraft) {
        let owner = AdminId::random();
        let mut event = Event::new(Uuid::new_v4(), owner, draft, Utc::now()).expect("valid event");
        let helper = AdminId::random();

        assert!(event.add_admin(helper));
        assert!(!event.add_admin(helper));
        assert!(!event.add_admin(owner));
        assert_eq!(event.admins().len(), 2);
    }

    #[rstest]
    fn restore_always_includes_owner(draft: EventDraft) {
        let owner = AdminId::random();
        let other = AdminId::random();
        let event = Event::restore(Uuid::new_v4(), owner, draft, [other], Utc::now())
            .expect("valid event");
        assert!(event.is_administered_by(&owner));
        assert!(event.is_administered_by(&other));
    }
}
