//! Tests for the event service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::{EventRepositoryError, MockEventRepository, MockParticipantRepository};
use crate::outbound::memory::{InMemoryEventRepository, InMemoryParticipantRepository};
use crate::test_support::clock::MutableClock;
use crate::test_support::fixtures::ParticipantBuilder;

type MemoryEventService = EventService<InMemoryEventRepository, InMemoryParticipantRepository>;

fn draft(name: &str) -> EventDraft {
    EventDraft {
        name: name.to_owned(),
        date: Utc
            .with_ymd_and_hms(2026, 3, 5, 9, 0, 0)
            .single()
            .expect("valid date"),
        description: "Annual meetup".to_owned(),
    }
}

struct Harness {
    service: MemoryEventService,
    participants: Arc<InMemoryParticipantRepository>,
    clock: Arc<MutableClock>,
}

#[fixture]
fn harness() -> Harness {
    let clock = Arc::new(MutableClock::new(
        Utc.with_ymd_and_hms(2026, 1, 10, 8, 0, 0)
            .single()
            .expect("valid timestamp"),
    ));
    let participants = Arc::new(InMemoryParticipantRepository::new());
    Harness {
        service: EventService::new(
            Arc::new(InMemoryEventRepository::new()),
            participants.clone(),
            clock.clone(),
        ),
        participants,
        clock,
    }
}

#[rstest]
#[tokio::test]
async fn create_then_get_round_trips(harness: Harness) {
    let owner = AdminId::random();

    let created = harness
        .service
        .create_event(owner, draft("  DevFest  "))
        .await
        .expect("create succeeds");
    let fetched = harness
        .service
        .get_event(created.id())
        .await
        .expect("event exists");

    assert_eq!(fetched, created);
    assert_eq!(fetched.name(), "DevFest");
    assert_eq!(fetched.owner(), owner);
    assert_eq!(fetched.created_at(), harness.clock.utc());
}

#[rstest]
#[tokio::test]
async fn blank_name_is_invalid(harness: Harness) {
    let error = harness
        .service
        .create_event(AdminId::random(), draft("   "))
        .await
        .expect_err("blank name");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn update_replaces_details_but_keeps_admins(harness: Harness) {
    let owner = AdminId::random();
    let helper = AdminId::random();
    let event = harness
        .service
        .create_event(owner, draft("DevFest"))
        .await
        .expect("create");
    harness
        .service
        .assign_admin(event.id(), helper)
        .await
        .expect("assign");

    let updated = harness
        .service
        .update_event(event.id(), draft("DevFest 2026"))
        .await
        .expect("update");

    assert_eq!(updated.name(), "DevFest 2026");
    assert!(updated.is_administered_by(&helper));
    let fetched = harness.service.get_event(event.id()).await.expect("get");
    assert_eq!(fetched.name(), "DevFest 2026");
    assert!(fetched.is_administered_by(&helper));
}

#[rstest]
#[tokio::test]
async fn assign_admin_is_idempotent_and_lists_for_both(harness: Harness) {
    let owner = AdminId::random();
    let helper = AdminId::random();
    let event = harness
        .service
        .create_event(owner, draft("DevFest"))
        .await
        .expect("create");

    harness
        .service
        .assign_admin(event.id(), helper)
        .await
        .expect("first assign");
    let again = harness
        .service
        .assign_admin(event.id(), helper)
        .await
        .expect("second assign");

    assert_eq!(again.admins().len(), 2);
    for admin in [owner, helper] {
        let listed = harness
            .service
            .list_events_for(admin)
            .await
            .expect("list events");
        assert_eq!(listed.len(), 1);
    }
    let stranger = harness
        .service
        .list_events_for(AdminId::random())
        .await
        .expect("list events");
    assert!(stranger.is_empty());
}

#[rstest]
#[tokio::test]
async fn delete_removes_event(harness: Harness) {
    let event = harness
        .service
        .create_event(AdminId::random(), draft("DevFest"))
        .await
        .expect("create");

    harness
        .service
        .delete_event(event.id())
        .await
        .expect("delete");

    let error = harness
        .service
        .get_event(event.id())
        .await
        .expect_err("deleted");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case::update("update")]
#[case::delete("delete")]
#[case::assign("assign")]
#[case::participants("participants")]
#[tokio::test]
async fn unknown_event_is_not_found(harness: Harness, #[case] operation: &str) {
    let id = Uuid::new_v4();
    let result = match operation {
        "update" => harness.service.update_event(id, draft("x")).await.map(drop),
        "delete" => harness.service.delete_event(id).await,
        "assign" => harness
            .service
            .assign_admin(id, AdminId::random())
            .await
            .map(drop),
        _ => harness.service.list_participants(id).await.map(drop),
    };

    let error = result.expect_err("unknown event");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_participants_returns_event_roster(harness: Harness) {
    let event = harness
        .service
        .create_event(AdminId::random(), draft("DevFest"))
        .await
        .expect("create");
    for (name, email) in [("Alice", "a@example.com"), ("Bob", "b@example.com")] {
        harness
            .participants
            .insert(&ParticipantBuilder::new(event.id(), name, email).build())
            .await
            .expect("seed participant");
    }
    harness
        .participants
        .insert(&ParticipantBuilder::new(Uuid::new_v4(), "Eve", "e@example.com").build())
        .await
        .expect("seed other event");

    let roster = harness
        .service
        .list_participants(event.id())
        .await
        .expect("list participants");

    let names: Vec<_> = roster.iter().map(Participant::name).collect();
    assert_eq!(names, vec!["Alice", "Bob"]);
}

#[tokio::test]
async fn query_failure_is_internal() {
    let mut events = MockEventRepository::new();
    events
        .expect_list_for_admin()
        .return_once(|_| Err(EventRepositoryError::query("syntax error")));
    let service = EventService::new(
        Arc::new(events),
        Arc::new(MockParticipantRepository::new()),
        Arc::new(MutableClock::new(Utc::now())),
    );

    let error = service
        .list_events_for(AdminId::random())
        .await
        .expect_err("query failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
}
