//! Tests for the roster import service.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ErrorCode;
use crate::domain::dispatch::RecipientSelection;
use crate::domain::ports::{
    EventRepository, EventRepositoryError, MockEventRepository, MockParticipantRepository,
    ParticipantRepositoryError,
};
use crate::domain::roster::RejectionReason;
use crate::outbound::memory::{InMemoryEventRepository, InMemoryParticipantRepository};
use crate::test_support::clock::MutableClock;
use crate::test_support::fixtures::{ParticipantBuilder, sample_event};

fn table(headers: &[&str], rows: &[&[&str]]) -> RosterTable {
    RosterTable::new(
        headers.iter().map(|cell| (*cell).to_owned()).collect(),
        rows.iter()
            .map(|row| row.iter().map(|cell| (*cell).to_owned()).collect())
            .collect(),
    )
}

fn token_generator() -> Arc<ScanTokenGenerator> {
    let now = Utc
        .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    Arc::new(ScanTokenGenerator::new(Arc::new(MutableClock::new(now))))
}

struct Harness {
    event_id: Uuid,
    events: Arc<InMemoryEventRepository>,
    participants: Arc<InMemoryParticipantRepository>,
}

impl Harness {
    fn service(
        &self,
    ) -> RosterImportService<InMemoryEventRepository, InMemoryParticipantRepository> {
        RosterImportService::new(
            self.events.clone(),
            self.participants.clone(),
            token_generator(),
        )
    }

    async fn stored(&self) -> Vec<Participant> {
        self.participants
            .list_for_event(&self.event_id, &RecipientSelection::All)
            .await
            .expect("list participants")
    }
}

#[fixture]
async fn harness() -> Harness {
    let event = sample_event();
    let events = Arc::new(InMemoryEventRepository::new());
    events.insert(&event).await.expect("seed event");
    Harness {
        event_id: event.id(),
        events,
        participants: Arc::new(InMemoryParticipantRepository::new()),
    }
}

#[rstest]
#[tokio::test]
async fn imports_valid_rows_with_unique_tokens(#[future] harness: Harness) {
    let harness = harness.await;
    let roster = table(
        &["Name", "Email", "Mobile", "college"],
        &[
            &["Alice", "alice@example.com", "555-0100", "MIT"],
            &["Bob", "bob@example.com", "", ""],
        ],
    );

    let outcome = harness
        .service()
        .import_roster(harness.event_id, roster)
        .await
        .expect("import succeeds");

    let ImportOutcome::Imported(report) = outcome else {
        panic!("expected rows to be imported");
    };
    assert_eq!(report.created.len(), 2);
    assert!(report.rejected.is_empty());
    assert_ne!(report.created[0].token(), report.created[1].token());
    assert_eq!(
        report.created[0].extension_fields().get("college"),
        Some(&"MIT".to_owned())
    );
    assert_eq!(harness.stored().await.len(), 2);
}

#[rstest]
#[tokio::test]
async fn invalid_rows_are_reported_next_to_created_ones(#[future] harness: Harness) {
    let harness = harness.await;
    let roster = table(
        &["name", "email"],
        &[
            &["Alice", "alice@example.com"],
            &["", "ghost@example.com"],
            &["Alice Again", "ALICE@example.com"],
        ],
    );

    let outcome = harness
        .service()
        .import_roster(harness.event_id, roster)
        .await
        .expect("import succeeds");

    assert_eq!(outcome.created().len(), 1);
    let reasons: Vec<_> = outcome
        .rejected()
        .iter()
        .map(|rejection| (rejection.row, rejection.reason))
        .collect();
    assert_eq!(
        reasons,
        vec![
            (2, RejectionReason::MissingRequiredField),
            (3, RejectionReason::DuplicateEmail),
        ]
    );
}

#[rstest]
#[tokio::test]
async fn addresses_already_enrolled_are_rejected(#[future] harness: Harness) {
    let harness = harness.await;
    harness
        .participants
        .insert(&ParticipantBuilder::new(harness.event_id, "Alice", "alice@example.com").build())
        .await
        .expect("seed participant");

    let outcome = harness
        .service()
        .import_roster(
            harness.event_id,
            table(&["name", "email"], &[&["Alice", " Alice@Example.com "]]),
        )
        .await
        .expect("import call succeeds");

    assert!(matches!(outcome, ImportOutcome::NoValidRows { .. }));
    assert_eq!(outcome.rejected()[0].reason, RejectionReason::DuplicateEmail);
    assert_eq!(harness.stored().await.len(), 1);
}

#[rstest]
#[tokio::test]
async fn allow_policy_accepts_repeated_addresses(#[future] harness: Harness) {
    let harness = harness.await;
    let service = harness
        .service()
        .with_duplicate_policy(DuplicateEmailPolicy::Allow);

    let outcome = service
        .import_roster(
            harness.event_id,
            table(
                &["name", "email"],
                &[&["Alice", "a@example.com"], &["Alice", "a@example.com"]],
            ),
        )
        .await
        .expect("import succeeds");

    assert_eq!(outcome.created().len(), 2);
}

#[rstest]
#[tokio::test]
async fn header_without_required_columns_is_invalid(#[future] harness: Harness) {
    let harness = harness.await;

    let error = harness
        .service()
        .import_roster(
            harness.event_id,
            table(&["name", "phone"], &[&["Alice", "555"]]),
        )
        .await
        .expect_err("missing email column");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(error.message().contains("email"));
    assert!(harness.stored().await.is_empty());
}

#[rstest]
#[tokio::test]
async fn unknown_event_is_not_found(#[future] harness: Harness) {
    let harness = harness.await;

    let error = harness
        .service()
        .import_roster(
            Uuid::new_v4(),
            table(&["name", "email"], &[&["Alice", "a@example.com"]]),
        )
        .await
        .expect_err("unknown event");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn event_store_outage_is_service_unavailable() {
    let mut events = MockEventRepository::new();
    events
        .expect_find_by_id()
        .return_once(|_| Err(EventRepositoryError::connection("refused")));
    let mut participants = MockParticipantRepository::new();
    participants.expect_insert().times(0);

    let service =
        RosterImportService::new(Arc::new(events), Arc::new(participants), token_generator());
    let error = service
        .import_roster(
            Uuid::new_v4(),
            table(&["name", "email"], &[&["Alice", "a@example.com"]]),
        )
        .await
        .expect_err("outage");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn storage_failure_mid_import_reports_persisted_rows() {
    let event = sample_event();
    let event_id = event.id();
    let mut events = MockEventRepository::new();
    events
        .expect_find_by_id()
        .return_once(move |_| Ok(Some(event)));
    let mut participants = MockParticipantRepository::new();
    participants
        .expect_emails_for_event()
        .return_once(|_| Ok(Vec::new()));
    let mut inserted = 0;
    participants.expect_insert().times(2).returning(move |_| {
        inserted += 1;
        if inserted == 1 {
            Ok(())
        } else {
            Err(ParticipantRepositoryError::connection("connection reset"))
        }
    });

    let service =
        RosterImportService::new(Arc::new(events), Arc::new(participants), token_generator());
    let error = service
        .import_roster(
            event_id,
            table(
                &["name", "email"],
                &[
                    &["Alice", "a@example.com"],
                    &["Bob", "b@example.com"],
                    &["Carol", "c@example.com"],
                ],
            ),
        )
        .await
        .expect_err("second insert fails");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(
        error.details().and_then(|details| details.get("persisted")),
        Some(&serde_json::json!(1))
    );
}
