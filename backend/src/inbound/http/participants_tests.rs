//! Tests for participant roster HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::TimeZone;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::domain::roster::{ImportReport, RejectionReason};
use crate::inbound::http::test_utils::{MockPorts, test_app};
use crate::test_support::fixtures::ParticipantBuilder;

async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    (status, actix_test::read_body_json(response).await)
}

fn import_request(event_id: Uuid, body: Value) -> actix_test::TestRequest {
    actix_test::TestRequest::post()
        .uri(&format!("/api/v1/events/{event_id}/participants/import"))
        .set_json(body)
}

#[actix_web::test]
async fn list_participants_serialises_roster() {
    let event_id = Uuid::new_v4();
    let scanned_at = chrono::Utc
        .with_ymd_and_hms(2026, 3, 5, 9, 15, 0)
        .single()
        .expect("valid timestamp");
    let alice = ParticipantBuilder::new(event_id, "Alice", "alice@example.com")
        .token("tok-alice")
        .transaction_id("TX-1")
        .attended_at(scanned_at)
        .build();
    let mut ports = MockPorts::default();
    ports
        .events_query
        .expect_list_participants()
        .times(1)
        .return_once(move |_| Ok(vec![alice]));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri(&format!("/api/v1/events/{event_id}/participants")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let first = &body[0];
    assert_eq!(first["name"], "Alice");
    assert_eq!(first["token"], "tok-alice");
    assert_eq!(first["attended"], true);
    assert_eq!(first["attendedAt"], "2026-03-05T09:15:00+00:00");
    assert_eq!(first["payment"]["transactionId"], "TX-1");
    assert_eq!(first["receiptSent"], false);
}

#[actix_web::test]
async fn csv_import_is_split_and_reported_as_created() {
    let event_id = Uuid::new_v4();
    let mut ports = MockPorts::default();
    ports
        .roster_import
        .expect_import_roster()
        .withf(|_, table| {
            table.headers == ["name", "email"]
                && table.rows == vec![vec!["Alice".to_owned(), "alice@example.com".to_owned()]]
        })
        .times(1)
        .returning(|event_id, _| {
            Ok(ImportOutcome::Imported(ImportReport {
                created: vec![
                    ParticipantBuilder::new(event_id, "Alice", "alice@example.com").build(),
                ],
                rejected: vec![],
            }))
        });

    let (status, body) = call(
        ports,
        import_request(
            event_id,
            json!({"csv": "name,email\r\nAlice, alice@example.com\r\n"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "imported");
    assert_eq!(body["created"][0]["email"], "alice@example.com");
    assert_eq!(body["rejected"], json!([]));
}

#[actix_web::test]
async fn tabular_import_with_no_valid_rows_reports_rejections() {
    let event_id = Uuid::new_v4();
    let mut ports = MockPorts::default();
    ports
        .roster_import
        .expect_import_roster()
        .times(1)
        .returning(|_, table| {
            Ok(ImportOutcome::NoValidRows {
                rejected: vec![RowRejection {
                    row: 1,
                    cells: table.rows[0].clone(),
                    reason: RejectionReason::MissingRequiredField,
                }],
            })
        });

    let (status, body) = call(
        ports,
        import_request(
            event_id,
            json!({"headers": ["name", "email"], "rows": [["", "bob@example.com"]]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "no_valid_rows");
    assert_eq!(body["rejected"][0]["row"], 1);
    assert_eq!(body["rejected"][0]["reason"], "missing_required_field");
    assert_eq!(body["rejected"][0]["cells"], json!(["", "bob@example.com"]));
}

#[rstest]
#[case::both_shapes(json!({"csv": "name,email\nA,a@x.io", "headers": ["name"], "rows": []}))]
#[case::neither_shape(json!({}))]
#[case::headers_without_rows(json!({"headers": ["name", "email"]}))]
#[case::csv_without_data_rows(json!({"csv": "name,email\n"}))]
#[actix_web::test]
async fn malformed_roster_bodies_are_rejected(#[case] payload: Value) {
    let (status, body) = call(MockPorts::default(), import_request(Uuid::new_v4(), payload)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn partial_import_failure_surfaces_persisted_count() {
    let mut ports = MockPorts::default();
    ports
        .roster_import
        .expect_import_roster()
        .times(1)
        .returning(|_, _| {
            Err(Error::service_unavailable("participant store unreachable")
                .with_details(json!({"persisted": 2})))
        });

    let (status, body) = call(
        ports,
        import_request(
            Uuid::new_v4(),
            json!({"headers": ["name", "email"], "rows": [["Alice", "alice@example.com"]]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["details"]["persisted"], 2);
}
