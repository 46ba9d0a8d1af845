//! Tests for event HTTP handlers.

use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use chrono::TimeZone;
use mockall::predicate::eq;
use rstest::rstest;
use serde_json::{Value, json};
use uuid::Uuid;

use super::*;
use crate::inbound::http::test_utils::{MockPorts, test_app};
use crate::test_support::fixtures::sample_event;

fn event_from(owner: AdminId, draft: EventDraft) -> Event {
    let created_at = chrono::Utc
        .with_ymd_and_hms(2026, 1, 10, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    Event::new(Uuid::new_v4(), owner, draft, created_at).expect("valid event")
}

async fn call(ports: MockPorts, request: actix_test::TestRequest) -> (StatusCode, Value) {
    let app = actix_test::init_service(test_app(ports)).await;
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, json)
}

#[actix_web::test]
async fn create_event_returns_created_event() {
    let owner = Uuid::new_v4();
    let mut ports = MockPorts::default();
    ports
        .events
        .expect_create_event()
        .withf(move |admin, draft| {
            *admin.as_uuid() == owner && draft.name == "DevFest" && draft.description.is_empty()
        })
        .times(1)
        .returning(|admin, draft| Ok(event_from(admin, draft)));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri("/api/v1/events")
            .set_json(json!({"ownerId": owner, "name": "DevFest", "date": "2026-03-05"})),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["name"], "DevFest");
    assert_eq!(body["date"], "2026-03-05T00:00:00+00:00");
    assert_eq!(body["ownerId"], owner.to_string());
    assert_eq!(body["adminIds"], json!([owner.to_string()]));
}

#[rstest]
#[case::bad_owner(json!({"ownerId": "nope", "name": "DevFest", "date": "2026-03-05"}), "ownerId")]
#[case::bad_date(json!({"ownerId": Uuid::nil(), "name": "DevFest", "date": "soon"}), "date")]
#[actix_web::test]
async fn create_event_rejects_malformed_fields(#[case] payload: Value, #[case] field: &str) {
    let (status, body) = call(
        MockPorts::default(),
        actix_test::TestRequest::post()
            .uri("/api/v1/events")
            .set_json(payload),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["details"]["field"], field);
}

#[actix_web::test]
async fn create_event_with_missing_body_field_is_invalid_request() {
    let (status, body) = call(
        MockPorts::default(),
        actix_test::TestRequest::post()
            .uri("/api/v1/events")
            .set_json(json!({"name": "DevFest"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_request");
}

#[actix_web::test]
async fn list_events_requires_admin_id() {
    let (status, body) = call(
        MockPorts::default(),
        actix_test::TestRequest::get().uri("/api/v1/events"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["code"], "missing_field");
}

#[actix_web::test]
async fn list_events_returns_admin_events() {
    let event = sample_event();
    let owner = event.owner();
    let mut ports = MockPorts::default();
    ports
        .events_query
        .expect_list_events_for()
        .with(eq(owner))
        .times(1)
        .return_once(move |_| Ok(vec![event]));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri(&format!("/api/v1/events?adminId={owner}")),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    assert_eq!(body[0]["name"], "DevFest");
}

#[actix_web::test]
async fn get_unknown_event_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .events_query
        .expect_get_event()
        .times(1)
        .returning(|_| Err(Error::not_found("event not found")));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri(&format!("/api/v1/events/{}", Uuid::new_v4())),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn malformed_event_id_is_rejected_before_the_service() {
    let (status, body) = call(
        MockPorts::default(),
        actix_test::TestRequest::get().uri("/api/v1/events/not-a-uuid"),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "eventId");
}

#[actix_web::test]
async fn update_event_passes_new_details() {
    let event = sample_event();
    let event_id = event.id();
    let mut ports = MockPorts::default();
    ports
        .events
        .expect_update_event()
        .withf(move |id, draft| *id == event_id && draft.name == "DevFest 2026")
        .times(1)
        .return_once(move |_, draft| {
            let mut updated = event;
            updated.apply(draft).expect("valid draft");
            Ok(updated)
        });

    let (status, body) = call(
        ports,
        actix_test::TestRequest::put()
            .uri(&format!("/api/v1/events/{event_id}"))
            .set_json(json!({
                "name": "DevFest 2026",
                "date": "2026-03-06T09:00:00Z",
                "description": "Second edition"
            })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "DevFest 2026");
    assert_eq!(body["description"], "Second edition");
}

#[actix_web::test]
async fn delete_event_returns_no_content() {
    let event_id = Uuid::new_v4();
    let mut ports = MockPorts::default();
    ports
        .events
        .expect_delete_event()
        .with(eq(event_id))
        .times(1)
        .returning(|_| Ok(()));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::delete().uri(&format!("/api/v1/events/{event_id}")),
    )
    .await;

    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[actix_web::test]
async fn assign_admin_returns_updated_admins() {
    let event = sample_event();
    let event_id = event.id();
    let admin = AdminId::random();
    let mut ports = MockPorts::default();
    ports
        .events
        .expect_assign_admin()
        .with(eq(event_id), eq(admin))
        .times(1)
        .return_once(move |_, admin| {
            let mut updated = event;
            updated.add_admin(admin);
            Ok(updated)
        });

    let (status, body) = call(
        ports,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/events/{event_id}/admins"))
            .set_json(json!({"adminId": admin})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let admins = body["adminIds"].as_array().expect("admin list");
    assert!(admins.contains(&Value::from(admin.to_string())));
}

#[actix_web::test]
async fn storage_outage_maps_to_service_unavailable() {
    let mut ports = MockPorts::default();
    ports
        .events_query
        .expect_get_event()
        .returning(|_| Err(Error::service_unavailable("database unreachable")));

    let (status, body) = call(
        ports,
        actix_test::TestRequest::get().uri(&format!("/api/v1/events/{}", Uuid::new_v4())),
    )
    .await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["code"], "service_unavailable");
}
