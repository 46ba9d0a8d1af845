//! Attendance scan HTTP handler.
//!
//! ```text
//! POST /api/v1/attendance
//! ```

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::AttendanceReceipt;
use crate::inbound::http::ApiResult;
use crate::inbound::http::participants::ParticipantBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Scanned QR code payload.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceRequestBody {
    #[schema(example = "3f2b6c1e-1741170000000-4821")]
    pub token: String,
}

/// Scan result.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MarkAttendanceResponseBody {
    pub participant: ParticipantBody,
    /// `true` when an earlier scan already recorded attendance.
    pub already_attended: bool,
}

impl From<AttendanceReceipt> for MarkAttendanceResponseBody {
    fn from(receipt: AttendanceReceipt) -> Self {
        Self {
            participant: ParticipantBody::from(&receipt.participant),
            already_attended: receipt.already_attended,
        }
    }
}

/// Record attendance for the participant owning `token`.
///
/// Repeating a scan succeeds with `alreadyAttended: true` and keeps the
/// first scan time.
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body = MarkAttendanceRequestBody,
    responses(
        (status = 200, description = "Attendance recorded", body = MarkAttendanceResponseBody),
        (status = 400, description = "Blank token", body = ErrorSchema),
        (status = 404, description = "Unknown token", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["attendance"],
    operation_id = "markAttendance"
)]
#[post("/attendance")]
pub async fn mark_attendance(
    state: web::Data<HttpState>,
    payload: web::Json<MarkAttendanceRequestBody>,
) -> ApiResult<web::Json<MarkAttendanceResponseBody>> {
    let receipt = state
        .attendance
        .mark_attendance(&payload.into_inner().token)
        .await?;
    Ok(web::Json(MarkAttendanceResponseBody::from(receipt)))
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};
    use uuid::Uuid;

    use super::*;
    use crate::domain::Error;
    use crate::inbound::http::test_utils::{MockPorts, test_app};
    use crate::test_support::fixtures::ParticipantBuilder;

    async fn scan(ports: MockPorts, token: &str) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports)).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/attendance")
            .set_json(json!({"token": token}))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        (status, actix_test::read_body_json(response).await)
    }

    #[rstest]
    #[case::first_scan(false)]
    #[case::repeat_scan(true)]
    #[actix_web::test]
    async fn scan_reports_previous_attendance(#[case] already_attended: bool) {
        let mut ports = MockPorts::default();
        ports
            .attendance
            .expect_mark_attendance()
            .withf(|token| token == "tok-alice")
            .times(1)
            .returning(move |_| {
                Ok(AttendanceReceipt {
                    participant: ParticipantBuilder::new(
                        Uuid::new_v4(),
                        "Alice",
                        "alice@example.com",
                    )
                    .token("tok-alice")
                    .build(),
                    already_attended,
                })
            });

        let (status, body) = scan(ports, "tok-alice").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["alreadyAttended"], already_attended);
        assert_eq!(body["participant"]["name"], "Alice");
    }

    #[actix_web::test]
    async fn unknown_token_is_not_found_with_invalid_code() {
        let mut ports = MockPorts::default();
        ports
            .attendance
            .expect_mark_attendance()
            .times(1)
            .returning(|_| Err(Error::invalid_code("no participant holds this token")));

        let (status, body) = scan(ports, "forged").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "invalid_code");
    }

    #[actix_web::test]
    async fn blank_token_is_invalid_request() {
        let mut ports = MockPorts::default();
        ports
            .attendance
            .expect_mark_attendance()
            .times(1)
            .returning(|_| Err(Error::invalid_request("token must not be blank")));

        let (status, body) = scan(ports, "   ").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "invalid_request");
    }
}
