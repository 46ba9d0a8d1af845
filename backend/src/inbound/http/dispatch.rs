//! Bulk mail HTTP handlers.
//!
//! ```text
//! POST /api/v1/events/{eventId}/dispatch/qr-codes
//! POST /api/v1/events/{eventId}/dispatch/receipts
//! POST /api/v1/events/{eventId}/dispatch/certificates
//! POST /api/v1/events/{eventId}/dispatch/notices
//! ```
//!
//! Every handler answers `200` with a dispatch report once the call
//! finishes, including when some recipients failed.

use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::Error;
use crate::domain::dispatch::{DispatchReport, RecipientSelection};
use crate::inbound::http::ApiResult;
use crate::inbound::http::events::parse_event_id;
use crate::inbound::http::schemas::{DispatchReportSchema, ErrorSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_uuid_list};

/// Recipient filter shared by every dispatch endpoint.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequestBody {
    /// Participants to address. Absent or empty addresses everyone eligible.
    #[schema(value_type = Option<Vec<uuid::Uuid>>)]
    pub participant_ids: Option<Vec<String>>,
}

/// Free-form notice to selected participants.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NoticeRequestBody {
    #[schema(value_type = Option<Vec<uuid::Uuid>>)]
    pub participant_ids: Option<Vec<String>>,
    pub subject: Option<String>,
    /// Plain text; escaped and wrapped into the HTML body.
    pub message: Option<String>,
}

fn selection(ids: Option<Vec<String>>) -> Result<RecipientSelection, Error> {
    let ids = ids
        .map(|ids| parse_uuid_list(ids, FieldName::new("participantIds")))
        .transpose()?;
    Ok(RecipientSelection::from_requested(ids))
}

fn target(
    path: web::Path<String>,
    participant_ids: Option<Vec<String>>,
) -> Result<(Uuid, RecipientSelection), Error> {
    let event_id = parse_event_id(&path.into_inner())?;
    Ok((event_id, selection(participant_ids)?))
}

/// Decode an optional JSON body. An empty body addresses everyone; a body
/// that is present but malformed is rejected rather than widened to all.
fn filter_ids(body: &web::Bytes) -> Result<Option<Vec<String>>, Error> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    serde_json::from_slice::<DispatchRequestBody>(body)
        .map(|request| request.participant_ids)
        .map_err(|err| Error::invalid_request(format!("malformed JSON body: {err}")))
}

/// Mail each selected participant their QR code.
#[utoipa::path(
    post,
    path = "/api/v1/events/{eventId}/dispatch/qr-codes",
    params(("eventId" = String, Path, description = "Event identifier")),
    request_body(content = DispatchRequestBody, description = "Optional recipient filter"),
    responses(
        (status = 200, description = "Dispatch report", body = DispatchReportSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["dispatch"],
    operation_id = "sendQrCodes"
)]
#[post("/events/{event_id}/dispatch/qr-codes")]
pub async fn send_qr_codes(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<DispatchReport>> {
    let (event_id, selection) = target(path, filter_ids(&body)?)?;
    let report = state.mailing.send_qr_codes(event_id, selection).await?;
    Ok(web::Json(report))
}

/// Mail payment receipts to selected participants with a transaction id.
#[utoipa::path(
    post,
    path = "/api/v1/events/{eventId}/dispatch/receipts",
    params(("eventId" = String, Path, description = "Event identifier")),
    request_body(content = DispatchRequestBody, description = "Optional recipient filter"),
    responses(
        (status = 200, description = "Dispatch report", body = DispatchReportSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["dispatch"],
    operation_id = "sendReceipts"
)]
#[post("/events/{event_id}/dispatch/receipts")]
pub async fn send_receipts(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<DispatchReport>> {
    let (event_id, selection) = target(path, filter_ids(&body)?)?;
    let report = state.mailing.send_receipts(event_id, selection).await?;
    Ok(web::Json(report))
}

/// Mail attendance certificates to selected participants who attended.
#[utoipa::path(
    post,
    path = "/api/v1/events/{eventId}/dispatch/certificates",
    params(("eventId" = String, Path, description = "Event identifier")),
    request_body(content = DispatchRequestBody, description = "Optional recipient filter"),
    responses(
        (status = 200, description = "Dispatch report", body = DispatchReportSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["dispatch"],
    operation_id = "sendCertificates"
)]
#[post("/events/{event_id}/dispatch/certificates")]
pub async fn send_certificates(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    body: web::Bytes,
) -> ApiResult<web::Json<DispatchReport>> {
    let (event_id, selection) = target(path, filter_ids(&body)?)?;
    let report = state.mailing.send_certificates(event_id, selection).await?;
    Ok(web::Json(report))
}

/// Mail a free-form notice to selected participants.
#[utoipa::path(
    post,
    path = "/api/v1/events/{eventId}/dispatch/notices",
    params(("eventId" = String, Path, description = "Event identifier")),
    request_body = NoticeRequestBody,
    responses(
        (status = 200, description = "Dispatch report", body = DispatchReportSchema),
        (status = 400, description = "Missing subject or message", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["dispatch"],
    operation_id = "sendNotice"
)]
#[post("/events/{event_id}/dispatch/notices")]
pub async fn send_notice(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<NoticeRequestBody>,
) -> ApiResult<web::Json<DispatchReport>> {
    let NoticeRequestBody {
        participant_ids,
        subject,
        message,
    } = payload.into_inner();
    let subject = subject.ok_or_else(|| missing_field_error(FieldName::new("subject")))?;
    let message = message.ok_or_else(|| missing_field_error(FieldName::new("message")))?;
    let (event_id, selection) = target(path, participant_ids)?;

    let report = state
        .mailing
        .send_notice(event_id, selection, subject, message)
        .await?;
    Ok(web::Json(report))
}

#[cfg(test)]
#[path = "dispatch_tests.rs"]
mod tests;
