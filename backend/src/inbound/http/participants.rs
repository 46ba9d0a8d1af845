//! Participant roster HTTP handlers.
//!
//! ```text
//! GET  /api/v1/events/{eventId}/participants
//! POST /api/v1/events/{eventId}/participants/import
//! ```

use std::collections::BTreeMap;

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::roster::{ImportOutcome, RosterTable, RowRejection};
use crate::domain::{Error, Participant, PaymentDetails};
use crate::inbound::http::ApiResult;
use crate::inbound::http::events::parse_event_id;
use crate::inbound::http::schemas::{ErrorSchema, RowRejectionSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, ambiguous_roster_error, missing_field_error};

/// Payment columns as stored on the participant.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentBody {
    pub transaction_id: String,
    pub transaction_time: String,
    pub amount: String,
    pub payment_mode: String,
}

impl From<&PaymentDetails> for PaymentBody {
    fn from(payment: &PaymentDetails) -> Self {
        Self {
            transaction_id: payment.transaction_id.clone(),
            transaction_time: payment.transaction_time.clone(),
            amount: payment.amount.clone(),
            payment_mode: payment.payment_mode.clone(),
        }
    }
}

/// Participant representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ParticipantBody {
    #[schema(format = "uuid")]
    pub id: String,
    #[schema(format = "uuid")]
    pub event_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    /// Value encoded into the participant's QR code.
    pub token: String,
    pub attended: bool,
    #[schema(format = "date-time")]
    pub attended_at: Option<String>,
    pub payment: PaymentBody,
    pub receipt_sent: bool,
    /// Roster columns outside the recognised set, keyed by header.
    pub extension_fields: BTreeMap<String, String>,
}

impl From<&Participant> for ParticipantBody {
    fn from(participant: &Participant) -> Self {
        Self {
            id: participant.id().to_string(),
            event_id: participant.event_id().to_string(),
            name: participant.name().to_owned(),
            email: participant.email().to_owned(),
            phone: participant.phone().to_owned(),
            token: participant.token().to_string(),
            attended: participant.attended(),
            attended_at: participant.attended_at().map(|at| at.to_rfc3339()),
            payment: PaymentBody::from(participant.payment()),
            receipt_sent: participant.receipt_sent(),
            extension_fields: participant.extension_fields().clone(),
        }
    }
}

/// Roster upload. Send either `csv` text or pre-split `headers` and `rows`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRosterRequestBody {
    /// Comma-separated text whose first non-blank line is the header.
    pub csv: Option<String>,
    pub headers: Option<Vec<String>>,
    pub rows: Option<Vec<Vec<String>>>,
}

/// Whether any row was imported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImportStatus {
    Imported,
    NoValidRows,
}

/// Import result: created participants plus the rows left behind.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ImportRosterResponseBody {
    pub status: ImportStatus,
    pub created: Vec<ParticipantBody>,
    #[schema(value_type = Vec<RowRejectionSchema>)]
    pub rejected: Vec<RowRejection>,
}

impl From<ImportOutcome> for ImportRosterResponseBody {
    fn from(outcome: ImportOutcome) -> Self {
        match outcome {
            ImportOutcome::Imported(report) => Self {
                status: ImportStatus::Imported,
                created: report.created.iter().map(ParticipantBody::from).collect(),
                rejected: report.rejected,
            },
            ImportOutcome::NoValidRows { rejected } => Self {
                status: ImportStatus::NoValidRows,
                created: Vec::new(),
                rejected,
            },
        }
    }
}

async fn parse_roster(body: ImportRosterRequestBody) -> Result<RosterTable, Error> {
    match body {
        ImportRosterRequestBody {
            csv: Some(csv),
            headers: None,
            rows: None,
        } => RosterTable::parse_delimited(&csv).await.map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(serde_json::json!({
                "field": "csv",
            }))
        }),
        ImportRosterRequestBody {
            csv: None,
            headers: Some(headers),
            rows,
        } => {
            let rows = rows.ok_or_else(|| missing_field_error(FieldName::new("rows")))?;
            Ok(RosterTable::new(headers, rows))
        }
        _ => Err(ambiguous_roster_error(FieldName::new("csv"))),
    }
}

/// List an event's roster in import order.
#[utoipa::path(
    get,
    path = "/api/v1/events/{eventId}/participants",
    params(("eventId" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Participants", body = [ParticipantBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["participants"],
    operation_id = "listParticipants"
)]
#[get("/events/{event_id}/participants")]
pub async fn list_participants(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Vec<ParticipantBody>>> {
    let event_id = parse_event_id(&path.into_inner())?;
    let participants = state.events_query.list_participants(event_id).await?;
    Ok(web::Json(
        participants.iter().map(ParticipantBody::from).collect(),
    ))
}

/// Import a roster into an event.
///
/// Responds `201` when at least one participant was created and `200` with
/// status `no_valid_rows` when every row was rejected.
#[utoipa::path(
    post,
    path = "/api/v1/events/{eventId}/participants/import",
    params(("eventId" = String, Path, description = "Event identifier")),
    request_body = ImportRosterRequestBody,
    responses(
        (status = 201, description = "Participants created", body = ImportRosterResponseBody),
        (status = 200, description = "No row qualified", body = ImportRosterResponseBody),
        (status = 400, description = "Malformed roster", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["participants"],
    operation_id = "importRoster"
)]
#[post("/events/{event_id}/participants/import")]
pub async fn import_roster(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ImportRosterRequestBody>,
) -> ApiResult<HttpResponse> {
    let event_id = parse_event_id(&path.into_inner())?;
    let table = parse_roster(payload.into_inner()).await?;

    let body = ImportRosterResponseBody::from(
        state.roster_import.import_roster(event_id, table).await?,
    );

    let mut response = match body.status {
        ImportStatus::Imported => HttpResponse::Created(),
        ImportStatus::NoValidRows => HttpResponse::Ok(),
    };
    Ok(response.json(body))
}

#[cfg(test)]
#[path = "participants_tests.rs"]
mod tests;
