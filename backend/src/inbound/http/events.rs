//! Event HTTP handlers.
//!
//! ```text
//! POST   /api/v1/events
//! GET    /api/v1/events?adminId=
//! GET    /api/v1/events/{eventId}
//! PUT    /api/v1/events/{eventId}
//! DELETE /api/v1/events/{eventId}
//! POST   /api/v1/events/{eventId}/admins
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{AdminId, Error, Event, EventDraft};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_event_date, parse_uuid,
};

/// Request payload for creating an event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequestBody {
    #[schema(format = "uuid")]
    pub owner_id: String,
    pub name: String,
    /// `YYYY-MM-DD` or an RFC 3339 timestamp.
    #[schema(example = "2026-03-05")]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

/// Request payload for editing an event's details.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequestBody {
    pub name: String,
    #[schema(example = "2026-03-05")]
    pub date: String,
    #[serde(default)]
    pub description: String,
}

/// Request payload for granting an admin access to an event.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AssignAdminRequestBody {
    #[schema(format = "uuid")]
    pub admin_id: String,
}

/// Query parameters for listing events.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ListEventsQuery {
    /// Admin whose owned and assigned events are listed.
    pub admin_id: Option<String>,
}

/// Event representation returned to clients.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventBody {
    #[schema(format = "uuid")]
    pub id: String,
    pub name: String,
    #[schema(format = "date-time")]
    pub date: String,
    pub description: String,
    #[schema(format = "uuid")]
    pub owner_id: String,
    #[schema(value_type = Vec<uuid::Uuid>)]
    pub admin_ids: Vec<String>,
    #[schema(format = "date-time")]
    pub created_at: String,
}

impl From<&Event> for EventBody {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id().to_string(),
            name: event.name().to_owned(),
            date: event.date().to_rfc3339(),
            description: event.description().to_owned(),
            owner_id: event.owner().to_string(),
            admin_ids: event.admins().iter().map(ToString::to_string).collect(),
            created_at: event.created_at().to_rfc3339(),
        }
    }
}

fn parse_draft(name: String, date: &str, description: String) -> Result<EventDraft, Error> {
    Ok(EventDraft {
        name,
        date: parse_event_date(date, FieldName::new("date"))?,
        description,
    })
}

pub(crate) fn parse_event_id(raw: &str) -> Result<uuid::Uuid, Error> {
    parse_uuid(raw, FieldName::new("eventId"))
}

/// Create an event owned by `ownerId`.
#[utoipa::path(
    post,
    path = "/api/v1/events",
    request_body = CreateEventRequestBody,
    responses(
        (status = 201, description = "Event created", body = EventBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "createEvent"
)]
#[post("/events")]
pub async fn create_event(
    state: web::Data<HttpState>,
    payload: web::Json<CreateEventRequestBody>,
) -> ApiResult<HttpResponse> {
    let CreateEventRequestBody {
        owner_id,
        name,
        date,
        description,
    } = payload.into_inner();
    let owner = AdminId::new(parse_uuid(&owner_id, FieldName::new("ownerId"))?);
    let draft = parse_draft(name, &date, description)?;

    let event = state.events.create_event(owner, draft).await?;

    Ok(HttpResponse::Created().json(EventBody::from(&event)))
}

/// List the events an admin owns or was assigned to.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    params(ListEventsQuery),
    responses(
        (status = 200, description = "Events", body = [EventBody]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 503, description = "Service unavailable", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "listEvents"
)]
#[get("/events")]
pub async fn list_events(
    state: web::Data<HttpState>,
    query: web::Query<ListEventsQuery>,
) -> ApiResult<web::Json<Vec<EventBody>>> {
    let field = FieldName::new("adminId");
    let raw = query
        .into_inner()
        .admin_id
        .ok_or_else(|| missing_field_error(field))?;
    let admin = AdminId::new(parse_uuid(&raw, field)?);

    let events = state.events_query.list_events_for(admin).await?;

    Ok(web::Json(events.iter().map(EventBody::from).collect()))
}

/// Fetch one event.
#[utoipa::path(
    get,
    path = "/api/v1/events/{eventId}",
    params(("eventId" = String, Path, description = "Event identifier")),
    responses(
        (status = 200, description = "Event", body = EventBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "getEvent"
)]
#[get("/events/{event_id}")]
pub async fn get_event(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<EventBody>> {
    let event_id = parse_event_id(&path.into_inner())?;
    let event = state.events_query.get_event(event_id).await?;
    Ok(web::Json(EventBody::from(&event)))
}

/// Replace an event's name, date, and description.
#[utoipa::path(
    put,
    path = "/api/v1/events/{eventId}",
    params(("eventId" = String, Path, description = "Event identifier")),
    request_body = UpdateEventRequestBody,
    responses(
        (status = 200, description = "Event updated", body = EventBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "updateEvent"
)]
#[put("/events/{event_id}")]
pub async fn update_event(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateEventRequestBody>,
) -> ApiResult<web::Json<EventBody>> {
    let event_id = parse_event_id(&path.into_inner())?;
    let UpdateEventRequestBody {
        name,
        date,
        description,
    } = payload.into_inner();
    let draft = parse_draft(name, &date, description)?;

    let event = state.events.update_event(event_id, draft).await?;

    Ok(web::Json(EventBody::from(&event)))
}

/// Delete an event and its roster.
#[utoipa::path(
    delete,
    path = "/api/v1/events/{eventId}",
    params(("eventId" = String, Path, description = "Event identifier")),
    responses(
        (status = 204, description = "Event deleted"),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "deleteEvent"
)]
#[delete("/events/{event_id}")]
pub async fn delete_event(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let event_id = parse_event_id(&path.into_inner())?;
    state.events.delete_event(event_id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Grant an admin access to an event. Repeating the call is harmless.
#[utoipa::path(
    post,
    path = "/api/v1/events/{eventId}/admins",
    params(("eventId" = String, Path, description = "Event identifier")),
    request_body = AssignAdminRequestBody,
    responses(
        (status = 200, description = "Admin assigned", body = EventBody),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 404, description = "Event not found", body = ErrorSchema)
    ),
    tags = ["events"],
    operation_id = "assignEventAdmin"
)]
#[post("/events/{event_id}/admins")]
pub async fn assign_admin(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<AssignAdminRequestBody>,
) -> ApiResult<web::Json<EventBody>> {
    let event_id = parse_event_id(&path.into_inner())?;
    let admin = AdminId::new(parse_uuid(
        &payload.into_inner().admin_id,
        FieldName::new("adminId"),
    )?);

    let event = state.events.assign_admin(event_id, admin).await?;

    Ok(web::Json(EventBody::from(&event)))
}

#[cfg(test)]
#[path = "events_tests.rs"]
mod tests;
