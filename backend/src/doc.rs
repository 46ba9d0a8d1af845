//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer plus the
//! schema wrappers for domain types that handlers serialise directly. The
//! generated document is served by Swagger UI in debug builds.

use utoipa::OpenApi;

use crate::inbound::http::schemas::{
    DeliveryFailureSchema, DispatchReportSchema, ErrorCodeSchema, ErrorSchema, FailureKindSchema,
    RejectionReasonSchema, RowRejectionSchema,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Conference backend API",
        description = "Event rosters, attendance scanning, and bulk participant mail."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::events::create_event,
        crate::inbound::http::events::list_events,
        crate::inbound::http::events::get_event,
        crate::inbound::http::events::update_event,
        crate::inbound::http::events::delete_event,
        crate::inbound::http::events::assign_admin,
        crate::inbound::http::participants::list_participants,
        crate::inbound::http::participants::import_roster,
        crate::inbound::http::attendance::mark_attendance,
        crate::inbound::http::dispatch::send_qr_codes,
        crate::inbound::http::dispatch::send_receipts,
        crate::inbound::http::dispatch::send_certificates,
        crate::inbound::http::dispatch::send_notice,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        DispatchReportSchema,
        DeliveryFailureSchema,
        FailureKindSchema,
        RowRejectionSchema,
        RejectionReasonSchema,
    )),
    tags(
        (name = "events", description = "Event administration"),
        (name = "participants", description = "Rosters and imports"),
        (name = "attendance", description = "QR code scans"),
        (name = "dispatch", description = "Bulk participant mail"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
