//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror the serialised shape of the domain types that
//! handlers return directly (errors, dispatch reports, row rejections) and
//! live in the inbound adapter layer where framework concerns belong.

#![expect(
    dead_code,
    reason = "Schema wrappers exist only for OpenAPI generation via utoipa"
)]

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A scanned token does not belong to any participant.
    #[schema(rename = "invalid_code")]
    InvalidCode,
    /// A backing store is temporarily unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "event name must not be empty")]
    message: String,
    /// Supplementary details, e.g. the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::dispatch::FailureKind`].
#[derive(ToSchema)]
#[schema(as = crate::domain::dispatch::FailureKind)]
pub enum FailureKindSchema {
    #[schema(rename = "render")]
    Render,
    #[schema(rename = "transport")]
    Transport,
    /// Sent, but the delivery flag could not be stored.
    #[schema(rename = "delivery_state")]
    DeliveryState,
    #[schema(rename = "timeout")]
    Timeout,
    #[schema(rename = "contract")]
    Contract,
    /// The recipient's task stopped without an outcome.
    #[schema(rename = "aborted")]
    Aborted,
}

/// OpenAPI schema for [`crate::domain::dispatch::DeliveryFailure`].
#[derive(ToSchema)]
#[schema(as = crate::domain::dispatch::DeliveryFailure)]
#[schema(rename_all = "camelCase")]
pub struct DeliveryFailureSchema {
    #[schema(format = "uuid")]
    participant_id: String,
    kind: FailureKindSchema,
    detail: String,
}

/// OpenAPI schema for [`crate::domain::dispatch::DispatchReport`].
///
/// `sent + failures.length == attempted`.
#[derive(ToSchema)]
#[schema(as = crate::domain::dispatch::DispatchReport)]
pub struct DispatchReportSchema {
    attempted: usize,
    sent: usize,
    failures: Vec<DeliveryFailureSchema>,
}

/// OpenAPI schema for [`crate::domain::roster::RejectionReason`].
#[derive(ToSchema)]
#[schema(as = crate::domain::roster::RejectionReason)]
pub enum RejectionReasonSchema {
    #[schema(rename = "missing_required_field")]
    MissingRequiredField,
    #[schema(rename = "duplicate_email")]
    DuplicateEmail,
}

/// OpenAPI schema for [`crate::domain::roster::RowRejection`].
#[derive(ToSchema)]
#[schema(as = crate::domain::roster::RowRejection)]
pub struct RowRejectionSchema {
    /// One-based data row number.
    row: usize,
    cells: Vec<String>,
    reason: RejectionReasonSchema,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_variants_match_domain() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "not_found",
            "invalid_code",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(schema_json.contains(code), "missing {code}");
        }
    }

    #[test]
    fn error_schema_has_expected_name() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        assert!(schema_to_json::<ErrorSchema>().contains("details"));
    }

    #[test]
    fn delivery_failure_schema_uses_camel_case() {
        let schema_json = schema_to_json::<DeliveryFailureSchema>();
        assert!(schema_json.contains("participantId"));
    }
}
