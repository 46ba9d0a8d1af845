//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while allowing Actix
//! handlers to turn domain failures into consistent JSON responses and status
//! codes. The request's trace identifier travels in the `trace-id` response
//! header set by [`crate::middleware::Trace`] and is logged alongside every
//! server-side failure.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use tracing::{error, warn};

use crate::domain::{Error, ErrorCode};
use crate::middleware::trace::TraceId;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

const REDACTED_MESSAGE: &str = "Internal server error";

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::NotFound | ErrorCode::InvalidCode => StatusCode::NOT_FOUND,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn redact_if_internal(error: &Error) -> Error {
    if matches!(error.code(), ErrorCode::InternalError) {
        Error::internal(REDACTED_MESSAGE)
    } else {
        error.clone()
    }
}

fn log_failure(error: &Error, status: StatusCode) {
    let trace_id = TraceId::current().map(|id| id.to_string());
    if status.is_server_error() {
        error!(
            code = ?error.code(),
            message = error.message(),
            trace_id = trace_id.as_deref(),
            "request failed"
        );
    } else {
        warn!(
            code = ?error.code(),
            message = error.message(),
            trace_id = trace_id.as_deref(),
            "request rejected"
        );
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        log_failure(self, status);
        HttpResponse::build(status).json(redact_if_internal(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(REDACTED_MESSAGE)
    }
}
