//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

use crate::domain::Error;

pub mod attendance;
pub mod dispatch;
pub mod error;
pub mod events;
pub mod health;
pub mod participants;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub(crate) mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every `/api/v1` endpoint on `cfg`. Body and query extraction
/// failures are reported as `invalid_request` errors.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use backend::inbound::http::api_routes;
///
/// let _app = App::new().service(web::scope("/api/v1").configure(api_routes));
/// ```
pub fn api_routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed query string: {err}")).into()
    }))
    .service(events::create_event)
        .service(events::list_events)
        .service(events::get_event)
        .service(events::update_event)
        .service(events::delete_event)
        .service(events::assign_admin)
        .service(participants::list_participants)
        .service(participants::import_roster)
        .service(attendance::mark_attendance)
        .service(dispatch::send_qr_codes)
        .service(dispatch::send_receipts)
        .service(dispatch::send_certificates)
        .service(dispatch::send_notice);
}
