//! HTTP server assembly for the conference backend.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use backend::Trace;
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::api_routes;
use backend::inbound::http::health::{HealthState, live, ready};
use backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use state_builders::build_http_state;

/// Probes at the root, the REST API under `/api/v1`, and Swagger UI in debug
/// builds, all behind the trace middleware.
fn conference_app(
    health: web::Data<HealthState>,
    state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .wrap(Trace)
        .app_data(health)
        .app_data(state)
        .service(ready)
        .service(live)
        .service(web::scope("/api/v1").configure(api_routes));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Bind the HTTP server and flip the readiness probe.
///
/// Services are built once here and cloned into every worker, so all
/// workers share one dispatch engine and its concurrency limit. Graceful
/// shutdown waits up to the dispatch deadline so running mail batches can
/// finish and record their delivery flags.
///
/// # Errors
/// Returns the [`std::io::Error`] raised when the socket cannot be bound.
pub fn create_server(
    health: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let bind_addr = config.bind_addr;
    let drain_secs = config.dispatch.deadline.as_secs();
    let state = build_http_state(config);

    let worker_health = health.clone();
    let server = HttpServer::new(move || conference_app(worker_health.clone(), state.clone()))
        .shutdown_timeout(drain_secs)
        .bind(bind_addr)?
        .run();

    info!(%bind_addr, drain_secs, "conference backend listening");
    health.mark_ready();
    Ok(server)
}
