//! Orchestrator probes at `/health/ready` and `/health/live`.
//!
//! The process moves through three phases: starting, serving, draining.
//! Readiness holds only while serving. Liveness holds until draining begins,
//! so a slow startup is not mistaken for a hung process.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

const STARTING: u8 = 0;
const SERVING: u8 = 1;
const DRAINING: u8 = 2;

/// Lifecycle phase shared by `main`, the server and the probe handlers.
#[derive(Debug)]
pub struct HealthState {
    phase: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(STARTING),
        }
    }

    /// Enter the serving phase. Has no effect once draining.
    pub fn mark_ready(&self) {
        // Ignoring the result: a failed exchange means we are already draining.
        let _ = self
            .phase
            .compare_exchange(STARTING, SERVING, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Enter the draining phase; both probes fail from here on.
    pub fn mark_unhealthy(&self) {
        self.phase.store(DRAINING, Ordering::Release);
    }

    fn phase(&self) -> u8 {
        self.phase.load(Ordering::Acquire)
    }
}

fn probe(healthy: bool) -> HttpResponse {
    let mut builder = if healthy {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// 200 while serving requests, 503 while starting or draining.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Accepting traffic"),
        (status = 503, description = "Starting up or draining")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.phase() == SERVING)
}

/// 200 until shutdown begins.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Process is running"),
        (status = 503, description = "Process is draining")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.phase() != DRAINING)
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    use super::*;

    #[derive(Clone, Copy, Debug)]
    enum Step {
        Ready,
        Drain,
    }

    async fn status_after(steps: &[Step], uri: &str) -> StatusCode {
        let state = web::Data::new(HealthState::new());
        for step in steps {
            match step {
                Step::Ready => state.mark_ready(),
                Step::Drain => state.mark_unhealthy(),
            }
        }
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(
            response
                .headers()
                .get(header::CACHE_CONTROL)
                .and_then(|value| value.to_str().ok()),
            Some("no-store")
        );
        response.status()
    }

    #[rstest]
    #[case::starting(&[], StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK)]
    #[case::serving(&[Step::Ready], StatusCode::OK, StatusCode::OK)]
    #[case::draining(&[Step::Ready, Step::Drain], StatusCode::SERVICE_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE)]
    #[case::late_ready_after_drain(&[Step::Drain, Step::Ready], StatusCode::SERVICE_UNAVAILABLE, StatusCode::SERVICE_UNAVAILABLE)]
    #[actix_web::test]
    async fn probes_follow_the_phase(
        #[case] steps: &[Step],
        #[case] ready_status: StatusCode,
        #[case] live_status: StatusCode,
    ) {
        assert_eq!(status_after(steps, "/health/ready").await, ready_status);
        assert_eq!(status_after(steps, "/health/live").await, live_status);
    }
}
