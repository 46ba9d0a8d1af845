//! Request correlation for the HTTP surface.
//!
//! Every request runs inside a task-local [`TraceId`] scope. The error
//! responder and the services' log lines read it back, and the id is echoed
//! in the `trace-id` response header so a client reporting a failed import
//! or dispatch can quote it. A caller may supply its own id in the same
//! header; it is kept when it parses as a UUID.
//!
//! Task-locals do not follow `tokio::spawn`. Work moved onto another task
//! keeps the id only when wrapped in [`TraceId::scope`].

use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tokio::task_local;
use tracing::{debug, error};
use uuid::Uuid;

/// Header used for both the inbound and the echoed trace id.
pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("trace-id");

task_local! {
    static CURRENT: TraceId;
}

/// Correlation id for one HTTP request.
///
/// # Examples
/// ```
/// use backend::middleware::trace::TraceId;
///
/// # tokio::runtime::Runtime::new().expect("runtime").block_on(async {
/// let id: TraceId = "7d1f6a52-3c4b-4e0c-9f0a-1b2c3d4e5f60".parse().expect("uuid");
/// assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
/// assert_eq!(TraceId::current(), None);
/// # });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(pub(crate) Uuid);

impl TraceId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }

    /// The id of the request being served, if any.
    pub fn current() -> Option<Self> {
        CURRENT.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` as the current id.
    pub async fn scope<Fut>(trace_id: Self, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        CURRENT.scope(trace_id, fut).await
    }

    fn from_request(req: &ServiceRequest) -> Option<Self> {
        req.headers()
            .get(TRACE_ID_HEADER)?
            .to_str()
            .ok()?
            .parse()
            .ok()
    }
}

impl fmt::Display for TraceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Middleware factory; wrap the whole app with it.
///
/// ```
/// use actix_web::App;
/// use backend::Trace;
///
/// let _app = App::new().wrap(Trace);
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Trace;

impl<S, B> Transform<S, ServiceRequest> for Trace
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = TraceMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TraceMiddleware { inner: service }))
    }
}

/// Service produced by [`Trace`].
pub struct TraceMiddleware<S> {
    inner: S,
}

impl<S, B> Service<ServiceRequest> for TraceMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let trace_id = TraceId::from_request(&req).unwrap_or_else(TraceId::fresh);
        let method = req.method().clone();
        let path = req.path().to_owned();
        let started = Instant::now();
        let pending = self.inner.call(req);

        Box::pin(TraceId::scope(trace_id, async move {
            let mut res = pending.await?;
            debug!(
                %trace_id,
                %method,
                %path,
                status = res.status().as_u16(),
                elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
                "request completed"
            );
            stamp(&mut res, trace_id);
            Ok(res)
        }))
    }
}

fn stamp<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::try_from(trace_id.to_string()) {
        Ok(value) => {
            res.headers_mut().insert(TRACE_ID_HEADER, value);
        }
        Err(err) => error!(%trace_id, error = %err, "trace id is not a valid header value"),
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use super::*;

    async fn echo_current() -> HttpResponse {
        tokio::task::yield_now().await;
        HttpResponse::Ok().body(TraceId::current().map(|id| id.to_string()).unwrap_or_default())
    }

    /// Serve `GET /` through the middleware; returns the header and body.
    async fn call_root(inbound: Option<&str>) -> (String, String) {
        let app = test::init_service(
            App::new()
                .wrap(Trace)
                .route("/", web::get().to(echo_current)),
        )
        .await;
        let mut req = test::TestRequest::get().uri("/");
        if let Some(value) = inbound {
            req = req.insert_header((TRACE_ID_HEADER, value));
        }
        let res = test::call_service(&app, req.to_request()).await;
        let header = res
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .expect("trace-id header")
            .to_owned();
        let body = test::read_body(res).await;
        (header, String::from_utf8(body.to_vec()).expect("utf8 body"))
    }

    #[actix_web::test]
    async fn handler_sees_the_echoed_id() {
        let (header, body) = call_root(None).await;
        assert!(Uuid::parse_str(&header).is_ok());
        assert_eq!(header, body);
    }

    #[actix_web::test]
    async fn valid_inbound_id_is_kept() {
        let supplied = "7d1f6a52-3c4b-4e0c-9f0a-1b2c3d4e5f60";
        let (header, body) = call_root(Some(supplied)).await;
        assert_eq!(header, supplied);
        assert_eq!(body, supplied);
    }

    #[rstest]
    #[case::not_a_uuid("not-a-uuid")]
    #[case::empty("")]
    #[actix_web::test]
    async fn unusable_inbound_id_is_replaced(#[case] supplied: &str) {
        let (header, _) = call_root(Some(supplied)).await;
        assert_ne!(header, supplied);
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[tokio::test]
    async fn no_id_outside_a_scope() {
        assert_eq!(TraceId::current(), None);
        let id = TraceId::fresh();
        assert_eq!(TraceId::scope(id, async { TraceId::current() }).await, Some(id));
        assert_eq!(TraceId::current(), None);
    }
}
