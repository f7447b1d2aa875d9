use axum::extract::Request;
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use tracing::Instrument;
use tracing_subscriber::EnvFilter;

/// Initializes the global `tracing` subscriber using the given filter directive
/// (see [`crate::config::GraphConfig::tracing_filter`]).
pub fn init_tracing(filter_directive: &str) {
    let filter = EnvFilter::try_new(filter_directive).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Middleware that assigns a `request_id` to every inbound request, opens a
/// tracing span for it, and echoes the id back as `x-request-id`.
pub async fn request_id_middleware(mut req: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    req.extensions_mut().insert(RequestId(request_id.clone()));

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path(),
    );

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

/// Extension type carrying the per-request id, readable by handlers via
/// `Extension<RequestId>`.
#[derive(Clone, Debug)]
pub struct RequestId(pub String);
