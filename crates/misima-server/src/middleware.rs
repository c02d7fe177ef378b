use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::{Request, State},
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

/// Newtype wrapping a request ID string, stored as a request extension.
#[derive(Debug, Clone)]
pub struct RequestId(pub String);

#[derive(Debug, Clone)]
struct RateLimitWindow {
    started_at: Instant,
    count: usize,
}

/// Fixed-window limiter shared by every route.
#[derive(Debug, Clone)]
pub struct RateLimitState {
    max_requests: usize,
    window: Duration,
    state: Arc<Mutex<RateLimitWindow>>,
}

impl RateLimitState {
    #[must_use]
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            state: Arc::new(Mutex::new(RateLimitWindow {
                started_at: Instant::now(),
                count: 0,
            })),
        }
    }

    #[must_use]
    pub fn per_minute(max_requests: usize) -> Self {
        Self::new(max_requests, Duration::from_secs(60))
    }
}

#[derive(Debug, Serialize)]
struct MiddlewareErrorBody {
    error: MiddlewareError,
}

#[derive(Debug, Serialize)]
struct MiddlewareError {
    code: &'static str,
    message: &'static str,
}

/// Uses the incoming `x-request-id` header or generates a `UUIDv4`, stores
/// it as a [`RequestId`] extension and echoes it on the response.
pub async fn request_id(mut req: Request, next: Next) -> Response {
    let id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map_or_else(|| Uuid::new_v4().to_string(), String::from);

    req.extensions_mut().insert(RequestId(id.clone()));

    let mut res = next.run(req).await;

    if let Ok(val) = HeaderValue::from_str(&id) {
        res.headers_mut().insert("x-request-id", val);
    }

    res
}

pub async fn enforce_rate_limit(
    State(rate_limit): State<RateLimitState>,
    req: Request,
    next: Next,
) -> Response {
    let mut window = rate_limit.state.lock().await;

    if window.started_at.elapsed() >= rate_limit.window {
        window.started_at = Instant::now();
        window.count = 0;
    }

    if window.count >= rate_limit.max_requests {
        tracing::warn!(max_requests = rate_limit.max_requests, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(MiddlewareErrorBody {
                error: MiddlewareError {
                    code: "rate_limited",
                    message: "rate limit exceeded",
                },
            }),
        )
            .into_response();
    }

    window.count += 1;
    drop(window);

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn app(rate_limit: RateLimitState) -> Router {
        Router::new()
            .route(
                "/",
                get(|Extension(id): Extension<RequestId>| async move { id.0 }),
            )
            .layer(axum::middleware::from_fn_with_state(
                rate_limit,
                enforce_rate_limit,
            ))
            .layer(axum::middleware::from_fn(request_id))
    }

    fn get_root(request_id: Option<&str>) -> axum::http::Request<Body> {
        let mut builder = axum::http::Request::builder().uri("/");
        if let Some(id) = request_id {
            builder = builder.header("x-request-id", id);
        }
        builder.body(Body::empty()).expect("request")
    }

    #[tokio::test]
    async fn request_id_is_echoed_when_supplied() {
        let response = app(RateLimitState::per_minute(10))
            .oneshot(get_root(Some("req-abc")))
            .await
            .expect("response");
        assert_eq!(response.headers()["x-request-id"], "req-abc");
    }

    #[tokio::test]
    async fn request_id_is_generated_when_missing() {
        let response = app(RateLimitState::per_minute(10))
            .oneshot(get_root(None))
            .await
            .expect("response");
        let id = response.headers()["x-request-id"].to_str().expect("ascii");
        assert!(Uuid::parse_str(id).is_ok(), "not a uuid: {id}");
    }

    #[tokio::test]
    async fn rate_limit_rejects_requests_past_the_window_budget() {
        let limit = RateLimitState::new(2, Duration::from_secs(3600));
        let app = app(limit);

        for _ in 0..2 {
            let ok = app.clone().oneshot(get_root(None)).await.expect("response");
            assert_eq!(ok.status(), StatusCode::OK);
        }
        let limited = app.oneshot(get_root(None)).await.expect("response");
        assert_eq!(limited.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
