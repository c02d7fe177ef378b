mod cart;
mod cigars;
mod home;
mod products;
mod viewport;

use axum::{
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use misima_core::{AppConfig, CartMutationError, RejectedProduct};
use misima_storefront::{StorefrontClient, StorefrontError};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{enforce_rate_limit, request_id, RateLimitState, RequestId};

/// Catalogue settings the routes need from the configuration.
#[derive(Debug, Clone)]
pub struct CatalogSettings {
    pub collection_handle: String,
    pub page_size: u32,
    pub recommended_count: u32,
}

impl CatalogSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            collection_handle: config.collection_handle.clone(),
            page_size: config.collection_page_size,
            recommended_count: config.recommended_count,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub client: StorefrontClient,
    pub catalog: CatalogSettings,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

/// A listing entry left out because its description is malformed.
#[derive(Debug, Serialize)]
pub(super) struct RejectedItem {
    handle: String,
    reason: String,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub(super) fn new(request_id: String, data: T) -> Json<Self> {
        Json(Self {
            data,
            meta: ResponseMeta::new(request_id),
        })
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            "upstream_error" => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn map_storefront_error(request_id: String, error: &StorefrontError) -> ApiError {
    match error {
        StorefrontError::RateLimited { .. } => {
            tracing::warn!(error = %error, "storefront throttled the request");
            ApiError::new(request_id, "rate_limited", "storefront is busy, try again shortly")
        }
        StorefrontError::NotFound(what) => ApiError::new(request_id, "not_found", what.clone()),
        StorefrontError::UserErrors(messages) => {
            ApiError::new(request_id, "validation_error", messages.join("; "))
        }
        StorefrontError::InvalidMutation(e @ CartMutationError::MissingCart { .. }) => {
            ApiError::new(request_id, "bad_request", e.to_string())
        }
        StorefrontError::InvalidMutation(e) => {
            ApiError::new(request_id, "validation_error", e.to_string())
        }
        StorefrontError::InvalidEndpoint { .. } | StorefrontError::PaginationLimit { .. } => {
            tracing::error!(error = %error, "storefront client misconfigured");
            ApiError::new(request_id, "internal_error", "storefront client misconfigured")
        }
        StorefrontError::Http(_)
        | StorefrontError::Deserialize { .. }
        | StorefrontError::UnexpectedStatus { .. }
        | StorefrontError::GraphQl(_)
        | StorefrontError::Normalization { .. }
        | StorefrontError::MissingData(_) => {
            tracing::error!(error = %error, "storefront request failed");
            ApiError::new(request_id, "upstream_error", "storefront request failed")
        }
    }
}

/// Logs and converts listing rejections for the response body.
pub(super) fn report_rejected(route: &'static str, rejected: &[RejectedProduct]) -> Vec<RejectedItem> {
    rejected
        .iter()
        .map(|r| {
            tracing::warn!(
                route,
                handle = %r.handle,
                segment = r.error.index,
                error = %r.error,
                "skipping product with malformed description"
            );
            RejectedItem {
                handle: r.handle.clone(),
                reason: r.error.to_string(),
            }
        })
        .collect()
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static("x-request-id"),
            HeaderName::from_static("sec-ch-viewport-width"),
            HeaderName::from_static("viewport-width"),
        ])
}

pub fn build_app(state: AppState, rate_limit: RateLimitState) -> Router {
    Router::new()
        .route("/api/v1/health", get(health))
        .route("/api/v1/home", get(home::home))
        .route("/api/v1/cigars", get(cigars::list_cigars))
        .route("/api/v1/products/{handle}", get(products::get_product))
        .route("/api/v1/cart", get(cart::get_cart))
        .route("/cart", post(cart::mutate_cart))
        .layer(axum::middleware::from_fn_with_state(
            rate_limit,
            enforce_rate_limit,
        ))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(Extension(req_id): Extension<RequestId>) -> impl IntoResponse {
    ApiResponse::new(req_id.0, HealthData { status: "ok" })
}
