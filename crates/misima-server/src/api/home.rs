use axum::{extract::State, Extension, Json};
use misima_core::{build_listing, BackLink, ProductCard};
use serde::Serialize;

use crate::middleware::RequestId;

use super::viewport::{ClientHints, ViewportData};
use super::{map_storefront_error, report_rejected, ApiError, ApiResponse, AppState, RejectedItem};

#[derive(Debug, Serialize)]
pub(super) struct HomeData {
    viewport: ViewportData,
    recommended: Vec<ProductCard>,
    rejected: Vec<RejectedItem>,
}

/// Recommended product cards for the landing page. No blend filter applies.
pub(super) async fn home(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    hints: ClientHints,
) -> Result<Json<ApiResponse<HomeData>>, ApiError> {
    let products = state
        .client
        .recommended_products(state.catalog.recommended_count)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    let listing = build_listing(&products, None, &BackLink::from_params(Some("/"), None));

    Ok(ApiResponse::new(
        req_id.0,
        HomeData {
            viewport: ViewportData::of(&hints),
            rejected: report_rejected("home", &listing.rejected),
            recommended: listing.cards,
        },
    ))
}
