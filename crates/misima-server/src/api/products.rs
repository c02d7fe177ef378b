use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode, Uri},
    response::{IntoResponse, Response},
    Extension,
};
use misima_core::{
    resolve_selected_variant, selected_options_from_query, BackLink, ProductPage,
    VariantResolution,
};
use serde::Serialize;

use crate::middleware::RequestId;

use super::viewport::{ClientHints, ViewportData};
use super::{map_storefront_error, ApiError, ApiResponse, AppState};

#[derive(Debug, Serialize)]
pub(super) struct ProductData {
    viewport: ViewportData,
    product: ProductPage,
}

/// Product detail. Redirects (302) to the first variant when the requested
/// options select nothing, keeping the request path.
pub(super) async fn get_product(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(handle): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    uri: Uri,
    hints: ClientHints,
) -> Result<Response, ApiError> {
    let selected_options = selected_options_from_query(&params);
    let back = BackLink::from_query(&params);

    let detail = state
        .client
        .product_detail(&handle, &selected_options)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("product {handle} not found"),
            )
        })?;

    let selected_variant = match resolve_selected_variant(&detail.product, &back, uri.path()) {
        VariantResolution::Selected(variant) => variant,
        VariantResolution::Redirect(location) => {
            tracing::debug!(handle = %handle, location = %location, "redirecting to first variant");
            return Ok((StatusCode::FOUND, [(header::LOCATION, location)]).into_response());
        }
    };

    let page = ProductPage::build(&detail.product, selected_variant, &detail.variants, back)
        .map_err(|e| {
            tracing::warn!(handle = %handle, segment = e.index, error = %e, "product description is malformed");
            ApiError::new(req_id.0.clone(), "upstream_error", e.to_string())
        })?;

    Ok(ApiResponse::new(
        req_id.0,
        ProductData {
            viewport: ViewportData::of(&hints),
            product: page,
        },
    )
    .into_response())
}
