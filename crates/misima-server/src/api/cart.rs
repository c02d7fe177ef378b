//! Cart view and the `/cart` mutation endpoint.
//!
//! The cart id lives in the `cart` cookie as the last segment of the
//! platform's `gid://shopify/Cart/...` id.

use axum::{
    extract::{rejection::FormRejection, State},
    http::{header, HeaderMap, HeaderValue},
    response::{IntoResponse, Response},
    Extension, Form, Json,
};
use misima_core::{project_cart, CartMutation, CartView};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::viewport::{ClientHints, ViewportData};
use super::{map_storefront_error, ApiError, ApiResponse, AppState};

const CART_COOKIE: &str = "cart";
const CART_GID_PREFIX: &str = "gid://shopify/Cart/";

#[derive(Debug, Deserialize)]
pub(super) struct CartForm {
    #[serde(rename = "cartFormInput")]
    cart_form_input: String,
    #[serde(rename = "discountCode")]
    discount_code: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CartData {
    viewport: ViewportData,
    cart: CartView,
}

/// Full cart id from the request's `cart` cookie.
fn cart_id_from_headers(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == CART_COOKIE)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
        .map(|value| {
            if value.starts_with(CART_GID_PREFIX) {
                value.to_owned()
            } else {
                format!("{CART_GID_PREFIX}{value}")
            }
        })
}

fn cart_cookie(cart_id: &str) -> String {
    let token = cart_id.rsplit('/').next().unwrap_or(cart_id);
    format!("{CART_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub(super) async fn get_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    hints: ClientHints,
) -> Result<Json<ApiResponse<CartData>>, ApiError> {
    let cart = match cart_id_from_headers(&headers) {
        Some(cart_id) => state
            .client
            .cart(&cart_id)
            .await
            .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?
            .map_or_else(CartView::empty, |cart| project_cart(&cart)),
        None => CartView::empty(),
    };

    Ok(ApiResponse::new(
        req_id.0,
        CartData {
            viewport: ViewportData::of(&hints),
            cart,
        },
    ))
}

/// Applies one cart form submission.
///
/// `LinesAdd` without a cart creates one and sets the cookie.
pub(super) async fn mutate_cart(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    headers: HeaderMap,
    hints: ClientHints,
    form: Result<Form<CartForm>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(form) =
        form.map_err(|e| ApiError::new(req_id.0.clone(), "bad_request", e.body_text()))?;

    let mutation: CartMutation = serde_json::from_str(&form.cart_form_input).map_err(|e| {
        ApiError::new(
            req_id.0.clone(),
            "bad_request",
            format!("invalid cartFormInput: {e}"),
        )
    })?;
    let mutation = mutation.with_form_discount_code(form.discount_code.as_deref());

    let cart_id = cart_id_from_headers(&headers);
    let cart = state
        .client
        .apply_mutation(cart_id.as_deref(), &mutation)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?;

    tracing::info!(
        action = mutation.action(),
        cart_id = %cart.id,
        total_quantity = cart.total_quantity,
        "cart updated"
    );

    let set_cookie = if cart_id.as_deref() == Some(cart.id.as_str()) {
        None
    } else {
        Some(HeaderValue::from_str(&cart_cookie(&cart.id)).map_err(|_| {
            ApiError::new(
                req_id.0.clone(),
                "internal_error",
                "cart id is not a valid cookie value",
            )
        })?)
    };

    let mut response = ApiResponse::new(
        req_id.0,
        CartData {
            viewport: ViewportData::of(&hints),
            cart: project_cart(&cart),
        },
    )
    .into_response();
    if let Some(cookie) = set_cookie {
        response.headers_mut().append(header::SET_COOKIE, cookie);
    }
    Ok(response)
}
