//! Storefront API response shapes.
//!
//! These mirror the selections in [`crate::queries`] field for field.
//! Connections are always queried as `nodes`, never `edges`.
//!
//! Money amounts arrive as decimal strings (`"12.5"`) and are parsed during
//! normalization. The platform returns `null` for a missing
//! `compareAtPrice`, `image` or `checkoutUrl`, and never omits lists.

use serde::Deserialize;

/// Envelope of every GraphQL response.
#[derive(Debug, Deserialize)]
pub struct GraphQlResponse<T> {
    pub data: Option<T>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
pub struct GraphQlError {
    pub message: String,
    #[serde(default)]
    pub extensions: Option<GraphQlErrorExtensions>,
}

impl GraphQlError {
    /// The platform reports query-cost throttling as a GraphQL error with
    /// code `THROTTLED` on an HTTP 200.
    #[must_use]
    pub fn is_throttled(&self) -> bool {
        self.extensions
            .as_ref()
            .and_then(|e| e.code.as_deref())
            .is_some_and(|c| c == "THROTTLED")
    }
}

#[derive(Debug, Deserialize)]
pub struct GraphQlErrorExtensions {
    pub code: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Nodes<T> {
    pub nodes: Vec<T>,
}

impl<T> Default for Nodes<T> {
    fn default() -> Self {
        Self { nodes: Vec::new() }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyV2 {
    pub amount: String,
    pub currency_code: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireImage {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireSelectedOption {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireProductRef {
    pub title: String,
    pub handle: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVariant {
    pub id: String,
    pub title: String,
    pub available_for_sale: bool,
    pub price: MoneyV2,
    pub compare_at_price: Option<MoneyV2>,
    pub image: Option<WireImage>,
    pub product: Option<WireProductRef>,
    #[serde(default)]
    pub selected_options: Vec<WireSelectedOption>,
    pub sku: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct WireProductOption {
    pub name: String,
    #[serde(default)]
    pub values: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProduct {
    pub id: String,
    pub title: String,
    pub vendor: Option<String>,
    pub handle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub options: Vec<WireProductOption>,
    pub selected_variant: Option<WireVariant>,
    #[serde(default)]
    pub variants: Nodes<WireVariant>,
}

#[derive(Debug, Deserialize)]
pub struct ProductData {
    pub product: Option<WireProduct>,
}

#[derive(Debug, Deserialize)]
pub struct WireProductVariants {
    pub variants: Nodes<WireVariant>,
}

#[derive(Debug, Deserialize)]
pub struct VariantsData {
    pub product: Option<WireProductVariants>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireVariantRef {
    pub id: String,
    #[serde(default)]
    pub selected_options: Vec<WireSelectedOption>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePriceRange {
    pub min_variant_price: MoneyV2,
}

/// The listing-card selection of a product.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProductItem {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub featured_image: Option<WireImage>,
    pub price_range: Option<WirePriceRange>,
    #[serde(default)]
    pub variants: Nodes<WireVariantRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WirePageInfo {
    pub has_previous_page: bool,
    pub has_next_page: bool,
    pub start_cursor: Option<String>,
    pub end_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireProductConnection {
    pub nodes: Vec<WireProductItem>,
    pub page_info: WirePageInfo,
}

#[derive(Debug, Deserialize)]
pub struct WireCollection {
    pub id: String,
    pub handle: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub products: WireProductConnection,
}

#[derive(Debug, Deserialize)]
pub struct CollectionData {
    pub collection: Option<WireCollection>,
}

#[derive(Debug, Deserialize)]
pub struct RecommendedData {
    pub products: Nodes<WireProductItem>,
}

#[derive(Debug, Deserialize)]
pub struct WireDiscountCode {
    pub code: String,
    pub applicable: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartCost {
    pub subtotal_amount: Option<MoneyV2>,
    pub total_amount: Option<MoneyV2>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCartLineCost {
    pub amount_per_quantity: Option<MoneyV2>,
    pub total_amount: Option<MoneyV2>,
    pub compare_at_amount_per_quantity: Option<MoneyV2>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireMerchandise {
    pub id: String,
    pub title: String,
    pub image: Option<WireImage>,
    pub product: WireProductRef,
    #[serde(default)]
    pub selected_options: Vec<WireSelectedOption>,
}

#[derive(Debug, Deserialize)]
pub struct WireCartLine {
    pub id: String,
    pub quantity: u32,
    pub cost: Option<WireCartLineCost>,
    pub merchandise: WireMerchandise,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WireCart {
    pub id: String,
    pub checkout_url: Option<String>,
    #[serde(default)]
    pub total_quantity: u32,
    #[serde(default)]
    pub discount_codes: Vec<WireDiscountCode>,
    pub cost: Option<WireCartCost>,
    #[serde(default)]
    pub lines: Nodes<WireCartLine>,
}

#[derive(Debug, Deserialize)]
pub struct CartData {
    pub cart: Option<WireCart>,
}

#[derive(Debug, Deserialize)]
pub struct WireUserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
    pub code: Option<String>,
}

/// Payload shared by every cart mutation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartMutationPayload {
    pub cart: Option<WireCart>,
    #[serde(default)]
    pub user_errors: Vec<WireUserError>,
}

/// `data` of a cart mutation; the root field name depends on the mutation.
#[derive(Debug, Deserialize)]
pub struct CartMutationData {
    #[serde(
        rename = "cartCreate",
        alias = "cartLinesAdd",
        alias = "cartLinesUpdate",
        alias = "cartLinesRemove",
        alias = "cartDiscountCodesUpdate"
    )]
    pub payload: CartMutationPayload,
}
