use axum::{
    extract::{Query, RawQuery, State},
    Extension, Json,
};
use misima_core::{build_listing, BackLink, Blend, CollectionFilter, ProductCard};
use misima_storefront::{PageDirection, PageInfo, PageRequest};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_storefront_error, report_rejected, ApiError, ApiResponse, AppState, RejectedItem};

const BACK_URL: &str = "/cigars";
const BACK_URL_NAME: &str = "Our Cigars";

/// Query parameters consumed by the route itself; everything else is the
/// filter's query string.
const ROUTE_PARAMS: [&str; 3] = ["cursor", "direction", "toggles"];

#[derive(Debug, Deserialize)]
pub(super) struct CigarsQuery {
    cursor: Option<String>,
    direction: Option<String>,
    /// Comma-separated blend slugs clicked since the page loaded.
    toggles: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct CollectionInfo {
    handle: String,
    title: String,
    description: String,
}

#[derive(Debug, Serialize)]
pub(super) struct CigarsData {
    collection: CollectionInfo,
    filter: CollectionFilter,
    cards: Vec<ProductCard>,
    hidden: usize,
    rejected: Vec<RejectedItem>,
    page_info: PageInfo,
}

fn filter_search(raw: Option<&str>) -> String {
    raw.unwrap_or_default()
        .split('&')
        .filter(|pair| {
            let key = pair.split('=').next().unwrap_or_default();
            !pair.is_empty() && !ROUTE_PARAMS.contains(&key)
        })
        .collect::<Vec<_>>()
        .join("&")
}

/// Builds the filter from the page URL, then replays the clicks in order.
fn resolve_filter(raw_query: Option<&str>, toggles: Option<&str>) -> CollectionFilter {
    let initial = CollectionFilter::from_query(&filter_search(raw_query));
    toggles
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .fold(initial, |filter, slug| match Blend::from_slug(&slug) {
            Some(blend) => filter.reduce(blend),
            None => {
                tracing::debug!(slug = %slug, "ignoring unknown blend toggle");
                filter
            }
        })
}

pub(super) async fn list_cigars(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    RawQuery(raw_query): RawQuery,
    Query(query): Query<CigarsQuery>,
) -> Result<Json<ApiResponse<CigarsData>>, ApiError> {
    let filter = resolve_filter(raw_query.as_deref(), query.toggles.as_deref());
    let page = PageRequest {
        page_size: state.catalog.page_size,
        cursor: query.cursor,
        direction: PageDirection::parse(query.direction.as_deref()),
    };

    let handle = &state.catalog.collection_handle;
    let collection = state
        .client
        .collection_page(handle, &page)
        .await
        .map_err(|e| map_storefront_error(req_id.0.clone(), &e))?
        .ok_or_else(|| {
            ApiError::new(
                req_id.0.clone(),
                "not_found",
                format!("collection {handle} not found"),
            )
        })?;

    let back = BackLink::from_params(Some(BACK_URL), Some(BACK_URL_NAME));
    let listing = build_listing(&collection.products, Some(&filter), &back);

    Ok(ApiResponse::new(
        req_id.0,
        CigarsData {
            collection: CollectionInfo {
                handle: collection.handle,
                title: collection.title,
                description: collection.description,
            },
            filter,
            rejected: report_rejected("cigars", &listing.rejected),
            cards: listing.cards,
            hidden: listing.hidden,
            page_info: collection.page_info,
        },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_params_are_not_part_of_the_filter_query() {
        assert_eq!(
            filter_search(Some("collection=maria&cursor=abc&toggles=diego")),
            "collection=maria"
        );
        assert_eq!(filter_search(None), "");
    }

    #[test]
    fn query_selects_exclusive_blend() {
        let filter = resolve_filter(Some("collection=maria&cursor=abc"), None);
        assert!(filter.is_exclusive());
        assert!(filter.shows(Blend::Maria));
        assert!(!filter.shows(Blend::Pablo));
    }

    #[test]
    fn toggles_replay_in_independent_mode() {
        let filter = resolve_filter(None, Some("maria,diego,maria"));
        assert!(filter.shows(Blend::Pablo));
        assert!(filter.shows(Blend::Maria));
        assert!(!filter.shows(Blend::Diego));
    }

    #[test]
    fn toggles_in_exclusive_mode_switch_blend() {
        let filter = resolve_filter(Some("blend=pablo"), Some("Diego, bogus"));
        assert!(filter.shows(Blend::Diego));
        assert!(!filter.shows(Blend::Pablo));
        assert!(filter.is_exclusive());
    }
}
