//! Product, collection and recommendation queries.

use misima_core::{Product, ProductSummary, ProductVariant, SelectedOption};
use serde_json::json;

use crate::error::StorefrontError;
use crate::normalize::{normalize_product, normalize_product_item, normalize_variant};
use crate::pagination::{PageInfo, PageRequest};
use crate::queries::{
    COLLECTION_QUERY, PRODUCT_QUERY, RECOMMENDED_PRODUCTS_QUERY, VARIANTS_QUERY,
};
use crate::types::{CollectionData, ProductData, RecommendedData, VariantsData};

use super::{StorefrontClient, MAX_PAGES};

/// A product together with its full variant list.
#[derive(Debug, Clone)]
pub struct ProductDetail {
    pub product: Product,
    /// Empty when the variants query failed; the page renders without
    /// availability in that case.
    pub variants: Vec<ProductVariant>,
}

#[derive(Debug, Clone)]
pub struct CollectionPage {
    pub handle: String,
    pub title: String,
    pub description: String,
    pub products: Vec<ProductSummary>,
    pub page_info: PageInfo,
}

impl StorefrontClient {
    /// Looks up a product and the variant matching `selected_options`.
    ///
    /// Returns `Ok(None)` for an unknown handle.
    ///
    /// # Errors
    ///
    /// Propagates transport, GraphQL and normalization errors.
    pub async fn product(
        &self,
        handle: &str,
        selected_options: &[SelectedOption],
    ) -> Result<Option<Product>, StorefrontError> {
        let data: ProductData = self
            .graphql(
                "Product",
                PRODUCT_QUERY,
                json!({ "handle": handle, "selectedOptions": selected_options }),
            )
            .await?;
        data.product.map(normalize_product).transpose()
    }

    /// Up to 250 variants of a product, in platform order.
    ///
    /// # Errors
    ///
    /// Propagates transport, GraphQL and normalization errors.
    pub async fn product_variants(
        &self,
        handle: &str,
    ) -> Result<Vec<ProductVariant>, StorefrontError> {
        let data: VariantsData = self
            .graphql("ProductVariants", VARIANTS_QUERY, json!({ "handle": handle }))
            .await?;
        data.product
            .map(|p| p.variants.nodes)
            .unwrap_or_default()
            .into_iter()
            .map(normalize_variant)
            .collect()
    }

    /// Issues the product and variants queries concurrently.
    ///
    /// A failing variants query degrades to an empty variant list.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Self::product`] only.
    pub async fn product_detail(
        &self,
        handle: &str,
        selected_options: &[SelectedOption],
    ) -> Result<Option<ProductDetail>, StorefrontError> {
        let (product, variants) = tokio::join!(
            self.product(handle, selected_options),
            self.product_variants(handle)
        );

        let Some(product) = product? else {
            return Ok(None);
        };
        let variants = variants.unwrap_or_else(|e| {
            tracing::warn!(handle, error = %e, "variants query failed, rendering without availability");
            Vec::new()
        });

        Ok(Some(ProductDetail { product, variants }))
    }

    /// One page of a collection's products. `Ok(None)` for an unknown handle.
    ///
    /// # Errors
    ///
    /// Propagates transport, GraphQL and normalization errors.
    pub async fn collection_page(
        &self,
        handle: &str,
        page: &PageRequest,
    ) -> Result<Option<CollectionPage>, StorefrontError> {
        let mut variables = page.variables();
        variables["handle"] = json!(handle);

        let data: CollectionData = self
            .graphql("Collection", COLLECTION_QUERY, variables)
            .await?;
        let Some(collection) = data.collection else {
            return Ok(None);
        };

        let products = collection
            .products
            .nodes
            .into_iter()
            .map(normalize_product_item)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(CollectionPage {
            handle: collection.handle,
            title: collection.title,
            description: collection.description,
            products,
            page_info: collection.products.page_info.into(),
        }))
    }

    /// Walks every page of a collection.
    ///
    /// Any page failure discards the pages fetched so far.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::NotFound`] for an unknown collection handle.
    /// - [`StorefrontError::PaginationLimit`] after [`MAX_PAGES`] pages.
    /// - Anything [`Self::collection_page`] returns.
    pub async fn fetch_all_collection_products(
        &self,
        handle: &str,
        page_size: u32,
    ) -> Result<Vec<ProductSummary>, StorefrontError> {
        let mut all_products = Vec::new();
        let mut request = Some(PageRequest::first(page_size));
        let mut page_count = 0usize;

        while let Some(page) = request {
            page_count += 1;
            if page_count > MAX_PAGES {
                return Err(StorefrontError::PaginationLimit {
                    handle: handle.to_owned(),
                    max_pages: MAX_PAGES,
                });
            }

            let collection = self
                .collection_page(handle, &page)
                .await?
                .ok_or_else(|| StorefrontError::NotFound(format!("collection {handle}")))?;

            tracing::debug!(
                handle,
                page = page_count,
                products = collection.products.len(),
                "fetched collection page"
            );
            all_products.extend(collection.products);
            request = collection.page_info.next(page_size);
        }

        Ok(all_products)
    }

    /// The first `count` products by relevance, reversed.
    ///
    /// # Errors
    ///
    /// Propagates transport, GraphQL and normalization errors.
    pub async fn recommended_products(
        &self,
        count: u32,
    ) -> Result<Vec<ProductSummary>, StorefrontError> {
        let data: RecommendedData = self
            .graphql(
                "RecommendedProducts",
                RECOMMENDED_PRODUCTS_QUERY,
                json!({ "first": count }),
            )
            .await?;
        data.products
            .nodes
            .into_iter()
            .map(normalize_product_item)
            .collect()
    }
}
