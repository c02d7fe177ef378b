//! Product card listings with per-product failure isolation.
//!
//! A product whose description does not parse is left out of the listing
//! and reported in [`Listing::rejected`]; the rest of the page still renders.

use serde::{Deserialize, Serialize};

use crate::blend::Blend;
use crate::cart::CartMutation;
use crate::descriptor::{parse_description, MalformedDescriptionError, ProductDescriptor};
use crate::filter::CollectionFilter;
use crate::money::Money;
use crate::product::{BackLink, Image};
use crate::variant::{variant_url, SelectedOption};

/// Cards above this index load their image eagerly.
const EAGER_IMAGE_COUNT: usize = 8;

/// The slice of a product that listing pages query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub description: String,
    pub featured_image: Option<Image>,
    pub min_price: Option<Money>,
    pub first_variant_id: Option<String>,
    pub first_variant_options: Vec<SelectedOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductCard {
    pub id: String,
    pub handle: String,
    pub title: String,
    pub descriptor: ProductDescriptor,
    pub blend_slug: String,
    pub blend: Option<Blend>,
    pub featured_image: Option<Image>,
    pub eager_image: bool,
    pub min_price: Option<Money>,
    pub url: String,
    pub add_to_cart: Option<CartMutation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedProduct {
    pub handle: String,
    pub error: MalformedDescriptionError,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub cards: Vec<ProductCard>,
    /// Products left out because their description is malformed.
    pub rejected: Vec<RejectedProduct>,
    /// Well-formed products left out by the filter.
    pub hidden: usize,
}

/// Builds cards for `products`, keeping only those `filter` shows.
///
/// Pass no filter to list every well-formed product regardless of blend.
#[must_use]
pub fn build_listing(
    products: &[ProductSummary],
    filter: Option<&CollectionFilter>,
    back: &BackLink,
) -> Listing {
    let mut listing = Listing::default();

    for (index, product) in products.iter().enumerate() {
        let descriptor = match parse_description(&product.description) {
            Ok(d) => d,
            Err(error) => {
                listing.rejected.push(RejectedProduct {
                    handle: product.handle.clone(),
                    error,
                });
                continue;
            }
        };

        if filter.is_some_and(|f| !f.shows_product(&descriptor)) {
            listing.hidden += 1;
            continue;
        }

        let url = back.apply(variant_url(&product.handle, &product.first_variant_options));

        listing.cards.push(ProductCard {
            id: product.id.clone(),
            handle: product.handle.clone(),
            title: product.title.clone(),
            blend_slug: descriptor.collection_slug(),
            blend: descriptor.blend(),
            descriptor,
            featured_image: product.featured_image.clone(),
            eager_image: index < EAGER_IMAGE_COUNT,
            min_price: product.min_price.clone(),
            url,
            add_to_cart: product.first_variant_id.as_deref().map(CartMutation::add_one),
        });
    }

    listing
}
