//! Product detail: variant resolution, option selector and price display.

use serde::{Deserialize, Serialize};

use crate::blend::Blend;
use crate::cart::CartMutation;
use crate::descriptor::{parse_description, MalformedDescriptionError, ProductDescriptor};
use crate::money::Money;
use crate::variant::{options_url, variant_url, with_back_link, SelectedOption};

/// Query parameter prefixes added by predictive search and ad trackers.
const IGNORED_PARAM_PREFIXES: [&str; 6] = ["_sid", "_pos", "_psq", "_ss", "_v", "fbclid"];

const BACK_URL_PARAM: &str = "backUrl";
const BACK_URL_NAME_PARAM: &str = "backUrlName";

const DEFAULT_OPTION_NAME: &str = "Title";
const DEFAULT_OPTION_VALUE: &str = "Default Title";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub id: Option<String>,
    pub url: String,
    pub alt_text: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: String,
    pub title: String,
    pub sku: Option<String>,
    pub available_for_sale: bool,
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub image: Option<Image>,
    pub selected_options: Vec<SelectedOption>,
}

impl ProductVariant {
    fn matches(&self, options: &[SelectedOption]) -> bool {
        options.len() == self.selected_options.len()
            && options.iter().all(|o| self.selected_options.contains(o))
    }

    fn is_default(&self) -> bool {
        self.selected_options
            .iter()
            .any(|o| o.name == DEFAULT_OPTION_NAME && o.value == DEFAULT_OPTION_VALUE)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductOption {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub vendor: Option<String>,
    pub description: String,
    pub options: Vec<ProductOption>,
    /// Variant matching the requested options, if the platform found one.
    pub selected_variant: Option<ProductVariant>,
    /// Leading variants returned with the product (at least the first).
    pub variants: Vec<ProductVariant>,
}

/// Where the product page's back arrow points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackLink {
    pub url: String,
    pub name: String,
    /// Whether the visitor's URL carried the back-link parameters.
    #[serde(skip)]
    pub explicit: bool,
}

impl BackLink {
    #[must_use]
    pub fn from_params(url: Option<&str>, name: Option<&str>) -> Self {
        let url = url.filter(|u| !u.is_empty());
        let name = name.filter(|n| !n.is_empty());
        Self {
            explicit: url.is_some(),
            url: url.unwrap_or("/").to_owned(),
            name: name.unwrap_or("Home Page").to_owned(),
        }
    }

    #[must_use]
    pub fn from_query(pairs: &[(String, String)]) -> Self {
        let get = |key: &str| pairs.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str());
        Self::from_params(get(BACK_URL_PARAM), get(BACK_URL_NAME_PARAM))
    }

    pub(crate) fn apply(&self, url: String) -> String {
        if self.explicit {
            with_back_link(&url, &self.url, &self.name)
        } else {
            url
        }
    }
}

/// Option selections from the page's query parameters.
///
/// Tracking, predictive-search and back-link parameters are not options.
#[must_use]
pub fn selected_options_from_query(pairs: &[(String, String)]) -> Vec<SelectedOption> {
    pairs
        .iter()
        .filter(|(name, _)| {
            !IGNORED_PARAM_PREFIXES.iter().any(|p| name.starts_with(p))
                && name != BACK_URL_PARAM
                && name != BACK_URL_NAME_PARAM
        })
        .map(|(name, value)| SelectedOption::new(name.clone(), value.clone()))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariantResolution {
    /// Render with this variant (or none, for a product without variants).
    Selected(Option<ProductVariant>),
    /// The requested options match nothing; send the visitor to the first
    /// variant's options on the same page path.
    Redirect(String),
}

/// Decides which variant the page shows.
///
/// Single-variant products always show their default variant. Otherwise the
/// variant matching the requested options is used, and a request that
/// matches none redirects to `page_path` with the first variant's options.
#[must_use]
pub fn resolve_selected_variant(
    product: &Product,
    back: &BackLink,
    page_path: &str,
) -> VariantResolution {
    let Some(first) = product.variants.first() else {
        return VariantResolution::Selected(product.selected_variant.clone());
    };

    if first.is_default() {
        return VariantResolution::Selected(Some(first.clone()));
    }

    match &product.selected_variant {
        Some(selected) => VariantResolution::Selected(Some(selected.clone())),
        None => VariantResolution::Redirect(
            back.apply(options_url(page_path, &first.selected_options)),
        ),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceDisplay {
    pub price: Money,
    pub compare_at_price: Option<Money>,
    pub on_sale: bool,
}

impl PriceDisplay {
    fn of(variant: &ProductVariant) -> Self {
        Self {
            price: variant.price.clone(),
            compare_at_price: variant.compare_at_price.clone(),
            on_sale: variant.compare_at_price.is_some(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddToCart {
    pub label: &'static str,
    pub disabled: bool,
    pub mutation: Option<CartMutation>,
}

impl AddToCart {
    fn for_variant(variant: Option<&ProductVariant>) -> Self {
        match variant {
            Some(v) if v.available_for_sale => Self {
                label: "Add to shopping bag",
                disabled: false,
                mutation: Some(CartMutation::add_one(&v.id)),
            },
            _ => Self {
                label: "Sold out",
                disabled: true,
                mutation: None,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionValueView {
    pub value: String,
    pub is_active: bool,
    pub is_available: bool,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionSelectorView {
    pub name: String,
    pub values: Vec<OptionValueView>,
}

fn option_selectors(
    product: &Product,
    current: &[SelectedOption],
    variants: &[ProductVariant],
    back: &BackLink,
) -> Vec<OptionSelectorView> {
    product
        .options
        .iter()
        .filter(|o| o.values.len() > 1)
        .map(|option| OptionSelectorView {
            name: option.name.clone(),
            values: option
                .values
                .iter()
                .map(|value| {
                    let mut target: Vec<SelectedOption> = current
                        .iter()
                        .filter(|o| o.name != option.name)
                        .cloned()
                        .collect();
                    target.push(SelectedOption::new(option.name.clone(), value.clone()));

                    let is_available = variants
                        .iter()
                        .find(|v| v.matches(&target))
                        .is_some_and(|v| v.available_for_sale);
                    let is_active = current
                        .iter()
                        .any(|o| o.name == option.name && &o.value == value);

                    // Keep the product's option order in the URL.
                    target.sort_by_key(|o| {
                        product
                            .options
                            .iter()
                            .position(|p| p.name == o.name)
                            .unwrap_or(usize::MAX)
                    });

                    OptionValueView {
                        value: value.clone(),
                        is_active,
                        is_available,
                        to: back.apply(variant_url(&product.handle, &target)),
                    }
                })
                .collect(),
        })
        .collect()
}

/// Render-ready product detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPage {
    pub id: String,
    pub title: String,
    pub handle: String,
    pub vendor: Option<String>,
    pub descriptor: ProductDescriptor,
    pub attributes: Vec<(&'static str, String)>,
    pub blend_slug: String,
    pub blend: Option<Blend>,
    pub image: Option<Image>,
    pub selected_variant: Option<ProductVariant>,
    pub price: Option<PriceDisplay>,
    pub add_to_cart: AddToCart,
    pub options: Vec<OptionSelectorView>,
    pub back: BackLink,
}

impl ProductPage {
    /// Builds the page for an already-resolved variant.
    ///
    /// `variants` is the full variant list used for availability in the
    /// option selector; it may be empty while that list is unavailable.
    ///
    /// # Errors
    ///
    /// Returns [`MalformedDescriptionError`] when the description does not
    /// follow the attribute convention.
    pub fn build(
        product: &Product,
        selected_variant: Option<ProductVariant>,
        variants: &[ProductVariant],
        back: BackLink,
    ) -> Result<Self, MalformedDescriptionError> {
        let descriptor = parse_description(&product.description)?;
        let current = selected_variant
            .as_ref()
            .or_else(|| product.variants.first())
            .map(|v| v.selected_options.clone())
            .unwrap_or_default();

        Ok(Self {
            id: product.id.clone(),
            title: product.title.clone(),
            handle: product.handle.clone(),
            vendor: product.vendor.clone(),
            attributes: descriptor
                .attributes()
                .into_iter()
                .map(|(label, value)| (label, value.to_owned()))
                .collect(),
            blend_slug: descriptor.collection_slug(),
            blend: descriptor.blend(),
            image: selected_variant.as_ref().and_then(|v| v.image.clone()),
            price: selected_variant.as_ref().map(PriceDisplay::of),
            add_to_cart: AddToCart::for_variant(selected_variant.as_ref()),
            options: option_selectors(product, &current, variants, &back),
            descriptor,
            selected_variant,
            back,
        })
    }
}

#[cfg(test)]
#[path = "product_test.rs"]
mod tests;
