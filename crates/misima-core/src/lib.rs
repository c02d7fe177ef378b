pub mod app_config;
pub mod blend;
pub mod cart;
pub mod config;
pub mod descriptor;
pub mod filter;
pub mod listing;
pub mod money;
pub mod product;
pub mod variant;
pub mod viewport;

pub use app_config::{AppConfig, Environment};
pub use blend::Blend;
pub use cart::{
    project_cart, project_line, Cart, CartLine, CartLineCost, CartLineInput, CartLineUpdateInput,
    CartLineView, CartMutation, CartMutationError, CartView, DiscountCode, Merchandise, PriceType,
};
pub use config::{load_app_config, load_app_config_from_env};
pub use descriptor::{
    parse_description, MalformedDescriptionError, MalformedReason, ProductDescriptor,
};
pub use filter::{CollectionFilter, FilterMode};
pub use listing::{build_listing, Listing, ProductCard, ProductSummary, RejectedProduct};
pub use money::Money;
pub use product::{
    resolve_selected_variant, selected_options_from_query, AddToCart, BackLink, Image,
    OptionSelectorView, OptionValueView, PriceDisplay, Product, ProductOption, ProductPage,
    ProductVariant, VariantResolution,
};
pub use variant::{options_url, variant_url, with_back_link, SelectedOption};
pub use viewport::{ViewportClass, ViewportSource};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}
