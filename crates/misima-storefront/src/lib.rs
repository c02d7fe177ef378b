pub mod client;
pub mod error;
pub mod normalize;
pub mod pagination;
pub mod queries;
pub(crate) mod rate_limit;
pub mod types;

pub use client::{CollectionPage, ProductDetail, StorefrontClient};
pub use error::StorefrontError;
pub use pagination::{PageDirection, PageInfo, PageRequest};
