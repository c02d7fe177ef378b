use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorefrontError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by storefront API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("not found: {0}")]
    NotFound(String),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("GraphQL errors: {}", .0.join("; "))]
    GraphQl(Vec<String>),

    /// Errors the platform reports for a cart mutation's input.
    #[error("cart rejected the request: {}", .0.join("; "))]
    UserErrors(Vec<String>),

    #[error("normalization error for {context}: {reason}")]
    Normalization { context: String, reason: String },

    #[error(transparent)]
    InvalidMutation(#[from] misima_core::CartMutationError),

    #[error("pagination limit reached for collection {handle}: exceeded {max_pages} pages")]
    PaginationLimit { handle: String, max_pages: usize },

    #[error("GraphQL response for {0} had no data")]
    MissingData(&'static str),

    #[error("invalid storefront endpoint \"{endpoint}\": {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },
}
