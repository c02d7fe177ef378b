use std::net::SocketAddr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    /// Store domain without scheme, e.g. `"don-misima.myshopify.com"`.
    pub store_domain: String,
    pub storefront_token: String,
    pub storefront_api_version: String,
    /// Collection backing the "Our Cigars" listing.
    pub collection_handle: String,
    pub collection_page_size: u32,
    pub recommended_count: u32,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_backoff_base_secs: u64,
    pub rate_limit_per_minute: usize,
}

impl AppConfig {
    /// Full GraphQL endpoint for the configured store and API version.
    #[must_use]
    pub fn storefront_endpoint(&self) -> String {
        format!(
            "https://{}/api/{}/graphql.json",
            self.store_domain.trim_end_matches('/'),
            self.storefront_api_version
        )
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("store_domain", &self.store_domain)
            .field("storefront_token", &"[redacted]")
            .field("storefront_api_version", &self.storefront_api_version)
            .field("collection_handle", &self.collection_handle)
            .field("collection_page_size", &self.collection_page_size)
            .field("recommended_count", &self.recommended_count)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff_base_secs", &self.retry_backoff_base_secs)
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .finish()
    }
}
