//! GraphQL client for the Storefront API.

mod cart;
mod catalog;

use std::time::Duration;

use misima_core::AppConfig;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::StorefrontError;
use crate::rate_limit::{retry_with_backoff, RetryPolicy};
use crate::types::GraphQlResponse;

pub use catalog::{CollectionPage, ProductDetail};

/// Maximum number of collection pages walked by
/// [`StorefrontClient::fetch_all_collection_products`].
pub(super) const MAX_PAGES: usize = 200;

const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Seconds to wait when the platform throttles without a `Retry-After`.
const DEFAULT_RETRY_AFTER_SECS: u64 = 2;

/// Client for one store's Storefront API endpoint.
///
/// Throttling (HTTP 429 or a `THROTTLED` GraphQL error) is retried with
/// exponential backoff up to `max_retries` extra attempts. Network failures
/// are retried for queries only.
#[derive(Clone)]
pub struct StorefrontClient {
    client: Client,
    endpoint: String,
    token: String,
    max_retries: u32,
    backoff_base_secs: u64,
}

impl std::fmt::Debug for StorefrontClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorefrontClient")
            .field("endpoint", &self.endpoint)
            .field("token", &"[redacted]")
            .field("max_retries", &self.max_retries)
            .field("backoff_base_secs", &self.backoff_base_secs)
            .finish_non_exhaustive()
    }
}

impl StorefrontClient {
    /// # Errors
    ///
    /// - [`StorefrontError::InvalidEndpoint`] if `endpoint` is not an absolute URL.
    /// - [`StorefrontError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(
        endpoint: &str,
        token: &str,
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, StorefrontError> {
        let url = reqwest::Url::parse(endpoint).map_err(|e| StorefrontError::InvalidEndpoint {
            endpoint: endpoint.to_owned(),
            reason: e.to_string(),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(StorefrontError::InvalidEndpoint {
                endpoint: endpoint.to_owned(),
                reason: format!("unsupported scheme \"{}\"", url.scheme()),
            });
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: url.to_string(),
            token: token.to_owned(),
            max_retries,
            backoff_base_secs,
        })
    }

    /// # Errors
    ///
    /// See [`StorefrontClient::new`].
    pub fn from_config(config: &AppConfig) -> Result<Self, StorefrontError> {
        Self::new(
            &config.storefront_endpoint(),
            &config.storefront_token,
            config.request_timeout_secs,
            &config.user_agent,
            config.max_retries,
            config.retry_backoff_base_secs,
        )
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Posts one GraphQL operation and returns its `data`.
    ///
    /// `operation` names the query in logs and errors.
    ///
    /// # Errors
    ///
    /// - [`StorefrontError::RateLimited`] when throttled after all retries.
    /// - [`StorefrontError::NotFound`] on HTTP 404.
    /// - [`StorefrontError::UnexpectedStatus`] on any other non-2xx status.
    /// - [`StorefrontError::GraphQl`] when the response carries errors.
    /// - [`StorefrontError::MissingData`] when `data` is null without errors.
    /// - [`StorefrontError::Deserialize`] when the body does not match `T`.
    pub(crate) async fn graphql<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: Value,
    ) -> Result<T, StorefrontError> {
        self.post(RetryPolicy::Idempotent, operation, query, variables)
            .await
    }

    /// Like [`Self::graphql`], but never re-sends after a network failure.
    ///
    /// # Errors
    ///
    /// As [`Self::graphql`]; a timeout surfaces as [`StorefrontError::Http`]
    /// on the first occurrence.
    pub(crate) async fn graphql_mutation<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        query: &'static str,
        variables: Value,
    ) -> Result<T, StorefrontError> {
        self.post(RetryPolicy::ThrottledOnly, operation, query, variables)
            .await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        policy: RetryPolicy,
        operation: &'static str,
        query: &'static str,
        variables: Value,
    ) -> Result<T, StorefrontError> {
        let body = serde_json::json!({ "query": query, "variables": variables });

        retry_with_backoff(policy, self.max_retries, self.backoff_base_secs, || {
            let body = &body;
            async move {
                let response = self
                    .client
                    .post(&self.endpoint)
                    .header(ACCESS_TOKEN_HEADER, &self.token)
                    .header(reqwest::header::ACCEPT, "application/json")
                    .json(body)
                    .send()
                    .await?;
                let status = response.status();

                if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    let retry_after_secs = response
                        .headers()
                        .get(reqwest::header::RETRY_AFTER)
                        .and_then(|v| v.to_str().ok())
                        .and_then(|s| s.parse::<u64>().ok())
                        .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
                    return Err(StorefrontError::RateLimited { retry_after_secs });
                }

                if status == reqwest::StatusCode::NOT_FOUND {
                    return Err(StorefrontError::NotFound(self.endpoint.clone()));
                }

                if !status.is_success() {
                    return Err(StorefrontError::UnexpectedStatus {
                        status: status.as_u16(),
                        url: self.endpoint.clone(),
                    });
                }

                let text = response.text().await?;
                let parsed = serde_json::from_str::<GraphQlResponse<T>>(&text).map_err(|e| {
                    StorefrontError::Deserialize {
                        context: format!("{operation} response"),
                        source: e,
                    }
                })?;

                if parsed.errors.iter().any(|e| e.is_throttled()) {
                    return Err(StorefrontError::RateLimited {
                        retry_after_secs: DEFAULT_RETRY_AFTER_SECS,
                    });
                }
                if !parsed.errors.is_empty() {
                    return Err(StorefrontError::GraphQl(
                        parsed.errors.into_iter().map(|e| e.message).collect(),
                    ));
                }

                parsed.data.ok_or(StorefrontError::MissingData(operation))
            }
        })
        .await
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
