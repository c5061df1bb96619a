//! Image board API client implementation.
//!
//! Talks to the Moebooru JSON endpoints. Handles request/response processing,
//! error mapping, and retry logic for transient failures.

use std::time::Duration;

use reqwest::{header, Client, Response, StatusCode};
use tracing::{debug, instrument, warn};

use super::error::{ApiError, Result};
use super::types::{Post, Tag};
use crate::navigation::SearchParams;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Maximum number of retries for transient failures.
const MAX_RETRIES: u32 = 3;

/// Base delay between retries in milliseconds.
const RETRY_DELAY_MS: u64 = 1000;

/// Default number of suggestions requested per lookup.
pub const DEFAULT_SUGGESTION_LIMIT: u32 = 10;

const USER_AGENT: &str = concat!("lazybooru/", env!("CARGO_PKG_VERSION"));

/// The image board client.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct BooruClient {
    /// The HTTP client.
    client: Client,
    /// The base URL of the board, without a trailing slash.
    base_url: String,
}

impl BooruClient {
    /// Create a client for the board at `base_url`.
    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = normalize_base_url(base_url)?;
        let client = Self::build_http_client()?;
        Ok(Self { client, base_url })
    }

    /// Build the HTTP client with appropriate settings.
    fn build_http_client() -> Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(ApiError::Network)
    }

    /// Look up tags starting with `prefix`.
    ///
    /// Calls `GET /tag.json?limit={limit}&name={prefix}`. A single attempt:
    /// a newer keystroke will supersede this lookup anyway.
    #[instrument(skip(self), fields(prefix = %prefix))]
    pub async fn lookup_tags(&self, prefix: &str, limit: u32) -> Result<Vec<Tag>> {
        let url = self.tag_url(prefix, limit);
        let tags: Vec<Tag> = self.execute_get(&url).await?;
        debug!("Tag lookup returned {} suggestions", tags.len());
        Ok(tags)
    }

    /// Search posts matching `params`.
    ///
    /// Calls `GET /post.json?tags=..&limit=..&page=..`.
    #[instrument(skip(self), fields(tags = %params.tags, page = params.page))]
    pub async fn search_posts(&self, params: &SearchParams) -> Result<Vec<Post>> {
        let url = format!("{}/post.json?{}", self.base_url, params.to_query_string());
        let posts: Vec<Post> = self.get(&url).await?;
        debug!("Search returned {} posts", posts.len());
        Ok(posts)
    }

    /// Download raw image bytes from `url`.
    #[instrument(skip(self))]
    pub async fn fetch_image(&self, url: &str) -> Result<Vec<u8>> {
        let url = self.resolve(url);
        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::from_status(status, &url));
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }

    fn tag_url(&self, prefix: &str, limit: u32) -> String {
        format!(
            "{}/tag.json?limit={}&name={}",
            self.base_url,
            limit,
            urlencoding::encode(prefix)
        )
    }

    /// Turn protocol-relative and root-relative URLs into absolute ones.
    fn resolve(&self, url: &str) -> String {
        if let Some(rest) = url.strip_prefix("//") {
            format!("https://{}", rest)
        } else if url.starts_with('/') {
            format!("{}{}", self.base_url, url)
        } else {
            url.to_string()
        }
    }

    /// Perform a GET request with error handling.
    ///
    /// Includes retry logic for transient failures (rate limiting, server errors).
    #[instrument(skip(self), fields(url = %url))]
    async fn get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let mut attempts = 0;
        let mut last_error: Option<ApiError> = None;

        while attempts < MAX_RETRIES {
            attempts += 1;
            debug!("Request attempt {}/{}", attempts, MAX_RETRIES);

            match self.execute_get::<T>(url).await {
                Ok(response) => return Ok(response),
                Err(e) => {
                    if e.is_transient() && attempts < MAX_RETRIES {
                        let delay = Self::calculate_retry_delay(attempts);
                        warn!(
                            "Request failed (attempt {}), retrying in {}ms: {}",
                            attempts, delay, e
                        );
                        tokio::time::sleep(Duration::from_millis(delay)).await;
                        last_error = Some(e);
                    } else {
                        return Err(e);
                    }
                }
            }
        }

        Err(last_error.unwrap_or(ApiError::ServerError("Max retries exceeded".to_string())))
    }

    /// Execute a single GET request.
    async fn execute_get<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Handle the HTTP response, checking for errors and parsing JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T> {
        let status = response.status();
        let url = response.url().to_string();

        if status.is_success() {
            response
                .json::<T>()
                .await
                .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse response: {}", e)))
        } else {
            let error_body = response.text().await.unwrap_or_default();
            debug!("Error response body: {}", error_body);

            Err(Self::error_from_response(status, &url, &error_body))
        }
    }

    /// Create an appropriate error from an HTTP response.
    ///
    /// Moebooru reports failures as `{"success": false, "reason": ".."}`.
    fn error_from_response(status: StatusCode, url: &str, body: &str) -> ApiError {
        let reason = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|json| {
                json.get("reason")
                    .and_then(|r| r.as_str())
                    .map(str::to_string)
            })
            .filter(|reason| !reason.is_empty());

        ApiError::from_status(status, reason.as_deref().unwrap_or(url))
    }

    /// Calculate retry delay with exponential backoff.
    fn calculate_retry_delay(attempt: u32) -> u64 {
        RETRY_DELAY_MS * 2u64.pow(attempt - 1)
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Normalize the base URL by removing trailing slashes.
fn normalize_base_url(url: &str) -> Result<String> {
    let url = url.trim().trim_end_matches('/');

    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ApiError::InvalidUrl(url.to_string()));
    }
    if !url.starts_with("https://") && !url.contains("localhost") {
        warn!("URL does not use HTTPS: {}", url);
    }

    Ok(url.to_string())
}
