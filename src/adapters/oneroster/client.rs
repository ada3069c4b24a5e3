//! HTTP client for OneRoster providers
//!
//! One implementation serves every provider; providers differ only in their
//! [`ProviderConfig`] (base URL, credentials, page size).

use super::auth::Session;
use super::fetcher::ResourceFetcher;
use super::models::{CollectionPage, QueryParams, ResourceType};
use crate::config::{ProviderConfig, RetryConfig};
use crate::domain::errors::OneRosterError;
use crate::domain::{Record, Result, RosterError};
use crate::{log_fetch_complete, log_fetch_start, log_retry_attempt};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use serde_json::Value;
use std::time::{Duration, Instant};
use url::Url;

/// Response header carrying the collection size
const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// OneRoster REST client
///
/// Owns the HTTP client and the authenticated [`Session`]. Implements
/// [`ResourceFetcher`] with full depagination.
///
/// # Example
///
/// ```no_run
/// use oneroster::adapters::oneroster::{OneRosterClient, QueryParams, ResourceFetcher};
/// use oneroster::config::ProviderConfig;
///
/// # async fn example() -> oneroster::domain::Result<()> {
/// let client = OneRosterClient::connect(ProviderConfig::default()).await?;
/// let users = client.get_users(&QueryParams::default()).await?;
/// println!("{} users", users.len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct OneRosterClient {
    http: Client,
    base_url: String,
    config: ProviderConfig,
    session: Session,
}

impl OneRosterClient {
    /// Build a client without authenticating
    ///
    /// # Errors
    ///
    /// Returns a configuration error for an invalid base URL or CA
    /// certificate, or if the HTTP client cannot be built.
    pub fn new(config: ProviderConfig) -> Result<Self> {
        let parsed = Url::parse(&config.base_url).map_err(|e| {
            RosterError::Configuration(format!("Invalid base_url '{}': {e}", config.base_url))
        })?;
        let base_url = parsed.as_str().trim_end_matches('/').to_string();

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30));

        if !config.tls_verify {
            tracing::warn!(
                provider = %config.name,
                "TLS certificate verification is DISABLED for {}. \
                This configuration is insecure and should only be used for development.",
                base_url
            );
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        if let Some(ca_path) = &config.tls_ca_cert {
            let pem = std::fs::read(ca_path).map_err(|e| {
                RosterError::Configuration(format!("Failed to read CA certificate {ca_path}: {e}"))
            })?;
            let certificate = reqwest::Certificate::from_pem(&pem).map_err(|e| {
                RosterError::Configuration(format!("Invalid CA certificate {ca_path}: {e}"))
            })?;
            client_builder = client_builder.add_root_certificate(certificate);
        }

        let http = client_builder.build().map_err(|e| {
            RosterError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        let session = Session::new(http.clone(), config.auth.clone());

        Ok(Self {
            http,
            base_url,
            config,
            session,
        })
    }

    /// Build a client and authenticate
    ///
    /// # Errors
    ///
    /// Any error from [`OneRosterClient::new`] or from authentication.
    pub async fn connect(config: ProviderConfig) -> Result<Self> {
        let client = Self::new(config)?;
        client.session.authenticate().await?;

        tracing::info!(
            provider = %client.config.name,
            base_url = %client.base_url,
            auth_type = client.session.auth_type(),
            "Connected to OneRoster provider"
        );

        Ok(client)
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Provider display name
    pub fn provider_name(&self) -> &str {
        &self.config.name
    }

    /// The authenticated session
    pub fn session(&self) -> &Session {
        &self.session
    }

    fn resource_url(&self, resource: ResourceType) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    /// Fetch one page of a collection
    ///
    /// # Errors
    ///
    /// Fails before any request when the session has no token. 401/403
    /// map to authentication errors and other non-success statuses to
    /// [`OneRosterError::Http`].
    pub async fn fetch_page(
        &self,
        resource: ResourceType,
        params: &QueryParams,
        limit: usize,
        offset: usize,
    ) -> Result<CollectionPage> {
        let token = self.session.bearer().await?;
        let url = self.resource_url(resource);
        let query = params.page_query_pairs(limit, offset);

        self.retry_request(|| async {
            let response = self
                .http
                .get(&url)
                .bearer_auth(&token)
                .query(&query)
                .send()
                .await
                .map_err(map_send_error)?;

            let status = response.status();
            if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
                let body = response.text().await.unwrap_or_default();
                return Err(OneRosterError::Authentication(format!(
                    "{resource} request rejected with status {status}: {body}"
                ))
                .into());
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                return Err(OneRosterError::Http {
                    status: status.as_u16(),
                    body,
                }
                .into());
            }

            let total_count = response
                .headers()
                .get(TOTAL_COUNT_HEADER)
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.trim().parse::<usize>().ok());

            let body: Value = response.json().await.map_err(|e| {
                OneRosterError::InvalidResponse(format!("Failed to parse {resource} page: {e}"))
            })?;

            CollectionPage::from_body(resource, body, total_count)
        })
        .await
    }

    /// Verify that the provider is reachable and accepts the credential
    ///
    /// Requests a single user record.
    pub async fn health_check(&self) -> Result<()> {
        match self
            .fetch_page(ResourceType::Users, &QueryParams::default(), 1, 0)
            .await
        {
            Ok(_) => {
                tracing::info!(base_url = %self.base_url, "OneRoster health check passed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    base_url = %self.base_url,
                    error = %e,
                    "OneRoster health check failed"
                );
                Err(e)
            }
        }
    }

    /// Retry a request with exponential backoff
    ///
    /// Only retryable errors (transport, timeout, 429, 5xx) are retried, at
    /// most `max_retries` times after the first attempt.
    async fn retry_request<F, T, Fut>(&self, operation: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T>>,
    {
        let retry = &self.config.retry;
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    let retryable = matches!(&e, RosterError::OneRoster(err) if err.is_retryable());
                    if !retryable || attempt >= retry.max_retries {
                        return Err(e);
                    }

                    attempt += 1;
                    let delay = backoff_delay(retry, attempt);
                    log_retry_attempt!(attempt, retry.max_retries, delay.as_millis() as u64, e);

                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}

#[async_trait]
impl ResourceFetcher for OneRosterClient {
    async fn fetch_all(
        &self,
        resource: ResourceType,
        params: &QueryParams,
    ) -> Result<Vec<Record>> {
        let page_size = self.config.pagination.page_size;
        let max_pages = self.config.pagination.max_pages;
        let start = Instant::now();

        log_fetch_start!(resource, page_size);

        let mut records = Vec::new();
        let mut offset = 0;
        let mut pages = 0;

        loop {
            let page = self.fetch_page(resource, params, page_size, offset).await?;
            pages += 1;

            let received = page.len();
            let total_count = page.total_count;
            records.extend(page.records);
            offset += received;

            tracing::debug!(
                resource = %resource,
                page = pages,
                offset,
                count = received,
                total_count = ?total_count,
                "Fetched page"
            );

            if is_last_page(received, page_size, offset, total_count) {
                break;
            }

            if pages >= max_pages {
                tracing::error!(
                    resource = %resource,
                    max_pages,
                    fetched = records.len(),
                    total_count = ?total_count,
                    "Reached max_pages before the end of the collection"
                );
                return Err(OneRosterError::IncompleteCollection {
                    resource: resource.to_string(),
                    pages,
                    fetched: records.len(),
                }
                .into());
            }
        }

        log_fetch_complete!(resource, records.len(), pages, start.elapsed());

        Ok(records)
    }
}

/// Whether depagination should stop after a page
///
/// Stops on an empty page, once `offset` reaches a known total, or on a
/// short page when the server sends no total. With a known total, short
/// pages are followed since providers may cap `limit` below the request.
fn is_last_page(
    received: usize,
    page_size: usize,
    offset: usize,
    total_count: Option<usize>,
) -> bool {
    if received == 0 {
        return true;
    }

    match total_count {
        Some(total) => offset >= total,
        None => received < page_size,
    }
}

/// Backoff before retry number `attempt` (1-based)
fn backoff_delay(retry: &RetryConfig, attempt: usize) -> Duration {
    let exponent = attempt.saturating_sub(1) as i32;
    let delay_ms = retry.initial_delay_ms as f64 * retry.backoff_multiplier.powi(exponent);
    let delay_ms = delay_ms.min(retry.max_delay_ms as f64);
    Duration::from_millis(delay_ms as u64)
}

/// Map a failed `send()` to a transport or timeout error
pub(crate) fn map_send_error(err: reqwest::Error) -> OneRosterError {
    if err.is_timeout() {
        OneRosterError::Timeout(err.to_string())
    } else {
        OneRosterError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(0, 100, 0, None => true; "empty page")]
    #[test_case(100, 100, 100, None => false; "full page without total")]
    #[test_case(40, 100, 140, None => true; "short page without total")]
    #[test_case(100, 100, 200, Some(250) => false; "below total")]
    #[test_case(50, 100, 250, Some(250) => true; "reached total")]
    #[test_case(50, 100, 50, Some(250) => false; "capped page below total")]
    fn test_is_last_page(
        received: usize,
        page_size: usize,
        offset: usize,
        total: Option<usize>,
    ) -> bool {
        is_last_page(received, page_size, offset, total)
    }

    #[test]
    fn test_backoff_delay_grows_and_caps() {
        let retry = RetryConfig {
            max_retries: 5,
            initial_delay_ms: 100,
            max_delay_ms: 350,
            backoff_multiplier: 2.0,
        };

        assert_eq!(backoff_delay(&retry, 1), Duration::from_millis(100));
        assert_eq!(backoff_delay(&retry, 2), Duration::from_millis(200));
        assert_eq!(backoff_delay(&retry, 3), Duration::from_millis(350));
    }

    #[test]
    fn test_new_rejects_invalid_base_url() {
        let config = ProviderConfig {
            base_url: "not a url".to_string(),
            ..ProviderConfig::default()
        };

        let err = OneRosterClient::new(config).unwrap_err();
        assert!(matches!(err, RosterError::Configuration(_)));
    }

    #[test]
    fn test_resource_url_trims_trailing_slash() {
        let config = ProviderConfig {
            base_url: "https://roster.example.com/ims/oneroster/v1p1/".to_string(),
            ..ProviderConfig::default()
        };

        let client = OneRosterClient::new(config).unwrap();
        assert_eq!(
            client.resource_url(ResourceType::Enrollments),
            "https://roster.example.com/ims/oneroster/v1p1/enrollments"
        );
    }
}
