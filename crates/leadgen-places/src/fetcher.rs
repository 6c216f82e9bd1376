//! The rate-limited JSON fetcher behind every Places API call.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::rate_limit::{retry_with_backoff, RetryPolicy};
use crate::status::check_status;

/// Query parameters as `(name, value)` pairs, sent in order.
pub type QueryParams = Vec<(&'static str, String)>;

/// Issues a GET against `url` and returns the decoded JSON body.
///
/// Implementations own retries and status classification; callers only see
/// bodies whose `status` is `OK` or `ZERO_RESULTS`.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, PlacesError>;
}

/// [`Fetch`] over HTTP with bounded retry and exponential backoff.
pub struct HttpFetcher {
    client: Client,
    policy: RetryPolicy,
}

impl HttpFetcher {
    /// Creates a fetcher with the given request timeout, `User-Agent`, and
    /// retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        policy: RetryPolicy,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client, policy })
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(url: &str, params: &QueryParams) -> Result<Url, PlacesError> {
        let mut parsed = Url::parse(url).map_err(|e| PlacesError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        })?;
        {
            let mut pairs = parsed.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        Ok(parsed)
    }

    /// One attempt: send, require 2xx, decode, classify `status`.
    ///
    /// Errors never carry the full URL since it embeds the API key.
    async fn fetch_once(
        &self,
        url: &Url,
        endpoint: &str,
    ) -> Result<serde_json::Value, PlacesError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
                endpoint: endpoint.to_owned(),
            });
        }

        let body = response.text().await.map_err(reqwest::Error::without_url)?;
        let json: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| PlacesError::MalformedBody {
                endpoint: endpoint.to_owned(),
                source: e,
            })?;
        check_status(&json)?;
        Ok(json)
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        params: &QueryParams,
    ) -> Result<serde_json::Value, PlacesError> {
        let request_url = Self::build_url(url, params)?;
        retry_with_backoff(&self.policy, || self.fetch_once(&request_url, url)).await
    }
}
