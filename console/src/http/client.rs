//! HTTP client implementation

use std::time::Duration;

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::errors::ConsoleError;

/// HTTP client for the panel backend
pub struct HttpClient {
    client: Client,
    base_url: Url,
}

impl HttpClient {
    /// Create a new HTTP client.
    ///
    /// Without a `timeout` the transport default applies.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self, ConsoleError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ConsoleError::ConfigError(format!(
                "Backend URL cannot carry a path: {}",
                base_url
            )));
        }

        Ok(Self { client, base_url })
    }

    /// Build an endpoint URL by appending percent-encoded path segments
    pub fn url(&self, segments: &[&str]) -> Result<Url, ConsoleError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ConsoleError::ConfigError(format!("Invalid base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Make a GET request and decode the JSON body
    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, ConsoleError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            debug!("HTTP GET failed: {} - {}", status, body);
            return Err(ConsoleError::FetchError(format!("{}: {}", status, body)));
        }

        let body = response.json().await?;
        Ok(body)
    }

    /// Make a PUT request without a body. Only the status is interpreted.
    pub async fn put_empty(&self, url: Url) -> Result<(), ConsoleError> {
        debug!("PUT {}", url);

        let response = self
            .client
            .put(url)
            .header(header::CONTENT_LENGTH, 0)
            .send()
            .await
            .map_err(|e| ConsoleError::CommandError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP PUT failed: {} - {}", status, body);
            return Err(ConsoleError::CommandError(format!("{}: {}", status, body)));
        }

        Ok(())
    }
}
