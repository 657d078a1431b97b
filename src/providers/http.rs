//! JSON-over-HTTP provider.
//!
//! # Responsibilities
//! - Hold one reqwest client per backend, with its own timeout
//! - Resolve request paths against the backend base URL
//! - Treat non-2xx responses as failures so the balancer falls back

use std::time::Duration;

use serde::de::DeserializeOwned;
use thiserror::Error;
use url::Url;

use crate::balancer::Provider;
use crate::config::schema::ProviderConfig;

/// Errors raised by provider calls.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Base URL could not be parsed.
    #[error("Invalid base URL '{url}' for provider {provider}: {source}")]
    InvalidUrl {
        provider: String,
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// Request path is absolute or cannot be joined onto the base URL.
    #[error("Invalid request path '{0}'")]
    InvalidPath(String),

    /// HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// Connection, timeout or transport failure.
    #[error("Request to {provider} failed: {source}")]
    Request {
        provider: String,
        #[source]
        source: reqwest::Error,
    },

    /// Backend answered with a non-success status.
    #[error("{provider} returned HTTP {status}")]
    Status { provider: String, status: u16 },

    /// Response body was not the expected JSON.
    #[error("Failed to decode response from {provider}: {source}")]
    Decode {
        provider: String,
        #[source]
        source: reqwest::Error,
    },
}

/// A named backend reached over HTTP.
#[derive(Debug, Clone)]
pub struct HttpProvider {
    name: String,
    /// Always ends with `/` so relative joins keep the base path.
    base_url: Url,
    client: reqwest::Client,
}

impl HttpProvider {
    /// Build a provider from configuration.
    pub fn from_config(config: &ProviderConfig) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(ProviderError::Client)?;
        Self::with_client(&config.name, &config.url, client)
    }

    /// Build a provider around an existing client.
    pub fn with_client(
        name: &str,
        url: &str,
        client: reqwest::Client,
    ) -> Result<Self, ProviderError> {
        let mut base_url = Url::parse(url).map_err(|source| ProviderError::InvalidUrl {
            provider: name.to_string(),
            url: url.to_string(),
            source,
        })?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            name: name.to_string(),
            base_url,
            client,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve a relative request path against the base URL.
    pub fn endpoint(&self, path: &str) -> Result<Url, ProviderError> {
        if Url::parse(path).is_ok() {
            return Err(ProviderError::InvalidPath(path.to_string()));
        }
        self.base_url
            .join(path.trim_start_matches('/'))
            .map_err(|_| ProviderError::InvalidPath(path.to_string()))
    }

    /// GET `path` and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let url = self.endpoint(path)?;
        tracing::debug!(provider = %self.name, url = %url, "Sending request");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ProviderError::Request {
                provider: self.name.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ProviderError::Status {
                provider: self.name.clone(),
                status: status.as_u16(),
            });
        }

        response.json::<T>().await.map_err(|source| ProviderError::Decode {
            provider: self.name.clone(),
            source,
        })
    }
}

impl Provider for HttpProvider {
    fn name(&self) -> &str {
        &self.name
    }
}
