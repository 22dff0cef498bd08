//! HTTP client implementation

use std::time::Duration;

use cluster_models::Credentials;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error};
use url::Url;

use crate::errors::BundlerError;

/// Client options for calls to Elasticsearch and Kibana
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Per-request timeout
    pub timeout: Duration,

    /// Skip TLS certificate verification (self-signed clusters)
    pub accept_invalid_certs: bool,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            accept_invalid_certs: false,
        }
    }
}

/// HTTP client talking to the endpoints described by [`Credentials`]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    pub fn new(options: &ClientOptions) -> Result<Self, BundlerError> {
        let client = Client::builder()
            .timeout(options.timeout)
            .danger_accept_invalid_certs(options.accept_invalid_certs)
            .build()?;

        Ok(Self { client })
    }

    /// `{host}{path}`, rejecting hosts that are not absolute URLs
    pub fn endpoint(credentials: &Credentials, path: &str) -> Result<String, BundlerError> {
        let host = credentials.host.trim();
        if host.is_empty() {
            return Err(BundlerError::Endpoint("host is not configured".to_string()));
        }
        Url::parse(host)
            .map_err(|e| BundlerError::Endpoint(format!("invalid host {}: {}", host, e)))?;
        Ok(format!("{}{}", host.trim_end_matches('/'), path))
    }

    /// GET `path` on the endpoint, with basic auth when it is enabled
    pub async fn get<T: DeserializeOwned>(
        &self,
        credentials: &Credentials,
        path: &str,
    ) -> Result<T, BundlerError> {
        let url = Self::endpoint(credentials, path)?;
        debug!("GET {}", url);

        let mut request = self.client.get(&url);
        if credentials.authentication_enabled {
            request = request.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP GET {} failed: {} - {}", url, status, body);
            return Err(BundlerError::Endpoint(format!("{}: {}", status, body)));
        }

        let body = response.json().await?;
        Ok(body)
    }
}
