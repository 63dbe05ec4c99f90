//! Content sources for the generated page.
//!
//! Each adapter issues exactly one GET and turns the response into records:
//!
//! | Source | Module | Format | Auth |
//! |--------|--------|--------|------|
//! | YouTube "most popular" chart | [`youtube`] | JSON | API key |
//! | Google News top stories | [`google_news`] | RSS (XML) | none |
//!
//! Adapters talk to the network through the [`HttpFetch`] trait so the
//! pipeline can run against [`ReqwestFetcher`] in production and against a
//! recording fake in tests.

pub mod google_news;
pub mod youtube;

use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, instrument, warn};

use crate::errors::AppError;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Minimal HTTP surface the source adapters need.
pub trait HttpFetch {
    /// GET `endpoint` with `query` appended and return the body of a
    /// successful (2xx) response.
    ///
    /// Query values may contain secrets; implementations must not log them.
    async fn get_text(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String, AppError>;
}

/// [`HttpFetch`] backed by a shared `reqwest` client.
#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    client: Client,
}

impl ReqwestFetcher {
    /// Build a fetcher whose requests time out after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(AppError::Client)?;
        Ok(Self { client })
    }
}

impl HttpFetch for ReqwestFetcher {
    #[instrument(level = "info", skip_all, fields(%endpoint))]
    async fn get_text(&self, endpoint: &str, query: &[(&str, &str)]) -> Result<String, AppError> {
        let t0 = Instant::now();
        let network = |e: reqwest::Error| AppError::Network {
            endpoint: endpoint.to_string(),
            source: e.without_url(),
        };

        let response = self
            .client
            .get(endpoint)
            .query(query)
            .send()
            .await
            .map_err(network)?;

        let status = response.status();
        if !status.is_success() {
            warn!(
                status = status.as_u16(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "Non-success response"
            );
            return Err(AppError::Http {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(network)?;
        debug!(
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u64,
            "Fetched response body"
        );
        Ok(body)
    }
}
