//! Exchange rate provider abstraction and its HTTP implementation.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use url::Url;

/// Errors surfaced by rate providers.
#[derive(Debug, Error)]
pub enum RateProviderError {
    #[error("rate provider returned HTTP {status}")]
    Http { status: u16 },
    #[error("network error fetching rate: {details}")]
    Network { details: String },
    #[error("malformed rate response: {details}")]
    Malformed { details: String },
}

/// External source of exchange rates.
#[async_trait]
pub trait RateProvider: Send + Sync {
    /// Fetch the rate converting one unit of `from` into `to`.
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, RateProviderError>;
}

#[derive(Debug, Deserialize)]
struct RateResponse {
    rate: f64,
}

/// Rate provider backed by a JSON HTTP endpoint returning `{"rate": <f64>}`.
#[derive(Debug, Clone)]
pub struct HttpRateProvider {
    http: reqwest::Client,
    base_url: Url,
}

impl HttpRateProvider {
    pub fn new(base_url: Url) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl RateProvider for HttpRateProvider {
    async fn fetch_rate(&self, from: &str, to: &str) -> Result<f64, RateProviderError> {
        let url = self
            .base_url
            .join(&format!("rates/{}/{}", from, to))
            .map_err(|e| RateProviderError::Malformed {
                details: format!("invalid rate URL: {}", e),
            })?;

        debug!(from = %from, to = %to, "fetching exchange rate");

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| RateProviderError::Network {
                details: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(RateProviderError::Http {
                status: status.as_u16(),
            });
        }

        let body: RateResponse =
            response
                .json()
                .await
                .map_err(|e| RateProviderError::Malformed {
                    details: e.to_string(),
                })?;

        if !body.rate.is_finite() || body.rate <= 0.0 {
            return Err(RateProviderError::Malformed {
                details: format!("non-positive rate {}", body.rate),
            });
        }

        Ok(body.rate)
    }
}
