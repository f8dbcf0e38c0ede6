//! FX rate service.
//!
//! Rates are cached in memory for one hour and persisted durably in the
//! settings table so a restart does not force a provider round trip. A
//! fetched rate also seeds the reciprocal pair. When the provider is down
//! the service degrades through stale cache, then stale durable record,
//! then the identity rate, never failing the caller.

pub mod provider;

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use metrics::counter;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::clock::Clock;
use crate::repositories::SettingRepository;

pub use provider::{HttpRateProvider, RateProvider, RateProviderError};

/// Durable rate record stored under `fx_rate_{from}_{to}` in settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredRate {
    pub rate: f64,
    pub fetched_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct CachedRate {
    rate: f64,
    fetched_at: DateTime<Utc>,
}

/// Exchange rate lookup with layered caching and graceful degradation.
#[derive(Clone)]
pub struct FxRateService {
    provider: Arc<dyn RateProvider>,
    settings: SettingRepository,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    cache: Arc<RwLock<HashMap<(String, String), CachedRate>>>,
}

impl FxRateService {
    pub fn new(
        provider: Arc<dyn RateProvider>,
        settings: SettingRepository,
        clock: Arc<dyn Clock>,
        ttl_seconds: u64,
    ) -> Self {
        Self {
            provider,
            settings,
            clock,
            ttl: Duration::seconds(ttl_seconds as i64),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    fn setting_key(from: &str, to: &str) -> String {
        format!("fx_rate_{}_{}", from.to_lowercase(), to.to_lowercase())
    }

    /// Get the rate converting one unit of `from` into `to`.
    ///
    /// Always returns a usable rate; provider outages fall back to stale
    /// data and finally to 1.0.
    pub async fn get_rate(&self, from: &str, to: &str) -> f64 {
        let from = from.to_uppercase();
        let to = to.to_uppercase();

        if from == to {
            return 1.0;
        }

        let now = self.clock.now();
        let pair = (from.clone(), to.clone());

        // Fresh in-memory hit
        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(&pair) {
                if now - entry.fetched_at < self.ttl {
                    return entry.rate;
                }
            }
        }

        // Fresh durable record survives restarts
        if let Some(stored) = self.load_stored(&from, &to).await {
            if now - stored.fetched_at < self.ttl {
                self.cache_rate(&from, &to, stored.rate, stored.fetched_at)
                    .await;
                return stored.rate;
            }
        }

        match self.provider.fetch_rate(&from, &to).await {
            Ok(rate) => {
                counter!("fx_rate_fetch_total", "outcome" => "ok").increment(1);
                info!(from = %from, to = %to, rate, "fetched exchange rate");

                self.cache_rate(&from, &to, rate, now).await;
                self.cache_rate(&to, &from, 1.0 / rate, now).await;
                self.persist_rate(&from, &to, rate, now).await;
                self.persist_rate(&to, &from, 1.0 / rate, now).await;

                rate
            }
            Err(e) => {
                counter!("fx_rate_fetch_total", "outcome" => "error").increment(1);

                // Stale in-memory beats stale durable beats identity.
                let stale_cached = {
                    let cache = self.cache.read().await;
                    cache.get(&pair).map(|entry| entry.rate)
                };
                if let Some(rate) = stale_cached {
                    warn!(from = %from, to = %to, rate, "rate fetch failed, serving stale cached rate: {}", e);
                    return rate;
                }

                if let Some(stored) = self.load_stored(&from, &to).await {
                    warn!(from = %from, to = %to, rate = stored.rate, "rate fetch failed, serving stale stored rate: {}", e);
                    self.cache_rate(&from, &to, stored.rate, stored.fetched_at)
                        .await;
                    return stored.rate;
                }

                warn!(from = %from, to = %to, "rate fetch failed with no fallback, using identity rate: {}", e);
                1.0
            }
        }
    }

    /// Convert an amount between currencies using the current rate.
    pub async fn convert(&self, amount: f64, from: &str, to: &str) -> f64 {
        amount * self.get_rate(from, to).await
    }

    async fn cache_rate(&self, from: &str, to: &str, rate: f64, fetched_at: DateTime<Utc>) {
        let mut cache = self.cache.write().await;
        cache.insert(
            (from.to_string(), to.to_string()),
            CachedRate { rate, fetched_at },
        );
    }

    async fn load_stored(&self, from: &str, to: &str) -> Option<StoredRate> {
        let key = Self::setting_key(from, to);
        match self.settings.get(&key).await {
            Ok(Some(model)) => match serde_json::from_value::<StoredRate>(model.value) {
                Ok(stored) => Some(stored),
                Err(e) => {
                    warn!(key = %key, "ignoring malformed stored rate: {}", e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(key = %key, "failed to load stored rate: {}", e);
                None
            }
        }
    }

    async fn persist_rate(&self, from: &str, to: &str, rate: f64, fetched_at: DateTime<Utc>) {
        let key = Self::setting_key(from, to);
        let record = StoredRate { rate, fetched_at };
        let value = match serde_json::to_value(&record) {
            Ok(v) => v,
            Err(e) => {
                warn!(key = %key, "failed to serialize rate record: {}", e);
                return;
            }
        };

        // Persistence is best effort; a write failure only costs durability.
        if let Err(e) = self.settings.upsert(&key, value, fetched_at).await {
            warn!(key = %key, "failed to persist rate record: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setting_keys_are_lowercased_pairs() {
        assert_eq!(FxRateService::setting_key("USD", "CAD"), "fx_rate_usd_cad");
        assert_eq!(FxRateService::setting_key("eur", "GBP"), "fx_rate_eur_gbp");
    }
}
