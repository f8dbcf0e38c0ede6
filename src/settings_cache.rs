//! Read-through settings cache.
//!
//! Settings are read far more often than they change, so lookups go through
//! an in-memory map with a per-entry TTL (5 minutes by default). A store
//! failure on a cache miss degrades to `None` with a warning rather than
//! failing the caller.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value as JsonValue;
use tokio::sync::RwLock;
use tracing::warn;

use crate::clock::Clock;
use crate::error::CoreError;
use crate::repositories::SettingRepository;

/// Well-known setting keys.
pub mod keys {
    pub const FX_BASE_CURRENCY: &str = "fx_base_currency";
    pub const DEFAULT_MARGIN_PCT: &str = "default_margin_pct";
}

#[derive(Debug, Clone)]
struct CachedSetting {
    value: Option<JsonValue>,
    fetched_at: DateTime<Utc>,
}

/// TTL-bounded read-through cache over the settings table.
#[derive(Clone)]
pub struct SettingsCache {
    repo: SettingRepository,
    clock: Arc<dyn Clock>,
    ttl: Duration,
    cache: Arc<RwLock<HashMap<String, CachedSetting>>>,
}

impl SettingsCache {
    pub fn new(repo: SettingRepository, clock: Arc<dyn Clock>, ttl_seconds: u64) -> Self {
        Self {
            repo,
            clock,
            ttl: Duration::seconds(ttl_seconds as i64),
            cache: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Get a setting value, serving from cache while the entry is fresh.
    ///
    /// Missing keys are cached as `None` so repeated lookups of an absent
    /// setting do not hammer the store.
    pub async fn get(&self, key: &str) -> Option<JsonValue> {
        let now = self.clock.now();

        {
            let cache = self.cache.read().await;
            if let Some(entry) = cache.get(key) {
                if now - entry.fetched_at < self.ttl {
                    return entry.value.clone();
                }
            }
        }

        let value = match self.repo.get(key).await {
            Ok(model) => model.map(|m| m.value),
            Err(e) => {
                warn!(key = %key, "settings lookup failed, treating as unset: {}", e);
                return None;
            }
        };

        let mut cache = self.cache.write().await;
        cache.insert(
            key.to_string(),
            CachedSetting {
                value: value.clone(),
                fetched_at: now,
            },
        );

        value
    }

    /// Get a setting value, falling back to `default` when unset.
    pub async fn get_or(&self, key: &str, default: JsonValue) -> JsonValue {
        self.get(key).await.unwrap_or(default)
    }

    /// Fetch several settings, reusing fresh cache entries and loading the
    /// rest in one query.
    pub async fn get_many(&self, keys: &[&str]) -> HashMap<String, JsonValue> {
        let now = self.clock.now();
        let mut result = HashMap::new();
        let mut missing: Vec<&str> = Vec::new();

        {
            let cache = self.cache.read().await;
            for key in keys {
                match cache.get(*key) {
                    Some(entry) if now - entry.fetched_at < self.ttl => {
                        if let Some(value) = &entry.value {
                            result.insert((*key).to_string(), value.clone());
                        }
                    }
                    _ => missing.push(*key),
                }
            }
        }

        if missing.is_empty() {
            return result;
        }

        let loaded = match self.repo.get_many(&missing).await {
            Ok(models) => models,
            Err(e) => {
                warn!("settings batch lookup failed, treating as unset: {}", e);
                return result;
            }
        };

        let mut cache = self.cache.write().await;
        for key in &missing {
            let value = loaded
                .iter()
                .find(|m| m.key == **key)
                .map(|m| m.value.clone());
            if let Some(v) = &value {
                result.insert((*key).to_string(), v.clone());
            }
            cache.insert(
                (*key).to_string(),
                CachedSetting {
                    value,
                    fetched_at: now,
                },
            );
        }

        result
    }

    /// Fetch every setting from the store, warming the cache with the result.
    ///
    /// Always goes to the store; the cache cannot know it holds the full set.
    pub async fn get_all(&self) -> HashMap<String, JsonValue> {
        let now = self.clock.now();

        let models = match self.repo.get_all().await {
            Ok(models) => models,
            Err(e) => {
                warn!("settings listing failed, returning empty set: {}", e);
                return HashMap::new();
            }
        };

        let mut cache = self.cache.write().await;
        let mut result = HashMap::new();
        for model in models {
            cache.insert(
                model.key.clone(),
                CachedSetting {
                    value: Some(model.value.clone()),
                    fetched_at: now,
                },
            );
            result.insert(model.key, model.value);
        }

        result
    }

    /// Write a setting and invalidate its cache entry so the next read sees
    /// the new value.
    pub async fn update(&self, key: &str, value: JsonValue) -> Result<(), CoreError> {
        self.repo.upsert(key, value, self.clock.now()).await?;
        self.invalidate(key).await;
        Ok(())
    }

    /// Drop a single key from the cache so the next read hits the store.
    pub async fn invalidate(&self, key: &str) {
        self.cache.write().await.remove(key);
    }

    /// Drop all cached entries.
    pub async fn invalidate_all(&self) {
        self.cache.write().await.clear();
    }
}
