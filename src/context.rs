//! Application context wiring.
//!
//! Builds the full service graph from an [`AppConfig`] and a database
//! connection so binaries and integration harnesses share one assembly
//! path.

use std::sync::Arc;

use anyhow::{Context as _, Result};
use sea_orm::DatabaseConnection;
use url::Url;

use crate::clock::{Clock, SystemClock};
use crate::config::AppConfig;
use crate::crypto::CryptoKey;
use crate::fx::{FxRateService, HttpRateProvider};
use crate::monitor::PriceMonitor;
use crate::platform::MedusaClient;
use crate::repositories::{ApiTokenRepository, SettingRepository};
use crate::settings_cache::SettingsCache;
use crate::sync_engine::SyncJobService;
use crate::tokens::TokenService;

/// Fully wired service graph.
#[derive(Clone)]
pub struct CoreContext {
    pub db: DatabaseConnection,
    pub settings: SettingsCache,
    pub fx: FxRateService,
    pub tokens: Option<TokenService>,
    pub sync_jobs: SyncJobService,
    pub monitor: PriceMonitor,
}

impl CoreContext {
    /// Wire all services against the given database connection.
    ///
    /// The token service is only available when a crypto key is configured.
    pub fn build(config: &AppConfig, db: DatabaseConnection) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);

        let settings_repo = SettingRepository::new(db.clone());
        let settings = SettingsCache::new(
            settings_repo.clone(),
            clock.clone(),
            config.settings_cache_ttl_seconds,
        );

        let fx_base = Url::parse(&config.fx_api_base).context("invalid FX API base URL")?;
        let fx = FxRateService::new(
            Arc::new(HttpRateProvider::new(fx_base)),
            settings_repo,
            clock.clone(),
            config.fx_cache_ttl_seconds,
        );

        let tokens = match &config.crypto_key {
            Some(key_bytes) => {
                let key = CryptoKey::new(key_bytes.clone())
                    .map_err(|e| anyhow::anyhow!("invalid crypto key: {}", e))?;
                Some(TokenService::new(
                    ApiTokenRepository::new(db.clone()),
                    key,
                    clock.clone(),
                ))
            }
            None => None,
        };

        let platform_base =
            Url::parse(&config.platform_api_base).context("invalid platform API base URL")?;
        let platform = Arc::new(MedusaClient::new(
            platform_base,
            config.platform_api_token.clone(),
        ));

        let sync_jobs = SyncJobService::new(
            db.clone(),
            platform,
            clock.clone(),
            config.sync_batch_limit,
        );

        let monitor = PriceMonitor::new(db.clone(), clock);

        Ok(Self {
            db,
            settings,
            fx,
            tokens,
            sync_jobs,
            monitor,
        })
    }
}
