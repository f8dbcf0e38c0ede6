//! API token governance.
//!
//! Tokens are stored encrypted and only ever decrypted in memory on demand.
//! Usage logging is best effort: a failed audit write never fails the
//! process that used the token.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use tracing::warn;
use uuid::Uuid;

use crate::clock::Clock;
use crate::crypto::{self, CryptoKey};
use crate::error::CoreError;
use crate::models::api_token::Model as ApiTokenModel;
use crate::repositories::ApiTokenRepository;

/// Third-party providers whose credentials the engine manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenProvider {
    OpenAi,
    Gemini,
    Medusa,
}

impl TokenProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenProvider::OpenAi => "openai",
            TokenProvider::Gemini => "gemini",
            TokenProvider::Medusa => "medusa",
        }
    }
}

impl fmt::Display for TokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded use of a token by a background process.
#[derive(Debug, Clone)]
pub struct UsageRecord {
    pub token_id: Uuid,
    pub provider: TokenProvider,
    pub process_name: String,
    pub record_count: Option<i32>,
    pub details: Option<JsonValue>,
}

/// Encrypted token storage and retrieval.
#[derive(Clone)]
pub struct TokenService {
    repo: ApiTokenRepository,
    key: CryptoKey,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(repo: ApiTokenRepository, key: CryptoKey, clock: Arc<dyn Clock>) -> Self {
        Self { repo, key, clock }
    }

    /// Encrypt and store a new token for a provider.
    pub async fn store_token(
        &self,
        provider: TokenProvider,
        plaintext: &str,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<ApiTokenModel, CoreError> {
        let ciphertext = crypto::encrypt_token(&self.key, provider.as_str(), plaintext)
            .map_err(|e| {
                tracing::error!(provider = %provider, "token encryption failed: {}", e);
                CoreError::Crypto(e)
            })?;

        self.repo
            .insert(provider.as_str(), ciphertext, expires_at, self.clock.now())
            .await
    }

    /// Decrypt the newest active, unexpired token for a provider.
    ///
    /// Returns `None` when no usable token exists or the stored ciphertext
    /// cannot be decrypted (wrong key, tampering, wrong provider binding).
    pub async fn get_active_token(
        &self,
        provider: TokenProvider,
    ) -> Result<Option<String>, CoreError> {
        let Some(model) = self.repo.find_active(provider.as_str(), self.clock.now()).await? else {
            return Ok(None);
        };

        match crypto::decrypt_token(&self.key, provider.as_str(), &model.token_ciphertext) {
            Ok(plaintext) => Ok(Some(plaintext)),
            Err(e) => {
                warn!(
                    token_id = %model.id,
                    provider = %provider,
                    "stored token failed to decrypt, treating as unavailable: {}",
                    e
                );
                Ok(None)
            }
        }
    }

    /// Identifier of the newest active token for a provider, if any.
    pub async fn get_active_token_id(
        &self,
        provider: TokenProvider,
    ) -> Result<Option<Uuid>, CoreError> {
        let token = self.repo.find_active(provider.as_str(), self.clock.now()).await?;
        Ok(token.map(|t| t.id))
    }

    /// Record token usage, best effort.
    ///
    /// Skips silently (with a warning) when the token does not exist or is
    /// inactive, and swallows insert failures.
    pub async fn log_usage(&self, record: UsageRecord) {
        let token = match self.repo.find_by_id(record.token_id).await {
            Ok(Some(token)) => token,
            Ok(None) => {
                warn!(token_id = %record.token_id, "skipping usage log for unknown token");
                return;
            }
            Err(e) => {
                warn!(token_id = %record.token_id, "usage log lookup failed: {}", e);
                return;
            }
        };

        if !token.active {
            warn!(token_id = %token.id, "skipping usage log for inactive token");
            return;
        }

        if let Err(e) = self
            .repo
            .insert_usage_log(
                token.id,
                record.provider.as_str(),
                &record.process_name,
                record.record_count,
                record.details,
                self.clock.now(),
            )
            .await
        {
            warn!(token_id = %token.id, "failed to record token usage: {}", e);
        }
    }
}
