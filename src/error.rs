//! Core error types shared across services and repositories.

use thiserror::Error;
use uuid::Uuid;

use crate::crypto::CryptoError;
use crate::platform::PlatformError;

/// Errors surfaced by the core services.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("sync job {0} not found")]
    JobNotFound(Uuid),
    #[error("sync job {id} is not claimable in status '{status}'")]
    JobNotClaimable { id: Uuid, status: String },
    #[error("database error: {0}")]
    Db(#[from] sea_orm::DbErr),
    #[error("platform error: {0}")]
    Platform(#[from] PlatformError),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("crypto error: {0}")]
    Crypto(#[from] CryptoError),
}
