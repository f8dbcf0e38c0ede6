//! Commerce platform client abstraction.
//!
//! The sync engine talks to the external platform through the
//! [`CommercePlatform`] trait so that tests can substitute a mock server or
//! stub implementation.

pub mod medusa;

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::models::EntityType;

pub use medusa::MedusaClient;

/// Errors surfaced by platform clients.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("platform returned HTTP {status}: {body}")]
    Http { status: u16, body: String },
    #[error("network error talking to platform: {details}")]
    Network { details: String },
    #[error("malformed platform response: {details}")]
    Malformed { details: String },
}

/// One entity as returned by the platform, with its external identifier
/// pulled out for upsert keying.
#[derive(Debug, Clone, PartialEq)]
pub struct RawEntity {
    pub external_id: String,
    pub payload: JsonValue,
}

/// Read access to the external commerce platform's admin API.
#[async_trait]
pub trait CommercePlatform: Send + Sync {
    /// Fetch one page of entities of the given type.
    ///
    /// Returning fewer than `limit` entities signals the final page.
    async fn fetch_entities(
        &self,
        entity_type: EntityType,
        limit: u64,
        offset: u64,
    ) -> Result<Vec<RawEntity>, PlatformError>;
}
