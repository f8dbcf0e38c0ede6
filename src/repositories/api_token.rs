//! # ApiToken Repository
//!
//! Lookup of active encrypted tokens and insertion of usage log rows.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::api_token::{ActiveModel, Column, Entity, Model};
use crate::models::token_usage_log;

/// Repository for API token database operations
#[derive(Clone)]
pub struct ApiTokenRepository {
    db: DatabaseConnection,
}

impl ApiTokenRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Find the most recently created active, unexpired token for a provider
    pub async fn find_active(
        &self,
        provider: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Model>, CoreError> {
        let token = Entity::find()
            .filter(Column::Provider.eq(provider))
            .filter(Column::Active.eq(true))
            .filter(
                Condition::any()
                    .add(Column::ExpiresAt.is_null())
                    .add(Column::ExpiresAt.gt(now.fixed_offset())),
            )
            .order_by_desc(Column::CreatedAt)
            .one(&self.db)
            .await
            .map_err(|e| {
                tracing::error!(provider = %provider, "Failed to find active token: {}", e);
                CoreError::Db(e)
            })?;

        Ok(token)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, CoreError> {
        let token = Entity::find_by_id(id).one(&self.db).await.map_err(|e| {
            tracing::error!("Failed to find token: {}", e);
            CoreError::Db(e)
        })?;

        Ok(token)
    }

    /// Store a new encrypted token
    pub async fn insert(
        &self,
        provider: &str,
        token_ciphertext: Vec<u8>,
        expires_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Model, CoreError> {
        let row = ActiveModel {
            id: Set(Uuid::new_v4()),
            provider: Set(provider.to_string()),
            token_ciphertext: Set(token_ciphertext),
            active: Set(true),
            expires_at: Set(expires_at.map(|t| t.fixed_offset())),
            created_at: Set(now.fixed_offset()),
            updated_at: Set(now.fixed_offset()),
        };

        let result = row.insert(&self.db).await.map_err(|e| {
            tracing::error!(provider = %provider, "Failed to insert token: {}", e);
            CoreError::Db(e)
        })?;

        Ok(result)
    }

    /// Record a usage log row for a token
    pub async fn insert_usage_log(
        &self,
        token_id: Uuid,
        provider: &str,
        process_name: &str,
        record_count: Option<i32>,
        details: Option<JsonValue>,
        used_at: DateTime<Utc>,
    ) -> Result<token_usage_log::Model, CoreError> {
        let row = token_usage_log::ActiveModel {
            id: Set(Uuid::new_v4()),
            token_id: Set(token_id),
            provider: Set(provider.to_string()),
            process_name: Set(process_name.to_string()),
            record_count: Set(record_count),
            details: Set(details),
            used_at: Set(used_at.fixed_offset()),
        };

        let result = row.insert(&self.db).await.map_err(|e| {
            tracing::error!(token_id = %token_id, "Failed to insert token usage log: {}", e);
            CoreError::Db(e)
        })?;

        Ok(result)
    }

    /// Usage history for a token, newest first
    pub async fn list_usage_logs(
        &self,
        token_id: Uuid,
    ) -> Result<Vec<token_usage_log::Model>, CoreError> {
        let logs = token_usage_log::Entity::find()
            .filter(token_usage_log::Column::TokenId.eq(token_id))
            .order_by_desc(token_usage_log::Column::UsedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list token usage logs: {}", e);
                CoreError::Db(e)
            })?;

        Ok(logs)
    }
}
