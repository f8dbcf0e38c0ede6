//! # Setting Repository
//!
//! Key/value settings storage. The settings cache and the FX rate service
//! both persist through this repository.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::OnConflict,
};
use serde_json::Value as JsonValue;

use crate::error::CoreError;
use crate::models::setting::{ActiveModel, Column, Entity, Model};

/// Repository for settings database operations
#[derive(Clone)]
pub struct SettingRepository {
    db: DatabaseConnection,
}

impl SettingRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Fetch a single setting by key
    pub async fn get(&self, key: &str) -> Result<Option<Model>, CoreError> {
        let setting = Entity::find_by_id(key).one(&self.db).await.map_err(|e| {
            tracing::error!(key = %key, "Failed to fetch setting: {}", e);
            CoreError::Db(e)
        })?;

        Ok(setting)
    }

    /// Fetch several settings in one query
    pub async fn get_many(&self, keys: &[&str]) -> Result<Vec<Model>, CoreError> {
        let settings = Entity::find()
            .filter(Column::Key.is_in(keys.iter().copied()))
            .all(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to fetch settings batch: {}", e);
                CoreError::Db(e)
            })?;

        Ok(settings)
    }

    /// Fetch all settings, ordered by key
    pub async fn get_all(&self) -> Result<Vec<Model>, CoreError> {
        let settings = Entity::find()
            .order_by_asc(Column::Key)
            .all(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list settings: {}", e);
                CoreError::Db(e)
            })?;

        Ok(settings)
    }

    /// Insert or replace a setting value
    pub async fn upsert(
        &self,
        key: &str,
        value: JsonValue,
        now: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        let row = ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(now.fixed_offset()),
        };

        Entity::insert(row)
            .on_conflict(
                OnConflict::column(Column::Key)
                    .update_columns([Column::Value, Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                tracing::error!(key = %key, "Failed to upsert setting: {}", e);
                CoreError::Db(e)
            })?;

        Ok(())
    }
}
