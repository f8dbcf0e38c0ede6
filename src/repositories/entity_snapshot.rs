//! # EntitySnapshot Repository
//!
//! Batch upserts of fetched platform entities keyed by
//! (entity_type, external_id).

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, Set,
    sea_query::OnConflict,
};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::EntityType;
use crate::models::entity_snapshot::{ActiveModel, Column, Entity, Model};
use crate::platform::RawEntity;

/// Repository for entity snapshot database operations
#[derive(Clone)]
pub struct EntitySnapshotRepository {
    db: DatabaseConnection,
}

impl EntitySnapshotRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Upsert a batch of fetched entities.
    ///
    /// Existing snapshots with the same (entity_type, external_id) get their
    /// payload and synced_at replaced; new entities are inserted.
    pub async fn upsert_batch(
        &self,
        entity_type: EntityType,
        entities: &[RawEntity],
        synced_at: DateTime<Utc>,
    ) -> Result<(), CoreError> {
        if entities.is_empty() {
            return Ok(());
        }

        let rows: Vec<ActiveModel> = entities
            .iter()
            .map(|entity| ActiveModel {
                id: Set(Uuid::new_v4()),
                entity_type: Set(entity_type.as_str().to_string()),
                external_id: Set(entity.external_id.clone()),
                payload: Set(entity.payload.clone()),
                synced_at: Set(synced_at.fixed_offset()),
            })
            .collect();

        Entity::insert_many(rows)
            .on_conflict(
                OnConflict::columns([Column::EntityType, Column::ExternalId])
                    .update_columns([Column::Payload, Column::SyncedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to upsert entity snapshots: {}", e);
                CoreError::Db(e)
            })?;

        Ok(())
    }

    /// Find one snapshot by its upsert key
    pub async fn find_by_external_id(
        &self,
        entity_type: EntityType,
        external_id: &str,
    ) -> Result<Option<Model>, CoreError> {
        let snapshot = Entity::find()
            .filter(Column::EntityType.eq(entity_type.as_str()))
            .filter(Column::ExternalId.eq(external_id))
            .one(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to find entity snapshot: {}", e);
                CoreError::Db(e)
            })?;

        Ok(snapshot)
    }

    /// Count snapshots of a given entity type
    pub async fn count_by_type(&self, entity_type: EntityType) -> Result<u64, CoreError> {
        let count = Entity::find()
            .filter(Column::EntityType.eq(entity_type.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to count entity snapshots: {}", e);
                CoreError::Db(e)
            })?;

        Ok(count)
    }
}
