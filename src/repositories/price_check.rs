//! # PriceCheck Repository

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::price_check::{ActiveModel, Column, Entity, Model};

/// Repository for price check database operations
#[derive(Clone)]
pub struct PriceCheckRepository {
    db: DatabaseConnection,
}

impl PriceCheckRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn insert(&self, check: ActiveModel) -> Result<Model, CoreError> {
        let result = check.insert(&self.db).await.map_err(|e| {
            tracing::error!("Failed to insert price check: {}", e);
            CoreError::Db(e)
        })?;

        Ok(result)
    }

    /// Observation history for a product, newest first
    pub async fn list_for_product(&self, product_id: Uuid) -> Result<Vec<Model>, CoreError> {
        let checks = Entity::find()
            .filter(Column::ProductId.eq(product_id))
            .order_by_desc(Column::ObservedAt)
            .all(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list price checks: {}", e);
                CoreError::Db(e)
            })?;

        Ok(checks)
    }
}
