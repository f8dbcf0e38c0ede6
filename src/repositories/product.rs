//! # Product Repository

use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::product::{ActiveModel, Column, Entity, Model};

/// Repository for product database operations
#[derive(Clone)]
pub struct ProductRepository {
    db: DatabaseConnection,
}

impl ProductRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// List all published products, the monitoring population
    pub async fn list_published(&self) -> Result<Vec<Model>, CoreError> {
        let products = Entity::find()
            .filter(Column::Status.eq("published"))
            .all(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list published products: {}", e);
                CoreError::Db(e)
            })?;

        Ok(products)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, CoreError> {
        let product = Entity::find_by_id(id).one(&self.db).await.map_err(|e| {
            tracing::error!("Failed to find product: {}", e);
            CoreError::Db(e)
        })?;

        Ok(product)
    }

    pub async fn insert(&self, product: ActiveModel) -> Result<Model, CoreError> {
        let result = product.insert(&self.db).await.map_err(|e| {
            tracing::error!("Failed to insert product: {}", e);
            CoreError::Db(e)
        })?;

        Ok(result)
    }
}
