//! # PriceRule Repository

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::error::CoreError;
use crate::models::price_rule::{ActiveModel, Column, Entity, Model};

/// Repository for price rule database operations
#[derive(Clone)]
pub struct PriceRuleRepository {
    db: DatabaseConnection,
}

impl PriceRuleRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// List active rules ordered by rule name; the first one governs a
    /// monitoring pass
    pub async fn list_active(&self) -> Result<Vec<Model>, CoreError> {
        let rules = Entity::find()
            .filter(Column::Active.eq(true))
            .order_by_asc(Column::RuleName)
            .all(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to list active price rules: {}", e);
                CoreError::Db(e)
            })?;

        Ok(rules)
    }

    pub async fn insert(&self, rule: ActiveModel) -> Result<Model, CoreError> {
        let result = rule.insert(&self.db).await.map_err(|e| {
            tracing::error!("Failed to insert price rule: {}", e);
            CoreError::Db(e)
        })?;

        Ok(result)
    }
}
