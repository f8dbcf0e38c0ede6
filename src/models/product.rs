//! Product entity model
//!
//! Catalog products with supplier cost and selling price held as integer
//! minor units in a single currency. Only "published" products take part in
//! price monitoring.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub title: String,

    /// Lifecycle status (draft, published, ...)
    pub status: String,

    /// Supplier cost in minor units of `currency_code`
    pub cost_amount: Option<i64>,

    /// Selling price in minor units of `currency_code`
    pub selling_price_amount: Option<i64>,

    pub currency_code: String,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::price_check::Entity")]
    PriceCheck,
}

impl Related<super::price_check::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PriceCheck.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
