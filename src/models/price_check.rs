//! PriceCheck entity model
//!
//! Immutable observation of a product's margin at a point in time, one row
//! per published product per monitoring run.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "price_checks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub product_id: Uuid,

    /// Supplier cost in minor units of `supplier_currency`
    pub supplier_price_amount: i64,

    pub supplier_currency: String,

    /// Selling price in minor units of `selling_currency`
    pub selling_price_amount: i64,

    pub selling_currency: String,

    /// Observed margin as a percentage of cost
    pub margin_pct: f64,

    /// Deviation from the governing rule's target margin, if a rule applied
    pub delta_pct: Option<f64>,

    pub observed_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
