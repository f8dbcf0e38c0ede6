//! PriceRule entity model
//!
//! Margin targets that govern the monitoring pass. The first active rule in
//! rule_name order is the governing rule.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "price_rules")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub rule_name: String,

    /// Target margin as a percentage (e.g., 50.0 for 50%)
    pub target_margin_pct: f64,

    /// Optional margin floor; breaches raise an alert
    pub min_margin_pct: Option<f64>,

    pub rounding_rule: String,

    pub currency_preference: String,

    pub active: bool,

    pub created_at: DateTimeWithTimeZone,

    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
