//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pricewatch::clock::ManualClock;
use pricewatch::migration::{Migrator, MigratorTrait};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use uuid::Uuid;

use pricewatch::models::{price_rule, product};

/// Fresh in-memory database with all migrations applied.
pub async fn setup_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("connect to in-memory sqlite");
    Migrator::up(&db, None).await.expect("run migrations");
    db
}

pub fn manual_clock(start: DateTime<Utc>) -> Arc<ManualClock> {
    Arc::new(ManualClock::new(start))
}

/// Insert a product row directly.
pub async fn insert_product(
    db: &DatabaseConnection,
    status: &str,
    cost_amount: Option<i64>,
    selling_price_amount: Option<i64>,
) -> product::Model {
    let now = Utc::now().fixed_offset();
    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set("Test product".to_string()),
        status: Set(status.to_string()),
        cost_amount: Set(cost_amount),
        selling_price_amount: Set(selling_price_amount),
        currency_code: Set("CAD".to_string()),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert product")
}

/// Insert a price rule row directly.
pub async fn insert_rule(
    db: &DatabaseConnection,
    rule_name: &str,
    target_margin_pct: f64,
    min_margin_pct: Option<f64>,
    active: bool,
) -> price_rule::Model {
    let now = Utc::now().fixed_offset();
    price_rule::ActiveModel {
        id: Set(Uuid::new_v4()),
        rule_name: Set(rule_name.to_string()),
        target_margin_pct: Set(target_margin_pct),
        min_margin_pct: Set(min_margin_pct),
        rounding_rule: Set("none".to_string()),
        currency_preference: Set("AUTO".to_string()),
        active: Set(active),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
    .expect("insert price rule")
}
