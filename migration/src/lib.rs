//! Database migrations for the pricewatch core.
//!
//! This module contains all database migrations using SeaORM Migration.

pub use sea_orm_migration::prelude::*;

mod m2025_06_10_000001_create_sync_jobs;
mod m2025_06_10_000002_create_entity_snapshots;
mod m2025_06_10_000003_create_products;
mod m2025_06_10_000004_create_price_rules;
mod m2025_06_10_000005_create_price_checks;
mod m2025_06_10_000006_create_settings;
mod m2025_06_10_000007_create_api_tokens;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m2025_06_10_000001_create_sync_jobs::Migration),
            Box::new(m2025_06_10_000002_create_entity_snapshots::Migration),
            Box::new(m2025_06_10_000003_create_products::Migration),
            Box::new(m2025_06_10_000004_create_price_rules::Migration),
            Box::new(m2025_06_10_000005_create_price_checks::Migration),
            Box::new(m2025_06_10_000006_create_settings::Migration),
            Box::new(m2025_06_10_000007_create_api_tokens::Migration),
        ]
    }
}
