//! Migration to create the price_checks table.
//!
//! Price checks are an append-only time series: one immutable row per
//! published product per monitoring run.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PriceChecks::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PriceChecks::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PriceChecks::ProductId).uuid().not_null())
                    .col(
                        ColumnDef::new(PriceChecks::SupplierPriceAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceChecks::SupplierCurrency)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceChecks::SellingPriceAmount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PriceChecks::SellingCurrency)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PriceChecks::MarginPct).double().not_null())
                    .col(ColumnDef::new(PriceChecks::DeltaPct).double().null())
                    .col(
                        ColumnDef::new(PriceChecks::ObservedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_price_checks_product_id")
                            .from(PriceChecks::Table, PriceChecks::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for per-product trend/alert history queries
        manager
            .create_index(
                Index::create()
                    .name("idx_price_checks_product_observed")
                    .table(PriceChecks::Table)
                    .col(PriceChecks::ProductId)
                    .col(PriceChecks::ObservedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_price_checks_product_observed")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PriceChecks::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PriceChecks {
    Table,
    Id,
    ProductId,
    SupplierPriceAmount,
    SupplierCurrency,
    SellingPriceAmount,
    SellingCurrency,
    MarginPct,
    DeltaPct,
    ObservedAt,
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
}
