//! Migration to create the price_rules table.
//!
//! A monitoring pass is governed by the first active rule in rule_name
//! order; target and minimum margins are percentages.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PriceRules::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PriceRules::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(PriceRules::RuleName).text().not_null())
                    .col(
                        ColumnDef::new(PriceRules::TargetMarginPct)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PriceRules::MinMarginPct).double().null())
                    .col(
                        ColumnDef::new(PriceRules::RoundingRule)
                            .text()
                            .not_null()
                            .default("none"),
                    )
                    .col(
                        ColumnDef::new(PriceRules::CurrencyPreference)
                            .text()
                            .not_null()
                            .default("AUTO"),
                    )
                    .col(
                        ColumnDef::new(PriceRules::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(PriceRules::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(PriceRules::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_price_rules_active_rule_name")
                    .table(PriceRules::Table)
                    .col(PriceRules::Active)
                    .col(PriceRules::RuleName)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_price_rules_active_rule_name")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(PriceRules::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum PriceRules {
    Table,
    Id,
    RuleName,
    TargetMarginPct,
    MinMarginPct,
    RoundingRule,
    CurrencyPreference,
    Active,
    CreatedAt,
    UpdatedAt,
}
