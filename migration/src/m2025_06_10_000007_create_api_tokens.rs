//! Migration to create the api_tokens and token_usage_logs tables.
//!
//! Token plaintext is never stored; the ciphertext column holds a
//! versioned AES-256-GCM payload. Usage logs are best-effort audit rows
//! recorded by the token service.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ApiTokens::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(ApiTokens::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(ApiTokens::Provider).text().not_null())
                    .col(
                        ColumnDef::new(ApiTokens::TokenCiphertext)
                            .binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ApiTokens::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ApiTokens::ExpiresAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(ApiTokens::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ApiTokens::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Active-token lookup: newest active token per provider wins
        manager
            .create_index(
                Index::create()
                    .name("idx_api_tokens_provider_active_created")
                    .table(ApiTokens::Table)
                    .col(ApiTokens::Provider)
                    .col(ApiTokens::Active)
                    .col(ApiTokens::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TokenUsageLogs::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TokenUsageLogs::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TokenUsageLogs::TokenId).uuid().not_null())
                    .col(ColumnDef::new(TokenUsageLogs::Provider).text().not_null())
                    .col(
                        ColumnDef::new(TokenUsageLogs::ProcessName)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TokenUsageLogs::RecordCount)
                            .integer()
                            .null(),
                    )
                    .col(ColumnDef::new(TokenUsageLogs::Details).json_binary().null())
                    .col(
                        ColumnDef::new(TokenUsageLogs::UsedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_token_usage_logs_token_id")
                            .from(TokenUsageLogs::Table, TokenUsageLogs::TokenId)
                            .to(ApiTokens::Table, ApiTokens::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_token_usage_logs_token_used")
                    .table(TokenUsageLogs::Table)
                    .col(TokenUsageLogs::TokenId)
                    .col(TokenUsageLogs::UsedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_token_usage_logs_token_used")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(TokenUsageLogs::Table).to_owned())
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_api_tokens_provider_active_created")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(ApiTokens::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum ApiTokens {
    Table,
    Id,
    Provider,
    TokenCiphertext,
    Active,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TokenUsageLogs {
    Table,
    Id,
    TokenId,
    Provider,
    ProcessName,
    RecordCount,
    Details,
    UsedAt,
}
