//! Migration to create the sync_jobs table.
//!
//! Sync jobs are asynchronous units of work that fetch a batch of entities
//! from the external commerce platform. Jobs are append-only history: they
//! move through queued -> running -> done/error and are never deleted.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(SyncJobs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(SyncJobs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(SyncJobs::EntityType).text().not_null())
                    .col(ColumnDef::new(SyncJobs::Operation).text().not_null())
                    .col(
                        ColumnDef::new(SyncJobs::Status)
                            .text()
                            .not_null()
                            .default("queued"),
                    )
                    .col(ColumnDef::new(SyncJobs::RecordCount).integer().null())
                    .col(ColumnDef::new(SyncJobs::LogText).text().null())
                    .col(
                        ColumnDef::new(SyncJobs::StartedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::CompletedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SyncJobs::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Index for listing jobs per entity type and status, newest first
        manager
            .create_index(
                Index::create()
                    .name("idx_sync_jobs_entity_type_status_created")
                    .table(SyncJobs::Table)
                    .col(SyncJobs::EntityType)
                    .col(SyncJobs::Status)
                    .col(SyncJobs::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_sync_jobs_entity_type_status_created")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(SyncJobs::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum SyncJobs {
    Table,
    Id,
    EntityType,
    Operation,
    Status,
    RecordCount,
    LogText,
    StartedAt,
    CompletedAt,
    CreatedAt,
    UpdatedAt,
}
