//! Migration to create the entity_snapshots table.
//!
//! Snapshots are local materializations of external commerce platform
//! entities, keyed by (entity_type, external_id) so that replaying a fetch
//! job upserts rather than duplicates.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(EntitySnapshots::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(EntitySnapshots::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(EntitySnapshots::EntityType).text().not_null())
                    .col(ColumnDef::new(EntitySnapshots::ExternalId).text().not_null())
                    .col(
                        ColumnDef::new(EntitySnapshots::Payload)
                            .json_binary()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(EntitySnapshots::SyncedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Upsert key: one snapshot per external entity id per type
        manager
            .create_index(
                Index::create()
                    .name("uq_entity_snapshots_entity_type_external_id")
                    .table(EntitySnapshots::Table)
                    .col(EntitySnapshots::EntityType)
                    .col(EntitySnapshots::ExternalId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uq_entity_snapshots_entity_type_external_id")
                    .to_owned(),
            )
            .await?;

        manager
            .drop_table(Table::drop().table(EntitySnapshots::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum EntitySnapshots {
    Table,
    Id,
    EntityType,
    ExternalId,
    Payload,
    SyncedAt,
}
