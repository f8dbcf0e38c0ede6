//! EntitySnapshot entity model
//!
//! Local materialization of an external commerce platform entity, keyed by
//! (entity_type, external_id) so that re-running a fetch upserts in place.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde_json::Value as JsonValue;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "entity_snapshots")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Entity type of the snapshot (e.g., product, category)
    pub entity_type: String,

    /// Identifier assigned by the external platform
    pub external_id: String,

    /// Raw entity payload as returned by the platform
    #[sea_orm(column_type = "JsonBinary")]
    pub payload: JsonValue,

    /// Timestamp of the sync run that last wrote this snapshot
    pub synced_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
