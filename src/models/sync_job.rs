//! SyncJob entity model
//!
//! Represents an asynchronous unit of work fetching entities from the
//! external commerce platform. Jobs are append-only history and move
//! through queued -> running -> done/error.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use uuid::Uuid;

/// SyncJob entity representing a background fetch work unit
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "sync_jobs")]
pub struct Model {
    /// Unique identifier for the sync job (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Entity type this job targets (e.g., product, category)
    pub entity_type: String,

    /// Requested operation (fetch, create, update, delete)
    pub operation: String,

    /// Current status of the job (queued, running, done, error)
    pub status: String,

    /// Number of records processed, set on successful completion
    pub record_count: Option<i32>,

    /// Human-readable diagnostic, set on failure
    pub log_text: Option<String>,

    /// Timestamp when the job started execution
    pub started_at: Option<DateTimeWithTimeZone>,

    /// Timestamp when the job reached a terminal state
    pub completed_at: Option<DateTimeWithTimeZone>,

    /// Timestamp when the sync job was created
    pub created_at: DateTimeWithTimeZone,

    /// Timestamp when the sync job was last updated
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
