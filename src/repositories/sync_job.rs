//! # SyncJob Repository
//!
//! Repository operations for the sync_jobs table, including the atomic
//! queued -> running claim used by the sync engine.

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
    sea_query::Expr,
};
use uuid::Uuid;

use crate::error::CoreError;
use crate::models::sync_job::{ActiveModel, Column, Entity, Model};
use crate::models::{EntityType, JobStatus, Operation};

/// Repository for sync job database operations
#[derive(Clone)]
pub struct SyncJobRepository {
    db: DatabaseConnection,
}

impl SyncJobRepository {
    /// Create a new SyncJobRepository with the given database connection
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Enqueue a new sync job in `queued` status
    pub async fn create(
        &self,
        entity_type: EntityType,
        operation: Operation,
        now: DateTime<Utc>,
    ) -> Result<Model, CoreError> {
        let job = ActiveModel {
            id: Set(Uuid::new_v4()),
            entity_type: Set(entity_type.as_str().to_string()),
            operation: Set(operation.as_str().to_string()),
            status: Set(JobStatus::Queued.as_str().to_string()),
            record_count: Set(None),
            log_text: Set(None),
            started_at: Set(None),
            completed_at: Set(None),
            created_at: Set(now.fixed_offset()),
            updated_at: Set(now.fixed_offset()),
        };

        let result = job.insert(&self.db).await.map_err(|e| {
            tracing::error!("Failed to create sync job: {}", e);
            CoreError::Db(e)
        })?;

        tracing::info!(
            job_id = %result.id,
            entity_type = %result.entity_type,
            operation = %result.operation,
            "Sync job enqueued"
        );

        Ok(result)
    }

    /// Find a sync job by ID
    pub async fn find_by_id(&self, job_id: Uuid) -> Result<Option<Model>, CoreError> {
        let job = Entity::find_by_id(job_id).one(&self.db).await.map_err(|e| {
            tracing::error!("Failed to find sync job: {}", e);
            CoreError::Db(e)
        })?;

        Ok(job)
    }

    /// List sync jobs with optional filtering, newest first
    pub async fn list(
        &self,
        entity_type: Option<EntityType>,
        status: Option<JobStatus>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<Model>, CoreError> {
        let mut query = Entity::find().order_by_desc(Column::CreatedAt);

        if let Some(entity) = entity_type {
            query = query.filter(Column::EntityType.eq(entity.as_str()));
        }

        if let Some(status_filter) = status {
            query = query.filter(Column::Status.eq(status_filter.as_str()));
        }

        let results = if let Some(limit_value) = limit {
            query
                .offset(offset.unwrap_or(0))
                .limit(limit_value)
                .all(&self.db)
                .await
        } else {
            query.all(&self.db).await
        }
        .map_err(|e| {
            tracing::error!("Failed to list sync jobs: {}", e);
            CoreError::Db(e)
        })?;

        Ok(results)
    }

    /// Atomically claim a queued job, transitioning it to `running`.
    ///
    /// The update is filtered on `status = 'queued'` so a job can only be
    /// claimed once even under concurrent submitters.
    pub async fn claim(&self, job_id: Uuid, now: DateTime<Utc>) -> Result<Model, CoreError> {
        let update_result = Entity::update_many()
            .col_expr(
                Column::Status,
                Expr::value(JobStatus::Running.as_str()),
            )
            .col_expr(Column::StartedAt, Expr::value(now.fixed_offset()))
            .col_expr(Column::UpdatedAt, Expr::value(now.fixed_offset()))
            .filter(Column::Id.eq(job_id))
            .filter(Column::Status.eq(JobStatus::Queued.as_str()))
            .exec(&self.db)
            .await
            .map_err(|e| {
                tracing::error!("Failed to claim sync job: {}", e);
                CoreError::Db(e)
            })?;

        if update_result.rows_affected == 0 {
            // Distinguish a missing job from one already past `queued`.
            return match self.find_by_id(job_id).await? {
                Some(job) => Err(CoreError::JobNotClaimable {
                    id: job_id,
                    status: job.status,
                }),
                None => Err(CoreError::JobNotFound(job_id)),
            };
        }

        self.find_by_id(job_id)
            .await?
            .ok_or(CoreError::JobNotFound(job_id))
    }

    /// Mark a running job as `done` with the number of records processed
    pub async fn mark_done(
        &self,
        job: Model,
        record_count: i32,
        now: DateTime<Utc>,
    ) -> Result<Model, CoreError> {
        let mut active: ActiveModel = job.into();
        active.status = Set(JobStatus::Done.as_str().to_string());
        active.record_count = Set(Some(record_count));
        active.completed_at = Set(Some(now.fixed_offset()));
        active.updated_at = Set(now.fixed_offset());

        let updated = active.update(&self.db).await.map_err(|e| {
            tracing::error!("Failed to mark sync job done: {}", e);
            CoreError::Db(e)
        })?;

        Ok(updated)
    }

    /// Mark a job as `error` with a human-readable diagnostic
    pub async fn mark_error(
        &self,
        job: Model,
        log_text: String,
        now: DateTime<Utc>,
    ) -> Result<Model, CoreError> {
        let mut active: ActiveModel = job.into();
        active.status = Set(JobStatus::Error.as_str().to_string());
        active.log_text = Set(Some(log_text));
        active.completed_at = Set(Some(now.fixed_offset()));
        active.updated_at = Set(now.fixed_offset());

        let updated = active.update(&self.db).await.map_err(|e| {
            tracing::error!("Failed to mark sync job errored: {}", e);
            CoreError::Db(e)
        })?;

        Ok(updated)
    }
}
