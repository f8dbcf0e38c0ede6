//! Sync Job Engine
//!
//! Creates, runs, and tracks background jobs that fetch entities from the
//! external commerce platform into local snapshots. A job is claimed with an
//! atomic queued -> running transition, pages through the platform until a
//! short page, upserts every batch, and lands in `done` or `error`.

use std::sync::Arc;

use metrics::counter;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::clock::Clock;
use crate::error::CoreError;
use crate::models::sync_job::Model as SyncJobModel;
use crate::models::{EntityType, JobStatus, Operation};
use crate::platform::CommercePlatform;
use crate::repositories::{EntitySnapshotRepository, SyncJobRepository};

/// Service owning the sync job lifecycle.
pub struct SyncJobService {
    jobs: SyncJobRepository,
    snapshots: EntitySnapshotRepository,
    platform: Arc<dyn CommercePlatform>,
    clock: Arc<dyn Clock>,
    batch_limit: u64,
}

impl SyncJobService {
    pub fn new(
        db: DatabaseConnection,
        platform: Arc<dyn CommercePlatform>,
        clock: Arc<dyn Clock>,
        batch_limit: u64,
    ) -> Self {
        Self {
            jobs: SyncJobRepository::new(db.clone()),
            snapshots: EntitySnapshotRepository::new(db),
            platform,
            clock,
            batch_limit,
        }
    }

    /// Create a new job in `queued` status.
    pub async fn create(
        &self,
        entity_type: EntityType,
        operation: Operation,
    ) -> Result<SyncJobModel, CoreError> {
        self.jobs.create(entity_type, operation, self.clock.now()).await
    }

    /// Fire-and-forget execution of a queued job on the runtime.
    pub fn submit(&self, job_id: Uuid) {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.run(job_id).await {
                error!(job_id = %job_id, "sync job execution failed: {}", e);
            }
        });
    }

    /// Claim and run a queued job to completion.
    ///
    /// Returns the job in its terminal state. Fails with
    /// [`CoreError::JobNotClaimable`] when the job has already been claimed
    /// or finished.
    #[instrument(skip(self), fields(job_id = %job_id))]
    pub async fn run(&self, job_id: Uuid) -> Result<SyncJobModel, CoreError> {
        let job = self.jobs.claim(job_id, self.clock.now()).await?;

        let entity_type: EntityType = match job.entity_type.parse() {
            Ok(ty) => ty,
            Err(msg) => return self.fail(job, msg).await,
        };
        let operation: Operation = match job.operation.parse() {
            Ok(op) => op,
            Err(msg) => return self.fail(job, msg).await,
        };

        // Only fetch is executable; other operations were accepted at
        // creation and surface here as a diagnosable failure.
        if operation != Operation::Fetch {
            return self
                .fail(
                    job,
                    format!("operation '{}' is not implemented", operation),
                )
                .await;
        }

        info!(entity_type = %entity_type, "starting fetch job");

        match self.fetch_all(entity_type).await {
            Ok(total) => {
                counter!("sync_jobs_total", "outcome" => "done").increment(1);
                info!(record_count = total, "fetch job completed");
                self.jobs.mark_done(job, total, self.clock.now()).await
            }
            Err(e) => self.fail(job, e.to_string()).await,
        }
    }

    /// Page through the platform, upserting each batch, until a short page.
    async fn fetch_all(&self, entity_type: EntityType) -> Result<i32, CoreError> {
        let mut offset = 0u64;
        let mut total = 0i32;

        loop {
            let page = self
                .platform
                .fetch_entities(entity_type, self.batch_limit, offset)
                .await?;
            let page_len = page.len() as u64;

            self.snapshots
                .upsert_batch(entity_type, &page, self.clock.now())
                .await?;

            total += page.len() as i32;
            offset += page_len;

            if page_len < self.batch_limit {
                break;
            }
        }

        Ok(total)
    }

    /// Mark a claimed job as errored, preserving the diagnostic.
    async fn fail(&self, job: SyncJobModel, log_text: String) -> Result<SyncJobModel, CoreError> {
        counter!("sync_jobs_total", "outcome" => "error").increment(1);
        warn!(job_id = %job.id, "sync job failed: {}", log_text);

        self.jobs.mark_error(job, log_text, self.clock.now()).await
    }

    /// Current state of a job, if it exists.
    pub async fn get_status(&self, job_id: Uuid) -> Result<Option<SyncJobModel>, CoreError> {
        self.jobs.find_by_id(job_id).await
    }

    /// List jobs with optional filtering, newest first.
    pub async fn list(
        &self,
        entity_type: Option<EntityType>,
        status: Option<JobStatus>,
        limit: Option<u64>,
        offset: Option<u64>,
    ) -> Result<Vec<SyncJobModel>, CoreError> {
        self.jobs.list(entity_type, status, limit, offset).await
    }
}

// Clone so the service can move into spawned tasks.
impl Clone for SyncJobService {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
            snapshots: self.snapshots.clone(),
            platform: self.platform.clone(),
            clock: self.clock.clone(),
            batch_limit: self.batch_limit,
        }
    }
}
