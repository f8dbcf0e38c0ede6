//! SeaORM entity models and shared domain enums.

pub mod api_token;
pub mod entity_snapshot;
pub mod price_check;
pub mod price_rule;
pub mod product;
pub mod setting;
pub mod sync_job;
pub mod token_usage_log;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Commerce platform entity kinds a sync job can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Product,
    Category,
    Collection,
    Type,
    Tag,
    SalesChannel,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Product => "product",
            EntityType::Category => "category",
            EntityType::Collection => "collection",
            EntityType::Type => "type",
            EntityType::Tag => "tag",
            EntityType::SalesChannel => "sales_channel",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "product" => Ok(EntityType::Product),
            "category" => Ok(EntityType::Category),
            "collection" => Ok(EntityType::Collection),
            "type" => Ok(EntityType::Type),
            "tag" => Ok(EntityType::Tag),
            "sales_channel" => Ok(EntityType::SalesChannel),
            other => Err(format!("unknown entity type '{}'", other)),
        }
    }
}

/// Operation a sync job performs. Only `fetch` is executable today; the
/// remaining variants are accepted at creation and fail at run time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Fetch,
    Create,
    Update,
    Delete,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Fetch => "fetch",
            Operation::Create => "create",
            Operation::Update => "update",
            Operation::Delete => "delete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fetch" => Ok(Operation::Fetch),
            "create" => Ok(Operation::Create),
            "update" => Ok(Operation::Update),
            "delete" => Ok(Operation::Delete),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

/// Lifecycle states of a sync job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    Queued,
    Running,
    Done,
    Error,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Queued => "queued",
            JobStatus::Running => "running",
            JobStatus::Done => "done",
            JobStatus::Error => "error",
        }
    }

    /// Whether the job has reached a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Done | JobStatus::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "queued" => Ok(JobStatus::Queued),
            "running" => Ok(JobStatus::Running),
            "done" => Ok(JobStatus::Done),
            "error" => Ok(JobStatus::Error),
            other => Err(format!("unknown job status '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_type_round_trips_through_str() {
        for ty in [
            EntityType::Product,
            EntityType::Category,
            EntityType::Collection,
            EntityType::Type,
            EntityType::Tag,
            EntityType::SalesChannel,
        ] {
            assert_eq!(ty.as_str().parse::<EntityType>().unwrap(), ty);
        }
    }

    #[test]
    fn job_status_terminality() {
        assert!(!JobStatus::Queued.is_terminal());
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Done.is_terminal());
        assert!(JobStatus::Error.is_terminal());
    }

    #[test]
    fn unknown_values_rejected() {
        assert!("widget".parse::<EntityType>().is_err());
        assert!("sync".parse::<Operation>().is_err());
        assert!("paused".parse::<JobStatus>().is_err());
    }
}
