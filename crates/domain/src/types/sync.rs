//! Sync job and sync result types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::impl_domain_status_conversions;

/// Lifecycle of an upstream sync job.
///
/// Transitions are owned by the upstream system; AdSync only observes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncJobStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

impl_domain_status_conversions!(SyncJobStatus {
    Pending => "pending",
    Running => "running",
    Completed => "completed",
    Failed => "failed",
});

impl SyncJobStatus {
    /// `completed` and `failed` are terminal.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Sync job as listed by the sync-jobs resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncJob {
    pub id: String,
    pub status: SyncJobStatus,
    pub sync_start_date: String,
    pub sync_end_date: String,
    pub sync_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub records_processed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SyncJob {
    /// Job has not reached a terminal status yet.
    pub const fn is_active(&self) -> bool {
        !self.status.is_terminal()
    }
}

/// Outcome reported by a search-terms sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncResultStatus {
    Completed,
    Failed,
}

impl_domain_status_conversions!(SyncResultStatus {
    Completed => "completed",
    Failed => "failed",
});

/// One-shot response of a search-terms sync. Never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResult {
    pub job_id: String,
    pub customer_id: String,
    #[serde(default)]
    pub customer_name: String,
    pub status: SyncResultStatus,
    pub records_fetched: u64,
    pub records_stored: u64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// One-shot response of an account-structure sync. Never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FullSyncResult {
    pub total_campaigns: u64,
    pub total_ad_groups: u64,
    pub total_keywords: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job_json(status: &str) -> String {
        format!(
            r#"{{
                "id": "job-1",
                "status": "{status}",
                "syncStartDate": "2024-01-01",
                "syncEndDate": "2024-01-31",
                "syncType": "search_terms",
                "recordsProcessed": null,
                "createdAt": "2024-02-01T10:00:00Z",
                "startedAt": null
            }}"#
        )
    }

    #[test]
    fn test_terminal_statuses() {
        assert!(!SyncJobStatus::Pending.is_terminal());
        assert!(!SyncJobStatus::Running.is_terminal());
        assert!(SyncJobStatus::Completed.is_terminal());
        assert!(SyncJobStatus::Failed.is_terminal());
    }

    #[test]
    fn test_sync_job_deserialize() {
        let job: SyncJob = serde_json::from_str(&job_json("running")).unwrap();
        assert_eq!(job.status, SyncJobStatus::Running);
        assert!(job.is_active());
        assert_eq!(job.records_processed, None);
        assert_eq!(job.started_at, None);
    }

    #[test]
    fn test_unknown_job_status_is_rejected() {
        assert!(serde_json::from_str::<SyncJob>(&job_json("paused")).is_err());
    }

    #[test]
    fn test_sync_result_deserialize() {
        let result: SyncResult = serde_json::from_str(
            r#"{
                "jobId": "j1",
                "customerId": "123",
                "customerName": "Acme",
                "status": "completed",
                "recordsFetched": 10,
                "recordsStored": 10,
                "startDate": "2024-01-01",
                "endDate": "2024-01-31"
            }"#,
        )
        .unwrap();
        assert_eq!(result.status, SyncResultStatus::Completed);
        assert_eq!(result.records_stored, 10);
        assert_eq!(result.error_message, None);
    }

    #[test]
    fn test_full_sync_result_deserialize() {
        let result: FullSyncResult = serde_json::from_str(
            r#"{"totalCampaigns": 3, "totalAdGroups": 12, "totalKeywords": 240}"#,
        )
        .unwrap();
        assert_eq!(result.total_keywords, 240);
    }
}
