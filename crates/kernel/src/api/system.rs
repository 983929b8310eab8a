//! Data synchronization types.

use serde::{Deserialize, Serialize};

use super::types::ListResponse;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncState {
    Idle,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStatus {
    pub stock_sync_status: SyncState,
    pub ipo_crawl_status: SyncState,
    #[serde(default)]
    pub stock_sync_progress: Option<f64>,
    #[serde(default)]
    pub ipo_crawl_progress: Option<f64>,
    #[serde(default)]
    pub last_sync_time: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncTaskType {
    StockSync,
    IpoCrawl,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncRunStatus {
    Pending,
    Running,
    Completed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncHistoryItem {
    pub id: String,
    pub task_type: SyncTaskType,
    pub status: SyncRunStatus,
    pub start_time: String,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub records_processed: Option<u64>,
}

pub type SyncHistoryResponse = ListResponse<SyncHistoryItem>;

/// Response of a sync trigger: the task to poll.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerSyncResponse {
    pub status: String,
    pub message: String,
    pub task_id: String,
}

/// Pagination for history listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}
