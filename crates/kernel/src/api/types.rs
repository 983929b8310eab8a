//! Response shapes shared by all remote API modules.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One page of a list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListResponse<T, F = Value> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    /// Filters the server applied, echoed back.
    #[serde(default)]
    pub filters: F,
}

/// Result of a command endpoint: `{status, message, ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandResponse {
    pub status: String,
    #[serde(default)]
    pub message: String,
    /// Endpoint-specific fields (counts, exchange, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnvelopeStatus {
    Success,
    Error,
}

/// Generic `{status, data?, message?, detail?}` envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: EnvelopeStatus,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl TaskStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, TaskStatus::Completed | TaskStatus::Failed)
    }
}

/// A long-running operation, polled by `task_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResponse {
    pub task_id: String,
    pub status: TaskStatus,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub result: Option<Value>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn command_response_keeps_extra_fields() {
        let resp: CommandResponse = serde_json::from_str(
            r#"{"status": "success", "message": "done", "crawled_count": 12, "exchange": "sse"}"#,
        )
        .unwrap();
        assert_eq!(resp.extra["crawled_count"], 12);
        assert_eq!(resp.extra["exchange"], "sse");
    }

    #[test]
    fn list_response_defaults_filters() {
        let resp: ListResponse<u32> =
            serde_json::from_str(r#"{"data": [1, 2], "total": 2, "page": 1, "page_size": 20}"#)
                .unwrap();
        assert_eq!(resp.data, vec![1, 2]);
        assert!(resp.filters.is_null());
    }
}
