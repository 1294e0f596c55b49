//
//  sonarqube-client
//  api/ce.rs
//

//! Compute Engine task queue and history (`api/ce`).
//!
//! The Compute Engine is the server-side processor of analysis reports.
//! These actions inspect its queue and past activity; nothing here runs
//! analyses.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_date, check_members, check_page_size, require, ApiError, Paging};

/// Task statuses accepted by the `status` filter of `api/ce/activity`.
pub const TASK_STATUSES: &[&str] =
    &["SUCCESS", "FAILED", "CANCELED", "PENDING", "IN_PROGRESS"];

/// A Compute Engine task.
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    pub id: String,
    /// Task type, e.g. `REPORT`.
    #[serde(rename = "type")]
    pub task_type: String,
    pub status: String,
    #[serde(rename = "componentId", default)]
    pub component_id: Option<String>,
    #[serde(rename = "componentKey", default)]
    pub component_key: Option<String>,
    #[serde(rename = "componentName", default)]
    pub component_name: Option<String>,
    #[serde(rename = "analysisId", default)]
    pub analysis_id: Option<String>,
    #[serde(rename = "submittedAt", default)]
    pub submitted_at: Option<String>,
    #[serde(rename = "submitterLogin", default)]
    pub submitter_login: Option<String>,
    #[serde(rename = "startedAt", default)]
    pub started_at: Option<String>,
    #[serde(rename = "executedAt", default)]
    pub executed_at: Option<String>,
    #[serde(rename = "executionTimeMs", default)]
    pub execution_time_ms: Option<u64>,
    #[serde(rename = "errorMessage", default)]
    pub error_message: Option<String>,
    #[serde(rename = "hasErrorStacktrace", default)]
    pub has_error_stacktrace: Option<bool>,
    #[serde(rename = "errorStacktrace", default)]
    pub error_stacktrace: Option<String>,
    #[serde(rename = "scannerContext", default)]
    pub scanner_context: Option<String>,
    #[serde(rename = "warningCount", default)]
    pub warning_count: Option<u32>,
}

/// Response of `api/ce/activity`.
#[derive(Debug, Clone, Deserialize)]
pub struct CeActivityResult {
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Response of `api/ce/activity_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct CeActivityStatusResult {
    /// Count of queued tasks.
    pub pending: u64,
    /// Count of tasks currently failing.
    pub failing: u64,
    #[serde(rename = "inProgress", default)]
    pub in_progress: Option<u64>,
    /// Age in milliseconds of the oldest pending task.
    #[serde(rename = "pendingTime", default)]
    pub pending_time: Option<u64>,
}

/// Response of `api/ce/component`.
#[derive(Debug, Clone, Deserialize)]
pub struct CeComponentResult {
    /// Tasks queued for the component, oldest first.
    pub queue: Vec<Task>,
    /// Last executed task, if any.
    #[serde(default)]
    pub current: Option<Task>,
}

/// Response of `api/ce/task`.
#[derive(Debug, Clone, Deserialize)]
pub struct CeTaskResult {
    pub task: Task,
}

/// Options for `api/ce/activity`.
///
/// `component_id` and `q` are mutually exclusive.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CeActivityOption {
    #[serde(rename = "componentId", skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// Query on task ids, component keys and component names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Comma-separated statuses, see [`TASK_STATUSES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Task type, e.g. `REPORT`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub task_type: Option<String>,
    /// Only the last task of each component.
    #[serde(rename = "onlyCurrents", skip_serializing_if = "Option::is_none")]
    pub only_currents: Option<bool>,
    /// Only tasks executed at or before this datetime.
    #[serde(rename = "maxExecutedAt", skip_serializing_if = "Option::is_none")]
    pub max_executed_at: Option<String>,
    /// Only tasks submitted at or after this datetime.
    #[serde(rename = "minSubmittedAt", skip_serializing_if = "Option::is_none")]
    pub min_submitted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl CeActivityOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.component_id.is_some() && self.q.is_some() {
            return Err(ApiError::validation(
                "componentId",
                "must not be combined with `q`",
            ));
        }
        if let Some(status) = &self.status {
            check_members("status", status, TASK_STATUSES)?;
        }
        if let Some(date) = &self.min_submitted_at {
            check_date("minSubmittedAt", date)?;
        }
        if let Some(date) = &self.max_executed_at {
            check_date("maxExecutedAt", date)?;
        }
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/ce/component`.
///
/// Exactly one of `component` / `component_id` must be supplied.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CeComponentOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
    #[serde(rename = "componentId", skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
}

impl CeComponentOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        super::common::check_one_of(
            "component",
            self.component.as_deref(),
            "componentId",
            self.component_id.as_deref(),
        )
    }
}

/// Options for `api/ce/task`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CeTaskOption {
    /// Task id, as returned when the task was submitted.
    pub id: String,
    /// Comma-separated extras to include: `stacktrace`, `scannerContext`,
    /// `warnings`.
    #[serde(rename = "additionalFields", skip_serializing_if = "Option::is_none")]
    pub additional_fields: Option<String>,
}

impl CeTaskOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("id", &self.id)?;
        if let Some(fields) = &self.additional_fields {
            check_members(
                "additionalFields",
                fields,
                &["stacktrace", "scannerContext", "warnings"],
            )?;
        }
        Ok(())
    }
}

/// Service for `api/ce`.
pub struct CeService<'a> {
    client: &'a SonarClient,
}

impl<'a> CeService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches tasks, most recent first. Requires Administer System
    /// permission (or Administer on the filtered component).
    pub async fn activity(&self, opt: &CeActivityOption) -> Result<CeActivityResult, ApiError> {
        opt.validate()?;
        self.client.get("ce/activity", opt).await
    }

    /// Returns queue counters, optionally scoped to one component.
    pub async fn activity_status(
        &self,
        component_id: Option<&str>,
    ) -> Result<CeActivityStatusResult, ApiError> {
        let query: Vec<(&str, &str)> = match component_id {
            Some(id) => vec![("componentId", id)],
            None => vec![],
        };
        self.client.get("ce/activity_status", &query).await
    }

    /// Returns the pending tasks and last executed task of a component.
    pub async fn component(&self, opt: &CeComponentOption) -> Result<CeComponentResult, ApiError> {
        opt.validate()?;
        self.client.get("ce/component", opt).await
    }

    /// Returns one task by id.
    pub async fn task(&self, opt: &CeTaskOption) -> Result<CeTaskResult, ApiError> {
        opt.validate()?;
        self.client.get("ce/task", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_filters() {
        assert!(CeActivityOption::default().validate().is_ok());

        let exclusive = CeActivityOption {
            component_id: Some("u1".to_string()),
            q: Some("demo".to_string()),
            ..Default::default()
        };
        assert!(exclusive.validate().is_err());

        let bad_status = CeActivityOption {
            status: Some("SUCCESS,RUNNING".to_string()),
            ..Default::default()
        };
        assert!(bad_status.validate().is_err());
    }

    #[test]
    fn test_task_option() {
        assert!(CeTaskOption::default().validate().is_err());
        let ok = CeTaskOption {
            id: "AU-Tpxb_".to_string(),
            additional_fields: Some("warnings".to_string()),
        };
        assert!(ok.validate().is_ok());
    }
}
