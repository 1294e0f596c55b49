//
//  sonarqube-client
//  api/qualitygates.rs
//

//! Quality gates (`api/qualitygates`).
//!
//! A gate is a named set of threshold conditions on measures. Projects use
//! the default gate unless one is selected explicitly; `project_status` is
//! the pass/fail verdict of the latest (or a given) analysis.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_member, require, ApiError, NO_PARAMS};

/// Comparators accepted on gate conditions.
pub const CONDITION_OPERATORS: &[&str] = &["LT", "GT"];

/// A threshold condition of a gate.
#[derive(Debug, Clone, Deserialize)]
pub struct GateCondition {
    pub id: serde_json::Value,
    pub metric: String,
    /// `LT` or `GT`.
    pub op: String,
    /// Threshold beyond which the gate fails.
    pub error: String,
}

/// A quality gate.
#[derive(Debug, Clone, Deserialize)]
pub struct QualityGate {
    pub id: serde_json::Value,
    pub name: String,
    #[serde(rename = "isDefault", default)]
    pub is_default: Option<bool>,
    #[serde(rename = "isBuiltIn", default)]
    pub is_built_in: Option<bool>,
    #[serde(default)]
    pub conditions: Vec<GateCondition>,
}

/// Response of `api/qualitygates/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct GatesListResult {
    pub qualitygates: Vec<QualityGate>,
    #[serde(default)]
    pub default: Option<serde_json::Value>,
}

/// Response of `api/qualitygates/get_by_project`.
#[derive(Debug, Clone, Deserialize)]
pub struct GateByProjectResult {
    #[serde(rename = "qualityGate")]
    pub quality_gate: QualityGate,
}

/// One evaluated condition inside a project status.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusCondition {
    /// `OK`, `ERROR` or `NO_VALUE`.
    pub status: String,
    #[serde(rename = "metricKey")]
    pub metric_key: String,
    pub comparator: String,
    #[serde(rename = "errorThreshold", default)]
    pub error_threshold: Option<String>,
    #[serde(rename = "actualValue", default)]
    pub actual_value: Option<String>,
    #[serde(rename = "periodIndex", default)]
    pub period_index: Option<u32>,
}

/// The gate verdict of an analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectStatus {
    /// `OK`, `ERROR` or `NONE` when no gate applies.
    pub status: String,
    #[serde(default)]
    pub conditions: Vec<StatusCondition>,
    #[serde(rename = "ignoredConditions", default)]
    pub ignored_conditions: bool,
}

/// Response of `api/qualitygates/project_status`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectStatusResult {
    #[serde(rename = "projectStatus")]
    pub project_status: ProjectStatus,
}

/// Options for `api/qualitygates/create_condition` and
/// `update_condition`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GateConditionOption {
    /// Metric key the condition watches.
    pub metric: String,
    /// `LT` or `GT`, see [`CONDITION_OPERATORS`].
    pub op: String,
    /// Error threshold.
    pub error: String,
}

impl GateConditionOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("metric", &self.metric)?;
        check_member("op", &self.op, CONDITION_OPERATORS)?;
        require("error", &self.error)
    }
}

/// Options for `api/qualitygates/project_status`.
///
/// Exactly one of `analysis_id` / `project_id` / `project_key` must be
/// set; `branch` and `pull_request` only combine with `project_key`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectStatusOption {
    #[serde(rename = "analysisId", skip_serializing_if = "Option::is_none")]
    pub analysis_id: Option<String>,
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(rename = "projectKey", skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(rename = "pullRequest", skip_serializing_if = "Option::is_none")]
    pub pull_request: Option<String>,
}

impl ProjectStatusOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        let selectors = [
            self.analysis_id.as_deref(),
            self.project_id.as_deref(),
            self.project_key.as_deref(),
        ];
        if selectors.iter().flatten().count() != 1 {
            return Err(ApiError::validation(
                "analysisId",
                "exactly one of `analysisId`, `projectId` or `projectKey` is required",
            ));
        }
        if (self.branch.is_some() || self.pull_request.is_some()) && self.project_key.is_none() {
            return Err(ApiError::validation(
                "branch",
                "`branch` and `pullRequest` require `projectKey`",
            ));
        }
        Ok(())
    }
}

/// Service for `api/qualitygates`.
pub struct QualityGatesService<'a> {
    client: &'a SonarClient,
}

impl<'a> QualityGatesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Lists quality gates.
    pub async fn list(&self) -> Result<GatesListResult, ApiError> {
        self.client.get("qualitygates/list", NO_PARAMS).await
    }

    /// Returns one gate with its conditions. Takes id or name depending
    /// on the server version; both are passed through as `id`.
    pub async fn show(&self, id: &str) -> Result<QualityGate, ApiError> {
        require("id", id)?;
        self.client.get("qualitygates/show", &[("id", id)]).await
    }

    /// Creates a gate. Requires Administer Quality Gates permission.
    pub async fn create(&self, name: &str) -> Result<QualityGate, ApiError> {
        require("name", name)?;
        self.client
            .post("qualitygates/create", &[("name", name)])
            .await
    }

    /// Copies a gate, conditions included.
    pub async fn copy(&self, id: &str, name: &str) -> Result<QualityGate, ApiError> {
        require("id", id)?;
        require("name", name)?;
        self.client
            .post("qualitygates/copy", &[("id", id), ("name", name)])
            .await
    }

    /// Renames a gate.
    pub async fn rename(&self, id: &str, name: &str) -> Result<QualityGate, ApiError> {
        require("id", id)?;
        require("name", name)?;
        self.client
            .post("qualitygates/rename", &[("id", id), ("name", name)])
            .await
    }

    /// Deletes a gate. The built-in gate cannot be deleted.
    pub async fn destroy(&self, id: &str) -> Result<(), ApiError> {
        require("id", id)?;
        self.client
            .post_empty("qualitygates/destroy", &[("id", id)])
            .await
    }

    /// Sets a gate as the default for projects without an explicit one.
    pub async fn set_as_default(&self, id: &str) -> Result<(), ApiError> {
        require("id", id)?;
        self.client
            .post_empty("qualitygates/set_as_default", &[("id", id)])
            .await
    }

    /// Adds a condition to a gate.
    pub async fn create_condition(
        &self,
        gate_id: &str,
        opt: &GateConditionOption,
    ) -> Result<GateCondition, ApiError> {
        require("gateId", gate_id)?;
        opt.validate()?;
        let form = [
            ("gateId", gate_id),
            ("metric", &opt.metric),
            ("op", &opt.op),
            ("error", &opt.error),
        ];
        self.client
            .post("qualitygates/create_condition", &form)
            .await
    }

    /// Replaces the metric, comparator and threshold of a condition.
    pub async fn update_condition(
        &self,
        condition_id: &str,
        opt: &GateConditionOption,
    ) -> Result<GateCondition, ApiError> {
        require("id", condition_id)?;
        opt.validate()?;
        let form = [
            ("id", condition_id),
            ("metric", &opt.metric),
            ("op", &opt.op),
            ("error", &opt.error),
        ];
        self.client
            .post("qualitygates/update_condition", &form)
            .await
    }

    /// Removes a condition from its gate.
    pub async fn delete_condition(&self, condition_id: &str) -> Result<(), ApiError> {
        require("id", condition_id)?;
        self.client
            .post_empty("qualitygates/delete_condition", &[("id", condition_id)])
            .await
    }

    /// Associates a project with a gate.
    pub async fn select(&self, gate_id: &str, project_key: &str) -> Result<(), ApiError> {
        require("gateId", gate_id)?;
        require("projectKey", project_key)?;
        self.client
            .post_empty(
                "qualitygates/select",
                &[("gateId", gate_id), ("projectKey", project_key)],
            )
            .await
    }

    /// Detaches a project from its gate; the default applies again.
    pub async fn deselect(&self, project_key: &str) -> Result<(), ApiError> {
        require("projectKey", project_key)?;
        self.client
            .post_empty("qualitygates/deselect", &[("projectKey", project_key)])
            .await
    }

    /// Returns the gate a project uses.
    pub async fn get_by_project(&self, project: &str) -> Result<GateByProjectResult, ApiError> {
        require("project", project)?;
        self.client
            .get("qualitygates/get_by_project", &[("project", project)])
            .await
    }

    /// Returns the gate verdict of an analysis.
    pub async fn project_status(
        &self,
        opt: &ProjectStatusOption,
    ) -> Result<ProjectStatusResult, ApiError> {
        opt.validate()?;
        self.client.get("qualitygates/project_status", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SonarClient;

    #[test]
    fn test_condition_operator_is_checked() {
        let bad = GateConditionOption {
            metric: "coverage".to_string(),
            op: "EQ".to_string(),
            error: "80".to_string(),
        };
        assert!(bad.validate().is_err());

        let ok = GateConditionOption {
            metric: "coverage".to_string(),
            op: "LT".to_string(),
            error: "80".to_string(),
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_project_status_selector_rules() {
        assert!(ProjectStatusOption::default().validate().is_err());

        let two_selectors = ProjectStatusOption {
            analysis_id: Some("AU-Tpxb".to_string()),
            project_key: Some("demo".to_string()),
            ..Default::default()
        };
        assert!(two_selectors.validate().is_err());

        // Branch filtering only makes sense with a project key.
        let branch_without_key = ProjectStatusOption {
            project_id: Some("uuid".to_string()),
            branch: Some("main".to_string()),
            ..Default::default()
        };
        assert!(branch_without_key.validate().is_err());

        let ok = ProjectStatusOption {
            project_key: Some("demo".to_string()),
            branch: Some("main".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[tokio::test]
    async fn test_project_status_deserialization() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/qualitygates/project_status")
            .match_query(mockito::Matcher::UrlEncoded(
                "projectKey".into(),
                "demo".into(),
            ))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"projectStatus":{"status":"ERROR","conditions":[
                    {"status":"ERROR","metricKey":"new_coverage","comparator":"LT",
                     "errorThreshold":"85","actualValue":"82.5"}],
                    "ignoredConditions":false}}"#,
            )
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        let opt = ProjectStatusOption {
            project_key: Some("demo".to_string()),
            ..Default::default()
        };
        let result = client.quality_gates().project_status(&opt).await.unwrap();
        assert_eq!(result.project_status.status, "ERROR");
        assert_eq!(result.project_status.conditions[0].metric_key, "new_coverage");
    }
}
