//
//  sonarqube-client
//  api/project_branches.rs
//

//! Project branches (`api/project_branches`).

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{require, ApiError};

/// Status block of a branch.
#[derive(Debug, Clone, Deserialize)]
pub struct BranchStatus {
    /// Quality gate status for long-living branches: `OK`, `WARN`, `ERROR`.
    #[serde(rename = "qualityGateStatus", default)]
    pub quality_gate_status: Option<String>,
    #[serde(rename = "bugs", default)]
    pub bugs: Option<u64>,
    #[serde(rename = "vulnerabilities", default)]
    pub vulnerabilities: Option<u64>,
    #[serde(rename = "codeSmells", default)]
    pub code_smells: Option<u64>,
}

/// A branch of a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectBranch {
    pub name: String,
    /// `LONG` or `SHORT` (pre-8.x servers), `BRANCH` on newer ones.
    #[serde(rename = "type")]
    pub branch_type: String,
    #[serde(rename = "isMain", default)]
    pub is_main: bool,
    #[serde(default)]
    pub status: Option<BranchStatus>,
    #[serde(rename = "analysisDate", default)]
    pub analysis_date: Option<String>,
    #[serde(rename = "mergeBranch", default)]
    pub merge_branch: Option<String>,
}

/// Response of `api/project_branches/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectBranchesListResult {
    pub branches: Vec<ProjectBranch>,
}

/// Service for `api/project_branches`.
pub struct ProjectBranchesService<'a> {
    client: &'a SonarClient,
}

impl<'a> ProjectBranchesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Lists the branches of a project.
    pub async fn list(&self, project: &str) -> Result<ProjectBranchesListResult, ApiError> {
        require("project", project)?;
        self.client
            .get("project_branches/list", &[("project", project)])
            .await
    }

    /// Deletes a non-main branch of a project.
    pub async fn delete(&self, project: &str, branch: &str) -> Result<(), ApiError> {
        require("project", project)?;
        require("branch", branch)?;
        self.client
            .post_empty(
                "project_branches/delete",
                &[("project", project), ("branch", branch)],
            )
            .await
    }

    /// Renames the main branch of a project.
    pub async fn rename(&self, project: &str, name: &str) -> Result<(), ApiError> {
        require("project", project)?;
        require("name", name)?;
        self.client
            .post_empty(
                "project_branches/rename",
                &[("project", project), ("name", name)],
            )
            .await
    }
}
