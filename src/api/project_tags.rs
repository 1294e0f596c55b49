//
//  sonarqube-client
//  api/project_tags.rs
//

//! Project tags (`api/project_tags`).

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_page_size, require, ApiError};

/// Response of `api/project_tags/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectTagsSearchResult {
    pub tags: Vec<String>,
}

/// Options for `api/project_tags/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectTagsSearchOption {
    /// Pattern to match tags against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl ProjectTagsSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/project_tags/set`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectTagsSetOption {
    pub project: String,
    /// Comma-separated list of tags. An empty string clears all tags.
    pub tags: String,
}

impl ProjectTagsSetOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("project", &self.project)
    }
}

/// Service for `api/project_tags`.
pub struct ProjectTagsService<'a> {
    client: &'a SonarClient,
}

impl<'a> ProjectTagsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches tags across all projects.
    pub async fn search(
        &self,
        opt: &ProjectTagsSearchOption,
    ) -> Result<ProjectTagsSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("project_tags/search", opt).await
    }

    /// Replaces the tags of a project.
    pub async fn set(&self, opt: &ProjectTagsSetOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("project_tags/set", opt).await
    }
}
