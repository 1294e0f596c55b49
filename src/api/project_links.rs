//
//  sonarqube-client
//  api/project_links.rs
//

//! Project links (`api/project_links`).

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_http_url, check_one_of, require, ApiError};

/// A link attached to a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectLink {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    /// Link type: provided links have well-known types (`homepage`, `scm`,
    /// `issue`, `ci`), custom links use `custom`.
    #[serde(rename = "type", default)]
    pub link_type: Option<String>,
    pub url: String,
}

/// Response of `api/project_links/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectLinksSearchResult {
    pub links: Vec<ProjectLink>,
}

/// Response of `api/project_links/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProjectLink {
    pub link: ProjectLink,
}

/// Options for `api/project_links/search`.
///
/// Exactly one of `project_id` / `project_key` must be supplied.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectLinksSearchOption {
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(rename = "projectKey", skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
}

impl ProjectLinksSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_one_of(
            "projectId",
            self.project_id.as_deref(),
            "projectKey",
            self.project_key.as_deref(),
        )
    }
}

/// Options for `api/project_links/create`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectLinksCreateOption {
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(rename = "projectKey", skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
    /// Display name of the link.
    pub name: String,
    /// Target URL, http(s).
    pub url: String,
}

impl ProjectLinksCreateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_one_of(
            "projectId",
            self.project_id.as_deref(),
            "projectKey",
            self.project_key.as_deref(),
        )?;
        require("name", &self.name)?;
        check_http_url("url", &self.url)
    }
}

/// Service for `api/project_links`.
pub struct ProjectLinksService<'a> {
    client: &'a SonarClient,
}

impl<'a> ProjectLinksService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Lists the links of a project.
    pub async fn search(
        &self,
        opt: &ProjectLinksSearchOption,
    ) -> Result<ProjectLinksSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("project_links/search", opt).await
    }

    /// Creates a custom link on a project.
    pub async fn create(
        &self,
        opt: &ProjectLinksCreateOption,
    ) -> Result<CreatedProjectLink, ApiError> {
        opt.validate()?;
        self.client.post("project_links/create", opt).await
    }

    /// Deletes a custom link by id. Provided links cannot be deleted.
    pub async fn delete(&self, id: &str) -> Result<(), ApiError> {
        require("id", id)?;
        self.client
            .post_empty("project_links/delete", &[("id", id)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_requires_target_and_valid_url() {
        let ok = ProjectLinksCreateOption {
            project_key: Some("demo".to_string()),
            name: "CI".to_string(),
            url: "https://ci.example.com/demo".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let both_targets = ProjectLinksCreateOption {
            project_id: Some("1".to_string()),
            project_key: Some("demo".to_string()),
            name: "CI".to_string(),
            url: "https://ci.example.com".to_string(),
        };
        assert!(both_targets.validate().is_err());

        let bad_url = ProjectLinksCreateOption {
            project_key: Some("demo".to_string()),
            name: "CI".to_string(),
            url: "ssh://ci.example.com".to_string(),
            ..Default::default()
        };
        assert!(bad_url.validate().is_err());
    }
}
