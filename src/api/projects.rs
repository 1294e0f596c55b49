//
//  sonarqube-client
//  api/projects.rs
//

//! Project administration (`api/projects`).
//!
//! Provisioning, browsing, and deleting projects, plus key and visibility
//! updates. All mutating actions require Administer System or Administer
//! permission on the project.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{
    check_date, check_member, check_members, check_page_size, check_project_key, require,
    ApiError, Paging,
};

const VISIBILITIES: &[&str] = &["public", "private"];
const QUALIFIERS: &[&str] = &["TRK", "VW", "APP"];

/// A project (or view/application) as returned by `api/projects/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Project key, unique across the server.
    pub key: String,
    pub name: String,
    /// Component qualifier: `TRK` (project), `VW` (view), `APP` (application).
    pub qualifier: String,
    #[serde(default)]
    pub visibility: Option<String>,
    /// Datetime of the last analysis, absent for provisioned-only projects.
    #[serde(rename = "lastAnalysisDate", default)]
    pub last_analysis_date: Option<String>,
    #[serde(default)]
    pub revision: Option<String>,
}

/// Response of `api/projects/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsSearchResult {
    pub paging: Paging,
    pub components: Vec<Project>,
}

/// Response of `api/projects/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProject {
    pub project: CreatedProjectDetail,
}

/// The created project echoed back by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedProjectDetail {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub qualifier: Option<String>,
    #[serde(default)]
    pub visibility: Option<String>,
}

/// Options for `api/projects/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectsSearchOption {
    /// Only list projects analyzed before this date (inclusive),
    /// `YYYY-MM-DD` or full datetime.
    #[serde(rename = "analyzedBefore", skip_serializing_if = "Option::is_none")]
    pub analyzed_before: Option<String>,
    /// Only list provisioned (never analyzed) projects.
    #[serde(rename = "onProvisionedOnly", skip_serializing_if = "Option::is_none")]
    pub on_provisioned_only: Option<bool>,
    /// 1-indexed page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Comma-separated list of project keys to filter on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<String>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
    /// Query on key and name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Comma-separated qualifiers (`TRK`, `VW`, `APP`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<String>,
}

impl ProjectsSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_page_size("ps", self.ps)?;
        if let Some(qualifiers) = &self.qualifiers {
            check_members("qualifiers", qualifiers, QUALIFIERS)?;
        }
        if let Some(date) = &self.analyzed_before {
            check_date("analyzedBefore", date)?;
        }
        Ok(())
    }
}

/// Options for `api/projects/create`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectsCreateOption {
    /// Key of the project to create. Letters, digits, `:`, `_`, `.`, `-`,
    /// at least one non-digit, at most 400 characters.
    pub project: String,
    /// Display name of the project.
    pub name: String,
    /// Key of the main branch. Defaults to the server-wide setting.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    /// `public` or `private`. Defaults to the organization default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
}

impl ProjectsCreateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_project_key("project", &self.project)?;
        require("name", &self.name)?;
        if let Some(visibility) = &self.visibility {
            check_member("visibility", visibility, VISIBILITIES)?;
        }
        Ok(())
    }
}

/// Options for `api/projects/bulk_delete`.
///
/// At least one of `analyzed_before`, `projects` or `q` must be supplied;
/// the server refuses an unrestricted bulk deletion and so does the client.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectsBulkDeleteOption {
    #[serde(rename = "analyzedBefore", skip_serializing_if = "Option::is_none")]
    pub analyzed_before: Option<String>,
    #[serde(rename = "onProvisionedOnly", skip_serializing_if = "Option::is_none")]
    pub on_provisioned_only: Option<bool>,
    /// Comma-separated list of project keys to delete.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<String>,
    /// Query on key and name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
}

impl ProjectsBulkDeleteOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.analyzed_before.is_none() && self.projects.is_none() && self.q.is_none() {
            return Err(ApiError::validation(
                "projects",
                "at least one of `projects`, `analyzedBefore` or `q` is required",
            ));
        }
        if let Some(date) = &self.analyzed_before {
            check_date("analyzedBefore", date)?;
        }
        Ok(())
    }
}

/// Options for `api/projects/update_key`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectsUpdateKeyOption {
    /// Current project key.
    pub from: String,
    /// New project key.
    pub to: String,
}

impl ProjectsUpdateKeyOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_project_key("from", &self.from)?;
        check_project_key("to", &self.to)
    }
}

/// Options for `api/projects/update_visibility`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProjectsUpdateVisibilityOption {
    pub project: String,
    /// `public` or `private`.
    pub visibility: String,
}

impl ProjectsUpdateVisibilityOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("project", &self.project)?;
        check_member("visibility", &self.visibility, VISIBILITIES)
    }
}

/// Service for `api/projects`.
pub struct ProjectsService<'a> {
    client: &'a SonarClient,
}

impl<'a> ProjectsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches projects. Requires Administer System permission.
    pub async fn search(
        &self,
        opt: &ProjectsSearchOption,
    ) -> Result<ProjectsSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("projects/search", opt).await
    }

    /// Creates (provisions) a project.
    pub async fn create(&self, opt: &ProjectsCreateOption) -> Result<CreatedProject, ApiError> {
        opt.validate()?;
        self.client.post("projects/create", opt).await
    }

    /// Deletes one project by key.
    pub async fn delete(&self, project: &str) -> Result<(), ApiError> {
        require("project", project)?;
        self.client
            .post_empty("projects/delete", &[("project", project)])
            .await
    }

    /// Deletes every project matching the filter.
    pub async fn bulk_delete(&self, opt: &ProjectsBulkDeleteOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("projects/bulk_delete", opt).await
    }

    /// Renames a project key without losing history.
    pub async fn update_key(&self, opt: &ProjectsUpdateKeyOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("projects/update_key", opt).await
    }

    /// Changes a project's visibility.
    pub async fn update_visibility(
        &self,
        opt: &ProjectsUpdateVisibilityOption,
    ) -> Result<(), ApiError> {
        opt.validate()?;
        self.client
            .post_empty("projects/update_visibility", opt)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_option_validation() {
        assert!(ProjectsSearchOption::default().validate().is_ok());
        assert!(ProjectsSearchOption {
            qualifiers: Some("TRK,APP".to_string()),
            ..Default::default()
        }
        .validate()
        .is_ok());
        assert!(ProjectsSearchOption {
            qualifiers: Some("FIL".to_string()),
            ..Default::default()
        }
        .validate()
        .is_err());
        assert!(ProjectsSearchOption {
            ps: Some(501),
            ..Default::default()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_create_option_validation() {
        let ok = ProjectsCreateOption {
            project: "org.demo:app".to_string(),
            name: "Demo".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let digits_only = ProjectsCreateOption {
            project: "1234".to_string(),
            name: "Demo".to_string(),
            ..Default::default()
        };
        assert!(digits_only.validate().is_err());

        let bad_visibility = ProjectsCreateOption {
            project: "demo".to_string(),
            name: "Demo".to_string(),
            visibility: Some("internal".to_string()),
            ..Default::default()
        };
        assert!(bad_visibility.validate().is_err());
    }

    #[test]
    fn test_bulk_delete_needs_a_filter() {
        assert!(ProjectsBulkDeleteOption::default().validate().is_err());
        assert!(ProjectsBulkDeleteOption {
            projects: Some("a,b".to_string()),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_search_query_string_shape() {
        let opt = ProjectsSearchOption {
            analyzed_before: Some("2024-01-01".to_string()),
            ps: Some(50),
            ..Default::default()
        };
        let qs = serde_urlencoded_like(&opt);
        assert!(qs.contains("analyzedBefore=2024-01-01"));
        assert!(qs.contains("ps=50"));
        assert!(!qs.contains("q="));
    }

    // serde_json round-trip stands in for the query-string encoder; both
    // walk the same Serialize impl and skip rules.
    fn serde_urlencoded_like<T: serde::Serialize>(value: &T) -> String {
        let json = serde_json::to_value(value).unwrap();
        json.as_object()
            .unwrap()
            .iter()
            .map(|(k, v)| format!("{k}={}", v.as_str().map(String::from).unwrap_or(v.to_string())))
            .collect::<Vec<_>>()
            .join("&")
    }
}
