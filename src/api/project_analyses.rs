//
//  sonarqube-client
//  api/project_analyses.rs
//

//! Analysis history and analysis events (`api/project_analyses`).
//!
//! Events of category `VERSION` or `OTHER` can be created and edited by
//! hand; `QUALITY_GATE` and `QUALITY_PROFILE` events are server-managed.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_date, check_member, check_page_size, require, ApiError, Paging};

/// Event categories accepted by `create_event` and usable as a `search`
/// filter.
pub const EVENT_CATEGORIES: &[&str] =
    &["VERSION", "OTHER", "QUALITY_PROFILE", "QUALITY_GATE"];

const CREATABLE_CATEGORIES: &[&str] = &["VERSION", "OTHER"];

/// An event attached to an analysis.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisEvent {
    pub key: String,
    pub category: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// One analysis of a project.
#[derive(Debug, Clone, Deserialize)]
pub struct Analysis {
    pub key: String,
    /// Datetime the analysis was performed.
    pub date: String,
    #[serde(default)]
    pub events: Vec<AnalysisEvent>,
    #[serde(rename = "projectVersion", default)]
    pub project_version: Option<String>,
    #[serde(rename = "buildString", default)]
    pub build_string: Option<String>,
    #[serde(rename = "detectedCI", default)]
    pub detected_ci: Option<String>,
}

/// Response of `api/project_analyses/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysesSearchResult {
    pub paging: Paging,
    pub analyses: Vec<Analysis>,
}

/// Response of `api/project_analyses/create_event` and `update_event`.
#[derive(Debug, Clone, Deserialize)]
pub struct EventResult {
    pub event: AnalysisEvent,
}

/// Options for `api/project_analyses/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AnalysesSearchOption {
    /// Project key.
    pub project: String,
    /// Restrict to analyses carrying an event of this category, see
    /// [`EVENT_CATEGORIES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Include only analyses at or after this datetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Include only analyses at or before this datetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl AnalysesSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("project", &self.project)?;
        if let Some(category) = &self.category {
            check_member("category", category, EVENT_CATEGORIES)?;
        }
        if let Some(date) = &self.from {
            check_date("from", date)?;
        }
        if let Some(date) = &self.to {
            check_date("to", date)?;
        }
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/project_analyses/create_event`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateEventOption {
    /// Key of the analysis to attach the event to.
    pub analysis: String,
    /// Event name, at most 400 characters.
    pub name: String,
    /// `VERSION` (default) or `OTHER`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl CreateEventOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("analysis", &self.analysis)?;
        require("name", &self.name)?;
        if self.name.len() > 400 {
            return Err(ApiError::validation("name", "must not exceed 400 characters"));
        }
        if let Some(category) = &self.category {
            check_member("category", category, CREATABLE_CATEGORIES)?;
        }
        Ok(())
    }
}

/// Service for `api/project_analyses`.
pub struct ProjectAnalysesService<'a> {
    client: &'a SonarClient,
}

impl<'a> ProjectAnalysesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Lists the analyses of a project, most recent first.
    pub async fn search(
        &self,
        opt: &AnalysesSearchOption,
    ) -> Result<AnalysesSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("project_analyses/search", opt).await
    }

    /// Deletes an analysis and everything attached to it.
    pub async fn delete(&self, analysis: &str) -> Result<(), ApiError> {
        require("analysis", analysis)?;
        self.client
            .post_empty("project_analyses/delete", &[("analysis", analysis)])
            .await
    }

    /// Creates an event on an analysis.
    pub async fn create_event(&self, opt: &CreateEventOption) -> Result<EventResult, ApiError> {
        opt.validate()?;
        self.client.post("project_analyses/create_event", opt).await
    }

    /// Renames an event of category `VERSION` or `OTHER`.
    pub async fn update_event(&self, event: &str, name: &str) -> Result<EventResult, ApiError> {
        require("event", event)?;
        require("name", name)?;
        self.client
            .post(
                "project_analyses/update_event",
                &[("event", event), ("name", name)],
            )
            .await
    }

    /// Deletes an event of category `VERSION` or `OTHER`.
    pub async fn delete_event(&self, event: &str) -> Result<(), ApiError> {
        require("event", event)?;
        self.client
            .post_empty("project_analyses/delete_event", &[("event", event)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_event_category_is_restricted() {
        let ok = CreateEventOption {
            analysis: "AU-Tpxb--iU5OvuD2FLy".to_string(),
            name: "5.6".to_string(),
            category: Some("VERSION".to_string()),
        };
        assert!(ok.validate().is_ok());

        let server_managed = CreateEventOption {
            analysis: "AU-Tpxb--iU5OvuD2FLy".to_string(),
            name: "Passed".to_string(),
            category: Some("QUALITY_GATE".to_string()),
        };
        assert!(server_managed.validate().is_err());
    }

    #[test]
    fn test_search_requires_project() {
        assert!(AnalysesSearchOption::default().validate().is_err());
        assert!(AnalysesSearchOption {
            project: "demo".to_string(),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }
}
