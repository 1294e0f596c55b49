//
//  sonarqube-client
//  api/components.rs
//

//! Component search and navigation (`api/components`).
//!
//! Components are the nodes of the server's resource tree: projects,
//! directories, files, views, applications.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_member, check_members, check_page_size, require, ApiError, Paging};

const TREE_STRATEGIES: &[&str] = &["all", "children", "leaves"];
const TREE_SORT_FIELDS: &[&str] = &["name", "path", "qualifier"];

/// A component: project, directory, file, view, or application.
#[derive(Debug, Clone, Deserialize)]
pub struct Component {
    #[serde(default)]
    pub id: Option<String>,
    pub key: String,
    pub name: String,
    pub qualifier: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub project: Option<String>,
    #[serde(rename = "analysisDate", default)]
    pub analysis_date: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

/// Response of `api/components/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentsSearchResult {
    pub paging: Paging,
    pub components: Vec<Component>,
}

/// Response of `api/components/show`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentsShowResult {
    pub component: Component,
    /// Enclosing components, innermost first.
    #[serde(default)]
    pub ancestors: Vec<Component>,
}

/// Response of `api/components/tree`.
#[derive(Debug, Clone, Deserialize)]
pub struct ComponentsTreeResult {
    pub paging: Paging,
    #[serde(rename = "baseComponent")]
    pub base_component: Component,
    pub components: Vec<Component>,
}

/// Options for `api/components/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentsSearchOption {
    /// Comma-separated qualifiers, e.g. `TRK,FIL`.
    pub qualifiers: String,
    /// Query on keys and names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Language key; limits results to components of that language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl ComponentsSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("qualifiers", &self.qualifiers)?;
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/components/tree`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentsTreeOption {
    /// Base component key.
    pub component: String,
    /// Traversal strategy: `all` (default), `children`, `leaves`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Comma-separated qualifiers to keep.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<String>,
    /// Query on names, keys, and file paths. At least 3 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Comma-separated sort fields: `name`, `path`, `qualifier`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl ComponentsTreeOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("component", &self.component)?;
        if let Some(strategy) = &self.strategy {
            check_member("strategy", strategy, TREE_STRATEGIES)?;
        }
        if let Some(sort) = &self.s {
            check_members("s", sort, TREE_SORT_FIELDS)?;
        }
        if let Some(q) = &self.q {
            if q.len() < 3 {
                return Err(ApiError::validation("q", "must be at least 3 characters"));
            }
        }
        check_page_size("ps", self.ps)
    }
}

/// Service for `api/components`.
pub struct ComponentsService<'a> {
    client: &'a SonarClient,
}

impl<'a> ComponentsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches components by qualifier.
    pub async fn search(
        &self,
        opt: &ComponentsSearchOption,
    ) -> Result<ComponentsSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("components/search", opt).await
    }

    /// Returns a component with its ancestors.
    pub async fn show(&self, component: &str) -> Result<ComponentsShowResult, ApiError> {
        require("component", component)?;
        self.client
            .get("components/show", &[("component", component)])
            .await
    }

    /// Navigates through the tree rooted at a component.
    pub async fn tree(&self, opt: &ComponentsTreeOption) -> Result<ComponentsTreeResult, ApiError> {
        opt.validate()?;
        self.client.get("components/tree", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_requires_qualifiers() {
        assert!(ComponentsSearchOption::default().validate().is_err());
        assert!(ComponentsSearchOption {
            qualifiers: "TRK".to_string(),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }

    #[test]
    fn test_tree_constraints() {
        let base = ComponentsTreeOption {
            component: "demo".to_string(),
            ..Default::default()
        };
        assert!(base.validate().is_ok());

        let bad_strategy = ComponentsTreeOption {
            strategy: Some("descendants".to_string()),
            ..base.clone()
        };
        assert!(bad_strategy.validate().is_err());

        let short_query = ComponentsTreeOption {
            q: Some("ab".to_string()),
            ..base
        };
        assert!(short_query.validate().is_err());
    }
}
