//
//  sonarqube-client
//  api/sources.rs
//

//! Source code access (`api/sources`).
//!
//! `raw` returns the file verbatim as text; `show` and `scm` return typed
//! line-oriented JSON.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{require, ApiError};

/// Response of `api/sources/show`: `sources` is a list of
/// `[line_number, html_source]` pairs.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesShowResult {
    pub sources: Vec<(u32, String)>,
}

/// Response of `api/sources/scm`: `scm` is a list of
/// `[line_number, author, datetime, revision]` tuples.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesScmResult {
    pub scm: Vec<(u32, String, String, String)>,
}

/// Options for `api/sources/show`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourcesShowOption {
    /// File key.
    pub key: String,
    /// First line to return (1-indexed).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    /// Last line to return (inclusive).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<u32>,
}

impl SourcesShowOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)?;
        if let (Some(from), Some(to)) = (self.from, self.to) {
            if from > to {
                return Err(ApiError::validation("from", "must not be greater than `to`"));
            }
        }
        if self.from == Some(0) {
            return Err(ApiError::validation("from", "line numbers are 1-indexed"));
        }
        Ok(())
    }
}

/// Options for `api/sources/scm`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SourcesScmOption {
    /// File key.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<u32>,
    /// Group lines by SCM commit when `true`.
    #[serde(rename = "commits_by_line", skip_serializing_if = "Option::is_none")]
    pub commits_by_line: Option<bool>,
}

impl SourcesScmOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)
    }
}

/// Service for `api/sources`.
pub struct SourcesService<'a> {
    client: &'a SonarClient,
}

impl<'a> SourcesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Returns the raw content of a file as text.
    pub async fn raw(&self, key: &str) -> Result<String, ApiError> {
        require("key", key)?;
        self.client.get_text("sources/raw", &[("key", key)]).await
    }

    /// Returns (a range of) a file's source, HTML-escaped, line by line.
    pub async fn show(&self, opt: &SourcesShowOption) -> Result<SourcesShowResult, ApiError> {
        opt.validate()?;
        self.client.get("sources/show", opt).await
    }

    /// Returns SCM blame information for (a range of) a file.
    pub async fn scm(&self, opt: &SourcesScmOption) -> Result<SourcesScmResult, ApiError> {
        opt.validate()?;
        self.client.get("sources/scm", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_line_range() {
        let ok = SourcesShowOption {
            key: "demo:src/lib.rs".to_string(),
            from: Some(1),
            to: Some(10),
        };
        assert!(ok.validate().is_ok());

        let inverted = SourcesShowOption {
            key: "demo:src/lib.rs".to_string(),
            from: Some(20),
            to: Some(10),
        };
        assert!(inverted.validate().is_err());

        let zero = SourcesShowOption {
            key: "demo:src/lib.rs".to_string(),
            from: Some(0),
            to: None,
        };
        assert!(zero.validate().is_err());
    }
}
