//
//  sonarqube-client
//  api/duplications.rs
//

//! Duplicated-code blocks (`api/duplications`).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{require, ApiError};

/// One block of a duplication group.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicationBlock {
    /// First duplicated line in the file.
    pub from: u32,
    /// Number of duplicated lines.
    pub size: u32,
    /// Reference into the `files` map of the response.
    #[serde(rename = "_ref", default)]
    pub file_ref: Option<String>,
}

/// A group of blocks duplicating each other.
#[derive(Debug, Clone, Deserialize)]
pub struct Duplication {
    pub blocks: Vec<DuplicationBlock>,
}

/// A file referenced from a duplication block.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicationFile {
    pub key: String,
    pub name: String,
    #[serde(rename = "projectName", default)]
    pub project_name: Option<String>,
}

/// Response of `api/duplications/show`.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplicationsShowResult {
    pub duplications: Vec<Duplication>,
    /// Files keyed by the `_ref` values used in the blocks.
    #[serde(default)]
    pub files: HashMap<String, DuplicationFile>,
}

/// Options for `api/duplications/show`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DuplicationsShowOption {
    /// File key, e.g. `my_project:src/foo/Bar.php`.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl DuplicationsShowOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)
    }
}

/// Service for `api/duplications`.
pub struct DuplicationsService<'a> {
    client: &'a SonarClient,
}

impl<'a> DuplicationsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Shows duplications of a file. Requires Browse permission on the
    /// file's project.
    pub async fn show(
        &self,
        opt: &DuplicationsShowOption,
    ) -> Result<DuplicationsShowResult, ApiError> {
        opt.validate()?;
        self.client.get("duplications/show", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_required() {
        assert!(DuplicationsShowOption::default().validate().is_err());
        assert!(DuplicationsShowOption {
            key: "demo:src/lib.rs".to_string(),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }
}
