//
//  sonarqube-client
//  api/languages.rs
//

//! Supported languages (`api/languages`).

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::ApiError;

/// A language supported by the installed analyzers.
#[derive(Debug, Clone, Deserialize)]
pub struct Language {
    /// Language key, e.g. `java`, `rust`.
    pub key: String,
    pub name: String,
}

/// Response of `api/languages/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguagesListResult {
    pub languages: Vec<Language>,
}

/// Options for `api/languages/list`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct LanguagesListOption {
    /// Pattern to match language keys/names against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Page size. `0` (the server default here) returns all languages.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

/// Service for `api/languages`.
pub struct LanguagesService<'a> {
    client: &'a SonarClient,
}

impl<'a> LanguagesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Lists supported languages.
    pub async fn list(&self, opt: &LanguagesListOption) -> Result<LanguagesListResult, ApiError> {
        self.client.get("languages/list", opt).await
    }
}
