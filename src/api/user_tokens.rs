//
//  sonarqube-client
//  api/user_tokens.rs
//

//! User token administration (`api/user_tokens`).
//!
//! Generating a token for another login requires Administer System
//! permission; managing one's own tokens does not.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{require, ApiError};

/// A token as listed by `api/user_tokens/search` (the token value itself is
/// only ever returned at generation time).
#[derive(Debug, Clone, Deserialize)]
pub struct UserToken {
    pub name: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "lastConnectionDate", default)]
    pub last_connection_date: Option<String>,
}

/// Response of `api/user_tokens/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserTokensSearchResult {
    pub login: String,
    #[serde(rename = "userTokens")]
    pub user_tokens: Vec<UserToken>,
}

/// Response of `api/user_tokens/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedToken {
    pub login: String,
    pub name: String,
    /// The secret token value. Shown once; store it, it cannot be
    /// retrieved again.
    pub token: String,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

/// Options for `api/user_tokens/generate`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserTokensGenerateOption {
    /// Token name, unique per user. At most 100 characters.
    pub name: String,
    /// Login to generate for; defaults to the authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl UserTokensGenerateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        if self.name.len() > 100 {
            return Err(ApiError::validation(
                "name",
                "must not exceed 100 characters",
            ));
        }
        Ok(())
    }
}

/// Options for `api/user_tokens/revoke`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserTokensRevokeOption {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl UserTokensRevokeOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)
    }
}

/// Service for `api/user_tokens`.
pub struct UserTokensService<'a> {
    client: &'a SonarClient,
}

impl<'a> UserTokensService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Generates a token.
    pub async fn generate(
        &self,
        opt: &UserTokensGenerateOption,
    ) -> Result<GeneratedToken, ApiError> {
        opt.validate()?;
        self.client.post("user_tokens/generate", opt).await
    }

    /// Revokes a token. Idempotent: revoking an unknown name succeeds.
    pub async fn revoke(&self, opt: &UserTokensRevokeOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("user_tokens/revoke", opt).await
    }

    /// Lists the tokens of a user (defaults to the authenticated one).
    pub async fn search(&self, login: Option<&str>) -> Result<UserTokensSearchResult, ApiError> {
        let query: Vec<(&str, &str)> = match login {
            Some(login) => vec![("login", login)],
            None => vec![],
        };
        self.client.get("user_tokens/search", &query).await
    }
}
