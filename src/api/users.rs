//
//  sonarqube-client
//  api/users.rs
//

//! User administration (`api/users`).
//!
//! Creating, updating, and deactivating users requires Administer System
//! permission; `search` only needs authentication.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_member, check_page_size, require, ApiError, Paging};

const SELECTION_FILTERS: &[&str] = &["all", "selected", "deselected"];

/// A user account.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub active: Option<bool>,
    /// `true` for accounts managed by the server itself (vs external
    /// identity providers).
    #[serde(default)]
    pub local: Option<bool>,
    #[serde(rename = "externalIdentity", default)]
    pub external_identity: Option<String>,
    #[serde(rename = "externalProvider", default)]
    pub external_provider: Option<String>,
    #[serde(default)]
    pub groups: Vec<String>,
    #[serde(rename = "scmAccounts", default)]
    pub scm_accounts: Vec<String>,
    #[serde(rename = "tokensCount", default)]
    pub tokens_count: Option<u32>,
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Response of `api/users/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct UsersSearchResult {
    pub paging: Paging,
    pub users: Vec<User>,
}

/// Response of `api/users/create` and `api/users/update`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserResult {
    pub user: User,
}

/// A group a user belongs (or can belong) to.
#[derive(Debug, Clone, Deserialize)]
pub struct UserGroupMembership {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub selected: bool,
    /// `true` for the server's default group (`sonar-users`).
    #[serde(default)]
    pub default: bool,
}

/// Response of `api/users/groups`.
#[derive(Debug, Clone, Deserialize)]
pub struct UserGroupsResult {
    pub paging: Paging,
    pub groups: Vec<UserGroupMembership>,
}

/// Options for `api/users/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsersSearchOption {
    /// Query on logins, names and emails.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl UsersSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/users/create`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsersCreateOption {
    /// Login, at least 2 characters.
    pub login: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Required for local accounts, forbidden for non-local ones.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Comma-separated SCM accounts.
    #[serde(rename = "scmAccount", skip_serializing_if = "Option::is_none")]
    pub scm_account: Option<String>,
    /// Defaults to `true`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local: Option<bool>,
}

impl UsersCreateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("login", &self.login)?;
        if self.login.len() < 2 {
            return Err(ApiError::validation("login", "must be at least 2 characters"));
        }
        require("name", &self.name)?;
        let local = self.local.unwrap_or(true);
        if local && self.password.is_none() {
            return Err(ApiError::validation(
                "password",
                "is required for local accounts",
            ));
        }
        if !local && self.password.is_some() {
            return Err(ApiError::validation(
                "password",
                "must not be set for non-local accounts",
            ));
        }
        Ok(())
    }
}

/// Options for `api/users/update`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsersUpdateOption {
    pub login: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "scmAccount", skip_serializing_if = "Option::is_none")]
    pub scm_account: Option<String>,
}

impl UsersUpdateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("login", &self.login)
    }
}

/// Options for `api/users/groups`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UsersGroupsOption {
    pub login: String,
    /// Query on group names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Membership filter: `all`, `selected` (default), `deselected`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl UsersGroupsOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("login", &self.login)?;
        if let Some(selected) = &self.selected {
            check_member("selected", selected, SELECTION_FILTERS)?;
        }
        check_page_size("ps", self.ps)
    }
}

/// Service for `api/users`.
pub struct UsersService<'a> {
    client: &'a SonarClient,
}

impl<'a> UsersService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches users.
    pub async fn search(&self, opt: &UsersSearchOption) -> Result<UsersSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("users/search", opt).await
    }

    /// Creates a user. Reactivates the account if a deactivated one with
    /// the same login exists.
    pub async fn create(&self, opt: &UsersCreateOption) -> Result<UserResult, ApiError> {
        opt.validate()?;
        self.client.post("users/create", opt).await
    }

    /// Updates a user.
    pub async fn update(&self, opt: &UsersUpdateOption) -> Result<UserResult, ApiError> {
        opt.validate()?;
        self.client.post("users/update", opt).await
    }

    /// Deactivates a user. The account is kept for history but can no
    /// longer log in.
    pub async fn deactivate(&self, login: &str) -> Result<UserResult, ApiError> {
        require("login", login)?;
        self.client
            .post("users/deactivate", &[("login", login)])
            .await
    }

    /// Lists the groups a user belongs to.
    pub async fn groups(&self, opt: &UsersGroupsOption) -> Result<UserGroupsResult, ApiError> {
        opt.validate()?;
        self.client.get("users/groups", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_password_rules() {
        let local_without_password = UsersCreateOption {
            login: "jdoe".to_string(),
            name: "John Doe".to_string(),
            ..Default::default()
        };
        assert!(local_without_password.validate().is_err());

        let local_ok = UsersCreateOption {
            login: "jdoe".to_string(),
            name: "John Doe".to_string(),
            password: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(local_ok.validate().is_ok());

        let external_with_password = UsersCreateOption {
            login: "jdoe".to_string(),
            name: "John Doe".to_string(),
            password: Some("secret".to_string()),
            local: Some(false),
            ..Default::default()
        };
        assert!(external_with_password.validate().is_err());

        let short_login = UsersCreateOption {
            login: "j".to_string(),
            name: "John Doe".to_string(),
            password: Some("secret".to_string()),
            ..Default::default()
        };
        assert!(short_login.validate().is_err());
    }
}
