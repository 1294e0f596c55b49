//
//  sonarqube-client
//  api/user_groups.rs
//

//! Group administration (`api/user_groups`).
//!
//! All actions require Administer System permission. Groups are addressed by
//! either id or name; the two are mutually exclusive.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{
    check_member, check_one_of, check_page_size, require, ApiError, Paging,
};

const SELECTION_FILTERS: &[&str] = &["all", "selected", "deselected"];

/// A user group.
#[derive(Debug, Clone, Deserialize)]
pub struct Group {
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "membersCount", default)]
    pub members_count: Option<u32>,
    /// `true` for the group new users join automatically.
    #[serde(default)]
    pub default: Option<bool>,
}

/// Response of `api/user_groups/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupsSearchResult {
    pub paging: Paging,
    pub groups: Vec<Group>,
}

/// Response of `api/user_groups/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedGroup {
    pub group: Group,
}

/// A member (or candidate member) of a group.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupUser {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub selected: bool,
}

/// Response of `api/user_groups/users`.
#[derive(Debug, Clone, Deserialize)]
pub struct GroupUsersResult {
    pub users: Vec<GroupUser>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub p: u32,
    #[serde(default)]
    pub ps: u32,
}

/// Options for `api/user_groups/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupsSearchOption {
    /// Query on group names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl GroupsSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/user_groups/create`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupsCreateOption {
    /// Group name, at most 255 characters. `anyone` is reserved.
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GroupsCreateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        if self.name.len() > 255 {
            return Err(ApiError::validation("name", "must not exceed 255 characters"));
        }
        if self.name.eq_ignore_ascii_case("anyone") {
            return Err(ApiError::validation("name", "`anyone` is reserved"));
        }
        Ok(())
    }
}

/// Options for `api/user_groups/update`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupsUpdateOption {
    /// Group id.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GroupsUpdateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("id", &self.id)
    }
}

/// Group selector used by `delete`, `add_user`, `remove_user` and `users`:
/// exactly one of `id` / `name`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl GroupRef {
    /// Selects a group by name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
        }
    }

    /// Selects a group by id.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: None,
        }
    }

    fn validate(&self) -> Result<(), ApiError> {
        check_one_of("id", self.id.as_deref(), "name", self.name.as_deref())
    }

    fn as_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.id {
            pairs.push(("id", id.as_str()));
        }
        if let Some(name) = &self.name {
            pairs.push(("name", name.as_str()));
        }
        pairs
    }
}

/// Options for `api/user_groups/users`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupUsersOption {
    #[serde(flatten)]
    pub group: GroupRef,
    /// Query on logins and names.
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

impl GroupUsersOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        self.group.validate()?;
        if let Some(selected) = &self.selected {
            check_member("selected", selected, SELECTION_FILTERS)?;
        }
        check_page_size("ps", self.ps)
    }
}

/// Service for `api/user_groups`.
pub struct UserGroupsService<'a> {
    client: &'a SonarClient,
}

impl<'a> UserGroupsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches groups.
    pub async fn search(&self, opt: &GroupsSearchOption) -> Result<GroupsSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("user_groups/search", opt).await
    }

    /// Creates a group.
    pub async fn create(&self, opt: &GroupsCreateOption) -> Result<CreatedGroup, ApiError> {
        opt.validate()?;
        self.client.post("user_groups/create", opt).await
    }

    /// Updates a group's name or description.
    pub async fn update(&self, opt: &GroupsUpdateOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("user_groups/update", opt).await
    }

    /// Deletes a group, including all its permissions.
    pub async fn delete(&self, group: &GroupRef) -> Result<(), ApiError> {
        group.validate()?;
        self.client
            .post_empty("user_groups/delete", &group.as_pairs())
            .await
    }

    /// Adds a user to a group.
    pub async fn add_user(&self, group: &GroupRef, login: &str) -> Result<(), ApiError> {
        group.validate()?;
        require("login", login)?;
        let mut form = group.as_pairs();
        form.push(("login", login));
        self.client.post_empty("user_groups/add_user", &form).await
    }

    /// Removes a user from a group.
    pub async fn remove_user(&self, group: &GroupRef, login: &str) -> Result<(), ApiError> {
        group.validate()?;
        require("login", login)?;
        let mut form = group.as_pairs();
        form.push(("login", login));
        self.client
            .post_empty("user_groups/remove_user", &form)
            .await
    }

    /// Lists members (and with `selected=all`, candidates) of a group.
    pub async fn users(&self, opt: &GroupUsersOption) -> Result<GroupUsersResult, ApiError> {
        opt.validate()?;
        self.client.get("user_groups/users", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_name_rules() {
        assert!(GroupsCreateOption {
            name: "sonar-devs".to_string(),
            description: None,
        }
        .validate()
        .is_ok());
        assert!(GroupsCreateOption {
            name: "Anyone".to_string(),
            description: None,
        }
        .validate()
        .is_err());
        assert!(GroupsCreateOption {
            name: "g".repeat(256),
            description: None,
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_group_ref_is_exclusive() {
        assert!(GroupRef::by_name("sonar-devs").validate().is_ok());
        assert!(GroupRef::by_id("42").validate().is_ok());
        assert!(GroupRef::default().validate().is_err());
        assert!(GroupRef {
            id: Some("42".to_string()),
            name: Some("sonar-devs".to_string()),
        }
        .validate()
        .is_err());
    }
}
