//
//  sonarqube-client
//  api/qualityprofiles.rs
//

//! Quality profiles (`api/qualityprofiles`).
//!
//! A profile is a per-language set of activated rules. Profiles inherit
//! from a parent, can be copied, and can be exported to and restored from
//! an XML backup. Actions address profiles by key.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_date, check_member, check_page_size, require, ApiError, Paging};
use super::issues::SEVERITIES;

/// A quality profile.
#[derive(Debug, Clone, Deserialize)]
pub struct QualityProfile {
    pub key: String,
    pub name: String,
    pub language: String,
    #[serde(rename = "languageName", default)]
    pub language_name: Option<String>,
    #[serde(rename = "isInherited", default)]
    pub is_inherited: bool,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
    #[serde(rename = "isBuiltIn", default)]
    pub is_built_in: bool,
    #[serde(rename = "activeRuleCount", default)]
    pub active_rule_count: u32,
    #[serde(rename = "activeDeprecatedRuleCount", default)]
    pub active_deprecated_rule_count: u32,
    #[serde(rename = "parentKey", default)]
    pub parent_key: Option<String>,
    #[serde(rename = "parentName", default)]
    pub parent_name: Option<String>,
    #[serde(rename = "rulesUpdatedAt", default)]
    pub rules_updated_at: Option<String>,
    #[serde(rename = "lastUsed", default)]
    pub last_used: Option<String>,
}

/// Response of `api/qualityprofiles/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfilesSearchResult {
    pub profiles: Vec<QualityProfile>,
}

/// Response of `api/qualityprofiles/create` and `copy`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResult {
    pub profile: QualityProfile,
}

/// A node of the inheritance tree.
#[derive(Debug, Clone, Deserialize)]
pub struct InheritanceProfile {
    pub key: String,
    pub name: String,
    #[serde(rename = "parent", default)]
    pub parent: Option<String>,
    #[serde(rename = "activeRuleCount", default)]
    pub active_rule_count: u32,
    #[serde(rename = "overridingRuleCount", default)]
    pub overriding_rule_count: Option<u32>,
    #[serde(rename = "isBuiltIn", default)]
    pub is_built_in: bool,
}

/// Response of `api/qualityprofiles/inheritance`.
#[derive(Debug, Clone, Deserialize)]
pub struct InheritanceResult {
    pub profile: InheritanceProfile,
    #[serde(default)]
    pub ancestors: Vec<InheritanceProfile>,
    #[serde(default)]
    pub children: Vec<InheritanceProfile>,
}

/// A project associated (or associable) with a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileProject {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub selected: bool,
}

/// Response of `api/qualityprofiles/projects`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileProjectsResult {
    pub results: Vec<ProfileProject>,
    pub paging: Paging,
}

/// One changelog entry of a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangelogEvent {
    pub date: String,
    /// `ACTIVATED`, `DEACTIVATED` or `UPDATED`.
    pub action: String,
    #[serde(rename = "ruleKey", default)]
    pub rule_key: Option<String>,
    #[serde(rename = "ruleName", default)]
    pub rule_name: Option<String>,
    #[serde(rename = "authorLogin", default)]
    pub author_login: Option<String>,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// Response of `api/qualityprofiles/changelog`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangelogResult {
    pub events: Vec<ChangelogEvent>,
    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Options for `api/qualityprofiles/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfilesSearchOption {
    /// Restrict to one language.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Restrict to profiles of the given name.
    #[serde(rename = "qualityProfile", skip_serializing_if = "Option::is_none")]
    pub quality_profile: Option<String>,
    /// Restrict to profiles used by this project.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Return only default profiles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defaults: Option<bool>,
}

/// Options for `api/qualityprofiles/activate_rule`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivateRuleOption {
    /// Profile key.
    pub key: String,
    /// Rule key, e.g. `java:S1144`.
    pub rule: String,
    /// Override of the rule's default severity.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    /// Parameter overrides as `key1=v1;key2=v2`. Ignored when `reset` is
    /// set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    /// Reset severity and parameters to the parent's or the rule's
    /// defaults.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset: Option<bool>,
}

impl ActivateRuleOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)?;
        require("rule", &self.rule)?;
        if let Some(severity) = &self.severity {
            check_member("severity", severity, SEVERITIES)?;
        }
        Ok(())
    }
}

/// Options for `api/qualityprofiles/projects`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileProjectsOption {
    /// Profile key.
    pub key: String,
    /// Query on project names and keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Association filter: `all`, `selected` (default), `deselected`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl ProfileProjectsOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)?;
        if let Some(selected) = &self.selected {
            check_member("selected", selected, &["all", "selected", "deselected"])?;
        }
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/qualityprofiles/changelog`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChangelogOption {
    /// Profile key.
    pub key: String,
    /// Include only events at or after this datetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<String>,
    /// Include only events at or before this datetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl ChangelogOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)?;
        if let Some(date) = &self.since {
            check_date("since", date)?;
        }
        if let Some(date) = &self.to {
            check_date("to", date)?;
        }
        check_page_size("ps", self.ps)
    }
}

/// Service for `api/qualityprofiles`. Write actions require Administer
/// Quality Profiles permission.
pub struct QualityProfilesService<'a> {
    client: &'a SonarClient,
}

impl<'a> QualityProfilesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches profiles.
    pub async fn search(
        &self,
        opt: &ProfilesSearchOption,
    ) -> Result<ProfilesSearchResult, ApiError> {
        self.client.get("qualityprofiles/search", opt).await
    }

    /// Creates an empty profile for one language.
    pub async fn create(&self, language: &str, name: &str) -> Result<ProfileResult, ApiError> {
        require("language", language)?;
        require("name", name)?;
        self.client
            .post(
                "qualityprofiles/create",
                &[("language", language), ("name", name)],
            )
            .await
    }

    /// Copies a profile, activated rules included.
    pub async fn copy(&self, from_key: &str, to_name: &str) -> Result<QualityProfile, ApiError> {
        require("fromKey", from_key)?;
        require("toName", to_name)?;
        self.client
            .post(
                "qualityprofiles/copy",
                &[("fromKey", from_key), ("toName", to_name)],
            )
            .await
    }

    /// Renames a profile.
    pub async fn rename(&self, key: &str, name: &str) -> Result<(), ApiError> {
        require("key", key)?;
        require("name", name)?;
        self.client
            .post_empty("qualityprofiles/rename", &[("key", key), ("name", name)])
            .await
    }

    /// Deletes a profile. Fails server-side when the profile is default
    /// or has descendants.
    pub async fn delete(&self, key: &str) -> Result<(), ApiError> {
        require("key", key)?;
        self.client
            .post_empty("qualityprofiles/delete", &[("key", key)])
            .await
    }

    /// Makes a profile the default for its language.
    pub async fn set_default(&self, key: &str) -> Result<(), ApiError> {
        require("key", key)?;
        self.client
            .post_empty("qualityprofiles/set_default", &[("key", key)])
            .await
    }

    /// Changes the parent of a profile. An empty parent key detaches it.
    pub async fn change_parent(&self, key: &str, parent_key: &str) -> Result<(), ApiError> {
        require("key", key)?;
        self.client
            .post_empty(
                "qualityprofiles/change_parent",
                &[("key", key), ("parentKey", parent_key)],
            )
            .await
    }

    /// Returns the ancestors and children of a profile.
    pub async fn inheritance(&self, key: &str) -> Result<InheritanceResult, ApiError> {
        require("key", key)?;
        self.client
            .get("qualityprofiles/inheritance", &[("key", key)])
            .await
    }

    /// Lists projects associated with a profile.
    pub async fn projects(
        &self,
        opt: &ProfileProjectsOption,
    ) -> Result<ProfileProjectsResult, ApiError> {
        opt.validate()?;
        self.client.get("qualityprofiles/projects", opt).await
    }

    /// Associates a project with a profile.
    pub async fn add_project(&self, key: &str, project: &str) -> Result<(), ApiError> {
        require("key", key)?;
        require("project", project)?;
        self.client
            .post_empty(
                "qualityprofiles/add_project",
                &[("key", key), ("project", project)],
            )
            .await
    }

    /// Detaches a project from a profile; the language default applies
    /// again.
    pub async fn remove_project(&self, key: &str, project: &str) -> Result<(), ApiError> {
        require("key", key)?;
        require("project", project)?;
        self.client
            .post_empty(
                "qualityprofiles/remove_project",
                &[("key", key), ("project", project)],
            )
            .await
    }

    /// Activates a rule on a profile.
    pub async fn activate_rule(&self, opt: &ActivateRuleOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client
            .post_empty("qualityprofiles/activate_rule", opt)
            .await
    }

    /// Deactivates a rule on a profile.
    pub async fn deactivate_rule(&self, key: &str, rule: &str) -> Result<(), ApiError> {
        require("key", key)?;
        require("rule", rule)?;
        self.client
            .post_empty(
                "qualityprofiles/deactivate_rule",
                &[("key", key), ("rule", rule)],
            )
            .await
    }

    /// Exports a profile as an XML backup.
    pub async fn backup(&self, key: &str) -> Result<String, ApiError> {
        require("key", key)?;
        self.client
            .get_text("qualityprofiles/backup", &[("key", key)])
            .await
    }

    /// Restores a profile from an XML backup, creating or updating it.
    pub async fn restore(&self, backup: &str) -> Result<(), ApiError> {
        require("backup", backup)?;
        self.client
            .post_empty("qualityprofiles/restore", &[("backup", backup)])
            .await
    }

    /// Returns the rule activation history of a profile.
    pub async fn changelog(&self, opt: &ChangelogOption) -> Result<ChangelogResult, ApiError> {
        opt.validate()?;
        self.client.get("qualityprofiles/changelog", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SonarClient;

    #[test]
    fn test_activate_rule_severity_is_checked() {
        let bad = ActivateRuleOption {
            key: "AU-TpxcA-iU5OvuD2FL1".to_string(),
            rule: "java:S1144".to_string(),
            severity: Some("SEVERE".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let ok = ActivateRuleOption {
            key: "AU-TpxcA-iU5OvuD2FL1".to_string(),
            rule: "java:S1144".to_string(),
            severity: Some("CRITICAL".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[tokio::test]
    async fn test_search_deserialization() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/qualityprofiles/search")
            .match_query(mockito::Matcher::UrlEncoded("language".into(), "java".into()))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"profiles":[{"key":"AU-TpxcA-iU5OvuD2FL1","name":"Sonar way",
                    "language":"java","languageName":"Java","isDefault":true,
                    "isBuiltIn":true,"activeRuleCount":450}]}"#,
            )
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        let opt = ProfilesSearchOption {
            language: Some("java".to_string()),
            ..Default::default()
        };
        let result = client.quality_profiles().search(&opt).await.unwrap();
        assert_eq!(result.profiles.len(), 1);
        assert!(result.profiles[0].is_built_in);
    }
}
