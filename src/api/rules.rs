//
//  sonarqube-client
//  api/rules.rs
//

//! Coding rules (`api/rules`).
//!
//! Searching the rule repository plus management of custom rules (rules
//! instantiated from a template).

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_member, check_members, check_page_size, require, ApiError};
use super::issues::{ISSUE_TYPES, SEVERITIES};

/// Rule life cycle statuses.
pub const RULE_STATUSES: &[&str] = &["BETA", "DEPRECATED", "READY", "REMOVED"];

/// A rule parameter definition.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleParam {
    pub key: String,
    #[serde(rename = "htmlDesc", default)]
    pub html_desc: Option<String>,
    #[serde(rename = "defaultValue", default)]
    pub default_value: Option<String>,
    #[serde(rename = "type", default)]
    pub param_type: Option<String>,
}

/// A coding rule.
#[derive(Debug, Clone, Deserialize)]
pub struct Rule {
    /// Rule key, e.g. `squid:S1067`.
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub repo: Option<String>,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(rename = "type", default)]
    pub rule_type: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(rename = "langName", default)]
    pub lang_name: Option<String>,
    #[serde(rename = "htmlDesc", default)]
    pub html_desc: Option<String>,
    #[serde(rename = "mdDesc", default)]
    pub md_desc: Option<String>,
    #[serde(rename = "isTemplate", default)]
    pub is_template: Option<bool>,
    #[serde(rename = "templateKey", default)]
    pub template_key: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "sysTags", default)]
    pub sys_tags: Vec<String>,
    #[serde(default)]
    pub params: Vec<RuleParam>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
}

/// Response of `api/rules/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct RulesSearchResult {
    pub total: u64,
    pub p: u32,
    pub ps: u32,
    pub rules: Vec<Rule>,
}

/// Response of `api/rules/show`, `create` and `update`.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleResult {
    pub rule: Rule,
}

/// A rule repository.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleRepository {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub language: Option<String>,
}

/// Response of `api/rules/repositories`.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleRepositoriesResult {
    pub repositories: Vec<RuleRepository>,
}

/// Response of `api/rules/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct RuleTagsResult {
    pub tags: Vec<String>,
}

/// Options for `api/rules/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RulesSearchOption {
    /// Query on rule keys and names.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Comma-separated language keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
    /// Comma-separated repository keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repositories: Option<String>,
    /// Comma-separated severities, see [`SEVERITIES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severities: Option<String>,
    /// Comma-separated statuses, see [`RULE_STATUSES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<String>,
    /// Comma-separated types, see [`ISSUE_TYPES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
    /// Comma-separated tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Quality profile key; combined with `activation` to list (de)activated
    /// rules of that profile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qprofile: Option<String>,
    /// With `qprofile`: `true` lists activated rules, `false` the rest.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activation: Option<bool>,
    /// Only template rules (`true`) or only non-template rules (`false`).
    #[serde(rename = "is_template", skip_serializing_if = "Option::is_none")]
    pub is_template: Option<bool>,
    /// Key of the template the rules are instantiated from.
    #[serde(rename = "template_key", skip_serializing_if = "Option::is_none")]
    pub template_key: Option<String>,
    /// Only rules available since this version, `YYYY-MM-DD`.
    #[serde(rename = "available_since", skip_serializing_if = "Option::is_none")]
    pub available_since: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl RulesSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(severities) = &self.severities {
            check_members("severities", severities, SEVERITIES)?;
        }
        if let Some(statuses) = &self.statuses {
            check_members("statuses", statuses, RULE_STATUSES)?;
        }
        if let Some(types) = &self.types {
            check_members("types", types, ISSUE_TYPES)?;
        }
        if self.activation.is_some() && self.qprofile.is_none() {
            return Err(ApiError::validation(
                "activation",
                "requires `qprofile` to be set",
            ));
        }
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/rules/create` (custom rules only).
#[derive(Debug, Clone, Default, Serialize)]
pub struct RulesCreateOption {
    /// Key of the new rule, without the repository prefix.
    #[serde(rename = "custom_key")]
    pub custom_key: String,
    /// Key of the template to instantiate.
    #[serde(rename = "template_key")]
    pub template_key: String,
    pub name: String,
    #[serde(rename = "markdown_description")]
    pub markdown_description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub rule_type: Option<String>,
    /// Parameters as `key=value` pairs separated by `;`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    /// Reactivate an identical previously-removed rule instead of failing.
    #[serde(rename = "prevent_reactivation", skip_serializing_if = "Option::is_none")]
    pub prevent_reactivation: Option<bool>,
}

impl RulesCreateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("custom_key", &self.custom_key)?;
        require("template_key", &self.template_key)?;
        require("name", &self.name)?;
        require("markdown_description", &self.markdown_description)?;
        if let Some(severity) = &self.severity {
            check_member("severity", severity, SEVERITIES)?;
        }
        if let Some(status) = &self.status {
            check_member("status", status, RULE_STATUSES)?;
        }
        if let Some(rule_type) = &self.rule_type {
            check_member("type", rule_type, ISSUE_TYPES)?;
        }
        Ok(())
    }
}

/// Options for `api/rules/update`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RulesUpdateOption {
    /// Full rule key, e.g. `java:S1067`.
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "markdown_description", skip_serializing_if = "Option::is_none")]
    pub markdown_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<String>,
    /// Remediation function: `LINEAR`, `LINEAR_OFFSET` or `CONSTANT_ISSUE`.
    #[serde(rename = "remediation_fn_type", skip_serializing_if = "Option::is_none")]
    pub remediation_fn_type: Option<String>,
}

impl RulesUpdateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)?;
        if let Some(severity) = &self.severity {
            check_member("severity", severity, SEVERITIES)?;
        }
        Ok(())
    }
}

/// Service for `api/rules`.
pub struct RulesService<'a> {
    client: &'a SonarClient,
}

impl<'a> RulesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches rules.
    pub async fn search(&self, opt: &RulesSearchOption) -> Result<RulesSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("rules/search", opt).await
    }

    /// Returns one rule by key.
    pub async fn show(&self, key: &str) -> Result<RuleResult, ApiError> {
        require("key", key)?;
        self.client.get("rules/show", &[("key", key)]).await
    }

    /// Creates a custom rule from a template.
    pub async fn create(&self, opt: &RulesCreateOption) -> Result<RuleResult, ApiError> {
        opt.validate()?;
        self.client.post("rules/create", opt).await
    }

    /// Updates a rule.
    pub async fn update(&self, opt: &RulesUpdateOption) -> Result<RuleResult, ApiError> {
        opt.validate()?;
        self.client.post("rules/update", opt).await
    }

    /// Deletes a custom rule.
    pub async fn delete(&self, key: &str) -> Result<(), ApiError> {
        require("key", key)?;
        self.client.post_empty("rules/delete", &[("key", key)]).await
    }

    /// Lists rule repositories.
    pub async fn repositories(
        &self,
        language: Option<&str>,
        q: Option<&str>,
    ) -> Result<RuleRepositoriesResult, ApiError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(language) = language {
            query.push(("language", language));
        }
        if let Some(q) = q {
            query.push(("q", q));
        }
        self.client.get("rules/repositories", &query).await
    }

    /// Searches rule tags.
    pub async fn tags(&self, q: Option<&str>, ps: Option<u32>) -> Result<RuleTagsResult, ApiError> {
        check_page_size("ps", ps)?;
        let ps_string;
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(q) = q {
            query.push(("q", q));
        }
        if let Some(ps) = ps {
            ps_string = ps.to_string();
            query.push(("ps", &ps_string));
        }
        self.client.get("rules/tags", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_activation_requires_profile() {
        let dangling = RulesSearchOption {
            activation: Some(true),
            ..Default::default()
        };
        assert!(dangling.validate().is_err());

        let ok = RulesSearchOption {
            activation: Some(true),
            qprofile: Some("AU-prof".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_create_required_fields() {
        assert!(RulesCreateOption::default().validate().is_err());
        let ok = RulesCreateOption {
            custom_key: "no_bugs_on_friday".to_string(),
            template_key: "java:XPath".to_string(),
            name: "No bugs on Friday".to_string(),
            markdown_description: "Deployments happen on Friday.".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }
}
