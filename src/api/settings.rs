//
//  sonarqube-client
//  api/settings.rs
//

//! Global and component settings (`api/settings`).

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{require, ApiError};

/// A setting value as returned by `api/settings/values`.
#[derive(Debug, Clone, Deserialize)]
pub struct Setting {
    pub key: String,
    #[serde(default)]
    pub value: Option<String>,
    /// For multi-value settings.
    #[serde(default)]
    pub values: Vec<String>,
    /// For property-set settings.
    #[serde(rename = "fieldValues", default)]
    pub field_values: Vec<serde_json::Value>,
    /// `true` when the value comes from a parent scope.
    #[serde(default)]
    pub inherited: Option<bool>,
}

/// Response of `api/settings/values`.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsValuesResult {
    pub settings: Vec<Setting>,
}

/// A setting definition.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingDefinition {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "type", default)]
    pub setting_type: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(rename = "subCategory", default)]
    pub sub_category: Option<String>,
    #[serde(rename = "defaultValue", default)]
    pub default_value: Option<String>,
    #[serde(rename = "multiValues", default)]
    pub multi_values: Option<bool>,
    #[serde(default)]
    pub options: Vec<String>,
}

/// Response of `api/settings/list_definitions`.
#[derive(Debug, Clone, Deserialize)]
pub struct SettingsDefinitionsResult {
    pub definitions: Vec<SettingDefinition>,
}

/// Options for `api/settings/values`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsValuesOption {
    /// Comma-separated setting keys; all settings when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keys: Option<String>,
    /// Component key for component-scoped values.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

/// Options for `api/settings/set`.
///
/// Exactly one of `value` / `field_values` must be supplied.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsSetOption {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// JSON-encoded field values for property-set settings.
    #[serde(rename = "fieldValues", skip_serializing_if = "Option::is_none")]
    pub field_values: Option<String>,
    /// Component key to scope the setting to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl SettingsSetOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("key", &self.key)?;
        super::common::check_one_of(
            "value",
            self.value.as_deref(),
            "fieldValues",
            self.field_values.as_deref(),
        )
    }
}

/// Options for `api/settings/reset`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsResetOption {
    /// Comma-separated setting keys to reset to their defaults.
    pub keys: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<String>,
}

impl SettingsResetOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("keys", &self.keys)
    }
}

/// Service for `api/settings`.
pub struct SettingsService<'a> {
    client: &'a SonarClient,
}

impl<'a> SettingsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Returns setting values, global or for one component.
    pub async fn values(
        &self,
        opt: &SettingsValuesOption,
    ) -> Result<SettingsValuesResult, ApiError> {
        self.client.get("settings/values", opt).await
    }

    /// Sets a setting value.
    pub async fn set(&self, opt: &SettingsSetOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("settings/set", opt).await
    }

    /// Resets settings to their defaults.
    pub async fn reset(&self, opt: &SettingsResetOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("settings/reset", opt).await
    }

    /// Lists setting definitions, global or for one component qualifier.
    pub async fn list_definitions(
        &self,
        component: Option<&str>,
    ) -> Result<SettingsDefinitionsResult, ApiError> {
        let query: Vec<(&str, &str)> = match component {
            Some(component) => vec![("component", component)],
            None => vec![],
        };
        self.client.get("settings/list_definitions", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_requires_exactly_one_value_kind() {
        assert!(SettingsSetOption {
            key: "sonar.links.scm".to_string(),
            ..Default::default()
        }
        .validate()
        .is_err());

        assert!(SettingsSetOption {
            key: "sonar.links.scm".to_string(),
            value: Some("https://git.example.com".to_string()),
            ..Default::default()
        }
        .validate()
        .is_ok());

        assert!(SettingsSetOption {
            key: "sonar.issue.ignore.multicriteria".to_string(),
            value: Some("x".to_string()),
            field_values: Some("{}".to_string()),
            ..Default::default()
        }
        .validate()
        .is_err());
    }
}
