//
//  sonarqube-client
//  api/plugins.rs
//

//! Plugin management (`api/plugins`).
//!
//! Installs, uninstalls and updates take effect only after a server
//! restart; `pending` shows what is queued until then.

use serde::Deserialize;

use super::client::SonarClient;
use super::common::{require, ApiError, NO_PARAMS};

/// Release metadata attached to an available or updatable plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginRelease {
    pub version: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "changeLogUrl", default)]
    pub change_log_url: Option<String>,
}

/// An update proposed by the update center.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginUpdate {
    pub release: PluginRelease,
    /// `COMPATIBLE`, `INCOMPATIBLE`, `REQUIRES_SYSTEM_UPGRADE` or
    /// `DEPS_REQUIRE_SYSTEM_UPGRADE`.
    pub status: String,
    #[serde(default)]
    pub requires: Vec<serde_json::Value>,
}

/// An installed plugin.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledPlugin {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(rename = "organizationName", default)]
    pub organization_name: Option<String>,
    #[serde(rename = "organizationUrl", default)]
    pub organization_url: Option<String>,
    #[serde(rename = "homepageUrl", default)]
    pub homepage_url: Option<String>,
    #[serde(rename = "issueTrackerUrl", default)]
    pub issue_tracker_url: Option<String>,
    #[serde(rename = "implementationBuild", default)]
    pub implementation_build: Option<String>,
    #[serde(default)]
    pub filename: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<i64>,
}

/// A plugin listed by the update center as installable.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailablePlugin {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(rename = "termsAndConditionsUrl", default)]
    pub terms_and_conditions_url: Option<String>,
    #[serde(default)]
    pub release: Option<PluginRelease>,
    #[serde(default)]
    pub update: Option<PluginUpdate>,
}

/// Response of `api/plugins/available`.
#[derive(Debug, Clone, Deserialize)]
pub struct AvailablePluginsResult {
    pub plugins: Vec<AvailablePlugin>,
    #[serde(rename = "updateCenterRefresh", default)]
    pub update_center_refresh: Option<String>,
}

/// Response of `api/plugins/installed`.
#[derive(Debug, Clone, Deserialize)]
pub struct InstalledPluginsResult {
    pub plugins: Vec<InstalledPlugin>,
}

/// Response of `api/plugins/pending`.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingPluginsResult {
    #[serde(default)]
    pub installing: Vec<InstalledPlugin>,
    #[serde(default)]
    pub updating: Vec<InstalledPlugin>,
    #[serde(default)]
    pub removing: Vec<InstalledPlugin>,
}

/// A plugin with available updates.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdatablePlugin {
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub license: Option<String>,
    #[serde(default)]
    pub updates: Vec<PluginUpdate>,
}

/// Response of `api/plugins/updates`.
#[derive(Debug, Clone, Deserialize)]
pub struct PluginUpdatesResult {
    pub plugins: Vec<UpdatablePlugin>,
    #[serde(rename = "updateCenterRefresh", default)]
    pub update_center_refresh: Option<String>,
}

/// Service for `api/plugins`. All actions require Administer System
/// permission.
pub struct PluginsService<'a> {
    client: &'a SonarClient,
}

impl<'a> PluginsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Lists plugins available for installation.
    pub async fn available(&self) -> Result<AvailablePluginsResult, ApiError> {
        self.client.get("plugins/available", NO_PARAMS).await
    }

    /// Lists installed plugins.
    pub async fn installed(&self) -> Result<InstalledPluginsResult, ApiError> {
        self.client.get("plugins/installed", NO_PARAMS).await
    }

    /// Lists operations queued for the next restart.
    pub async fn pending(&self) -> Result<PendingPluginsResult, ApiError> {
        self.client.get("plugins/pending", NO_PARAMS).await
    }

    /// Lists installed plugins with available updates.
    pub async fn updates(&self) -> Result<PluginUpdatesResult, ApiError> {
        self.client.get("plugins/updates", NO_PARAMS).await
    }

    /// Queues installation of the latest compatible version of a plugin.
    pub async fn install(&self, key: &str) -> Result<(), ApiError> {
        require("key", key)?;
        self.client
            .post_empty("plugins/install", &[("key", key)])
            .await
    }

    /// Queues the update of a plugin to the latest compatible version.
    pub async fn update(&self, key: &str) -> Result<(), ApiError> {
        require("key", key)?;
        self.client
            .post_empty("plugins/update", &[("key", key)])
            .await
    }

    /// Queues uninstallation of a plugin.
    pub async fn uninstall(&self, key: &str) -> Result<(), ApiError> {
        require("key", key)?;
        self.client
            .post_empty("plugins/uninstall", &[("key", key)])
            .await
    }

    /// Cancels all queued plugin operations.
    pub async fn cancel_all(&self) -> Result<(), ApiError> {
        self.client.post_empty("plugins/cancel_all", NO_PARAMS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SonarClient;

    #[tokio::test]
    async fn test_installed_deserialization() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/plugins/installed")
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"plugins":[{"key":"java","name":"SonarJava","version":"7.16"}]}"#,
            )
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        let installed = client.plugins().installed().await.unwrap();
        assert_eq!(installed.plugins.len(), 1);
        assert_eq!(installed.plugins[0].key, "java");
        assert_eq!(installed.plugins[0].version.as_deref(), Some("7.16"));
    }

    #[tokio::test]
    async fn test_install_requires_key() {
        let client = SonarClient::new("http://127.0.0.1:1").unwrap();
        let err = client.plugins().install("  ").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "key", .. }));
    }
}
