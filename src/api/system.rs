//
//  sonarqube-client
//  api/system.rs
//

//! System administration and monitoring (`api/system`).
//!
//! `restart` and `migrate_db` are bound for completeness but are disruptive;
//! do not point them at a server other people are using.

use serde::Deserialize;

use super::client::SonarClient;
use super::common::{check_member, ApiError, NO_PARAMS};

/// Log levels accepted by `change_log_level`.
pub const LOG_LEVELS: &[&str] = &["TRACE", "DEBUG", "INFO"];

/// Server processes whose logs can be fetched.
pub const LOG_PROCESSES: &[&str] = &["app", "ce", "es", "web"];

/// One cause attached to a non-green health status.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthCause {
    pub message: String,
}

/// Response of `api/system/health`.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResult {
    /// `GREEN`, `YELLOW` or `RED`.
    pub health: String,
    #[serde(default)]
    pub causes: Vec<HealthCause>,
}

/// Response of `api/system/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusResult {
    pub id: String,
    pub version: String,
    /// `STARTING`, `UP`, `DOWN`, `RESTARTING`, `DB_MIGRATION_NEEDED`,
    /// `DB_MIGRATION_RUNNING`.
    pub status: String,
}

/// Response of `api/system/db_migration_status` and `api/system/migrate_db`.
#[derive(Debug, Clone, Deserialize)]
pub struct DbMigrationResult {
    /// `NO_MIGRATION`, `NOT_SUPPORTED`, `MIGRATION_RUNNING`,
    /// `MIGRATION_SUCCEEDED`, `MIGRATION_FAILED`, `MIGRATION_REQUIRED`.
    pub state: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(rename = "startedAt", default)]
    pub started_at: Option<String>,
}

/// An available server upgrade.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemUpgrade {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "releaseDate", default)]
    pub release_date: Option<String>,
    #[serde(rename = "changeLogUrl", default)]
    pub change_log_url: Option<String>,
    #[serde(rename = "downloadUrl", default)]
    pub download_url: Option<String>,
}

/// Response of `api/system/upgrades`.
#[derive(Debug, Clone, Deserialize)]
pub struct SystemUpgradesResult {
    pub upgrades: Vec<SystemUpgrade>,
    #[serde(rename = "updateCenterRefresh", default)]
    pub update_center_refresh: Option<String>,
}

/// Service for `api/system`.
pub struct SystemService<'a> {
    client: &'a SonarClient,
}

impl<'a> SystemService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Returns the health of the instance. Requires Administer System
    /// permission.
    pub async fn health(&self) -> Result<HealthResult, ApiError> {
        self.client.get("system/health", NO_PARAMS).await
    }

    /// Returns the running state of the instance. Unauthenticated.
    pub async fn status(&self) -> Result<StatusResult, ApiError> {
        self.client.get("system/status", NO_PARAMS).await
    }

    /// Liveness probe; answers the literal text `pong`.
    pub async fn ping(&self) -> Result<String, ApiError> {
        self.client.get_text("system/ping", NO_PARAMS).await
    }

    /// Returns detailed system information as uninterpreted JSON: the
    /// shape varies wildly across server versions and editions.
    pub async fn info(&self) -> Result<serde_json::Value, ApiError> {
        self.client.get("system/info", NO_PARAMS).await
    }

    /// Returns the logs of one server process as text, see
    /// [`LOG_PROCESSES`].
    pub async fn logs(&self, process: &str) -> Result<String, ApiError> {
        check_member("process", process, LOG_PROCESSES)?;
        self.client
            .get_text("system/logs", &[("process", process)])
            .await
    }

    /// Changes the server log level, see [`LOG_LEVELS`].
    pub async fn change_log_level(&self, level: &str) -> Result<(), ApiError> {
        check_member("level", level, LOG_LEVELS)?;
        self.client
            .post_empty("system/change_log_level", &[("level", level)])
            .await
    }

    /// Returns the state of a pending or past database migration.
    pub async fn db_migration_status(&self) -> Result<DbMigrationResult, ApiError> {
        self.client.get("system/db_migration_status", NO_PARAMS).await
    }

    /// Starts the database migration after a server upgrade.
    pub async fn migrate_db(&self) -> Result<DbMigrationResult, ApiError> {
        self.client.post("system/migrate_db", NO_PARAMS).await
    }

    /// Restarts the server.
    pub async fn restart(&self) -> Result<(), ApiError> {
        self.client.post_empty("system/restart", NO_PARAMS).await
    }

    /// Lists server upgrades compatible with the installed plugins.
    pub async fn upgrades(&self) -> Result<SystemUpgradesResult, ApiError> {
        self.client.get("system/upgrades", NO_PARAMS).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SonarClient;

    #[tokio::test]
    async fn test_log_level_is_checked_locally() {
        let client = SonarClient::new("http://127.0.0.1:1").unwrap();
        let err = client.system().change_log_level("WARN").await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "level", .. }));
    }

    #[tokio::test]
    async fn test_status_deserialization() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/system/status")
            .with_header("content-type", "application/json")
            .with_body(r#"{"id":"20150504120436","version":"9.9.1","status":"UP"}"#)
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        let status = client.system().status().await.unwrap();
        assert_eq!(status.status, "UP");
        assert_eq!(status.version, "9.9.1");
    }
}
