//
//  sonarqube-client
//  api/notifications.rs
//

//! Notification subscriptions (`api/notifications`).
//!
//! Subscriptions are either global or scoped to one project, and are
//! delivered over a channel (only `EmailNotificationChannel` ships with the
//! server).

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{require, ApiError};

/// A notification subscription.
#[derive(Debug, Clone, Deserialize)]
pub struct Notification {
    pub channel: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    #[serde(default)]
    pub organization: Option<String>,
    /// Present for project-scoped subscriptions only.
    #[serde(default)]
    pub project: Option<String>,
    #[serde(rename = "projectName", default)]
    pub project_name: Option<String>,
}

/// Response of `api/notifications/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct NotificationsListResult {
    pub notifications: Vec<Notification>,
    #[serde(default)]
    pub channels: Vec<String>,
    #[serde(rename = "globalTypes", default)]
    pub global_types: Vec<String>,
    #[serde(rename = "perProjectTypes", default)]
    pub per_project_types: Vec<String>,
}

/// Options for `api/notifications/add` and `api/notifications/remove`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct NotificationOption {
    /// Notification type, e.g. `NewIssues`, `NewAlerts`,
    /// `SQ-MyNewIssues`, `CeReportTaskFailure`.
    #[serde(rename = "type")]
    pub notification_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    /// Project key for a project-scoped subscription.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// Login to manage; defaults to the authenticated user (admin only
    /// otherwise).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
}

impl NotificationOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("type", &self.notification_type)
    }
}

/// Service for `api/notifications`.
pub struct NotificationsService<'a> {
    client: &'a SonarClient,
}

impl<'a> NotificationsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Adds a subscription.
    pub async fn add(&self, opt: &NotificationOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("notifications/add", opt).await
    }

    /// Removes a subscription.
    pub async fn remove(&self, opt: &NotificationOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("notifications/remove", opt).await
    }

    /// Lists subscriptions of a user (defaults to the authenticated one).
    pub async fn list(&self, login: Option<&str>) -> Result<NotificationsListResult, ApiError> {
        let query: Vec<(&str, &str)> = match login {
            Some(login) => vec![("login", login)],
            None => vec![],
        };
        self.client.get("notifications/list", &query).await
    }
}
