//
//  sonarqube-client
//  api/webhooks.rs
//

//! Webhook administration (`api/webhooks`).
//!
//! Webhooks notify an external URL at the end of each analysis, either
//! globally or for one project. Delivery history is kept server-side and
//! exposed read-only here.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_http_url, check_page_size, require, ApiError, Paging};

/// A configured webhook.
#[derive(Debug, Clone, Deserialize)]
pub struct Webhook {
    pub key: String,
    pub name: String,
    pub url: String,
    /// Present only when a secret is configured; the value is masked.
    #[serde(default)]
    pub secret: Option<String>,
}

/// Response of `api/webhooks/list`.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhooksListResult {
    pub webhooks: Vec<Webhook>,
}

/// Response of `api/webhooks/create`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedWebhook {
    pub webhook: Webhook,
}

/// One attempted delivery of a webhook payload.
#[derive(Debug, Clone, Deserialize)]
pub struct Delivery {
    pub id: String,
    #[serde(rename = "componentKey", default)]
    pub component_key: Option<String>,
    #[serde(rename = "ceTaskId", default)]
    pub ce_task_id: Option<String>,
    pub name: String,
    pub url: String,
    /// Datetime of the attempt.
    pub at: String,
    pub success: bool,
    #[serde(rename = "httpStatus", default)]
    pub http_status: Option<u16>,
    #[serde(rename = "durationMs", default)]
    pub duration_ms: Option<u64>,
    /// Only populated by `api/webhooks/delivery`.
    #[serde(default)]
    pub payload: Option<String>,
}

/// Response of `api/webhooks/deliveries`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveriesResult {
    pub paging: Paging,
    pub deliveries: Vec<Delivery>,
}

/// Response of `api/webhooks/delivery`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeliveryResult {
    pub delivery: Delivery,
}

/// Options for `api/webhooks/create`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhooksCreateOption {
    /// Display name, at most 100 characters.
    pub name: String,
    /// Target URL, http(s), at most 512 characters.
    pub url: String,
    /// Project key; omitted for a global webhook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
    /// HMAC secret, 16 to 200 characters.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl WebhooksCreateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        validate_webhook_fields("name", &self.name, "url", &self.url, self.secret.as_deref())
    }
}

/// Options for `api/webhooks/update`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WebhooksUpdateOption {
    /// Key of the webhook to update.
    pub webhook: String,
    pub name: String,
    pub url: String,
    /// New secret; an empty string removes the existing one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
}

impl WebhooksUpdateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("webhook", &self.webhook)?;
        let secret = match self.secret.as_deref() {
            // An empty secret means "remove", which is always legal.
            Some("") | None => None,
            other => other,
        };
        validate_webhook_fields("name", &self.name, "url", &self.url, secret)
    }
}

fn validate_webhook_fields(
    name_field: &'static str,
    name: &str,
    url_field: &'static str,
    url: &str,
    secret: Option<&str>,
) -> Result<(), ApiError> {
    require(name_field, name)?;
    if name.len() > 100 {
        return Err(ApiError::validation(
            name_field,
            "must not exceed 100 characters",
        ));
    }
    check_http_url(url_field, url)?;
    if url.len() > 512 {
        return Err(ApiError::validation(
            url_field,
            "must not exceed 512 characters",
        ));
    }
    if let Some(secret) = secret {
        if secret.len() < 16 || secret.len() > 200 {
            return Err(ApiError::validation(
                "secret",
                "must be between 16 and 200 characters",
            ));
        }
    }
    Ok(())
}

/// Options for `api/webhooks/deliveries`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DeliveriesOption {
    /// Filter on the key of one webhook.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webhook: Option<String>,
    /// Filter on the analyzed project.
    #[serde(rename = "componentKey", skip_serializing_if = "Option::is_none")]
    pub component_key: Option<String>,
    /// Filter on the Compute Engine task that triggered the deliveries.
    #[serde(rename = "ceTaskId", skip_serializing_if = "Option::is_none")]
    pub ce_task_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl DeliveriesOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        if self.webhook.is_none() && self.component_key.is_none() && self.ce_task_id.is_none() {
            return Err(ApiError::validation(
                "webhook",
                "at least one of `webhook`, `componentKey` or `ceTaskId` is required",
            ));
        }
        check_page_size("ps", self.ps)
    }
}

/// Service for `api/webhooks`.
pub struct WebhooksService<'a> {
    client: &'a SonarClient,
}

impl<'a> WebhooksService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Lists global webhooks, or a project's when `project` is given.
    pub async fn list(&self, project: Option<&str>) -> Result<WebhooksListResult, ApiError> {
        let query: Vec<(&str, &str)> = match project {
            Some(project) => vec![("project", project)],
            None => vec![],
        };
        self.client.get("webhooks/list", &query).await
    }

    /// Creates a webhook.
    pub async fn create(&self, opt: &WebhooksCreateOption) -> Result<CreatedWebhook, ApiError> {
        opt.validate()?;
        self.client.post("webhooks/create", opt).await
    }

    /// Updates a webhook.
    pub async fn update(&self, opt: &WebhooksUpdateOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("webhooks/update", opt).await
    }

    /// Deletes a webhook by key.
    pub async fn delete(&self, webhook: &str) -> Result<(), ApiError> {
        require("webhook", webhook)?;
        self.client
            .post_empty("webhooks/delete", &[("webhook", webhook)])
            .await
    }

    /// Lists past deliveries, most recent first.
    pub async fn deliveries(&self, opt: &DeliveriesOption) -> Result<DeliveriesResult, ApiError> {
        opt.validate()?;
        self.client.get("webhooks/deliveries", opt).await
    }

    /// Returns one delivery with its payload.
    pub async fn delivery(&self, delivery_id: &str) -> Result<DeliveryResult, ApiError> {
        require("deliveryId", delivery_id)?;
        self.client
            .get("webhooks/delivery", &[("deliveryId", delivery_id)])
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_field_limits() {
        let ok = WebhooksCreateOption {
            name: "CI hook".to_string(),
            url: "https://hooks.example.com/sonar".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad_scheme = WebhooksCreateOption {
            name: "CI hook".to_string(),
            url: "ftp://hooks.example.com".to_string(),
            ..Default::default()
        };
        assert!(bad_scheme.validate().is_err());

        let short_secret = WebhooksCreateOption {
            name: "CI hook".to_string(),
            url: "https://hooks.example.com/sonar".to_string(),
            secret: Some("tooshort".to_string()),
            ..Default::default()
        };
        assert!(short_secret.validate().is_err());
    }

    #[test]
    fn test_update_allows_empty_secret_to_clear() {
        let clear = WebhooksUpdateOption {
            webhook: "uuid".to_string(),
            name: "CI hook".to_string(),
            url: "https://hooks.example.com/sonar".to_string(),
            secret: Some(String::new()),
        };
        assert!(clear.validate().is_ok());
    }

    #[test]
    fn test_deliveries_needs_a_filter() {
        assert!(DeliveriesOption::default().validate().is_err());
        assert!(DeliveriesOption {
            component_key: Some("demo".to_string()),
            ..Default::default()
        }
        .validate()
        .is_ok());
    }
}
