//
//  sonarqube-client
//  api/metrics.rs
//

//! Metric definitions (`api/metrics`).

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_page_size, ApiError, NO_PARAMS};

/// A metric definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Metric {
    #[serde(default)]
    pub id: Option<String>,
    /// Metric key, e.g. `coverage`, `ncloc`.
    pub key: String,
    pub name: String,
    /// Value type: `INT`, `FLOAT`, `PERCENT`, `BOOL`, `STRING`, `MILLISEC`,
    /// `DATA`, `LEVEL`, `DISTRIB`, `RATING`, `WORK_DUR`.
    #[serde(rename = "type")]
    pub metric_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub direction: Option<i32>,
    #[serde(default)]
    pub qualitative: Option<bool>,
    #[serde(default)]
    pub hidden: Option<bool>,
    #[serde(default)]
    pub custom: Option<bool>,
}

/// Response of `api/metrics/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsSearchResult {
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub p: u32,
    #[serde(default)]
    pub ps: u32,
    #[serde(default)]
    pub total: u64,
}

/// Response of `api/metrics/types`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetricTypesResult {
    pub types: Vec<String>,
}

/// Options for `api/metrics/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSearchOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl MetricsSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_page_size("ps", self.ps)
    }
}

/// Service for `api/metrics`.
pub struct MetricsService<'a> {
    client: &'a SonarClient,
}

impl<'a> MetricsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches metric definitions.
    pub async fn search(&self, opt: &MetricsSearchOption) -> Result<MetricsSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("metrics/search", opt).await
    }

    /// Lists all metric value types.
    pub async fn types(&self) -> Result<MetricTypesResult, ApiError> {
        self.client.get("metrics/types", NO_PARAMS).await
    }
}
