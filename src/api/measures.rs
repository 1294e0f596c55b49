//
//  sonarqube-client
//  api/measures.rs
//

//! Component measures and history (`api/measures`).
//!
//! The protobuf response variants these endpoints also offer are not bound;
//! the JSON ones are used.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{
    check_date, check_member, check_members, check_page_size, require, ApiError, Paging,
};
use super::metrics::Metric;

const TREE_STRATEGIES: &[&str] = &["all", "children", "leaves"];
const TREE_SORT_FIELDS: &[&str] = &["name", "path", "qualifier", "metric", "metricPeriod"];
const METRIC_SORT_FILTERS: &[&str] = &["all", "withMeasuresOnly"];
const ADDITIONAL_FIELDS: &[&str] = &["metrics", "periods"];

/// A measure value for one leak period.
#[derive(Debug, Clone, Deserialize)]
pub struct PeriodValue {
    pub index: u32,
    pub value: String,
    #[serde(rename = "bestValue", default)]
    pub best_value: Option<bool>,
}

/// A measure of one metric on one component.
#[derive(Debug, Clone, Deserialize)]
pub struct Measure {
    pub metric: String,
    #[serde(default)]
    pub value: Option<String>,
    #[serde(default)]
    pub periods: Vec<PeriodValue>,
    #[serde(rename = "bestValue", default)]
    pub best_value: Option<bool>,
    /// Component key, present in `search_history`-style flat listings.
    #[serde(default)]
    pub component: Option<String>,
}

/// A component together with its requested measures.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasuredComponent {
    #[serde(default)]
    pub id: Option<String>,
    pub key: String,
    pub name: String,
    pub qualifier: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// A leak period definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Period {
    pub index: u32,
    pub mode: String,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub parameter: Option<String>,
}

/// Response of `api/measures/component`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasuresComponentResult {
    pub component: MeasuredComponent,
    /// Only with `additionalFields=metrics`.
    #[serde(default)]
    pub metrics: Vec<Metric>,
    /// Only with `additionalFields=periods`.
    #[serde(default)]
    pub periods: Vec<Period>,
}

/// Response of `api/measures/component_tree`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasuresComponentTreeResult {
    pub paging: Paging,
    #[serde(rename = "baseComponent")]
    pub base_component: MeasuredComponent,
    pub components: Vec<MeasuredComponent>,
    #[serde(default)]
    pub metrics: Vec<Metric>,
    #[serde(default)]
    pub periods: Vec<Period>,
}

/// One point of a measure history.
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryValue {
    pub date: String,
    #[serde(default)]
    pub value: Option<String>,
}

/// History of one metric.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasureHistory {
    pub metric: String,
    pub history: Vec<HistoryValue>,
}

/// Response of `api/measures/search_history`.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasuresSearchHistoryResult {
    pub paging: Paging,
    pub measures: Vec<MeasureHistory>,
}

/// Options for `api/measures/component`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeasuresComponentOption {
    /// Component key.
    pub component: String,
    /// Comma-separated metric keys, e.g. `ncloc,complexity,violations`.
    #[serde(rename = "metricKeys")]
    pub metric_keys: String,
    /// Comma-separated extras: `metrics`, `periods`.
    #[serde(rename = "additionalFields", skip_serializing_if = "Option::is_none")]
    pub additional_fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl MeasuresComponentOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("component", &self.component)?;
        require("metricKeys", &self.metric_keys)?;
        if let Some(fields) = &self.additional_fields {
            check_members("additionalFields", fields, ADDITIONAL_FIELDS)?;
        }
        Ok(())
    }
}

/// Options for `api/measures/component_tree`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeasuresComponentTreeOption {
    /// Base component key.
    pub component: String,
    /// Comma-separated metric keys. At most 15 metrics.
    #[serde(rename = "metricKeys")]
    pub metric_keys: String,
    /// Traversal strategy: `all` (default), `children`, `leaves`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,
    /// Comma-separated sort fields; sorting by `metric` or `metricPeriod`
    /// requires `metric_sort`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    /// Metric key to sort by.
    #[serde(rename = "metricSort", skip_serializing_if = "Option::is_none")]
    pub metric_sort: Option<String>,
    /// `all` (default) or `withMeasuresOnly`.
    #[serde(rename = "metricSortFilter", skip_serializing_if = "Option::is_none")]
    pub metric_sort_filter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asc: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<String>,
    #[serde(rename = "additionalFields", skip_serializing_if = "Option::is_none")]
    pub additional_fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl MeasuresComponentTreeOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("component", &self.component)?;
        require("metricKeys", &self.metric_keys)?;
        if self.metric_keys.split(',').filter(|k| !k.trim().is_empty()).count() > 15 {
            return Err(ApiError::validation(
                "metricKeys",
                "must not contain more than 15 metrics",
            ));
        }
        if let Some(strategy) = &self.strategy {
            check_member("strategy", strategy, TREE_STRATEGIES)?;
        }
        if let Some(sort) = &self.s {
            check_members("s", sort, TREE_SORT_FIELDS)?;
            let sorts_by_metric = sort
                .split(',')
                .any(|f| matches!(f.trim(), "metric" | "metricPeriod"));
            if sorts_by_metric && self.metric_sort.is_none() {
                return Err(ApiError::validation(
                    "metricSort",
                    "is required when sorting by `metric` or `metricPeriod`",
                ));
            }
        }
        if let Some(filter) = &self.metric_sort_filter {
            check_member("metricSortFilter", filter, METRIC_SORT_FILTERS)?;
        }
        if let Some(fields) = &self.additional_fields {
            check_members("additionalFields", fields, ADDITIONAL_FIELDS)?;
        }
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/measures/search_history`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MeasuresSearchHistoryOption {
    /// Component key.
    pub component: String,
    /// Comma-separated metric keys.
    pub metrics: String,
    /// Only history created at or after this datetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Only history created at or before this datetime.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl MeasuresSearchHistoryOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("component", &self.component)?;
        require("metrics", &self.metrics)?;
        if let Some(date) = &self.from {
            check_date("from", date)?;
        }
        if let Some(date) = &self.to {
            check_date("to", date)?;
        }
        check_page_size("ps", self.ps)
    }
}

/// Service for `api/measures`.
pub struct MeasuresService<'a> {
    client: &'a SonarClient,
}

impl<'a> MeasuresService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Returns measures of one component.
    pub async fn component(
        &self,
        opt: &MeasuresComponentOption,
    ) -> Result<MeasuresComponentResult, ApiError> {
        opt.validate()?;
        self.client.get("measures/component", opt).await
    }

    /// Returns measures across the tree rooted at a component.
    pub async fn component_tree(
        &self,
        opt: &MeasuresComponentTreeOption,
    ) -> Result<MeasuresComponentTreeResult, ApiError> {
        opt.validate()?;
        self.client.get("measures/component_tree", opt).await
    }

    /// Returns the history of the given metrics on one component.
    pub async fn search_history(
        &self,
        opt: &MeasuresSearchHistoryOption,
    ) -> Result<MeasuresSearchHistoryResult, ApiError> {
        opt.validate()?;
        self.client.get("measures/search_history", opt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_requires_metrics() {
        assert!(MeasuresComponentOption::default().validate().is_err());
        let ok = MeasuresComponentOption {
            component: "demo".to_string(),
            metric_keys: "ncloc,coverage".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_tree_metric_sort_rules() {
        let base = MeasuresComponentTreeOption {
            component: "demo".to_string(),
            metric_keys: "ncloc".to_string(),
            ..Default::default()
        };
        assert!(base.validate().is_ok());

        let missing_metric_sort = MeasuresComponentTreeOption {
            s: Some("metric".to_string()),
            ..base.clone()
        };
        assert!(missing_metric_sort.validate().is_err());

        let with_metric_sort = MeasuresComponentTreeOption {
            s: Some("metric".to_string()),
            metric_sort: Some("ncloc".to_string()),
            ..base.clone()
        };
        assert!(with_metric_sort.validate().is_ok());

        let too_many = MeasuresComponentTreeOption {
            metric_keys: (0..16).map(|i| format!("m{i}")).collect::<Vec<_>>().join(","),
            ..base
        };
        assert!(too_many.validate().is_err());
    }
}
