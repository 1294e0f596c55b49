//
//  sonarqube-client
//  api/project_badges.rs
//

//! Project badges (`api/project_badges`).
//!
//! Both actions return an SVG document as text.

use serde::Serialize;

use super::client::SonarClient;
use super::common::{check_member, require, ApiError};

// Metrics accepted by the measure badge.
const BADGE_METRICS: &[&str] = &[
    "bugs",
    "code_smells",
    "coverage",
    "duplicated_lines_density",
    "ncloc",
    "sqale_rating",
    "alert_status",
    "reliability_rating",
    "security_rating",
    "sqale_index",
    "vulnerabilities",
];

/// Options for `api/project_badges/measure`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BadgeMeasureOption {
    /// Project or application key.
    pub project: String,
    /// Badge metric key, one of the supported subset (`bugs`, `coverage`, …).
    pub metric: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl BadgeMeasureOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("project", &self.project)?;
        check_member("metric", &self.metric, BADGE_METRICS)
    }
}

/// Options for `api/project_badges/quality_gate`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BadgeQualityGateOption {
    /// Project or application key.
    pub project: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
}

impl BadgeQualityGateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("project", &self.project)
    }
}

/// Service for `api/project_badges`.
pub struct ProjectBadgesService<'a> {
    client: &'a SonarClient,
}

impl<'a> ProjectBadgesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Returns the SVG badge for one metric of a project.
    pub async fn measure(&self, opt: &BadgeMeasureOption) -> Result<String, ApiError> {
        opt.validate()?;
        self.client.get_text("project_badges/measure", opt).await
    }

    /// Returns the SVG quality gate badge of a project.
    pub async fn quality_gate(&self, opt: &BadgeQualityGateOption) -> Result<String, ApiError> {
        opt.validate()?;
        self.client
            .get_text("project_badges/quality_gate", opt)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_metric_must_be_supported() {
        let ok = BadgeMeasureOption {
            project: "demo".to_string(),
            metric: "coverage".to_string(),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let unsupported = BadgeMeasureOption {
            project: "demo".to_string(),
            metric: "lines_to_cover".to_string(),
            ..Default::default()
        };
        assert!(unsupported.validate().is_err());
    }
}
