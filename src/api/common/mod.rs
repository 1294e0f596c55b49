//
//  sonarqube-client
//  api/common/mod.rs
//

//! Common API Types and Parameter Checks
//!
//! This module provides the types shared by every service binding: the
//! unified [`ApiError`] enum, the [`Paging`] block most list responses carry,
//! and the small pre-flight check helpers used by the option structs.
//!
//! # Overview
//!
//! - [`ApiError`] - unified error type for all API operations
//! - [`Paging`] - page metadata (re-exported from [`pagination`])
//! - `require`, `check_page_size`, `check_member`, … - local parameter
//!   validation, run before any request is dispatched
//!
//! # Notes
//!
//! - Validation failures never produce network traffic; they are surfaced as
//!   [`ApiError::Validation`] with the offending parameter name.
//! - Non-2xx responses are mapped per status in `client::parse_error_body`
//!   and the variants below.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

mod pagination;

pub use pagination::Paging;

/// Unified error type for all SonarQube API operations.
///
/// # Variants
///
/// | Variant | Description | HTTP Status |
/// |---------|-------------|-------------|
/// | `Validation` | Option struct failed a local pre-flight check | N/A |
/// | `AuthRequired` | Missing or rejected credentials | 401 |
/// | `Forbidden` | Insufficient permissions | 403 |
/// | `NotFound` | Requested resource does not exist | 404 |
/// | `BadRequest` | Server rejected the request parameters | 400 |
/// | `ServerError` | Internal server error | 5xx |
/// | `Unexpected` | Any other non-success status | other |
/// | `Network` | Transport-level failure | N/A |
///
/// # Example
///
/// ```rust
/// use sonarqube_client::ApiError;
///
/// fn report(err: &ApiError) {
///     match err {
///         ApiError::Validation { field, message } => {
///             eprintln!("fix parameter `{}`: {}", field, message);
///         }
///         ApiError::AuthRequired => eprintln!("log in first"),
///         other => eprintln!("{}", other),
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum ApiError {
    /// An option struct failed a local constraint before any request was
    /// sent (missing required value, out-of-range page size, value outside
    /// the documented set, malformed key).
    #[error("invalid parameter `{field}`: {message}")]
    Validation {
        /// The API parameter name as the server documents it.
        field: &'static str,
        /// What was wrong with the supplied value.
        message: String,
    },

    /// Authentication credentials are missing, expired, or rejected (401).
    #[error("authentication required")]
    AuthRequired,

    /// The authenticated user lacks the permission the action needs (403).
    #[error("permission denied: {0}")]
    Forbidden(String),

    /// The addressed resource does not exist or is not visible (404).
    #[error("resource not found: {0}")]
    NotFound(String),

    /// The server rejected the request as malformed (400). The message is
    /// taken from the server's `errors[].msg` payload when present.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The server failed internally (5xx). Usually transient.
    #[error("server error ({status}): {message}")]
    ServerError {
        /// The HTTP status code.
        status: u16,
        /// Error message or raw body from the server.
        message: String,
    },

    /// Any other non-success status the mapping above does not cover.
    #[error("unexpected response ({status}): {message}")]
    Unexpected {
        /// The HTTP status code.
        status: u16,
        /// Error message or raw body from the server.
        message: String,
    },

    /// A transport-level error (connection, TLS, timeout, body decode).
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ApiError {
    /// Builds a [`ApiError::Validation`] for `field`.
    pub(crate) fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

/// Empty query/form for actions without parameters.
pub(crate) const NO_PARAMS: &[(&str, &str)] = &[];

/// Maximum page size accepted by paginated actions.
pub const MAX_PAGE_SIZE: u32 = 500;

/// Maximum length of a project key.
pub const MAX_PROJECT_KEY_LENGTH: usize = 400;

// Allowed characters for project keys; at least one non-digit is checked
// separately.
static PROJECT_KEY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9:_.-]+$").expect("static regex"));

/// Checks that a required string parameter is present (non-empty).
pub(crate) fn require(field: &'static str, value: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::validation(field, "is required"));
    }
    Ok(())
}

/// Checks an optional `ps` (page size) parameter against the 1..=500 range
/// the server enforces.
pub(crate) fn check_page_size(field: &'static str, ps: Option<u32>) -> Result<(), ApiError> {
    match ps {
        Some(0) => Err(ApiError::validation(field, "must be at least 1")),
        Some(n) if n > MAX_PAGE_SIZE => Err(ApiError::validation(
            field,
            format!("must not exceed {MAX_PAGE_SIZE}, got {n}"),
        )),
        _ => Ok(()),
    }
}

/// Checks that a value belongs to a documented set of allowed values.
pub(crate) fn check_member(
    field: &'static str,
    value: &str,
    allowed: &[&str],
) -> Result<(), ApiError> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(ApiError::validation(
        field,
        format!("must be one of [{}], got `{}`", allowed.join(", "), value),
    ))
}

/// Checks every entry of a comma-separated list against a documented set.
pub(crate) fn check_members(
    field: &'static str,
    csv: &str,
    allowed: &[&str],
) -> Result<(), ApiError> {
    for value in csv.split(',').map(str::trim).filter(|v| !v.is_empty()) {
        check_member(field, value, allowed)?;
    }
    Ok(())
}

/// Checks a project key: allowed characters, length limit, and at least one
/// non-digit character.
pub(crate) fn check_project_key(field: &'static str, key: &str) -> Result<(), ApiError> {
    require(field, key)?;
    if key.len() > MAX_PROJECT_KEY_LENGTH {
        return Err(ApiError::validation(
            field,
            format!("must not exceed {MAX_PROJECT_KEY_LENGTH} characters"),
        ));
    }
    if !PROJECT_KEY_RE.is_match(key) {
        return Err(ApiError::validation(
            field,
            "may only contain letters, digits, `:`, `_`, `.` and `-`",
        ));
    }
    if key.chars().all(|c| c.is_ascii_digit()) {
        return Err(ApiError::validation(
            field,
            "must contain at least one non-digit character",
        ));
    }
    Ok(())
}

/// Checks that a parameter is an absolute http(s) URL.
pub(crate) fn check_http_url(field: &'static str, value: &str) -> Result<(), ApiError> {
    require(field, value)?;
    match url::Url::parse(value) {
        Ok(u) if u.scheme() == "http" || u.scheme() == "https" => Ok(()),
        Ok(u) => Err(ApiError::validation(
            field,
            format!("must be an http(s) URL, got scheme `{}`", u.scheme()),
        )),
        Err(e) => Err(ApiError::validation(field, format!("is not a valid URL: {e}"))),
    }
}

/// Checks a date parameter: the server accepts `YYYY-MM-DD` or a full
/// ISO-8601 datetime such as `2017-10-19T13:00:00+0200`.
pub(crate) fn check_date(field: &'static str, value: &str) -> Result<(), ApiError> {
    require(field, value)?;
    if chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").is_ok()
        || chrono::DateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%z").is_ok()
        || chrono::DateTime::parse_from_rfc3339(value).is_ok()
    {
        return Ok(());
    }
    Err(ApiError::validation(
        field,
        "must be a date (YYYY-MM-DD) or an ISO-8601 datetime",
    ))
}

/// Checks that exactly one of two alternative parameters was supplied.
pub(crate) fn check_one_of(
    field_a: &'static str,
    a: Option<&str>,
    field_b: &'static str,
    b: Option<&str>,
) -> Result<(), ApiError> {
    match (a, b) {
        (Some(_), None) | (None, Some(_)) => Ok(()),
        (Some(_), Some(_)) => Err(ApiError::validation(
            field_a,
            format!("must not be combined with `{field_b}`"),
        )),
        (None, None) => Err(ApiError::validation(
            field_a,
            format!("either this or `{field_b}` is required"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require() {
        assert!(require("name", "ok").is_ok());
        assert!(require("name", "").is_err());
        assert!(require("name", "   ").is_err());
    }

    #[test]
    fn test_check_page_size() {
        assert!(check_page_size("ps", None).is_ok());
        assert!(check_page_size("ps", Some(1)).is_ok());
        assert!(check_page_size("ps", Some(500)).is_ok());
        assert!(check_page_size("ps", Some(0)).is_err());
        assert!(check_page_size("ps", Some(501)).is_err());
    }

    #[test]
    fn test_check_member() {
        assert!(check_member("severity", "MAJOR", &["MINOR", "MAJOR"]).is_ok());
        assert!(check_member("severity", "HUGE", &["MINOR", "MAJOR"]).is_err());
        assert!(check_members("severities", "MINOR,MAJOR", &["MINOR", "MAJOR"]).is_ok());
        assert!(check_members("severities", "MINOR,HUGE", &["MINOR", "MAJOR"]).is_err());
    }

    #[test]
    fn test_check_project_key() {
        assert!(check_project_key("project", "my_project:module-1.0").is_ok());
        assert!(check_project_key("project", "12345").is_err());
        assert!(check_project_key("project", "bad key").is_err());
        assert!(check_project_key("project", "").is_err());
        assert!(check_project_key("project", &"k".repeat(401)).is_err());
    }

    #[test]
    fn test_check_http_url() {
        assert!(check_http_url("url", "https://hooks.example.com/sonar").is_ok());
        assert!(check_http_url("url", "ftp://example.com").is_err());
        assert!(check_http_url("url", "not a url").is_err());
    }

    #[test]
    fn test_check_date() {
        assert!(check_date("from", "2024-01-01").is_ok());
        assert!(check_date("from", "2017-10-19T13:00:00+0200").is_ok());
        assert!(check_date("from", "2017-10-19T13:00:00+02:00").is_ok());
        assert!(check_date("from", "19/10/2017").is_err());
        assert!(check_date("from", "").is_err());
    }

    #[test]
    fn test_check_one_of() {
        assert!(check_one_of("templateId", Some("x"), "templateName", None).is_ok());
        assert!(check_one_of("templateId", None, "templateName", Some("x")).is_ok());
        assert!(check_one_of("templateId", Some("x"), "templateName", Some("y")).is_err());
        assert!(check_one_of("templateId", None, "templateName", None).is_err());
    }
}
