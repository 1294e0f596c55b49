//
//  sonarqube-client
//  api/issues.rs
//

//! Issue search and life cycle (`api/issues`).
//!
//! The largest controller of the Web API: searching, commenting, assigning,
//! transitioning, and bulk-changing issues. Every mutation returns the
//! updated issue so callers never need a follow-up fetch.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{
    check_date, check_member, check_members, check_page_size, require, ApiError, Paging,
};
use super::rules::Rule;
use super::users::User;

/// Issue severities, lowest first.
pub const SEVERITIES: &[&str] = &["INFO", "MINOR", "MAJOR", "CRITICAL", "BLOCKER"];

/// Issue types.
pub const ISSUE_TYPES: &[&str] = &["CODE_SMELL", "BUG", "VULNERABILITY"];

/// Issue workflow statuses.
pub const STATUSES: &[&str] = &["OPEN", "CONFIRMED", "REOPENED", "RESOLVED", "CLOSED"];

/// Issue resolutions.
pub const RESOLUTIONS: &[&str] = &["FALSE-POSITIVE", "WONTFIX", "FIXED", "REMOVED"];

/// Workflow transitions accepted by `do_transition`.
pub const TRANSITIONS: &[&str] = &[
    "confirm",
    "unconfirm",
    "reopen",
    "resolve",
    "falsepositive",
    "wontfix",
    "close",
];

const SORT_FIELDS: &[&str] = &[
    "CREATION_DATE",
    "UPDATE_DATE",
    "CLOSE_DATE",
    "ASSIGNEE",
    "SEVERITY",
    "STATUS",
    "FILE_LINE",
];

/// A text range within a file.
#[derive(Debug, Clone, Deserialize)]
pub struct TextRange {
    #[serde(rename = "startLine")]
    pub start_line: u32,
    #[serde(rename = "endLine")]
    pub end_line: u32,
    #[serde(rename = "startOffset", default)]
    pub start_offset: Option<u32>,
    #[serde(rename = "endOffset", default)]
    pub end_offset: Option<u32>,
}

/// A comment on an issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    pub key: String,
    pub login: String,
    #[serde(rename = "htmlText", default)]
    pub html_text: Option<String>,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub updatable: bool,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// An issue.
#[derive(Debug, Clone, Deserialize)]
pub struct Issue {
    pub key: String,
    pub rule: String,
    pub severity: String,
    pub component: String,
    pub project: String,
    #[serde(default)]
    pub line: Option<u32>,
    #[serde(rename = "textRange", default)]
    pub text_range: Option<TextRange>,
    pub status: String,
    #[serde(default)]
    pub resolution: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Remediation effort, e.g. `5min`.
    #[serde(default)]
    pub effort: Option<String>,
    #[serde(default)]
    pub debt: Option<String>,
    #[serde(default)]
    pub assignee: Option<String>,
    /// SCM author of the incriminated line.
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    #[serde(rename = "updateDate", default)]
    pub update_date: Option<String>,
    #[serde(rename = "closeDate", default)]
    pub close_date: Option<String>,
    #[serde(rename = "type")]
    pub issue_type: String,
}

/// A component referenced from an issue listing.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueComponent {
    pub key: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub qualifier: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
}

/// Response of `api/issues/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssuesSearchResult {
    pub paging: Paging,
    pub issues: Vec<Issue>,
    #[serde(default)]
    pub components: Vec<IssueComponent>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// Response of the single-issue mutations (`assign`, `do_transition`, …).
#[derive(Debug, Clone, Deserialize)]
pub struct IssueResult {
    pub issue: Issue,
    #[serde(default)]
    pub components: Vec<IssueComponent>,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub users: Vec<User>,
}

/// One entry of an issue's changelog.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangelogEntry {
    #[serde(default)]
    pub user: Option<String>,
    #[serde(rename = "userName", default)]
    pub user_name: Option<String>,
    #[serde(rename = "creationDate")]
    pub creation_date: String,
    #[serde(default)]
    pub diffs: Vec<ChangelogDiff>,
}

/// One field change within a changelog entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ChangelogDiff {
    pub key: String,
    #[serde(rename = "oldValue", default)]
    pub old_value: Option<String>,
    #[serde(rename = "newValue", default)]
    pub new_value: Option<String>,
}

/// Response of `api/issues/changelog`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueChangelogResult {
    pub changelog: Vec<ChangelogEntry>,
}

/// Response of `api/issues/bulk_change`.
#[derive(Debug, Clone, Deserialize)]
pub struct BulkChangeResult {
    pub total: u64,
    pub success: u64,
    #[serde(default)]
    pub ignored: u64,
    #[serde(default)]
    pub failures: u64,
}

/// Response of `api/issues/tags`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueTagsResult {
    pub tags: Vec<String>,
}

/// Response of `api/issues/authors`.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueAuthorsResult {
    pub authors: Vec<String>,
}

/// Options for `api/issues/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssuesSearchOption {
    /// Comma-separated component keys to restrict the search to.
    #[serde(rename = "componentKeys", skip_serializing_if = "Option::is_none")]
    pub component_keys: Option<String>,
    /// Comma-separated issue keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<String>,
    /// Comma-separated severities, see [`SEVERITIES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severities: Option<String>,
    /// Comma-separated statuses, see [`STATUSES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statuses: Option<String>,
    /// Comma-separated resolutions, see [`RESOLUTIONS`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolutions: Option<String>,
    /// Comma-separated types, see [`ISSUE_TYPES`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub types: Option<String>,
    /// Comma-separated rule keys, e.g. `squid:S1067`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rules: Option<String>,
    /// Comma-separated tags.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    /// Comma-separated language keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<String>,
    /// Comma-separated assignee logins; `__me__` stands for the
    /// authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignees: Option<String>,
    /// Comma-separated SCM author accounts.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    /// Only assigned (`true`) or unassigned (`false`) issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned: Option<bool>,
    /// Only resolved (`true`) or unresolved (`false`) issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved: Option<bool>,
    /// Only issues created after this datetime (exclusive).
    #[serde(rename = "createdAfter", skip_serializing_if = "Option::is_none")]
    pub created_after: Option<String>,
    /// Only issues created before this datetime (inclusive).
    #[serde(rename = "createdBefore", skip_serializing_if = "Option::is_none")]
    pub created_before: Option<String>,
    /// Only issues created at this datetime.
    #[serde(rename = "createdAt", skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// Only issues created in the last `1m2w` (months/weeks/days/…).
    #[serde(rename = "createdInLast", skip_serializing_if = "Option::is_none")]
    pub created_in_last: Option<String>,
    /// Only issues created in the leak period.
    #[serde(rename = "sinceLeakPeriod", skip_serializing_if = "Option::is_none")]
    pub since_leak_period: Option<bool>,
    /// Only issues at the passed component level, not its descendants.
    #[serde(rename = "onComponentOnly", skip_serializing_if = "Option::is_none")]
    pub on_component_only: Option<bool>,
    /// Sort field, see the documented set (`CREATION_DATE`, …).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub s: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asc: Option<bool>,
    /// Comma-separated extras: `_all`, `comments`, `languages`, `rules`,
    /// `transitions`, `users`.
    #[serde(rename = "additionalFields", skip_serializing_if = "Option::is_none")]
    pub additional_fields: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl IssuesSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        if let Some(severities) = &self.severities {
            check_members("severities", severities, SEVERITIES)?;
        }
        if let Some(statuses) = &self.statuses {
            check_members("statuses", statuses, STATUSES)?;
        }
        if let Some(resolutions) = &self.resolutions {
            check_members("resolutions", resolutions, RESOLUTIONS)?;
        }
        if let Some(types) = &self.types {
            check_members("types", types, ISSUE_TYPES)?;
        }
        if let Some(sort) = &self.s {
            check_member("s", sort, SORT_FIELDS)?;
        }
        if self.created_at.is_some()
            && (self.created_after.is_some() || self.created_in_last.is_some())
        {
            return Err(ApiError::validation(
                "createdAt",
                "must not be combined with `createdAfter` or `createdInLast`",
            ));
        }
        if let Some(date) = &self.created_after {
            check_date("createdAfter", date)?;
        }
        if let Some(date) = &self.created_before {
            check_date("createdBefore", date)?;
        }
        if let Some(date) = &self.created_at {
            check_date("createdAt", date)?;
        }
        check_page_size("ps", self.ps)
    }
}

/// Options for `api/issues/bulk_change`.
///
/// At least one action (`assign`, `set_severity`, `set_type`,
/// `do_transition`, `add_tags`, `remove_tags`) must be supplied.
#[derive(Debug, Clone, Default, Serialize)]
pub struct IssuesBulkChangeOption {
    /// Comma-separated issue keys. At most 500 issues per call.
    pub issues: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assign: Option<String>,
    #[serde(rename = "set_severity", skip_serializing_if = "Option::is_none")]
    pub set_severity: Option<String>,
    #[serde(rename = "set_type", skip_serializing_if = "Option::is_none")]
    pub set_type: Option<String>,
    #[serde(rename = "do_transition", skip_serializing_if = "Option::is_none")]
    pub do_transition: Option<String>,
    #[serde(rename = "add_tags", skip_serializing_if = "Option::is_none")]
    pub add_tags: Option<String>,
    #[serde(rename = "remove_tags", skip_serializing_if = "Option::is_none")]
    pub remove_tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
    #[serde(rename = "sendNotifications", skip_serializing_if = "Option::is_none")]
    pub send_notifications: Option<bool>,
}

impl IssuesBulkChangeOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("issues", &self.issues)?;
        if self.issues.split(',').filter(|k| !k.trim().is_empty()).count() > 500 {
            return Err(ApiError::validation(
                "issues",
                "must not contain more than 500 issues",
            ));
        }
        let has_action = self.assign.is_some()
            || self.set_severity.is_some()
            || self.set_type.is_some()
            || self.do_transition.is_some()
            || self.add_tags.is_some()
            || self.remove_tags.is_some();
        if !has_action {
            return Err(ApiError::validation(
                "issues",
                "at least one action is required (assign, set_severity, set_type, \
                 do_transition, add_tags, remove_tags)",
            ));
        }
        if let Some(severity) = &self.set_severity {
            check_member("set_severity", severity, SEVERITIES)?;
        }
        if let Some(issue_type) = &self.set_type {
            check_member("set_type", issue_type, ISSUE_TYPES)?;
        }
        if let Some(transition) = &self.do_transition {
            check_member("do_transition", transition, TRANSITIONS)?;
        }
        Ok(())
    }
}

/// Service for `api/issues`.
pub struct IssuesService<'a> {
    client: &'a SonarClient,
}

impl<'a> IssuesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Searches issues.
    pub async fn search(&self, opt: &IssuesSearchOption) -> Result<IssuesSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("issues/search", opt).await
    }

    /// Adds a comment to an issue.
    pub async fn add_comment(&self, issue: &str, text: &str) -> Result<IssueResult, ApiError> {
        require("issue", issue)?;
        require("text", text)?;
        self.client
            .post("issues/add_comment", &[("issue", issue), ("text", text)])
            .await
    }

    /// Deletes a comment by key.
    pub async fn delete_comment(&self, comment: &str) -> Result<IssueResult, ApiError> {
        require("comment", comment)?;
        self.client
            .post("issues/delete_comment", &[("comment", comment)])
            .await
    }

    /// Replaces the text of a comment.
    pub async fn edit_comment(&self, comment: &str, text: &str) -> Result<IssueResult, ApiError> {
        require("comment", comment)?;
        require("text", text)?;
        self.client
            .post(
                "issues/edit_comment",
                &[("comment", comment), ("text", text)],
            )
            .await
    }

    /// Assigns an issue to a user. Pass `None` to unassign.
    pub async fn assign(
        &self,
        issue: &str,
        assignee: Option<&str>,
    ) -> Result<IssueResult, ApiError> {
        require("issue", issue)?;
        let mut form = vec![("issue", issue)];
        if let Some(assignee) = assignee {
            form.push(("assignee", assignee));
        }
        self.client.post("issues/assign", &form).await
    }

    /// Applies a workflow transition, see [`TRANSITIONS`].
    pub async fn do_transition(
        &self,
        issue: &str,
        transition: &str,
    ) -> Result<IssueResult, ApiError> {
        require("issue", issue)?;
        check_member("transition", transition, TRANSITIONS)?;
        self.client
            .post(
                "issues/do_transition",
                &[("issue", issue), ("transition", transition)],
            )
            .await
    }

    /// Overrides the severity of an issue, see [`SEVERITIES`].
    pub async fn set_severity(&self, issue: &str, severity: &str) -> Result<IssueResult, ApiError> {
        require("issue", issue)?;
        check_member("severity", severity, SEVERITIES)?;
        self.client
            .post(
                "issues/set_severity",
                &[("issue", issue), ("severity", severity)],
            )
            .await
    }

    /// Overrides the type of an issue, see [`ISSUE_TYPES`].
    pub async fn set_type(&self, issue: &str, issue_type: &str) -> Result<IssueResult, ApiError> {
        require("issue", issue)?;
        check_member("type", issue_type, ISSUE_TYPES)?;
        self.client
            .post("issues/set_type", &[("issue", issue), ("type", issue_type)])
            .await
    }

    /// Replaces the tags of an issue. Tags use lowercase letters, digits,
    /// `+`, `-`, `#`, `.`.
    pub async fn set_tags(&self, issue: &str, tags: &str) -> Result<IssueResult, ApiError> {
        require("issue", issue)?;
        for tag in tags.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            let valid = tag
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || "+-#.".contains(c));
            if !valid {
                return Err(ApiError::validation(
                    "tags",
                    format!("`{tag}` may only contain a-z, 0-9, `+`, `-`, `#`, `.`"),
                ));
            }
        }
        self.client
            .post("issues/set_tags", &[("issue", issue), ("tags", tags)])
            .await
    }

    /// Returns the history of an issue.
    pub async fn changelog(&self, issue: &str) -> Result<IssueChangelogResult, ApiError> {
        require("issue", issue)?;
        self.client
            .get("issues/changelog", &[("issue", issue)])
            .await
    }

    /// Applies one change to up to 500 issues at once.
    pub async fn bulk_change(
        &self,
        opt: &IssuesBulkChangeOption,
    ) -> Result<BulkChangeResult, ApiError> {
        opt.validate()?;
        self.client.post("issues/bulk_change", opt).await
    }

    /// Searches issue tags.
    pub async fn tags(&self, q: Option<&str>, ps: Option<u32>) -> Result<IssueTagsResult, ApiError> {
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
        self.client.get("issues/tags", &query).await
    }

    /// Searches SCM author accounts seen on issues.
    pub async fn authors(
        &self,
        q: Option<&str>,
        ps: Option<u32>,
    ) -> Result<IssueAuthorsResult, ApiError> {
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
        self.client.get("issues/authors", &query).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_enumerated_filters() {
        assert!(IssuesSearchOption::default().validate().is_ok());

        let ok = IssuesSearchOption {
            severities: Some("MAJOR,BLOCKER".to_string()),
            statuses: Some("OPEN,REOPENED".to_string()),
            types: Some("BUG".to_string()),
            s: Some("SEVERITY".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad = IssuesSearchOption {
            severities: Some("MAJOR,URGENT".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let conflicting_dates = IssuesSearchOption {
            created_at: Some("2024-01-01".to_string()),
            created_in_last: Some("1m".to_string()),
            ..Default::default()
        };
        assert!(conflicting_dates.validate().is_err());
    }

    #[test]
    fn test_bulk_change_needs_an_action() {
        let no_action = IssuesBulkChangeOption {
            issues: "AU-1,AU-2".to_string(),
            ..Default::default()
        };
        assert!(no_action.validate().is_err());

        let ok = IssuesBulkChangeOption {
            issues: "AU-1,AU-2".to_string(),
            do_transition: Some("wontfix".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());

        let bad_transition = IssuesBulkChangeOption {
            issues: "AU-1".to_string(),
            do_transition: Some("ignore".to_string()),
            ..Default::default()
        };
        assert!(bad_transition.validate().is_err());
    }

    #[tokio::test]
    async fn test_set_tags_rejects_uppercase() {
        let client = crate::SonarClient::new("http://127.0.0.1:1").unwrap();
        let err = client
            .issues()
            .set_tags("AU-1", "security,Style")
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "tags", .. }));
    }
}
