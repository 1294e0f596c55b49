//
//  sonarqube-client
//  api/permissions.rs
//

//! Permissions and permission templates (`api/permissions`).
//!
//! Grants are either global or scoped to one project; the accepted
//! permission keys differ between the two scopes. Templates describe a set
//! of grants that can be applied to projects in bulk, optionally matched by
//! a project key pattern.

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_date, check_member, check_one_of, require, ApiError};

/// Permission keys valid at global scope.
pub const GLOBAL_PERMISSIONS: &[&str] = &[
    "admin",
    "gateadmin",
    "profileadmin",
    "provisioning",
    "scan",
    "applicationcreator",
    "portfoliocreator",
];

/// Permission keys valid on a project.
pub const PROJECT_PERMISSIONS: &[&str] = &[
    "admin",
    "codeviewer",
    "issueadmin",
    "securityhotspotadmin",
    "scan",
    "user",
];

/// A permission template.
#[derive(Debug, Clone, Deserialize)]
pub struct PermissionTemplate {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(rename = "projectKeyPattern", default)]
    pub project_key_pattern: Option<String>,
    #[serde(rename = "createdAt", default)]
    pub created_at: Option<String>,
    #[serde(rename = "updatedAt", default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub permissions: Vec<TemplatePermissionCount>,
}

/// Grant counts of one permission inside a template.
#[derive(Debug, Clone, Deserialize)]
pub struct TemplatePermissionCount {
    pub key: String,
    #[serde(rename = "usersCount", default)]
    pub users_count: u32,
    #[serde(rename = "groupsCount", default)]
    pub groups_count: u32,
    #[serde(rename = "withProjectCreator", default)]
    pub with_project_creator: bool,
}

/// The default template of one qualifier.
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultTemplate {
    #[serde(rename = "templateId")]
    pub template_id: String,
    pub qualifier: String,
}

/// Response of `api/permissions/search_templates`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchTemplatesResult {
    #[serde(rename = "permissionTemplates")]
    pub permission_templates: Vec<PermissionTemplate>,
    #[serde(rename = "defaultTemplates", default)]
    pub default_templates: Vec<DefaultTemplate>,
}

/// Response of `api/permissions/create_template`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedTemplate {
    #[serde(rename = "permissionTemplate")]
    pub permission_template: PermissionTemplate,
}

fn check_permission(
    permission: &str,
    project_scoped: bool,
) -> Result<(), ApiError> {
    let allowed = if project_scoped {
        PROJECT_PERMISSIONS
    } else {
        GLOBAL_PERMISSIONS
    };
    check_member("permission", permission, allowed)
}

fn check_key_pattern(pattern: Option<&str>) -> Result<(), ApiError> {
    if let Some(pattern) = pattern {
        if regex::Regex::new(pattern).is_err() {
            return Err(ApiError::validation(
                "projectKeyPattern",
                "must be a valid regular expression",
            ));
        }
    }
    Ok(())
}

/// A user grant: global when no project is given, project-scoped
/// otherwise.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserPermissionOption {
    pub login: String,
    /// See [`GLOBAL_PERMISSIONS`] and [`PROJECT_PERMISSIONS`].
    pub permission: String,
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(rename = "projectKey", skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
}

impl UserPermissionOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("login", &self.login)?;
        require("permission", &self.permission)?;
        if self.project_id.is_some() && self.project_key.is_some() {
            return Err(ApiError::validation(
                "projectId",
                "cannot be combined with `projectKey`",
            ));
        }
        let project_scoped = self.project_id.is_some() || self.project_key.is_some();
        check_permission(&self.permission, project_scoped)
    }
}

/// A group grant. The group is addressed by name; `anyone` grants to
/// everyone, including unauthenticated visitors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GroupPermissionOption {
    #[serde(rename = "groupName")]
    pub group_name: String,
    /// See [`GLOBAL_PERMISSIONS`] and [`PROJECT_PERMISSIONS`].
    pub permission: String,
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(rename = "projectKey", skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
}

impl GroupPermissionOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("groupName", &self.group_name)?;
        require("permission", &self.permission)?;
        if self.project_id.is_some() && self.project_key.is_some() {
            return Err(ApiError::validation(
                "projectId",
                "cannot be combined with `projectKey`",
            ));
        }
        let project_scoped = self.project_id.is_some() || self.project_key.is_some();
        check_permission(&self.permission, project_scoped)
    }
}

/// Template selector: exactly one of `template_id` / `template_name`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateRef {
    #[serde(rename = "templateId", skip_serializing_if = "Option::is_none")]
    pub template_id: Option<String>,
    #[serde(rename = "templateName", skip_serializing_if = "Option::is_none")]
    pub template_name: Option<String>,
}

impl TemplateRef {
    /// Selects a template by name.
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            template_id: None,
            template_name: Some(name.into()),
        }
    }

    /// Selects a template by id.
    pub fn by_id(id: impl Into<String>) -> Self {
        Self {
            template_id: Some(id.into()),
            template_name: None,
        }
    }

    fn validate(&self) -> Result<(), ApiError> {
        check_one_of(
            "templateId",
            self.template_id.as_deref(),
            "templateName",
            self.template_name.as_deref(),
        )
    }

    fn as_pairs(&self) -> Vec<(&'static str, &str)> {
        let mut pairs = Vec::new();
        if let Some(id) = &self.template_id {
            pairs.push(("templateId", id.as_str()));
        }
        if let Some(name) = &self.template_name {
            pairs.push(("templateName", name.as_str()));
        }
        pairs
    }
}

/// Options for `api/permissions/create_template`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CreateTemplateOption {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Regular expression matched against project keys when a project is
    /// created.
    #[serde(rename = "projectKeyPattern", skip_serializing_if = "Option::is_none")]
    pub project_key_pattern: Option<String>,
}

impl CreateTemplateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("name", &self.name)?;
        check_key_pattern(self.project_key_pattern.as_deref())
    }
}

/// Options for `api/permissions/update_template`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateTemplateOption {
    /// Template id; updates cannot address templates by name.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "projectKeyPattern", skip_serializing_if = "Option::is_none")]
    pub project_key_pattern: Option<String>,
}

impl UpdateTemplateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        require("id", &self.id)?;
        check_key_pattern(self.project_key_pattern.as_deref())
    }
}

/// Options for `api/permissions/apply_template`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApplyTemplateOption {
    #[serde(flatten)]
    pub template: TemplateRef,
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(rename = "projectKey", skip_serializing_if = "Option::is_none")]
    pub project_key: Option<String>,
}

impl ApplyTemplateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        self.template.validate()?;
        check_one_of(
            "projectId",
            self.project_id.as_deref(),
            "projectKey",
            self.project_key.as_deref(),
        )
    }
}

/// Options for `api/permissions/bulk_apply_template`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BulkApplyTemplateOption {
    #[serde(flatten)]
    pub template: TemplateRef,
    /// Apply only to projects last analyzed before this datetime.
    #[serde(rename = "analyzedBefore", skip_serializing_if = "Option::is_none")]
    pub analyzed_before: Option<String>,
    /// Apply only to provisioned (never analyzed) projects.
    #[serde(rename = "onProvisionedOnly", skip_serializing_if = "Option::is_none")]
    pub on_provisioned_only: Option<bool>,
    /// Comma-separated project keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<String>,
    /// Query on project names and keys.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// Comma-separated qualifiers, `TRK` by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qualifiers: Option<String>,
}

impl BulkApplyTemplateOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        self.template.validate()?;
        if let Some(date) = &self.analyzed_before {
            check_date("analyzedBefore", date)?;
        }
        Ok(())
    }
}

/// A user grant inside a template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateUserOption {
    #[serde(flatten)]
    pub template: TemplateRef,
    pub login: String,
    /// See [`PROJECT_PERMISSIONS`].
    pub permission: String,
}

impl TemplateUserOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        self.template.validate()?;
        require("login", &self.login)?;
        check_permission(&self.permission, true)
    }
}

/// A group grant inside a template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct TemplateGroupOption {
    #[serde(flatten)]
    pub template: TemplateRef,
    #[serde(rename = "groupName")]
    pub group_name: String,
    /// See [`PROJECT_PERMISSIONS`].
    pub permission: String,
}

impl TemplateGroupOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        self.template.validate()?;
        require("groupName", &self.group_name)?;
        check_permission(&self.permission, true)
    }
}

/// Service for `api/permissions`. All actions require Administer System
/// permission, or Administer on the targeted project.
pub struct PermissionsService<'a> {
    client: &'a SonarClient,
}

impl<'a> PermissionsService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Grants a permission to a user.
    pub async fn add_user(&self, opt: &UserPermissionOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("permissions/add_user", opt).await
    }

    /// Removes a permission from a user.
    pub async fn remove_user(&self, opt: &UserPermissionOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("permissions/remove_user", opt).await
    }

    /// Grants a permission to a group.
    pub async fn add_group(&self, opt: &GroupPermissionOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client.post_empty("permissions/add_group", opt).await
    }

    /// Removes a permission from a group.
    pub async fn remove_group(&self, opt: &GroupPermissionOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client
            .post_empty("permissions/remove_group", opt)
            .await
    }

    /// Lists permission templates.
    pub async fn search_templates(
        &self,
        q: Option<&str>,
    ) -> Result<SearchTemplatesResult, ApiError> {
        let query: Vec<(&str, &str)> = match q {
            Some(q) => vec![("q", q)],
            None => vec![],
        };
        self.client.get("permissions/search_templates", &query).await
    }

    /// Creates a permission template.
    pub async fn create_template(
        &self,
        opt: &CreateTemplateOption,
    ) -> Result<CreatedTemplate, ApiError> {
        opt.validate()?;
        self.client.post("permissions/create_template", opt).await
    }

    /// Updates a permission template.
    pub async fn update_template(
        &self,
        opt: &UpdateTemplateOption,
    ) -> Result<CreatedTemplate, ApiError> {
        opt.validate()?;
        self.client.post("permissions/update_template", opt).await
    }

    /// Deletes a permission template.
    pub async fn delete_template(&self, template: &TemplateRef) -> Result<(), ApiError> {
        template.validate()?;
        self.client
            .post_empty("permissions/delete_template", &template.as_pairs())
            .await
    }

    /// Applies a template to one project, replacing its permissions.
    pub async fn apply_template(&self, opt: &ApplyTemplateOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client
            .post_empty("permissions/apply_template", opt)
            .await
    }

    /// Applies a template to every project matching the filters.
    pub async fn bulk_apply_template(
        &self,
        opt: &BulkApplyTemplateOption,
    ) -> Result<(), ApiError> {
        opt.validate()?;
        self.client
            .post_empty("permissions/bulk_apply_template", opt)
            .await
    }

    /// Adds a user grant to a template.
    pub async fn add_user_to_template(&self, opt: &TemplateUserOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client
            .post_empty("permissions/add_user_to_template", opt)
            .await
    }

    /// Removes a user grant from a template.
    pub async fn remove_user_from_template(
        &self,
        opt: &TemplateUserOption,
    ) -> Result<(), ApiError> {
        opt.validate()?;
        self.client
            .post_empty("permissions/remove_user_from_template", opt)
            .await
    }

    /// Adds a group grant to a template.
    pub async fn add_group_to_template(&self, opt: &TemplateGroupOption) -> Result<(), ApiError> {
        opt.validate()?;
        self.client
            .post_empty("permissions/add_group_to_template", opt)
            .await
    }

    /// Removes a group grant from a template.
    pub async fn remove_group_from_template(
        &self,
        opt: &TemplateGroupOption,
    ) -> Result<(), ApiError> {
        opt.validate()?;
        self.client
            .post_empty("permissions/remove_group_from_template", opt)
            .await
    }

    /// Grants a template permission to the future creator of matching
    /// projects.
    pub async fn add_project_creator_to_template(
        &self,
        template: &TemplateRef,
        permission: &str,
    ) -> Result<(), ApiError> {
        template.validate()?;
        check_permission(permission, true)?;
        let mut form = template.as_pairs();
        form.push(("permission", permission));
        self.client
            .post_empty("permissions/add_project_creator_to_template", &form)
            .await
    }

    /// Removes a project-creator grant from a template.
    pub async fn remove_project_creator_from_template(
        &self,
        template: &TemplateRef,
        permission: &str,
    ) -> Result<(), ApiError> {
        template.validate()?;
        check_permission(permission, true)?;
        let mut form = template.as_pairs();
        form.push(("permission", permission));
        self.client
            .post_empty("permissions/remove_project_creator_from_template", &form)
            .await
    }

    /// Sets a template as the default for newly created projects.
    pub async fn set_default_template(
        &self,
        template: &TemplateRef,
        qualifier: Option<&str>,
    ) -> Result<(), ApiError> {
        template.validate()?;
        let mut form = template.as_pairs();
        if let Some(qualifier) = qualifier {
            form.push(("qualifier", qualifier));
        }
        self.client
            .post_empty("permissions/set_default_template", &form)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_keys_depend_on_scope() {
        let global = UserPermissionOption {
            login: "jdoe".to_string(),
            permission: "provisioning".to_string(),
            ..Default::default()
        };
        assert!(global.validate().is_ok());

        // `provisioning` does not exist at project scope.
        let project = UserPermissionOption {
            login: "jdoe".to_string(),
            permission: "provisioning".to_string(),
            project_key: Some("demo".to_string()),
            ..Default::default()
        };
        assert!(project.validate().is_err());

        let project_ok = UserPermissionOption {
            login: "jdoe".to_string(),
            permission: "codeviewer".to_string(),
            project_key: Some("demo".to_string()),
            ..Default::default()
        };
        assert!(project_ok.validate().is_ok());
    }

    #[test]
    fn test_project_id_and_key_are_exclusive() {
        let both = GroupPermissionOption {
            group_name: "sonar-devs".to_string(),
            permission: "user".to_string(),
            project_id: Some("uuid".to_string()),
            project_key: Some("demo".to_string()),
        };
        assert!(both.validate().is_err());
    }

    #[test]
    fn test_template_key_pattern_must_compile() {
        let bad = CreateTemplateOption {
            name: "Mobile".to_string(),
            project_key_pattern: Some("(".to_string()),
            ..Default::default()
        };
        assert!(bad.validate().is_err());

        let ok = CreateTemplateOption {
            name: "Mobile".to_string(),
            project_key_pattern: Some(".*\\.mobile\\..*".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_apply_template_needs_template_and_project() {
        assert!(ApplyTemplateOption::default().validate().is_err());
        let ok = ApplyTemplateOption {
            template: TemplateRef::by_name("Default template"),
            project_key: Some("demo".to_string()),
            ..Default::default()
        };
        assert!(ok.validate().is_ok());
    }
}
