//
//  sonarqube-client
//  api/client.rs
//

//! # HTTP Client Core for the SonarQube API
//!
//! This module provides the core HTTP client every service binding dispatches
//! through. It handles base-URL normalization, authentication header
//! injection, query/form serialization, and response error mapping.
//!
//! ## Features
//!
//! - Token or username/password authentication (both via HTTP basic auth)
//! - JSON deserialization into typed results
//! - Text passthrough for the few non-JSON endpoints (sources, backups, badges)
//! - Error mapping from SonarQube's `{"errors":[{"msg":"…"}]}` payloads

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::common::ApiError;
use super::{
    ce::CeService, components::ComponentsService, duplications::DuplicationsService,
    favorites::FavoritesService, issues::IssuesService, languages::LanguagesService,
    measures::MeasuresService, metrics::MetricsService, notifications::NotificationsService,
    permissions::PermissionsService, plugins::PluginsService,
    project_analyses::ProjectAnalysesService, project_badges::ProjectBadgesService,
    project_branches::ProjectBranchesService, project_links::ProjectLinksService,
    project_tags::ProjectTagsService, projects::ProjectsService,
    qualitygates::QualityGatesService, qualityprofiles::QualityProfilesService,
    rules::RulesService, server::ServerService, settings::SettingsService,
    sources::SourcesService, system::SystemService, user_groups::UserGroupsService,
    user_tokens::UserTokensService, users::UsersService, webhooks::WebhooksService,
};

/// Parses a SonarQube error response body and extracts the messages.
///
/// SonarQube returns errors in the format:
/// ```json
/// {"errors": [{"msg": "Project key already exists"}]}
/// ```
///
/// Multiple messages are joined with `"; "`. If the body does not match that
/// shape, the raw body is returned (trimmed), or the status reason when the
/// body is empty.
pub fn parse_error_body(status: StatusCode, body: &str) -> String {
    if let Ok(json) = serde_json::from_str::<serde_json::Value>(body) {
        if let Some(errors) = json.get("errors").and_then(|e| e.as_array()) {
            let messages: Vec<&str> = errors
                .iter()
                .filter_map(|e| e.get("msg").and_then(|m| m.as_str()))
                .collect();
            if !messages.is_empty() {
                return messages.join("; ");
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string()
    } else {
        trimmed.to_string()
    }
}

/// Authentication credentials for a SonarQube instance.
///
/// SonarQube authenticates every Web API request with HTTP basic auth. A user
/// token is sent as the username with an empty password; the classic
/// username/password pair is sent as-is.
///
/// # Example
///
/// ```rust
/// use sonarqube_client::Credential;
///
/// let by_token = Credential::token("squ_0123456789abcdef");
/// let by_login = Credential::basic("admin", "admin");
/// ```
#[derive(Debug, Clone)]
pub enum Credential {
    /// A user token generated via `api/user_tokens/generate` or the UI.
    Token(String),

    /// A username/password pair.
    Basic {
        /// The SonarQube login.
        username: String,
        /// The account password.
        password: String,
    },
}

impl Credential {
    /// Builds a token credential.
    pub fn token(token: impl Into<String>) -> Self {
        Self::Token(token.into())
    }

    /// Builds a username/password credential.
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Applies this credential to a request builder.
    pub(crate) fn apply_to_request(&self, request: RequestBuilder) -> RequestBuilder {
        match self {
            Self::Token(token) => request.basic_auth(token, None::<&str>),
            Self::Basic { username, password } => request.basic_auth(username, Some(password)),
        }
    }
}

/// The main HTTP client for the SonarQube Web API.
///
/// The client owns a connection-pooled [`reqwest::Client`], the normalized
/// base URL of the server, and optional credentials. Per-controller service
/// values are obtained from the accessor methods (`projects()`, `issues()`,
/// …) and borrow the client, so one client serves any number of calls.
///
/// # Creating a Client
///
/// ```rust,no_run
/// use sonarqube_client::{Credential, SonarClient};
///
/// let client = SonarClient::new("https://sonar.example.com")?
///     .with_auth(Credential::token("squ_0123456789abcdef"));
/// # Ok::<(), sonarqube_client::ApiError>(())
/// ```
///
/// Or from the environment (`SONAR_URL` plus either `SONAR_TOKEN` or
/// `SONAR_USER`/`SONAR_PASSWORD`):
///
/// ```rust,no_run
/// use sonarqube_client::SonarClient;
///
/// let client = SonarClient::from_env()?;
/// # Ok::<(), sonarqube_client::ApiError>(())
/// ```
pub struct SonarClient {
    /// The underlying HTTP client.
    http: Client,
    /// Server base URL without a trailing slash (e.g. `https://sonar.example.com`).
    base: String,
    /// Optional authentication credentials.
    auth: Option<Credential>,
}

impl SonarClient {
    /// Creates a new client for the server at `base_url`.
    ///
    /// The URL must be absolute http(s); a trailing slash is stripped. The
    /// `api/` segment is appended per request, so pass the server root
    /// (`https://sonar.example.com`), not `…/api`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when `base_url` is not an absolute
    /// http(s) URL, or [`ApiError::Network`] if the HTTP client cannot be
    /// constructed.
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let parsed = Url::parse(base_url).map_err(|e| {
            ApiError::validation("base_url", format!("is not a valid URL: {e}"))
        })?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(ApiError::validation(
                "base_url",
                format!("must be an http(s) URL, got scheme `{}`", parsed.scheme()),
            ));
        }

        Ok(Self {
            http: Client::builder()
                .user_agent(format!("sonarqube-client/{}", crate::VERSION))
                .build()?,
            base: base_url.trim_end_matches('/').to_string(),
            auth: None,
        })
    }

    /// Creates a client from the environment.
    ///
    /// Reads `SONAR_URL` for the server address and, when present,
    /// `SONAR_TOKEN` (preferred) or the `SONAR_USER`/`SONAR_PASSWORD` pair
    /// for credentials.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Validation`] when `SONAR_URL` is unset or invalid.
    pub fn from_env() -> Result<Self, ApiError> {
        let base_url = std::env::var("SONAR_URL")
            .map_err(|_| ApiError::validation("SONAR_URL", "environment variable is not set"))?;
        let client = Self::new(&base_url)?;

        if let Ok(token) = std::env::var("SONAR_TOKEN") {
            return Ok(client.with_auth(Credential::token(token)));
        }
        if let (Ok(user), Ok(password)) =
            (std::env::var("SONAR_USER"), std::env::var("SONAR_PASSWORD"))
        {
            return Ok(client.with_auth(Credential::basic(user, password)));
        }
        Ok(client)
    }

    /// Sets the authentication credentials for this client.
    pub fn with_auth(mut self, auth: Credential) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Returns the server base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.auth {
            Some(auth) => auth.apply_to_request(request),
            None => request,
        }
    }

    async fn check(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = parse_error_body(status, &body);
        tracing::debug!(status = %status, message = %message, "request rejected");

        Err(match status {
            StatusCode::BAD_REQUEST => ApiError::BadRequest(message),
            StatusCode::UNAUTHORIZED => ApiError::AuthRequired,
            StatusCode::FORBIDDEN => ApiError::Forbidden(message),
            StatusCode::NOT_FOUND => ApiError::NotFound(message),
            s if s.is_server_error() => ApiError::ServerError {
                status: s.as_u16(),
                message,
            },
            s => ApiError::Unexpected {
                status: s.as_u16(),
                message,
            },
        })
    }

    /// Makes a GET request to `api/<path>` with `query` serialized into the
    /// query string, deserializing the JSON response into `T`.
    pub async fn get<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(method = "GET", %url, "dispatching request");

        let request = self.apply_auth(self.http.get(&url).query(query));
        let response = self.check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Makes a GET request and returns the raw response body as text.
    ///
    /// Used by the endpoints that do not answer with JSON: raw sources,
    /// quality profile backups, badges (SVG), system logs.
    pub async fn get_text<Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<String, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(method = "GET", %url, "dispatching request");

        let request = self.apply_auth(self.http.get(&url).query(query));
        let response = self.check(request.send().await?).await?;
        Ok(response.text().await?)
    }

    /// Makes a POST request to `api/<path>` with `form` serialized as an
    /// `application/x-www-form-urlencoded` body, deserializing the JSON
    /// response into `T`.
    pub async fn post<T: DeserializeOwned, F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> Result<T, ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(method = "POST", %url, "dispatching request");

        let request = self.apply_auth(self.http.post(&url).form(form));
        let response = self.check(request.send().await?).await?;
        Ok(response.json().await?)
    }

    /// Makes a POST request, discarding the response body.
    ///
    /// Most mutating SonarQube actions answer `204 No Content`; this helper
    /// covers them (and ignores a body if one is returned).
    pub async fn post_empty<F: Serialize + ?Sized>(
        &self,
        path: &str,
        form: &F,
    ) -> Result<(), ApiError> {
        let url = self.endpoint(path);
        tracing::debug!(method = "POST", %url, "dispatching request");

        let request = self.apply_auth(self.http.post(&url).form(form));
        self.check(request.send().await?).await?;
        Ok(())
    }

    // Per-controller accessors.

    /// Compute Engine task queue and history (`api/ce`).
    pub fn ce(&self) -> CeService<'_> {
        CeService::new(self)
    }

    /// Component search and navigation (`api/components`).
    pub fn components(&self) -> ComponentsService<'_> {
        ComponentsService::new(self)
    }

    /// Duplicated-code blocks (`api/duplications`).
    pub fn duplications(&self) -> DuplicationsService<'_> {
        DuplicationsService::new(self)
    }

    /// Favorite components of the authenticated user (`api/favorites`).
    pub fn favorites(&self) -> FavoritesService<'_> {
        FavoritesService::new(self)
    }

    /// Issue search and life cycle (`api/issues`).
    pub fn issues(&self) -> IssuesService<'_> {
        IssuesService::new(self)
    }

    /// Supported languages (`api/languages`).
    pub fn languages(&self) -> LanguagesService<'_> {
        LanguagesService::new(self)
    }

    /// Component measures and history (`api/measures`).
    pub fn measures(&self) -> MeasuresService<'_> {
        MeasuresService::new(self)
    }

    /// Metric definitions (`api/metrics`).
    pub fn metrics(&self) -> MetricsService<'_> {
        MetricsService::new(self)
    }

    /// Notification subscriptions (`api/notifications`).
    pub fn notifications(&self) -> NotificationsService<'_> {
        NotificationsService::new(self)
    }

    /// Permissions and permission templates (`api/permissions`).
    pub fn permissions(&self) -> PermissionsService<'_> {
        PermissionsService::new(self)
    }

    /// Plugin installation and updates (`api/plugins`).
    pub fn plugins(&self) -> PluginsService<'_> {
        PluginsService::new(self)
    }

    /// Project analyses and analysis events (`api/project_analyses`).
    pub fn project_analyses(&self) -> ProjectAnalysesService<'_> {
        ProjectAnalysesService::new(self)
    }

    /// Project badges (`api/project_badges`).
    pub fn project_badges(&self) -> ProjectBadgesService<'_> {
        ProjectBadgesService::new(self)
    }

    /// Project branches (`api/project_branches`).
    pub fn project_branches(&self) -> ProjectBranchesService<'_> {
        ProjectBranchesService::new(self)
    }

    /// Project links (`api/project_links`).
    pub fn project_links(&self) -> ProjectLinksService<'_> {
        ProjectLinksService::new(self)
    }

    /// Project tags (`api/project_tags`).
    pub fn project_tags(&self) -> ProjectTagsService<'_> {
        ProjectTagsService::new(self)
    }

    /// Project administration (`api/projects`).
    pub fn projects(&self) -> ProjectsService<'_> {
        ProjectsService::new(self)
    }

    /// Quality gates (`api/qualitygates`).
    pub fn quality_gates(&self) -> QualityGatesService<'_> {
        QualityGatesService::new(self)
    }

    /// Quality profiles (`api/qualityprofiles`).
    pub fn quality_profiles(&self) -> QualityProfilesService<'_> {
        QualityProfilesService::new(self)
    }

    /// Coding rules (`api/rules`).
    pub fn rules(&self) -> RulesService<'_> {
        RulesService::new(self)
    }

    /// Server version (`api/server`).
    pub fn server(&self) -> ServerService<'_> {
        ServerService::new(self)
    }

    /// Global and component settings (`api/settings`).
    pub fn settings(&self) -> SettingsService<'_> {
        SettingsService::new(self)
    }

    /// Source code access (`api/sources`).
    pub fn sources(&self) -> SourcesService<'_> {
        SourcesService::new(self)
    }

    /// System administration and monitoring (`api/system`).
    pub fn system(&self) -> SystemService<'_> {
        SystemService::new(self)
    }

    /// Group administration (`api/user_groups`).
    pub fn user_groups(&self) -> UserGroupsService<'_> {
        UserGroupsService::new(self)
    }

    /// User token administration (`api/user_tokens`).
    pub fn user_tokens(&self) -> UserTokensService<'_> {
        UserTokensService::new(self)
    }

    /// User administration (`api/users`).
    pub fn users(&self) -> UsersService<'_> {
        UsersService::new(self)
    }

    /// Webhook administration (`api/webhooks`).
    pub fn webhooks(&self) -> WebhooksService<'_> {
        WebhooksService::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::projects::{ProjectsCreateOption, ProjectsSearchOption};

    #[test]
    fn test_parse_error_body() {
        let body = r#"{"errors":[{"msg":"Project key already exists"}]}"#;
        assert_eq!(
            parse_error_body(StatusCode::BAD_REQUEST, body),
            "Project key already exists"
        );

        let multi = r#"{"errors":[{"msg":"one"},{"msg":"two"}]}"#;
        assert_eq!(parse_error_body(StatusCode::BAD_REQUEST, multi), "one; two");

        assert_eq!(
            parse_error_body(StatusCode::BAD_GATEWAY, "plain text"),
            "plain text"
        );
        assert_eq!(parse_error_body(StatusCode::NOT_FOUND, ""), "Not Found");
    }

    #[test]
    fn test_base_url_normalization() {
        let client = SonarClient::new("https://sonar.example.com/").unwrap();
        assert_eq!(client.base_url(), "https://sonar.example.com");
        assert_eq!(
            client.endpoint("projects/search"),
            "https://sonar.example.com/api/projects/search"
        );

        assert!(SonarClient::new("not a url").is_err());
        assert!(SonarClient::new("ftp://example.com").is_err());
    }

    #[tokio::test]
    async fn test_get_serializes_query_and_auth_header() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/projects/search")
            .match_query(mockito::Matcher::UrlEncoded("q".into(), "demo".into()))
            // base64("squ_test:") - token as basic-auth username, empty password
            .match_header("authorization", "Basic c3F1X3Rlc3Q6")
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"paging":{"pageIndex":1,"pageSize":100,"total":1},
                    "components":[{"key":"demo","name":"Demo","qualifier":"TRK"}]}"#,
            )
            .create_async()
            .await;

        let client = SonarClient::new(&server.url())
            .unwrap()
            .with_auth(Credential::token("squ_test"));
        let page = client
            .projects()
            .search(&ProjectsSearchOption {
                q: Some("demo".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(page.components.len(), 1);
        assert_eq!(page.components[0].key, "demo");
        assert_eq!(page.paging.total, 1);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_post_serializes_form_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/api/projects/create")
            .match_header(
                "content-type",
                "application/x-www-form-urlencoded",
            )
            .match_body(mockito::Matcher::AllOf(vec![
                mockito::Matcher::UrlEncoded("project".into(), "demo".into()),
                mockito::Matcher::UrlEncoded("name".into(), "Demo".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"project":{"key":"demo","name":"Demo","qualifier":"TRK","visibility":"public"}}"#,
            )
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        let created = client
            .projects()
            .create(&ProjectsCreateOption {
                project: "demo".to_string(),
                name: "Demo".to_string(),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(created.project.key, "demo");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_status_mapping() {
        let mut server = mockito::Server::new_async().await;
        let _bad = server
            .mock("GET", "/api/projects/search")
            .with_status(400)
            .with_body(r#"{"errors":[{"msg":"Page size must not exceed 500"}]}"#)
            .create_async()
            .await;

        let client = SonarClient::new(&server.url()).unwrap();
        let err = client
            .projects()
            .search(&ProjectsSearchOption::default())
            .await
            .unwrap_err();
        match err {
            ApiError::BadRequest(msg) => assert_eq!(msg, "Page size must not exceed 500"),
            other => panic!("expected BadRequest, got {other:?}"),
        }

        let _unauthorized = server
            .mock("GET", "/api/projects/search")
            .with_status(401)
            .create_async()
            .await;
        let err = client
            .projects()
            .search(&ProjectsSearchOption::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::AuthRequired));
    }

    #[tokio::test]
    async fn test_validation_error_skips_network() {
        // Deliberately unroutable address: a validation failure must be
        // raised before any connection attempt.
        let client = SonarClient::new("http://127.0.0.1:1").unwrap();
        let err = client
            .projects()
            .search(&ProjectsSearchOption {
                ps: Some(9999),
                ..Default::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation { field: "ps", .. }));
    }
}
