//
//  sonarqube-client
//  lib.rs
//

//! # SonarQube Client Library
//!
//! A typed async client for the [SonarQube Web API](https://docs.sonarqube.org/latest/extend/web-api/).
//!
//! ## Overview
//!
//! Every controller of the Web API (`api/projects`, `api/issues`, `api/ce`, …)
//! is bound as a service with one method per action. Each method takes a typed
//! option struct, validates it against the endpoint's documented constraints
//! *before* any network traffic, serializes it into a query string (GET) or a
//! form body (POST), dispatches the request, and deserializes the JSON
//! response into a typed result.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sonarqube_client::{SonarClient, Credential};
//! use sonarqube_client::api::projects::ProjectsSearchOption;
//!
//! # async fn example() -> Result<(), sonarqube_client::ApiError> {
//! let client = SonarClient::new("https://sonar.example.com")?
//!     .with_auth(Credential::token("squ_0123456789abcdef"));
//!
//! let page = client
//!     .projects()
//!     .search(&ProjectsSearchOption {
//!         q: Some("backend".to_string()),
//!         ..Default::default()
//!     })
//!     .await?;
//!
//! for project in &page.components {
//!     println!("{}  {}", project.key, project.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Authentication
//!
//! SonarQube accepts either a user token (sent as the basic-auth username
//! with an empty password) or a username/password pair. See [`Credential`].
//!
//! ## Errors
//!
//! All methods return [`ApiError`]. Parameter problems are caught locally as
//! [`ApiError::Validation`] without touching the network; non-2xx responses
//! are mapped per status with the server's own `errors[].msg` message.

/// API client implementation: the HTTP core plus one module per Web API
/// controller.
pub mod api;

pub use api::client::{Credential, SonarClient};
pub use api::common::ApiError;

/// Library version, derived from Cargo.toml at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
