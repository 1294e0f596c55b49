//
//  sonarqube-client
//  api/mod.rs
//

//! # API Client Layer
//!
//! One module per Web API controller, plus the HTTP core and shared types.
//!
//! ## Architecture
//!
//! - [`client`]: the [`SonarClient`] HTTP core (auth, serialization, error
//!   mapping) and the per-controller accessor methods
//! - [`common`]: [`ApiError`], [`Paging`](common::Paging), and the local
//!   parameter checks every option struct runs before dispatch
//! - the remaining modules each bind one controller: option structs in,
//!   typed responses out
//!
//! ## Usage
//!
//! ```rust,no_run
//! use sonarqube_client::{Credential, SonarClient};
//!
//! # async fn example() -> Result<(), sonarqube_client::ApiError> {
//! let client = SonarClient::new("https://sonar.example.com")?
//!     .with_auth(Credential::token("squ_0123456789abcdef"));
//!
//! let version = client.server().version().await?;
//! println!("server {version}");
//! # Ok(())
//! # }
//! ```

/// Core HTTP client: authentication, request dispatch, error mapping.
pub mod client;

/// Shared types: errors, paging, parameter checks.
pub mod common;

pub mod ce;
pub mod components;
pub mod duplications;
pub mod favorites;
pub mod issues;
pub mod languages;
pub mod measures;
pub mod metrics;
pub mod notifications;
pub mod permissions;
pub mod plugins;
pub mod project_analyses;
pub mod project_badges;
pub mod project_branches;
pub mod project_links;
pub mod project_tags;
pub mod projects;
pub mod qualitygates;
pub mod qualityprofiles;
pub mod rules;
pub mod server;
pub mod settings;
pub mod sources;
pub mod system;
pub mod user_groups;
pub mod user_tokens;
pub mod users;
pub mod webhooks;

pub use client::SonarClient;
pub use common::ApiError;
