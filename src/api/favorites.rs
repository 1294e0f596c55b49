//
//  sonarqube-client
//  api/favorites.rs
//

//! Favorite components of the authenticated user (`api/favorites`).

use serde::{Deserialize, Serialize};

use super::client::SonarClient;
use super::common::{check_page_size, require, ApiError, Paging};

/// A favorited component.
#[derive(Debug, Clone, Deserialize)]
pub struct Favorite {
    pub key: String,
    pub name: String,
    pub qualifier: String,
    #[serde(default)]
    pub organization: Option<String>,
}

/// Response of `api/favorites/search`.
#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesSearchResult {
    pub paging: Paging,
    pub favorites: Vec<Favorite>,
}

/// Options for `api/favorites/search`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FavoritesSearchOption {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<u32>,
    /// Page size, at most 500.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ps: Option<u32>,
}

impl FavoritesSearchOption {
    /// Validates the options against the endpoint's constraints.
    pub fn validate(&self) -> Result<(), ApiError> {
        check_page_size("ps", self.ps)
    }
}

/// Service for `api/favorites`.
pub struct FavoritesService<'a> {
    client: &'a SonarClient,
}

impl<'a> FavoritesService<'a> {
    pub(crate) fn new(client: &'a SonarClient) -> Self {
        Self { client }
    }

    /// Adds a component to the authenticated user's favorites.
    pub async fn add(&self, component: &str) -> Result<(), ApiError> {
        require("component", component)?;
        self.client
            .post_empty("favorites/add", &[("component", component)])
            .await
    }

    /// Removes a component from the authenticated user's favorites.
    pub async fn remove(&self, component: &str) -> Result<(), ApiError> {
        require("component", component)?;
        self.client
            .post_empty("favorites/remove", &[("component", component)])
            .await
    }

    /// Lists the authenticated user's favorites.
    pub async fn search(
        &self,
        opt: &FavoritesSearchOption,
    ) -> Result<FavoritesSearchResult, ApiError> {
        opt.validate()?;
        self.client.get("favorites/search", opt).await
    }
}
