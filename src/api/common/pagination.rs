//
//  sonarqube-client
//  api/common/pagination.rs
//

//! Pagination Types for SonarQube API Responses
//!
//! Paginated actions accept `p` (1-indexed page) and `ps` (page size, at most
//! 500) parameters and return a `paging` block alongside the items. This
//! module provides the typed mirror of that block.
//!
//! # Example
//!
//! ```rust
//! use sonarqube_client::api::common::Paging;
//!
//! let json = r#"{"pageIndex": 2, "pageSize": 100, "total": 250}"#;
//! let paging: Paging = serde_json::from_str(json).unwrap();
//!
//! assert!(paging.has_next());
//! assert_eq!(paging.next_page(), Some(3));
//! ```

use serde::{Deserialize, Serialize};

/// Page metadata returned by paginated actions.
///
/// # Fields
///
/// | Field | Description |
/// |-------|-------------|
/// | `page_index` | Current page number (1-indexed) |
/// | `page_size` | Number of items per page |
/// | `total` | Total number of items across all pages |
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paging {
    /// Current page number (1-indexed). The first page is page 1.
    #[serde(rename = "pageIndex", default)]
    pub page_index: u32,

    /// Number of items per page as applied by the server.
    #[serde(rename = "pageSize", default)]
    pub page_size: u32,

    /// Total number of items matching the query.
    #[serde(default)]
    pub total: u64,
}

impl Paging {
    /// Returns `true` if pages beyond the current one exist.
    pub fn has_next(&self) -> bool {
        u64::from(self.page_index) * u64::from(self.page_size) < self.total
    }

    /// Returns the `p` value for the next page, or `None` on the last page.
    pub fn next_page(&self) -> Option<u32> {
        self.has_next().then(|| self.page_index + 1)
    }
}
