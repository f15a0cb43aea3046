//! Common API utilities and shared types

use serde::Deserialize;

use crate::models::ListParams;

/// Pagination query parameters.
///
/// `page` stays a raw string so that junk like `?page=abc` lands on page 1
/// instead of failing extraction.
#[derive(Debug, Default, Deserialize)]
pub struct PaginationQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub page_size: Option<u32>,
}

impl PaginationQuery {
    /// Resolve against the configured page size
    pub fn params(&self, default_page_size: u32) -> ListParams {
        ListParams::parse(
            self.page.as_deref(),
            self.page_size.unwrap_or(default_page_size),
        )
    }
}
