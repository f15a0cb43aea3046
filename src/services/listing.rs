//! Listing service
//!
//! Browsing, detail lookup and search over published listings.

use crate::db::repositories::ListingRepository;
use crate::models::{Listing, ListingFilter, ListParams, PagedResult};
use anyhow::Context;
use std::sync::Arc;

/// Error types for listing service operations
#[derive(Debug, thiserror::Error)]
pub enum ListingServiceError {
    #[error("Listing not found: {0}")]
    NotFound(i64),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct ListingService {
    repo: Arc<dyn ListingRepository>,
}

impl ListingService {
    pub fn new(repo: Arc<dyn ListingRepository>) -> Self {
        Self { repo }
    }

    /// One page of published listings, newest first.
    ///
    /// A page past the end yields an empty page with the real total, so the
    /// caller can still render navigation.
    pub async fn list_published(
        &self,
        params: &ListParams,
    ) -> Result<PagedResult<Listing>, ListingServiceError> {
        let total = self
            .repo
            .count_published()
            .await
            .context("Failed to count published listings")?;

        let listings = if params.offset() >= total {
            Vec::new()
        } else {
            self.repo
                .list_published(params.offset(), params.limit())
                .await
                .context("Failed to list published listings")?
        };

        Ok(PagedResult::new(listings, total, params))
    }

    /// Get a listing that is visible to the public.
    ///
    /// Unpublished listings are reported as not found so their existence
    /// does not leak.
    pub async fn get_published(&self, id: i64) -> Result<Listing, ListingServiceError> {
        let listing = self
            .repo
            .get_by_id(id)
            .await
            .context("Failed to get listing by ID")?;

        match listing {
            Some(listing) if listing.is_published => Ok(listing),
            _ => Err(ListingServiceError::NotFound(id)),
        }
    }

    /// The most recent published listings for the home page
    pub async fn latest(&self, count: u32) -> Result<Vec<Listing>, ListingServiceError> {
        let listings = self
            .repo
            .latest_published(i64::from(count))
            .await
            .context("Failed to load latest listings")?;
        Ok(listings)
    }

    /// Published listings matching every present criterion, newest first
    pub async fn search(&self, filter: &ListingFilter) -> Result<Vec<Listing>, ListingServiceError> {
        tracing::debug!(?filter, "Searching listings");
        let listings = self
            .repo
            .search(filter)
            .await
            .context("Failed to search listings")?;
        Ok(listings)
    }
}
