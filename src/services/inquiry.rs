//! Inquiry service
//!
//! Accepts inquiries about published listings. An identified user (user id
//! above zero) may send one inquiry per listing; anonymous visitors may send
//! any number.
//!
//! The existence check gives a friendly rejection in the common case. Two
//! concurrent submissions can both pass it, so the insert itself is guarded
//! by a unique index and a violation is reported as the same duplicate.

use crate::db::repositories::{is_unique_violation, InquiryRepository, ListingRepository};
use crate::models::{CreateInquiryInput, Inquiry, ValidationError};
use anyhow::Context;
use std::sync::Arc;

/// Error types for inquiry service operations
#[derive(Debug, thiserror::Error)]
pub enum InquiryServiceError {
    #[error("Listing not found: {0}")]
    NotFound(i64),

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),

    #[error("User {user_id} has already made an inquiry for listing {listing_id}")]
    DuplicateInquiry { listing_id: i64, user_id: i64 },

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct InquiryService {
    repo: Arc<dyn InquiryRepository>,
    listing_repo: Arc<dyn ListingRepository>,
}

impl InquiryService {
    pub fn new(repo: Arc<dyn InquiryRepository>, listing_repo: Arc<dyn ListingRepository>) -> Self {
        Self { repo, listing_repo }
    }

    /// Reject an identified user who already asked about this listing.
    ///
    /// Anonymous requests (user id <= 0) always pass.
    pub async fn check_duplicate(
        &self,
        listing_id: i64,
        user_id: i64,
    ) -> Result<(), InquiryServiceError> {
        if user_id <= 0 {
            return Ok(());
        }
        let exists = self
            .repo
            .exists(listing_id, user_id)
            .await
            .context("Failed to check for an existing inquiry")?;
        if exists {
            return Err(InquiryServiceError::DuplicateInquiry { listing_id, user_id });
        }
        Ok(())
    }

    /// Check the listing, then validate, deduplicate and store an inquiry
    pub async fn submit(&self, mut input: CreateInquiryInput) -> Result<Inquiry, InquiryServiceError> {
        let listing = self
            .listing_repo
            .get_by_id(input.listing_id)
            .await
            .context("Failed to look up listing for inquiry")?
            .filter(|listing| listing.is_published)
            .ok_or(InquiryServiceError::NotFound(input.listing_id))?;

        input.validate()?;

        if input.listing.is_empty() {
            input.listing = listing.title;
        }

        if let Err(err) = self.check_duplicate(input.listing_id, input.user_id).await {
            if matches!(err, InquiryServiceError::DuplicateInquiry { .. }) {
                tracing::warn!(
                    listing_id = input.listing_id,
                    user_id = input.user_id,
                    "Rejected duplicate inquiry"
                );
            }
            return Err(err);
        }

        let inquiry = match self.repo.create(&input).await {
            Ok(inquiry) => inquiry,
            Err(err) if is_unique_violation(&err) => {
                tracing::warn!(
                    listing_id = input.listing_id,
                    user_id = input.user_id,
                    "Concurrent duplicate inquiry rejected by constraint"
                );
                return Err(InquiryServiceError::DuplicateInquiry {
                    listing_id: input.listing_id,
                    user_id: input.user_id,
                });
            }
            Err(err) => return Err(err.context("Failed to store inquiry").into()),
        };

        tracing::info!(
            inquiry_id = inquiry.id,
            listing_id = inquiry.listing_id,
            anonymous = inquiry.is_anonymous(),
            "Inquiry submitted"
        );
        Ok(inquiry)
    }

    /// Inquiries made by one identified user, newest first
    pub async fn list_by_user(&self, user_id: i64) -> Result<Vec<Inquiry>, InquiryServiceError> {
        let inquiries = self
            .repo
            .list_by_user(user_id)
            .await
            .context("Failed to list inquiries")?;
        Ok(inquiries)
    }
}
