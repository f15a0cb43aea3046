//! Realtor service

use crate::db::repositories::RealtorRepository;
use crate::models::Realtor;
use anyhow::Context;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum RealtorServiceError {
    #[error("Realtor not found: {0}")]
    NotFound(i64),

    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

pub struct RealtorService {
    repo: Arc<dyn RealtorRepository>,
}

impl RealtorService {
    pub fn new(repo: Arc<dyn RealtorRepository>) -> Self {
        Self { repo }
    }

    pub async fn get(&self, id: i64) -> Result<Realtor, RealtorServiceError> {
        self.repo
            .get_by_id(id)
            .await
            .context("Failed to get realtor")?
            .ok_or(RealtorServiceError::NotFound(id))
    }

    /// Everyone on the team, most recent hire first
    pub async fn list(&self) -> Result<Vec<Realtor>, RealtorServiceError> {
        Ok(self.repo.list().await.context("Failed to list realtors")?)
    }

    /// Sellers of the month
    pub async fn list_mvp(&self) -> Result<Vec<Realtor>, RealtorServiceError> {
        Ok(self
            .repo
            .list_mvp()
            .await
            .context("Failed to list MVP realtors")?)
    }
}
