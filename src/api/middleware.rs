//! Shared request state and the JSON error type
//!
//! `AppState` is cloned into every handler, HTML and JSON alike. `ApiError`
//! is the error body of the `/api/v1` endpoints; its code decides the status.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::config::ListingsConfig;
use crate::db::repositories::{
    SqlxInquiryRepository, SqlxListingRepository, SqlxRealtorRepository,
};
use crate::db::DynDatabasePool;
use crate::models::ValidationError;
use crate::services::{
    InquiryService, InquiryServiceError, ListingService, ListingServiceError, RealtorService,
    RealtorServiceError,
};
use crate::theme::ThemeEngine;

/// Application state containing shared services
#[derive(Clone)]
pub struct AppState {
    pub listing_service: Arc<ListingService>,
    pub inquiry_service: Arc<InquiryService>,
    pub realtor_service: Arc<RealtorService>,
    pub theme_engine: Arc<ThemeEngine>,
    pub listings_config: Arc<ListingsConfig>,
}

impl AppState {
    /// Wire the sqlx repositories and services over one pool
    pub fn new(pool: DynDatabasePool, theme_engine: ThemeEngine, listings_config: ListingsConfig) -> Self {
        let listing_repo = SqlxListingRepository::boxed(pool.clone());
        let inquiry_repo = SqlxInquiryRepository::boxed(pool.clone());
        let realtor_repo = SqlxRealtorRepository::boxed(pool);

        Self {
            listing_service: Arc::new(ListingService::new(listing_repo.clone())),
            inquiry_service: Arc::new(InquiryService::new(inquiry_repo, listing_repo)),
            realtor_service: Arc::new(RealtorService::new(realtor_repo)),
            theme_engine: Arc::new(theme_engine),
            listings_config: Arc::new(listings_config),
        }
    }
}

/// Error response for API errors
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: Some(details),
            },
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new("NOT_FOUND", message)
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new("CONFLICT", message)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::new("INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        match self.error.code.as_str() {
            "NOT_FOUND" => StatusCode::NOT_FOUND,
            "VALIDATION_ERROR" => StatusCode::BAD_REQUEST,
            "CONFLICT" => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::with_details(
            "VALIDATION_ERROR",
            err.to_string(),
            serde_json::json!({ "field": err.field }),
        )
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

impl From<ListingServiceError> for ApiError {
    fn from(err: ListingServiceError) -> Self {
        match err {
            ListingServiceError::NotFound(_) => Self::not_found(err.to_string()),
            ListingServiceError::InternalError(e) => {
                tracing::error!("Listing request failed: {:#}", e);
                Self::internal_error("Internal server error")
            }
        }
    }
}

impl From<RealtorServiceError> for ApiError {
    fn from(err: RealtorServiceError) -> Self {
        match err {
            RealtorServiceError::NotFound(_) => Self::not_found(err.to_string()),
            RealtorServiceError::InternalError(e) => {
                tracing::error!("Realtor request failed: {:#}", e);
                Self::internal_error("Internal server error")
            }
        }
    }
}

impl From<InquiryServiceError> for ApiError {
    fn from(err: InquiryServiceError) -> Self {
        match err {
            InquiryServiceError::NotFound(_) => Self::not_found(err.to_string()),
            InquiryServiceError::ValidationError(e) => e.into(),
            InquiryServiceError::DuplicateInquiry { .. } => {
                Self::conflict("You have already made an inquiry for this listing")
            }
            InquiryServiceError::InternalError(e) => {
                tracing::error!("Inquiry request failed: {:#}", e);
                Self::internal_error("Internal server error")
            }
        }
    }
}
