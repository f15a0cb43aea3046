//! Inquiry API endpoints
//!
//! - POST /api/v1/inquiries - submit an inquiry (201, 400, 404 or 409)
//! - GET /api/v1/inquiries?user_id= - inquiries of one identified user

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query, State,
    },
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::InquiryResponse;
use crate::models::CreateInquiryInput;

/// Request body for submitting an inquiry
#[derive(Debug, Deserialize)]
pub struct CreateInquiryRequest {
    pub listing_id: i64,
    /// Listing title; filled in from the listing when left empty
    #[serde(default)]
    pub listing: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    /// Omitted or 0 for anonymous visitors
    #[serde(default)]
    pub user_id: i64,
}

impl From<CreateInquiryRequest> for CreateInquiryInput {
    fn from(req: CreateInquiryRequest) -> Self {
        CreateInquiryInput {
            listing_id: req.listing_id,
            listing: req.listing.trim().to_string(),
            name: req.name,
            email: req.email,
            phone: req.phone,
            message: req.message,
            user_id: req.user_id,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UserInquiriesQuery {
    pub user_id: i64,
}

/// Build the inquiries router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(list_user_inquiries).post(create_inquiry))
}

/// POST /api/v1/inquiries - Submit an inquiry
pub async fn create_inquiry(
    State(state): State<AppState>,
    body: Result<Json<CreateInquiryRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<InquiryResponse>), ApiError> {
    let Json(body) = body?;
    let inquiry = state.inquiry_service.submit(body.into()).await?;
    Ok((StatusCode::CREATED, Json(inquiry.into())))
}

/// GET /api/v1/inquiries?user_id= - List one user's inquiries, newest first
pub async fn list_user_inquiries(
    State(state): State<AppState>,
    query: Result<Query<UserInquiriesQuery>, QueryRejection>,
) -> Result<Json<Vec<InquiryResponse>>, ApiError> {
    let Query(query) = query?;
    if query.user_id <= 0 {
        return Err(ApiError::validation_error(
            "user_id must identify a registered user",
        ));
    }
    let inquiries = state.inquiry_service.list_by_user(query.user_id).await?;
    Ok(Json(inquiries.into_iter().map(Into::into).collect()))
}
