//! Listing API endpoints
//!
//! Read-only JSON views of published listings:
//! - GET /api/v1/listings - paginated, newest first
//! - GET /api/v1/listings/search - filtered, not paginated
//! - GET /api/v1/listings/{id} - detail with realtor contact
//! - GET /api/v1/choices - search form option lists

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::api::common::PaginationQuery;
use crate::api::middleware::{ApiError, AppState};
use crate::api::responses::{ListingResponse, PaginatedListingsResponse, SearchResponse};
use crate::models::{ListingFilter, SearchChoices, SearchParams};

/// Build the listings router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_listings))
        .route("/search", get(search_listings))
        .route("/{id}", get(get_listing))
}

/// GET /api/v1/listings - List published listings with pagination
pub async fn list_listings(
    State(state): State<AppState>,
    Query(query): Query<PaginationQuery>,
) -> Result<Json<PaginatedListingsResponse>, ApiError> {
    let params = query.params(state.listings_config.per_page);
    let result = state.listing_service.list_published(&params).await?;
    Ok(Json(result.into()))
}

/// GET /api/v1/listings/search - Filter published listings
pub async fn search_listings(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let filter = ListingFilter::try_from(&params)?;
    let listings = state.listing_service.search(&filter).await?;
    Ok(Json(listings.into()))
}

/// GET /api/v1/listings/{id} - Get a published listing
pub async fn get_listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ListingResponse>, ApiError> {
    let id: i64 = id
        .parse()
        .map_err(|_| ApiError::not_found(format!("Listing not found: {}", id)))?;
    let listing = state.listing_service.get_published(id).await?;
    let realtor = state.realtor_service.get(listing.realtor_id).await.ok();
    Ok(Json(ListingResponse::from(listing).with_realtor(realtor)))
}

/// GET /api/v1/choices - Fixed option lists for the search form
pub async fn get_choices() -> Json<SearchChoices> {
    Json(SearchChoices::new())
}
