//! Listing pages: browse, detail and search

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tera::Context as TeraContext;

use crate::api::middleware::AppState;
use crate::models::{ListParams, ListingFilter, SearchParams};
use crate::web::flash::{self, Flash};
use crate::web::{insert_search_form, render_page, PageError};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Kept raw; anything that is not a positive number means page 1
    #[serde(default)]
    pub page: Option<String>,
}

/// GET /listings?page= - published listings, newest first
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, PageError> {
    let params = ListParams::parse(query.page.as_deref(), state.listings_config.per_page);
    let page = state.listing_service.list_published(&params).await?;

    let mut context = TeraContext::new();
    context.insert("page", &page.meta());
    context.insert("listings", &page.items);
    render_page(&state.theme_engine, "listings/listings.html", &context)
}

/// GET /listings/{id} - one listing, its realtor and the inquiry form
pub async fn listing(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, PageError> {
    let id: i64 = id.parse().map_err(|_| PageError::NotFound)?;
    let listing = state.listing_service.get_published(id).await?;
    let realtor = state.realtor_service.get(listing.realtor_id).await?;
    let flash = Flash::from_headers(&headers);

    let mut context = TeraContext::new();
    context.insert("listing", &listing);
    context.insert("realtor", &realtor);
    if let Some(message) = &flash {
        context.insert("messages", &[message]);
    }

    let html = render_page(&state.theme_engine, "listings/listing.html", &context)?;
    if flash.is_some() {
        return Ok(([(header::SET_COOKIE, flash::clear_cookie())], html).into_response());
    }
    Ok(html.into_response())
}

/// GET /listings/search - filter published listings by the search form
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, PageError> {
    let filter = ListingFilter::try_from(&params)?;
    let listings = state.listing_service.search(&filter).await?;

    let mut context = TeraContext::new();
    context.insert("listings", &listings);
    insert_search_form(&mut context, &params);
    render_page(&state.theme_engine, "listings/search.html", &context)
}
