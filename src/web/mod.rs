//! HTML pages
//!
//! Server-rendered routes of the site:
//! - `/` and `/about`
//! - `/listings`, `/listings/search` and `/listings/{id}`
//! - `POST /contact`

pub mod contacts;
pub mod error;
pub mod flash;
pub mod listings;
pub mod pages;

use axum::{
    response::Html,
    routing::{get, post},
    Router,
};
use tera::Context as TeraContext;

use crate::api::middleware::AppState;
use crate::models::{SearchChoices, SearchParams};
use crate::theme::ThemeEngine;

pub use error::{not_found, render_error_pages, PageError};
pub use flash::Flash;

/// Build the HTML router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(pages::index))
        .route("/about", get(pages::about))
        .route("/listings", get(listings::index))
        .route("/listings/search", get(listings::search))
        .route("/listings/{id}", get(listings::listing))
        .route("/contact", post(contacts::contact))
}

/// Render a page, turning template failures into a 500 error page
pub(crate) fn render_page(
    theme: &ThemeEngine,
    template: &str,
    context: &TeraContext,
) -> Result<Html<String>, PageError> {
    theme.render(template, context).map(Html).map_err(PageError::Internal)
}

/// Option lists and current values for the search form partial.
///
/// Values are echoed back as plain strings so the form keeps what the
/// visitor typed, even when it did not parse.
pub(crate) fn insert_search_form(context: &mut TeraContext, params: &SearchParams) {
    let choices = SearchChoices::new();
    context.insert("bedroom_choices", &choices.bedroom_choices);
    context.insert("price_choices", &choices.price_choices);
    context.insert("state_choices", &choices.state_choices);
    context.insert(
        "values",
        &serde_json::json!({
            "keywords": params.keywords.as_deref().unwrap_or(""),
            "city": params.city.as_deref().unwrap_or(""),
            "state": params.state.as_deref().unwrap_or(""),
            "bedrooms": params.bedrooms.as_deref().unwrap_or(""),
            "price": params.price.as_deref().unwrap_or(""),
        }),
    );
}
