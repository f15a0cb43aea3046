//! Home and about pages

use axum::{extract::State, response::Html};
use tera::Context as TeraContext;

use crate::api::middleware::AppState;
use crate::models::SearchParams;
use crate::web::{insert_search_form, render_page, PageError};

/// GET / - latest listings and an empty search form
pub async fn index(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let listings = state
        .listing_service
        .latest(state.listings_config.latest_count)
        .await?;

    let mut context = TeraContext::new();
    context.insert("listings", &listings);
    insert_search_form(&mut context, &SearchParams::default());
    render_page(&state.theme_engine, "index.html", &context)
}

/// GET /about - the team, newest hires first, and the MVPs
pub async fn about(State(state): State<AppState>) -> Result<Html<String>, PageError> {
    let realtors = state.realtor_service.list().await?;
    let mvp_realtors = state.realtor_service.list_mvp().await?;

    let mut context = TeraContext::new();
    context.insert("realtors", &realtors);
    context.insert("mvp_realtors", &mvp_realtors);
    render_page(&state.theme_engine, "about.html", &context)
}
