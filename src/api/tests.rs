//! Router tests for the JSON API and static files
//!
//! Also home of the seeded application shared with the HTML page tests.

use super::*;
use crate::config::ListingsConfig;
use crate::db::repositories::{
    ListingRepository, RealtorRepository, SqlxListingRepository, SqlxRealtorRepository,
};
use crate::db::{create_test_pool, migrations::run_migrations};
use crate::models::{CreateListingInput, CreateRealtorInput};
use crate::theme::ThemeEngine;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
};
use chrono::{Duration, TimeZone, Utc};
use serde_json::{json, Value};
use std::path::Path;
use tower::ServiceExt;

pub(crate) struct TestApp {
    pub router: Router,
    /// Published listings, oldest first
    pub listing_ids: Vec<i64>,
    pub draft_id: i64,
}

/// In-memory site with two realtors, seven published listings and a draft.
///
/// Newest first the published titles are: Miami Villa, Boston Brownstone,
/// Denver Loft, Dallas Condo, Austin Estate, Austin Family Home, Austin Bungalow.
pub(crate) async fn test_app() -> TestApp {
    let pool = create_test_pool().await.unwrap();
    run_migrations(&pool).await.unwrap();

    let realtors = SqlxRealtorRepository::new(pool.clone());
    let kyle = realtors
        .create(
            &CreateRealtorInput::new("Kyle Brown", "kyle@realty.test")
                .with_phone("555-0101")
                .with_mvp(true)
                .with_hire_date(Utc.with_ymd_and_hms(2020, 5, 1, 0, 0, 0).unwrap()),
        )
        .await
        .unwrap();
    let jenny = realtors
        .create(
            &CreateRealtorInput::new("Jenny Johnson", "jenny@realty.test")
                .with_hire_date(Utc.with_ymd_and_hms(2022, 9, 1, 0, 0, 0).unwrap()),
        )
        .await
        .unwrap();

    let listings = SqlxListingRepository::new(pool.clone());
    let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let rows = [
        (kyle.id, "Austin Bungalow", "Austin", "TX", 2, 200_000, "Cozy starter home"),
        (kyle.id, "Austin Family Home", "Austin", "TX", 3, 350_000, "Large POOL and yard"),
        (jenny.id, "Austin Estate", "Austin", "TX", 4, 900_000, "Gated estate"),
        (jenny.id, "Dallas Condo", "Dallas", "TX", 1, 150_000, "Downtown views"),
        (kyle.id, "Denver Loft", "Denver", "CO", 2, 400_000, "Open plan loft"),
        (jenny.id, "Boston Brownstone", "Boston", "MA", 3, 1_200_000, "Historic charm"),
        (kyle.id, "Miami Villa", "Miami", "FL", 5, 2_000_000, "Beachfront with pool"),
    ];

    let mut listing_ids = Vec::new();
    for (day, (realtor_id, title, city, state, bedrooms, price, description)) in
        rows.into_iter().enumerate()
    {
        let listing = listings
            .create(
                &CreateListingInput::new(realtor_id, title, price, bedrooms)
                    .with_location(format!("{} Main St", day + 1), city, state, "00000")
                    .with_description(description)
                    .with_list_date(base + Duration::days(day as i64)),
            )
            .await
            .unwrap();
        listing_ids.push(listing.id);
    }

    let draft = listings
        .create(
            &CreateListingInput::new(kyle.id, "Draft House", 100_000, 2)
                .with_location("9 Hidden Ln", "Austin", "TX", "78701")
                .with_published(false)
                .with_list_date(base + Duration::days(30)),
        )
        .await
        .unwrap();

    let theme = ThemeEngine::new(Path::new("no-such-themes-dir"), "default").unwrap();
    let state = AppState::new(pool, theme, ListingsConfig::default());

    TestApp {
        router: build_router(state),
        listing_ids,
        draft_id: draft.id,
    }
}

pub(crate) fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub(crate) async fn send(router: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, String::from_utf8_lossy(&bytes).into_owned())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, _, body) = send(router, get_request(uri)).await;
    (status, serde_json::from_str(&body).unwrap())
}

async fn post_json(router: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = send(router, request).await;
    (status, serde_json::from_str(&body).unwrap())
}

fn titles(listings: &Value) -> Vec<String> {
    listings
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["title"].as_str().unwrap().to_string())
        .collect()
}

fn inquiry(listing_id: i64, user_id: i64) -> Value {
    json!({
        "listing_id": listing_id,
        "name": "Brad Traversy",
        "email": "brad@example.com",
        "message": "Is this still available?",
        "user_id": user_id,
    })
}

// ============================================================================
// Listings
// ============================================================================

#[tokio::test]
async fn test_list_listings_first_page() {
    let app = test_app().await;
    let (status, body) = get_json(&app.router, "/api/v1/listings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 7);
    assert_eq!(body["page"], 1);
    assert_eq!(body["page_size"], 6);
    assert_eq!(body["total_pages"], 2);
    assert_eq!(body["has_next"], true);
    assert_eq!(body["has_prev"], false);
    assert_eq!(body["listings"].as_array().unwrap().len(), 6);
    assert_eq!(body["listings"][0]["title"], "Miami Villa");
    assert!(body["listings"][0].get("realtor").is_none());
}

#[tokio::test]
async fn test_list_listings_last_page() {
    let app = test_app().await;
    let (_, body) = get_json(&app.router, "/api/v1/listings?page=2").await;

    assert_eq!(titles(&body["listings"]), vec!["Austin Bungalow"]);
    assert_eq!(body["has_next"], false);
    assert_eq!(body["has_prev"], true);
}

#[tokio::test]
async fn test_list_listings_bad_page_numbers() {
    let app = test_app().await;

    for uri in ["/api/v1/listings?page=abc", "/api/v1/listings?page=0", "/api/v1/listings?page=-4"] {
        let (status, body) = get_json(&app.router, uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(body["page"], 1, "{}", uri);
    }

    let (status, body) = get_json(&app.router, "/api/v1/listings?page=99").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["listings"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 7);
    assert_eq!(body["has_next"], false);
}

#[tokio::test]
async fn test_list_listings_custom_page_size() {
    let app = test_app().await;
    let (_, body) = get_json(&app.router, "/api/v1/listings?page=3&page_size=3").await;
    assert_eq!(titles(&body["listings"]), vec!["Austin Bungalow"]);
    assert_eq!(body["total_pages"], 3);
}

#[tokio::test]
async fn test_search_city_and_bedrooms() {
    let app = test_app().await;
    let (status, body) =
        get_json(&app.router, "/api/v1/listings/search?city=austin&bedrooms=3").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(
        titles(&body["listings"]),
        vec!["Austin Family Home", "Austin Bungalow"]
    );
}

#[tokio::test]
async fn test_search_keywords_and_blank_fields() {
    let app = test_app().await;
    let (_, body) = get_json(
        &app.router,
        "/api/v1/listings/search?keywords=pool&city=&state=&bedrooms=&price=",
    )
    .await;
    assert_eq!(titles(&body["listings"]), vec!["Miami Villa", "Austin Family Home"]);

    let (_, body) = get_json(&app.router, "/api/v1/listings/search?state=TX&price=300000").await;
    assert_eq!(titles(&body["listings"]), vec!["Dallas Condo", "Austin Bungalow"]);
}

#[tokio::test]
async fn test_search_without_criteria_returns_all_published() {
    let app = test_app().await;
    let (_, body) = get_json(&app.router, "/api/v1/listings/search").await;
    assert_eq!(body["total"], 7);
    assert_eq!(body["listings"][6]["title"], "Austin Bungalow");
}

#[tokio::test]
async fn test_search_rejects_malformed_numbers() {
    let app = test_app().await;
    let (status, body) = get_json(&app.router, "/api/v1/listings/search?price=cheap").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"]["details"]["field"], "price");
}

#[tokio::test]
async fn test_get_listing_with_realtor() {
    let app = test_app().await;
    let id = app.listing_ids[0];
    let (status, body) = get_json(&app.router, &format!("/api/v1/listings/{}", id)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Austin Bungalow");
    assert_eq!(body["price"], 200_000);
    assert_eq!(body["realtor"]["name"], "Kyle Brown");
    assert_eq!(body["realtor"]["email"], "kyle@realty.test");
}

#[tokio::test]
async fn test_get_listing_not_found() {
    let app = test_app().await;

    let (status, body) = get_json(&app.router, "/api/v1/listings/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    // Drafts are hidden from the public
    let (status, _) = get_json(&app.router, &format!("/api/v1/listings/{}", app.draft_id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = get_json(&app.router, "/api/v1/listings/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_choices() {
    let app = test_app().await;
    let (status, body) = get_json(&app.router, "/api/v1/choices").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bedroom_choices"].as_array().unwrap().len(), 10);
    assert_eq!(body["price_choices"][0], json!({"value": "100000", "label": "$100,000"}));
    assert_eq!(body["state_choices"].as_array().unwrap().len(), 51);
}

#[tokio::test]
async fn test_unknown_api_path_is_json_404() {
    let app = test_app().await;
    let (status, body) = get_json(&app.router, "/api/v1/nothing-here").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

// ============================================================================
// Inquiries
// ============================================================================

#[tokio::test]
async fn test_inquiry_deduplicated_per_user() {
    let app = test_app().await;
    let listing_id = app.listing_ids[4];

    let (status, body) = post_json(&app.router, "/api/v1/inquiries", inquiry(listing_id, 7)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["listing"], "Denver Loft");
    assert_eq!(body["user_id"], 7);

    let (status, body) = post_json(&app.router, "/api/v1/inquiries", inquiry(listing_id, 7)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");

    let (status, _) = post_json(&app.router, "/api/v1/inquiries", inquiry(listing_id, 8)).await;
    assert_eq!(status, StatusCode::CREATED);

    // Same user, another listing
    let (status, _) =
        post_json(&app.router, "/api/v1/inquiries", inquiry(app.listing_ids[0], 7)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_anonymous_inquiries_unrestricted() {
    let app = test_app().await;
    let listing_id = app.listing_ids[4];

    for _ in 0..3 {
        let (status, _) = post_json(&app.router, "/api/v1/inquiries", inquiry(listing_id, 0)).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let mut body = inquiry(listing_id, 0);
    body.as_object_mut().unwrap().remove("user_id");
    let (status, created) = post_json(&app.router, "/api/v1/inquiries", body).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["user_id"], 0);
}

#[tokio::test]
async fn test_inquiry_errors() {
    let app = test_app().await;

    let (status, body) = post_json(&app.router, "/api/v1/inquiries", inquiry(9999, 7)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");

    let (status, _) = post_json(&app.router, "/api/v1/inquiries", inquiry(app.draft_id, 7)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut blank_name = inquiry(app.listing_ids[0], 7);
    blank_name["name"] = json!("   ");
    let (status, body) = post_json(&app.router, "/api/v1/inquiries", blank_name).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["field"], "name");
}

#[tokio::test]
async fn test_malformed_inquiry_requests_get_json_errors() {
    let app = test_app().await;

    let mut missing_name = inquiry(app.listing_ids[0], 7);
    missing_name.as_object_mut().unwrap().remove("name");
    let (status, body) = post_json(&app.router, "/api/v1/inquiries", missing_name).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["message"].as_str().unwrap().contains("name"));

    let (status, headers, body) =
        send(&app.router, get_request("/api/v1/inquiries?user_id=abc")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("application/json"));
    let body: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_user_inquiries() {
    let app = test_app().await;
    for &id in &app.listing_ids[..3] {
        post_json(&app.router, "/api/v1/inquiries", inquiry(id, 7)).await;
    }
    post_json(&app.router, "/api/v1/inquiries", inquiry(app.listing_ids[0], 8)).await;

    let (status, body) = get_json(&app.router, "/api/v1/inquiries?user_id=7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = get_json(&app.router, "/api/v1/inquiries?user_id=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

// ============================================================================
// Static files
// ============================================================================

#[tokio::test]
async fn test_static_stylesheet() {
    let app = test_app().await;
    let (status, headers, body) = send(&app.router, get_request("/static/style.css")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "text/css");
    assert!(body.contains(".description"));
}

#[tokio::test]
async fn test_static_missing_file() {
    let app = test_app().await;
    let (status, _, _) = send(&app.router, get_request("/static/missing.js")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _, _) = send(&app.router, get_request("/static/..%2F..%2FCargo.toml")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
