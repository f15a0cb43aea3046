//! Tests for the theme engine

use super::*;
use crate::models::{Listing, PagedResult, ListParams, SearchChoices};
use chrono::{TimeZone, Utc};
use serde_json::json;
use tempfile::TempDir;

fn engine() -> ThemeEngine {
    let temp_dir = TempDir::new().unwrap();
    ThemeEngine::new(temp_dir.path(), "default").expect("embedded theme should load")
}

fn listing(id: i64) -> Listing {
    Listing {
        id,
        realtor_id: 1,
        title: format!("House {}", id),
        address: "12 Shore Rd".to_string(),
        city: "Austin".to_string(),
        state: "TX".to_string(),
        zipcode: "78701".to_string(),
        description: "Pool & <garden>".to_string(),
        price: 1_250_000,
        bedrooms: 3,
        bathrooms: 2.5,
        sqft: 1800,
        is_published: true,
        list_date: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
    }
}

fn empty_values() -> serde_json::Value {
    json!({"keywords": "", "city": "", "state": "", "bedrooms": "", "price": ""})
}

#[test]
fn test_embedded_templates_loaded() {
    let engine = engine();
    for name in [
        "base.html",
        "index.html",
        "about.html",
        "error.html",
        "listings/listings.html",
        "listings/listing.html",
        "listings/search.html",
    ] {
        assert!(
            engine.tera.get_template_names().any(|t| t == name),
            "missing {}",
            name
        );
    }
    assert_eq!(engine.active_theme(), "default");
}

#[test]
fn test_render_listings_page_with_pagination() {
    let engine = engine();
    let all: Vec<Listing> = (1..=7).map(listing).collect();
    let page = PagedResult::from_vec(all, &ListParams::new(1, 6));

    let mut context = TeraContext::new();
    context.insert("listings", &page.items);
    context.insert("page", &page.meta());

    let html = engine.render("listings/listings.html", &context).unwrap();
    assert!(html.contains("House 6"));
    assert!(html.contains("$1,250,000"));
    assert!(html.contains("?page=2"));
}

#[test]
fn test_render_search_keeps_selected_values() {
    let engine = engine();
    let choices = SearchChoices::new();
    let mut values = empty_values();
    values["state"] = json!("TX");

    let mut context = TeraContext::new();
    context.insert("listings", &vec![listing(1)]);
    context.insert("bedroom_choices", &choices.bedroom_choices);
    context.insert("price_choices", &choices.price_choices);
    context.insert("state_choices", &choices.state_choices);
    context.insert("values", &values);

    let html = engine.render("listings/search.html", &context).unwrap();
    assert!(html.contains(r#"<option value="TX" selected>Texas</option>"#));
    assert!(html.contains("1 listing found"));
}

#[test]
fn test_listing_detail_escapes_description() {
    let engine = engine();
    let mut context = TeraContext::new();
    context.insert("listing", &listing(1));
    context.insert(
        "realtor",
        &json!({"name": "Kyle Brown", "phone": "555", "email": "kyle@example.com"}),
    );
    context.insert(
        "messages",
        &vec![json!({"level": "success", "text": "Your request has been submitted"})],
    );

    let html = engine.render("listings/listing.html", &context).unwrap();
    assert!(html.contains("Pool &amp; &lt;garden&gt;"));
    assert!(html.contains("alert-success"));
    assert!(html.contains(r#"name="realtor_email" value="kyle@example.com""#));
}

#[test]
fn test_render_missing_template_is_error() {
    let engine = engine();
    let err = engine.render("nope.html", &TeraContext::new()).unwrap_err();
    assert!(err.to_string().contains("nope.html"));
}

#[test]
fn test_disk_theme_overrides_embedded() {
    let temp_dir = TempDir::new().unwrap();
    let theme_dir = temp_dir.path().join("custom");
    std::fs::create_dir_all(theme_dir.join("static")).unwrap();
    std::fs::write(
        theme_dir.join("error.html"),
        "<p>custom {{ status }}</p>",
    )
    .unwrap();
    std::fs::write(theme_dir.join("static/site.js"), "console.log(1)").unwrap();

    let engine = ThemeEngine::new(temp_dir.path(), "custom").unwrap();
    let mut context = TeraContext::new();
    context.insert("status", &404);
    context.insert("title", "Not Found");
    context.insert("message", "gone");
    assert_eq!(engine.render("error.html", &context).unwrap(), "<p>custom 404</p>");

    // Templates the custom theme does not define still come from the default
    assert!(engine
        .tera
        .get_template_names()
        .any(|t| t == "listings/listings.html"));

    assert_eq!(
        engine.static_file("site.js").as_deref(),
        Some(&b"console.log(1)"[..])
    );
    assert!(engine.static_file("style.css").is_some());
}

#[test]
fn test_broken_override_fails_to_load() {
    let temp_dir = TempDir::new().unwrap();
    let theme_dir = temp_dir.path().join("broken");
    std::fs::create_dir_all(&theme_dir).unwrap();
    std::fs::write(theme_dir.join("index.html"), "{% if %}").unwrap();

    assert!(ThemeEngine::new(temp_dir.path(), "broken").is_err());
}

#[test]
fn test_static_path_traversal_rejected() {
    let engine = engine();
    assert!(engine.static_file("../Cargo.toml").is_none());
    assert!(engine.static_file("/etc/passwd").is_none());
    assert!(engine.static_file("").is_none());
    assert!(engine.static_file("style.css").is_some());
}

#[test]
fn test_simple_error_page_escapes() {
    let html = ThemeEngine::simple_error_page("Oops", "<script>");
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
}

#[test]
fn test_format_currency() {
    assert_eq!(format_currency(0), "$0");
    assert_eq!(format_currency(999), "$999");
    assert_eq!(format_currency(100_000), "$100,000");
    assert_eq!(format_currency(1_250_000), "$1,250,000");
    assert_eq!(format_currency(-4_500), "-$4,500");
}
