//! Listing model
//!
//! This module provides:
//! - `Listing` entity representing a property for sale
//! - `CreateListingInput` for inserting listings
//!
//! Listings are read-only from the public site's point of view. Only
//! published listings appear in browse and search views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Listing entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Listing {
    /// Unique identifier
    pub id: i64,
    /// Realtor responsible for the listing
    pub realtor_id: i64,
    /// Listing title
    pub title: String,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State (two-letter code)
    pub state: String,
    /// Postal code
    pub zipcode: String,
    /// Free-text description, searched by keyword
    pub description: String,
    /// Asking price in whole dollars
    pub price: i64,
    /// Number of bedrooms
    pub bedrooms: i64,
    /// Number of bathrooms (half baths allowed)
    pub bathrooms: f64,
    /// Square footage
    pub sqft: i64,
    /// Whether the listing is visible on the public site
    pub is_published: bool,
    /// When the listing went on the market
    pub list_date: DateTime<Utc>,
}

/// Input for creating a new listing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateListingInput {
    pub realtor_id: i64,
    pub title: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zipcode: String,
    pub description: String,
    pub price: i64,
    pub bedrooms: i64,
    pub bathrooms: f64,
    pub sqft: i64,
    pub is_published: bool,
    /// Defaults to now when absent
    pub list_date: Option<DateTime<Utc>>,
}

impl CreateListingInput {
    /// Create a published listing input with empty address details
    pub fn new(realtor_id: i64, title: impl Into<String>, price: i64, bedrooms: i64) -> Self {
        Self {
            realtor_id,
            title: title.into(),
            address: String::new(),
            city: String::new(),
            state: String::new(),
            zipcode: String::new(),
            description: String::new(),
            price,
            bedrooms,
            bathrooms: 1.0,
            sqft: 0,
            is_published: true,
            list_date: None,
        }
    }

    /// Set the address fields
    pub fn with_location(
        mut self,
        address: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zipcode: impl Into<String>,
    ) -> Self {
        self.address = address.into();
        self.city = city.into();
        self.state = state.into();
        self.zipcode = zipcode.into();
        self
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set bathrooms and square footage
    pub fn with_size(mut self, bathrooms: f64, sqft: i64) -> Self {
        self.bathrooms = bathrooms;
        self.sqft = sqft;
        self
    }

    /// Set the published flag
    pub fn with_published(mut self, is_published: bool) -> Self {
        self.is_published = is_published;
        self
    }

    /// Set the list date
    pub fn with_list_date(mut self, list_date: DateTime<Utc>) -> Self {
        self.list_date = Some(list_date);
        self
    }
}

/// Sort listings newest first, breaking ties by descending id.
pub fn sort_by_list_date(listings: &mut [Listing]) {
    listings.sort_by(|a, b| {
        b.list_date
            .cmp(&a.list_date)
            .then_with(|| b.id.cmp(&a.id))
    });
}
